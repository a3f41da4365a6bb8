//! Serializable shapes of the generated Swagger fragments.
//!
//! Every map is an `IndexMap` so the output order follows declaration order
//! and two runs over the same input serialize identically.

use indexmap::IndexMap;
use serde::Serialize;

pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Either a single `type` name or a `[name, "null"]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(&'static str),
    Nullable([&'static str; 2]),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference:  Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_:      Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format:     Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items:      Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required:   Vec<String>,
    #[serde(rename = "anyOf", skip_serializing_if = "Vec::is_empty")]
    pub any_of:     Vec<Schema>,
}

impl Schema {
    pub fn typed(name: &'static str) -> Self {
        Schema {
            type_: Some(SchemaType::Single(name)),
            ..Schema::default()
        }
    }

    pub fn reference(model: &str) -> Self {
        Schema {
            reference: Some(format!("{}{}", DEFINITIONS_PREFIX, model)),
            ..Schema::default()
        }
    }

    pub fn array(items: Schema) -> Self {
        Schema {
            items: Some(Box::new(items)),
            ..Schema::typed("array")
        }
    }

    /// Widens this schema so it also accepts `null`.
    pub fn or_null(self) -> Self {
        match self.type_ {
            Some(SchemaType::Single(name)) => Schema {
                type_: Some(SchemaType::Nullable([name, "null"])),
                ..self
            },
            Some(SchemaType::Nullable(_)) => self,
            None => Schema {
                any_of: vec![self, Schema::typed("null")],
                ..Schema::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name:     String,
    #[serde(rename = "in")]
    pub location: &'static str,
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_:    Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema:   Option<Schema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema:      Option<Schema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub responses:  IndexMap<String, Response>,
}

/// Operations keyed by lowercase method.
pub type PathItem = IndexMap<String, Operation>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub paths:       IndexMap<String, PathItem>,
    pub definitions: IndexMap<String, Schema>,
}
