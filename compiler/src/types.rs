use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::SpecError;

/// Scalar kinds a field or body may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    DateTime,
}

impl ScalarKind {
    /// The shorthand keyword for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarKind::String   => "string",
            ScalarKind::Integer  => "integer",
            ScalarKind::Number   => "number",
            ScalarKind::Boolean  => "boolean",
            ScalarKind::Object   => "object",
            ScalarKind::DateTime => "datetime",
        }
    }

    /// The schema `type` this kind is emitted as.
    pub fn schema_type(self) -> &'static str {
        match self {
            ScalarKind::DateTime => "string",
            other                => other.keyword(),
        }
    }

    pub fn format(self) -> Option<&'static str> {
        match self {
            ScalarKind::DateTime => Some("date-time"),
            _                    => None,
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "string"   => Some(ScalarKind::String),
            "integer"  => Some(ScalarKind::Integer),
            "number"   => Some(ScalarKind::Number),
            "boolean"  => Some(ScalarKind::Boolean),
            "object"   => Some(ScalarKind::Object),
            "datetime" => Some(ScalarKind::DateTime),
            _          => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeRef {
    Scalar(ScalarKind),
    ModelReference(String),
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// The model name this type points at, looking through arrays.
    pub fn references(&self) -> Option<&str> {
        match self {
            TypeRef::Scalar(_)            => None,
            TypeRef::ModelReference(name) => Some(name),
            TypeRef::Array(item)          => item.references(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:     String,
    pub line:     usize,
    pub type_ref: TypeRef,
    pub required: bool,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    pub name:   String,
    pub line:   usize,
    pub fields: Vec<Field>,
}

impl Model {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get     => "GET",
            Method::Post    => "POST",
            Method::Put     => "PUT",
            Method::Patch   => "PATCH",
            Method::Delete  => "DELETE",
            Method::Head    => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// Operation key inside a path item.
    pub fn operation_key(self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SpecError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_ascii_uppercase().as_str() {
            "GET"     => Ok(Method::Get),
            "POST"    => Ok(Method::Post),
            "PUT"     => Ok(Method::Put),
            "PATCH"   => Ok(Method::Patch),
            "DELETE"  => Ok(Method::Delete),
            "HEAD"    => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _         => Err(SpecError::UnknownMethod(token.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub method:            Method,
    pub path:              String,
    pub line:              usize,
    pub request_type:      Option<TypeRef>,
    pub response_type:     Option<TypeRef>,
    pub response_is_array: bool,
}

/// Per-run switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub inject_default_fields: bool,
    pub add_nulls:             bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            inject_default_fields: true,
            add_nulls:             false,
        }
    }
}

/// Everything one compilation owns. Built fresh per run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub models:    IndexMap<String, Model>,
    pub endpoints: Vec<Endpoint>,
    pub options:   Options,
}
