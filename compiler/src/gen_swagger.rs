use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    document::{Operation, Parameter, PathItem, Response, Schema},
    error::SpecError,
    types::{CompilationUnit, Endpoint, Field, Model, TypeRef},
};

lazy_static! {
    static ref PATH_PARAM: Regex = Regex::new(r"\{([^{}/]+)\}").unwrap();
}

pub const SUCCESS_STATUS: &str = "200";
pub const SUCCESS_DESCRIPTION: &str = "OK";

/// Maps a type to its schema. Model references stay named refs, never inlined.
pub fn type_schema(type_ref: &TypeRef) -> Schema {
    match type_ref {
        TypeRef::Scalar(kind) => Schema {
            format: kind.format(),
            ..Schema::typed(kind.schema_type())
        },
        TypeRef::ModelReference(name) => Schema::reference(name),
        TypeRef::Array(item)          => Schema::array(type_schema(item)),
    }
}

fn field_schema(field: &Field) -> Schema {
    let schema = type_schema(&field.type_ref);
    if field.nullable {
        schema.or_null()
    } else {
        schema
    }
}

/// Generates the object definition for one model.
pub fn generate_definition(model: &Model) -> Schema {
    let mut properties = IndexMap::new();
    let mut required   = Vec::new();

    for field in &model.fields {
        properties.insert(field.name.clone(), field_schema(field));
        if field.required {
            required.push(field.name.clone());
        }
    }

    Schema {
        properties: Some(properties),
        required,
        ..Schema::typed("object")
    }
}

/// Generates the `definitions` section, one entry per model in declaration order.
pub fn generate_definitions(unit: &CompilationUnit) -> IndexMap<String, Schema> {
    unit.models
        .values()
        .map(|model| (model.name.clone(), generate_definition(model)))
        .collect()
}

/// Names of the `{param}` placeholders in `path`, in order. A repeated name
/// is listed once.
pub fn path_parameters(path: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PATH_PARAM.captures_iter(path) {
        if !names.iter().any(|n| n == &caps[1]) {
            names.push(caps[1].to_string());
        }
    }
    names
}

/// Generates the operation object for one endpoint.
pub fn generate_operation(endpoint: &Endpoint) -> Operation {
    let mut parameters: Vec<Parameter> = path_parameters(&endpoint.path)
        .into_iter()
        .map(|name| Parameter {
            name,
            location: "path",
            required: true,
            type_:    Some("string"),
            schema:   None,
        })
        .collect();

    if let Some(ref request) = endpoint.request_type {
        parameters.push(Parameter {
            name:     "body".to_string(),
            location: "body",
            required: true,
            type_:    None,
            schema:   Some(type_schema(request)),
        });
    }

    let schema = endpoint.response_type.as_ref().map(|response| {
        let item = type_schema(response);
        if endpoint.response_is_array {
            Schema::array(item)
        } else {
            item
        }
    });

    let mut responses = IndexMap::new();
    responses.insert(
        SUCCESS_STATUS.to_string(),
        Response {
            description: SUCCESS_DESCRIPTION.to_string(),
            schema,
        },
    );

    Operation {
        parameters,
        responses,
    }
}

/// Generates the `paths` section. Returns `Err(SpecError::DuplicateEndpoint)`
/// if two endpoints share a method and path.
pub fn generate_paths(unit: &CompilationUnit) -> Result<IndexMap<String, PathItem>, SpecError> {
    let mut paths: IndexMap<String, PathItem> = IndexMap::new();

    for endpoint in &unit.endpoints {
        let item = paths.entry(endpoint.path.clone()).or_default();
        let key  = endpoint.method.operation_key();
        if item.contains_key(&key) {
            return Err(SpecError::DuplicateEndpoint {
                method: endpoint.method.to_string(),
                path:   endpoint.path.clone(),
            });
        }
        item.insert(key, generate_operation(endpoint));
    }

    Ok(paths)
}
