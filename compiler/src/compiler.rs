use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    document::Document,
    error::SpecError,
    gen_swagger::{generate_definitions, generate_paths},
    parser::{parse_endpoints, parse_models},
    resolver::resolve_references,
    tokenizer::tokenize,
    types::{CompilationUnit, Field, Model, Options, ScalarKind, TypeRef},
};

/// Synthetic fields appended to every model: `(name, kind, required)`.
pub const DEFAULT_FIELDS: [(&str, ScalarKind, bool); 3] = [
    ("id",         ScalarKind::Integer,  true),
    ("created_at", ScalarKind::DateTime, false),
    ("updated_at", ScalarKind::DateTime, false),
];

/// Appends `id`, `created_at` and `updated_at`. A declared field with the same
/// name is kept as written and the synthetic one is skipped.
pub fn inject_default_fields(model: &mut Model) {
    for (name, kind, required) in DEFAULT_FIELDS {
        if model.field(name).is_some() {
            continue;
        }
        model.fields.push(Field {
            name: name.to_string(),
            line: 0,
            type_ref: TypeRef::Scalar(kind),
            required,
            nullable: false,
        });
    }
}

/// Parses and resolves both texts into a fresh `CompilationUnit`.
/// Returns `Err(SpecError)` if tokenization/parsing/resolution fails.
pub fn build_unit(
    models_text: &str,
    endpoints_text: &str,
    options: Options,
) -> Result<CompilationUnit, SpecError> {
    let mut models = parse_models(tokenize(models_text))?;
    let endpoints  = parse_endpoints(tokenize(endpoints_text))?;
    resolve_references(&models, &endpoints)?;

    for model in models.values_mut() {
        if options.inject_default_fields {
            inject_default_fields(model);
        }
        for field in &mut model.fields {
            field.nullable = options.add_nulls && !field.required;
        }
    }

    debug!(
        models = models.len(),
        endpoints = endpoints.len(),
        inject_default_fields = options.inject_default_fields,
        add_nulls = options.add_nulls,
        "built compilation unit"
    );

    Ok(CompilationUnit {
        models,
        endpoints,
        options,
    })
}

/// Emits the `paths` and `definitions` sections for a built unit.
pub fn emit_document(unit: &CompilationUnit) -> Result<Document, SpecError> {
    let definitions = generate_definitions(unit);
    let paths       = generate_paths(unit)?;
    Ok(Document { paths, definitions })
}

/// Compile model and endpoint shorthand into a `Document`.
/// Nothing is returned on error; the first failure is reported.
pub fn compile(
    models_text: &str,
    endpoints_text: &str,
    options: Options,
) -> Result<Document, SpecError> {
    let unit = build_unit(models_text, endpoints_text, options)?;
    emit_document(&unit)
}

/// Merges a compiled `Document` under a YAML header (`swagger`, `info`, ...).
/// Returns `Err(SpecError::Header)` if the header is not a mapping or already
/// defines `paths` or `definitions`.
pub fn assemble_document(header_text: &str, document: &Document) -> Result<Value, SpecError> {
    let mut root = if header_text.trim().is_empty() {
        Map::new()
    } else {
        match serde_yaml::from_str::<Value>(header_text)? {
            Value::Object(map) => map,
            Value::Null        => Map::new(),
            _ => {
                return Err(SpecError::Header(
                    "the header must be a YAML mapping".to_string(),
                ))
            }
        }
    };

    for key in ["paths", "definitions"] {
        if root.contains_key(key) {
            return Err(SpecError::Header(format!("the header already defines `{}`", key)));
        }
    }

    root.insert("paths".to_string(), serde_json::to_value(&document.paths)?);
    root.insert("definitions".to_string(), serde_json::to_value(&document.definitions)?);
    Ok(Value::Object(root))
}
