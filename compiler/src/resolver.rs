use indexmap::IndexMap;

use crate::{
    error::SpecError,
    types::{Endpoint, Model, TypeRef},
};

fn check(type_ref: &TypeRef, models: &IndexMap<String, Model>) -> Result<(), SpecError> {
    match type_ref.references() {
        Some(name) if !models.contains_key(name) => {
            Err(SpecError::UnresolvedReference(name.to_string()))
        }
        _ => Ok(()),
    }
}

/// Returns `Ok(())` if every model reference in `models` and `endpoints`
/// names a defined model, or `Err(SpecError::UnresolvedReference(_))` otherwise.
///
/// All model fields are checked before any endpoint. Cycles between models
/// are fine: only existence is checked.
pub fn resolve_references(
    models: &IndexMap<String, Model>,
    endpoints: &[Endpoint],
) -> Result<(), SpecError> {
    // 1) Model fields
    for model in models.values() {
        for field in &model.fields {
            check(&field.type_ref, models)?;
        }
    }

    // 2) Endpoint bodies
    for endpoint in endpoints {
        if let Some(ref request) = endpoint.request_type {
            check(request, models)?;
        }
        if let Some(ref response) = endpoint.response_type {
            check(response, models)?;
        }
    }

    Ok(())
}
