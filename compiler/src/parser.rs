use crate::{
    error::SpecError,
    tokenizer::{Line, LineKind, Lines},
    types::{Endpoint, Field, Method, Model, ScalarKind, TypeRef},
    utils::{grammar_error, quote},
};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MODEL_HEADER:    Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*:$").unwrap();
    static ref FIELD:           Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)(\*)?\s*:\s*(\S.*)$").unwrap();
    static ref ARRAY_TYPE:      Regex = Regex::new(r"^\[\s*(.*?)\s*\]$").unwrap();
    static ref SCALAR_TYPE:     Regex = Regex::new(r"^[a-z][A-Za-z0-9_]*$").unwrap();
    static ref MODEL_TYPE:      Regex = Regex::new(r"^[A-Z][A-Za-z0-9_]*$").unwrap();
    static ref PATH:            Regex = Regex::new(r"^/(?:[A-Za-z0-9._~!$&'()*+,;=:@\-]+|%[0-9A-Fa-f]{2}|\{[^{}/\s]+\}|/)*$").unwrap();
    static ref RESPONSE:        Regex = Regex::new(r"^=>\s*(.*)$").unwrap();
}

/// Parses a type token: a scalar keyword, a model name, or either one in brackets.
pub fn parse_type_token(token: &str, line: &Line) -> Result<TypeRef, SpecError> {
    if let Some(caps) = ARRAY_TYPE.captures(token) {
        let inner = &caps[1];
        if inner.starts_with('[') {
            return Err(grammar_error("Nested arrays are not supported", line));
        }
        let item = parse_element_type(inner, line)?;
        return Ok(TypeRef::Array(Box::new(item)));
    }
    parse_element_type(token, line)
}

fn parse_element_type(token: &str, line: &Line) -> Result<TypeRef, SpecError> {
    if SCALAR_TYPE.is_match(token) {
        return ScalarKind::from_keyword(token)
            .map(TypeRef::Scalar)
            .ok_or_else(|| grammar_error(&format!("Unknown scalar type {}", quote(token)), line));
    }
    if MODEL_TYPE.is_match(token) {
        return Ok(TypeRef::ModelReference(token.to_string()));
    }
    Err(grammar_error(&format!("Expected a type but found {}", quote(token)), line))
}

fn deeper_than_one(line: &Line) -> Result<(), SpecError> {
    if line.depth > 1 {
        return Err(grammar_error("Unexpected nested line", line));
    }
    Ok(())
}

/// Builds the model table. References are left unchecked; see `resolver`.
pub fn parse_models(lines: Lines<'_>) -> Result<IndexMap<String, Model>, SpecError> {
    let mut models: IndexMap<String, Model> = IndexMap::new();
    let mut current: Option<Model> = None;

    for line in lines {
        let line = line?;
        deeper_than_one(&line)?;

        if line.kind == LineKind::Header {
            let caps = MODEL_HEADER
                .captures(line.text)
                .ok_or_else(|| grammar_error("Expected a model header \"Name:\"", &line))?;

            if let Some(done) = current.take() {
                models.insert(done.name.clone(), done);
            }

            let name = caps[1].to_string();
            if models.contains_key(&name) {
                return Err(SpecError::DuplicateModel(name));
            }
            current = Some(Model {
                name,
                line:   line.number,
                fields: Vec::new(),
            });
            continue;
        }

        let model = current
            .as_mut()
            .ok_or_else(|| grammar_error("Field declared outside of a model", &line))?;

        let caps = FIELD
            .captures(line.text)
            .ok_or_else(|| grammar_error("Expected a field \"name: type\"", &line))?;

        let name = caps[1].to_string();
        if model.field(&name).is_some() {
            return Err(grammar_error(
                &format!("The field {} is declared twice in {}", quote(&name), quote(&model.name)),
                &line,
            ));
        }

        let type_ref = parse_type_token(&caps[3], &line)?;
        model.fields.push(Field {
            name,
            line:     line.number,
            type_ref,
            required: caps.get(2).is_some(),
            nullable: false,
        });
    }

    if let Some(done) = current.take() {
        models.insert(done.name.clone(), done);
    }

    Ok(models)
}

/// Builds the endpoint list. Duplicate `(method, path)` pairs are rejected here.
pub fn parse_endpoints(lines: Lines<'_>) -> Result<Vec<Endpoint>, SpecError> {
    let mut endpoints: Vec<Endpoint> = Vec::new();

    for line in lines {
        let line = line?;
        deeper_than_one(&line)?;

        if line.kind == LineKind::Header {
            let mut words = line.text.split_whitespace();
            let method: Method = match words.next() {
                Some(token) => token.parse()?,
                None        => return Err(grammar_error("Expected an endpoint header", &line)),
            };
            let path = match (words.next(), words.next()) {
                (Some(path), None) => path.to_string(),
                _ => {
                    return Err(grammar_error(
                        "Expected an endpoint header \"METHOD /path\"",
                        &line,
                    ))
                }
            };
            if !PATH.is_match(&path) {
                return Err(grammar_error(&format!("Invalid path {}", quote(&path)), &line));
            }
            if endpoints.iter().any(|e| e.method == method && e.path == path) {
                return Err(SpecError::DuplicateEndpoint {
                    method: method.to_string(),
                    path,
                });
            }

            endpoints.push(Endpoint {
                method,
                path,
                line:              line.number,
                request_type:      None,
                response_type:     None,
                response_is_array: false,
            });
            continue;
        }

        let endpoint = endpoints
            .last_mut()
            .ok_or_else(|| grammar_error("Body declared outside of an endpoint", &line))?;

        if let Some(caps) = RESPONSE.captures(line.text) {
            if endpoint.response_type.is_some() {
                return Err(grammar_error("The response is declared twice", &line));
            }
            let (type_ref, is_array) = match parse_type_token(&caps[1], &line)? {
                TypeRef::Array(item) => (*item, true),
                other                => (other, false),
            };
            endpoint.response_type     = Some(type_ref);
            endpoint.response_is_array = is_array;
        } else {
            if endpoint.request_type.is_some() {
                return Err(grammar_error("The request body is declared twice", &line));
            }
            endpoint.request_type = Some(parse_type_token(line.text, &line)?);
        }
    }

    Ok(endpoints)
}
