//! tinyspec
//!
//! This crate turns a directory of tinyspec sources into Swagger output.
//!
//! - Finds `header.yaml`, `models.tinyspec` and `endpoints.tinyspec`
//! - Compiles them into one document value
//! - Renders YAML or JSON text, or hands the JSON to an HTML renderer

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub use tinyspec_compiler::error::SpecError;
pub use tinyspec_compiler::types::Options;
pub use tinyspec_compiler::{assemble_document, compile, Document};

pub const HEADER_FILE: &str = "header.yaml";
pub const MODELS_FILE: &str = "models.tinyspec";
pub const ENDPOINTS_FILE: &str = "endpoints.tinyspec";

pub const TARGET_YAML_FILE: &str = "swagger.yaml";
pub const TARGET_JSON_FILE: &str = "swagger.json";

/// Raw text of the three source files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sources {
    pub header:    String,
    pub models:    String,
    pub endpoints: String,
}

fn find_file(root: &Path, name: &str) -> Result<PathBuf, SpecError> {
    let mut found: Option<PathBuf> = None;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| SpecError::Io(e.into()))?;
        if !entry.file_type().is_file() || entry.file_name() != name {
            continue;
        }
        if let Some(first) = &found {
            warn!(
                ignored = %entry.path().display(),
                using = %first.display(),
                "found more than one {}", name
            );
            continue;
        }
        found = Some(entry.into_path());
    }

    found.ok_or_else(|| SpecError::MissingSource {
        file: name.to_string(),
        dir:  root.display().to_string(),
    })
}

/// Searches `root` recursively for the three source files.
/// The first match of each name (in file-name order) is used.
pub fn discover_sources(root: &Path) -> Result<Sources, SpecError> {
    let header    = find_file(root, HEADER_FILE)?;
    let models    = find_file(root, MODELS_FILE)?;
    let endpoints = find_file(root, ENDPOINTS_FILE)?;
    debug!(
        header = %header.display(),
        models = %models.display(),
        endpoints = %endpoints.display(),
        "discovered sources"
    );

    Ok(Sources {
        header:    fs::read_to_string(header)?,
        models:    fs::read_to_string(models)?,
        endpoints: fs::read_to_string(endpoints)?,
    })
}

/// Compiles `sources` and merges the result under the header.
pub fn build_document(sources: &Sources, options: Options) -> Result<Value, SpecError> {
    let document = compile(&sources.models, &sources.endpoints, options)?;
    assemble_document(&sources.header, &document)
}

pub fn to_yaml(document: &Value) -> Result<String, SpecError> {
    Ok(serde_yaml::to_string(document)?)
}

pub fn to_json(document: &Value) -> Result<String, SpecError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Runs `<renderer> openapi <json_path> <out_dir>`.
pub fn render_html(json_path: &Path, out_dir: &Path, renderer: &str) -> Result<(), SpecError> {
    debug!(renderer, json = %json_path.display(), out = %out_dir.display(), "rendering html");

    let status = Command::new(renderer)
        .arg("openapi")
        .arg(json_path)
        .arg(out_dir)
        .status()
        .map_err(|e| SpecError::Render(format!("failed to launch {}: {}", renderer, e)))?;

    if !status.success() {
        return Err(SpecError::Render(format!("{} exited with {}", renderer, status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HEADER: &str = "swagger: \"2.0\"\ninfo:\n  title: Pets\n  version: 1.0.0\n";
    const MODELS: &str = "Pet:\n  name*: string\n  tags: [string]\n";
    const ENDPOINTS: &str = "GET /pets\n  => [Pet]\nPOST /pets\n  Pet\n";

    fn write_project(root: &Path) {
        let api_dir = root.join("api");
        fs::create_dir_all(&api_dir).unwrap();
        fs::write(root.join(HEADER_FILE), HEADER).unwrap();
        fs::write(api_dir.join(MODELS_FILE), MODELS).unwrap();
        fs::write(api_dir.join(ENDPOINTS_FILE), ENDPOINTS).unwrap();
    }

    #[test]
    fn test_discover_sources_recursively() {
        let dir = tempdir().unwrap();
        write_project(dir.path());

        let sources = discover_sources(dir.path()).unwrap();
        assert_eq!(sources.header, HEADER);
        assert_eq!(sources.models, MODELS);
        assert_eq!(sources.endpoints, ENDPOINTS);
    }

    #[test]
    fn test_discover_sources_missing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(HEADER_FILE), HEADER).unwrap();
        fs::write(dir.path().join(MODELS_FILE), MODELS).unwrap();

        let err = discover_sources(dir.path()).unwrap_err();
        assert!(
            matches!(err, SpecError::MissingSource { ref file, .. } if file == ENDPOINTS_FILE),
            "expected MissingSource but got {:?}",
            err
        );
    }

    #[test]
    fn test_build_document_yaml_and_json() {
        let dir = tempdir().unwrap();
        write_project(dir.path());
        let sources = discover_sources(dir.path()).unwrap();

        let doc = build_document(&sources, Options::default()).unwrap();
        let yaml = to_yaml(&doc).unwrap();
        assert!(yaml.starts_with("swagger:"));

        let json = to_json(&doc).unwrap();
        let reparsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, doc);
        assert!(json.contains("\n  \"info\": {"));

        let from_yaml: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(from_yaml, doc);
    }

    #[test]
    fn test_render_html_reports_missing_renderer() {
        let dir = tempdir().unwrap();
        let err = render_html(
            &dir.path().join(TARGET_JSON_FILE),
            dir.path(),
            "tinyspec-renderer-that-does-not-exist",
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::Render(_)));
    }
}
