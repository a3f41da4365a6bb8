use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Grammar error at line {line}: {msg} in {text:?}")]
    Grammar {
        msg:  String,
        line: usize,
        text: String,
    },

    #[error("The model \"{0}\" is defined twice")]
    DuplicateModel(String),

    #[error("The endpoint {method} {path} is defined twice")]
    DuplicateEndpoint {
        method: String,
        path:   String,
    },

    #[error("Unknown HTTP method \"{0}\"")]
    UnknownMethod(String),

    #[error("The model \"{0}\" is not defined")]
    UnresolvedReference(String),

    #[error("Header error: {0}")]
    Header(String),

    #[error("Could not find {file} under {dir}")]
    MissingSource {
        file: String,
        dir:  String,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
