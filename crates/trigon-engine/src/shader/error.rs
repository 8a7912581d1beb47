use super::Stage;

/// Errors raised while loading a shader library or resolving its entry points.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("shader library `{label}` failed to parse:\n{message}")]
    Parse { label: String, message: String },

    #[error("shader library `{label}` failed validation:\n{message}")]
    Validation { label: String, message: String },

    #[error("entry point `{name}` not found in shader library `{label}`")]
    MissingEntryPoint { label: String, name: String },

    #[error("entry point `{name}` is a {found} function, expected {expected}")]
    WrongStage {
        name: String,
        expected: Stage,
        found: Stage,
    },
}
