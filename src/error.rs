use std::path::PathBuf;

/// Failures surfaced while loading mask configuration or parsing templates
/// strictly. Conformance itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("failed to read mask config `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML mask config")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON mask config")]
    Json(#[from] serde_json::Error),

    #[error("invalid character class `{class}` in mask template")]
    InvalidRegex {
        class: String,
        #[source]
        source: regex::Error,
    },

    #[error("unterminated character class starting at offset {0} in mask template")]
    UnterminatedClass(usize),

    #[error("quantifier {{{count}}} exceeds the limit of {max} repetitions")]
    QuantifierTooLarge { count: usize, max: usize },

    #[error("unknown mask preset `{0}`")]
    UnknownPreset(String),

    #[error("mask literal `{0}` collides with the placeholder character")]
    PlaceholderCollision(char),
}
