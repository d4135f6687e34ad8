use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkageError {
    #[error("failed to read glossary {path}: {source}")]
    GlossaryIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse glossary {path}: {source}")]
    GlossaryParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failure reported by a [`crate::Translator`].
///
/// The engine never propagates these; a failed translation downgrades the
/// comparison to the untranslated name.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation backend failed: {0}")]
    Backend(String),
}
