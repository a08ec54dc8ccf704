use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a document package: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("document package has no {0} part")]
    MissingPart(String),

    #[error("malformed xml in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("document part has no w:body element")]
    MissingBody,

    #[error("paragraph {0} not found")]
    TargetNotFound(String),

    #[error("split of paragraph {0} has no parts")]
    EmptySplit(String),

    #[error("no paragraph matches {0:?}")]
    NoMatch(String),

    #[error("failed to write document package: {0}")]
    Save(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocxError {
    /// True when the bytes could not be opened as a document at all.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Archive(_) | Self::MissingPart(_) | Self::Xml { .. } | Self::MissingBody | Self::Io(_)
        )
    }
}
