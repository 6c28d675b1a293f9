use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum CopybookError {
    /// A layout or export configuration that can never produce output, such
    /// as a zero-capacity grid or a fontless export without permission to
    /// proceed without one. A zero-capacity grid is always this error, never
    /// an empty-but-successful layout.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error(transparent)]
    /// Structured content JSON could not be parsed. Callers that can tolerate
    /// missing content should use [StructuredContent::from_json_lossy]
    /// instead, which recovers with an empty paragraph list.
    ///
    /// [StructuredContent::from_json_lossy]: crate::StructuredContent::from_json_lossy
    ContentParse(#[from] serde_json::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    /// Font subsetting failed outright. Exports may recover by embedding the
    /// full, unsubsetted font when the caller permits it.
    #[error("font subsetting failed: {reason}")]
    FontSubset { reason: String },

    /// A page referenced by the page order was missing from the document
    #[error("attempted to write a page that does not exist in the document")]
    PageMissing,

    #[error(transparent)]
    /// An I/O error occurred while serializing the document
    Io(#[from] std::io::Error),
}

impl CopybookError {
    pub(crate) fn invalid_configuration(reason: impl Into<String>) -> CopybookError {
        CopybookError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn font_subset(reason: impl Into<String>) -> CopybookError {
        CopybookError::FontSubset {
            reason: reason.into(),
        }
    }
}
