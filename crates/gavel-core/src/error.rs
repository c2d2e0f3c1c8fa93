//! Structured error hierarchy for the extraction subsystem.

/// Errors from turning raw backend text into a validated decision record.
///
/// Both variants are fatal for the case: no partial record is ever
/// returned, and nothing is registered for a failed case.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// No structured value could be decoded, even after recovery.
    ///
    /// Carries the original decoder message and a bounded snippet of the
    /// raw text so the parse state can be reproduced from logs alone.
    #[error("model output was not valid JSON: {message}")]
    MalformedOutput {
        /// The strict decoder's failure message.
        message: String,
        /// First 1000 characters of the raw backend text.
        snippet: String,
    },

    /// A value was decoded but lacks a required decision field.
    #[error("decision record missing or invalid required field: {field}")]
    InvalidRecord {
        /// Name of the missing or wrong-typed field.
        field: &'static str,
    },
}

impl ExtractionError {
    /// The required field this error names, when applicable.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidRecord { field } => Some(field),
            Self::MalformedOutput { .. } => None,
        }
    }
}
