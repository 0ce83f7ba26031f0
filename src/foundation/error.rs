/// Result alias used across Tessera's public API.
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Top-level error type for parsing, decoding, font handling, and rendering failures.
#[derive(thiserror::Error, Debug)]
pub enum TesseraError {
    /// Input data is structurally invalid (template/inputs JSON, geometry).
    #[error("validation error: {0}")]
    Validation(String),

    /// A raster could not be decoded or encoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A font candidate could not be fetched or loaded.
    #[error("font error: {0}")]
    Font(String),

    /// Rasterization or compositing failed.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TesseraError {
    /// Build a [`TesseraError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TesseraError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`TesseraError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`TesseraError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
