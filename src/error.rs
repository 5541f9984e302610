//! Error types for proxy_sheets

use thiserror::Error;

/// Unified error type for collection, normalization, and rendering
#[derive(Debug, Error)]
pub enum SheetError {
    /// File I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Directory traversal failed
    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),
    /// Image decode or encode failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// PDF construction or serialization failed
    #[error("PDF error: {0}")]
    Pdf(String),
    /// The configured size cap cannot fit even a single card
    #[error("size cap of {cap} bytes is below the average rendered card size of {card} bytes")]
    CapTooSmall { cap: u64, card: u64 },
}

/// Result alias for proxy_sheets operations
pub type Result<T> = std::result::Result<T, SheetError>;
