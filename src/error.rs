use std::string::FromUtf8Error;

use thiserror::Error;

use crate::font::NotBitmapFontReason;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BitmapFontError {
    /// An [IO](std::io) Error
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The font file is not valid UTF-8
    #[error(transparent)]
    Utf8(#[from] FromUtf8Error),
    #[error("attribute `{attribute}` of <{element}> has invalid value {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    #[error("<page> #{index} has no `file` attribute")]
    MissingPageFile { index: usize },
    #[error("not a bitmap font: {0}")]
    NotBitmapFont(NotBitmapFontReason),
    #[error("page load `{name}` for {url} failed: {reason}")]
    PageLoadFailed {
        name: String,
        url: String,
        reason: String,
    },
    #[error("page texture {url} is not in the texture cache after loading")]
    PageNotCached { url: String },
}

/// Failure reported by a host [`ResourceLoader`](crate::ResourceLoader) for one page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PageLoadError(pub String);

impl PageLoadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
