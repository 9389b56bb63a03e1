/// How the configured base URL is removed from a font's resolved directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaseUrlStrip {
    /// Remove the first occurrence wherever it appears in the directory.
    #[default]
    FirstOccurrence,
    /// Strip only when the directory starts with the base URL.
    Prefix,
}

/// Settings shared by the pipeline stage and the asset loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnifferConfig {
    /// Prefix the host loader puts in front of every relative URL.
    pub base_url: Option<String>,
    pub base_url_strip: BaseUrlStrip,
}

impl SnifferConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_base_url_strip(mut self, base_url_strip: BaseUrlStrip) -> Self {
        self.base_url_strip = base_url_strip;
        self
    }

    /// The base URL, treating an empty string as unset.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|base_url| !base_url.is_empty())
    }
}
