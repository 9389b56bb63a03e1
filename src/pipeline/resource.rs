use std::sync::Arc;

use bevy::utils::HashMap;

use crate::{error::BitmapFontError, font::BitmapFontDefinition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResourceType {
    #[default]
    Unknown,
    Json,
    Xml,
    Image,
    Audio,
    Video,
    Text,
}

impl ResourceType {
    /// Guesses the type of a resource from its URL, using the MIME type for data URLs.
    pub fn from_url(url: &str) -> Self {
        if let Some(mime) = data_url_mime(url) {
            return Self::from_mime(mime);
        }
        Self::from_extension(extension(url))
    }

    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "xml" | "fnt" | "svg" | "xhtml" | "html" | "htm" => ResourceType::Xml,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tif" | "tiff" | "tga" => {
                ResourceType::Image
            }
            "mp3" | "ogg" | "oga" | "wav" | "m4a" | "flac" => ResourceType::Audio,
            "mp4" | "webm" | "ogv" => ResourceType::Video,
            "json" => ResourceType::Json,
            "" => ResourceType::Unknown,
            _ => ResourceType::Text,
        }
    }

    fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        if mime.ends_with("xml") {
            ResourceType::Xml
        } else if mime.starts_with("image/") {
            ResourceType::Image
        } else if mime.starts_with("audio/") {
            ResourceType::Audio
        } else if mime.starts_with("video/") {
            ResourceType::Video
        } else if mime.ends_with("json") {
            ResourceType::Json
        } else if mime.starts_with("text/") {
            ResourceType::Text
        } else {
            ResourceType::Unknown
        }
    }
}

fn data_url_mime(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("data:")?;
    let end = rest.find(&[';', ','][..]).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Extension of the last path segment, ignoring any query or fragment.
fn extension(url: &str) -> &str {
    let path = url.split(&['?', '#'][..]).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rfind('.') {
        Some(index) if index > 0 => &file[index + 1..],
        _ => "",
    }
}

/// Decoded payload of a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceData {
    Xml(String),
    Json(String),
    Text(String),
    Binary(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossOrigin {
    Anonymous,
    UseCredentials,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadType {
    #[default]
    Xhr,
    Image,
    Audio,
    Video,
}

/// Options forwarded untouched to image loads spawned on behalf of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata(pub HashMap<String, String>);

impl ImageMetadata {
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMetadata {
    pub image_metadata: Option<ImageMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub cross_origin: Option<CrossOrigin>,
    pub load_type: LoadType,
    pub metadata: Option<ImageMetadata>,
    /// Name of the resource that requested this load.
    pub parent_resource: Option<String>,
}

/// A sub-load the pipeline asks the host loader to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoadRequest {
    pub name: String,
    pub url: String,
    pub options: LoadOptions,
}

/// One pending or completed load, as seen by the pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct LoadResource {
    pub name: String,
    pub url: String,
    pub data: Option<ResourceData>,
    pub kind: ResourceType,
    pub is_data_url: bool,
    pub cross_origin: Option<CrossOrigin>,
    pub metadata: ResourceMetadata,
    pub bitmap_font: Option<Arc<BitmapFontDefinition>>,
    pub error: Option<Arc<BitmapFontError>>,
}

impl LoadResource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: name.into(),
            is_data_url: url.starts_with("data:"),
            kind: ResourceType::from_url(&url),
            url,
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: ResourceData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_kind(mut self, kind: ResourceType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_cross_origin(mut self, cross_origin: CrossOrigin) -> Self {
        self.cross_origin = Some(cross_origin);
        self
    }

    pub fn with_image_metadata(mut self, image_metadata: ImageMetadata) -> Self {
        self.metadata.image_metadata = Some(image_metadata);
        self
    }

    /// Options for an image load spawned by this resource.
    pub fn child_image_options(&self) -> LoadOptions {
        LoadOptions {
            cross_origin: self.cross_origin,
            load_type: LoadType::Image,
            metadata: self.metadata.image_metadata.clone(),
            parent_resource: Some(self.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension() {
        assert_eq!(ResourceType::from_url("/fonts/a.xml"), ResourceType::Xml);
        assert_eq!(ResourceType::from_url("/fonts/a.FNT?v=3"), ResourceType::Xml);
        assert_eq!(ResourceType::from_url("a.png#frag"), ResourceType::Image);
        assert_eq!(ResourceType::from_url("data.json"), ResourceType::Json);
        assert_eq!(ResourceType::from_url("/v1.2/readme"), ResourceType::Unknown);
        assert_eq!(ResourceType::from_url(".hidden"), ResourceType::Unknown);
    }

    #[test]
    fn data_urls_use_their_mime_type() {
        let resource = LoadResource::new("font", "data:text/xml;base64,PGZvbnQvPg==");
        assert!(resource.is_data_url);
        assert_eq!(resource.kind, ResourceType::Xml);
        assert_eq!(
            ResourceType::from_url("data:image/png;base64,AAAA"),
            ResourceType::Image
        );
        assert_eq!(
            ResourceType::from_url("data:application/json,{}"),
            ResourceType::Json
        );
    }

    #[test]
    fn child_options_carry_parent_settings() {
        let metadata = ImageMetadata::default().with("mipmap", "on");
        let resource = LoadResource::new("desyrel", "/fonts/desyrel.xml")
            .with_cross_origin(CrossOrigin::Anonymous)
            .with_image_metadata(metadata.clone());

        let options = resource.child_image_options();
        assert_eq!(options.cross_origin, Some(CrossOrigin::Anonymous));
        assert_eq!(options.load_type, LoadType::Image);
        assert_eq!(options.metadata, Some(metadata));
        assert_eq!(options.parent_resource.as_deref(), Some("desyrel"));
    }
}
