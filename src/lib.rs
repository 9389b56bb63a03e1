mod config;
mod error;
mod font;
mod pipeline;
mod plugin;
mod url;

pub use plugin::BitmapFontPlugin;

pub use config::{BaseUrlStrip, SnifferConfig};
pub use error::{BitmapFontError, PageLoadError};
pub use url::{dirname, resolve_base_directory, texture_url};

pub use font::{
    classify, register_loaded_fonts, BitmapFont, BitmapFontDefinition, BitmapFontDocument,
    BitmapFontRegistry, CharDescriptor, Classification, FontCommon, FontInfo, FontRegistry,
    GlyphDefinition, KerningPair, NotBitmapFontReason, PageRef,
};

pub use pipeline::{
    register_bitmap_font, BitmapFontSniffer, CrossOrigin, ImageMetadata, LoadOptions,
    LoadResource, LoadType, LoaderMiddleware, LoaderPipeline, MemoryTextureCache,
    PageLoadRequest, ResourceData, ResourceLoader, ResourceMetadata, ResourceType,
    TextureCache,
};
