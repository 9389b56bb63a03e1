use bevy::{
    app::{App, Plugin, Update},
    asset::AssetApp,
};
use loader::BitmapFontLoader;

use crate::config::SnifferConfig;

mod document;
mod font;
mod loader;
mod registry;

pub use document::{
    classify, BitmapFontDocument, CharDescriptor, Classification, FontCommon, FontInfo,
    KerningPair, NotBitmapFontReason, PageRef,
};
pub use font::{BitmapFont, BitmapFontDefinition, GlyphDefinition};
pub use registry::{register_loaded_fonts, BitmapFontRegistry, FontRegistry};

#[derive(Default)]
pub struct BitmapFontAssetPlugin {
    pub config: SnifferConfig,
}

impl Plugin for BitmapFontAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<BitmapFont>()
            .register_asset_loader(BitmapFontLoader::new(self.config.clone()))
            .init_resource::<BitmapFontRegistry>()
            .add_systems(Update, register_loaded_fonts);
    }
}
