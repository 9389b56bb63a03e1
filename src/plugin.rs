use bevy::app::Plugin;
use bevy::prelude::*;

use super::config::SnifferConfig;
use super::font::BitmapFontAssetPlugin;

/// Adds `.fnt` bitmap font loading and the [`BitmapFontRegistry`](crate::BitmapFontRegistry).
#[derive(Default)]
pub struct BitmapFontPlugin {
    pub config: SnifferConfig,
}

impl BitmapFontPlugin {
    pub fn with_config(config: SnifferConfig) -> Self {
        Self { config }
    }
}

impl Plugin for BitmapFontPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(BitmapFontAssetPlugin {
            config: self.config.clone(),
        });
    }
}
