use std::sync::Arc;

use bevy::{
    asset::{Asset, Handle},
    log,
    math::URect,
    reflect::TypePath,
    render::texture::Image,
    utils::HashMap,
};

use super::document::BitmapFontDocument;

#[derive(Debug, Clone, PartialEq)]
pub struct GlyphDefinition {
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: i32,
    pub page: usize,
    /// Pixel rectangle of the glyph on its page texture.
    pub frame: URect,
    pub texture: Handle<Image>,
    /// Adjustment applied when this glyph follows the keyed code point.
    pub kerning: HashMap<u32, i32>,
}

/// A registered bitmap font: glyph metrics resolved against their page textures.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapFontDefinition {
    pub font: String,
    pub size: i32,
    pub line_height: u32,
    pub chars: HashMap<u32, GlyphDefinition>,
    pub pages: Vec<Handle<Image>>,
}

impl BitmapFontDefinition {
    /// `textures` are the page textures in page declaration order.
    pub fn new(document: &BitmapFontDocument, textures: &[Handle<Image>]) -> Self {
        let mut chars = HashMap::default();
        for descriptor in &document.chars {
            let page = descriptor.page as usize;
            let Some(texture) = textures.get(page) else {
                log::warn!(
                    "Glyph {} of {} is on page {page}, but the font has {} pages",
                    descriptor.id,
                    document.face(),
                    textures.len()
                );
                continue;
            };
            chars.insert(
                descriptor.id,
                GlyphDefinition {
                    x_offset: descriptor.x_offset,
                    y_offset: descriptor.y_offset,
                    x_advance: descriptor.x_advance,
                    page,
                    frame: URect::new(
                        descriptor.x,
                        descriptor.y,
                        descriptor.x.saturating_add(descriptor.width),
                        descriptor.y.saturating_add(descriptor.height),
                    ),
                    texture: texture.clone(),
                    kerning: HashMap::default(),
                },
            );
        }

        for pair in &document.kernings {
            if let Some(glyph) = chars.get_mut(&pair.second) {
                glyph.kerning.insert(pair.first, pair.amount);
            }
        }

        Self {
            font: document.face().to_owned(),
            size: document.info.size,
            line_height: document.line_height(),
            chars,
            pages: textures.to_vec(),
        }
    }

    pub fn glyph(&self, character: char) -> Option<&GlyphDefinition> {
        self.chars.get(&u32::from(character))
    }

    /// Horizontal adjustment for `character` when drawn right after `previous`.
    pub fn kerning(&self, previous: char, character: char) -> i32 {
        self.glyph(character)
            .and_then(|glyph| glyph.kerning.get(&u32::from(previous)))
            .copied()
            .unwrap_or_default()
    }
}

/// A bitmap font loaded through the asset server, pages held as dependencies.
#[derive(Asset, TypePath, Debug, Clone)]
pub struct BitmapFont {
    pub document: Arc<BitmapFontDocument>,
    #[dependency]
    pub pages: Vec<Handle<Image>>,
}
