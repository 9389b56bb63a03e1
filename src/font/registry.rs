use std::sync::Arc;

use bevy::{
    asset::{AssetEvent, AssetId, Assets, Handle},
    log,
    prelude::{EventReader, Local, Res, ResMut, Resource},
    render::texture::Image,
    utils::HashMap,
};

use super::{
    document::BitmapFontDocument,
    font::{BitmapFont, BitmapFontDefinition},
};

/// Where parsed fonts end up, looked up by face name.
pub trait FontRegistry {
    /// `textures` are the page textures in page declaration order.
    fn register_font(
        &mut self,
        document: &BitmapFontDocument,
        textures: &[Handle<Image>],
    ) -> Arc<BitmapFontDefinition>;
}

#[derive(Debug, Default, Resource)]
pub struct BitmapFontRegistry {
    fonts: HashMap<String, Arc<BitmapFontDefinition>>,
}

impl BitmapFontRegistry {
    pub fn get(&self, name: &str) -> Option<&Arc<BitmapFontDefinition>> {
        self.fonts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<BitmapFontDefinition>> {
        self.fonts.remove(name)
    }

    /// Removes `definition` unless its face has since been registered again.
    pub fn unregister(&mut self, definition: &Arc<BitmapFontDefinition>) -> bool {
        let current = self
            .fonts
            .get(&definition.font)
            .is_some_and(|current| Arc::ptr_eq(current, definition));
        if current {
            self.fonts.remove(&definition.font);
        }
        current
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl FontRegistry for BitmapFontRegistry {
    fn register_font(
        &mut self,
        document: &BitmapFontDocument,
        textures: &[Handle<Image>],
    ) -> Arc<BitmapFontDefinition> {
        let definition = Arc::new(BitmapFontDefinition::new(document, textures));
        log::info!(
            "Registered bitmap font {} ({} pages, {} glyphs)",
            definition.font,
            definition.pages.len(),
            definition.chars.len()
        );
        self.fonts.insert(definition.font.clone(), definition.clone());
        definition
    }
}

/// Registers fonts whose pages have all finished loading, and drops removed ones.
pub fn register_loaded_fonts(
    mut events: EventReader<AssetEvent<BitmapFont>>,
    fonts: Res<Assets<BitmapFont>>,
    mut registry: ResMut<BitmapFontRegistry>,
    mut registered: Local<HashMap<AssetId<BitmapFont>, Arc<BitmapFontDefinition>>>,
) {
    for event in events.read() {
        match event {
            AssetEvent::LoadedWithDependencies { id } => {
                let Some(font) = fonts.get(*id) else {
                    continue;
                };
                let definition = registry.register_font(&font.document, &font.pages);
                registered.insert(*id, definition);
            }
            AssetEvent::Removed { id } => {
                if let Some(definition) = registered.remove(id) {
                    registry.unregister(&definition);
                }
            }
            _ => {}
        }
    }
}
