use std::sync::{Arc, Mutex, PoisonError};

use bevy::{asset::Handle, log, render::texture::Image};
use futures::future::{join_all, BoxFuture};

use super::{
    LoadResource, LoaderMiddleware, PageLoadRequest, ResourceData, ResourceLoader, ResourceType,
    TextureCache,
};
use crate::{
    config::SnifferConfig,
    error::BitmapFontError,
    font::{classify, BitmapFontDocument, Classification, FontRegistry},
    url::{resolve_base_directory, texture_url},
};

/// Registers `document` with its page textures and records the result on `resource`.
pub fn register_bitmap_font(
    resource: &mut LoadResource,
    document: &BitmapFontDocument,
    textures: &[Handle<Image>],
    registry: &mut dyn FontRegistry,
) {
    resource.bitmap_font = Some(registry.register_font(document, textures));
}

/// Pipeline stage that turns loaded BMFont XML into a registered bitmap font.
///
/// Page textures missing from the cache are requested from the loader and awaited
/// together; the font is registered only once every page is in the cache.
pub struct BitmapFontSniffer {
    config: SnifferConfig,
    cache: Arc<dyn TextureCache>,
    registry: Arc<Mutex<dyn FontRegistry + Send>>,
}

impl BitmapFontSniffer {
    pub fn new(
        config: SnifferConfig,
        cache: Arc<dyn TextureCache>,
        registry: Arc<Mutex<dyn FontRegistry + Send>>,
    ) -> Self {
        Self {
            config,
            cache,
            registry,
        }
    }

    /// The parsed font if `resource` holds bitmap-font XML, `None` if it should be skipped.
    pub fn detect(
        resource: &LoadResource,
    ) -> Result<Option<BitmapFontDocument>, BitmapFontError> {
        let Some(ResourceData::Xml(xml)) = &resource.data else {
            return Ok(None);
        };
        if resource.kind != ResourceType::Xml {
            return Ok(None);
        }
        match classify(xml)? {
            Classification::BitmapFont(document) => Ok(Some(document)),
            Classification::NotBitmapFont(reason) => {
                log::debug!("Skipping {}: {reason}", resource.name);
                Ok(None)
            }
        }
    }

    async fn sniff(
        &self,
        resource: &mut LoadResource,
        loader: &dyn ResourceLoader,
    ) -> Result<(), BitmapFontError> {
        let Some(document) = Self::detect(resource)? else {
            return Ok(());
        };

        let base_directory =
            resolve_base_directory(&resource.url, resource.is_data_url, &self.config);
        let urls: Vec<String> = document
            .pages
            .iter()
            .map(|page| texture_url(&base_directory, &page.file))
            .collect();

        let mut loads = Vec::new();
        for (index, url) in urls.iter().enumerate() {
            if self.cache.lookup(url).is_some() {
                log::debug!("Page {index} of {} already cached: {url}", resource.name);
                continue;
            }
            let request = PageLoadRequest {
                name: format!("{}_image{index}", resource.name),
                url: url.clone(),
                options: resource.child_image_options(),
            };
            log::debug!("Loading page {index} of {}: {url}", resource.name);
            loads.push(async move {
                let name = request.name.clone();
                let url = request.url.clone();
                (name, url, loader.enqueue(request).await)
            });
        }

        if !loads.is_empty() {
            for (name, url, result) in join_all(loads).await {
                result.map_err(|error| BitmapFontError::PageLoadFailed {
                    name,
                    url,
                    reason: error.to_string(),
                })?;
            }
        }

        let textures = urls
            .iter()
            .map(|url| {
                self.cache
                    .lookup(url)
                    .ok_or_else(|| BitmapFontError::PageNotCached { url: url.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;

        {
            let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            register_bitmap_font(resource, &document, &textures, &mut *registry);
        }
        Ok(())
    }
}

impl LoaderMiddleware for BitmapFontSniffer {
    fn handle<'a>(
        &'a self,
        resource: &'a mut LoadResource,
        loader: &'a dyn ResourceLoader,
    ) -> BoxFuture<'a, Result<(), BitmapFontError>> {
        Box::pin(self.sniff(resource, loader))
    }
}
