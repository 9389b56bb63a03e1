use std::sync::Arc;

use bevy::log;
use futures::future::BoxFuture;

use crate::error::{BitmapFontError, PageLoadError};

mod cache;
mod resource;
mod sniffer;

pub use cache::{MemoryTextureCache, TextureCache};
pub use resource::{
    CrossOrigin, ImageMetadata, LoadOptions, LoadResource, LoadType, PageLoadRequest,
    ResourceData, ResourceMetadata, ResourceType,
};
pub use sniffer::{register_bitmap_font, BitmapFontSniffer};

/// The host loader, as far as pipeline stages are concerned.
pub trait ResourceLoader: Send + Sync {
    /// Queues a sub-load. The returned future completes once the load has finished and,
    /// on success, its texture is visible through the host's [`TextureCache`].
    fn enqueue(&self, request: PageLoadRequest) -> BoxFuture<'_, Result<(), PageLoadError>>;
}

/// One stage of the loader's processing chain.
///
/// The returned future resolving is the hand-off to the next stage, so it resolves
/// exactly once per invocation.
pub trait LoaderMiddleware: Send + Sync {
    fn handle<'a>(
        &'a self,
        resource: &'a mut LoadResource,
        loader: &'a dyn ResourceLoader,
    ) -> BoxFuture<'a, Result<(), BitmapFontError>>;
}

#[derive(Default)]
pub struct LoaderPipeline {
    stages: Vec<Box<dyn LoaderMiddleware>>,
}

impl LoaderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: impl LoaderMiddleware + 'static) -> Self {
        self.push(stage);
        self
    }

    pub fn push(&mut self, stage: impl LoaderMiddleware + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage in order on `resource`.
    ///
    /// The first failing stage ends the chain; its error is also stored on the resource.
    pub async fn process(
        &self,
        resource: &mut LoadResource,
        loader: &dyn ResourceLoader,
    ) -> Result<(), Arc<BitmapFontError>> {
        for stage in &self.stages {
            if let Err(error) = stage.handle(resource, loader).await {
                log::warn!("Processing {} ({}) failed: {error}", resource.name, resource.url);
                let error = Arc::new(error);
                resource.error = Some(error.clone());
                return Err(error);
            }
        }
        Ok(())
    }
}
