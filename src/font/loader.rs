use bevy::{
    asset::{io::Reader, AssetLoader, LoadContext},
    prelude::*,
};
use std::{future::Future, path::Path, pin::Pin, sync::Arc};

use super::document::{classify, BitmapFontDocument, Classification};
use super::font::BitmapFont;
use crate::{
    config::SnifferConfig,
    error::BitmapFontError,
    url::{resolve_base_directory, texture_url},
};

/// Loads BMFont XML files and their page textures through the asset server.
#[derive(Default)]
pub struct BitmapFontLoader {
    config: SnifferConfig,
}

impl BitmapFontLoader {
    pub fn new(config: SnifferConfig) -> Self {
        Self { config }
    }

    fn parse(bytes: Vec<u8>) -> Result<BitmapFontDocument, BitmapFontError> {
        let xml = String::from_utf8(bytes)?;
        match classify(&xml)? {
            Classification::BitmapFont(document) => Ok(document),
            Classification::NotBitmapFont(reason) => Err(BitmapFontError::NotBitmapFont(reason)),
        }
    }

    /// Asset paths of the pages of the font stored at `path`, in page order.
    fn page_paths(&self, path: &Path, document: &BitmapFontDocument) -> Vec<String> {
        let path = path.to_string_lossy().replace('\\', "/");
        let mut base_directory = resolve_base_directory(&path, false, &self.config);
        // fonts at the asset root resolve to "./", which the asset server treats as a
        // distinct path from the bare file name
        if base_directory == "./" {
            base_directory.clear();
        }
        document
            .pages
            .iter()
            .map(|page| texture_url(&base_directory, &page.file))
            .collect()
    }
}

impl AssetLoader for BitmapFontLoader {
    type Asset = BitmapFont;
    type Settings = ();
    type Error = BitmapFontError;
    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        _settings: &'a (),
        load_context: &'a mut LoadContext,
    ) -> Pin<Box<dyn Future<Output = Result<BitmapFont, Self::Error>> + Send + 'a>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            bevy::asset::AsyncReadExt::read_to_end(reader, &mut bytes).await?;
            let document = Self::parse(bytes)?;

            let page_paths = self.page_paths(load_context.path(), &document);
            debug!("Loading pages {page_paths:?} for {}", load_context.path().display());
            let pages = page_paths
                .into_iter()
                .map(|path| load_context.load::<Image>(path))
                .collect();

            Ok(BitmapFont {
                document: Arc::new(document),
                pages,
            })
        })
    }

    fn extensions(&self) -> &[&str] {
        &["fnt", "fnt.xml"]
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf, thread, time::Duration};

    use bevy::asset::AssetPlugin;

    use super::*;
    use crate::{font::NotBitmapFontReason, BitmapFontPlugin, BitmapFontRegistry};

    const DESYREL: &str = r#"<font>
        <info face="Desyrel" size="70"/>
        <pages><page id="0" file="desyrel_0.png"/><page id="1" file="desyrel_1.png"/></pages>
        <chars><char id="65" page="1"/></chars>
    </font>"#;

    const ROOT: &str = r#"<font><info face="Root"/><page id="0" file="root_0.png"/></font>"#;

    fn document(xml: &str) -> BitmapFontDocument {
        BitmapFontLoader::parse(xml.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn pages_resolve_next_to_the_font_asset() {
        let loader = BitmapFontLoader::default();
        assert_eq!(
            loader.page_paths(Path::new("fonts/desyrel.fnt"), &document(DESYREL)),
            ["fonts/desyrel_0.png", "fonts/desyrel_1.png"]
        );
        assert_eq!(
            loader.page_paths(Path::new("root.fnt.xml"), &document(ROOT)),
            ["root_0.png"]
        );
    }

    #[test]
    fn non_font_xml_is_rejected() {
        let error = BitmapFontLoader::parse(b"<notes><note/></notes>".to_vec()).unwrap_err();
        assert!(matches!(
            error,
            BitmapFontError::NotBitmapFont(NotBitmapFontReason::MissingPage)
        ));
        assert!(matches!(
            BitmapFontLoader::parse(vec![0xff, 0xfe]),
            Err(BitmapFontError::Utf8(_))
        ));
    }

    /// Stands in for the render crate's image loader, which needs a GPU device.
    #[derive(Default)]
    struct BlankImageLoader;

    impl AssetLoader for BlankImageLoader {
        type Asset = Image;
        type Settings = ();
        type Error = std::io::Error;
        fn load<'a>(
            &'a self,
            _reader: &'a mut Reader,
            _settings: &'a (),
            _load_context: &'a mut LoadContext,
        ) -> Pin<Box<dyn Future<Output = Result<Image, Self::Error>> + Send + 'a>> {
            Box::pin(async move { Ok(Image::default()) })
        }

        fn extensions(&self) -> &[&str] {
            &["png"]
        }
    }

    fn asset_dir() -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "bevy_bitmap_font_loader_{}",
            std::process::id()
        ));
        fs::create_dir_all(root.join("fonts")).unwrap();
        fs::write(root.join("fonts/desyrel.fnt"), DESYREL).unwrap();
        fs::write(root.join("fonts/desyrel_0.png"), b"png").unwrap();
        fs::write(root.join("fonts/desyrel_1.png"), b"png").unwrap();
        fs::write(root.join("root.fnt.xml"), ROOT).unwrap();
        fs::write(root.join("root_0.png"), b"png").unwrap();
        fs::write(root.join("notes.fnt"), "<notes/>").unwrap();
        root
    }

    #[test]
    fn fonts_register_once_their_pages_are_loaded() {
        let root = asset_dir();
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                file_path: root.to_string_lossy().into_owned(),
                ..Default::default()
            },
            BitmapFontPlugin::default(),
        ))
        .init_asset::<Image>()
        .register_asset_loader(BlankImageLoader);

        let server = app.world().resource::<AssetServer>().clone();
        let desyrel: Handle<BitmapFont> = server.load("fonts/desyrel.fnt");
        let root_font: Handle<BitmapFont> = server.load("root.fnt.xml");
        let notes: Handle<BitmapFont> = server.load("notes.fnt");

        for _ in 0..500 {
            app.update();
            let registry = app.world().resource::<BitmapFontRegistry>();
            if registry.contains("Desyrel") && registry.contains("Root") {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }

        let registry = app.world().resource::<BitmapFontRegistry>();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("Desyrel").unwrap().glyph('A').unwrap().page,
            1
        );

        let fonts = app.world().resource::<Assets<BitmapFont>>();
        let page_paths = |handle: &Handle<BitmapFont>| -> Vec<String> {
            fonts
                .get(handle)
                .unwrap()
                .pages
                .iter()
                .map(|page| page.path().unwrap().to_string())
                .collect()
        };
        assert_eq!(
            page_paths(&desyrel),
            ["fonts/desyrel_0.png", "fonts/desyrel_1.png"]
        );
        assert_eq!(page_paths(&root_font), ["root_0.png"]);
        assert!(fonts.get(&notes).is_none());

        let _ = fs::remove_dir_all(root);
    }
}
