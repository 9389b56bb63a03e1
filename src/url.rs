use crate::config::{BaseUrlStrip, SnifferConfig};

/// POSIX `dirname`: the URL up to, not including, its last path segment.
pub fn dirname(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    if trimmed.is_empty() {
        return if url.is_empty() { "." } else { "/" };
    }
    match trimmed.rfind('/') {
        None => ".",
        Some(index) => {
            let dir = trimmed[..index].trim_end_matches('/');
            if dir.is_empty() {
                "/"
            } else {
                dir
            }
        }
    }
}

/// Directory that page files of the font at `url` are relative to.
///
/// The result is either empty or ends with `/`, so page files can be appended directly.
pub fn resolve_base_directory(url: &str, is_data_url: bool, config: &SnifferConfig) -> String {
    let mut directory = if is_data_url {
        String::new()
    } else {
        dirname(url).to_owned()
    };

    if is_data_url {
        if directory == "." {
            directory.clear();
        }
        if let Some(base_url) = config.base_url() {
            if !directory.is_empty() && base_url.ends_with('/') {
                directory.push('/');
            }
        }
    }

    if let Some(base_url) = config.base_url() {
        directory = strip_base_url(&directory, base_url, config.base_url_strip);
    }

    if !directory.is_empty() && !directory.ends_with('/') {
        directory.push('/');
    }
    directory
}

fn strip_base_url(directory: &str, base_url: &str, mode: BaseUrlStrip) -> String {
    match mode {
        BaseUrlStrip::Prefix => directory
            .strip_prefix(base_url)
            .unwrap_or(directory)
            .to_owned(),
        BaseUrlStrip::FirstOccurrence => directory.replacen(base_url, "", 1),
    }
}

pub fn texture_url(base_directory: &str, file: &str) -> String {
    format!("{base_directory}{file}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirname_follows_posix() {
        assert_eq!(dirname("/assets/fonts/font.xml"), "/assets/fonts");
        assert_eq!(dirname("fonts/font.xml"), "fonts");
        assert_eq!(dirname("font.xml"), ".");
        assert_eq!(dirname("/font.xml"), "/");
        assert_eq!(dirname("/assets/fonts/"), "/assets");
        assert_eq!(dirname("http://cdn.test/a//font.xml"), "http://cdn.test/a");
        assert_eq!(dirname(""), ".");
        assert_eq!(dirname("/"), "/");
    }

    #[test]
    fn resolves_next_to_the_font_without_base_url() {
        let config = SnifferConfig::default();
        let base = resolve_base_directory("/assets/fonts/font.xml", false, &config);
        assert_eq!(base, "/assets/fonts/");
        assert_eq!(texture_url(&base, "font_0.png"), "/assets/fonts/font_0.png");
    }

    #[test]
    fn strips_configured_base_url() {
        let config = SnifferConfig::default().with_base_url("/assets/");
        let base = resolve_base_directory("/assets/fonts/font.xml", false, &config);
        assert_eq!(base, "fonts/");
        assert_eq!(texture_url(&base, "font_0.png"), "fonts/font_0.png");
    }

    #[test]
    fn root_and_relative_fonts() {
        let config = SnifferConfig::default();
        assert_eq!(resolve_base_directory("/font.xml", false, &config), "/");
        // Only data URLs drop the "." directory.
        assert_eq!(resolve_base_directory("font.xml", false, &config), "./");
    }

    #[test]
    fn data_urls_resolve_to_empty_directory() {
        let config = SnifferConfig::default().with_base_url("/assets/");
        let url = "data:text/xml;base64,PGZvbnQvPg==";
        assert_eq!(resolve_base_directory(url, true, &config), "");
        assert_eq!(
            resolve_base_directory(url, true, &SnifferConfig::default()),
            ""
        );
    }

    #[test]
    fn base_url_elsewhere_in_path_depends_on_strip_mode() {
        let url = "http://cdn.test/assets/fonts/font.xml";
        let anywhere = SnifferConfig::default().with_base_url("/assets/");
        assert_eq!(anywhere.base_url_strip, BaseUrlStrip::FirstOccurrence);
        assert_eq!(
            resolve_base_directory(url, false, &anywhere),
            "http://cdn.testfonts/"
        );

        let prefix = anywhere.with_base_url_strip(BaseUrlStrip::Prefix);
        assert_eq!(
            resolve_base_directory(url, false, &prefix),
            "http://cdn.test/assets/fonts/"
        );
    }

    #[test]
    fn empty_base_url_is_ignored() {
        let config = SnifferConfig::default().with_base_url("");
        assert_eq!(
            resolve_base_directory("a/b/font.xml", false, &config),
            "a/b/"
        );
    }

    #[test]
    fn base_url_equal_to_directory_leaves_it_empty() {
        let config = SnifferConfig::default().with_base_url("/assets/fonts");
        assert_eq!(
            resolve_base_directory("/assets/fonts/font.xml", false, &config),
            ""
        );
    }
}
