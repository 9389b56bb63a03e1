use std::fmt;

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::error::BitmapFontError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotBitmapFontReason {
    MalformedXml,
    MissingPage,
    MissingInfo,
    MissingFace,
}

impl fmt::Display for NotBitmapFontReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotBitmapFontReason::MalformedXml => "document is not well-formed XML",
            NotBitmapFontReason::MissingPage => "no <page> element",
            NotBitmapFontReason::MissingInfo => "no <info> element",
            NotBitmapFontReason::MissingFace => "first <info> element has no `face`",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    BitmapFont(BitmapFontDocument),
    NotBitmapFont(NotBitmapFontReason),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontInfo {
    pub face: String,
    /// Negative sizes mean the size matches the cell height rather than the em size.
    pub size: i32,
    pub bold: bool,
    pub italic: bool,
    pub smooth: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontCommon {
    pub line_height: u32,
    pub base: u32,
    pub scale_w: u32,
    pub scale_h: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub id: u32,
    pub file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharDescriptor {
    pub id: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: i32,
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KerningPair {
    pub first: u32,
    pub second: u32,
    pub amount: i32,
}

/// Typed view of a BMFont XML description.
///
/// Pages keep their declaration order; `CharDescriptor::page` indexes into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapFontDocument {
    pub info: FontInfo,
    pub common: Option<FontCommon>,
    pub pages: Vec<PageRef>,
    pub chars: Vec<CharDescriptor>,
    pub kernings: Vec<KerningPair>,
}

impl BitmapFontDocument {
    pub fn face(&self) -> &str {
        &self.info.face
    }

    pub fn line_height(&self) -> u32 {
        self.common.as_ref().map_or(0, |common| common.line_height)
    }
}

/// Decides whether `xml` describes a bitmap font and parses it if so.
///
/// Acceptance is structural and loose: any well-formed document with at least one
/// `<page>` and whose first `<info>` carries `face` is a font, whatever else it contains.
/// Only once accepted are defects such as a page without `file` reported as errors.
pub fn classify(xml: &str) -> Result<Classification, BitmapFontError> {
    let elements = match scan(xml) {
        Ok(elements) if elements.saw_root && elements.depth == 0 => elements,
        _ => {
            return Ok(Classification::NotBitmapFont(
                NotBitmapFontReason::MalformedXml,
            ))
        }
    };

    if elements.pages.is_empty() {
        return Ok(Classification::NotBitmapFont(NotBitmapFontReason::MissingPage));
    }
    let Some(info) = elements.info else {
        return Ok(Classification::NotBitmapFont(NotBitmapFontReason::MissingInfo));
    };
    let Some(face) = info.get("face") else {
        return Ok(Classification::NotBitmapFont(NotBitmapFontReason::MissingFace));
    };

    let info = FontInfo {
        face: face.to_owned(),
        size: info.number("size")?,
        bold: info.flag("bold")?,
        italic: info.flag("italic")?,
        smooth: info.flag("smooth")?,
    };

    let common = elements
        .common
        .map(|common| -> Result<FontCommon, BitmapFontError> {
            Ok(FontCommon {
                line_height: common.number("lineHeight")?,
                base: common.number("base")?,
                scale_w: common.number("scaleW")?,
                scale_h: common.number("scaleH")?,
            })
        })
        .transpose()?;

    let pages = elements
        .pages
        .iter()
        .enumerate()
        .map(|(index, page)| -> Result<PageRef, BitmapFontError> {
            let file = page
                .get("file")
                .ok_or(BitmapFontError::MissingPageFile { index })?;
            Ok(PageRef {
                id: page.number("id")?,
                file: file.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, BitmapFontError>>()?;

    let chars = elements
        .chars
        .iter()
        .map(|glyph| -> Result<CharDescriptor, BitmapFontError> {
            Ok(CharDescriptor {
                id: glyph.number("id")?,
                x: glyph.number("x")?,
                y: glyph.number("y")?,
                width: glyph.number("width")?,
                height: glyph.number("height")?,
                x_offset: glyph.number("xoffset")?,
                y_offset: glyph.number("yoffset")?,
                x_advance: glyph.number("xadvance")?,
                page: glyph.number("page")?,
            })
        })
        .collect::<Result<Vec<_>, BitmapFontError>>()?;

    let kernings = elements
        .kernings
        .iter()
        .map(|kerning| -> Result<KerningPair, BitmapFontError> {
            Ok(KerningPair {
                first: kerning.number("first")?,
                second: kerning.number("second")?,
                amount: kerning.number("amount")?,
            })
        })
        .collect::<Result<Vec<_>, BitmapFontError>>()?;

    Ok(Classification::BitmapFont(BitmapFontDocument {
        info,
        common,
        pages,
        chars,
        kernings,
    }))
}

struct Attributes {
    element: &'static str,
    pairs: Vec<(String, String)>,
}

impl Attributes {
    fn read(element: &'static str, start: &BytesStart<'_>) -> Result<Self, quick_xml::Error> {
        let pairs = start
            .attributes()
            .map(|attr| -> Result<(String, String), quick_xml::Error> {
                let attr = attr?;
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr.unescape_value()?.into_owned();
                Ok((key, value))
            })
            .collect::<Result<Vec<_>, quick_xml::Error>>()?;
        Ok(Self { element, pairs })
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Reads the leading integer of the value, so `"32.5"` is 32. Missing attributes
    /// read as zero.
    fn number<T: TryFrom<i64> + Default>(&self, name: &'static str) -> Result<T, BitmapFontError> {
        let Some(value) = self.get(name) else {
            return Ok(T::default());
        };
        leading_integer(value)
            .and_then(|number| T::try_from(number).ok())
            .ok_or_else(|| BitmapFontError::InvalidAttribute {
                element: self.element,
                attribute: name,
                value: value.to_owned(),
            })
    }

    fn flag(&self, name: &'static str) -> Result<bool, BitmapFontError> {
        Ok(self.number::<i64>(name)? != 0)
    }
}

fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let number = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -number } else { number })
}

#[derive(Default)]
struct Elements {
    saw_root: bool,
    /// Elements opened but not yet closed when scanning stopped.
    depth: usize,
    info: Option<Attributes>,
    common: Option<Attributes>,
    pages: Vec<Attributes>,
    chars: Vec<Attributes>,
    kernings: Vec<Attributes>,
}

impl Elements {
    fn record(&mut self, start: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
        self.saw_root = true;
        match start.name().as_ref() {
            b"info" if self.info.is_none() => self.info = Some(Attributes::read("info", start)?),
            b"common" if self.common.is_none() => {
                self.common = Some(Attributes::read("common", start)?);
            }
            b"page" => self.pages.push(Attributes::read("page", start)?),
            b"char" => self.chars.push(Attributes::read("char", start)?),
            b"kerning" => self.kernings.push(Attributes::read("kerning", start)?),
            _ => {}
        }
        Ok(())
    }
}

/// Collects the elements of interest anywhere in the tree, in document order.
fn scan(xml: &str) -> Result<Elements, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut elements = Elements::default();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                elements.depth += 1;
                elements.record(&start)?;
            }
            Event::Empty(start) => elements.record(&start)?,
            Event::End(_) => elements.depth = elements.depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(elements)
}
