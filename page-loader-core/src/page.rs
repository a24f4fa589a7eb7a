// Editable HTML document with asset discovery

use crate::error::{MirrorError, Result};
use kuchikiki::traits::TendrilSink;
use kuchikiki::{ElementData, NodeDataRef, NodeRef};

const ASSET_SELECTOR: &str = "img, script, link";

/// Element kinds whose references can be localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Script,
    Link,
}

impl AssetKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "img" => Some(AssetKind::Image),
            "script" => Some(AssetKind::Script),
            "link" => Some(AssetKind::Link),
            _ => None,
        }
    }

    /// Attribute holding the resource URL for this kind of element.
    pub fn attribute(self) -> &'static str {
        match self {
            AssetKind::Image | AssetKind::Script => "src",
            AssetKind::Link => "href",
        }
    }
}

/// A resource URL found on one element of an [`HtmlPage`].
///
/// The reference keeps a handle to its element, so [`AssetReference::rewrite`]
/// changes that element and no other.
pub struct AssetReference {
    element: NodeDataRef<ElementData>,
    kind: AssetKind,
    url: String,
}

impl AssetReference {
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn attribute(&self) -> &'static str {
        self.kind.attribute()
    }

    /// The attribute value as written in the document, possibly relative.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn rewrite(&self, value: &str) {
        self.element
            .attributes
            .borrow_mut()
            .insert(self.kind.attribute(), value.to_string());
    }
}

pub struct HtmlPage {
    document: NodeRef,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: kuchikiki::parse_html().one(html),
        }
    }

    /// All `img`/`script` elements with a `src` and `link` elements with an
    /// `href`, in document order. Empty attribute values are skipped.
    pub fn asset_references(&self) -> Result<Vec<AssetReference>> {
        let elements = self.document.select(ASSET_SELECTOR).map_err(|()| {
            MirrorError::ParseError(format!("invalid selector '{}'", ASSET_SELECTOR))
        })?;

        let references = elements
            .filter_map(|element| {
                let kind = AssetKind::from_tag(&element.name.local)?;
                let url = element
                    .attributes
                    .borrow()
                    .get(kind.attribute())?
                    .to_string();
                if url.is_empty() {
                    return None;
                }
                Some(AssetReference { element, kind, url })
            })
            .collect();

        Ok(references)
    }

    /// Point every `<meta>` charset declaration at UTF-8, the encoding
    /// [`HtmlPage::serialize`] writes.
    pub fn declare_utf8(&self) -> Result<()> {
        let metas = self
            .document
            .select("meta")
            .map_err(|()| MirrorError::ParseError("invalid selector 'meta'".to_string()))?;

        for meta in metas {
            let mut attributes = meta.attributes.borrow_mut();
            if attributes.contains("charset") {
                attributes.insert("charset", "utf-8".to_string());
            }
            let is_content_type = attributes
                .get("http-equiv")
                .is_some_and(|value| value.eq_ignore_ascii_case("content-type"));
            if is_content_type && attributes.contains("content") {
                attributes.insert("content", "text/html; charset=utf-8".to_string());
            }
        }

        Ok(())
    }

    pub fn serialize(&self) -> std::io::Result<Vec<u8>> {
        let mut html = Vec::new();
        self.document.serialize(&mut html)?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <link rel="stylesheet" href="/assets/application.css">
    <link rel="preconnect">
    <script src="/packs/js/runtime.js"></script>
    <script>console.log("inline")</script>
  </head>
  <body>
    <img src="/assets/professions/python.png" alt="python">
    <img src="" alt="empty">
    <a href="/courses">Courses</a>
  </body>
</html>"#;

    fn serialized(page: &HtmlPage) -> String {
        String::from_utf8(page.serialize().unwrap()).unwrap()
    }

    #[test]
    fn test_references_in_document_order() {
        let page = HtmlPage::parse(PAGE);
        let refs = page.asset_references().unwrap();

        let found: Vec<(AssetKind, &str)> = refs.iter().map(|r| (r.kind(), r.url())).collect();
        assert_eq!(
            found,
            vec![
                (AssetKind::Link, "/assets/application.css"),
                (AssetKind::Script, "/packs/js/runtime.js"),
                (AssetKind::Image, "/assets/professions/python.png"),
            ]
        );
        let attributes: Vec<&str> = refs.iter().map(|r| r.attribute()).collect();
        assert_eq!(attributes, vec!["href", "src", "src"]);
    }

    #[test]
    fn test_attribute_per_kind() {
        assert_eq!(AssetKind::Image.attribute(), "src");
        assert_eq!(AssetKind::Script.attribute(), "src");
        assert_eq!(AssetKind::Link.attribute(), "href");
        assert_eq!(AssetKind::from_tag("a"), None);
    }

    #[test]
    fn test_rewrite_only_touches_its_element() {
        let html = r#"<html><body><img src="/a.png"><img src="/a.png"></body></html>"#;
        let page = HtmlPage::parse(html);
        let refs = page.asset_references().unwrap();
        assert_eq!(refs.len(), 2);

        refs[1].rewrite("site_files/a.png");

        let out = serialized(&page);
        assert!(out.contains(r#"<img src="/a.png">"#));
        assert!(out.contains(r#"<img src="site_files/a.png">"#));
    }

    #[test]
    fn test_non_asset_elements_are_preserved() {
        let page = HtmlPage::parse(PAGE);
        for reference in page.asset_references().unwrap() {
            reference.rewrite("local");
        }

        let out = serialized(&page);
        assert!(out.contains(r#"<a href="/courses">Courses</a>"#));
        assert!(out.contains(r#"console.log("inline")"#));
        assert!(out.contains(r#"<link rel="preconnect">"#));
        assert!(!out.contains("/assets/application.css"));
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let first = serialized(&HtmlPage::parse(PAGE));
        let second = serialized(&HtmlPage::parse(PAGE));
        assert_eq!(first, second);
        assert!(first.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_declare_utf8_rewrites_charset_meta() {
        let html = r#"<html><head><meta charset="windows-1251">
<meta http-equiv="Content-Type" content="text/html; charset=windows-1251">
<meta name="viewport" content="width=device-width"></head><body></body></html>"#;
        let page = HtmlPage::parse(html);

        page.declare_utf8().unwrap();

        let out = serialized(&page);
        assert!(out.contains(r#"<meta charset="utf-8">"#));
        assert!(out.contains(r#"content="text/html; charset=utf-8""#));
        assert!(out.contains(r#"content="width=device-width""#));
        assert!(!out.contains("windows-1251"));
    }
}
