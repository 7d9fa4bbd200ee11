//! RSS 2.0 feeds and sitemaps.org sitemaps

use crate::types::{scalar_to_string, Map};
use crate::xml::{
    add_children_to_element, XmlElement, XmlValue, OPEN_SITEMAPINDEX_TAG, OPEN_URLSET_TAG,
    XML_DECLARATION,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Channel key that turns into a self-referencing `<atom:link>`
pub const ATOM_LINK_KEY: &str = "atomLink";

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Build an RSS 2.0 document
///
/// Channel fields and item fields are written as child elements in their
/// insertion order. When the channel carries `atomLink`, the root declares the
/// Atom namespace and the channel starts with
/// `<atom:link href=".." rel="self" type="application/rss+xml"/>`.
///
/// # Arguments
///
/// * `channel_info` - Channel-level fields (`title`, `link`, `description`, ...)
/// * `items` - One map per `<item>`
///
/// # Example
///
/// ```rust
/// use helperbox::feed::create_rss;
/// use serde_json::json;
///
/// let channel = json!({"title": "News", "link": "https://example.com"});
/// let rss = create_rss(channel.as_object().unwrap(), &[]);
/// assert!(rss.ends_with("<channel><title>News</title><link>https://example.com</link></channel></rss>\n"));
/// ```
pub fn create_rss(channel_info: &Map, items: &[Map]) -> String {
    let mut rss = XmlElement::new("rss").attribute("version", "2.0");
    let mut channel = XmlElement::new("channel");

    let atom_link = channel_info
        .get(ATOM_LINK_KEY)
        .filter(|value| !value.is_null());
    if let Some(href) = atom_link {
        rss.add_attribute("xmlns:atom", ATOM_NAMESPACE);
        channel.add_child(
            XmlElement::new("atom:link")
                .attribute("href", &scalar_to_string(href))
                .attribute("rel", "self")
                .attribute("type", "application/rss+xml"),
        );
    }

    let fields: Vec<(String, XmlValue)> = channel_info
        .iter()
        .filter(|(key, _)| key.as_str() != ATOM_LINK_KEY)
        .map(|(key, value)| (key.clone(), XmlValue::from(value)))
        .collect();
    add_children_to_element(&mut channel, &fields);

    for item in items {
        let fields: Vec<(String, XmlValue)> = item
            .iter()
            .map(|(key, value)| (key.clone(), XmlValue::from(value)))
            .collect();
        let element = channel.add_child(XmlElement::new("item"));
        add_children_to_element(element, &fields);
    }

    debug!("Built RSS channel with {} items", items.len());
    rss.add_child(channel);
    rss.to_document(XML_DECLARATION)
}

/// One `<url>` entry of a sitemap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapUrl {
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl SitemapUrl {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_lastmod(mut self, lastmod: impl Into<String>) -> Self {
        self.lastmod = Some(lastmod.into());
        self
    }

    #[must_use]
    pub fn with_changefreq(mut self, changefreq: impl Into<String>) -> Self {
        self.changefreq = Some(changefreq.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    fn to_element(&self) -> XmlElement {
        let mut url = XmlElement::new("url");
        url.add_child(XmlElement::with_text("loc", &self.loc));
        add_optional(&mut url, "lastmod", self.lastmod.as_deref());
        add_optional(&mut url, "changefreq", self.changefreq.as_deref());
        add_optional(&mut url, "priority", self.priority.as_deref());
        url
    }
}

/// One `<sitemap>` entry of a sitemap index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
}

impl SitemapEntry {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
        }
    }

    #[must_use]
    pub fn with_lastmod(mut self, lastmod: impl Into<String>) -> Self {
        self.lastmod = Some(lastmod.into());
        self
    }

    fn to_element(&self) -> XmlElement {
        let mut sitemap = XmlElement::new("sitemap");
        sitemap.add_child(XmlElement::with_text("loc", &self.loc));
        add_optional(&mut sitemap, "lastmod", self.lastmod.as_deref());
        sitemap
    }
}

fn add_optional(element: &mut XmlElement, name: &str, value: Option<&str>) {
    if let Some(text) = value.filter(|text| !text.is_empty()) {
        element.add_child(XmlElement::with_text(name, text));
    }
}

/// Build a sitemap
///
/// With `wrap` unset only the concatenated `<url>` elements are returned, for
/// splicing into a larger document.
///
/// # Example
///
/// ```rust
/// use helperbox::feed::{create_sitemap, SitemapUrl};
///
/// let urls = [SitemapUrl::new("https://example.com").with_priority("1.0")];
/// assert_eq!(
///     create_sitemap(&urls, false),
///     "<url><loc>https://example.com</loc><priority>1.0</priority></url>"
/// );
/// ```
pub fn create_sitemap(items: &[SitemapUrl], wrap: bool) -> String {
    let body: String = items.iter().map(|item| item.to_element().render()).collect();
    if !wrap {
        return body;
    }
    format!("{XML_DECLARATION}\n{OPEN_URLSET_TAG}{body}</urlset>")
}

/// Build a sitemap index
///
/// `wrap` behaves as in [`create_sitemap`].
pub fn create_sitemap_index(items: &[SitemapEntry], wrap: bool) -> String {
    let body: String = items.iter().map(|item| item.to_element().render()).collect();
    if !wrap {
        return body;
    }
    format!("{XML_DECLARATION}\n{OPEN_SITEMAPINDEX_TAG}{body}</sitemapindex>")
}
