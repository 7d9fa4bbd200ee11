//! Minimal XML tree builder
//!
//! [`XmlElement`] is an owned element tree rendered without indentation,
//! which is what feed readers and crawlers expect byte-for-byte. Dynamic
//! input is lowered into the closed [`XmlValue`] variant first so the
//! recursive appenders never inspect JSON types directly.

use crate::types::scalar_to_string;
use serde_json::Value;
use tracing::warn;

/// Declaration used by feed and sitemap documents
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Opening root tag of a sitemap
pub const OPEN_URLSET_TAG: &str = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#;

/// Opening root tag of a sitemap index
pub const OPEN_SITEMAPINDEX_TAG: &str =
    r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#;

/// Declaration emitted by [`array_to_xml`]
const BARE_XML_DECLARATION: &str = r#"<?xml version="1.0"?>"#;

/// Escape text content (`&`, `<`, `>`)
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Escape an attribute value (text escapes plus `"`)
pub fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

/// Escape all five HTML special characters
///
/// # Example
///
/// ```rust
/// use helperbox::xml::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom's</a>"#),
///            "&lt;a href=&quot;x&quot;&gt;Tom&#039;s&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 10);
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(ch),
        }
    }
    result
}

/// An element with attributes, optional text and child elements
///
/// Text is stored already escaped. An element without text and without
/// children renders self-closed; `Some("")` renders as an open/close pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a leaf element, escaping `text`
    pub fn with_text(name: impl Into<String>, text: &str) -> Self {
        Self::with_markup(name, escape_text(text))
    }

    /// Create a leaf element whose content is already escaped
    pub fn with_markup(name: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(markup.into()),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: &str) -> Self {
        self.add_attribute(name, value);
        self
    }

    /// Append an attribute; the value is escaped on insertion
    pub fn add_attribute(&mut self, name: impl Into<String>, value: &str) {
        self.attributes.push((name.into(), escape_attribute(value)));
    }

    /// Append a child and return a handle to it
    pub fn add_child(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Escaped text content, if any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Render this element and its subtree
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Render as a standalone document: declaration, newline, element, newline
    pub fn to_document(&self, declaration: &str) -> String {
        format!("{declaration}\n{}\n", self.render())
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }

        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Dynamic XML content: a text leaf or an ordered list of named children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    Scalar(String),
    Node(Vec<(String, XmlValue)>),
}

impl XmlValue {
    /// Named entries of a node; a scalar has none
    pub fn entries(&self) -> &[(String, XmlValue)] {
        match self {
            Self::Scalar(_) => &[],
            Self::Node(entries) => entries,
        }
    }
}

impl From<&Value> for XmlValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Node(
                map.iter()
                    .map(|(key, nested)| (key.clone(), Self::from(nested)))
                    .collect(),
            ),
            Value::Array(items) => Self::Node(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, nested)| (index.to_string(), Self::from(nested)))
                    .collect(),
            ),
            scalar => Self::Scalar(scalar_to_string(scalar)),
        }
    }
}

impl From<&str> for XmlValue {
    fn from(text: &str) -> Self {
        Self::Scalar(text.to_string())
    }
}

// Integer keys, including negative ones, are positional.
fn is_index(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Whether `name` matches the XML 1.0 `Name` production
///
/// # Example
///
/// ```rust
/// use helperbox::xml::is_valid_name;
///
/// assert!(is_valid_name("atom:link"));
/// assert!(is_valid_name("item-1"));
/// assert!(!is_valid_name("first name"));
/// assert!(!is_valid_name("1st"));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | '_' | 'A'..='Z' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Append `children` to `element` as leaf elements
///
/// A scalar becomes `<name>text</name>`. A nested node does not open a new
/// element: its named entries are appended to the same parent, and its
/// positional entries are appended under the enclosing name, so a list
/// becomes repeated sibling elements. Entries whose name is not a valid XML
/// name are skipped with a warning.
///
/// # Example
///
/// ```rust
/// use helperbox::xml::{add_children_to_element, XmlElement, XmlValue};
/// use serde_json::json;
///
/// let mut item = XmlElement::new("item");
/// let fields = XmlValue::from(&json!({"title": "A", "category": ["x", "y"]}));
/// add_children_to_element(&mut item, fields.entries());
/// assert_eq!(
///     item.render(),
///     "<item><title>A</title><category>x</category><category>y</category></item>"
/// );
/// ```
pub fn add_children_to_element(element: &mut XmlElement, children: &[(String, XmlValue)]) {
    for (name, value) in children {
        append_value(element, name, value);
    }
}

fn append_value(element: &mut XmlElement, name: &str, value: &XmlValue) {
    match value {
        XmlValue::Scalar(text) => {
            if is_valid_name(name) {
                element.add_child(XmlElement::with_text(name, text));
            } else {
                warn!("Skipping element with invalid name {:?}", name);
            }
        }
        XmlValue::Node(entries) => {
            for (key, nested) in entries {
                let child_name = if is_index(key) { name } else { key.as_str() };
                append_value(element, child_name, nested);
            }
        }
    }
}

/// Convert nested data into an XML document rooted at `<data value="">`
///
/// Every key becomes an element; integer keys are renamed `item<N>`. Leaf
/// values are HTML-escaped. Keys that are not valid XML names are skipped,
/// together with everything below them, and logged.
///
/// # Example
///
/// ```rust
/// use helperbox::xml::array_to_xml;
/// use serde_json::json;
///
/// assert_eq!(
///     array_to_xml(&json!([{"a": 1}, {"a": 2}])),
///     "<?xml version=\"1.0\"?>\n<data value=\"\"><item0><a>1</a></item0><item1><a>2</a></item1></data>\n"
/// );
/// ```
pub fn array_to_xml(data: &Value) -> String {
    let mut root = XmlElement::new("data").attribute("value", "");
    build_tree(&mut root, XmlValue::from(data).entries());
    root.to_document(BARE_XML_DECLARATION)
}

fn build_tree(element: &mut XmlElement, entries: &[(String, XmlValue)]) {
    for (key, value) in entries {
        let name = if is_index(key) {
            format!("item{key}")
        } else {
            key.clone()
        };
        if !is_valid_name(&name) {
            warn!("Skipping element with invalid name {:?}", name);
            continue;
        }
        match value {
            XmlValue::Scalar(text) => {
                element.add_child(XmlElement::with_markup(name, escape_html(text)));
            }
            XmlValue::Node(nested) => {
                let child = element.add_child(XmlElement::new(name));
                build_tree(child, nested);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_escaping() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_text(r#"say "hi""#), r#"say "hi""#);
        assert_eq!(escape_attribute(r#"a"b&c"#), "a&quot;b&amp;c");
        assert_eq!(escape_html("'"), "&#039;");
        assert_eq!(escape_html("Привет"), "Привет");
    }

    #[test]
    fn test_element_rendering() {
        let mut root = XmlElement::new("root").attribute("id", "1");
        root.add_child(XmlElement::new("empty"));
        root.add_child(XmlElement::with_text("blank", ""));
        let nested = root.add_child(XmlElement::new("nested"));
        nested.add_child(XmlElement::with_text("leaf", "x & y"));

        assert_eq!(
            root.render(),
            r#"<root id="1"><empty/><blank></blank><nested><leaf>x &amp; y</leaf></nested></root>"#
        );
        assert_eq!(root.children().len(), 3);
        assert_eq!(root.children()[2].children()[0].text(), Some("x &amp; y"));
        assert_eq!(root.name(), "root");
    }

    #[test]
    fn test_to_document() {
        let element = XmlElement::new("a");
        assert_eq!(
            element.to_document(XML_DECLARATION),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a/>\n"
        );
    }

    #[test]
    fn test_xml_value_from_json() {
        let value = XmlValue::from(&json!({"a": 1, "b": [true, null], "c": {"d": "e"}}));
        assert_eq!(
            value,
            XmlValue::Node(vec![
                ("a".to_string(), XmlValue::from("1")),
                (
                    "b".to_string(),
                    XmlValue::Node(vec![
                        ("0".to_string(), XmlValue::from("1")),
                        ("1".to_string(), XmlValue::from("")),
                    ])
                ),
                (
                    "c".to_string(),
                    XmlValue::Node(vec![("d".to_string(), XmlValue::from("e"))])
                ),
            ])
        );
        assert!(XmlValue::from("x").entries().is_empty());
    }

    #[test]
    fn test_add_children_flattens_nested_maps() {
        let mut channel = XmlElement::new("channel");
        let fields = XmlValue::from(&json!({
            "title": "T",
            "image": {"url": "https://x/logo.png", "title": "Logo"}
        }));
        add_children_to_element(&mut channel, fields.entries());
        assert_eq!(
            channel.render(),
            "<channel><title>T</title><url>https://x/logo.png</url><title>Logo</title></channel>"
        );
    }

    #[test]
    fn test_array_to_xml() {
        let data = json!([
            {"a": 1, "b": 1, "c": 1},
            {"a": 2, "b": 2, "c": 2},
            {"a": 3, "b": 3, "c": 3}
        ]);
        assert_eq!(
            array_to_xml(&data),
            "<?xml version=\"1.0\"?>\n<data value=\"\"><item0><a>1</a><b>1</b><c>1</c></item0><item1><a>2</a><b>2</b><c>2</c></item1><item2><a>3</a><b>3</b><c>3</c></item2></data>\n"
        );
    }

    #[test]
    fn test_array_to_xml_escapes_and_renames() {
        let data = json!({"title": "<b>Tom's</b>", "tags": ["a&b"], "empty": {}});
        assert_eq!(
            array_to_xml(&data),
            "<?xml version=\"1.0\"?>\n<data value=\"\"><title>&lt;b&gt;Tom&#039;s&lt;/b&gt;</title><tags><item0>a&amp;b</item0></tags><empty/></data>\n"
        );
        assert_eq!(array_to_xml(&json!({})), "<?xml version=\"1.0\"?>\n<data value=\"\"/>\n");
    }

    #[test]
    fn test_is_valid_name() {
        for name in ["a", "_x", "atom:link", "item-1", "item0", "Имя", "a.b", "x\u{B7}y"] {
            assert!(is_valid_name(name), "{name} should be valid");
        }
        for name in ["", "1st", "-a", ".a", "first name", "a><evil", "a/b", "a\"b", "&amp;"] {
            assert!(!is_valid_name(name), "{name} should be invalid");
        }
    }

    #[test]
    fn test_array_to_xml_skips_invalid_names() {
        let data = json!({"first name": "John", "a><evil": "x", "ok": {"bad key": 1, "good": 2}});
        assert_eq!(
            array_to_xml(&data),
            "<?xml version=\"1.0\"?>\n<data value=\"\"><ok><good>2</good></ok></data>\n"
        );
    }

    #[test]
    fn test_array_to_xml_signed_index_keys() {
        let data = json!({"-1": "minus", "2": {"-3": "deep"}});
        assert_eq!(
            array_to_xml(&data),
            "<?xml version=\"1.0\"?>\n<data value=\"\"><item-1>minus</item-1><item2><item-3>deep</item-3></item2></data>\n"
        );
    }

    #[test]
    fn test_add_children_skips_invalid_names() {
        let mut item = XmlElement::new("item");
        let fields = XmlValue::from(&json!({"title": "A", "bad name": "x", "<script>": "y", "-1": "z"}));
        add_children_to_element(&mut item, fields.entries());
        assert_eq!(item.render(), "<item><title>A</title></item>");
    }
}
