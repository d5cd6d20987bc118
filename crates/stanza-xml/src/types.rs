//! Core types for the parsed markup tree.

use std::borrow::Cow;
use std::fmt::Write as _;

/// An element in the parsed markup tree.
///
/// Names are kept verbatim, including any namespace prefix; block markup
/// does not use namespaces.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// The element name.
    pub name: String,

    /// Attributes of this element, in document order.
    pub attributes: Vec<XmlAttribute>,

    /// Child nodes of this element, in document order.
    ///
    /// Text and comments are kept as explicit nodes so that authored markup
    /// can be serialized back out.
    pub children: Vec<XmlNode>,
}

/// An attribute with its entity-unescaped value.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

/// A single child node.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// A child element.
    Element(XmlElement),

    /// Text content (after unescaping entities).
    Text(String),

    /// A comment. Never a child slot for the block tree builder; preserved
    /// for serialization.
    Comment(String),
}

impl XmlElement {
    /// Create a new element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Element children only, in document order.
    ///
    /// Text and comment nodes are excluded, so enumeration indices over this
    /// sequence are structural child positions.
    pub fn child_elements(&self) -> Vec<&XmlElement> {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Element(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    /// Text content appearing before the first child element.
    ///
    /// Returns `None` when there is no such text. Whitespace is preserved;
    /// callers trim.
    pub fn leading_text(&self) -> Option<String> {
        let mut text = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(t) => text.push_str(t),
                XmlNode::Element(_) => break,
                XmlNode::Comment(_) => {}
            }
        }
        if text.is_empty() { None } else { Some(text) }
    }

    /// Remove comment nodes from this element and all descendants.
    pub fn strip_comments(&mut self) {
        self.children.retain(|c| !matches!(c, XmlNode::Comment(_)));
        for child in &mut self.children {
            if let XmlNode::Element(e) = child {
                e.strip_comments();
            }
        }
    }

    /// Serialize this element back to markup text.
    ///
    /// Attribute values and text are entity-escaped; comments are written
    /// back out. The result is normalized markup (quoting, self-closing
    /// tags), not a byte-for-byte copy of the original input.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attr in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", attr.name, escape_text(&attr.value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.write_xml(out),
                XmlNode::Text(t) => out.push_str(&escape_text(t)),
                XmlNode::Comment(c) => {
                    let _ = write!(out, "<!--{}-->", c);
                }
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

/// Escape `&`, `<`, `>` and quotes for embedding text in markup.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_comment() -> XmlElement {
        XmlElement {
            name: "unit".to_string(),
            attributes: vec![XmlAttribute {
                name: "kind".to_string(),
                value: "a".to_string(),
            }],
            children: vec![
                XmlNode::Text("hello".to_string()),
                XmlNode::Comment("note".to_string()),
                XmlNode::Element(XmlElement::new("item")),
            ],
        }
    }

    #[test]
    fn test_attribute_lookup() {
        let el = item_with_comment();
        assert_eq!(el.attribute("kind"), Some("a"));
        assert_eq!(el.attribute("missing"), None);
    }

    #[test]
    fn test_child_elements_excludes_text_and_comments() {
        let el = item_with_comment();
        let children = el.child_elements();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "item");
    }

    #[test]
    fn test_leading_text_stops_at_first_element() {
        let el = item_with_comment();
        assert_eq!(el.leading_text().as_deref(), Some("hello"));

        let mut after = XmlElement::new("unit");
        after.children = vec![
            XmlNode::Element(XmlElement::new("item")),
            XmlNode::Text("tail".to_string()),
        ];
        assert_eq!(after.leading_text(), None);
    }

    #[test]
    fn test_strip_comments_recursive() {
        let mut el = XmlElement::new("unit");
        let mut inner = XmlElement::new("item");
        inner.children = vec![XmlNode::Comment("inner".to_string())];
        el.children = vec![
            XmlNode::Comment("outer".to_string()),
            XmlNode::Element(inner),
        ];

        el.strip_comments();
        assert_eq!(el.children.len(), 1);
        let XmlNode::Element(inner) = &el.children[0] else {
            panic!("expected element child");
        };
        assert!(inner.children.is_empty());
    }

    #[test]
    fn test_to_xml_escapes_and_self_closes() {
        let el = item_with_comment();
        assert_eq!(
            el.to_xml(),
            r#"<unit kind="a">hello<!--note--><item/></unit>"#
        );

        let mut escaped = XmlElement::new("unit");
        escaped.children = vec![XmlNode::Text("a < b & c".to_string())];
        assert_eq!(escaped.to_xml(), "<unit>a &lt; b &amp; c</unit>");
    }
}
