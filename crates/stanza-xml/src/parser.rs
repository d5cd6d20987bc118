//! Markup parser that builds XmlElement trees.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::{Error, Result, XmlAttribute, XmlElement, XmlNode};

/// Parse markup from a string, producing the root element.
///
/// Comments are preserved as [`XmlNode::Comment`] children; processing
/// instructions, declarations and DOCTYPEs are skipped.
///
/// # Example
///
/// ```rust
/// use stanza_xml::parse;
///
/// let root = parse("<unit><item/></unit>").unwrap();
/// assert_eq!(root.name, "unit");
/// ```
///
/// # Errors
///
/// Returns an error if the markup is malformed, empty, or has more than one
/// root element.
pub fn parse(content: &str) -> Result<XmlElement> {
    let mut parser = XmlParser::new(content);
    parser.parse()
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Stack of elements being built.
    stack: Vec<XmlElement>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            stack: Vec::new(),
        }
    }

    fn parse(&mut self) -> Result<XmlElement> {
        let mut root: Option<XmlElement> = None;

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let element = self.open_element(&e)?;
                    self.stack.push(element);
                }
                Ok(Event::End(e)) => {
                    let found = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    let element = self.close_element(&found)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.open_element(&e)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| Error::Syntax {
                        message: format!("Invalid text content: {}", err),
                        position: Some(self.reader.error_position()),
                    })?;
                    if let Some(node) = self.stack.last_mut() {
                        node.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).to_string();
                    if let Some(node) = self.stack.last_mut() {
                        node.children.push(XmlNode::Text(text));
                    }
                }
                Ok(Event::Comment(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).to_string();
                    if let Some(node) = self.stack.last_mut() {
                        node.children.push(XmlNode::Comment(text));
                    }
                }
                Ok(Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {
                    // Not part of the block tree
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Syntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: node.name.clone(),
            });
        }

        root.ok_or(Error::EmptyDocument)
    }

    fn open_element(&mut self, e: &BytesStart<'_>) -> Result<XmlElement> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let mut attributes = Vec::new();

        for attr_result in e.attributes() {
            let attr = attr_result?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value().map_err(|err| Error::Syntax {
                message: format!("Invalid attribute value: {}", err),
                position: Some(self.reader.error_position()),
            })?;
            attributes.push(XmlAttribute {
                name: key,
                value: value.into_owned(),
            });
        }

        Ok(XmlElement {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn close_element(&mut self, found: &str) -> Result<XmlElement> {
        let element = self.stack.pop().ok_or_else(|| Error::UnexpectedEndTag {
            found: found.to_string(),
        })?;

        if element.name != found {
            return Err(Error::MismatchedEndTag {
                expected: element.name,
                found: found.to_string(),
            });
        }

        Ok(element)
    }

    /// Attach a completed element to its parent, or make it the root.
    fn attach(&mut self, element: XmlElement, root: &mut Option<XmlElement>) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(XmlNode::Element(element)),
            None => {
                if root.is_some() {
                    return Err(Error::MultipleRoots);
                }
                *root = Some(element);
            }
        }
        Ok(())
    }
}
