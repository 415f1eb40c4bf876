use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::TreeError;

/// Owned XML element. Text content is validated but not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn local_name(&self) -> &str {
        local_name(&self.tag)
    }

    /// Attribute value by exact name, `""` when absent.
    pub fn attr(&self, name: &str) -> &str {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// First direct child whose local name is `local`, ignoring any namespace qualifier.
    pub fn find_child(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == local)
    }

    /// All direct children whose local name is `local`, in document order.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.local_name() == local)
    }

    fn from_start(start: &BytesStart) -> Result<Self, TreeError> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            tag,
            attributes,
            children: Vec::new(),
        })
    }
}

/// Strip a `{namespace}` or `prefix:` qualifier from a tag name.
pub fn local_name(tag: &str) -> &str {
    let tag = match tag.rsplit_once('}') {
        Some((_, rest)) => rest,
        None => tag,
    };
    match tag.rsplit_once(':') {
        Some((_, rest)) => rest,
        None => tag,
    }
}

/// Parse a whole document into its root element. Anything that is not
/// well-formed is rejected.
pub fn parse(xml: &str) -> Result<Element, TreeError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|source| TreeError::Xml { position, source })?;

        match event {
            Event::Start(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(TreeError::TrailingContent { position });
                }
                stack.push(Element::from_start(&e)?);
            }
            Event::Empty(e) => {
                let element = Element::from_start(&e)?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(TreeError::UnexpectedEnd { position })?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::Text(t) => {
                if stack.is_empty() {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        return Err(TreeError::TrailingContent { position });
                    }
                } else {
                    // Undefined entities are errors even in text we discard.
                    t.unescape()?;
                }
            }
            Event::CData(_) if stack.is_empty() => {
                return Err(TreeError::TrailingContent { position });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(TreeError::Unclosed(open.tag.clone()));
    }
    root.ok_or(TreeError::NoRoot)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: u64,
) -> Result<(), TreeError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(TreeError::TrailingContent { position }),
    }
    Ok(())
}
