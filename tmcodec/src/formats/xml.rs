//! A small owned XML element tree shared by the TMX, XLIFF and Qt TS codecs.
//!
//! Documents are parsed whole with [`quick_xml::NsReader`], so each element
//! knows the namespace its name resolved to. That is what lets the XLIFF
//! importer try a namespace-qualified lookup before falling back to bare
//! names.

use std::io::{BufRead, Read};

use quick_xml::{
    NsReader,
    events::{BytesStart, Event},
    name::ResolveResult,
};

use crate::{encoding, error::Error};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Resolved namespace URI, `None` for unqualified elements.
    pub namespace: Option<String>,
    /// Local name, without any prefix.
    pub name: String,
    /// Attributes keyed by their qualified name (`xml:lang`, `type`, ...).
    pub attributes: Vec<(String, String)>,
    /// Character data before the first child element.
    pub text: String,
    pub children: Vec<Element>,
}

/// How an element name is matched during a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Local name in exactly this namespace.
    Namespace(&'a str),
    /// Local name with no namespace.
    Bare,
    /// Local name in any namespace or none.
    AnyName,
}

impl Lookup<'_> {
    pub fn matches(&self, element: &Element, name: &str) -> bool {
        if element.name != name {
            return false;
        }
        match self {
            Lookup::Namespace(ns) => element.namespace.as_deref() == Some(*ns),
            Lookup::Bare => element.namespace.is_none(),
            Lookup::AnyName => true,
        }
    }
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct children with the given local name, ignoring namespaces.
    pub fn children_named<'e>(&'e self, name: &'e str) -> impl Iterator<Item = &'e Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First direct child with the given local name, ignoring namespaces.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All descendants in document order, not including `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }

    /// `self` followed by all of its descendants in document order.
    pub fn iter(&self) -> Vec<&Element> {
        let mut out = vec![self];
        collect_descendants(self, &mut out);
        out
    }

    /// Descendants named `name`, using the first strategy that finds any.
    ///
    /// Strategies are tried in order; an empty result moves on to the next
    /// one, and if every strategy comes up empty the result is empty.
    pub fn find_all<'e>(&'e self, name: &str, strategies: &[Lookup<'_>]) -> Vec<&'e Element> {
        let descendants = self.descendants();
        for strategy in strategies {
            let found: Vec<&Element> = descendants
                .iter()
                .copied()
                .filter(|e| strategy.matches(e, name))
                .collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// First direct child named `name`, using the first strategy that finds one.
    pub fn find_child<'e>(&'e self, name: &str, strategies: &[Lookup<'_>]) -> Option<&'e Element> {
        strategies
            .iter()
            .find_map(|strategy| self.children.iter().find(|c| strategy.matches(c, name)))
    }
}

fn collect_descendants<'e>(element: &'e Element, out: &mut Vec<&'e Element>) {
    for child in &element.children {
        out.push(child);
        collect_descendants(child, out);
    }
}

/// Parses a whole document from raw bytes and returns its root element.
///
/// The bytes are decoded first, by byte-order mark or by the encoding the
/// XML declaration names.
pub fn parse<R: BufRead>(mut reader: R) -> Result<Element, Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = encoding::decode_document(&bytes, encoding::xml_declared_encoding(&bytes))?;
    parse_str(&text)
}

/// Parses a document that is already text.
pub fn parse_str(s: &str) -> Result<Element, Error> {
    let mut xml_reader = NsReader::from_str(s);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match xml_reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(ref e))) => {
                let element = start_element(ns, e)?;
                if stack.is_empty() && root.is_some() {
                    return Err(Error::format_error(format!(
                        "unexpected second root element <{}>",
                        element.name
                    )));
                }
                stack.push(element);
            }
            Ok((ns, Event::Empty(ref e))) => {
                let element = start_element(ns, e)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok((_, Event::End(_))) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::format_error("closing tag without an open element"))?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok((_, Event::Text(e))) => {
                let text = e.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Ok((_, Event::CData(e))) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                push_text(&mut stack, &text)?;
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::format_error(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| Error::format_error("document has no root element"))
}

fn start_element(ns: ResolveResult, e: &BytesStart) -> Result<Element, Error> {
    let namespace = match ns {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(Error::format_error(format!(
                "undeclared namespace prefix `{}`",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::format_error(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        namespace,
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn close_element(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), Error> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(Error::format_error(format!(
                "unexpected second root element <{}>",
                element.name
            )));
        }
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), Error> {
    match stack.last_mut() {
        // Only text before the first child counts as the element's own text.
        Some(open) if open.children.is_empty() => open.text.push_str(text),
        Some(_) => {}
        None if text.trim().is_empty() => {}
        None => return Err(Error::format_error("text outside the root element")),
    }
    Ok(())
}
