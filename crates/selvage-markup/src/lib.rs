//! Detached element trees for style-driven fragment assembly.
//!
//! This crate provides the two construction paths every component factory in
//! the selvage system builds on: a chainable [`Element`] builder for
//! tag-by-tag assembly, and [`from_markup`] for parsing a literal markup
//! fragment into a single detached root element.
//!
//! Elements here are plain data. Nothing in this crate touches a live
//! document; an external renderer mounts the finished tree (typically via
//! [`Element::to_html`]).
//!
//! # Example
//!
//! ```rust
//! use selvage_markup::Element;
//!
//! let button = Element::new("button")
//!     .prop("textContent", "Ok")
//!     .class("x");
//!
//! assert_eq!(button.tag(), "button");
//! assert!(button.has_class("x"));
//! ```
//!
//! Parsing a fragment:
//!
//! ```rust
//! use selvage_markup::from_markup;
//!
//! let icon = from_markup(r#"<svg viewBox="0 0 100 100"><g/></svg>"#).unwrap();
//! assert_eq!(icon.tag(), "svg");
//! ```
//!
//! # Properties, not attributes
//!
//! The builder assigns *properties*: values keep their JSON type
//! (`serde_json::Value`) until serialization, mirroring direct property
//! assignment on a DOM node rather than string-only attribute semantics.
//! Coercion to text happens once, in [`Element::to_html`].

use std::fmt;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::Serialize;
use serde_json::Value;

/// Error type for markup-fragment parsing.
///
/// All of these indicate a defect in the calling factory (malformed literal
/// markup), so callers are expected to propagate them, not recover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The underlying parser rejected the fragment.
    Parse {
        /// Error message from the parser.
        message: String,
    },

    /// The fragment produced no root element at all.
    NoRootElement,

    /// The fragment produced more than one top-level element.
    MultipleRoots {
        /// Number of top-level elements found.
        count: usize,
    },

    /// Non-whitespace text found outside the root element.
    StrayText {
        /// The offending text.
        text: String,
    },
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupError::Parse { message } => write!(f, "failed to parse fragment: {}", message),
            MarkupError::NoRootElement => write!(f, "fragment has no root element"),
            MarkupError::MultipleRoots { count } => {
                write!(f, "fragment has {} top-level elements, expected 1", count)
            }
            MarkupError::StrayText { text } => {
                write!(f, "unexpected text outside root element: {:?}", text)
            }
        }
    }
}

impl std::error::Error for MarkupError {}

impl From<quick_xml::Error> for MarkupError {
    fn from(err: quick_xml::Error) -> Self {
        MarkupError::Parse {
            message: err.to_string(),
        }
    }
}

/// A child slot inside an [`Element`]: either a nested element or text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    /// A nested child element.
    Element(Element),
    /// A run of character data.
    Text(String),
}

/// A detached element: tag name, property bag, class list, children.
///
/// Properties are kept in insertion order and hold `serde_json::Value`s, so a
/// boolean stays a boolean until serialization. Children are attached only
/// after the parent exists, so a failed construction never leaves a partial
/// subtree behind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    tag: String,
    properties: Vec<(String, Value)>,
    classes: Vec<String>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            properties: Vec::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets a property by name. Returns self for chaining.
    ///
    /// Setting a property that already exists overwrites its value in place,
    /// as a repeated DOM property assignment would.
    pub fn prop(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if let Some(slot) = self.properties.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.properties.push((name.to_string(), value));
        }
        self
    }

    /// Adds a class name. Duplicates are ignored, like `classList.add`.
    pub fn class(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.classes.contains(&name) {
            self.classes.push(name);
        }
        self
    }

    /// Adds each class name in order.
    pub fn classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self = self.class(name);
        }
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Appends each child element in order.
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        for child in children {
            self.children.push(Node::Element(child));
        }
        self
    }

    /// Appends a text child.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Returns the tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the property value for `name`, if set.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns true if the class list contains `name`.
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    /// Returns the class list in attachment order.
    pub fn class_list(&self) -> &[String] {
        &self.classes
    }

    /// Returns the child nodes in attachment order.
    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Returns the child *elements* in attachment order, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Serializes the tree to markup text.
    ///
    /// Text and attribute values are escaped by the writer. Property names
    /// with DOM-specific spellings are mapped to their attribute forms
    /// (`className` → `class`, `htmlFor` → `for`); `textContent` is emitted
    /// as a leading text child, matching assignment order in the builder.
    pub fn to_html(&self) -> String {
        let mut writer = Writer::new(Vec::new());
        // Writing into a Vec cannot fail.
        let _ = self.write_into(&mut writer);
        String::from_utf8(writer.into_inner()).unwrap_or_default()
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error> {
        let mut start = BytesStart::new(self.tag.as_str());

        let mut text_content = None;
        for (name, value) in &self.properties {
            if name == "textContent" {
                text_content = Some(coerce_property(value));
                continue;
            }
            let attr_name = attribute_name(name);
            start.push_attribute((attr_name, coerce_property(value).as_str()));
        }
        if !self.classes.is_empty() {
            start.push_attribute(("class", self.classes.join(" ").as_str()));
        }

        if text_content.is_none() && self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = text_content {
            writer.write_event(Event::Text(BytesText::new(&text)))?;
        }
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_into(writer)?,
                Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.tag.as_str())))?;
        Ok(())
    }
}

/// Maps a DOM property name to its attribute spelling.
fn attribute_name(property: &str) -> &str {
    match property {
        "className" => "class",
        "htmlFor" => "for",
        "contentEditable" => "contenteditable",
        other => other,
    }
}

/// Coerces a property value to text, the way a DOM string setter would.
pub fn coerce_property(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Parses a literal markup fragment into its single root element.
///
/// The fragment must be well-formed (void elements in self-closing form) and
/// must produce exactly one top-level element; anything else is an error, not
/// a degraded result. Attributes become properties, except `class`, which is
/// split on whitespace into the class list. Whitespace-only text between tags
/// is dropped; any other character data is kept as a text child.
///
/// Non-whitespace text *outside* the root is rejected rather than silently
/// discarded. That is deliberately stricter than a DOM fragment parse, which
/// would keep only the first element child: a typo in a fragment literal
/// surfaces here as an error instead of vanishing output.
///
/// # Errors
///
/// Returns [`MarkupError`] on parse failure, zero roots, multiple sibling
/// roots, or non-whitespace text outside the root.
///
/// # Example
///
/// ```rust
/// use selvage_markup::{from_markup, MarkupError};
///
/// let el = from_markup("<div><span/></div>").unwrap();
/// assert_eq!(el.tag(), "div");
///
/// // Two siblings: not a fragment with a singular root.
/// let err = from_markup("<div/><div/>").unwrap_err();
/// assert!(matches!(err, MarkupError::MultipleRoots { count: 2 }));
/// ```
pub fn from_markup(fragment: &str) -> Result<Element, MarkupError> {
    let mut reader = Reader::from_str(fragment);
    let mut stack: Vec<Element> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from_tag(&start)?);
            }
            Event::Empty(start) => {
                let el = element_from_tag(&start)?;
                attach(&mut stack, &mut roots, Node::Element(el));
            }
            Event::End(_) => {
                // Name mismatches are rejected by the reader before we get here.
                let el = stack.pop().ok_or_else(|| MarkupError::Parse {
                    message: "end tag without matching start tag".to_string(),
                })?;
                attach(&mut stack, &mut roots, Node::Element(el));
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if !text.trim().is_empty() {
                    attach(&mut stack, &mut roots, Node::Text(text.into_owned()));
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                attach(&mut stack, &mut roots, Node::Text(text));
            }
            Event::Eof => break,
            // Comments, processing instructions, doctype: not part of the tree.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(MarkupError::Parse {
            message: format!("unclosed <{}>", open.tag()),
        });
    }

    single_root(roots)
}

fn element_from_tag(start: &BytesStart<'_>) -> Result<Element, MarkupError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut el = Element::new(tag);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| MarkupError::Parse {
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        if key == "class" {
            el = el.classes(value.split_whitespace().map(str::to_string));
        } else {
            el = el.prop(&key, value);
        }
    }
    Ok(el)
}

fn attach(stack: &mut Vec<Element>, roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn single_root(roots: Vec<Node>) -> Result<Element, MarkupError> {
    let mut root = None;
    let mut element_count = 0;
    for node in roots {
        match node {
            Node::Element(el) => {
                element_count += 1;
                if root.is_none() {
                    root = Some(el);
                }
            }
            Node::Text(text) => return Err(MarkupError::StrayText { text }),
        }
    }
    match (root, element_count) {
        (Some(el), 1) => Ok(el),
        (None, _) => Err(MarkupError::NoRootElement),
        (_, count) => Err(MarkupError::MultipleRoots { count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // --- Builder ---

    #[test]
    fn test_builder_tag_and_props() {
        let el = Element::new("button")
            .prop("textContent", "Ok")
            .prop("disabled", true);

        assert_eq!(el.tag(), "button");
        assert_eq!(el.property("textContent"), Some(&json!("Ok")));
        assert_eq!(el.property("disabled"), Some(&json!(true)));
    }

    #[test]
    fn test_builder_prop_overwrites_in_place() {
        let el = Element::new("a")
            .prop("href", "/old")
            .prop("textContent", "go")
            .prop("href", "/new");

        assert_eq!(el.property("href"), Some(&json!("/new")));
        // Order preserved: href still first.
        assert_eq!(el.properties[0].0, "href");
    }

    #[test]
    fn test_builder_classes_in_order_no_duplicates() {
        let el = Element::new("div")
            .class("vbox")
            .classes(["page", "vbox", "wide"]);

        assert_eq!(el.class_list(), ["vbox", "page", "wide"]);
    }

    #[test]
    fn test_builder_children_in_order() {
        let el = Element::new("div")
            .child(Element::new("span"))
            .text("between")
            .child(Element::new("em"));

        let tags: Vec<_> = el.child_elements().map(Element::tag).collect();
        assert_eq!(tags, ["span", "em"]);
        assert_eq!(el.child_nodes().len(), 3);
    }

    // --- Coercion ---

    #[test]
    fn test_coerce_property_scalars() {
        assert_eq!(coerce_property(&json!("plain")), "plain");
        assert_eq!(coerce_property(&json!(true)), "true");
        assert_eq!(coerce_property(&json!(3)), "3");
        assert_eq!(coerce_property(&Value::Null), "null");
    }

    // --- Serialization ---

    #[test]
    fn test_to_html_text_content_and_class() {
        let el = Element::new("button").prop("textContent", "Ok").class("x");
        assert_eq!(el.to_html(), r#"<button class="x">Ok</button>"#);
    }

    #[test]
    fn test_to_html_childless_is_self_closing() {
        let el = Element::new("link")
            .prop("rel", "stylesheet")
            .prop("href", "style_reset.css");
        assert_eq!(
            el.to_html(),
            r#"<link rel="stylesheet" href="style_reset.css"/>"#
        );
    }

    #[test]
    fn test_to_html_escapes_text_and_attributes() {
        let el = Element::new("span")
            .prop("title", "a<b & \"c\"")
            .text("1 < 2 & 3");
        let html = el.to_html();
        assert!(html.contains("1 &lt; 2 &amp; 3"));
        assert!(!html.contains("a<b"));
    }

    #[test]
    fn test_to_html_maps_dom_property_spellings() {
        let el = Element::new("label").prop("htmlFor", "name").prop(
            "className",
            "ignored-path", // className still serializes as class=
        );
        let html = el.to_html();
        assert!(html.contains(r#"for="name""#));
        assert!(html.contains(r#"class="ignored-path""#));
    }

    // --- Fragment parsing ---

    #[test]
    fn test_from_markup_single_root() {
        let el = from_markup("<div><span/></div>").unwrap();
        assert_eq!(el.tag(), "div");
        assert_eq!(el.child_elements().count(), 1);
    }

    #[test]
    fn test_from_markup_two_siblings_fails() {
        let err = from_markup("<div/><div/>").unwrap_err();
        assert_eq!(err, MarkupError::MultipleRoots { count: 2 });
    }

    #[test]
    fn test_from_markup_counts_all_sibling_roots() {
        let err = from_markup("<a/><b><c/></b><d/>").unwrap_err();
        assert_eq!(err, MarkupError::MultipleRoots { count: 3 });
    }

    #[test]
    fn test_from_markup_empty_fails() {
        assert_eq!(from_markup("  "), Err(MarkupError::NoRootElement));
    }

    #[test]
    fn test_from_markup_unclosed_fails() {
        let err = from_markup("<div><span></div>").unwrap_err();
        assert!(matches!(err, MarkupError::Parse { .. }));
    }

    #[test]
    fn test_from_markup_stray_text_fails() {
        let err = from_markup("<div/>oops").unwrap_err();
        assert!(matches!(err, MarkupError::StrayText { .. }));
    }

    #[test]
    fn test_from_markup_class_attribute_becomes_class_list() {
        let el = from_markup(r#"<div class="hbox paper"/>"#).unwrap();
        assert!(el.has_class("hbox"));
        assert!(el.has_class("paper"));
        assert_eq!(el.property("class"), None);
    }

    #[test]
    fn test_from_markup_keeps_attribute_case() {
        let el = from_markup(r#"<svg viewBox="0 0 100 100"/>"#).unwrap();
        assert_eq!(el.property("viewBox"), Some(&json!("0 0 100 100")));
    }

    #[test]
    fn test_from_markup_nested_text_preserved() {
        let el = from_markup("<g><text>\u{e15b}</text></g>").unwrap();
        let text_el = el.child_elements().next().unwrap();
        assert_eq!(text_el.child_nodes(), [Node::Text("\u{e15b}".to_string())]);
    }

    #[test]
    fn test_from_markup_then_attach() {
        // Parsed roots take the same attachment surface as built ones.
        let el = from_markup("<svg><g/></svg>")
            .unwrap()
            .class("icon")
            .child(Element::new("title"));
        assert!(el.has_class("icon"));
        assert_eq!(el.child_elements().count(), 2);
    }
}
