//! Markup (XML) reading and writing for [`LabeledTree`].
//!
//! Only the element structure survives the trip into a tree: tags and
//! attributes. Text, CDATA, comments, processing instructions, declarations
//! and doctypes are skipped, since none of them take part in structural
//! matching. Use [`crate::wrapper::remove_wrapper_markup`] when the text must
//! be preserved.
use std::fmt;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::tree::LabeledTree;

/// Errors produced while reading or writing markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The XML reader rejected the input.
    Syntax {
        /// Byte offset the reader had reached when the error occurred.
        offset: u64,
        /// Reader error message.
        detail: String,
    },
    /// The input contains no element at all.
    NoRootElement,
    /// A second top-level element follows the root.
    MultipleRoots {
        /// Tag of the offending element.
        tag: String,
    },
    /// The input ended while an element was still open.
    Unclosed {
        /// Tag of the innermost open element.
        tag: String,
    },
    /// Serializing markup failed.
    Write {
        /// Writer error message.
        detail: String,
    },
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { offset, detail } => {
                write!(f, "malformed markup at byte {offset}: {detail}")
            }
            Self::NoRootElement => f.write_str("markup contains no root element"),
            Self::MultipleRoots { tag } => {
                write!(f, "markup has more than one root element (second root <{tag}>)")
            }
            Self::Unclosed { tag } => write!(f, "markup ended inside unclosed <{tag}>"),
            Self::Write { detail } => write!(f, "failed to write markup: {detail}"),
        }
    }
}

impl std::error::Error for MarkupError {}

pub(crate) fn syntax_error<R>(reader: &Reader<R>, detail: impl fmt::Display) -> MarkupError {
    MarkupError::Syntax {
        offset: u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX),
        detail: detail.to_string(),
    }
}

pub(crate) fn write_error(detail: impl fmt::Display) -> MarkupError {
    MarkupError::Write {
        detail: detail.to_string(),
    }
}

/// Builds an attribute-carrying node from a start (or empty-element) tag.
fn node_from_start<R>(reader: &Reader<R>, start: &BytesStart<'_>) -> Result<LabeledTree, MarkupError> {
    let mut node = LabeledTree::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| syntax_error(reader, e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| syntax_error(reader, e))?
            .into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

/// Attaches a finished node to its parent, or makes it the root.
fn attach(
    stack: &mut [LabeledTree],
    root: &mut Option<LabeledTree>,
    node: LabeledTree,
) -> Result<(), MarkupError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_some() => Err(MarkupError::MultipleRoots { tag: node.tag }),
        None => {
            *root = Some(node);
            Ok(())
        }
    }
}

/// Parses XML markup into a [`LabeledTree`].
///
/// Child order follows document order. Entity references in attribute values
/// are unescaped.
///
/// # Errors
///
/// - [`MarkupError::Syntax`] for anything the XML reader rejects, including
///   mismatched end tags.
/// - [`MarkupError::NoRootElement`] when the input holds no element.
/// - [`MarkupError::MultipleRoots`] when a second top-level element appears.
/// - [`MarkupError::Unclosed`] when the input ends inside an element.
pub fn parse_markup(input: &str) -> Result<LabeledTree, MarkupError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<LabeledTree> = Vec::new();
    let mut root: Option<LabeledTree> = None;

    loop {
        let event = reader.read_event().map_err(|e| syntax_error(&reader, e))?;
        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(MarkupError::MultipleRoots {
                        tag: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    });
                }
                let node = node_from_start(&reader, &start)?;
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = node_from_start(&reader, &start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let Some(node) = stack.pop() else {
                    return Err(syntax_error(&reader, "end tag without matching start tag"));
                };
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            Event::Text(_)
            | Event::CData(_)
            | Event::Comment(_)
            | Event::Decl(_)
            | Event::PI(_)
            | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(MarkupError::Unclosed { tag: open.tag });
    }
    root.ok_or(MarkupError::NoRootElement)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &LabeledTree) -> Result<(), MarkupError> {
    let mut start = BytesStart::new(node.tag.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if node.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }
    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.tag.as_str())))
        .map_err(write_error)
}

/// Serializes a [`LabeledTree`] as compact XML.
///
/// Attributes are written in sorted key order with XML escaping; childless
/// nodes use the empty-element form. `parse_markup(&to_markup(t))` yields `t`
/// for any tree whose tags and attribute keys are valid XML names.
///
/// # Errors
///
/// Returns [`MarkupError::Write`] if the writer fails, which cannot happen
/// for an in-memory buffer in practice.
pub fn to_markup(tree: &LabeledTree) -> Result<String, MarkupError> {
    let mut writer = Writer::new(Vec::new());
    write_node(&mut writer, tree)?;
    String::from_utf8(writer.into_inner()).map_err(write_error)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    const PROBLEM: &str = r#"<problem>
  <p>What is 2 + 3?</p>
  <customresponse cfa="test_add">
    <!-- answer checker lives in a script block -->
    <textline size="40" correct_answer="5"/>
    <textline/>
  </customresponse>
</problem>"#;

    #[test]
    fn parses_elements_and_attributes() {
        let tree = parse_markup(PROBLEM).expect("parse");
        assert_eq!(tree.tag, "problem");
        assert_eq!(tree.children.len(), 2);
        let response = &tree.children[1];
        assert_eq!(response.tag, "customresponse");
        assert_eq!(
            response.attributes.get("cfa").map(String::as_str),
            Some("test_add")
        );
        assert_eq!(response.children.len(), 2);
        assert_eq!(
            response.children[0].attributes.get("size").map(String::as_str),
            Some("40")
        );
    }

    #[test]
    fn text_and_comments_are_skipped() {
        let tree = parse_markup(PROBLEM).expect("parse");
        assert!(tree.children[0].children.is_empty(), "<p> text is not a child");
    }

    #[test]
    fn declaration_is_ignored() {
        let tree = parse_markup(r#"<?xml version="1.0"?><problem/>"#).expect("parse");
        assert_eq!(tree, LabeledTree::new("problem"));
    }

    #[test]
    fn entity_references_in_attributes_are_unescaped() {
        let tree = parse_markup(r#"<a expr="x &lt; 3 &amp;&amp; y"/>"#).expect("parse");
        assert_eq!(
            tree.attributes.get("expr").map(String::as_str),
            Some("x < 3 && y")
        );
    }

    #[test]
    fn empty_input_has_no_root() {
        assert_eq!(parse_markup(""), Err(MarkupError::NoRootElement));
        assert_eq!(
            parse_markup("<!-- nothing -->"),
            Err(MarkupError::NoRootElement)
        );
    }

    #[test]
    fn second_root_is_rejected() {
        let err = parse_markup("<a/><b/>").expect_err("two roots");
        assert_eq!(
            err,
            MarkupError::MultipleRoots {
                tag: "b".to_owned()
            }
        );
    }

    #[test]
    fn unclosed_element_is_rejected() {
        let err = parse_markup("<a><b/>").expect_err("unclosed");
        assert!(
            matches!(
                err,
                MarkupError::Unclosed { .. } | MarkupError::Syntax { .. }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn mismatched_end_tag_is_a_syntax_error() {
        let err = parse_markup("<a><b></a>").expect_err("mismatch");
        assert!(matches!(err, MarkupError::Syntax { .. }), "got {err:?}");
    }

    #[test]
    fn to_markup_round_trips() {
        let tree = parse_markup(PROBLEM).expect("parse");
        let xml = to_markup(&tree).expect("write");
        assert_eq!(parse_markup(&xml).expect("reparse"), tree);
    }

    #[test]
    fn to_markup_escapes_attribute_values() {
        let tree = LabeledTree::new("a").with_attr("expr", r#"x < "y""#);
        let xml = to_markup(&tree).expect("write");
        assert!(!xml.contains(r#"x < "y""#), "xml: {xml}");
        assert_eq!(parse_markup(&xml).expect("reparse"), tree);
    }

    #[test]
    fn error_display_mentions_tag() {
        let msg = MarkupError::Unclosed {
            tag: "customresponse".to_owned(),
        }
        .to_string();
        assert!(msg.contains("customresponse"), "msg: {msg}");
    }
}
