//! Wrapper stripping: removing grouping tags while keeping their children.
//!
//! A wrapper is any node whose tag equals the requested wrapper tag. Its
//! children are spliced into the parent's child list at the wrapper's former
//! position, in order, and the wrapper itself disappears. Nested wrappers are
//! fully unwrapped, so a second pass is always a no-op.
//!
//! The root node is never unwrapped: it is the caller's stable anchor and the
//! result is always a single tree (or a single root element, for markup).
//!
//! Both representations go through [`StripWrapper`], so callers holding
//! either a tree or a markup string get back the same representation.
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::Event;

use crate::markup::{MarkupError, syntax_error, write_error};
use crate::tree::LabeledTree;

/// Removes wrapper nodes from a representation of a tree.
pub trait StripWrapper {
    /// The representation produced by stripping.
    type Output;

    /// Removes every non-root node tagged `wrapper_tag`, splicing its children
    /// into its parent.
    fn strip_wrapper(&self, wrapper_tag: &str) -> Self::Output;
}

impl StripWrapper for LabeledTree {
    type Output = LabeledTree;

    fn strip_wrapper(&self, wrapper_tag: &str) -> LabeledTree {
        remove_wrapper(self, wrapper_tag)
    }
}

impl StripWrapper for str {
    type Output = Result<String, MarkupError>;

    fn strip_wrapper(&self, wrapper_tag: &str) -> Self::Output {
        remove_wrapper_markup(self, wrapper_tag)
    }
}

/// Appends `node`'s children to `out`, unwrapping any wrapper among them.
fn splice_children(node: &LabeledTree, wrapper_tag: &str, out: &mut Vec<LabeledTree>) {
    for child in &node.children {
        if child.tag == wrapper_tag {
            splice_children(child, wrapper_tag, out);
        } else {
            out.push(remove_wrapper(child, wrapper_tag));
        }
    }
}

/// Returns a copy of `tree` with every non-root `wrapper_tag` node removed
/// and its children spliced into place.
pub fn remove_wrapper(tree: &LabeledTree, wrapper_tag: &str) -> LabeledTree {
    let mut children = Vec::with_capacity(tree.children.len());
    splice_children(tree, wrapper_tag, &mut children);
    LabeledTree {
        tag: tree.tag.clone(),
        attributes: tree.attributes.clone(),
        children,
    }
}

/// Applies [`remove_wrapper`] for each tag in `wrapper_tags`, in order.
pub fn remove_wrappers<S: AsRef<str>>(tree: &LabeledTree, wrapper_tags: &[S]) -> LabeledTree {
    wrapper_tags
        .iter()
        .fold(tree.clone(), |acc, tag| remove_wrapper(&acc, tag.as_ref()))
}

/// Removes every non-root `wrapper_tag` element from a markup string.
///
/// Unlike a parse/serialize round trip through [`LabeledTree`], everything
/// except the wrapper tags themselves is passed through untouched: text,
/// comments, entity references and attribute quoting all survive.
///
/// # Errors
///
/// Returns [`MarkupError::Syntax`] for malformed input and
/// [`MarkupError::Write`] if the output buffer cannot be written.
pub fn remove_wrapper_markup(input: &str, wrapper_tag: &str) -> Result<String, MarkupError> {
    let mut reader = Reader::from_str(input);
    let mut writer = Writer::new(Vec::with_capacity(input.len()));
    // One entry per open element: `true` if that element is a skipped wrapper.
    let mut open: Vec<bool> = Vec::new();
    let wrapper = wrapper_tag.as_bytes();

    loop {
        let event = reader.read_event().map_err(|e| syntax_error(&reader, e))?;
        match event {
            Event::Start(start) => {
                let skip = !open.is_empty() && start.name().as_ref() == wrapper;
                open.push(skip);
                if !skip {
                    writer.write_event(Event::Start(start)).map_err(write_error)?;
                }
            }
            Event::End(end) => {
                let Some(skipped) = open.pop() else {
                    return Err(syntax_error(&reader, "end tag without matching start tag"));
                };
                if !skipped {
                    writer.write_event(Event::End(end)).map_err(write_error)?;
                }
            }
            Event::Empty(start) => {
                let skip = !open.is_empty() && start.name().as_ref() == wrapper;
                if !skip {
                    writer.write_event(Event::Empty(start)).map_err(write_error)?;
                }
            }
            Event::Eof => break,
            other @ (Event::Text(_)
            | Event::CData(_)
            | Event::Comment(_)
            | Event::Decl(_)
            | Event::PI(_)
            | Event::DocType(_)) => {
                writer.write_event(other).map_err(write_error)?;
            }
        }
    }

    String::from_utf8(writer.into_inner()).map_err(write_error)
}
