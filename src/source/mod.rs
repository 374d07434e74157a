//! The source-matching engine.
//!
//! Matching annotates a node in place: a matcher is built from the
//! template registry, driven over the input text, and attached to the
//! node. Regeneration (`get_source`) replays the recorded matches around
//! the node's *current* field values, so semantic edits re-emit inside the
//! original formatting.
//!
//! The advancement discipline mirrors the recorded text: after a
//! placeholder matches, the remaining input must start with the matched
//! text modulo leading parentheses (which the paren hand-off may have
//! attributed to an enclosing matcher).

pub mod custom;
pub mod matcher;
pub mod placeholder;
pub(crate) mod templates;

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::ast::{FieldValue, NodeRef};
use crate::error::{Error, Result};
use crate::source::matcher::{DefaultMatcher, Matcher};
use crate::source::placeholder::{transform_pattern, Placeholder, TextPlaceholder};
use crate::tree;

/// Quote style used when rendering a string node that was never matched.
pub const DEFAULT_QUOTE: &str = "\"";

/// Truncates long inputs for error messages.
pub(crate) fn snippet(text: &str) -> &str {
    let end = text
        .char_indices()
        .nth(40)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}

pub(crate) fn start_paren() -> TextPlaceholder {
    TextPlaceholder::new(r"\(\s*", "")
}

pub(crate) fn end_paren() -> TextPlaceholder {
    TextPlaceholder::new(r"\s*\)", "")
}

fn start_paren_regex() -> &'static Regex {
    static START_PAREN: OnceLock<Regex> = OnceLock::new();
    START_PAREN.get_or_init(|| {
        Regex::new(&format!("^(?:{})", transform_pattern(r"\(\s*"))).unwrap()
    })
}

/// Strips leading `(` tokens (each with its trailing layout) from `s`.
pub(crate) fn strip_start_parens(s: &str) -> &str {
    let mut rem = s;
    while rem.starts_with('(') {
        match start_paren_regex().find(rem) {
            Some(m) => rem = &rem[m.end()..],
            None => break,
        }
    }
    rem
}

/// Validates that `full` begins with `start`, both taken modulo leading
/// parentheses.
pub(crate) fn validate_start(full: &str, start: &str) -> Result<()> {
    let stripped_full = strip_start_parens(full);
    let stripped_start = strip_start_parens(start);
    if stripped_full.starts_with(stripped_start) {
        Ok(())
    } else {
        Err(Error::mismatch(format!(
            "text {:?} should have started with {:?}",
            snippet(stripped_full),
            snippet(stripped_start)
        )))
    }
}

/// Advances past `matched` at the front of `remaining`.
///
/// Node matches are located modulo leading parentheses: opens the child
/// consumed but handed off to an enclosing matcher sit in front of the
/// emitted text, and are skipped here.
pub(crate) fn advance<'a>(remaining: &'a str, matched: &str, is_text: bool) -> Result<&'a str> {
    if matched.is_empty() {
        return Ok(remaining);
    }
    validate_start(remaining, matched)?;
    let key = if is_text {
        matched
    } else {
        strip_start_parens(matched)
    };
    if key.is_empty() {
        return Ok(remaining);
    }
    match remaining.find(key) {
        Some(pos) if strip_start_parens(&remaining[..pos]).is_empty() => {
            Ok(&remaining[pos + key.len()..])
        }
        _ => Err(Error::mismatch(format!(
            "matched text {:?} not found at the front of {:?}",
            snippet(key),
            snippet(remaining)
        ))),
    }
}

/// Drives a placeholder sequence over `text`. The shared paren stack is
/// handed to placeholders at the left edge (while nothing has been
/// consumed); later placeholders get a throwaway stack.
pub(crate) fn match_placeholder_list(
    text: &str,
    node: &NodeRef,
    parts: &mut [Placeholder],
    shared: &mut Vec<TextPlaceholder>,
) -> Result<usize> {
    let mut rem = text;
    for part in parts.iter_mut() {
        let at_left_edge = rem.len() == text.len();
        let mut local = Vec::new();
        let parens = if at_left_edge { &mut *shared } else { &mut local };
        let matched = part.match_text(node, rem, parens)?;
        rem = advance(rem, &matched, part.is_text())?;
    }
    Ok(text.len() - rem.len())
}

/// Builds an un-matched matcher for the node from the registry.
pub(crate) fn build_matcher(node: &NodeRef) -> Result<Matcher> {
    let spec = templates::matcher_spec(&node.borrow().kind);
    Ok(match spec {
        templates::MatcherSpec::Parts(parts) => Matcher::Default(DefaultMatcher::new(parts)?),
        templates::MatcherSpec::BoolOp => Matcher::BoolOp(custom::BoolOpMatcher::new()),
        templates::MatcherSpec::If => Matcher::If(custom::IfMatcher::new()),
        templates::MatcherSpec::Num => Matcher::Num(custom::NumMatcher::new()),
        templates::MatcherSpec::Str => Matcher::Str(custom::StrMatcher::new()),
        templates::MatcherSpec::Tuple => Matcher::Tuple(custom::TupleMatcher::new()?),
        templates::MatcherSpec::TryFinally => {
            Matcher::TryFinally(custom::TryFinallyMatcher::new()?)
        }
        templates::MatcherSpec::With => Matcher::With(custom::WithMatcher::new()),
    })
}

/// Workhorse shared by matching and emission.
///
/// With `text`, a fresh matcher is built (replacing any previous record),
/// matched, attached, and the node's recorded source returned. Without
/// `text`, the attached matcher emits; a node never matched renders its
/// defaults.
pub(crate) fn node_source(
    node: &NodeRef,
    text: Option<&str>,
    shared: &mut Vec<TextPlaceholder>,
) -> Result<String> {
    let existing = node.borrow_mut().matcher.take();
    let mut matcher = match (existing, text) {
        (Some(m), None) => m,
        _ => build_matcher(node)?,
    };
    let result = match text {
        Some(t) => matcher
            .match_text(node, t, shared)
            .and_then(|_| matcher.emit(node)),
        None => matcher.emit(node),
    };
    node.borrow_mut().matcher = Some(matcher);
    result
}

/// Attaches a matcher from the registry if the node does not already carry
/// one. Idempotent.
pub fn ensure_matcher(node: &NodeRef) -> Result<()> {
    if node.borrow().matcher.is_none() {
        let matcher = build_matcher(node)?;
        node.borrow_mut().matcher = Some(matcher);
    }
    Ok(())
}

/// Matches `text` against the node, attaching a fresh matcher that records
/// every consumed fragment. Returns the exact matched prefix of `text`.
///
/// Re-matching an already-annotated node replaces its record; matching the
/// same text twice leaves the emitted source unchanged.
pub fn match_source(node: &NodeRef, text: &str) -> Result<String> {
    trace!(
        kind = node.borrow().kind_name(),
        len = text.len(),
        "matching source"
    );
    let mut matcher = build_matcher(node)?;
    let mut shared = Vec::new();
    let result = matcher.match_text(node, text, &mut shared);
    node.borrow_mut().matcher = Some(matcher);
    result
}

/// Renders the source for a node.
///
/// An annotated node replays its record; an unannotated expression renders
/// defaults. An unannotated *statement* is refused here because its indent
/// is unknown: use [`get_source_in_module`] for statements that live in a
/// module, or [`get_source_no_indent`] for synthesized ones.
pub fn get_source(node: &NodeRef) -> Result<String> {
    if node.borrow().matcher.is_none() && node.borrow().is_stmt() {
        return Err(Error::value(format!(
            "cannot render an unmatched {} without indent context; use \
             get_source_in_module or get_source_no_indent",
            node.borrow().kind_name()
        )));
    }
    let mut none = Vec::new();
    node_source(node, None, &mut none)
}

/// Renders the source for a node, assuming zero indentation for an
/// unannotated statement. Intended for synthesized nodes not yet inserted
/// into a module.
pub fn get_source_no_indent(node: &NodeRef) -> Result<String> {
    let mut none = Vec::new();
    node_source(node, None, &mut none)
}

/// Renders the source for a statement inside `module`, fixing up its
/// indentation first if it has never been matched.
pub fn get_source_in_module(node: &NodeRef, module: &NodeRef) -> Result<String> {
    if node.borrow().matcher.is_none() {
        fix_source_indentation(module, node)?;
    }
    let mut none = Vec::new();
    node_source(node, None, &mut none)
}

/// Renders a field value: scalars render as themselves, nodes through
/// their matcher (or defaults), absent fields as the empty string.
pub fn field_source(field: &FieldValue) -> Result<String> {
    match field {
        FieldValue::Absent => Ok(String::new()),
        FieldValue::Ident(s) => Ok(s.clone()),
        FieldValue::Node(n) => get_source_no_indent(n),
        FieldValue::NodeList(nodes) => {
            let mut out = String::new();
            for n in nodes {
                out.push_str(&get_source_no_indent(n)?);
            }
            Ok(out)
        }
        FieldValue::IdentList(idents) => Ok(idents.join(", ")),
    }
}

/// Re-renders `node` with a leading prefix of two-space units equal to its
/// depth inside `module`, then re-matches so the node's record carries the
/// corrected indentation.
pub fn fix_source_indentation(module: &NodeRef, node: &NodeRef) -> Result<()> {
    let mut none = Vec::new();
    let default_source = node_source(node, None, &mut none)?;
    let depth = tree::indent_level(module, node)?;
    let indented = format!("{}{}", "  ".repeat(depth), default_source);
    debug!(
        kind = node.borrow().kind_name(),
        depth, "fixing source indentation"
    );
    let mut matcher = build_matcher(node)?;
    let mut shared = Vec::new();
    matcher.match_text(node, &indented, &mut shared)?;
    node.borrow_mut().matcher = Some(matcher);
    Ok(())
}

/// Overrides the quote style a matched string node will emit with
/// (e.g. `'` or `'''`). The node must carry a string matcher.
pub fn set_str_quote(node: &NodeRef, quote: &str) -> Result<()> {
    match node.borrow_mut().matcher.as_mut() {
        Some(matcher) => matcher.set_quote_type(quote),
        None => Err(Error::value("node has no matcher; match it first")),
    }
}
