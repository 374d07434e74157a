//! Per-node matchers: the recorders that drive a template against input
//! text and replay the results as output.
//!
//! Most node kinds are handled by [`DefaultMatcher`], which walks a flat
//! placeholder sequence. Kinds whose grammar cannot be expressed as a flat
//! sequence get a dedicated variant of the [`Matcher`] sum type (see
//! [`crate::source::custom`]).
//!
//! Parenthesis handling is orthogonal to templates: any expression may be
//! wrapped in balanced parentheses that the AST does not represent. Leading
//! opens are absorbed onto a paren stack shared down the left edge of the
//! match; closes are matched at the right edge against that stack, and
//! whatever stays unbalanced is left for the nearest enclosing matcher.

use crate::ast::NodeRef;
use crate::error::{Error, Result};
use crate::source::custom::{
    BoolOpMatcher, IfMatcher, NumMatcher, StrMatcher, TryFinallyMatcher, TupleMatcher, WithMatcher,
};
use crate::source::placeholder::{Placeholder, TextPlaceholder};
use crate::source::{end_paren, match_placeholder_list, start_paren};

/// Parenthesis records owned by one matcher after a successful match.
///
/// When `wrapped` is true the matcher owns equal numbers of leading and
/// trailing records and re-surrounds its output with their exact text.
#[derive(Debug, Default)]
pub struct ParenState {
    pub(crate) start: Vec<TextPlaceholder>,
    pub(crate) end: Vec<TextPlaceholder>,
    pub(crate) wrapped: bool,
}

impl ParenState {
    pub(crate) fn new() -> ParenState {
        ParenState::default()
    }

    pub(crate) fn start_text(&self) -> String {
        if !self.wrapped {
            return String::new();
        }
        self.start.iter().map(|p| p.emit()).collect()
    }

    pub(crate) fn end_text(&self) -> String {
        if !self.wrapped {
            return String::new();
        }
        self.end.iter().map(|p| p.emit()).collect()
    }
}

/// Absorbs leading `(` (with trailing layout) from `text`, pushing one
/// record per open onto the shared paren stack. Returns the rest.
pub(crate) fn match_start_parens<'a>(
    text: &'a str,
    shared: &mut Vec<TextPlaceholder>,
) -> &'a str {
    let mut rem = text;
    loop {
        let mut open = start_paren();
        match open.match_prefix(rem) {
            Ok(matched) => {
                rem = &rem[matched.len()..];
                shared.push(open);
            }
            Err(_) => break,
        }
    }
    rem
}

/// Matches up to `shared.len()` trailing `)` tokens. The records matched
/// are paired with the most recent opens, which move off the shared stack
/// into `state`; unbalanced opens stay behind for the enclosing matcher.
pub(crate) fn match_end_parens<'a>(
    text: &'a str,
    state: &mut ParenState,
    shared: &mut Vec<TextPlaceholder>,
) -> &'a str {
    if shared.is_empty() {
        return text;
    }
    let mut rem = text;
    let mut ends = Vec::new();
    for _ in 0..shared.len() {
        let mut close = end_paren();
        match close.match_prefix(rem) {
            Ok(matched) => {
                rem = &rem[matched.len()..];
                ends.push(close);
            }
            Err(_) => break,
        }
    }
    if ends.is_empty() {
        return text;
    }
    let owned = shared.split_off(shared.len() - ends.len());
    state.start = owned;
    state.end = ends;
    state.wrapped = true;
    rem
}

/// Matcher for any node kind whose grammar is a flat placeholder sequence.
#[derive(Debug)]
pub struct DefaultMatcher {
    parts: Vec<Placeholder>,
    pub(crate) parens: ParenState,
}

impl DefaultMatcher {
    /// Validates the template: two adjacent text placeholders cannot be
    /// disambiguated by the driver and are rejected outright.
    pub fn new(parts: Vec<Placeholder>) -> Result<DefaultMatcher> {
        let mut previous_was_text = false;
        for part in &parts {
            if part.is_text() && previous_was_text {
                return Err(Error::spec(
                    "template cannot expect two text placeholders in a row",
                ));
            }
            previous_was_text = part.is_text();
        }
        Ok(DefaultMatcher {
            parts,
            parens: ParenState::new(),
        })
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let rem = match_start_parens(text, shared);
        let consumed_open = text.len() - rem.len();
        let consumed_parts = match_placeholder_list(rem, node, &mut self.parts, shared).map_err(
            |err| {
                Error::mismatch(format!(
                    "while matching {} against {:?}: {}",
                    node.borrow().kind_name(),
                    crate::source::snippet(text),
                    err
                ))
            },
        )?;
        let after_parts = &rem[consumed_parts..];
        let after_close = match_end_parens(after_parts, &mut self.parens, shared);
        let consumed = consumed_open + consumed_parts + (after_parts.len() - after_close.len());
        Ok(text[..consumed].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let mut out = self.parens.start_text();
        for part in &mut self.parts {
            out.push_str(&part.emit(node)?);
        }
        out.push_str(&self.parens.end_text());
        Ok(out)
    }
}

/// The matcher attached to a node: the default template driver or one of
/// the custom matchers for irregular grammar.
#[derive(Debug)]
pub enum Matcher {
    Default(DefaultMatcher),
    BoolOp(BoolOpMatcher),
    If(IfMatcher),
    Num(NumMatcher),
    Str(StrMatcher),
    Tuple(TupleMatcher),
    TryFinally(TryFinallyMatcher),
    With(WithMatcher),
}

impl Matcher {
    /// Matches `text` against the node, recording everything consumed.
    /// Returns the exact matched prefix, parenthesis records included.
    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        match self {
            Matcher::Default(m) => m.match_text(node, text, shared),
            Matcher::BoolOp(m) => m.match_text(node, text, shared),
            Matcher::If(m) => m.match_text(node, text, shared),
            Matcher::Num(m) => m.match_text(node, text, shared),
            Matcher::Str(m) => m.match_text(node, text, shared),
            Matcher::Tuple(m) => m.match_text(node, text, shared),
            Matcher::TryFinally(m) => m.match_text(node, text, shared),
            Matcher::With(m) => m.match_text(node, text, shared),
        }
    }

    /// Reconstructs source from the recorded matches and the node's current
    /// field values. Never re-reads the original input.
    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        match self {
            Matcher::Default(m) => m.emit(node),
            Matcher::BoolOp(m) => m.emit(node),
            Matcher::If(m) => m.emit(node),
            Matcher::Num(m) => m.emit(node),
            Matcher::Str(m) => m.emit(node),
            Matcher::Tuple(m) => m.emit(node),
            Matcher::TryFinally(m) => m.emit(node),
            Matcher::With(m) => m.emit(node),
        }
    }

    /// True for a `with` matcher that absorbed a compound `with a, b:`
    /// header. The indent walker compensates one level for its inner node.
    pub fn is_compound_with(&self) -> bool {
        matches!(self, Matcher::With(m) if m.is_compound_with)
    }

    /// Suppresses the leading `with` keyword on emission; set by the outer
    /// matcher of a compound `with` on its inner node's matcher.
    pub(crate) fn set_starting_with(&mut self, starting_with: bool) {
        if let Matcher::With(m) = self {
            m.starting_with = starting_with;
        }
    }

    /// Overrides the quote style used when emitting a string node.
    pub(crate) fn set_quote_type(&mut self, quote: &str) -> Result<()> {
        match self {
            Matcher::Str(m) => {
                m.quote_type = Some(quote.to_string());
                Ok(())
            }
            _ => Err(Error::value("quote overrides only apply to string nodes")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::templates::{fld, text};

    #[test]
    fn adjacent_text_placeholders_are_rejected() {
        let parts = vec![text("a", "a"), text("b", "b")];
        assert!(matches!(
            DefaultMatcher::new(parts),
            Err(Error::TemplateSpec(_))
        ));
    }

    #[test]
    fn text_and_fields_may_alternate() {
        let parts = vec![text("a", "a"), fld("id"), text("b", "b")];
        assert!(DefaultMatcher::new(parts).is_ok());
    }

    #[test]
    fn unbalanced_closes_stay_unconsumed() {
        let mut shared = Vec::new();
        let mut state = ParenState::new();
        // No opens were absorbed, so a trailing close is not ours to take.
        let rest = match_end_parens(")", &mut state, &mut shared);
        assert_eq!(rest, ")");
        assert!(!state.wrapped);
    }

    #[test]
    fn opens_and_closes_pair_up() {
        let mut shared = Vec::new();
        let rest = match_start_parens("( ( x", &mut shared);
        assert_eq!(rest, "x");
        assert_eq!(shared.len(), 2);
        let mut state = ParenState::new();
        let rest = match_end_parens(" ) )", &mut state, &mut shared);
        assert_eq!(rest, "");
        assert!(state.wrapped);
        assert_eq!(state.start.len(), 2);
        assert_eq!(state.end.len(), 2);
        assert!(shared.is_empty());
        assert_eq!(state.start_text(), "( ( ");
        assert_eq!(state.end_text(), " ) )");
    }
}
