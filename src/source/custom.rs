//! Custom matchers for node kinds whose grammar cannot be expressed as a
//! flat placeholder sequence: boolean-operator chains, `if`/`elif`/`else`
//! ladders, numeric and string literals, tuples with optional parentheses,
//! `try`/`finally` absorbing an inner `try`/`except`, and compound `with`.

use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{NodeKind, NodeRef, NumVal};
use crate::error::{Error, Result};
use crate::source::matcher::{
    match_end_parens, match_start_parens, DefaultMatcher, ParenState,
};
use crate::source::placeholder::{
    BodyPlaceholder, FieldPlaceholder, ListFieldPlaceholder, TextPlaceholder,
};
use crate::source::{advance, node_source, DEFAULT_QUOTE};

/// Matcher for an n-ary boolean-operator chain.
///
/// Python collapses `a and b and c` into one node with a `values` list, so
/// the matcher lays the chain out as `v0 sep op sep v1 sep op sep v2 ...`
/// with an owned separator clone per gap.
#[derive(Debug)]
pub struct BoolOpMatcher {
    sep_proto: TextPlaceholder,
    matched_seps: Vec<TextPlaceholder>,
    parens: ParenState,
}

impl BoolOpMatcher {
    pub(crate) fn new() -> BoolOpMatcher {
        BoolOpMatcher {
            sep_proto: TextPlaceholder::new(r"\s*", " "),
            matched_seps: Vec::new(),
            parens: ParenState::new(),
        }
    }

    fn chain(node: &NodeRef) -> Result<(NodeRef, Vec<NodeRef>)> {
        match &node.borrow().kind {
            NodeKind::BoolOp { op, values } => Ok((op.clone(), values.clone())),
            _ => Err(Error::spec("boolean-chain matcher applied to a non-BoolOp")),
        }
    }

    fn next_sep(&mut self) -> &mut TextPlaceholder {
        self.matched_seps.push(self.sep_proto.fresh());
        self.matched_seps.last_mut().unwrap()
    }

    fn sep_text(&self, index: usize) -> String {
        match self.matched_seps.get(index) {
            Some(p) => p.emit(),
            None => self.sep_proto.emit(),
        }
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let (op, values) = Self::chain(node)?;
        let rem0 = match_start_parens(text, shared);
        let mut rem = rem0;
        let src = node_source(&values[0], Some(rem), shared)?;
        rem = advance(rem, &src, false)?;
        for value in &values[1..] {
            let matched = self.next_sep().match_prefix(rem)?;
            rem = advance(rem, &matched, true)?;
            let mut local = Vec::new();
            let src = node_source(&op, Some(rem), &mut local)?;
            rem = advance(rem, &src, false)?;
            let matched = self.next_sep().match_prefix(rem)?;
            rem = advance(rem, &matched, true)?;
            let mut local = Vec::new();
            let src = node_source(value, Some(rem), &mut local)?;
            rem = advance(rem, &src, false)?;
        }
        let rem = match_end_parens(rem, &mut self.parens, shared);
        Ok(text[..text.len() - rem.len()].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let (op, values) = Self::chain(node)?;
        let mut none = Vec::new();
        let mut out = self.parens.start_text();
        out.push_str(&node_source(&values[0], None, &mut none)?);
        let mut index = 0usize;
        for value in &values[1..] {
            out.push_str(&self.sep_text(index));
            index += 1;
            out.push_str(&node_source(&op, None, &mut none)?);
            out.push_str(&self.sep_text(index));
            index += 1;
            out.push_str(&node_source(value, None, &mut none)?);
        }
        out.push_str(&self.parens.end_text());
        Ok(out)
    }
}

/// Which placeholder shape the `orelse` list is matched with. An `elif`
/// continuation is not itself indented, so it bypasses the body
/// placeholder's indent-driven absorption of syntax-free lines.
#[derive(Debug)]
enum OrElse {
    Body(BodyPlaceholder),
    Plain(ListFieldPlaceholder),
}

impl OrElse {
    fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        match self {
            OrElse::Body(p) => p.match_text(node, text, shared),
            OrElse::Plain(p) => p.match_text(node, text, shared),
        }
    }

    fn emit(&mut self, node: &NodeRef) -> Result<String> {
        match self {
            OrElse::Body(p) => p.emit(node),
            OrElse::Plain(p) => p.emit(node),
        }
    }
}

/// Matcher for `if` statements, including the `elif` contraction.
///
/// `elif X:` is the two characters `el` glued onto a nested `if` that is
/// the sole element of `orelse`. Matching strips those two characters from
/// the stream and treats the rest as an ordinary statement; emission
/// re-inserts them at the same indent.
#[derive(Debug)]
pub struct IfMatcher {
    if_ph: TextPlaceholder,
    test: FieldPlaceholder,
    colon: TextPlaceholder,
    body: BodyPlaceholder,
    else_ph: TextPlaceholder,
    orelse: OrElse,
    is_elif: bool,
}

impl IfMatcher {
    pub(crate) fn new() -> IfMatcher {
        IfMatcher {
            if_ph: TextPlaceholder::new(r" *if\s*", "if "),
            test: FieldPlaceholder::new("test"),
            colon: TextPlaceholder::new(r":\n?", ":\n"),
            body: BodyPlaceholder::new(ListFieldPlaceholder::new("body")),
            else_ph: TextPlaceholder::new(r" *else:\n", "else:\n"),
            orelse: OrElse::Body(BodyPlaceholder::new(ListFieldPlaceholder::new("orelse"))),
            is_elif: false,
        }
    }

    fn push_body_line(node: &NodeRef, line: NodeRef) {
        if let NodeKind::If { body, .. } = &mut node.borrow_mut().kind {
            body.push(line);
        }
    }

    fn orelse_nodes(node: &NodeRef) -> Vec<NodeRef> {
        match &node.borrow().kind {
            NodeKind::If { orelse, .. } => orelse.clone(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        _shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let mut local = Vec::new();
        let mut rem = text;
        let matched = self.if_ph.match_prefix(rem)?;
        rem = advance(rem, &matched, true)?;
        let matched = self.test.match_text(node, rem, &mut local)?;
        rem = advance(rem, &matched, false)?;
        let matched = self.colon.match_prefix(rem)?;
        rem = advance(rem, &matched, true)?;
        let matched = self.body.match_text(node, rem, &mut local)?;
        rem = advance(rem, &matched, false)?;

        if Self::orelse_nodes(node).is_empty() {
            return Ok(text[..text.len() - rem.len()].to_string());
        }

        // Blank or comment lines before an elif/else belong to the body.
        // The body placeholder cannot absorb them itself: it must not match
        // past the block when there is no else to stop at.
        while crate::ast::starts_with_syntax_free_line(rem) {
            let (line, rest) = BodyPlaceholder::match_syntax_free_line(rem)?;
            Self::push_body_line(node, line);
            rem = rest;
        }

        if rem.trim_start().starts_with("elif") {
            self.is_elif = true;
            let indent = rem.len() - rem.trim_start().len();
            let rewritten = format!("{}{}", &rem[..indent], &rem[indent + 2..]);
            self.orelse = OrElse::Plain(ListFieldPlaceholder::new("orelse"));
            let matched = self.orelse.match_text(node, &rewritten, &mut local)?;
            let rest = advance(&rewritten, &matched, false)?;
            return Ok(text[..text.len() - rest.len()].to_string());
        }

        let matched = self.else_ph.match_prefix(rem)?;
        rem = advance(rem, &matched, true)?;
        let matched = self.orelse.match_text(node, rem, &mut local)?;
        rem = advance(rem, &matched, false)?;
        Ok(text[..text.len() - rem.len()].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let mut out = self.if_ph.emit();
        out.push_str(&self.test.emit(node)?);
        out.push_str(&self.colon.emit());
        out.push_str(&self.body.emit(node)?);

        let orelse = Self::orelse_nodes(node);
        if orelse.is_empty() {
            return Ok(out);
        }
        let sole_if = orelse.len() == 1
            && matches!(orelse[0].borrow().kind, NodeKind::If { .. });
        if sole_if && self.is_elif {
            let mut none = Vec::new();
            let elif_source = node_source(&orelse[0], None, &mut none)?;
            let indent = elif_source.len() - elif_source.trim_start().len();
            out.push_str(&elif_source[..indent]);
            out.push_str("el");
            out.push_str(&elif_source[indent..]);
        } else {
            out.push_str(&self.else_ph.emit());
            out.push_str(&self.orelse.emit(node)?);
        }
        Ok(out)
    }
}

fn int_literal_regex() -> &'static Regex {
    static INT_LITERAL: OnceLock<Regex> = OnceLock::new();
    INT_LITERAL
        .get_or_init(|| Regex::new(r"^[+-]?(0[xX][0-9a-fA-F]+|0[0-7]*|\d+)").unwrap())
}

fn float_literal_regex() -> &'static Regex {
    static FLOAT_LITERAL: OnceLock<Regex> = OnceLock::new();
    FLOAT_LITERAL
        .get_or_init(|| Regex::new(r"^[-+]?(\d+\.\d*|\.\d+|\d+)([eE][-+]?\d+)?").unwrap())
}

/// Matcher for numeric literals. Preserves the exact lexeme (hex, octal,
/// exponent, `l`/`L`/`j`/`J` suffix) as long as the node's value is the one
/// that was matched; changing the value falls back to a decimal render,
/// with the suffix surviving.
#[derive(Debug)]
pub struct NumMatcher {
    matched_num: Option<NumVal>,
    matched_str: Option<String>,
    suffix: Option<char>,
    parens: ParenState,
}

impl NumMatcher {
    pub(crate) fn new() -> NumMatcher {
        NumMatcher {
            matched_num: None,
            matched_str: None,
            suffix: None,
            parens: ParenState::new(),
        }
    }

    fn value(node: &NodeRef) -> Result<NumVal> {
        match &node.borrow().kind {
            NodeKind::Num { n } => Ok(*n),
            _ => Err(Error::spec("numeric matcher applied to a non-Num")),
        }
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let n = Self::value(node)?;
        let rem0 = match_start_parens(text, shared);
        let pattern = match n {
            NumVal::Int(_) => int_literal_regex(),
            NumVal::Float(_) => float_literal_regex(),
        };
        let lexeme = pattern
            .find(rem0)
            .ok_or_else(|| {
                Error::mismatch(format!(
                    "text {:?} does not start with a numeric literal",
                    crate::source::snippet(rem0)
                ))
            })?
            .as_str()
            .to_string();
        self.matched_num = Some(n);
        self.matched_str = Some(lexeme.clone());
        let mut rem = &rem0[lexeme.len()..];
        self.suffix = None;
        if let Some(first) = rem.chars().next() {
            if matches!(first, 'l' | 'L' | 'j' | 'J') {
                self.suffix = Some(first);
                rem = &rem[first.len_utf8()..];
            }
        }
        let rem = match_end_parens(rem, &mut self.parens, shared);
        Ok(text[..text.len() - rem.len()].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let n = Self::value(node)?;
        let core = match (&self.matched_num, &self.matched_str) {
            (Some(matched), Some(lexeme)) if *matched == n => lexeme.clone(),
            _ => n.to_string(),
        };
        let mut out = self.parens.start_text();
        out.push_str(&core);
        if let Some(suffix) = self.suffix {
            out.push(suffix);
        }
        out.push_str(&self.parens.end_text());
        Ok(out)
    }
}

fn is_backslash_escaped(text: &str, index: usize) -> bool {
    let mut backslashes = 0usize;
    for byte in text[..index].bytes().rev() {
        if byte == b'\\' {
            backslashes += 1;
        } else {
            break;
        }
    }
    backslashes % 2 == 1
}

/// Index of the first unescaped occurrence of `quote` in `text`. An escaped
/// quote is one preceded by an odd number of backslashes.
fn find_quote_end(text: &str, quote: &str) -> Result<usize> {
    let mut base = 0usize;
    loop {
        match text[base..].find(quote) {
            None => {
                return Err(Error::value(format!(
                    "string {:?} does not end properly",
                    crate::source::snippet(text)
                )))
            }
            Some(offset) => {
                let index = base + offset;
                if !is_backslash_escaped(text, index) {
                    return Ok(index);
                }
                base = index + 1;
            }
        }
    }
}

/// One quoted fragment of a string literal: prefix, quote, inner text.
/// Implicit concatenation means a single `Str` node can own several.
#[derive(Debug)]
pub struct StringPart {
    prefix: TextPlaceholder,
    quote: TextPlaceholder,
    inner: TextPlaceholder,
}

impl StringPart {
    fn new() -> StringPart {
        StringPart {
            prefix: TextPlaceholder::new(r"ur|uR|Ur|UR|u|r|U|R|", ""),
            quote: TextPlaceholder::new(r#""""|'''|"|'"#, DEFAULT_QUOTE),
            inner: TextPlaceholder::new_dotall(r".*", ""),
        }
    }

    fn match_part<'a>(&mut self, text: &'a str) -> Result<&'a str> {
        let matched = self.prefix.match_prefix(text)?;
        let mut rem = &text[matched.len()..];
        let quote = self.quote.match_prefix(rem)?;
        rem = &rem[quote.len()..];
        let end = find_quote_end(rem, &quote)?;
        self.inner.match_prefix(&rem[..end])?;
        Ok(&rem[end + quote.len()..])
    }

    fn emit(&self) -> String {
        format!(
            "{}{}{}{}",
            self.prefix.emit(),
            self.quote.emit(),
            self.inner.emit(),
            self.quote.emit()
        )
    }

    fn set_inner(&mut self, text: &str) {
        self.inner.set_matched(text);
    }

    fn set_quote(&mut self, quote: &str) {
        self.quote.set_matched(quote);
    }

    fn quote_text(&self) -> Option<String> {
        self.quote.matched().map(|s| s.to_string())
    }
}

fn double_quote_continuation() -> &'static Regex {
    static CONTINUATION: OnceLock<Regex> = OnceLock::new();
    CONTINUATION.get_or_init(|| Regex::new(r#"^(ur|uR|Ur|UR|u|U|r|R)?""#).unwrap())
}

fn single_quote_continuation() -> &'static Regex {
    static CONTINUATION: OnceLock<Regex> = OnceLock::new();
    CONTINUATION.get_or_init(|| Regex::new(r"^(ur|uR|Ur|UR|u|U|r|R)?'").unwrap())
}

/// Matcher for string literals: quote styles, `u`/`r` prefixes, and
/// adjacent concatenation with preserved inter-part layout.
#[derive(Debug)]
pub struct StrMatcher {
    sep_proto: TextPlaceholder,
    parts: Vec<StringPart>,
    seps: Vec<TextPlaceholder>,
    /// When set, overrides the quote style on every part at emission.
    pub(crate) quote_type: Option<String>,
    original_quote: Option<String>,
    original_s: Option<String>,
    parens: ParenState,
}

impl StrMatcher {
    pub(crate) fn new() -> StrMatcher {
        StrMatcher {
            sep_proto: TextPlaceholder::new(r"\s*", ""),
            parts: Vec::new(),
            seps: Vec::new(),
            quote_type: None,
            original_quote: None,
            original_s: None,
            parens: ParenState::new(),
        }
    }

    fn value(node: &NodeRef) -> Result<String> {
        match &node.borrow().kind {
            NodeKind::Str { s } => Ok(s.clone()),
            _ => Err(Error::spec("string matcher applied to a non-Str")),
        }
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        self.original_s = Some(Self::value(node)?);
        let rem0 = match_start_parens(text, shared);
        let mut part = StringPart::new();
        let mut rem = part.match_part(rem0)?;
        self.parts.push(part);
        loop {
            let mut sep = self.sep_proto.fresh();
            let matched = sep.match_prefix(rem)?;
            let trial = &rem[matched.len()..];
            if !double_quote_continuation().is_match(trial)
                && !single_quote_continuation().is_match(trial)
            {
                break;
            }
            rem = trial;
            self.seps.push(sep);
            let mut part = StringPart::new();
            rem = part.match_part(rem)?;
            self.parts.push(part);
        }
        let rem = match_end_parens(rem, &mut self.parens, shared);
        self.original_quote = self.parts[0].quote_text();
        Ok(text[..text.len() - rem.len()].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let current = Self::value(node)?;
        match &self.original_s {
            None => {
                // Never matched: default render collapses to one part.
                let quote = self
                    .quote_type
                    .clone()
                    .or_else(|| self.original_quote.clone())
                    .unwrap_or_else(|| DEFAULT_QUOTE.to_string());
                return Ok(format!("{}{}{}", quote, current, quote));
            }
            Some(original) if *original != current => {
                self.parts.truncate(1);
                self.parts[0].set_inner(&current);
            }
            _ => {}
        }
        if let Some(quote) = &self.quote_type {
            for part in &mut self.parts {
                part.set_quote(quote);
            }
        }
        let mut out = self.parens.start_text();
        out.push_str(&self.parts[0].emit());
        for (index, part) in self.parts.iter().enumerate().skip(1) {
            out.push_str(&match self.seps.get(index - 1) {
                Some(sep) => sep.emit(),
                None => self.sep_proto.emit(),
            });
            out.push_str(&part.emit());
        }
        out.push_str(&self.parens.end_text());
        Ok(out)
    }
}

/// Matcher for tuples. Parenthesized tuples ride the generic paren
/// handling; an unparenthesized tuple re-matches against its right-stripped
/// text so it does not absorb the trailing layout of its statement.
#[derive(Debug)]
pub struct TupleMatcher {
    inner: DefaultMatcher,
}

impl TupleMatcher {
    pub(crate) fn new() -> Result<TupleMatcher> {
        let parts = vec![
            crate::source::templates::text(r"\s*", "("),
            crate::source::templates::separated("elts", r"\s*,\s*", ", "),
            crate::source::templates::text(r"\s*,?\s*", ")"),
        ];
        Ok(TupleMatcher {
            inner: DefaultMatcher::new(parts)?,
        })
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let matched = self.inner.match_text(node, text, shared)?;
        if self.inner.parens.wrapped {
            return Ok(matched);
        }
        let trimmed = matched.trim_end();
        self.inner.match_text(node, trimmed, shared)
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        self.inner.emit(node)
    }
}

/// Matcher for `try`/`finally`. When both `except` and `finally` clauses
/// exist the AST nests a `TryExcept` as the sole body element, and the
/// `try:` header belongs to that inner node; only emit or match our own
/// header when the first body element is something else.
#[derive(Debug)]
pub struct TryFinallyMatcher {
    inner: DefaultMatcher,
    optional_try: TextPlaceholder,
}

impl TryFinallyMatcher {
    pub(crate) fn new() -> Result<TryFinallyMatcher> {
        let parts = vec![
            crate::source::templates::body_trailing("body"),
            crate::source::templates::text(r"[ \t]*finally:[ \t]*\n", "finally:\n"),
            crate::source::templates::body("finalbody"),
        ];
        Ok(TryFinallyMatcher {
            inner: DefaultMatcher::new(parts)?,
            optional_try: TextPlaceholder::new(r"[ \t]*try:[ \t]*\n", "try:\n"),
        })
    }

    fn first_body_is_try_except(node: &NodeRef) -> bool {
        match &node.borrow().kind {
            NodeKind::TryFinally { body, .. } => body
                .first()
                .map(|first| matches!(first.borrow().kind, NodeKind::TryExcept { .. }))
                .unwrap_or(false),
            _ => false,
        }
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let mut rem = text;
        if !Self::first_body_is_try_except(node) {
            let matched = self.optional_try.match_prefix(rem)?;
            rem = advance(rem, &matched, true)?;
        }
        let consumed_header = text.len() - rem.len();
        let matched = self.inner.match_text(node, rem, shared)?;
        Ok(text[..consumed_header + matched.len()].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let mut out = String::new();
        if !Self::first_body_is_try_except(node) {
            out.push_str(&self.optional_try.emit());
        }
        out.push_str(&self.inner.emit(node)?);
        Ok(out)
    }
}

/// Matcher for `with` statements, including the compound form.
///
/// `with a, b:` parses as two nested `With` nodes; the outer matcher
/// consumes `, ` after its own context expression and recurses into the
/// inner node (the sole body element) with the inner's leading `with`
/// keyword suppressed.
#[derive(Debug)]
pub struct WithMatcher {
    with_ph: TextPlaceholder,
    context_expr: FieldPlaceholder,
    optional_vars: FieldPlaceholder,
    compound_sep: TextPlaceholder,
    colon: TextPlaceholder,
    body: BodyPlaceholder,
    pub(crate) is_compound_with: bool,
    pub(crate) starting_with: bool,
}

impl WithMatcher {
    pub(crate) fn new() -> WithMatcher {
        WithMatcher {
            with_ph: TextPlaceholder::new(r" *(with)? *", "with "),
            context_expr: FieldPlaceholder::new("context_expr"),
            optional_vars: FieldPlaceholder::with_before(
                "optional_vars",
                TextPlaceholder::new(r" *as *", " as "),
            ),
            compound_sep: TextPlaceholder::new(r"\s*,\s*", ", "),
            colon: TextPlaceholder::new(r":\n?", ":\n"),
            body: BodyPlaceholder::new(ListFieldPlaceholder::new("body")),
            is_compound_with: false,
            starting_with: true,
        }
    }

    fn first_body_with(node: &NodeRef) -> Option<NodeRef> {
        match &node.borrow().kind {
            NodeKind::With { body, .. } => body
                .first()
                .filter(|first| matches!(first.borrow().kind, NodeKind::With { .. }))
                .cloned(),
            _ => None,
        }
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        _shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let mut local = Vec::new();
        let mut rem = text;
        let matched = self.with_ph.match_prefix(rem)?;
        rem = advance(rem, &matched, true)?;
        let matched = self.context_expr.match_text(node, rem, &mut local)?;
        rem = advance(rem, &matched, false)?;
        let matched = self.optional_vars.match_text(node, rem, &mut local)?;
        rem = advance(rem, &matched, false)?;
        if rem.trim_start().starts_with(',') {
            self.is_compound_with = true;
            let matched = self.compound_sep.match_prefix(rem)?;
            rem = advance(rem, &matched, true)?;
        } else {
            let matched = self.colon.match_prefix(rem)?;
            rem = advance(rem, &matched, true)?;
        }
        let matched = self.body.match_text(node, rem, &mut local)?;
        rem = advance(rem, &matched, false)?;
        Ok(text[..text.len() - rem.len()].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let mut out = String::new();
        if self.starting_with {
            out.push_str(&self.with_ph.emit());
        }
        out.push_str(&self.context_expr.emit(node)?);
        out.push_str(&self.optional_vars.emit(node)?);
        let inner = Self::first_body_with(node);
        if self.is_compound_with && inner.is_some() {
            let inner = inner.unwrap();
            if inner.borrow().matcher.is_none() {
                let mut none = Vec::new();
                node_source(&inner, None, &mut none)?;
            }
            if let Some(matcher) = inner.borrow_mut().matcher.as_mut() {
                matcher.set_starting_with(false);
            }
            out.push_str(&self.compound_sep.emit());
        } else {
            out.push_str(&self.colon.emit());
        }
        out.push_str(&self.body.emit(node)?);
        Ok(out)
    }
}
