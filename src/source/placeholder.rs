//! Placeholder primitives: the leaf vocabulary of templates.
//!
//! A template is an ordered sequence of placeholders. Each placeholder
//! knows how to *match* a prefix of the input (recording exactly what it
//! consumed) and how to *emit* text (the recorded match, or a default when
//! the node was never matched). Literal grammar text is handled by
//! [`TextPlaceholder`]; child nodes and node lists by [`FieldPlaceholder`],
//! [`ListFieldPlaceholder`] and [`BodyPlaceholder`]; grammars that zip two
//! parallel lists (argument defaults, dict entries, call arguments,
//! comparison chains) by [`PairedPlaceholder`].
//!
//! Placeholders are stateful: matching stores the consumed text on the
//! placeholder itself, and list placeholders keep one owned separator clone
//! per element so every gap preserves its own formatting.

use regex::Regex;

use crate::ast::{self, node, FieldValue, NodeKind, NodeRef};
use crate::error::{Error, Result};
use crate::source::{advance, node_source, snippet};

/// Rewrites whitespace metapatterns so that line continuations, comments
/// and semicolon separators count as the whitespace they replace in real
/// Python source. Applied once, at placeholder construction.
pub(crate) fn transform_pattern(pattern: &str) -> String {
    let with_ws: Vec<&str> = pattern.split(r"\s*").collect();
    let joined = with_ws.join(r"\s*(\\\s*|#.*\s*)*");
    let with_nl: Vec<&str> = joined.split(r"\n").collect();
    with_nl.join(r"( *#.*\n| *;| *\n)")
}

/// Placeholder for literal grammar text (keywords, punctuation, layout).
#[derive(Debug)]
pub struct TextPlaceholder {
    pattern: String,
    regex: Regex,
    default: String,
    dotall: bool,
    matched: Option<String>,
}

impl TextPlaceholder {
    /// Compiles `pattern` (after the whitespace/comment transformation),
    /// anchored at the start of the input.
    pub fn new(pattern: &str, default: &str) -> TextPlaceholder {
        Self::compile(pattern, default, false)
    }

    /// Like [`TextPlaceholder::new`] but `.` also matches newlines. Used
    /// for string-literal interiors.
    pub fn new_dotall(pattern: &str, default: &str) -> TextPlaceholder {
        Self::compile(pattern, default, true)
    }

    fn compile(pattern: &str, default: &str, dotall: bool) -> TextPlaceholder {
        let transformed = transform_pattern(pattern);
        let anchored = if dotall {
            format!("(?s)^(?:{})", transformed)
        } else {
            format!("^(?:{})", transformed)
        };
        TextPlaceholder {
            pattern: pattern.to_string(),
            regex: Regex::new(&anchored).unwrap(),
            default: default.to_string(),
            dotall,
            matched: None,
        }
    }

    /// Fresh copy with the matched state reset.
    pub fn fresh(&self) -> TextPlaceholder {
        TextPlaceholder {
            pattern: self.pattern.clone(),
            regex: self.regex.clone(),
            default: self.default.clone(),
            dotall: self.dotall,
            matched: None,
        }
    }

    /// Matches the pattern against the start of `text`, records and returns
    /// the consumed prefix.
    pub fn match_prefix(&mut self, text: &str) -> Result<String> {
        match self.regex.find(text) {
            Some(m) => {
                let matched = m.as_str().to_string();
                self.matched = Some(matched.clone());
                Ok(matched)
            }
            None => Err(Error::mismatch(format!(
                "text {:?} does not match pattern {:?}",
                snippet(text),
                self.pattern
            ))),
        }
    }

    /// The recorded match, or the default when nothing was matched yet.
    pub fn emit(&self) -> String {
        match &self.matched {
            Some(text) => text.clone(),
            None => self.default.clone(),
        }
    }

    pub(crate) fn matched(&self) -> Option<&str> {
        self.matched.as_deref()
    }

    pub(crate) fn set_matched(&mut self, text: &str) {
        self.matched = Some(text.to_string());
    }
}

/// Placeholder for a single child-node field, with optional literal text
/// expected before it (`as` before an alias target, `=` before a default).
#[derive(Debug)]
pub struct FieldPlaceholder {
    field_name: &'static str,
    before: Option<TextPlaceholder>,
}

impl FieldPlaceholder {
    pub fn new(field_name: &'static str) -> FieldPlaceholder {
        FieldPlaceholder {
            field_name,
            before: None,
        }
    }

    pub fn with_before(field_name: &'static str, before: TextPlaceholder) -> FieldPlaceholder {
        FieldPlaceholder {
            field_name,
            before: Some(before),
        }
    }

    fn value(&self, node: &NodeRef) -> Result<FieldValue> {
        let value = node.borrow().field(self.field_name);
        if matches!(value, FieldValue::NodeList(_) | FieldValue::IdentList(_)) {
            return Err(Error::spec(format!(
                "field {:?} is a list; use a list-field placeholder",
                self.field_name
            )));
        }
        Ok(value)
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let value = self.value(node)?;
        let (child, ident) = match value {
            FieldValue::Absent => return Ok(String::new()),
            FieldValue::Ident(s) if s.is_empty() => return Ok(String::new()),
            FieldValue::Ident(s) => (None, Some(s)),
            FieldValue::Node(n) => (Some(n), None),
            _ => unreachable!(),
        };

        let mut out = String::new();
        let mut rem = text;
        if let Some(before) = &mut self.before {
            let matched = before.match_prefix(rem)?;
            rem = advance(rem, &matched, true)?;
            out.push_str(&matched);
        }
        let at_left_edge = out.is_empty();
        let mut local = Vec::new();
        let parens = if at_left_edge { shared } else { &mut local };
        let src = match (&child, &ident) {
            (Some(n), _) => node_source(n, Some(rem), parens)?,
            (_, Some(s)) => s.clone(),
            _ => unreachable!(),
        };
        advance(rem, &src, false)?;
        out.push_str(&src);
        Ok(out)
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let value = self.value(node)?;
        let mut out = String::new();
        match value {
            FieldValue::Absent => {}
            FieldValue::Ident(s) if s.is_empty() => {}
            FieldValue::Ident(s) => {
                if let Some(before) = &self.before {
                    out.push_str(&before.emit());
                }
                out.push_str(&s);
            }
            FieldValue::Node(n) => {
                if let Some(before) = &self.before {
                    out.push_str(&before.emit());
                }
                let mut none = Vec::new();
                out.push_str(&node_source(&n, None, &mut none)?);
            }
            _ => unreachable!(),
        }
        Ok(out)
    }
}

/// One element of a list field: either a child node or a raw identifier.
#[derive(Debug, Clone)]
enum ListElem {
    Node(NodeRef),
    Ident(String),
}

fn list_elems(node: &NodeRef, field_name: &str) -> Result<Vec<ListElem>> {
    match node.borrow().field(field_name) {
        FieldValue::NodeList(nodes) => Ok(nodes.into_iter().map(ListElem::Node).collect()),
        FieldValue::IdentList(idents) => Ok(idents.into_iter().map(ListElem::Ident).collect()),
        FieldValue::Absent => Ok(Vec::new()),
        _ => Err(Error::spec(format!(
            "field {:?} is not a list; use a field placeholder",
            field_name
        ))),
    }
}

/// Placeholder for a field holding an ordered list of child nodes.
///
/// Optional `before`/`after` text is expected around every element and
/// `prefix` once before the whole list. Each element gets its own owned
/// clone of the before/after placeholders so per-gap formatting survives.
#[derive(Debug)]
pub struct ListFieldPlaceholder {
    field_name: &'static str,
    before: Option<TextPlaceholder>,
    after: Option<TextPlaceholder>,
    prefix: Option<TextPlaceholder>,
    exclude_first_before: bool,
    matched_before: Vec<TextPlaceholder>,
    matched_after: Vec<TextPlaceholder>,
}

impl ListFieldPlaceholder {
    pub fn new(field_name: &'static str) -> ListFieldPlaceholder {
        ListFieldPlaceholder {
            field_name,
            before: None,
            after: None,
            prefix: None,
            exclude_first_before: false,
            matched_before: Vec::new(),
            matched_after: Vec::new(),
        }
    }

    pub fn with_before(mut self, before: TextPlaceholder) -> ListFieldPlaceholder {
        self.before = Some(before);
        self
    }

    pub fn with_after(mut self, after: TextPlaceholder) -> ListFieldPlaceholder {
        self.after = Some(after);
        self
    }

    pub fn with_prefix(mut self, prefix: TextPlaceholder) -> ListFieldPlaceholder {
        self.prefix = Some(prefix);
        self
    }

    /// A comma-like list: the separator is a `before` on every element
    /// except the first.
    pub fn separated(field_name: &'static str, separator: TextPlaceholder) -> ListFieldPlaceholder {
        ListFieldPlaceholder {
            field_name,
            before: Some(separator),
            after: None,
            prefix: None,
            exclude_first_before: true,
            matched_before: Vec::new(),
            matched_after: Vec::new(),
        }
    }

    fn before_at(&mut self, index: usize) -> &mut TextPlaceholder {
        let proto = self.before.as_ref().expect("before placeholder required");
        while self.matched_before.len() <= index {
            self.matched_before.push(proto.fresh());
        }
        &mut self.matched_before[index]
    }

    fn after_at(&mut self, index: usize) -> &mut TextPlaceholder {
        let proto = self.after.as_ref().expect("after placeholder required");
        while self.matched_after.len() <= index {
            self.matched_after.push(proto.fresh());
        }
        &mut self.matched_after[index]
    }

    fn before_text(&self, index: usize) -> String {
        match self.matched_before.get(index) {
            Some(p) => p.emit(),
            None => self.before.as_ref().map(|p| p.emit()).unwrap_or_default(),
        }
    }

    fn after_text(&self, index: usize) -> String {
        match self.matched_after.get(index) {
            Some(p) => p.emit(),
            None => self.after.as_ref().map(|p| p.emit()).unwrap_or_default(),
        }
    }

    /// Matches one element (with its surrounding before/after text) against
    /// `text`. `real_index` counts non-syntax-free elements only, keeping
    /// separator records stable across re-annotation.
    fn match_elem<'a>(
        &mut self,
        elem: &ListElem,
        real_index: usize,
        text: &'a str,
        shared: &mut Vec<TextPlaceholder>,
        at_left_edge: bool,
    ) -> Result<&'a str> {
        let mut rem = text;
        if let ListElem::Node(n) = elem {
            if n.borrow().is_syntax_free_line() {
                let mut local = Vec::new();
                let src = node_source(n, Some(rem), &mut local)?;
                return advance(rem, &src, false);
            }
        }
        let mut consumed_any = !at_left_edge;
        if self.before.is_some() && !(self.exclude_first_before && real_index == 0) {
            let index = if self.exclude_first_before {
                real_index - 1
            } else {
                real_index
            };
            let matched = self.before_at(index).match_prefix(rem)?;
            rem = advance(rem, &matched, true)?;
            consumed_any = consumed_any || !matched.is_empty();
        }
        let mut local = Vec::new();
        let parens = if consumed_any { &mut local } else { shared };
        let src = match elem {
            ListElem::Node(n) => node_source(n, Some(rem), parens)?,
            ListElem::Ident(s) => s.clone(),
        };
        rem = advance(rem, &src, false)?;
        if self.after.is_some() {
            let matched = self.after_at(real_index).match_prefix(rem)?;
            rem = advance(rem, &matched, true)?;
        }
        Ok(rem)
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let elems = list_elems(node, self.field_name)?;
        let mut rem = text;
        if let Some(prefix) = &mut self.prefix {
            if !elems.is_empty() {
                let matched = prefix.match_prefix(rem)?;
                rem = advance(rem, &matched, true)?;
            }
        }
        let mut real_index = 0usize;
        for elem in &elems {
            let at_left_edge = rem.len() == text.len();
            rem = self.match_elem(elem, real_index, rem, shared, at_left_edge)?;
            if !elem_is_syntax_free(elem) {
                real_index += 1;
            }
        }
        Ok(text[..text.len() - rem.len()].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let elems = list_elems(node, self.field_name)?;
        let mut out = String::new();
        if elems.is_empty() {
            return Ok(out);
        }
        if let Some(prefix) = &self.prefix {
            out.push_str(&prefix.emit());
        }
        let mut real_index = 0usize;
        for elem in &elems {
            if elem_is_syntax_free(elem) {
                if let ListElem::Node(n) = elem {
                    let mut none = Vec::new();
                    out.push_str(&node_source(n, None, &mut none)?);
                }
                continue;
            }
            if self.before.is_some() && !(self.exclude_first_before && real_index == 0) {
                let index = if self.exclude_first_before {
                    real_index - 1
                } else {
                    real_index
                };
                out.push_str(&self.before_text(index));
            }
            match elem {
                ListElem::Node(n) => {
                    let mut none = Vec::new();
                    out.push_str(&node_source(n, None, &mut none)?);
                }
                ListElem::Ident(s) => out.push_str(s),
            }
            if self.after.is_some() {
                out.push_str(&self.after_text(real_index));
            }
            real_index += 1;
        }
        Ok(out)
    }
}

fn elem_is_syntax_free(elem: &ListElem) -> bool {
    match elem {
        ListElem::Node(n) => n.borrow().is_syntax_free_line(),
        ListElem::Ident(_) => false,
    }
}

/// List-field placeholder for block bodies. While matching it also consumes
/// blank and comment-only lines, synthesizing [`NodeKind::SyntaxFreeLine`]
/// nodes and splicing them into the host list so regeneration reproduces
/// them in place.
#[derive(Debug)]
pub struct BodyPlaceholder {
    list: ListFieldPlaceholder,
    match_after: bool,
}

impl BodyPlaceholder {
    pub fn new(list: ListFieldPlaceholder) -> BodyPlaceholder {
        BodyPlaceholder {
            list,
            match_after: false,
        }
    }

    /// Also absorb trailing syntax-free lines that sit shallower than the
    /// block's own indent. Used by `try` bodies before `except`/`finally`.
    pub fn match_trailing(mut self) -> BodyPlaceholder {
        self.match_after = true;
        self
    }

    /// Consumes one syntax-free line from the front of `text`, returning
    /// the annotated pseudo-node and the rest of the input.
    pub(crate) fn match_syntax_free_line<'a>(text: &'a str) -> Result<(NodeRef, &'a str)> {
        let newline = text
            .find('\n')
            .ok_or_else(|| Error::mismatch("expected a line ending"))?;
        let line = &text[..newline + 1];
        let sfl = node(NodeKind::SyntaxFreeLine {
            comment: None,
            col_offset: 0,
            comment_indent: 1,
        });
        sfl.borrow_mut().set_from_src_line(line)?;
        let mut none = Vec::new();
        node_source(&sfl, Some(line), &mut none)?;
        Ok((sfl, &text[newline + 1..]))
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        _shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let elems = list_elems(node, self.list.field_name)?;
        if elems.is_empty() {
            return Ok(String::new());
        }
        let mut rem = text;
        if let Some(prefix) = &mut self.list.prefix {
            let matched = prefix.match_prefix(rem)?;
            rem = advance(rem, &matched, true)?;
        }
        let mut new_list: Vec<NodeRef> = Vec::new();
        let mut indent_level = String::new();
        let mut real_index = 0usize;
        let mut local = Vec::new();
        for elem in &elems {
            if !elem_is_syntax_free(elem) {
                while ast::starts_with_syntax_free_line(rem) {
                    let (sfl, rest) = Self::match_syntax_free_line(rem)?;
                    new_list.push(sfl);
                    rem = rest;
                }
            }
            if let ListElem::Node(n) = elem {
                new_list.push(n.clone());
            }
            indent_level = " ".repeat(rem.len() - rem.trim_start().len());
            rem = self.list.match_elem(elem, real_index, rem, &mut local, false)?;
            if !elem_is_syntax_free(elem) {
                real_index += 1;
            }
        }
        while ast::starts_with_syntax_free_line(rem)
            && (rem.starts_with(indent_level.as_str()) || self.match_after)
        {
            let (sfl, rest) = Self::match_syntax_free_line(rem)?;
            new_list.push(sfl);
            rem = rest;
        }
        node.borrow_mut()
            .set_node_list(self.list.field_name, new_list);
        Ok(text[..text.len() - rem.len()].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        self.list.emit(node)
    }
}

/// Which pairing of parallel fields a [`PairedPlaceholder`] walks.
#[derive(Debug, Clone, Copy)]
pub enum PairKind {
    /// `arguments.args` zipped with `arguments.defaults`: plain args first,
    /// then `name=default` pairs.
    ArgsDefaults,
    /// `Dict.keys` zipped with `Dict.values` as `key: value` entries.
    KeysValues,
    /// `Call.args` then `*starargs` then keyword arguments.
    ArgsKeywords,
    /// `Compare.ops` interleaved with `Compare.comparators`.
    OpsComparators,
}

/// One step of the zipped walk.
#[derive(Debug)]
enum PairPiece {
    Node(NodeRef),
    ArgSep,
    KwargSep,
    StarSep,
}

/// Composite placeholder enumerating a pairing of two parallel lists with
/// two different separators, cloning a fresh separator per gap.
#[derive(Debug)]
pub struct PairedPlaceholder {
    kind: PairKind,
    arg_sep: TextPlaceholder,
    kwarg_sep: TextPlaceholder,
    star_sep: Option<TextPlaceholder>,
    matched_arg_seps: Vec<TextPlaceholder>,
    matched_kwarg_seps: Vec<TextPlaceholder>,
}

impl PairedPlaceholder {
    pub fn new(
        kind: PairKind,
        arg_sep: TextPlaceholder,
        kwarg_sep: TextPlaceholder,
    ) -> PairedPlaceholder {
        let star_sep = match kind {
            PairKind::ArgsKeywords => Some(TextPlaceholder::new(r"\s*,?\s*\*", ", *")),
            _ => None,
        };
        PairedPlaceholder {
            kind,
            arg_sep,
            kwarg_sep,
            star_sep,
            matched_arg_seps: Vec::new(),
            matched_kwarg_seps: Vec::new(),
        }
    }

    fn pieces(&self, node: &NodeRef) -> Result<Vec<PairPiece>> {
        let node = node.borrow();
        let (plain, pairs): (Vec<NodeRef>, Vec<(NodeRef, NodeRef)>) =
            match (self.kind, &node.kind) {
                (PairKind::ArgsDefaults, NodeKind::Arguments { args, defaults, .. }) => {
                    let split = args.len() - defaults.len();
                    let plain = args[..split].to_vec();
                    let pairs = args[split..]
                        .iter()
                        .cloned()
                        .zip(defaults.iter().cloned())
                        .collect();
                    (plain, pairs)
                }
                (PairKind::KeysValues, NodeKind::Dict { keys, values }) => {
                    let pairs = keys.iter().cloned().zip(values.iter().cloned()).collect();
                    (Vec::new(), pairs)
                }
                (
                    PairKind::OpsComparators,
                    NodeKind::Compare {
                        ops, comparators, ..
                    },
                ) => {
                    let pairs = ops
                        .iter()
                        .cloned()
                        .zip(comparators.iter().cloned())
                        .collect();
                    (Vec::new(), pairs)
                }
                (
                    PairKind::ArgsKeywords,
                    NodeKind::Call {
                        args,
                        keywords,
                        starargs,
                        ..
                    },
                ) => {
                    // Keywords walk as whole nodes; the keyword template
                    // handles its own `name=value` interior.
                    let mut pieces = Vec::new();
                    for (i, arg) in args.iter().enumerate() {
                        pieces.push(PairPiece::Node(arg.clone()));
                        if i != args.len() - 1 || !keywords.is_empty() {
                            pieces.push(PairPiece::ArgSep);
                        }
                    }
                    if let Some(star) = starargs {
                        pieces.push(PairPiece::StarSep);
                        pieces.push(PairPiece::Node(star.clone()));
                        if !keywords.is_empty() {
                            pieces.push(PairPiece::ArgSep);
                        }
                    }
                    for (i, kw) in keywords.iter().enumerate() {
                        pieces.push(PairPiece::Node(kw.clone()));
                        if i != keywords.len() - 1 {
                            pieces.push(PairPiece::ArgSep);
                        }
                    }
                    return Ok(pieces);
                }
                _ => {
                    return Err(Error::spec(format!(
                        "paired placeholder {:?} applied to node kind {}",
                        self.kind,
                        node.kind_name()
                    )))
                }
            };
        let mut pieces = Vec::new();
        for (i, arg) in plain.iter().enumerate() {
            pieces.push(PairPiece::Node(arg.clone()));
            if i != plain.len() - 1 || !pairs.is_empty() {
                pieces.push(PairPiece::ArgSep);
            }
        }
        for (i, (key, value)) in pairs.iter().enumerate() {
            pieces.push(PairPiece::Node(key.clone()));
            pieces.push(PairPiece::KwargSep);
            pieces.push(PairPiece::Node(value.clone()));
            if i != pairs.len() - 1 {
                pieces.push(PairPiece::ArgSep);
            }
        }
        Ok(pieces)
    }

    fn arg_sep_at(&mut self, index: usize) -> &mut TextPlaceholder {
        while self.matched_arg_seps.len() <= index {
            self.matched_arg_seps.push(self.arg_sep.fresh());
        }
        &mut self.matched_arg_seps[index]
    }

    fn kwarg_sep_at(&mut self, index: usize) -> &mut TextPlaceholder {
        while self.matched_kwarg_seps.len() <= index {
            self.matched_kwarg_seps.push(self.kwarg_sep.fresh());
        }
        &mut self.matched_kwarg_seps[index]
    }

    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        let pieces = self.pieces(node)?;
        let mut rem = text;
        let mut arg_index = 0usize;
        let mut kwarg_index = 0usize;
        for piece in &pieces {
            match piece {
                PairPiece::Node(n) => {
                    let at_left_edge = rem.len() == text.len();
                    let mut local = Vec::new();
                    let parens = if at_left_edge { &mut *shared } else { &mut local };
                    let src = node_source(n, Some(rem), parens)?;
                    rem = advance(rem, &src, false)?;
                }
                PairPiece::ArgSep => {
                    let matched = self.arg_sep_at(arg_index).match_prefix(rem)?;
                    rem = advance(rem, &matched, true)?;
                    arg_index += 1;
                }
                PairPiece::KwargSep => {
                    let matched = self.kwarg_sep_at(kwarg_index).match_prefix(rem)?;
                    rem = advance(rem, &matched, true)?;
                    kwarg_index += 1;
                }
                PairPiece::StarSep => {
                    let matched = self
                        .star_sep
                        .as_mut()
                        .expect("star separator only exists for call pairings")
                        .match_prefix(rem)?;
                    rem = advance(rem, &matched, true)?;
                }
            }
        }
        Ok(text[..text.len() - rem.len()].to_string())
    }

    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        let pieces = self.pieces(node)?;
        let mut out = String::new();
        let mut arg_index = 0usize;
        let mut kwarg_index = 0usize;
        for piece in &pieces {
            match piece {
                PairPiece::Node(n) => {
                    let mut none = Vec::new();
                    out.push_str(&node_source(n, None, &mut none)?);
                }
                PairPiece::ArgSep => {
                    out.push_str(&match self.matched_arg_seps.get(arg_index) {
                        Some(p) => p.emit(),
                        None => self.arg_sep.emit(),
                    });
                    arg_index += 1;
                }
                PairPiece::KwargSep => {
                    out.push_str(&match self.matched_kwarg_seps.get(kwarg_index) {
                        Some(p) => p.emit(),
                        None => self.kwarg_sep.emit(),
                    });
                    kwarg_index += 1;
                }
                PairPiece::StarSep => {
                    out.push_str(
                        &self
                            .star_sep
                            .as_ref()
                            .expect("star separator only exists for call pairings")
                            .emit(),
                    );
                }
            }
        }
        Ok(out)
    }
}

/// The placeholder sum type templates are made of.
#[derive(Debug)]
pub enum Placeholder {
    Text(TextPlaceholder),
    Field(FieldPlaceholder),
    ListField(ListFieldPlaceholder),
    Body(BodyPlaceholder),
    Paired(PairedPlaceholder),
}

impl Placeholder {
    pub(crate) fn is_text(&self) -> bool {
        matches!(self, Placeholder::Text(_))
    }

    /// Matches a prefix of `text` and returns exactly what was consumed.
    pub(crate) fn match_text(
        &mut self,
        node: &NodeRef,
        text: &str,
        shared: &mut Vec<TextPlaceholder>,
    ) -> Result<String> {
        match self {
            Placeholder::Text(p) => p.match_prefix(text),
            Placeholder::Field(p) => p.match_text(node, text, shared),
            Placeholder::ListField(p) => p.match_text(node, text, shared),
            Placeholder::Body(p) => p.match_text(node, text, shared),
            Placeholder::Paired(p) => p.match_text(node, text, shared),
        }
    }

    /// Replays the recorded match, falling back to defaults where the node
    /// (or an element) was never matched.
    pub(crate) fn emit(&mut self, node: &NodeRef) -> Result<String> {
        match self {
            Placeholder::Text(p) => Ok(p.emit()),
            Placeholder::Field(p) => p.emit(node),
            Placeholder::ListField(p) => p.emit(node),
            Placeholder::Body(p) => p.emit(node),
            Placeholder::Paired(p) => p.emit(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;
    use crate::error::Error;

    const DEFAULT_TEXT: &str = "default";

    #[test]
    fn text_matches_simple_text() {
        let mut placeholder = TextPlaceholder::new(r".*", DEFAULT_TEXT);
        assert_eq!(placeholder.match_prefix("to match").unwrap(), "to match");
        assert_eq!(placeholder.emit(), "to match");
    }

    #[test]
    fn text_matches_a_prefix() {
        let mut placeholder = TextPlaceholder::new(r"def \(", DEFAULT_TEXT);
        assert_eq!(placeholder.match_prefix("def (foo").unwrap(), "def (");
        assert_eq!(placeholder.emit(), "def (");
    }

    #[test]
    fn text_without_match_emits_default() {
        let placeholder = TextPlaceholder::new(r".*", DEFAULT_TEXT);
        assert_eq!(placeholder.emit(), DEFAULT_TEXT);
    }

    #[test]
    fn text_that_cannot_match_is_an_error() {
        let mut placeholder = TextPlaceholder::new("doesnt match", DEFAULT_TEXT);
        assert!(matches!(
            placeholder.match_prefix("to match"),
            Err(Error::TemplateMismatch(_))
        ));
    }

    #[test]
    fn whitespace_matches_plain_whitespace() {
        let text = "  \t \n  ";
        let mut placeholder = TextPlaceholder::new(r"\s*", "");
        assert_eq!(placeholder.match_prefix(text).unwrap(), text);
    }

    #[test]
    fn whitespace_matches_line_continuations() {
        let text = "  \t \n \\\n  \\\n  ";
        let mut placeholder = TextPlaceholder::new(r"\s*", "");
        assert_eq!(placeholder.match_prefix(text).unwrap(), text);
    }

    #[test]
    fn whitespace_matches_comments() {
        let text = "  \t # abc\n  ";
        let mut placeholder = TextPlaceholder::new(r"\s*", "");
        assert_eq!(placeholder.match_prefix(text).unwrap(), text);
    }

    #[test]
    fn expected_linebreak_accepts_semicolon() {
        let mut placeholder = TextPlaceholder::new(r"pdb\npdb", "");
        assert_eq!(placeholder.match_prefix("pdb;pdb").unwrap(), "pdb;pdb");
    }

    #[test]
    fn expected_linebreak_accepts_trailing_comment() {
        let text = "pdb  # A comment\n";
        let mut placeholder = TextPlaceholder::new(r"pdb\n", "");
        assert_eq!(placeholder.match_prefix(text).unwrap(), text);
    }

    #[test]
    fn fresh_copies_reset_matched_state() {
        let mut placeholder = TextPlaceholder::new(r".*", DEFAULT_TEXT);
        placeholder.match_prefix("recorded").unwrap();
        assert_eq!(placeholder.fresh().emit(), DEFAULT_TEXT);
    }

    #[test]
    fn field_matches_an_identifier() {
        let node = build::name("foobar");
        let mut placeholder = FieldPlaceholder::new("id");
        let mut shared = Vec::new();
        let matched = placeholder.match_text(&node, "foobar", &mut shared).unwrap();
        assert_eq!(matched, "foobar");
        assert_eq!(placeholder.emit(&node).unwrap(), "foobar");
    }

    #[test]
    fn field_consumes_its_before_text() {
        let node = build::name("bar");
        let mut placeholder =
            FieldPlaceholder::with_before("id", TextPlaceholder::new("foo", "foo"));
        let mut shared = Vec::new();
        let matched = placeholder
            .match_text(&node, "foobarbaz", &mut shared)
            .unwrap();
        assert_eq!(matched, "foobar");
        assert_eq!(placeholder.emit(&node).unwrap(), "foobar");
    }

    #[test]
    fn field_rejects_list_fields() {
        let module = build::module(vec![build::pass_stmt()]).unwrap();
        let mut placeholder = FieldPlaceholder::new("body");
        let mut shared = Vec::new();
        assert!(matches!(
            placeholder.match_text(&module, "pass\n", &mut shared),
            Err(Error::TemplateSpec(_))
        ));
    }

    #[test]
    fn list_field_matches_each_element() {
        let module = build::module(vec![
            build::expr(build::name("foobar")).unwrap(),
            build::expr(build::name("baz")).unwrap(),
        ])
        .unwrap();
        let mut placeholder = ListFieldPlaceholder::new("body");
        let mut shared = Vec::new();
        let matched = placeholder
            .match_text(&module, "foobar\nbaz\n", &mut shared)
            .unwrap();
        assert_eq!(matched, "foobar\nbaz\n");
        assert_eq!(placeholder.emit(&module).unwrap(), "foobar\nbaz\n");
    }

    #[test]
    fn list_field_rejects_scalar_fields() {
        let node = build::name("foo");
        let mut placeholder = ListFieldPlaceholder::new("id");
        let mut shared = Vec::new();
        assert!(matches!(
            placeholder.match_text(&node, "foo", &mut shared),
            Err(Error::TemplateSpec(_))
        ));
    }

    #[test]
    fn list_field_reports_mismatching_elements() {
        let module = build::module(vec![
            build::expr(build::name("foobar")).unwrap(),
            build::expr(build::name("baz")).unwrap(),
        ])
        .unwrap();
        let mut placeholder = ListFieldPlaceholder::new("body");
        let mut shared = Vec::new();
        assert!(placeholder
            .match_text(&module, "no match here", &mut shared)
            .is_err());
    }

    #[test]
    fn body_synthesizes_blank_lines_into_the_host_list() {
        let module = build::module(vec![
            build::expr(build::name("foobar")).unwrap(),
            build::expr(build::name("a")).unwrap(),
        ])
        .unwrap();
        let mut placeholder = BodyPlaceholder::new(ListFieldPlaceholder::new("body"));
        let mut shared = Vec::new();
        let matched = placeholder
            .match_text(&module, "foobar\n\na\n", &mut shared)
            .unwrap();
        assert_eq!(matched, "foobar\n\na\n");
        assert_eq!(placeholder.emit(&module).unwrap(), "foobar\n\na\n");
        let body_len = match &module.borrow().kind {
            NodeKind::Module { body } => body.len(),
            _ => unreachable!(),
        };
        assert_eq!(body_len, 3);
    }

    #[test]
    fn body_synthesizes_comment_lines_into_the_host_list() {
        let module = build::module(vec![
            build::expr(build::name("foobar")).unwrap(),
            build::expr(build::name("a")).unwrap(),
        ])
        .unwrap();
        let mut placeholder = BodyPlaceholder::new(ListFieldPlaceholder::new("body"));
        let mut shared = Vec::new();
        let matched = placeholder
            .match_text(&module, "foobar\n#blah\na\n", &mut shared)
            .unwrap();
        assert_eq!(matched, "foobar\n#blah\na\n");
        assert_eq!(placeholder.emit(&module).unwrap(), "foobar\n#blah\na\n");
    }

    #[test]
    fn pattern_transformation_is_applied_once() {
        assert_eq!(
            transform_pattern(r"a\s*b"),
            r"a\s*(\\\s*|#.*\s*)*b"
        );
        assert_eq!(transform_pattern(r"a\nb"), r"a( *#.*\n| *;| *\n)b");
    }
}
