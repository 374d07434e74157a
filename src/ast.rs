//! AST node model for Python 2 source trees.
//!
//! Nodes are produced by the builder facade in [`crate::build`] (or by any
//! upstream parser that targets this shape) and annotated in place by the
//! matching engine in [`crate::source`]. A node is a tagged [`NodeKind`]
//! plus an optional attached matcher recording how the node was matched
//! against source text. Trees are built from shared mutable references
//! ([`NodeRef`]); the engine never deep-copies nodes while matching.
//!
//! Field access is name-keyed: templates refer to child fields by the names
//! Python's own AST uses (`body`, `targets`, `orelse`, ...), and
//! [`Node::field`] resolves them to a [`FieldValue`]. Asking a node for a
//! field its kind does not have is a programmer error and panics.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::source::matcher::Matcher;

/// Shared mutable handle to a node.
pub type NodeRef = Rc<RefCell<Node>>;

/// Wraps a [`NodeKind`] into a fresh [`NodeRef`] with no matcher attached.
pub fn node(kind: NodeKind) -> NodeRef {
    Rc::new(RefCell::new(Node { kind, matcher: None }))
}

/// Numeric payload of a `Num` node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum NumVal {
    Int(i64),
    Float(f64),
}

impl std::fmt::Display for NumVal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumVal::Int(i) => write!(f, "{}", i),
            // Whole floats keep their decimal point, as Python prints them.
            NumVal::Float(x) if x.is_finite() && *x == x.trunc() => write!(f, "{:.1}", x),
            NumVal::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Expression context tag. Matching never consults it; the builder facade
/// maintains it the way Python's own AST would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CtxKind {
    Load,
    Store,
    Del,
    Param,
}

impl CtxKind {
    /// Resolves a textual ctx tag. Unknown tags are an [`Error::InvalidCtx`].
    pub fn from_tag(tag: &str) -> Result<CtxKind> {
        match tag {
            "load" => Ok(CtxKind::Load),
            "store" => Ok(CtxKind::Store),
            "del" | "delete" => Ok(CtxKind::Del),
            "param" => Ok(CtxKind::Param),
            other => Err(Error::InvalidCtx(format!(
                "ctx tag {:?} is not one of load/store/del/param",
                other
            ))),
        }
    }
}

/// One node of the tree: its syntactic kind plus the matcher attached once
/// the node has been matched against (or rendered as) source text.
#[derive(Debug, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(skip)]
    pub matcher: Option<Matcher>,
}

/// Exhaustive enumeration of the Python 2 syntactic categories the engine
/// understands, including the synthesized syntax-free line pseudo-statement.
#[derive(Debug, Serialize)]
pub enum NodeKind {
    // Module
    Module {
        body: Vec<NodeRef>,
    },

    // Statements
    FunctionDef {
        name: String,
        args: NodeRef,
        body: Vec<NodeRef>,
        decorator_list: Vec<NodeRef>,
    },
    ClassDef {
        name: String,
        bases: Vec<NodeRef>,
        body: Vec<NodeRef>,
        decorator_list: Vec<NodeRef>,
    },
    Return {
        value: Option<NodeRef>,
    },
    Delete {
        targets: Vec<NodeRef>,
    },
    Assign {
        targets: Vec<NodeRef>,
        value: NodeRef,
    },
    AugAssign {
        target: NodeRef,
        op: NodeRef,
        value: NodeRef,
    },
    Print {
        dest: Option<NodeRef>,
        values: Vec<NodeRef>,
    },
    For {
        target: NodeRef,
        iter: NodeRef,
        body: Vec<NodeRef>,
        orelse: Vec<NodeRef>,
    },
    While {
        test: NodeRef,
        body: Vec<NodeRef>,
    },
    If {
        test: NodeRef,
        body: Vec<NodeRef>,
        orelse: Vec<NodeRef>,
    },
    With {
        context_expr: NodeRef,
        optional_vars: Option<NodeRef>,
        body: Vec<NodeRef>,
    },
    Raise {
        type_: Option<NodeRef>,
    },
    TryExcept {
        body: Vec<NodeRef>,
        handlers: Vec<NodeRef>,
        orelse: Vec<NodeRef>,
    },
    TryFinally {
        body: Vec<NodeRef>,
        finalbody: Vec<NodeRef>,
    },
    Assert {
        test: NodeRef,
        msg: Option<NodeRef>,
    },
    Import {
        names: Vec<NodeRef>,
    },
    ImportFrom {
        module: String,
        names: Vec<NodeRef>,
        level: usize,
    },
    Global {
        names: Vec<String>,
    },
    Expr {
        value: NodeRef,
    },
    Pass,
    Break,
    Continue,
    /// Blank line or pure comment line, synthesized while matching block
    /// bodies so regeneration reproduces it in place.
    SyntaxFreeLine {
        comment: Option<String>,
        col_offset: usize,
        comment_indent: usize,
    },

    // Expressions
    BoolOp {
        op: NodeRef,
        values: Vec<NodeRef>,
    },
    BinOp {
        left: NodeRef,
        op: NodeRef,
        right: NodeRef,
    },
    UnaryOp {
        op: NodeRef,
        operand: NodeRef,
    },
    Lambda {
        args: NodeRef,
        body: NodeRef,
    },
    IfExp {
        test: NodeRef,
        body: NodeRef,
        orelse: NodeRef,
    },
    Dict {
        keys: Vec<NodeRef>,
        values: Vec<NodeRef>,
    },
    Set {
        elts: Vec<NodeRef>,
    },
    ListComp {
        elt: NodeRef,
        generators: Vec<NodeRef>,
    },
    SetComp {
        elt: NodeRef,
        generators: Vec<NodeRef>,
    },
    DictComp {
        key: NodeRef,
        value: NodeRef,
        generators: Vec<NodeRef>,
    },
    GeneratorExp {
        elt: NodeRef,
        generators: Vec<NodeRef>,
    },
    Yield {
        value: Option<NodeRef>,
    },
    Compare {
        left: NodeRef,
        ops: Vec<NodeRef>,
        comparators: Vec<NodeRef>,
    },
    Call {
        func: NodeRef,
        args: Vec<NodeRef>,
        keywords: Vec<NodeRef>,
        starargs: Option<NodeRef>,
        kwargs: Option<NodeRef>,
    },
    Num {
        n: NumVal,
    },
    Str {
        s: String,
    },
    Attribute {
        value: NodeRef,
        attr: String,
        ctx: CtxKind,
    },
    Subscript {
        value: NodeRef,
        slice: NodeRef,
        ctx: CtxKind,
    },
    Name {
        id: String,
        ctx: CtxKind,
    },
    List {
        elts: Vec<NodeRef>,
        ctx: CtxKind,
    },
    Tuple {
        elts: Vec<NodeRef>,
        ctx: CtxKind,
    },

    // Slices
    Slice {
        lower: Option<NodeRef>,
        upper: Option<NodeRef>,
        step: Option<NodeRef>,
    },
    Index {
        value: NodeRef,
    },

    // Helper kinds
    Arguments {
        args: Vec<NodeRef>,
        vararg: Option<String>,
        kwarg: Option<String>,
        defaults: Vec<NodeRef>,
    },
    Keyword {
        arg: String,
        value: NodeRef,
    },
    Alias {
        name: String,
        asname: Option<String>,
    },
    Comprehension {
        target: NodeRef,
        iter: NodeRef,
        ifs: Vec<NodeRef>,
    },
    ExceptHandler {
        type_: Option<NodeRef>,
        name: Option<String>,
        body: Vec<NodeRef>,
    },

    // Operator tags
    Add,
    Sub,
    Mult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    And,
    Or,
    Invert,
    Not,
    UAdd,
    USub,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

/// The value of a named field, as seen by the matching engine.
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Field exists on the kind but holds nothing (`None` upstream).
    Absent,
    /// Scalar identifier-like value; renders as itself.
    Ident(String),
    /// A single child node.
    Node(NodeRef),
    /// An ordered list of child nodes.
    NodeList(Vec<NodeRef>),
    /// An ordered list of raw identifiers (e.g. `global a, b`).
    IdentList(Vec<String>),
}

fn opt_node(value: &Option<NodeRef>) -> FieldValue {
    match value {
        Some(n) => FieldValue::Node(n.clone()),
        None => FieldValue::Absent,
    }
}

fn opt_ident(value: &Option<String>) -> FieldValue {
    match value {
        Some(s) => FieldValue::Ident(s.clone()),
        None => FieldValue::Absent,
    }
}

impl Node {
    /// Short tag name of the node's kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        use NodeKind::*;
        match &self.kind {
            Module { .. } => "Module",
            FunctionDef { .. } => "FunctionDef",
            ClassDef { .. } => "ClassDef",
            Return { .. } => "Return",
            Delete { .. } => "Delete",
            Assign { .. } => "Assign",
            AugAssign { .. } => "AugAssign",
            Print { .. } => "Print",
            For { .. } => "For",
            While { .. } => "While",
            If { .. } => "If",
            With { .. } => "With",
            Raise { .. } => "Raise",
            TryExcept { .. } => "TryExcept",
            TryFinally { .. } => "TryFinally",
            Assert { .. } => "Assert",
            Import { .. } => "Import",
            ImportFrom { .. } => "ImportFrom",
            Global { .. } => "Global",
            Expr { .. } => "Expr",
            Pass => "Pass",
            Break => "Break",
            Continue => "Continue",
            SyntaxFreeLine { .. } => "SyntaxFreeLine",
            BoolOp { .. } => "BoolOp",
            BinOp { .. } => "BinOp",
            UnaryOp { .. } => "UnaryOp",
            Lambda { .. } => "Lambda",
            IfExp { .. } => "IfExp",
            Dict { .. } => "Dict",
            Set { .. } => "Set",
            ListComp { .. } => "ListComp",
            SetComp { .. } => "SetComp",
            DictComp { .. } => "DictComp",
            GeneratorExp { .. } => "GeneratorExp",
            Yield { .. } => "Yield",
            Compare { .. } => "Compare",
            Call { .. } => "Call",
            Num { .. } => "Num",
            Str { .. } => "Str",
            Attribute { .. } => "Attribute",
            Subscript { .. } => "Subscript",
            Name { .. } => "Name",
            List { .. } => "List",
            Tuple { .. } => "Tuple",
            Slice { .. } => "Slice",
            Index { .. } => "Index",
            Arguments { .. } => "arguments",
            Keyword { .. } => "keyword",
            Alias { .. } => "alias",
            Comprehension { .. } => "comprehension",
            ExceptHandler { .. } => "ExceptHandler",
            Add => "Add",
            Sub => "Sub",
            Mult => "Mult",
            Div => "Div",
            FloorDiv => "FloorDiv",
            Mod => "Mod",
            Pow => "Pow",
            LShift => "LShift",
            RShift => "RShift",
            BitOr => "BitOr",
            BitXor => "BitXor",
            BitAnd => "BitAnd",
            And => "And",
            Or => "Or",
            Invert => "Invert",
            Not => "Not",
            UAdd => "UAdd",
            USub => "USub",
            Eq => "Eq",
            NotEq => "NotEq",
            Lt => "Lt",
            LtE => "LtE",
            Gt => "Gt",
            GtE => "GtE",
            Is => "Is",
            IsNot => "IsNot",
            In => "In",
            NotIn => "NotIn",
        }
    }

    /// Whether the node is a statement. Statements carry indentation and may
    /// need a module reference to render from scratch.
    pub fn is_stmt(&self) -> bool {
        use NodeKind::*;
        matches!(
            self.kind,
            FunctionDef { .. }
                | ClassDef { .. }
                | Return { .. }
                | Delete { .. }
                | Assign { .. }
                | AugAssign { .. }
                | Print { .. }
                | For { .. }
                | While { .. }
                | If { .. }
                | With { .. }
                | Raise { .. }
                | TryExcept { .. }
                | TryFinally { .. }
                | Assert { .. }
                | Import { .. }
                | ImportFrom { .. }
                | Global { .. }
                | Expr { .. }
                | Pass
                | Break
                | Continue
                | SyntaxFreeLine { .. }
        )
    }

    /// Whether the node is a synthesized syntax-free line.
    pub fn is_syntax_free_line(&self) -> bool {
        matches!(self.kind, NodeKind::SyntaxFreeLine { .. })
    }

    /// Looks up a child field by the name Python's AST uses for it.
    ///
    /// Panics when the kind has no field of that name; templates only name
    /// fields their kind actually carries.
    pub fn field(&self, name: &str) -> FieldValue {
        use NodeKind::*;
        let value = match (&self.kind, name) {
            (Module { body }, "body") => Some(FieldValue::NodeList(body.clone())),

            (FunctionDef { name: n, .. }, "name") => Some(FieldValue::Ident(n.clone())),
            (FunctionDef { args, .. }, "args") => Some(FieldValue::Node(args.clone())),
            (FunctionDef { body, .. }, "body") => Some(FieldValue::NodeList(body.clone())),
            (FunctionDef { decorator_list, .. }, "decorator_list") => {
                Some(FieldValue::NodeList(decorator_list.clone()))
            }

            (ClassDef { name: n, .. }, "name") => Some(FieldValue::Ident(n.clone())),
            (ClassDef { bases, .. }, "bases") => Some(FieldValue::NodeList(bases.clone())),
            (ClassDef { body, .. }, "body") => Some(FieldValue::NodeList(body.clone())),
            (ClassDef { decorator_list, .. }, "decorator_list") => {
                Some(FieldValue::NodeList(decorator_list.clone()))
            }

            (Return { value }, "value") => Some(opt_node(value)),
            (Delete { targets }, "targets") => Some(FieldValue::NodeList(targets.clone())),

            (Assign { targets, .. }, "targets") => Some(FieldValue::NodeList(targets.clone())),
            (Assign { value, .. }, "value") => Some(FieldValue::Node(value.clone())),

            (AugAssign { target, .. }, "target") => Some(FieldValue::Node(target.clone())),
            (AugAssign { op, .. }, "op") => Some(FieldValue::Node(op.clone())),
            (AugAssign { value, .. }, "value") => Some(FieldValue::Node(value.clone())),

            (Print { dest, .. }, "dest") => Some(opt_node(dest)),
            (Print { values, .. }, "values") => Some(FieldValue::NodeList(values.clone())),

            (For { target, .. }, "target") => Some(FieldValue::Node(target.clone())),
            (For { iter, .. }, "iter") => Some(FieldValue::Node(iter.clone())),
            (For { body, .. }, "body") => Some(FieldValue::NodeList(body.clone())),
            (For { orelse, .. }, "orelse") => Some(FieldValue::NodeList(orelse.clone())),

            (While { test, .. }, "test") => Some(FieldValue::Node(test.clone())),
            (While { body, .. }, "body") => Some(FieldValue::NodeList(body.clone())),

            (If { test, .. }, "test") => Some(FieldValue::Node(test.clone())),
            (If { body, .. }, "body") => Some(FieldValue::NodeList(body.clone())),
            (If { orelse, .. }, "orelse") => Some(FieldValue::NodeList(orelse.clone())),

            (With { context_expr, .. }, "context_expr") => {
                Some(FieldValue::Node(context_expr.clone()))
            }
            (With { optional_vars, .. }, "optional_vars") => Some(opt_node(optional_vars)),
            (With { body, .. }, "body") => Some(FieldValue::NodeList(body.clone())),

            (Raise { type_ }, "type") => Some(opt_node(type_)),

            (TryExcept { body, .. }, "body") => Some(FieldValue::NodeList(body.clone())),
            (TryExcept { handlers, .. }, "handlers") => {
                Some(FieldValue::NodeList(handlers.clone()))
            }
            (TryExcept { orelse, .. }, "orelse") => Some(FieldValue::NodeList(orelse.clone())),

            (TryFinally { body, .. }, "body") => Some(FieldValue::NodeList(body.clone())),
            (TryFinally { finalbody, .. }, "finalbody") => {
                Some(FieldValue::NodeList(finalbody.clone()))
            }

            (Assert { test, .. }, "test") => Some(FieldValue::Node(test.clone())),
            (Assert { msg, .. }, "msg") => Some(opt_node(msg)),

            (Import { names }, "names") => Some(FieldValue::NodeList(names.clone())),
            (ImportFrom { module, .. }, "module") => Some(FieldValue::Ident(module.clone())),
            (ImportFrom { names, .. }, "names") => Some(FieldValue::NodeList(names.clone())),

            (Global { names }, "names") => Some(FieldValue::IdentList(names.clone())),

            (Expr { value }, "value") => Some(FieldValue::Node(value.clone())),

            (SyntaxFreeLine { .. }, "full_line") => Some(FieldValue::Ident(self.full_line())),

            (BoolOp { op, .. }, "op") => Some(FieldValue::Node(op.clone())),
            (BoolOp { values, .. }, "values") => Some(FieldValue::NodeList(values.clone())),

            (BinOp { left, .. }, "left") => Some(FieldValue::Node(left.clone())),
            (BinOp { op, .. }, "op") => Some(FieldValue::Node(op.clone())),
            (BinOp { right, .. }, "right") => Some(FieldValue::Node(right.clone())),

            (UnaryOp { op, .. }, "op") => Some(FieldValue::Node(op.clone())),
            (UnaryOp { operand, .. }, "operand") => Some(FieldValue::Node(operand.clone())),

            (Lambda { args, .. }, "args") => Some(FieldValue::Node(args.clone())),
            (Lambda { body, .. }, "body") => Some(FieldValue::Node(body.clone())),

            (IfExp { test, .. }, "test") => Some(FieldValue::Node(test.clone())),
            (IfExp { body, .. }, "body") => Some(FieldValue::Node(body.clone())),
            (IfExp { orelse, .. }, "orelse") => Some(FieldValue::Node(orelse.clone())),

            (Dict { keys, .. }, "keys") => Some(FieldValue::NodeList(keys.clone())),
            (Dict { values, .. }, "values") => Some(FieldValue::NodeList(values.clone())),

            (Set { elts }, "elts") => Some(FieldValue::NodeList(elts.clone())),

            (ListComp { elt, .. }, "elt") => Some(FieldValue::Node(elt.clone())),
            (ListComp { generators, .. }, "generators") => {
                Some(FieldValue::NodeList(generators.clone()))
            }
            (SetComp { elt, .. }, "elt") => Some(FieldValue::Node(elt.clone())),
            (SetComp { generators, .. }, "generators") => {
                Some(FieldValue::NodeList(generators.clone()))
            }
            (DictComp { key, .. }, "key") => Some(FieldValue::Node(key.clone())),
            (DictComp { value, .. }, "value") => Some(FieldValue::Node(value.clone())),
            (DictComp { generators, .. }, "generators") => {
                Some(FieldValue::NodeList(generators.clone()))
            }
            (GeneratorExp { elt, .. }, "elt") => Some(FieldValue::Node(elt.clone())),
            (GeneratorExp { generators, .. }, "generators") => {
                Some(FieldValue::NodeList(generators.clone()))
            }

            (Yield { value }, "value") => Some(opt_node(value)),

            (Compare { left, .. }, "left") => Some(FieldValue::Node(left.clone())),
            (Compare { ops, .. }, "ops") => Some(FieldValue::NodeList(ops.clone())),
            (Compare { comparators, .. }, "comparators") => {
                Some(FieldValue::NodeList(comparators.clone()))
            }

            (Call { func, .. }, "func") => Some(FieldValue::Node(func.clone())),
            (Call { args, .. }, "args") => Some(FieldValue::NodeList(args.clone())),
            (Call { keywords, .. }, "keywords") => Some(FieldValue::NodeList(keywords.clone())),
            (Call { starargs, .. }, "starargs") => Some(opt_node(starargs)),
            (Call { kwargs, .. }, "kwargs") => Some(opt_node(kwargs)),

            (Attribute { value, .. }, "value") => Some(FieldValue::Node(value.clone())),
            (Attribute { attr, .. }, "attr") => Some(FieldValue::Ident(attr.clone())),

            (Subscript { value, .. }, "value") => Some(FieldValue::Node(value.clone())),
            (Subscript { slice, .. }, "slice") => Some(FieldValue::Node(slice.clone())),

            (Name { id, .. }, "id") => Some(FieldValue::Ident(id.clone())),

            (List { elts, .. }, "elts") => Some(FieldValue::NodeList(elts.clone())),
            (Tuple { elts, .. }, "elts") => Some(FieldValue::NodeList(elts.clone())),

            (Slice { lower, .. }, "lower") => Some(opt_node(lower)),
            (Slice { upper, .. }, "upper") => Some(opt_node(upper)),
            (Slice { step, .. }, "step") => Some(opt_node(step)),

            (Index { value }, "value") => Some(FieldValue::Node(value.clone())),

            (Arguments { args, .. }, "args") => Some(FieldValue::NodeList(args.clone())),
            (Arguments { vararg, .. }, "vararg") => Some(opt_ident(vararg)),
            (Arguments { kwarg, .. }, "kwarg") => Some(opt_ident(kwarg)),
            (Arguments { defaults, .. }, "defaults") => {
                Some(FieldValue::NodeList(defaults.clone()))
            }

            (Keyword { arg, .. }, "arg") => Some(FieldValue::Ident(arg.clone())),
            (Keyword { value, .. }, "value") => Some(FieldValue::Node(value.clone())),

            (Alias { name: n, .. }, "name") => Some(FieldValue::Ident(n.clone())),
            (Alias { asname, .. }, "asname") => Some(opt_ident(asname)),

            (Comprehension { target, .. }, "target") => Some(FieldValue::Node(target.clone())),
            (Comprehension { iter, .. }, "iter") => Some(FieldValue::Node(iter.clone())),
            (Comprehension { ifs, .. }, "ifs") => Some(FieldValue::NodeList(ifs.clone())),

            (ExceptHandler { type_, .. }, "type") => Some(opt_node(type_)),
            (ExceptHandler { name: n, .. }, "name") => Some(opt_ident(n)),
            (ExceptHandler { body, .. }, "body") => Some(FieldValue::NodeList(body.clone())),

            _ => None,
        };
        match value {
            Some(v) => v,
            None => panic!(
                "node kind {} has no field named {:?}",
                self.kind_name(),
                name
            ),
        }
    }

    /// Replaces a node-list field in place. Used by the body placeholder to
    /// interleave synthesized syntax-free lines with the real statements.
    pub fn set_node_list(&mut self, name: &str, new_list: Vec<NodeRef>) {
        use NodeKind::*;
        let slot = match (&mut self.kind, name) {
            (Module { body }, "body") => body,
            (FunctionDef { body, .. }, "body") => body,
            (FunctionDef { decorator_list, .. }, "decorator_list") => decorator_list,
            (ClassDef { body, .. }, "body") => body,
            (ClassDef { decorator_list, .. }, "decorator_list") => decorator_list,
            (For { body, .. }, "body") => body,
            (For { orelse, .. }, "orelse") => orelse,
            (While { body, .. }, "body") => body,
            (If { body, .. }, "body") => body,
            (If { orelse, .. }, "orelse") => orelse,
            (With { body, .. }, "body") => body,
            (TryExcept { body, .. }, "body") => body,
            (TryExcept { orelse, .. }, "orelse") => orelse,
            (TryFinally { body, .. }, "body") => body,
            (TryFinally { finalbody, .. }, "finalbody") => finalbody,
            (ExceptHandler { body, .. }, "body") => body,
            _ => panic!(
                "node kind {} has no replaceable list field named {:?}",
                self.kind_name(),
                name
            ),
        };
        *slot = new_list;
    }

    /// Rendered text of a syntax-free line, without the trailing newline.
    ///
    /// Empty for a blank line; `{col_offset spaces}#{comment_indent
    /// spaces}{comment}` for a comment line.
    pub fn full_line(&self) -> String {
        match &self.kind {
            NodeKind::SyntaxFreeLine {
                comment,
                col_offset,
                comment_indent,
            } => match comment {
                Some(text) => format!(
                    "{}#{}{}",
                    " ".repeat(*col_offset),
                    " ".repeat(*comment_indent),
                    text
                ),
                None => String::new(),
            },
            _ => panic!("full_line is only defined for SyntaxFreeLine nodes"),
        }
    }

    /// Decomposes a raw source line into syntax-free-line fields. The line
    /// must include its trailing newline and contain no code.
    pub fn set_from_src_line(&mut self, line: &str) -> Result<()> {
        let caps = syntax_free_line_regex()
            .captures(line)
            .ok_or_else(|| Error::value(format!("line {:?} is not a syntax-free line", line)))?;
        match &mut self.kind {
            NodeKind::SyntaxFreeLine {
                comment,
                col_offset,
                comment_indent,
            } => {
                *col_offset = caps.get(1).map_or(0, |m| m.as_str().len());
                *comment_indent = 0;
                *comment = None;
                if caps.get(2).is_some() {
                    *comment_indent = caps.get(3).map_or(0, |m| m.as_str().len());
                    *comment = Some(caps.get(4).map_or("", |m| m.as_str()).to_string());
                }
                Ok(())
            }
            _ => Err(Error::value(
                "set_from_src_line is only defined for SyntaxFreeLine nodes",
            )),
        }
    }
}

fn syntax_free_line_regex() -> &'static Regex {
    static SYNTAX_FREE_LINE: OnceLock<Regex> = OnceLock::new();
    SYNTAX_FREE_LINE.get_or_init(|| Regex::new(r"^([ \t]*)(?:(#)([ \t]*)(.*))?\n").unwrap())
}

/// Whether `text` begins with a blank or comment-only line.
pub fn starts_with_syntax_free_line(text: &str) -> bool {
    syntax_free_line_regex().is_match(text)
}
