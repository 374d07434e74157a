//! The template registry: an exhaustive mapping from node kind to its
//! placeholder sequence, or to a custom matcher for the kinds whose grammar
//! is not a flat sequence.
//!
//! Templates are built fresh per lookup because placeholders are stateful;
//! two nodes never share placeholder instances.

use crate::ast::NodeKind;
use crate::source::placeholder::{
    BodyPlaceholder, FieldPlaceholder, ListFieldPlaceholder, PairKind, PairedPlaceholder,
    Placeholder, TextPlaceholder,
};

pub(crate) fn tp(pattern: &str, default: &str) -> TextPlaceholder {
    TextPlaceholder::new(pattern, default)
}

pub(crate) fn text(pattern: &str, default: &str) -> Placeholder {
    Placeholder::Text(tp(pattern, default))
}

pub(crate) fn fld(name: &'static str) -> Placeholder {
    Placeholder::Field(FieldPlaceholder::new(name))
}

pub(crate) fn fld_before(name: &'static str, pattern: &str, default: &str) -> Placeholder {
    Placeholder::Field(FieldPlaceholder::with_before(name, tp(pattern, default)))
}

pub(crate) fn list_field(name: &'static str) -> Placeholder {
    Placeholder::ListField(ListFieldPlaceholder::new(name))
}

pub(crate) fn separated(name: &'static str, pattern: &str, default: &str) -> Placeholder {
    Placeholder::ListField(ListFieldPlaceholder::separated(name, tp(pattern, default)))
}

pub(crate) fn body(name: &'static str) -> Placeholder {
    Placeholder::Body(BodyPlaceholder::new(ListFieldPlaceholder::new(name)))
}

pub(crate) fn body_trailing(name: &'static str) -> Placeholder {
    Placeholder::Body(BodyPlaceholder::new(ListFieldPlaceholder::new(name)).match_trailing())
}

fn body_prefixed(name: &'static str, pattern: &str, default: &str) -> Placeholder {
    Placeholder::Body(BodyPlaceholder::new(
        ListFieldPlaceholder::new(name).with_prefix(tp(pattern, default)),
    ))
}

fn paired(kind: PairKind, arg_sep: TextPlaceholder, kwarg_sep: TextPlaceholder) -> Placeholder {
    Placeholder::Paired(PairedPlaceholder::new(kind, arg_sep, kwarg_sep))
}

/// Registry entry: either a declarative template or one of the custom
/// matcher kinds.
pub(crate) enum MatcherSpec {
    Parts(Vec<Placeholder>),
    BoolOp,
    If,
    Num,
    Str,
    Tuple,
    TryFinally,
    With,
}

/// Looks up the registry entry for a node kind. Exhaustive: every kind the
/// AST can express has an entry.
pub(crate) fn matcher_spec(kind: &NodeKind) -> MatcherSpec {
    use MatcherSpec::*;
    use NodeKind as K;
    match kind {
        K::Module { .. } => Parts(vec![body("body")]),

        K::FunctionDef { .. } => Parts(vec![
            Placeholder::Body(BodyPlaceholder::new(
                ListFieldPlaceholder::new("decorator_list")
                    .with_before(tp("[ \t]*@", "@"))
                    .with_after(tp(r"\n", "\n")),
            )),
            text(r"[ \t]*def ", "def "),
            fld("name"),
            text(r"\(\s*", "("),
            fld("args"),
            text(r"\s*,?\s*\):\n?", "):\n"),
            body("body"),
        ]),
        K::ClassDef { .. } => Parts(vec![
            Placeholder::ListField(
                ListFieldPlaceholder::new("decorator_list")
                    .with_before(tp("[ \t]*@", "@"))
                    .with_after(tp(r"\n", "\n")),
            ),
            text(r"[ \t]*class[ \t]*", "class "),
            fld("name"),
            text(r"\(?\s*", "("),
            separated("bases", r"\s*,\s*", ", "),
            text(r"\s*,?\s*\)?:\n", "):\n"),
            body("body"),
        ]),
        K::Return { .. } => Parts(vec![
            text(r"[ \t]*return[ \t]*", "return "),
            fld("value"),
            text(r"\n", "\n"),
        ]),
        K::Delete { .. } => Parts(vec![
            text(r" *del *", "del "),
            list_field("targets"),
            text(r"\n", "\n"),
        ]),
        K::Assign { .. } => Parts(vec![
            text(r"[ \t]*", ""),
            separated("targets", r"\s*=\s*", ", "),
            text(r"[ \t]*=[ \t]*", " = "),
            fld("value"),
            text(r"\n", "\n"),
        ]),
        K::AugAssign { .. } => Parts(vec![
            text(r" *", ""),
            fld("target"),
            text(r" *", " "),
            fld("op"),
            text(r"= *", "= "),
            fld("value"),
            text(r"\n", "\n"),
        ]),
        K::Print { .. } => Parts(vec![
            text(r" *print *", "print "),
            fld_before("dest", r">>", ">>"),
            Placeholder::ListField(
                ListFieldPlaceholder::new("values").with_before(tp(r"\s*,?\s*", ", ")),
            ),
            text(r" *,? *\n", "\n"),
        ]),
        K::For { .. } => Parts(vec![
            text(r"[ \t]*for[ \t]*", "for "),
            fld("target"),
            text(r"[ \t]*in[ \t]*", " in "),
            fld("iter"),
            text(r":\n", ":\n"),
            body("body"),
            body_prefixed("orelse", r" *else:\n", "else:\n"),
        ]),
        K::While { .. } => Parts(vec![
            text(r"[ \t]*while[ \t]*", "while "),
            fld("test"),
            text(r"[ \t]*:[ \t]*\n", ":\n"),
            body("body"),
        ]),
        K::If { .. } => If,
        K::With { .. } => With,
        K::Raise { .. } => Parts(vec![
            text(r"[ \t]*raise[ \t]*", "raise "),
            fld("type"),
            text(r"\n", "\n"),
        ]),
        K::TryExcept { .. } => Parts(vec![
            text(r"[ \t]*try:[ \t]*\n", "try:\n"),
            body_trailing("body"),
            list_field("handlers"),
            body_prefixed("orelse", r"[ \t]*else:\n", "else:\n"),
        ]),
        K::TryFinally { .. } => TryFinally,
        K::Assert { .. } => Parts(vec![
            text(r" *assert *", "assert "),
            fld("test"),
            fld_before("msg", r", *", ", "),
            text(r" *\n", "\n"),
        ]),
        K::Import { .. } => Parts(vec![
            text(r" *import ", "import "),
            separated("names", "[ \t]*,[ \t]", ", "),
            text(r"\n", "\n"),
        ]),
        K::ImportFrom { .. } => Parts(vec![
            text(r"[ \t]*from ", "from "),
            fld("module"),
            text(r" import ", " import "),
            separated("names", "[ \t]*,[ \t]", ", "),
            text(r"\n", "\n"),
        ]),
        K::Global { .. } => Parts(vec![
            text(r" *global *", "global "),
            separated("names", r"\s*,\s*", ", "),
            text(r" *\n", "\n"),
        ]),
        K::Expr { .. } => Parts(vec![text(r" *", ""), fld("value"), text(r" *\n", "\n")]),
        K::Pass => Parts(vec![text(r"[ \t]*pass\n", "pass\n")]),
        K::Break => Parts(vec![text(r" *break *\n", "break\n")]),
        K::Continue => Parts(vec![text(r" *continue\n", "continue\n")]),
        K::SyntaxFreeLine { .. } => Parts(vec![fld("full_line"), text(r"\n", "\n")]),

        K::BoolOp { .. } => BoolOp,
        K::BinOp { .. } => Parts(vec![
            fld("left"),
            text(r"\s*", " "),
            fld("op"),
            text(r"\s*", " "),
            fld("right"),
        ]),
        K::UnaryOp { .. } => Parts(vec![fld("op"), text(r" *", " "), fld("operand")]),
        K::Lambda { .. } => Parts(vec![
            text(r"lambda\s*", "lambda "),
            fld("args"),
            text(r"\s*:\s*", ": "),
            fld("body"),
        ]),
        K::IfExp { .. } => Parts(vec![
            fld("body"),
            text(r"\s*if\s*", " if "),
            fld("test"),
            text(r"\s*else\s*", " else "),
            fld("orelse"),
        ]),
        K::Dict { .. } => Parts(vec![
            text(r"\s*\{\s*", "{"),
            paired(
                PairKind::KeysValues,
                tp(r"\s*,\s*", ", "),
                tp(r"\s*:\s*", ": "),
            ),
            text(r"\s*,?\s*\}", "}"),
        ]),
        K::Set { .. } => Parts(vec![
            text(r"\{\s*", "{"),
            separated("elts", r"\s*,\s*", ", "),
            text(r"\s*\}", "}"),
        ]),
        K::ListComp { .. } => Parts(vec![
            text(r"\[\s*", "["),
            fld("elt"),
            text(r" *", " "),
            list_field("generators"),
            text(r"\s*\]", "]"),
        ]),
        K::SetComp { .. } => Parts(vec![
            text(r"\{\s*", "{"),
            fld("elt"),
            text(r" *", " "),
            list_field("generators"),
            text(r"\s*\}", "}"),
        ]),
        K::DictComp { .. } => Parts(vec![
            text(r"\{\s*", "{"),
            fld("key"),
            text(r"\s*:\s*", ": "),
            fld("value"),
            text(r" *", " "),
            list_field("generators"),
            text(r"\s*\}", "}"),
        ]),
        K::GeneratorExp { .. } => Parts(vec![
            fld("elt"),
            text(r"\s*", " "),
            list_field("generators"),
        ]),
        K::Yield { .. } => Parts(vec![text(r"[ \t]*yield[ \t]*", "yield "), fld("value")]),
        K::Compare { .. } => Parts(vec![
            fld("left"),
            text(r"\s*", " "),
            paired(
                PairKind::OpsComparators,
                tp(r"\s*", " "),
                tp(r"\s*", " "),
            ),
        ]),
        K::Call { .. } => Parts(vec![
            fld("func"),
            text(r"\(\s*", "("),
            paired(PairKind::ArgsKeywords, tp(r"\s*,\s*", ", "), tp("", "")),
            fld_before("kwargs", r"\s*,?\s*\*\*", ", **"),
            text(r"\s*,?\s*\)", ")"),
        ]),
        K::Num { .. } => Num,
        K::Str { .. } => Str,
        K::Attribute { .. } => Parts(vec![
            fld("value"),
            text(r"\s*\.\s*", "."),
            fld("attr"),
        ]),
        K::Subscript { .. } => Parts(vec![
            fld("value"),
            text(r"\s*\[\s*", "["),
            fld("slice"),
            text(r"\s*\]", "]"),
        ]),
        K::Name { .. } => Parts(vec![fld("id")]),
        K::List { .. } => Parts(vec![
            text(r"\[\s*", "["),
            separated("elts", r"\s*,\s*", ", "),
            text(r"\s*,?\s*\]", "]"),
        ]),
        K::Tuple { .. } => Tuple,

        K::Slice { .. } => Parts(vec![
            fld("lower"),
            text(r"\s*:?\s*", ":"),
            fld("upper"),
            text(r"\s*:?\s*", ":"),
            fld("step"),
        ]),
        K::Index { .. } => Parts(vec![fld("value")]),

        K::Arguments { .. } => Parts(vec![
            paired(
                PairKind::ArgsDefaults,
                tp(r"\s*,\s*", ", "),
                tp(r"\s*=\s*", "="),
            ),
            fld_before("vararg", r"\s*,?\s*\*\s*", ", *"),
            fld_before("kwarg", r"\s*,?\s*\*\*\s*", ", **"),
        ]),
        K::Keyword { .. } => Parts(vec![fld("arg"), text(r"\s*=\s*", "="), fld("value")]),
        K::Alias { .. } => Parts(vec![
            fld("name"),
            fld_before("asname", r" *as *", " as "),
        ]),
        K::Comprehension { .. } => Parts(vec![
            text(r"\s*for\s*", "for "),
            fld("target"),
            text(r"\s*in\s*", " in "),
            fld("iter"),
            Placeholder::ListField(
                ListFieldPlaceholder::new("ifs").with_before(tp(r"\s*if\s*", " if ")),
            ),
        ]),
        K::ExceptHandler { .. } => Parts(vec![
            text(r"[ \t]*except:?[ \t]*", "except "),
            fld("type"),
            fld_before("name", r" *as *| *, *", " as "),
            text(r"[ \t]*:?[ \t]*\n", ":\n"),
            body("body"),
        ]),

        K::Add => Parts(vec![text(r"\+", "+")]),
        K::Sub => Parts(vec![text(r"\-", "-")]),
        K::Mult => Parts(vec![text(r"\*", "*")]),
        K::Div => Parts(vec![text(r"/", "/")]),
        K::FloorDiv => Parts(vec![text(r"//", "//")]),
        K::Mod => Parts(vec![text(r"%", "%")]),
        K::Pow => Parts(vec![text(r"\*\*", "**")]),
        K::LShift => Parts(vec![text(r"<<", "<<")]),
        K::RShift => Parts(vec![text(r">>", ">>")]),
        K::BitOr => Parts(vec![text(r"\|", "|")]),
        K::BitXor => Parts(vec![text(r"\^", "^")]),
        K::BitAnd => Parts(vec![text(r"&", "&")]),
        K::And => Parts(vec![text(r"and", "and")]),
        K::Or => Parts(vec![text(r"or", "or")]),
        K::Invert => Parts(vec![text(r"~", "~")]),
        K::Not => Parts(vec![text(r"not", "not")]),
        K::UAdd => Parts(vec![text(r"\+", "+")]),
        K::USub => Parts(vec![text(r"-", "-")]),
        K::Eq => Parts(vec![text(r"==", "==")]),
        K::NotEq => Parts(vec![text(r"!=", "!=")]),
        K::Lt => Parts(vec![text(r"<", "<")]),
        K::LtE => Parts(vec![text(r"<=", "<=")]),
        K::Gt => Parts(vec![text(r">", ">")]),
        K::GtE => Parts(vec![text(r">=", ">=")]),
        K::Is => Parts(vec![text(r"is", "is")]),
        K::IsNot => Parts(vec![text(r"is *not", "is not")]),
        K::In => Parts(vec![text(r"in", "in")]),
        K::NotIn => Parts(vec![text(r"not *in", "not in")]),
    }
}
