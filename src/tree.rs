//! Tree utilities: indent-depth discovery, parent lookup, wrapping-statement
//! lookup, and recursive node copying.
//!
//! Statement nodes do not own a pointer back to their module; the relations
//! here are computed by walking the module on demand, so the tree stays an
//! acyclic ownership structure.

use std::rc::Rc;

use crate::ast::{node, Node, NodeKind, NodeRef};
use crate::error::{Error, Result};

/// All node-valued children of a node, in field order, each tagged with its
/// field name.
pub(crate) fn child_nodes(node: &Node) -> Vec<(&'static str, NodeRef)> {
    use NodeKind::*;
    let mut out: Vec<(&'static str, NodeRef)> = Vec::new();
    let one = |name: &'static str, child: &NodeRef, out: &mut Vec<(&'static str, NodeRef)>| {
        out.push((name, child.clone()));
    };
    let many =
        |name: &'static str, children: &[NodeRef], out: &mut Vec<(&'static str, NodeRef)>| {
            for child in children {
                out.push((name, child.clone()));
            }
        };
    let opt =
        |name: &'static str, child: &Option<NodeRef>, out: &mut Vec<(&'static str, NodeRef)>| {
            if let Some(child) = child {
                out.push((name, child.clone()));
            }
        };
    match &node.kind {
        Module { body } => many("body", body, &mut out),
        FunctionDef {
            args,
            body,
            decorator_list,
            ..
        } => {
            one("args", args, &mut out);
            many("body", body, &mut out);
            many("decorator_list", decorator_list, &mut out);
        }
        ClassDef {
            bases,
            body,
            decorator_list,
            ..
        } => {
            many("bases", bases, &mut out);
            many("body", body, &mut out);
            many("decorator_list", decorator_list, &mut out);
        }
        Return { value } => opt("value", value, &mut out),
        Delete { targets } => many("targets", targets, &mut out),
        Assign { targets, value } => {
            many("targets", targets, &mut out);
            one("value", value, &mut out);
        }
        AugAssign { target, op, value } => {
            one("target", target, &mut out);
            one("op", op, &mut out);
            one("value", value, &mut out);
        }
        Print { dest, values } => {
            opt("dest", dest, &mut out);
            many("values", values, &mut out);
        }
        For {
            target,
            iter,
            body,
            orelse,
        } => {
            one("target", target, &mut out);
            one("iter", iter, &mut out);
            many("body", body, &mut out);
            many("orelse", orelse, &mut out);
        }
        While { test, body } => {
            one("test", test, &mut out);
            many("body", body, &mut out);
        }
        If { test, body, orelse } => {
            one("test", test, &mut out);
            many("body", body, &mut out);
            many("orelse", orelse, &mut out);
        }
        With {
            context_expr,
            optional_vars,
            body,
        } => {
            one("context_expr", context_expr, &mut out);
            opt("optional_vars", optional_vars, &mut out);
            many("body", body, &mut out);
        }
        Raise { type_ } => opt("type", type_, &mut out),
        TryExcept {
            body,
            handlers,
            orelse,
        } => {
            many("body", body, &mut out);
            many("handlers", handlers, &mut out);
            many("orelse", orelse, &mut out);
        }
        TryFinally { body, finalbody } => {
            many("body", body, &mut out);
            many("finalbody", finalbody, &mut out);
        }
        Assert { test, msg } => {
            one("test", test, &mut out);
            opt("msg", msg, &mut out);
        }
        Import { names } => many("names", names, &mut out),
        ImportFrom { names, .. } => many("names", names, &mut out),
        Expr { value } => one("value", value, &mut out),
        BoolOp { op, values } => {
            one("op", op, &mut out);
            many("values", values, &mut out);
        }
        BinOp { left, op, right } => {
            one("left", left, &mut out);
            one("op", op, &mut out);
            one("right", right, &mut out);
        }
        UnaryOp { op, operand } => {
            one("op", op, &mut out);
            one("operand", operand, &mut out);
        }
        Lambda { args, body } => {
            one("args", args, &mut out);
            one("body", body, &mut out);
        }
        IfExp { test, body, orelse } => {
            one("test", test, &mut out);
            one("body", body, &mut out);
            one("orelse", orelse, &mut out);
        }
        Dict { keys, values } => {
            many("keys", keys, &mut out);
            many("values", values, &mut out);
        }
        Set { elts } => many("elts", elts, &mut out),
        ListComp { elt, generators } => {
            one("elt", elt, &mut out);
            many("generators", generators, &mut out);
        }
        SetComp { elt, generators } => {
            one("elt", elt, &mut out);
            many("generators", generators, &mut out);
        }
        DictComp {
            key,
            value,
            generators,
        } => {
            one("key", key, &mut out);
            one("value", value, &mut out);
            many("generators", generators, &mut out);
        }
        GeneratorExp { elt, generators } => {
            one("elt", elt, &mut out);
            many("generators", generators, &mut out);
        }
        Yield { value } => opt("value", value, &mut out),
        Compare {
            left,
            ops,
            comparators,
        } => {
            one("left", left, &mut out);
            many("ops", ops, &mut out);
            many("comparators", comparators, &mut out);
        }
        Call {
            func,
            args,
            keywords,
            starargs,
            kwargs,
        } => {
            one("func", func, &mut out);
            many("args", args, &mut out);
            many("keywords", keywords, &mut out);
            opt("starargs", starargs, &mut out);
            opt("kwargs", kwargs, &mut out);
        }
        Attribute { value, .. } => one("value", value, &mut out),
        Subscript { value, slice, .. } => {
            one("value", value, &mut out);
            one("slice", slice, &mut out);
        }
        List { elts, .. } => many("elts", elts, &mut out),
        Tuple { elts, .. } => many("elts", elts, &mut out),
        Slice { lower, upper, step } => {
            opt("lower", lower, &mut out);
            opt("upper", upper, &mut out);
            opt("step", step, &mut out);
        }
        Index { value } => one("value", value, &mut out),
        Arguments { args, defaults, .. } => {
            many("args", args, &mut out);
            many("defaults", defaults, &mut out);
        }
        Keyword { value, .. } => one("value", value, &mut out),
        Comprehension { target, iter, ifs } => {
            one("target", target, &mut out);
            one("iter", iter, &mut out);
            many("ifs", ifs, &mut out);
        }
        ExceptHandler { type_, body, .. } => {
            opt("type", type_, &mut out);
            many("body", body, &mut out);
        }
        _ => {}
    }
    out
}

/// Whether descending from `kind` into `field` crosses an indentation
/// boundary.
fn is_indenting_field(kind: &NodeKind, field: &str) -> bool {
    use NodeKind::*;
    match kind {
        ClassDef { .. } | ExceptHandler { .. } | For { .. } | FunctionDef { .. }
        | While { .. } | With { .. } => field == "body",
        If { .. } | TryExcept { .. } => field == "body" || field == "orelse",
        TryFinally { .. } => field == "finalbody",
        _ => false,
    }
}

fn find_depth(current: &NodeRef, target: &NodeRef, depth: usize) -> Option<usize> {
    // A compound `with` header carries its inner node on the same line, so
    // the subtree sits one level shallower than the structure suggests.
    let compound = current
        .borrow()
        .matcher
        .as_ref()
        .map(|m| m.is_compound_with())
        .unwrap_or(false);
    let depth = if compound { depth.saturating_sub(1) } else { depth };
    if Rc::ptr_eq(current, target) {
        return Some(depth);
    }
    let children = child_nodes(&current.borrow());
    for (field, child) in children {
        let child_depth = if is_indenting_field(&current.borrow().kind, field) {
            depth + 1
        } else {
            depth
        };
        if let Some(found) = find_depth(&child, target, child_depth) {
            return Some(found);
        }
    }
    None
}

/// Number of enclosing indented blocks between `module` and `node`.
/// Errors when the node is not part of the module.
pub fn indent_level(module: &NodeRef, node: &NodeRef) -> Result<usize> {
    find_depth(module, node, 0).ok_or_else(|| Error::value("node is not in module"))
}

/// The immediate parent of `node` inside `module`, or `None` for the
/// module itself or a node not in the tree.
pub fn parent_of(module: &NodeRef, node: &NodeRef) -> Option<NodeRef> {
    fn walk(current: &NodeRef, target: &NodeRef) -> Option<NodeRef> {
        for (_, child) in child_nodes(&current.borrow()) {
            if Rc::ptr_eq(&child, target) {
                return Some(current.clone());
            }
            if let Some(found) = walk(&child, target) {
                return Some(found);
            }
        }
        None
    }
    walk(module, node)
}

/// The nearest statement enclosing `node` (or `node` itself when it is a
/// statement), found by walking `module`.
pub fn wrapping_stmt(module: &NodeRef, node: &NodeRef) -> Option<NodeRef> {
    fn walk(current: &NodeRef, target: &NodeRef, last_stmt: Option<NodeRef>) -> Option<NodeRef> {
        let last_stmt = if current.borrow().is_stmt() {
            Some(current.clone())
        } else {
            last_stmt
        };
        if Rc::ptr_eq(current, target) {
            return last_stmt;
        }
        for (_, child) in child_nodes(&current.borrow()) {
            if let Some(found) = walk(&child, target, last_stmt.clone()) {
                return Some(found);
            }
        }
        None
    }
    walk(module, node, None)
}

/// Recursively copies a node. The copy shares nothing with the original
/// and carries no matcher.
pub fn copy_node(source: &NodeRef) -> NodeRef {
    use NodeKind::*;
    let copy_opt = |value: &Option<NodeRef>| value.as_ref().map(copy_node);
    let copy_vec = |values: &[NodeRef]| values.iter().map(copy_node).collect::<Vec<_>>();
    let kind = match &source.borrow().kind {
        Module { body } => Module {
            body: copy_vec(body),
        },
        FunctionDef {
            name,
            args,
            body,
            decorator_list,
        } => FunctionDef {
            name: name.clone(),
            args: copy_node(args),
            body: copy_vec(body),
            decorator_list: copy_vec(decorator_list),
        },
        ClassDef {
            name,
            bases,
            body,
            decorator_list,
        } => ClassDef {
            name: name.clone(),
            bases: copy_vec(bases),
            body: copy_vec(body),
            decorator_list: copy_vec(decorator_list),
        },
        Return { value } => Return {
            value: copy_opt(value),
        },
        Delete { targets } => Delete {
            targets: copy_vec(targets),
        },
        Assign { targets, value } => Assign {
            targets: copy_vec(targets),
            value: copy_node(value),
        },
        AugAssign { target, op, value } => AugAssign {
            target: copy_node(target),
            op: copy_node(op),
            value: copy_node(value),
        },
        Print { dest, values } => Print {
            dest: copy_opt(dest),
            values: copy_vec(values),
        },
        For {
            target,
            iter,
            body,
            orelse,
        } => For {
            target: copy_node(target),
            iter: copy_node(iter),
            body: copy_vec(body),
            orelse: copy_vec(orelse),
        },
        While { test, body } => While {
            test: copy_node(test),
            body: copy_vec(body),
        },
        If { test, body, orelse } => If {
            test: copy_node(test),
            body: copy_vec(body),
            orelse: copy_vec(orelse),
        },
        With {
            context_expr,
            optional_vars,
            body,
        } => With {
            context_expr: copy_node(context_expr),
            optional_vars: copy_opt(optional_vars),
            body: copy_vec(body),
        },
        Raise { type_ } => Raise {
            type_: copy_opt(type_),
        },
        TryExcept {
            body,
            handlers,
            orelse,
        } => TryExcept {
            body: copy_vec(body),
            handlers: copy_vec(handlers),
            orelse: copy_vec(orelse),
        },
        TryFinally { body, finalbody } => TryFinally {
            body: copy_vec(body),
            finalbody: copy_vec(finalbody),
        },
        Assert { test, msg } => Assert {
            test: copy_node(test),
            msg: copy_opt(msg),
        },
        Import { names } => Import {
            names: copy_vec(names),
        },
        ImportFrom {
            module,
            names,
            level,
        } => ImportFrom {
            module: module.clone(),
            names: copy_vec(names),
            level: *level,
        },
        Global { names } => Global {
            names: names.clone(),
        },
        Expr { value } => Expr {
            value: copy_node(value),
        },
        Pass => Pass,
        Break => Break,
        Continue => Continue,
        SyntaxFreeLine {
            comment,
            col_offset,
            comment_indent,
        } => SyntaxFreeLine {
            comment: comment.clone(),
            col_offset: *col_offset,
            comment_indent: *comment_indent,
        },
        BoolOp { op, values } => BoolOp {
            op: copy_node(op),
            values: copy_vec(values),
        },
        BinOp { left, op, right } => BinOp {
            left: copy_node(left),
            op: copy_node(op),
            right: copy_node(right),
        },
        UnaryOp { op, operand } => UnaryOp {
            op: copy_node(op),
            operand: copy_node(operand),
        },
        Lambda { args, body } => Lambda {
            args: copy_node(args),
            body: copy_node(body),
        },
        IfExp { test, body, orelse } => IfExp {
            test: copy_node(test),
            body: copy_node(body),
            orelse: copy_node(orelse),
        },
        Dict { keys, values } => Dict {
            keys: copy_vec(keys),
            values: copy_vec(values),
        },
        Set { elts } => Set {
            elts: copy_vec(elts),
        },
        ListComp { elt, generators } => ListComp {
            elt: copy_node(elt),
            generators: copy_vec(generators),
        },
        SetComp { elt, generators } => SetComp {
            elt: copy_node(elt),
            generators: copy_vec(generators),
        },
        DictComp {
            key,
            value,
            generators,
        } => DictComp {
            key: copy_node(key),
            value: copy_node(value),
            generators: copy_vec(generators),
        },
        GeneratorExp { elt, generators } => GeneratorExp {
            elt: copy_node(elt),
            generators: copy_vec(generators),
        },
        Yield { value } => Yield {
            value: copy_opt(value),
        },
        Compare {
            left,
            ops,
            comparators,
        } => Compare {
            left: copy_node(left),
            ops: copy_vec(ops),
            comparators: copy_vec(comparators),
        },
        Call {
            func,
            args,
            keywords,
            starargs,
            kwargs,
        } => Call {
            func: copy_node(func),
            args: copy_vec(args),
            keywords: copy_vec(keywords),
            starargs: copy_opt(starargs),
            kwargs: copy_opt(kwargs),
        },
        Num { n } => Num { n: *n },
        Str { s } => Str { s: s.clone() },
        Attribute { value, attr, ctx } => Attribute {
            value: copy_node(value),
            attr: attr.clone(),
            ctx: *ctx,
        },
        Subscript { value, slice, ctx } => Subscript {
            value: copy_node(value),
            slice: copy_node(slice),
            ctx: *ctx,
        },
        Name { id, ctx } => Name {
            id: id.clone(),
            ctx: *ctx,
        },
        List { elts, ctx } => List {
            elts: copy_vec(elts),
            ctx: *ctx,
        },
        Tuple { elts, ctx } => Tuple {
            elts: copy_vec(elts),
            ctx: *ctx,
        },
        Slice { lower, upper, step } => Slice {
            lower: copy_opt(lower),
            upper: copy_opt(upper),
            step: copy_opt(step),
        },
        Index { value } => Index {
            value: copy_node(value),
        },
        Arguments {
            args,
            vararg,
            kwarg,
            defaults,
        } => Arguments {
            args: copy_vec(args),
            vararg: vararg.clone(),
            kwarg: kwarg.clone(),
            defaults: copy_vec(defaults),
        },
        Keyword { arg, value } => Keyword {
            arg: arg.clone(),
            value: copy_node(value),
        },
        Alias { name, asname } => Alias {
            name: name.clone(),
            asname: asname.clone(),
        },
        Comprehension { target, iter, ifs } => Comprehension {
            target: copy_node(target),
            iter: copy_node(iter),
            ifs: copy_vec(ifs),
        },
        ExceptHandler { type_, name, body } => ExceptHandler {
            type_: copy_opt(type_),
            name: name.clone(),
            body: copy_vec(body),
        },
        Add => Add,
        Sub => Sub,
        Mult => Mult,
        Div => Div,
        FloorDiv => FloorDiv,
        Mod => Mod,
        Pow => Pow,
        LShift => LShift,
        RShift => RShift,
        BitOr => BitOr,
        BitXor => BitXor,
        BitAnd => BitAnd,
        And => And,
        Or => Or,
        Invert => Invert,
        Not => Not,
        UAdd => UAdd,
        USub => USub,
        Eq => Eq,
        NotEq => NotEq,
        Lt => Lt,
        LtE => LtE,
        Gt => Gt,
        GtE => GtE,
        Is => Is,
        IsNot => IsNot,
        In => In,
        NotIn => NotIn,
    };
    node(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;

    fn nested_module() -> (NodeRef, NodeRef, NodeRef) {
        let inner = build::pass_stmt();
        let branch = build::if_stmt(build::name("flag"), vec![inner.clone()], Vec::new()).unwrap();
        let outer =
            build::function_def("f", build::no_arguments(), vec![branch.clone()], Vec::new())
                .unwrap();
        let module = build::module(vec![outer]).unwrap();
        (module, branch, inner)
    }

    #[test]
    fn indent_level_counts_enclosing_blocks() {
        let (module, branch, inner) = nested_module();
        assert_eq!(indent_level(&module, &branch).unwrap(), 1);
        assert_eq!(indent_level(&module, &inner).unwrap(), 2);
    }

    #[test]
    fn indent_level_rejects_foreign_nodes() {
        let (module, _, _) = nested_module();
        let stray = build::pass_stmt();
        assert!(indent_level(&module, &stray).is_err());
    }

    #[test]
    fn parent_is_the_immediate_enclosing_node() {
        let (module, branch, inner) = nested_module();
        let parent = parent_of(&module, &inner).unwrap();
        assert!(Rc::ptr_eq(&parent, &branch));
        assert!(parent_of(&module, &module).is_none());
    }

    #[test]
    fn wrapping_stmt_finds_the_nearest_statement() {
        let test = build::name("flag");
        let branch = build::if_stmt(test.clone(), Vec::new(), Vec::new()).unwrap();
        let module = build::module(vec![branch.clone()]).unwrap();
        let stmt = wrapping_stmt(&module, &test).unwrap();
        assert!(Rc::ptr_eq(&stmt, &branch));
    }

    #[test]
    fn copies_share_nothing_with_the_original() {
        let original = build::assign(build::name("a"), build::num(1));
        let copy = copy_node(&original);
        if let NodeKind::Assign { targets, .. } = &mut copy.borrow_mut().kind {
            if let NodeKind::Name { id, .. } = &mut targets[0].borrow_mut().kind {
                *id = "changed".to_string();
            }
        }
        if let NodeKind::Assign { targets, .. } = &original.borrow().kind {
            if let NodeKind::Name { id, .. } = &targets[0].borrow().kind {
                assert_eq!(id, "a");
            };
        };
    }
}
