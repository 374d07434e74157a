//! Node-construction facade: convenience constructors for synthetic trees.
//!
//! Constructors take the pieces a caller naturally has (identifier strings,
//! already-built child nodes) and produce well-formed [`NodeRef`]s with the
//! expression contexts Python's own parser would have assigned. Validation
//! mirrors the grammar: bodies must hold statements, dict keys and values
//! must pair up, operator symbols must name real operators.

use crate::ast::{node, CtxKind, NodeKind, NodeRef, NumVal};
use crate::error::{Error, Result};
use crate::tree::child_nodes;

/// A `Name` node with `Load` context.
pub fn name(id: &str) -> NodeRef {
    name_ctx(id, CtxKind::Load)
}

/// A `Name` node with an explicit context.
pub fn name_ctx(id: &str, ctx: CtxKind) -> NodeRef {
    node(NodeKind::Name {
        id: id.to_string(),
        ctx,
    })
}

/// A dotted reference: `a`, `a.b`, `a.b.c` as nested attribute accesses.
pub fn var_reference(parts: &[&str]) -> Result<NodeRef> {
    var_reference_ctx(parts, CtxKind::Load)
}

pub fn var_reference_ctx(parts: &[&str], ctx: CtxKind) -> Result<NodeRef> {
    match parts {
        [] => Err(Error::value("a reference needs at least one part")),
        [single] => Ok(name_ctx(single, ctx)),
        [init @ .., last] => Ok(node(NodeKind::Attribute {
            value: var_reference_ctx(init, ctx)?,
            attr: last.to_string(),
            ctx,
        })),
    }
}

/// A dotted reference given as one string (`"a.b.c"`).
pub fn dotted(path: &str) -> Result<NodeRef> {
    let parts: Vec<&str> = path.split('.').collect();
    var_reference(&parts)
}

pub fn num(value: i64) -> NodeRef {
    node(NodeKind::Num {
        n: NumVal::Int(value),
    })
}

pub fn float_num(value: f64) -> NodeRef {
    node(NodeKind::Num {
        n: NumVal::Float(value),
    })
}

pub fn str_node(s: &str) -> NodeRef {
    node(NodeKind::Str { s: s.to_string() })
}

// ---------------------------------------------------------------------------
// Operator symbol maps
// ---------------------------------------------------------------------------

/// Maps a binary operator symbol (`+`, `<<`, ...) to its operator node.
pub fn bin_op_from_symbol(symbol: &str) -> Result<NodeRef> {
    use NodeKind::*;
    let kind = match symbol {
        "+" => Add,
        "-" => Sub,
        "*" => Mult,
        "**" => Pow,
        "/" => Div,
        "//" => FloorDiv,
        "%" => Mod,
        "<<" => LShift,
        ">>" => RShift,
        "|" => BitOr,
        "&" => BitAnd,
        "^" => BitXor,
        other => {
            return Err(Error::value(format!(
                "{:?} is not a binary operator",
                other
            )))
        }
    };
    Ok(node(kind))
}

/// Maps a unary operator symbol (`+`, `-`, `not`, `~`) to its node.
pub fn unary_op_from_symbol(symbol: &str) -> Result<NodeRef> {
    use NodeKind::*;
    let kind = match symbol {
        "+" => UAdd,
        "-" => USub,
        "not" => Not,
        "~" => Invert,
        other => return Err(Error::value(format!("{:?} is not a unary operator", other))),
    };
    Ok(node(kind))
}

/// Maps `and`/`or` to its boolean-operator node.
pub fn bool_op_from_symbol(symbol: &str) -> Result<NodeRef> {
    match symbol {
        "and" => Ok(node(NodeKind::And)),
        "or" => Ok(node(NodeKind::Or)),
        other => Err(Error::value(format!(
            "{:?} is not a boolean operator",
            other
        ))),
    }
}

/// Maps a comparison symbol (`==`, `is not`, ...) to its node.
pub fn compare_op_from_symbol(symbol: &str) -> Result<NodeRef> {
    use NodeKind::*;
    let kind = match symbol {
        "==" => Eq,
        "!=" => NotEq,
        "<" => Lt,
        "<=" => LtE,
        ">" => Gt,
        ">=" => GtE,
        "is" => Is,
        "is not" => IsNot,
        "in" => In,
        "not in" => NotIn,
        other => {
            return Err(Error::value(format!(
                "{:?} is not a comparison operator",
                other
            )))
        }
    };
    Ok(node(kind))
}

// ---------------------------------------------------------------------------
// Expression constructors
// ---------------------------------------------------------------------------

pub fn bin_op(left: NodeRef, symbol: &str, right: NodeRef) -> Result<NodeRef> {
    Ok(node(NodeKind::BinOp {
        left,
        op: bin_op_from_symbol(symbol)?,
        right,
    }))
}

pub fn unary_op(symbol: &str, operand: NodeRef) -> Result<NodeRef> {
    Ok(node(NodeKind::UnaryOp {
        op: unary_op_from_symbol(symbol)?,
        operand,
    }))
}

/// A boolean chain from alternating operators and operands.
///
/// Mixed operators are re-grouped by precedence: `or` binds less tightly
/// than `and`, so `a and b or c` becomes `(a and b) or c`, and
/// `a or b and c` becomes `a or (b and c)`. The chain the matcher sees
/// always carries a single operator.
pub fn bool_op(left: NodeRef, rest: Vec<(&str, NodeRef)>) -> Result<NodeRef> {
    if rest.is_empty() {
        return Err(Error::value("a boolean chain needs at least one operator"));
    }
    let mut values = vec![left];
    let mut current: Option<&str> = None;
    for (index, (symbol, value)) in rest.iter().enumerate() {
        let symbol = match *symbol {
            "and" | "or" => *symbol,
            other => {
                return Err(Error::value(format!(
                    "{:?} is not a boolean operator",
                    other
                )))
            }
        };
        match current {
            None => {
                current = Some(symbol);
                values.push(value.clone());
            }
            Some(op) if op == symbol => values.push(value.clone()),
            Some(op) => {
                let remaining: Vec<(&str, NodeRef)> = rest[index..].to_vec();
                if op == "and" {
                    // `or` outranks `and`: everything so far becomes the
                    // left operand of the or-chain.
                    let inner = node(NodeKind::BoolOp {
                        op: bool_op_from_symbol("and")?,
                        values,
                    });
                    return bool_op(inner, remaining);
                }
                let last = values.pop().expect("chain holds at least the left operand");
                values.push(bool_op(last, remaining)?);
                return Ok(node(NodeKind::BoolOp {
                    op: bool_op_from_symbol("or")?,
                    values,
                }));
            }
        }
    }
    let op = bool_op_from_symbol(current.expect("rest was checked non-empty"))?;
    Ok(node(NodeKind::BoolOp { op, values }))
}

/// A comparison chain: `compare(a, vec![("<", b), ("<", c)])` is `a < b < c`.
pub fn compare(left: NodeRef, rest: Vec<(&str, NodeRef)>) -> Result<NodeRef> {
    if rest.is_empty() {
        return Err(Error::value(
            "a comparison needs at least one operator and comparator",
        ));
    }
    let mut ops = Vec::new();
    let mut comparators = Vec::new();
    for (symbol, comparator) in rest {
        ops.push(compare_op_from_symbol(symbol)?);
        comparators.push(comparator);
    }
    Ok(node(NodeKind::Compare {
        left,
        ops,
        comparators,
    }))
}

pub fn keyword(arg: &str, value: NodeRef) -> NodeRef {
    node(NodeKind::Keyword {
        arg: arg.to_string(),
        value,
    })
}

/// A call with positional arguments only.
pub fn call(func: NodeRef, args: Vec<NodeRef>) -> NodeRef {
    call_with(func, args, Vec::new(), None, None)
}

/// A call with keywords and star/double-star expansions.
pub fn call_with(
    func: NodeRef,
    args: Vec<NodeRef>,
    keywords: Vec<(&str, NodeRef)>,
    starargs: Option<NodeRef>,
    kwargs: Option<NodeRef>,
) -> NodeRef {
    let keywords = keywords
        .into_iter()
        .map(|(arg, value)| keyword(arg, value))
        .collect();
    node(NodeKind::Call {
        func,
        args,
        keywords,
        starargs,
        kwargs,
    })
}

/// An `arguments` node: positional names, then `name=default` pairs, then
/// optional `*vararg` / `**kwarg` names. Parameter names get `Param`
/// context, the way the parser would tag them.
pub fn arguments_node(
    args: &[&str],
    defaults: Vec<(&str, NodeRef)>,
    vararg: Option<&str>,
    kwarg: Option<&str>,
) -> NodeRef {
    let mut arg_nodes: Vec<NodeRef> = args
        .iter()
        .map(|id| name_ctx(id, CtxKind::Param))
        .collect();
    let mut default_nodes = Vec::new();
    for (key, value) in defaults {
        arg_nodes.push(name_ctx(key, CtxKind::Param));
        default_nodes.push(value);
    }
    node(NodeKind::Arguments {
        args: arg_nodes,
        vararg: vararg.map(str::to_string),
        kwarg: kwarg.map(str::to_string),
        defaults: default_nodes,
    })
}

/// An empty `arguments` node.
pub fn no_arguments() -> NodeRef {
    arguments_node(&[], Vec::new(), None, None)
}

pub fn lambda_node(body: NodeRef, args: Option<NodeRef>) -> NodeRef {
    node(NodeKind::Lambda {
        args: args.unwrap_or_else(no_arguments),
        body,
    })
}

pub fn if_exp(test: NodeRef, true_case: NodeRef, false_case: NodeRef) -> NodeRef {
    node(NodeKind::IfExp {
        test,
        body: true_case,
        orelse: false_case,
    })
}

pub fn dict_node(keys: Vec<NodeRef>, values: Vec<NodeRef>) -> Result<NodeRef> {
    if keys.len() != values.len() {
        return Err(Error::value(format!(
            "dict needs matching keys and values, got {} and {}",
            keys.len(),
            values.len()
        )));
    }
    Ok(node(NodeKind::Dict { keys, values }))
}

pub fn set_node(elts: Vec<NodeRef>) -> NodeRef {
    node(NodeKind::Set { elts })
}

pub fn list_node(elts: Vec<NodeRef>, ctx: CtxKind) -> NodeRef {
    for elt in &elts {
        apply_elt_ctx(elt, ctx);
    }
    node(NodeKind::List { elts, ctx })
}

pub fn tuple_node(elts: Vec<NodeRef>, ctx: CtxKind) -> NodeRef {
    for elt in &elts {
        apply_elt_ctx(elt, ctx);
    }
    node(NodeKind::Tuple { elts, ctx })
}

/// Containers propagate their context onto name elements and onto the
/// leftmost name of attribute chains.
fn apply_elt_ctx(elt: &NodeRef, ctx: CtxKind) {
    let mut target = elt.clone();
    loop {
        let next = {
            let borrowed = target.borrow();
            match &borrowed.kind {
                NodeKind::Name { .. } => None,
                NodeKind::Attribute { value, .. } => Some(value.clone()),
                _ => return,
            }
        };
        match next {
            Some(value) => target = value,
            None => break,
        }
    }
    let mut borrowed = target.borrow_mut();
    if let NodeKind::Name { ctx: slot, .. } = &mut borrowed.kind {
        *slot = ctx;
    }
}

pub fn comprehension(target: NodeRef, iter: NodeRef, ifs: Vec<NodeRef>) -> NodeRef {
    change_ctx(&target, CtxKind::Store);
    node(NodeKind::Comprehension { target, iter, ifs })
}

pub fn list_comp(elt: NodeRef, target: NodeRef, iter: NodeRef, ifs: Vec<NodeRef>) -> NodeRef {
    node(NodeKind::ListComp {
        elt,
        generators: vec![comprehension(target, iter, ifs)],
    })
}

pub fn set_comp(elt: NodeRef, target: NodeRef, iter: NodeRef, ifs: Vec<NodeRef>) -> NodeRef {
    node(NodeKind::SetComp {
        elt,
        generators: vec![comprehension(target, iter, ifs)],
    })
}

pub fn dict_comp(
    key: NodeRef,
    value: NodeRef,
    target: NodeRef,
    iter: NodeRef,
    ifs: Vec<NodeRef>,
) -> NodeRef {
    node(NodeKind::DictComp {
        key,
        value,
        generators: vec![comprehension(target, iter, ifs)],
    })
}

pub fn generator_exp(elt: NodeRef, target: NodeRef, iter: NodeRef, ifs: Vec<NodeRef>) -> NodeRef {
    node(NodeKind::GeneratorExp {
        elt,
        generators: vec![comprehension(target, iter, ifs)],
    })
}

pub fn subscript(
    value: NodeRef,
    lower: Option<NodeRef>,
    upper: Option<NodeRef>,
    step: Option<NodeRef>,
) -> NodeRef {
    node(NodeKind::Subscript {
        value,
        slice: slice_node(lower, upper, step),
        ctx: CtxKind::Load,
    })
}

pub fn slice_node(
    lower: Option<NodeRef>,
    upper: Option<NodeRef>,
    step: Option<NodeRef>,
) -> NodeRef {
    node(NodeKind::Slice { lower, upper, step })
}

pub fn index(value: NodeRef) -> NodeRef {
    node(NodeKind::Index { value })
}

pub fn yield_expr(value: Option<NodeRef>) -> NodeRef {
    node(NodeKind::Yield { value })
}

// ---------------------------------------------------------------------------
// Statement constructors
// ---------------------------------------------------------------------------

/// An empty body defaults to a single `pass`; every element must be a
/// statement.
fn format_body(body: Vec<NodeRef>) -> Result<Vec<NodeRef>> {
    if body.is_empty() {
        return Ok(vec![pass_stmt()]);
    }
    for child in &body {
        if !child.borrow().is_stmt() {
            return Err(Error::value(format!(
                "body elements must be statements, and {} is not; wrap \
                 expressions in an Expr node",
                child.borrow().kind_name()
            )));
        }
    }
    Ok(body)
}

pub fn module(body: Vec<NodeRef>) -> Result<NodeRef> {
    if body.is_empty() {
        return Err(Error::value("a module needs at least one statement"));
    }
    Ok(node(NodeKind::Module { body }))
}

pub fn expr(value: NodeRef) -> Result<NodeRef> {
    if value.borrow().is_stmt() {
        return Err(Error::value(
            "statements stand on their own; only expressions are wrapped in Expr",
        ));
    }
    Ok(node(NodeKind::Expr { value }))
}

pub fn assign(target: NodeRef, value: NodeRef) -> NodeRef {
    assign_targets(vec![target], value)
}

pub fn assign_targets(targets: Vec<NodeRef>, value: NodeRef) -> NodeRef {
    for target in &targets {
        change_ctx(target, CtxKind::Store);
    }
    node(NodeKind::Assign { targets, value })
}

pub fn aug_assign(target: NodeRef, symbol: &str, value: NodeRef) -> Result<NodeRef> {
    Ok(node(NodeKind::AugAssign {
        target,
        op: bin_op_from_symbol(symbol)?,
        value,
    }))
}

pub fn return_stmt(value: Option<NodeRef>) -> NodeRef {
    node(NodeKind::Return { value })
}

pub fn delete_stmt(targets: Vec<NodeRef>) -> NodeRef {
    for target in &targets {
        change_ctx(target, CtxKind::Del);
    }
    node(NodeKind::Delete { targets })
}

pub fn print_stmt(dest: Option<NodeRef>, values: Vec<NodeRef>) -> NodeRef {
    node(NodeKind::Print { dest, values })
}

pub fn function_def(
    fn_name: &str,
    args: NodeRef,
    body: Vec<NodeRef>,
    decorator_list: Vec<NodeRef>,
) -> Result<NodeRef> {
    Ok(node(NodeKind::FunctionDef {
        name: fn_name.to_string(),
        args,
        body: format_body(body)?,
        decorator_list,
    }))
}

pub fn class_def(
    class_name: &str,
    bases: Vec<NodeRef>,
    body: Vec<NodeRef>,
    decorator_list: Vec<NodeRef>,
) -> Result<NodeRef> {
    Ok(node(NodeKind::ClassDef {
        name: class_name.to_string(),
        bases,
        body: format_body(body)?,
        decorator_list,
    }))
}

pub fn if_stmt(test: NodeRef, body: Vec<NodeRef>, orelse: Vec<NodeRef>) -> Result<NodeRef> {
    Ok(node(NodeKind::If {
        test,
        body: format_body(body)?,
        orelse,
    }))
}

pub fn for_stmt(
    target: NodeRef,
    iter: NodeRef,
    body: Vec<NodeRef>,
    orelse: Vec<NodeRef>,
) -> Result<NodeRef> {
    change_ctx(&target, CtxKind::Store);
    Ok(node(NodeKind::For {
        target,
        iter,
        body: format_body(body)?,
        orelse,
    }))
}

pub fn while_stmt(test: NodeRef, body: Vec<NodeRef>) -> Result<NodeRef> {
    Ok(node(NodeKind::While {
        test,
        body: format_body(body)?,
    }))
}

pub fn with_stmt(
    context_expr: NodeRef,
    as_part: Option<NodeRef>,
    body: Vec<NodeRef>,
) -> Result<NodeRef> {
    if let Some(vars) = &as_part {
        change_ctx(vars, CtxKind::Store);
    }
    Ok(node(NodeKind::With {
        context_expr,
        optional_vars: as_part,
        body: format_body(body)?,
    }))
}

pub fn raise_stmt(exception: Option<NodeRef>) -> NodeRef {
    node(NodeKind::Raise { type_: exception })
}

pub fn try_except(
    body: Vec<NodeRef>,
    handlers: Vec<NodeRef>,
    orelse: Vec<NodeRef>,
) -> Result<NodeRef> {
    Ok(node(NodeKind::TryExcept {
        body: format_body(body)?,
        handlers,
        orelse,
    }))
}

pub fn try_finally(body: Vec<NodeRef>, finalbody: Vec<NodeRef>) -> Result<NodeRef> {
    Ok(node(NodeKind::TryFinally {
        body: format_body(body)?,
        finalbody: format_body(finalbody)?,
    }))
}

pub fn except_handler(
    exception_type: Option<NodeRef>,
    name: Option<&str>,
    body: Vec<NodeRef>,
) -> Result<NodeRef> {
    Ok(node(NodeKind::ExceptHandler {
        type_: exception_type,
        name: name.map(str::to_string),
        body: format_body(body)?,
    }))
}

pub fn assert_stmt(test: NodeRef, msg: Option<NodeRef>) -> NodeRef {
    node(NodeKind::Assert { test, msg })
}

pub fn alias(alias_name: &str, asname: Option<&str>) -> NodeRef {
    node(NodeKind::Alias {
        name: alias_name.to_string(),
        asname: asname.map(str::to_string),
    })
}

pub fn import_stmt(import_name: &str, asname: Option<&str>) -> NodeRef {
    node(NodeKind::Import {
        names: vec![alias(import_name, asname)],
    })
}

pub fn import_from(module_name: &str, import_name: &str, asname: Option<&str>) -> NodeRef {
    node(NodeKind::ImportFrom {
        module: module_name.to_string(),
        names: vec![alias(import_name, asname)],
        level: 0,
    })
}

pub fn global_stmt(names: &[&str]) -> NodeRef {
    node(NodeKind::Global {
        names: names.iter().map(|s| s.to_string()).collect(),
    })
}

pub fn pass_stmt() -> NodeRef {
    node(NodeKind::Pass)
}

pub fn break_stmt() -> NodeRef {
    node(NodeKind::Break)
}

pub fn continue_stmt() -> NodeRef {
    node(NodeKind::Continue)
}

/// A blank line.
pub fn syntax_free_line() -> NodeRef {
    node(NodeKind::SyntaxFreeLine {
        comment: None,
        col_offset: 0,
        comment_indent: 1,
    })
}

/// A pure comment line: `{col_offset spaces}#{comment_indent spaces}{text}`.
pub fn comment_line(text: &str, col_offset: usize, comment_indent: usize) -> NodeRef {
    node(NodeKind::SyntaxFreeLine {
        comment: Some(text.to_string()),
        col_offset,
        comment_indent,
    })
}

/// Rewrites the expression context of every node in the subtree that
/// carries one.
pub fn change_ctx(root: &NodeRef, ctx: CtxKind) {
    {
        let mut borrowed = root.borrow_mut();
        match &mut borrowed.kind {
            NodeKind::Name { ctx: slot, .. }
            | NodeKind::Attribute { ctx: slot, .. }
            | NodeKind::Subscript { ctx: slot, .. }
            | NodeKind::List { ctx: slot, .. }
            | NodeKind::Tuple { ctx: slot, .. } => *slot = ctx,
            _ => {}
        }
    }
    for (_, child) in child_nodes(&root.borrow()) {
        change_ctx(&child, ctx);
    }
}

/// Resolves a textual ctx tag, for callers that carry contexts as strings.
pub fn ctx_from_tag(tag: &str) -> Result<CtxKind> {
    CtxKind::from_tag(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_shape(node: &NodeRef) -> (&'static str, usize) {
        let borrowed = node.borrow();
        match &borrowed.kind {
            NodeKind::BoolOp { op, values } => {
                let op_name = match op.borrow().kind {
                    NodeKind::And => "and",
                    NodeKind::Or => "or",
                    _ => "?",
                };
                (op_name, values.len())
            }
            _ => ("not a chain", 0),
        }
    }

    #[test]
    fn single_operator_chains_stay_flat() {
        let chain = bool_op(
            name("a"),
            vec![("and", name("b")), ("and", name("c"))],
        )
        .unwrap();
        assert_eq!(chain_shape(&chain), ("and", 3));
    }

    #[test]
    fn or_after_and_nests_the_and_chain_on_the_left() {
        let chain = bool_op(name("a"), vec![("and", name("b")), ("or", name("c"))]).unwrap();
        assert_eq!(chain_shape(&chain), ("or", 2));
        if let NodeKind::BoolOp { values, .. } = &chain.borrow().kind {
            assert_eq!(chain_shape(&values[0]), ("and", 2));
        };
    }

    #[test]
    fn and_after_or_nests_the_and_chain_on_the_right() {
        let chain = bool_op(name("a"), vec![("or", name("b")), ("and", name("c"))]).unwrap();
        assert_eq!(chain_shape(&chain), ("or", 2));
        if let NodeKind::BoolOp { values, .. } = &chain.borrow().kind {
            assert_eq!(chain_shape(&values[1]), ("and", 2));
        };
    }

    #[test]
    fn unknown_operator_symbols_are_rejected() {
        assert!(bin_op(name("a"), "@", name("b")).is_err());
        assert!(unary_op("!", name("a")).is_err());
        assert!(compare_op_from_symbol("<>").is_err());
        assert!(bool_op(name("a"), vec![("xor", name("b"))]).is_err());
    }

    #[test]
    fn compare_needs_at_least_one_pair() {
        assert!(compare(name("a"), Vec::new()).is_err());
    }

    #[test]
    fn dict_keys_and_values_must_pair_up() {
        assert!(dict_node(vec![name("a")], Vec::new()).is_err());
    }

    #[test]
    fn modules_need_a_body_and_bodies_need_statements() {
        assert!(module(Vec::new()).is_err());
        assert!(function_def("f", no_arguments(), vec![name("a")], Vec::new()).is_err());
    }

    #[test]
    fn expr_refuses_statements() {
        assert!(expr(pass_stmt()).is_err());
    }

    #[test]
    fn empty_bodies_default_to_pass() {
        let f = function_def("f", no_arguments(), Vec::new(), Vec::new()).unwrap();
        if let NodeKind::FunctionDef { body, .. } = &f.borrow().kind {
            assert_eq!(body.len(), 1);
            assert!(matches!(body[0].borrow().kind, NodeKind::Pass));
        };
    }

    #[test]
    fn assignment_targets_get_store_context() {
        let target = name("a");
        assign(target.clone(), num(1));
        if let NodeKind::Name { ctx, .. } = target.borrow().kind {
            assert_eq!(ctx, CtxKind::Store);
        };
    }

    #[test]
    fn var_references_build_attribute_chains() {
        let reference = dotted("a.b.c").unwrap();
        if let NodeKind::Attribute { attr, value, .. } = &reference.borrow().kind {
            assert_eq!(attr, "c");
            assert!(matches!(
                value.borrow().kind,
                NodeKind::Attribute { .. }
            ));
        } else {
            panic!("expected an attribute chain");
        }
        assert!(var_reference(&[]).is_err());
    }
}
