//! Mutation tests: after matching, edit exactly one semantic field and
//! check the regenerated source changes only in the corresponding region,
//! with all surrounding formatting intact. Also covers default rendering of
//! trees that were never matched, and indentation fix-up for statements
//! inserted into an annotated module.

use srcmatch::ast::NodeKind;
use srcmatch::{
    build, get_source, get_source_in_module, get_source_no_indent, match_source, set_str_quote,
    CtxKind, Error, NodeRef, NumVal,
};

fn rename(node: &NodeRef, new_id: &str) {
    if let NodeKind::Name { id, .. } = &mut node.borrow_mut().kind {
        *id = new_id.to_string();
    } else {
        panic!("not a name node");
    }
}

// =============================================================================
// Scalar mutations
// =============================================================================

#[test]
fn renaming_an_identifier_keeps_the_layout() {
    let tree = build::name("foobar");
    match_source(&tree, "foobar").unwrap();
    rename(&tree, "hello");
    assert_eq!(get_source(&tree).unwrap(), "hello");
}

#[test]
fn renaming_keeps_surrounding_whitespace() {
    let lhs = build::name("a");
    let tree = build::assign(lhs.clone(), build::num(1));
    match_source(&tree, "a  =  1\n").unwrap();
    rename(&lhs, "renamed");
    assert_eq!(get_source(&tree).unwrap(), "renamed  =  1\n");
}

#[test]
fn changing_an_attribute_keeps_the_receiver() {
    let tree = build::var_reference(&["foo", "bar"]).unwrap();
    match_source(&tree, "foo.bar").unwrap();
    if let NodeKind::Attribute { attr, .. } = &mut tree.borrow_mut().kind {
        *attr = "hello".to_string();
    }
    assert_eq!(get_source(&tree).unwrap(), "foo.hello");
}

#[test]
fn swapping_a_binary_operator_keeps_the_operands() {
    let tree = build::bin_op(build::name("a"), ">>", build::name("b")).unwrap();
    match_source(&tree, "a >> b").unwrap();
    if let NodeKind::BinOp { op, .. } = &mut tree.borrow_mut().kind {
        *op = build::bin_op_from_symbol("<<").unwrap();
    }
    assert_eq!(get_source(&tree).unwrap(), "a << b");
}

#[test]
fn changing_a_number_invalidates_the_lexeme() {
    let tree = build::num(255);
    match_source(&tree, "0xff").unwrap();
    assert_eq!(get_source(&tree).unwrap(), "0xff");
    if let NodeKind::Num { n } = &mut tree.borrow_mut().kind {
        *n = NumVal::Int(10);
    }
    assert_eq!(get_source(&tree).unwrap(), "10");
}

#[test]
fn number_suffixes_survive_value_changes() {
    let tree = build::num(1);
    match_source(&tree, "1L").unwrap();
    if let NodeKind::Num { n } = &mut tree.borrow_mut().kind {
        *n = NumVal::Int(2);
    }
    assert_eq!(get_source(&tree).unwrap(), "2L");
}

// =============================================================================
// String mutations
// =============================================================================

fn set_payload(tree: &NodeRef, payload: &str) {
    if let NodeKind::Str { s } = &mut tree.borrow_mut().kind {
        *s = payload.to_string();
    }
}

#[test]
fn changing_a_string_payload_keeps_the_quotes() {
    let tree = build::str_node("foobar");
    match_source(&tree, "\"foobar\"").unwrap();
    set_payload(&tree, "hello");
    assert_eq!(get_source(&tree).unwrap(), "\"hello\"");
}

#[test]
fn changing_a_concatenated_string_collapses_the_parts() {
    let tree = build::str_node("foobar");
    match_source(&tree, "\"foo\"\n\"bar\"").unwrap();
    set_payload(&tree, "foobaz");
    assert_eq!(get_source(&tree).unwrap(), "\"foobaz\"");
}

#[test]
fn adjacent_strings_collapse_on_mutation() {
    let tree = build::str_node("ab");
    match_source(&tree, "\"a\" \"b\"").unwrap();
    assert_eq!(get_source(&tree).unwrap(), "\"a\" \"b\"");
    set_payload(&tree, "c");
    assert_eq!(get_source(&tree).unwrap(), "\"c\"");
}

#[test]
fn quote_style_can_be_overridden() {
    let tree = build::str_node("foobar");
    match_source(&tree, "\"foobar\"").unwrap();
    set_str_quote(&tree, "'").unwrap();
    assert_eq!(get_source(&tree).unwrap(), "'foobar'");
}

#[test]
fn quote_style_can_become_triple() {
    let tree = build::str_node("foobar");
    match_source(&tree, "\"foobar\"").unwrap();
    set_str_quote(&tree, "'''").unwrap();
    assert_eq!(get_source(&tree).unwrap(), "'''foobar'''");
}

#[test]
fn quote_overrides_need_a_string_matcher() {
    let tree = build::name("a");
    match_source(&tree, "a").unwrap();
    assert!(matches!(set_str_quote(&tree, "'"), Err(Error::Value(_))));
}

// =============================================================================
// Structured mutations
// =============================================================================

#[test]
fn changing_a_dict_key_keeps_the_other_entries() {
    let first_key = build::name("a");
    let tree = build::dict_node(
        vec![first_key.clone(), build::str_node("c")],
        vec![build::name("b"), build::str_node("d")],
    )
    .unwrap();
    match_source(&tree, "{a: b, \"c\": \"d\"}").unwrap();
    rename(&first_key, "k");
    assert_eq!(get_source(&tree).unwrap(), "{k: b, \"c\": \"d\"}");
}

#[test]
fn changing_a_dict_value_keeps_the_other_entries() {
    let first_value = build::name("b");
    let tree = build::dict_node(
        vec![build::name("a"), build::str_node("c")],
        vec![first_value.clone(), build::str_node("d")],
    )
    .unwrap();
    match_source(&tree, "{a: b, \"c\": \"d\"}").unwrap();
    rename(&first_value, "k");
    assert_eq!(get_source(&tree).unwrap(), "{a: k, \"c\": \"d\"}");
}

#[test]
fn conditional_expressions_accept_new_parts() {
    let tree = build::if_exp(build::name("True"), build::name("a"), build::name("b"));
    match_source(&tree, "a if True else b").unwrap();
    if let NodeKind::IfExp { test, body, orelse } = &mut tree.borrow_mut().kind {
        *test = build::name("False");
        *body = build::name("c");
        *orelse = build::name("d");
    }
    assert_eq!(get_source(&tree).unwrap(), "c if False else d");
}

#[test]
fn class_defs_accept_wholesale_edits() {
    let tree = build::class_def(
        "TestClass",
        vec![build::name("Base1"), build::name("Base2")],
        vec![build::expr(build::name("a")).unwrap()],
        vec![build::name("dec"), build::call(build::name("dec2"), Vec::new())],
    )
    .unwrap();
    match_source(&tree, "@dec\n@dec2()\nclass TestClass(Base1, Base2):\n  a\n").unwrap();
    if let NodeKind::ClassDef {
        name,
        bases,
        body,
        decorator_list,
    } = &mut tree.borrow_mut().kind
    {
        *name = "TestClass2".to_string();
        *bases = vec![build::name("Base3")];
        *decorator_list = vec![build::name("dec3")];
        if let NodeKind::Expr { value } = &body[0].borrow().kind {
            rename(value, "x");
        }
    }
    assert_eq!(
        get_source(&tree).unwrap(),
        "@dec3\nclass TestClass2(Base3):\n  x\n"
    );
}

#[test]
fn with_targets_accept_element_replacement() {
    let target = build::tuple_node(vec![build::name("b"), build::name("c")], CtxKind::Store);
    let tree = build::with_stmt(build::name("a"), Some(target.clone()), Vec::new()).unwrap();
    match_source(&tree, "with a as (b, c):\n  pass\n").unwrap();
    if let NodeKind::With { context_expr, .. } = &mut tree.borrow_mut().kind {
        *context_expr = build::name("d");
    }
    if let NodeKind::Tuple { elts, .. } = &mut target.borrow_mut().kind {
        elts[0] = build::name("e");
        elts[1] = build::name("f");
    }
    assert_eq!(get_source(&tree).unwrap(), "with d as (e, f):\n  pass\n");
}

#[test]
fn body_statements_can_be_edited_in_place() {
    let inner = build::name("foobar");
    let tree = build::module(vec![
        build::expr(inner.clone()).unwrap(),
        build::expr(build::name("baz")).unwrap(),
    ])
    .unwrap();
    match_source(&tree, "foobar\nbaz\n").unwrap();
    rename(&inner, "hello");
    assert_eq!(get_source(&tree).unwrap(), "hello\nbaz\n");
}

// =============================================================================
// Default rendering (never matched)
// =============================================================================

#[test]
fn expressions_render_defaults_without_a_match() {
    assert_eq!(
        get_source(&build::bin_op(build::name("a"), "+", build::name("b")).unwrap()).unwrap(),
        "a + b"
    );
    assert_eq!(get_source(&build::str_node("s")).unwrap(), "\"s\"");
    assert_eq!(get_source(&build::num(42)).unwrap(), "42");
    assert_eq!(
        get_source(
            &build::tuple_node(vec![build::name("a"), build::name("b")], CtxKind::Load)
        )
        .unwrap(),
        "(a, b)"
    );
}

#[test]
fn statements_refuse_default_rendering_without_indent_context() {
    let stmt = build::pass_stmt();
    assert!(matches!(get_source(&stmt), Err(Error::Value(_))));
    assert_eq!(get_source_no_indent(&stmt).unwrap(), "pass\n");
}

#[test]
fn synthesized_assignments_render_defaults() {
    let tree = build::assign(build::name("a"), build::num(1));
    assert_eq!(get_source_no_indent(&tree).unwrap(), "a = 1\n");
}

// =============================================================================
// Inserting statements into an annotated module
// =============================================================================

#[test]
fn inserted_statements_pick_up_their_indentation() {
    let f = build::function_def(
        "f",
        build::no_arguments(),
        vec![build::expr(build::name("a")).unwrap()],
        Vec::new(),
    )
    .unwrap();
    let module = build::module(vec![f.clone()]).unwrap();
    match_source(&module, "def f():\n  a\n").unwrap();

    let inserted = build::expr(build::name("b")).unwrap();
    if let NodeKind::FunctionDef { body, .. } = &mut f.borrow_mut().kind {
        body.push(inserted.clone());
    }
    assert_eq!(get_source_in_module(&inserted, &module).unwrap(), "  b\n");
    assert_eq!(get_source(&module).unwrap(), "def f():\n  a\n  b\n");
}
