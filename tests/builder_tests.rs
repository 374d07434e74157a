//! Tests for the node-construction facade as seen by a library consumer:
//! structural shapes, context propagation, and validation errors.

use srcmatch::ast::NodeKind;
use srcmatch::{build, get_source_no_indent, CtxKind, Error};

#[test]
fn import_builders_produce_alias_lists() {
    let plain = build::import_stmt("os", None);
    if let NodeKind::Import { names } = &plain.borrow().kind {
        assert_eq!(names.len(), 1);
        if let NodeKind::Alias { name, asname } = &names[0].borrow().kind {
            assert_eq!(name, "os");
            assert!(asname.is_none());
        } else {
            panic!("expected an alias");
        }
    } else {
        panic!("expected an import");
    }

    let from = build::import_from("os", "path", Some("p"));
    if let NodeKind::ImportFrom { module, names, .. } = &from.borrow().kind {
        assert_eq!(module, "os");
        if let NodeKind::Alias { asname, .. } = &names[0].borrow().kind {
            assert_eq!(asname.as_deref(), Some("p"));
        }
    } else {
        panic!("expected an import-from");
    };
}

#[test]
fn arguments_builder_appends_defaulted_names() {
    let args = build::arguments_node(&["a"], vec![("b", build::name("c"))], None, None);
    if let NodeKind::Arguments {
        args: names,
        defaults,
        ..
    } = &args.borrow().kind
    {
        assert_eq!(names.len(), 2);
        assert_eq!(defaults.len(), 1);
        if let NodeKind::Name { id, ctx } = &names[1].borrow().kind {
            assert_eq!(id, "b");
            assert_eq!(*ctx, CtxKind::Param);
        }
    } else {
        panic!("expected an arguments node");
    };
}

#[test]
fn change_ctx_reaches_tuple_elements() {
    let tuple = build::tuple_node(vec![build::name("a"), build::name("b")], CtxKind::Load);
    build::change_ctx(&tuple, CtxKind::Store);
    if let NodeKind::Tuple { elts, ctx } = &tuple.borrow().kind {
        assert_eq!(*ctx, CtxKind::Store);
        for elt in elts {
            if let NodeKind::Name { ctx, .. } = &elt.borrow().kind {
                assert_eq!(*ctx, CtxKind::Store);
            };
        }
    };
}

#[test]
fn comment_lines_render_their_pieces() {
    let line = build::comment_line("note", 2, 1);
    assert_eq!(get_source_no_indent(&line).unwrap(), "  # note\n");
    let blank = build::syntax_free_line();
    assert_eq!(get_source_no_indent(&blank).unwrap(), "\n");
}

#[test]
fn ctx_tags_resolve_like_the_upstream_enumeration() {
    assert_eq!(build::ctx_from_tag("param").unwrap(), CtxKind::Param);
    assert!(matches!(
        build::ctx_from_tag("frobnicate"),
        Err(Error::InvalidCtx(_))
    ));
}

#[test]
fn subscript_builder_wraps_a_slice() {
    let sub = build::subscript(build::name("a"), Some(build::num(1)), None, None);
    if let NodeKind::Subscript { slice, .. } = &sub.borrow().kind {
        assert!(matches!(slice.borrow().kind, NodeKind::Slice { .. }));
    } else {
        panic!("expected a subscript");
    };
}
