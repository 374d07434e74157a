//! Snapshot tests over the debug dumps and rendered source.

use srcmatch::ast::NodeKind;
use srcmatch::{build, debug, get_source, match_source};

#[test]
fn outline_of_an_assignment() {
    let tree = build::assign(build::name("a"), build::num(1));
    insta::assert_snapshot!(debug::outline(&tree), @r###"
    Assign
      Name(a)
      Num(1)
    "###);
}

#[test]
fn outline_of_a_function() {
    let args = build::arguments_node(&["x"], Vec::new(), None, None);
    let call = build::call(build::name("g"), vec![build::name("x")]);
    let tree = build::function_def(
        "f",
        args,
        vec![build::expr(call).unwrap()],
        Vec::new(),
    )
    .unwrap();
    insta::assert_snapshot!(debug::outline(&tree), @r###"
    FunctionDef(f)
      arguments
        Name(x)
      Expr
        Call
          Name(g)
          Name(x)
    "###);
}

#[test]
fn json_dump_of_a_name() {
    let value = debug::to_json(&build::name("x"));
    insta::assert_snapshot!(serde_json::to_string_pretty(&value).unwrap(), @r###"
    {
      "kind": {
        "Name": {
          "id": "x",
          "ctx": "Load"
        }
      }
    }
    "###);
}

#[test]
fn rendered_module_after_an_edit() {
    let target = build::name("total");
    let tree = build::module(vec![
        build::expr(build::str_node("docs")).unwrap(),
        build::assign(target.clone(), build::num(10)),
    ])
    .unwrap();
    match_source(&tree, "\"docs\"\n\ntotal  = 10\n").unwrap();
    if let NodeKind::Name { id, .. } = &mut target.borrow_mut().kind {
        *id = "count".to_string();
    }
    insta::assert_snapshot!(get_source(&tree).unwrap(), @r###"
    "docs"

    count  = 10
    "###);
}
