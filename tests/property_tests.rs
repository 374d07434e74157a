//! Property tests: generated identifiers and spacing must round-trip, and
//! value edits must leave the surrounding layout untouched.

use proptest::prelude::*;
use srcmatch::ast::NodeKind;
use srcmatch::{build, get_source, match_source};

proptest! {
    #[test]
    fn assignments_round_trip(
        lhs in "[a-z][a-z0-9_]{0,8}",
        rhs in "[a-z][a-z0-9_]{0,8}",
        pad_left in " {0,3}",
        pad_right in " {0,3}",
    ) {
        let text = format!("{}{}={}{}\n", lhs, pad_left, pad_right, rhs);
        let tree = build::assign(build::name(&lhs), build::name(&rhs));
        let matched = match_source(&tree, &text).unwrap();
        prop_assert_eq!(&matched, &text);
        prop_assert_eq!(&get_source(&tree).unwrap(), &text);
    }

    #[test]
    fn paren_wrapping_round_trips(
        id in "[a-z][a-z0-9_]{0,8}",
        pad_open in " {0,2}",
        pad_close in " {0,2}",
    ) {
        let text = format!("({}{}{})", pad_open, id, pad_close);
        let tree = build::name(&id);
        let matched = match_source(&tree, &text).unwrap();
        prop_assert_eq!(&matched, &text);
        prop_assert_eq!(&get_source(&tree).unwrap(), &text);
    }

    #[test]
    fn value_edits_are_local(
        lhs in "[a-z][a-z0-9_]{0,8}",
        rhs in "[a-z][a-z0-9_]{0,8}",
        pad_left in " {0,3}",
        pad_right in " {0,3}",
    ) {
        let text = format!("{}{}={}{}\n", lhs, pad_left, pad_right, rhs);
        let value = build::name(&rhs);
        let tree = build::assign(build::name(&lhs), value.clone());
        match_source(&tree, &text).unwrap();
        if let NodeKind::Name { id, .. } = &mut value.borrow_mut().kind {
            *id = "edited".to_string();
        }
        let expected = format!("{}{}={}{}\n", lhs, pad_left, pad_right, "edited");
        prop_assert_eq!(&get_source(&tree).unwrap(), &expected);
    }
}
