//! srcmatch — format-preserving source matching for Python 2 ASTs.
//!
//! An AST node, once *annotated* by matching it against a fragment of
//! source text, remembers every piece of surrounding whitespace, comment,
//! punctuation and quoting choice. Regenerating source from the annotated
//! tree reproduces the input byte for byte; mutating semantic fields
//! (renaming an identifier, swapping an operator, editing a string payload)
//! re-emits the new value inside the original formatting.
//!
//! ```
//! use srcmatch::build;
//! use srcmatch::source::{get_source, match_source};
//!
//! let lhs = build::name("a");
//! let stmt = build::assign(lhs.clone(), build::num(1));
//! match_source(&stmt, "a  =  1\n").unwrap();
//!
//! // Byte-exact round trip.
//! assert_eq!(get_source(&stmt).unwrap(), "a  =  1\n");
//!
//! // Mutations keep the recorded formatting around them.
//! if let srcmatch::ast::NodeKind::Name { id, .. } = &mut lhs.borrow_mut().kind {
//!     *id = "renamed".to_string();
//! }
//! assert_eq!(get_source(&stmt).unwrap(), "renamed  =  1\n");
//! ```
//!
//! The grammar is encoded as declarative *templates* (see
//! [`source::placeholder`]); kinds too irregular for a flat template get
//! custom matchers ([`source::custom`]). Trees are built with the
//! constructors in [`build`] or by any upstream parser producing the
//! [`ast::NodeKind`] shape. No parsing of raw Python happens here.
//!
//! Everything is synchronous and single-threaded; matchers record state on
//! the nodes they annotate, so concurrent callers must work on disjoint
//! trees.

pub mod ast;
pub mod build;
pub mod debug;
pub mod error;
pub mod source;
pub mod tree;

pub use ast::{node, CtxKind, FieldValue, Node, NodeKind, NodeRef, NumVal};
pub use error::{Error, Result};
pub use source::{
    ensure_matcher, field_source, fix_source_indentation, get_source, get_source_in_module,
    get_source_no_indent, match_source, set_str_quote,
};
