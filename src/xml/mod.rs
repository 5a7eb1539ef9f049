//! A small namespace aware XML element tree.
//!
//! Every element and attribute name is written as `prefix:local` and is checked against a
//! [Namespaces] table at the point where it's supplied, so a typo in a prefix shows up while
//! building the tree rather than when a consumer tries to open the generated document.

pub(crate) mod element;
pub(crate) mod namespaces;

pub use element::{Element, SerializeError, SerializeOptions};
pub use namespaces::{NamespaceError, Namespaces, QualifiedName};
