//! In-memory hierarchical namespace.
//!
//! A tree of named nodes rooted at a single container. Containers hold
//! uniquely named children, leaves hold append-only text. Nodes are addressed
//! by absolute, slash-delimited paths.

mod namespace;
mod node;
mod path;

pub use namespace::{DirEntry, Namespace, NamespaceError};
pub use node::NodeKind;
pub use path::{NamespacePath, PathParseError};
