#![allow(clippy::enum_variant_names)]

//! In-memory hierarchical file tree with a script runner and a small shell.

pub mod application;
pub mod cli;
pub mod namespace;
pub mod script;
pub mod shell;

pub use namespace::{Namespace, NamespaceError};
