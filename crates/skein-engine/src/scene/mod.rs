//! Declarative scene model.
//!
//! Responsibilities:
//! - the closed node sum type walked by the scene renderer
//! - typed property bags with tag-aware errors
//! - component references that expand into nodes at render time
//! - thin builders for the default tags (`scene::build`)

pub mod build;
mod node;
mod props;
pub mod tags;

pub use node::{Component, ComponentError, ComponentNode, Element, FnComponent, Node};
pub use props::{PropError, PropErrorKind, PropReader, PropValue, Props};
