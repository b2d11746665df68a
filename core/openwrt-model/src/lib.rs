//! Core model for the OpenWrt provider.
//!
//! Defines the types every other crate in the workspace depends on:
//! - [`Value`] / [`AttrValue`]: three-state configuration values (known, null, unknown)
//! - [`Diagnostics`]: ordered error/warning report threaded through each stage
//! - [`EntitySchema`]: declares an entity type's attributes and who supplies them
//! - [`decode`] / [`FromObject`]: schema-checked decoding into typed models
//! - [`State`] / [`IntoObject`]: the fully populated attribute map written after a read
//!
//! These types form the contract between the provider and the host engine.

mod decode;
mod diagnostics;
mod schema;
mod state;
mod value;

pub use decode::{FromObject, ObjectReader, decode, validate};
pub use diagnostics::{AttributePath, Diagnostic, Diagnostics, PathStep, Severity};
pub use schema::{AttrKind, AttrMode, AttributeSchema, EntitySchema};
pub use state::{IntoObject, State};
pub use value::{AttrValue, ObjectValue, Value};
