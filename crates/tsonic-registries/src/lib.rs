//! Binding and metadata registries (C2).
//!
//! These are built eagerly during program loading and treated as read-only
//! for the remainder of a compiler run (spec §5).

pub mod binding;
pub mod error;
pub mod loader;
pub mod metadata;

pub use binding::{BindingEntry, BindingKind, BindingRegistry};
pub use error::RegistryError;
pub use metadata::{MemberKind, MemberMetadata, MetadataRegistry, ParamModifier, TypeKind, TypeMetadata};
