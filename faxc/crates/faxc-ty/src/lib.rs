//! faxc-ty - the interned type system.
//!
//! Every `Type` the checker deals with lives in a [`TypeStore`] arena and
//! is referred to by its [`TypeId`]. Two structurally identical types
//! (same storage class, same flags, same payload) always resolve to the
//! same id, so comparing types for equality is just comparing ids. This
//! crate knows nothing about identifiers, scopes, or the AST — `faxc-sem`
//! walks `faxc_par::ast::Type` and drives the constructors here.

mod predicates;
mod store;

pub use predicates::{Deref, FieldDescriptor};
pub use store::{Field, StorageClass, TypeData, TypeFlags, TypeId, TypePayload, TypeStore, UNDEFINED};
