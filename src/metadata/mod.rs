//! DEX metadata pools and the method model.
//!
//! This module provides the interned substrate the analysis layer consumes:
//!
//! - [`DexContext`] - Owning facade over all interning pools
//! - [`TypeRegistry`] / [`DexType`] - Interned types with flavor queries
//! - [`StringPool`] - Interned string literals
//! - [`MethodRef`] / [`FieldRef`] / [`ProtoRef`] - Interned member references
//! - [`Method`] / [`MethodBody`] - The method model analyses are constructed over
//! - [`external_to_internal`] / [`internal_to_external`] - Type-name conversion
//!
//! # Interning and Identity
//!
//! Every pool returns a canonical `Arc` per key: interning the same descriptor, string,
//! or signature twice yields clones of one allocation. The reflection analysis depends on
//! this - it matches calls against pre-resolved API handles with `Arc::ptr_eq`, which
//! silently never fires if the pools handed out fresh allocations per lookup.

mod context;
mod method;
mod names;
mod refs;
mod strings;
mod typesystem;

pub use context::DexContext;
pub use method::{Method, MethodAccessFlags, MethodBody};
pub use names::{external_to_internal, internal_to_external};
pub use refs::{FieldRef, FieldRefRc, MethodRef, MethodRefRc, ProtoRc, ProtoRef};
pub use strings::{DexStringRc, StringPool};
pub use typesystem::{descriptors, DexType, TypeRc, TypeRegistry};
