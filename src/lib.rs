// Copyright 2025-2026 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]

//! # dexscope
//!
//! An intraprocedural **reflection dataflow analysis** for a register-based DEX-style
//! bytecode IR, built in pure Rust. Given a single method, the analysis
//! over-approximates, for every instruction and every virtual register, which
//! reflection-relevant runtime value the register may hold - a string literal, a class
//! object, or a reflective field/method handle - so that shrinkers, renamers, and
//! keep-rule generators can avoid breaking entities that are named dynamically.
//!
//! # Architecture
//!
//! The library is organized into layers that build on each other:
//!
//! - **Metadata Layer**: Interned strings, types, and member references, plus the
//!   method model ([`crate::metadata`])
//! - **Assembly Layer**: The DEX instruction representation, basic-block splitting, and
//!   a label-based method assembler ([`crate::assembly`])
//! - **Analysis Layer**: Control flow graphs, a generic forward data flow framework,
//!   and the reflection analysis itself ([`crate::analysis`])
//!
//! ## Key Components
//!
//! - [`crate::analysis::reflection::ReflectionAnalysis`] - Per-method analysis and query API
//! - [`crate::analysis::reflection::AbstractObject`] - The tracked reflection-relevant values
//! - [`crate::analysis::dataflow`] - Worklist fixpoint framework over join semi-lattices
//! - [`crate::metadata::DexContext`] - Interning pools with canonical, identity-comparable handles
//! - [`crate::prelude`] - Convenient re-exports of commonly used types
//! - [`crate::Error`] and [`crate::Result`] - Error handling
//!
//! # Usage Example
//!
//! ```rust
//! use dexscope::prelude::*;
//!
//! let ctx = DexContext::new();
//!
//! // v0 <- "com.foo.Bar"; v1 <- Class.forName(v0); v1.getDeclaredConstructors()
//! let for_name = ctx.method_ref(
//!     "Ljava/lang/Class;", "forName", &["Ljava/lang/String;"], "Ljava/lang/Class;",
//! );
//! let ctors = ctx.method_ref(
//!     "Ljava/lang/Class;", "getDeclaredConstructors", &[],
//!     "[Ljava/lang/reflect/Constructor;",
//! );
//!
//! let mut asm = MethodAssembler::new(&ctx);
//! asm.const_string("com.foo.Bar")
//!     .move_result_pseudo_object(0)
//!     .invoke_static(&for_name, &[0])
//!     .move_result_object(1)
//!     .invoke_virtual(&ctors, &[1])
//!     .return_void();
//!
//! let method = Method::new(
//!     ctx.type_ref("Lcom/foo/Caller;"),
//!     ctx.string("run"),
//!     ctx.proto(&[], "V"),
//!     MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
//! )
//! .with_body(MethodBody::new(2, asm.finish()?));
//!
//! let analysis = ReflectionAnalysis::new(&ctx, &method)?;
//! assert!(analysis.has_found_reflection());
//! # Ok::<(), dexscope::Error>(())
//! ```
//!
//! # Scope
//!
//! The analysis is intraprocedural and synchronous: one `ReflectionAnalysis` instance
//! processes one method to completion, with no I/O and no retries. Failure surfaces as
//! an absence of information, not as an error. Different instances may run concurrently
//! as long as they share a [`crate::metadata::DexContext`], whose pools are safe for
//! concurrent reads and interning.

mod error;

pub mod analysis;
pub mod assembly;
pub mod metadata;
pub mod prelude;
pub mod utils;

pub use error::Error;

/// The result type used throughout dexscope.
pub type Result<T> = std::result::Result<T, Error>;
