// Copyright 2025 DataStax Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License
// is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express
// or implied. See the License for the specific language governing permissions and limitations under
// the License.

//! Structural type compatibility for workflow bindings.
//!
//! The compatibility check asks one question: can a value of the `actual`
//! type be handed to a consumer expecting the `expected` type? The answer
//! is exact, coercible via a registered rule, ambiguous, or incompatible
//! with reasons. Inference walks binding paths through a per-workflow
//! [`StoreEnvironment`] to produce the `actual` side.

mod coercion;
mod compat;
mod environment;
mod error;
mod infer;

pub use coercion::{CoercionRegistry, CoercionRule};
pub use compat::{Compatibility, compatible};
pub use environment::StoreEnvironment;
pub use error::InferError;
pub use infer::infer;
