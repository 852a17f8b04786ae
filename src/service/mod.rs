// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration store.
//!
//! [`ConfigStore`] owns the entries, the namespace index and the validators.
//! [`StoreBuilder`] assembles one from sources, and [`Scope`]/[`ScopeMut`] are
//! prefix views over it.

pub mod builder;
pub mod scope;
pub mod store;

// Re-export commonly used types
pub use builder::StoreBuilder;
pub use scope::{Scope, ScopeMut};
pub use store::ConfigStore;
