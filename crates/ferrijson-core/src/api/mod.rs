//! Public API: the file-backed store, the chainable query builder, and patch application.

pub mod query;
pub mod store;
pub mod update;

pub use query::{QueryBuilder, RecordSet};
pub use store::{Store, StoreBuilder};
pub use update::apply_patch;
