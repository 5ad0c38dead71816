//! # FerriJSON
//!
//! An embedded JSON record store backed by a single file, with a small
//! string condition language.
//!
//! Records are JSON objects held in memory. Every mutation rewrites the whole
//! document as a pretty-printed JSON array. Queries are built by chaining
//! `field operator value` conditions (dot paths reach into nested objects)
//! or arbitrary closures.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ferrijson_core::api::Store;
//! use serde_json::json;
//!
//! let mut store = Store::open("users.json");
//!
//! store.insert(json!({"name": "John", "age": 30})).unwrap();
//! store.insert(json!({"name": "Jane", "age": 15})).unwrap();
//!
//! // Chained filters narrow the result.
//! let q = store.filter("age >= 18").filter("name contains \"oh\"");
//! assert_eq!(q.count(), 1);
//!
//! // Dotted patch keys create nested objects.
//! store
//!     .update_where("name = John", &json!({"profile.active": true}))
//!     .unwrap();
//!
//! let removed = store.delete_where("age < 18").unwrap();
//! assert_eq!(removed, 1);
//! ```
//!
//! ## Operators
//!
//! | symbol | matches when |
//! |---|---|
//! | `=` / `!=` | values are (not) equal in type and value |
//! | `>` `<` `>=` `<=` | both sides are numbers and the ordering holds |
//! | `contains` `startsWith` `endsWith` | both sides are strings and the relation holds |

pub mod api;
pub mod condition;
pub mod error;
pub mod storage;
pub mod types;
