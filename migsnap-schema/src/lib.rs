//! # migsnap-schema
//!
//! Typed model of a relational catalog snapshot.
//!
//! This crate provides:
//! - [`Column`], [`ForeignKey`] and [`Table`] records normalized from catalog rows
//! - [`Schema`], the lexically ordered set of tables produced by one introspection run
//! - [`NativeType`], the closed classification of engine column types
//!
//! The model carries no behavior beyond structure and the invariants enforced
//! by its constructors. Reading a catalog lives in `migsnap-migrate`.
//!
//! ## Example
//!
//! ```rust
//! use migsnap_schema::{Column, ForeignKey, ReferentialAction, Schema, Table};
//!
//! let mut users = Table::new("users");
//! users.add_column(Column::new("id", "bigint").auto_increment(true)).unwrap();
//!
//! let mut posts = Table::new("posts");
//! posts.add_column(Column::new("user_id", "bigint")).unwrap();
//! posts
//!     .add_foreign_key(
//!         ForeignKey::new("posts_user_id_foreign", "posts", ["user_id"], "users", ["id"])
//!             .unwrap()
//!             .on_delete(ReferentialAction::Cascade),
//!     )
//!     .unwrap();
//!
//! let schema = Schema::from_tables([posts, users]).unwrap();
//! assert_eq!(schema.table_names().collect::<Vec<_>>(), ["posts", "users"]);
//! ```

pub mod error;
pub mod model;

pub use error::{SchemaError, SchemaResult};
pub use model::*;
