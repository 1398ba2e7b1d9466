//! # migsnap-migrate
//!
//! Turns a live catalog into Laravel migration files.
//!
//! ```text
//! ┌──────────┐     ┌──────────────┐     ┌────────┐     ┌───────────────────┐
//! │ Catalog  │────▶│ SchemaReader │────▶│ Schema │────▶│ MigrationRenderer │
//! └──────────┘     └──────────────┘     └────────┘     └───────────────────┘
//!                                                               │
//!                                         TypeMapper per column │
//!                                                               ▼
//!                                                      ┌────────────────┐
//!                                                      │ ArtifactWriter │
//!                                                      └────────────────┘
//! ```
//!
//! Callers may remove tables from the [`Schema`](migsnap_schema::Schema)
//! between reading and rendering; nothing in this crate filters on its own.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use migsnap_migrate::{
//!     ColumnRow, FkMode, GenerationContext, MemoryCatalog, MigrationRenderer, SchemaReader,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = MemoryCatalog::new("shop").with_table(
//!     "users",
//!     vec![ColumnRow::new("id", "bigint", "bigint unsigned").extra("auto_increment")],
//! );
//!
//! let result = SchemaReader::new().read(&catalog).await.unwrap();
//! let at = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let artifacts =
//!     MigrationRenderer::new().render(&result.schema, &GenerationContext::new(at), FkMode::Separate);
//!
//! assert_eq!(artifacts[0].file_name, "2026_10_19_120000_000001_create_users_table.php");
//! assert!(artifacts[0].up.contains("$table->id();"));
//! # }
//! ```

pub mod error;
pub mod file;
pub mod introspect;
pub mod php;
pub mod render;
pub mod typemap;

pub use error::{MigrateResult, MigrationError};
pub use file::ArtifactWriter;
pub use introspect::{
    Catalog, ColumnRow, ForeignKeyRow, IntrospectionResult, MemoryCatalog, SchemaReader,
    SkippedConstraint,
};
pub use render::{Artifact, ArtifactKind, FkMode, GenerationContext, MigrationRenderer};
pub use typemap::{
    Approximation, Arg, BlueprintMethod, TypeMapper, TypeMapping, approximated_columns,
    is_boolean_flag, parse_enum_members,
};
