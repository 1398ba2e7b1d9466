//! Catalog model types.

mod column;
mod foreign_key;
mod native;
mod schema;
mod table;

pub use column::{Column, ColumnDefault};
pub use foreign_key::{ForeignKey, ReferentialAction};
pub use native::NativeType;
pub use schema::{Schema, SchemaStats};
pub use table::Table;
