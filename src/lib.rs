//! # migsnap
//!
//! Snapshot a live MySQL schema into deterministic Laravel migrations.
//!
//! migsnap provides:
//! - A typed catalog model (tables, columns, foreign keys) in lexical order
//! - A catalog reader that groups composite foreign keys and reports malformed ones
//! - A total type mapper from MySQL column types to Laravel Blueprint calls
//! - A pure renderer: the same schema and run timestamp always give the same files
//! - MySQL plumbing for temporary databases and `.sql` dump import (`mysql` feature)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use migsnap::prelude::*;
//! use migsnap::mysql::{MysqlCatalog, MysqlConfig, MysqlPool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = MysqlPool::new(MysqlConfig::from_url("mysql://root@127.0.0.1/shop")?);
//!     let result = SchemaReader::new().read(&MysqlCatalog::new(pool)?).await?;
//!
//!     let mut schema = result.schema;
//!     schema.exclude(["migrations", "failed_jobs"]);
//!
//!     let artifacts =
//!         MigrationRenderer::new().render(&schema, &GenerationContext::now(), FkMode::Separate);
//!     ArtifactWriter::new("database/migrations/imported")
//!         .write_all(&artifacts)
//!         .await?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Catalog model types.
pub mod schema {
    pub use migsnap_schema::*;
}

/// Introspection, type mapping and migration rendering.
pub mod migrate {
    pub use migsnap_migrate::*;
}

/// MySQL catalog, temporary databases and dump import.
#[cfg(feature = "mysql")]
#[cfg_attr(docsrs, doc(cfg(feature = "mysql")))]
pub mod mysql {
    pub use migsnap_mysql::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::migrate::{
        ArtifactWriter, Catalog, FkMode, GenerationContext, MemoryCatalog, MigrationRenderer,
        SchemaReader, TypeMapper,
    };
    pub use crate::schema::{Column, ForeignKey, Schema, Table};
}

// Re-export key types at the crate root
pub use migrate::{MigrateResult, MigrationError};
pub use schema::{Schema, SchemaError};
