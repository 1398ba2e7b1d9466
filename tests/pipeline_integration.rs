//! End-to-end tests: catalog rows in, Laravel migration files out.
//!
//! These drive the in-memory catalog through the same reader, renderer and
//! writer the CLI uses, so no database server is needed.

use chrono::NaiveDate;
use migsnap::migrate::{
    ColumnRow, ForeignKeyRow, MigrationError, approximated_columns, render::NO_FOREIGN_KEYS,
};
use migsnap::prelude::*;
use pretty_assertions::assert_eq;

fn ctx() -> GenerationContext {
    let at = NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap();
    GenerationContext::new(at)
}

/// `users` and `orders`, with `orders.user_id -> users.id ON DELETE CASCADE`.
fn shop() -> MemoryCatalog {
    MemoryCatalog::new("shop")
        .with_table(
            "users",
            vec![
                ColumnRow::new("id", "bigint", "bigint unsigned").extra("auto_increment"),
                ColumnRow::new("email", "varchar", "varchar(191)").length(191),
                ColumnRow::new("is_admin", "tinyint", "tinyint(1)").default_expr("0"),
            ],
        )
        .with_table(
            "orders",
            vec![
                ColumnRow::new("id", "bigint", "bigint").extra("auto_increment"),
                ColumnRow::new("user_id", "int", "int(10) unsigned"),
                ColumnRow::new("status", "enum", "enum('new','paid')")
                    .length(4)
                    .default_expr("'new'"),
                ColumnRow::new("created_at", "timestamp", "timestamp")
                    .nullable()
                    .default_expr("CURRENT_TIMESTAMP")
                    .extra("DEFAULT_GENERATED"),
            ],
        )
        .with_foreign_keys(
            "orders",
            vec![
                ForeignKeyRow::new("orders_user_id_foreign", "orders", "user_id", "users", "id")
                    .rules("", "CASCADE"),
            ],
        )
}

async fn render(catalog: &MemoryCatalog, mode: FkMode) -> Vec<migsnap::migrate::Artifact> {
    let result = SchemaReader::new().read(catalog).await.unwrap();
    MigrationRenderer::new().render(&result.schema, &ctx(), mode)
}

#[tokio::test]
async fn test_orders_scenario() {
    let artifacts = render(&shop(), FkMode::Separate).await;

    let names: Vec<_> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
    assert_eq!(
        names,
        [
            "2026_10_19_091500_000001_create_orders_table.php",
            "2026_10_19_091500_000002_create_users_table.php",
            "2026_10_19_091500_000003_add_foreign_keys.php",
        ]
    );

    assert_eq!(
        artifacts[0].up,
        "        Schema::create('orders', function (Blueprint $table) {
            $table->id();
            $table->unsignedInteger('user_id');
            $table->enum('status', ['new', 'paid'])->default('new');
            $table->timestamp('created_at')->nullable()->useCurrent();
        });"
    );

    assert_eq!(
        artifacts[1].up,
        "        Schema::create('users', function (Blueprint $table) {
            $table->id();
            $table->string('email', 191);
            $table->boolean('is_admin')->default('0');
        });"
    );

    let fks = &artifacts[2];
    assert_eq!(
        fks.up,
        "        Schema::table('orders', function (Blueprint $table) {
            $table->foreign('user_id', 'orders_user_id_foreign')->references('id')->on('users')->onDelete('cascade');
        });"
    );
    assert_eq!(
        fks.down,
        "        Schema::table('orders', function (Blueprint $table) {
            $table->dropForeign('orders_user_id_foreign');
        });"
    );
}

#[tokio::test]
async fn test_same_catalog_same_timestamp_is_byte_identical() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    for dir in [first.path(), second.path()] {
        let artifacts = render(&shop(), FkMode::Separate).await;
        ArtifactWriter::new(dir).write_all(&artifacts).await.unwrap();
    }

    let mut a: Vec<_> = std::fs::read_dir(first.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    a.sort();
    assert_eq!(a.len(), 3);

    for path in a {
        let name = path.file_name().unwrap();
        let left = std::fs::read(&path).unwrap();
        let right = std::fs::read(second.path().join(name)).unwrap();
        assert_eq!(left, right, "{} differs", name.to_string_lossy());
    }
}

#[tokio::test]
async fn test_composite_foreign_key_keeps_position_order() {
    let catalog = MemoryCatalog::new("shop")
        .with_table(
            "orders",
            vec![
                ColumnRow::new("id", "int", "int").extra("auto_increment"),
                ColumnRow::new("rev", "int", "int"),
            ],
        )
        .with_table(
            "order_lines",
            vec![
                ColumnRow::new("order_id", "int", "int"),
                ColumnRow::new("order_rev", "int", "int"),
            ],
        )
        .with_foreign_keys(
            "order_lines",
            vec![
                ForeignKeyRow::new("lines_order_foreign", "order_lines", "order_rev", "orders", "rev")
                    .position(2),
                ForeignKeyRow::new("lines_order_foreign", "order_lines", "order_id", "orders", "id")
                    .position(1),
            ],
        );

    let artifacts = render(&catalog, FkMode::Separate).await;
    let fks = artifacts.last().unwrap();

    assert!(fks.up.contains(
        "$table->foreign(['order_id', 'order_rev'], 'lines_order_foreign')->references(['id', 'rev'])->on('orders');"
    ));
    assert!(fks.down.contains("$table->dropForeign('lines_order_foreign');"));
}

#[tokio::test]
async fn test_malformed_constraint_is_skipped_with_warning() {
    let mut broken = ForeignKeyRow::new("orders_broken_foreign", "orders", "coupon_id", "coupons", "");
    broken.referenced_column_name = None;

    let catalog = shop().with_foreign_keys("orders", vec![broken]);
    let result = SchemaReader::new().read(&catalog).await.unwrap();

    assert_eq!(result.skipped_constraints.len(), 1);
    assert_eq!(result.skipped_constraints[0].constraint, "orders_broken_foreign");
    assert!(result.warnings.iter().any(|w| w.contains("orders_broken_foreign")));

    let orders = result.schema.table("orders").unwrap();
    assert_eq!(orders.foreign_keys().count(), 1);
}

#[tokio::test]
async fn test_unknown_type_falls_back_to_string() {
    let catalog = MemoryCatalog::new("geo").with_table(
        "places",
        vec![
            ColumnRow::new("id", "bigint", "bigint unsigned").extra("auto_increment"),
            ColumnRow::new("location", "point", "point"),
        ],
    );

    let result = SchemaReader::new().read(&catalog).await.unwrap();
    let approximations = approximated_columns(&result.schema);
    assert_eq!(approximations.len(), 1);
    assert_eq!(approximations[0].column, "location");

    let artifacts = MigrationRenderer::new().render(&result.schema, &ctx(), FkMode::Separate);
    assert!(artifacts[0].up.contains("$table->string('location', 255);"));
}

#[tokio::test]
async fn test_no_foreign_keys_writes_marker() {
    let catalog = MemoryCatalog::new("blog").with_table(
        "posts",
        vec![ColumnRow::new("id", "bigint", "bigint unsigned").extra("auto_increment")],
    );

    let artifacts = render(&catalog, FkMode::Separate).await;
    assert_eq!(artifacts.len(), 2);
    assert!(artifacts[1].up.contains(NO_FOREIGN_KEYS));
    assert!(!artifacts[1].up.contains("Schema::table"));
}

#[tokio::test]
async fn test_exclusion_and_write() {
    let catalog = shop().with_table(
        "migrations",
        vec![ColumnRow::new("id", "int", "int unsigned").extra("auto_increment")],
    );
    let mut result = SchemaReader::new().read(&catalog).await.unwrap();
    let removed = result.schema.exclude(["migrations", "sessions"]);
    assert_eq!(removed, ["migrations"]);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("database/migrations/imported");
    let writer = ArtifactWriter::new(&out);
    writer.ensure_dir().await.unwrap();

    let artifacts = MigrationRenderer::new().render(&result.schema, &ctx(), FkMode::Separate);
    let paths = writer.write_all(&artifacts).await.unwrap();

    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|p| p.starts_with(&out)));
    assert!(!out.join("2026_10_19_091500_000001_create_migrations_table.php").exists());

    let users = std::fs::read_to_string(&paths[1]).unwrap();
    assert!(users.starts_with("<?php"));
    assert!(users.contains("Schema::create('users'"));
    assert!(users.contains("Schema::dropIfExists('users');"));
}

#[tokio::test]
async fn test_inline_mode_has_no_foreign_key_artifact() {
    let artifacts = render(&shop(), FkMode::Inline).await;
    assert_eq!(artifacts.len(), 2);
    assert!(artifacts[0].up.contains("$table->foreign('user_id', 'orders_user_id_foreign')"));
    assert!(artifacts[0].up.contains("Schema::disableForeignKeyConstraints();"));
}

#[tokio::test]
async fn test_missing_database_is_catalog_unavailable() {
    let err = SchemaReader::new()
        .read(&MemoryCatalog::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, MigrationError::CatalogUnavailable(_)));
}

#[test]
fn test_schema_serializes_to_json() {
    let mut table = Table::new("users");
    table
        .add_column(Column::new("id", "bigint").auto_increment(true))
        .unwrap();
    let schema = Schema::from_tables([table]).unwrap();

    let json = serde_json::to_value(&schema).unwrap();
    assert!(json.to_string().contains("\"users\""));
}
