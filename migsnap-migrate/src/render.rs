//! Laravel migration rendering.
//!
//! Rendering is a pure function of the schema, a [`GenerationContext`] and an
//! [`FkMode`]: the same inputs always produce byte-identical artifacts.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use migsnap_schema::{Column, ColumnDefault, ForeignKey, Schema, Table};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::php;
use crate::typemap::TypeMapper;

/// Format of the run timestamp in artifact file names.
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Name of the foreign key artifact.
pub const FOREIGN_KEYS_ARTIFACT: &str = "add_foreign_keys";

/// Body used when no table owns a foreign key.
pub const NO_FOREIGN_KEYS: &str = "// No foreign keys detected.";

const BODY_INDENT: &str = "        ";
const CLOSURE_INDENT: &str = "            ";

/// Where foreign keys are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FkMode {
    /// One trailing artifact attaches every foreign key.
    #[default]
    Separate,
    /// Each table declares its own foreign keys while being created.
    Inline,
}

impl FkMode {
    /// Lowercase mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Separate => "separate",
            Self::Inline => "inline",
        }
    }
}

impl fmt::Display for FkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "separate" => Ok(Self::Separate),
            "inline" => Ok(Self::Inline),
            other => Err(format!(
                "unknown foreign key mode '{other}', expected 'separate' or 'inline'"
            )),
        }
    }
}

/// Run-wide naming state: one timestamp and the first sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    timestamp: String,
    first_sequence: u32,
}

impl GenerationContext {
    /// Create a context for the given instant, numbering from 1.
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            first_sequence: 1,
        }
    }

    /// Create a context for the current local time.
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Start numbering at `sequence` (at least 1).
    pub fn first_sequence(mut self, sequence: u32) -> Self {
        self.first_sequence = sequence.max(1);
        self
    }

    /// The formatted run timestamp.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// File name for the artifact at `sequence`.
    ///
    /// Path separators and control characters in `name` become `_`, so the
    /// result is always a single path component.
    pub fn file_name(&self, sequence: u32, name: &str) -> String {
        format!("{}_{:06}_{}.php", self.timestamp, sequence, file_stem(name))
    }
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// What an artifact does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Creates one table.
    CreateTable,
    /// Attaches foreign keys to existing tables.
    ForeignKeys,
}

/// One rendered migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Sequence number within the run.
    pub sequence: u32,
    /// Descriptive name, e.g. `create_users_table`.
    pub name: String,
    /// File name including timestamp, sequence and extension.
    pub file_name: String,
    /// Table created by the artifact.
    pub table: Option<SmolStr>,
    /// Artifact kind.
    pub kind: ArtifactKind,
    /// Body of `up()`.
    pub up: String,
    /// Body of `down()`.
    pub down: String,
}

impl Artifact {
    /// Full PHP file contents.
    pub fn contents(&self) -> String {
        format!(
            r"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{{
    public function up(): void
    {{
{up}
    }}

    public function down(): void
    {{
{down}
    }}
}};
",
            up = self.up,
            down = self.down,
        )
    }
}

/// Renders a schema into Laravel migrations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationRenderer {
    mapper: TypeMapper,
}

impl MigrationRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one create artifact per table in schema order, followed by the
    /// foreign key artifact in [`FkMode::Separate`].
    pub fn render(&self, schema: &Schema, ctx: &GenerationContext, mode: FkMode) -> Vec<Artifact> {
        let mut artifacts = Vec::with_capacity(schema.len() + 1);
        let mut sequence = ctx.first_sequence;

        for table in schema.tables() {
            artifacts.push(self.create_table(table, ctx, sequence, mode));
            sequence += 1;
        }

        if mode == FkMode::Separate {
            artifacts.push(self.foreign_keys(schema, ctx, sequence));
        }

        artifacts
    }

    fn create_table(
        &self,
        table: &Table,
        ctx: &GenerationContext,
        sequence: u32,
        mode: FkMode,
    ) -> Artifact {
        let mut lines: Vec<String> = table.columns().map(|c| self.column(c)).collect();
        let inline = mode == FkMode::Inline && table.has_foreign_keys();
        if inline {
            lines.extend(table.foreign_keys().map(add_foreign_key));
        }

        let table_name = php::string_literal(&table.name);
        let create = closure(&format!("Schema::create({table_name}, "), &lines);
        let drop = format!("{BODY_INDENT}Schema::dropIfExists({table_name});");

        let (up, down) = if inline {
            (without_fk_checks(&create), without_fk_checks(&drop))
        } else {
            (create, drop)
        };

        let name = format!("create_{}_table", table.name);
        Artifact {
            sequence,
            file_name: ctx.file_name(sequence, &name),
            name,
            table: Some(table.name.clone()),
            kind: ArtifactKind::CreateTable,
            up,
            down,
        }
    }

    fn foreign_keys(&self, schema: &Schema, ctx: &GenerationContext, sequence: u32) -> Artifact {
        let mut up = Vec::new();
        let mut down = Vec::new();

        for table in schema.tables().filter(|t| t.has_foreign_keys()) {
            let head = format!("Schema::table({}, ", php::string_literal(&table.name));
            let adds: Vec<String> = table.foreign_keys().map(add_foreign_key).collect();
            let drops: Vec<String> = table.foreign_keys().map(drop_foreign_key).collect();
            up.push(closure(&head, &adds));
            down.push(closure(&head, &drops));
        }

        let (up, down) = if up.is_empty() {
            let marker = format!("{BODY_INDENT}{NO_FOREIGN_KEYS}");
            (marker.clone(), marker)
        } else {
            (up.join("\n\n"), down.join("\n\n"))
        };

        Artifact {
            sequence,
            name: FOREIGN_KEYS_ARTIFACT.to_string(),
            file_name: ctx.file_name(sequence, FOREIGN_KEYS_ARTIFACT),
            table: None,
            kind: ArtifactKind::ForeignKeys,
            up,
            down,
        }
    }

    /// Render the `$table->...;` statement for one column.
    pub fn column(&self, column: &Column) -> String {
        let mapping = self.mapper.map(column);
        let mut line = format!("$table->{}({})", mapping.method, php::args(&mapping.args));

        if column.auto_increment && column.name != "id" {
            line.push_str("->autoIncrement()");
        }
        if column.nullable {
            line.push_str("->nullable()");
        }
        match &column.default {
            Some(ColumnDefault::CurrentTimestamp) => line.push_str("->useCurrent()"),
            Some(ColumnDefault::Literal(value)) => {
                line.push_str(&format!("->default({})", php::string_literal(value)));
            }
            None => {}
        }

        line.push(';');
        line
    }
}

/// Render the statement attaching a foreign key, named after its constraint.
pub fn add_foreign_key(fk: &ForeignKey) -> String {
    let mut line = format!(
        "$table->foreign({}, {})->references({})->on({})",
        php::names_literal(fk.columns.as_slice()),
        php::string_literal(&fk.constraint_name),
        php::names_literal(fk.referenced_columns.as_slice()),
        php::string_literal(&fk.referenced_table),
    );
    if let Some(action) = &fk.on_update {
        line.push_str(&format!("->onUpdate({})", php::string_literal(action.as_str())));
    }
    if let Some(action) = &fk.on_delete {
        line.push_str(&format!("->onDelete({})", php::string_literal(action.as_str())));
    }
    line.push(';');
    line
}

/// Render the statement dropping a foreign key by constraint name.
pub fn drop_foreign_key(fk: &ForeignKey) -> String {
    format!(
        "$table->dropForeign({});",
        php::string_literal(&fk.constraint_name)
    )
}

fn closure(head: &str, lines: &[String]) -> String {
    let mut out = format!("{BODY_INDENT}{head}function (Blueprint $table) {{\n");
    for line in lines {
        out.push_str(CLOSURE_INDENT);
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(BODY_INDENT);
    out.push_str("});");
    out
}

fn without_fk_checks(body: &str) -> String {
    format!(
        "{BODY_INDENT}Schema::disableForeignKeyConstraints();\n\n{body}\n\n{BODY_INDENT}Schema::enableForeignKeyConstraints();"
    )
}
