//! Column definitions.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::NativeType;

/// Default value recorded in the catalog for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnDefault {
    /// The engine's current-timestamp function.
    CurrentTimestamp,
    /// A literal value, already stripped of its surrounding quotes.
    Literal(String),
}

impl ColumnDefault {
    /// Create a literal default.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }
}

/// One catalog column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: SmolStr,
    /// Lowercase catalog type name (`DATA_TYPE`).
    pub native_type: SmolStr,
    /// Maximum character length for string types.
    pub length: Option<u64>,
    /// Numeric precision for fractional types.
    pub precision: Option<u64>,
    /// Numeric scale for fractional types.
    pub scale: Option<u64>,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Whether the full column type carries `unsigned`.
    pub unsigned: bool,
    /// Whether the catalog extra field carries `auto_increment`.
    pub auto_increment: bool,
    /// Default value.
    pub default: Option<ColumnDefault>,
    /// Complete type string (`COLUMN_TYPE`), e.g. `int(10) unsigned`.
    pub full_type: String,
}

impl Column {
    /// Create a non-null column with no modifiers.
    ///
    /// The full type defaults to the native type name until set explicitly.
    pub fn new(name: impl Into<SmolStr>, native_type: impl AsRef<str>) -> Self {
        let native_type = native_type.as_ref().trim().to_ascii_lowercase();
        Self {
            name: name.into(),
            full_type: native_type.clone(),
            native_type: native_type.into(),
            length: None,
            precision: None,
            scale: None,
            nullable: false,
            unsigned: false,
            auto_increment: false,
            default: None,
        }
    }

    /// Set the full column type string.
    pub fn full_type(mut self, full_type: impl Into<String>) -> Self {
        self.full_type = full_type.into();
        self
    }

    /// Set the character length.
    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the numeric precision and scale.
    pub fn precision(mut self, precision: u64, scale: u64) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Set nullability.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the unsigned flag.
    pub fn unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }

    /// Set the auto-increment flag.
    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Get the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classify the native type.
    pub fn native(&self) -> NativeType {
        NativeType::parse(&self.native_type)
    }

    /// Check if this is the conventional `id` primary key column.
    pub fn is_primary_id(&self) -> bool {
        self.name == "id" && self.auto_increment
    }
}
