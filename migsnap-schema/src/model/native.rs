//! Classification of engine column types.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Engine column type, parsed from the catalog's lowercase `DATA_TYPE`.
///
/// Unknown names are kept verbatim in [`NativeType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeType {
    /// 64-bit integer.
    BigInt,
    /// 32-bit integer (`int`, `integer`).
    Int,
    /// 24-bit integer.
    MediumInt,
    /// 16-bit integer.
    SmallInt,
    /// 8-bit integer.
    TinyInt,
    /// Fixed-width character string.
    Char,
    /// Variable-width character string.
    VarChar,
    /// Text up to 255 bytes.
    TinyText,
    /// Text up to 64 KiB.
    Text,
    /// Text up to 16 MiB.
    MediumText,
    /// Text up to 4 GiB.
    LongText,
    /// Date and time without zone.
    DateTime,
    /// Epoch-backed timestamp.
    Timestamp,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Four-digit year.
    Year,
    /// Fixed-point decimal.
    Decimal,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Structured JSON document.
    Json,
    /// Enumerated string.
    Enum,
    /// Binary string or blob family.
    Binary,
    /// Anything else, lowercased.
    Other(SmolStr),
}

impl NativeType {
    /// Parse a catalog type name.
    pub fn parse(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "bigint" => Self::BigInt,
            "int" | "integer" => Self::Int,
            "mediumint" => Self::MediumInt,
            "smallint" => Self::SmallInt,
            "tinyint" => Self::TinyInt,
            "char" => Self::Char,
            "varchar" => Self::VarChar,
            "tinytext" => Self::TinyText,
            "text" => Self::Text,
            "mediumtext" => Self::MediumText,
            "longtext" => Self::LongText,
            "datetime" => Self::DateTime,
            "timestamp" => Self::Timestamp,
            "date" => Self::Date,
            "time" => Self::Time,
            "year" => Self::Year,
            "decimal" | "numeric" => Self::Decimal,
            "float" => Self::Float,
            "double" => Self::Double,
            "json" => Self::Json,
            "enum" => Self::Enum,
            "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => {
                Self::Binary
            }
            _ => Self::Other(lower.into()),
        }
    }

    /// Check if this is one of the integer families.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::BigInt | Self::Int | Self::MediumInt | Self::SmallInt | Self::TinyInt
        )
    }

    /// Check if the catalog's character length is meaningful for this type.
    pub fn supports_length(&self) -> bool {
        matches!(
            self,
            Self::Char
                | Self::VarChar
                | Self::TinyText
                | Self::Text
                | Self::MediumText
                | Self::LongText
                | Self::Enum
                | Self::Binary
        )
    }

    /// Check if numeric precision and scale are meaningful for this type.
    pub fn supports_precision(&self) -> bool {
        matches!(self, Self::Decimal | Self::Float | Self::Double)
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::BigInt => "bigint",
            Self::Int => "int",
            Self::MediumInt => "mediumint",
            Self::SmallInt => "smallint",
            Self::TinyInt => "tinyint",
            Self::Char => "char",
            Self::VarChar => "varchar",
            Self::TinyText => "tinytext",
            Self::Text => "text",
            Self::MediumText => "mediumtext",
            Self::LongText => "longtext",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Time => "time",
            Self::Year => "year",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::Json => "json",
            Self::Enum => "enum",
            Self::Binary => "binary",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl std::fmt::Display for NativeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(NativeType::parse("BIGINT"), NativeType::BigInt);
        assert_eq!(NativeType::parse(" VarChar "), NativeType::VarChar);
        assert_eq!(NativeType::parse("integer"), NativeType::Int);
    }

    #[test]
    fn test_parse_unknown_keeps_name() {
        assert_eq!(
            NativeType::parse("GEOMETRY"),
            NativeType::Other("geometry".into())
        );
        assert_eq!(NativeType::parse("geometry").as_str(), "geometry");
    }

    #[test]
    fn test_blob_family_is_binary() {
        for name in ["binary", "varbinary", "tinyblob", "blob", "mediumblob", "longblob"] {
            assert_eq!(NativeType::parse(name), NativeType::Binary, "{name}");
        }
    }

    #[test]
    fn test_capabilities() {
        assert!(NativeType::TinyInt.is_integer());
        assert!(!NativeType::Decimal.is_integer());
        assert!(NativeType::VarChar.supports_length());
        assert!(!NativeType::Int.supports_length());
        assert!(NativeType::Decimal.supports_precision());
        assert!(!NativeType::BigInt.supports_precision());
        assert!(!NativeType::Other("point".into()).supports_length());
    }
}
