//! Column type mapping to Laravel schema builder methods.
//!
//! The mapping is total: every [`Column`] maps to some [`TypeMapping`]. Types
//! without a dedicated rule become a 255-character string, flagged through
//! [`TypeMapping::is_fallback`].

use std::sync::LazyLock;

use migsnap_schema::{Column, NativeType, Schema};
use regex_lite::Regex;
use smol_str::SmolStr;
use tracing::debug;

/// Width given to columns that have no dedicated mapping.
pub const FALLBACK_STRING_LENGTH: u64 = 255;

/// Precision used for decimals when the catalog reports none.
pub const DEFAULT_DECIMAL_PRECISION: u64 = 10;

/// Scale used for decimals when the catalog reports none.
pub const DEFAULT_DECIMAL_SCALE: u64 = 0;

static DISPLAY_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[a-z]+\s*\(\s*(\d+)\s*\)").expect("display width pattern")
});

static ENUM_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*enum\s*\((.*)\)\s*$").expect("enum body pattern")
});

static ENUM_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'((?:\\.|''|[^'\\])*)'").expect("enum member pattern")
});

/// A `Blueprint` column method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlueprintMethod {
    Id,
    Increments,
    SmallIncrements,
    BigIncrements,
    Boolean,
    Enum,
    BigInteger,
    UnsignedBigInteger,
    Integer,
    UnsignedInteger,
    MediumInteger,
    UnsignedMediumInteger,
    SmallInteger,
    UnsignedSmallInteger,
    TinyInteger,
    UnsignedTinyInteger,
    Char,
    String,
    TinyText,
    Text,
    MediumText,
    LongText,
    DateTime,
    Timestamp,
    Date,
    Time,
    Year,
    Decimal,
    Double,
    Float,
    Json,
    Binary,
}

impl BlueprintMethod {
    /// PHP method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Increments => "increments",
            Self::SmallIncrements => "smallIncrements",
            Self::BigIncrements => "bigIncrements",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::BigInteger => "bigInteger",
            Self::UnsignedBigInteger => "unsignedBigInteger",
            Self::Integer => "integer",
            Self::UnsignedInteger => "unsignedInteger",
            Self::MediumInteger => "mediumInteger",
            Self::UnsignedMediumInteger => "unsignedMediumInteger",
            Self::SmallInteger => "smallInteger",
            Self::UnsignedSmallInteger => "unsignedSmallInteger",
            Self::TinyInteger => "tinyInteger",
            Self::UnsignedTinyInteger => "unsignedTinyInteger",
            Self::Char => "char",
            Self::String => "string",
            Self::TinyText => "tinyText",
            Self::Text => "text",
            Self::MediumText => "mediumText",
            Self::LongText => "longText",
            Self::DateTime => "dateTime",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Time => "time",
            Self::Year => "year",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Float => "float",
            Self::Json => "json",
            Self::Binary => "binary",
        }
    }
}

impl std::fmt::Display for BlueprintMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// String literal.
    Str(String),
    /// Integer literal.
    Int(u64),
    /// List of string literals.
    List(Vec<String>),
}

impl Arg {
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }
}

/// The method and arguments chosen for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    /// Blueprint method.
    pub method: BlueprintMethod,
    /// Positional arguments, column name first when present.
    pub args: Vec<Arg>,
    fallback: bool,
}

impl TypeMapping {
    /// Create a mapping.
    pub fn new(method: BlueprintMethod, args: Vec<Arg>) -> Self {
        Self {
            method,
            args,
            fallback: false,
        }
    }

    /// Check if the column had no dedicated rule.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Maps columns to blueprint methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMapper;

impl TypeMapper {
    /// Create a mapper.
    pub fn new() -> Self {
        Self
    }

    /// Map a column. First matching rule wins:
    ///
    /// 1. auto-increment `id` columns use the identity helpers
    /// 2. integers of display width 1 become booleans ([`is_boolean_flag`])
    /// 3. enums with at least one member
    /// 4. the native type
    /// 5. a 255-character string
    pub fn map(&self, column: &Column) -> TypeMapping {
        let name = column.name().to_string();
        let native = column.native();

        if column.is_primary_id() {
            return map_primary_id(&native, name);
        }

        if is_boolean_flag(column) {
            return TypeMapping::new(BlueprintMethod::Boolean, vec![Arg::Str(name)]);
        }

        if native == NativeType::Enum {
            let members = parse_enum_members(&column.full_type);
            if !members.is_empty() {
                return TypeMapping::new(
                    BlueprintMethod::Enum,
                    vec![Arg::Str(name), Arg::List(members)],
                );
            }
        }

        use BlueprintMethod as M;
        let signed = |s: M, u: M| if column.unsigned { u } else { s };
        let method = match native {
            NativeType::BigInt => signed(M::BigInteger, M::UnsignedBigInteger),
            NativeType::Int => signed(M::Integer, M::UnsignedInteger),
            NativeType::MediumInt => signed(M::MediumInteger, M::UnsignedMediumInteger),
            NativeType::SmallInt => signed(M::SmallInteger, M::UnsignedSmallInteger),
            NativeType::TinyInt => signed(M::TinyInteger, M::UnsignedTinyInteger),
            NativeType::VarChar => return with_length(M::String, name, column.length),
            NativeType::Char => return with_length(M::Char, name, column.length),
            NativeType::TinyText => M::TinyText,
            NativeType::Text => M::Text,
            NativeType::MediumText => M::MediumText,
            NativeType::LongText => M::LongText,
            NativeType::DateTime => M::DateTime,
            NativeType::Timestamp => M::Timestamp,
            NativeType::Date => M::Date,
            NativeType::Time => M::Time,
            NativeType::Year => M::Year,
            NativeType::Decimal => {
                return TypeMapping::new(
                    M::Decimal,
                    vec![
                        Arg::Str(name),
                        Arg::Int(column.precision.unwrap_or(DEFAULT_DECIMAL_PRECISION)),
                        Arg::Int(column.scale.unwrap_or(DEFAULT_DECIMAL_SCALE)),
                    ],
                );
            }
            NativeType::Double => M::Double,
            NativeType::Float => M::Float,
            NativeType::Json => M::Json,
            NativeType::Binary => M::Binary,
            NativeType::Enum | NativeType::Other(_) => return fallback(name),
        };

        TypeMapping::new(method, vec![Arg::Str(name)])
    }
}

fn map_primary_id(native: &NativeType, name: String) -> TypeMapping {
    match native {
        NativeType::BigInt => TypeMapping::new(BlueprintMethod::Id, Vec::new()),
        NativeType::Int | NativeType::MediumInt => {
            TypeMapping::new(BlueprintMethod::Increments, vec![Arg::Str(name)])
        }
        NativeType::SmallInt => {
            TypeMapping::new(BlueprintMethod::SmallIncrements, vec![Arg::Str(name)])
        }
        _ => TypeMapping::new(BlueprintMethod::BigIncrements, vec![Arg::Str(name)]),
    }
}

fn with_length(method: BlueprintMethod, name: String, length: Option<u64>) -> TypeMapping {
    let mut args = vec![Arg::Str(name)];
    if let Some(length) = length.filter(|l| *l > 0) {
        args.push(Arg::Int(length));
    }
    TypeMapping::new(method, args)
}

fn fallback(name: String) -> TypeMapping {
    TypeMapping {
        method: BlueprintMethod::String,
        args: vec![Arg::Str(name), Arg::Int(FALLBACK_STRING_LENGTH)],
        fallback: true,
    }
}

/// Whether an integer column should be treated as a boolean.
///
/// This is a heuristic: a display width of exactly 1 (`tinyint(1)`) is how
/// MySQL encodes booleans, but a genuinely 1-wide number looks the same.
pub fn is_boolean_flag(column: &Column) -> bool {
    column.native().is_integer() && display_width(&column.full_type) == Some(1)
}

fn display_width(full_type: &str) -> Option<u32> {
    DISPLAY_WIDTH
        .captures(full_type)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract the members of an `enum(...)` column type, unescaped, in order.
///
/// Returns an empty list when the type is not an enum or has no quoted members.
pub fn parse_enum_members(full_type: &str) -> Vec<String> {
    let Some(body) = ENUM_BODY.captures(full_type).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    ENUM_MEMBER
        .captures_iter(body.as_str())
        .filter_map(|c| c.get(1))
        .map(|m| unescape_member(m.as_str()))
        .collect()
}

fn unescape_member(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            _ => out.push(c),
        }
    }
    out
}

/// A column resolved through the fallback mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approximation {
    /// Table name.
    pub table: SmolStr,
    /// Column name.
    pub column: SmolStr,
    /// Full catalog type of the column.
    pub full_type: String,
}

/// List every column of the schema that only maps through the fallback.
pub fn approximated_columns(schema: &Schema) -> Vec<Approximation> {
    let mapper = TypeMapper::new();
    let mut out = Vec::new();
    for table in schema.tables() {
        for column in table.columns() {
            if mapper.map(column).is_fallback() {
                debug!(
                    table = %table.name,
                    column = %column.name,
                    full_type = %column.full_type,
                    "No dedicated mapping, using string({FALLBACK_STRING_LENGTH})"
                );
                out.push(Approximation {
                    table: table.name.clone(),
                    column: column.name.clone(),
                    full_type: column.full_type.clone(),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use migsnap_schema::Table;
    use pretty_assertions::assert_eq;

    fn map(column: Column) -> TypeMapping {
        TypeMapper::new().map(&column)
    }

    fn name(n: &str) -> Arg {
        Arg::str(n)
    }

    #[test]
    fn test_primary_id_helpers() {
        let id = |ty: &str| Column::new("id", ty).auto_increment(true);
        assert_eq!(map(id("bigint")), TypeMapping::new(BlueprintMethod::Id, vec![]));
        assert_eq!(map(id("int")).method, BlueprintMethod::Increments);
        assert_eq!(map(id("mediumint")).method, BlueprintMethod::Increments);
        assert_eq!(map(id("smallint")).method, BlueprintMethod::SmallIncrements);
        assert_eq!(map(id("tinyint")).method, BlueprintMethod::BigIncrements);
        assert_eq!(map(id("int")).args, vec![name("id")]);
    }

    #[test]
    fn test_non_increment_id_is_plain_integer() {
        let mapping = map(Column::new("id", "bigint").unsigned(true));
        assert_eq!(mapping.method, BlueprintMethod::UnsignedBigInteger);
    }

    #[test]
    fn test_width_one_integers_are_booleans() {
        for ty in ["tinyint(1)", "TINYINT(1) UNSIGNED", "int(1)", "smallint( 1 )"] {
            let native = ty.split('(').next().unwrap();
            let col = Column::new("active", native).full_type(ty);
            assert!(is_boolean_flag(&col), "{ty}");
            assert_eq!(map(col).method, BlueprintMethod::Boolean, "{ty}");
        }

        let col = Column::new("level", "tinyint").full_type("tinyint(4)");
        assert!(!is_boolean_flag(&col));
        assert_eq!(map(col).method, BlueprintMethod::TinyInteger);

        let col = Column::new("code", "char").full_type("char(1)").length(1);
        assert!(!is_boolean_flag(&col));
    }

    #[test]
    fn test_enum_members() {
        assert_eq!(parse_enum_members("enum('new','paid')"), ["new", "paid"]);
        assert_eq!(
            parse_enum_members(r"enum('it''s','a\'b','c\\d','x,y')"),
            ["it's", "a'b", r"c\d", "x,y"]
        );
        assert_eq!(parse_enum_members("ENUM('A')"), ["A"]);
        assert!(parse_enum_members("enum()").is_empty());
        assert!(parse_enum_members("varchar(10)").is_empty());

        let col = Column::new("status", "enum").full_type("enum('new','paid')");
        assert_eq!(
            map(col),
            TypeMapping::new(
                BlueprintMethod::Enum,
                vec![name("status"), Arg::List(vec!["new".into(), "paid".into()])]
            )
        );
    }

    #[test]
    fn test_empty_enum_falls_back() {
        let mapping = map(Column::new("status", "enum").full_type("enum()"));
        assert!(mapping.is_fallback());
        assert_eq!(mapping.method, BlueprintMethod::String);
    }

    #[test]
    fn test_integers_follow_unsigned_flag() {
        let cases = [
            ("bigint", BlueprintMethod::BigInteger, BlueprintMethod::UnsignedBigInteger),
            ("int", BlueprintMethod::Integer, BlueprintMethod::UnsignedInteger),
            ("mediumint", BlueprintMethod::MediumInteger, BlueprintMethod::UnsignedMediumInteger),
            ("smallint", BlueprintMethod::SmallInteger, BlueprintMethod::UnsignedSmallInteger),
            ("tinyint", BlueprintMethod::TinyInteger, BlueprintMethod::UnsignedTinyInteger),
        ];
        for (ty, signed, unsigned) in cases {
            assert_eq!(map(Column::new("n", ty)).method, signed);
            assert_eq!(map(Column::new("n", ty).unsigned(true)).method, unsigned);
        }
    }

    #[test]
    fn test_strings_carry_length() {
        let mapping = map(Column::new("email", "varchar").length(191));
        assert_eq!(mapping.args, vec![name("email"), Arg::Int(191)]);
        let mapping = map(Column::new("code", "char").length(2));
        assert_eq!(mapping.method, BlueprintMethod::Char);
        assert_eq!(mapping.args, vec![name("code"), Arg::Int(2)]);
        assert_eq!(map(Column::new("x", "varchar")).args, vec![name("x")]);
        assert_eq!(map(Column::new("x", "varchar").length(0)).args, vec![name("x")]);
    }

    #[test]
    fn test_decimal_defaults() {
        let mapping = map(Column::new("price", "decimal").precision(8, 2));
        assert_eq!(mapping.args, vec![name("price"), Arg::Int(8), Arg::Int(2)]);
        let mapping = map(Column::new("price", "decimal"));
        assert_eq!(mapping.args, vec![name("price"), Arg::Int(10), Arg::Int(0)]);
    }

    #[test]
    fn test_one_to_one_families() {
        let cases = [
            ("tinytext", BlueprintMethod::TinyText),
            ("text", BlueprintMethod::Text),
            ("mediumtext", BlueprintMethod::MediumText),
            ("longtext", BlueprintMethod::LongText),
            ("datetime", BlueprintMethod::DateTime),
            ("timestamp", BlueprintMethod::Timestamp),
            ("date", BlueprintMethod::Date),
            ("time", BlueprintMethod::Time),
            ("year", BlueprintMethod::Year),
            ("double", BlueprintMethod::Double),
            ("float", BlueprintMethod::Float),
            ("json", BlueprintMethod::Json),
            ("longblob", BlueprintMethod::Binary),
        ];
        for (ty, method) in cases {
            let mapping = map(Column::new("c", ty));
            assert_eq!(mapping.method, method, "{ty}");
            assert_eq!(mapping.args, vec![name("c")], "{ty}");
            assert!(!mapping.is_fallback());
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_string_255() {
        let mapping = map(Column::new("shape", "geometry"));
        assert!(mapping.is_fallback());
        assert_eq!(mapping.method, BlueprintMethod::String);
        assert_eq!(mapping.args, vec![name("shape"), Arg::Int(255)]);
    }

    #[test]
    fn test_approximated_columns() {
        let mut places = Table::new("places");
        places.add_column(Column::new("name", "varchar").length(50)).unwrap();
        places
            .add_column(Column::new("location", "point").full_type("point"))
            .unwrap();
        let schema = Schema::from_tables([places]).unwrap();

        let found = approximated_columns(&schema);
        assert_eq!(
            found,
            vec![Approximation {
                table: "places".into(),
                column: "location".into(),
                full_type: "point".into(),
            }]
        );
    }
}
