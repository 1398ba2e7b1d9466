//! Foreign key constraints.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{SchemaError, SchemaResult};

/// Referential action applied on update or delete of a referenced row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// Cascade the operation.
    Cascade,
    /// Reject the operation while references exist.
    Restrict,
    /// Set referencing columns to NULL.
    SetNull,
    /// Deferred check, engine default.
    NoAction,
    /// Set referencing columns to their default.
    SetDefault,
    /// An action outside the known set, lowercased.
    Other(SmolStr),
}

impl ReferentialAction {
    /// Parse a catalog rule (`UPDATE_RULE` / `DELETE_RULE`).
    ///
    /// Unknown rules are passed through lowercased instead of rejected.
    pub fn parse(rule: &str) -> Self {
        let lower = rule.trim().to_ascii_lowercase();
        match lower.as_str() {
            "cascade" => Self::Cascade,
            "restrict" => Self::Restrict,
            "set null" => Self::SetNull,
            "no action" => Self::NoAction,
            "set default" => Self::SetDefault,
            _ => Self::Other(lower.into()),
        }
    }

    /// Lowercase action name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cascade => "cascade",
            Self::Restrict => "restrict",
            Self::SetNull => "set null",
            Self::NoAction => "no action",
            Self::SetDefault => "set default",
            Self::Other(rule) => rule.as_str(),
        }
    }
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named foreign key constraint owned by one table.
///
/// `columns[i]` references `referenced_columns[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name, unique within the owning table.
    pub constraint_name: SmolStr,
    /// Owning table.
    pub table_name: SmolStr,
    /// Local columns in constraint order.
    pub columns: Vec<SmolStr>,
    /// Referenced table.
    pub referenced_table: SmolStr,
    /// Referenced columns, index-aligned with `columns`.
    pub referenced_columns: Vec<SmolStr>,
    /// ON UPDATE action; `None` means engine default.
    pub on_update: Option<ReferentialAction>,
    /// ON DELETE action; `None` means engine default.
    pub on_delete: Option<ReferentialAction>,
}

impl ForeignKey {
    /// Create a foreign key, checking that both column lists are non-empty and equally long.
    pub fn new<C, R>(
        constraint_name: impl Into<SmolStr>,
        table_name: impl Into<SmolStr>,
        columns: C,
        referenced_table: impl Into<SmolStr>,
        referenced_columns: R,
    ) -> SchemaResult<Self>
    where
        C: IntoIterator,
        C::Item: Into<SmolStr>,
        R: IntoIterator,
        R::Item: Into<SmolStr>,
    {
        let constraint_name = constraint_name.into();
        let table_name = table_name.into();
        let referenced_table = referenced_table.into();
        let columns: Vec<SmolStr> = columns.into_iter().map(Into::into).collect();
        let referenced_columns: Vec<SmolStr> =
            referenced_columns.into_iter().map(Into::into).collect();

        if constraint_name.is_empty() {
            return Err(SchemaError::empty_name("constraint"));
        }
        if table_name.is_empty() || referenced_table.is_empty() {
            return Err(SchemaError::empty_name("table"));
        }
        if columns.is_empty() || columns.len() != referenced_columns.len() {
            return Err(SchemaError::CardinalityMismatch {
                constraint: constraint_name.to_string(),
                columns: columns.len(),
                referenced: referenced_columns.len(),
            });
        }

        Ok(Self {
            constraint_name,
            table_name,
            columns,
            referenced_table,
            referenced_columns,
            on_update: None,
            on_delete: None,
        })
    }

    /// Set the ON UPDATE action.
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    /// Set the ON DELETE action.
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Check if the key spans more than one column.
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_actions() {
        assert_eq!(ReferentialAction::parse("CASCADE"), ReferentialAction::Cascade);
        assert_eq!(ReferentialAction::parse("SET NULL"), ReferentialAction::SetNull);
        assert_eq!(ReferentialAction::parse("No Action"), ReferentialAction::NoAction);
        assert_eq!(ReferentialAction::parse("set default").as_str(), "set default");
    }

    #[test]
    fn test_parse_unknown_action_passes_through() {
        let action = ReferentialAction::parse("  DEFERRED CASCADE ");
        assert_eq!(action, ReferentialAction::Other("deferred cascade".into()));
        assert_eq!(action.to_string(), "deferred cascade");
    }

    #[test]
    fn test_composite_key_keeps_alignment() {
        let fk = ForeignKey::new(
            "fk_line_order",
            "order_lines",
            ["order_id", "order_rev"],
            "orders",
            ["id", "rev"],
        )
        .unwrap();

        assert!(fk.is_composite());
        assert_eq!(fk.columns, ["order_id", "order_rev"]);
        assert_eq!(fk.referenced_columns, ["id", "rev"]);
    }

    #[test]
    fn test_cardinality_mismatch_rejected() {
        let err = ForeignKey::new("fk", "a", ["x", "y"], "b", ["id"]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::CardinalityMismatch {
                columns: 2,
                referenced: 1,
                ..
            }
        ));

        let empty: [&str; 0] = [];
        assert!(ForeignKey::new("fk", "a", empty, "b", empty).is_err());
    }

    #[test]
    fn test_empty_constraint_name_rejected() {
        let err = ForeignKey::new("", "a", ["x"], "b", ["id"]).unwrap_err();
        assert_eq!(err, SchemaError::empty_name("constraint"));
    }

    #[test]
    fn test_self_referential() {
        let fk = ForeignKey::new("fk_parent", "categories", ["parent_id"], "categories", ["id"])
            .unwrap()
            .on_delete(ReferentialAction::SetNull);
        assert_eq!(fk.table_name, fk.referenced_table);
        assert_eq!(fk.on_delete, Some(ReferentialAction::SetNull));
        assert!(fk.on_update.is_none());
    }
}
