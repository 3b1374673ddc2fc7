//! Explicit column-kind schema.
//!
//! The core transforms never inspect dtypes at runtime; the loader classifies
//! every column exactly once and the resulting [`TableSchema`] is passed into
//! the cleaner and feature engineer. A column the schema does not mention is
//! simply ignored by the transforms.

use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Real-valued column; may contain nulls before cleaning.
    Numeric,
    /// String-valued column; may contain nulls or the `"unknown"` sentinel.
    Categorical,
}

/// Mapping from column name to declared kind.
///
/// Backed by a `BTreeMap` so iteration order is deterministic (column name
/// order), which keeps processing-step logs and reports stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    kinds: BTreeMap<String, ColumnKind>,
}

impl TableSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column declaration (builder style).
    pub fn with_column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    /// Classify every column of a DataFrame by its parsed dtype.
    ///
    /// This is the loader's job: numeric dtypes become [`ColumnKind::Numeric`],
    /// everything else (string, boolean, categorical) is treated as
    /// [`ColumnKind::Categorical`].
    pub fn from_dataframe(df: &DataFrame) -> Self {
        let mut kinds = BTreeMap::new();
        for col in df.get_columns() {
            let kind = if is_numeric_dtype(col.dtype()) {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            };
            kinds.insert(col.name().to_string(), kind);
        }
        Self { kinds }
    }

    /// Look up the declared kind of a column.
    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.kinds.get(name).copied()
    }

    /// Names of all declared numeric columns, in name order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.kinds
            .iter()
            .filter(|(_, k)| **k == ColumnKind::Numeric)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Names of all declared categorical columns, in name order.
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.kinds
            .iter()
            .filter(|(_, k)| **k == ColumnKind::Categorical)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the schema declares no columns.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
