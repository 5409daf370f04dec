use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::core::types::Category;

/// Code -> canonical label tables for every classification field.
///
/// The built-in table is `data/categories.json`; a replacement can be
/// supplied through `TDNET_CATEGORIES`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTable {
    #[serde(default)]
    pub period_division: BTreeMap<String, String>,
    #[serde(default)]
    pub consolidation: BTreeMap<String, String>,
    #[serde(default)]
    pub report_category: BTreeMap<String, String>,
    #[serde(default)]
    pub report_detail_category: BTreeMap<String, String>,
    #[serde(default)]
    pub financial_statement: BTreeMap<String, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum CategoryField {
    PeriodDivision,
    Consolidation,
    ReportCategory,
    ReportDetailCategory,
    FinancialStatement,
}

/// Detail category of documents whose facts are joined against linkbases.
pub const FULL_FINANCIAL_REPORT: &str = "fr";

static BUILTIN: Lazy<CategoryTable> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../data/categories.json"))
        .expect("embedded category table is valid JSON")
});

impl Default for CategoryTable {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl CategoryTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read category table {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse category table {}: {}", path.display(), e))
    }

    fn field(&self, field: CategoryField) -> &BTreeMap<String, String> {
        match field {
            CategoryField::PeriodDivision => &self.period_division,
            CategoryField::Consolidation => &self.consolidation,
            CategoryField::ReportCategory => &self.report_category,
            CategoryField::ReportDetailCategory => &self.report_detail_category,
            CategoryField::FinancialStatement => &self.financial_statement,
        }
    }

    /// Resolve a code; unmapped codes keep the code and carry no label.
    pub fn lookup(&self, field: CategoryField, code: &str) -> Category {
        Category {
            code: code.to_string(),
            label: self.field(field).get(code).cloned(),
        }
    }

    pub fn detail_label(&self, code: &str) -> Option<&str> {
        self.report_detail_category.get(code).map(String::as_str)
    }

    /// Human readable listing of every known code, used by the CLI help.
    pub fn describe(&self) -> String {
        CategoryField::iter()
            .map(|field| {
                let codes = self
                    .field(field)
                    .iter()
                    .map(|(code, label)| format!("{}={}", code, label))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", field, codes)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
