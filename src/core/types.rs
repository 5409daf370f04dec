use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

/// Reporting period declared by an `xbrli:context`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Period {
    Duration { start: NaiveDate, end: NaiveDate },
    Instant { date: NaiveDate },
}

impl Period {
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            Period::Duration { start, .. } => Some(*start),
            Period::Instant { .. } => None,
        }
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Period::Duration { end, .. } => Some(*end),
            Period::Instant { .. } => None,
        }
    }

    pub fn instant_date(&self) -> Option<NaiveDate> {
        match self {
            Period::Instant { date } => Some(*date),
            Period::Duration { .. } => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Context {
    pub id: String,
    pub period: Period,
}

/// A classification code together with its canonical label.
///
/// The label is `None` when the code is missing from the category table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub code: String,
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub financial_statement: Option<Category>,
    pub report_category: Option<Category>,
    pub period_division: Option<Category>,
    pub consolidation: Option<Category>,
    pub report_detail_category: Option<Category>,
}

impl Classification {
    pub fn detail_code(&self) -> Option<&str> {
        self.report_detail_category.as_ref().map(|c| c.code.as_str())
    }
}

/// Attachment documents hold the financial statements, summary documents
/// the front page of a filing (and forecast revisions filed at the root).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentKind {
    Attachment,
    Summary,
}

/// Filer attributes read from the summary document.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilerInfo {
    pub company_name: Option<String>,
    pub securities_code: Option<String>,
    pub reporting_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Fact {
    pub id: Uuid,
    pub document_id: String,
    pub namespace: String,
    pub namespace_uri: Option<String>,
    pub element: String,
    pub context_id: String,
    pub unit_ref: Option<String>,
    pub format: Option<String>,
    pub decimals: Option<String>,
    pub scale: i64,
    pub numeric: Option<BigDecimal>,
    #[serde(flatten)]
    pub classification: Classification,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub instant_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub path: String,
    pub kind: DocumentKind,
    #[serde(flatten)]
    pub classification: Classification,
    pub filer: FilerInfo,
    pub facts: Vec<Fact>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrigin {
    Global,
    Local,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelEntry {
    pub namespace: String,
    pub element: String,
    pub text: String,
    pub origin: LabelOrigin,
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkKind {
    Calculation,
    Presentation,
    Definition,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LinkEdge {
    pub kind: LinkKind,
    pub role_key: String,
    pub namespace: String,
    pub from_namespace: String,
    pub from_element: String,
    pub to_element: String,
    pub order: BigDecimal,
    pub weight: Option<BigDecimal>,
    pub arcrole: Option<String>,
    pub report_detail_category: Option<String>,
    pub source: String,
}

/// One `(fact, edge)` match produced by the relationship join.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Association {
    pub fact_id: Uuid,
    pub document_id: String,
    pub kind: LinkKind,
    pub role_key: String,
    pub parent_namespace: String,
    pub parent_element: String,
    pub parent_label: Option<String>,
    pub child_namespace: String,
    pub child_element: String,
    pub order: BigDecimal,
    pub weight: Option<BigDecimal>,
}
