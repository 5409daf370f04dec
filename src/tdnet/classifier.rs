use roxmltree::Node;

use super::archive::{basename, folder, Folder};
use super::parsing::IX_NAMESPACES;
use super::report::{CategoryField, CategoryTable};
use crate::core::types::{Category, Classification, DocumentKind, FilerInfo};
use crate::error::Diagnostic;
use crate::utils::dates::normalize_date;

const COMPANY_NAME: &str = "tse-ed-t:CompanyName";
const SECURITIES_CODE: &str = "tse-ed-t:SecuritiesCode";
const REPORTING_DATES: [&str; 2] = [
    "tse-ed-t:ReportingDateOfFinancialForecastCorrection",
    "tse-ed-t:FilingDate",
];

/// What the filename says about one instance document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentIdentity {
    pub id: String,
    pub kind: DocumentKind,
    pub classification: Classification,
}

pub struct DocumentClassifier<'a> {
    categories: &'a CategoryTable,
}

impl<'a> DocumentClassifier<'a> {
    pub fn new(categories: &'a CategoryTable) -> Self {
        Self { categories }
    }

    /// Decode kind, logical id and classification from an instance
    /// document path. Problems are pushed to `diagnostics`; the identity is
    /// always returned.
    pub fn identify(&self, path: &str, diagnostics: &mut Vec<Diagnostic>) -> DocumentIdentity {
        let name = basename(path);
        let segments: Vec<&str> = name.split('-').collect();

        let kind = match folder(path) {
            Folder::Attachment => DocumentKind::Attachment,
            Folder::Summary | Folder::Root => DocumentKind::Summary,
        };

        let (id_index, code_index) = match kind {
            DocumentKind::Attachment => (1, 3),
            DocumentKind::Summary => (1, 1),
        };

        let id = segments
            .get(id_index)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| name.to_string());

        let mut classification = Classification::default();

        if kind == DocumentKind::Attachment {
            if let Some(statement) = segments.get(1).and_then(|s| s.get(2..4)) {
                classification.financial_statement = Some(self.lookup(
                    &id,
                    CategoryField::FinancialStatement,
                    statement,
                    diagnostics,
                ));
            }
        }

        match segments.get(code_index) {
            Some(code) if code.len() == 8 && code.is_ascii() => {
                classification.period_division =
                    Some(self.lookup(&id, CategoryField::PeriodDivision, &code[0..1], diagnostics));
                classification.consolidation =
                    Some(self.lookup(&id, CategoryField::Consolidation, &code[1..2], diagnostics));
                classification.report_category =
                    Some(self.lookup(&id, CategoryField::ReportCategory, &code[2..6], diagnostics));
                classification.report_detail_category = Some(self.lookup(
                    &id,
                    CategoryField::ReportDetailCategory,
                    &code[6..8],
                    diagnostics,
                ));
            }
            Some(code) if code.len() == 4 && code.is_ascii() => {
                classification.report_category =
                    Some(self.lookup(&id, CategoryField::ReportCategory, code, diagnostics));
            }
            other => {
                log::debug!("{}: cannot decode report code {:?}", path, other);
                diagnostics.push(Diagnostic::ReportCodeFormat {
                    document: id.clone(),
                    segment: other.map(|s| s.to_string()).unwrap_or_default(),
                });
            }
        }

        DocumentIdentity {
            id,
            kind,
            classification,
        }
    }

    fn lookup(
        &self,
        document: &str,
        field: CategoryField,
        code: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Category {
        let category = self.categories.lookup(field, code);
        if category.label.is_none() {
            diagnostics.push(Diagnostic::UnknownCategory {
                document: document.to_string(),
                field: field.to_string(),
                code: code.to_string(),
            });
        }
        category
    }
}

/// Detail category code (`fr`, `sm`, ...) of a linkbase from its filename.
pub fn linkbase_detail_category(path: &str) -> Option<String> {
    basename(path)
        .split('-')
        .nth(1)
        .filter(|code| code.len() == 8 && code.is_ascii())
        .map(|code| code[6..8].to_string())
}

/// Filer attributes from the `tse-ed-t` tags of a summary document, with the
/// securities code falling back to the filename.
pub fn filer_info(root: Node, path: &str) -> FilerInfo {
    let mut info = FilerInfo::default();

    for node in root.descendants().filter(|n| {
        n.tag_name().name() == "nonNumeric"
            && n.tag_name()
                .namespace()
                .map_or(false, |ns| IX_NAMESPACES.contains(&ns))
    }) {
        let Some(name) = node.attribute("name") else {
            continue;
        };
        let text = node_text(node);
        if text.is_empty() {
            continue;
        }

        if name == COMPANY_NAME && info.company_name.is_none() {
            info.company_name = Some(text);
        } else if name == SECURITIES_CODE && info.securities_code.is_none() {
            info.securities_code = Some(text.chars().take(4).collect());
        } else if REPORTING_DATES.contains(&name) && info.reporting_date.is_none() {
            info.reporting_date = normalize_date(&text);
        }
    }

    if info.securities_code.is_none() {
        info.securities_code = basename(path)
            .split('-')
            .nth(2)
            .filter(|s| s.len() >= 4 && s.is_ascii())
            .map(|s| s[..4].to_string());
    }

    info
}

fn node_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}
