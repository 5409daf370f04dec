use bigdecimal::{BigDecimal, ParseBigDecimalError};
use roxmltree::Node;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use super::context::ContextTable;
use super::names::local_name;
use super::{IX_NAMESPACES, XSI_NS};
use crate::core::types::{Fact, Period};
use crate::error::Diagnostic;
use crate::tdnet::classifier::DocumentIdentity;

const FIXED_ZERO_FORMATS: [&str; 2] = ["fixed-zero", "fixedzero"];

/// Largest `|scale|` accepted on a fact.
const MAX_SCALE: u64 = 100;

/// Largest `|exponent|` accepted in the content itself.
const MAX_EXPONENT: u64 = 1000;

/// Decode the text of an `ix:nonFraction`.
///
/// Thousands separators and whitespace are ignored, the value is multiplied
/// by `10^scale` and negated when `negative` is set. Empty content yields
/// `None`. Scales or exponents outside a sane range are rejected.
pub fn decode_numeric(
    raw: &str,
    scale: i64,
    negative: bool,
    format: Option<&str>,
) -> Result<Option<BigDecimal>, ParseBigDecimalError> {
    if scale.unsigned_abs() > MAX_SCALE {
        return Err(ParseBigDecimalError::Other(format!("scale {} out of range", scale)));
    }
    if format.map_or(false, |f| FIXED_ZERO_FORMATS.contains(&local_name(f))) {
        return Ok(Some(BigDecimal::from(0)));
    }

    let cleaned: String = raw
        .nfkc()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }

    let parsed = cleaned.parse::<BigDecimal>()?;
    let (_, exponent) = parsed.as_bigint_and_exponent();
    if exponent.unsigned_abs() > MAX_EXPONENT {
        return Err(ParseBigDecimalError::Other(format!(
            "exponent of {:?} out of range",
            cleaned
        )));
    }

    let mut value = parsed * BigDecimal::new(1.into(), -scale);
    if negative {
        value = -value;
    }
    if value.is_integer() {
        value = value.with_scale(0);
    }
    Ok(Some(value))
}

pub struct FactExtractor<'a> {
    contexts: &'a ContextTable,
    current_period_only: bool,
}

impl<'a> FactExtractor<'a> {
    pub fn new(contexts: &'a ContextTable, current_period_only: bool) -> Self {
        Self {
            contexts,
            current_period_only,
        }
    }

    /// Every `ix:nonFraction` under `root`, in document order.
    pub fn extract(
        &self,
        root: Node,
        identity: &DocumentIdentity,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Fact> {
        root.descendants()
            .filter(is_non_fraction)
            .filter_map(|node| self.extract_one(node, identity, diagnostics))
            .collect()
    }

    fn extract_one(
        &self,
        node: Node,
        identity: &DocumentIdentity,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Fact> {
        let name = node.attribute("name")?;
        let (namespace, element) = match name.split_once(':') {
            Some((prefix, local)) => (prefix, local),
            None => ("", name),
        };

        if node.attribute((XSI_NS, "nil")) == Some("true") {
            log::debug!("{}: skipping nil fact {}", identity.id, name);
            return None;
        }

        let context_id = node.attribute("contextRef").unwrap_or_default();
        if self.current_period_only && !context_id.starts_with("Current") {
            return None;
        }

        let raw = element_text(node);
        let format = node.attribute("format").map(|f| local_name(f).to_string());

        let scale = match node.attribute("scale").map(|s| s.trim().parse::<i64>()) {
            None => 0,
            Some(Ok(scale)) => scale,
            Some(Err(_)) => {
                return self.numeric_error(identity, element, &raw, diagnostics);
            }
        };
        let negative = node.attribute("sign") == Some("-");

        let numeric = match decode_numeric(&raw, scale, negative, format.as_deref()) {
            Ok(numeric) => numeric,
            Err(_) => return self.numeric_error(identity, element, &raw, diagnostics),
        };

        let period = self.contexts.get(context_id);
        if period.is_none() {
            diagnostics.push(Diagnostic::MissingContext {
                document: identity.id.clone(),
                element: element.to_string(),
                context_id: context_id.to_string(),
            });
        }

        Some(Fact {
            id: Uuid::new_v4(),
            document_id: identity.id.clone(),
            namespace: namespace.to_string(),
            namespace_uri: node
                .lookup_namespace_uri((!namespace.is_empty()).then_some(namespace))
                .map(str::to_string),
            element: element.to_string(),
            context_id: context_id.to_string(),
            unit_ref: node.attribute("unitRef").map(str::to_string),
            format,
            decimals: node.attribute("decimals").map(str::to_string),
            scale,
            numeric,
            classification: identity.classification.clone(),
            start_date: period.and_then(Period::start_date),
            end_date: period.and_then(Period::end_date),
            instant_date: period.and_then(Period::instant_date),
        })
    }

    fn numeric_error(
        &self,
        identity: &DocumentIdentity,
        element: &str,
        raw: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Fact> {
        log::debug!("{}: dropping {} with content {:?}", identity.id, element, raw);
        diagnostics.push(Diagnostic::NumericFormat {
            document: identity.id.clone(),
            element: element.to_string(),
            raw: raw.to_string(),
        });
        None
    }
}

fn is_non_fraction(node: &Node) -> bool {
    node.is_element()
        && node.tag_name().name() == "nonFraction"
        && node
            .tag_name()
            .namespace()
            .map_or(false, |ns| IX_NAMESPACES.contains(&ns))
}

fn element_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
