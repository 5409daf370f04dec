use std::collections::HashMap;

use crate::core::types::{Association, Document, LinkEdge, LinkKind};
use crate::tdnet::parsing::LabelTable;

/// Attaches taxonomy relationships to the facts of a document.
pub struct RelationshipJoiner<'a> {
    labels: &'a LabelTable,
}

impl<'a> RelationshipJoiner<'a> {
    pub fn new(labels: &'a LabelTable) -> Self {
        Self { labels }
    }

    /// One association per `(fact, edge)` pair whose element, namespace and
    /// detail category match, in fact order. Edges of other kinds are ignored.
    pub fn join(&self, document: &Document, kind: LinkKind, edges: &[LinkEdge]) -> Vec<Association> {
        let mut by_child: HashMap<(&str, &str, &str), Vec<&LinkEdge>> = HashMap::new();
        for edge in edges.iter().filter(|e| e.kind == kind) {
            if let Some(detail) = edge.report_detail_category.as_deref() {
                by_child
                    .entry((edge.to_element.as_str(), edge.namespace.as_str(), detail))
                    .or_default()
                    .push(edge);
            }
        }

        let mut associations = Vec::new();
        for fact in &document.facts {
            let Some(detail) = fact.classification.detail_code() else {
                continue;
            };
            let Some(matches) = by_child.get(&(fact.element.as_str(), fact.namespace.as_str(), detail))
            else {
                continue;
            };
            for edge in matches {
                associations.push(Association {
                    fact_id: fact.id,
                    document_id: fact.document_id.clone(),
                    kind,
                    role_key: edge.role_key.clone(),
                    parent_namespace: edge.from_namespace.clone(),
                    parent_element: edge.from_element.clone(),
                    parent_label: self
                        .labels
                        .get(&edge.from_namespace, &edge.from_element)
                        .map(str::to_string),
                    child_namespace: edge.namespace.clone(),
                    child_element: edge.to_element.clone(),
                    order: edge.order.clone(),
                    weight: edge.weight.clone(),
                });
            }
        }
        associations
    }
}
