use roxmltree::Node;
use std::collections::HashMap;

use super::XBRLI_NS;
use crate::core::types::{Context, Period};
use crate::utils::dates::normalize_date;

/// `context id -> period` for every instance document of an archive.
#[derive(Clone, Debug, Default)]
pub struct ContextTable {
    contexts: HashMap<String, Period>,
}

impl ContextTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the contexts declared under `root`. A recurring id overwrites the
    /// earlier period. Returns the number of contexts read.
    pub fn extend_from(&mut self, root: Node) -> usize {
        let mut count = 0;
        for node in root
            .descendants()
            .filter(|n| n.has_tag_name((XBRLI_NS, "context")))
        {
            let Some(id) = node.attribute("id") else {
                continue;
            };
            match read_period(node) {
                Some(period) => {
                    self.contexts.insert(id.to_string(), period);
                    count += 1;
                }
                None => log::debug!("Skipping context {} without a usable period", id),
            }
        }
        count
    }

    pub fn get(&self, id: &str) -> Option<&Period> {
        self.contexts.get(id)
    }

    /// Every context, ordered by id.
    pub fn to_contexts(&self) -> Vec<Context> {
        let mut contexts: Vec<Context> = self
            .contexts
            .iter()
            .map(|(id, period)| Context {
                id: id.clone(),
                period: period.clone(),
            })
            .collect();
        contexts.sort_by(|a, b| a.id.cmp(&b.id));
        contexts
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

fn read_period(context: Node) -> Option<Period> {
    let period = context
        .children()
        .find(|n| n.has_tag_name((XBRLI_NS, "period")))?;

    let date_of = |name: &str| {
        period
            .children()
            .find(|n| n.has_tag_name((XBRLI_NS, name)))
            .and_then(|n| n.text())
            .and_then(normalize_date)
    };

    if let Some(date) = date_of("instant") {
        return Some(Period::Instant { date });
    }
    match (date_of("startDate"), date_of("endDate")) {
        (Some(start), Some(end)) => Some(Period::Duration { start, end }),
        _ => None,
    }
}
