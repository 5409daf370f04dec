use quick_xml::events::Event;
use quick_xml::NsReader;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::names::{filer_namespace_from_filename, global_label_anchor, local_label_anchor};
use super::{in_namespace, LinkAttributes, LABEL_ROLE, LINK_NS};
use crate::core::types::{LabelEntry, LabelOrigin};
use crate::tdnet::archive::basename;

/// Standard-role `link:label` resources as `(xlink:label, text)` in
/// document order.
pub fn parse_label_resources(text: &str) -> Result<Vec<(String, String)>, quick_xml::Error> {
    let mut reader = NsReader::from_str(text);
    let mut buf = Vec::new();
    let mut labels = Vec::new();

    // (anchor, text) of the standard-role label being read
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let (ns, local) = reader.resolve_element(e.name());
                if in_namespace(&ns, LINK_NS) && local.as_ref() == b"label" {
                    let attributes = LinkAttributes::read(&reader, e)?;
                    if attributes.xlink("role") == Some(LABEL_ROLE) {
                        if let Some(anchor) = attributes.xlink("label") {
                            current = Some((anchor.to_string(), String::new()));
                        }
                    }
                }
            }
            Event::Text(ref t) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(ref c) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(c));
                }
            }
            Event::End(ref e) => {
                let (ns, local) = reader.resolve_element(e.name());
                if in_namespace(&ns, LINK_NS) && local.as_ref() == b"label" {
                    if let Some((anchor, text)) = current.take() {
                        labels.push((anchor, text.trim().to_string()));
                    }
                }
            }
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }

    Ok(labels)
}

/// Label entries of a published taxonomy label linkbase for `namespace`.
pub fn global_entries(namespace: &str, text: &str) -> Result<Vec<LabelEntry>, quick_xml::Error> {
    Ok(parse_label_resources(text)?
        .into_iter()
        .map(|(anchor, text)| LabelEntry {
            namespace: namespace.to_string(),
            element: global_label_anchor(&anchor),
            text,
            origin: LabelOrigin::Global,
        })
        .collect())
}

/// Label entries of a label linkbase shipped inside an archive.
///
/// Anchors without a namespace segment belong to the filer namespace named by
/// the file; when the filename carries none those anchors are skipped.
pub fn local_entries(path: &str, text: &str) -> Result<Vec<LabelEntry>, quick_xml::Error> {
    let filer_namespace = filer_namespace_from_filename(basename(path));

    Ok(parse_label_resources(text)?
        .into_iter()
        .filter_map(|(anchor, text)| {
            let (namespace, element) = local_label_anchor(&anchor);
            let namespace = namespace.or_else(|| filer_namespace.clone());
            if namespace.is_none() {
                log::debug!("{}: no namespace for label anchor {}", path, anchor);
            }
            Some(LabelEntry {
                namespace: namespace?,
                element,
                text,
                origin: LabelOrigin::Local,
            })
        })
        .collect())
}

/// Merged labels, exactly one per `(namespace, element)`.
#[derive(Clone, Debug, Default)]
pub struct LabelTable {
    entries: BTreeMap<(String, String), LabelEntry>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping the entry already present when it has the same or a
    /// stronger origin: local beats global, first occurrence beats later ones.
    pub fn insert(&mut self, entry: LabelEntry) {
        let key = (entry.namespace.clone(), entry.element.clone());
        match self.entries.get(&key) {
            Some(existing) if existing.origin >= entry.origin => {}
            _ => {
                self.entries.insert(key, entry);
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = LabelEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.insert(entry);
        }
    }

    pub fn get(&self, namespace: &str, element: &str) -> Option<&str> {
        self.entries
            .get(&(namespace.to_string(), element.to_string()))
            .map(|entry| entry.text.as_str())
    }

    /// The label, or the raw element name when none is known.
    pub fn label_or_element<'a>(&'a self, namespace: &str, element: &'a str) -> &'a str {
        self.get(namespace, element).unwrap_or(element)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LabelEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LabelTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL_PATH: &str =
        "XBRLData/Attachment/tse-acedjpfr-57210-2023-03-31-01-2023-05-12-lab.xml";

    fn linkbase(labels: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase"
               xmlns:xlink="http://www.w3.org/1999/xlink"
               xmlns:xml="http://www.w3.org/XML/1998/namespace">
  <link:labelLink xlink:type="extended" xlink:role="http://www.xbrl.org/2003/role/link">
    {}
  </link:labelLink>
</link:linkbase>"#,
            labels
        )
    }

    fn entry(ns: &str, element: &str, text: &str, origin: LabelOrigin) -> LabelEntry {
        LabelEntry {
            namespace: ns.to_string(),
            element: element.to_string(),
            text: text.to_string(),
            origin,
        }
    }

    #[test]
    fn test_parse_standard_role_only() {
        let text = linkbase(
            r#"<link:label xlink:type="resource" xlink:label="label_NetSales" xlink:role="http://www.xbrl.org/2003/role/label" xml:lang="ja">売上高</link:label>
               <link:label xlink:type="resource" xlink:label="label_NetSales_2" xlink:role="http://www.xbrl.org/2003/role/verboseLabel" xml:lang="ja">売上高（冗長）</link:label>
               <link:label xlink:type="resource" xlink:label="label_Assets" xlink:role="http://www.xbrl.org/2003/role/label" xml:lang="ja"><![CDATA[資産]]></link:label>"#,
        );
        let labels = parse_label_resources(&text).unwrap();
        assert_eq!(
            labels,
            vec![
                ("label_NetSales".to_string(), "売上高".to_string()),
                ("label_Assets".to_string(), "資産".to_string()),
            ]
        );
    }

    #[test]
    fn test_global_entries_strip_prefix() {
        let text = linkbase(
            r#"<link:label xlink:label="label_NetSales" xlink:role="http://www.xbrl.org/2003/role/label">売上高</link:label>"#,
        );
        let entries = global_entries("jppfs_cor", &text).unwrap();
        assert_eq!(entries, vec![entry("jppfs_cor", "NetSales", "売上高", LabelOrigin::Global)]);
    }

    #[test]
    fn test_local_entries_namespace_resolution() {
        let text = linkbase(
            r#"<link:label xlink:label="label_jppfs_cor_NetSales_label" xlink:role="http://www.xbrl.org/2003/role/label">売上高（当社）</link:label>
               <link:label xlink:label="label_SpecialItems" xlink:role="http://www.xbrl.org/2003/role/label">特別項目</link:label>"#,
        );
        let entries = local_entries(LOCAL_PATH, &text).unwrap();
        assert_eq!(
            entries,
            vec![
                entry("jppfs_cor", "NetSales", "売上高（当社）", LabelOrigin::Local),
                entry("tse-acedjpfr-57210", "SpecialItems", "特別項目", LabelOrigin::Local),
            ]
        );
    }

    #[test]
    fn test_local_entries_without_filer_namespace_are_skipped() {
        let text = linkbase(
            r#"<link:label xlink:label="label_SpecialItems" xlink:role="http://www.xbrl.org/2003/role/label">特別項目</link:label>"#,
        );
        assert!(local_entries("custom-lab.xml", &text).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_linkbase_is_an_error() {
        assert!(parse_label_resources("<link:linkbase xmlns:link=\"http://www.xbrl.org/2003/linkbase\"><link:label></link:linkbase>").is_err());
    }

    #[test]
    fn test_local_overrides_global() {
        let mut table = LabelTable::new();
        table.insert(entry("jppfs_cor", "NetSales", "売上高", LabelOrigin::Global));
        table.insert(entry("jppfs_cor", "NetSales", "売上高（当社）", LabelOrigin::Local));
        table.insert(entry("jppfs_cor", "NetSales", "売上高（重複）", LabelOrigin::Local));
        table.insert(entry("jppfs_cor", "NetSales", "売上高（後発）", LabelOrigin::Global));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("jppfs_cor", "NetSales"), Some("売上高（当社）"));
    }

    #[test]
    fn test_local_wins_regardless_of_insert_order() {
        let mut table = LabelTable::new();
        table.insert(entry("jppfs_cor", "NetSales", "売上高（当社）", LabelOrigin::Local));
        table.insert(entry("jppfs_cor", "NetSales", "売上高", LabelOrigin::Global));
        assert_eq!(table.get("jppfs_cor", "NetSales"), Some("売上高（当社）"));
    }

    #[test]
    fn test_label_or_element_falls_back() {
        let table = LabelTable::new();
        assert_eq!(table.label_or_element("jppfs_cor", "NetSales"), "NetSales");
        assert!(table.get("jppfs_cor", "NetSales").is_none());
    }

    #[test]
    fn test_serializes_as_entry_list() {
        let mut table = LabelTable::new();
        table.insert(entry("jppfs_cor", "NetSales", "売上高", LabelOrigin::Global));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json[0]["element"], "NetSales");
        assert_eq!(json[0]["origin"], "global");
    }
}
