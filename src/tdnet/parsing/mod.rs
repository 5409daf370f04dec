pub mod context;
pub mod facts;
pub mod labels;
pub mod linkbase;
pub mod names;

use quick_xml::events::BytesStart;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::collections::HashMap;

pub use context::ContextTable;
pub use facts::{decode_numeric, FactExtractor};
pub use labels::LabelTable;
pub use linkbase::parse_linkbase;

pub const XBRLI_NS: &str = "http://www.xbrl.org/2003/instance";
pub const IX_NAMESPACES: [&str; 2] = [
    "http://www.xbrl.org/2013/inlineXBRL",
    "http://www.xbrl.org/2008/inlineXBRL",
];
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const LINK_NS: &str = "http://www.xbrl.org/2003/linkbase";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const LABEL_ROLE: &str = "http://www.xbrl.org/2003/role/label";

/// Parse an inline XBRL instance document into a namespace-aware tree.
pub fn parse_instance(text: &str) -> Result<roxmltree::Document<'_>, roxmltree::Error> {
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;
    roxmltree::Document::parse_with_options(text, options)
}

/// Inline XBRL files are XHTML and commonly carry the one HTML entity XML
/// does not predefine.
pub fn prepare_instance_text(text: &str) -> String {
    text.replace("&nbsp;", "&#160;")
}

pub(crate) fn in_namespace(ns: &ResolveResult, expected: &str) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == expected.as_bytes())
}

/// Attributes of a linkbase element, split into `xlink:*` and unprefixed ones.
#[derive(Debug, Default)]
pub(crate) struct LinkAttributes {
    pub xlink: HashMap<String, String>,
    pub plain: HashMap<String, String>,
}

impl LinkAttributes {
    pub fn read(reader: &NsReader<&[u8]>, e: &BytesStart) -> Result<Self, quick_xml::Error> {
        let mut attributes = Self::default();
        for attr in e.attributes() {
            let attr = attr?;
            let (ns, local) = reader.resolve_attribute(attr.key);
            let local = String::from_utf8_lossy(local.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            if in_namespace(&ns, XLINK_NS) {
                attributes.xlink.insert(local, value);
            } else if matches!(ns, ResolveResult::Unbound) {
                attributes.plain.insert(local, value);
            }
        }
        Ok(attributes)
    }

    pub fn xlink(&self, name: &str) -> Option<&str> {
        self.xlink.get(name).map(String::as_str)
    }

    pub fn plain(&self, name: &str) -> Option<&str> {
        self.plain.get(name).map(String::as_str)
    }
}
