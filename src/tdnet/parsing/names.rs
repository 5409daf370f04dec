use once_cell::sync::Lazy;
use regex::Regex;

// Namespace segments generated by the TDNET/EDINET toolchain, in match order.
static NAMESPACE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^([a-z]{5}_cor)_(.+)$",
        r"^([a-z]{3}-[a-z]{8}-[0-9]{5})_(.+)$",
        r"^([a-z]{3}-[a-z]{2}-[a-z])_(.+)$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static LABEL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_label.*$").unwrap());

static FILER_NAMESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{3}-[a-z]{8}-[0-9]{5}$").unwrap());

/// Split a generated identifier into `(namespace, element)` when it starts
/// with one of the known namespace segments.
pub fn split_namespace(name: &str) -> Option<(String, String)> {
    NAMESPACE_PATTERNS.iter().find_map(|re| {
        re.captures(name)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    })
}

/// Resolve a locator fragment (`jppfs_cor_NetSales`) to `(namespace, element)`.
///
/// Fragments outside the known families are split at the last underscore.
pub fn split_locator(fragment: &str) -> Option<(String, String)> {
    split_namespace(fragment).or_else(|| {
        fragment
            .rsplit_once('_')
            .filter(|(ns, element)| !ns.is_empty() && !element.is_empty())
            .map(|(ns, element)| (ns.to_string(), element.to_string()))
    })
}

/// Normalize a label anchor from a filer (archive) label linkbase.
///
/// Returns the namespace when the anchor carries one, and the bare element.
pub fn local_label_anchor(anchor: &str) -> (Option<String>, String) {
    let trimmed = LABEL_SUFFIX.replace(anchor, "");
    let trimmed = trimmed.strip_prefix("label_").unwrap_or(&trimmed);
    match split_namespace(trimmed) {
        Some((ns, element)) => (Some(ns), element),
        None => (None, trimmed.to_string()),
    }
}

/// Normalize a label anchor from a published taxonomy label linkbase.
pub fn global_label_anchor(anchor: &str) -> String {
    anchor.strip_prefix("label_").unwrap_or(anchor).to_string()
}

pub fn is_filer_namespace(namespace: &str) -> bool {
    FILER_NAMESPACE.is_match(namespace)
}

/// Filer namespace (`tse-acedjpfr-57210`) from a linkbase filename.
pub fn filer_namespace_from_filename(name: &str) -> Option<String> {
    let parts: Vec<&str> = name.split('-').take(3).collect();
    if parts.len() < 3 {
        return None;
    }
    let candidate = parts.join("-");
    is_filer_namespace(&candidate).then_some(candidate)
}

/// Last path segment of a role URI, with the `rol_`/`Role` prefix removed.
pub fn role_key(role_uri: &str) -> String {
    let last = role_uri
        .trim_end_matches('/')
        .rsplit(['/', '#'])
        .next()
        .unwrap_or(role_uri);
    last.strip_prefix("rol_")
        .or_else(|| last.strip_prefix("Role"))
        .unwrap_or(last)
        .to_string()
}

/// The part of a QName after the prefix.
pub fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map(|(_, local)| local).unwrap_or(qname)
}
