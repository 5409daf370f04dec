use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use strum::IntoEnumIterator;

use super::archive::{decode_text, Archive, FileRole};
use super::classifier::{filer_info, DocumentClassifier};
use super::join::RelationshipJoiner;
use super::parsing::labels::local_entries;
use super::parsing::names::is_filer_namespace;
use super::parsing::{
    parse_instance, parse_linkbase, prepare_instance_text, ContextTable, FactExtractor, LabelTable,
};
use super::report::FULL_FINANCIAL_REPORT;
use super::taxonomy::TaxonomyCache;
use crate::core::types::{
    Association, Context, Document, DocumentKind, Fact, FilerInfo, LinkEdge, LinkKind,
};
use crate::core::EngineConfig;
use crate::error::{Diagnostic, Result};

/// Everything resolved from one disclosure archive.
#[derive(Debug, Default, Serialize)]
pub struct Resolution {
    pub filer: FilerInfo,
    pub contexts: Vec<Context>,
    pub documents: Vec<Document>,
    pub labels: LabelTable,
    pub links: BTreeMap<LinkKind, Vec<LinkEdge>>,
    pub associations: Vec<Association>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// Facts of every extracted document, in processing order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.documents.iter().flat_map(|d| d.facts.iter())
    }

    pub fn edges(&self, kind: LinkKind) -> &[LinkEdge] {
        self.links.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn associations_of(&self, kind: LinkKind) -> impl Iterator<Item = &Association> {
        self.associations.iter().filter(move |a| a.kind == kind)
    }
}

/// Resolve one archive.
///
/// Global labels are read through `taxonomy` when given; without it only the
/// labels shipped in the archive are used.
pub fn resolve(
    bytes: &[u8],
    taxonomy: Option<&TaxonomyCache>,
    config: &EngineConfig,
) -> Result<Resolution> {
    let archive = Archive::load(bytes)?;
    let mut resolution = Resolution::default();
    let diagnostics = &mut resolution.diagnostics;

    // Decode everything first so the parsed trees can borrow the text.
    let mut texts = Vec::new();
    for (path, data) in archive.instance_documents() {
        match decode_text(data) {
            Ok(text) => texts.push((path, prepare_instance_text(&text))),
            Err(e) => diagnostics.push(Diagnostic::MalformedDocument {
                path: path.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    let mut parsed = Vec::new();
    for (path, text) in &texts {
        match parse_instance(text) {
            Ok(doc) => parsed.push((*path, doc)),
            Err(e) => {
                log::debug!("{}: {}", path, e);
                diagnostics.push(Diagnostic::MalformedDocument {
                    path: path.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    let mut contexts = ContextTable::new();
    for (_, doc) in &parsed {
        contexts.extend_from(doc.root());
    }
    log::debug!("{} contexts across {} documents", contexts.len(), parsed.len());

    let classifier = DocumentClassifier::new(&config.categories);
    let extractor = FactExtractor::new(&contexts, config.current_period_only);
    let mut seen = HashSet::new();
    let mut filer: Option<FilerInfo> = None;

    for (path, doc) in &parsed {
        let mut document_diagnostics = Vec::new();
        let identity = classifier.identify(path, &mut document_diagnostics);
        if !seen.insert(identity.id.clone()) {
            log::debug!("Skipping {}: document {} already extracted", path, identity.id);
            continue;
        }

        let document_filer = match identity.kind {
            DocumentKind::Summary => {
                let info = filer_info(doc.root_element(), path);
                // The first summary in processing order speaks for the archive.
                if filer.is_none() {
                    filer = Some(info.clone());
                }
                info
            }
            DocumentKind::Attachment => FilerInfo::default(),
        };

        let facts = extractor.extract(doc.root(), &identity, &mut document_diagnostics);
        log::debug!("{}: {} facts", path, facts.len());
        diagnostics.append(&mut document_diagnostics);

        resolution.documents.push(Document {
            id: identity.id,
            path: path.to_string(),
            kind: identity.kind,
            classification: identity.classification,
            filer: document_filer,
            facts,
        });
    }

    let filer = filer.unwrap_or_default();
    for document in &mut resolution.documents {
        if document.kind == DocumentKind::Attachment {
            document.filer = filer.clone();
        }
    }
    resolution.filer = filer;
    resolution.contexts = contexts.to_contexts();

    for (kind, role) in [
        (LinkKind::Calculation, FileRole::CalculationLinkbase),
        (LinkKind::Presentation, FileRole::PresentationLinkbase),
        (LinkKind::Definition, FileRole::DefinitionLinkbase),
    ] {
        let mut edges = Vec::new();
        for (path, data) in archive.files_with_role(role) {
            let parsed = decode_text(data)
                .map_err(|e| e.to_string())
                .and_then(|text| parse_linkbase(path, &text, diagnostics).map_err(|e| e.to_string()));
            match parsed {
                Ok(mut found) => edges.append(&mut found),
                Err(reason) => diagnostics.push(Diagnostic::MalformedLinkbase {
                    path: path.to_string(),
                    reason,
                }),
            }
        }
        resolution.links.insert(kind, edges);
    }

    if let Some(taxonomy) = taxonomy {
        let namespaces: BTreeSet<&str> = resolution
            .documents
            .iter()
            .flat_map(|d| d.facts.iter().map(|f| f.namespace.as_str()))
            .chain(
                resolution
                    .links
                    .values()
                    .flatten()
                    .flat_map(|e| [e.namespace.as_str(), e.from_namespace.as_str()]),
            )
            .filter(|ns| !ns.is_empty() && !is_filer_namespace(ns))
            .collect();

        for namespace in namespaces {
            let entries = taxonomy.labels(namespace)?;
            resolution.labels.extend(entries.iter().cloned());
        }
    }

    for (path, data) in archive.files_with_role(FileRole::LabelLinkbase) {
        let entries = decode_text(data)
            .map_err(|e| e.to_string())
            .and_then(|text| local_entries(path, &text).map_err(|e| e.to_string()));
        match entries {
            Ok(entries) => resolution.labels.extend(entries),
            Err(reason) => diagnostics.push(Diagnostic::MalformedLinkbase {
                path: path.to_string(),
                reason,
            }),
        }
    }

    let joiner = RelationshipJoiner::new(&resolution.labels);
    for document in resolution
        .documents
        .iter()
        .filter(|d| d.classification.detail_code() == Some(FULL_FINANCIAL_REPORT))
    {
        for kind in LinkKind::iter() {
            let edges = resolution.links.get(&kind).map(Vec::as_slice).unwrap_or_default();
            let mut associations = joiner.join(document, kind, edges);
            if associations.is_empty() {
                log::warn!("{}: no {} relationships matched any fact", document.id, kind);
                diagnostics.push(Diagnostic::EmptyLink {
                    document: document.id.clone(),
                    link: kind,
                });
            }
            resolution.associations.append(&mut associations);
        }
    }

    log::info!(
        "Resolved {} documents, {} facts, {} labels, {} associations ({} diagnostics)",
        resolution.documents.len(),
        resolution.facts().count(),
        resolution.labels.len(),
        resolution.associations.len(),
        resolution.diagnostics.len()
    );
    for (kind, count) in resolution
        .diagnostics
        .iter()
        .map(diagnostic_kind)
        .counts()
        .into_iter()
        .sorted()
    {
        log::debug!("  {}: {}", kind, count);
    }

    Ok(resolution)
}

fn diagnostic_kind(diagnostic: &Diagnostic) -> &'static str {
    match diagnostic {
        Diagnostic::MissingContext { .. } => "missing_context",
        Diagnostic::NumericFormat { .. } => "numeric_format",
        Diagnostic::ReportCodeFormat { .. } => "report_code_format",
        Diagnostic::UnknownCategory { .. } => "unknown_category",
        Diagnostic::EmptyLink { .. } => "empty_link",
        Diagnostic::MalformedDocument { .. } => "malformed_document",
        Diagnostic::MalformedLinkbase { .. } => "malformed_linkbase",
        Diagnostic::DroppedArc { .. } => "dropped_arc",
    }
}
