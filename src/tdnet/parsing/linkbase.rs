use bigdecimal::BigDecimal;
use quick_xml::events::{BytesStart, Event};
use quick_xml::NsReader;
use std::collections::HashMap;

use super::names::{role_key, split_locator};
use super::{in_namespace, LinkAttributes, LINK_NS};
use crate::core::types::{LinkEdge, LinkKind};
use crate::error::Diagnostic;
use crate::tdnet::classifier::linkbase_detail_category;

fn link_kind(local: &[u8]) -> Option<LinkKind> {
    match local {
        b"calculationLink" => Some(LinkKind::Calculation),
        b"presentationLink" => Some(LinkKind::Presentation),
        b"definitionLink" => Some(LinkKind::Definition),
        _ => None,
    }
}

fn is_arc(local: &[u8]) -> bool {
    matches!(
        local,
        b"calculationArc" | b"presentationArc" | b"definitionArc"
    )
}

/// One extended link being read.
struct Block {
    kind: LinkKind,
    role_key: String,
    locators: HashMap<String, (String, String)>,
    arcs: Vec<LinkAttributes>,
}

/// Parse a calculation, presentation or definition linkbase into edges.
///
/// Arcs that cannot be resolved are dropped and reported through
/// `diagnostics`; an error is returned only when the document itself is not
/// well-formed.
pub fn parse_linkbase(
    path: &str,
    text: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<LinkEdge>, quick_xml::Error> {
    let mut reader = NsReader::from_str(text);
    let mut buf = Vec::new();
    let mut edges = Vec::new();
    let mut block: Option<Block> = None;
    let detail = linkbase_detail_category(path);

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let (ns, local) = reader.resolve_element(e.name());
                if !in_namespace(&ns, LINK_NS) {
                    // not a linkbase element
                } else if let Some(kind) = link_kind(local.as_ref()) {
                    let attributes = LinkAttributes::read(&reader, e)?;
                    block = Some(Block {
                        kind,
                        role_key: attributes.xlink("role").map(role_key).unwrap_or_default(),
                        locators: HashMap::new(),
                        arcs: Vec::new(),
                    });
                } else if let Some(block) = block.as_mut() {
                    read_member(&reader, e, local.as_ref(), block)?;
                }
            }
            Event::Empty(ref e) => {
                let (ns, local) = reader.resolve_element(e.name());
                if in_namespace(&ns, LINK_NS) {
                    if let Some(block) = block.as_mut() {
                        read_member(&reader, e, local.as_ref(), block)?;
                    }
                }
            }
            Event::End(ref e) => {
                let (ns, local) = reader.resolve_element(e.name());
                if in_namespace(&ns, LINK_NS) && link_kind(local.as_ref()).is_some() {
                    if let Some(block) = block.take() {
                        close_block(path, block, detail.as_deref(), &mut edges, diagnostics);
                    }
                }
            }
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }

    log::debug!("{}: {} edges", path, edges.len());
    Ok(edges)
}

fn read_member(
    reader: &NsReader<&[u8]>,
    e: &BytesStart,
    local: &[u8],
    block: &mut Block,
) -> Result<(), quick_xml::Error> {
    if local == b"loc" {
        let attributes = LinkAttributes::read(reader, e)?;
        let label = attributes.xlink("label");
        let target = attributes
            .xlink("href")
            .and_then(|href| href.rsplit_once('#'))
            .and_then(|(_, fragment)| split_locator(fragment));
        if let (Some(label), Some(target)) = (label, target) {
            block.locators.insert(label.to_string(), target);
        }
    } else if is_arc(local) {
        block.arcs.push(LinkAttributes::read(reader, e)?);
    }
    Ok(())
}

fn close_block(
    path: &str,
    block: Block,
    detail: Option<&str>,
    edges: &mut Vec<LinkEdge>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for arc in &block.arcs {
        let from = arc.xlink("from").unwrap_or_default();
        let to = arc.xlink("to").unwrap_or_default();
        let mut drop_arc = |reason: &str| {
            log::debug!("{}: dropping arc {} -> {}: {}", path, from, to, reason);
            diagnostics.push(Diagnostic::DroppedArc {
                path: path.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                reason: reason.to_string(),
            });
        };

        let (Some((from_namespace, from_element)), Some((namespace, to_element))) =
            (block.locators.get(from), block.locators.get(to))
        else {
            drop_arc("no locator for arc endpoint");
            continue;
        };

        let order = match arc.plain("order").map(|o| o.trim().parse::<BigDecimal>()) {
            None => BigDecimal::from(1),
            Some(Ok(order)) => order,
            Some(Err(_)) => {
                drop_arc("order is not a decimal");
                continue;
            }
        };

        let weight = match block.kind {
            LinkKind::Calculation => {
                match arc.plain("weight").map(|w| w.trim().parse::<BigDecimal>()) {
                    Some(Ok(weight)) => Some(weight),
                    Some(Err(_)) => {
                        drop_arc("weight is not a decimal");
                        continue;
                    }
                    None => {
                        drop_arc("calculation arc without weight");
                        continue;
                    }
                }
            }
            LinkKind::Presentation | LinkKind::Definition => None,
        };

        edges.push(LinkEdge {
            kind: block.kind,
            role_key: block.role_key.clone(),
            namespace: namespace.clone(),
            from_namespace: from_namespace.clone(),
            from_element: from_element.clone(),
            to_element: to_element.clone(),
            order,
            weight,
            arcrole: arc.xlink("arcrole").map(str::to_string),
            report_detail_category: detail.map(str::to_string),
            source: path.to_string(),
        });
    }
}
