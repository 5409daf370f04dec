use chardet::detect;
use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use strum::Display;

use crate::error::Result;

/// Role of a file inside a disclosure package, from its filename alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum FileRole {
    InstanceDocument,
    Schema,
    LabelLinkbase,
    CalculationLinkbase,
    PresentationLinkbase,
    DefinitionLinkbase,
    Other,
}

/// Folder segment a file lives under (`XBRLData/Attachment`, `XBRLData/Summary`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Folder {
    Attachment,
    Summary,
    Root,
}

pub fn classify(path: &str) -> FileRole {
    let name = basename(path).to_ascii_lowercase();
    if name.ends_with("-ixbrl.htm") {
        FileRole::InstanceDocument
    } else if name.ends_with(".xsd") {
        FileRole::Schema
    } else if name.ends_with("-lab.xml") {
        FileRole::LabelLinkbase
    } else if name.ends_with("-cal.xml") {
        FileRole::CalculationLinkbase
    } else if name.ends_with("-pre.xml") {
        FileRole::PresentationLinkbase
    } else if name.ends_with("-def.xml") {
        FileRole::DefinitionLinkbase
    } else {
        FileRole::Other
    }
}

pub fn folder(path: &str) -> Folder {
    let dirs = || path.split('/').rev().skip(1);
    if dirs().any(|s| s.eq_ignore_ascii_case("attachment")) {
        Folder::Attachment
    } else if dirs().any(|s| s.eq_ignore_ascii_case("summary")) {
        Folder::Summary
    } else {
        Folder::Root
    }
}

pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// In-memory view of one disclosure ZIP.
#[derive(Clone, Debug, Default)]
pub struct Archive {
    files: BTreeMap<String, Vec<u8>>,
}

impl Archive {
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut files = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if !file.is_file() {
                continue;
            }
            let name = file.name().replace('\\', "/");
            let normalized = name.trim_start_matches('/').to_string();
            if normalized.is_empty() {
                continue;
            }
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .map_err(zip::result::ZipError::Io)?;
            files.insert(normalized, contents);
        }

        log::debug!("Loaded archive with {} files", files.len());
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files of one role in path order.
    pub fn files_with_role(&self, role: FileRole) -> Vec<(&str, &[u8])> {
        self.files
            .iter()
            .filter(|(path, _)| classify(path) == role)
            .map(|(path, data)| (path.as_str(), data.as_slice()))
            .collect()
    }

    /// Instance documents in processing order: descending by filename,
    /// ties broken by descending full path.
    pub fn instance_documents(&self) -> Vec<(&str, &[u8])> {
        let mut documents = self.files_with_role(FileRole::InstanceDocument);
        documents.sort_by(|a, b| {
            basename(b.0)
                .cmp(basename(a.0))
                .then_with(|| b.0.cmp(a.0))
        });
        documents
    }
}

/// Decode an archive entry to text, honoring a BOM and otherwise falling
/// back to charset detection for non UTF-8 content. Undetectable content is
/// read as Shift_JIS.
pub fn decode_text(bytes: &[u8]) -> std::io::Result<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.trim_start_matches('\u{feff}').to_string());
    }

    let charenc = detect(bytes).0;
    log::debug!("Detected character encoding: {}", charenc);

    let mut reader = DecodeReaderBytesBuilder::new()
        .encoding(Encoding::for_label(charenc.as_bytes()).or(Some(encoding_rs::SHIFT_JIS)))
        .build(bytes);
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}
