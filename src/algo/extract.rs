//! Archive extraction: turn an upload batch into `{path: json}`.
//!
//! A batch containing a `.zip` is treated as a full export and only that
//! archive is read; otherwise every loose `.json` file is parsed. Entries
//! that are not JSON, not UTF-8, too large, or malformed are skipped with a
//! warning. Only an unreadable archive or an empty result is fatal.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;

use log::{debug, warn};
use rayon::prelude::*;
use serde_json::Value;
use zip::ZipArchive;

use crate::error::{InstacheckError, Result};

/// Parsed JSON payloads keyed by their path inside the archive (or file name).
pub type EntryMap = BTreeMap<String, Value>;

/// One uploaded file: its name and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, text.into().into_bytes())
    }

    /// Read a file from disk. The name is the path as given.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| InstacheckError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), bytes))
    }
}

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Lowercase suffixes that mark a file as a compressed export.
    pub archive_extensions: Vec<String>,
    /// Lowercase suffix of entries worth parsing.
    pub json_extension: String,
    /// Entries larger than this (uncompressed) are skipped.
    pub max_entry_bytes: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            archive_extensions: vec![".zip".into()],
            json_extension: ".json".into(),
            max_entry_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ExtractConfig {
    pub fn is_archive(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.archive_extensions
            .iter()
            .any(|ext| lower.ends_with(ext.as_str()))
    }

    pub fn is_json(&self, name: &str) -> bool {
        name.to_lowercase().ends_with(self.json_extension.as_str())
    }
}

/// Extract every parseable JSON payload from an upload batch.
pub fn extract(files: &[FileInput], config: &ExtractConfig) -> Result<EntryMap> {
    if files.is_empty() {
        return Err(InstacheckError::NoFiles);
    }

    let entries = match files.iter().find(|f| config.is_archive(&f.name)) {
        Some(archive) => {
            if files.len() > 1 {
                debug!(
                    "Archive '{}' found; ignoring {} other file(s) in the batch",
                    archive.name,
                    files.len() - 1
                );
            }
            extract_archive(archive, config)?
        }
        None => extract_loose(files, config),
    };

    if entries.is_empty() {
        return Err(InstacheckError::NoJson);
    }
    debug!("Extracted {} JSON entries", entries.len());
    Ok(entries)
}

/// Read every `.json` member of a zip archive, decompressing and parsing
/// members in parallel.
///
/// Members are selected by name from the central directory, so nothing
/// else in the export is ever opened. A JSON member that cannot be opened
/// (unsupported compression, bad local header) is skipped; an encrypted
/// one makes the whole archive unreadable.
pub fn extract_archive(file: &FileInput, config: &ExtractConfig) -> Result<EntryMap> {
    let archive = ZipArchive::new(Cursor::new(file.bytes.as_slice()))
        .map_err(|source| unreadable(&file.name, source))?;

    let members: Vec<(usize, String)> = (0..archive.len())
        .filter_map(|index| {
            let name = archive.name_for_index(index)?;
            (!name.ends_with('/') && config.is_json(name)).then(|| (index, name.to_string()))
        })
        .collect();

    let parsed: Vec<Option<(String, Value)>> = members
        .into_par_iter()
        .map(|(index, path)| {
            let mut archive = archive.clone();
            let encrypted = archive
                .by_index_raw(index)
                .map(|raw| raw.encrypted())
                .unwrap_or(false);
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(source) if encrypted => return Err(unreadable(&file.name, source)),
                Err(source) => {
                    warn!("Skipping unopenable archive entry {path}: {source}");
                    return Ok(None);
                }
            };

            if entry.size() > config.max_entry_bytes {
                warn!(
                    "Skipping oversized archive entry {path} ({} bytes)",
                    entry.size()
                );
                return Ok(None);
            }

            let mut bytes = Vec::with_capacity(entry.size() as usize);
            if let Err(e) = (&mut entry)
                .take(config.max_entry_bytes + 1)
                .read_to_end(&mut bytes)
            {
                warn!("Skipping unreadable archive entry {path}: {e}");
                return Ok(None);
            }
            if bytes.len() as u64 > config.max_entry_bytes {
                warn!("Skipping oversized archive entry {path}");
                return Ok(None);
            }

            Ok(parse_entry(&path, &bytes).map(|value| (path, value)))
        })
        .collect::<Result<_>>()?;

    Ok(parsed.into_iter().flatten().collect())
}

/// Parse loose `.json` files. Later files win on duplicate names.
pub fn extract_loose(files: &[FileInput], config: &ExtractConfig) -> EntryMap {
    let parsed: Vec<(String, Value)> = files
        .par_iter()
        .filter(|f| config.is_json(&f.name))
        .filter_map(|f| {
            if f.bytes.len() as u64 > config.max_entry_bytes {
                warn!(
                    "Skipping oversized file {} ({} bytes)",
                    f.name,
                    f.bytes.len()
                );
                return None;
            }
            parse_entry(&f.name, &f.bytes).map(|value| (f.name.clone(), value))
        })
        .collect();

    parsed.into_iter().collect()
}

/// Decode UTF-8 (dropping a BOM) and parse JSON. Failures are logged, not raised.
fn parse_entry(path: &str, bytes: &[u8]) -> Option<Value> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("Skipping non-UTF-8 JSON entry {path}: {e}");
            return None;
        }
    };
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping malformed JSON entry {path}: {e}");
            None
        }
    }
}

fn unreadable(name: &str, source: zip::result::ZipError) -> InstacheckError {
    InstacheckError::UnreadableArchive {
        name: name.to_string(),
        source,
    }
}
