//! Source map decoding and violation remapping.
//!
//! [`SourceMap`] decodes version 3 maps, both regular and indexed
//! (`sections`), into per-line segment tables. [`remap_violation`] looks for
//! `<file>.map` next to a failing file and, when the lookup succeeds, points
//! the violation at the original source. Every failure degrades to the
//! [`UNKNOWN`](crate::UNKNOWN) sentinel instead of failing the run.

use crate::types::ViolationRecord;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Why a source map could not be used.
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The map file could not be read.
    #[error("cannot read source map {path}: {source}")]
    Io {
        /// Map file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The map is not valid JSON or lacks required fields.
    #[error("malformed source map: {0}")]
    Json(#[from] serde_json::Error),

    /// Only version 3 maps are supported.
    #[error("unsupported source map version {0}")]
    UnsupportedVersion(u32),

    /// A section refers to its map by URL instead of embedding it.
    #[error("indexed source map sections must embed their map")]
    SectionWithoutMap,

    /// The `mappings` string is not valid Base64 VLQ, or a section offset
    /// pushes it outside the addressable range.
    #[error("invalid mappings on generated line {line}")]
    InvalidMappings {
        /// 1-based generated line.
        line: usize,
    },

    /// No mapping covers the queried position.
    #[error("no mapping for {line}:{column}")]
    Unmapped {
        /// 1-based generated line.
        line: u32,
        /// 1-based generated column.
        column: u32,
    },

    /// The map has no embedded content for the mapped source.
    #[error("no sourcesContent entry for {0}")]
    MissingContent(String),

    /// The mapped line is past the end of the embedded content.
    #[error("line {line} is out of range for {source_path}")]
    LineOutOfRange {
        /// Mapped source.
        source_path: String,
        /// 1-based original line.
        line: u32,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
    version: u32,
    #[serde(default)]
    source_root: Option<String>,
    #[serde(default)]
    sources: Vec<Option<String>>,
    #[serde(default)]
    sources_content: Vec<Option<String>>,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    mappings: Option<String>,
    #[serde(default)]
    sections: Option<Vec<RawSection>>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    offset: RawOffset,
    #[serde(default)]
    map: Option<Box<RawSourceMap>>,
}

#[derive(Debug, Deserialize)]
struct RawOffset {
    line: u32,
    column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mapping {
    source: usize,
    line: u32,
    column: u32,
    name: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    generated_column: u32,
    original: Option<Mapping>,
}

/// Original position for a generated location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
    /// Source path, joined with `sourceRoot`.
    pub source: String,
    /// Index into the map's sources.
    pub source_index: usize,
    /// 1-based original line.
    pub line: u32,
    /// 0-based original column.
    pub column: u32,
    /// Original identifier name, when recorded.
    pub name: Option<String>,
}

/// A decoded version 3 source map.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    /// Segments keyed by 0-based generated line. Sparse, so a large section
    /// offset costs nothing.
    lines: BTreeMap<u32, Vec<Segment>>,
}

impl SourceMap {
    /// Reads and decodes a map file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn from_file(path: &Path) -> Result<Self, SourceMapError> {
        let content = std::fs::read_to_string(path).map_err(|e| SourceMapError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Decodes a map from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, a version other than 3, or
    /// invalid mappings.
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        let mut map = Self::default();
        map.append(raw, 0, 0)?;
        for line in map.lines.values_mut() {
            line.sort_by_key(|segment| segment.generated_column);
        }
        Ok(map)
    }

    /// Appends `raw`, shifted by a section offset, to this map.
    fn append(
        &mut self,
        raw: RawSourceMap,
        line_offset: u32,
        column_offset: u32,
    ) -> Result<(), SourceMapError> {
        if raw.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(raw.version));
        }

        if let Some(sections) = raw.sections {
            for section in sections {
                let map = section.map.ok_or(SourceMapError::SectionWithoutMap)?;
                let overflow = || SourceMapError::InvalidMappings {
                    line: line_offset as usize + 1,
                };
                let column = if section.offset.line == 0 {
                    column_offset
                        .checked_add(section.offset.column)
                        .ok_or_else(overflow)?
                } else {
                    section.offset.column
                };
                let line = line_offset
                    .checked_add(section.offset.line)
                    .ok_or_else(overflow)?;
                self.append(*map, line, column)?;
            }
            return Ok(());
        }

        let source_base = self.sources.len();
        let name_base = self.names.len();
        let root = raw.source_root.unwrap_or_default();
        let source_count = raw.sources.len();
        for (index, source) in raw.sources.into_iter().enumerate() {
            self.sources.push(join_source_root(&root, &source.unwrap_or_default()));
            self.sources_content
                .push(raw.sources_content.get(index).cloned().flatten());
        }
        self.names.extend(raw.names);

        let decoded = decode_mappings(raw.mappings.as_deref().unwrap_or_default(), source_count)?;
        for (index, segments) in decoded.into_iter().enumerate() {
            if segments.is_empty() {
                continue;
            }
            let overflow = || SourceMapError::InvalidMappings { line: index + 1 };
            let target = u32::try_from(index)
                .ok()
                .and_then(|index| line_offset.checked_add(index))
                .ok_or_else(overflow)?;
            let shift = if index == 0 { column_offset } else { 0 };
            let shifted = segments
                .into_iter()
                .map(|segment| {
                    Some(Segment {
                        generated_column: segment.generated_column.checked_add(shift)?,
                        original: segment.original.map(|m| Mapping {
                            source: m.source + source_base,
                            name: m.name.map(|n| n + name_base),
                            ..m
                        }),
                    })
                })
                .collect::<Option<Vec<_>>>()
                .ok_or_else(overflow)?;
            self.lines.entry(target).or_default().extend(shifted);
        }
        Ok(())
    }

    /// Source paths, joined with `sourceRoot`.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Embedded content of a source, if present.
    #[must_use]
    pub fn source_content(&self, index: usize) -> Option<&str> {
        self.sources_content.get(index)?.as_deref()
    }

    /// Looks up the original position of a generated location.
    ///
    /// `line` is 1-based and `column` 0-based. The segment with the largest
    /// generated column not past `column` on the same line is used; a
    /// segment without source information yields `None`.
    #[must_use]
    pub fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition> {
        let segments = self.lines.get(&line.checked_sub(1)?)?;
        let next = segments.partition_point(|s| s.generated_column <= column);
        let mapping = segments.get(next.checked_sub(1)?)?.original?;
        Some(OriginalPosition {
            source: self.sources.get(mapping.source)?.clone(),
            source_index: mapping.source,
            line: mapping.line.checked_add(1)?,
            column: mapping.column,
            name: mapping.name.and_then(|n| self.names.get(n).cloned()),
        })
    }
}

fn join_source_root(root: &str, source: &str) -> String {
    if root.is_empty() || source.starts_with('/') || source.contains("://") {
        source.to_string()
    } else if root.ends_with('/') {
        format!("{root}{source}")
    } else {
        format!("{root}/{source}")
    }
}

fn base64_value(byte: u8) -> Option<i64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(i64::from(value))
}

/// Decodes one segment's Base64 VLQ fields.
fn decode_vlq(segment: &str) -> Option<Vec<i64>> {
    let mut fields = Vec::with_capacity(5);
    let mut value = 0i64;
    let mut shift = 0u32;
    for byte in segment.bytes() {
        let digit = base64_value(byte)?;
        if shift > 55 {
            return None;
        }
        value |= (digit & 0b1_1111) << shift;
        if digit & 0b10_0000 != 0 {
            shift += 5;
            continue;
        }
        let magnitude = value >> 1;
        fields.push(if value & 1 == 1 { -magnitude } else { magnitude });
        value = 0;
        shift = 0;
    }
    (shift == 0).then_some(fields)
}

/// Decodes `mappings` into segments per generated line (0-indexed lines).
fn decode_mappings(
    mappings: &str,
    source_count: usize,
) -> Result<Vec<Vec<Segment>>, SourceMapError> {
    let mut lines = Vec::new();
    // Every field except the generated column is relative across lines.
    let (mut source, mut line, mut column, mut name) = (0i64, 0i64, 0i64, 0i64);

    for (index, text) in mappings.split(';').enumerate() {
        let invalid = || SourceMapError::InvalidMappings { line: index + 1 };
        let mut generated_column = 0i64;
        let mut segments = Vec::new();
        for raw in text.split(',').filter(|s| !s.is_empty()) {
            let fields = decode_vlq(raw).ok_or_else(invalid)?;
            if !matches!(fields.len(), 1 | 4 | 5) {
                return Err(invalid());
            }
            generated_column += fields[0];
            let original = if fields.len() >= 4 {
                source += fields[1];
                line += fields[2];
                column += fields[3];
                let name_index = (fields.len() == 5).then(|| {
                    name += fields[4];
                    name
                });
                Some(Mapping {
                    source: usize::try_from(source)
                        .ok()
                        .filter(|&s| s < source_count)
                        .ok_or_else(invalid)?,
                    line: u32::try_from(line).map_err(|_| invalid())?,
                    column: u32::try_from(column).map_err(|_| invalid())?,
                    name: name_index.and_then(|n| usize::try_from(n).ok()),
                })
            } else {
                None
            };
            segments.push(Segment {
                generated_column: u32::try_from(generated_column).map_err(|_| invalid())?,
                original,
            });
        }
        lines.push(segments);
    }
    Ok(lines)
}

/// Path of the map that accompanies `file`: the same path with `.map` appended.
#[must_use]
pub fn map_path_for(file: &Path) -> PathBuf {
    let mut path = OsString::from(file.as_os_str());
    path.push(".map");
    PathBuf::from(path)
}

/// Fills the remap fields of `record` from `<file>.map`.
///
/// Never fails: when the map is missing or unusable, the record is returned
/// unchanged, with its sentinel values, and the reason is logged at debug
/// level.
#[must_use]
pub fn remap_violation(record: ViolationRecord) -> ViolationRecord {
    match lookup(&record) {
        Ok(remapped) => record.with_original(
            remapped.source,
            remapped.line,
            remapped.column,
            remapped.snippet,
        ),
        Err(reason) => {
            debug!("No remap for {}: {reason}", record.file.display());
            record
        }
    }
}

struct Remapped {
    source: String,
    line: u32,
    column: u32,
    snippet: String,
}

fn lookup(record: &ViolationRecord) -> Result<Remapped, SourceMapError> {
    let map = SourceMap::from_file(&map_path_for(&record.file))?;
    let position = map
        .original_position_for(record.line, record.column.saturating_sub(1))
        .ok_or(SourceMapError::Unmapped {
            line: record.line,
            column: record.column,
        })?;
    let content = map
        .source_content(position.source_index)
        .ok_or_else(|| SourceMapError::MissingContent(position.source.clone()))?;
    let snippet = content
        .split('\n')
        .nth(position.line as usize - 1)
        .map(|line| line.trim_end_matches('\r').to_string())
        .ok_or_else(|| SourceMapError::LineOutOfRange {
            source_path: position.source.clone(),
            line: position.line,
        })?;
    let column = position
        .column
        .checked_add(1)
        .ok_or(SourceMapError::Unmapped {
            line: record.line,
            column: record.column,
        })?;
    Ok(Remapped {
        source: position.source,
        line: position.line,
        column,
        snippet,
    })
}
