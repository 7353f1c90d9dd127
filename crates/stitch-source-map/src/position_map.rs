//! Position maps: recording, composition and lookup

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{SourceMapError, SourceMapResult};
use crate::paths;
use crate::raw::RawSourceMap;
use crate::types::{Mapping, OriginalPosition, Position};
use crate::vlq;

/// An append-only table of generated -> original mappings for one document
///
/// Mappings are kept in insertion order and never deduplicated. Original
/// sources are stored relative to the document the map belongs to; the
/// optional source root is only applied when a source is resolved or when
/// the map is serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
    file: Option<String>,
    source_root: Option<String>,
    mappings: Vec<Mapping>,
}

impl PositionMap {
    /// Create an empty map for the generated artifact `file`
    pub fn new(file: impl Into<String>) -> Self {
        PositionMap {
            file: Some(file.into()),
            source_root: None,
            mappings: Vec::new(),
        }
    }

    pub fn with_source_root(mut self, source_root: Option<String>) -> Self {
        self.source_root = source_root;
        self
    }

    /// Label of the generated artifact
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn add_mapping(&mut self, mapping: Mapping) {
        self.mappings.push(mapping);
    }

    /// Distinct original sources, in order of first appearance
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.mappings
            .iter()
            .filter_map(|m| m.original.as_ref())
            .map(|original| original.source.as_str())
            .filter(|source| seen.insert(*source))
            .collect()
    }

    /// Apply the source root, if any, to a stored source reference
    pub fn resolve_source(&self, source: &str) -> String {
        match self.source_root.as_deref() {
            Some(root) if !root.is_empty() => paths::join(root, source),
            _ => source.to_string(),
        }
    }

    /// Record a fragment that carries no map of its own
    ///
    /// One mapping is recorded per physical line: the first line starts at
    /// `at` and maps to `anchor`, every following line maps column 0 to
    /// column 0 of the next original line.
    pub fn record_fragment(&mut self, source: &str, at: Position, anchor: Position, line_count: usize) {
        tracing::trace!(source, line = at.line, column = at.column, line_count, "Recording fragment line starts");
        for i in 0..line_count {
            let (generated_column, original_column) = if i == 0 {
                (at.column, anchor.column)
            } else {
                (0, 0)
            };
            self.mappings.push(Mapping::new(
                Position::new(at.line + i, generated_column),
                OriginalPosition::new(source, anchor.line + i, original_column),
            ));
        }
    }

    /// Merge the map embedded in a fragment written at `at`
    ///
    /// Generated positions are shifted into this document; the first line of
    /// the fragment is also shifted by the cursor column. Relative original
    /// sources are re-homed onto the directory of `source`, the path the
    /// fragment was read from. Original lines and columns are left untouched.
    pub fn compose(&mut self, embedded: &PositionMap, source: &str, at: Position) {
        let base_dir = paths::dirname(source);
        tracing::debug!(
            source,
            mappings = embedded.len(),
            line = at.line,
            column = at.column,
            "Composing embedded position map"
        );

        for mapping in &embedded.mappings {
            let line = mapping.generated.line;
            let column = if line == 1 {
                at.column + mapping.generated.column
            } else {
                mapping.generated.column
            };
            let original = mapping.original.as_ref().map(|original| OriginalPosition {
                source: paths::join(base_dir, &embedded.resolve_source(&original.source)),
                line: original.line,
                column: original.column,
            });
            self.mappings.push(Mapping {
                generated: Position::new(at.line + line - 1, column),
                original,
                name: mapping.name.clone(),
            });
        }
    }

    /// Trace mappings into `source_file` back through an inherited map
    ///
    /// Mappings whose origin can't be found in `base` are kept as they are.
    pub fn apply(&mut self, base: &PositionMap, source_file: &str) {
        let order = base.generated_order();
        let mut traced = 0usize;
        for mapping in &mut self.mappings {
            let Some(original) = mapping.original.as_ref() else {
                continue;
            };
            if original.source != source_file {
                continue;
            }
            let Some(found) = base.mapping_in(&order, Position::new(original.line, original.column)) else {
                continue;
            };
            let Some(upstream) = found.original.as_ref() else {
                continue;
            };
            mapping.original = Some(OriginalPosition {
                source: base.resolve_source(&upstream.source),
                line: upstream.line,
                column: upstream.column,
            });
            if found.name.is_some() {
                mapping.name = found.name.clone();
            }
            traced += 1;
        }
        tracing::debug!(source_file, traced, "Applied inherited position map");
    }

    /// Indices of the mappings sorted by generated position
    ///
    /// The sort is stable, so insertion order is kept among equal positions.
    fn generated_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.mappings.len()).collect();
        order.sort_by_key(|&i| self.mappings[i].generated);
        order
    }

    /// The mapping governing `position`
    ///
    /// This is the greatest mapping at or before `position` on the same
    /// generated line. When several mappings share a generated position the
    /// last one recorded wins.
    pub fn mapping_for(&self, position: Position) -> Option<&Mapping> {
        self.mapping_in(&self.generated_order(), position)
    }

    /// [`Self::mapping_for`] over an ordering from [`Self::generated_order`]
    fn mapping_in(&self, order: &[usize], position: Position) -> Option<&Mapping> {
        let idx = order.partition_point(|&i| self.mappings[i].generated <= position);
        let found = &self.mappings[order[idx.checked_sub(1)?]];
        (found.generated.line == position.line).then_some(found)
    }

    /// Look up the original position for a generated one
    ///
    /// The returned source has the source root applied.
    pub fn original_position_for(&self, line: usize, column: usize) -> Option<OriginalPosition> {
        let original = self.mapping_for(Position::new(line, column))?.original.as_ref()?;
        Some(OriginalPosition {
            source: self.resolve_source(&original.source),
            line: original.line,
            column: original.column,
        })
    }

    /// Look up the generated position for an original one
    ///
    /// Finds the greatest original position at or before `(line, column)`
    /// within `source` (compared after applying the source root). If it was
    /// emitted more than once, the earliest generated position is returned.
    pub fn generated_position_for(&self, source: &str, line: usize, column: usize) -> Option<Position> {
        let needle = (line, column);
        let mut best: Option<((usize, usize), Position)> = None;

        for mapping in &self.mappings {
            let Some(original) = mapping.original.as_ref() else {
                continue;
            };
            if !self.source_matches(&original.source, source) {
                continue;
            }
            let key = (original.line, original.column);
            if key > needle {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_key, best_generated)) => {
                    key > best_key || (key == best_key && mapping.generated < best_generated)
                }
            };
            if better {
                best = Some((key, mapping.generated));
            }
        }

        best.map(|(_, generated)| generated)
    }

    fn source_matches(&self, stored: &str, resolved: &str) -> bool {
        match self.source_root.as_deref() {
            Some(root) if !root.is_empty() => paths::join(root, stored) == resolved,
            _ => stored == resolved,
        }
    }

    /// Convert to the wire model, encoding mappings as base64 VLQ
    pub fn to_raw(&self) -> RawSourceMap {
        let mut sources: Vec<String> = Vec::new();
        let mut source_index: HashMap<&str, usize> = HashMap::new();
        let mut names: Vec<String> = Vec::new();
        let mut name_index: HashMap<&str, usize> = HashMap::new();

        let mut encoded = String::new();
        let mut line = 1usize;
        let mut first_in_line = true;
        let mut prev_column = 0i64;
        let mut prev_source = 0i64;
        let mut prev_original_line = 0i64;
        let mut prev_original_column = 0i64;
        let mut prev_name = 0i64;

        for i in self.generated_order() {
            let mapping = &self.mappings[i];
            while line < mapping.generated.line {
                encoded.push(';');
                line += 1;
                prev_column = 0;
                first_in_line = true;
            }
            if !first_in_line {
                encoded.push(',');
            }
            first_in_line = false;

            let column = mapping.generated.column as i64;
            vlq::encode_vlq(column - prev_column, &mut encoded);
            prev_column = column;

            let Some(original) = mapping.original.as_ref() else {
                continue;
            };

            let source = intern(&mut sources, &mut source_index, &original.source) as i64;
            vlq::encode_vlq(source - prev_source, &mut encoded);
            prev_source = source;

            // Original lines are 0-based on the wire
            let original_line = original.line as i64 - 1;
            vlq::encode_vlq(original_line - prev_original_line, &mut encoded);
            prev_original_line = original_line;

            let original_column = original.column as i64;
            vlq::encode_vlq(original_column - prev_original_column, &mut encoded);
            prev_original_column = original_column;

            if let Some(name) = mapping.name.as_deref() {
                let name = intern(&mut names, &mut name_index, name) as i64;
                vlq::encode_vlq(name - prev_name, &mut encoded);
                prev_name = name;
            }
        }

        RawSourceMap {
            version: 3,
            file: self.file.clone(),
            source_root: self.source_root.clone(),
            sources,
            sources_content: None,
            names,
            mappings: encoded,
        }
    }

    /// Build a map from the wire model
    pub fn from_raw(raw: RawSourceMap) -> SourceMapResult<Self> {
        if raw.version != 3 {
            return Err(SourceMapError::UnsupportedVersion {
                version: raw.version,
            });
        }

        let mut mappings = Vec::new();
        let mut segment = 0usize;
        let mut source = 0i64;
        let mut original_line = 0i64;
        let mut original_column = 0i64;
        let mut name = 0i64;

        for (line_idx, line) in raw.mappings.split(';').enumerate() {
            let mut column = 0i64;
            for text in line.split(',').filter(|text| !text.is_empty()) {
                let values = vlq::decode_segment(text, segment)?;
                let invalid = |message: String| SourceMapError::InvalidMappings { segment, message };

                if !matches!(values.len(), 1 | 4 | 5) {
                    return Err(invalid(format!(
                        "expected 1, 4 or 5 fields, found {}",
                        values.len()
                    )));
                }

                column = accumulate(column, values[0], segment)?;
                let generated_column =
                    usize::try_from(column).map_err(|_| invalid("negative generated column".to_string()))?;
                let mut mapping = Mapping::generated_only(Position::new(line_idx + 1, generated_column));

                if values.len() >= 4 {
                    source = accumulate(source, values[1], segment)?;
                    original_line = accumulate(original_line, values[2], segment)?;
                    original_column = accumulate(original_column, values[3], segment)?;

                    let source_name = usize::try_from(source)
                        .ok()
                        .and_then(|idx| raw.sources.get(idx))
                        .ok_or_else(|| invalid(format!("unknown source index {}", source)))?;
                    let line_number = usize::try_from(original_line)
                        .map_err(|_| invalid("negative original line".to_string()))?;
                    let column_number = usize::try_from(original_column)
                        .map_err(|_| invalid("negative original column".to_string()))?;
                    mapping.original = Some(OriginalPosition::new(
                        source_name.clone(),
                        line_number + 1,
                        column_number,
                    ));

                    if values.len() == 5 {
                        name = accumulate(name, values[4], segment)?;
                        let value = usize::try_from(name)
                            .ok()
                            .and_then(|idx| raw.names.get(idx))
                            .ok_or_else(|| invalid(format!("unknown name index {}", name)))?;
                        mapping.name = Some(value.clone());
                    }
                }

                mappings.push(mapping);
                segment += 1;
            }
        }

        Ok(PositionMap {
            file: raw.file,
            source_root: raw.source_root,
            mappings,
        })
    }

    /// Serialize to source map JSON
    pub fn to_json(&self) -> SourceMapResult<String> {
        Ok(serde_json::to_string(&self.to_raw())?)
    }

    /// Parse source map JSON
    pub fn from_json(json: &str) -> SourceMapResult<Self> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }
}

/// Apply a relative field to its running total
fn accumulate(total: i64, delta: i64, segment: usize) -> SourceMapResult<i64> {
    total.checked_add(delta).ok_or_else(|| SourceMapError::InvalidMappings {
        segment,
        message: "VLQ value overflows".to_string(),
    })
}

fn intern<'a>(table: &mut Vec<String>, index: &mut HashMap<&'a str, usize>, value: &'a str) -> usize {
    *index.entry(value).or_insert_with(|| {
        table.push(value.to_string());
        table.len() - 1
    })
}

impl fmt::Display for Mapping {
    /// `generated line, column -> original line, column  source`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.generated.line, self.generated.column)?;
        if let Some(original) = &self.original {
            write!(
                f,
                " -> {}, {}  {}",
                original.line, original.column, original.source
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for PositionMap {
    /// One mapping per line, in generated order
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, i) in self.generated_order().into_iter().enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.mappings[i])?;
        }
        Ok(())
    }
}
