//! Line-oriented position maps between compiled and original text.

use serde_json::Value;

/// Maps one run of compiled text back to the original source.
///
/// Applies from `generated_column` up to the next segment on the same line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Zero-based column in the compiled line.
    pub generated_column: u32,
    /// Zero-based line in the original source.
    pub original_line: u32,
    /// Zero-based column in the original source.
    pub original_column: u32,
}

impl Segment {
    /// Create a segment.
    pub const fn new(generated_column: u32, original_line: u32, original_column: u32) -> Self {
        Self {
            generated_column,
            original_line,
            original_column,
        }
    }
}

/// Per-line mapping from compiled coordinates to original coordinates.
///
/// `lines[n]` holds the segments of compiled line `n`, sorted by
/// `generated_column`. Lines without segments map nowhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
    lines: Vec<Vec<Segment>>,
}

impl PositionMap {
    /// Build from per-line segments. Segments are sorted per line.
    pub fn new(mut lines: Vec<Vec<Segment>>) -> Self {
        for line in &mut lines {
            line.sort_by_key(|s| s.generated_column);
        }
        Self { lines }
    }

    /// Line-for-line identity map over `text`.
    pub fn identity(text: &str) -> Self {
        let count = text.lines().count().max(1);
        Self {
            lines: (0..count as u32)
                .map(|line| vec![Segment::new(0, line, 0)])
                .collect(),
        }
    }

    /// Segments for every compiled line.
    pub fn lines(&self) -> &[Vec<Segment>] {
        &self.lines
    }

    /// Number of compiled lines covered.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Translate a compiled `(line, column)` into original coordinates.
    ///
    /// Uses the closest segment starting at or before `column`, and carries
    /// the remaining column offset over.
    pub fn original_position(&self, line: u32, column: u32) -> Option<(u32, u32)> {
        let segments = self.lines.get(line as usize)?;
        let idx = segments.partition_point(|s| s.generated_column <= column);
        let segment = segments.get(idx.checked_sub(1)?)?;
        Some((
            segment.original_line,
            segment.original_column + (column - segment.generated_column),
        ))
    }

    /// Decode the JSON form `[[[genCol, origLine, origCol], ...], ...]`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let lines = value
            .as_array()?
            .iter()
            .map(|line| {
                line.as_array()?
                    .iter()
                    .map(|seg| {
                        let seg = seg.as_array()?;
                        let field = |i: usize| -> Option<u32> {
                            seg.get(i)?.as_u64().and_then(|n| u32::try_from(n).ok())
                        };
                        Some(Segment::new(field(0)?, field(1)?, field(2)?))
                    })
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(lines))
    }
}
