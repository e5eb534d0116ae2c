use crate::prelude::{DeltaRecord, ParseError};

const SKIPPED_MARKER: &str = "skipped";
const NEW_SCENE_MARKER: &str = "new_scene";
const MIN_RECORD_TOKENS: usize = 4;

/// Turns whitespace-separated Deshaker log lines into [`DeltaRecord`]s.
///
/// Token layout: `frame dx dy rotation [zoom] [new_scene]`. The vertical and
/// rotation deltas are negated to match the target coordinate convention.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRecordParser;

impl LogRecordParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses one non-blank line. `line_number` is 1-based and only used for
    /// diagnostics.
    pub fn parse_line(&self, line: &str, line_number: usize) -> Result<DeltaRecord, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(ParseError::MissingTokens {
                line_number,
                line: line.to_string(),
                expected: 2,
                found: tokens.len(),
            });
        }

        let frame_index = tokens[0]
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidFrameIndex {
                line_number,
                line: line.to_string(),
                token: tokens[0].to_string(),
            })?;

        if tokens[1] == SKIPPED_MARKER {
            return Ok(DeltaRecord::skipped(frame_index));
        }

        if tokens.len() < MIN_RECORD_TOKENS {
            return Err(ParseError::MissingTokens {
                line_number,
                line: line.to_string(),
                expected: MIN_RECORD_TOKENS,
                found: tokens.len(),
            });
        }

        let field = |index: usize, name: &'static str| -> Result<f64, ParseError> {
            tokens[index]
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| ParseError::InvalidNumber {
                    line_number,
                    line: line.to_string(),
                    field: name,
                    token: tokens[index].to_string(),
                })
        };

        let dx = field(1, "dx")?;
        let dy = -field(2, "dy")?;
        let d_rotation_deg = -field(3, "rotation")?;
        let is_new_scene = tokens.get(5) == Some(&NEW_SCENE_MARKER);

        Ok(DeltaRecord::new(frame_index, dx, dy, d_rotation_deg).with_new_scene(is_new_scene))
    }
}
