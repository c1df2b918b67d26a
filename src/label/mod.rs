//! YOLO-style label file parsing.
//!
//! Each non-blank line of a label file is one box: `class_id cx cy w h`, with
//! the center and size given as fractions of the image width and height.
//! Values are taken as written; nothing is clamped to `[0, 1]`.

use std::fs;
use std::path::Path;

use crate::error::CullError;

/// One normalized bounding box read from a label line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxRecord {
    pub class_id: i64,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Read and parse every box in a label file.
///
/// Any malformed line fails the whole file; no partial list is returned.
pub fn read_label_file(path: &Path) -> Result<Vec<BoxRecord>, CullError> {
    let content = fs::read_to_string(path).map_err(CullError::Io)?;
    parse_label_str(&content, path)
}

/// Parse label text. `path` is only used for error reporting.
pub fn parse_label_str(content: &str, path: &Path) -> Result<Vec<BoxRecord>, CullError> {
    let mut records = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if let Some(record) = parse_label_line(line, path, line_idx + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<BoxRecord>, CullError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();

    if tokens.len() != 5 {
        let found = if tokens.len() > 5 {
            "more than 5".to_string()
        } else {
            tokens.len().to_string()
        };
        return Err(CullError::MalformedLabelLine {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("expected 5 tokens, found {found}"),
        });
    }

    let class_id = tokens[0]
        .parse::<i64>()
        .map_err(|_| CullError::MalformedLabelLine {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid class_id '{}'; expected integer", tokens[0]),
        })?;

    Ok(Some(BoxRecord {
        class_id,
        center_x: parse_f64_token(tokens[1], "center_x", file_path, line_num)?,
        center_y: parse_f64_token(tokens[2], "center_y", file_path, line_num)?,
        width: parse_f64_token(tokens[3], "width", file_path, line_num)?,
        height: parse_f64_token(tokens[4], "height", file_path, line_num)?,
    }))
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), CullError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, CullError> {
    raw.parse::<f64>()
        .map_err(|_| CullError::MalformedLabelLine {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
        })
}
