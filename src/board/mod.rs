//! # Board loader
//!
//! Decodes raw source bytes into a rectangular [`Board`] of [`Tile`]s,
//! stripping comments and the two metadata directives, de-indenting the
//! board, and validating that exactly one car and one exit exist.

#[cfg(test)]
mod tests;

use crate::error::LoadError;
use crate::tile::Tile;

/// A loaded board: a grid of tiles, one row per source line. Rows may have
/// different lengths — horizontal motion wraps modulo the *current row's*
/// length, not a padded rectangle width, so rows are stored independently
/// rather than as a single padded matrix (see spec.md §9's design note).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: Vec<Vec<Tile>>,
    car_pos: (usize, usize),
}

impl Board {
    /// Board height, i.e. number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// The length of the row at `y`. Panics if `y` is out of range; callers
    /// are expected to keep `y` within `[0, height())` via modulo wrap.
    pub fn row_len(&self, y: usize) -> usize {
        self.rows[y].len()
    }

    /// Tile at `(x, y)`. Positions past the end of a (possibly short) row
    /// read as `Empty` rather than panicking or wrapping.
    pub fn tile_at(&self, x: usize, y: usize) -> Tile {
        self.rows[y].get(x).copied().unwrap_or(Tile::Empty)
    }

    /// The car's starting coordinates.
    pub fn car_pos(&self) -> (usize, usize) {
        self.car_pos
    }
}

/// Result of loading board source: the board itself plus the initial
/// values of the two text-mode flags as resolved from `@intext`/`@outtext`
/// directives (caller-provided overrides always win; see
/// [`resolve_directive_flag`]).
pub struct LoadedBoard {
    pub board: Board,
    pub input_as_text: bool,
    pub output_as_text: bool,
}

/// Parse raw board source text into a [`Board`] plus resolved text-mode
/// flags.
///
/// `in_text`/`out_text` are the caller's own override for the two flags, if
/// any; a `@intext`/`@outtext` directive only takes effect when the caller
/// left the corresponding flag unset.
pub fn load(
    bytes: &[u8],
    in_text: Option<bool>,
    out_text: Option<bool>,
) -> Result<LoadedBoard, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::NoProgramData);
    }

    let mut input_as_text = in_text.unwrap_or(false);
    let mut output_as_text = out_text.unwrap_or(false);

    let mut lines: Vec<Vec<u8>> = Vec::new();
    for raw_line in bytes.split(|&b| b == b'\n') {
        if raw_line.starts_with(b"@intext") {
            resolve_directive_flag(&mut input_as_text, in_text);
            continue;
        }
        if raw_line.starts_with(b"@outtext") {
            resolve_directive_flag(&mut output_as_text, out_text);
            continue;
        }
        let code = match raw_line.iter().position(|&b| b == b';') {
            Some(idx) => &raw_line[..idx],
            None => raw_line,
        };
        let trimmed_end = trim_end(code);
        if !trimmed_end.is_empty() {
            lines.push(trimmed_end.to_vec());
        }
    }

    if lines.is_empty() {
        return Err(LoadError::NoSourceCode);
    }

    de_indent(&mut lines);

    let board = build_board(&lines)?;
    Ok(LoadedBoard {
        board,
        input_as_text,
        output_as_text,
    })
}

/// `@intext`/`@outtext` only set their flag when the caller hasn't already
/// pinned a value — caller override beats directive (spec.md §9).
fn resolve_directive_flag(flag: &mut bool, caller_override: Option<bool>) {
    if caller_override.is_none() {
        *flag = true;
    }
}

fn trim_end(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && line[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    &line[..end]
}

fn leading_whitespace(line: &[u8]) -> usize {
    line.iter().take_while(|b| b.is_ascii_whitespace()).count()
}

/// Remove the minimum common leading-whitespace count from every line,
/// unless any line has zero leading whitespace (in which case nothing is
/// de-indented).
fn de_indent(lines: &mut [Vec<u8>]) {
    let mut min_indent = lines[0].len();
    for line in lines.iter() {
        let indent = leading_whitespace(line);
        if indent == 0 {
            return;
        }
        min_indent = min_indent.min(indent);
    }
    for line in lines.iter_mut() {
        line.drain(..min_indent);
    }
}

fn build_board(lines: &[Vec<u8>]) -> Result<Board, LoadError> {
    let mut rows = Vec::with_capacity(lines.len());
    let mut car_pos = None;
    let mut has_exit = false;

    for (y, line) in lines.iter().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (x, &b) in line.iter().enumerate() {
            let mut tile = Tile::from_byte(b);
            match tile {
                Tile::Car => {
                    if car_pos.is_some() {
                        return Err(LoadError::MultipleCars);
                    }
                    car_pos = Some((x, y));
                    tile = Tile::Empty;
                }
                Tile::Exit => {
                    if has_exit {
                        return Err(LoadError::MultipleExits);
                    }
                    has_exit = true;
                }
                _ => {}
            }
            row.push(tile);
        }
        rows.push(row);
    }

    let car_pos = car_pos.ok_or(LoadError::NoCar)?;
    if !has_exit {
        return Err(LoadError::NoExit);
    }

    log::debug!(
        "loaded board: {} rows, car at ({}, {})",
        rows.len(),
        car_pos.0,
        car_pos.1
    );
    Ok(Board { rows, car_pos })
}
