use crate::document::{GcodeDoc, LightGcodeDoc, MachineState};
use crate::error::ParseError;
use crate::line::{GcodeLine, Line, MOVE_GCODES, PARSED_NONARGS};
use lazy_regex::*;
use regex::Regex;
use std::io::{BufRead, BufReader, Lines, Read};

// Comment syntaxes: parenthetical remarks, `;` to end of line, and `/` or
// `*` block markers through end of line.
static RE_COMMENT: Lazy<Regex> = lazy_regex!(r"\([^()]*\)|;.*|[/*].*");

// One recognized code letter with an optional signed decimal stuck to it.
// Scanned over the comment-stripped, lowercased line.
static RE_WORD: Lazy<Regex> = lazy_regex!(r"([xyzefijgtmn])([-+]?[0-9]*\.?[0-9]*)");

// Single-letter parameter extractors. These run on the raw line, not the
// word scan, so they work for any command family.
static RE_PARAM_S: Lazy<Regex> = lazy_regex!(r"\([^()]*\)|;.*|[/*].*|(S[-+]?[0-9]*\.?[0-9]*)");
static RE_PARAM_P: Lazy<Regex> = lazy_regex!(r"\([^()]*\)|;.*|[/*].*|(P[-+]?[0-9]*\.?[0-9]*)");

/// Tokenize one line: strip comments, scan for recognized code words and
/// set `command`/`is_move` on the record from the first word found. The
/// word list is returned for the argument-assignment pass.
///
/// A leading line-number word (`N<n>`) is discarded; line numbers carry
/// no semantic state. Lines with no recognized word at all keep `command`
/// unset: comment-only lines silently, anything else with a warning. The
/// raw text stays on the record either way so callers can still transmit
/// it verbatim.
pub fn split(line: &mut GcodeLine) -> Vec<(char, String)> {
    let stripped = RE_COMMENT.replace_all(&line.raw, "");
    let lowered = stripped.to_lowercase();
    let mut words: Vec<(char, String)> = RE_WORD
        .captures_iter(&lowered)
        .map(|word| {
            // Safety: group 1 matches exactly one character
            (word[1].chars().next().unwrap(), word[2].to_string())
        })
        .collect();

    if words.first().is_some_and(|(code, _)| *code == 'n') {
        words.remove(0);
    }

    match words.first() {
        Some((letter, number)) => {
            let command = format!("{}{}", letter.to_ascii_uppercase(), number);
            line.is_move = MOVE_GCODES.contains(&command.as_str());
            line.command = Some(command);
        }
        None => {
            line.is_move = false;
            if !stripped.trim().is_empty() {
                log::warn!("raw G-code line {:?} could not be parsed", line.raw);
            }
        }
    }
    words
}

/// Assign numeric argument values onto a tokenized line.
///
/// Applies only to the motion-group command family (leading letter `G`)
/// unless `force` is set; callers force it for other families that still
/// carry coordinates, such as firmware-specific position resets. Spatial
/// axis values are converted from inches while `imperial` is set; the
/// feedrate is not a spatial value and is taken as given. A code with an
/// empty or malformed numeric part is an absent argument, not an error.
pub fn parse_coordinates(
    line: &mut GcodeLine,
    words: &[(char, String)],
    imperial: bool,
    force: bool,
) {
    let is_gcode = line.command.as_deref().is_some_and(|c| c.starts_with('G'));
    if !force && !is_gcode {
        return;
    }
    let unit_factor = if imperial { 25.4 } else { 1.0 };
    for (code, number) in words {
        if PARSED_NONARGS.contains(code) || number.is_empty() {
            continue;
        }
        let Ok(value) = number.parse::<f64>() else {
            continue;
        };
        let factor = if *code == 'f' { 1.0 } else { unit_factor };
        line.set_arg(*code, factor * value);
    }
}

/// Locate a single-letter-coded numeric value anywhere in the raw line,
/// independent of the command family. Comment spans are skipped by the
/// pattern itself.
fn find_specific_code(raw: &str, exp: &Regex) -> Option<f64> {
    exp.captures_iter(raw)
        .find_map(|caps| caps.get(1))
        .and_then(|m| m.as_str()[1..].parse::<f64>().ok())
}

/// The `S` parameter of a line (subcode value, e.g. a temperature), if
/// present and numeric.
pub fn s_param(raw: &str) -> Option<f64> {
    find_specific_code(raw, &RE_PARAM_S)
}

/// The `P` parameter of a line (e.g. dwell time in milliseconds), if
/// present and numeric.
pub fn p_param(raw: &str) -> Option<f64> {
    find_specific_code(raw, &RE_PARAM_P)
}

/// Fold one tokenized line into the machine state, annotating the record
/// with everything that was in effect when it executed.
///
/// Transition rules, in the order they apply:
/// - motion commands capture the mode flags and tool onto the record, then
///   move: relative mode adds each given delta to the current axis value,
///   absolute mode maps each given coordinate through the active offset.
///   Axes the command omits keep their value exactly.
/// - `G20`/`G21` switch units, `G90`/`G91` switch positioning mode (and
///   drag extrusion mode along), `M82`/`M83` switch extrusion mode alone,
///   `T<n>` selects a tool.
/// - `G28` homes all axes when called bare, otherwise only the axes given:
///   the axis offset clears and the axis lands on the home coordinate.
/// - `G92` shifts the active coordinate system so the given value becomes
///   the current reading; the head does not move.
/// - `G4` accumulates its `P` dwell time into the duration total.
///
/// Commands that are tokenized but match no rule leave the state alone;
/// the record is still annotated with the position snapshot.
pub(crate) fn process_line(state: &mut MachineState, line: &mut GcodeLine) {
    let words = split(line);
    let Some(command) = line.command.clone() else {
        return;
    };

    if line.is_move {
        line.relative = Some(state.relative);
        line.relative_e = Some(state.relative_e);
        line.current_tool = Some(state.current_tool);
    } else {
        match command.as_str() {
            "G20" => state.imperial = true,
            "G21" => state.imperial = false,
            "G90" => {
                state.relative = false;
                state.relative_e = false;
            }
            "G91" => {
                state.relative = true;
                state.relative_e = true;
            }
            "M82" => state.relative_e = false,
            "M83" => state.relative_e = true,
            _ => {
                if let Some(tool) = command.strip_prefix('T') {
                    if let Ok(tool) = tool.parse::<u32>() {
                        state.current_tool = tool;
                    }
                }
            }
        }
    }

    if command.starts_with('G') {
        parse_coordinates(line, &words, state.imperial, false);
    }

    if line.is_move {
        if let Some(f) = line.f {
            state.current_f = f;
        }

        let (x, y, z) = if line.relative == Some(true) {
            (
                Some(state.current_x + line.x.unwrap_or(0.0)),
                Some(state.current_y + line.y.unwrap_or(0.0)),
                Some(state.current_z + line.z.unwrap_or(0.0)),
            )
        } else {
            (
                line.x.map(|x| x + state.offset_x),
                line.y.map(|y| y + state.offset_y),
                line.z.map(|z| z + state.offset_z),
            )
        };

        if let Some(x) = x {
            state.current_x = x;
        }
        if let Some(y) = y {
            state.current_y = y;
        }
        if let Some(z) = z {
            state.current_z = z;
        }
    } else if command == "G28" {
        let home_all = line.x.is_none() && line.y.is_none() && line.z.is_none();
        if home_all || line.x.is_some() {
            state.offset_x = 0.0;
            state.current_x = state.home_x;
        }
        if home_all || line.y.is_some() {
            state.offset_y = 0.0;
            state.current_y = state.home_y;
        }
        if home_all || line.z.is_some() {
            state.offset_z = 0.0;
            state.current_z = state.home_z;
        }
    } else if command == "G92" {
        if let Some(x) = line.x {
            state.offset_x = state.current_x - x;
        }
        if let Some(y) = line.y {
            state.offset_y = state.current_y - y;
        }
        if let Some(z) = line.z {
            state.offset_z = state.current_z - z;
        }
    }

    line.current_x = Some(state.current_x);
    line.current_y = Some(state.current_y);
    line.current_z = Some(state.current_z);

    if let Some(e) = line.e {
        if line.is_move {
            if line.relative_e == Some(true) {
                // Retraction (negative e) still flows into the totals but
                // does not count as extruding.
                line.extruding = Some(e > 0.0);
                state.total_e += e;
                state.current_e += e;
            } else {
                let new_e = e + state.offset_e;
                line.extruding = Some(new_e > state.current_e);
                state.total_e += new_e - state.current_e;
                state.current_e = new_e;
            }
            state.max_e = state.max_e.max(state.total_e);
        } else if command == "G92" {
            state.offset_e = state.current_e - e;
        }
    }

    if command == "G4" {
        if let Some(dwell_ms) = p_param(&line.raw) {
            state.total_duration += dwell_ms / 1000.0;
        }
    }
}

struct ParserContext<T: Read> {
    line_number: usize,
    lines: Lines<BufReader<T>>,
}

impl<T: Read> ParserContext<T> {
    fn new(lines: Lines<BufReader<T>>) -> ParserContext<T> {
        ParserContext {
            line_number: 0,
            lines,
        }
    }

    fn next(&mut self) -> Option<Result<String, ParseError>> {
        let line = self.lines.next();
        if line.is_some() {
            self.line_number += 1;
        }
        line.map(|result| {
            result.map_err(|e| {
                ParseError::IoError(format!(
                    "IO error on line: {}, error: {}",
                    self.line_number, e
                ))
            })
        })
    }
}

/// Parse a whole G-code program (in a BufReader) to a [`GcodeDoc`].
///
/// Every non-blank line is stored and interpreted, in order, against the
/// document's machine state. Content problems never fail the parse; bad
/// lines are kept verbatim and logged. If an IO error occurs, the partial
/// document is returned along with the error.
pub fn parse<T: Read>(reader: BufReader<T>) -> Result<GcodeDoc, (GcodeDoc, ParseError)> {
    parse_doc(reader)
}

/// Like [`parse`], but stores light records (raw text + command only).
/// The machine state comes out identical; only the per-line history is
/// shed. Use this for large programs.
pub fn parse_light<T: Read>(
    reader: BufReader<T>,
) -> Result<LightGcodeDoc, (LightGcodeDoc, ParseError)> {
    parse_doc(reader)
}

fn parse_doc<L, T>(reader: BufReader<T>) -> Result<GcodeDoc<L>, (GcodeDoc<L>, ParseError)>
where
    L: Line,
    T: Read,
{
    let mut doc = GcodeDoc::new();
    let mut parser_context = ParserContext::new(reader.lines());

    loop {
        let Some(line_result) = parser_context.next() else {
            break;
        };

        let raw_line = match line_result {
            Ok(line) => line,
            Err(error) => {
                log::error!("IO error: {}", error);
                return Err((doc, error));
            }
        };

        log::trace!(
            "Line: {}. Content: {:?}",
            parser_context.line_number,
            raw_line.trim()
        );

        doc.append(&raw_line);
    }

    Ok(doc)
}
