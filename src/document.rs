use crate::line::{GcodeLine, LightGcodeLine, Line};
use crate::parser::process_line;
use std::fmt;

/// Machine state threaded through command processing in document order.
///
/// `current_*` is the absolute position counted from machine origin: the
/// ground truth of where the head sits. `offset_*` is the displacement
/// between machine-origin coordinates and the currently active coordinate
/// system, as shifted by position resets (`G92`). The reading a program
/// sees on its own coordinate system is `current - offset`, exposed by the
/// `abs_*` accessors. Homing (`G28`) clears an axis offset and snaps the
/// axis to its home coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineState {
    /// Inch mode (`G20`); argument values are scaled to millimetres at
    /// tokenization time while this is set.
    pub imperial: bool,
    /// Relative positioning (`G91`).
    pub relative: bool,
    /// Relative extrusion (`M83`, or `G91`).
    pub relative_e: bool,
    /// Last selected tool index (`T<n>`).
    pub current_tool: u32,

    pub home_x: f64,
    pub home_y: f64,
    pub home_z: f64,

    pub current_x: f64,
    pub current_y: f64,
    pub current_z: f64,
    /// Absolute extrusion counter from machine start.
    pub current_e: f64,
    /// Cumulative material consumed. Retraction subtracts from it;
    /// `max_e` records the high-water mark.
    pub total_e: f64,
    /// Maximum `total_e` reached over all processed commands.
    pub max_e: f64,
    /// Last feedrate seen; persists across commands that omit `F`.
    pub current_f: f64,

    pub offset_x: f64,
    pub offset_y: f64,
    pub offset_z: f64,
    pub offset_e: f64,

    /// Accumulated dwell (`G4 P<ms>`) time, in seconds.
    pub total_duration: f64,
}

impl MachineState {
    /// Position on the active (possibly `G92`-shifted) coordinate system.
    pub fn abs_x(&self) -> f64 {
        self.current_x - self.offset_x
    }

    pub fn abs_y(&self) -> f64 {
        self.current_y - self.offset_y
    }

    pub fn abs_z(&self) -> f64 {
        self.current_z - self.offset_z
    }

    pub fn abs_e(&self) -> f64 {
        self.current_e - self.offset_e
    }

    pub fn abs_pos(&self) -> (f64, f64, f64) {
        (self.abs_x(), self.abs_y(), self.abs_z())
    }

    /// Absolute position counted from machine origin.
    pub fn current_pos(&self) -> (f64, f64, f64) {
        (self.current_x, self.current_y, self.current_z)
    }

    pub fn home_pos(&self) -> (f64, f64, f64) {
        (self.home_x, self.home_y, self.home_z)
    }

    pub fn set_home_pos(&mut self, x: f64, y: f64, z: f64) {
        self.home_x = x;
        self.home_y = y;
        self.home_z = z;
    }
}

/// An interpreted G-code document: ordered line storage plus the machine
/// state those lines produced.
///
/// Generic over the stored representation: [`GcodeLine`] keeps the full
/// per-line history, [`LightGcodeLine`] keeps only raw text and command
/// identifier. The choice is fixed when the document is constructed; see
/// [`LightGcodeDoc`]. State advances identically either way.
///
/// Processing is synchronous, single-writer, strictly in document order.
/// Callers sharing a document across threads must serialize all `append`
/// and `process_lines` calls themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct GcodeDoc<L: Line = GcodeLine> {
    pub lines: Vec<L>,
    pub state: MachineState,
}

/// Document storing [`LightGcodeLine`]s, for large programs.
pub type LightGcodeDoc = GcodeDoc<LightGcodeLine>;

impl<L: Line> Default for GcodeDoc<L> {
    fn default() -> Self {
        GcodeDoc {
            lines: Vec::new(),
            state: MachineState::default(),
        }
    }
}

impl<L: Line> GcodeDoc<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document whose homing commands land on the given home position
    /// instead of the machine origin.
    pub fn with_home(x: f64, y: f64, z: f64) -> Self {
        let mut doc = Self::default();
        doc.state.set_home_pos(x, y, z);
        doc
    }

    /// Tokenize and interpret one raw line, store it, and return the stored
    /// record. Input is trimmed first; appending an empty string is a no-op
    /// and returns `None`; streaming senders use that to skip blank input
    /// without adjusting their queue.
    pub fn append(&mut self, raw: &str) -> Option<&L> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let mut line = GcodeLine::new(raw);
        process_line(&mut self.state, &mut line);
        self.lines.push(L::from_processed(line));
        self.lines.last()
    }

    /// Append a batch of already-read lines, in order.
    pub fn process_lines<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for line in lines {
            self.append(line.as_ref());
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, L> {
        self.lines.iter()
    }
}

impl<'a, L: Line> IntoIterator for &'a GcodeDoc<L> {
    type Item = &'a L;
    type IntoIter = std::slice::Iter<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl<L: Line> fmt::Display for GcodeDoc<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "GcodeDoc")?;
        writeln!(f, "- lines: {}", self.lines.len())?;
        writeln!(
            f,
            "- modes: imperial={} relative={} relative_e={} tool={}",
            self.state.imperial, self.state.relative, self.state.relative_e, self.state.current_tool
        )?;
        let (x, y, z) = self.state.abs_pos();
        writeln!(f, "- position: X{:.3} Y{:.3} Z{:.3}", x, y, z)?;
        writeln!(
            f,
            "- extrusion: total {:.3}mm (max {:.3}mm)",
            self.state.total_e, self.state.max_e
        )?;
        write!(f, "- dwell: {:.3}s", self.state.total_duration)
    }
}
