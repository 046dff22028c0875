/// The four motion commands of the dialect. Identifiers compare textually:
/// `G01` is a distinct identifier and is *not* a motion command.
pub const MOVE_GCODES: [&str; 4] = ["G0", "G1", "G2", "G3"];

/// Structural codes: they identify the command (or a line number) and are
/// never stored as arguments. The argument codes are `x y z e f i j`.
pub(crate) const PARSED_NONARGS: [char; 4] = ['g', 't', 'm', 'n'];

/// Access shared by both line representations.
///
/// The interpreter always computes on a full [`GcodeLine`] and converts via
/// [`Line::from_processed`] when storing, so both representations get
/// identical tokenization and identical state effects; the light one simply
/// sheds the per-line detail at store time.
pub trait Line: Sized {
    /// Build the stored representation from a fully annotated line.
    fn from_processed(line: GcodeLine) -> Self;

    /// The original text line, verbatim.
    fn raw(&self) -> &str;

    /// The command identifier (`"G1"`, `"T0"`, ...), if the line carried one.
    fn command(&self) -> Option<&str>;
}

/// One parsed line of G-code, with every per-line detail the interpreter
/// derives.
///
/// Argument fields are `Option` because "argument present" and "argument
/// zero" mean different things to the motion arithmetic. The fields after
/// `j` are annotations: the tokenizer never touches them, the interpreter
/// fills them in while the line is processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcodeLine {
    /// Original text line, preserved verbatim for diagnostics and
    /// re-emission.
    pub raw: String,
    /// Uppercased command letter plus the numeric part as given, e.g. `G1`,
    /// `G28`, `T0`. `None` if no recognizable command was found.
    pub command: Option<String>,
    /// Whether `command` is one of [`MOVE_GCODES`].
    pub is_move: bool,

    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub e: Option<f64>,
    pub f: Option<f64>,
    pub i: Option<f64>,
    pub j: Option<f64>,

    /// Positioning mode in effect when this command executed.
    pub relative: Option<bool>,
    /// Extrusion mode in effect when this command executed.
    pub relative_e: Option<bool>,
    /// Absolute machine-origin position after this command.
    pub current_x: Option<f64>,
    pub current_y: Option<f64>,
    pub current_z: Option<f64>,
    /// Tool selected when this command executed.
    pub current_tool: Option<u32>,
    /// Whether this command fed a net positive amount of material.
    pub extruding: Option<bool>,
}

impl GcodeLine {
    pub fn new(raw: impl Into<String>) -> Self {
        GcodeLine {
            raw: raw.into(),
            ..Default::default()
        }
    }

    /// Store an argument value under its single-letter code. Codes outside
    /// the recognized set are ignored.
    pub(crate) fn set_arg(&mut self, code: char, value: f64) {
        match code {
            'x' => self.x = Some(value),
            'y' => self.y = Some(value),
            'z' => self.z = Some(value),
            'e' => self.e = Some(value),
            'f' => self.f = Some(value),
            'i' => self.i = Some(value),
            'j' => self.j = Some(value),
            _ => {}
        }
    }
}

impl Line for GcodeLine {
    fn from_processed(line: GcodeLine) -> Self {
        line
    }

    fn raw(&self) -> &str {
        &self.raw
    }

    fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }
}

/// Memory-light line representation: raw text and command identifier only.
///
/// Used for large programs where keeping per-line position and extrusion
/// history would be prohibitive. Everything beyond `raw` and `command`
/// reads as absent; the machine state still advances exactly as it does
/// with [`GcodeLine`] storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightGcodeLine {
    pub raw: String,
    pub command: Option<String>,
}

impl Line for LightGcodeLine {
    fn from_processed(line: GcodeLine) -> Self {
        LightGcodeLine {
            raw: line.raw,
            command: line.command,
        }
    }

    fn raw(&self) -> &str {
        &self.raw
    }

    fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }
}
