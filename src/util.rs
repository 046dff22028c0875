use crate::document::GcodeDoc;
use crate::line::Line;
use std::io::BufReader;

#[must_use]
pub fn gcode_to_reader(gcode_string: &str) -> BufReader<&[u8]> {
    let bytes = gcode_string.as_bytes();
    BufReader::new(bytes)
}

/// Re-emit a document as text, one stored raw line per row. Lines are
/// preserved verbatim at parse time, so this is the exact program the
/// sender should transmit, bad lines included.
#[must_use]
pub fn doc_as_str<L: Line>(doc: &GcodeDoc<L>) -> String {
    doc.iter()
        .map(|line| line.raw())
        .collect::<Vec<_>>()
        .join("\n")
}
