use gcode_interpreter::GcodeDoc;

/// Interpret a whole program given as one line per slice entry.
pub fn doc_from_lines(lines: &[&str]) -> GcodeDoc {
    let mut doc = GcodeDoc::new();
    doc.process_lines(lines);
    doc
}
