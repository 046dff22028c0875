use gcode_interpreter::GcodeDoc;

mod utils;
use utils::doc_from_lines;

#[test]
fn tokenize_round_trip() {
    let mut doc: GcodeDoc = GcodeDoc::new();
    let line = doc.append("G1 X10 Y20 F1500").unwrap();

    assert_eq!(line.command.as_deref(), Some("G1"));
    assert!(line.is_move);
    assert_eq!(line.x, Some(10.0));
    assert_eq!(line.y, Some(20.0));
    assert_eq!(line.f, Some(1500.0));
    assert_eq!(line.z, None);
    assert_eq!(line.e, None);
    assert_eq!(line.i, None);
    assert_eq!(line.j, None);
}

#[test]
fn semicolon_comment_parses_like_bare_line() {
    let commented = doc_from_lines(&["G1 X1 ; move right"]);
    let bare = doc_from_lines(&["G1 X1"]);

    let commented_line = &commented.lines[0];
    let bare_line = &bare.lines[0];
    assert_eq!(commented_line.command, bare_line.command);
    assert_eq!(commented_line.x, bare_line.x);
    assert_eq!(commented.state.current_x, bare.state.current_x);
    // the raw text keeps the comment
    assert_eq!(commented_line.raw, "G1 X1 ; move right");
}

#[test]
fn parenthetical_and_block_markers_are_stripped() {
    let doc = doc_from_lines(&[
        "G1 (first leg) X5",
        "G1 Y5 *checksum-ish trailer",
        "G1 Z2 /block delete trailer",
    ]);

    assert_eq!(doc.state.current_x, 5.0);
    assert_eq!(doc.state.current_y, 5.0);
    assert_eq!(doc.state.current_z, 2.0);
}

#[test]
fn leading_line_numbers_are_ignored() {
    let doc = doc_from_lines(&["N10 G1 X3", "N20 G1 Y4"]);
    assert_eq!(doc.state.current_pos(), (3.0, 4.0, 0.0));
    assert_eq!(doc.lines[0].command.as_deref(), Some("G1"));
}

#[test]
fn unparseable_line_is_kept_but_changes_no_state() {
    let mut doc: GcodeDoc = GcodeDoc::new();
    doc.append("G1 X10");
    let before = doc.state.clone();

    let line = doc.append("!! not gcode !!").unwrap();
    assert_eq!(line.command, None);
    assert!(!line.is_move);
    assert_eq!(line.raw, "!! not gcode !!");
    assert_eq!(doc.state, before);
    assert_eq!(doc.len(), 2);
}

#[test]
fn comment_only_line_is_kept_without_command() {
    let mut doc: GcodeDoc = GcodeDoc::new();
    let line = doc.append("; layer 1").unwrap();
    assert_eq!(line.command, None);
    assert_eq!(doc.state, Default::default());
}

#[test]
fn appending_empty_input_is_a_no_op() {
    let mut doc: GcodeDoc = GcodeDoc::new();
    assert!(doc.append("").is_none());
    assert!(doc.append("   \t  ").is_none());
    assert!(doc.is_empty());
}

#[test]
fn omitted_axes_keep_their_value_exactly() {
    let doc = doc_from_lines(&["G1 X10 Y20 Z5", "G1 X11", "G1 Y21"]);
    assert_eq!(doc.state.current_pos(), (11.0, 21.0, 5.0));

    // the per-line snapshots show the same
    assert_eq!(doc.lines[1].current_y, Some(20.0));
    assert_eq!(doc.lines[1].current_z, Some(5.0));
}

#[test]
fn relative_moves_accumulate() {
    let doc = doc_from_lines(&["G91", "G1 X10", "G1 X5 Y-2", "G1 Z1"]);
    assert_eq!(doc.state.current_pos(), (15.0, -2.0, 1.0));
    assert_eq!(doc.lines[1].relative, Some(true));
}

#[test]
fn relative_mode_is_idempotent() {
    let doc = doc_from_lines(&["G91", "G91"]);
    assert!(doc.state.relative);
    assert!(doc.state.relative_e);
}

#[test]
fn extrusion_mode_toggles_independently_of_positioning() {
    let doc = doc_from_lines(&["G90", "M83"]);
    assert!(!doc.state.relative);
    assert!(doc.state.relative_e);

    let doc = doc_from_lines(&["G91", "M82"]);
    assert!(doc.state.relative);
    assert!(!doc.state.relative_e);
}

#[test]
fn homing_without_arguments_homes_all_axes() {
    let mut doc: GcodeDoc = GcodeDoc::with_home(5.0, 6.0, 7.0);
    doc.process_lines(["G1 X100 Y100 Z50", "G92 X0 Y0", "G28"]);

    assert_eq!(doc.state.current_pos(), (5.0, 6.0, 7.0));
    assert_eq!(doc.state.abs_pos(), (5.0, 6.0, 7.0));
    assert_eq!(doc.state.offset_x, 0.0);
    assert_eq!(doc.state.offset_y, 0.0);
    assert_eq!(doc.state.offset_z, 0.0);
}

#[test]
fn homing_with_arguments_homes_only_those_axes() {
    let doc = doc_from_lines(&["G1 X100 Y100 Z50", "G28 X0"]);
    assert_eq!(doc.state.current_x, 0.0);
    assert_eq!(doc.state.current_y, 100.0);
    assert_eq!(doc.state.current_z, 50.0);
}

#[test]
fn position_reset_shifts_offset_without_moving() {
    let doc = doc_from_lines(&["G1 X12", "G92 X5"]);
    assert_eq!(doc.state.current_x, 12.0);
    assert_eq!(doc.state.offset_x, 7.0);
    assert_eq!(doc.state.abs_x(), 5.0);
}

#[test]
fn position_reset_then_absolute_move_goes_through_offset() {
    // G92 re-zeroes the active coordinate system; later absolute moves are
    // mapped back onto machine-origin coordinates through the offset
    let doc = doc_from_lines(&["G21", "G90", "G1 X10 Y0", "G92 X0", "G1 X5"]);
    assert_eq!(doc.state.abs_x(), 5.0);
    assert_eq!(doc.state.current_x, 15.0);
    assert_eq!(doc.state.offset_x, 10.0);
}

#[test]
fn imperial_mode_scales_axes_but_not_feedrate() {
    let doc = doc_from_lines(&["G20", "G1 X1 Z2 F1500"]);
    assert_eq!(doc.state.current_x, 25.4);
    assert_eq!(doc.state.current_z, 2.0 * 25.4);
    assert_eq!(doc.state.current_f, 1500.0);

    let doc = doc_from_lines(&["G20", "G21", "G1 X1"]);
    assert_eq!(doc.state.current_x, 1.0);
}

#[test]
fn feedrate_persists_across_moves_that_omit_it() {
    let doc = doc_from_lines(&["G1 X5 F1500", "G1 X10", "G1 Y10"]);
    assert_eq!(doc.state.current_f, 1500.0);
}

#[test]
fn tool_select_is_captured_on_subsequent_moves() {
    let doc = doc_from_lines(&["G1 X1", "T2", "G1 X2"]);
    assert_eq!(doc.state.current_tool, 2);
    assert_eq!(doc.lines[0].current_tool, Some(0));
    assert_eq!(doc.lines[2].current_tool, Some(2));
}

#[test]
fn tool_select_without_digits_is_ignored() {
    let doc = doc_from_lines(&["T1", "T"]);
    assert_eq!(doc.state.current_tool, 1);
}

#[test]
fn absolute_extrusion_accounting() {
    let mut doc: GcodeDoc = GcodeDoc::new();
    doc.process_lines(["G90", "G92 E0", "G1 X10 E5"]);
    assert_eq!(doc.state.total_e, 5.0);
    assert_eq!(doc.state.current_e, 5.0);
    assert_eq!(doc.state.max_e, 5.0);
    assert_eq!(doc.lines[2].extruding, Some(true));

    // absolute E lower than the counter reads as a retraction
    doc.append("G1 X20 E3");
    assert_eq!(doc.state.total_e, 3.0);
    assert_eq!(doc.state.current_e, 3.0);
    assert_eq!(doc.state.max_e, 5.0);
    assert_eq!(doc.lines[3].extruding, Some(false));
}

#[test]
fn relative_extrusion_accounting() {
    let mut doc: GcodeDoc = GcodeDoc::new();
    doc.process_lines(["M83", "G1 X10 E2"]);
    assert_eq!(doc.state.total_e, 2.0);
    assert_eq!(doc.lines[1].extruding, Some(true));

    // negative e is retraction: flows into the totals, not "extruding"
    doc.append("G1 X20 E-1");
    assert_eq!(doc.state.total_e, 1.0);
    assert_eq!(doc.state.current_e, 1.0);
    assert_eq!(doc.state.max_e, 2.0);
    assert_eq!(doc.lines[2].extruding, Some(false));
}

#[test]
fn extrusion_reset_mirrors_spatial_reset() {
    let doc = doc_from_lines(&["G1 E5", "G92 E0", "G1 E2"]);
    // after the reset, absolute E2 maps to machine-origin 7
    assert_eq!(doc.state.offset_e, 5.0);
    assert_eq!(doc.state.current_e, 7.0);
    assert_eq!(doc.state.abs_e(), 2.0);
    assert_eq!(doc.state.total_e, 7.0);
}

#[test]
fn max_extrusion_never_decreases() {
    let mut doc: GcodeDoc = GcodeDoc::new();
    doc.append("M83");
    let mut previous_max = doc.state.max_e;
    for raw in ["G1 E2", "G1 E-1", "G1 E0.5", "G1 E-3", "G1 E4"] {
        doc.append(raw);
        assert!(doc.state.max_e >= previous_max);
        previous_max = doc.state.max_e;
    }
    assert_eq!(doc.state.total_e, 2.5);
    assert_eq!(doc.state.max_e, 2.5);
}

#[test]
fn dwell_accumulates_duration() {
    let doc = doc_from_lines(&["G4 P500", "G4 P250", "G4"]);
    assert_eq!(doc.state.total_duration, 0.75);
}

#[test]
fn unknown_commands_are_stored_without_state_change() {
    let mut doc: GcodeDoc = GcodeDoc::new();
    doc.append("G1 X10");
    let before = doc.state.clone();

    let line = doc.append("M999 X5").unwrap();
    assert_eq!(line.command.as_deref(), Some("M999"));
    // arguments of a non-motion family are not even parsed
    assert_eq!(line.x, None);
    assert_eq!(doc.state, before);
}

#[test]
fn padded_motion_code_does_not_move() {
    // G01 is not a recognized motion command; identifiers compare textually
    let doc = doc_from_lines(&["G01 X5"]);
    assert!(!doc.lines[0].is_move);
    assert_eq!(doc.state.current_x, 0.0);
}
