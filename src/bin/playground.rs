use gcode_interpreter::parse;
use gcode_interpreter::util::gcode_to_reader;

fn main() {
    let reader = gcode_to_reader(
        "M104 S210 ; heat up
    G21
    G90
    G28
    G92 E0
    G1 Z0.3 F3000
    G1 X20 Y20 E1.5 F1500
    G1 X40 Y20 E3.0
    G1 E1.0 F1800 (retract)
    G4 P500
    G1 X60 Y40 E4.5 F1500
    ",
    );

    match parse(reader) {
        Ok(doc) => {
            for line in &doc {
                println!(
                    "{:<32} -> command: {:?}, position: ({:?}, {:?}, {:?}), extruding: {:?}",
                    line.raw, line.command, line.current_x, line.current_y, line.current_z,
                    line.extruding
                );
            }
            println!();
            println!("{}", doc);
        }
        Err((partial, error)) => {
            println!("parse failed: {}", error);
            println!("{}", partial);
        }
    }
}
