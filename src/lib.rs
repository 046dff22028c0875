//! # Gcode-interpreter
//!
//! A streaming tokenizer and stateful interpreter for the line-oriented
//! G-code dialect spoken by material-extrusion firmwares (RepRap, Marlin
//! and friends).
//!
//! Interpreting a program is inherently stateful: units, positioning mode,
//! tool selection, coordinate-system offsets and the extrusion counters all
//! carry forward from line to line, so a command's meaning depends on
//! everything before it. This crate keeps that state in an explicit
//! [`MachineState`] owned by a [`GcodeDoc`], and annotates every stored
//! line with the resolved absolute position and extrusion outcome at the
//! moment it executed.
//!
//! Feed a whole file through [`parse`] (or [`parse_light`] to skip the
//! per-line history on large programs), or stream lines in one at a time
//! with [`GcodeDoc::append`] while a sender drains the document. Bad input
//! never halts interpretation: unparseable lines are kept verbatim for
//! pass-through and reported through `log`.

// These modules are not public, instead we re-export the public types from them below
mod document;
mod error;
mod line;
mod parser;

pub mod util;

pub use document::*;
pub use error::*;
pub use line::*;
pub use parser::*;
