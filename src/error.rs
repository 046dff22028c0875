use thiserror::Error;

/// The only hard failure the crate produces: an IO error on the reader
/// path. Content-level problems (unparseable lines, malformed numbers,
/// unknown commands) are absorbed and surfaced through `log` instead, so
/// a streamed program never halts on one bad line.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading G-code: {0}")]
    IoError(String),
}
