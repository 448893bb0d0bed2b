use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("could not read layout")]
    Io(#[from] std::io::Error),
    #[error("malformed layout")]
    Xml(#[from] roxmltree::Error),
    #[error("<{node}> is missing attribute `{attr}`")]
    MissingAttribute { node: &'static str, attr: &'static str },
    #[error("<{node}> attribute `{attr}` is not a number: {value:?}")]
    InvalidNumber {
        node: &'static str,
        attr: &'static str,
        value: String,
    },
}

/// A failure while processing one game, tagged with what was being read.
#[derive(Error, Debug)]
#[error("game `{game}` ({})", .layout.display())]
pub struct GameError {
    pub game: String,
    pub layout: PathBuf,
    #[source]
    pub source: GameErrorKind,
}

#[derive(Error, Debug)]
pub enum GameErrorKind {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("failed to write output")]
    Emit(#[from] std::io::Error),
}

/// `error` and each of its sources, joined with `": "`.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}

#[derive(Error, Debug)]
#[error("overlay buffer must be {expected} bytes, got {actual}")]
pub struct BufferSizeError {
    pub expected: usize,
    pub actual: usize,
}
