use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MigrateError>;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("missing `{0}` assignment")]
    MissingKey(&'static str),

    #[error("unsupported `{key}` expression at offset {offset}: expected a list or dictionary literal, found {found:?}")]
    UnsupportedExpr {
        key: String,
        offset: usize,
        found: String,
    },

    #[error("unclosed expression starting at offset {start}")]
    UnclosedExpr { start: usize },

    #[error("`{key}` is not valid JSON after normalization: {source}")]
    Parse {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("road cell at {x},{y} is not a list")]
    MalformedCell { x: usize, y: usize },

    #[error("missing migration tiles dir: {}", .0.display())]
    MissingTilesDir(PathBuf),
}
