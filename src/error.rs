use std::fmt;

#[derive(Debug)]
pub enum PatchError {
    Json(String),
    GridImage { len: usize },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::Json(msg) => write!(f, "Patch JSON error: {msg}"),
            PatchError::GridImage { len } => {
                write!(f, "Grid image must be 256 cells, got {len}")
            }
        }
    }
}

impl std::error::Error for PatchError {}

impl From<serde_json::Error> for PatchError {
    fn from(e: serde_json::Error) -> Self {
        PatchError::Json(e.to_string())
    }
}
