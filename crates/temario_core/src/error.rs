use std::fmt;

/// Fatal load-time failure: the themes document could not be read or parsed.
///
/// Distinct from validation findings: an unloadable tree has nothing to
/// validate.
#[derive(Debug)]
pub enum LoadError {
    Io(String),
    Encoding(String),
    Parse(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "read themes file: {}", msg),
            LoadError::Encoding(msg) => write!(f, "themes file is not valid UTF-8: {}", msg),
            LoadError::Parse(msg) => write!(f, "parse themes document: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}
