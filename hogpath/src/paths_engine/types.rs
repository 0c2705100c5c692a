use core::fmt;

#[derive(Debug, PartialEq)]
pub enum PathsError {
    /// Rejected at request setup, before any event is touched. Carries the
    /// offending field and the constraint it violated.
    MalformedConfiguration(String),
}

impl fmt::Display for PathsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathsError::MalformedConfiguration(msg) => {
                write!(f, "Malformed path configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for PathsError {}
