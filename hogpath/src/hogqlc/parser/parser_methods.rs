use super::hogql_parser::Rule;
use core::fmt;

#[derive(Debug, PartialEq)]
pub enum HogQLError {
    /// The grammar rejected the input outright.
    ParseError(String),
    /// A grammar production the converter does not implement. Deliberate
    /// scope fence, not a bug: unknown shapes fail instead of mis-compiling.
    UnsupportedConstruct(String),
    /// A named, planned-but-unimplemented construct (e.g. `||` concatenation),
    /// kept distinct so callers can assert on the specific known gap.
    NotYetSupported(String),
    /// The recursion-depth guard tripped; carries the limit that was hit.
    ExpressionTooComplex(usize),
}

impl fmt::Display for HogQLError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HogQLError::ParseError(e) => write!(f, "Parse error: {}", e),
            HogQLError::UnsupportedConstruct(name) => {
                write!(f, "Unsupported construct: {}", name)
            }
            HogQLError::NotYetSupported(name) => write!(f, "Yet unsupported: {}", name),
            HogQLError::ExpressionTooComplex(limit) => {
                write!(f, "Expression exceeds maximum depth of {}", limit)
            }
        }
    }
}

impl std::error::Error for HogQLError {}

impl From<pest::error::Error<Rule>> for HogQLError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        HogQLError::ParseError(e.to_string())
    }
}

impl From<String> for HogQLError {
    fn from(e: String) -> Self {
        HogQLError::ParseError(e)
    }
}

impl From<&'static str> for HogQLError {
    fn from(e: &'static str) -> Self {
        HogQLError::ParseError(e.to_string())
    }
}
