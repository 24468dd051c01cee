use crate::lit::Var;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("empty diagram: no node declared")]
    Empty,
    #[error("variable {0} is not part of the variable order")]
    UnknownVariable(Var),
    #[error("variable {0} appears twice in the variable order")]
    DuplicateVariable(Var),
    #[error("{0} variables exceed the {max} supported", max = u16::MAX)]
    TooManyVariables(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DiagramError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        DiagramError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiagramError>;
