use xdd_diagram::{DiagramError, Lit};

/// Category of an [`XpError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input files, instance values or arguments do not respect their expected format.
    MalformedInput,
    /// The literals derived for an instance contradict each other, or do not decide the classifier.
    InconsistentLiteralSet,
    Io,
}

#[derive(thiserror::Error, Debug)]
pub enum XpError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("feature {feature} implies both {lit} and its negation")]
    InconsistentLiterals { feature: String, lit: Lit },
    #[error("the classifier is undecided on a fully specified instance")]
    UndecidedCircuit,
    #[error(transparent)]
    Diagram(#[from] DiagramError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl XpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            XpError::MalformedInput(_) | XpError::Parse { .. } => ErrorKind::MalformedInput,
            XpError::InconsistentLiterals { .. } | XpError::UndecidedCircuit => {
                ErrorKind::InconsistentLiteralSet
            }
            XpError::Diagram(DiagramError::Io(_)) | XpError::Io(_) => ErrorKind::Io,
            XpError::Diagram(_) => ErrorKind::MalformedInput,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        XpError::MalformedInput(message.into())
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        XpError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, XpError>;
