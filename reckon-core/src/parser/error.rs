use std::fmt;

/// Failure of a single `evaluate` call.
///
/// Errors raised while evaluating a function argument or body are returned
/// unchanged to the outermost caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvalError {
    /// No token pattern matched; `position` is the number of characters
    /// already consumed.
    Lex { position: usize },
    /// A call-style `(` was never closed.
    FunctionCallParse,
    /// Reduction finished with more than one entry left.
    MalformedExpression { unexpected_token: String },
    /// Lookup of an undeclared name, or of a name used with the wrong shape.
    UnknownSymbol { name: String },
    /// Nothing to evaluate.
    EmptyExpression,
}

impl EvalError {
    pub fn unknown(name: impl Into<String>) -> Self {
        EvalError::UnknownSymbol { name: name.into() }
    }

    pub fn malformed(token: impl Into<String>) -> Self {
        EvalError::MalformedExpression {
            unexpected_token: token.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Lex { position } => write!(
                f,
                "Bad expression; cannot parse token at index {}.",
                position
            ),
            EvalError::FunctionCallParse => {
                write!(f, "Cannot parse function invocation; expecting RIGHT_PAREN")
            }
            EvalError::MalformedExpression { unexpected_token } => {
                write!(f, "Malformed expression; unexpected {}", unexpected_token)
            }
            EvalError::UnknownSymbol { name } => write!(f, "Unknown variable {}", name),
            EvalError::EmptyExpression => write!(f, "Empty expression"),
        }
    }
}

impl std::error::Error for EvalError {}
