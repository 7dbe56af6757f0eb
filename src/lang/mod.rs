//! Target language front ends.
//!
//! A front end turns a target sentence into the grammar actions that derive it.
pub mod lambda;

pub use lambda::LambdaFrontend;

use crate::asdl::{AsdlError, AstError, Grammar};
use crate::transition::Action;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Converts target sentences into grammar actions.
pub trait Frontend {
    /// The grammar whose frontier the actions follow.
    fn grammar(&self) -> &dyn Grammar;

    /// Parse a target sentence and return the actions deriving its tree.
    ///
    /// # Errors
    /// If the sentence cannot be parsed or does not fit the grammar.
    fn actions(&self, target: &str) -> Result<Vec<Action>, TargetError>;
}

/// Error converting a target sentence to a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("empty logical form")]
    Empty,
    #[error("unbalanced parentheses")]
    Unbalanced,
    #[error("expected a name after '(', found '{0}'")]
    ExpectedName(String),
    #[error("unexpected '{0}' after the end of the logical form")]
    TrailingInput(String),
    #[error("expected a single token, found '{0}'")]
    ExpectedLeaf(String),
    #[error("'{name}' takes {expected} argument(s) but {found} were given")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("grammar has no constructor '{0}'")]
    MissingConstructor(String),
    #[error(transparent)]
    Ast(#[from] AstError),
}

/// A supported target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Lambda-calculus logical forms.
    Lambda,
}

impl Language {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lambda => "lambda",
        }
    }

    /// Build the front end for this language.
    ///
    /// # Errors
    /// If the language's grammar description fails to parse.
    pub fn frontend(self) -> Result<Box<dyn Frontend>, AsdlError> {
        match self {
            Self::Lambda => Ok(Box::new(LambdaFrontend::new()?)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The language name is not one of the supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("language: {0} currently not supported")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lambda" => Ok(Self::Lambda),
            _ => Err(UnsupportedLanguage(s.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_language() {
        assert_eq!("lambda".parse::<Language>(), Ok(Language::Lambda));
        assert_eq!(
            "prolog".parse::<Language>(),
            Err(UnsupportedLanguage("prolog".into()))
        );
    }

    #[test]
    fn unsupported_message() {
        assert_eq!(
            UnsupportedLanguage("sql".into()).to_string(),
            "language: sql currently not supported"
        );
    }

    #[test]
    fn lambda_frontend_builds() {
        let frontend = Language::Lambda.frontend().unwrap();
        assert!(frontend.grammar().mul_cardinality("expr*"));
        assert!(!frontend.grammar().mul_cardinality("expr"));
    }
}
