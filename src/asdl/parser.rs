//! Parser for ASDL grammar descriptions.
use super::{AsdlGrammar, AsdlType, Cardinality, Constructor, Field, Production};
use std::collections::HashSet;
use thiserror::Error;

/// Error parsing an ASDL grammar description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsdlError {
    #[error("line {line}: unexpected character '{ch}'")]
    UnexpectedChar { ch: char, line: usize },
    #[error("line {line}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        line: usize,
    },
    #[error("expected {0}, found end of input")]
    EndOfInput(&'static str),
    #[error("field type '{0}' is not declared")]
    UnknownType(String),
    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),
    #[error("constructor '{0}' is declared more than once")]
    DuplicateConstructor(String),
    #[error("grammar declares no composite types")]
    NoCompositeTypes,
}

type Result<T> = std::result::Result<T, AsdlError>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Comma,
    Equals,
    Alternative,
    LeftParen,
    RightParen,
    Star,
    Question,
}

impl Token {
    fn text(&self) -> String {
        match self {
            Self::Ident(s) => s.clone(),
            Self::Comma => ",".into(),
            Self::Equals => "=".into(),
            Self::Alternative => "|".into(),
            Self::LeftParen => "(".into(),
            Self::RightParen => ")".into(),
            Self::Star => "*".into(),
            Self::Question => "?".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenInfo {
    token: Token,
    line: usize,
}

/// Splits the input into tokens, dropping whitespace and `#` comments.
fn tokenize(input: &str) -> Result<Vec<TokenInfo>> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        let token = match ch {
            '\n' => {
                line += 1;
                continue;
            }
            '#' => {
                // Comments run to the end of the line; leave the newline to be counted
                while chars.peek().map_or(false, |&c| c != '\n') {
                    chars.next();
                }
                continue;
            }
            c if c.is_whitespace() => continue,
            ',' => Token::Comma,
            '=' => Token::Equals,
            '|' => Token::Alternative,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '*' => Token::Star,
            '?' => Token::Question,
            c if is_ident_char(c) => {
                let mut ident = String::from(c);
                while let Some(&c) = chars.peek() {
                    if !is_ident_char(c) {
                        break;
                    }
                    ident.push(c);
                    chars.next();
                }
                Token::Ident(ident)
            }
            c => return Err(AsdlError::UnexpectedChar { ch: c, line }),
        };
        tokens.push(TokenInfo { token, line });
    }
    Ok(tokens)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A field before its type name has been resolved.
struct RawField {
    type_name: String,
    cardinality: Cardinality,
    name: String,
}

struct RawConstructor {
    name: String,
    fields: Vec<RawField>,
}

struct RawTypeDef {
    name: String,
    constructors: Vec<RawConstructor>,
}

/// A parser for ASDL grammar descriptions.
struct Parser {
    tokens: Vec<TokenInfo>,
    pos: usize,
}

/// Parses an ASDL grammar description.
pub fn parse(input: &str) -> Result<AsdlGrammar> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
    };
    let primitives = parser.parse_primitives()?;
    let mut definitions = Vec::new();
    while parser.peek(0).is_some() {
        definitions.push(parser.parse_type_definition()?);
    }
    resolve(primitives, definitions)
}

impl Parser {
    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|info| &info.token)
    }

    fn must_read(&mut self, expected: &'static str) -> Result<TokenInfo> {
        let info = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(AsdlError::EndOfInput(expected))?;
        self.pos += 1;
        Ok(info)
    }

    fn match_ident(&mut self, expected: &'static str) -> Result<String> {
        let info = self.must_read(expected)?;
        match info.token {
            Token::Ident(name) => Ok(name),
            token => Err(AsdlError::UnexpectedToken {
                expected,
                found: token.text(),
                line: info.line,
            }),
        }
    }

    fn match_token(&mut self, token: &Token, expected: &'static str) -> Result<()> {
        let info = self.must_read(expected)?;
        if &info.token == token {
            Ok(())
        } else {
            Err(AsdlError::UnexpectedToken {
                expected,
                found: info.token.text(),
                line: info.line,
            })
        }
    }

    /// Consume the next token if it equals `token`.
    fn accept(&mut self, token: &Token) -> bool {
        if self.peek(0) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parses the optional leading list of primitive type names.
    ///
    /// The list is present unless the grammar starts directly with `name =`.
    fn parse_primitives(&mut self) -> Result<Vec<String>> {
        let mut primitives = Vec::new();
        if !matches!(self.peek(0), Some(Token::Ident(_))) || self.peek(1) == Some(&Token::Equals)
        {
            return Ok(primitives);
        }
        loop {
            primitives.push(self.match_ident("primitive type name")?);
            if !self.accept(&Token::Comma) {
                break;
            }
        }
        Ok(primitives)
    }

    /// Parses `name = Constructor | Constructor ...`
    fn parse_type_definition(&mut self) -> Result<RawTypeDef> {
        let name = self.match_ident("type name")?;
        self.match_token(&Token::Equals, "'='")?;
        let mut constructors = vec![self.parse_constructor()?];
        while self.accept(&Token::Alternative) {
            constructors.push(self.parse_constructor()?);
        }
        Ok(RawTypeDef { name, constructors })
    }

    /// Parses `Name` or `Name(field, ...)`
    fn parse_constructor(&mut self) -> Result<RawConstructor> {
        let name = self.match_ident("constructor name")?;
        let mut fields = Vec::new();
        if self.accept(&Token::LeftParen) && !self.accept(&Token::RightParen) {
            loop {
                fields.push(self.parse_field()?);
                if !self.accept(&Token::Comma) {
                    break;
                }
            }
            self.match_token(&Token::RightParen, "')'")?;
        }
        Ok(RawConstructor { name, fields })
    }

    /// Parses `type name`, `type? name` or `type* name`
    fn parse_field(&mut self) -> Result<RawField> {
        let type_name = self.match_ident("field type")?;
        let cardinality = if self.accept(&Token::Star) {
            Cardinality::Multiple
        } else if self.accept(&Token::Question) {
            Cardinality::Optional
        } else {
            Cardinality::Single
        };
        let name = self.match_ident("field name")?;
        Ok(RawField {
            type_name,
            cardinality,
            name,
        })
    }
}

/// Resolves field type names against the declared types and builds the grammar.
fn resolve(primitives: Vec<String>, definitions: Vec<RawTypeDef>) -> Result<AsdlGrammar> {
    let primitive_names: HashSet<&str> = primitives.iter().map(String::as_str).collect();
    let composite_names: HashSet<&str> = definitions.iter().map(|d| d.name.as_str()).collect();

    let lookup = |name: &str| -> Result<AsdlType> {
        if primitive_names.contains(name) {
            Ok(AsdlType::primitive(name))
        } else if composite_names.contains(name) {
            Ok(AsdlType::composite(name))
        } else {
            Err(AsdlError::UnknownType(name.into()))
        }
    };

    let mut productions = Vec::new();
    for definition in &definitions {
        let ty = AsdlType::composite(definition.name.as_str());
        for raw in &definition.constructors {
            let fields = raw
                .fields
                .iter()
                .map(|f| Ok(Field::new(f.name.as_str(), lookup(&f.type_name)?, f.cardinality)))
                .collect::<Result<Vec<_>>>()?;
            productions.push(Production::new(
                ty.clone(),
                Constructor::new(raw.name.as_str(), fields),
            ));
        }
    }

    let primitive_types = primitives.iter().map(AsdlType::primitive).collect();
    let composite_types = definitions
        .iter()
        .map(|d| AsdlType::composite(d.name.as_str()))
        .collect();
    AsdlGrammar::new(primitive_types, composite_types, productions)
}
