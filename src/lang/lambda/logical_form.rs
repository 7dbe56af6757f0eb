//! Parenthesized lambda-calculus logical forms.
//!
//! For example `( lambda $0 e ( and ( flight $0 ) ( from $0 ci0 ) ) )`.
use super::super::TargetError;
use std::fmt;

/// A node of a parsed logical form.
///
/// A parenthesized form is never a leaf, even with no children: `( not )` is the
/// form `not` applied to nothing, while `not` alone is a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalForm {
    pub name: String,
    pub children: Vec<LogicalForm>,
    parenthesized: bool,
}

impl LogicalForm {
    pub fn leaf<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            parenthesized: false,
        }
    }

    pub fn node<S: Into<String>>(name: S, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            children,
            parenthesized: true,
        }
    }

    pub const fn is_leaf(&self) -> bool {
        !self.parenthesized
    }
}

impl fmt::Display for LogicalForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_leaf() {
            return f.write_str(&self.name);
        }
        write!(f, "( {}", self.name)?;
        for child in &self.children {
            write!(f, " {}", child)?;
        }
        f.write_str(" )")
    }
}

/// Split on whitespace, with parentheses always separate tokens.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let mut start = 0;
        for (i, c) in word.char_indices() {
            if c == '(' || c == ')' {
                if start < i {
                    tokens.push(&word[start..i]);
                }
                tokens.push(&word[i..=i]);
                start = i + 1;
            }
        }
        if start < word.len() {
            tokens.push(&word[start..]);
        }
    }
    tokens
}

/// Parse a logical form.
///
/// # Errors
/// If the text is empty, has unbalanced parentheses, has a parenthesis where a name is
/// expected, or continues after the first complete form.
pub fn parse_lambda_expr(text: &str) -> Result<LogicalForm, TargetError> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Err(TargetError::Empty);
    }
    let mut pos = 0;
    let form = parse_form(&tokens, &mut pos)?;
    match tokens.get(pos) {
        Some(token) => Err(TargetError::TrailingInput((*token).into())),
        None => Ok(form),
    }
}

fn parse_form(tokens: &[&str], pos: &mut usize) -> Result<LogicalForm, TargetError> {
    let token = *tokens.get(*pos).ok_or(TargetError::Unbalanced)?;
    *pos += 1;
    match token {
        ")" => Err(TargetError::Unbalanced),
        "(" => {
            let name = *tokens.get(*pos).ok_or(TargetError::Unbalanced)?;
            if name == "(" || name == ")" {
                return Err(TargetError::ExpectedName(name.into()));
            }
            *pos += 1;
            let mut children = Vec::new();
            loop {
                match tokens.get(*pos) {
                    None => return Err(TargetError::Unbalanced),
                    Some(&")") => {
                        *pos += 1;
                        break;
                    }
                    Some(_) => children.push(parse_form(tokens, pos)?),
                }
            }
            Ok(LogicalForm::node(name, children))
        }
        name => Ok(LogicalForm::leaf(name)),
    }
}
