//! Lambda-calculus logical forms over the lambda ASDL grammar.
mod logical_form;

pub use logical_form::{parse_lambda_expr, LogicalForm};

use super::{Frontend, TargetError};
use crate::asdl::{AbstractSyntaxTree, AsdlError, AsdlGrammar, FieldValue, Grammar, Production};
use crate::transition::{Action, AsdlTransitionSystem};
use std::sync::Arc;

/// ASDL description of lambda-calculus logical forms.
pub const LAMBDA_ASDL: &str = include_str!("lambda_asdl.txt");

/// Front end for lambda-calculus logical forms.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaFrontend {
    grammar: AsdlGrammar,
    transition_system: AsdlTransitionSystem,
}

impl LambdaFrontend {
    /// Create a front end with the built-in lambda grammar.
    ///
    /// # Errors
    /// If the built-in grammar fails to parse.
    pub fn new() -> Result<Self, AsdlError> {
        Ok(Self {
            grammar: AsdlGrammar::from_text(LAMBDA_ASDL)?,
            transition_system: AsdlTransitionSystem::new(),
        })
    }

    pub const fn asdl_grammar(&self) -> &AsdlGrammar {
        &self.grammar
    }

    /// Parse a logical form into a tree.
    ///
    /// # Errors
    /// If the text is not a well-formed logical form.
    pub fn to_ast(&self, target: &str) -> Result<AbstractSyntaxTree, TargetError> {
        logical_form_to_ast(&self.grammar, &parse_lambda_expr(target)?)
    }
}

impl Frontend for LambdaFrontend {
    fn grammar(&self) -> &dyn Grammar {
        &self.grammar
    }

    fn actions(&self, target: &str) -> Result<Vec<Action>, TargetError> {
        Ok(self.transition_system.get_actions(&self.to_ast(target)?))
    }
}

/// Convert a logical form into a tree of the lambda grammar.
///
/// | form                                  | constructor                      |
/// |---------------------------------------|----------------------------------|
/// | `( lambda v t body )`                 | `Lambda`                         |
/// | `( argmax\|argmin\|sum v domain body )` | `Argmax`, `Argmin`, `Sum`        |
/// | `( count\|exists\|max\|min\|the v body )` | `Count`, `Exists`, ...         |
/// | `( not e )`                           | `Not`                            |
/// | `( and\|or e ... )`                   | `And`, `Or`                      |
/// | `( >\|=\|< l r )`                     | `Compare`                        |
/// | `( p e ... )`, any other name         | `Apply`                          |
/// | `$v`                                  | `Variable`                       |
/// | numeric or `:i` typed leaf            | `Number`                         |
/// | other leaf                            | `Entity`                         |
///
/// # Errors
/// If a form has the wrong number of arguments, or a variable/type slot is not a leaf.
pub fn logical_form_to_ast(
    grammar: &AsdlGrammar,
    form: &LogicalForm,
) -> Result<AbstractSyntaxTree, TargetError> {
    if form.is_leaf() {
        return leaf_to_ast(grammar, &form.name);
    }

    let tree = |child: &LogicalForm| logical_form_to_ast(grammar, child).map(FieldValue::Tree);
    match form.name.as_str() {
        "lambda" => {
            let [variable, ty, body] = arguments::<3>(form)?;
            build(
                grammar,
                "Lambda",
                vec![vec![token(variable)?], vec![token(ty)?], vec![tree(body)?]],
            )
        }
        name @ ("argmax" | "argmin" | "sum") => {
            let [variable, domain, body] = arguments::<3>(form)?;
            let constructor = match name {
                "argmax" => "Argmax",
                "argmin" => "Argmin",
                _ => "Sum",
            };
            build(
                grammar,
                constructor,
                vec![vec![token(variable)?], vec![tree(domain)?], vec![tree(body)?]],
            )
        }
        name @ ("count" | "exists" | "max" | "min" | "the") => {
            let [variable, body] = arguments::<2>(form)?;
            let constructor = match name {
                "count" => "Count",
                "exists" => "Exists",
                "max" => "Max",
                "min" => "Min",
                _ => "The",
            };
            build(
                grammar,
                constructor,
                vec![vec![token(variable)?], vec![tree(body)?]],
            )
        }
        "not" => {
            let [argument] = arguments::<1>(form)?;
            build(grammar, "Not", vec![vec![tree(argument)?]])
        }
        name @ ("and" | "or") => {
            let constructor = if name == "and" { "And" } else { "Or" };
            let args = form.children.iter().map(tree).collect::<Result<_, _>>()?;
            build(grammar, constructor, vec![args])
        }
        name @ (">" | "=" | "<") => {
            let [left, right] = arguments::<2>(form)?;
            let op = match name {
                ">" => "GreaterThan",
                "=" => "Equal",
                _ => "LessThan",
            };
            let op = AbstractSyntaxTree::leaf(production(grammar, op)?)?;
            build(
                grammar,
                "Compare",
                vec![vec![op.into()], vec![tree(left)?], vec![tree(right)?]],
            )
        }
        predicate => {
            let args = form.children.iter().map(tree).collect::<Result<_, _>>()?;
            build(
                grammar,
                "Apply",
                vec![vec![FieldValue::Token(predicate.into())], args],
            )
        }
    }
}

fn leaf_to_ast(grammar: &AsdlGrammar, name: &str) -> Result<AbstractSyntaxTree, TargetError> {
    let constructor = if name.starts_with('$') {
        "Variable"
    } else if is_number(name) {
        "Number"
    } else {
        "Entity"
    };
    build(grammar, constructor, vec![vec![FieldValue::Token(name.into())]])
}

/// A numeral such as `3`, `-1.5` or `1600`, or an `:i` typed constant.
fn is_number(name: &str) -> bool {
    name.ends_with(":i")
        || name
            .strip_prefix('-')
            .unwrap_or(name)
            .starts_with(|c: char| c.is_ascii_digit())
}

fn production(grammar: &AsdlGrammar, constructor: &str) -> Result<Arc<Production>, TargetError> {
    grammar
        .production_by_constructor(constructor)
        .cloned()
        .ok_or_else(|| TargetError::MissingConstructor(constructor.into()))
}

fn build(
    grammar: &AsdlGrammar,
    constructor: &str,
    values: Vec<Vec<FieldValue>>,
) -> Result<AbstractSyntaxTree, TargetError> {
    Ok(AbstractSyntaxTree::new(production(grammar, constructor)?, values)?)
}

/// The children of `form`, which must number exactly `N`.
fn arguments<const N: usize>(form: &LogicalForm) -> Result<&[LogicalForm; N], TargetError> {
    <&[LogicalForm; N]>::try_from(form.children.as_slice()).map_err(|_| TargetError::Arity {
        name: form.name.clone(),
        expected: N,
        found: form.children.len(),
    })
}

/// A leaf used as a token.
fn token(form: &LogicalForm) -> Result<FieldValue, TargetError> {
    if form.is_leaf() {
        Ok(FieldValue::Token(form.name.clone()))
    } else {
        Err(TargetError::ExpectedLeaf(form.to_string()))
    }
}
