//! Abstract syntax trees over an ASDL grammar.
use super::{Cardinality, Field, Production};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The value of one slot of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A subtree, for composite-type fields.
    Tree(AbstractSyntaxTree),
    /// A token, for primitive-type fields.
    Token(String),
}

impl From<AbstractSyntaxTree> for FieldValue {
    fn from(tree: AbstractSyntaxTree) -> Self {
        Self::Tree(tree)
    }
}

/// A constructor field together with its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealizedField {
    pub field: Field,
    /// As many values as the field cardinality allows.
    pub values: Vec<FieldValue>,
}

/// Error constructing an [`AbstractSyntaxTree`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("constructor {constructor} has {expected} fields but {found} were given")]
    FieldCount {
        constructor: String,
        expected: usize,
        found: usize,
    },
    #[error("field {field} of {constructor} is {cardinality} but has {found} values")]
    Cardinality {
        constructor: String,
        field: String,
        cardinality: Cardinality,
        found: usize,
    },
    #[error("field {field} of {constructor} has primitive type {ty} and requires tokens")]
    ExpectedToken {
        constructor: String,
        field: String,
        ty: String,
    },
    #[error("field {field} of {constructor} expects a tree of type {expected}, not {found}")]
    ExpectedTree {
        constructor: String,
        field: String,
        expected: String,
        found: String,
    },
}

/// A tree of productions with realized fields.
///
/// Construction checks every field value against the production,
/// so a tree is always well-formed with respect to its grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractSyntaxTree {
    production: Arc<Production>,
    fields: Vec<RealizedField>,
}

impl AbstractSyntaxTree {
    /// Create a tree node.
    ///
    /// # Args
    /// * `production` - Production applied at this node.
    /// * `values` - Values of each constructor field, in field order.
    ///
    /// # Errors
    /// If the number of fields, any field's number of values,
    /// or any value's kind/type does not match the production.
    pub fn new(production: Arc<Production>, values: Vec<Vec<FieldValue>>) -> Result<Self, AstError> {
        let constructor = &production.constructor;
        if values.len() != constructor.fields.len() {
            return Err(AstError::FieldCount {
                constructor: constructor.name.clone(),
                expected: constructor.fields.len(),
                found: values.len(),
            });
        }

        let mut fields = Vec::with_capacity(values.len());
        for (field, values) in constructor.fields.iter().zip(values) {
            if !field.cardinality.allows(values.len()) {
                return Err(AstError::Cardinality {
                    constructor: constructor.name.clone(),
                    field: field.name.clone(),
                    cardinality: field.cardinality,
                    found: values.len(),
                });
            }
            for value in &values {
                check_value(&constructor.name, field, value)?;
            }
            fields.push(RealizedField {
                field: field.clone(),
                values,
            });
        }
        Ok(Self { production, fields })
    }

    /// Create a tree node for a production whose constructor has no fields.
    ///
    /// # Errors
    /// If the constructor has fields.
    pub fn leaf(production: Arc<Production>) -> Result<Self, AstError> {
        Self::new(production, Vec::new())
    }

    pub const fn production(&self) -> &Arc<Production> {
        &self.production
    }

    pub fn fields(&self) -> &[RealizedField] {
        &self.fields
    }

    /// Number of tree nodes, including this one.
    pub fn size(&self) -> usize {
        1 + self
            .fields
            .iter()
            .flat_map(|f| &f.values)
            .map(|v| match v {
                FieldValue::Tree(t) => t.size(),
                FieldValue::Token(_) => 0,
            })
            .sum::<usize>()
    }
}

fn check_value(constructor: &str, field: &Field, value: &FieldValue) -> Result<(), AstError> {
    match value {
        FieldValue::Token(_) if field.ty.is_primitive() => Ok(()),
        FieldValue::Tree(tree) if field.ty.is_composite() => {
            if tree.production.ty.name == field.ty.name {
                Ok(())
            } else {
                Err(AstError::ExpectedTree {
                    constructor: constructor.into(),
                    field: field.name.clone(),
                    expected: field.ty.name.clone(),
                    found: tree.production.ty.name.clone(),
                })
            }
        }
        FieldValue::Tree(_) => Err(AstError::ExpectedToken {
            constructor: constructor.into(),
            field: field.name.clone(),
            ty: field.ty.name.clone(),
        }),
        FieldValue::Token(token) => Err(AstError::ExpectedTree {
            constructor: constructor.into(),
            field: field.name.clone(),
            expected: field.ty.name.clone(),
            found: format!("token {:?}", token),
        }),
    }
}

/// S-expression rendering: `(Constructor value ...)`.
///
/// Multiple-cardinality fields are bracketed and an absent optional value is `_`.
impl fmt::Display for AbstractSyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}", self.production.constructor.name)?;
        for realized in &self.fields {
            f.write_str(" ")?;
            match realized.field.cardinality {
                Cardinality::Multiple => {
                    f.write_str("[")?;
                    for (i, value) in realized.values.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" ")?;
                        }
                        write!(f, "{}", value)?;
                    }
                    f.write_str("]")?;
                }
                _ => match realized.values.first() {
                    Some(value) => write!(f, "{}", value)?,
                    None => f.write_str("_")?,
                },
            }
        }
        f.write_str(")")
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Tree(tree) => write!(f, "{}", tree),
            Self::Token(token) => f.write_str(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::AsdlGrammar;
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn grammar() -> AsdlGrammar {
        AsdlGrammar::from_text(
            "var, pred
             expr = Variable(var variable)
                  | Apply(pred predicate, expr* arguments)
                  | Maybe(stmt? value)
             stmt = Pass",
        )
        .unwrap()
    }

    fn variable(grammar: &AsdlGrammar, name: &str) -> AbstractSyntaxTree {
        AbstractSyntaxTree::new(
            Arc::clone(grammar.production_by_constructor("Variable").unwrap()),
            vec![vec![FieldValue::Token(name.into())]],
        )
        .unwrap()
    }

    #[rstest]
    fn nested_tree(grammar: AsdlGrammar) {
        let tree = AbstractSyntaxTree::new(
            Arc::clone(grammar.production_by_constructor("Apply").unwrap()),
            vec![
                vec![FieldValue::Token("flight".into())],
                vec![variable(&grammar, "$0").into(), variable(&grammar, "$1").into()],
            ],
        )
        .unwrap();
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.to_string(), "(Apply flight [(Variable $0) (Variable $1)])");
    }

    #[rstest]
    fn empty_optional_renders_placeholder(grammar: AsdlGrammar) {
        let tree = AbstractSyntaxTree::new(
            Arc::clone(grammar.production_by_constructor("Maybe").unwrap()),
            vec![vec![]],
        )
        .unwrap();
        assert_eq!(tree.to_string(), "(Maybe _)");
    }

    #[rstest]
    fn wrong_field_count(grammar: AsdlGrammar) {
        let result = AbstractSyntaxTree::leaf(Arc::clone(
            grammar.production_by_constructor("Variable").unwrap(),
        ));
        assert!(matches!(
            result,
            Err(AstError::FieldCount {
                expected: 1,
                found: 0,
                ..
            })
        ));
    }

    #[rstest]
    fn single_field_needs_one_value(grammar: AsdlGrammar) {
        let result = AbstractSyntaxTree::new(
            Arc::clone(grammar.production_by_constructor("Variable").unwrap()),
            vec![vec![]],
        );
        assert!(matches!(result, Err(AstError::Cardinality { found: 0, .. })));
    }

    #[rstest]
    fn primitive_field_rejects_tree(grammar: AsdlGrammar) {
        let result = AbstractSyntaxTree::new(
            Arc::clone(grammar.production_by_constructor("Variable").unwrap()),
            vec![vec![variable(&grammar, "$0").into()]],
        );
        assert!(matches!(result, Err(AstError::ExpectedToken { .. })));
    }

    #[rstest]
    fn composite_field_rejects_wrong_type(grammar: AsdlGrammar) {
        let result = AbstractSyntaxTree::new(
            Arc::clone(grammar.production_by_constructor("Maybe").unwrap()),
            vec![vec![variable(&grammar, "$0").into()]],
        );
        assert_eq!(
            result.unwrap_err(),
            AstError::ExpectedTree {
                constructor: "Maybe".into(),
                field: "value".into(),
                expected: "stmt".into(),
                found: "expr".into(),
            }
        );
    }
}
