//! Transition system: grammar actions that derive an abstract syntax tree.
use crate::asdl::{AbstractSyntaxTree, Cardinality, FieldValue, Production};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A single step in the top-down, left-to-right derivation of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Expand the current frontier node with a production.
    ApplyRule(Arc<Production>),
    /// Fill the current primitive frontier node with a token.
    GenToken(String),
    /// Close the current frontier node (end of a list or an absent optional value).
    Reduce,
}

impl Action {
    /// Construct a [`Action::GenToken`].
    pub fn gen_token<S: Into<String>>(token: S) -> Self {
        Self::GenToken(token.into())
    }
}

/// Format a token as a generate-token action.
pub fn wrap_gen_token(token: &str) -> String {
    format!("GenToken[{}]", token)
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ApplyRule(production) => write!(f, "ApplyRule[{}]", production),
            Self::GenToken(token) => f.write_str(&wrap_gen_token(token)),
            Self::Reduce => f.write_str("Reduce"),
        }
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The transition system of an ASDL grammar.
///
/// Converts a tree into the pre-order sequence of actions that derives it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AsdlTransitionSystem;

impl AsdlTransitionSystem {
    pub const fn new() -> Self {
        Self
    }

    /// The actions that derive `tree`.
    ///
    /// `ApplyRule` for the node followed by the actions of each field in order.
    /// A field's values contribute their own actions (`GenToken` for tokens);
    /// a multiple-cardinality field and an empty optional field end with `Reduce`.
    pub fn get_actions(&self, tree: &AbstractSyntaxTree) -> Vec<Action> {
        let mut actions = Vec::new();
        self.push_actions(tree, &mut actions);
        actions
    }

    fn push_actions(&self, tree: &AbstractSyntaxTree, actions: &mut Vec<Action>) {
        actions.push(Action::ApplyRule(Arc::clone(tree.production())));
        for realized in tree.fields() {
            for value in &realized.values {
                match value {
                    FieldValue::Tree(child) => self.push_actions(child, actions),
                    FieldValue::Token(token) => actions.push(Action::GenToken(token.clone())),
                }
            }
            let close = match realized.field.cardinality {
                Cardinality::Single => false,
                Cardinality::Optional => realized.values.is_empty(),
                Cardinality::Multiple => true,
            };
            if close {
                actions.push(Action::Reduce);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asdl::AsdlGrammar;
    use rstest::{fixture, rstest};

    #[fixture]
    fn grammar() -> AsdlGrammar {
        AsdlGrammar::from_text(
            "var, pred
             expr = Variable(var variable)
                  | Apply(pred predicate, expr* arguments)
                  | Return(expr? value)",
        )
        .unwrap()
    }

    fn node(grammar: &AsdlGrammar, ctor: &str, values: Vec<Vec<FieldValue>>) -> AbstractSyntaxTree {
        AbstractSyntaxTree::new(
            Arc::clone(grammar.production_by_constructor(ctor).unwrap()),
            values,
        )
        .unwrap()
    }

    fn token(s: &str) -> FieldValue {
        FieldValue::Token(s.into())
    }

    #[rstest]
    fn apply_with_list(grammar: AsdlGrammar) {
        let var = node(&grammar, "Variable", vec![vec![token("$0")]]);
        let tree = node(
            &grammar,
            "Apply",
            vec![vec![token("flight")], vec![var.into()]],
        );
        let rendered: Vec<_> = AsdlTransitionSystem::new()
            .get_actions(&tree)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            rendered,
            vec![
                "ApplyRule[expr -> Apply(pred predicate, expr* arguments)]",
                "GenToken[flight]",
                "ApplyRule[expr -> Variable(var variable)]",
                "GenToken[$0]",
                "Reduce",
            ]
        );
    }

    #[rstest]
    fn empty_list_is_reduced(grammar: AsdlGrammar) {
        let tree = node(&grammar, "Apply", vec![vec![token("true")], vec![]]);
        let actions = AsdlTransitionSystem::new().get_actions(&tree);
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[2], Action::Reduce);
    }

    #[rstest]
    fn empty_optional_is_reduced(grammar: AsdlGrammar) {
        let tree = node(&grammar, "Return", vec![vec![]]);
        let actions = AsdlTransitionSystem::new().get_actions(&tree);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1], Action::Reduce);
    }

    #[rstest]
    fn filled_optional_is_not_reduced(grammar: AsdlGrammar) {
        let var = node(&grammar, "Variable", vec![vec![token("$0")]]);
        let tree = node(&grammar, "Return", vec![vec![var.into()]]);
        let actions = AsdlTransitionSystem::new().get_actions(&tree);
        assert_eq!(actions.len(), 3);
        assert!(!actions.contains(&Action::Reduce));
    }

    #[test]
    fn wrap_token() {
        assert_eq!(wrap_gen_token("ci0"), "GenToken[ci0]");
        assert_eq!(Action::gen_token("ci0").to_string(), "GenToken[ci0]");
    }
}
