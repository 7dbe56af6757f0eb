//! Linearization of action sequences into aligned node, token and action channels.
//!
//! A decoder that generates trees by actions needs, at every step, the type of the frontier node
//! being expanded and the token generated by the previous step. [`linearize`] replays an action
//! sequence over a stack of pending frontier nodes to produce those channels.
use crate::asdl::{Grammar, Production};
use crate::transition::Action;
use log::debug;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Label of the frontier node at the start of every derivation.
pub const START_NODE: &str = "<start>";
/// Token channel entry for steps not preceded by a generated token.
pub const PAD_TOKEN: &str = "<pad>";
/// Action channel label for [`Action::Reduce`].
pub const REDUCE_LABEL: &str = "Reduce";

/// Target action of one decoding step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionLabel {
    /// Apply this production.
    Rule(Arc<Production>),
    /// Generate this token.
    Token(String),
    /// Close the frontier node.
    Reduce,
}

impl ActionLabel {
    /// The generated token, if this is a token label.
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Rule(production) => write!(f, "{}", production),
            Self::Token(token) => f.write_str(token),
            Self::Reduce => f.write_str(REDUCE_LABEL),
        }
    }
}

impl Serialize for ActionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Aligned per-step channels of one linearized action sequence.
///
/// All three sequences have one entry per input action.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Linearized {
    /// Frontier node label expanded at each step.
    pub nodes: Vec<String>,
    /// Token generated at the previous step, or [`PAD_TOKEN`].
    pub tokens: Vec<String>,
    /// Action taken at each step.
    pub actions: Vec<ActionLabel>,
}

impl Linearized {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            tokens: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
        }
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over `(node, token, action)` for each step.
    pub fn steps(&self) -> impl ExactSizeIterator<Item = (&str, &str, &ActionLabel)> {
        self.nodes
            .iter()
            .zip(&self.tokens)
            .zip(&self.actions)
            .map(|((node, token), action)| (node.as_str(), token.as_str(), action))
    }
}

/// The action sequence does not fit the grammar's frontier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinearizeError {
    #[error("frontier is empty at step {step} ({action})")]
    EmptyFrontier { step: usize, action: String },
}

/// Linearize one action sequence.
///
/// At each step the top of the frontier is the node being expanded:
/// * `ApplyRule` pushes the production's field labels (first field on top).
///   The expanded node is removed unless `grammar.mul_cardinality` says it stays open.
/// * `GenToken` and `Reduce` remove the expanded node.
///
/// The token channel lags by one: a step gets the token of the previous action when that action
/// generated a token, otherwise [`PAD_TOKEN`].
///
/// # Errors
/// Returns [`LinearizeError::EmptyFrontier`] if an action arrives when no frontier node is
/// pending, meaning the actions were not produced for this grammar.
pub fn linearize<G>(actions: &[Action], grammar: &G) -> Result<Linearized, LinearizeError>
where
    G: Grammar + ?Sized,
{
    let mut frontier = vec![START_NODE.to_string()];
    let mut out = Linearized::with_capacity(actions.len());

    for (step, action) in actions.iter().enumerate() {
        let node = frontier
            .pop()
            .ok_or_else(|| LinearizeError::EmptyFrontier {
                step,
                action: action.to_string(),
            })?;

        let token = out.actions.last().and_then(ActionLabel::as_token);
        out.tokens.push(token.unwrap_or(PAD_TOKEN).to_string());

        let label = match action {
            Action::ApplyRule(production) => {
                if grammar.mul_cardinality(&node) {
                    frontier.push(node.clone());
                }
                frontier.extend(production.child_labels().rev());
                ActionLabel::Rule(Arc::clone(production))
            }
            Action::GenToken(token) => ActionLabel::Token(token.clone()),
            Action::Reduce => ActionLabel::Reduce,
        };
        out.nodes.push(node);
        out.actions.push(label);
    }

    if !frontier.is_empty() {
        debug!("{} frontier node(s) left open: {:?}", frontier.len(), frontier);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asdl::{AsdlType, Cardinality, Constructor, Field};
    use rstest::rstest;

    /// Grammar with an explicit set of open (multiple-cardinality) node labels.
    struct OpenNodes(&'static [&'static str]);

    impl Grammar for OpenNodes {
        fn mul_cardinality(&self, node: &str) -> bool {
            self.0.contains(&node)
        }
    }

    fn rule(name: &str, fields: &[(&str, Cardinality)]) -> Arc<Production> {
        Arc::new(Production::new(
            AsdlType::composite("t"),
            Constructor::new(
                name,
                fields
                    .iter()
                    .enumerate()
                    .map(|(i, &(ty, cardinality))| {
                        Field::new(format!("f{}", i), AsdlType::composite(ty), cardinality)
                    })
                    .collect(),
            ),
        ))
    }

    #[test]
    fn rule_then_token_then_reduce() {
        let r1 = rule("R1", &[("A", Cardinality::Single), ("B", Cardinality::Single)]);
        let actions = [
            Action::ApplyRule(Arc::clone(&r1)),
            Action::gen_token("foo"),
            Action::Reduce,
        ];
        let out = linearize(&actions, &OpenNodes(&[])).unwrap();
        assert_eq!(out.nodes, vec!["<start>", "A", "B"]);
        assert_eq!(out.tokens, vec!["<pad>", "<pad>", "foo"]);
        assert_eq!(
            out.actions,
            vec![
                ActionLabel::Rule(r1),
                ActionLabel::Token("foo".into()),
                ActionLabel::Reduce
            ]
        );
    }

    #[test]
    fn open_node_stays_on_frontier() {
        let root = rule("Root", &[("item", Cardinality::Multiple)]);
        let leaf = rule("Leaf", &[]);
        let actions = [
            Action::ApplyRule(root),
            Action::ApplyRule(Arc::clone(&leaf)),
            Action::ApplyRule(leaf),
            Action::Reduce,
        ];
        let out = linearize(&actions, &OpenNodes(&["item*"])).unwrap();
        assert_eq!(out.nodes, vec!["<start>", "item*", "item*", "item*"]);
        assert_eq!(out.actions[3], ActionLabel::Reduce);
    }

    #[test]
    fn open_node_decision_uses_grammar() {
        // Without the grammar marking it open, the list node is consumed by the first rule
        let root = rule("Root", &[("item", Cardinality::Multiple)]);
        let leaf = rule("Leaf", &[]);
        let actions = [
            Action::ApplyRule(root),
            Action::ApplyRule(Arc::clone(&leaf)),
            Action::ApplyRule(leaf),
        ];
        let result = linearize(&actions, &OpenNodes(&[]));
        assert_eq!(
            result.unwrap_err(),
            LinearizeError::EmptyFrontier {
                step: 2,
                action: "ApplyRule[t -> Leaf]".into()
            }
        );
    }

    #[test]
    fn fields_expand_left_to_right() {
        let root = rule(
            "Root",
            &[
                ("a", Cardinality::Single),
                ("b", Cardinality::Optional),
                ("c", Cardinality::Multiple),
            ],
        );
        let actions = [
            Action::ApplyRule(root),
            Action::gen_token("x"),
            Action::Reduce,
            Action::Reduce,
        ];
        let out = linearize(&actions, &OpenNodes(&["c*"])).unwrap();
        assert_eq!(out.nodes, vec!["<start>", "a", "b", "c*"]);
        assert_eq!(out.tokens, vec!["<pad>", "<pad>", "x", "<pad>"]);
    }

    #[test]
    fn consecutive_tokens_shift() {
        let root = rule("Root", &[("a", Cardinality::Single), ("b", Cardinality::Single)]);
        let actions = [
            Action::ApplyRule(root),
            Action::gen_token("x"),
            Action::gen_token("y"),
        ];
        let out = linearize(&actions, &OpenNodes(&[])).unwrap();
        assert_eq!(out.tokens, vec!["<pad>", "<pad>", "x"]);
        assert_eq!(
            out.steps().last(),
            Some(("b", "x", &ActionLabel::Token("y".into())))
        );
    }

    #[test]
    fn token_named_reduce_is_still_a_token() {
        let root = rule("Root", &[("a", Cardinality::Single), ("b", Cardinality::Single)]);
        let actions = [
            Action::ApplyRule(root),
            Action::gen_token(REDUCE_LABEL),
            Action::gen_token("y"),
        ];
        let out = linearize(&actions, &OpenNodes(&[])).unwrap();
        assert_eq!(out.tokens[2], REDUCE_LABEL);
    }

    #[rstest]
    #[case(vec![Action::Reduce, Action::Reduce], 1)]
    #[case(vec![Action::gen_token("a"), Action::gen_token("b")], 1)]
    #[case(vec![Action::ApplyRule(rule("Leaf", &[])), Action::gen_token("x")], 1)]
    fn empty_frontier(#[case] actions: Vec<Action>, #[case] step: usize) {
        match linearize(&actions, &OpenNodes(&[])) {
            Err(LinearizeError::EmptyFrontier { step: s, .. }) => assert_eq!(s, step),
            Ok(out) => panic!("expected an error, got {:?}", out),
        }
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![Action::Reduce])]
    #[case(vec![Action::ApplyRule(rule("Root", &[("a", Cardinality::Multiple)])), Action::Reduce])]
    fn channels_have_equal_length(#[case] actions: Vec<Action>) {
        let out = linearize(&actions, &OpenNodes(&["a*"])).unwrap();
        assert_eq!(out.len(), actions.len());
        assert_eq!(out.nodes.len(), actions.len());
        assert_eq!(out.tokens.len(), actions.len());
        assert_eq!(out.steps().len(), actions.len());
    }

    #[test]
    fn labels_display() {
        assert_eq!(ActionLabel::Reduce.to_string(), "Reduce");
        assert_eq!(ActionLabel::Token("ci0".into()).to_string(), "ci0");
        assert_eq!(
            ActionLabel::Rule(rule("R", &[("a", Cardinality::Multiple)])).to_string(),
            "t -> R(a* f0)"
        );
    }

    #[test]
    fn only_tokens_have_a_token() {
        assert_eq!(ActionLabel::Token("ci0".into()).as_token(), Some("ci0"));
        assert_eq!(ActionLabel::Reduce.as_token(), None);
        assert_eq!(
            ActionLabel::Rule(rule("R", &[("a", Cardinality::Single)])).as_token(),
            None
        );
    }
}
