//! Grammar-action linearization and batching for sequence-to-tree semantic parsers.
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::for_kv_map)] // part of warn(clippy::all), specifically style?
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)] // also triggered by macro expansions
pub mod asdl;
pub mod cli;
pub mod data;
mod error;
pub mod lang;
pub mod linearize;
pub mod metrics;
pub mod transition;
pub mod utils;

pub use asdl::{AbstractSyntaxTree, AsdlGrammar, Cardinality, Field, Grammar, Production};
pub use data::{batch_iter, Batch, BatchConfig, BatchIter, Example};
pub use error::Seq2TreeError;
pub use lang::{Frontend, Language};
pub use linearize::{linearize, ActionLabel, Linearized, PAD_TOKEN, START_NODE};
pub use transition::{Action, AsdlTransitionSystem};

/// Pseudo-random number generator used for shuffling.
pub type Prng = rand_chacha::ChaCha8Rng;
