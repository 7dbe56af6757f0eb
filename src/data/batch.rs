//! Mini-batches of linearized examples.
use super::Corpus;
use crate::asdl::AsdlError;
use crate::lang::{Frontend, Language, TargetError};
use crate::linearize::{linearize, ActionLabel, LinearizeError, Linearized};
use crate::Prng;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use thiserror::Error;

/// A tokenized source sentence and its linearized target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    /// Position of the example in its corpus.
    pub index: usize,
    pub src: Vec<String>,
    pub target: Linearized,
}

/// Co-indexed examples sorted by decreasing source length.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    /// Corpus index of each example.
    pub indices: Vec<usize>,
    pub src_sents: Vec<Vec<String>>,
    pub tgt_nodes: Vec<Vec<String>>,
    pub tgt_tokens: Vec<Vec<String>>,
    pub tgt_actions: Vec<Vec<ActionLabel>>,
}

impl Batch {
    /// Build a batch from examples, stably sorting them by decreasing source length.
    pub fn from_examples(mut examples: Vec<Example>) -> Self {
        examples.sort_by(|a, b| b.src.len().cmp(&a.src.len()));
        let mut batch = Self::default();
        for example in examples {
            batch.indices.push(example.index);
            batch.src_sents.push(example.src);
            batch.tgt_nodes.push(example.target.nodes);
            batch.tgt_tokens.push(example.target.tokens);
            batch.tgt_actions.push(example.target.actions);
        }
        batch
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Length of the longest target action sequence.
    pub fn max_tgt_len(&self) -> usize {
        self.tgt_actions.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Error preparing batches.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch size must be positive")]
    ZeroBatchSize,
    #[error("{src} source sentences but {tgt} target sentences")]
    LengthMismatch { src: usize, tgt: usize },
    #[error("error building the language front end")]
    Frontend(#[from] AsdlError),
    #[error("example {index}: {source}")]
    Target { index: usize, source: TargetError },
    #[error("example {index}: {source}")]
    Linearize { index: usize, source: LinearizeError },
}

/// Batching configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Target language name.
    pub language: String,
    /// Maximum number of examples per batch.
    pub batch_size: usize,
    /// Randomly permute the examples before batching.
    pub shuffle: bool,
    /// Seed of the shuffling random number generator.
    pub seed: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            language: Language::Lambda.name().into(),
            batch_size: 32,
            shuffle: false,
            seed: 1,
        }
    }
}

impl BatchConfig {
    /// Batch a corpus with a random number generator seeded from `seed`.
    ///
    /// # Errors
    /// See [`batch_iter`].
    pub fn batches(&self, corpus: Corpus) -> Result<BatchIter, BatchError> {
        let mut rng = Prng::seed_from_u64(self.seed);
        batch_iter(
            corpus.src_sents,
            &corpus.tgt_sents,
            &self.language,
            self.batch_size,
            self.shuffle,
            &mut rng,
        )
    }
}

/// Linearize the targets of a corpus.
///
/// # Errors
/// If the number of sources and targets differ,
/// or if any target cannot be converted to actions or linearized.
pub fn linearize_corpus<S: AsRef<str>>(
    src_sents: Vec<Vec<String>>,
    tgt_sents: &[S],
    frontend: &dyn Frontend,
) -> Result<Vec<Example>, BatchError> {
    if src_sents.len() != tgt_sents.len() {
        return Err(BatchError::LengthMismatch {
            src: src_sents.len(),
            tgt: tgt_sents.len(),
        });
    }
    src_sents
        .into_iter()
        .zip(tgt_sents)
        .enumerate()
        .map(|(index, (src, tgt))| {
            let actions = frontend
                .actions(tgt.as_ref())
                .map_err(|source| BatchError::Target { index, source })?;
            let target = linearize(&actions, frontend.grammar())
                .map_err(|source| BatchError::Linearize { index, source })?;
            Ok(Example { index, src, target })
        })
        .collect()
}

/// Linearize and batch a parallel corpus.
///
/// Unsupported languages are logged and produce no batches.
///
/// # Args
/// * `src_sents` - Tokenized source sentences.
/// * `tgt_sents` - Target sentences in `language`.
/// * `language` - Target language name.
/// * `batch_size` - Maximum examples per batch.
/// * `shuffle` - Whether to randomly permute the examples before chunking.
/// * `rng` - Random number generator used to shuffle.
///
/// # Errors
/// If `batch_size` is zero, the corpus sides differ in length, or any target fails to parse or
/// linearize.
pub fn batch_iter<S, R>(
    src_sents: Vec<Vec<String>>,
    tgt_sents: &[S],
    language: &str,
    batch_size: usize,
    shuffle: bool,
    rng: &mut R,
) -> Result<BatchIter, BatchError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let language: Language = match language.parse() {
        Ok(language) => language,
        Err(err) => {
            warn!("{}", err);
            return Ok(BatchIter::empty());
        }
    };
    if batch_size == 0 {
        return Err(BatchError::ZeroBatchSize);
    }
    let frontend = language.frontend()?;
    let examples = linearize_corpus(src_sents, tgt_sents, frontend.as_ref())?;
    BatchIter::new(examples, batch_size, shuffle, rng)
}

/// Iterator over the batches of a fixed set of examples.
///
/// The example order is fixed at construction; each example is moved into exactly one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchIter {
    /// Examples not yet batched.
    examples: Vec<Option<Example>>,
    /// Order in which `examples` are chunked into batches.
    order: Vec<usize>,
    batch_size: usize,
    /// Offset into `order` of the next batch.
    offset: usize,
}

impl BatchIter {
    /// Create a batch iterator.
    ///
    /// # Args
    /// * `examples` - Examples to batch.
    /// * `batch_size` - Maximum examples per batch. Only the last batch may be smaller.
    /// * `shuffle` - Whether to randomly permute the examples before chunking.
    /// * `rng` - Random number generator used to shuffle.
    ///
    /// # Errors
    /// If `batch_size` is zero.
    pub fn new<R: Rng + ?Sized>(
        examples: Vec<Example>,
        batch_size: usize,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<Self, BatchError> {
        if batch_size == 0 {
            return Err(BatchError::ZeroBatchSize);
        }
        let mut order: Vec<usize> = (0..examples.len()).collect();
        if shuffle {
            order.shuffle(rng);
        }
        let iter = Self {
            examples: examples.into_iter().map(Some).collect(),
            order,
            batch_size,
            offset: 0,
        };
        info!(
            "{} examples in {} batches of up to {}",
            iter.examples.len(),
            iter.len(),
            batch_size
        );
        Ok(iter)
    }

    /// An iterator with no batches.
    pub const fn empty() -> Self {
        Self {
            examples: Vec::new(),
            order: Vec::new(),
            batch_size: 1,
            offset: 0,
        }
    }

    /// Total number of examples, batched or not.
    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }
}

impl Iterator for BatchIter {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.order.len() {
            return None;
        }
        let end = (self.offset + self.batch_size).min(self.order.len());
        let examples = &mut self.examples;
        let chunk: Vec<Example> = self.order[self.offset..end]
            .iter()
            .filter_map(|&i| examples[i].take())
            .collect();
        self.offset = end;
        Some(Batch::from_examples(chunk))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.order.len() - self.offset;
        let num_batches =
            remaining / self.batch_size + usize::from(remaining % self.batch_size != 0);
        (num_batches, Some(num_batches))
    }
}

impl ExactSizeIterator for BatchIter {}

impl FusedIterator for BatchIter {}
