//! Corpus reading, batching and padding.
mod batch;
mod corpus;
mod pad;

pub use batch::{batch_iter, linearize_corpus, Batch, BatchConfig, BatchError, BatchIter, Example};
pub use corpus::{
    read_corpus, read_corpus_from, save_sents, write_sents, Corpus, CorpusError, Tokenizer,
    WordTokenizer,
};
pub use pad::{pad_sents, pad_to_array};
