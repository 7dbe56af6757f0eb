//! Tab-separated parallel corpora.
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Splits a source sentence into word tokens.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Word tokenizer in the style of Penn Treebank tokenization.
///
/// * Splits on whitespace.
/// * Brackets, quotes and `, ; : ! ?` are separate tokens,
///   except for `,` and `:` between digits (`1,000`, `10:30`).
/// * A period ending the sentence is a separate token.
/// * The clitics `n't 's 're 've 'll 'd 'm` are split from their word.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WordTokenizer;

const CLITICS: [&str; 7] = ["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

impl WordTokenizer {
    fn is_split_char(chars: &[char], i: usize) -> bool {
        match chars[i] {
            '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';' | '!' | '?' => true,
            ',' | ':' => {
                let digit_before = i > 0 && chars[i - 1].is_ascii_digit();
                let digit_after = chars.get(i + 1).map_or(false, char::is_ascii_digit);
                !(digit_before && digit_after)
            }
            _ => false,
        }
    }

    fn push_word(tokens: &mut Vec<String>, word: &str) {
        if word.is_empty() {
            return;
        }
        let lower = word.to_lowercase();
        for clitic in CLITICS {
            if lower.len() > clitic.len() && lower.ends_with(clitic) {
                let split = word.len() - clitic.len();
                if word.is_char_boundary(split) {
                    tokens.push(word[..split].to_string());
                    tokens.push(word[split..].to_string());
                    return;
                }
            }
        }
        tokens.push(word.to_string());
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for word in text.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            let mut current = String::new();
            for (i, &c) in chars.iter().enumerate() {
                if Self::is_split_char(&chars, i) {
                    Self::push_word(&mut tokens, &current);
                    current.clear();
                    tokens.push(c.to_string());
                } else {
                    current.push(c);
                }
            }
            Self::push_word(&mut tokens, &current);
        }

        // Sentence-final period
        if let Some(last) = tokens.last_mut() {
            if last.len() > 1 && last.ends_with('.') {
                last.pop();
                tokens.push(".".into());
            }
        }
        tokens
    }
}

/// Tokenized source sentences paired with raw target sentences.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Corpus {
    pub src_sents: Vec<Vec<String>>,
    pub tgt_sents: Vec<String>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.src_sents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src_sents.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("file error {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: missing tab-separated target sentence")]
    MissingTarget { line: usize },
}

/// Read a corpus file with one `source<TAB>target` example per line.
///
/// # Errors
/// If the file cannot be read or a line has no target field.
pub fn read_corpus<P: AsRef<Path>, T: Tokenizer + ?Sized>(
    path: P,
    tokenizer: &T,
) -> Result<Corpus, CorpusError> {
    let file = File::open(path)?;
    read_corpus_from(BufReader::new(file), tokenizer)
}

/// Read a corpus with one `source<TAB>target` example per line.
///
/// Sources are tokenized with `tokenizer`; targets are kept as is.
/// Fields after the target are ignored.
///
/// # Errors
/// If reading fails or a line has no target field.
pub fn read_corpus_from<R: BufRead, T: Tokenizer + ?Sized>(
    reader: R,
    tokenizer: &T,
) -> Result<Corpus, CorpusError> {
    let mut corpus = Corpus::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let mut fields = line.split('\t');
        let src = fields.next().unwrap_or_default();
        let tgt = fields
            .next()
            .ok_or(CorpusError::MissingTarget { line: i + 1 })?;
        corpus.src_sents.push(tokenizer.tokenize(src));
        corpus.tgt_sents.push(tgt.to_string());
    }
    Ok(corpus)
}

/// Write sentences one per line.
///
/// # Errors
/// If writing fails.
pub fn write_sents<W, I>(writer: W, sents: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut writer = BufWriter::new(writer);
    for sent in sents {
        writer.write_all(sent.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Save sentences to a file, one per line.
///
/// # Errors
/// If the file cannot be created or written.
pub fn save_sents<P, I>(sents: I, path: P) -> io::Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    write_sents(File::create(path)?, sents)
}
