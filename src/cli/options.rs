//! Command-line options
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    version,
    author,
    about,
    after_help = "Options given on the command line override those in --config."
)]
pub struct Options {
    /// Corpus file with one `source<TAB>target` example per line
    pub corpus: PathBuf,

    #[arg(long)]
    /// JSON batching configuration file
    pub config: Option<PathBuf>,

    #[arg(long, help_heading = "BATCH OPTIONS")]
    /// Target language
    pub language: Option<String>,

    #[arg(long, help_heading = "BATCH OPTIONS")]
    /// Maximum number of examples per batch
    pub batch_size: Option<usize>,

    #[arg(long, help_heading = "BATCH OPTIONS")]
    /// Shuffle the examples before batching
    pub shuffle: bool,

    #[arg(long, help_heading = "BATCH OPTIONS")]
    /// Shuffling random seed
    pub seed: Option<u64>,

    #[arg(long, short, help_heading = "OUTPUT OPTIONS")]
    /// Write batches to this file instead of stdout
    pub output: Option<PathBuf>,

    #[arg(long, help_heading = "OUTPUT OPTIONS")]
    /// Save the action labels of each example, one example per line
    pub actions_out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Options::command().debug_assert();
    }

    #[test]
    fn parse_all() {
        let opts = Options::try_parse_from([
            "seq2tree",
            "train.tsv",
            "--config",
            "batch.json",
            "--language",
            "lambda",
            "--batch-size",
            "8",
            "--shuffle",
            "--seed",
            "3",
            "-o",
            "out.jsonl",
            "--actions-out",
            "actions.txt",
        ])
        .unwrap();
        assert_eq!(opts.corpus, PathBuf::from("train.tsv"));
        assert_eq!(opts.config, Some(PathBuf::from("batch.json")));
        assert_eq!(opts.language.as_deref(), Some("lambda"));
        assert_eq!(opts.batch_size, Some(8));
        assert!(opts.shuffle);
        assert_eq!(opts.seed, Some(3));
        assert_eq!(opts.output, Some(PathBuf::from("out.jsonl")));
        assert_eq!(opts.actions_out, Some(PathBuf::from("actions.txt")));
    }

    #[test]
    fn corpus_is_required() {
        assert!(Options::try_parse_from(["seq2tree"]).is_err());
    }
}
