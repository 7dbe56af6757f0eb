use super::{Options, Update, WithUpdate};
use crate::data::BatchConfig;

impl From<&Options> for BatchConfig {
    fn from(opts: &Options) -> Self {
        Self::default().with_update(opts)
    }
}

impl Update<&Options> for BatchConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(ref language) = opts.language {
            self.language = language.clone();
        }
        if let Some(batch_size) = opts.batch_size {
            self.batch_size = batch_size;
        }
        if opts.shuffle {
            self.shuffle = true;
        }
        if let Some(seed) = opts.seed {
            self.seed = seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Options {
        Options::try_parse_from(["seq2tree", "corpus.tsv"].iter().chain(args)).unwrap()
    }

    #[test]
    fn no_overrides_is_default() {
        assert_eq!(BatchConfig::from(&parse(&[])), BatchConfig::default());
    }

    #[rstest]
    #[case(&["--batch-size", "5"], BatchConfig { batch_size: 5, ..BatchConfig::default() })]
    #[case(&["--seed", "11"], BatchConfig { seed: 11, ..BatchConfig::default() })]
    #[case(&["--shuffle"], BatchConfig { shuffle: true, ..BatchConfig::default() })]
    #[case(&["--language", "python"], BatchConfig { language: "python".into(), ..BatchConfig::default() })]
    fn override_default(#[case] args: &[&str], #[case] expected: BatchConfig) {
        assert_eq!(BatchConfig::from(&parse(args)), expected);
    }

    #[test]
    fn unset_options_keep_loaded_values() {
        let loaded = BatchConfig {
            language: "lambda".into(),
            batch_size: 2,
            shuffle: true,
            seed: 42,
        };
        let config = loaded.clone().with_update(&parse(&["--batch-size", "9"]));
        assert_eq!(
            config,
            BatchConfig {
                batch_size: 9,
                ..loaded
            }
        );
    }
}
