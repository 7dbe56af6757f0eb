use clap::Parser;
use log::info;
use seq2tree::cli::{Options, WithUpdate};
use seq2tree::data::{read_corpus, save_sents, WordTokenizer};
use seq2tree::utils::SaveLoad;
use seq2tree::{BatchConfig, Seq2TreeError};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn run(opts: &Options) -> Result<(), Seq2TreeError> {
    let config = match opts.config {
        Some(ref path) => BatchConfig::load(path)?,
        None => BatchConfig::default(),
    }
    .with_update(opts);
    info!("{:?}", config);

    let corpus = read_corpus(&opts.corpus, &WordTokenizer)?;
    info!("read {} examples from {}", corpus.len(), opts.corpus.display());
    let batches = config.batches(corpus)?;

    let writer: Box<dyn Write> = match opts.output {
        Some(ref path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    let mut action_lines = Vec::new();
    for batch in batches {
        serde_json::to_writer(&mut writer, &batch)?;
        writer.write_all(b"\n")?;
        if opts.actions_out.is_some() {
            for (&index, actions) in batch.indices.iter().zip(&batch.tgt_actions) {
                let labels: Vec<String> = actions.iter().map(ToString::to_string).collect();
                action_lines.push((index, labels.join("\t")));
            }
        }
    }
    writer.flush()?;

    if let Some(ref path) = opts.actions_out {
        action_lines.sort_by_key(|&(index, _)| index);
        save_sents(action_lines.iter().map(|(_, line)| line), path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let opts = Options::parse();
    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            let mut source = err.source();
            while let Some(cause) = source {
                log::error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
