//! Saving and loading JSON-serialized values.
use serde::{de::DeserializeOwned, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Serialize to a file or load from a serialized file.
pub trait SaveLoad {
    type SaveErr;
    type LoadErr;

    /// Serialize to a file.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Self::SaveErr>;

    /// Load from a file created by [`SaveLoad::save`].
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, Self::LoadErr>
    where
        Self: Sized;
}

#[derive(Debug, Error)]
pub enum SerdeSaveLoadError {
    #[error("file error {0}")]
    Io(#[from] std::io::Error),
    #[error("(de)serialization error {0}")]
    Serialize(#[from] serde_json::Error),
}

impl<T: Serialize + DeserializeOwned> SaveLoad for T {
    type SaveErr = SerdeSaveLoadError;
    type LoadErr = SerdeSaveLoadError;

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Self::SaveErr> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Self, Self::LoadErr>
    where
        Self: Sized,
    {
        let reader = BufReader::new(File::open(path)?);
        let this = serde_json::from_reader(reader)?;
        Ok(this)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BatchConfig;
    use std::env;
    use std::fs;
    use std::process;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("seq2tree-{}-{}.json", process::id(), name))
    }

    #[test]
    fn save_then_load_config() {
        let path = temp_path("config");
        let config = BatchConfig {
            batch_size: 7,
            shuffle: true,
            seed: 99,
            ..BatchConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = BatchConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{"batch_size": 4}"#).unwrap();
        let loaded = BatchConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(
            loaded,
            BatchConfig {
                batch_size: 4,
                ..BatchConfig::default()
            }
        );
    }

    #[test]
    fn load_missing_file() {
        let result = BatchConfig::load(temp_path("does-not-exist"));
        assert!(matches!(result, Err(SerdeSaveLoadError::Io(_))));
    }

    #[test]
    fn load_invalid_json() {
        let path = temp_path("invalid");
        fs::write(&path, "{ batch_size: ").unwrap();
        let result = BatchConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(SerdeSaveLoadError::Serialize(_))));
    }
}
