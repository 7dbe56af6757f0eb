//! Command-line interface
mod config;
mod options;

pub use options::Options;

/// Update a value in-place from a source of overrides.
pub trait Update<T> {
    fn update(&mut self, source: T);
}

/// Apply an [`Update`] to an owned value and return it.
pub trait WithUpdate<T> {
    #[must_use]
    fn with_update(self, source: T) -> Self;
}

impl<T, U: Update<T>> WithUpdate<T> for U {
    fn with_update(mut self, source: T) -> Self {
        self.update(source);
        self
    }
}
