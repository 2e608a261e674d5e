//! Validator traits and the explicit registry. Validators declare the
//! tables they read; the scheduler uses the declarations to place them
//! before or after the all-tables barrier.

use crate::feed::{GtfsFeed, GtfsTable};
use crate::notice::NoticeContainer;

/// A rule over a single loaded table. Runs as soon as its table is
/// loaded, in parallel with other files.
pub trait FileValidator: Send + Sync {
    fn name(&self) -> &'static str;

    /// The table this validator reads.
    fn file(&self) -> &'static str;

    fn validate(&self, table: &GtfsTable, notices: &mut NoticeContainer);
}

/// A rule over several tables. Runs after every table is loaded.
pub trait CrossFileValidator: Send + Sync {
    fn name(&self) -> &'static str;

    /// The tables this validator reads.
    fn files(&self) -> &'static [&'static str];

    fn validate(&self, feed: &GtfsFeed, notices: &mut NoticeContainer);
}

/// Explicit registration point for rules; replaces classpath scanning in
/// favor of a boot-time list.
#[derive(Default)]
pub struct ValidatorRegistry {
    file_validators: Vec<Box<dyn FileValidator>>,
    cross_file_validators: Vec<Box<dyn CrossFileValidator>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_file<V>(&mut self, validator: V)
    where
        V: FileValidator + 'static,
    {
        self.file_validators.push(Box::new(validator));
    }

    pub fn register_cross<V>(&mut self, validator: V)
    where
        V: CrossFileValidator + 'static,
    {
        self.cross_file_validators.push(Box::new(validator));
    }

    /// Single-file validators whose declared input is `file_name`.
    pub fn file_validators_for<'a>(
        &'a self,
        file_name: &'a str,
    ) -> impl Iterator<Item = &'a dyn FileValidator> {
        self.file_validators
            .iter()
            .map(Box::as_ref)
            .filter(move |validator| validator.file().eq_ignore_ascii_case(file_name))
    }

    pub fn cross_file_validators(&self) -> impl Iterator<Item = &dyn CrossFileValidator> {
        self.cross_file_validators.iter().map(Box::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.file_validators.is_empty() && self.cross_file_validators.is_empty()
    }

    pub fn len(&self) -> usize {
        self.file_validators.len() + self.cross_file_validators.len()
    }
}
