//! Cache of compiled template rules, keyed by delimiter configuration.

use crate::delimiters::Delimiters;
use crate::error::ConfigError;
use crate::template::{TemplateLexer, TemplateRules};
use indexmap::IndexMap;
use log::debug;
use rustc_hash::FxBuildHasher;
use std::sync::{Arc, PoisonError, RwLock};

type Entries = IndexMap<Delimiters, Arc<TemplateRules>, FxBuildHasher>;

/// Compiled [`TemplateRules`] shared between lexing sessions.
///
/// Owned by whatever builds the template environment. Lookups take a read
/// lock; a miss compiles outside the lock and then inserts only if no other
/// thread got there first. With a capacity set, the oldest configuration is
/// evicted to make room.
#[derive(Debug, Default)]
pub struct LexerCache {
    capacity: Option<usize>,
    entries: RwLock<Entries>,
}

impl LexerCache {
    /// Creates an unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache holding at most `capacity` configurations (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            entries: RwLock::default(),
        }
    }

    /// Returns the compiled rules for `delimiters`, compiling them on first use.
    pub fn get(&self, delimiters: &Delimiters) -> Result<Arc<TemplateRules>, ConfigError> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(rules) = entries.get(delimiters) {
                return Ok(Arc::clone(rules));
            }
        }

        debug!("template rules cache miss for {delimiters:?}");
        let compiled = Arc::new(TemplateRules::compile(delimiters.clone())?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(rules) = entries.get(delimiters) {
            return Ok(Arc::clone(rules));
        }
        if let Some(capacity) = self.capacity {
            while entries.len() >= capacity {
                let Some((evicted, _)) = entries.shift_remove_index(0) else {
                    break;
                };
                debug!("evicting template rules for {evicted:?}");
            }
        }
        entries.insert(delimiters.clone(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Tokenizes `source` with the rules for `delimiters`.
    pub fn tokenize<'s>(
        &self,
        delimiters: &Delimiters,
        source: &'s str,
    ) -> Result<TemplateLexer<'s>, ConfigError> {
        Ok(TemplateLexer::new(self.get(delimiters)?, source))
    }

    /// Returns the number of cached configurations.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached configuration. Lexers already running keep their rules.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
