use std::{
    collections::VecDeque,
    sync::{Arc, PoisonError, RwLock},
};

/// Maximum number of scripts kept in the recent list.
pub const MAX_RECENT_SCRIPTS: usize = 5;

/// Most-recently-opened script list, shared by all panels of a session.
///
/// Cloning the handle shares the underlying list. Entries are distinct and
/// ordered most-recent-first; the list never holds more than
/// [`MAX_RECENT_SCRIPTS`] entries.
#[derive(Clone, Debug, Default)]
pub struct RecentScripts {
    inner: Arc<RwLock<VecDeque<String>>>,
}

impl RecentScripts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list from entries ordered most-recent-first. Duplicates keep
    /// their first occurrence and the tail beyond the limit is dropped.
    pub fn from_list<I, S>(scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let recent = Self::new();
        recent.replace(scripts);
        recent
    }

    /// Replaces the whole list, applying the same rules as [`RecentScripts::from_list`].
    pub fn replace<I, S>(&self, scripts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = VecDeque::new();
        for script in scripts {
            let script = script.into();
            if !list.contains(&script) {
                list.push_back(script);
            }
        }
        list.truncate(MAX_RECENT_SCRIPTS);
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = list;
    }

    /// Moves `filename` to the front, inserting it if needed.
    pub fn push_front(&self, filename: &str) {
        let mut list = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        list.retain(|script| script != filename);
        list.push_front(filename.to_owned());
        list.truncate(MAX_RECENT_SCRIPTS);
    }

    /// The first (most recent) script accepted by `predicate`.
    pub fn first_matching(&self, predicate: impl Fn(&str) -> bool) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|script| predicate(script))
            .cloned()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
