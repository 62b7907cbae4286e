//! Deterministic suffix and id source.

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicU64, Ordering},
};

use handles_types::SuffixSource;
use parking_lot::Mutex;

/// A [`SuffixSource`] that replays a fixed sequence.
///
/// Once the script runs out the last value repeats. An empty script yields
/// the range minimum. Ids are `id-1`, `id-2`, ...
#[derive(Debug, Default)]
pub struct ScriptedSuffixSource {
    script: Mutex<VecDeque<u32>>,
    last: Mutex<Option<u32>>,
    ids: AtomicU64,
}

impl ScriptedSuffixSource {
    /// Creates a source replaying `suffixes` in order.
    pub fn new(suffixes: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: Mutex::new(suffixes.into_iter().collect()),
            last: Mutex::new(None),
            ids: AtomicU64::new(0),
        }
    }

    /// Appends more values to the script.
    pub fn push(&self, suffix: u32) {
        self.script.lock().push_back(suffix);
    }

    /// Number of scripted values not yet drawn.
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl SuffixSource for ScriptedSuffixSource {
    fn draw_suffix(&self, min: u32, _max: u32) -> u32 {
        let mut last = self.last.lock();
        let next = self.script.lock().pop_front().or(*last).unwrap_or(min);
        *last = Some(next);
        next
    }

    fn opaque_id(&self) -> String {
        format!("id-{}", self.ids.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
