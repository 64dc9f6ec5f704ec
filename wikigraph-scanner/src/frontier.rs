use crate::result::FrontierEntry;
use std::collections::{HashSet, VecDeque};

/// FIFO queue of pending pages plus the set of URLs already taken.
///
/// Entries come out in the order they went in, so every page at depth `d`
/// is dequeued before any page at depth `d + 1` that was enqueued after it.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frontier holding only the seed at depth 0.
    pub fn with_seed(url: &str) -> Self {
        let mut frontier = Self::new();
        frontier.push(FrontierEntry::seed(url));
        frontier
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.queue.push_back(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = FrontierEntry>) {
        self.queue.extend(entries);
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns false if the URL had already been marked.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
