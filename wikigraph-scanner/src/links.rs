use crate::result::{FrontierEntry, LinkCandidate};
use std::collections::HashSet;
use tracing::debug;

/// Decides which URLs are articles worth visiting.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkFilter {
    /// Every eligible URL contains this marker
    pub required_marker: String,
    /// A URL containing any of these is never followed
    pub excluded_patterns: Vec<String>,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self {
            required_marker: "en.wikipedia.org/wiki/".to_string(),
            excluded_patterns: [
                "File:",
                "Special:",
                "Talk:",
                "Help:",
                "Category:",
                "Wikipedia:",
                "Template:",
                "Portal:",
                "List_of_",
                "#",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
        }
    }
}

impl LinkFilter {
    pub fn new(required_marker: impl Into<String>, excluded_patterns: Vec<String>) -> Self {
        Self {
            required_marker: required_marker.into(),
            excluded_patterns,
        }
    }

    /// Domain restriction applied to every dequeued URL.
    pub fn is_eligible(&self, url: &str) -> bool {
        url.contains(&self.required_marker)
    }

    fn is_excluded(&self, url: &str) -> bool {
        self.excluded_patterns.iter().any(|p| url.contains(p.as_str()))
    }

    /// Filters, deduplicates, ranks and caps the links found on one page.
    ///
    /// Links whose anchor text contains `current_title` (case-insensitive)
    /// move to the front; order within both groups is kept. The result holds
    /// at most `max_links` entries, each one level deeper than the parent.
    pub fn select_links(
        &self,
        links: &[LinkCandidate],
        current_url: &str,
        current_title: &str,
        parent_depth: usize,
        max_links: usize,
    ) -> Vec<FrontierEntry> {
        let mut seen = HashSet::new();
        let unique: Vec<&LinkCandidate> = links
            .iter()
            .filter(|link| {
                let keep = self.is_eligible(&link.url)
                    && !self.is_excluded(&link.url)
                    && link.url != current_url;
                if !keep {
                    debug!("  -> Dropping link {}", link.url);
                }
                keep
            })
            .filter(|link| seen.insert(link.url.as_str()))
            .collect();

        let title = current_title.to_lowercase();
        let (related, others): (Vec<&LinkCandidate>, Vec<&LinkCandidate>) = unique
            .into_iter()
            .partition(|link| link.anchor_text.to_lowercase().contains(&title));

        related
            .into_iter()
            .chain(others)
            .take(max_links)
            .map(|link| FrontierEntry {
                url: link.url.clone(),
                depth: parent_depth + 1,
                source_title: Some(current_title.to_string()),
                source_url: Some(current_url.to_string()),
            })
            .collect()
    }
}
