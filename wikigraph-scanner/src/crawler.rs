use crate::extract::{
    ExtractionProfile, Extractor, INTRODUCTION_PROMPT, KEY_CONCEPTS_PROMPT, PageExtract,
    TEXT_PROMPT, TITLE_PROMPT,
};
use crate::frontier::Frontier;
use crate::links::LinkFilter;
use crate::pacing::{FixedDelayPacer, Pacer, PauseReason};
use crate::result::{FrontierEntry, NO_INTRODUCTION, NO_TEXT, PageRecord, UNKNOWN_TITLE};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Called with `(depth, url)` right before a page is fetched.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Characters of article text kept on a retried seed page
pub const RETRY_PREVIEW_CHARS: usize = 300;

/// Breadth-first, depth-bounded crawler. Pages are fetched one at a time
/// through the configured [`Extractor`]; a failing page never stops the run.
pub struct Crawler {
    extractor: Arc<dyn Extractor>,
    pacer: Arc<dyn Pacer>,
    link_filter: LinkFilter,
    profile: ExtractionProfile,
    retry_profile: ExtractionProfile,
    max_depth: usize,
    max_links_per_page: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            pacer: Arc::new(FixedDelayPacer::default()),
            link_filter: LinkFilter::default(),
            profile: ExtractionProfile::primary(),
            retry_profile: ExtractionProfile::retry(),
            max_depth: 2,
            max_links_per_page: 3,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.max_links_per_page = max_links;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_link_filter(mut self, link_filter: LinkFilter) -> Self {
        self.link_filter = link_filter;
        self
    }

    pub fn with_profile(mut self, profile: ExtractionProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_retry_profile(mut self, profile: ExtractionProfile) -> Self {
        self.retry_profile = profile;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawls from `seed_url` and returns one record per page collected,
    /// in visitation order.
    pub async fn crawl(&self, seed_url: &str) -> Vec<PageRecord> {
        info!(
            "Starting crawl of {} (max depth {}, {} links per page)",
            seed_url, self.max_depth, self.max_links_per_page
        );

        let mut frontier = Frontier::with_seed(seed_url);
        let mut results = Vec::new();

        while let Some(entry) = frontier.pop() {
            if frontier.is_visited(&entry.url) || entry.depth > self.max_depth {
                continue;
            }

            if !self.link_filter.is_eligible(&entry.url) {
                debug!("Skipping ineligible URL: {}", entry.url);
                continue;
            }

            frontier.mark_visited(&entry.url);

            if let Some(ref callback) = self.progress_callback {
                callback(entry.depth, entry.url.clone());
            }

            info!("Crawling (depth {}): {}", entry.depth, entry.url);

            let request = self.profile.request(&entry.url);
            match self.extractor.extract(&request).await {
                Ok(response) => {
                    let page = PageExtract::from_response(response);
                    let record = build_record(&entry, &page);
                    let title = record.title.clone();
                    results.push(record);

                    if entry.depth < self.max_depth {
                        let next = self.link_filter.select_links(
                            &page.links,
                            &entry.url,
                            &title,
                            entry.depth,
                            self.max_links_per_page,
                        );

                        info!("Following {} links from {}", next.len(), entry.url);
                        for child in &next {
                            debug!("  - {}", child.url);
                        }

                        frontier.extend(next);
                        self.pacer.pause(PauseReason::BetweenRequests).await;
                    }
                }
                Err(e) => {
                    warn!("Extraction failed for {}: {}", entry.url, e);

                    if entry.depth == 0
                        && let Some(record) = self.retry_seed(&entry).await
                    {
                        results.push(record);
                    }
                }
            }
        }

        info!(
            "Crawl complete. Collected {} pages, visited {}",
            results.len(),
            frontier.visited_count()
        );
        results
    }

    /// Second and last attempt at the seed page with the reduced profile.
    async fn retry_seed(&self, entry: &FrontierEntry) -> Option<PageRecord> {
        info!("Retrying seed URL {} with simplified parameters", entry.url);
        self.pacer.pause(PauseReason::BeforeRetry).await;

        let request = self.retry_profile.request(&entry.url);
        match self.extractor.extract(&request).await {
            Ok(response) => {
                let page = PageExtract::from_response(response);
                let title = page.field_or(TITLE_PROMPT, UNKNOWN_TITLE);
                let text = page.field_or(TEXT_PROMPT, NO_TEXT);

                info!("Retrieved content on retry for {}", entry.url);
                Some(PageRecord::from_retry(entry, title, &text, RETRY_PREVIEW_CHARS))
            }
            Err(e) => {
                error!("Retry also failed for {}: {}", entry.url, e);
                None
            }
        }
    }
}

fn build_record(entry: &FrontierEntry, page: &PageExtract) -> PageRecord {
    PageRecord::new(
        entry,
        page.field_or(TITLE_PROMPT, UNKNOWN_TITLE),
        page.field_or(INTRODUCTION_PROMPT, NO_INTRODUCTION),
        page.field_or(KEY_CONCEPTS_PROMPT, ""),
    )
}
