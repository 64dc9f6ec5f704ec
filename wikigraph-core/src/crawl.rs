use crate::graph::{GraphMode, KnowledgeGraph, build_knowledge_graph};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::warn;
use url::Url;
use wikigraph_scanner::{
    Crawler, Extractor, LinkFilter, PageRecord, Pacer, ProgressCallback, ScanError,
};

pub const DEFAULT_SEED_URL: &str = "https://en.wikipedia.org/wiki/Machine_learning";

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub seed_url: String,
    pub max_depth: usize,
    pub max_links_per_page: usize,
    pub graph_mode: GraphMode,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            max_depth: 1,
            max_links_per_page: 5,
            graph_mode: GraphMode::DepthAdjacency,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Everything a report needs about one finished run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub seed_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub max_depth: usize,
    pub max_links_per_page: usize,
    pub graph_mode: GraphMode,
    pub pages: Vec<PageRecord>,
    pub graph: KnowledgeGraph,
}

/// Check that the seed parses as an absolute http(s) URL
pub fn validate_seed_url(seed_url: &str) -> Result<Url, ScanError> {
    let url = Url::parse(seed_url)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed_url, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScanError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            seed_url, other
        ))),
    }
}

/// Execute a crawl with the given options, then derive the knowledge graph
pub async fn execute_crawl(
    options: CrawlOptions,
    extractor: Arc<dyn Extractor>,
    pacer: Arc<dyn Pacer>,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome, ScanError> {
    let CrawlOptions {
        seed_url,
        max_depth,
        max_links_per_page,
        graph_mode,
        show_progress_bars,
    } = options;

    validate_seed_url(&seed_url)?;

    let link_filter = LinkFilter::default();
    if !link_filter.is_eligible(&seed_url) {
        warn!("Seed {} is not an eligible article URL, nothing will be crawled", seed_url);
        if let Some(ref callback) = progress_callback {
            callback(format!("[!] Skipping non-article URL: {}", seed_url));
        }
    }

    // Set up single spinner for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| ScanError::Other(e.to_string()))?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let count_clone = processed_count.clone();
    let pb_clone = progress_bar.clone();
    let message_callback = progress_callback.clone();
    let internal_progress_callback: ProgressCallback = Arc::new(move |depth: usize, url: String| {
        let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref pb) = pb_clone {
            pb.set_message(format!("[{}] depth {}: {}", count, depth, url));
        }
        if let Some(ref callback) = message_callback {
            callback(format!("Crawling (depth {}): {}", depth, url));
        }
    });

    let crawler = Crawler::new(extractor)
        .with_max_depth(max_depth)
        .with_max_links(max_links_per_page)
        .with_link_filter(link_filter)
        .with_pacer(pacer)
        .with_progress_callback(internal_progress_callback);

    let started_at = Utc::now();
    let pages = crawler.crawl(&seed_url).await;
    let finished_at = Utc::now();

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!(
            "Crawl complete! {} pages fetched, {} collected",
            total,
            pages.len()
        ));
    }

    let graph = build_knowledge_graph(&pages, graph_mode);

    Ok(CrawlOutcome {
        seed_url,
        started_at,
        finished_at,
        max_depth,
        max_links_per_page,
        graph_mode,
        pages,
        graph,
    })
}
