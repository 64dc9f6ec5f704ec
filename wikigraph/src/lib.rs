pub mod commands;
pub mod handlers;

pub use handlers::{CrawlConfig, handle_crawl, resolve_output_path};

// Re-export crawl functionality from wikigraph-core
pub use wikigraph_core::crawl::{CrawlOptions, CrawlOutcome, CrawlProgressCallback, execute_crawl};
