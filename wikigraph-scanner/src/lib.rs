pub mod client;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod frontier;
pub mod links;
pub mod pacing;
pub mod result;

pub use client::{ClientConfig, ScrapeClient};
pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use extract::{ExtractionProfile, ExtractionRequest, ExtractionResponse, Extractor, PageExtract};
pub use frontier::Frontier;
pub use links::LinkFilter;
pub use pacing::{FixedDelayPacer, NoPacing, PauseReason, Pacer};
pub use result::{FrontierEntry, LinkCandidate, PageRecord};
