// Tests for the frontier scheduler against an in-memory extraction service

use futures::future::BoxFuture;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use wikigraph_scanner::error::Result;
use wikigraph_scanner::{
    Crawler, ExtractionRequest, ExtractionResponse, Extractor, NoPacing, Pacer, PageRecord,
    PauseReason, ScanError,
};

const WIKI: &str = "https://en.wikipedia.org/wiki/";

fn article(slug: &str) -> String {
    format!("{}{}", WIKI, slug)
}

/// Serves canned pages keyed by URL. Unknown URLs and URLs listed in
/// `failing` answer with an extraction error.
#[derive(Default)]
struct FakeWiki {
    pages: HashMap<String, serde_json::Value>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeWiki {
    fn page(mut self, slug: &str, title: &str, links: &[(&str, &str)]) -> Self {
        let link: Vec<serde_json::Value> = links
            .iter()
            .map(|(target, text)| json!({"href": article(target), "text": text}))
            .collect();
        self.pages.insert(
            article(slug),
            json!({
                "data": [
                    {"key": "Article title", "results": [{"text": title}]},
                    {"key": "Article introduction", "results": [{"text": format!("About {}", title)}]},
                    {"key": "Key concepts", "results": [{"text": "concepts"}]}
                ],
                "link": link
            }),
        );
        self
    }

    fn raw(mut self, slug: &str, value: serde_json::Value) -> Self {
        self.pages.insert(article(slug), value);
        self
    }

    fn failing(mut self, slug: &str) -> Self {
        self.failing.insert(article(slug));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Extractor for FakeWiki {
    fn extract<'a>(
        &'a self,
        request: &'a ExtractionRequest,
    ) -> BoxFuture<'a, Result<ExtractionResponse>> {
        self.calls.lock().unwrap().push(request.url.clone());
        Box::pin(async move {
            if self.failing.contains(&request.url) {
                return Err(ScanError::ExtractionError(format!("timeout for {}", request.url)));
            }
            match self.pages.get(&request.url) {
                Some(value) => Ok(serde_json::from_value(value.clone())?),
                None => Err(ScanError::ExtractionError("no content".to_string())),
            }
        })
    }
}

/// Remembers every pause instead of sleeping.
#[derive(Default)]
struct RecordingPacer {
    pauses: Mutex<Vec<PauseReason>>,
}

impl RecordingPacer {
    fn count(&self, reason: PauseReason) -> usize {
        self.pauses.lock().unwrap().iter().filter(|r| **r == reason).count()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, reason: PauseReason) -> BoxFuture<'_, ()> {
        self.pauses.lock().unwrap().push(reason);
        Box::pin(async {})
    }
}

fn crawler(wiki: Arc<FakeWiki>, max_depth: usize, max_links: usize) -> Crawler {
    Crawler::new(wiki)
        .with_pacer(Arc::new(NoPacing))
        .with_max_depth(max_depth)
        .with_max_links(max_links)
}

fn slugs(records: &[PageRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.url.trim_start_matches(WIKI).to_string())
        .collect()
}

/// Seed -> A, B, C; A -> B, D; B -> Seed, E; D -> F
fn small_wiki() -> FakeWiki {
    FakeWiki::default()
        .page("Seed", "Seed", &[("A", "a"), ("B", "b"), ("C", "c")])
        .page("A", "A", &[("B", "b"), ("D", "d")])
        .page("B", "B", &[("Seed", "seed"), ("E", "e")])
        .page("C", "C", &[])
        .page("D", "D", &[("F", "f")])
        .page("E", "E", &[])
        .page("F", "F", &[])
}

// ============================================================================
// Traversal properties
// ============================================================================

#[tokio::test]
async fn test_breadth_first_order() {
    let wiki = Arc::new(small_wiki());
    let results = crawler(wiki, 2, 5).crawl(&article("Seed")).await;

    assert_eq!(slugs(&results), vec!["Seed", "A", "B", "C", "D", "E"]);
    let depths: Vec<usize> = results.iter().map(|r| r.depth).collect();
    assert_eq!(depths, vec![0, 1, 1, 1, 2, 2]);
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let wiki = Arc::new(small_wiki());
    let results = crawler(wiki.clone(), 3, 5).crawl(&article("Seed")).await;

    let calls = wiki.calls();
    let unique: HashSet<&String> = calls.iter().collect();
    assert_eq!(calls.len(), unique.len(), "a URL was fetched twice: {:?}", calls);

    let urls: HashSet<&String> = results.iter().map(|r| &r.url).collect();
    assert_eq!(urls.len(), results.len());
}

#[tokio::test]
async fn test_depth_ceiling() {
    let wiki = Arc::new(small_wiki());
    let results = crawler(wiki.clone(), 1, 5).crawl(&article("Seed")).await;

    assert!(results.iter().all(|r| r.depth <= 1));
    assert_eq!(slugs(&results), vec!["Seed", "A", "B", "C"]);
    // pages at the last level are not expanded
    assert!(!wiki.calls().contains(&article("D")));
}

#[tokio::test]
async fn test_depth_zero_fetches_only_seed() {
    let wiki = Arc::new(small_wiki());
    let results = crawler(wiki.clone(), 0, 5).crawl(&article("Seed")).await;

    assert_eq!(slugs(&results), vec!["Seed"]);
    assert_eq!(wiki.calls().len(), 1);
}

#[tokio::test]
async fn test_fan_out_is_bounded() {
    let links: Vec<(String, String)> = (0..20).map(|i| (format!("Topic_{}", i), "topic".to_string())).collect();
    let link_refs: Vec<(&str, &str)> = links.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    let mut wiki = FakeWiki::default().page("Seed", "Seed", &link_refs);
    for (slug, _) in &links {
        wiki = wiki.page(slug, slug, &[]);
    }

    let results = crawler(Arc::new(wiki), 1, 4).crawl(&article("Seed")).await;

    let children: Vec<&PageRecord> = results.iter().filter(|r| r.depth == 1).collect();
    assert_eq!(children.len(), 4);
    assert_eq!(slugs(&results), vec!["Seed", "Topic_0", "Topic_1", "Topic_2", "Topic_3"]);
}

#[tokio::test]
async fn test_zero_links_per_page() {
    let wiki = Arc::new(small_wiki());
    let results = crawler(wiki, 3, 0).crawl(&article("Seed")).await;
    assert_eq!(slugs(&results), vec!["Seed"]);
}

#[tokio::test]
async fn test_self_link_not_followed() {
    let wiki = Arc::new(
        FakeWiki::default()
            .page("Seed", "Seed", &[("Seed", "Seed again"), ("A", "a")])
            .page("A", "A", &[]),
    );
    let results = crawler(wiki.clone(), 1, 5).crawl(&article("Seed")).await;

    assert_eq!(slugs(&results), vec!["Seed", "A"]);
    assert_eq!(wiki.calls().iter().filter(|u| **u == article("Seed")).count(), 1);
}

#[tokio::test]
async fn test_title_anchored_links_visited_first() {
    let wiki = Arc::new(
        FakeWiki::default()
            .page(
                "Machine_learning",
                "Machine learning",
                &[
                    ("Neural_network", "Neural networks"),
                    ("History_of_AI", "History"),
                    ("ML_algorithms", "Machine learning algorithms"),
                ],
            )
            .page("Neural_network", "Neural network", &[])
            .page("History_of_AI", "History of AI", &[])
            .page("ML_algorithms", "ML algorithms", &[]),
    );
    let results = crawler(wiki, 1, 2).crawl(&article("Machine_learning")).await;

    assert_eq!(
        slugs(&results),
        vec!["Machine_learning", "ML_algorithms", "Neural_network"]
    );
    assert_eq!(results[1].source_title.as_deref(), Some("Machine learning"));
    assert_eq!(results[1].source_url.as_deref(), Some(article("Machine_learning").as_str()));
}

// ============================================================================
// Eligibility and failures
// ============================================================================

#[tokio::test]
async fn test_ineligible_seed_yields_nothing() {
    let wiki = Arc::new(FakeWiki::default());
    let results = crawler(wiki.clone(), 2, 5).crawl("https://example.com/wiki/Thing").await;

    assert!(results.is_empty());
    assert!(wiki.calls().is_empty());
}

#[tokio::test]
async fn test_child_failure_is_isolated() {
    let wiki = Arc::new(small_wiki().failing("A"));
    let results = crawler(wiki.clone(), 2, 5).crawl(&article("Seed")).await;

    // A is dropped without a retry, its siblings and their children survive
    assert_eq!(slugs(&results), vec!["Seed", "B", "C", "E"]);
    assert_eq!(wiki.calls().iter().filter(|u| **u == article("A")).count(), 1);
    assert!(results.iter().all(|r| !r.is_retry));
}

#[tokio::test]
async fn test_seed_and_retry_failure_returns_empty() {
    let wiki = Arc::new(small_wiki().failing("Seed"));
    let results = crawler(wiki.clone(), 2, 5).crawl(&article("Seed")).await;

    assert!(results.is_empty());
    assert_eq!(wiki.calls(), vec![article("Seed"), article("Seed")]);
}

// ============================================================================
// Field defaults
// ============================================================================

#[tokio::test]
async fn test_missing_fields_use_sentinels() {
    let wiki = Arc::new(FakeWiki::default().raw(
        "Machine_learning",
        json!({
            "data": [{"key": "Article title", "results": []}],
            "link": []
        }),
    ));
    let results = crawler(wiki, 1, 5).crawl(&article("Machine_learning")).await;

    assert_eq!(results.len(), 1);
    let record = &results[0];
    assert_eq!(record.title, "Unknown Title");
    assert_eq!(record.introduction, "No introduction available");
    assert_eq!(record.key_concepts, "");
    assert_eq!(record.subject, "Machine learning");
    assert_eq!(record.depth, 0);
    assert!(!record.is_retry);
    assert!(record.source_url.is_none());
}

#[tokio::test]
async fn test_null_link_list_keeps_page() {
    let wiki = Arc::new(FakeWiki::default().raw(
        "Machine_learning",
        json!({
            "data": [{"key": "Article title", "results": [{"text": "Machine learning"}]}],
            "link": null
        }),
    ));
    let results = crawler(wiki, 1, 5).crawl(&article("Machine_learning")).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Machine learning");
    assert!(!results[0].is_retry);
}

#[tokio::test]
async fn test_null_results_on_child_keeps_page() {
    let wiki = Arc::new(
        FakeWiki::default()
            .page("Seed", "Seed", &[("A", "a")])
            .raw(
                "A",
                json!({
                    "data": [
                        {"key": "Article title", "results": null},
                        {"key": "Article introduction", "results": [{"text": "About A"}]}
                    ],
                    "link": []
                }),
            ),
    );
    let results = crawler(wiki, 1, 5).crawl(&article("Seed")).await;

    assert_eq!(slugs(&results), vec!["Seed", "A"]);
    assert_eq!(results[1].title, "Unknown Title");
    assert_eq!(results[1].introduction, "About A");
}

// ============================================================================
// Pacing
// ============================================================================

#[tokio::test]
async fn test_pause_only_after_expanded_pages() {
    let pacer = Arc::new(RecordingPacer::default());
    let results = Crawler::new(Arc::new(small_wiki()))
        .with_pacer(pacer.clone())
        .with_max_depth(1)
        .with_max_links(5)
        .crawl(&article("Seed"))
        .await;

    assert_eq!(results.len(), 4);
    // the seed is expanded, its children sit at the ceiling
    assert_eq!(pacer.count(PauseReason::BetweenRequests), 1);
    assert_eq!(pacer.count(PauseReason::BeforeRetry), 0);
}

#[tokio::test]
async fn test_pause_count_grows_with_expanded_levels() {
    let pacer = Arc::new(RecordingPacer::default());
    Crawler::new(Arc::new(small_wiki()))
        .with_pacer(pacer.clone())
        .with_max_depth(2)
        .with_max_links(5)
        .crawl(&article("Seed"))
        .await;

    // Seed, A, B and C are expanded; D and E are not
    assert_eq!(pacer.count(PauseReason::BetweenRequests), 4);
}

#[tokio::test]
async fn test_failed_seed_pauses_before_retry_only() {
    let pacer = Arc::new(RecordingPacer::default());
    Crawler::new(Arc::new(small_wiki().failing("Seed")))
        .with_pacer(pacer.clone())
        .with_max_depth(2)
        .crawl(&article("Seed"))
        .await;

    assert_eq!(*pacer.pauses.lock().unwrap(), vec![PauseReason::BeforeRetry]);
}
