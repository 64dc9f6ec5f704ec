// Report generation from a finished crawl

use crate::crawl::CrawlOutcome;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use wikigraph_scanner::result::preview;

/// Characters of the introduction shown per page in the text report
const INTRO_EXCERPT_CHARS: usize = 250;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Dot,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "dot" | "graphviz" => Some(ReportFormat::Dot),
            _ => None,
        }
    }
}

pub fn render_report(outcome: &CrawlOutcome, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(outcome)),
        ReportFormat::Json => generate_json_report(outcome),
        ReportFormat::Dot => Ok(generate_dot_report(outcome)),
    }
}

pub fn generate_text_report(outcome: &CrawlOutcome) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push('\n');
    report.push_str("                      WIKIPEDIA KNOWLEDGE CRAWLER RESULTS\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Total articles crawled: {}\n", outcome.pages.len()));
    report.push_str(&format!("Seed article:           {}\n", outcome.seed_url));
    report.push_str(&format!(
        "Crawl time:             {}\n",
        outcome.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    let duration = outcome.finished_at - outcome.started_at;
    report.push_str(&format!("Duration:               {} seconds\n", duration.num_seconds()));
    report.push('\n');

    report.push_str(RULE);
    report.push('\n');
    report.push_str("ARTICLE SUMMARIES\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    if outcome.pages.is_empty() {
        report.push_str("  (no articles collected)\n\n");
    }

    for (idx, page) in outcome.pages.iter().enumerate() {
        let retry_marker = if page.is_retry { " [retry]" } else { "" };
        report.push_str(&format!(
            "{}. {} (Depth: {}){}\n",
            idx + 1,
            page.title,
            page.depth,
            retry_marker
        ));
        report.push_str(&format!("   URL: {}\n", page.url));
        report.push_str("   Introduction:\n");
        report.push_str(&wrap_text(&preview(&page.introduction, INTRO_EXCERPT_CHARS), 80, "     "));

        if !page.key_concepts.is_empty() {
            report.push_str("   Key Concepts:\n");
            report.push_str(&wrap_text(&page.key_concepts, 80, "     "));
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push('\n');
    report.push_str("KNOWLEDGE GRAPH STATISTICS\n");
    report.push_str(RULE);
    report.push_str("\n\n");
    report.push_str(&format!("Nodes:       {}\n", outcome.graph.node_count()));
    report.push_str(&format!("Connections: {}\n", outcome.graph.edge_count()));
    report.push('\n');

    report
}

pub fn generate_json_report(outcome: &CrawlOutcome) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "wikigraph",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "crawl": {
                "seed_url": outcome.seed_url,
                "start_time": outcome.started_at.to_rfc3339(),
                "end_time": outcome.finished_at.to_rfc3339(),
                "max_depth": outcome.max_depth,
                "max_links_per_page": outcome.max_links_per_page,
                "graph_mode": outcome.graph_mode
            },
            "summary": {
                "total_pages": outcome.pages.len(),
                "retried_pages": outcome.pages.iter().filter(|p| p.is_retry).count(),
                "graph_nodes": outcome.graph.node_count(),
                "graph_edges": outcome.graph.edge_count()
            },
            "pages": outcome.pages,
            "graph": outcome.graph
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_dot_report(outcome: &CrawlOutcome) -> String {
    outcome.graph.to_dot()
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.chars().count() + word.chars().count() + 1 > width - indent.len()
            && !current_line.is_empty()
        {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::wrap_text;

    #[test]
    fn test_wrap_text_respects_width() {
        let text = "one two three four five six seven eight nine ten";
        let wrapped = wrap_text(text, 20, "  ");
        for line in wrapped.lines() {
            assert!(line.len() <= 20, "line too long: {:?}", line);
            assert!(line.starts_with("  "));
        }
        assert_eq!(wrapped.split_whitespace().count(), 10);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("   ", 80, "  "), "");
    }
}
