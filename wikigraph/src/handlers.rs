use anyhow::{Context, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use wikigraph_core::crawl::{CrawlOptions, execute_crawl};
use wikigraph_core::graph::GraphMode;
use wikigraph_core::report::{ReportFormat, render_report, save_report};
use wikigraph_scanner::client::DEFAULT_API_BASE;
use wikigraph_scanner::{ClientConfig, FixedDelayPacer, NoPacing, Pacer, ScrapeClient};

use crate::commands::API_KEY_ENV;

/// Everything `crawl` needs, resolved from the command line and environment
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seed_url: String,
    pub max_depth: usize,
    pub max_links_per_page: usize,
    pub api_key: String,
    pub api_base: String,
    pub graph_mode: GraphMode,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub no_delay: bool,
}

impl CrawlConfig {
    pub fn from_matches(sub_matches: &ArgMatches) -> anyhow::Result<Self> {
        let seed_url = sub_matches
            .get_one::<String>("url")
            .cloned()
            .ok_or_else(|| anyhow!("no seed URL given"))?;
        let max_depth = *sub_matches.get_one::<usize>("max-depth").unwrap_or(&1);
        let max_links_per_page = *sub_matches.get_one::<usize>("max-links").unwrap_or(&5);

        let api_key = sub_matches
            .get_one::<String>("api-key")
            .filter(|k| !k.trim().is_empty())
            .cloned()
            .ok_or_else(|| anyhow!("no API key: pass --api-key or set {}", API_KEY_ENV))?;
        let api_base = sub_matches
            .get_one::<String>("api-base")
            .cloned()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let graph_mode = sub_matches
            .get_one::<String>("graph-mode")
            .map(|m| GraphMode::from_str(m).ok_or_else(|| anyhow!("unknown graph mode '{}'", m)))
            .transpose()?
            .unwrap_or_default();
        let format = sub_matches
            .get_one::<String>("format")
            .map(|f| ReportFormat::from_str(f).ok_or_else(|| anyhow!("unknown report format '{}'", f)))
            .transpose()?
            .unwrap_or(ReportFormat::Text);

        let output = sub_matches
            .get_one::<PathBuf>("output")
            .map(|p| resolve_output_path(p));

        Ok(Self {
            seed_url,
            max_depth,
            max_links_per_page,
            api_key,
            api_base,
            graph_mode,
            format,
            output,
            no_delay: sub_matches.get_flag("no-delay"),
        })
    }

    /// A JSON or DOT report bound for stdout; status output must stay off it.
    pub fn structured_stdout(&self) -> bool {
        self.output.is_none() && self.format != ReportFormat::Text
    }
}

/// Same check as [`CrawlConfig::structured_stdout`], straight from the
/// arguments, for callers that print before the config is resolved.
pub fn report_claims_stdout(sub_matches: &ArgMatches) -> bool {
    let format = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    sub_matches.get_one::<PathBuf>("output").is_none() && format != "text"
}

// Status lines go to stderr whenever stdout carries a structured report
macro_rules! status {
    ($to_stderr:expr) => {
        if $to_stderr { eprintln!() } else { println!() }
    };
    ($to_stderr:expr, $($arg:tt)*) => {
        if $to_stderr { eprintln!($($arg)*) } else { println!($($arg)*) }
    };
}

/// Expand a leading `~` in a user supplied output path
pub fn resolve_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

fn print_config(config: &CrawlConfig, to_stderr: bool) {
    status!(to_stderr, "{}", "═".repeat(60).bright_blue().bold());
    status!(to_stderr, "{} Seed: {}", "→".blue(), config.seed_url.bright_white());
    status!(to_stderr, "{} Max depth: {}", "→".blue(), config.max_depth);
    status!(to_stderr, "{} Links per page: {}", "→".blue(), config.max_links_per_page);
    let mode = match config.graph_mode {
        GraphMode::DepthAdjacency => "depth (every level to the next)",
        GraphMode::ParentLinks => "parent (page to where it was found)",
    };
    status!(to_stderr, "{} Graph mode: {}", "→".blue(), mode);
    if config.no_delay {
        status!(to_stderr, "{} Request pacing disabled", "⚠".yellow());
    }
    status!(to_stderr, "{}", "═".repeat(60).bright_blue().bold());
    status!(to_stderr);
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let config = CrawlConfig::from_matches(sub_matches)?;

    let client = ScrapeClient::new(
        ClientConfig::new(config.api_key.clone()).with_base_url(config.api_base.clone()),
    )
    .context("failed to set up the extraction client")?;
    debug!("Extraction endpoint: {}", client.endpoint());

    let pacer: Arc<dyn Pacer> = if config.no_delay {
        Arc::new(NoPacing)
    } else {
        Arc::new(FixedDelayPacer::default())
    };

    let to_stderr = config.structured_stdout();
    if !quiet {
        print_config(&config, to_stderr);
    }

    let options = CrawlOptions {
        seed_url: config.seed_url.clone(),
        max_depth: config.max_depth,
        max_links_per_page: config.max_links_per_page,
        graph_mode: config.graph_mode,
        show_progress_bars: !quiet,
    };

    let outcome = execute_crawl(options, Arc::new(client), pacer, None)
        .await
        .context("crawl failed")?;

    if !quiet {
        status!(
            to_stderr,
            "\n{} Crawl complete! {} articles collected\n",
            "✓".green().bold(),
            outcome.pages.len()
        );
    }

    let report = render_report(&outcome, config.format).context("failed to render report")?;

    match config.output {
        Some(ref path) => {
            save_report(&report, path)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            if !quiet {
                println!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    Ok(())
}
