use clap::{arg, command};
use url::Url;
use wikigraph_core::crawl::DEFAULT_SEED_URL;
use wikigraph_scanner::client::DEFAULT_API_BASE;

pub const API_KEY_ENV: &str = "JIGSAWSTACK_API_KEY";

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

/// Accepts anything that parses as an absolute URL but keeps the text as
/// typed. The crawl compares it verbatim against the hrefs the service
/// returns, so it must not be normalized.
pub fn parse_seed_url(value: &str) -> Result<String, String> {
    Url::parse(value)
        .map(|_| value.to_string())
        .map_err(|e| format!("invalid URL '{}': {}", value, e))
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("wikigraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wikigraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl articles breadth-first from a seed page and build a knowledge graph \
                from what was collected.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The seed article to start from")
                        .value_parser(parse_seed_url)
                        .default_value(DEFAULT_SEED_URL),
                )
                .arg(
                    arg!(-d --"max-depth" <DEPTH>)
                        .required(false)
                        .help("How many link hops away from the seed to go (0 = seed only)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(-l --"max-links" <COUNT>)
                        .required(false)
                        .help("Maximum links followed from each article")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                )
                .arg(
                    arg!(--"api-key" <KEY>)
                        .required(false)
                        .help("API key for the extraction service")
                        .env(API_KEY_ENV)
                        .hide_env_values(true),
                )
                .arg(
                    arg!(--"api-base" <URL>)
                        .required(false)
                        .help("Base URL of the extraction service")
                        .default_value(DEFAULT_API_BASE),
                )
                .arg(
                    arg!(-g --"graph-mode" <MODE>)
                        .required(false)
                        .help("Edge rule: 'depth' links every level to the next, 'parent' only links pages to where they were found")
                        .value_parser(["depth", "parent"])
                        .default_value("depth"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, dot")
                        .value_parser(["text", "json", "dot"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"no-delay")
                        .required(false)
                        .help("Do not pause between requests (for local or mocked services)")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
