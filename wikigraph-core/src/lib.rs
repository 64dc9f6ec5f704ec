pub mod crawl;
pub mod graph;
pub mod report;

use colored::Colorize;

const BANNER: &str = r#"
           _ _    _                       _
 __      _(_) | _(_) __ _ _ __ __ _ _ __ | |__
 \ \ /\ / / | |/ / |/ _` | '__/ _` | '_ \| '_ \
  \ V  V /| |   <| | (_| | | | (_| | |_) | | | |
   \_/\_/ |_|_|\_\_|\__, |_|  \__,_| .__/|_| |_|
                    |___/          |_|
"#;

fn banner_lines() -> [String; 2] {
    [
        BANNER.bright_cyan().bold().to_string(),
        format!(
            "  {} {}\n",
            "wikigraph".bright_white().bold(),
            format!("v{} - article crawler and knowledge graph builder", env!("CARGO_PKG_VERSION")).dimmed()
        ),
    ]
}

pub fn print_banner() {
    for line in banner_lines() {
        println!("{}", line);
    }
}

/// Banner on stderr, for runs whose stdout is machine readable.
pub fn eprint_banner() {
    for line in banner_lines() {
        eprintln!("{}", line);
    }
}
