//! inkport CLI: import a Webflow blog export as Markdown documents.
//!
//! Each published row of the export becomes one file with a YAML
//! frontmatter header, ready for the static-site build.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
