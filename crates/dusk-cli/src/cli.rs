use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "dusk")]
#[command(about = "Dark-theme stylesheet generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug)]
pub enum Commands {
    /// Derive dark-mode rules for a stylesheet file or a directory tree.
    Build {
        /// A `.css` file, or a directory searched recursively for them.
        input: PathBuf,

        /// JSON configuration: ignore list, granularity, optional palette.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print derived output to stdout instead of rewriting files.
        #[arg(long)]
        dry_run: bool,
    },
}
