use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

mod args;
mod parsers;


pub use args::{ItemKeyArg, LaunchArgs, SearchArgs};

#[derive(Debug, Parser)]
#[command(name = "zotsift")]
#[command(about = "Search a Zotero library by author and date, then open the match", version)]
pub struct Cli {
    /// Zotero data directory (holds `zotero.sqlite` and `storage/`).
    #[arg(long, global = true, value_name = "DIR")]
    pub zotero_dir: Option<PathBuf>,

    /// Read the live database instead of a private copy.
    #[arg(long, global = true, default_value_t = false)]
    pub no_snapshot: bool,

    /// Raise log verbosity on stderr (`-v` info, `-vv` debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rank items by author and date filters.
    Search(SearchArgs),
    /// List an item's PDF attachments as JSON.
    Attachments(ItemKeyArg),
    /// Open an attachment in Zotero's reader.
    Open(LaunchArgs),
    /// Select an item in the Zotero pane.
    Select(LaunchArgs),
}
