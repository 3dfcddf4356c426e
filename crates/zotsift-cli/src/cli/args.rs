use clap::{Args, ValueEnum};
use zotsift_core::LaunchAction;

use super::parsers::{parse_added_expr, parse_min_one_usize, parse_year_expr};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Comma-separated last-name substrings; `.` matches any author.
    #[arg(short, long, value_name = "SUBSTRINGS")]
    pub author: Option<String>,
    /// Publication date: `before:Y`, `after:Y`, `Y1-Y2`, or `YYYY[-MM[-DD]]`.
    #[arg(
        short,
        long,
        value_name = "EXPR",
        allow_hyphen_values = true,
        value_parser = parse_year_expr
    )]
    pub year: Option<String>,
    /// Date added to the library; same grammar, `D1..D2` for a range.
    #[arg(
        short = 'd',
        long,
        value_name = "EXPR",
        allow_hyphen_values = true,
        value_parser = parse_added_expr
    )]
    pub added: Option<String>,
    #[arg(long, value_parser = parse_min_one_usize)]
    pub limit: Option<usize>,
    #[arg(long, default_value_t = false, conflicts_with = "pick")]
    pub json: bool,
    /// Choose one result from a numbered prompt and launch it.
    #[arg(long, default_value_t = false)]
    pub pick: bool,
    /// What to do with the picked item (default: open).
    #[arg(long, value_enum, requires = "pick")]
    pub action: Option<ActionArg>,
    /// Print the `zotero://` link instead of launching it.
    #[arg(long, default_value_t = false, requires = "pick")]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Open,
    Select,
}

impl From<ActionArg> for LaunchAction {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Open => Self::Open,
            ActionArg::Select => Self::Select,
        }
    }
}

#[derive(Debug, Args)]
pub struct ItemKeyArg {
    pub key: String,
}

#[derive(Debug, Args)]
pub struct LaunchArgs {
    pub key: String,
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
