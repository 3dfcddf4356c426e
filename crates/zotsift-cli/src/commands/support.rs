use std::io::{self, Write};

use anyhow::Result;
use zotsift_core::Candidate;

const AUTHOR_SEPARATOR: &str = "; ";
const UNDATED: &str = "----";

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// One line per candidate: score, key, publication year, byline, title.
pub(super) fn write_candidates(out: &mut impl Write, candidates: &[Candidate]) -> Result<()> {
    for candidate in candidates {
        writeln!(out, "{}", format_candidate(candidate))?;
    }
    Ok(())
}

pub(super) fn format_candidate(candidate: &Candidate) -> String {
    let year = candidate
        .item
        .publication_date
        .map_or_else(|| UNDATED.to_string(), |date| date.year.to_string());
    let byline = candidate
        .authors
        .iter()
        .map(zotsift_core::Author::display_name)
        .collect::<Vec<_>>()
        .join(AUTHOR_SEPARATOR);
    format!(
        "{:>3}  {}  {year}  {byline}  {}",
        candidate.score, candidate.item.key, candidate.item.title
    )
}
