use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use zotsift_core::Candidate;

use super::support::format_candidate;

const CANCEL: &str = "q";

/// Numbered prompt. An empty line, `q`, or end of input cancels.
pub(super) fn pick<'a>(
    candidates: &'a [Candidate],
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<Option<&'a Candidate>> {
    for (number, candidate) in candidates.iter().enumerate() {
        writeln!(output, "{:>3}) {}", number + 1, format_candidate(candidate))?;
    }
    write!(output, "select [1-{}, {CANCEL} to cancel]: ", candidates.len())?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case(CANCEL) {
        return Ok(None);
    }

    let Ok(number) = answer.parse::<usize>() else {
        bail!("invalid selection '{answer}'");
    };
    match number.checked_sub(1).and_then(|index| candidates.get(index)) {
        Some(candidate) => Ok(Some(candidate)),
        None => bail!(
            "selection {number} is out of range (1-{})",
            candidates.len()
        ),
    }
}
