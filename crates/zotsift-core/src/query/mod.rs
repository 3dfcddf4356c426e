use std::collections::HashMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::{DateRange, PartialDate, parse_date_range};
use crate::error::Result;
use crate::index::LibraryIndex;
use crate::models::{Candidate, Item};


/// Unit added per author match, scaled by byline position.
pub const AUTHOR_SCORE: i64 = 1;
/// Position at which an author match bottoms out at the minimum score.
pub const AUTHOR_SCORE_POSITION: i64 = 5;
/// Author substring that matches any author name.
pub const ANY_AUTHOR: &str = ".";

bitflags! {
    /// Filter criteria, one bit each.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Criteria: u8 {
        const AUTHOR = 1 << 0;
        const PUBLICATION = 1 << 1;
        const ADDED = 1 << 2;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub author_substrings: Vec<String>,
    #[serde(default)]
    pub publication_range: DateRange,
    #[serde(default)]
    pub added_range: DateRange,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a query from raw filter expressions. Date expressions are parsed
    /// here, so a malformed date fails before any index work happens.
    pub fn from_expressions(
        authors: Option<&str>,
        publication: Option<&str>,
        added: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            author_substrings: split_author_list(authors),
            publication_range: parse_date_range(publication)?,
            added_range: parse_date_range(added)?,
        })
    }

    #[must_use]
    pub fn with_authors<I, S>(mut self, substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.author_substrings = substrings.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_publication(mut self, range: DateRange) -> Self {
        self.publication_range = range;
        self
    }

    #[must_use]
    pub const fn with_added(mut self, range: DateRange) -> Self {
        self.added_range = range;
        self
    }

    /// Bits every selected item must carry.
    #[must_use]
    pub fn required(&self) -> Criteria {
        let mut required = Criteria::empty();
        if !self.author_substrings.is_empty() {
            required |= Criteria::AUTHOR;
        }
        if self.publication_range.is_active() {
            required |= Criteria::PUBLICATION;
        }
        if self.added_range.is_active() {
            required |= Criteria::ADDED;
        }
        required
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required().is_empty()
    }
}

fn split_author_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// `AUTHOR_SCORE * max(1, AUTHOR_SCORE_POSITION - position)`.
#[must_use]
pub fn author_position_score(position: u32) -> i64 {
    AUTHOR_SCORE * (AUTHOR_SCORE_POSITION - i64::from(position)).max(1)
}

#[derive(Debug, Clone, Copy, Default)]
struct Mark {
    mask: Criteria,
    score: i64,
}

/// Evaluates a [`Query`] against a built [`LibraryIndex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine;

impl QueryEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Ranked candidates, highest score first; equal scores are ordered by item
    /// id. A query with no active criteria selects nothing.
    pub fn run(&self, index: &LibraryIndex, query: &Query) -> Result<Vec<Candidate>> {
        let required = query.required();
        if required.is_empty() {
            debug!("query has no active criteria");
            return Ok(Vec::new());
        }
        debug!(?required, "evaluating query");

        let mut marks = HashMap::<i64, Mark>::with_capacity(index.item_count());
        if required.contains(Criteria::PUBLICATION) {
            let range = &query.publication_range;
            mark_dates(index, &mut marks, Criteria::PUBLICATION, range, |item| {
                item.publication_date
            });
        }
        if required.contains(Criteria::ADDED) {
            let range = &query.added_range;
            mark_dates(index, &mut marks, Criteria::ADDED, range, |item| {
                Some(item.added_date)
            });
        }
        if required.contains(Criteria::AUTHOR) {
            mark_authors(index, &mut marks, &query.author_substrings);
        }

        let mut candidates = Vec::new();
        for (item_id, mark) in marks {
            if mark.mask != required {
                continue;
            }
            let Some(item) = index.get_item(item_id) else {
                continue;
            };
            let authors = index.get_authors_ordered(item_id)?;
            candidates.push(Candidate {
                score: mark.score,
                item,
                authors,
            });
        }
        candidates.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.item.id.cmp(&b.item.id))
        });

        debug!(selected = candidates.len(), "query evaluated");
        Ok(candidates)
    }
}

fn mark_dates(
    index: &LibraryIndex,
    marks: &mut HashMap<i64, Mark>,
    bit: Criteria,
    range: &DateRange,
    subject: impl Fn(&Item) -> Option<PartialDate>,
) {
    for item in index.items() {
        // Items without a date never satisfy an active date criterion.
        if let Some(date) = subject(item)
            && range.matches(&date)
        {
            marks.entry(item.id).or_default().mask |= bit;
        }
    }
}

// Iterates matching author identities, not substrings: an author whose name
// matches several substrings is credited once per item occurrence.
fn mark_authors(index: &LibraryIndex, marks: &mut HashMap<i64, Mark>, substrings: &[String]) {
    let any_author = substrings.iter().any(|s| s == ANY_AUTHOR);
    let mut unloaded_refs = 0_usize;

    for (author_id, author) in index.authors() {
        let matched = any_author
            || substrings
                .iter()
                .any(|s| author.last_name.contains(s.as_str()));
        if !matched {
            continue;
        }
        for item_ref in index.author_item_refs(author_id) {
            if index.item(item_ref.item_id).is_none() {
                unloaded_refs += 1;
                continue;
            }
            let mark = marks.entry(item_ref.item_id).or_default();
            mark.mask |= Criteria::AUTHOR;
            mark.score += author_position_score(item_ref.position);
        }
    }

    if unloaded_refs > 0 {
        debug!(
            unloaded_refs,
            "author matches on items outside the index were skipped"
        );
    }
}
