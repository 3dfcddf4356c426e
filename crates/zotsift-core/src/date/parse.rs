use crate::error::{Result, ZotsiftError};

use super::{DateRange, PartialDate};

const BEFORE_PREFIX: &str = "before:";
const AFTER_PREFIX: &str = "after:";
const MAX_MONTH: u8 = 12;
const MAX_DAY: u8 = 31;

/// Parses `before:<date>`, `after:<date>` and bare `<date>` tokens separated by
/// commas. A bare date pins both bounds to the same value.
pub fn parse_date_range(expr: Option<&str>) -> Result<DateRange> {
    let mut range = DateRange::default();
    let Some(expr) = expr else {
        return Ok(range);
    };

    for token in expr.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(raw) = token.strip_prefix(BEFORE_PREFIX) {
            range.before = Some(parse_bound(token, raw)?);
        } else if let Some(raw) = token.strip_prefix(AFTER_PREFIX) {
            range.after = Some(parse_bound(token, raw)?);
        } else if let Some((prefix, _)) = token.split_once(':') {
            return Err(ZotsiftError::malformed_date(
                token,
                format!("unknown qualifier '{prefix}' (expected before|after)"),
            ));
        } else {
            let date = parse_partial_date(token)?;
            range.before = Some(date);
            range.after = Some(date);
        }
    }
    Ok(range)
}

fn parse_bound(token: &str, raw: &str) -> Result<PartialDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ZotsiftError::malformed_date(token, "missing date after qualifier"));
    }
    parse_partial_date(raw)
}

pub(super) fn parse_partial_date(raw: &str) -> Result<PartialDate> {
    let raw = raw.trim();
    let mut parts = raw.split('-');

    let year = parts
        .next()
        .ok_or_else(|| ZotsiftError::malformed_date(raw, "empty date"))
        .and_then(|part| parse_component::<i32>(raw, part, "year"))?;
    let month = parts
        .next()
        .map(|part| parse_bounded(raw, part, "month", MAX_MONTH))
        .transpose()?;
    let day = parts
        .next()
        .map(|part| parse_bounded(raw, part, "day", MAX_DAY))
        .transpose()?;
    if parts.next().is_some() {
        return Err(ZotsiftError::malformed_date(
            raw,
            "too many components (expected YYYY, YYYY-MM or YYYY-MM-DD)",
        ));
    }

    Ok(PartialDate { year, month, day })
}

// A literal `0` is kept; it means "unspecified" to the comparator.
fn parse_bounded(raw: &str, part: &str, name: &str, max: u8) -> Result<u8> {
    let value = parse_component::<u8>(raw, part, name)?;
    if value > max {
        return Err(ZotsiftError::malformed_date(
            raw,
            format!("{name} {value} is out of range (0-{max})"),
        ));
    }
    Ok(value)
}

fn parse_component<T: std::str::FromStr>(raw: &str, part: &str, name: &str) -> Result<T> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ZotsiftError::malformed_date(
            raw,
            format!("{name} component '{part}' is not a number"),
        ));
    }
    part.parse::<T>().map_err(|_| {
            ZotsiftError::malformed_date(raw, format!("{name} component '{part}' is out of range"))
        })
}
