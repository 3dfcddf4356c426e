use zotsift_core::parse_date_range;

const YEAR_DIGITS: usize = 4;
const ADDED_RANGE_SEPARATOR: &str = "..";

/// Accepts the core date grammar plus `Y1-Y2`, expanded to `after:Y1,before:Y2`.
/// `YYYY-MM` keeps its month meaning because the second part is not a year.
pub(super) fn parse_year_expr(raw: &str) -> std::result::Result<String, String> {
    let trimmed = raw.trim();
    let expanded = expand_year_span(trimmed).unwrap_or_else(|| trimmed.to_string());
    validate_date_expr(expanded)
}

/// Accepts the core date grammar, `Y1-Y2`, and `D1..D2` where either side may
/// be left open.
pub(super) fn parse_added_expr(raw: &str) -> std::result::Result<String, String> {
    let trimmed = raw.trim();
    if let Some(expanded) = expand_year_span(trimmed) {
        return validate_date_expr(expanded);
    }
    let expanded = match trimmed.split_once(ADDED_RANGE_SEPARATOR) {
        Some((from, to)) => {
            let (from, to) = (from.trim(), to.trim());
            if from.is_empty() && to.is_empty() {
                return Err("range needs at least one bound".to_string());
            }
            [("after", from), ("before", to)]
                .into_iter()
                .filter(|(_, date)| !date.is_empty())
                .map(|(side, date)| format!("{side}:{date}"))
                .collect::<Vec<_>>()
                .join(",")
        }
        None => trimmed.to_string(),
    };
    validate_date_expr(expanded)
}

pub(super) fn parse_min_one_usize(raw: &str) -> std::result::Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("invalid integer value '{raw}'"))?;
    if value == 0 {
        return Err("value must be >= 1".to_string());
    }
    Ok(value)
}

fn expand_year_span(raw: &str) -> Option<String> {
    let (from, to) = raw.split_once('-')?;
    (is_year(from) && is_year(to)).then(|| format!("after:{from},before:{to}"))
}

fn is_year(raw: &str) -> bool {
    raw.len() == YEAR_DIGITS && raw.bytes().all(|b| b.is_ascii_digit())
}

fn validate_date_expr(expr: String) -> std::result::Result<String, String> {
    let range = parse_date_range(Some(expr.as_str())).map_err(|err| err.to_string())?;
    if !range.is_active() {
        return Err("date expression is empty".to_string());
    }
    Ok(expr)
}
