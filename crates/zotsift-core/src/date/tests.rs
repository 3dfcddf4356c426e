use super::*;
use crate::error::ZotsiftError;

fn range(expr: &str) -> DateRange {
    parse_date_range(Some(expr)).expect("parse range")
}

#[test]
fn absent_expression_yields_inactive_range() {
    let parsed = parse_date_range(None).expect("parse");
    assert_eq!(parsed, DateRange::default());
    assert!(!parsed.is_active());

    let blank = parse_date_range(Some("  ")).expect("parse blank");
    assert!(!blank.is_active());
}

#[test]
fn qualified_tokens_set_single_bounds() {
    let parsed = range("before:1950,after:1940");
    assert_eq!(parsed.before, Some(PartialDate::year(1950)));
    assert_eq!(parsed.after, Some(PartialDate::year(1940)));
}

#[test]
fn bare_date_pins_both_bounds() {
    let parsed = range("2001-05");
    assert_eq!(parsed, DateRange::exactly(PartialDate::year_month(2001, 5)));
}

#[test]
fn trailing_components_stay_absent() {
    let parsed: PartialDate = "1999".parse().expect("year");
    assert_eq!(parsed.month, None);
    assert_eq!(parsed.day, None);

    let full: PartialDate = "1999-12-31".parse().expect("full");
    assert_eq!(full, PartialDate::ymd(1999, 12, 31));
}

#[test]
fn zero_components_are_kept_literally() {
    let parsed: PartialDate = "1949-00-00".parse().expect("zotero style");
    assert_eq!(parsed, PartialDate::ymd(1949, 0, 0));
    assert_eq!(parsed.effective_month(), None);
    assert_eq!(parsed.effective_day(), None);
}

#[test]
fn later_token_overrides_earlier_bound() {
    let parsed = range("before:1990, before:2000");
    assert_eq!(parsed.before, Some(PartialDate::year(2000)));
    assert_eq!(parsed.after, None);
}

#[test]
fn non_numeric_year_is_malformed() {
    let err = parse_date_range(Some("abc")).expect_err("must fail");
    assert!(matches!(err, ZotsiftError::MalformedDate { .. }));
    assert_eq!(err.code(), "MALFORMED_DATE");
}

#[test]
fn malformed_inputs_are_rejected() {
    for expr in [
        "before:",
        "after:20x0",
        "2001-1a",
        "2001-01-01-01",
        "2001--01",
        "since:2001",
        "2001-300",
        "2000-13",
        "2000-01-45",
        "2000-12-32",
    ] {
        let err = parse_date_range(Some(expr)).expect_err(expr);
        assert!(
            matches!(err, ZotsiftError::MalformedDate { .. }),
            "{expr}: {err}"
        );
    }
}

#[test]
fn display_pads_components() {
    assert_eq!(PartialDate::year(812).to_string(), "0812");
    assert_eq!(PartialDate::year_month(2001, 5).to_string(), "2001-05");
    assert_eq!(PartialDate::ymd(2001, 5, 7).to_string(), "2001-05-07");
}

#[test]
fn before_year_ignores_finer_subject_components() {
    let before_2000 = range("before:2000");
    assert!(before_2000.matches(&PartialDate::year(1999)));
    assert!(before_2000.matches(&PartialDate::year(2000)));
    assert!(before_2000.matches(&PartialDate::ymd(2000, 12, 31)));
    assert!(before_2000.matches(&PartialDate::year_month(1850, 1)));
    assert!(!before_2000.matches(&PartialDate::year(2001)));
    assert!(!before_2000.matches(&PartialDate::ymd(2001, 1, 1)));
}

#[test]
fn after_bound_is_inclusive() {
    let after_1940 = range("after:1940");
    assert!(after_1940.matches(&PartialDate::year(1940)));
    assert!(after_1940.matches(&PartialDate::year(1949)));
    assert!(!after_1940.matches(&PartialDate::ymd(1939, 12, 31)));
}

#[test]
fn each_granularity_is_an_independent_constraint() {
    let before = range("before:2000-05");
    assert!(before.matches(&PartialDate::year_month(1999, 4)));
    // Earlier year, but month 8 exceeds the bound month.
    assert!(!before.matches(&PartialDate::year_month(1999, 8)));
}

#[test]
fn exact_date_matches_only_that_precision() {
    let exact = range("2020-03-14");
    assert!(exact.matches(&PartialDate::ymd(2020, 3, 14)));
    assert!(!exact.matches(&PartialDate::ymd(2020, 3, 15)));
    assert!(!exact.matches(&PartialDate::ymd(2021, 3, 14)));
}

#[test]
fn unspecified_subject_components_do_not_violate_bounds() {
    let exact = range("2020-03-14");
    assert!(exact.matches(&PartialDate::year(2020)));
    assert!(exact.matches(&PartialDate::ymd(2020, 0, 0)));
}

#[test]
fn zero_bound_components_do_not_constrain() {
    let parsed = range("before:2000-00-00");
    assert!(parsed.matches(&PartialDate::ymd(2000, 12, 31)));
}

#[test]
fn inactive_range_matches_everything() {
    let inactive = DateRange::default();
    assert!(inactive.matches(&PartialDate::year(1)));
    assert!(matches(&inactive, &PartialDate::ymd(9999, 12, 31)));
}

#[test]
fn calendar_limits_are_inclusive_and_zero_stays_literal() {
    assert_eq!(
        "2000-12-31".parse::<PartialDate>().expect("limits"),
        PartialDate::ymd(2000, 12, 31)
    );
    assert_eq!(
        "2000-00-00".parse::<PartialDate>().expect("zeros"),
        PartialDate::ymd(2000, 0, 0)
    );
    let err = parse_date_range(Some("before:2000-13")).expect_err("month 13");
    assert!(err.to_string().contains("month 13 is out of range"));
}
