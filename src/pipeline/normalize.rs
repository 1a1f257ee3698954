//! Bank normalizer: resolve canonical columns and coerce their values.
//!
//! ## Column resolution
//!
//! For each [`ColumnRole`], the consolidated column names are scanned in
//! order and the **first** name matching the role's predicate supplies it.
//! Later matches for the same role are ignored, so a statement with two
//! genuine date columns only keeps the first.
//!
//! ## Coercion
//!
//! | Role | Present cell | Absent cell |
//! |------|--------------|-------------|
//! | Date | `YYYY-MM-DD` if parseable, else original text | null |
//! | Description, Debit, Credit | text unchanged | null |
//! | Amount, Balance | signed number, or null if unparseable | null |
//!
//! When no Amount column exists but Debit and Credit both do, Amount is
//! derived per row as `credit - debit` with an unparseable side counted as 0.

use crate::output::{NormalizedOutput, Value};
use crate::pipeline::classify::ColumnRole;
use crate::record::RecordSet;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Options for [`normalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Year assumed for dates written without one ("Jul 20").
    /// `None` means the current local year.
    pub default_year: Option<i32>,
}

impl NormalizeOptions {
    fn reference_year(&self) -> i32 {
        self.default_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}

/// Which source column supplies each canonical role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    sources: Vec<(ColumnRole, String)>,
}

impl ResolvedColumns {
    /// Source column name for `role`, if one was found.
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.sources
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, name)| name.as_str())
    }

    pub fn contains(&self, role: ColumnRole) -> bool {
        self.get(role).is_some()
    }

    /// Resolved roles in canonical order.
    pub fn roles(&self) -> impl Iterator<Item = ColumnRole> + '_ {
        self.sources.iter().map(|(r, _)| *r)
    }
}

/// Pick at most one source column per role, first match wins.
pub fn resolve_columns(rs: &RecordSet) -> ResolvedColumns {
    let sources = ColumnRole::ALL
        .iter()
        .filter_map(|&role| {
            rs.column_names()
                .find(|name| role.matches_column(name))
                .map(|name| (role, name.to_string()))
        })
        .collect();
    ResolvedColumns { sources }
}

/// Normalize a consolidated record set into canonical, typed columns.
pub fn normalize(rs: &RecordSet, options: &NormalizeOptions) -> NormalizedOutput {
    let resolved = resolve_columns(rs);
    let derive_amount = !resolved.contains(ColumnRole::Amount)
        && resolved.contains(ColumnRole::Debit)
        && resolved.contains(ColumnRole::Credit);

    debug!(
        "Resolved columns: {:?}{}",
        resolved.sources,
        if derive_amount { " (Amount derived from Credit - Debit)" } else { "" }
    );

    let roles: Vec<ColumnRole> = ColumnRole::ALL
        .iter()
        .copied()
        .filter(|&r| resolved.contains(r) || (r == ColumnRole::Amount && derive_amount))
        .collect();

    let year = options.reference_year();
    let cell = |row: usize, role: ColumnRole| resolved.get(role).and_then(|name| rs.get(row, name));

    let data = (0..rs.row_count())
        .map(|row| {
            roles
                .iter()
                .map(|&role| match role {
                    ColumnRole::Amount if derive_amount => {
                        let credit = normalize_amount(cell(row, ColumnRole::Credit)).unwrap_or(0.0);
                        let debit = normalize_amount(cell(row, ColumnRole::Debit)).unwrap_or(0.0);
                        Value::Number(credit - debit)
                    }
                    ColumnRole::Amount | ColumnRole::Balance => {
                        normalize_amount(cell(row, role)).map_or(Value::Null, Value::Number)
                    }
                    ColumnRole::Date => cell(row, role)
                        .map_or(Value::Null, |t| Value::Text(normalize_date(t, year))),
                    ColumnRole::Description | ColumnRole::Debit | ColumnRole::Credit => {
                        cell(row, role).map_or(Value::Null, |t| Value::Text(t.to_string()))
                    }
                })
                .collect()
        })
        .collect();

    NormalizedOutput::new(roles.iter().map(|r| r.name().to_string()).collect(), data)
}

// ── Amounts ──────────────────────────────────────────────────────────────────

/// Parse a monetary cell into a signed number.
///
/// Commas, dollar signs and surrounding whitespace are stripped; a value
/// wrapped in parentheses is negative and may not carry its own sign.
/// Anything else that does not parse as a finite decimal, including an
/// absent cell, yields `None`.
pub fn normalize_amount(raw: Option<&str>) -> Option<f64> {
    let cleaned = raw?.replace([',', '$'], "");
    let s = cleaned.trim();
    let (negative, body) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };
    // "(-45)" carries two signs.
    if negative && body.starts_with(['-', '+']) {
        return None;
    }
    let value: f64 = body.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

// ── Dates ────────────────────────────────────────────────────────────────────

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?";

static RE_YMD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:\b|T)").unwrap());

static RE_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})\b").unwrap());

static RE_DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?[\s\-]+{MONTH}(?:,?[\s\-]*(\d{{4}}|\d{{2}})\b)?"
    ))
    .unwrap()
});

static RE_MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{MONTH}[\s\-]+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s*(\d{{4}})\b)?"
    ))
    .unwrap()
});

static RE_MONTH_DAY_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})\b").unwrap());

static RE_COMPACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})(\d{2})(\d{2})\b").unwrap());

/// Render a date cell as `YYYY-MM-DD`, or return it unchanged.
///
/// Parsing is permissive: the date may sit inside other text, month names may
/// be abbreviated, and all-numeric dates are read month-first unless that is
/// impossible (`13/01/2025` is the 13th of January). `year` fills in dates
/// written without one and anchors two-digit years.
pub fn normalize_date(text: &str, year: i32) -> String {
    match parse_fuzzy_date(text, year) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => text.to_string(),
    }
}

/// Find the first recognisable date in `text`.
pub fn parse_fuzzy_date(text: &str, year: i32) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(c) = RE_YMD.captures(text) {
        if let Some(d) = ymd(num(&c, 1)?, num(&c, 2)?, num(&c, 3)?) {
            return Some(d);
        }
    }
    if let Some(c) = RE_NUMERIC.captures(text) {
        let y = full_year(&c[3], year)?;
        if let Some(d) = month_first(y, num(&c, 1)?, num(&c, 2)?) {
            return Some(d);
        }
    }
    if let Some(c) = RE_DAY_MONTH.captures(text) {
        let y = c.get(3).map_or(Some(year), |m| full_year(m.as_str(), year))?;
        if let Some(d) = ymd(y, month_number(&c[2])?, num(&c, 1)?) {
            return Some(d);
        }
    }
    if let Some(c) = RE_MONTH_DAY.captures(text) {
        let y = c.get(3).map_or(Some(year), |m| full_year(m.as_str(), year))?;
        if let Some(d) = ymd(y, month_number(&c[1])?, num(&c, 2)?) {
            return Some(d);
        }
    }
    if let Some(c) = RE_MONTH_DAY_NUMERIC.captures(text) {
        if let Some(d) = month_first(year, num(&c, 1)?, num(&c, 2)?) {
            return Some(d);
        }
    }
    if let Some(c) = RE_COMPACT.captures(text) {
        return ymd(num(&c, 1)?, num(&c, 2)?, num(&c, 3)?);
    }
    None
}

fn num(c: &Captures<'_>, i: usize) -> Option<i32> {
    c.get(i)?.as_str().parse().ok()
}

fn ymd(y: i32, m: i32, d: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, u32::try_from(m).ok()?, u32::try_from(d).ok()?)
}

/// `a/b` read as month/day, falling back to day/month.
fn month_first(y: i32, a: i32, b: i32) -> Option<NaiveDate> {
    ymd(y, a, b).or_else(|| ymd(y, b, a))
}

/// Expand a two-digit year to the century that lands within 50 years of `reference`.
fn full_year(digits: &str, reference: i32) -> Option<i32> {
    let y: i32 = digits.parse().ok()?;
    if digits.len() > 2 {
        return Some(y);
    }
    let mut candidate = reference - reference.rem_euclid(100) + y;
    if candidate >= reference + 50 {
        candidate -= 100;
    } else if candidate < reference - 50 {
        candidate += 100;
    }
    Some(candidate)
}

fn month_number(name: &str) -> Option<i32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let m = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2025;

    fn rs(names: &[&str], rows: &[&[Option<&str>]]) -> RecordSet {
        RecordSet::from_rows(
            names.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.map(str::to_string)).collect())
                .collect(),
        )
    }

    fn opts() -> NormalizeOptions {
        NormalizeOptions {
            default_year: Some(YEAR),
        }
    }

    // ── normalize_amount ────────────────────────────────────────────────────

    #[test]
    fn amount_strips_currency_and_commas() {
        assert_eq!(normalize_amount(Some("$1,234.56")), Some(1234.56));
        assert_eq!(normalize_amount(Some("  -4.50 ")), Some(-4.5));
    }

    #[test]
    fn amount_parentheses_are_negative() {
        assert_eq!(normalize_amount(Some("(45.00)")), Some(-45.0));
        assert_eq!(normalize_amount(Some("($1,000)")), Some(-1000.0));
    }

    #[test]
    fn signed_value_in_parentheses_is_null() {
        assert_eq!(normalize_amount(Some("(-45)")), None);
        assert_eq!(normalize_amount(Some("(+45.00)")), None);
    }

    #[test]
    fn amount_failures_are_null() {
        assert_eq!(normalize_amount(Some("n/a")), None);
        assert_eq!(normalize_amount(Some("")), None);
        assert_eq!(normalize_amount(Some("NaN")), None);
        assert_eq!(normalize_amount(None), None);
    }

    #[test]
    fn amount_survives_restringification() {
        for raw in ["$1,234.56", "(45.00)", "0.1", "-99999.99", "3"] {
            let first = normalize_amount(Some(raw)).unwrap();
            let again = normalize_amount(Some(first.to_string().as_str())).unwrap();
            assert!((first - again).abs() < 1e-9, "{raw}: {first} vs {again}");
        }
    }

    // ── normalize_date ──────────────────────────────────────────────────────

    #[test]
    fn date_formats() {
        let cases = [
            ("2025-01-03", "2025-01-03"),
            ("2025/1/3", "2025-01-03"),
            ("01/03/2025", "2025-01-03"),
            ("13/01/2025", "2025-01-13"),
            ("1-3-25", "2025-01-03"),
            ("Jan 3, 2025", "2025-01-03"),
            ("January 3rd 2025", "2025-01-03"),
            ("3 Jan 2025", "2025-01-03"),
            ("03-Jan-25", "2025-01-03"),
            ("Posted on 2025-01-03 10:22", "2025-01-03"),
            ("2025-01-03T10:22:00", "2025-01-03"),
            ("2025-01-03T10:22:00Z", "2025-01-03"),
            ("20250103", "2025-01-03"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_date(input, YEAR), expected, "input: {input}");
        }
    }

    #[test]
    fn date_without_year_uses_reference_year() {
        assert_eq!(normalize_date("Jul 20", 2024), "2024-07-20");
        assert_eq!(normalize_date("20 Jul", 2024), "2024-07-20");
        assert_eq!(normalize_date("07/20", 2024), "2024-07-20");
    }

    #[test]
    fn unparseable_date_is_returned_unchanged() {
        assert_eq!(normalize_date("Opening balance", YEAR), "Opening balance");
        assert_eq!(normalize_date("", YEAR), "");
        assert_eq!(normalize_date("2025-02-30", YEAR), "2025-02-30");
    }

    #[test]
    fn two_digit_years_pivot_on_reference() {
        assert_eq!(full_year("25", 2025), Some(2025));
        assert_eq!(full_year("80", 2025), Some(1980));
        assert_eq!(full_year("74", 2025), Some(2074));
        assert_eq!(full_year("1999", 2025), Some(1999));
    }

    // ── resolve_columns / normalize ─────────────────────────────────────────

    #[test]
    fn first_match_wins() {
        let set = rs(&["Ref", "Date", "Date_2", "Memo", "Description"], &[]);
        let resolved = resolve_columns(&set);
        assert_eq!(resolved.get(ColumnRole::Date), Some("Date"));
        assert_eq!(resolved.get(ColumnRole::Description), Some("Memo"));
        assert_eq!(resolved.get(ColumnRole::Amount), None);
        let roles: Vec<ColumnRole> = resolved.roles().collect();
        assert_eq!(roles, vec![ColumnRole::Date, ColumnRole::Description]);
    }

    #[test]
    fn basic_statement() {
        let set = rs(
            &["Date", "Description", "Amount"],
            &[&[Some("2025-01-03"), Some("Coffee Shop"), Some("-4.50")]],
        );
        let out = normalize(&set, &opts());
        assert_eq!(out.rows, 1);
        assert_eq!(out.columns, vec!["Date", "Description", "Amount"]);
        assert_eq!(
            out.data[0],
            vec![
                Value::Text("2025-01-03".into()),
                Value::Text("Coffee Shop".into()),
                Value::Number(-4.5),
            ]
        );
    }

    #[test]
    fn amount_derived_from_debit_and_credit() {
        let set = rs(
            &["Debit", "Credit"],
            &[
                &[Some("10.00"), Some("0.00")],
                &[Some(""), Some("$25.00")],
                &[Some("n/a"), None],
            ],
        );
        let out = normalize(&set, &opts());
        assert_eq!(out.columns, vec!["Amount", "Debit", "Credit"]);
        assert_eq!(out.data[0][0], Value::Number(-10.0));
        assert_eq!(out.data[1][0], Value::Number(25.0));
        assert_eq!(out.data[2][0], Value::Number(0.0));
        assert_eq!(out.data[0][1], Value::Text("10.00".into()));
        assert_eq!(out.data[2][2], Value::Null);
    }

    #[test]
    fn existing_amount_is_not_overridden() {
        let set = rs(
            &["Amount", "Debit", "Credit"],
            &[&[Some("1.00"), Some("10.00"), Some("0.00")]],
        );
        let out = normalize(&set, &opts());
        assert_eq!(out.data[0][0], Value::Number(1.0));
    }

    #[test]
    fn unresolved_roles_are_absent_from_schema() {
        let set = rs(&["Date", "Balance", "Ref"], &[&[Some("x"), Some("(5)"), Some("r")]]);
        let out = normalize(&set, &opts());
        assert_eq!(out.columns, vec!["Date", "Balance"]);
        assert_eq!(out.data[0], vec![Value::Text("x".into()), Value::Number(-5.0)]);
    }

    #[test]
    fn coercion_failures_keep_the_row() {
        let set = rs(
            &["Date", "Amount"],
            &[&[Some("garbage"), Some("n/a")], &[None, None]],
        );
        let out = normalize(&set, &opts());
        assert_eq!(out.rows, 2);
        assert_eq!(out.data[0], vec![Value::Text("garbage".into()), Value::Null]);
        assert_eq!(out.data[1], vec![Value::Null, Value::Null]);
    }

    #[test]
    fn empty_record_set_normalizes_to_empty_output() {
        let out = normalize(&RecordSet::empty(), &opts());
        assert_eq!(out.rows, 0);
        assert!(out.columns.is_empty());
        assert!(out.data.is_empty());
    }
}
