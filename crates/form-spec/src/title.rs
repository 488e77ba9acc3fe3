use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::spec::field::ResolvedField;

static MONTHLY_STATEMENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^bank[_-]?statement[_-]?(\d+)$").ok());

const AUDITED_FINANCIAL_STATEMENT: &str = "auditedFinancialStatement";

/// Rewrites the display title of time-relative document requests.
///
/// `bankStatement<N>` gets the name of the month `N` months before
/// `reference_date` appended to its label; `auditedFinancialStatement` is
/// retitled with the previous calendar year. Any other field is returned as is.
pub fn apply_dynamic_title(mut field: ResolvedField, reference_date: NaiveDate) -> ResolvedField {
    if let Some(months_ago) = monthly_offset(&field.name)
        && let Some(month) = month_name_before(reference_date, months_ago)
    {
        field.title = Some(format!("{} ({})", field.label(), month));
    } else if field.name == AUDITED_FINANCIAL_STATEMENT {
        field.title = Some(format!(
            "Audited Financial Statement ({})",
            previous_year(reference_date)
        ));
    }
    field
}

fn monthly_offset(name: &str) -> Option<u32> {
    let regex = MONTHLY_STATEMENT.as_ref()?;
    let captures = regex.captures(name)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Full English name of the month `months_ago` months before `date`.
pub fn month_name_before(date: NaiveDate, months_ago: u32) -> Option<String> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) - i64::from(months_ago);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| first.format("%B").to_string())
}

pub fn previous_year(date: NaiveDate) -> i32 {
    date.year() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn month_arithmetic_wraps_year_boundary() {
        let today = date(2024, 2, 15);
        assert_eq!(month_name_before(today, 0).as_deref(), Some("February"));
        assert_eq!(month_name_before(today, 1).as_deref(), Some("January"));
        assert_eq!(month_name_before(today, 2).as_deref(), Some("December"));
        assert_eq!(month_name_before(today, 14).as_deref(), Some("December"));
    }

    #[test]
    fn monthly_offset_requires_numeric_suffix() {
        assert_eq!(monthly_offset("bankStatement3"), Some(3));
        assert_eq!(monthly_offset("bank_statement_12"), Some(12));
        assert_eq!(monthly_offset("bankStatement"), None);
        assert_eq!(monthly_offset("bankStatementLatest"), None);
        assert_eq!(monthly_offset("bankStatement3a"), None);
    }

    #[test]
    fn huge_offsets_do_not_match() {
        assert_eq!(monthly_offset("bankStatement99999999999999999999"), None);
    }
}
