//! Derived statistics over the employee store
//!
//! Three queries: longest-tenured employees, highest-paid employees
//! (salaries converted to USD through the rate provider), and the
//! per-year hire-count history for a title. The history feeds the
//! forecaster, so missing intermediate years are backfilled with zero to
//! keep the series contiguous.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;

use staffrec_common::api::types::Employee;
use staffrec_common::{Error, Result};

use crate::db;
use crate::rates::RateProvider;

/// Currency all salaries are converted to for comparison
pub const COMPARISON_CURRENCY: &str = "USD";

/// The `count` employees with the earliest employment dates
pub async fn longest_tenured(pool: &SqlitePool, count: i64) -> Result<Vec<Employee>> {
    if count <= 0 {
        return Err(Error::InvalidInput("count must be positive".to_string()));
    }
    db::longest_tenured_employees(pool, count).await
}

/// The `count` employees with the highest salaries, compared in USD.
///
/// Conversion goes through the injected rate provider; an unknown salary
/// currency surfaces as an error rather than silently ranking the
/// employee at zero.
pub async fn highest_paid(
    pool: &SqlitePool,
    rates: &dyn RateProvider,
    count: i64,
) -> Result<Vec<Employee>> {
    if count <= 0 {
        return Err(Error::InvalidInput("count must be positive".to_string()));
    }

    let employees = db::list_employees(pool, 0, -1).await?;
    let mut converted = Vec::with_capacity(employees.len());
    for employee in employees {
        let rate = rates
            .rate(&employee.salary.currency, COMPARISON_CURRENCY)
            .await?;
        converted.push((employee.salary.amount * rate, employee));
    }

    converted.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    Ok(converted
        .into_iter()
        .take(count as usize)
        .map(|(_, employee)| employee)
        .collect())
}

/// Per-year hire counts for the named title, zero-backfilled.
///
/// Returns `NotFound` when no employee holds the title; an empty series
/// would otherwise be indistinguishable from a typo in the title name.
pub async fn title_growth_history(
    pool: &SqlitePool,
    title_name: &str,
) -> Result<BTreeMap<i32, i64>> {
    let dates = db::title_hire_dates(pool, title_name).await?;
    if dates.is_empty() {
        return Err(Error::NotFound(format!(
            "no employees with title '{}'",
            title_name.trim()
        )));
    }
    Ok(growth_history(&dates))
}

/// Bucket hire dates by year and backfill missing intermediate years
/// with zero, producing a contiguous series from the earliest to the
/// latest observed year.
pub fn growth_history(dates: &[NaiveDate]) -> BTreeMap<i32, i64> {
    let mut counts: BTreeMap<i32, i64> = BTreeMap::new();
    for date in dates {
        *counts.entry(date.year()).or_insert(0) += 1;
    }

    if let (Some(&min_year), Some(&max_year)) =
        (counts.keys().next(), counts.keys().next_back())
    {
        for year in min_year..=max_year {
            counts.entry(year).or_insert(0);
        }
    }

    counts
}
