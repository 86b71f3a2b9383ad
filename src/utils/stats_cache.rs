use anyhow::Result;
use chrono::{Datelike, Utc};
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::attendance::summary;
use crate::model::attendance::MonthlyStats;

/// Monthly stats for closed months, keyed by employee and month. The ledger
/// is append-only, so a finished month only changes through back-dated
/// administrative entries; those surface when the TTL lapses.
pub static MONTHLY_STATS_CACHE: Lazy<Cache<String, MonthlyStats>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

fn cache_key(employee_id: &str, year: i32, month: u32) -> String {
    format!("{}:{}-{:02}", employee_id, year, month)
}

pub async fn get(employee_id: &str, year: i32, month: u32) -> Option<MonthlyStats> {
    MONTHLY_STATS_CACHE.get(&cache_key(employee_id, year, month)).await
}

pub async fn insert(employee_id: &str, year: i32, month: u32, stats: MonthlyStats) {
    MONTHLY_STATS_CACHE
        .insert(cache_key(employee_id, year, month), stats)
        .await;
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// Prime the cache with last month's stats for every employee that has
/// events there (batched).
pub async fn warmup_stats_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let today = Utc::now().date_naive();
    let (year, month) = previous_month(today.year(), today.month());
    let (start, end) = crate::attendance::calendar::month_bounds(year, month)?;

    let mut stream = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT employee_id
        FROM attendance_records
        WHERE ts BETWEEN ? AND ?
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let employee_id = row?;
        batch.push(employee_id);
        total_count += 1;

        if batch.len() >= batch_size {
            prime_batch(pool, &batch, year, month).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        prime_batch(pool, &batch, year, month).await;
    }

    log::info!(
        "Monthly stats cache warmup complete: {} employees ({}-{:02})",
        total_count,
        year,
        month
    );

    Ok(())
}

async fn prime_batch(pool: &MySqlPool, employee_ids: &[String], year: i32, month: u32) {
    let futures: Vec<_> = employee_ids
        .iter()
        .map(|id| summary::monthly_stats(pool, id, year, month))
        .collect();

    for result in futures::future::join_all(futures).await {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Stats warmup computation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_month_wraps_the_year() {
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(previous_month(2025, 7), (2025, 6));
    }

    #[test]
    fn cache_keys_separate_employee_and_month() {
        assert_eq!(cache_key("e1", 2025, 6), "e1:2025-06");
        assert_ne!(cache_key("e1", 2025, 6), cache_key("e1", 2025, 7));
        assert_ne!(cache_key("e1", 2025, 6), cache_key("e2", 2025, 6));
    }
}
