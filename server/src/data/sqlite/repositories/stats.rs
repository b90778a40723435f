//! Aggregate statistics over a project's traces
//!
//! Nothing here is materialized; every call recomputes from the traces
//! table. Fine at collector scale, revisit if projects reach millions of
//! traces.

use sqlx::SqlitePool;

use crate::core::constants::{STATS_DAILY_WINDOW_DAYS, STATS_TOP_AGENTS};
use crate::data::sqlite::SqliteError;
use crate::data::types::{DailyCost, StatsTotals, TopAgent};

/// Project-wide totals: trace counts by status, token and cost sums, and
/// the average duration of ended traces
///
/// Sums coalesce to zero on an empty project; the average stays NULL until
/// at least one trace has an `ended_at`.
pub async fn get_totals(pool: &SqlitePool, project_id: &str) -> Result<StatsTotals, SqliteError> {
    let row = sqlx::query_as::<_, (i64, i64, i64, i64, i64, i64, f64, Option<f64>)>(
        r#"
        SELECT
          COUNT(*) as total_traces,
          COALESCE(SUM(CASE WHEN status = 'success' THEN 1 ELSE 0 END), 0) as success_count,
          COALESCE(SUM(CASE WHEN status = 'error' THEN 1 ELSE 0 END), 0) as error_count,
          COALESCE(SUM(CASE WHEN status = 'running' THEN 1 ELSE 0 END), 0) as running_count,
          COALESCE(SUM(total_tokens_in), 0) as total_tokens_in,
          COALESCE(SUM(total_tokens_out), 0) as total_tokens_out,
          COALESCE(SUM(total_cost_usd), 0.0) as total_cost_usd,
          AVG(ended_at - started_at) as avg_duration_s
        FROM traces
        WHERE project_id = ?
        "#,
    )
    .bind(project_id)
    .fetch_one(pool)
    .await?;

    let (
        total_traces,
        success_count,
        error_count,
        running_count,
        total_tokens_in,
        total_tokens_out,
        total_cost_usd,
        avg_duration_s,
    ) = row;

    Ok(StatsTotals {
        total_traces,
        success_count,
        error_count,
        running_count,
        total_tokens_in,
        total_tokens_out,
        total_cost_usd,
        avg_duration_s,
    })
}

/// Cost and trace count per UTC calendar day over the trailing window
///
/// Days with no traces are simply absent; buckets come back oldest first.
pub async fn get_daily_costs(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<Vec<DailyCost>, SqliteError> {
    let window = format!("-{} days", STATS_DAILY_WINDOW_DAYS);

    let rows = sqlx::query_as::<_, (String, f64, i64)>(
        r#"
        SELECT
          date(started_at, 'unixepoch') as day,
          SUM(total_cost_usd) as cost,
          COUNT(*) as traces
        FROM traces
        WHERE project_id = ? AND started_at > unixepoch('now', ?)
        GROUP BY day
        ORDER BY day ASC
        "#,
    )
    .bind(project_id)
    .bind(&window)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(day, cost, traces)| DailyCost { day, cost, traces })
        .collect())
}

/// Costliest agents in a project, most expensive first
///
/// Agents tied on cost rank alphabetically so pagination stays stable.
pub async fn get_top_agents(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<Vec<TopAgent>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, i64, f64, Option<f64>)>(
        r#"
        SELECT
          agent_name,
          COUNT(*) as trace_count,
          SUM(total_cost_usd) as total_cost,
          AVG(ended_at - started_at) as avg_duration
        FROM traces
        WHERE project_id = ? AND agent_name IS NOT NULL
        GROUP BY agent_name
        ORDER BY total_cost DESC, agent_name ASC
        LIMIT ?
        "#,
    )
    .bind(project_id)
    .bind(STATS_TOP_AGENTS)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(agent_name, trace_count, total_cost, avg_duration)| TopAgent {
            agent_name,
            trace_count,
            total_cost,
            avg_duration,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::trace::insert_traces;
    use crate::data::types::TraceRow;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn base_trace(id: &str, started_at: f64) -> TraceRow {
        TraceRow {
            id: id.to_string(),
            project_id: "default".to_string(),
            agent_name: None,
            status: "running".to_string(),
            started_at,
            ended_at: None,
            total_tokens_in: 0,
            total_tokens_out: 0,
            total_cost_usd: 0.0,
            metadata: None,
            error: None,
        }
    }

    fn utc_day(ts: f64) -> String {
        chrono::DateTime::from_timestamp(ts as i64, 0)
            .unwrap()
            .format("%Y-%m-%d")
            .to_string()
    }

    #[tokio::test]
    async fn test_totals_empty_project() {
        let pool = setup_test_pool().await;
        let totals = get_totals(&pool, "default").await.unwrap();

        assert_eq!(totals.total_traces, 0);
        assert_eq!(totals.success_count, 0);
        assert_eq!(totals.error_count, 0);
        assert_eq!(totals.running_count, 0);
        assert_eq!(totals.total_tokens_in, 0);
        assert_eq!(totals.total_tokens_out, 0);
        assert_eq!(totals.total_cost_usd, 0.0);
        assert!(totals.avg_duration_s.is_none());
    }

    #[tokio::test]
    async fn test_totals_status_counts_sum_to_total() {
        let pool = setup_test_pool().await;
        let mut ok = base_trace("tr_ok", 1000.0);
        ok.status = "success".to_string();
        let mut ok2 = base_trace("tr_ok2", 1001.0);
        ok2.status = "success".to_string();
        let mut failed = base_trace("tr_err", 1002.0);
        failed.status = "error".to_string();
        insert_traces(&pool, &[ok, ok2, failed, base_trace("tr_run", 1003.0)])
            .await
            .unwrap();

        let totals = get_totals(&pool, "default").await.unwrap();
        assert_eq!(totals.total_traces, 4);
        assert_eq!(totals.success_count, 2);
        assert_eq!(totals.error_count, 1);
        assert_eq!(totals.running_count, 1);
        assert_eq!(
            totals.success_count + totals.error_count + totals.running_count,
            totals.total_traces
        );
    }

    #[tokio::test]
    async fn test_totals_sums_and_average() {
        let pool = setup_test_pool().await;
        let mut a = base_trace("tr_a", 1000.0);
        a.ended_at = Some(1002.0);
        a.total_tokens_in = 100;
        a.total_tokens_out = 30;
        a.total_cost_usd = 0.5;
        let mut b = base_trace("tr_b", 2000.0);
        b.ended_at = Some(2004.0);
        b.total_tokens_in = 200;
        b.total_tokens_out = 70;
        b.total_cost_usd = 1.5;
        // Still running, must not drag the average down
        let c = base_trace("tr_c", 3000.0);
        insert_traces(&pool, &[a, b, c]).await.unwrap();

        let totals = get_totals(&pool, "default").await.unwrap();
        assert_eq!(totals.total_tokens_in, 300);
        assert_eq!(totals.total_tokens_out, 100);
        assert!((totals.total_cost_usd - 2.0).abs() < 1e-9);
        let avg = totals.avg_duration_s.unwrap();
        assert!((avg - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_reingest_does_not_double_count() {
        let pool = setup_test_pool().await;
        let mut t = base_trace("tr_1", 1000.0);
        t.total_cost_usd = 1.5;
        insert_traces(&pool, &[t.clone()]).await.unwrap();
        insert_traces(&pool, &[t.clone()]).await.unwrap();
        insert_traces(&pool, &[t]).await.unwrap();

        let totals = get_totals(&pool, "default").await.unwrap();
        assert_eq!(totals.total_traces, 1);
        assert!((totals.total_cost_usd - 1.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_totals_scoped_to_project() {
        let pool = setup_test_pool().await;
        let other = crate::data::sqlite::repositories::project::create_project(
            &pool, "Other", "ap_other",
        )
        .await
        .unwrap();

        let mut theirs = base_trace("tr_theirs", 1000.0);
        theirs.project_id = other.id.clone();
        theirs.total_cost_usd = 9.0;
        insert_traces(&pool, &[base_trace("tr_ours", 1000.0), theirs])
            .await
            .unwrap();

        let totals = get_totals(&pool, "default").await.unwrap();
        assert_eq!(totals.total_traces, 1);
        assert_eq!(totals.total_cost_usd, 0.0);
    }

    #[tokio::test]
    async fn test_daily_costs_buckets_by_utc_day() {
        let pool = setup_test_pool().await;
        let now = chrono::Utc::now().timestamp() as f64;
        let yesterday = now - 86_400.0;

        let mut today_a = base_trace("tr_today_a", now);
        today_a.total_cost_usd = 1.5;
        let mut today_b = base_trace("tr_today_b", now);
        today_b.total_cost_usd = 2.5;
        let mut old = base_trace("tr_yesterday", yesterday);
        old.total_cost_usd = 1.0;
        insert_traces(&pool, &[today_a, today_b, old]).await.unwrap();

        let daily = get_daily_costs(&pool, "default").await.unwrap();
        assert_eq!(daily.len(), 2);
        // Oldest bucket first
        assert_eq!(daily[0].day, utc_day(yesterday));
        assert_eq!(daily[1].day, utc_day(now));
        assert_eq!(daily[0].traces, 1);
        assert_eq!(daily[1].traces, 2);
        assert!((daily[0].cost - 1.0).abs() < 1e-9);
        assert!((daily[1].cost - 4.0).abs() < 1e-9);

        // With everything inside the window, daily costs add up to the total
        let totals = get_totals(&pool, "default").await.unwrap();
        let daily_sum: f64 = daily.iter().map(|d| d.cost).sum();
        assert!((daily_sum - totals.total_cost_usd).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_daily_costs_excludes_old_traces() {
        let pool = setup_test_pool().await;
        let now = chrono::Utc::now().timestamp() as f64;

        let mut recent = base_trace("tr_recent", now);
        recent.total_cost_usd = 2.0;
        let mut ancient = base_trace("tr_ancient", now - 10.0 * 86_400.0);
        ancient.total_cost_usd = 99.0;
        insert_traces(&pool, &[recent, ancient]).await.unwrap();

        let daily = get_daily_costs(&pool, "default").await.unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].day, utc_day(now));
        assert!((daily[0].cost - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_daily_costs_empty_project() {
        let pool = setup_test_pool().await;
        let daily = get_daily_costs(&pool, "default").await.unwrap();
        assert!(daily.is_empty());
    }

    #[tokio::test]
    async fn test_top_agents_ranked_by_cost() {
        let pool = setup_test_pool().await;
        let mut cheap = base_trace("tr_cheap", 1000.0);
        cheap.agent_name = Some("cheap-agent".to_string());
        cheap.total_cost_usd = 1.0;
        let mut pricey = base_trace("tr_pricey", 1001.0);
        pricey.agent_name = Some("pricey-agent".to_string());
        pricey.total_cost_usd = 3.0;
        let mut mid = base_trace("tr_mid", 1002.0);
        mid.agent_name = Some("mid-agent".to_string());
        mid.total_cost_usd = 2.0;
        // Anonymous traces never make the leaderboard
        insert_traces(&pool, &[cheap, pricey, mid, base_trace("tr_anon", 1003.0)])
            .await
            .unwrap();

        let top = get_top_agents(&pool, "default").await.unwrap();
        let names: Vec<&str> = top.iter().map(|a| a.agent_name.as_str()).collect();
        assert_eq!(names, vec!["pricey-agent", "mid-agent", "cheap-agent"]);
    }

    #[tokio::test]
    async fn test_top_agents_tie_breaks_alphabetically() {
        let pool = setup_test_pool().await;
        let mut beta = base_trace("tr_beta", 1000.0);
        beta.agent_name = Some("beta".to_string());
        beta.total_cost_usd = 2.0;
        let mut alpha = base_trace("tr_alpha", 1001.0);
        alpha.agent_name = Some("alpha".to_string());
        alpha.total_cost_usd = 2.0;
        insert_traces(&pool, &[beta, alpha]).await.unwrap();

        let top = get_top_agents(&pool, "default").await.unwrap();
        let names: Vec<&str> = top.iter().map(|a| a.agent_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_top_agents_aggregates_per_agent() {
        let pool = setup_test_pool().await;
        let mut first = base_trace("tr_1", 1000.0);
        first.agent_name = Some("worker".to_string());
        first.total_cost_usd = 1.0;
        first.ended_at = Some(1002.0);
        let mut second = base_trace("tr_2", 2000.0);
        second.agent_name = Some("worker".to_string());
        second.total_cost_usd = 2.0;
        second.ended_at = Some(2004.0);
        insert_traces(&pool, &[first, second]).await.unwrap();

        let top = get_top_agents(&pool, "default").await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].trace_count, 2);
        assert!((top[0].total_cost - 3.0).abs() < 1e-9);
        let avg = top[0].avg_duration.unwrap();
        assert!((avg - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_top_agents_duration_null_until_a_trace_ends() {
        let pool = setup_test_pool().await;
        let mut running = base_trace("tr_1", 1000.0);
        running.agent_name = Some("worker".to_string());
        insert_traces(&pool, &[running]).await.unwrap();

        let top = get_top_agents(&pool, "default").await.unwrap();
        assert_eq!(top.len(), 1);
        assert!(top[0].avg_duration.is_none());
    }

    #[tokio::test]
    async fn test_top_agents_capped_at_ten() {
        let pool = setup_test_pool().await;
        let traces: Vec<TraceRow> = (0..12)
            .map(|i| {
                let mut t = base_trace(&format!("tr_{}", i), 1000.0 + i as f64);
                t.agent_name = Some(format!("agent-{:02}", i));
                t.total_cost_usd = i as f64;
                t
            })
            .collect();
        insert_traces(&pool, &traces).await.unwrap();

        let top = get_top_agents(&pool, "default").await.unwrap();
        assert_eq!(top.len(), 10);
        // The two cheapest agents fall off the board
        assert_eq!(top[0].agent_name, "agent-11");
        assert_eq!(top[9].agent_name, "agent-02");
    }
}
