//! Bounded acquisition retries.
//!
//! Upstream publishes the report on its own schedule, so a fetch right after
//! a quarter-hour boundary can race the publication and come back empty.
//! [`acquire_with_retry`] papers over that window with a small retry budget.
//! It deliberately does not retry on stale-but-present data - that is the
//! resolver's row-level fallback, a different failure layer.

use std::time::Duration;

use async_trait::async_trait;
use blockwatch_types::Table;
use tracing::{debug, warn};

/// The acquisition collaborator seam: anything that can produce a fresh
/// [`Table`] snapshot. Each call is expected to produce an independently
/// owned table; nothing is shared between invocations.
#[async_trait]
pub trait TableSource {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn produce(&mut self) -> Result<Table, Self::Error>;
}

/// Retry budget for [`acquire_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Treated as at least 1.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(30),
        }
    }
}

/// Call `source` until it produces a non-empty table or the budget runs out.
///
/// Returns the first non-empty table, or the last table obtained (possibly
/// empty) when every attempt produced an empty one, or `None` when every
/// attempt failed outright. Callers proceed with whatever comes back and let
/// the resolver's own fallback semantics take over.
pub async fn acquire_with_retry<S: TableSource + Send>(
    source: &mut S,
    policy: RetryPolicy,
) -> Option<Table> {
    let attempts = policy.attempts.max(1);
    let mut last: Option<Table> = None;

    for attempt in 1..=attempts {
        match source.produce().await {
            Ok(table) if !table.is_empty() => {
                debug!(attempt, rows = table.len(), "table acquired");
                return Some(table);
            }
            Ok(table) => {
                warn!(attempt, "upstream produced an empty table");
                last = Some(table);
            }
            Err(error) => {
                warn!(attempt, %error, "table acquisition failed");
            }
        }
        if attempt < attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    last
}

#[cfg(test)]
mod tests {
    use std::io;

    use blockwatch_types::{Row, Table};

    use super::*;

    fn non_empty_table() -> Table {
        Table::new(
            vec!["interval".to_string()],
            vec![Row::new(vec!["09:00-09:15".into()])],
        )
    }

    fn empty_table() -> Table {
        Table::new(vec!["interval".to_string()], Vec::new())
    }

    /// Plays back a scripted sequence of outcomes, one per attempt.
    struct Scripted {
        outcomes: Vec<Result<Table, io::Error>>,
        calls: usize,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<Table, io::Error>>) -> Self {
            Self { outcomes, calls: 0 }
        }
    }

    #[async_trait]
    impl TableSource for Scripted {
        type Error = io::Error;

        async fn produce(&mut self) -> Result<Table, io::Error> {
            let outcome = self.outcomes.remove(0);
            self.calls += 1;
            outcome
        }
    }

    fn failure() -> io::Error {
        io::Error::other("connection reset")
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            delay: Duration::from_secs(30),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_non_empty_table_is_accepted_immediately() {
        let mut source = Scripted::new(vec![Ok(non_empty_table())]);
        let table = acquire_with_retry(&mut source, policy()).await;
        assert!(table.is_some_and(|t| !t.is_empty()));
        assert_eq!(source.calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_tables_are_retried_until_data_appears() {
        let mut source = Scripted::new(vec![
            Ok(empty_table()),
            Ok(empty_table()),
            Ok(non_empty_table()),
        ]);
        let table = acquire_with_retry(&mut source, policy()).await;
        assert!(table.is_some_and(|t| !t.is_empty()));
        assert_eq!(source.calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_are_retried() {
        let mut source = Scripted::new(vec![Err(failure()), Ok(non_empty_table())]);
        let table = acquire_with_retry(&mut source, policy()).await;
        assert!(table.is_some());
        assert_eq!(source.calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_budget_returns_last_empty_table() {
        let mut source = Scripted::new(vec![
            Ok(empty_table()),
            Err(failure()),
            Ok(empty_table()),
        ]);
        let table = acquire_with_retry(&mut source, policy()).await;
        assert!(table.is_some_and(|t| t.is_empty()));
        assert_eq!(source.calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn all_failures_yield_nothing() {
        let mut source = Scripted::new(vec![Err(failure()), Err(failure()), Err(failure())]);
        let table = acquire_with_retry(&mut source, policy()).await;
        assert!(table.is_none());
        assert_eq!(source.calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let mut source = Scripted::new(vec![Ok(non_empty_table())]);
        let table = acquire_with_retry(
            &mut source,
            RetryPolicy {
                attempts: 0,
                delay: Duration::from_secs(30),
            },
        )
        .await;
        assert!(table.is_some());
        assert_eq!(source.calls, 1);
    }
}
