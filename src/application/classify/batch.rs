//! Bounded-concurrency batch execution.
//!
//! Every ticket becomes its own task. A shared semaphore caps how many
//! tasks talk to the provider at once; results are slotted back by input
//! index so output order never depends on completion order.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::row::{RowOutcome, RowProcessor};
use crate::domain::{FailurePolicy, ItemResult, Ticket, TokenUsage};
use crate::error::{Error, Result};

/// Default number of rows in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Rows finished so far out of the batch total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

/// Callback invoked after every finished row.
pub type ProgressSink = Arc<dyn Fn(BatchProgress) + Send + Sync>;

/// Results of a whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// One entry per input ticket, in input order.
    pub results: Vec<ItemResult>,
    /// Tokens consumed across all rows.
    pub usage: TokenUsage,
}

impl BatchOutcome {
    /// Number of rows marked as failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }
}

/// Runs a [`RowProcessor`] over many tickets.
pub struct BatchRunner {
    processor: RowProcessor,
    max_concurrency: usize,
    failure_policy: FailurePolicy,
    progress: Option<ProgressSink>,
}

impl BatchRunner {
    pub fn new(processor: RowProcessor) -> Self {
        Self {
            processor,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            failure_policy: FailurePolicy::default(),
            progress: None,
        }
    }

    /// Cap on concurrent rows. Values below one are raised to one.
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Classify every ticket.
    ///
    /// Under [`FailurePolicy::Abort`] the first row error cancels the
    /// remaining tasks and is returned; no partial results are produced.
    /// Under [`FailurePolicy::Mark`] failed rows are reported with the
    /// `ERROR` category and the batch completes.
    ///
    /// # Errors
    ///
    /// Returns the first row error under the abort policy, or a task error
    /// if a row task panicked.
    pub async fn run(&self, tickets: Vec<Ticket>) -> Result<BatchOutcome> {
        let total = tickets.len();
        let started = Instant::now();
        info!(
            rows = total,
            max_concurrency = self.max_concurrency,
            provider = self.processor.client().name(),
            "Batch started"
        );

        let gate = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, ticket) in tickets.into_iter().enumerate() {
            let gate = Arc::clone(&gate);
            let processor = self.processor.clone();
            tasks.spawn(async move {
                let outcome = match gate.acquire_owned().await {
                    Ok(_permit) => processor.process(&ticket).await,
                    Err(e) => Err(Error::Task(e.to_string())),
                };
                (index, ticket.id, outcome)
            });
        }

        let mut slots: Vec<Option<ItemResult>> = vec![None; total];
        let mut usage = TokenUsage::default();
        let mut completed = 0;

        while let Some(joined) = tasks.join_next().await {
            let (index, id, outcome) = joined?;

            let item = match outcome {
                Ok(RowOutcome { item, usage: row }) => {
                    usage += row;
                    item
                }
                Err(e) => match self.failure_policy {
                    FailurePolicy::Abort => {
                        warn!(row = index, error = %e, "Row failed, aborting batch");
                        tasks.abort_all();
                        return Err(e);
                    }
                    FailurePolicy::Mark => {
                        warn!(row = index, error = %e, "Row failed, marking as error");
                        ItemResult::failed(id, e.to_string())
                    }
                },
            };

            slots[index] = Some(item);
            completed += 1;
            debug!(row = index, completed, total, "Row finished");
            if let Some(sink) = &self.progress {
                sink(BatchProgress { completed, total });
            }
        }

        let results: Vec<ItemResult> = slots.into_iter().flatten().collect();
        if results.len() != total {
            return Err(Error::Task(format!(
                "{} of {total} rows produced no result",
                total - results.len()
            )));
        }

        let outcome = BatchOutcome { results, usage };
        info!(
            rows = total,
            failed = outcome.failed(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::domain::{CategorySet, ERROR_CATEGORY};
    use crate::port::outbound::llm::CompletionClient;
    use crate::testkit::llm::{FailingClient, LatencyClient, StaticClient};

    fn runner(client: Arc<dyn CompletionClient>) -> BatchRunner {
        let categories = CategorySet::try_new(["billing", "technical"]).unwrap();
        BatchRunner::new(RowProcessor::new(client, Arc::new(categories), "pt-BR"))
    }

    fn tickets(n: usize) -> Vec<Ticket> {
        (0..n)
            .map(|i| {
                let mut ticket = Ticket::new(format!("ticket {i}"));
                ticket.id = Some(i.to_string());
                ticket
            })
            .collect()
    }

    #[tokio::test]
    async fn empty_batch_makes_no_calls() {
        let client = LatencyClient::new(Duration::ZERO).shared();
        let outcome = runner(client.clone()).run(Vec::new()).await.unwrap();

        assert!(outcome.results.is_empty());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn results_follow_input_order_not_completion_order() {
        let client = LatencyClient::new(Duration::from_millis(5))
            .with_delay("ticket 0", Duration::from_millis(80))
            .with_delay("ticket 1", Duration::from_millis(40))
            .shared();

        let outcome = runner(client)
            .with_max_concurrency(3)
            .run(tickets(3))
            .await
            .unwrap();

        let summaries: Vec<&str> = outcome.results.iter().map(|r| r.summary.as_str()).collect();
        assert_eq!(summaries, ["ticket 0", "ticket 1", "ticket 2"]);
        let ids: Vec<Option<&str>> = outcome.results.iter().map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, [Some("0"), Some("1"), Some("2")]);
    }

    #[tokio::test]
    async fn never_exceeds_concurrency_limit() {
        let client = LatencyClient::new(Duration::from_millis(20)).shared();

        let outcome = runner(client.clone())
            .with_max_concurrency(2)
            .run(tickets(10))
            .await
            .unwrap();

        assert_eq!(outcome.results.len(), 10);
        assert_eq!(client.calls(), 10);
        assert!(client.peak_in_flight() <= 2);
        assert!(client.peak_in_flight() >= 1);
    }

    #[tokio::test]
    async fn zero_concurrency_is_raised_to_one() {
        let client = LatencyClient::new(Duration::from_millis(5)).shared();
        let batch = runner(client.clone()).with_max_concurrency(0);
        assert_eq!(batch.max_concurrency(), 1);

        batch.run(tickets(3)).await.unwrap();
        assert_eq!(client.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn sums_token_usage() {
        let client = LatencyClient::new(Duration::ZERO).shared();
        let outcome = runner(client).run(tickets(3)).await.unwrap();

        assert_eq!(outcome.usage.input_tokens, 30);
        assert_eq!(outcome.usage.output_tokens, 6);
    }

    #[tokio::test]
    async fn abort_policy_fails_whole_batch() {
        let client = FailingClient::when_prompt_contains(
            "HTTP 503",
            "ticket 2",
            r#"{"summary": "ok", "category": "billing"}"#,
        );

        let result = runner(Arc::new(client)).run(tickets(4)).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn abort_policy_cancels_queued_rows() {
        let client = LatencyClient::new(Duration::from_millis(10))
            .with_failure("ticket 0", "HTTP 503")
            .shared();

        let err = runner(client.clone())
            .with_max_concurrency(1)
            .run(tickets(10))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 503"));

        let calls_at_return = client.calls();
        assert!(calls_at_return < 5, "{calls_at_return} calls made");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(client.calls(), calls_at_return);
    }

    #[tokio::test]
    async fn mark_policy_records_failed_rows() {
        let client = FailingClient::when_prompt_contains(
            "HTTP 503",
            "ticket 1",
            r#"{"summary": "ok", "category": "Billing"}"#,
        );

        let outcome = runner(Arc::new(client))
            .with_failure_policy(FailurePolicy::Mark)
            .run(tickets(3))
            .await
            .unwrap();

        assert_eq!(outcome.failed(), 1);
        assert_eq!(outcome.results[0].category, "billing");
        assert_eq!(outcome.results[1].category, ERROR_CATEGORY);
        assert_eq!(outcome.results[1].id.as_deref(), Some("1"));
        assert!(outcome.results[1]
            .error
            .as_deref()
            .unwrap()
            .contains("HTTP 503"));
        assert!(!outcome.results[2].is_failed());
    }

    #[tokio::test]
    async fn reports_progress_for_every_row() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let sink: ProgressSink = {
            let seen = Arc::clone(&seen);
            let calls = Arc::clone(&calls);
            Arc::new(move |progress: BatchProgress| {
                calls.fetch_add(1, Ordering::SeqCst);
                seen.lock().unwrap().push(progress);
            })
        };

        let client = StaticClient::new(r#"{"summary": "s", "category": "technical"}"#);
        runner(Arc::new(client))
            .with_progress(sink)
            .run(tickets(4))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.last(), Some(&BatchProgress { completed: 4, total: 4 }));
        assert!(seen.iter().all(|p| p.total == 4));
    }
}
