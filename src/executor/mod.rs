//! Fan-out / fan-in execution of hammers
//!
//! The [`Coordinator`] builds one [`Hammer`] per id, spawns each on its own
//! tokio task behind a slot pool sized to the hammer count, waits on the join
//! barrier and averages the per-hammer results. A single failing hammer fails
//! the whole run and no total is reported.

pub mod hammer;

pub use hammer::Hammer;

use crate::{
    client::HttpClient,
    error::{AppError, Result},
    logging::Logger,
    models::{Config, HammerResult, RunSummary},
    output::{format_run_digest, format_total_average, ReportSink},
    types::{CoordinatorState, HammerId},
};
use chrono::Utc;
use std::sync::Arc;
use tokio::{sync::Semaphore, task::JoinSet, time::Instant};

/// Orchestrates a single load-generation run
pub struct Coordinator {
    config: Config,
    client: Arc<dyn HttpClient>,
    sink: Arc<dyn ReportSink>,
    logger: Arc<Logger>,
    state: CoordinatorState,
}

impl Coordinator {
    /// Create a coordinator with a logger derived from `config`
    pub fn new(config: Config, client: Arc<dyn HttpClient>, sink: Arc<dyn ReportSink>) -> Self {
        let logger = Arc::new(Logger::with_config("COORD".to_string(), &config));
        Self {
            config,
            client,
            sink,
            logger,
            state: CoordinatorState::Idle,
        }
    }

    /// Replace the logger shared with every hammer
    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the worker tasks, ids dense over `0..hammers`
    pub fn build_hammers(&self) -> Vec<Hammer> {
        let url: Arc<str> = Arc::from(self.config.url.as_str());
        (0..self.config.hammers)
            .map(|id| Hammer::new(id, Arc::clone(&url), self.config.throws, self.config.verbose))
            .collect()
    }

    fn transition(&mut self, next: CoordinatorState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal coordinator transition {} -> {}",
            self.state,
            next
        );
        crate::log_debug!(self.logger, "coordinator {} -> {}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, error: AppError) -> AppError {
        self.logger
            .error("run failed, no total average reported")
            .error_info(&error)
            .field("state", self.state.as_str())
            .log();
        self.transition(CoordinatorState::Failed);
        error
    }

    /// Run every hammer and report the total average
    ///
    /// Invalid configurations are rejected before anything is dispatched.
    /// A coordinator runs at most once.
    pub async fn run(&mut self) -> Result<RunSummary> {
        if self.state != CoordinatorState::Idle {
            return Err(AppError::internal(format!(
                "coordinator already used (state: {})",
                self.state
            )));
        }
        self.config.validate()?;

        let started_at = Utc::now();
        let wall_start = Instant::now();
        let hammer_count = self.config.hammers as usize;

        self.transition(CoordinatorState::Dispatching);
        crate::log_info!(
            self.logger,
            "dispatching {} hammers x {} throws against {}",
            self.config.hammers,
            self.config.throws,
            self.config.url
        );

        let slots = Arc::new(Semaphore::new(hammer_count));
        let mut tasks: JoinSet<Result<HammerResult>> = JoinSet::new();

        for hammer in self.build_hammers() {
            let slots = Arc::clone(&slots);
            let client = Arc::clone(&self.client);
            let sink = Arc::clone(&self.sink);
            let logger = Arc::clone(&self.logger);

            tasks.spawn(async move {
                let _slot = slots
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::internal(format!("hammer slot pool closed: {}", e)))?;
                hammer.run(client.as_ref(), sink.as_ref(), &logger).await
            });
        }

        self.transition(CoordinatorState::AwaitingAll);

        let mut results: Vec<Option<HammerResult>> = vec![None; hammer_count];
        while let Some(joined) = tasks.join_next().await {
            match joined.map_err(AppError::from).and_then(|outcome| outcome) {
                Ok(result) => {
                    if let Some(slot) = results.get_mut(result.hammer as usize) {
                        *slot = Some(result);
                    }
                }
                Err(error) => {
                    tasks.abort_all();
                    return Err(self.fail(error));
                }
            }
        }

        let ordered = match collect_in_order(results) {
            Ok(ordered) => ordered,
            Err(error) => return Err(self.fail(error)),
        };

        let summary = match RunSummary::from_results(&ordered, self.config.throws, wall_start.elapsed(), started_at) {
            Ok(summary) => summary,
            Err(error) => return Err(self.fail(error)),
        };

        if let Err(error) = self.sink.emit(&format_total_average(summary.total_average_secs)) {
            return Err(self.fail(error));
        }

        self.transition(CoordinatorState::Aggregated);
        crate::log_debug!(self.logger, "run complete: {}", format_run_digest(&summary));

        Ok(summary)
    }
}

/// Results in hammer-id order; every id must have reported
fn collect_in_order(results: Vec<Option<HammerResult>>) -> Result<Vec<HammerResult>> {
    results
        .into_iter()
        .enumerate()
        .map(|(id, result)| {
            result.ok_or_else(|| AppError::internal(format!("hammer {} finished without a result", id as HammerId)))
        })
        .collect()
}

/// Run a full load test and return the total average latency in seconds
pub async fn coordinate(
    config: Config,
    client: Arc<dyn HttpClient>,
    sink: Arc<dyn ReportSink>,
) -> Result<f64> {
    let mut coordinator = Coordinator::new(config, client, sink);
    let summary = coordinator.run().await?;
    Ok(summary.total_average_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HttpRequest, HttpResponse};
    use crate::output::BufferSink;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Latency script keyed by (hammer, throw)
    #[derive(Default)]
    struct MockClient {
        delays_ms: HashMap<(HammerId, u32), u64>,
        default_delay_ms: u64,
        failures: HashSet<(HammerId, u32)>,
        calls: AtomicUsize,
    }

    impl MockClient {
        fn fixed(delay_ms: u64) -> Self {
            Self {
                default_delay_ms: delay_ms,
                ..Self::default()
            }
        }

        fn script(mut self, hammer: HammerId, delays_ms: &[u64]) -> Self {
            for (throw, delay) in delays_ms.iter().enumerate() {
                self.delays_ms.insert((hammer, throw as u32), *delay);
            }
            self
        }

        fn fail(mut self, hammer: HammerId, throw: u32) -> Self {
            self.failures.insert((hammer, throw));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpClient for MockClient {
        async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = (request.hammer, request.throw);
            let delay = self.delays_ms.get(&key).copied().unwrap_or(self.default_delay_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if self.failures.contains(&key) {
                return Err(AppError::network("simulated connection reset"));
            }
            Ok(HttpResponse {
                status_code: 200,
                body: "ok".to_string(),
                final_url: request.url.to_string(),
            })
        }
    }

    fn config(hammers: u32, throws: u32) -> Config {
        Config::new("http://example.test/").with_hammers(hammers).with_throws(throws)
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_hammer_scenario() {
        let client = Arc::new(MockClient::default().script(0, &[100, 200]).script(1, &[300, 400]));
        let sink = BufferSink::new();
        let mut coordinator = Coordinator::new(config(2, 2), client, Arc::new(sink.clone()));

        let summary = coordinator.run().await.unwrap();

        assert_eq!(summary.hammer_averages, vec![0.15, 0.35]);
        assert_eq!(summary.total_average_secs, 0.25);
        assert_eq!(coordinator.state(), CoordinatorState::Aggregated);
        assert!(sink.lines().contains(&"Hammer: 0, AVERAGE   , Elapsed Time: 0.15".to_string()));
        assert!(sink.lines().contains(&"Hammer: 1, AVERAGE   , Elapsed Time: 0.35".to_string()));
        assert_eq!(sink.lines().last().unwrap(), "TOTAL AVERAGE ELAPSED TIME: 0.25");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_counts() {
        let client = Arc::new(MockClient::fixed(50));
        let sink = BufferSink::new();
        let mut coordinator = Coordinator::new(config(5, 3), client.clone(), Arc::new(sink.clone()));

        let summary = coordinator.run().await.unwrap();

        assert_eq!(client.calls(), 15);
        assert_eq!(summary.total_throws, 15);
        assert_eq!(sink.lines_starting_with("Hammer:").len(), 20);
        assert_eq!(sink.lines().iter().filter(|l| l.contains("AVERAGE   ,")).count(), 5);
        assert_eq!(sink.lines_starting_with("TOTAL AVERAGE ELAPSED TIME:").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hammers_run_concurrently() {
        let client = Arc::new(MockClient::fixed(1_000));
        let sink = Arc::new(BufferSink::new());
        let mut coordinator = Coordinator::new(config(8, 1), client, sink);

        let summary = coordinator.run().await.unwrap();

        assert!(summary.wall_time < Duration::from_millis(1_500));
        assert_eq!(summary.total_average_secs, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_hammer_single_throw() {
        let client = Arc::new(MockClient::default().script(0, &[420]));
        let total = coordinate(config(1, 1), client, Arc::new(BufferSink::new())).await.unwrap();
        assert_eq!(total, 0.42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_runs_are_identical() {
        let mut totals = Vec::new();
        for _ in 0..3 {
            let client = Arc::new(MockClient::default().script(0, &[120, 80]).script(1, &[250, 250]).script(2, &[10, 30]));
            totals.push(coordinate(config(3, 2), client, Arc::new(BufferSink::new())).await.unwrap());
        }
        assert!(totals.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(totals[0], 0.12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_suppresses_total() {
        let client = Arc::new(MockClient::fixed(100).fail(1, 1));
        let sink = BufferSink::new();
        let mut coordinator = Coordinator::new(config(3, 2), client, Arc::new(sink.clone()));

        let error = coordinator.run().await.unwrap_err();

        assert!(matches!(error, AppError::Network(_)));
        assert_eq!(coordinator.state(), CoordinatorState::Failed);
        assert!(sink.lines_starting_with("TOTAL AVERAGE").is_empty());
        assert!(sink.lines_starting_with("Hammer: 1, AVERAGE").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_counts_rejected_before_dispatch() {
        for (hammers, throws) in [(0, 1), (1, 0), (0, 0)] {
            let client = Arc::new(MockClient::fixed(10));
            let sink = BufferSink::new();
            let mut coordinator = Coordinator::new(config(hammers, throws), client.clone(), Arc::new(sink.clone()));

            let error = coordinator.run().await.unwrap_err();

            assert!(error.is_usage_error());
            assert_eq!(client.calls(), 0);
            assert!(sink.lines().is_empty());
            assert_eq!(coordinator.state(), CoordinatorState::Idle);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_coordinator_runs_once() {
        let client = Arc::new(MockClient::fixed(10));
        let mut coordinator = Coordinator::new(config(1, 1), client, Arc::new(BufferSink::new()));

        coordinator.run().await.unwrap();
        let error = coordinator.run().await.unwrap_err();
        assert_eq!(error.category(), "INTERNAL");
    }

    #[test]
    fn test_build_hammers_dense_ids() {
        let coordinator = Coordinator::new(
            config(4, 7),
            Arc::new(MockClient::fixed(0)),
            Arc::new(BufferSink::new()),
        );
        let hammers = coordinator.build_hammers();
        let ids: Vec<HammerId> = hammers.iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(hammers.iter().all(|h| h.throws() == 7));
    }

    #[test]
    fn test_collect_in_order_detects_gaps() {
        let complete = vec![
            Some(HammerResult { hammer: 0, average_secs: 0.1 }),
            Some(HammerResult { hammer: 1, average_secs: 0.2 }),
        ];
        assert_eq!(collect_in_order(complete).unwrap().len(), 2);

        let gap = vec![Some(HammerResult { hammer: 0, average_secs: 0.1 }), None];
        assert!(collect_in_order(gap).is_err());
    }
}
