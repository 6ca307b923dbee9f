//! A single hammer: sequential throws against one URL

use crate::{
    client::{HttpClient, HttpRequest},
    error::Result,
    logging::Logger,
    models::{HammerResult, ThrowMeasurement},
    output::{format_hammer_average, format_throw, ReportSink},
    stats::RunningAverage,
    types::HammerId,
};
use std::sync::Arc;
use tokio::time::Instant;

/// One worker task: `throws` sequential GET requests to `url`
///
/// A hammer is consumed by exactly one run. Throw `n + 1` is not issued until
/// throw `n` has been answered and measured.
#[derive(Debug, Clone)]
pub struct Hammer {
    id: HammerId,
    url: Arc<str>,
    throws: u32,
    verbose: bool,
}

impl Hammer {
    pub fn new(id: HammerId, url: Arc<str>, throws: u32, verbose: bool) -> Self {
        Self {
            id,
            url,
            throws,
            verbose,
        }
    }

    pub fn id(&self) -> HammerId {
        self.id
    }

    pub fn throws(&self) -> u32 {
        self.throws
    }

    /// Perform every throw and return the rounded average latency
    ///
    /// The first failing request aborts the hammer; no partial average is
    /// reported for it.
    pub async fn run(
        self,
        client: &dyn HttpClient,
        sink: &dyn ReportSink,
        logger: &Logger,
    ) -> Result<HammerResult> {
        let mut running = RunningAverage::new();

        for throw in 0..self.throws {
            let request = HttpRequest::new(Arc::clone(&self.url), self.id, throw);

            let start = Instant::now();
            let response = match client.get(&request).await {
                Ok(response) => response,
                Err(error) => {
                    logger
                        .error("throw failed")
                        .field("hammer", self.id)
                        .field("throw", throw)
                        .field("url", &*self.url)
                        .error_info(&error)
                        .log();
                    return Err(error);
                }
            };
            let measurement = ThrowMeasurement::from_elapsed(self.id, throw, start.elapsed());

            if self.verbose {
                sink.emit(&response.body)?;
            }
            sink.emit(&format_throw(&measurement))?;

            logger
                .trace("throw measured")
                .measurement(&measurement)
                .field("status", response.status_code)
                .log();

            running.record(measurement.elapsed_secs);
        }

        let result = HammerResult {
            hammer: self.id,
            average_secs: running.average()?,
        };
        sink.emit(&format_hammer_average(&result))?;

        crate::log_debug!(
            logger,
            "hammer {} finished {} throws, average {:.2}s",
            self.id,
            running.count(),
            result.average_secs
        );

        Ok(result)
    }
}
