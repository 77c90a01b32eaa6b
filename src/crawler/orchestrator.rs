//! Per-URL orchestration and the batch loop
//!
//! Each URL is driven through `Start -> Fetching -> Parsing -> Extracting ->
//! Validating -> Recorded`, ending early in `Failed` or `Skipped`. One URL
//! is finished before the next one starts. A failed URL never aborts the
//! batch.

use crate::config::Config;
use crate::crawler::fetcher::{build_transport, FetchRequest, FetchResponse, Transport};
use crate::crawler::headers::HeaderProfile;
use crate::crawler::parser::{extract_page, parse_document};
use crate::crawler::rate::RateController;
use crate::crawler::retry::{RetryExecutor, RetryPolicy};
use crate::metrics::MetricsRecorder;
use crate::output::ScrapeReport;
use crate::page::{ErrorRecord, ExtractedPage};
use crate::proxy::ProxyPool;
use crate::quality::validate;
use crate::robots::{build_gate, PolicyGate};
use crate::state::PageState;
use crate::{HarvestError, TransportError};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Mutable state shared by every URL of a batch
///
/// Passed explicitly to the orchestrator. Nothing here is locked; running
/// several orchestrators over one session needs external synchronization.
#[derive(Debug, Clone)]
pub struct ScrapeSession {
    pub proxies: ProxyPool,
    pub rate: RateController,
    pub retry: RetryExecutor,
    pub metrics: MetricsRecorder,
}

impl ScrapeSession {
    pub fn new(proxies: ProxyPool, rate: RateController, retry: RetryExecutor) -> Self {
        Self {
            proxies,
            rate,
            retry,
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ProxyPool::new(config.proxies.addresses.iter().cloned()),
            RateController::from_config(&config.rate_limit),
            RetryExecutor::new(RetryPolicy::from(&config.retry)),
        )
    }
}

/// How one URL ended
#[derive(Debug, Clone, PartialEq)]
pub enum UrlOutcome {
    Recorded(ExtractedPage),
    Failed(ErrorRecord),
    /// Denied by the policy gate; no metrics were recorded
    Skipped { url: String },
}

impl UrlOutcome {
    /// The terminal state this outcome corresponds to
    pub fn state(&self) -> PageState {
        match self {
            Self::Recorded(_) => PageState::Recorded,
            Self::Failed(_) => PageState::Failed,
            Self::Skipped { .. } => PageState::Skipped,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Recorded(page) => page.url(),
            Self::Failed(error) => &error.url,
            Self::Skipped { url } => url,
        }
    }
}

/// Drives URLs through the scraping state machine
///
/// The transport and policy gate are fixed at construction; the orchestrator
/// does not know which variants it holds.
pub struct Orchestrator {
    transport: Box<dyn Transport>,
    gate: Box<dyn PolicyGate>,
    headers: HeaderProfile,
    request_timeout: Duration,
    stop: Option<Arc<AtomicBool>>,
}

impl Orchestrator {
    pub fn new(
        transport: Box<dyn Transport>,
        gate: Box<dyn PolicyGate>,
        headers: HeaderProfile,
        request_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            gate,
            headers,
            request_timeout,
            stop: None,
        }
    }

    /// Builds an orchestrator with the transport and gate named in `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to run
    /// * `Err(HarvestError)` - Transport or gate could not be built
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let transport = build_transport(&config.session, &config.proxies.addresses)?;
        let gate = build_gate(config)?;
        tracing::debug!("Using {} transport", transport.name());

        Ok(Self::new(
            transport,
            gate,
            HeaderProfile::new(&config.user_agent),
            Duration::from_secs(config.session.request_timeout),
        ))
    }

    /// Sets a flag that stops the batch before the next URL starts
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Runs every URL in order and collects the results
    ///
    /// Between URLs the session's rate controller is asked for a delay as if
    /// the previous URL succeeded, whatever its real outcome. If the stop
    /// flag is set, the remaining URLs are left unprocessed.
    pub async fn run(&self, session: &mut ScrapeSession, urls: &[String]) -> ScrapeReport {
        let started_at = Utc::now();
        let total = urls.len();

        let mut pages = Vec::new();
        let mut errors = Vec::new();
        let mut skipped = Vec::new();

        for (index, url) in urls.iter().enumerate() {
            if self.stop_requested() {
                tracing::info!("Stop requested, {} URLs not started", total - index);
                break;
            }

            if index > 0 {
                let delay = session.rate.next_delay(true);
                tracing::debug!("Pacing {:.2}s before next URL", delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }

            tracing::info!("[{}/{}] Scraping {}", index + 1, total, url);

            match self.process_url(session, url).await {
                Ok(UrlOutcome::Recorded(page)) => {
                    tracing::info!(
                        "Recorded {} (quality {})",
                        page.url(),
                        page.quality_score()
                    );
                    pages.push(page);
                }
                Ok(UrlOutcome::Failed(error)) => {
                    tracing::info!("Failed {}: {}", error.url, error.reason);
                    errors.push(error);
                }
                Ok(UrlOutcome::Skipped { url }) => {
                    tracing::info!("{}", HarvestError::PolicyRejection { url: url.clone() });
                    skipped.push(url);
                }
                Err(e) => {
                    tracing::error!("Aborted {}: {}", url, e);
                    errors.push(ErrorRecord::new(url.as_str(), e.to_string()));
                }
            }
        }

        let metrics = session.metrics.snapshot();
        tracing::info!(
            "Batch finished: {} recorded, {} failed, {} skipped ({:.1}% success)",
            pages.len(),
            errors.len(),
            skipped.len(),
            metrics.success_rate * 100.0
        );

        ScrapeReport {
            started_at,
            finished_at: Utc::now(),
            total_urls: total,
            pages,
            errors,
            skipped,
            metrics,
        }
    }

    /// Drives one URL to a terminal state
    ///
    /// Fetch and parse failures become `UrlOutcome::Failed` with metrics
    /// recorded. A gate denial becomes `UrlOutcome::Skipped` with no side
    /// effects on the session.
    ///
    /// # Returns
    ///
    /// * `Ok(UrlOutcome)` - The URL reached a terminal state
    /// * `Err(HarvestError)` - The state machine was driven along an edge it
    ///   does not have
    pub async fn process_url(
        &self,
        session: &mut ScrapeSession,
        url: &str,
    ) -> Result<UrlOutcome, HarvestError> {
        let state = PageState::Start;

        if !self.gate.allows(url).await {
            transition(url, state, PageState::Skipped)?;
            return Ok(UrlOutcome::Skipped {
                url: url.to_string(),
            });
        }

        let state = transition(url, state, PageState::Fetching)?;
        let (response, proxy) = match self.fetch_with_retry(session, url).await {
            Ok(fetched) => fetched,
            Err((error, last_proxy)) => {
                if let Some(proxy) = last_proxy.as_deref() {
                    session.proxies.record_outcome(proxy, false, 0.0);
                }
                session.metrics.record(url, false, 0.0, None);
                transition(url, state, PageState::Failed)?;
                return Ok(UrlOutcome::Failed(ErrorRecord::new(url, error.to_string())));
            }
        };
        let response_time = response.elapsed.as_secs_f64();

        let state = transition(url, state, PageState::Parsing)?;
        let Some(document) = parse_document(&response.body) else {
            session.metrics.record(url, false, response_time, None);
            transition(url, state, PageState::Failed)?;
            let error = HarvestError::Parse {
                url: url.to_string(),
            };
            return Ok(UrlOutcome::Failed(ErrorRecord::new(url, error.to_string())));
        };

        let state = transition(url, state, PageState::Extracting)?;
        let content = extract_page(&document, url);

        let state = transition(url, state, PageState::Validating)?;
        let validation = validate(&content);
        session
            .metrics
            .record(url, true, response_time, Some(validation.quality_score));
        if let Some(proxy) = proxy.as_deref() {
            session.proxies.record_outcome(proxy, true, response_time);
        }

        transition(url, state, PageState::Recorded)?;
        Ok(UrlOutcome::Recorded(ExtractedPage {
            content,
            validation,
        }))
    }

    /// Fetches `url` under the session's retry policy
    ///
    /// Every attempt picks the best proxy at that moment and gets fresh
    /// headers. Each failed attempt except the last is charged to its proxy
    /// here; the last one is left to the caller.
    ///
    /// # Returns
    ///
    /// * `Ok((response, proxy))` - The successful response and the proxy used
    /// * `Err((error, proxy))` - The final error and the last proxy used
    async fn fetch_with_retry(
        &self,
        session: &mut ScrapeSession,
        url: &str,
    ) -> Result<(FetchResponse, Option<String>), (TransportError, Option<String>)> {
        let ScrapeSession { proxies, retry, .. } = session;
        let transport = self.transport.as_ref();
        let mut last_proxy: Option<String> = None;

        let result = retry
            .execute(|attempt| {
                if attempt > 0 {
                    if let Some(previous) = last_proxy.as_deref() {
                        proxies.record_outcome(previous, false, 0.0);
                    }
                }

                let proxy = proxies.select_best();
                last_proxy = proxy.clone();
                let request = FetchRequest {
                    url: url.to_string(),
                    headers: self.headers.build(),
                    proxy,
                    timeout: self.request_timeout,
                };
                tracing::trace!(
                    "Attempt {} for {} via {}",
                    attempt + 1,
                    url,
                    request.proxy.as_deref().unwrap_or("direct")
                );

                async move { transport.fetch(request).await }
            })
            .await;

        match result {
            Ok(response) => Ok((response, last_proxy)),
            Err(error) => Err((error, last_proxy)),
        }
    }
}

fn transition(url: &str, from: PageState, to: PageState) -> Result<PageState, HarvestError> {
    let next = from.advance(to)?;
    tracing::debug!("{}: {} -> {}", url, from, next);
    Ok(next)
}
