//! Faceted search pipeline.
//!
//! Two states: idle, or refreshing while a submission is in flight. Every
//! submission is stamped with a monotonically increasing token and only the
//! response for the latest token is rendered; anything older is dropped.
//! Rendered regions are only ever replaced as a pair, so a failed or stale
//! request leaves the page exactly as it was.

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::search::{
    client::{FacetRequest, FacetRequestError, SearchApi},
    config::FacetRequestConfig,
    params::FacetParams,
    regions::{PageEvent, PageRegions, Region},
    validation::{ValidationFailure, ValidationMessages},
};

/// Duration of the scroll-to-top animation after new results are rendered.
pub const SCROLL_RESET_DURATION: Duration = Duration::from_millis(100);

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl Display for RequestToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,

    /// Waiting on the response for this token.
    Refreshing(RequestToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The response was rendered.
    Applied(RequestToken),

    /// A newer submission was issued meanwhile; this response was dropped.
    Superseded(RequestToken),
}

#[derive(Debug, Error)]
pub enum FacetSearchError {
    /// The parameters were rejected before any request was made.
    #[error("invalid search parameters")]
    Validation(#[source] ValidationFailure),

    /// The latest request failed; the page was left unchanged.
    #[error("search request {token} failed")]
    Request {
        token: RequestToken,
        #[source]
        source: FacetRequestError,
    },
}

/// Issued and pending tokens. Zero means nothing is pending.
#[derive(Debug, Default)]
struct RequestTracker {
    issued: AtomicU64,
    pending: AtomicU64,
}

impl RequestTracker {
    fn issue(&self) -> RequestToken {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        self.pending.fetch_max(token, Ordering::SeqCst);

        RequestToken(token)
    }

    fn is_latest(&self, token: RequestToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }

    /// Clears the pending token if it is still `token`.
    fn settle(&self, token: RequestToken) {
        _ = self
            .pending
            .compare_exchange(token.0, 0, Ordering::SeqCst, Ordering::SeqCst);
    }

    fn state(&self) -> PipelineState {
        match self.pending.load(Ordering::SeqCst) {
            0 => PipelineState::Idle,
            token => PipelineState::Refreshing(RequestToken(token)),
        }
    }
}

/// Settles its token when dropped, including when the submission future is
/// dropped before completing.
struct Settle<'a> {
    tracker: &'a RequestTracker,
    token: RequestToken,
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        self.tracker.settle(self.token);
    }
}

/// Settings for [`FacetedSearch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetedSearchSettings {
    pub request: FacetRequestConfig,
    pub messages: ValidationMessages,
    pub scroll_duration: Duration,
}

impl Default for FacetedSearchSettings {
    fn default() -> Self {
        Self {
            request: FacetRequestConfig::default(),
            messages: ValidationMessages::default(),
            scroll_duration: SCROLL_RESET_DURATION,
        }
    }
}

/// Submits search changes and renders the latest response into the page.
pub struct FacetedSearch {
    api: Arc<dyn SearchApi>,
    regions: Arc<dyn PageRegions>,
    settings: FacetedSearchSettings,
    tracker: RequestTracker,
    render: Mutex<()>,
}

impl Debug for FacetedSearch {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FacetedSearch")
            .field("settings", &self.settings)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

impl FacetedSearch {
    #[must_use]
    pub fn new(
        api: Arc<dyn SearchApi>,
        regions: Arc<dyn PageRegions>,
        settings: FacetedSearchSettings,
    ) -> Self {
        Self {
            api,
            regions,
            settings,
            tracker: RequestTracker::default(),
            render: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &FacetRequestConfig {
        &self.settings.request
    }

    pub fn state(&self) -> PipelineState {
        self.tracker.state()
    }

    /// Submit a filter, sort or pagination change.
    ///
    /// # Errors
    ///
    /// Returns [`FacetSearchError::Validation`] without touching the network
    /// when the price range is invalid, and [`FacetSearchError::Request`] when
    /// the latest request fails or its response lacks a region. The pipeline
    /// is idle again and the page unchanged in both cases.
    pub async fn submit_facet_change(
        &self,
        params: &FacetParams,
    ) -> Result<SubmitOutcome, FacetSearchError> {
        let request = FacetRequest::build(&self.settings.request, params).map_err(|error| {
            debug!("rejected search parameters: {error}");

            FacetSearchError::Validation(ValidationFailure::new(error, &self.settings.messages))
        })?;

        let token = self.tracker.issue();
        let _settle = Settle {
            tracker: &self.tracker,
            token,
        };

        debug!("search {token} submitted for {}", request.path);

        let response = self.api.fetch(&request).await;

        let _render = self.render.lock().await;

        if !self.tracker.is_latest(token) {
            debug!("search {token} superseded, dropping response");

            return Ok(SubmitOutcome::Superseded(token));
        }

        let content = response.map_err(|source| {
            warn!("search {token} failed: {source}");

            FacetSearchError::Request { token, source }
        })?;

        let (Some(listing), Some(sidebar)) = (
            content.get(Region::ProductListing),
            content.get(Region::Sidebar),
        ) else {
            let missing = if content.get(Region::ProductListing).is_none() {
                Region::ProductListing
            } else {
                Region::Sidebar
            };

            warn!("search {token} response is missing {missing}");

            return Err(FacetSearchError::Request {
                token,
                source: FacetRequestError::MissingRegion(missing),
            });
        };

        // Rendered under the render lock so a newer response cannot
        // interleave with this one.
        self.regions.replace_regions(listing, sidebar);
        self.regions.broadcast(PageEvent::CompareReset);
        self.regions.scroll_to_top(self.settings.scroll_duration);

        info!("search {token} applied");

        Ok(SubmitOutcome::Applied(token))
    }

    /// Load the full option list for `facet` on the page at `path`.
    ///
    /// Does not affect the listing or sidebar, nor the submission ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no
    /// show-more fragment.
    pub async fn show_more(&self, path: &str, facet: &str) -> Result<(), FacetRequestError> {
        let request = FacetRequest::show_more(&self.settings.request, path, facet);

        let content = self.api.fetch(&request).await?;

        let fragment = content
            .get(Region::ShowMore)
            .ok_or(FacetRequestError::MissingRegion(Region::ShowMore))?;

        self.regions.show_facet_options(facet, fragment);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use mockall::{Sequence, predicate::eq};
    use reqwest::StatusCode;
    use testresult::TestResult;
    use tokio::sync::oneshot;

    use crate::{
        http::HttpError,
        search::{
            client::MockSearchApi,
            regions::{FacetResponseContent, MockPageRegions},
            validation::{PriceField, PriceValidationError},
        },
    };

    use super::*;

    fn content(listing: &str, sidebar: &str) -> FacetResponseContent {
        [(Region::ProductListing, listing), (Region::Sidebar, sidebar)]
            .into_iter()
            .collect()
    }

    fn pipeline(api: impl SearchApi + 'static, regions: MockPageRegions) -> FacetedSearch {
        FacetedSearch::new(
            Arc::new(api),
            Arc::new(regions),
            FacetedSearchSettings::default(),
        )
    }

    fn untouched_regions() -> MockPageRegions {
        let mut regions = MockPageRegions::new();

        regions.expect_replace_regions().never();
        regions.expect_broadcast().never();
        regions.expect_scroll_to_top().never();
        regions.expect_show_facet_options().never();

        regions
    }

    #[tokio::test]
    async fn applies_both_regions_then_resets_compare_and_scroll() -> TestResult {
        let mut api = MockSearchApi::new();

        api.expect_fetch()
            .once()
            .withf(|request: &FacetRequest| {
                request.path == "/shoes/"
                    && request.query == vec![("brand".to_string(), "Acme".to_string())]
            })
            .return_once(|_| Ok(content("<ul>new</ul>", "<nav>new</nav>")));

        let mut regions = MockPageRegions::new();
        let mut seq = Sequence::new();

        regions
            .expect_replace_regions()
            .once()
            .in_sequence(&mut seq)
            .withf(|listing: &str, sidebar: &str| {
                listing == "<ul>new</ul>" && sidebar == "<nav>new</nav>"
            })
            .return_const(());
        regions
            .expect_broadcast()
            .once()
            .in_sequence(&mut seq)
            .with(eq(PageEvent::CompareReset))
            .return_const(());
        regions
            .expect_scroll_to_top()
            .once()
            .in_sequence(&mut seq)
            .with(eq(Duration::from_millis(100)))
            .return_const(());

        let search = pipeline(api, regions);

        let outcome = search
            .submit_facet_change(&FacetParams::new("/shoes/").with_filter("brand", "Acme"))
            .await?;

        assert!(
            matches!(outcome, SubmitOutcome::Applied(_)),
            "expected Applied, got {outcome:?}"
        );
        assert_eq!(search.state(), PipelineState::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn min_greater_than_max_never_reaches_the_network() -> TestResult {
        let mut api = MockSearchApi::new();

        api.expect_fetch().never();

        let search = pipeline(api, untouched_regions());

        let result = search
            .submit_facet_change(&FacetParams::new("/shoes/").with_price("50", "10"))
            .await;

        let failure = match result {
            Err(FacetSearchError::Validation(failure)) => failure,
            other => return Err(format!("expected Validation error, got {other:?}").into()),
        };

        assert_eq!(failure.error, PriceValidationError::MinGreaterThanMax);
        assert_eq!(
            failure.messages,
            vec![
                (
                    PriceField::Min,
                    ValidationMessages::default().on_min_price_error
                ),
                (
                    PriceField::Max,
                    ValidationMessages::default().on_max_price_error
                ),
            ]
        );
        assert_eq!(search.state(), PipelineState::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn failed_request_returns_to_idle_and_keeps_page() {
        let mut api = MockSearchApi::new();

        api.expect_fetch().once().return_once(|_| {
            Err(FacetRequestError::Http(HttpError::UnexpectedStatus {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: String::new(),
            }))
        });

        let search = pipeline(api, untouched_regions());

        let result = search
            .submit_facet_change(&FacetParams::new("/shoes/"))
            .await;

        assert!(
            matches!(result, Err(FacetSearchError::Request { .. })),
            "expected Request error, got {result:?}"
        );
        assert_eq!(search.state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn response_missing_sidebar_is_not_partially_applied() {
        let mut api = MockSearchApi::new();

        api.expect_fetch().once().return_once(|_| {
            Ok([(Region::ProductListing, "<ul>new</ul>")]
                .into_iter()
                .collect())
        });

        let search = pipeline(api, untouched_regions());

        let result = search
            .submit_facet_change(&FacetParams::new("/shoes/"))
            .await;

        assert!(
            matches!(
                result,
                Err(FacetSearchError::Request {
                    source: FacetRequestError::MissingRegion(Region::Sidebar),
                    ..
                })
            ),
            "expected MissingRegion(sidebar), got {result:?}"
        );
    }

    /// Holds each request until the test releases it.
    struct GatedSearchApi {
        gates: StdMutex<Vec<oneshot::Receiver<Result<FacetResponseContent, FacetRequestError>>>>,
    }

    #[async_trait]
    impl SearchApi for GatedSearchApi {
        async fn fetch(
            &self,
            _request: &FacetRequest,
        ) -> Result<FacetResponseContent, FacetRequestError> {
            let gate = self
                .gates
                .lock()
                .expect("gate lock should not be poisoned")
                .remove(0);

            gate.await.expect("gate sender should not be dropped")
        }
    }

    /// Records every replacement so the final page can be inspected.
    #[derive(Default)]
    struct RecordingRegions {
        rendered: StdMutex<Vec<(String, String)>>,
    }

    impl PageRegions for RecordingRegions {
        fn replace_regions(&self, product_listing: &str, sidebar: &str) {
            self.rendered
                .lock()
                .expect("render lock should not be poisoned")
                .push((product_listing.to_string(), sidebar.to_string()));
        }

        fn broadcast(&self, _event: PageEvent) {}

        fn scroll_to_top(&self, _duration: Duration) {}

        fn show_facet_options(&self, _facet: &str, _fragment: &str) {}
    }

    fn gated(
        gates: Vec<oneshot::Receiver<Result<FacetResponseContent, FacetRequestError>>>,
        regions: Arc<RecordingRegions>,
    ) -> Arc<FacetedSearch> {
        Arc::new(FacetedSearch::new(
            Arc::new(GatedSearchApi {
                gates: StdMutex::new(gates),
            }),
            regions,
            FacetedSearchSettings::default(),
        ))
    }

    #[tokio::test]
    async fn stale_response_is_dropped_when_it_arrives_last() -> TestResult {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();

        let regions = Arc::new(RecordingRegions::default());
        let search = gated(vec![first_rx, second_rx], regions.clone());

        let first = tokio::spawn({
            let search = search.clone();
            async move {
                search
                    .submit_facet_change(&FacetParams::new("/shoes/").with_filter("size", "S"))
                    .await
            }
        });

        while search.state() == PipelineState::Idle {
            tokio::task::yield_now().await;
        }

        let second = tokio::spawn({
            let search = search.clone();
            async move {
                search
                    .submit_facet_change(&FacetParams::new("/shoes/").with_filter("size", "M"))
                    .await
            }
        });

        while search.state() != PipelineState::Refreshing(RequestToken(2)) {
            tokio::task::yield_now().await;
        }

        second_tx
            .send(Ok(content("<ul>M</ul>", "<nav>M</nav>")))
            .map_err(|unsent| format!("second request dropped: {unsent:?}"))?;
        let second = second.await??;

        first_tx
            .send(Ok(content("<ul>S</ul>", "<nav>S</nav>")))
            .map_err(|unsent| format!("first request dropped: {unsent:?}"))?;
        let first = first.await??;

        assert_eq!(second, SubmitOutcome::Applied(RequestToken(2)));
        assert_eq!(first, SubmitOutcome::Superseded(RequestToken(1)));
        assert_eq!(
            *regions.rendered.lock().expect("render lock should not be poisoned"),
            vec![("<ul>M</ul>".to_string(), "<nav>M</nav>".to_string())]
        );
        assert_eq!(search.state(), PipelineState::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn stale_failure_is_superseded_and_keeps_newer_results() -> TestResult {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();

        let regions = Arc::new(RecordingRegions::default());
        let search = gated(vec![first_rx, second_rx], regions.clone());

        let first = tokio::spawn({
            let search = search.clone();
            async move {
                search
                    .submit_facet_change(&FacetParams::new("/shoes/").with_page(2))
                    .await
            }
        });

        while search.state() == PipelineState::Idle {
            tokio::task::yield_now().await;
        }

        let second = tokio::spawn({
            let search = search.clone();
            async move {
                search
                    .submit_facet_change(&FacetParams::new("/shoes/").with_page(3))
                    .await
            }
        });

        while search.state() != PipelineState::Refreshing(RequestToken(2)) {
            tokio::task::yield_now().await;
        }

        second_tx
            .send(Ok(content("<ul>3</ul>", "<nav>3</nav>")))
            .map_err(|unsent| format!("second request dropped: {unsent:?}"))?;
        let second = second.await??;

        first_tx
            .send(Err(FacetRequestError::Http(HttpError::UnexpectedStatus {
                status: StatusCode::GATEWAY_TIMEOUT,
                body: String::new(),
            })))
            .map_err(|unsent| format!("first request dropped: {unsent:?}"))?;
        let first = first.await??;

        assert_eq!(second, SubmitOutcome::Applied(RequestToken(2)));
        assert_eq!(first, SubmitOutcome::Superseded(RequestToken(1)));
        assert_eq!(
            *regions.rendered.lock().expect("render lock should not be poisoned"),
            vec![("<ul>3</ul>".to_string(), "<nav>3</nav>".to_string())]
        );
        assert_eq!(search.state(), PipelineState::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn abandoned_submission_returns_to_idle() {
        let (_gate_tx, gate_rx) = oneshot::channel();

        let regions = Arc::new(RecordingRegions::default());
        let search = gated(vec![gate_rx], regions.clone());

        let submission = tokio::spawn({
            let search = search.clone();
            async move {
                search
                    .submit_facet_change(&FacetParams::new("/shoes/"))
                    .await
            }
        });

        while search.state() == PipelineState::Idle {
            tokio::task::yield_now().await;
        }

        submission.abort();

        let joined = submission.await;

        assert!(
            joined.as_ref().is_err_and(tokio::task::JoinError::is_cancelled),
            "expected cancelled submission, got {joined:?}"
        );
        assert_eq!(search.state(), PipelineState::Idle);
        assert!(
            regions
                .rendered
                .lock()
                .expect("render lock should not be poisoned")
                .is_empty(),
            "nothing rendered"
        );
    }

    #[tokio::test]
    async fn show_more_renders_facet_options_only() -> TestResult {
        let mut api = MockSearchApi::new();

        api.expect_fetch()
            .once()
            .withf(|request: &FacetRequest| {
                request.query == vec![("list_all".to_string(), "brand".to_string())]
            })
            .return_once(|_| {
                Ok([(Region::ShowMore, "<li>All brands</li>")]
                    .into_iter()
                    .collect())
            });

        let mut regions = MockPageRegions::new();

        regions.expect_replace_regions().never();
        regions
            .expect_show_facet_options()
            .once()
            .withf(|facet: &str, fragment: &str| {
                facet == "brand" && fragment == "<li>All brands</li>"
            })
            .return_const(());

        let search = pipeline(api, regions);

        search.show_more("/shoes/", "brand").await?;

        assert_eq!(search.state(), PipelineState::Idle);

        Ok(())
    }
}
