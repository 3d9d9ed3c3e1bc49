//! The catalog session: wires the taxonomy, the query state, the search
//! debouncer, and the listing backend together.
//!
//! The session itself is a synchronous state machine: every inbound event
//! produces at most one [`Effect`] describing what the driver must do
//! (start a timer, dispatch a request). [`CatalogSession::run`] is the
//! async driver that interprets those effects on a tokio event loop.
//!
//! Dispatching a new request drops the previous in-flight future, which
//! cancels the underlying HTTP request mid-flight. The sequence gate in the
//! debouncer stays on as a backstop, so even a superseded response that
//! slips through is discarded rather than rendered.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use vitrine_core::query::build_params;
use vitrine_core::{Breadcrumb, CatalogQuery, Category, CategoryGraph, ListingPage, Param, Product};
use vitrine_listing::{ListingClient, ListingError};

use crate::debounce::{DebounceEffect, SearchDebouncer};
use crate::state::{apply_event, SessionEvent};

/// The external listing collaborator, as seen from the session.
///
/// Implemented by [`ListingClient`] in production and by scripted fakes in
/// tests. Returned futures must be `Send` so the driver can hold them
/// across `select!` turns.
pub trait ListingBackend: Clone + Send + Sync + 'static {
    /// Executes one listing query built from `params`.
    fn search(
        &self,
        params: Vec<Param>,
    ) -> impl Future<Output = Result<ListingPage, ListingError>> + Send;

    /// Bulk-fetches the flat category list.
    fn fetch_categories(&self) -> impl Future<Output = Result<Vec<Category>, ListingError>> + Send;
}

impl ListingBackend for ListingClient {
    async fn search(&self, params: Vec<Param>) -> Result<ListingPage, ListingError> {
        self.search_products(&params).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, ListingError> {
        ListingClient::fetch_categories(self).await
    }
}

/// What the driver must do after an event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// (Re)start the quiet-period timer.
    Timer { timer: u64, delay: Duration },
    /// Dispatch a listing request, superseding anything in flight.
    Dispatch { seq: u64, params: Vec<Param> },
}

/// The rendered listing area.
#[derive(Debug, Clone, Default)]
pub struct ListingView {
    pub items: Vec<Product>,
    /// Total matches the service reported for the whole query.
    pub count: i64,
    /// Inline failure notice; `None` when the last admitted request
    /// succeeded. A failed request never tears down the session; the
    /// shopper changes filters or retries.
    pub notice: Option<String>,
}

type InFlight = Pin<Box<dyn Future<Output = (u64, Result<ListingPage, ListingError>)> + Send>>;

/// Composition root for one catalog browsing session.
pub struct CatalogSession<B: ListingBackend> {
    backend: B,
    graph: CategoryGraph,
    query: CatalogQuery,
    debouncer: SearchDebouncer,
    view: ListingView,
}

impl<B: ListingBackend> CatalogSession<B> {
    #[must_use]
    pub fn new(backend: B, query: CatalogQuery, quiet_period: Duration) -> Self {
        Self {
            backend,
            graph: CategoryGraph::default(),
            query,
            debouncer: SearchDebouncer::new(quiet_period),
            view: ListingView::default(),
        }
    }

    /// Loads the category taxonomy and produces the initial listing
    /// dispatch for the starting query.
    ///
    /// A failed category fetch leaves the taxonomy empty and surfaces a
    /// notice; the session stays usable and the listing is still requested.
    pub async fn initialize(&mut self) -> Effect {
        match self.backend.fetch_categories().await {
            Ok(categories) => {
                self.graph = CategoryGraph::from_categories(categories);
                tracing::info!(categories = self.graph.len(), "category taxonomy loaded");
            }
            Err(err) => {
                tracing::warn!(error = %err, "category fetch failed; taxonomy stays empty");
                self.view.notice = Some(err.to_string());
            }
        }
        let seq = self.debouncer.issue_now();
        self.dispatch(seq)
    }

    /// Applies one inbound UI event and returns the effect to perform.
    ///
    /// Search edits go through the debouncer (non-empty text schedules the
    /// quiet-period timer, empty text issues the default listing request
    /// immediately); every other event rebuilds the parameters and
    /// dispatches at once.
    pub fn handle(&mut self, event: SessionEvent) -> Effect {
        self.query = apply_event(&self.query, &event);
        match event {
            SessionEvent::SearchEdited(text) => match self.debouncer.input(&text) {
                DebounceEffect::StartTimer { timer, delay } => Effect::Timer { timer, delay },
                DebounceEffect::Issue { seq, .. } => self.dispatch(seq),
            },
            _ => {
                let seq = self.debouncer.issue_now();
                self.dispatch(seq)
            }
        }
    }

    /// The quiet-period timer `timer` elapsed. Returns the dispatch for the
    /// pending search, or `None` when the timer was superseded.
    pub fn timer_fired(&mut self, timer: u64) -> Option<Effect> {
        match self.debouncer.timer_fired(timer) {
            Some(DebounceEffect::Issue { seq, .. }) => Some(self.dispatch(seq)),
            _ => None,
        }
    }

    /// Applies a completed request. Returns `false` when the response was
    /// stale and discarded without touching the view.
    pub fn apply_result(&mut self, seq: u64, result: Result<ListingPage, ListingError>) -> bool {
        if !self.debouncer.admit(seq) {
            tracing::debug!(
                seq,
                latest = self.debouncer.latest_seq(),
                "discarding stale listing response"
            );
            return false;
        }
        match result {
            Ok(page) => {
                self.view = ListingView {
                    items: page.items,
                    count: page.count,
                    notice: None,
                };
            }
            Err(err) => {
                tracing::warn!(error = %err, "listing request failed");
                self.view = ListingView {
                    items: Vec::new(),
                    count: 0,
                    notice: Some(err.to_string()),
                };
            }
        }
        true
    }

    #[must_use]
    pub fn view(&self) -> &ListingView {
        &self.view
    }

    #[must_use]
    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    #[must_use]
    pub fn graph(&self) -> &CategoryGraph {
        &self.graph
    }

    /// Parent › self › children navigation view for the current category;
    /// `None` while the taxonomy is not loaded or the slug is unknown.
    #[must_use]
    pub fn breadcrumb(&self) -> Option<Breadcrumb<'_>> {
        self.graph.breadcrumb_for(&self.query.category_slug)
    }

    /// Drives the session on the current task until `events` closes and all
    /// outstanding work has settled, then returns the session for
    /// inspection.
    pub async fn run(mut self, mut events: mpsc::Receiver<SessionEvent>) -> Self {
        let mut pending_timer: Option<(u64, Instant)> = None;
        let mut in_flight: Option<InFlight> = None;

        let effect = self.initialize().await;
        self.perform(effect, &mut pending_timer, &mut in_flight);

        let mut channel_open = true;
        while channel_open || pending_timer.is_some() || in_flight.is_some() {
            tokio::select! {
                maybe_event = events.recv(), if channel_open => {
                    match maybe_event {
                        Some(event) => {
                            let effect = self.handle(event);
                            self.perform(effect, &mut pending_timer, &mut in_flight);
                        }
                        None => channel_open = false,
                    }
                }
                () = tokio::time::sleep_until(pending_timer.map_or_else(Instant::now, |(_, at)| at)),
                    if pending_timer.is_some() =>
                {
                    if let Some((timer, _)) = pending_timer.take() {
                        if let Some(effect) = self.timer_fired(timer) {
                            self.perform(effect, &mut pending_timer, &mut in_flight);
                        }
                    }
                }
                (seq, result) = poll_in_flight(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    self.apply_result(seq, result);
                }
            }
        }
        self
    }

    fn dispatch(&self, seq: u64) -> Effect {
        tracing::debug!(seq, category = %self.query.category_slug, page = self.query.page, "dispatching listing request");
        Effect::Dispatch {
            seq,
            params: build_params(&self.query),
        }
    }

    fn perform(
        &mut self,
        effect: Effect,
        pending_timer: &mut Option<(u64, Instant)>,
        in_flight: &mut Option<InFlight>,
    ) {
        match effect {
            Effect::Timer { timer, delay } => {
                *pending_timer = Some((timer, Instant::now() + delay));
            }
            Effect::Dispatch { seq, params } => {
                // Dropping the superseded future aborts its request; the
                // sequence gate remains as the backstop.
                *in_flight = None;
                *pending_timer = None;
                let backend = self.backend.clone();
                *in_flight = Some(Box::pin(async move { (seq, backend.search(params).await) }));
            }
        }
    }
}

async fn poll_in_flight(in_flight: &mut Option<InFlight>) -> (u64, Result<ListingPage, ListingError>) {
    match in_flight {
        Some(request) => request.as_mut().await,
        // Disabled by the branch precondition; never completes if polled.
        None => std::future::pending().await,
    }
}
