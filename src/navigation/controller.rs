//! Transition orchestration.
//!
//! # Responsibilities
//! - Decide which location changes start a transition
//! - Fetch the destination's state before switching the displayed location
//! - Settle into Displayed, Denied, or a full-page redirect
//! - Discard completions superseded by a newer navigation
//! - Refresh an already displayed page in place
//!
//! # Design Decisions
//! - Every dispatch takes a sequence number; a completion only settles if
//!   its number is still the latest, whatever order loads finish in
//! - In-flight requests are not cancelled, their results are ignored
//! - Loader errors are folded into `LoadResult::Failed` and never escape
//! - Only the controller writes the cache and navigation state

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use arc_swap::ArcSwap;
use serde_json::Value;

use crate::loader::types::TITLE_FIELD;
use crate::loader::{LoadResult, PageLoader};
use crate::navigation::context::PageContext;
use crate::navigation::host::Host;
use crate::navigation::state::{Denial, DenialKind, Location, NavigationSnapshot};
use crate::observability::metrics;
use crate::prefetch::{CachedPage, PrefetchCache};
use crate::routing::{match_route, RouteDescriptor};

/// How a transition ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The location change did not alter the displayed path.
    Ignored,
    /// The location is now displayed.
    Committed,
    /// The denial view is shown instead of the route.
    Denied(Denial),
    /// The host was sent to another URL with a full navigation.
    Redirected { target_url: String },
    /// A newer navigation started before this one settled.
    Superseded,
}

/// Result of refreshing a page's cached state.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The path is not prefetched (or there is nothing to refresh).
    NotApplicable,
    /// The cache entry was replaced; consumers should re-read at `version`.
    Refreshed { version: u64 },
    /// The load did not succeed; the raw result is returned untouched.
    Rejected(LoadResult),
}

struct Inner {
    loader: Arc<dyn PageLoader>,
    host: Arc<dyn Host>,
    cache: PrefetchCache,
    state: ArcSwap<NavigationSnapshot>,
    /// Held while dispatching, and while a success is checked, cached and committed.
    transition: Mutex<()>,
}

/// Prefetch-then-commit navigation controller.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct NavigationController {
    inner: Arc<Inner>,
}

impl NavigationController {
    /// Mount a controller with an empty cache and nothing displayed.
    pub fn new(loader: Arc<dyn PageLoader>, host: Arc<dyn Host>) -> Self {
        Self {
            inner: Arc::new(Inner {
                loader,
                host,
                cache: PrefetchCache::new(),
                state: ArcSwap::from_pointee(NavigationSnapshot::default()),
                transition: Mutex::new(()),
            }),
        }
    }

    /// Current navigation state.
    pub fn snapshot(&self) -> Arc<NavigationSnapshot> {
        self.inner.state.load_full()
    }

    pub fn displayed_location(&self) -> Option<Location> {
        self.inner.state.load().displayed.clone()
    }

    pub fn denied_message(&self) -> Option<String> {
        self.inner.state.load().denied_message().map(str::to_string)
    }

    pub fn version(&self) -> u64 {
        self.inner.state.load().version
    }

    pub fn cache(&self) -> &PrefetchCache {
        &self.inner.cache
    }

    /// Read-only handle for page components.
    pub fn context(&self) -> PageContext {
        PageContext::new(self.clone())
    }

    /// Handle a location reported by the host.
    ///
    /// The first location always starts a transition; afterwards only a
    /// pathname different from the most recently requested one does.
    pub async fn location_changed(&self, location: Location) -> TransitionOutcome {
        let snapshot = self.snapshot();
        if let Some(requested) = snapshot.pending.as_ref().or(snapshot.displayed.as_ref()) {
            if requested.pathname() == location.pathname() {
                tracing::trace!(location = %location, "Path unchanged, ignoring");
                return TransitionOutcome::Ignored;
            }
        }
        self.prefetch_and_commit(location).await
    }

    /// Load the state for `location`, then display it.
    pub async fn prefetch_and_commit(&self, location: Location) -> TransitionOutcome {
        let route = match_route(location.pathname()).with_query(location.search());
        let seq = self.dispatch(&location, route.is_prefetched());

        if !route.is_prefetched() {
            return if self.settle(seq, |next| next.displayed = Some(location.clone())) {
                tracing::debug!(location = %location, "Committed without prefetch");
                metrics::record_commit();
                TransitionOutcome::Committed
            } else {
                self.superseded(seq, &location)
            };
        }

        tracing::debug!(location = %location, route = ?route.key, seq, "Prefetching");
        let result = self.run_loader(&route).await;

        match result {
            LoadResult::Success { data, status } => {
                let title = data.get(TITLE_FIELD).and_then(Value::as_str).map(str::to_string);
                let committed = {
                    let _guard = self.lock_transitions();
                    if self.is_current(seq) {
                        self.inner
                            .cache
                            .insert(location.request_path(), CachedPage { route, data, status });
                        self.settle(seq, |next| next.displayed = Some(location.clone()))
                    } else {
                        false
                    }
                };
                if !committed {
                    return self.superseded(seq, &location);
                }
                if let Some(title) = title {
                    self.inner.host.set_title(&title);
                }
                tracing::info!(location = %location, status, "Committed");
                metrics::record_commit();
                TransitionOutcome::Committed
            }
            LoadResult::Redirected { target_url } => {
                if !self.settle(seq, |_| {}) {
                    return self.superseded(seq, &location);
                }
                tracing::info!(location = %location, target = %target_url, "Backend redirected");
                self.inner.host.navigate_full(&target_url);
                TransitionOutcome::Redirected { target_url }
            }
            LoadResult::Denied { message, status } => {
                let denial = Denial {
                    kind: DenialKind::Denied,
                    message,
                    status: Some(status),
                };
                self.settle_denial(seq, &location, denial)
            }
            LoadResult::Failed { message, status } => {
                let denial = Denial {
                    kind: DenialKind::Failed,
                    message,
                    status,
                };
                self.settle_denial(seq, &location, denial)
            }
        }
    }

    /// Reload the state of `path` (or the displayed location) without a transition.
    pub async fn refresh(&self, path: Option<&str>) -> RefreshOutcome {
        let location = match path {
            Some(path) => Location::parse(path),
            None => match self.displayed_location() {
                Some(location) => location,
                None => {
                    metrics::record_refresh("not_applicable");
                    return RefreshOutcome::NotApplicable;
                }
            },
        };

        let route = match_route(location.pathname()).with_query(location.search());
        if !route.is_prefetched() {
            metrics::record_refresh("not_applicable");
            return RefreshOutcome::NotApplicable;
        }

        match self.run_loader(&route).await {
            LoadResult::Success { data, status } => {
                self.inner
                    .cache
                    .insert(location.request_path(), CachedPage { route, data, status });
                let version = self.bump_version();
                tracing::debug!(location = %location, version, "Refreshed");
                metrics::record_refresh("refreshed");
                RefreshOutcome::Refreshed { version }
            }
            other => {
                tracing::warn!(location = %location, outcome = other.label(), "Refresh rejected");
                metrics::record_refresh(other.label());
                RefreshOutcome::Rejected(other)
            }
        }
    }

    /// Tear down: clear the cache and reset navigation state.
    ///
    /// Loads still in flight settle as superseded.
    pub fn unmount(&self) {
        let _guard = self.lock_transitions();
        self.inner.cache.clear();
        self.inner.state.rcu(|current| NavigationSnapshot {
            dispatch_seq: current.dispatch_seq + 1,
            ..NavigationSnapshot::default()
        });
        tracing::debug!("Navigation controller unmounted");
    }

    async fn run_loader(&self, route: &RouteDescriptor) -> LoadResult {
        let label = route.key.map(|k| k.as_str()).unwrap_or("none");
        let started = Instant::now();

        let result = match self.inner.loader.load(route).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(route = label, error = %e, "Loader failed");
                LoadResult::from_error(&e)
            }
        };

        metrics::record_load(label, result.label(), started);
        result
    }

    /// Start a transition to `location`, returning its sequence number.
    fn dispatch(&self, location: &Location, loading: bool) -> u64 {
        let _guard = self.lock_transitions();
        let previous = self.inner.state.rcu(|current| {
            let mut next = NavigationSnapshot::clone(current);
            next.dispatch_seq = current.dispatch_seq + 1;
            next.pending = Some(location.clone());
            next.loading = loading;
            next.denial = None;
            next
        });
        previous.dispatch_seq + 1
    }

    fn lock_transitions(&self) -> MutexGuard<'_, ()> {
        self.inner
            .transition
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, seq: u64) -> bool {
        self.inner.state.load().dispatch_seq == seq
    }

    /// Apply `update` and clear `loading` if `seq` is still the latest dispatch.
    fn settle(&self, seq: u64, update: impl Fn(&mut NavigationSnapshot)) -> bool {
        let previous = self.inner.state.rcu(|current| {
            if current.dispatch_seq != seq {
                return Arc::clone(current);
            }
            let mut next = NavigationSnapshot::clone(current);
            next.loading = false;
            update(&mut next);
            Arc::new(next)
        });
        previous.dispatch_seq == seq
    }

    fn settle_denial(&self, seq: u64, location: &Location, denial: Denial) -> TransitionOutcome {
        if !self.settle(seq, |next| next.denial = Some(denial.clone())) {
            return self.superseded(seq, location);
        }
        tracing::info!(
            location = %location,
            kind = ?denial.kind,
            message = %denial.message,
            "Showing denial view"
        );
        TransitionOutcome::Denied(denial)
    }

    fn superseded(&self, seq: u64, location: &Location) -> TransitionOutcome {
        tracing::debug!(location = %location, seq, "Discarding superseded completion");
        metrics::record_superseded();
        TransitionOutcome::Superseded
    }

    fn bump_version(&self) -> u64 {
        let previous = self.inner.state.rcu(|current| {
            let mut next = NavigationSnapshot::clone(current);
            next.version += 1;
            next
        });
        previous.version + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{FnLoader, LoadError};
    use crate::navigation::host::HeadlessHost;
    use crate::navigation::state::Phase;
    use crate::routing::RouteKey;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const ID: &str = "0640ec3b-1bed-4b15-a078-d6e7ec66be12";

    fn manage_path() -> String {
        format!("/manage/{}", ID)
    }

    fn success(data: Value) -> LoadResult {
        LoadResult::Success { data, status: 200 }
    }

    /// Loader answering each route key with a fixed delay and result.
    fn scripted(
        script: Vec<(RouteKey, u64, LoadResult)>,
    ) -> (Arc<dyn PageLoader>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let table: HashMap<RouteKey, (Duration, LoadResult)> = script
            .into_iter()
            .map(|(key, ms, result)| (key, (Duration::from_millis(ms), result)))
            .collect();
        let counter = calls.clone();

        let loader = FnLoader(move |route: RouteDescriptor| {
            counter.fetch_add(1, Ordering::SeqCst);
            let entry = route.key.and_then(|key| table.get(&key).cloned());
            async move {
                let Some((delay, result)) = entry else {
                    return Err(LoadError::Unroutable);
                };
                tokio::time::sleep(delay).await;
                Ok(result)
            }
        });
        (Arc::new(loader), calls)
    }

    fn controller(
        script: Vec<(RouteKey, u64, LoadResult)>,
    ) -> (NavigationController, Arc<HeadlessHost>, Arc<AtomicUsize>) {
        let (loader, calls) = scripted(script);
        let host = Arc::new(HeadlessHost::new());
        (NavigationController::new(loader, host.clone()), host, calls)
    }

    #[tokio::test]
    async fn test_initial_mount_commits_and_sets_title() {
        let payload = json!({"title": "Plant Overview", "plants": [], "groups": []});
        let (nav, host, _) = controller(vec![(RouteKey::Overview, 0, success(payload.clone()))]);

        assert_eq!(nav.snapshot().phase(), Phase::Idle);
        let outcome = nav.location_changed(Location::parse("/")).await;

        assert_eq!(outcome, TransitionOutcome::Committed);
        assert_eq!(host.title().as_deref(), Some("Plant Overview"));
        assert_eq!(nav.displayed_location(), Some(Location::parse("/")));
        assert_eq!(nav.context().cached_result("/").unwrap().data, payload);
        assert_eq!(nav.denied_message(), None);
    }

    #[tokio::test]
    async fn test_denied_keeps_displayed_location() {
        let (nav, _, _) = controller(vec![
            (RouteKey::Overview, 0, success(json!({}))),
            (
                RouteKey::Manage,
                0,
                LoadResult::Denied {
                    message: "You do not have permission to view this plant".into(),
                    status: 403,
                },
            ),
        ]);

        nav.location_changed(Location::parse("/")).await;
        let outcome = nav.location_changed(Location::parse(&manage_path())).await;

        assert!(matches!(outcome, TransitionOutcome::Denied(ref d) if d.kind == DenialKind::Denied));
        let snapshot = nav.snapshot();
        assert_eq!(snapshot.displayed, Some(Location::parse("/")));
        assert!(matches!(snapshot.phase(), Phase::Denied(d) if d.message == "You do not have permission to view this plant"));
        assert!(nav.cache().get(&manage_path()).is_none());
    }

    #[tokio::test]
    async fn test_failure_uses_denial_view_with_kind() {
        let (nav, _, _) = controller(vec![(
            RouteKey::Overview,
            0,
            LoadResult::Failed {
                message: "Request failed (status 500)".into(),
                status: Some(500),
            },
        )]);

        let outcome = nav.location_changed(Location::parse("/")).await;
        assert_eq!(
            outcome,
            TransitionOutcome::Denied(Denial {
                kind: DenialKind::Failed,
                message: "Request failed (status 500)".into(),
                status: Some(500),
            })
        );
        assert_eq!(nav.denied_message().as_deref(), Some("Request failed (status 500)"));
        assert_eq!(nav.displayed_location(), None);
    }

    #[tokio::test]
    async fn test_redirect_navigates_without_caching() {
        let target = "/accounts/login/?next=/manage/abc";
        let (nav, host, _) = controller(vec![(
            RouteKey::Manage,
            0,
            LoadResult::Redirected {
                target_url: target.into(),
            },
        )]);

        let outcome = nav.location_changed(Location::parse(&manage_path())).await;

        assert_eq!(outcome, TransitionOutcome::Redirected { target_url: target.into() });
        assert_eq!(host.redirected_to().as_deref(), Some(target));
        assert!(nav.cache().is_empty());
        assert_eq!(nav.displayed_location(), None);
    }

    #[tokio::test]
    async fn test_loader_error_becomes_failure() {
        // Archive is not scripted, so the loader errors
        let (nav, _, _) = controller(vec![]);

        let outcome = nav.location_changed(Location::parse("/archived")).await;
        assert!(matches!(outcome, TransitionOutcome::Denied(ref d) if d.kind == DenialKind::Failed && d.status.is_none()));
        assert!(!nav.snapshot().loading);
    }

    #[tokio::test]
    async fn test_unprefetched_route_commits_immediately() {
        let (nav, _, calls) = controller(vec![]);

        let outcome = nav.location_changed(Location::parse("/accounts/login/")).await;
        assert_eq!(outcome, TransitionOutcome::Committed);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(nav.displayed_location(), Some(Location::parse("/accounts/login/")));
        assert!(nav.cache().is_empty());
    }

    #[tokio::test]
    async fn test_same_path_changes_are_ignored() {
        let (nav, _, calls) = controller(vec![(RouteKey::Overview, 0, success(json!({})))]);

        nav.location_changed(Location::parse("/")).await;
        assert_eq!(nav.location_changed(Location::parse("/#plants")).await, TransitionOutcome::Ignored);
        assert_eq!(nav.location_changed(Location::parse("/?tab=groups")).await, TransitionOutcome::Ignored);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_previous_page_stays_displayed_while_loading() {
        let (nav, _, _) = controller(vec![
            (RouteKey::Overview, 0, success(json!({}))),
            (RouteKey::Manage, 50, success(json!({"page": "plant"}))),
        ]);
        nav.location_changed(Location::parse("/")).await;

        let background = nav.clone();
        let path = manage_path();
        let task = tokio::spawn(async move { background.location_changed(Location::parse(&path)).await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let snapshot = nav.snapshot();
        assert!(matches!(snapshot.phase(), Phase::Loading(l) if l.pathname() == manage_path()));
        assert_eq!(snapshot.displayed, Some(Location::parse("/")));

        assert_eq!(task.await.unwrap(), TransitionOutcome::Committed);
        assert_eq!(nav.displayed_location(), Some(Location::parse(&manage_path())));
    }

    #[tokio::test]
    async fn test_later_navigation_wins_when_it_settles_first() {
        let (nav, host, _) = controller(vec![
            (RouteKey::Overview, 100, success(json!({"title": "Plant Overview"}))),
            (RouteKey::Manage, 10, success(json!({"title": "Manage Plant", "page": "plant"}))),
        ]);

        let (first, second) = tokio::join!(
            nav.location_changed(Location::parse("/")),
            nav.location_changed(Location::parse(&manage_path())),
        );

        assert_eq!(first, TransitionOutcome::Superseded);
        assert_eq!(second, TransitionOutcome::Committed);
        assert_eq!(nav.displayed_location(), Some(Location::parse(&manage_path())));
        assert_eq!(host.title().as_deref(), Some("Manage Plant"));
        // The stale overview result never reached the cache
        assert!(nav.cache().get("/").is_none());
    }

    #[tokio::test]
    async fn test_later_navigation_wins_when_it_settles_last() {
        let (nav, _, _) = controller(vec![
            (RouteKey::Overview, 10, success(json!({}))),
            (RouteKey::Manage, 100, success(json!({"page": "plant"}))),
        ]);

        let (first, second) = tokio::join!(
            nav.location_changed(Location::parse("/")),
            nav.location_changed(Location::parse(&manage_path())),
        );

        assert_eq!(first, TransitionOutcome::Superseded);
        assert_eq!(second, TransitionOutcome::Committed);
        assert_eq!(nav.displayed_location(), Some(Location::parse(&manage_path())));
        assert!(!nav.snapshot().loading);
    }

    #[tokio::test]
    async fn test_committed_page_survives_unsettled_navigation() {
        let (nav, _, _) = controller(vec![
            (RouteKey::Overview, 0, success(json!({}))),
            (RouteKey::Manage, 60_000, success(json!({"page": "plant"}))),
        ]);
        nav.location_changed(Location::parse("/")).await;

        let background = nav.clone();
        let path = manage_path();
        let task = tokio::spawn(async move { background.location_changed(Location::parse(&path)).await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(nav.displayed_location(), Some(Location::parse("/")));
        assert!(nav.snapshot().loading);
        task.abort();
    }

    #[tokio::test]
    async fn test_immediate_commit_supersedes_inflight_load() {
        let (nav, _, _) = controller(vec![(RouteKey::Manage, 30, success(json!({"page": "plant"})))]);

        let (manage, login) = tokio::join!(
            nav.location_changed(Location::parse(&manage_path())),
            nav.location_changed(Location::parse("/accounts/login/")),
        );

        assert_eq!(manage, TransitionOutcome::Superseded);
        assert_eq!(login, TransitionOutcome::Committed);
        assert_eq!(nav.displayed_location(), Some(Location::parse("/accounts/login/")));
    }

    #[tokio::test]
    async fn test_refresh_twice_bumps_version_by_two() {
        let payload = json!({"title": "Plant Overview", "plants": [{"name": "Fern"}]});
        let (nav, _, _) = controller(vec![(RouteKey::Overview, 0, success(payload.clone()))]);
        nav.location_changed(Location::parse("/")).await;
        let before = nav.cache().get("/").unwrap();

        assert_eq!(nav.refresh(Some("/")).await, RefreshOutcome::Refreshed { version: 1 });
        assert_eq!(nav.refresh(Some("/")).await, RefreshOutcome::Refreshed { version: 2 });

        assert_eq!(nav.version(), 2);
        assert_eq!(*nav.cache().get("/").unwrap(), *before);
    }

    #[tokio::test]
    async fn test_refresh_defaults_to_displayed_path() {
        let (nav, _, calls) = controller(vec![(RouteKey::Overview, 0, success(json!({})))]);

        assert_eq!(nav.refresh(None).await, RefreshOutcome::NotApplicable);
        nav.location_changed(Location::parse("/")).await;
        assert_eq!(nav.refresh(None).await, RefreshOutcome::Refreshed { version: 1 });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_not_applicable_for_unprefetched_path() {
        let (nav, _, calls) = controller(vec![]);

        assert_eq!(nav.refresh(Some("/accounts/login/")).await, RefreshOutcome::NotApplicable);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(nav.version(), 0);
    }

    #[tokio::test]
    async fn test_refresh_rejection_surfaces_raw_result() {
        let denied = LoadResult::Denied {
            message: "Session expired".into(),
            status: 403,
        };
        let (nav, _, _) = controller(vec![(RouteKey::Profile, 0, denied.clone())]);

        let outcome = nav.refresh(Some("/accounts/profile/")).await;
        assert_eq!(outcome, RefreshOutcome::Rejected(denied));
        assert_eq!(nav.version(), 0);
        assert_eq!(nav.displayed_location(), None);
        assert_eq!(nav.denied_message(), None);
    }

    #[tokio::test]
    async fn test_unmount_discards_inflight_and_clears_cache() {
        let (nav, _, _) = controller(vec![
            (RouteKey::Overview, 0, success(json!({}))),
            (RouteKey::Archive, 30, success(json!({}))),
        ]);
        nav.location_changed(Location::parse("/")).await;

        let background = nav.clone();
        let task = tokio::spawn(async move { background.location_changed(Location::parse("/archived")).await });
        tokio::time::sleep(Duration::from_millis(5)).await;
        nav.unmount();

        assert_eq!(task.await.unwrap(), TransitionOutcome::Superseded);
        assert!(nav.cache().is_empty());
        assert_eq!(nav.snapshot().phase(), Phase::Idle);
    }

    fn denied(message: &str) -> LoadResult {
        LoadResult::Denied {
            message: message.into(),
            status: 403,
        }
    }

    #[tokio::test]
    async fn test_returning_to_displayed_path_leaves_denial_view() {
        let (nav, _, calls) = controller(vec![
            (RouteKey::Overview, 0, success(json!({"title": "Plant Overview"}))),
            (RouteKey::Manage, 0, denied("not yours")),
        ]);

        nav.location_changed(Location::parse("/")).await;
        nav.location_changed(Location::parse(&manage_path())).await;
        assert!(matches!(nav.snapshot().phase(), Phase::Denied(_)));

        let outcome = nav.location_changed(Location::parse("/")).await;

        assert_eq!(outcome, TransitionOutcome::Committed);
        assert_eq!(nav.snapshot().phase(), Phase::Displayed(&Location::parse("/")));
        assert_eq!(nav.denied_message(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returning_to_displayed_path_supersedes_inflight_load() {
        let (nav, _, _) = controller(vec![
            (RouteKey::Overview, 0, success(json!({}))),
            (RouteKey::Manage, 50, success(json!({"page": "plant"}))),
        ]);
        nav.location_changed(Location::parse("/")).await;

        let background = nav.clone();
        let path = manage_path();
        let task = tokio::spawn(async move { background.location_changed(Location::parse(&path)).await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(nav.location_changed(Location::parse("/")).await, TransitionOutcome::Committed);
        assert_eq!(task.await.unwrap(), TransitionOutcome::Superseded);
        assert_eq!(nav.displayed_location(), Some(Location::parse("/")));
        assert!(nav.cache().get(&manage_path()).is_none());
    }

    #[tokio::test]
    async fn test_repeated_pending_path_is_ignored() {
        let (nav, _, calls) = controller(vec![
            (RouteKey::Overview, 0, success(json!({}))),
            (RouteKey::Manage, 30, success(json!({"page": "plant"}))),
        ]);
        nav.location_changed(Location::parse("/")).await;

        let background = nav.clone();
        let path = manage_path();
        let task = tokio::spawn(async move { background.location_changed(Location::parse(&path)).await });
        tokio::time::sleep(Duration::from_millis(5)).await;

        let again = format!("{}#notes", manage_path());
        assert_eq!(nav.location_changed(Location::parse(&again)).await, TransitionOutcome::Ignored);
        assert_eq!(task.await.unwrap(), TransitionOutcome::Committed);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_superseded_success_never_writes_cache() {
        for _ in 0..50 {
            let (nav, _, _) = controller(vec![
                (RouteKey::Overview, 0, success(json!({}))),
                (RouteKey::Manage, 0, success(json!({"page": "plant"}))),
            ]);

            let first = nav.clone();
            let second = nav.clone();
            let overview = tokio::spawn(async move { first.prefetch_and_commit(Location::parse("/")).await });
            let manage = tokio::spawn(async move {
                second.prefetch_and_commit(Location::parse(&manage_path())).await
            });
            let overview = overview.await.unwrap();
            manage.await.unwrap();

            if overview == TransitionOutcome::Superseded {
                assert!(nav.cache().get("/").is_none());
            } else {
                assert!(nav.cache().get("/").is_some());
            }
        }
    }

    #[tokio::test]
    async fn test_query_string_reaches_loader_and_cache_key() {
        let queries = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = queries.clone();
        let loader: Arc<dyn PageLoader> = Arc::new(FnLoader(move |route: RouteDescriptor| {
            seen.lock().unwrap().push(route.query.clone());
            async move { Ok(success(json!({"sort": route.query}))) }
        }));
        let nav = NavigationController::new(loader, Arc::new(HeadlessHost::new()));

        nav.location_changed(Location::parse("/archived?sort=name#top")).await;
        assert_eq!(nav.refresh(None).await, RefreshOutcome::Refreshed { version: 1 });

        assert_eq!(
            *queries.lock().unwrap(),
            vec![Some("sort=name".to_string()), Some("sort=name".to_string())]
        );
        let cached = nav.cache().get("/archived?sort=name").unwrap();
        assert_eq!(cached.data["sort"], "sort=name");
        assert!(nav.cache().get("/archived").is_none());
    }
}
