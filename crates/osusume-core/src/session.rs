use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::models::{Category, HistoryEntry, Item, Selection};
use crate::similar::SimilarityModel;

/// Where the session currently sits in the browse flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No category chosen yet.
    Idle,
    /// Category set, genre empty, no results.
    CategoryChosen,
    /// Genre set or explicitly skipped; ready to query.
    GenreChosen,
    /// A fetch is in flight.
    Loading,
    /// A non-empty batch is on display.
    ResultsReady,
    /// A valid request produced zero matches; shown as an explicit empty
    /// state, never as an error.
    Empty,
}

/// Which pipeline produced the current batch. `Sample` drives the neutral
/// "showing sample results" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOrigin {
    Remote,
    Sample,
    Similar,
}

/// Handle for one initiated fetch. Only the most recently issued ticket may
/// commit its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

/// The settled result of one fetch attempt. Infallible by contract: remote
/// failures are absorbed below this boundary and arrive as `Sample` data.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub items: Vec<Item>,
    pub origin: BatchOrigin,
}

impl FetchOutcome {
    pub fn remote(items: Vec<Item>) -> Self {
        Self {
            items,
            origin: BatchOrigin::Remote,
        }
    }

    pub fn sample(items: Vec<Item>) -> Self {
        Self {
            items,
            origin: BatchOrigin::Sample,
        }
    }
}

/// Auxiliary context attached to outbound recommendation requests.
///
/// Both fields are informational: a missing credential means the request
/// goes out unauthenticated, and an empty history never blocks a fetch.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub access_token: Option<String>,
    pub history: Vec<HistoryEntry>,
}

/// A category/genre-scoped recommendation query the session can drive.
///
/// Implemented by the fallback fetcher in `osusume-api`; test doubles
/// return fixed outcomes.
pub trait RecommendationSource {
    fn fetch(
        &self,
        category: Category,
        genre: Option<&str>,
        ctx: &RequestContext,
    ) -> impl Future<Output = FetchOutcome> + Send;
}

/// Host callbacks fired on onboarding milestones, used to set the host's
/// persisted navigation flags. The session itself never navigates.
pub trait SessionHooks {
    fn on_like_recorded(&mut self, _item: &Item) {}
    fn on_onboarding_finished(&mut self) {}
}

/// No-op hooks for hosts that don't track onboarding flags.
pub struct NoHooks;

impl SessionHooks for NoHooks {}

/// One user's browse/onboarding state: the active selection, the liked-item
/// accumulator, the batch-local skip set, and the recommendation batch on
/// display.
///
/// All state is owned exclusively by one session instance and driven by a
/// single logical thread of user events. Overlapping fetches follow a
/// last-writer-wins policy: `begin_fetch` hands out generation-stamped
/// tickets, and `complete_fetch` commits only the ticket from the most
/// recently initiated request. Earlier results landing late are discarded.
pub struct Session {
    catalog: Catalog,
    selection: Selection,
    phase: SessionPhase,
    liked: Vec<Item>,
    skipped: HashSet<String>,
    batch: Vec<Item>,
    origin: Option<BatchOrigin>,
    generation: u64,
    hooks: Box<dyn SessionHooks>,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_hooks(catalog, Box::new(NoHooks))
    }

    pub fn with_hooks(catalog: Catalog, hooks: Box<dyn SessionHooks>) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
            phase: SessionPhase::Idle,
            liked: Vec::new(),
            skipped: HashSet::new(),
            batch: Vec::new(),
            origin: None,
            generation: 0,
            hooks,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The batch currently on display, in its committed order.
    pub fn batch(&self) -> &[Item] {
        &self.batch
    }

    pub fn liked(&self) -> &[Item] {
        &self.liked
    }

    pub fn origin(&self) -> Option<BatchOrigin> {
        self.origin
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Choose a category. Valid from any phase; drops the batch, the genre,
    /// and the skip set, and invalidates any in-flight fetch.
    pub fn select_category(&mut self, category: Category) {
        self.selection = Selection {
            category: Some(category),
            genre: None,
        };
        self.batch.clear();
        self.origin = None;
        self.skipped.clear();
        self.generation += 1;
        self.phase = SessionPhase::CategoryChosen;
        debug!(%category, "category selected");
    }

    /// Choose a genre within the current category, with toggle semantics:
    /// re-selecting the active genre clears it back to "all genres".
    /// Does not trigger a fetch. Ignored while no category is chosen.
    pub fn select_genre(&mut self, genre: &str) {
        if self.selection.category.is_none() {
            debug!(genre, "genre selected with no category, ignoring");
            return;
        }
        if self.selection.genre.as_deref() == Some(genre) {
            self.selection.genre = None;
        } else {
            self.selection.genre = Some(genre.to_string());
        }
        if matches!(
            self.phase,
            SessionPhase::CategoryChosen | SessionPhase::GenreChosen
        ) {
            self.phase = SessionPhase::GenreChosen;
        }
    }

    /// Start a fetch for the current selection. Returns `None` (and leaves
    /// the machine untouched) while no category is chosen. Calling this
    /// while `Loading` replaces the in-flight request's right to commit.
    pub fn begin_fetch(&mut self) -> Option<RequestTicket> {
        if self.selection.category.is_none() {
            debug!("recommendation request with no category chosen, ignoring");
            return None;
        }
        self.generation += 1;
        self.phase = SessionPhase::Loading;
        Some(RequestTicket {
            generation: self.generation,
        })
    }

    /// Land a fetch result. Returns `false` when the ticket is stale
    /// (a later request, like, category switch, or reset has superseded
    /// it), in which case the result is discarded silently.
    pub fn complete_fetch(&mut self, ticket: RequestTicket, outcome: FetchOutcome) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }
        self.commit_batch(outcome.items, outcome.origin);
        true
    }

    /// Convenience wrapper over [`begin_fetch`]/[`complete_fetch`] for hosts
    /// that drive one fetch at a time. Returns whether a batch was
    /// committed.
    ///
    /// [`begin_fetch`]: Session::begin_fetch
    /// [`complete_fetch`]: Session::complete_fetch
    pub async fn request_recommendations<S>(&mut self, source: &S, ctx: &RequestContext) -> bool
    where
        S: RecommendationSource,
    {
        let Some(category) = self.selection.category else {
            debug!("recommendation request with no category chosen, ignoring");
            return false;
        };
        let genre = self.selection.genre.clone();
        let Some(ticket) = self.begin_fetch() else {
            return false;
        };
        let outcome = source.fetch(category, genre.as_deref(), ctx).await;
        self.complete_fetch(ticket, outcome)
    }

    /// Record a like during onboarding and derive the next batch from the
    /// similarity model. Idempotent: re-liking an already-liked id changes
    /// nothing and returns `false`. A like clears the skip set and
    /// supersedes any in-flight fetch.
    pub fn like_item(&mut self, item: &Item, model: &dyn SimilarityModel) -> bool {
        if self.selection.category.is_none() {
            debug!(title = %item.title, "like with no category chosen, ignoring");
            return false;
        }
        if self.is_liked(&item.id) {
            debug!(title = %item.title, "already liked, ignoring");
            return false;
        }

        self.liked.push(item.clone());
        self.skipped.clear();
        self.generation += 1;

        let liked_ids: HashSet<String> = self.liked.iter().map(|i| i.id.clone()).collect();
        let pool = self.catalog.items(item.category);
        let batch = model.select(item, pool, &liked_ids, &self.skipped);
        info!(title = %item.title, suggestions = batch.len(), "like recorded");

        self.hooks.on_like_recorded(item);
        self.origin = Some(BatchOrigin::Similar);
        self.phase = if batch.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::ResultsReady
        };
        self.batch = batch;
        true
    }

    /// Exclude an item from the current batch only. Skips do not survive the
    /// next like or category change, and never trigger a fetch.
    pub fn skip_item(&mut self, id: &str) {
        self.skipped.insert(id.to_string());
        self.batch.retain(|item| item.id != id);
        if self.batch.is_empty() && self.phase == SessionPhase::ResultsReady {
            self.phase = SessionPhase::Empty;
        }
    }

    /// Signal the host that onboarding is done with the accumulated likes.
    pub fn finish_onboarding(&mut self) {
        info!(liked = self.liked.len(), "onboarding finished");
        self.hooks.on_onboarding_finished();
    }

    /// Logout: back to `Idle`, discarding all session-scoped state and
    /// invalidating any in-flight fetch. Durable persistence of likes and
    /// history, if any, is the host's concern.
    pub fn reset(&mut self) {
        self.selection = Selection::default();
        self.batch.clear();
        self.skipped.clear();
        self.liked.clear();
        self.origin = None;
        self.generation += 1;
        self.phase = SessionPhase::Idle;
        info!("session reset");
    }

    fn is_liked(&self, id: &str) -> bool {
        self.liked.iter().any(|i| i.id == id)
    }

    /// Replace the batch wholesale, re-enforcing the session invariants:
    /// no liked ids, no skipped ids, and exact genre match while a genre
    /// filter is active.
    fn commit_batch(&mut self, items: Vec<Item>, origin: BatchOrigin) {
        let genre = self.selection.genre.clone();
        let batch: Vec<Item> = items
            .into_iter()
            .filter(|item| !self.is_liked(&item.id))
            .filter(|item| !self.skipped.contains(&item.id))
            .filter(|item| genre.as_deref().map_or(true, |g| item.genre == g))
            .collect();
        self.origin = Some(origin);
        self.phase = if batch.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::ResultsReady
        };
        self.batch = batch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use crate::similar::GenreMatch;

    fn item(id: &str, title: &str, category: Category, genre: &str) -> Item {
        Item {
            id: id.into(),
            title: title.into(),
            category,
            genre: genre.into(),
            description: None,
            rating: None,
            image_url: None,
        }
    }

    fn session() -> Session {
        Session::new(Catalog::sample())
    }

    fn find(session: &Session, category: Category, title: &str) -> Item {
        session
            .catalog()
            .items(category)
            .iter()
            .find(|i| i.title == title)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let session = session();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.batch().is_empty());
        assert!(session.liked().is_empty());
    }

    #[test]
    fn test_select_category_clears_genre_batch_and_skips() {
        let mut session = session();
        session.select_category(Category::Movies);
        session.select_genre("Sci-Fi");
        let ticket = session.begin_fetch().unwrap();
        session.complete_fetch(
            ticket,
            FetchOutcome::remote(vec![item("a", "A", Category::Movies, "Sci-Fi")]),
        );
        session.skip_item("a");

        session.select_category(Category::Books);
        assert_eq!(session.phase(), SessionPhase::CategoryChosen);
        assert_eq!(session.selection().category, Some(Category::Books));
        assert_eq!(session.selection().genre, None);
        assert!(session.batch().is_empty());
        assert_eq!(session.origin(), None);
    }

    #[test]
    fn test_genre_toggle_clears() {
        let mut session = session();
        session.select_category(Category::Movies);
        session.select_genre("Sci-Fi");
        assert_eq!(session.selection().genre.as_deref(), Some("Sci-Fi"));
        assert_eq!(session.phase(), SessionPhase::GenreChosen);

        session.select_genre("Sci-Fi");
        assert_eq!(session.selection().genre, None);
        assert_eq!(session.phase(), SessionPhase::GenreChosen);

        session.select_genre("Drama");
        session.select_genre("Horror");
        assert_eq!(session.selection().genre.as_deref(), Some("Horror"));
    }

    #[test]
    fn test_genre_without_category_is_ignored() {
        let mut session = session();
        session.select_genre("Sci-Fi");
        assert_eq!(session.selection().genre, None);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_fetch_without_category_is_ignored() {
        let mut session = session();
        assert!(session.begin_fetch().is_none());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_commit_lands_in_results_ready() {
        let mut session = session();
        session.select_category(Category::Movies);
        let ticket = session.begin_fetch().unwrap();
        assert_eq!(session.phase(), SessionPhase::Loading);

        let committed = session.complete_fetch(
            ticket,
            FetchOutcome::remote(vec![item("a", "A", Category::Movies, "Sci-Fi")]),
        );
        assert!(committed);
        assert_eq!(session.phase(), SessionPhase::ResultsReady);
        assert_eq!(session.origin(), Some(BatchOrigin::Remote));
        assert_eq!(session.batch().len(), 1);
    }

    #[test]
    fn test_empty_commit_lands_in_empty_phase() {
        let mut session = session();
        session.select_category(Category::Movies);
        let ticket = session.begin_fetch().unwrap();
        session.complete_fetch(ticket, FetchOutcome::sample(Vec::new()));
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert_eq!(session.origin(), Some(BatchOrigin::Sample));
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut session = session();
        session.select_category(Category::Movies);
        let a = session.begin_fetch().unwrap();

        // B supersedes A before A lands.
        session.select_category(Category::Tv);
        let b = session.begin_fetch().unwrap();

        assert!(session.complete_fetch(
            b,
            FetchOutcome::remote(vec![item("tv1", "Dark", Category::Tv, "Sci-Fi")]),
        ));
        // A resolves late and must not overwrite B's batch.
        assert!(!session.complete_fetch(
            a,
            FetchOutcome::remote(vec![item("m1", "Heat", Category::Movies, "Crime")]),
        ));

        assert_eq!(session.batch().len(), 1);
        assert_eq!(session.batch()[0].id, "tv1");
    }

    #[test]
    fn test_reset_invalidates_in_flight_fetch() {
        let mut session = session();
        session.select_category(Category::Movies);
        let ticket = session.begin_fetch().unwrap();
        session.reset();

        assert!(!session.complete_fetch(
            ticket,
            FetchOutcome::remote(vec![item("a", "A", Category::Movies, "Sci-Fi")]),
        ));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.batch().is_empty());
    }

    #[test]
    fn test_commit_enforces_genre_filter() {
        let mut session = session();
        session.select_category(Category::Movies);
        session.select_genre("Sci-Fi");
        let ticket = session.begin_fetch().unwrap();
        session.complete_fetch(
            ticket,
            FetchOutcome::remote(vec![
                item("a", "A", Category::Movies, "Sci-Fi"),
                item("b", "B", Category::Movies, "Drama"),
                item("c", "C", Category::Movies, "Sci-Fi"),
            ]),
        );
        assert!(session.batch().iter().all(|i| i.genre == "Sci-Fi"));
        assert_eq!(session.batch().len(), 2);
    }

    #[test]
    fn test_commit_excludes_liked_items() {
        let mut session = session();
        session.select_category(Category::Movies);
        let inception = find(&session, Category::Movies, "Inception");
        session.like_item(&inception, &GenreMatch);

        let ticket = session.begin_fetch().unwrap();
        session.complete_fetch(
            ticket,
            FetchOutcome::remote(vec![
                inception.clone(),
                item("99", "Arrival", Category::Movies, "Sci-Fi"),
            ]),
        );
        assert!(session.batch().iter().all(|i| i.id != inception.id));
        assert_eq!(session.batch().len(), 1);
    }

    #[test]
    fn test_like_is_idempotent() {
        let mut session = session();
        session.select_category(Category::Movies);
        let inception = find(&session, Category::Movies, "Inception");

        assert!(session.like_item(&inception, &GenreMatch));
        assert!(!session.like_item(&inception, &GenreMatch));
        assert_eq!(session.liked().len(), 1);
        assert!(session.batch().iter().all(|i| i.id != inception.id));
    }

    #[test]
    fn test_like_derives_genre_batch() {
        let mut session = session();
        session.select_category(Category::Movies);
        let inception = find(&session, Category::Movies, "Inception");
        session.like_item(&inception, &GenreMatch);

        // The only other Sci-Fi movie in the sample pool.
        let titles: Vec<&str> = session.batch().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Interstellar"]);
        assert_eq!(session.origin(), Some(BatchOrigin::Similar));
        assert_eq!(session.phase(), SessionPhase::ResultsReady);
    }

    #[test]
    fn test_like_with_no_matches_shows_empty_state() {
        let mut session = session();
        session.select_category(Category::Books);
        // Dune is the sample pool's only Sci-Fi book.
        let dune = find(&session, Category::Books, "Dune");
        session.like_item(&dune, &GenreMatch);
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.batch().is_empty());
    }

    #[test]
    fn test_liked_item_never_resuggested() {
        let mut catalog_items = HashMap::new();
        catalog_items.insert(
            Category::Books,
            vec![
                item("d1", "Dune", Category::Books, "Sci-Fi"),
                item("d2", "Foundation", Category::Books, "Sci-Fi"),
                item("d3", "Hyperion", Category::Books, "Sci-Fi"),
            ],
        );
        let mut session = Session::new(Catalog::new(catalog_items));
        session.select_category(Category::Books);

        let dune = item("d1", "Dune", Category::Books, "Sci-Fi");
        session.like_item(&dune, &GenreMatch);
        let ids: Vec<&str> = session.batch().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["d2", "d3"]);
    }

    #[test]
    fn test_skip_is_batch_local() {
        let mut catalog_items = HashMap::new();
        catalog_items.insert(
            Category::Movies,
            vec![
                item("a", "A", Category::Movies, "Sci-Fi"),
                item("b", "B", Category::Movies, "Sci-Fi"),
                item("c", "C", Category::Movies, "Sci-Fi"),
            ],
        );
        let mut session = Session::new(Catalog::new(catalog_items));
        session.select_category(Category::Movies);

        session.like_item(&item("a", "A", Category::Movies, "Sci-Fi"), &GenreMatch);
        session.skip_item("b");
        let ids: Vec<&str> = session.batch().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c"]);

        // A fresh like clears the skip set, so "b" may come back.
        session.like_item(&item("c", "C", Category::Movies, "Sci-Fi"), &GenreMatch);
        let ids: Vec<&str> = session.batch().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b"]);
    }

    #[test]
    fn test_skipping_last_item_shows_empty_state() {
        let mut session = session();
        session.select_category(Category::Movies);
        let inception = find(&session, Category::Movies, "Inception");
        session.like_item(&inception, &GenreMatch);
        assert_eq!(session.batch().len(), 1);

        let last = session.batch()[0].id.clone();
        session.skip_item(&last);
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn test_like_without_category_is_ignored() {
        let mut session = session();
        let stray = item("a", "A", Category::Movies, "Sci-Fi");
        assert!(!session.like_item(&stray, &GenreMatch));
        assert!(session.liked().is_empty());
    }

    #[test]
    fn test_reset_discards_session_state() {
        let mut session = session();
        session.select_category(Category::Movies);
        let inception = find(&session, Category::Movies, "Inception");
        session.like_item(&inception, &GenreMatch);
        session.reset();

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.selection(), &Selection::default());
        assert!(session.batch().is_empty());
        assert!(session.liked().is_empty());
    }

    struct RecordingHooks {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl SessionHooks for RecordingHooks {
        fn on_like_recorded(&mut self, item: &Item) {
            self.events.borrow_mut().push(format!("liked:{}", item.id));
        }

        fn on_onboarding_finished(&mut self) {
            self.events.borrow_mut().push("finished".to_string());
        }
    }

    #[test]
    fn test_hooks_fire_on_like_and_finish() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let hooks = RecordingHooks {
            events: events.clone(),
        };
        let mut session = Session::with_hooks(Catalog::sample(), Box::new(hooks));

        session.select_category(Category::Movies);
        let inception = find(&session, Category::Movies, "Inception");
        session.like_item(&inception, &GenreMatch);
        // The duplicate like is a no-op and must not re-fire the hook.
        session.like_item(&inception, &GenreMatch);
        session.finish_onboarding();

        assert_eq!(*events.borrow(), ["liked:2", "finished"]);
    }

    struct FixedSource(Vec<Item>);

    impl RecommendationSource for FixedSource {
        async fn fetch(
            &self,
            _category: Category,
            _genre: Option<&str>,
            _ctx: &RequestContext,
        ) -> FetchOutcome {
            FetchOutcome::remote(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_request_recommendations_commits_batch() {
        let mut session = session();
        session.select_category(Category::Tv);
        let source = FixedSource(vec![item("tv1", "Severance", Category::Tv, "Sci-Fi")]);

        let committed = session
            .request_recommendations(&source, &RequestContext::default())
            .await;
        assert!(committed);
        assert_eq!(session.phase(), SessionPhase::ResultsReady);
        assert_eq!(session.batch()[0].title, "Severance");
    }

    #[tokio::test]
    async fn test_request_recommendations_guarded_without_category() {
        let mut session = session();
        let source = FixedSource(Vec::new());
        let committed = session
            .request_recommendations(&source, &RequestContext::default())
            .await;
        assert!(!committed);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }
}
