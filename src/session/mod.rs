//! Session driver.
//!
//! One `Session` is the single logical thread of control: user inputs, fetch
//! completions and clock ticks all funnel through it in order, so no state
//! is ever touched by two mutators at once. Fetches themselves run as
//! detached tasks and report back as [`FetchOutcome`] messages; obsolete
//! results are not cancelled, just discarded by the navigator's
//! stale-response guard when they arrive.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::models::{
    Category, CategoryId, Game, GameId, Leaderboard, RunEntry, Selection, Variable, VariableOption,
};
use crate::nav::{Effect, FetchRequest, NavPhase, Navigator};
use crate::rotation::{RotationParams, Rotator};
use crate::store::SelectionStore;
use crate::upstream::{FetchError, StatsSource};

/// How often the driver advances the rotation clock.
const TICK_INTERVAL_MS: u64 = 100;

/// A user-initiated event.
#[derive(Debug, Clone)]
pub enum UserInput {
    SelectGame(Game),
    SelectCategory(Category),
    SelectOption(VariableOption),
    BackToGames,
    BackToCategories,
    SetRemember(bool),
}

/// Completion of an asynchronous fetch, keyed by what it was issued for.
#[derive(Debug)]
pub enum FetchOutcome {
    Games(Result<Vec<Game>, FetchError>),
    Categories {
        game_id: GameId,
        result: Result<Vec<Category>, FetchError>,
    },
    Variables {
        category_id: CategoryId,
        result: Result<Vec<Variable>, FetchError>,
    },
    Leaderboard {
        selection: Selection,
        result: Result<Leaderboard, FetchError>,
    },
}

/// Viewer session: navigation, rotation and the remembered selection.
pub struct Session {
    nav: Navigator,
    rotator: Rotator,
    store: Option<SelectionStore>,
    remember: bool,
}

impl Session {
    pub fn new(
        nav: Navigator,
        rotation: RotationParams,
        store: Option<SelectionStore>,
    ) -> Self {
        Self {
            nav,
            rotator: Rotator::new(rotation),
            store,
            remember: false,
        }
    }

    /// Start the session: fetch the game list and, when a complete selection
    /// was remembered, fetch its leaderboard directly, bypassing the
    /// intermediate drill-down states.
    pub fn init(&mut self, now_ms: u64) -> Vec<FetchRequest> {
        let mut effects = self.nav.init();
        if self.nav.selection().is_none() {
            if let Some(saved) = self.store.as_ref().and_then(|s| s.load()) {
                debug!("Restoring persisted selection");
                self.remember = true;
                effects.extend(self.nav.restore(saved));
            }
        }
        self.apply(effects, now_ms)
    }

    /// Jump to a specific selection (used by the CLI).
    pub fn restore(&mut self, selection: Selection, now_ms: u64) -> Vec<FetchRequest> {
        let effects = self.nav.restore(selection);
        let requests = self.apply(effects, now_ms);
        self.sync_store();
        requests
    }

    /// Process one user event.
    pub fn handle_input(&mut self, input: UserInput, now_ms: u64) -> Vec<FetchRequest> {
        let effects = match input {
            UserInput::SelectGame(game) => self.nav.select_game(game),
            UserInput::SelectCategory(category) => self.nav.select_category(category),
            UserInput::SelectOption(option) => self.nav.select_option(&option),
            UserInput::BackToGames => self.nav.back_to_games(),
            UserInput::BackToCategories => self.nav.back_to_categories(),
            UserInput::SetRemember(on) => {
                self.remember = on;
                Vec::new()
            }
        };
        let requests = self.apply(effects, now_ms);
        self.sync_store();
        requests
    }

    /// Process one fetch completion.
    pub fn fetch_done(&mut self, outcome: FetchOutcome, now_ms: u64) -> Vec<FetchRequest> {
        let effects = match outcome {
            FetchOutcome::Games(result) => self.nav.games_loaded(result),
            FetchOutcome::Categories { game_id, result } => {
                self.nav.categories_loaded(&game_id, result)
            }
            FetchOutcome::Variables {
                category_id,
                result,
            } => self.nav.variables_loaded(&category_id, result),
            FetchOutcome::Leaderboard { selection, result } => {
                self.nav.leaderboard_loaded(&selection, result)
            }
        };
        let requests = self.apply(effects, now_ms);
        self.sync_store();
        requests
    }

    /// Advance the rotation clock. Returns true when the visible output
    /// changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.rotator.tick(now_ms)
    }

    pub fn nav(&self) -> &Navigator {
        &self.nav
    }

    pub fn rotator(&self) -> &Rotator {
        &self.rotator
    }

    pub fn phase(&self) -> NavPhase {
        self.nav.phase()
    }

    pub fn remember(&self) -> bool {
        self.remember
    }

    /// Pinned top entries of the displayed leaderboard.
    pub fn pinned_entries(&self) -> &[RunEntry] {
        match self.nav.leaderboard() {
            Some(board) => &board[self.rotator.pinned_range()],
            None => &[],
        }
    }

    /// Entries of the currently visible rotating page. Empty during the
    /// transition hold-off, so the outgoing and incoming pages are never
    /// rendered together.
    pub fn page_entries(&self) -> &[RunEntry] {
        if self.rotator.is_transitioning() {
            return &[];
        }
        match self.nav.leaderboard() {
            Some(board) => &board[self.rotator.visible_range()],
            None => &[],
        }
    }

    fn apply(&mut self, effects: Vec<Effect>, now_ms: u64) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        for effect in effects {
            match effect {
                Effect::StopRotation => self.rotator.stop(),
                Effect::StartRotation { len } => self.rotator.start(len, now_ms),
                Effect::Fetch(request) => requests.push(request),
            }
        }
        requests
    }

    /// Keep the persisted record consistent with the current selection:
    /// both set together, or both cleared together.
    fn sync_store(&mut self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let wanted = if self.remember {
            self.nav.selection().filter(|s| s.is_complete()).cloned()
        } else {
            None
        };
        let result = match &wanted {
            Some(selection) => store.save(selection),
            None => store.clear(),
        };
        if let Err(e) = result {
            warn!("Selection store update failed: {}", e);
        }
    }
}

/// Run a session event loop until `render` returns false.
///
/// Inputs arrive on `inputs`; fetches are spawned on `source` and their
/// completions fed back as messages; rotation ticks on a fixed interval of
/// virtual-clock milliseconds measured from loop start. `render` is called
/// after every visible change.
pub async fn run<F>(
    mut session: Session,
    source: Arc<dyn StatsSource>,
    mut inputs: mpsc::Receiver<UserInput>,
    mut render: F,
) -> Session
where
    F: FnMut(&Session) -> bool,
{
    let started = Instant::now();
    let now_ms = move || started.elapsed().as_millis() as u64;
    let (done_tx, mut done_rx) = mpsc::channel::<FetchOutcome>(16);

    for request in session.init(now_ms()) {
        spawn_fetch(request, Arc::clone(&source), done_tx.clone());
    }
    if !render(&session) {
        return session;
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    let mut inputs_open = true;

    loop {
        tokio::select! {
            maybe_input = inputs.recv(), if inputs_open => {
                match maybe_input {
                    Some(input) => {
                        for request in session.handle_input(input, now_ms()) {
                            spawn_fetch(request, Arc::clone(&source), done_tx.clone());
                        }
                        if !render(&session) {
                            break;
                        }
                    }
                    None => inputs_open = false,
                }
            }
            Some(outcome) = done_rx.recv() => {
                for request in session.fetch_done(outcome, now_ms()) {
                    spawn_fetch(request, Arc::clone(&source), done_tx.clone());
                }
                if !render(&session) {
                    break;
                }
            }
            _ = ticker.tick() => {
                if session.tick(now_ms()) && !render(&session) {
                    break;
                }
            }
        }
    }

    session
}

/// Perform one fetch against the source.
pub async fn execute(request: FetchRequest, source: &dyn StatsSource) -> FetchOutcome {
    match request {
        FetchRequest::Games => FetchOutcome::Games(source.list_games().await),
        FetchRequest::Categories { game_id } => {
            let result = source.list_categories(&game_id).await;
            FetchOutcome::Categories { game_id, result }
        }
        FetchRequest::Variables { category_id } => {
            let result = source.list_variables(&category_id).await;
            FetchOutcome::Variables {
                category_id,
                result,
            }
        }
        FetchRequest::Leaderboard { selection } => {
            let result = source.fetch_leaderboard(&selection).await;
            FetchOutcome::Leaderboard { selection, result }
        }
    }
}

fn spawn_fetch(
    request: FetchRequest,
    source: Arc<dyn StatsSource>,
    tx: mpsc::Sender<FetchOutcome>,
) {
    tokio::spawn(async move {
        let outcome = execute(request, source.as_ref()).await;
        if tx.send(outcome).await.is_err() {
            debug!("Session ended before a fetch completed");
        }
    });
}
