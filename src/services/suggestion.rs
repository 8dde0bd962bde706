// src/services/suggestion.rs
// DOCUMENTATION: Debounced search-suggestion input (area/location autocomplete)
// PURPOSE: Turn keystrokes into at most one backend lookup per quiet period
// and hand the chosen entry to the caller
//
// Lifecycle: Idle → Typing → Fetching → Showing{0..N} → (Selected | Dismissed)
// Fetch failures fold into Showing{0}. Every keystroke, selection and mount
// advances a generation counter, as does an outside click while a lookup is
// pending. A response tagged with an older generation is dropped, so a slow
// early lookup can never replace a newer list.

use crate::errors::PortalError;
use crate::models::lenient::extract_list;
use crate::models::{AreaSuggestion, Coordinates, Locale};
use crate::services::backend_client::{BackendClient, CallContext};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Quiet period between the last keystroke and the lookup
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Where suggestion records come from
#[async_trait]
pub trait SuggestionSource: Send + Sync + 'static {
    async fn fetch(&self, query: &str) -> Result<Vec<Value>, PortalError>;
}

/// Production source: backend `area-search?search=<query>`
pub struct AreaSearchSource {
    client: Arc<BackendClient>,
    locale: Locale,
}

impl AreaSearchSource {
    pub fn new(client: Arc<BackendClient>, locale: Locale) -> Self {
        Self { client, locale }
    }
}

#[async_trait]
impl SuggestionSource for AreaSearchSource {
    async fn fetch(&self, query: &str) -> Result<Vec<Value>, PortalError> {
        let ctx = CallContext::anonymous(self.locale);
        let response: Value = self
            .client
            .get_data("area-search", &[("search", query)], &ctx)
            .await?;
        Ok(extract_list(response))
    }
}

/// What the caller receives when the user picks an entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Exactly the text shown in the input after selection
    pub description: String,
    pub id: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Timer pending
    Typing,
    /// Lookup dispatched, response not applied yet
    Fetching,
    /// Suggestions applied (count)
    Showing(usize),
    Selected,
    Dismissed,
}

impl Phase {
    /// Work is pending: a timer or an in-flight lookup that still counts
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Typing | Phase::Fetching)
    }
}

/// Where a pointer-down landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Input,
    Panel,
    Outside,
}

/// What the suggestion panel should render
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    Closed,
    Loading,
    Empty { message: String },
    Items(Vec<AreaSuggestion>),
}

#[derive(Debug, Clone)]
pub struct InputOptions {
    pub default_value: String,
    pub placeholder: String,
    pub disabled: bool,
    pub quiet_period: Duration,
    pub locale: Locale,
}

impl Default for InputOptions {
    fn default() -> Self {
        InputOptions {
            default_value: String::new(),
            placeholder: String::new(),
            disabled: false,
            quiet_period: DEFAULT_QUIET_PERIOD,
            locale: Locale::default(),
        }
    }
}

struct InputState {
    text: String,
    items: Vec<AreaSuggestion>,
    open: bool,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl InputState {
    /// Invalidate whatever is scheduled or in flight
    fn advance(&mut self) -> u64 {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation += 1;
        self.generation
    }
}

struct Shared<S> {
    source: S,
    locale: Locale,
    state: Mutex<InputState>,
    phase: watch::Sender<Phase>,
}

impl<S: SuggestionSource> Shared<S> {
    /// Timer fired: hand the lookup to its own task so later keystrokes
    /// only cancel timers, never the request itself
    async fn dispatch(self: Arc<Self>, query: String, generation: u64) {
        {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                return;
            }
            state.timer = None;
            self.phase.send_replace(Phase::Fetching);
        }
        tokio::spawn(self.fetch(query, generation));
    }

    async fn fetch(self: Arc<Self>, query: String, generation: u64) {
        let items = match self.source.fetch(&query).await {
            Ok(records) => records
                .iter()
                .map(|record| AreaSuggestion::from_value(record, self.locale))
                .collect(),
            Err(e) => {
                log::warn!("Suggestion lookup for '{}' failed: {}", query, e);
                Vec::new()
            }
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            log::debug!(
                "Dropping stale suggestions for '{}' (generation {} < {})",
                query,
                generation,
                state.generation
            );
            return;
        }

        let count = items.len();
        state.items = items;
        self.phase.send_replace(Phase::Showing(count));
    }
}

type SelectCallback = Box<dyn Fn(Selection) + Send + Sync>;

/// Debounced autocomplete input
/// DOCUMENTATION: One instance per rendered input. Dropping it cancels the
/// pending timer; an in-flight lookup finishes but its result is ignored.
pub struct SuggestionInput<S: SuggestionSource> {
    shared: Arc<Shared<S>>,
    options: InputOptions,
    on_select: SelectCallback,
}

impl<S: SuggestionSource> SuggestionInput<S> {
    pub fn new(
        source: S,
        options: InputOptions,
        on_select: impl Fn(Selection) + Send + Sync + 'static,
    ) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        let shared = Arc::new(Shared {
            source,
            locale: options.locale,
            state: Mutex::new(InputState {
                text: options.default_value.clone(),
                items: Vec::new(),
                open: false,
                generation: 0,
                timer: None,
            }),
            phase,
        });

        Self {
            shared,
            options,
            on_select: Box::new(on_select),
        }
    }

    /// Fetch suggestions for the default value right away
    pub async fn mount(&self) {
        let mut state = self.shared.state.lock().await;
        let generation = state.advance();
        let query = state.text.clone();
        self.shared.phase.send_replace(Phase::Fetching);
        drop(state);

        tokio::spawn(self.shared.clone().fetch(query, generation));
    }

    /// The user changed the text: (re)start the quiet-period timer
    pub async fn type_text(&self, text: impl Into<String>) {
        if self.options.disabled {
            return;
        }

        let mut state = self.shared.state.lock().await;
        let generation = state.advance();
        state.text = text.into();
        state.open = true;

        let shared = self.shared.clone();
        let query = state.text.clone();
        let quiet_period = self.options.quiet_period;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            shared.dispatch(query, generation).await;
        }));

        self.shared.phase.send_replace(Phase::Typing);
    }

    pub async fn focus(&self) {
        if self.options.disabled {
            return;
        }
        self.shared.state.lock().await.open = true;
    }

    /// Pointer-down anywhere; only outside clicks close the panel
    /// A pending timer or lookup is abandoned along with the panel.
    pub async fn pointer_down(&self, target: PointerTarget) {
        if target != PointerTarget::Outside {
            return;
        }

        let mut state = self.shared.state.lock().await;
        if state.open {
            if self.phase().is_busy() {
                state.advance();
            }
            state.open = false;
            self.shared.phase.send_replace(Phase::Dismissed);
        }
    }

    /// Pick the entry at `index` of the current list
    /// DOCUMENTATION: Replaces the text with the entry's display name,
    /// closes the panel and notifies the caller. Out of range is a no-op.
    pub async fn select(&self, index: usize) -> Option<Selection> {
        if self.options.disabled {
            return None;
        }

        let mut state = self.shared.state.lock().await;
        let item = state.items.get(index)?.clone();

        state.advance();
        state.text = item.display_name.clone();
        state.open = false;
        self.shared.phase.send_replace(Phase::Selected);
        drop(state);

        let selection = Selection {
            description: item.display_name,
            id: item.id,
            coordinates: item.coordinates,
        };
        (self.on_select)(selection.clone());
        Some(selection)
    }

    pub async fn text(&self) -> String {
        self.shared.state.lock().await.text.clone()
    }

    pub async fn items(&self) -> Vec<AreaSuggestion> {
        self.shared.state.lock().await.items.clone()
    }

    pub async fn view(&self) -> PanelView {
        let state = self.shared.state.lock().await;
        if !state.open {
            return PanelView::Closed;
        }

        match self.phase() {
            Phase::Typing | Phase::Fetching => PanelView::Loading,
            _ if state.items.is_empty() => PanelView::Empty {
                message: self.options.locale.no_results_message().to_string(),
            },
            _ => PanelView::Items(state.items.clone()),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.shared.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.shared.phase.subscribe()
    }

    /// Wait until no timer is pending and no current lookup is in flight
    pub async fn settled(&self) -> Phase {
        let mut rx = self.subscribe();
        let result = rx.wait_for(|phase| !phase.is_busy()).await;
        match result {
            Ok(phase) => *phase,
            Err(_) => self.phase(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.options.placeholder
    }

    pub fn is_disabled(&self) -> bool {
        self.options.disabled
    }
}

impl<S: SuggestionSource> Drop for SuggestionInput<S> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.shared.state.try_lock() {
            state.advance();
        }
    }
}
