// Widget controller: owns the catalog, the enquiry selection and the UI state
// of one embedded widget.

pub mod latest;
pub mod render;
pub mod state;

use crate::catalog::{FilterResult, SuggestionEngine};
use crate::config::WidgetConfig;
use crate::enquiry::EnquiryTransport;
use crate::feed::CatalogSource;
use crate::model::{EnquiryForm, EnquiryOutcome, LoadError, ProductRecord, ValidationError};
use latest::LatestWins;
use state::{FormStatus, NETWORK_ERROR, NO_PRODUCTS_LOADED, ProductDetails, ResultsView, StatusKind, WidgetState, WidgetView};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct Widget {
    config: Arc<WidgetConfig>,
    source: Arc<dyn CatalogSource>,
    transport: Arc<dyn EnquiryTransport>,
    state: Arc<Mutex<WidgetState>>,
    search_tokens: Arc<LatestWins>,
    suggest_tokens: Arc<LatestWins>,
}

impl Widget {
    pub fn new(
        config: WidgetConfig,
        source: Arc<dyn CatalogSource>,
        transport: Arc<dyn EnquiryTransport>,
    ) -> Self {
        let state = WidgetState::new(config.fields.clone());
        Self {
            config: Arc::new(config),
            source,
            transport,
            state: Arc::new(Mutex::new(state)),
            search_tokens: Arc::new(LatestWins::new()),
            suggest_tokens: Arc::new(LatestWins::new()),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub async fn view(&self) -> WidgetView {
        self.state.lock().await.view()
    }

    pub async fn product_count(&self) -> usize {
        self.state.lock().await.catalog.len()
    }

    /// Initial load. Cards are not rendered until the user searches.
    pub async fn load(&self) -> Result<usize, LoadError> {
        match self.source.load().await {
            Ok(records) => {
                let mut state = self.state.lock().await;
                self.replace_catalog(&mut state, records);
                info!("Products loaded: {}", state.catalog.len());
                Ok(state.catalog.len())
            }
            Err(e) => {
                error!("Load error for {}: {}", self.config.sheet_url, e);
                self.state.lock().await.results = ResultsView::Error(NO_PRODUCTS_LOADED.to_string());
                Err(e)
            }
        }
    }

    /// Swaps in a new catalog. Pending search and suggestion passes were
    /// computed against the old one and must not apply.
    fn replace_catalog(&self, state: &mut WidgetState, records: Vec<ProductRecord>) {
        self.search_tokens.issue();
        self.suggest_tokens.issue();
        state.catalog.set_products(records);
    }

    /// Reloads the feed and replaces the catalog. On failure the old catalog stays.
    pub async fn refresh(&self) -> Result<usize, LoadError> {
        match self.source.load().await {
            Ok(records) => {
                let mut state = self.state.lock().await;
                self.replace_catalog(&mut state, records);
                state.results = ResultsView::Idle;
                info!("Refreshed: {}", state.catalog.len());
                Ok(state.catalog.len())
            }
            Err(e) => {
                error!("Refresh error for {}: {}", self.config.sheet_url, e);
                Err(e)
            }
        }
    }

    /// Debounced catalog search. Returns `false` when a newer search superseded this one.
    pub async fn search(&self, query: &str) -> bool {
        let token = self.search_tokens.issue();
        self.state.lock().await.query = query.to_string();

        sleep(self.config.search_debounce()).await;

        let results = {
            let mut state = self.state.lock().await;
            if !self.search_tokens.is_latest(token) {
                return false;
            }
            match state.catalog.filter(query) {
                FilterResult::Cleared => {
                    state.results = ResultsView::Idle;
                    return true;
                }
                FilterResult::Matches(entries) => {
                    debug!("Search {:?}: {} matches", query, entries.len());
                    state.results = ResultsView::Loading {
                        placeholders: self.config.skeleton_count,
                    };
                    state.cards(&entries)
                }
            }
        };

        sleep(self.config.skeleton_delay()).await;

        let mut state = self.state.lock().await;
        if !self.search_tokens.is_latest(token) {
            return false;
        }
        state.results = results;
        true
    }

    /// Debounced suggestion lookup for the enquiry modal.
    pub async fn suggest(&self, query: &str) -> bool {
        let token = self.suggest_tokens.issue();
        self.state.lock().await.product_query = query.to_string();

        sleep(self.config.suggest_debounce()).await;

        let mut state = self.state.lock().await;
        if !self.suggest_tokens.is_latest(token) {
            return false;
        }
        let suggestions = SuggestionEngine::new(&state.fields).suggest(&state.catalog, query);
        state.suggestions = suggestions;
        true
    }

    /// Adds a suggestion to the selection and clears the input and the list.
    pub async fn pick_suggestion(&self, name: &str) -> bool {
        let mut state = self.state.lock().await;
        // Pending lookups must not repopulate the list after this pick.
        self.suggest_tokens.issue();
        let added = state.selection.add(name);
        state.clear_suggestions();
        added
    }

    /// Enter key: picks the first visible suggestion, if any.
    pub async fn pick_first_suggestion(&self) -> Option<String> {
        let mut state = self.state.lock().await;
        let first = state.suggestions.first().cloned()?;
        self.suggest_tokens.issue();
        state.selection.add(&first);
        state.clear_suggestions();
        Some(first)
    }

    /// Card "Enquire" button: selects the product and opens the enquiry modal.
    pub async fn enquire(&self, name: &str) {
        let mut state = self.state.lock().await;
        state.selection.add(name);
        state.modal_open = true;
    }

    pub async fn open_details(&self, index: usize) -> Option<ProductDetails> {
        let mut state = self.state.lock().await;
        let details = state.product_details(index)?;
        state.details = Some(index);
        Some(details)
    }

    pub async fn close_details(&self) {
        self.state.lock().await.details = None;
    }

    /// "Enquire" inside the details popup.
    pub async fn enquire_from_details(&self) {
        let mut state = self.state.lock().await;
        let title = state
            .details
            .take()
            .and_then(|i| state.product_details(i))
            .map(|d| d.title)
            .unwrap_or_default();
        state.selection.add(&title);
        state.modal_open = true;
    }

    pub async fn remove_selected(&self, name: &str) -> bool {
        self.state.lock().await.selection.remove(name)
    }

    pub async fn open_modal(&self) {
        self.state.lock().await.modal_open = true;
    }

    pub async fn close_modal(&self) {
        self.state.lock().await.modal_open = false;
    }

    pub async fn set_form(&self, form: EnquiryForm) {
        self.state.lock().await.form = form;
    }

    /// Submits the enquiry. Fails only on the host-side form check; every
    /// network result is reported through the outcome and the form status.
    pub async fn submit(&self) -> Result<EnquiryOutcome, ValidationError> {
        let payload = {
            let mut state = self.state.lock().await;
            state.form.validate()?;
            state.status = None;
            state.payload(&self.config.nonce)
        };

        let outcome = self.transport.submit(&payload).await;

        let mut state = self.state.lock().await;
        match &outcome {
            EnquiryOutcome::Sent(msg) => {
                info!("✅ Enquiry sent: {}", msg);
                state.status = Some(FormStatus {
                    kind: StatusKind::Success,
                    text: msg.clone(),
                });
                state.form.reset();
                state.selection.clear();
                self.schedule_close();
            }
            EnquiryOutcome::Rejected(msg) => {
                warn!("Enquiry rejected: {}", msg);
                state.status = Some(FormStatus {
                    kind: StatusKind::Error,
                    text: msg.clone(),
                });
            }
            EnquiryOutcome::NetworkError => {
                warn!("Enquiry network error");
                state.status = Some(FormStatus {
                    kind: StatusKind::Error,
                    text: NETWORK_ERROR.to_string(),
                });
            }
        }
        Ok(outcome)
    }

    fn schedule_close(&self) {
        let state = self.state.clone();
        let delay = self.config.close_delay();
        tokio::spawn(async move {
            sleep(delay).await;
            state.lock().await.modal_open = false;
        });
    }
}
