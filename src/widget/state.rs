use crate::catalog::{Catalog, SelectionSession};
use crate::config::FieldKeys;
use crate::enquiry::EnquiryPayload;
use crate::model::{CatalogEntry, EnquiryForm, ProductRecord};
use crate::utils::truncate_chars;

/// Characters of description shown on a card.
pub const CARD_SUMMARY_CHARS: usize = 50;

pub const NO_PRODUCTS_LOADED: &str = "Could not load products";
pub const NETWORK_ERROR: &str = "Network error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub index: usize,
    pub title: String,
    pub summary: String,
    pub price: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    /// Nothing searched yet, or the query was cleared.
    Idle,
    /// Placeholder cards while a filter pass is being rendered.
    Loading { placeholders: usize },
    Cards(Vec<Card>),
    Empty,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnquiryView {
    pub open: bool,
    pub query: String,
    pub suggestions: Vec<String>,
    pub chips: Vec<String>,
    pub products_field: String,
    pub form: EnquiryForm,
    pub status: Option<FormStatus>,
}

/// Everything a front end needs to draw one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub query: String,
    pub results: ResultsView,
    pub details: Option<ProductDetails>,
    pub enquiry: EnquiryView,
}

/// Mutable state of one widget. Chips and the products field are derived
/// from `selection` whenever a view is taken.
#[derive(Debug)]
pub struct WidgetState {
    pub catalog: Catalog,
    pub selection: SelectionSession,
    pub fields: FieldKeys,
    pub query: String,
    pub results: ResultsView,
    pub details: Option<usize>,
    pub modal_open: bool,
    pub product_query: String,
    pub suggestions: Vec<String>,
    pub form: EnquiryForm,
    pub status: Option<FormStatus>,
}

impl WidgetState {
    pub fn new(fields: FieldKeys) -> Self {
        Self {
            catalog: Catalog::new(),
            selection: SelectionSession::new(),
            fields,
            query: String::new(),
            results: ResultsView::Idle,
            details: None,
            modal_open: false,
            product_query: String::new(),
            suggestions: Vec::new(),
            form: EnquiryForm::default(),
            status: None,
        }
    }

    pub fn title_of<'a>(&self, record: &'a ProductRecord) -> Option<&'a str> {
        record.first_of(&self.fields.title)
    }

    pub fn card(&self, entry: &CatalogEntry) -> Card {
        let record = &entry.record;
        let title = self
            .title_of(record)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Product {}", entry.index + 1));
        let description = record.first_of(&self.fields.description).unwrap_or("");
        Card {
            index: entry.index,
            title,
            summary: truncate_chars(description, CARD_SUMMARY_CHARS).to_string(),
            price: record.first_of(&self.fields.price).map(str::to_string),
            image: record.first_of(&self.fields.image).map(str::to_string),
        }
    }

    pub fn cards(&self, entries: &[CatalogEntry]) -> ResultsView {
        if entries.is_empty() {
            ResultsView::Empty
        } else {
            ResultsView::Cards(entries.iter().map(|e| self.card(e)).collect())
        }
    }

    /// Details popup content, resolved by catalog position.
    pub fn product_details(&self, index: usize) -> Option<ProductDetails> {
        let record = self.catalog.get(index)?;
        Some(ProductDetails {
            index,
            title: self.title_of(record).unwrap_or("").to_string(),
            description: record.first_of(&self.fields.description).unwrap_or("").to_string(),
            image: record.first_of(&self.fields.image).unwrap_or("").to_string(),
        })
    }

    /// Empties the suggestion input and its list in one step.
    pub fn clear_suggestions(&mut self) {
        self.product_query.clear();
        self.suggestions.clear();
    }

    /// Payload with the product list serialized at call time.
    pub fn payload(&self, nonce: &str) -> EnquiryPayload {
        EnquiryPayload {
            nonce: nonce.to_string(),
            form: self.form.clone(),
            products: self.selection.serialize(),
        }
    }

    pub fn view(&self) -> WidgetView {
        WidgetView {
            query: self.query.clone(),
            results: self.results.clone(),
            details: self.details.and_then(|i| self.product_details(i)),
            enquiry: EnquiryView {
                open: self.modal_open,
                query: self.product_query.clone(),
                suggestions: self.suggestions.clone(),
                chips: self.selection.names().to_vec(),
                products_field: self.selection.serialize(),
                form: self.form.clone(),
                status: self.status.clone(),
            },
        }
    }
}
