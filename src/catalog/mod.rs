// Catalog module: product store, suggestion lookup and the enquiry selection.

pub mod selection;
pub mod store;
pub mod suggest;

pub use selection::SelectionSession;
pub use store::{Catalog, FilterResult};
pub use suggest::SuggestionEngine;
