pub mod fetcher;
pub mod traits;

pub use fetcher::SheetLoader;
pub use traits::CatalogSource;
