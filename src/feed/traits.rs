use crate::model::{LoadError, ProductRecord};

#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Vec<ProductRecord>, LoadError>;
}
