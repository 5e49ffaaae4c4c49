//! Product entity service

use std::sync::Arc;
use tracing::instrument;

use ledger_kernel::{store, EngineError, HistoryProjection, LedgerGateway};

use crate::product::{Product, ProductDraft, ProductStatus};

const ENTITY: &str = "product";

/// Entity service for supply-chain products
pub struct ProductService {
    gateway: Arc<dyn LedgerGateway>,
}

impl ProductService {
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        Self { gateway }
    }

    /// Validates and stores a brand-new product
    #[instrument(skip(self, draft), fields(product_id = %draft.product_id))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, EngineError> {
        let product = Product::new(draft)?;
        store::create(self.gateway.as_ref(), ENTITY, &product.product_id, &product).await?;
        Ok(product)
    }

    /// Loads the current product document
    pub async fn get_product(&self, product_id: &str) -> Result<Product, EngineError> {
        store::load(self.gateway.as_ref(), ENTITY, product_id).await
    }

    /// Drives the product status through the transition table
    #[instrument(skip(self), fields(product_id))]
    pub async fn update_status(
        &self,
        product_id: &str,
        new_status: ProductStatus,
    ) -> Result<Product, EngineError> {
        let mut product = self.get_product(product_id).await?;
        product.update_status(new_status)?;
        store::save(self.gateway.as_ref(), ENTITY, product_id, &product).await?;
        Ok(product)
    }

    /// Records a distributor and moves the product to in-transit
    #[instrument(skip(self), fields(product_id, distributor_id))]
    pub async fn add_distributor(
        &self,
        product_id: &str,
        distributor_id: &str,
        name: &str,
        location: &str,
    ) -> Result<Product, EngineError> {
        let mut product = self.get_product(product_id).await?;
        product.add_distributor(distributor_id, name, location)?;
        store::save(self.gateway.as_ref(), ENTITY, product_id, &product).await?;
        Ok(product)
    }

    /// Appends a quality check; returns the engine-assigned check id
    #[instrument(skip(self, notes), fields(product_id, inspector))]
    pub async fn add_quality_check(
        &self,
        product_id: &str,
        inspector: &str,
        temperature: f64,
        humidity: f64,
        notes: Vec<String>,
    ) -> Result<String, EngineError> {
        let mut product = self.get_product(product_id).await?;
        let check_id = product.add_quality_check(inspector, temperature, humidity, notes)?;
        store::save(self.gateway.as_ref(), ENTITY, product_id, &product).await?;
        Ok(check_id)
    }

    /// Pure boundary test against the stored product's storage requirement
    pub async fn is_storage_compliant(
        &self,
        product_id: &str,
        temperature: f64,
        humidity: f64,
    ) -> Result<bool, EngineError> {
        let product = self.get_product(product_id).await?;
        Ok(product.is_storage_compliant(temperature, humidity))
    }

    /// Lazy decoded projection of the product's change history
    pub async fn history(
        &self,
        product_id: &str,
    ) -> Result<HistoryProjection<Product>, EngineError> {
        store::history(self.gateway.as_ref(), product_id).await
    }

    /// All products from the given manufacturer
    pub async fn find_by_manufacturer(
        &self,
        manufacturer: &str,
    ) -> Result<Vec<Product>, EngineError> {
        store::query_by_field(self.gateway.as_ref(), "manufacturer", manufacturer).await
    }
}
