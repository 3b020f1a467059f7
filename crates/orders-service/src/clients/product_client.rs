//! # Product Validator Client
//!
//! Wraps the `validate_products` request/reply pattern: one batch request
//! with the distinct product ids, one reply with the authoritative price
//! and name per id. The reply is untrusted remote data — it may omit ids —
//! so it is wrapped in a [`ProductLookup`] whose accessors turn a missing
//! id into [`OrderError::UnknownProduct`].

use std::collections::HashMap;

use message_bus::RpcClient;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::error::OrderError;
use crate::model::ValidatedProduct;

#[derive(Clone)]
pub struct ProductValidatorClient {
    inner: RpcClient<Vec<String>, Vec<ValidatedProduct>>,
}

impl ProductValidatorClient {
    pub fn new(inner: RpcClient<Vec<String>, Vec<ValidatedProduct>>) -> Self {
        Self { inner }
    }

    /// Validates a batch of product ids. Suspends until the reply arrives;
    /// a timeout or transport failure surfaces as `UpstreamUnavailable`.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn validate(&self, ids: Vec<String>) -> Result<ProductLookup, OrderError> {
        debug!("validating product ids");
        let products =
            self.inner
                .call(ids)
                .await
                .map_err(|source| OrderError::UpstreamUnavailable {
                    service: "product validator",
                    source,
                })?;
        debug!(validated = products.len(), "validator replied");
        Ok(ProductLookup::new(products))
    }
}

/// Index over one validator reply.
#[derive(Debug)]
pub struct ProductLookup {
    by_id: HashMap<String, ValidatedProduct>,
}

impl ProductLookup {
    fn new(products: Vec<ValidatedProduct>) -> Self {
        Self {
            by_id: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn price_of(&self, product_id: &str) -> Result<Decimal, OrderError> {
        self.by_id
            .get(product_id)
            .map(|p| p.price)
            .ok_or_else(|| OrderError::UnknownProduct(product_id.to_string()))
    }

    pub fn name_of(&self, product_id: &str) -> Result<&str, OrderError> {
        self.by_id
            .get(product_id)
            .map(|p| p.name.as_str())
            .ok_or_else(|| OrderError::UnknownProduct(product_id.to_string()))
    }
}
