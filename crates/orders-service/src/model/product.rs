use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One element of the Product service's reply to `validate_products`:
/// the authoritative price and display name for a product id. Ids the
/// validator considers unknown or invalid are simply absent from the reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedProduct {
    pub id: String,
    pub name: String,
    pub price: Decimal,
}
