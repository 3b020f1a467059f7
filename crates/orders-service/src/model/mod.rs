//! Pure data structures shared by the store, the clients, and the service.

pub mod order;
pub mod product;

pub use order::{
    EnrichedItem, EnrichedOrder, Order, OrderId, OrderItem, OrderItemRequest, OrderReceipt,
    OrderStatus, OrderWithItems,
};
pub use product::ValidatedProduct;
