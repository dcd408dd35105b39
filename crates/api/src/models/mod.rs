//! Domain models mapped from database rows.

pub mod artwork;
pub mod cart;
pub mod custom_art;
pub mod order;
pub mod user;

pub use artwork::Artwork;
pub use cart::{CartLine, CartSummary};
pub use custom_art::{PaintingRequest, SketchRequest};
pub use order::{Order, OrderItem, OrderItemDetail, ShippingAddress};
pub use user::User;
