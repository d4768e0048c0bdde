//! Product descriptors and cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as supplied by the catalog when it is added to the cart.
///
/// Display metadata and price are carried through untouched; nothing here is
/// validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Unit price, persisted as a JSON number.
    pub price: Price,
}

impl Product {
    /// Create a new product descriptor.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: impl Into<Price>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price: price.into(),
        }
    }
}

/// One product currently in the cart.
///
/// `quantity` is at least 1 for every item held by a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    pub price: Price,
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item from a product with the given quantity.
    #[must_use]
    pub fn from_product(product: Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity,
        }
    }

    /// Replace display metadata and price with a newer descriptor.
    ///
    /// The quantity is left alone.
    pub fn refresh(&mut self, product: Product) {
        self.title = product.title;
        self.image_url = product.image_url;
        self.price = product.price;
    }

    /// Unit price times quantity.
    ///
    /// `None` if the price is outside `Decimal` range or the product
    /// overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price
            .to_decimal()?
            .checked_mul(Decimal::from(self.quantity))
    }
}
