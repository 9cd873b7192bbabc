use crate::domain::balance::{Amount, Balance};
use serde::{Deserialize, Serialize};

/// Display label for a purchase whose price matches no product.
pub const UNKNOWN_PRODUCT: &str = "Unknown";

/// A product sold by the machine.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Product {
    /// Purchase command, e.g. `PA`.
    pub code: String,
    pub name: String,
    pub price: Amount,
    /// Minimum encoded balance at which the product is offered.
    pub state_key: String,
}

impl Product {
    pub fn new(code: &str, name: &str, price: Amount, state_key: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            price,
            state_key: state_key.to_string(),
        }
    }

    /// The balance threshold decoded from `state_key`.
    pub fn threshold(&self) -> Balance {
        Balance::decode(&self.state_key)
    }
}

/// Ordered product list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive lookup of a purchase command.
    pub fn by_code(&self, code: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))
    }

    /// First product with the given price.
    pub fn by_price(&self, price: Amount) -> Option<&Product> {
        self.products.iter().find(|p| p.price == price)
    }

    pub fn name_for(&self, price: Amount) -> &str {
        self.by_price(price)
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PRODUCT)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let builtin = [
            ("PA", "Coffee", 3000),
            ("PB", "Tea", 4000),
            ("PC", "Hot Chocolate", 6000),
        ];
        Self::new(
            builtin
                .into_iter()
                .map(|(code, name, price)| Product {
                    code: code.to_string(),
                    name: name.to_string(),
                    price: Amount(price),
                    state_key: price.to_string(),
                })
                .collect(),
        )
    }
}
