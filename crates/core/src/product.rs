use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::purchase::Purchase;
use crate::sku::Sku;

/// Billing kind of a product, named as the native store names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    /// One-time purchase, non-renewing.
    #[serde(rename = "inapp")]
    Inapp,
    /// Recurring-billed subscription.
    #[serde(rename = "subs")]
    Subs,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Inapp => "inapp",
            ProductType::Subs => "subs",
        }
    }

    pub fn is_inapp(&self) -> bool {
        matches!(self, ProductType::Inapp)
    }
}

impl core::fmt::Display for ProductType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inapp" => Ok(ProductType::Inapp),
            "subs" => Ok(ProductType::Subs),
            other => Err(DomainError::UnknownProductType(other.to_string())),
        }
    }
}

/// A product the application wants to sell: sku plus billing kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    pub sku: Sku,
    #[serde(rename = "type")]
    pub product_type: ProductType,
}

impl ProductDescriptor {
    pub fn new(sku: Sku, product_type: ProductType) -> Self {
        Self { sku, product_type }
    }

    pub fn inapp(sku: Sku) -> Self {
        Self::new(sku, ProductType::Inapp)
    }

    pub fn subscription(sku: Sku) -> Self {
        Self::new(sku, ProductType::Subs)
    }
}

impl FromStr for ProductDescriptor {
    type Err = DomainError;

    /// Parse `sku:type`, e.g. `remove_ads:inapp`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sku, kind) = s
            .rsplit_once(':')
            .ok_or_else(|| DomainError::validation(format!("expected sku:type, got {s:?}")))?;
        Ok(Self::new(sku.parse()?, kind.trim().parse()?))
    }
}

/// Formatted price of a product.
///
/// One-time products carry a single price; subscriptions carry one formatted
/// price per pricing phase (trial, intro, recurring...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Single { price: String },
    Tiers { prices: Vec<String> },
}

impl Price {
    pub fn single(price: impl Into<String>) -> Self {
        Price::Single {
            price: price.into(),
        }
    }

    pub fn tiers<I, S>(prices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Price::Tiers {
            prices: prices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            Price::Single { price } => Some(price),
            Price::Tiers { .. } => None,
        }
    }

    pub fn as_tiers(&self) -> Option<&[String]> {
        match self {
            Price::Single { .. } => None,
            Price::Tiers { prices } => Some(prices),
        }
    }
}

/// Product definition as returned by the native store, optionally with the
/// purchase that owns it.
///
/// Wire shape: `{"sku", "type", "price"}` for one-time products and
/// `{"sku", "type", "prices": [..]}` for subscriptions, plus `"purchase"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[serde(flatten)]
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase: Option<Purchase>,
}

impl Product {
    pub fn inapp(sku: Sku, price: impl Into<String>) -> Self {
        Self {
            sku,
            product_type: ProductType::Inapp,
            price: Price::single(price),
            purchase: None,
        }
    }

    pub fn subscription<I, S>(sku: Sku, prices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sku,
            product_type: ProductType::Subs,
            price: Price::tiers(prices),
            purchase: None,
        }
    }

    pub fn with_purchase(mut self, purchase: Purchase) -> Self {
        self.purchase = Some(purchase);
        self
    }

    pub fn is_owned(&self) -> bool {
        self.purchase.is_some()
    }
}
