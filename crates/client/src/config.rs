//! Client and per-initialization configuration.

use billing_core::{ProductDescriptor, ProductType, Sku};

/// Storage key of the catalog snapshot unless configured otherwise.
pub const DEFAULT_CACHE_KEY: &str = "BILLING_cache";

/// Environment variable overriding [`ClientConfig::cache_key`].
pub const CACHE_KEY_ENV: &str = "BILLING_CACHE_KEY";

/// Settings fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Key the catalog snapshot is stored under.
    pub cache_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by `BILLING_CACHE_KEY` when set and non-empty.
    pub fn from_env() -> Self {
        match std::env::var(CACHE_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::default().with_cache_key(key),
            _ => Self::default(),
        }
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = key.into();
        self
    }
}

/// What to load during one `init` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    pub products: Vec<ProductDescriptor>,
    pub enable_cache: bool,
}

impl InitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(mut self, descriptor: ProductDescriptor) -> Self {
        self.products.push(descriptor);
        self
    }

    pub fn products<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = ProductDescriptor>,
    {
        self.products.extend(descriptors);
        self
    }

    pub fn enable_cache(mut self, enabled: bool) -> Self {
        self.enable_cache = enabled;
        self
    }

    /// Skus of the given kind, in descriptor order.
    pub fn skus_of(&self, product_type: ProductType) -> Vec<&Sku> {
        self.products
            .iter()
            .filter(|d| d.product_type == product_type)
            .map(|d| &d.sku)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skus_are_split_by_kind() {
        let options = InitOptions::new()
            .product("remove_ads:inapp".parse().unwrap())
            .product("gold:subs".parse().unwrap())
            .product("coins:inapp".parse().unwrap());

        let inapp: Vec<&str> = options
            .skus_of(ProductType::Inapp)
            .into_iter()
            .map(Sku::as_str)
            .collect();
        let subs: Vec<&str> = options
            .skus_of(ProductType::Subs)
            .into_iter()
            .map(Sku::as_str)
            .collect();

        assert_eq!(inapp, vec!["remove_ads", "coins"]);
        assert_eq!(subs, vec!["gold"]);
    }

    #[test]
    fn default_cache_key() {
        assert_eq!(ClientConfig::default().cache_key, "BILLING_cache");
        assert_eq!(
            ClientConfig::default().with_cache_key("other").cache_key,
            "other"
        );
    }
}
