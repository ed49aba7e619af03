//! Shell configuration read from the environment.

use std::path::PathBuf;

use billing_client::{ClientConfig, InitOptions};
use billing_core::ProductDescriptor;

use crate::error::ShellError;

pub const PRODUCTS_ENV: &str = "BILLING_PRODUCTS";
pub const ENABLE_CACHE_ENV: &str = "BILLING_ENABLE_CACHE";
pub const CACHE_DB_ENV: &str = "BILLING_CACHE_DB";

/// What a shell session loads and where it keeps its snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub products: Vec<ProductDescriptor>,
    pub enable_cache: bool,
    /// SQLite file for native hosts; `None` uses the platform data dir.
    pub cache_db: Option<PathBuf>,
    pub client: ClientConfig,
}

impl ShellConfig {
    /// Read `BILLING_PRODUCTS`, `BILLING_ENABLE_CACHE`, `BILLING_CACHE_DB`
    /// and the client settings from the process environment.
    pub fn from_env() -> Result<Self, ShellError> {
        let mut config = Self::from_lookup(|name| std::env::var(name).ok())?;
        config.client = ClientConfig::from_env();
        Ok(config)
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShellError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let products = match lookup(PRODUCTS_ENV) {
            Some(list) => parse_products(&list)?,
            None => Vec::new(),
        };
        let enable_cache = match lookup(ENABLE_CACHE_ENV) {
            Some(value) => parse_flag(ENABLE_CACHE_ENV, &value)?,
            None => false,
        };
        let cache_db = lookup(CACHE_DB_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            products,
            enable_cache,
            cache_db,
            client: ClientConfig::default(),
        })
    }

    pub fn init_options(&self) -> InitOptions {
        InitOptions::new()
            .products(self.products.iter().cloned())
            .enable_cache(self.enable_cache)
    }
}

/// Parse a comma-separated `sku:type` list. Blank entries are skipped.
pub fn parse_products(list: &str) -> Result<Vec<ProductDescriptor>, ShellError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry.parse().map_err(|source| ShellError::InvalidProducts {
                var: PRODUCTS_ENV,
                source,
            })
        })
        .collect()
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ShellError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ShellError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}
