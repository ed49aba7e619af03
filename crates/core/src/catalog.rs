//! The product mapping: sku → product, built from native query results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::purchase::{PurchaseRecord, find_purchase};
use crate::sku::Sku;

/// Products known to the client, keyed by sku.
///
/// A catalog is always replaced wholesale (fresh fetch or cached snapshot),
/// never merged. Its JSON form is the cache snapshot: an object keyed by sku.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: BTreeMap<Sku, Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from one batch of product definitions and the purchase
    /// records of the same kind.
    ///
    /// Each product gets the first record covering its sku; a later
    /// definition for an already present sku overwrites the earlier one.
    pub fn extend_with(&mut self, definitions: Vec<Product>, records: &[PurchaseRecord]) {
        for mut product in definitions {
            product.purchase = find_purchase(&product.sku, records);
            self.products.insert(product.sku.clone(), product);
        }
    }

    pub fn insert(&mut self, product: Product) -> Option<Product> {
        self.products.insert(product.sku.clone(), product)
    }

    pub fn get(&self, sku: &str) -> Option<&Product> {
        self.products.get(sku)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a snapshot. Every key must equal the sku of its product.
    pub fn from_snapshot(json: &str) -> Result<Self, serde_json::Error> {
        let catalog: Catalog = serde_json::from_str(json)?;
        if let Some((key, product)) = catalog.products.iter().find(|(key, p)| **key != p.sku) {
            return Err(serde::de::Error::custom(format!(
                "snapshot entry {key} holds product {}",
                product.sku
            )));
        }
        Ok(catalog)
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<T: IntoIterator<Item = Product>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        for product in iter {
            catalog.insert(product);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductType;
    use crate::purchase::Purchase;
    use proptest::prelude::*;

    fn sku(s: &str) -> Sku {
        s.parse().unwrap()
    }

    fn record(ids: &[&str], order: &str) -> PurchaseRecord {
        PurchaseRecord {
            product_ids: ids.iter().map(|s| s.to_string()).collect(),
            order_id: Some(order.to_string()),
            purchase_state: None,
            acknowledged: true,
            auto_renewing: false,
            account_id: None,
            profile_id: None,
            signature: "sig".to_string(),
            receipt: "rcpt".to_string(),
        }
    }

    #[test]
    fn extend_attaches_matching_purchases_only() {
        let mut catalog = Catalog::new();
        catalog.extend_with(
            vec![
                Product::inapp(sku("remove_ads"), "$1"),
                Product::inapp(sku("coins"), "$2"),
            ],
            &[record(&["remove_ads"], "A")],
        );

        assert!(catalog.get("remove_ads").unwrap().is_owned());
        assert!(!catalog.get("coins").unwrap().is_owned());
        assert!(catalog.get("gold").is_none());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn extend_replaces_stale_purchase_from_payload() {
        let stale = Product::inapp(sku("coins"), "$2").with_purchase(Purchase {
            signature: "old".into(),
            receipt: "old".into(),
            order_id: None,
        });
        let mut catalog = Catalog::new();
        catalog.extend_with(vec![stale], &[]);
        assert!(!catalog.get("coins").unwrap().is_owned());
    }

    #[test]
    fn snapshot_is_keyed_by_sku() {
        let catalog: Catalog = vec![Product::subscription(sku("gold"), ["$5"])]
            .into_iter()
            .collect();

        let value: serde_json::Value =
            serde_json::from_str(&catalog.to_snapshot().unwrap()).unwrap();
        assert_eq!(value["gold"]["type"], "subs");
        assert_eq!(value["gold"]["prices"][0], "$5");
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        assert!(Catalog::from_snapshot("{not json").is_err());
        assert!(Catalog::from_snapshot(r#"{"gold": {"sku": ""}}"#).is_err());
    }

    #[test]
    fn snapshot_keys_must_match_skus() {
        let mismatched = r#"{"a": {"sku": "b", "type": "inapp", "price": "$1"}}"#;
        let err = Catalog::from_snapshot(mismatched).unwrap_err();
        assert!(err.to_string().contains("holds product b"));

        let matching = r#"{"b": {"sku": "b", "type": "inapp", "price": "$1"}}"#;
        let catalog = Catalog::from_snapshot(matching).unwrap();
        assert_eq!(catalog.get("b").unwrap().sku, "b");
    }

    fn arb_product() -> impl Strategy<Value = Product> {
        let sku = "[a-z][a-z0-9_.]{0,15}";
        let purchase = proptest::option::of(
            ("[a-zA-Z0-9+/=]{1,24}", "[ -~]{0,32}", proptest::option::of("GPA\\.[0-9]{4}")).prop_map(
                |(signature, receipt, order_id)| Purchase {
                    signature,
                    receipt,
                    order_id,
                },
            ),
        );
        let kind = prop_oneof![Just(ProductType::Inapp), Just(ProductType::Subs)];
        (sku, kind, proptest::collection::vec("[ -~]{1,8}", 1..4), purchase).prop_map(
            |(s, kind, prices, purchase)| {
                let product = match kind {
                    ProductType::Inapp => Product::inapp(s.parse().unwrap(), prices[0].clone()),
                    ProductType::Subs => Product::subscription(s.parse().unwrap(), prices),
                };
                Product { purchase, ..product }
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: restoring a stored snapshot reproduces the same catalog.
        #[test]
        fn snapshot_restores_equal_catalog(products in proptest::collection::vec(arb_product(), 0..8)) {
            let catalog: Catalog = products.into_iter().collect();
            let restored = Catalog::from_snapshot(&catalog.to_snapshot().unwrap()).unwrap();
            prop_assert_eq!(restored, catalog);
        }
    }
}
