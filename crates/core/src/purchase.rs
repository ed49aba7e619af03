use serde::{Deserialize, Serialize};

use crate::sku::Sku;

/// Proof of ownership attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub signature: String,
    pub receipt: String,
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Raw purchase record as reported by the native store.
///
/// A single record may cover several products (multi-line purchases), hence
/// `product_ids`. Only `signature`, `receipt` and `order_id` survive into the
/// catalog; the rest is kept for logging and callers that want it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default, rename = "getPurchaseState")]
    pub purchase_state: Option<i32>,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub auto_renewing: bool,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub profile_id: Option<String>,
    pub signature: String,
    pub receipt: String,
}

impl PurchaseRecord {
    pub fn covers(&self, sku: &Sku) -> bool {
        self.product_ids.iter().any(|id| sku == id.as_str())
    }

    pub fn to_purchase(&self) -> Purchase {
        Purchase {
            signature: self.signature.clone(),
            receipt: self.receipt.clone(),
            order_id: self.order_id.clone(),
        }
    }
}

/// Find the purchase owning `sku`: the first record whose product-id list
/// contains it.
pub fn find_purchase(sku: &Sku, records: &[PurchaseRecord]) -> Option<Purchase> {
    records
        .iter()
        .find(|r| r.covers(sku))
        .map(PurchaseRecord::to_purchase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(ids: &[&str], order: &str) -> PurchaseRecord {
        PurchaseRecord {
            product_ids: ids.iter().map(|s| s.to_string()).collect(),
            order_id: Some(order.to_string()),
            purchase_state: Some(1),
            acknowledged: true,
            auto_renewing: false,
            account_id: None,
            profile_id: None,
            signature: format!("sig-{order}"),
            receipt: format!("receipt-{order}"),
        }
    }

    #[test]
    fn first_matching_record_wins() {
        let records = vec![
            record(&["coins"], "A"),
            record(&["remove_ads", "coins"], "B"),
            record(&["remove_ads"], "C"),
        ];
        let sku: Sku = "remove_ads".parse().unwrap();

        let purchase = find_purchase(&sku, &records).unwrap();
        assert_eq!(purchase.order_id.as_deref(), Some("B"));
        assert_eq!(purchase.signature, "sig-B");
    }

    #[test]
    fn no_record_means_no_purchase() {
        let sku: Sku = "gold".parse().unwrap();
        assert!(find_purchase(&sku, &[record(&["silver"], "A")]).is_none());
        assert!(find_purchase(&sku, &[]).is_none());
    }

    #[test]
    fn parses_native_record_ignoring_extra_fields() {
        let rec: PurchaseRecord = serde_json::from_value(json!({
            "productIds": ["gold"],
            "orderId": "GPA.1234",
            "getPurchaseState": 1,
            "developerPayload": "",
            "acknowledged": false,
            "autoRenewing": true,
            "accountId": null,
            "profileId": null,
            "signature": "abc",
            "receipt": "{\"orderId\":\"GPA.1234\"}"
        }))
        .unwrap();

        assert!(rec.auto_renewing);
        assert_eq!(rec.purchase_state, Some(1));
        assert_eq!(rec.to_purchase().order_id.as_deref(), Some("GPA.1234"));
    }
}
