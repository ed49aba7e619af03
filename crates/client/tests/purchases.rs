use std::sync::{Arc, Mutex};

use billing_bridge::{InMemoryBridge, NativeOp};
use billing_client::{
    BillingClient, InitCallbacks, InitOptions, Product, ProductDescriptor, Purchase,
    PurchaseFailure, PurchaseOutcome,
};
use billing_store::InMemoryStore;
use serde_json::json;

type Client = BillingClient<Arc<InMemoryBridge>, InMemoryStore>;

async fn ready_client(callbacks: InitCallbacks) -> (Client, Arc<InMemoryBridge>) {
    let bridge = Arc::new(InMemoryBridge::new());
    bridge
        .respond(
            NativeOp::GetInappProducts,
            json!([{ "sku": "remove_ads", "type": "inapp", "price": "$1.99" }]),
        )
        .respond(
            NativeOp::GetSubsProducts,
            json!([{ "sku": "gold", "type": "subs", "prices": ["$4.99"] }]),
        );

    let client = BillingClient::new(bridge.clone(), InMemoryStore::new());
    let options = InitOptions::new().products(
        ["remove_ads:inapp", "gold:subs"]
            .into_iter()
            .map(|d| d.parse::<ProductDescriptor>().unwrap()),
    );
    client.init(options, callbacks).await.unwrap();
    (client, bridge)
}

fn recording(log: &Arc<Mutex<Vec<String>>>) -> InitCallbacks {
    let ok = log.clone();
    let ko = log.clone();
    InitCallbacks::new()
        .on_purchase_success(move || ok.lock().unwrap().push("success".into()))
        .on_purchase_fail(move |reason| ko.lock().unwrap().push(reason.to_string()))
}

#[tokio::test]
async fn buy_sends_sku_and_kind_without_waiting() {
    let (client, bridge) = ready_client(InitCallbacks::new()).await;

    assert!(client.buy("remove_ads"));
    assert!(client.buy("gold"));

    let buys = bridge.calls_to(NativeOp::Buy);
    assert_eq!(buys.len(), 2);
    assert!(buys.iter().all(|c| c.dispatched));
    assert_eq!(buys[0].params, vec![json!("remove_ads"), json!(true)]);
    assert_eq!(buys[1].params, vec![json!("gold"), json!(false)]);
}

#[tokio::test]
async fn buy_of_unknown_sku_does_nothing() {
    let (client, bridge) = ready_client(InitCallbacks::new()).await;

    assert!(!client.buy("coins"));
    assert!(bridge.calls_to(NativeOp::Buy).is_empty());
}

#[tokio::test]
async fn buy_before_init_does_nothing() {
    let bridge = Arc::new(InMemoryBridge::new());
    let client = BillingClient::new(bridge.clone(), InMemoryStore::new());

    assert!(!client.buy("remove_ads"));
    assert!(bridge.calls().is_empty());
}

#[tokio::test]
async fn purchase_codes_reach_callbacks() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (_client, bridge) = ready_client(recording(&log)).await;

    for code in [0, 1, 7, 3, 99] {
        assert!(bridge.emit_purchase_event(code));
    }

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "success",
            "USER_CANCELED",
            "ITEM_ALREADY_OWNED",
            "UNABLE_TO_CHARGE",
            "NETWORK",
        ]
    );
}

#[tokio::test]
async fn purchase_events_do_not_touch_the_catalog() {
    let (client, bridge) = ready_client(InitCallbacks::new()).await;

    bridge.emit_purchase_event(0);

    assert!(!client.is_owned("remove_ads"));
}

#[tokio::test]
async fn subscribers_see_outcomes_alongside_callbacks() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (client, bridge) = ready_client(recording(&log)).await;
    let mut subscription = client.subscribe_purchases();

    bridge.emit_purchase_event(7);
    bridge.emit_purchase_event(0);

    assert_eq!(
        subscription.drain(),
        vec![
            PurchaseOutcome::Failed(PurchaseFailure::ItemAlreadyOwned),
            PurchaseOutcome::Success,
        ]
    );
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn handler_is_registered_even_when_init_fails() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let bridge = Arc::new(InMemoryBridge::new());
    bridge.reject(NativeOp::Init, 3);
    let client = BillingClient::new(bridge.clone(), InMemoryStore::new());

    client.init(InitOptions::new(), recording(&log)).await.unwrap();

    assert!(bridge.has_purchase_handler());
    bridge.emit_purchase_event(1);
    assert_eq!(*log.lock().unwrap(), vec!["USER_CANCELED"]);
}

#[tokio::test]
async fn debug_override_grants_ownership_of_its_sku() {
    let (client, _bridge) = ready_client(InitCallbacks::new()).await;
    let purchase = Purchase {
        signature: "debug-sig".into(),
        receipt: "debug-receipt".into(),
        order_id: None,
    };
    client.set_debug_owned_product(Some(
        Product::inapp("X".parse().unwrap(), "$0").with_purchase(purchase.clone()),
    ));

    assert!(client.is_owned("X"));
    assert_eq!(client.purchase("X"), Some(purchase));
    assert_eq!(client.price("X"), None);
    assert!(client.purchase("remove_ads").is_none());
}
