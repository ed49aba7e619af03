use serde::{Deserialize, Serialize};

/// Operations exposed by the native billing plugin, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NativeOp {
    SetPurchaseEventCallback,
    Init,
    Connect,
    GetInappProducts,
    GetSubsProducts,
    GetInappPurchases,
    GetSubsPurchases,
    Buy,
}

impl NativeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeOp::SetPurchaseEventCallback => "setPurchaseEventCallback",
            NativeOp::Init => "init",
            NativeOp::Connect => "connect",
            NativeOp::GetInappProducts => "getInappProducts",
            NativeOp::GetSubsProducts => "getSubsProducts",
            NativeOp::GetInappPurchases => "getInappPurchases",
            NativeOp::GetSubsPurchases => "getSubsPurchases",
            NativeOp::Buy => "buy",
        }
    }

    /// Operations whose success payload is a JSON array.
    pub fn returns_list(&self) -> bool {
        matches!(
            self,
            NativeOp::GetInappProducts
                | NativeOp::GetSubsProducts
                | NativeOp::GetInappPurchases
                | NativeOp::GetSubsPurchases
        )
    }
}

impl core::fmt::Display for NativeOp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
