// Stripe課金プロバイダーモジュール
//
// - StripeConfig: シークレットキーとAPIベースURL
// - StripeBillingClient: BillingProvider実装（顧客作成）

mod config;
mod customer_client;

pub use config::{StripeConfig, API_VERSION, DEFAULT_API_BASE};
pub use customer_client::StripeBillingClient;
