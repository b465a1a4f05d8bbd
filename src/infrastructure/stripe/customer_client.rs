// StripeBillingClient - Stripe顧客作成クライアント
//
// POST /v1/customers をフォームエンコードで呼び出す。
// 再試行は行わない。

use super::config::{StripeConfig, API_VERSION};
use crate::infrastructure::config::ConfigError;
use crate::infrastructure::{BillingError, BillingProvider, NewBillingCustomer};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, instrument};

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 顧客作成レスポンス（必要なフィールドのみ）
#[derive(Debug, Deserialize)]
struct CustomerResponse {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct StripeErrorEnvelope {
    error: Option<StripeErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: Option<String>,
}

/// Stripe課金クライアント
#[derive(Clone)]
pub struct StripeBillingClient {
    client: Client,
    config: StripeConfig,
}

impl std::fmt::Debug for StripeBillingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeBillingClient")
            .field("api_base", &self.config.api_base())
            .finish_non_exhaustive()
    }
}

impl StripeBillingClient {
    pub fn new(config: StripeConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 顧客作成パラメータをStripeのフォーム形式に変換
    ///
    /// ネストしたフィールドは `metadata[user_id]` のようなブラケット記法になる。
    fn form_params(customer: &NewBillingCustomer) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("email", customer.email.clone()),
            ("name", customer.name.clone()),
            ("metadata[user_id]", customer.user_id.clone()),
        ];

        if let Some(address) = &customer.address {
            params.push(("address[line1]", address.line1.clone()));
            if let Some(country) = &address.country {
                params.push(("address[country]", country.clone()));
            }
        }

        params
    }
}

#[async_trait]
impl BillingProvider for StripeBillingClient {
    #[instrument(skip_all, fields(user_id = %customer.user_id))]
    async fn create_customer(&self, customer: &NewBillingCustomer) -> Result<String, BillingError> {
        let response = self
            .client
            .post(self.config.customers_url())
            .bearer_auth(self.config.secret_key())
            .header("Stripe-Version", API_VERSION)
            .form(&Self::form_params(customer))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Stripe顧客作成リクエスト失敗");
                BillingError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Stripe APIエラー");

            let envelope: StripeErrorEnvelope = serde_json::from_str(&body).unwrap_or_default();
            let (error_type, message) = match envelope.error {
                Some(err) => (err.error_type, err.message.unwrap_or(body)),
                None => (None, body),
            };
            return Err(BillingError::ApiError {
                status: status.as_u16(),
                error_type,
                message,
            });
        }

        let created: CustomerResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Stripeレスポンスのデシリアライズに失敗");
            BillingError::DeserializationError(e.to_string())
        })?;

        info!(customer_id = %created.id, "Stripe顧客を作成");
        Ok(created.id)
    }
}
