// Stripe接続設定

use crate::infrastructure::config::{optional_env, required_env, ConfigError};

/// Stripe APIのデフォルトベースURL
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// 固定するStripe APIバージョン
pub const API_VERSION: &str = "2023-10-16";

/// Stripe接続設定
///
/// # フィールド
/// - `secret_key`: Stripeシークレットキー（Authorizationヘッダーに使用）
/// - `api_base`: APIベースURL（テスト時にモックサーバーへ向ける）
#[derive(Clone)]
pub struct StripeConfig {
    secret_key: String,
    api_base: String,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base: api_base.into(),
        }
    }

    /// 環境変数から設定を読み込み
    ///
    /// # 環境変数
    /// - `STRIPE_SECRET_KEY`: シークレットキー（必須）
    /// - `STRIPE_API_BASE`: APIベースURL（任意、デフォルト: https://api.stripe.com）
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = required_env("STRIPE_SECRET_KEY")?;
        let api_base = optional_env("STRIPE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Ok(Self::new(secret_key, api_base))
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// 顧客作成エンドポイントURLを構築
    pub fn customers_url(&self) -> String {
        format!("{}/v1/customers", self.api_base.trim_end_matches('/'))
    }
}
