/// 課金プロバイダー（外部顧客管理）の抽象
use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// 課金プロバイダー操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BillingError {
    /// プロバイダーAPIがエラーを返した
    #[error("Billing API error: status={status}, message={message}")]
    ApiError {
        status: u16,
        /// プロバイダーのエラー種別（例: "invalid_request_error"）
        error_type: Option<String>,
        message: String,
    },

    /// ネットワークエラー
    #[error("Network error: {0}")]
    NetworkError(String),

    /// レスポンスのデシリアライズエラー
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl BillingError {
    /// レスポンスに含める診断情報
    pub fn details(&self) -> Value {
        match self {
            BillingError::ApiError {
                status,
                error_type,
                message,
            } => json!({
                "status": status,
                "type": error_type,
                "message": message,
            }),
            other => json!({ "message": other.to_string() }),
        }
    }
}

/// 課金顧客の住所
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingAddress {
    pub line1: String,
    /// 未指定の場合はプロバイダーに送信しない
    pub country: Option<String>,
}

/// 課金顧客の作成パラメータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBillingCustomer {
    pub email: String,
    pub name: String,
    /// 顧客メタデータに記録するローカルユーザーID
    pub user_id: String,
    pub address: Option<BillingAddress>,
}

/// 課金プロバイダー用トレイト
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// 顧客を作成し、プロバイダーが採番した顧客IDを返す
    async fn create_customer(&self, customer: &NewBillingCustomer) -> Result<String, BillingError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // ユニットテスト用のモックBillingProvider
    #[derive(Debug, Clone, Default)]
    pub struct MockBillingProvider {
        /// 作成された顧客（作成順）
        customers: Arc<Mutex<Vec<NewBillingCustomer>>>,
        /// 次の操作で返すエラー（エラーパスのテスト用）
        next_error: Arc<Mutex<Option<BillingError>>>,
    }

    impl MockBillingProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_next_error(&self, error: BillingError) {
            *self.next_error.lock().unwrap() = Some(error);
        }

        pub fn customers(&self) -> Vec<NewBillingCustomer> {
            self.customers.lock().unwrap().clone()
        }

        pub fn customer_count(&self) -> usize {
            self.customers.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl BillingProvider for MockBillingProvider {
        async fn create_customer(
            &self,
            customer: &NewBillingCustomer,
        ) -> Result<String, BillingError> {
            if let Some(error) = self.next_error.lock().unwrap().take() {
                return Err(error);
            }

            let mut customers = self.customers.lock().unwrap();
            customers.push(customer.clone());
            Ok(format!("cus_mock_{}", customers.len()))
        }
    }

    #[test]
    fn test_billing_error_display() {
        let error = BillingError::ApiError {
            status: 402,
            error_type: Some("card_error".to_string()),
            message: "declined".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Billing API error: status=402, message=declined"
        );
        assert_eq!(
            BillingError::NetworkError("timeout".to_string()).to_string(),
            "Network error: timeout"
        );
    }

    #[test]
    fn test_billing_error_details() {
        let error = BillingError::ApiError {
            status: 400,
            error_type: Some("invalid_request_error".to_string()),
            message: "Invalid email".to_string(),
        };
        let details = error.details();
        assert_eq!(details["type"], "invalid_request_error");
        assert_eq!(details["status"], 400);
    }

    #[tokio::test]
    async fn test_mock_billing_provider_assigns_sequential_ids() {
        let provider = MockBillingProvider::new();
        let customer = NewBillingCustomer {
            email: "a@b.com".to_string(),
            name: "Jo".to_string(),
            user_id: "u-1".to_string(),
            address: None,
        };

        assert_eq!(provider.create_customer(&customer).await.unwrap(), "cus_mock_1");
        assert_eq!(provider.create_customer(&customer).await.unwrap(), "cus_mock_2");
        assert_eq!(provider.customer_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_billing_provider_error_is_one_shot() {
        let provider = MockBillingProvider::new();
        provider.set_next_error(BillingError::NetworkError("down".to_string()));
        let customer = NewBillingCustomer {
            email: "a@b.com".to_string(),
            name: "Jo".to_string(),
            user_id: "u-1".to_string(),
            address: None,
        };

        assert!(provider.create_customer(&customer).await.is_err());
        assert!(provider.create_customer(&customer).await.is_ok());
        assert_eq!(provider.customer_count(), 1);
    }
}
