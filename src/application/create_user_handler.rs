// ユーザー作成ワークフロー
//
// 1. ユーザーをinactiveで作成
// 2. 課金プロバイダーに顧客を作成
// 3. ユーザーに課金顧客IDをリンク
//
// どのステップの失敗でも、作成済みのユーザー・課金顧客は削除しない。

use async_trait::async_trait;
use lambda_http::http::StatusCode;
use lambda_http::{Body, Request, Response};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::endpoint::HttpWorkflow;
use super::http_response::{error_response, json_response};
use super::request_body::parse_json_body;
use super::saga::{ProvisioningStep, SagaLog};
use super::WorkflowError;
use crate::domain::{CreateUserRequest, NewUser, User};
use crate::infrastructure::{
    BillingAddress, BillingProvider, NewBillingCustomer, StoreError, UserRepository,
};

const WORKFLOW: &str = "create_user";

/// ユーザー作成の結果
#[derive(Debug)]
pub enum ProvisioningOutcome {
    /// 全ステップ成功
    Created {
        user: User,
        billing_customer_id: String,
    },
    /// ユーザーと課金顧客は存在するがリンクに失敗
    PartiallyLinked {
        user: User,
        billing_customer_id: String,
        error: StoreError,
    },
}

impl ProvisioningOutcome {
    pub fn into_response(self) -> Response<Body> {
        match self {
            ProvisioningOutcome::Created {
                user,
                billing_customer_id,
            } => json_response(
                StatusCode::CREATED,
                &json!({
                    "success": true,
                    "user": user,
                    "billing_customer_id": billing_customer_id,
                }),
            ),
            ProvisioningOutcome::PartiallyLinked {
                user,
                billing_customer_id,
                error,
            } => json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({
                    "error": "User created but failed to link billing customer",
                    "user": user,
                    "billing_customer_id": billing_customer_id,
                    "details": error.details(),
                }),
            ),
        }
    }
}

/// ユーザー作成ハンドラー
pub struct CreateUserHandler<U, B> {
    users: U,
    billing: B,
}

impl<U: UserRepository, B: BillingProvider> CreateUserHandler<U, B> {
    pub fn new(users: U, billing: B) -> Self {
        Self { users, billing }
    }

    /// ユーザーを作成し、課金顧客を作成・リンクする
    ///
    /// # 戻り値
    /// * `Ok(Created)` - 全ステップ成功
    /// * `Ok(PartiallyLinked)` - リンクのみ失敗（ユーザーと課金顧客は残る）
    /// * `Err(WorkflowError)` - 検証、ユーザー作成、課金顧客作成のいずれかに失敗
    #[instrument(skip_all, fields(workflow = WORKFLOW))]
    pub async fn provision(
        &self,
        request: &CreateUserRequest,
    ) -> Result<ProvisioningOutcome, WorkflowError> {
        let new_user = request.validate()?;
        let mut saga = SagaLog::new(WORKFLOW);

        let user = match self.users.insert(&new_user).await {
            Ok(user) => user,
            Err(e) => {
                saga.fail(ProvisioningStep::InsertUser, &e);
                return Err(WorkflowError::store("Failed to create user")(e));
            }
        };
        saga.complete(ProvisioningStep::InsertUser);
        info!(user_id = %user.id, "ユーザーを作成");

        let customer = billing_customer(&new_user, &user.id);
        let billing_customer_id = match self.billing.create_customer(&customer).await {
            Ok(id) => id,
            Err(e) => {
                saga.fail(ProvisioningStep::CreateBillingCustomer, &e);
                warn!(user_id = %user.id, "課金顧客のないユーザーが残る");
                return Err(WorkflowError::ExternalService {
                    user_id: user.id,
                    source: e,
                });
            }
        };
        saga.complete(ProvisioningStep::CreateBillingCustomer);

        match self
            .users
            .set_billing_customer_id(&user.id, &billing_customer_id)
            .await
        {
            Ok(linked) => {
                saga.complete(ProvisioningStep::LinkBillingCustomer);
                info!(
                    user_id = %linked.id,
                    billing_customer_id = %billing_customer_id,
                    "ユーザー作成完了"
                );
                Ok(ProvisioningOutcome::Created {
                    user: linked,
                    billing_customer_id,
                })
            }
            Err(e) => {
                saga.fail(ProvisioningStep::LinkBillingCustomer, &e);
                warn!(
                    user_id = %user.id,
                    billing_customer_id = %billing_customer_id,
                    "ユーザーと課金顧客が未リンクのまま残る"
                );
                Ok(ProvisioningOutcome::PartiallyLinked {
                    user,
                    billing_customer_id,
                    error: e,
                })
            }
        }
    }
}

/// 課金顧客の作成パラメータを組み立てる
///
/// 住所が指定された場合のみ住所を送る。国は住所に付随する。
fn billing_customer(new_user: &NewUser, user_id: &str) -> NewBillingCustomer {
    NewBillingCustomer {
        email: new_user.email.clone(),
        name: new_user.name.clone(),
        user_id: user_id.to_string(),
        address: new_user.address.as_ref().map(|line1| BillingAddress {
            line1: line1.clone(),
            country: new_user.country.clone(),
        }),
    }
}

#[async_trait]
impl<U: UserRepository, B: BillingProvider> HttpWorkflow for CreateUserHandler<U, B> {
    async fn handle(&self, request: &Request) -> Response<Body> {
        let result = match parse_json_body::<CreateUserRequest>(request.body()) {
            Ok(body) => self.provision(&body).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => outcome.into_response(),
            Err(e) => error_response(&e),
        }
    }
}
