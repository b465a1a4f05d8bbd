// ワークフロー境界のエラー分類
//
// すべての失敗はここでHTTPステータスとJSONボディに変換される。
// 内部での再試行は行わない。

use lambda_http::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::{GroupMember, ValidationError};
use crate::infrastructure::{BillingError, ConfigError, StoreError};

/// ワークフローのエラー型
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// 入力検証エラー（コラボレーターには未アクセス）
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// リクエストボディがJSONとして解釈できない
    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    /// 参照先エンティティが存在しない
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// 既にグループのメンバー
    #[error("User is already a member of this group")]
    Conflict { existing: GroupMember },

    /// リレーショナルストアのエラー
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// 課金プロバイダーのエラー（作成済みユーザーは残る）
    #[error("Failed to create billing customer for user {user_id}: {source}")]
    ExternalService {
        user_id: String,
        #[source]
        source: BillingError,
    },

    /// 後続ステップ失敗により補償を実行した
    #[error("Group created but failed to add admin as member: {source}")]
    CompensatedFailure {
        group_id: String,
        /// 補償（グループ削除）が成功したか
        compensated: bool,
        #[source]
        source: StoreError,
    },

    /// 必須設定の欠落（コラボレーターには未アクセス）
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl WorkflowError {
    /// ストアエラーに文脈を付けて変換するクロージャを返す
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> WorkflowError {
        move |source| WorkflowError::Store { context, source }
    }

    /// HTTPステータスコード
    pub fn status_code(&self) -> StatusCode {
        match self {
            WorkflowError::Validation(_) | WorkflowError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            WorkflowError::NotFound { .. } => StatusCode::NOT_FOUND,
            WorkflowError::Conflict { .. } => StatusCode::CONFLICT,
            WorkflowError::Store { .. }
            | WorkflowError::ExternalService { .. }
            | WorkflowError::CompensatedFailure { .. }
            | WorkflowError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// レスポンスボディ
    pub fn to_body(&self) -> Value {
        match self {
            WorkflowError::Validation(ValidationError::AdminStatusNotAllowed(status)) => json!({
                "error": self.to_string(),
                "user_status": status,
            }),
            WorkflowError::Validation(err) => json!({ "error": err.to_string() }),
            WorkflowError::InvalidBody(details) => json!({
                "error": "Invalid JSON body",
                "details": details,
            }),
            WorkflowError::NotFound { .. } => json!({ "error": self.to_string() }),
            WorkflowError::Conflict { existing } => json!({
                "error": self.to_string(),
                "member": existing,
            }),
            WorkflowError::Store { context, source } => json!({
                "error": context,
                "details": source.details(),
            }),
            WorkflowError::ExternalService { user_id, source } => json!({
                "error": "Failed to create billing customer",
                "details": source.details(),
                "user_id": user_id,
            }),
            WorkflowError::CompensatedFailure {
                group_id,
                compensated,
                source,
            } => json!({
                "error": "Group created but failed to add admin as member",
                "details": source.details(),
                "group_id": group_id,
                "compensated": compensated,
            }),
            WorkflowError::Configuration(err) => json!({
                "error": "Internal server error",
                "details": err.to_string(),
            }),
        }
    }
}
