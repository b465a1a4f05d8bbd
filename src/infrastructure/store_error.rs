/// リレーショナルストア操作のエラー型
///
/// PostgRESTが返すエラーボディ（code, message, details, hint）は
/// 診断用にそのまま保持し、レスポンスの`details`として返却する。
use serde_json::{json, Value};
use thiserror::Error;

/// PostgreSQLの一意制約違反コード
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQLの入力形式エラーコード（uuid列に不正な値を渡した場合など）
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// ストアがリクエストを拒否した（4xx/5xx）
    #[error("Store rejected request: status={status}, message={message}")]
    Rejected {
        /// HTTPステータスコード
        status: u16,
        /// PostgreSQL/PostgRESTのエラーコード
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// ストアへの接続に失敗
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// その他のHTTP通信エラー
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// レスポンスのデシリアライズに失敗
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// 書き込み結果として1行返るはずが0行だった
    #[error("Store returned no rows")]
    EmptyResult,
}

impl StoreError {
    /// 一意制約違反か判定
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::Rejected { code: Some(code), .. } if code == UNIQUE_VIOLATION)
    }

    /// フィルター値が列の型として解釈できなかったか判定
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, StoreError::Rejected { code: Some(code), .. } if code == INVALID_TEXT_REPRESENTATION)
    }

    /// レスポンスに含める診断情報
    pub fn details(&self) -> Value {
        match self {
            StoreError::Rejected {
                status,
                code,
                message,
                details,
                hint,
            } => json!({
                "status": status,
                "code": code,
                "message": message,
                "details": details,
                "hint": hint,
            }),
            other => json!({ "message": other.to_string() }),
        }
    }
}
