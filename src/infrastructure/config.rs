/// 環境変数からの設定読み込み
///
/// 設定はコールドスタート時に一度だけ構築し、各ワークフローのコンストラクタに渡す。
use thiserror::Error;

/// 設定読み込みのエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が設定されていない（空文字列も未設定扱い）
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// 環境変数の値が不正
    #[error("Invalid environment variable {name}: {reason}")]
    InvalidEnvVar { name: String, reason: String },

    /// HTTPクライアントの構築に失敗
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// 必須の環境変数を読み込む
pub(crate) fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// 任意の環境変数を読み込む
pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
