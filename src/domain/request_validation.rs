// リクエストフィールドの正規化
//
// HTTPボディから受け取った文字列フィールドの前後空白を除去し、
// 空文字列は「未指定」として扱う。

use thiserror::Error;

/// 入力検証エラー
///
/// 呼び出し元の入力不備を表す。このエラーが発生した時点では
/// ストアや課金プロバイダーには一切アクセスしていない。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// ユーザー作成の必須フィールド（email, name）が欠落
    #[error("Email and name are required")]
    MissingUserFields,

    /// グループ作成の必須フィールド（admin_user_id, name）が欠落
    #[error("admin_user_id and name are required")]
    MissingGroupFields,

    /// グループ参加の必須フィールド（user_id, group_id）が欠落
    #[error("user_id and group_id are required")]
    MissingMemberFields,

    /// date_of_birthがYYYY-MM-DD形式ではない
    #[error("Invalid date_of_birth. Expected YYYY-MM-DD")]
    InvalidDateOfBirth(String),

    /// 未知のグループステータス
    #[error("Invalid status. Must be one of: active, frozen, deleted")]
    InvalidGroupStatus(String),

    /// 管理者ユーザーのステータスがグループ作成を許可しない
    #[error("Admin user must have active or inactive status")]
    AdminStatusNotAllowed(String),
}

/// 文字列の前後空白を除去し、空であればNoneを返す
///
/// 未指定フィールドを空文字列のまま保存しないために使用する。
pub fn trim_to_option(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// メールアドレスを正規化（前後空白除去 + 小文字化）
///
/// 大文字小文字の違うメールアドレスをストア側の一意制約で
/// 同一値として扱わせるために使用する。
pub fn normalize_email(value: Option<&str>) -> Option<String> {
    trim_to_option(value).map(|v| v.to_lowercase())
}

/// 必須IDフィールドの検証
///
/// 空白のみのIDは未指定として扱う。
pub fn require_id(value: Option<&str>) -> Option<String> {
    trim_to_option(value)
}
