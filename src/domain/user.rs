// ユーザーエンティティとユーザー作成リクエスト
//
// 作成直後のユーザーはinactiveで、課金顧客IDは外部プロビジョニング成功後にのみ設定される。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::request_validation::{normalize_email, trim_to_option, ValidationError};

/// ユーザーステータス
///
/// ストア側で定義された未知の値は`Other`として保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserStatus {
    Active,
    Inactive,
    Other(String),
}

impl UserStatus {
    pub fn as_str(&self) -> &str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Other(s) => s,
        }
    }

    /// グループ管理者になれるステータスか判定
    ///
    /// active と inactive のみ許可する（frozen等は不可）。
    pub fn can_administer_group(&self) -> bool {
        matches!(self, UserStatus::Active | UserStatus::Inactive)
    }
}

impl From<String> for UserStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => UserStatus::Active,
            "inactive" => UserStatus::Inactive,
            _ => UserStatus::Other(value),
        }
    }
}

impl From<UserStatus> for String {
    fn from(value: UserStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ストアに保存されたユーザー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// ストアが採番するID
    pub id: String,
    /// 小文字化済みメールアドレス（一意）
    pub email: String,
    pub name: String,
    pub nickname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub status: UserStatus,
    /// 外部課金顧客ID（リンク完了後のみSome）
    pub billing_customer_id: Option<String>,
    /// その他のストア列（created_at等）。レスポンスにそのまま含める
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// ユーザー作成リクエスト（HTTPボディ）
///
/// 必須フィールドも`Option`で受け、欠落はパース失敗ではなく
/// 検証エラーとして扱う。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// 正規化済みの新規ユーザー
///
/// ストアへのinsert内容そのもの。ステータスは常にinactiveで開始する。
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub nickname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub status: UserStatus,
}

impl CreateUserRequest {
    /// リクエストを検証・正規化してNewUserを生成
    ///
    /// # 戻り値
    /// * `Ok(NewUser)` - 正規化済みユーザー
    /// * `Err(ValidationError)` - email/nameの欠落、またはdate_of_birthの形式不正
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        let email = normalize_email(self.email.as_deref());
        let name = trim_to_option(self.name.as_deref());

        let (Some(email), Some(name)) = (email, name) else {
            return Err(ValidationError::MissingUserFields);
        };

        let date_of_birth = match trim_to_option(self.date_of_birth.as_deref()) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| ValidationError::InvalidDateOfBirth(raw))?,
            ),
            None => None,
        };

        Ok(NewUser {
            email,
            name,
            nickname: trim_to_option(self.nickname.as_deref()),
            date_of_birth,
            address: trim_to_option(self.address.as_deref()),
            country: trim_to_option(self.country.as_deref()),
            status: UserStatus::Inactive,
        })
    }
}
