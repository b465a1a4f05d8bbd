// グループエンティティとグループ作成リクエスト

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::request_validation::{require_id, trim_to_option, ValidationError};

/// グループステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    #[default]
    Active,
    Frozen,
    Deleted,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Active => "active",
            GroupStatus::Frozen => "frozen",
            GroupStatus::Deleted => "deleted",
        }
    }
}

impl FromStr for GroupStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GroupStatus::Active),
            "frozen" => Ok(GroupStatus::Frozen),
            "deleted" => Ok(GroupStatus::Deleted),
            other => Err(ValidationError::InvalidGroupStatus(other.to_string())),
        }
    }
}

/// ストアに保存されたグループ
///
/// グループ名の一意性は課さない（同名グループは許容）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub admin_user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: GroupStatus,
    /// その他のストア列（created_at等）。レスポンスにそのまま含める
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// グループ作成リクエスト（HTTPボディ）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub admin_user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// 正規化済みの新規グループ
#[derive(Debug, Clone, PartialEq)]
pub struct NewGroup {
    pub admin_user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: GroupStatus,
}

impl CreateGroupRequest {
    /// リクエストを検証・正規化してNewGroupを生成
    ///
    /// statusは未指定または空白のみならactive。
    pub fn validate(&self) -> Result<NewGroup, ValidationError> {
        let admin_user_id = require_id(self.admin_user_id.as_deref());
        let name = trim_to_option(self.name.as_deref());

        let (Some(admin_user_id), Some(name)) = (admin_user_id, name) else {
            return Err(ValidationError::MissingGroupFields);
        };

        let status = match trim_to_option(self.status.as_deref()) {
            Some(raw) => raw.parse()?,
            None => GroupStatus::default(),
        };

        Ok(NewGroup {
            admin_user_id,
            name,
            description: trim_to_option(self.description.as_deref()),
            status,
        })
    }
}
