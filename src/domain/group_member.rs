// グループメンバーシップ
//
// (group_id, user_id) の組は一意。作成後に更新されることはない。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::request_validation::{require_id, ValidationError};

/// group_membersテーブルの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub group_id: String,
    pub user_id: String,
    /// ストアが記録する作成日時（存在する場合のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// その他のストア列（id等）。レスポンスにそのまま含める
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// グループ参加リクエスト（HTTPボディ）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddMemberRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// 検証済みのメンバー追加対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipTarget {
    pub user_id: String,
    pub group_id: String,
}

impl AddMemberRequest {
    pub fn validate(&self) -> Result<MembershipTarget, ValidationError> {
        match (
            require_id(self.user_id.as_deref()),
            require_id(self.group_id.as_deref()),
        ) {
            (Some(user_id), Some(group_id)) => Ok(MembershipTarget { user_id, group_id }),
            _ => Err(ValidationError::MissingMemberFields),
        }
    }
}
