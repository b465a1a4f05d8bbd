/// groups / group_members テーブルのリポジトリ抽象
use async_trait::async_trait;

use super::StoreError;
use crate::domain::{Group, GroupMember, NewGroup};

/// グループ永続化用トレイト
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// グループを作成し、ストアが採番した行を返す
    async fn insert(&self, group: &NewGroup) -> Result<Group, StoreError>;

    /// IDでグループを取得（存在しなければ`Ok(None)`）
    async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>, StoreError>;

    /// グループを削除
    ///
    /// 補償処理（管理者メンバー登録失敗時）でのみ使用する。
    /// 対象が存在しない場合も`Ok(())`。
    async fn delete(&self, group_id: &str) -> Result<(), StoreError>;
}

/// グループメンバーシップ永続化用トレイト
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// メンバーシップを作成
    ///
    /// (group_id, user_id) の重複はストアの一意制約で拒否される。
    async fn insert(&self, group_id: &str, user_id: &str) -> Result<GroupMember, StoreError>;

    /// (group_id, user_id) の既存メンバーシップを取得
    async fn find(&self, group_id: &str, user_id: &str)
        -> Result<Option<GroupMember>, StoreError>;
}
