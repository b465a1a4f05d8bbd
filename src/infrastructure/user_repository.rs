/// usersテーブルのリポジトリ抽象
use async_trait::async_trait;

use super::StoreError;
use crate::domain::{NewUser, User};

/// ユーザー永続化用トレイト
///
/// 実際のSupabase(PostgREST)実装と、テスト用インメモリ実装を差し替えられるようにする。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを作成し、ストアが採番した行を返す
    async fn insert(&self, user: &NewUser) -> Result<User, StoreError>;

    /// 課金顧客IDをユーザーに紐付け、更新後の行を返す
    ///
    /// 対象行が存在しない場合は`Err(StoreError::EmptyResult)`
    async fn set_billing_customer_id(
        &self,
        user_id: &str,
        billing_customer_id: &str,
    ) -> Result<User, StoreError>;

    /// IDでユーザーを取得
    ///
    /// # 戻り値
    /// * 見つかった場合は`Ok(Some(User))`
    /// * 見つからなかった場合は`Ok(None)`
    /// * 失敗時は`Err(StoreError)`
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError>;
}
