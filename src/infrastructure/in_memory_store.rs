// テスト用インメモリストア
//
// users / groups / group_members の3テーブルを1つの状態で保持し、
// 3つのリポジトリトレイトをすべて実装する。操作ログと操作単位の
// エラー注入で、ワークフローの副作用と失敗パスを検証できる。

use async_trait::async_trait;
use serde_json::Map;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{GroupRepository, MemberRepository, StoreError, UserRepository};
use crate::domain::{Group, GroupMember, NewGroup, NewUser, User};

/// ストア操作の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    InsertUser,
    UpdateUser,
    FindUser,
    InsertGroup,
    FindGroup,
    DeleteGroup,
    InsertMember,
    FindMember,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    groups: Vec<Group>,
    members: Vec<GroupMember>,
    next_id: u64,
    operations: Vec<StoreOperation>,
    failures: HashMap<StoreOperation, StoreError>,
    misses: HashMap<StoreOperation, usize>,
}

impl State {
    /// 操作を記録し、注入されたエラーがあれば取り出す
    fn begin(&mut self, operation: StoreOperation) -> Result<(), StoreError> {
        self.operations.push(operation);
        match self.failures.remove(&operation) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// 読み取り結果を1回だけ「該当なし」にする予約があれば消費する
    fn take_miss(&mut self, operation: StoreOperation) -> bool {
        match self.misses.get_mut(&operation) {
            Some(count) if *count > 0 => {
                *count -= 1;
                self.operations.push(operation);
                true
            }
            _ => false,
        }
    }

    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した操作の次回実行時にエラーを返させる
    pub fn fail_next(&self, operation: StoreOperation, error: StoreError) {
        self.state.lock().unwrap().failures.insert(operation, error);
    }

    /// 指定した読み取り操作の次回実行時に、行があっても`None`を返させる
    ///
    /// 注入済みのエラーは消費しないため、続く同じ操作に残る。
    pub fn miss_next(&self, operation: StoreOperation) {
        *self
            .state
            .lock()
            .unwrap()
            .misses
            .entry(operation)
            .or_default() += 1;
    }

    /// 実行された操作の履歴
    pub fn operations(&self) -> Vec<StoreOperation> {
        self.state.lock().unwrap().operations.clone()
    }

    /// 書き込み系操作の回数
    pub fn write_count(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| {
                matches!(
                    op,
                    StoreOperation::InsertUser
                        | StoreOperation::UpdateUser
                        | StoreOperation::InsertGroup
                        | StoreOperation::DeleteGroup
                        | StoreOperation::InsertMember
                )
            })
            .count()
    }

    /// ユーザーを直接追加（テストの前提データ用）
    pub fn seed_user(&self, email: &str, status: crate::domain::UserStatus) -> User {
        let mut state = self.state.lock().unwrap();
        let user = User {
            id: state.allocate_id("user"),
            email: email.to_string(),
            name: email.to_string(),
            nickname: None,
            date_of_birth: None,
            address: None,
            country: None,
            status,
            billing_customer_id: None,
            extra: Map::new(),
        };
        state.users.push(user.clone());
        user
    }

    /// グループを直接追加（テストの前提データ用）
    pub fn seed_group(&self, admin_user_id: &str, name: &str) -> Group {
        let mut state = self.state.lock().unwrap();
        let group = Group {
            id: state.allocate_id("group"),
            admin_user_id: admin_user_id.to_string(),
            name: name.to_string(),
            description: None,
            status: crate::domain::GroupStatus::Active,
            extra: Map::new(),
        };
        state.groups.push(group.clone());
        group
    }

    pub fn users(&self) -> Vec<User> {
        self.state.lock().unwrap().users.clone()
    }

    pub fn groups(&self) -> Vec<Group> {
        self.state.lock().unwrap().groups.clone()
    }

    pub fn members(&self) -> Vec<GroupMember> {
        self.state.lock().unwrap().members.clone()
    }

    /// (group_id, user_id) のメンバーシップ行数
    pub fn membership_count(&self, group_id: &str, user_id: &str) -> usize {
        self.members()
            .iter()
            .filter(|m| m.group_id == group_id && m.user_id == user_id)
            .count()
    }
}

/// 一意制約違反（23505）のエラー
pub fn unique_violation(message: &str) -> StoreError {
    StoreError::Rejected {
        status: 409,
        code: Some("23505".to_string()),
        message: message.to_string(),
        details: None,
        hint: None,
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.begin(StoreOperation::InsertUser)?;

        if state.users.iter().any(|u| u.email == user.email) {
            return Err(unique_violation(
                "duplicate key value violates unique constraint \"users_email_key\"",
            ));
        }

        let created = User {
            id: state.allocate_id("user"),
            email: user.email.clone(),
            name: user.name.clone(),
            nickname: user.nickname.clone(),
            date_of_birth: user.date_of_birth,
            address: user.address.clone(),
            country: user.country.clone(),
            status: user.status.clone(),
            billing_customer_id: None,
            extra: Map::new(),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn set_billing_customer_id(
        &self,
        user_id: &str,
        billing_customer_id: &str,
    ) -> Result<User, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.begin(StoreOperation::UpdateUser)?;

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::EmptyResult)?;
        user.billing_customer_id = Some(billing_customer_id.to_string());
        Ok(user.clone())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.begin(StoreOperation::FindUser)?;
        Ok(state.users.iter().find(|u| u.id == user_id).cloned())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn insert(&self, group: &NewGroup) -> Result<Group, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.begin(StoreOperation::InsertGroup)?;

        let created = Group {
            id: state.allocate_id("group"),
            admin_user_id: group.admin_user_id.clone(),
            name: group.name.clone(),
            description: group.description.clone(),
            status: group.status,
            extra: Map::new(),
        };
        state.groups.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.begin(StoreOperation::FindGroup)?;
        Ok(state.groups.iter().find(|g| g.id == group_id).cloned())
    }

    async fn delete(&self, group_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.begin(StoreOperation::DeleteGroup)?;
        state.groups.retain(|g| g.id != group_id);
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn insert(&self, group_id: &str, user_id: &str) -> Result<GroupMember, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.begin(StoreOperation::InsertMember)?;

        if state
            .members
            .iter()
            .any(|m| m.group_id == group_id && m.user_id == user_id)
        {
            return Err(unique_violation(
                "duplicate key value violates unique constraint \"group_members_pkey\"",
            ));
        }

        let member = GroupMember {
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Some("2024-01-01T00:00:00+00:00".to_string()),
            extra: Map::new(),
        };
        state.members.push(member.clone());
        Ok(member)
    }

    async fn find(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<Option<GroupMember>, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.take_miss(StoreOperation::FindMember) {
            return Ok(None);
        }
        state.begin(StoreOperation::FindMember)?;
        Ok(state
            .members
            .iter()
            .find(|m| m.group_id == group_id && m.user_id == user_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupStatus, UserStatus};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Jo".to_string(),
            nickname: None,
            date_of_birth: None,
            address: None,
            country: None,
            status: UserStatus::Inactive,
        }
    }

    #[tokio::test]
    async fn test_insert_user_rejects_duplicate_email() {
        let store = InMemoryStore::new();
        UserRepository::insert(&store, &new_user("a@b.com")).await.unwrap();

        let err = UserRepository::insert(&store, &new_user("a@b.com"))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation());
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed_once() {
        let store = InMemoryStore::new();
        store.fail_next(
            StoreOperation::InsertGroup,
            StoreError::ConnectionError("down".to_string()),
        );
        let group = NewGroup {
            admin_user_id: "user-1".to_string(),
            name: "x".to_string(),
            description: None,
            status: GroupStatus::Active,
        };

        assert!(GroupRepository::insert(&store, &group).await.is_err());
        assert!(GroupRepository::insert(&store, &group).await.is_ok());
        assert_eq!(
            store.operations(),
            vec![StoreOperation::InsertGroup, StoreOperation::InsertGroup]
        );
    }

    #[tokio::test]
    async fn test_miss_next_hides_row_once_and_keeps_failure() {
        let store = InMemoryStore::new();
        MemberRepository::insert(&store, "group-1", "user-1").await.unwrap();
        store.miss_next(StoreOperation::FindMember);
        store.fail_next(
            StoreOperation::FindMember,
            StoreError::ConnectionError("down".to_string()),
        );

        assert_eq!(store.find("group-1", "user-1").await, Ok(None));
        assert!(store.find("group-1", "user-1").await.is_err());
        assert!(store.find("group-1", "user-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_set_billing_customer_id_missing_user() {
        let store = InMemoryStore::new();
        assert_eq!(
            store.set_billing_customer_id("nope", "cus_1").await,
            Err(StoreError::EmptyResult)
        );
    }
}
