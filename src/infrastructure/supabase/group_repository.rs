// SupabaseGroupRepository / SupabaseMemberRepository
//
// groups / group_members テーブルのPostgREST実装

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use super::client::PostgrestClient;
use crate::domain::{Group, GroupMember, NewGroup};
use crate::infrastructure::{GroupRepository, MemberRepository, StoreError};

const GROUPS_TABLE: &str = "groups";
const GROUP_MEMBERS_TABLE: &str = "group_members";

#[derive(Debug, Serialize)]
struct InsertGroupRow<'a> {
    admin_user_id: &'a str,
    name: &'a str,
    description: Option<&'a str>,
    status: &'a str,
}

#[derive(Debug, Serialize)]
struct InsertMemberRow<'a> {
    group_id: &'a str,
    user_id: &'a str,
}

/// groupsテーブルのSupabase実装
#[derive(Debug, Clone)]
pub struct SupabaseGroupRepository {
    client: PostgrestClient,
}

impl SupabaseGroupRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GroupRepository for SupabaseGroupRepository {
    #[instrument(skip_all, fields(admin_user_id = %group.admin_user_id))]
    async fn insert(&self, group: &NewGroup) -> Result<Group, StoreError> {
        let row = InsertGroupRow {
            admin_user_id: &group.admin_user_id,
            name: &group.name,
            description: group.description.as_deref(),
            status: group.status.as_str(),
        };
        self.client.insert(GROUPS_TABLE, &row).await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>, StoreError> {
        self.client
            .select_one(GROUPS_TABLE, &[("id", group_id)])
            .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, group_id: &str) -> Result<(), StoreError> {
        self.client.delete(GROUPS_TABLE, &[("id", group_id)]).await
    }
}

/// group_membersテーブルのSupabase実装
#[derive(Debug, Clone)]
pub struct SupabaseMemberRepository {
    client: PostgrestClient,
}

impl SupabaseMemberRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MemberRepository for SupabaseMemberRepository {
    #[instrument(skip(self))]
    async fn insert(&self, group_id: &str, user_id: &str) -> Result<GroupMember, StoreError> {
        self.client
            .insert(GROUP_MEMBERS_TABLE, &InsertMemberRow { group_id, user_id })
            .await
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<Option<GroupMember>, StoreError> {
        self.client
            .select_one(
                GROUP_MEMBERS_TABLE,
                &[("group_id", group_id), ("user_id", user_id)],
            )
            .await
    }
}
