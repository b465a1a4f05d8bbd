// グループ参加ワークフロー
//
// ユーザーとグループの存在、既存メンバーシップを確認してから
// メンバーシップを1行作成する。失敗時に取り消す処理はない。

use async_trait::async_trait;
use lambda_http::http::StatusCode;
use lambda_http::{Body, Request, Response};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::endpoint::HttpWorkflow;
use super::http_response::{error_response, json_response};
use super::request_body::parse_json_body;
use super::saga::{AddMemberStep, SagaLog};
use super::WorkflowError;
use crate::domain::{AddMemberRequest, GroupMember};
use crate::infrastructure::{GroupRepository, MemberRepository, StoreError, UserRepository};

const WORKFLOW: &str = "add_user_to_group";

/// 追加されたメンバーシップ
#[derive(Debug, Clone, PartialEq)]
pub struct AddedMember {
    pub membership: GroupMember,
    /// レスポンスメッセージ用のグループ名
    pub group_name: String,
}

/// グループ参加ハンドラー
pub struct AddMemberHandler<U, G, M> {
    users: U,
    groups: G,
    members: M,
}

impl<U, G, M> AddMemberHandler<U, G, M>
where
    U: UserRepository,
    G: GroupRepository,
    M: MemberRepository,
{
    pub fn new(users: U, groups: G, members: M) -> Self {
        Self {
            users,
            groups,
            members,
        }
    }

    /// ユーザーをグループに追加する
    ///
    /// # 戻り値
    /// * `Ok(AddedMember)` - 作成したメンバーシップ
    /// * `Err(WorkflowError::NotFound)` - ユーザーまたはグループが存在しない
    /// * `Err(WorkflowError::Conflict)` - 既にメンバー
    #[instrument(skip_all, fields(workflow = WORKFLOW))]
    pub async fn add(&self, request: &AddMemberRequest) -> Result<AddedMember, WorkflowError> {
        let target = request.validate()?;

        self.users
            .find_by_id(&target.user_id)
            .await
            .map_err(WorkflowError::store("Failed to look up user"))?
            .ok_or(WorkflowError::NotFound { entity: "User" })?;

        let group = self
            .groups
            .find_by_id(&target.group_id)
            .await
            .map_err(WorkflowError::store("Failed to look up group"))?
            .ok_or(WorkflowError::NotFound { entity: "Group" })?;

        if let Some(existing) = self
            .members
            .find(&target.group_id, &target.user_id)
            .await
            .map_err(WorkflowError::store("Failed to check existing membership"))?
        {
            info!(
                group_id = %target.group_id,
                user_id = %target.user_id,
                "既にメンバー"
            );
            return Err(WorkflowError::Conflict { existing });
        }

        let mut saga = SagaLog::new(WORKFLOW);
        match self.members.insert(&target.group_id, &target.user_id).await {
            Ok(membership) => {
                saga.complete(AddMemberStep::InsertMember);
                info!(
                    group_id = %membership.group_id,
                    user_id = %membership.user_id,
                    "グループにユーザーを追加"
                );
                Ok(AddedMember {
                    membership,
                    group_name: group.name,
                })
            }
            Err(e) => {
                saga.fail(AddMemberStep::InsertMember, &e);
                Err(self.insert_failure(&target.group_id, &target.user_id, e).await)
            }
        }
    }

    /// メンバーシップ作成失敗をエラーに変換する
    ///
    /// 事前確認と作成の間に同じ組が作られた場合（一意制約違反）は、
    /// 作成済みの行を取得して409にする。
    async fn insert_failure(&self, group_id: &str, user_id: &str, error: StoreError) -> WorkflowError {
        if error.is_unique_violation() {
            match self.members.find(group_id, user_id).await {
                Ok(Some(existing)) => return WorkflowError::Conflict { existing },
                Ok(None) => {}
                Err(lookup_error) => {
                    warn!(error = %lookup_error, "競合したメンバーシップの取得に失敗");
                }
            }
        }
        WorkflowError::store("Failed to add user to group")(error)
    }
}

#[async_trait]
impl<U, G, M> HttpWorkflow for AddMemberHandler<U, G, M>
where
    U: UserRepository,
    G: GroupRepository,
    M: MemberRepository,
{
    async fn handle(&self, request: &Request) -> Response<Body> {
        let result = match parse_json_body::<AddMemberRequest>(request.body()) {
            Ok(body) => self.add(&body).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(added) => json_response(
                StatusCode::CREATED,
                &json!({
                    "success": true,
                    "membership": added.membership,
                    "message": format!("User added to group \"{}\"", added.group_name),
                }),
            ),
            Err(e) => error_response(&e),
        }
    }
}
