// グループ作成ワークフロー
//
// 1. グループを作成
// 2. 管理者をメンバーとして登録
//
// 2の失敗時は1で作成したグループを削除する（補償）。

use async_trait::async_trait;
use lambda_http::http::StatusCode;
use lambda_http::{Body, Request, Response};
use serde_json::json;
use tracing::{error, info, instrument};

use super::endpoint::HttpWorkflow;
use super::http_response::{error_response, json_response};
use super::request_body::parse_json_body;
use super::saga::{Compensation, GroupCreationStep, SagaLog};
use super::WorkflowError;
use crate::domain::{CreateGroupRequest, Group, ValidationError};
use crate::infrastructure::{GroupRepository, MemberRepository, UserRepository};

const WORKFLOW: &str = "create_group";

/// グループ作成ハンドラー
pub struct CreateGroupHandler<U, G, M> {
    users: U,
    groups: G,
    members: M,
}

impl<U, G, M> CreateGroupHandler<U, G, M>
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

    /// グループを作成し、管理者をメンバーに登録する
    ///
    /// 同名のグループが既に存在しても作成する。
    #[instrument(skip_all, fields(workflow = WORKFLOW))]
    pub async fn create(&self, request: &CreateGroupRequest) -> Result<Group, WorkflowError> {
        let new_group = request.validate()?;

        let admin = self
            .users
            .find_by_id(&new_group.admin_user_id)
            .await
            .map_err(WorkflowError::store("Failed to look up admin user"))?
            .ok_or(WorkflowError::NotFound {
                entity: "Admin user",
            })?;

        if !admin.status.can_administer_group() {
            return Err(ValidationError::AdminStatusNotAllowed(admin.status.to_string()).into());
        }

        let mut saga = SagaLog::new(WORKFLOW);

        let group = match self.groups.insert(&new_group).await {
            Ok(group) => group,
            Err(e) => {
                saga.fail(GroupCreationStep::InsertGroup, &e);
                return Err(WorkflowError::store("Failed to create group")(e));
            }
        };
        saga.complete(GroupCreationStep::InsertGroup);

        match self.members.insert(&group.id, &admin.id).await {
            Ok(_) => {
                saga.complete(GroupCreationStep::AddAdminMember);
                info!(group_id = %group.id, admin_user_id = %admin.id, "グループ作成完了");
                Ok(group)
            }
            Err(e) => {
                let compensations = saga.fail(GroupCreationStep::AddAdminMember, &e);
                let compensated = self.compensate(&group, &compensations).await;
                Err(WorkflowError::CompensatedFailure {
                    group_id: group.id,
                    compensated,
                    source: e,
                })
            }
        }
    }

    /// 補償を新しい順に実行し、すべて成功したかを返す
    async fn compensate(&self, group: &Group, compensations: &[Compensation]) -> bool {
        let mut compensated = true;

        for compensation in compensations {
            match compensation {
                Compensation::DeleteGroup => match self.groups.delete(&group.id).await {
                    Ok(()) => info!(group_id = %group.id, "補償: グループを削除"),
                    Err(e) => {
                        error!(group_id = %group.id, error = %e, "補償: グループの削除に失敗");
                        compensated = false;
                    }
                },
                Compensation::None => {}
            }
        }

        compensated
    }
}

#[async_trait]
impl<U, G, M> HttpWorkflow for CreateGroupHandler<U, G, M>
where
    U: UserRepository,
    G: GroupRepository,
    M: MemberRepository,
{
    async fn handle(&self, request: &Request) -> Response<Body> {
        let result = match parse_json_body::<CreateGroupRequest>(request.body()) {
            Ok(body) => self.create(&body).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(group) => json_response(
                StatusCode::CREATED,
                &json!({ "success": true, "group": group }),
            ),
            Err(e) => error_response(&e),
        }
    }
}
