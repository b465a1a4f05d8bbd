// アプリケーション層モジュール
pub mod add_member_handler;
pub mod create_group_handler;
pub mod create_user_handler;
pub mod endpoint;
pub mod http_response;
pub mod request_body;
pub mod saga;
pub mod workflow_error;

// 再エクスポート
pub use add_member_handler::{AddMemberHandler, AddedMember};
pub use create_group_handler::CreateGroupHandler;
pub use create_user_handler::{CreateUserHandler, ProvisioningOutcome};
pub use endpoint::{dispatch, HttpWorkflow};
pub use saga::{Compensation, SagaLog, SagaStep};
pub use workflow_error::WorkflowError;
