// Domain layer modules
pub mod group;
pub mod group_member;
pub mod request_validation;
pub mod user;

// Re-exports
pub use group::{CreateGroupRequest, Group, GroupStatus, NewGroup};
pub use group_member::{AddMemberRequest, GroupMember, MembershipTarget};
pub use request_validation::ValidationError;
pub use user::{CreateUserRequest, NewUser, User, UserStatus};
