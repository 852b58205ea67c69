//! Common re-exports for convenient entity usage.

pub use super::commit::{
    ActiveModel as CommitActiveModel, Column as CommitColumn, Entity as Commit,
    Model as CommitModel,
};
pub use super::commit_issue::{
    ActiveModel as CommitIssueActiveModel, Column as CommitIssueColumn, Entity as CommitIssue,
    Model as CommitIssueModel,
};
pub use super::git_user::{
    ActiveModel as GitUserActiveModel, Column as GitUserColumn, Entity as GitUser,
    Model as GitUserModel,
};
pub use super::issue::{
    ActiveModel as IssueActiveModel, Column as IssueColumn, Entity as Issue, Model as IssueModel,
};
pub use super::issue_assignee::{
    ActiveModel as IssueAssigneeActiveModel, Column as IssueAssigneeColumn,
    Entity as IssueAssignee, Model as IssueAssigneeModel,
};
pub use super::issue_state::IssueState;
pub use super::platform_type::PlatformType;
pub use super::repository::{
    ActiveModel as RepositoryActiveModel, Column as RepositoryColumn, Entity as Repository,
    Model as RepositoryModel,
};
