//! SeaORM entity definitions for the mirror database schema.

pub mod commit;
pub mod commit_issue;
pub mod git_user;
pub mod issue;
pub mod issue_assignee;
pub mod issue_state;
pub mod platform_type;
pub mod prelude;
pub mod repository;
