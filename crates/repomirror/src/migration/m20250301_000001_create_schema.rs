//! Initial migration to create the mirror database schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_repositories(manager).await?;
        self.create_git_users(manager).await?;
        self.create_issues(manager).await?;
        self.create_issue_assignees(manager).await?;
        self.create_commits(manager).await?;
        self.create_commit_issues(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order.
        manager
            .drop_table(Table::drop().table(CommitIssues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Commits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IssueAssignees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Issues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GitUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repositories::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_repositories(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repositories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Repositories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // Identity
                    .col(
                        ColumnDef::new(Repositories::Platform)
                            .string()
                            .not_null()
                            .default("github"),
                    )
                    .col(ColumnDef::new(Repositories::Owner).string().not_null())
                    .col(ColumnDef::new(Repositories::Name).string().not_null())
                    .col(ColumnDef::new(Repositories::FullName).string().not_null())
                    .col(ColumnDef::new(Repositories::ExternalId).string().null())
                    // Metadata
                    .col(ColumnDef::new(Repositories::Description).text().null())
                    .col(ColumnDef::new(Repositories::Language).string().null())
                    .col(
                        ColumnDef::new(Repositories::StarsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repositories::ForksCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repositories::OpenIssuesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repositories::DefaultBranch)
                            .string()
                            .not_null()
                            .default("main"),
                    )
                    .col(
                        ColumnDef::new(Repositories::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Repositories::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Repositories::WebUrl).text().null())
                    .col(ColumnDef::new(Repositories::CloneUrlHttp).text().null())
                    .col(ColumnDef::new(Repositories::CloneUrlSsh).text().null())
                    // Mirror control
                    .col(
                        ColumnDef::new(Repositories::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Repositories::LastSyncIssuesAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Repositories::LastSyncCommitsAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Repositories::LastSyncMetadataAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Repositories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Repositories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_repositories_full_name")
                    .table(Repositories::Table)
                    .col(Repositories::FullName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_repositories_active")
                    .table(Repositories::Table)
                    .col(Repositories::Active)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_git_users(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GitUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GitUsers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GitUsers::ExternalId).string().not_null())
                    .col(ColumnDef::new(GitUsers::Username).string().not_null())
                    .col(ColumnDef::new(GitUsers::AvatarUrl).text().null())
                    .col(ColumnDef::new(GitUsers::WebUrl).text().null())
                    .col(ColumnDef::new(GitUsers::UserType).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_git_users_external_id")
                    .table(GitUsers::Table)
                    .col(GitUsers::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_issues(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Issues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Issues::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Issues::RepositoryId).uuid().not_null())
                    .col(ColumnDef::new(Issues::ExternalId).string().not_null())
                    .col(ColumnDef::new(Issues::Number).integer().not_null())
                    .col(ColumnDef::new(Issues::Title).text().not_null())
                    .col(ColumnDef::new(Issues::Body).text().null())
                    .col(ColumnDef::new(Issues::State).string().not_null())
                    // Platform timestamps
                    .col(
                        ColumnDef::new(Issues::CreatedAtGit)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Issues::UpdatedAtGit)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Issues::ClosedAtGit)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    // People
                    .col(ColumnDef::new(Issues::AuthorId).uuid().null())
                    .col(ColumnDef::new(Issues::ClosedById).uuid().null())
                    // Opaque platform data
                    .col(ColumnDef::new(Issues::Labels).json().null())
                    .col(ColumnDef::new(Issues::Milestone).json().null())
                    .col(
                        ColumnDef::new(Issues::CommentsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Issues::IsPullRequest)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Issues::WebUrl).text().null())
                    .col(
                        ColumnDef::new(Issues::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issues_repository")
                            .from(Issues::Table, Issues::RepositoryId)
                            .to(Repositories::Table, Repositories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issues_author")
                            .from(Issues::Table, Issues::AuthorId)
                            .to(GitUsers::Table, GitUsers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issues_closed_by")
                            .from(Issues::Table, Issues::ClosedById)
                            .to(GitUsers::Table, GitUsers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issues_repository_external_id")
                    .table(Issues::Table)
                    .col(Issues::RepositoryId)
                    .col(Issues::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Linker lookups go by (repository, number).
        manager
            .create_index(
                Index::create()
                    .name("idx_issues_repository_number")
                    .table(Issues::Table)
                    .col(Issues::RepositoryId)
                    .col(Issues::Number)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_issue_assignees(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IssueAssignees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IssueAssignees::IssueId).uuid().not_null())
                    .col(ColumnDef::new(IssueAssignees::GitUserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(IssueAssignees::IssueId)
                            .col(IssueAssignees::GitUserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_assignees_issue")
                            .from(IssueAssignees::Table, IssueAssignees::IssueId)
                            .to(Issues::Table, Issues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_assignees_git_user")
                            .from(IssueAssignees::Table, IssueAssignees::GitUserId)
                            .to(GitUsers::Table, GitUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_commits(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Commits::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Commits::RepositoryId).uuid().not_null())
                    .col(ColumnDef::new(Commits::Sha).string().not_null())
                    .col(ColumnDef::new(Commits::ShortSha).string().not_null())
                    .col(ColumnDef::new(Commits::Message).text().not_null())
                    // Author and committer
                    .col(ColumnDef::new(Commits::AuthorId).uuid().null())
                    .col(ColumnDef::new(Commits::CommitterId).uuid().null())
                    .col(
                        ColumnDef::new(Commits::AuthorDateGit)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commits::CommitterDateGit)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Statistics
                    .col(
                        ColumnDef::new(Commits::Additions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Commits::Deletions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Commits::TotalChanges)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Commits::ParentShas)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    // Verification
                    .col(
                        ColumnDef::new(Commits::VerificationStatus)
                            .string()
                            .not_null()
                            .default("unverified"),
                    )
                    .col(
                        ColumnDef::new(Commits::VerificationReason)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Commits::WebUrl).text().null())
                    .col(
                        ColumnDef::new(Commits::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commits_repository")
                            .from(Commits::Table, Commits::RepositoryId)
                            .to(Repositories::Table, Repositories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commits_author")
                            .from(Commits::Table, Commits::AuthorId)
                            .to(GitUsers::Table, GitUsers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commits_committer")
                            .from(Commits::Table, Commits::CommitterId)
                            .to(GitUsers::Table, GitUsers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_commits_repository_sha")
                    .table(Commits::Table)
                    .col(Commits::RepositoryId)
                    .col(Commits::Sha)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_commit_issues(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommitIssues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CommitIssues::CommitId).uuid().not_null())
                    .col(ColumnDef::new(CommitIssues::IssueId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(CommitIssues::CommitId)
                            .col(CommitIssues::IssueId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commit_issues_commit")
                            .from(CommitIssues::Table, CommitIssues::CommitId)
                            .to(Commits::Table, Commits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commit_issues_issue")
                            .from(CommitIssues::Table, CommitIssues::IssueId)
                            .to(Issues::Table, Issues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
#[sea_orm(iden = "repositories")]
enum Repositories {
    Table,
    Id,
    Platform,
    Owner,
    Name,
    FullName,
    ExternalId,
    Description,
    Language,
    StarsCount,
    ForksCount,
    OpenIssuesCount,
    DefaultBranch,
    IsPrivate,
    IsArchived,
    WebUrl,
    CloneUrlHttp,
    CloneUrlSsh,
    Active,
    LastSyncIssuesAt,
    LastSyncCommitsAt,
    LastSyncMetadataAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "git_users")]
enum GitUsers {
    Table,
    Id,
    ExternalId,
    Username,
    AvatarUrl,
    WebUrl,
    UserType,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "issues")]
enum Issues {
    Table,
    Id,
    RepositoryId,
    ExternalId,
    Number,
    Title,
    Body,
    State,
    CreatedAtGit,
    UpdatedAtGit,
    ClosedAtGit,
    AuthorId,
    ClosedById,
    Labels,
    Milestone,
    CommentsCount,
    IsPullRequest,
    WebUrl,
    SyncedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "issue_assignees")]
enum IssueAssignees {
    Table,
    IssueId,
    GitUserId,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "commits")]
enum Commits {
    Table,
    Id,
    RepositoryId,
    Sha,
    ShortSha,
    Message,
    AuthorId,
    CommitterId,
    AuthorDateGit,
    CommitterDateGit,
    Additions,
    Deletions,
    TotalChanges,
    ParentShas,
    VerificationStatus,
    VerificationReason,
    WebUrl,
    SyncedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "commit_issues")]
enum CommitIssues {
    Table,
    CommitId,
    IssueId,
}
