//! Commit-to-issue linking from closing keywords in commit messages.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entity::commit_issue::{self, Entity as CommitIssue};
use crate::entity::issue::{self, Entity as Issue};

/// `fix|fixes|fixed|close|closes|closed|resolve|resolves|resolved`, then
/// exactly one whitespace character and `#<number>`. Keywords may end a
/// longer word, so `hotfix #3` links issue 3.
const ISSUE_REF_PATTERN: &str =
    r"(?i)(?:fix(?:es|ed)?|close(?:s|d)?|resolve(?:s|d)?)\s#(\d+)";

fn issue_ref_regex() -> &'static Regex {
    static ISSUE_REF_REGEX: OnceLock<Regex> = OnceLock::new();
    ISSUE_REF_REGEX
        .get_or_init(|| Regex::new(ISSUE_REF_PATTERN).expect("issue reference pattern is valid"))
}

/// Issue numbers referenced by closing keywords, ascending and unique.
pub fn issue_refs(message: &str) -> Vec<i32> {
    issue_ref_regex()
        .captures_iter(message)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<i32>().ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Replace the commit's linked issues with the ones its message references.
///
/// Only issues of the same repository are considered and unknown numbers are
/// dropped. Returns the number of links written.
pub async fn link_commit_issues<C: ConnectionTrait>(
    db: &C,
    repository_id: Uuid,
    commit_id: Uuid,
    message: &str,
) -> Result<usize, DbErr> {
    CommitIssue::delete_many()
        .filter(commit_issue::Column::CommitId.eq(commit_id))
        .exec(db)
        .await?;

    let numbers = issue_refs(message);
    if numbers.is_empty() {
        return Ok(0);
    }

    let issue_ids: BTreeSet<Uuid> = Issue::find()
        .filter(issue::Column::RepositoryId.eq(repository_id))
        .filter(issue::Column::Number.is_in(numbers))
        .all(db)
        .await?
        .into_iter()
        .map(|issue| issue.id)
        .collect();

    if issue_ids.is_empty() {
        return Ok(0);
    }

    let links = issue_ids.len();
    CommitIssue::insert_many(issue_ids.into_iter().map(|issue_id| commit_issue::ActiveModel {
        commit_id: sea_orm::Set(commit_id),
        issue_id: sea_orm::Set(issue_id),
    }))
    .exec_without_returning(db)
    .await?;

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_keyword_form() {
        let message = "fix #1, fixes #2, fixed #3\nclose #4 closes #5 closed #6\n\
                       resolve #7; resolves #8 and resolved #9";
        assert_eq!(issue_refs(message), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(issue_refs("Fixes #12"), vec![12]);
        assert_eq!(issue_refs("CLOSED #4"), vec![4]);
    }

    #[test]
    fn repeated_references_collapse() {
        assert_eq!(issue_refs("fixes #7 and closes #7"), vec![7]);
    }

    #[test]
    fn bare_references_and_other_words_do_not_link() {
        assert!(issue_refs("see #4").is_empty());
        assert!(issue_refs("fixes#4").is_empty());
        assert!(issue_refs("fixing #4").is_empty());
        assert!(issue_refs("fixes issue #4").is_empty());
    }

    #[test]
    fn keywords_inside_longer_words_still_link() {
        assert_eq!(issue_refs("hotfix #4"), vec![4]);
        assert_eq!(issue_refs("Bugfix #5"), vec![5]);
    }

    #[test]
    fn keyword_and_number_are_separated_by_one_whitespace() {
        assert_eq!(issue_refs("fixes\t#3"), vec![3]);
        assert!(issue_refs("fixes  #6").is_empty());
        assert!(issue_refs("fixes\n\n#7").is_empty());
    }

    #[test]
    fn numbers_out_of_range_are_dropped() {
        assert!(issue_refs("fixes #99999999999999999999").is_empty());
    }
}
