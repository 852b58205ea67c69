//! Hosting platform enum for tracked repositories.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Hosting platforms a tracked repository can live on.
///
/// Only GitHub has an API client today; the other values exist so the
/// `repositories.platform` column can describe mirrors registered ahead of
/// their client.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PlatformType {
    #[sea_orm(string_value = "github")]
    #[default]
    GitHub,
    #[sea_orm(string_value = "gitlab")]
    GitLab,
    #[sea_orm(string_value = "bitbucket")]
    Bitbucket,
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformType::GitHub => write!(f, "github"),
            PlatformType::GitLab => write!(f, "gitlab"),
            PlatformType::Bitbucket => write!(f, "bitbucket"),
        }
    }
}

impl std::str::FromStr for PlatformType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github" => Ok(PlatformType::GitHub),
            "gitlab" => Ok(PlatformType::GitLab),
            "bitbucket" => Ok(PlatformType::Bitbucket),
            _ => Err(format!("Unknown platform type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(PlatformType::GitHub.to_string(), "github");
        assert_eq!(PlatformType::GitLab.to_string(), "gitlab");
        assert_eq!(PlatformType::Bitbucket.to_string(), "bitbucket");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "GitHub".parse::<PlatformType>().unwrap(),
            PlatformType::GitHub
        );
        assert_eq!(
            "bitbucket".parse::<PlatformType>().unwrap(),
            PlatformType::Bitbucket
        );
        assert!("sourceforge".parse::<PlatformType>().is_err());
    }

    #[test]
    fn default_is_github() {
        assert_eq!(PlatformType::default(), PlatformType::GitHub);
    }
}
