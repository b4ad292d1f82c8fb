use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role a user holds inside a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Gabbai,
    Member,
    BoardMember,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Gabbai => "gabbai",
            Role::Member => "member",
            Role::BoardMember => "board_member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role label: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "gabbai" => Ok(Role::Gabbai),
            "member" => Ok(Role::Member),
            "board_member" => Ok(Role::BoardMember),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Parses stored role labels, dropping unknown ones and duplicates.
pub fn parse_roles<S: AsRef<str>>(labels: &[S]) -> Vec<Role> {
    let mut roles = Vec::with_capacity(labels.len());
    for label in labels {
        match label.as_ref().parse::<Role>() {
            Ok(role) if !roles.contains(&role) => roles.push(role),
            Ok(_) => {}
            Err(e) => tracing::warn!(label = %label.as_ref(), "{}", e),
        }
    }
    roles
}

pub const UNSPECIFIED_ROLE: &str = "Member (role not specified)";

/// Human readable role list, e.g. `admin, gabbai`.
pub fn describe_roles(roles: &[Role]) -> String {
    if roles.is_empty() {
        return UNSPECIFIED_ROLE.to_string();
    }
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
