use serde::{Deserialize, Serialize};

use super::{null_as_default, Role};

/// Document stored at `communities/{id}/members/{uid}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
}

/// A community the current user belongs to, with the roles that apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMembership {
    pub community_id: String,
    pub community_name: String,
    pub roles: Vec<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_roles_read_as_empty() {
        let membership: Membership = serde_json::from_value(json!({"roles": null})).unwrap();
        assert!(membership.roles.is_empty());

        let membership: Membership = serde_json::from_value(json!({})).unwrap();
        assert!(membership.roles.is_empty());
    }
}
