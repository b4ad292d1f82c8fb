//! Community authorization.
//!
//! A community's `adminUserIds` list is the only source of admin authority.
//! The `admin` label on a membership record is derived from it and never
//! grants anything by itself.

use crate::models::{Community, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewCommunity,
    EditCommunity,
}

pub fn is_community_admin(uid: &str, community: &Community) -> bool {
    community.admin_user_ids.iter().any(|id| id == uid)
}

pub fn authorize(uid: Option<&str>, community: &Community, permission: Permission) -> bool {
    match permission {
        Permission::ViewCommunity => true,
        Permission::EditCommunity => uid.is_some_and(|uid| is_community_admin(uid, community)),
    }
}

/// Roles that actually apply to `uid` in `community`: the stored labels with
/// `Admin` replaced by what the admin list says.
pub fn effective_roles(uid: &str, community: &Community, stored: &[Role]) -> Vec<Role> {
    let mut roles: Vec<Role> = stored
        .iter()
        .copied()
        .filter(|role| *role != Role::Admin)
        .collect();

    if is_community_admin(uid, community) {
        roles.insert(0, Role::Admin);
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn community(admins: &[&str]) -> Community {
        Community {
            id: "ahavat-hesed-jlm".to_string(),
            name: "Ahavat Hesed Jerusalem".to_string(),
            admin_user_ids: admins.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_edit_requires_admin_list_entry() {
        let c = community(&["u1"]);
        assert!(authorize(Some("u1"), &c, Permission::EditCommunity));
        assert!(!authorize(Some("u2"), &c, Permission::EditCommunity));
        assert!(!authorize(None, &c, Permission::EditCommunity));
        assert!(authorize(None, &c, Permission::ViewCommunity));
    }

    #[test]
    fn test_stored_admin_label_is_not_trusted() {
        let c = community(&[]);
        let roles = effective_roles("u1", &c, &[Role::Admin, Role::Gabbai]);
        assert_eq!(roles, vec![Role::Gabbai]);
        assert!(!authorize(Some("u1"), &c, Permission::EditCommunity));
    }

    #[test]
    fn test_admin_label_derived_from_admin_list() {
        let c = community(&["u1"]);
        let roles = effective_roles("u1", &c, &[Role::Member]);
        assert_eq!(roles, vec![Role::Admin, Role::Member]);
    }
}
