//! View selection as a pure reducer over a closed set of actions.
//!
//! The state is plain data: the in-process shell keeps it in memory and the
//! HTTP front end posts it back with each action.

use serde::{Deserialize, Serialize};

use crate::models::ResolvedMembership;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Directory,
    CommunityDetail,
    Auth,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub view: View,
    pub selected_community_id: Option<String>,
    pub memberships: Vec<ResolvedMembership>,
    /// Message of the last failed membership scan, shown as a banner.
    pub membership_error: Option<String>,
    /// Set once the initial auth check has completed.
    pub auth_ready: bool,
    /// True between sign-in and the end of membership resolution.
    pub resolving_memberships: bool,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    AuthResolved { user_id: Option<String> },
    MembershipsResolved(Vec<ResolvedMembership>),
    MembershipsFailed(String),
    SelectCommunity(String),
    SelectDashboardCommunity(String),
    Back,
    ShowLogin,
    ShowDirectory,
    LoginSucceeded,
    LoggedOut,
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        !self.auth_ready || self.resolving_memberships
    }

    fn to_directory(mut self) -> Self {
        self.view = View::Directory;
        self.selected_community_id = None;
        self
    }

    fn signed_out(self) -> Self {
        ViewState {
            auth_ready: self.auth_ready,
            ..ViewState::default()
        }
    }
}

pub fn reduce(state: ViewState, action: Action) -> ViewState {
    match action {
        Action::AuthResolved { user_id: None } => ViewState {
            auth_ready: true,
            ..ViewState::default()
        },
        Action::AuthResolved {
            user_id: Some(user_id),
        } => {
            let same_user = state.user_id.as_deref() == Some(user_id.as_str());
            ViewState {
                auth_ready: true,
                resolving_memberships: true,
                membership_error: None,
                memberships: if same_user { state.memberships } else { Vec::new() },
                selected_community_id: if same_user {
                    state.selected_community_id
                } else {
                    None
                },
                user_id: Some(user_id),
                view: state.view,
            }
        }
        Action::MembershipsResolved(memberships) => {
            let previous = state.selected_community_id.clone();
            let mut next = ViewState {
                resolving_memberships: false,
                membership_error: None,
                memberships,
                ..state
            };

            if next.memberships.is_empty() {
                return next.to_directory();
            }

            let keep_previous = previous
                .as_deref()
                .is_some_and(|id| next.memberships.iter().any(|m| m.community_id == id));
            next.selected_community_id = if keep_previous {
                previous
            } else {
                Some(next.memberships[0].community_id.clone())
            };
            next.view = View::Dashboard;
            next
        }
        Action::MembershipsFailed(message) => ViewState {
            resolving_memberships: false,
            membership_error: Some(message),
            memberships: Vec::new(),
            ..state
        }
        .to_directory(),
        Action::SelectCommunity(id) => ViewState {
            view: View::CommunityDetail,
            selected_community_id: Some(id),
            ..state
        },
        Action::SelectDashboardCommunity(id) => {
            if state.memberships.iter().any(|m| m.community_id == id) {
                ViewState {
                    view: View::Dashboard,
                    selected_community_id: Some(id),
                    ..state
                }
            } else {
                state
            }
        }
        Action::Back | Action::ShowDirectory | Action::LoginSucceeded => state.to_directory(),
        Action::ShowLogin => ViewState {
            view: View::Auth,
            ..state
        },
        Action::LoggedOut => state.signed_out(),
    }
}
