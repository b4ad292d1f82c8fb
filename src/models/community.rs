use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{null_as_default, string_map};
use crate::store::{self, Document};

pub const UNNAMED_COMMUNITY: &str = "Unnamed Community";

/// Community profile document stored at `communities/{id}`.
///
/// Every field is optional in storage; missing values read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Community {
    #[serde(skip)]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact: String,
    #[serde(deserialize_with = "null_as_default")]
    pub admin_user_ids: Vec<String>,
    #[serde(deserialize_with = "string_map")]
    pub prayer_times: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub upcoming_events: Vec<CommunityEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
}

impl Community {
    pub fn from_document(id: &str, doc: Document) -> store::Result<Self> {
        let mut community: Community = store::from_document(doc)?;
        community.id = id.to_string();
        Ok(community)
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            UNNAMED_COMMUNITY
        } else {
            &self.name
        }
    }

    pub fn apply_edit(&mut self, edit: &CommunityEdit) {
        self.name = edit.name.clone();
        self.address = edit.address.clone();
        self.contact = edit.contact.clone();
    }
}

/// The three fields an administrator may change from the edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityEdit {
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl CommunityEdit {
    pub fn to_fields(&self) -> Document {
        let mut fields = Document::new();
        fields.insert("name".to_string(), self.name.clone().into());
        fields.insert("address".to_string(), self.address.clone().into());
        fields.insert("contact".to_string(), self.contact.clone().into());
        fields
    }
}
