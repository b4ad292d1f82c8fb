//! Sample data for local development and demos.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::models::{Announcement, Community, CommunityEvent, Language, Membership, UserProfile};
use crate::store::{self, CollectionPath, DocPath, DocumentStore, SetOptions, StoreError};

pub const AHAVAT_HESED: &str = "ahavat-hesed-jlm";
pub const TIFERET_MOSHE: &str = "tiferet-moshe-ta";
pub const OR_HADASH: &str = "or-hadash-haifa";

const PLACEHOLDER_UIDS: [&str; 3] = [
    "",
    "YOUR_ACTUAL_ADMIN_UID",
    "ADMIN_USER_UID_PLACEHOLDER",
];

#[derive(Debug, Clone)]
pub struct SeedUser {
    pub uid: String,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub users: usize,
    pub communities: usize,
    pub memberships: usize,
    pub announcements: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Administrator uid {0:?} is a placeholder; set the real uid before seeding")]
    PlaceholderUid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn is_placeholder_uid(uid: &str) -> bool {
    PLACEHOLDER_UIDS.contains(&uid.trim())
}

fn prayer_times(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Upserts users, communities, memberships and announcements. Community,
/// user and membership writes merge, so re-running is safe; announcements
/// are appended on every run.
pub async fn seed(
    store: &dyn DocumentStore,
    admin: &SeedUser,
    other: &SeedUser,
) -> Result<SeedReport, SeedError> {
    if is_placeholder_uid(&admin.uid) {
        return Err(SeedError::PlaceholderUid(admin.uid.clone()));
    }

    let mut report = SeedReport::default();

    tracing::info!(uid = %admin.uid, "Seeding data for {}", admin.display_name);

    for (user, language) in [(admin, Language::He), (other, Language::En)] {
        let profile = UserProfile {
            preferred_language: language,
            ..UserProfile::new(&user.uid, &user.email, &user.display_name)
        };
        store
            .set(
                &DocPath::user(&user.uid)?,
                store::to_document(&profile)?,
                SetOptions::merge(),
            )
            .await?;
        report.users += 1;
    }

    let communities = [
        (
            AHAVAT_HESED,
            Community {
                name: "Ahavat Hesed Jerusalem".to_string(),
                address: "123 Kindness St, Jerusalem".to_string(),
                contact: "contact@ahavathesed.org".to_string(),
                admin_user_ids: vec![admin.uid.clone()],
                prayer_times: prayer_times(&[
                    ("shacharit", "07:00"),
                    ("mincha", "18:00"),
                    ("maariv", "20:00"),
                ]),
                upcoming_events: vec![CommunityEvent {
                    id: "evt1".to_string(),
                    name: "Shabbat Dinner".to_string(),
                    date: "Next Friday".to_string(),
                }],
                ..Default::default()
            },
        ),
        (
            TIFERET_MOSHE,
            Community {
                name: "Tiferet Moshe Tel Aviv".to_string(),
                address: "456 Glory Ave, Tel Aviv".to_string(),
                contact: "info@tiferetmoshe.org".to_string(),
                prayer_times: prayer_times(&[
                    ("shacharit", "06:30"),
                    ("mincha", "18:30"),
                    ("maariv", "20:30"),
                ]),
                ..Default::default()
            },
        ),
        (
            OR_HADASH,
            Community {
                name: "Or Hadash Haifa".to_string(),
                address: "789 Light Rd, Haifa".to_string(),
                contact: "office@orhadash.org".to_string(),
                admin_user_ids: vec![other.uid.clone()],
                ..Default::default()
            },
        ),
    ];

    for (id, community) in &communities {
        let mut doc = store::to_document(community)?;
        // Communities without events or prayer times keep whatever is stored.
        if community.upcoming_events.is_empty() {
            doc.remove("upcomingEvents");
        }
        if community.prayer_times.is_empty() {
            doc.remove("prayerTimes");
        }
        store
            .set(&DocPath::community(id)?, doc, SetOptions::merge())
            .await?;
        tracing::info!(community_id = %id, "Upserted community: {}", community.name);
        report.communities += 1;
    }

    let memberships = [
        (AHAVAT_HESED, admin, vec!["admin", "gabbai"]),
        (TIFERET_MOSHE, admin, vec!["member"]),
        (AHAVAT_HESED, other, vec!["board_member"]),
        (OR_HADASH, other, vec!["admin"]),
    ];

    for (community_id, user, roles) in memberships {
        let community_name = communities
            .iter()
            .find(|(id, _)| *id == community_id)
            .map(|(_, c)| c.name.clone());
        let membership = Membership {
            roles: roles.iter().map(|r| r.to_string()).collect(),
            display_name: Some(user.display_name.clone()),
            community_name,
            community_id: Some(community_id.to_string()),
        };
        store
            .set(
                &DocPath::member(community_id, &user.uid)?,
                store::to_document(&membership)?,
                SetOptions::merge(),
            )
            .await?;
        tracing::info!(
            community_id = %community_id,
            uid = %user.uid,
            roles = ?roles,
            "Upserted membership"
        );
        report.memberships += 1;
    }

    let announcements = CollectionPath::announcements(AHAVAT_HESED)?;
    for (title, content, author) in [
        (
            "Special Kiddush This Shabbat",
            "Join us for a special kiddush sponsored by the Levy family.",
            admin,
        ),
        (
            "Weekly Parasha Shiur",
            "Rabbi Cohen's weekly Parasha shiur will be on Wednesday at 8 PM.",
            other,
        ),
    ] {
        let announcement = Announcement {
            title: title.to_string(),
            content: content.to_string(),
            author_id: author.uid.clone(),
            author_name: author.display_name.clone(),
            posted_at: Utc::now(),
        };
        let id = store
            .add(&announcements, store::to_document(&announcement)?)
            .await?;
        report.announcements.push(id);
    }
    tracing::info!(
        community_id = AHAVAT_HESED,
        count = report.announcements.len(),
        "Added announcements"
    );

    Ok(report)
}

/// Sample users used when the operator does not provide one.
pub fn default_other_user() -> SeedUser {
    SeedUser {
        uid: "sample-user-sarah".to_string(),
        display_name: "Sarah Cohen".to_string(),
        email: "sarah@example.com".to_string(),
    }
}
