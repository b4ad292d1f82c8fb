//! Seeds sample communities, memberships and announcements.
//! Run with: cargo run --bin seed

use kolekta::config::{Config, StoreBackend};
use kolekta::db::Database;
use kolekta::seed::{self, SeedUser};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    if config.store.backend == StoreBackend::Memory {
        println!("Warning: STORE__BACKEND is memory; seeded data will not outlive this process.");
    }

    println!("Connecting to document store...");
    let db = Database::connect(&config).await?;
    println!("Connected successfully!");

    let admin = SeedUser {
        uid: std::env::var("ADMIN_UID")
            .unwrap_or_else(|_| "Tr7ubE5UvyWtGpKS78KcTW1LwqI3".to_string()),
        display_name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Nissim Trabelsy".to_string()),
        email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@kolekta.app".to_string()),
    };

    if seed::is_placeholder_uid(&admin.uid) {
        anyhow::bail!("Set ADMIN_UID to the uid of a real account before seeding");
    }

    let report = seed::seed(db.store.as_ref(), &admin, &seed::default_other_user()).await?;

    println!("========================================");
    println!("Seeding complete!");
    println!("Users:         {}", report.users);
    println!("Communities:   {}", report.communities);
    println!("Memberships:   {}", report.memberships);
    println!("Announcements: {}", report.announcements.len());
    println!("Administrator: {} ({})", admin.display_name, admin.uid);
    println!("========================================");

    Ok(())
}
