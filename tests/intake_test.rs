use resume_intake::{
    config::AppConfig,
    db::{self, queries},
    services::storage::DocumentStore,
};
use uuid::Uuid;

/// Integration test: store and storage contracts
///
/// Verifies against live infrastructure:
/// 1. Database connection and schema
/// 2. Application insert / exact-triple lookup (dedup contract)
/// 3. Same-email, different-resume independence
/// 4. Notification flag update
/// 5. Error-log append and retention purge
/// 6. Document storage (upload/download/delete)
///
/// Note: This requires a running PostgreSQL and S3-compatible store
/// configured via environment variables.
#[tokio::test]
#[ignore] // Run with: cargo test --test intake_test -- --ignored
async fn test_store_and_storage_integration() {
    let config = AppConfig::from_env().expect("Failed to load config");

    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run migrations");

    // Unique identities per run so reruns never collide
    let email = format!("candidate-{}@example.com", Uuid::new_v4());
    let resume = format!("Resume body {}", Uuid::new_v4());
    let job = "Rust developer, 3 years experience, PostgreSQL.";

    // 1. Insert an application decision
    let app = queries::insert_application(&db_pool, &email, &resume, job, 85.5, false)
        .await
        .expect("Failed to insert application");

    assert_eq!(app.email, email);
    assert_eq!(app.score, 85.5);
    assert!(!app.email_status);

    // 2. Exact-triple lookup hits the stored decision
    let hit = queries::find_exact_match(&db_pool, &email, &resume, job)
        .await
        .expect("Lookup failed")
        .expect("Expected exact match");

    assert_eq!(hit.id, app.id);
    assert_eq!(hit.score, 85.5);

    // Any variation in the triple misses
    let miss = queries::find_exact_match(&db_pool, &email, &resume, "different job")
        .await
        .expect("Lookup failed");
    assert!(miss.is_none());

    // 3. Same email with a different resume is a new, independent record
    let other_resume = format!("Revised resume {}", Uuid::new_v4());
    let second = queries::insert_application(&db_pool, &email, &other_resume, job, 42.0, false)
        .await
        .expect("Failed to insert second application");

    assert_ne!(second.id, app.id);

    let first_again = queries::find_exact_match(&db_pool, &email, &resume, job)
        .await
        .expect("Lookup failed")
        .expect("First record still matchable");
    assert_eq!(first_again.id, app.id);
    assert_eq!(first_again.score, 85.5);

    // 4. Notification flag flips on the earliest record for the contact
    let updated = queries::update_email_status(&db_pool, &email, true)
        .await
        .expect("Failed to update email status");
    assert!(updated);

    let flipped = queries::find_by_email(&db_pool, &email)
        .await
        .expect("Lookup failed")
        .expect("Record exists");
    assert_eq!(flipped.id, app.id);
    assert!(flipped.email_status);

    // Unknown contact reports no update
    let missing = queries::update_email_status(&db_pool, "nobody@example.com", true)
        .await
        .expect("Update failed");
    assert!(!missing);

    // 5. Error log appends; purge with a huge retention keeps fresh rows
    queries::insert_error_log(&db_pool, "integration test diagnostic entry")
        .await
        .expect("Failed to insert error log");

    let purged = queries::purge_error_logs(&db_pool, 3650)
        .await
        .expect("Purge failed");
    assert_eq!(purged, 0);

    // 6. Document storage round-trip
    let storage = DocumentStore::new(
        &config.s3_bucket,
        &config.s3_endpoint,
        &config.s3_access_key,
        &config.s3_secret_key,
    )
    .expect("Failed to initialize document storage");

    let key = DocumentStore::upload_key(Uuid::new_v4(), "resume.pdf");
    let payload = b"fake resume bytes for testing";

    storage
        .upload(&key, payload, "application/pdf")
        .await
        .expect("Upload failed");

    let downloaded = storage.download(&key).await.expect("Download failed");
    assert_eq!(downloaded, payload);

    storage.delete(&key).await.expect("Delete failed");

    println!("✅ All integration tests passed!");
}

/// Resume lookup by content alone (store contract used for diagnostics)
#[tokio::test]
#[ignore]
async fn test_find_by_resume() {
    let config = AppConfig::from_env().expect("Failed to load config");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let email = format!("by-resume-{}@example.com", Uuid::new_v4());
    let resume = format!("Unique resume text {}", Uuid::new_v4());

    queries::insert_application(&db_pool, &email, &resume, "any job", 10.0, false)
        .await
        .expect("Insert failed");

    let found = queries::find_by_resume(&db_pool, &resume)
        .await
        .expect("Lookup failed")
        .expect("Expected match by resume content");

    assert_eq!(found.email, email);

    let missing = queries::find_by_resume(&db_pool, "no such resume content")
        .await
        .expect("Lookup failed");
    assert!(missing.is_none());
}
