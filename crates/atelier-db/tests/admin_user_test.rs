//! Integration tests for administrator provisioning.
//!
//! Require a reachable PostgreSQL (`DATABASE_URL`, see `test_fixtures`).

use atelier_crypto::{verify_password, HashAlgorithm, PasswordHasher};
use atelier_db::test_fixtures::TestDatabase;
use atelier_db::{Error, NewAdminUser, UserRepository};

fn hashed(password: &str) -> String {
    PasswordHasher::new(HashAlgorithm::Bcrypt)
        .with_bcrypt_cost(4)
        .unwrap()
        .hash(password)
        .unwrap()
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_admin() {
    let test_db = TestDatabase::new().await;
    test_db.create_users_table().await;

    let user = NewAdminUser::new("Ana Pop", "+40711111111", hashed("s3cret-pass"));
    test_db.db.users.insert_admin(&user).await.unwrap();

    let (name, role, hash): (String, String, String) = sqlx::query_as(
        "SELECT name, role, password_hash FROM users WHERE phone = $1",
    )
    .bind("+40711111111")
    .fetch_one(&test_db.pool)
    .await
    .unwrap();

    assert_eq!(name, "Ana Pop");
    assert_eq!(role, "admin");
    assert!(verify_password("s3cret-pass", &hash).unwrap());
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_phone_rejected_without_duplicate_row() {
    let test_db = TestDatabase::new().await;
    test_db.create_users_table().await;

    let first = NewAdminUser::new("Ana Pop", "+40722222222", hashed("first-pass"));
    test_db.db.users.insert_admin(&first).await.unwrap();

    let second = NewAdminUser::new("Ion Pop", "+40722222222", hashed("second-pass"));
    let result = test_db.db.users.insert_admin(&second).await;

    match result {
        Err(Error::Database(sqlx::Error::Database(db_err))) => {
            assert!(db_err.is_unique_violation())
        }
        other => panic!("Expected unique violation, got {:?}", other),
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE phone = $1")
        .bind("+40722222222")
        .fetch_one(&test_db.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_without_users_table_fails() {
    let test_db = TestDatabase::new().await;

    let user = NewAdminUser::new("Ana Pop", "+40733333333", hashed("s3cret-pass"));
    let result = test_db.db.users.insert_admin(&user).await;

    assert!(matches!(result, Err(Error::Database(_))));
    test_db.cleanup().await;
}
