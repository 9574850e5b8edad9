use backoffice::auth::password::{self, DUMMY_HASH};

#[test]
fn dummy_hash_is_well_formed_and_matches_nothing() {
    assert_eq!(password::verify("", DUMMY_HASH), Ok(false));
    assert_eq!(password::verify("password123", DUMMY_HASH), Ok(false));
}

#[tokio::test]
async fn off_thread_verify_agrees_with_hash() {
    let stored = password::hash_off_thread("secret".to_string()).await.unwrap();

    assert_eq!(
        password::verify_off_thread("secret".to_string(), stored.clone()).await,
        Ok(true)
    );
    assert_eq!(
        password::verify_off_thread("other".to_string(), stored).await,
        Ok(false)
    );
}

#[tokio::test]
async fn off_thread_verify_rejects_unreadable_hash() {
    assert!(
        password::verify_off_thread("secret".to_string(), "not-a-hash".to_string())
            .await
            .is_err()
    );
}
