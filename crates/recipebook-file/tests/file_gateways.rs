//! End-to-end tests for the file-backed gateways.

use recipebook_core::error::AuthError;
use recipebook_core::{
    Credentials, Error, Recipe, RecordGateway, Registration, SessionContext, SessionGateway,
};
use recipebook_file::{FileRecordGateway, FileSessionGateway};
use tempfile::TempDir;

fn recipe(name: &str) -> Recipe {
    Recipe {
        name: name.to_string(),
        suitable_for: 4,
        ingredients: vec!["potatoes".to_string(), "butter".to_string()],
        cooking_instruction: "Boil, then mash.".to_string(),
        vegetarian: true,
        ..Recipe::blank()
    }
}

async fn register_and_login(
    sessions: &FileSessionGateway,
    email: &str,
) -> recipebook_core::SessionTokens {
    sessions
        .register(&Registration::new("Test", "Cook", email, "hunter22"))
        .await
        .unwrap();
    sessions
        .login(&Credentials::new(email, "hunter22"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_login_and_crud() {
    let dir = TempDir::new().unwrap();
    let sessions = FileSessionGateway::new(dir.path());
    let (context, writer) = SessionContext::new();
    let records = FileRecordGateway::new(dir.path(), context);

    let tokens = register_and_login(&sessions, "cook@example.com").await;
    assert_eq!(tokens.user_info.display_name(), "Test Cook");
    writer.install(tokens);

    let created = records.create(&recipe("Mashed potatoes")).await.unwrap();
    let id = created.id.clone().unwrap();

    let page = records.list(0, 10).await.unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.contents[0], created);

    let mut changed = created.clone();
    changed.suitable_for = 6;
    let updated = records.update(&id, &changed).await.unwrap();
    assert_eq!(updated.suitable_for, 6);
    assert_eq!(records.get(&id).await.unwrap().suitable_for, 6);

    records.delete(&id).await.unwrap();
    assert!(matches!(records.get(&id).await, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let dir = TempDir::new().unwrap();
    let sessions = FileSessionGateway::new(dir.path());
    register_and_login(&sessions, "cook@example.com").await;

    let err = sessions
        .login(&Credentials::new("cook@example.com", "nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials(_))));
}

#[tokio::test]
async fn test_refresh_issues_usable_token() {
    let dir = TempDir::new().unwrap();
    let sessions = FileSessionGateway::new(dir.path());
    let tokens = register_and_login(&sessions, "cook@example.com").await;

    let renewed = sessions.refresh(&tokens).await.unwrap();
    assert_eq!(renewed.refresh_token, tokens.refresh_token);
    assert_eq!(renewed.user_info, tokens.user_info);

    let mut forged = tokens.clone();
    forged.refresh_token = recipebook_core::RefreshToken::new("00000000-0000-0000-0000-000000000000");
    let err = sessions.refresh(&forged).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::RefreshTokenInvalid)));
}

#[tokio::test]
async fn test_accounts_do_not_see_each_other() {
    let dir = TempDir::new().unwrap();
    let sessions = FileSessionGateway::new(dir.path());

    let (alice_ctx, alice_writer) = SessionContext::new();
    alice_writer.install(register_and_login(&sessions, "alice@example.com").await);
    let alice = FileRecordGateway::new(dir.path(), alice_ctx);

    let (bob_ctx, bob_writer) = SessionContext::new();
    bob_writer.install(register_and_login(&sessions, "bob@example.com").await);
    let bob = FileRecordGateway::new(dir.path(), bob_ctx);

    let created = alice.create(&recipe("Alice's stew")).await.unwrap();
    let id = created.id.unwrap();

    assert!(bob.list(0, 10).await.unwrap().is_empty());
    assert!(matches!(bob.get(&id).await, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn test_signed_out_gateway_refuses() {
    let dir = TempDir::new().unwrap();
    let (context, writer) = SessionContext::new();
    let records = FileRecordGateway::new(dir.path(), context);

    let sessions = FileSessionGateway::new(dir.path());
    writer.install(register_and_login(&sessions, "cook@example.com").await);
    assert!(writer.clear());

    let err = records.list(0, 10).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::NotAuthenticated)));
}
