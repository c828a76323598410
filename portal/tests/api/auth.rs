use crate::helpers::{spawn_app, spawn_app_with, token_session};
use claim::{assert_none, assert_some};
use interfacing::LoginForm;
use portal::auth::{AdminAuth, AuthState};
use portal::error::{ApiError, ValidationError};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn successful_login_persists_a_token_credential() {
    // Arrange
    let app = spawn_app().await;
    let auth = AdminAuth::new(app.client.clone());

    Mock::given(path("/api-token-auth/"))
        .and(method("POST"))
        .and(body_json(serde_json::json!({
            "username": "director",
            "password": "secreto"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "abc" })))
        .expect(1)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/api/archivos/"))
        .and(header("Authorization", "Token abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&app.api_server)
        .await;

    // Act
    let state = auth
        .login(LoginForm::new("director", "secreto"))
        .await
        .unwrap();

    // Assert
    assert_eq!(
        state,
        AuthState::Authenticated {
            username: Some("director".into())
        }
    );
    assert_eq!(auth.state().await, state);

    let stored = assert_some!(app.store.stored().await);
    assert_eq!(stored.access.header_value(), "Token abc");
    assert_none!(stored.refresh);

    // Act - Part 2 - the credential is used by the shared client
    app.client.list_files().await.unwrap();
}

#[tokio::test]
async fn rejected_credentials_leave_no_session() {
    let app = spawn_app().await;
    let auth = AdminAuth::new(app.client.clone());

    Mock::given(path("/api-token-auth/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "non_field_errors": ["Unable to log in with provided credentials."]
        })))
        .expect(1)
        .mount(&app.api_server)
        .await;

    let error = auth
        .login(LoginForm::new("director", "incorrecta"))
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::InvalidCredentials));
    assert_eq!(
        error.user_message(),
        "Credenciales incorrectas. Verifique usuario y contraseña."
    );
    assert_eq!(auth.state().await, AuthState::Unauthenticated);
    assert_none!(app.store.stored().await);
}

#[tokio::test]
async fn login_requires_both_fields_before_any_request() {
    let app = spawn_app().await;
    let auth = AdminAuth::new(app.client.clone());

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.api_server)
        .await;

    let error = auth.login(LoginForm::new("director", "")).await.unwrap_err();
    assert!(matches!(
        error,
        ApiError::Validation(ValidationError::MissingField("contraseña"))
    ));

    let error = auth.login(LoginForm::new(" ", "secreto")).await.unwrap_err();
    assert!(matches!(
        error,
        ApiError::Validation(ValidationError::MissingField("usuario"))
    ));
}

#[tokio::test]
async fn persisted_session_is_trusted_at_startup() {
    let app = spawn_app_with(Some(token_session())).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.api_server)
        .await;

    let auth = AdminAuth::new(app.client.clone());

    assert_eq!(
        auth.state().await,
        AuthState::Authenticated {
            username: Some("director".into())
        }
    );
}

#[tokio::test]
async fn logout_clears_memory_and_storage() {
    let app = spawn_app_with(Some(token_session())).await;
    let auth = AdminAuth::new(app.client.clone());

    auth.logout().await.unwrap();

    assert!(!auth.state().await.is_authenticated());
    assert_none!(app.store.stored().await);
}

#[tokio::test]
async fn password_reset_lives_on_the_backend() {
    let app = spawn_app().await;
    let auth = AdminAuth::new(app.client.clone());

    assert_eq!(
        auth.password_reset_url().unwrap().as_str(),
        format!("{}/reset_password/", app.api_server.uri())
    );
}
