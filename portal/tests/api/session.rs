use crate::helpers::{body_text, jwt_session, spawn_app, spawn_app_with, token_session};
use claim::{assert_none, assert_ok, assert_some};
use portal::api::MultipartForm;
use portal::error::ApiError;
use wiremock::http::Method;
use wiremock::matchers::{any, body_json, header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn requests_carry_the_stored_credential() {
    // Arrange
    let app = spawn_app_with(Some(token_session())).await;

    Mock::given(path("/api/archivos/"))
        .and(method("GET"))
        .and(header("Authorization", "Token token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&app.api_server)
        .await;

    // Act
    let files = app.client.list_files().await.unwrap();

    // Assert
    assert!(files.is_empty());
}

#[tokio::test]
async fn requests_without_a_session_carry_no_authorization() {
    let app = spawn_app().await;

    Mock::given(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/api/noticias/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&app.api_server)
        .await;

    assert!(app.client.list_news().await.unwrap().is_empty());
}

#[tokio::test]
async fn a_401_triggers_one_refresh_and_one_retry() {
    // Arrange
    let app = spawn_app_with(Some(jwt_session())).await;

    Mock::given(path("/api/noticias/"))
        .and(header("Authorization", "JWT access-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/auth/jwt/refresh/"))
        .and(method("POST"))
        .and(body_json(serde_json::json!({ "refresh": "refresh-1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access": "access-2" })),
        )
        .expect(1)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/api/noticias/"))
        .and(header("Authorization", "JWT access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&app.api_server)
        .await;

    // Act
    let posts = app.client.list_news().await;

    // Assert
    assert!(posts.unwrap().is_empty());
    let stored = assert_some!(app.store.stored().await);
    assert_eq!(stored.access.header_value(), "JWT access-2");
    assert!(app.client.session().is_authenticated().await);
}

#[tokio::test]
async fn a_multipart_update_is_rebuilt_for_the_retry() {
    // Arrange
    let app = spawn_app_with(Some(jwt_session())).await;

    Mock::given(path("/api/noticias/1/"))
        .and(method("PATCH"))
        .and(header("Authorization", "JWT access-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/auth/jwt/refresh/"))
        .and(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access": "access-2" })),
        )
        .expect(1)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/api/noticias/1/"))
        .and(method("PATCH"))
        .and(header("Authorization", "JWT access-2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.api_server)
        .await;

    // Act
    let result = app
        .client
        .update_news(1, MultipartForm::new().text("titulo", "Acto cívico"))
        .await;

    // Assert
    assert_ok!(result);
    let patches: Vec<_> = app
        .received()
        .await
        .into_iter()
        .filter(|request| request.method == Method::Patch)
        .collect();
    assert_eq!(patches.len(), 2);
    for patch in &patches {
        let body = body_text(patch);
        assert!(body.contains(r#"name="titulo""#));
        assert!(body.contains("Acto cívico"));
    }
}

#[tokio::test]
async fn a_second_401_ends_the_session_without_looping() {
    let app = spawn_app_with(Some(jwt_session())).await;

    Mock::given(path("/api/noticias/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/auth/jwt/refresh/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access": "access-2" })),
        )
        .expect(1)
        .mount(&app.api_server)
        .await;

    let result = app.client.list_news().await;

    assert!(matches!(result, Err(ApiError::SessionExpired)));
    assert!(!app.client.session().is_authenticated().await);
    assert_none!(app.store.stored().await);
}

#[tokio::test]
async fn a_failed_refresh_clears_the_session() {
    let app = spawn_app_with(Some(jwt_session())).await;

    Mock::given(path("/api/archivos/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/auth/jwt/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.api_server)
        .await;

    let result = app.client.list_files().await;

    assert!(matches!(result, Err(ApiError::SessionExpired)));
    assert_none!(app.client.session().current().await);
    assert_none!(app.store.stored().await);
}

#[tokio::test]
async fn a_401_without_refresh_token_fails_as_unauthenticated() {
    let app = spawn_app_with(Some(token_session())).await;

    Mock::given(path("/auth/jwt/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/api/archivos/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.api_server)
        .await;

    let result = app.client.list_files().await;

    assert!(matches!(result, Err(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn server_errors_keep_their_status() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(503).set_body_string("mantenimiento"))
        .mount(&app.api_server)
        .await;

    match app.client.list_categories().await {
        Err(ApiError::Server { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "mantenimiento");
        }
        other => panic!("unexpected result: {:?}", other.map(|c| c.len())),
    }
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let app = spawn_app().await;

    Mock::given(path("/api/noticias/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "x": 1 })))
        .mount(&app.api_server)
        .await;

    assert!(matches!(
        app.client.list_news().await,
        Err(ApiError::Decode(_))
    ));
}
