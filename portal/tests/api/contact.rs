use crate::helpers::secret;
use interfacing::ContactForm;
use portal::email_client::EmailClient;
use portal::error::{ApiError, ValidationError};
use portal::notify::{Level, NoticeLog};
use portal::pages::send_contact;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn email_client(base_url: String) -> EmailClient {
    EmailClient::new(
        base_url,
        "service_test".into(),
        "template_test".into(),
        secret("public-key"),
        std::time::Duration::from_millis(500),
    )
    .expect("Failed to build the email client")
}

fn form() -> ContactForm {
    ContactForm {
        first_names: "Ana".into(),
        last_names: "Pérez".into(),
        email: "ana@example.org".into(),
        phone: "0414-5550000".into(),
        subject: "Inscripción".into(),
        comments: "¿Cuándo abren las inscripciones?".into(),
    }
}

#[tokio::test]
async fn a_valid_message_is_delivered() {
    // Arrange
    let mock_server = MockServer::start().await;
    let client = email_client(mock_server.uri());
    let notices = NoticeLog::new();

    Mock::given(path("/api/v1.0/email/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Act
    send_contact(&client, &form(), &notices).await.unwrap();

    // Assert
    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["service_id"], "service_test");
    assert_eq!(body["template_params"]["nombres"], "Ana");
    assert_eq!(body["template_params"]["asunto"], "Inscripción");

    let notices = notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, Level::Success);
}

#[tokio::test]
async fn an_invalid_message_is_never_sent() {
    let mock_server = MockServer::start().await;
    let client = email_client(mock_server.uri());
    let notices = NoticeLog::new();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut form = form();
    form.email = "ana@example".into();
    form.comments = "   ".into();

    let error = send_contact(&client, &form, &notices).await.unwrap_err();

    assert!(matches!(
        error,
        ApiError::Validation(ValidationError::InvalidEmail)
    ));
    assert_eq!(notices.snapshot().len(), 2);
}

#[tokio::test]
async fn delivery_failure_is_reported() {
    let mock_server = MockServer::start().await;
    let client = email_client(mock_server.uri());
    let notices = NoticeLog::new();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let error = send_contact(&client, &form(), &notices).await.unwrap_err();

    assert!(matches!(error, ApiError::Network(_)));
    assert_eq!(
        notices.snapshot()[0].message,
        "Hubo un error al enviar el mensaje. Por favor intenta nuevamente."
    );
}
