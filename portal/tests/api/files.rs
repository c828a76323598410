use crate::helpers::{body_text, file_json, spawn_app, spawn_app_with, token_session, TestApp};
use bytes::Bytes;
use interfacing::FileCategory;
use portal::admin::{FileSelection, UploadState, MAX_UPLOAD_BYTES};
use portal::error::{ApiError, ValidationError};
use portal::notify::Answer;
use wiremock::matchers::{any, method, path};
use wiremock::http::Method;
use wiremock::{Mock, ResponseTemplate};

fn pdf(name: &str) -> FileSelection {
    FileSelection::new(name, "application/pdf", Bytes::from_static(b"%PDF-1.4"))
}

async fn mount_files(app: &TestApp, files: serde_json::Value) {
    Mock::given(path("/api/archivos/"))
        .and(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(files))
        .mount(&app.api_server)
        .await;
}

#[tokio::test]
async fn rejected_files_never_reach_the_server() {
    // Arrange
    let app = spawn_app_with(Some(token_session())).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.api_server)
        .await;
    let mut manager = app.files_manager();

    // Act - Part 1 - wrong type
    let error = manager
        .select_file(FileSelection::new(
            "foto.png",
            "image/png",
            Bytes::from_static(b"\x89PNG"),
        ))
        .unwrap_err();

    // Assert - Part 1
    assert_eq!(error, ValidationError::NotPdf);
    assert_eq!(
        manager.upload().error.as_deref(),
        Some("Solo se permiten archivos PDF.")
    );
    assert_eq!(manager.upload().file, None);

    // Act - Part 2 - one byte over the limit
    let oversized = FileSelection::new(
        "grande.pdf",
        "application/pdf",
        Bytes::from(vec![0u8; MAX_UPLOAD_BYTES + 1]),
    );
    let error = manager.select_file(oversized).unwrap_err();

    // Assert - Part 2
    assert_eq!(error, ValidationError::FileTooLarge);
    assert_eq!(
        manager.upload().error.as_deref(),
        Some("El archivo es demasiado pesado (Máx 5MB).")
    );
}

#[tokio::test]
async fn a_file_at_the_limit_is_accepted_and_prefills_the_title() {
    let app = spawn_app_with(Some(token_session())).await;
    let mut manager = app.files_manager();

    let at_limit = FileSelection::new(
        "Planilla 2025.pdf",
        "application/pdf",
        Bytes::from(vec![0u8; MAX_UPLOAD_BYTES]),
    );
    manager.select_file(at_limit).unwrap();

    assert_eq!(manager.upload().title, "Planilla 2025");
    assert_eq!(manager.upload().category, None);
    assert_eq!(manager.upload().error, None);
}

#[tokio::test]
async fn upload_requires_title_and_category() {
    let app = spawn_app_with(Some(token_session())).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.api_server)
        .await;
    let mut manager = app.files_manager();

    let error = manager.confirm_upload().await.unwrap_err();
    assert!(matches!(
        error,
        ApiError::Validation(ValidationError::NoFileSelected)
    ));

    manager.select_file(pdf("inscripcion.pdf")).unwrap();
    let error = manager.confirm_upload().await.unwrap_err();
    assert!(matches!(
        error,
        ApiError::Validation(ValidationError::MissingTitleOrCategory)
    ));
    assert_eq!(
        manager.upload().error.as_deref(),
        Some("Por favor complete el título y la categoría.")
    );
}

#[tokio::test]
async fn successful_upload_resets_the_form_and_refetches() {
    // Arrange
    let app = spawn_app_with(Some(token_session())).await;
    Mock::given(path("/api/archivos/"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.api_server)
        .await;
    mount_files(
        &app,
        serde_json::json!([file_json(3, "Inscripcion", "Planilla nuevo ingreso")]),
    )
    .await;

    let mut manager = app.files_manager();
    manager.select_file(pdf("inscripcion.pdf")).unwrap();
    manager.set_title("Inscripcion");
    manager.set_category(FileCategory::NewEnrollment);

    // Act
    manager.confirm_upload().await.unwrap();

    // Assert
    let requests = app.received().await;
    let upload = requests
        .iter()
        .find(|request| request.method == Method::Post)
        .unwrap();
    let body = body_text(upload);
    assert!(body.contains(r#"name="archivo_pdf"; filename="inscripcion.pdf""#));
    assert!(body.contains("Planilla nuevo ingreso"));
    assert!(body.contains(r#"name="titulo""#));

    assert_eq!(manager.upload(), &UploadState::default());
    assert!(!manager.is_uploading());
    assert_eq!(manager.files().len(), 1);
    assert_eq!(app.messages(), vec!["Archivo subido correctamente"]);
}

#[tokio::test]
async fn failed_upload_keeps_the_selection() {
    let app = spawn_app_with(Some(token_session())).await;
    Mock::given(path("/api/archivos/"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.api_server)
        .await;

    let mut manager = app.files_manager();
    manager.select_file(pdf("inscripcion.pdf")).unwrap();
    manager.set_category(FileCategory::Other);

    assert!(manager.confirm_upload().await.is_err());

    assert_eq!(manager.upload().file, Some(pdf("inscripcion.pdf")));
    assert_eq!(manager.upload().title, "inscripcion");
    assert_eq!(
        manager.upload().error.as_deref(),
        Some("Error al subir. ¿Está iniciada la sesión?")
    );
    assert!(!manager.is_uploading());
    assert_eq!(
        app.messages(),
        vec!["Error al subir. ¿Está iniciada la sesión?"]
    );
}

#[tokio::test]
async fn upload_without_a_session_is_refused_locally() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.api_server)
        .await;

    let mut manager = app.files_manager();
    manager.select_file(pdf("inscripcion.pdf")).unwrap();
    manager.set_category(FileCategory::ReEnrollment);

    assert!(matches!(
        manager.confirm_upload().await,
        Err(ApiError::Unauthenticated)
    ));
}

#[tokio::test]
async fn delete_removes_the_file_only_after_success() {
    let app = spawn_app_with(Some(token_session())).await;
    mount_files(
        &app,
        serde_json::json!([
            file_json(3, "Inscripcion", "Planilla nuevo ingreso"),
            file_json(4, "Reingreso", "Planilla reingreso")
        ]),
    )
    .await;
    Mock::given(path("/api/archivos/3/"))
        .and(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.api_server)
        .await;
    Mock::given(path("/api/archivos/4/"))
        .and(method("DELETE"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&app.api_server)
        .await;

    let mut manager = app.files_manager();
    manager.load().await.unwrap();

    assert!(manager.delete(3, &Answer(true)).await.unwrap());
    assert!(manager.delete(4, &Answer(true)).await.is_err());

    assert_eq!(
        manager.files().iter().map(|file| file.id).collect::<Vec<_>>(),
        vec![4]
    );
    assert_eq!(
        app.messages(),
        vec![
            "Archivo eliminado",
            "No se pudo eliminar. Verifique su sesión."
        ]
    );
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let app = spawn_app_with(Some(token_session())).await;
    mount_files(
        &app,
        serde_json::json!([file_json(3, "Inscripcion", "Planilla nuevo ingreso")]),
    )
    .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&app.api_server)
        .await;

    let mut manager = app.files_manager();
    manager.load().await.unwrap();

    assert!(!manager.delete(3, &Answer(false)).await.unwrap());
    assert_eq!(manager.files().len(), 1);
}
