use once_cell::sync::Lazy;
use portal::admin::{FilesManager, NewsManager};
use portal::api::ApiClient;
use portal::conf::EnvConf;
use portal::notify::{NoticeLog, Notifier};
use portal::session::{MemorySessionStore, Session, SessionHandle};
use secrecy::SecretString;
use std::sync::Arc;
use wiremock::{MockServer, Request};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = telemetry::TracingSubscriber::new(subscriber_name)
            .env_filter(default_filter_level)
            .build(std::io::stdout);
        telemetry::init_global_default(subscriber).expect("Failed to set subscriber");
    } else {
        let subscriber = telemetry::TracingSubscriber::new(subscriber_name)
            .env_filter(default_filter_level)
            .build(std::io::sink);
        telemetry::init_global_default(subscriber).expect("Failed to set subscriber");
    };
});

pub struct TestApp {
    pub api_server: MockServer,
    pub client: ApiClient,
    pub store: Arc<MemorySessionStore>,
    pub notices: NoticeLog,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(None).await
}

pub async fn spawn_app_with(session: Option<Session>) -> TestApp {
    Lazy::force(&TRACING);

    let api_server = MockServer::start().await;

    let conf = {
        let mut c = EnvConf::test_default().api;
        c.base_url = api_server.uri();
        c
    };

    let store = Arc::new(match session {
        Some(session) => MemorySessionStore::with_session(session),
        None => MemorySessionStore::default(),
    });
    let session = SessionHandle::restore(store.clone())
        .await
        .expect("Failed to restore the session");
    let client = ApiClient::new(&conf, session).expect("Failed to build the API client");

    TestApp {
        api_server,
        client,
        store,
        notices: NoticeLog::new(),
    }
}

impl TestApp {
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::new(self.notices.clone())
    }

    pub fn news_manager(&self) -> NewsManager {
        NewsManager::new(self.client.clone(), self.notifier())
    }

    pub fn files_manager(&self) -> FilesManager {
        FilesManager::new(self.client.clone(), self.notifier())
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices
            .snapshot()
            .into_iter()
            .map(|notice| notice.message)
            .collect()
    }

    pub async fn received(&self) -> Vec<Request> {
        self.api_server
            .received_requests()
            .await
            .expect("Request recording is disabled")
    }
}

pub fn secret(value: &str) -> SecretString {
    SecretString::new(value.into())
}

pub fn token_session() -> Session {
    Session::token(secret("token-1"), Some("director".into()))
}

pub fn jwt_session() -> Session {
    Session::jwt(secret("access-1"), secret("refresh-1"), None)
}

pub fn news_json(id: u64, title: &str, category: u64, category_name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "titulo": title,
        "contenido": format!("<p>Contenido de {}</p>", title),
        "categoria": category,
        "categoria_nombre": category_name,
        "imagen": format!("/media/noticias/{}.png", id),
        "fecha_publicacion": format!("2024-09-{:02}T08:00:00Z", 30 - id.min(29))
    })
}

pub fn file_json(id: u64, title: &str, category: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "titulo": title,
        "categoria": category,
        "archivo_pdf": format!("/media/planillas/{}.pdf", id),
        "fecha_subida": "2024-07-01T12:00:00Z",
        "size_formatted": "120.5 KB"
    })
}

pub fn categories_json() -> serde_json::Value {
    serde_json::json!([
        { "id": 4, "nombre": "Eventos" },
        { "id": 5, "nombre": "Deportes" }
    ])
}

/// Raw body of a multipart request, for looking up field names.
pub fn body_text(request: &Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}
