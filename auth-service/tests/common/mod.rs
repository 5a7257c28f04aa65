use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenCodec;
use auth_service::credential::errors::AuthError;
use auth_service::credential::models::Credential;
use auth_service::credential::models::CredentialId;
use auth_service::credential::models::EmailAddress;
use auth_service::credential::models::NewCredential;
use auth_service::credential::ports::CredentialStore;
use auth_service::credential::service::AuthService;
use auth_service::inbound::http::router::create_router;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Credential store kept in process memory, enforcing unique emails like the
/// Postgres table does.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: Mutex<HashMap<String, Credential>>,
}

impl InMemoryCredentialStore {
    pub fn len(&self) -> usize {
        self.credentials.lock().unwrap().len()
    }

    pub fn password_hash(&self, email: &str) -> Option<String> {
        self.credentials
            .lock()
            .unwrap()
            .get(email)
            .map(|credential| credential.password_hash.clone())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert(&self, credential: NewCredential) -> Result<(), AuthError> {
        let mut credentials = self.credentials.lock().unwrap();

        if credentials.contains_key(credential.email.as_str()) {
            return Err(AuthError::Store(format!(
                "email already registered: {}",
                credential.email
            )));
        }

        let id = CredentialId(credentials.len() as i64 + 1);
        credentials.insert(
            credential.email.as_str().to_string(),
            Credential {
                id,
                name: credential.name,
                email: credential.email,
                password_hash: credential.password_hash,
            },
        );

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credential>, AuthError> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .get(email.as_str())
            .cloned())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryCredentialStore>,
    pub api_client: reqwest::Client,
    pub token_codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryCredentialStore::default());
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let auth_service = Arc::new(AuthService::new(Arc::clone(&store), authenticator));

        let router = create_router(auth_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            store,
            api_client: reqwest::Client::new(),
            token_codec: TokenCodec::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with a `bearer` Authorization header
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path)
            .header("Authorization", format!("bearer {}", token))
    }

    /// Register a credential and return the response
    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/v1/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/v1/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
