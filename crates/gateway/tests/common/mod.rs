//! In-memory collaborators and helpers shared by the router tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use stylish_core::{
    Category, Product, ProductId, Provider, Role, Session, SignupForm, UserId, UserProfile,
};
use stylish_gateway::config::{GatewayConfig, JwtConfig};
use stylish_gateway::services::{CatalogError, CatalogService, UserError, UserService};
use stylish_gateway::state::AppState;

pub const PAGE_SIZE: usize = 8;

pub fn config() -> GatewayConfig {
    GatewayConfig {
        database_url: SecretString::from("postgres://localhost/stylish_test"),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        paging_size: PAGE_SIZE,
        jwt: JwtConfig {
            secret: SecretString::from("kP9#vX2$mQ7!tR4@wZ8%bN1^cL6&hJ3*"),
            lifetime_secs: 3600,
        },
        cookie_path: "/admin/".to_owned(),
        request_timeout: Duration::from_secs(5),
        trust_proxy_headers: false,
        facebook_graph_url: "https://graph.facebook.test".to_owned(),
        smtp: None,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

pub fn product(id: i64) -> Product {
    Product {
        id: ProductId::new(id),
        category: Category::Women,
        title: format!("前開衩扭結洋裝 {id}"),
        description: "厚薄：薄\r\n彈性：無".to_owned(),
        price: 799,
        texture: "棉 100%".to_owned(),
        wash: "手洗，溫水".to_owned(),
        place: "中國".to_owned(),
        note: "實品顏色依單品照為主".to_owned(),
        story: "O.N.S is all about options.".to_owned(),
        main_image: format!("https://cdn.stylish.test/{id}/main.jpg"),
        images: Vec::new(),
        colors: Vec::new(),
        sizes: vec!["S".to_owned(), "M".to_owned()],
        variants: Vec::new(),
    }
}

pub fn profile(provider: Provider) -> UserProfile {
    UserProfile {
        id: UserId::new(42),
        provider,
        name: "Pei".to_owned(),
        email: "pei@stylish.test".to_owned(),
        picture: None,
    }
}

/// Catalog that hands back a fixed candidate list and records its calls.
#[derive(Default)]
pub struct FakeCatalog {
    pub candidates: Vec<Product>,
    pub calls: AtomicUsize,
    pub last_query: Mutex<Option<(String, u32)>>,
}

impl FakeCatalog {
    pub fn with_items(count: i64) -> Arc<Self> {
        Arc::new(Self {
            candidates: (1..=count).map(product).collect(),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, criterion: String, page_index: u32) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some((criterion, page_index));
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn list_by_category(
        &self,
        category: Category,
        page_index: u32,
    ) -> Result<Vec<Product>, CatalogError> {
        self.record(category.to_string(), page_index);
        Ok(self.candidates.clone())
    }

    async fn search(&self, keyword: &str, page_index: u32) -> Result<Vec<Product>, CatalogError> {
        self.record(keyword.to_owned(), page_index);
        Ok(self.candidates.clone())
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.record(id.to_string(), 0);
        self.candidates
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("product {id} not found")))
    }
}

/// User service that issues a canned session, or fails with a canned error.
pub struct FakeUsers {
    pub access_token: String,
    pub failure: Option<fn() -> UserError>,
    pub signups: AtomicUsize,
    pub native_calls: AtomicUsize,
    pub facebook_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub last_token: Mutex<Option<String>>,
}

impl FakeUsers {
    fn new(access_token: &str, failure: Option<fn() -> UserError>) -> Arc<Self> {
        Arc::new(Self {
            access_token: access_token.to_owned(),
            failure,
            signups: AtomicUsize::new(0),
            native_calls: AtomicUsize::new(0),
            facebook_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        })
    }

    pub fn issuing(access_token: &str) -> Arc<Self> {
        Self::new(access_token, None)
    }

    pub fn failing(failure: fn() -> UserError) -> Arc<Self> {
        Self::new("", Some(failure))
    }

    pub fn total_calls(&self) -> usize {
        self.signups.load(Ordering::SeqCst)
            + self.native_calls.load(Ordering::SeqCst)
            + self.facebook_calls.load(Ordering::SeqCst)
            + self.profile_calls.load(Ordering::SeqCst)
    }

    fn session(&self, provider: Provider) -> Result<Session, UserError> {
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        Ok(Session {
            access_token: self.access_token.clone(),
            access_expired: 3600,
            user: profile(provider),
        })
    }
}

#[async_trait]
impl UserService for FakeUsers {
    async fn signup(&self, _form: SignupForm, _role: Role) -> Result<Session, UserError> {
        self.signups.fetch_add(1, Ordering::SeqCst);
        self.session(Provider::Native)
    }

    async fn native_sign_in(&self, _email: &str, _password: &str) -> Result<Session, UserError> {
        self.native_calls.fetch_add(1, Ordering::SeqCst);
        self.session(Provider::Native)
    }

    async fn facebook_sign_in(
        &self,
        _access_token: &str,
        _role: Role,
    ) -> Result<Session, UserError> {
        self.facebook_calls.fetch_add(1, Ordering::SeqCst);
        self.session(Provider::Facebook)
    }

    async fn profile_from_token(&self, token: &str) -> Result<UserProfile, UserError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(token.to_owned());
        self.session(Provider::Native).map(|s| s.user)
    }
}

pub fn app(catalog: Arc<FakeCatalog>, users: Arc<FakeUsers>) -> Router {
    let state = AppState::new(config(), catalog, users, None);
    stylish_gateway::app(state, false)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    send(app, request).await
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn expect_error(response: Response<Body>, status: StatusCode, detail: &str) {
    assert_eq!(response.status(), status);
    let body = json_body(response).await;
    assert_eq!(body["status"], status.as_u16());
    assert_eq!(body["detail"], detail);
}
