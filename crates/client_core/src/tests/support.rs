use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::UserId,
    protocol::{PageLinks, RegistrationResponse, TokenResponse, User, UsersPage},
};

use crate::{FormField, FormValues, PhotoFile, RegistrationPayload, RegistryApi};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ApiCall {
    Token,
    Register {
        token: String,
        payload: RegistrationPayload,
    },
    FetchUsers {
        page: u32,
        count: u32,
    },
}

/// In-memory registry. Unscripted token and registration calls succeed;
/// unscripted pages fail like a dropped connection.
#[derive(Default)]
pub(crate) struct FakeRegistryApi {
    tokens: Mutex<VecDeque<Result<TokenResponse, String>>>,
    registrations: Mutex<VecDeque<Result<RegistrationResponse, String>>>,
    pages: Mutex<HashMap<u32, Result<UsersPage, String>>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeRegistryApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_token(self, response: TokenResponse) -> Self {
        self.tokens.lock().expect("tokens").push_back(Ok(response));
        self
    }

    pub(crate) fn with_token_fault(self, message: &str) -> Self {
        self.tokens
            .lock()
            .expect("tokens")
            .push_back(Err(message.to_string()));
        self
    }

    pub(crate) fn with_registration(self, response: RegistrationResponse) -> Self {
        self.registrations
            .lock()
            .expect("registrations")
            .push_back(Ok(response));
        self
    }

    pub(crate) fn with_page(self, page: u32, body: UsersPage) -> Self {
        self.set_page(page, body);
        self
    }

    pub(crate) fn set_page(&self, page: u32, body: UsersPage) {
        self.pages.lock().expect("pages").insert(page, Ok(body));
    }

    pub(crate) fn set_page_fault(&self, page: u32, message: &str) {
        self.pages
            .lock()
            .expect("pages")
            .insert(page, Err(message.to_string()));
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls").clone()
    }

    pub(crate) fn fetched_pages(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::FetchUsers { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().expect("calls").push(call);
    }
}

#[async_trait]
impl RegistryApi for FakeRegistryApi {
    async fn request_token(&self) -> Result<TokenResponse> {
        self.record(ApiCall::Token);
        match self.tokens.lock().expect("tokens").pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(token_ok("test-token")),
        }
    }

    async fn register_user(
        &self,
        token: &str,
        payload: RegistrationPayload,
    ) -> Result<RegistrationResponse> {
        self.record(ApiCall::Register {
            token: token.to_string(),
            payload,
        });
        match self.registrations.lock().expect("registrations").pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(RegistrationResponse {
                success: true,
                user_id: Some(UserId(1000)),
                message: Some("New user successfully registered".to_string()),
            }),
        }
    }

    async fn fetch_users(&self, page: u32, count: u32) -> Result<UsersPage> {
        self.record(ApiCall::FetchUsers { page, count });
        match self.pages.lock().expect("pages").get(&page) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Err(anyhow!("connection reset while fetching page {page}")),
        }
    }
}

pub(crate) fn token_ok(token: &str) -> TokenResponse {
    TokenResponse {
        success: true,
        token: Some(token.to_string()),
        message: None,
    }
}

pub(crate) fn user(id: i64, name: &str) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        email: format!("user{id}@example.com"),
        phone: "+380501234567".to_string(),
        position: "Lawyer".to_string(),
        position_id: Some(1),
        registration_timestamp: None,
        photo: format!("https://example.com/photos/{id}.jpg"),
    }
}

pub(crate) fn users_page(users: Vec<User>, next_url: Option<&str>) -> UsersPage {
    UsersPage {
        success: true,
        page: None,
        total_pages: None,
        users,
        links: PageLinks {
            next_url: next_url.map(str::to_string),
            prev_url: None,
        },
        message: None,
    }
}

pub(crate) fn jpeg_photo() -> PhotoFile {
    PhotoFile::new(
        "avatar.jpg",
        Some("image/jpeg".to_string()),
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
    )
}

pub(crate) fn valid_values() -> FormValues {
    FormValues {
        name: "  Olena  ".to_string(),
        email: "olena@example.com".to_string(),
        phone: "+380501234567".to_string(),
        position: "2".to_string(),
        photo: Some(jpeg_photo()),
    }
}

/// Fills a controller field by field, the way a user would.
pub(crate) fn fill(form: &mut crate::FormController, values: FormValues) {
    form.set_field(FormField::Name, values.name).expect("name");
    form.set_field(FormField::Email, values.email).expect("email");
    form.set_field(FormField::Phone, values.phone).expect("phone");
    form.set_field(FormField::Position, values.position)
        .expect("position");
    form.set_field(FormField::Photo, values.photo).expect("photo");
}
