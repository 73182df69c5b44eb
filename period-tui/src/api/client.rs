use reqwest::{
    cookie::{CookieStore, Jar},
    header::REFERER,
    redirect::Policy,
    Client, RequestBuilder, Response, StatusCode, Url,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::csrf;
use super::dev_backend::DevBackend;
use super::dto::{
    AdjustRequest, CsrfOnlyRequest, DeleteAccountRequest, EndRequest, Envelope, LoginRequest,
    NoData, ProfileRequest, StartRequest,
};
use super::ApiError;
use crate::session_store;
use crate::types::{
    AdjustPeriod, AuthState, PeriodInfo, PredictionInfo, ProfileForm, SelectedDate,
};

pub const SESSION_COOKIE: &str = "sessionid";

/// Error strings the login page renders for rejected credentials.
const LOGIN_ERRORS: [&str; 3] = ["请输入有效的邮箱地址", "密码错误", "该邮箱未注册"];

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
    cookies: Vec<(String, String)>,
    /// Token scraped from the index page's hidden form field.
    form_token: Option<String>,
    persist_cookies: bool,
    dev_backend: Option<DevBackend>,
}

impl ApiClient {
    pub fn new(base_url: &str, cookies: Vec<(String, String)>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|_| ApiError::Url(base_url.to_string()))?;
        let jar = Arc::new(Jar::default());
        for (name, value) in &cookies {
            jar.add_cookie_str(&format!("{}={}; Path=/", name, value), &base_url);
        }

        // Login-protected views redirect instead of answering 401, so
        // redirects are surfaced rather than followed.
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|source| ApiError::Transport {
                call: "build HTTP client",
                source,
            })?;

        Ok(Self {
            client,
            base_url,
            jar,
            cookies,
            form_token: None,
            persist_cookies: false,
            dev_backend: None,
        })
    }

    pub fn dev(backend: DevBackend) -> Result<Self, ApiError> {
        let mut client = Self::new("http://localhost", vec![])?;
        client.dev_backend = Some(backend);
        Ok(client)
    }

    /// Write cookie changes back to the session store.
    pub fn with_persistence(mut self) -> Self {
        self.persist_cookies = true;
        self
    }

    pub fn is_dev(&self) -> bool {
        self.dev_backend.is_some()
    }

    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::Url(path.to_string()))
    }

    fn cookie_header(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        header.to_str().ok().map(str::to_string)
    }

    pub fn has_session_cookie(&self) -> bool {
        self.cookie_header()
            .and_then(|header| csrf::cookie_from_header(&header, SESSION_COOKIE))
            .is_some_and(|value| !value.is_empty())
    }

    /// Token for state-changing requests: hidden form field first, then the
    /// `csrftoken` cookie.
    pub fn csrf_token(&self) -> String {
        csrf::resolve_token(self.form_token.as_deref(), self.cookie_header().as_deref())
    }

    fn sync_cookies_from_jar(&mut self) {
        let Some(header) = self.cookie_header() else {
            return;
        };

        let mut cookies = csrf::parse_cookie_header(&header);
        cookies.sort_by(|a, b| a.0.cmp(&b.0));

        if cookies != self.cookies {
            self.cookies = cookies;
            if self.persist_cookies {
                if let Err(e) = session_store::save_cookies(&self.cookies) {
                    tracing::warn!(error = %e, "failed to persist session cookies");
                }
            }
        }
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self
            .client
            .post(self.endpoint(path)?)
            .header(REFERER, self.base_url.as_str()))
    }

    async fn send(
        &mut self,
        request: RequestBuilder,
        call: &'static str,
    ) -> Result<Response, ApiError> {
        tracing::debug!(call, "sending request");
        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport { call, source })?;

        let status = response.status();
        if status.is_redirection() || status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::Forbidden);
        }
        if !status.is_success() {
            return Err(ApiError::Status { call, status });
        }

        self.sync_cookies_from_jar();
        Ok(response)
    }

    async fn get_envelope<T: DeserializeOwned>(
        &mut self,
        request: RequestBuilder,
        call: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, call).await?;
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|source| ApiError::Decode { call, source })?;
        envelope.into_result()
    }

    async fn post_form<F: serde::Serialize>(
        &mut self,
        path: &str,
        form: &F,
        call: &'static str,
    ) -> Result<(), ApiError> {
        let request = self.post(path)?.form(form);
        self.get_envelope::<NoData>(request, call).await.map(|_| ())
    }

    /// Fetch the index page to pick up the hidden CSRF field and cookie.
    pub async fn prime_csrf(&mut self) -> Result<(), ApiError> {
        if self.dev_backend.is_some() {
            return Ok(());
        }

        let request = self.client.get(self.endpoint("/")?);
        let response = self.send(request, "GET /").await?;
        let html = response.text().await.map_err(|source| ApiError::Decode {
            call: "GET /",
            source,
        })?;
        self.form_token = csrf::extract_form_token(&html);
        tracing::debug!(
            from_form = self.form_token.is_some(),
            "CSRF token source resolved"
        );
        Ok(())
    }

    pub async fn period_info(&mut self, date: SelectedDate) -> Result<PeriodInfo, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.period_info(date.date());
        }

        let request = self
            .client
            .get(self.endpoint("/period/info/")?)
            .query(&[("date", date.to_string())]);
        self.get_envelope(request, "GET /period/info/").await
    }

    pub async fn predictions(&mut self) -> Result<PredictionInfo, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.predictions();
        }

        let request = self.client.get(self.endpoint("/period/predictions/")?);
        self.get_envelope(request, "GET /period/predictions/").await
    }

    /// Probe the login-protected predictions endpoint for a live session.
    pub async fn check_session(&mut self) -> Result<AuthState, ApiError> {
        match self.predictions().await {
            Ok(_) | Err(ApiError::Rejected(_)) => Ok(AuthState::Authenticated),
            Err(ApiError::Unauthorized) => Ok(AuthState::Anonymous),
            Err(e) => Err(e),
        }
    }

    pub async fn mark_start(&mut self, date: SelectedDate) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.mark_start(date.date());
        }

        let token = self.csrf_token();
        let form = StartRequest {
            csrfmiddlewaretoken: &token,
            start_date: date.to_string(),
        };
        self.post_form("/period/start/", &form, "POST /period/start/")
            .await
    }

    pub async fn mark_end(&mut self, date: SelectedDate) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.mark_end(date.date());
        }

        let token = self.csrf_token();
        let form = EndRequest {
            csrfmiddlewaretoken: &token,
            end_date: date.to_string(),
        };
        self.post_form("/period/end/", &form, "POST /period/end/")
            .await
    }

    pub async fn adjust_period(&mut self, adjust: &AdjustPeriod) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.adjust_period(adjust);
        }

        let token = self.csrf_token();
        let form = AdjustRequest {
            csrfmiddlewaretoken: &token,
            record_id: adjust.record_id,
            action: adjust.kind.as_str(),
            start_date: adjust.start_date.as_deref(),
            end_date: adjust.end_date.as_deref(),
        };
        self.post_form("/period/adjust/", &form, "POST /period/adjust/")
            .await
    }

    pub async fn delete_record(&mut self, record_id: i64) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.delete_record(record_id);
        }

        let token = self.csrf_token();
        let form = CsrfOnlyRequest {
            csrfmiddlewaretoken: &token,
        };
        self.post_form(
            &format!("/period/delete/{}/", record_id),
            &form,
            "POST /period/delete/:id/",
        )
        .await
    }

    pub async fn delete_account(&mut self, password: &str) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.delete_account(password);
        }

        let token = self.csrf_token();
        let form = DeleteAccountRequest {
            csrfmiddlewaretoken: &token,
            password,
            confirm_delete: "true",
        };
        self.post_form(
            "/period/delete-account/",
            &form,
            "POST /period/delete-account/",
        )
        .await
    }

    pub async fn save_profile(&mut self, profile: &ProfileForm) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.save_profile(profile);
        }

        let token = self.csrf_token();
        let form = ProfileRequest {
            csrfmiddlewaretoken: &token,
            cycle_length: &profile.cycle_length,
            period_length: &profile.period_length,
        };
        self.post_form(
            "/period/set-profile-ajax/",
            &form,
            "POST /period/set-profile-ajax/",
        )
        .await
    }

    /// Log in with email and password. The login view answers with a redirect
    /// on success and re-renders the form with an error otherwise.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        if self.dev_backend.is_some() {
            return Ok(());
        }

        // The login form's GET sets the csrftoken cookie.
        let login_url = self.endpoint("/period/login/")?;
        let page = self
            .client
            .get(login_url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                call: "GET /period/login/",
                source,
            })?;
        if let Ok(html) = page.text().await {
            if let Some(token) = csrf::extract_form_token(&html) {
                self.form_token = Some(token);
            }
        }

        let token = self.csrf_token();
        let response = self
            .client
            .post(login_url)
            .header(REFERER, self.base_url.as_str())
            .form(&LoginRequest {
                csrfmiddlewaretoken: &token,
                email,
                password,
            })
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                call: "POST /period/login/",
                source,
            })?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::Forbidden);
        }
        if status.is_redirection() && self.has_session_cookie() {
            self.form_token = None;
            self.sync_cookies_from_jar();
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = LOGIN_ERRORS
            .iter()
            .find(|error| body.contains(*error))
            .copied()
            .unwrap_or("登录失败");
        Err(ApiError::rejected(message))
    }

    pub async fn logout(&mut self) -> Result<(), ApiError> {
        if self.dev_backend.is_some() {
            return Ok(());
        }

        let request = self.client.get(self.endpoint("/period/logout/")?);
        match self.send(request, "GET /period/logout/").await {
            // The logout view redirects to the index page.
            Ok(_) | Err(ApiError::Unauthorized) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

