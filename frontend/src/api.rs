//! REST client
//!
//! `GenesisApi::call` drives any `ApiRequest`: it attaches the bearer token,
//! encodes the body, maps statuses to `ApiError` and reports 401s to the
//! session through `SessionHandle`.

use std::sync::Arc;

use genesis_shared::protocol::{
    ApiRequest, CreatePatientRequest, DeletePatientRequest, GetPatientRequest,
    UpdatePatientRequest,
};
use genesis_shared::{
    CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, LoginRequest, PageRequest,
    PageResult, Patient, PatientPayload,
};

use leptos::prelude::use_context;

use crate::error::{ApiError, extract_server_message};
use crate::web::{HttpRequest, HttpTransport};

/// What the client needs from the session: read the token, report a 401.
pub trait SessionHandle: Send + Sync {
    fn token(&self) -> Option<String>;
    /// `token_used` is the token the rejected request carried.
    fn on_unauthorized(&self, token_used: Option<&str>);
}

/// REST client for the Genesis backend
#[derive(Clone)]
pub struct GenesisApi {
    /// Base URL without trailing slash
    base_url: String,
    /// `fetch` in the browser, a mock in tests
    transport: Arc<dyn HttpTransport>,
    /// Token source and 401 sink
    session: Arc<dyn SessionHandle>,
}

impl GenesisApi {
    /// Creates a client
    ///
    /// # Arguments
    /// * `base_url` - REST root, e.g. `/api`
    /// * `transport` - HTTP transport
    /// * `session` - supplies the bearer token and receives 401 reports
    pub fn new(
        base_url: &str,
        transport: Arc<dyn HttpTransport>,
        session: Arc<dyn SessionHandle>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    fn url<R: ApiRequest>(&self, req: &R) -> String {
        let mut url = format!("{}{}", self.base_url, req.path());
        let query = req.query();
        if !query.is_empty() {
            let encoded: Vec<String> = query
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&encoded.join("&"));
        }
        url
    }

    /// Sends one typed request.
    ///
    /// A 401 on an authenticated endpoint is reported to the session with
    /// the token the request carried before `Unauthorized` is returned.
    pub async fn call<R: ApiRequest>(&self, req: &R) -> Result<R::Response, ApiError> {
        let url = self.url(req);
        let mut http = HttpRequest::new(url, R::METHOD);

        let token_used = if R::AUTHENTICATED {
            self.session.token()
        } else {
            None
        };
        if let Some(token) = &token_used {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}"));
        }

        if let Some(body) = req.body() {
            let json =
                serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
            http = http
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(json);
        }

        tracing::debug!(method = R::METHOD.as_str(), url = %http.url, "request");
        let resp = self.transport.send(http).await.inspect_err(|e| {
            tracing::warn!(error = %e, "transport failure");
        })?;
        tracing::debug!(status = resp.status, bytes = resp.body.len(), "response");

        if !resp.ok() {
            let err = ApiError::from_status(resp.status, &resp.body);
            if err.is_unauthorized() {
                if R::AUTHENTICATED {
                    self.session.on_unauthorized(token_used.as_deref());
                    return Err(err);
                }
                // credentials rejected: keep whatever the server said
                return Err(ApiError::Server {
                    status: resp.status,
                    message: extract_server_message(&resp.body),
                });
            }
            tracing::warn!(status = resp.status, "request failed");
            return Err(err);
        }

        let body = if R::DISCARD_BODY || resp.body.trim().is_empty() {
            "null"
        } else {
            resp.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| {
            tracing::warn!(error = %e, "undecodable response");
            ApiError::Decode(e.to_string())
        })
    }

    /// Returns the bearer token for the given credentials.
    pub async fn login(&self, username: String, password: String) -> Result<String, ApiError> {
        let resp = self.call(&LoginRequest { username, password }).await?;
        Ok(resp.token)
    }

    /// `GET /paciente?page&pageSize&q`
    pub async fn list_patients(&self, req: &PageRequest) -> Result<PageResult<Patient>, ApiError> {
        self.call(req).await
    }

    pub async fn get_patient(&self, id: &str) -> Result<Patient, ApiError> {
        self.call(&GetPatientRequest { id: id.to_string() }).await
    }

    pub async fn create_patient(&self, payload: PatientPayload) -> Result<Patient, ApiError> {
        self.call(&CreatePatientRequest { payload }).await
    }

    /// `PUT /paciente/{id}`; any response body is ignored.
    pub async fn update_patient(&self, id: &str, payload: PatientPayload) -> Result<(), ApiError> {
        self.call(&UpdatePatientRequest {
            id: id.to_string(),
            payload,
        })
        .await
    }

    pub async fn delete_patient(&self, id: &str) -> Result<(), ApiError> {
        self.call(&DeletePatientRequest { id: id.to_string() }).await
    }
}

pub fn use_api() -> GenesisApi {
    use_context::<GenesisApi>().expect("GenesisApi should be provided")
}
