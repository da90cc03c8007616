use crate::{LoginRequest, LoginResponse, PageRequest, PageResult, Patient, PatientPayload};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The JSON body sent with the request, `()` when there is none.
    type Body: Serialize;
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token is attached (and a 401 invalidates the session).
    const AUTHENTICATED: bool = true;
    /// Whether the response body is ignored (`Response` is `()`).
    const DISCARD_BODY: bool = false;

    /// The URL path relative to the API base, starting with `/`.
    fn path(&self) -> String;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}

const PATIENTS_PATH: &str = "/paciente";

fn patient_path(id: &str) -> String {
    format!("{}/{}", PATIENTS_PATH, urlencoding::encode(id))
}

// =========================================================
// Request Definitions
// =========================================================

/// Exchange credentials for a bearer token
impl ApiRequest for LoginRequest {
    type Body = LoginRequest;
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/Auth/login".to_string()
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(self)
    }
}

/// Fetch one page of patients
impl ApiRequest for PageRequest {
    type Body = ();
    type Response = PageResult<Patient>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        PATIENTS_PATH.to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.query_pairs()
    }
}

#[derive(Debug, Clone)]
pub struct GetPatientRequest {
    pub id: String,
}

impl ApiRequest for GetPatientRequest {
    type Body = ();
    type Response = Patient;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        patient_path(&self.id)
    }
}

#[derive(Debug, Clone)]
pub struct CreatePatientRequest {
    pub payload: PatientPayload,
}

impl ApiRequest for CreatePatientRequest {
    type Body = PatientPayload;
    type Response = Patient;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        PATIENTS_PATH.to_string()
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(&self.payload)
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePatientRequest {
    pub id: String,
    pub payload: PatientPayload,
}

impl ApiRequest for UpdatePatientRequest {
    type Body = PatientPayload;
    // 204, or the stored record on some deployments
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Put;
    const DISCARD_BODY: bool = true;

    fn path(&self) -> String {
        patient_path(&self.id)
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(&self.payload)
    }
}

#[derive(Debug, Clone)]
pub struct DeletePatientRequest {
    pub id: String,
}

impl ApiRequest for DeletePatientRequest {
    type Body = ();
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;
    const DISCARD_BODY: bool = true;

    fn path(&self) -> String {
        patient_path(&self.id)
    }
}
