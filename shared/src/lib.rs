use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod dashboard;
pub mod date;
pub mod pagination;
pub mod protocol;
pub mod token;
pub mod validation;

// =========================================================
// Constants
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Storage key under which the bearer token survives reloads.
pub const STORAGE_TOKEN_KEY: &str = "token";

pub const SEARCH_DEBOUNCE_MS: u32 = 300;
pub const DEFAULT_PAGE_SIZE: u32 = 8;
pub const PAGE_SIZE_OPTIONS: [u32; 5] = [5, 8, 10, 20, 50];

// =========================================================
// Domain Models
// =========================================================

/// A patient record as exposed by the backend (`Paciente`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    #[serde(flatten)]
    pub data: PatientPayload,
}

/// Patient fields without the identifier, used as create/update body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientPayload {
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "dataNascimento",
        default,
        skip_serializing_if = "Option::is_none",
        with = "date::iso_date_opt"
    )]
    pub birth_date: Option<NaiveDate>,
}

impl Patient {
    pub fn new(id: impl Into<String>, data: PatientPayload) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// One page query against a listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32, search: Option<String>) -> Self {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            search,
        }
    }

    /// Query string pairs in wire order; `q` is omitted when there is no term.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(q) = &self.search {
            pairs.push(("q", q.clone()));
        }
        pairs
    }
}

/// A bounded slice of records plus the total matching count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PageResult<T> {
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size,
        }
    }

    pub fn page_count(&self) -> u32 {
        pagination::page_count(self.total, self.page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
