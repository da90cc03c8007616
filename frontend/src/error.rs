//! API error taxonomy
//!
//! Every REST call resolves to `Result<T, ApiError>`. Views turn errors into
//! text with `user_message`; `Unauthorized` is handled globally by the
//! session and never shown inline.

use crate::web::HttpError;

pub const NETWORK_ERROR: &str = "Não foi possível conectar ao servidor";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound(Option<String>),
    #[error("conflict")]
    Conflict(Option<String>),
    #[error("server error {status}")]
    Server { status: u16, message: Option<String> },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid request body: {0}")]
    Encode(String),
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl ApiError {
    /// Maps a non-2xx status and its body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_server_message(body);
        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            _ => ApiError::Server { status, message },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Text for the user; `fallback` is used when the server said nothing useful.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR.to_string(),
            ApiError::NotFound(Some(msg))
            | ApiError::Conflict(Some(msg))
            | ApiError::Server {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::Unauthorized
            | ApiError::NotFound(None)
            | ApiError::Conflict(None)
            | ApiError::Server { message: None, .. }
            | ApiError::Decode(_)
            | ApiError::Encode(_) => fallback.to_string(),
        }
    }
}

/// Pulls a human message out of an error body.
///
/// JSON bodies contribute their `message`, `title` or `detail` field, in that
/// order. Any other non-empty body is used as-is.
pub fn extract_server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => ["message", "title", "detail"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string),
        Ok(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case("CPF já cadastrado", Some("CPF já cadastrado"))]
    #[case(r#"{"message":"Paciente não encontrado"}"#, Some("Paciente não encontrado"))]
    #[case(r#"{"title":"Conflito","detail":"ignored"}"#, Some("Conflito"))]
    #[case(r#"{"title":"","detail":"Detalhe"}"#, Some("Detalhe"))]
    #[case(r#"{"status":500}"#, None)]
    #[case(r#""texto""#, Some("texto"))]
    fn extracts_server_messages(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_server_message(body).as_deref(), expected);
    }

    #[test]
    fn maps_statuses() {
        assert_eq!(ApiError::from_status(401, "nope"), ApiError::Unauthorized);
        assert_eq!(
            ApiError::from_status(404, ""),
            ApiError::NotFound(None)
        );
        assert_eq!(
            ApiError::from_status(409, "duplicado"),
            ApiError::Conflict(Some("duplicado".to_string()))
        );
        assert_eq!(
            ApiError::from_status(500, r#"{"message":"boom"}"#),
            ApiError::Server {
                status: 500,
                message: Some("boom".to_string())
            }
        );
    }

    #[test]
    fn user_message_prefers_server_text() {
        let fallback = "Erro ao salvar";
        assert_eq!(
            ApiError::Conflict(Some("CPF duplicado".to_string())).user_message(fallback),
            "CPF duplicado"
        );
        assert_eq!(ApiError::NotFound(None).user_message(fallback), fallback);
        assert_eq!(
            ApiError::Decode("eof".to_string()).user_message(fallback),
            fallback
        );
        assert_eq!(
            ApiError::Network("offline".to_string()).user_message(fallback),
            NETWORK_ERROR
        );
    }
}
