//! HTTPS backend for Nexus Dashboard Orchestrator.
//!
//! Logs in once through the Nexus Dashboard `/login` endpoint and sends the
//! returned token as a bearer token on every API call.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::Connection;
use serde::Serialize;
use serde_json::Value;

/// Login request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user_name: &'a str,
    user_passwd: &'a str,
    domain: &'a str,
}

/// HTTPS backend with an authenticated session.
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Orchestrator API base URL.
    api_base: String,
    /// `Authorization` header value.
    authorization: String,
}

impl HttpBackend {
    /// Log in and create a backend.
    pub fn connect(conn: &Connection) -> Result<Self> {
        let agent = build_agent(conn);
        let token = login(&agent, conn)?;
        Ok(Self {
            agent,
            api_base: conn.api_base(),
            authorization: format!("Bearer {}", token),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

impl Backend for HttpBackend {
    fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        log::debug!("GET {}", url);

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .header("Authorization", self.authorization.as_str())
            .call()?;

        read_json(response)
    }

    fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        log::debug!("PATCH {} {}", url, body);

        let response = self
            .agent
            .patch(&url)
            .header("Accept", "application/json")
            .header("Authorization", self.authorization.as_str())
            .send_json(body)?;

        read_json(response)
    }
}

fn build_agent(conn: &Connection) -> ureq::Agent {
    let tls = ureq::tls::TlsConfig::builder()
        .disable_verification(!conn.validate_certs)
        .build();
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(conn.timeout))
        .http_status_as_error(false)
        .tls_config(tls)
        .build();
    config.into()
}

fn login(agent: &ureq::Agent, conn: &Connection) -> Result<String> {
    let url = format!("{}/login", conn.base_url());
    log::debug!("POST {} as {}", url, conn.username);

    let body = LoginRequest {
        user_name: &conn.username,
        user_passwd: &conn.password,
        domain: &conn.login_domain,
    };

    let response = agent
        .post(&url)
        .header("Accept", "application/json")
        .send_json(&body)?;

    let response = read_json(response).map_err(|e| match e {
        Error::HttpError {
            message,
            status: Some(400 | 401 | 403),
        } => Error::LoginFailed {
            user: conn.username.clone(),
            message,
        },
        other => other,
    })?;

    token_from(&response).ok_or_else(|| Error::LoginFailed {
        user: conn.username.clone(),
        message: "no token in login response".to_string(),
    })
}

/// Decode a success body, or turn an error status into an error carrying the
/// orchestrator's own message.
fn read_json(mut response: ureq::http::Response<ureq::Body>) -> Result<Value> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.body_mut().read_json()?);
    }
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Err(Error::http(
        error_message(status.as_u16(), &body),
        Some(status.as_u16()),
    ))
}

/// Message of an error body: `message`, the `errors` list, or the raw text.
fn error_message(status: u16, body: &str) -> String {
    let detail = match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                let errors: Vec<&str> = json
                    .get("errors")?
                    .as_array()?
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str).or(e.as_str()))
                    .collect();
                (!errors.is_empty()).then(|| errors.join("; "))
            }),
        Err(_) => Some(body.trim().to_string()).filter(|text| !text.is_empty()),
    };
    match detail {
        Some(detail) => format!("HTTP {}: {}", status, detail),
        None => format!("HTTP {}", status),
    }
}

/// Pull the session token out of a login response.
fn token_from(response: &Value) -> Option<String> {
    ["jwttoken", "token"]
        .iter()
        .find_map(|key| response.get(*key).and_then(Value::as_str))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_request_shape() {
        let body = LoginRequest {
            user_name: "admin",
            user_passwd: "pw",
            domain: "DefaultAuth",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"userName": "admin", "userPasswd": "pw", "domain": "DefaultAuth"})
        );
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            error_message(400, r#"{"code": 400, "message": "pool 'p-x' does not exist"}"#),
            "HTTP 400: pool 'p-x' does not exist"
        );
        assert_eq!(
            error_message(409, r#"{"errors": [{"message": "conflict"}, "stale"]}"#),
            "HTTP 409: conflict; stale"
        );
        assert_eq!(error_message(502, "Bad Gateway\n"), "HTTP 502: Bad Gateway");
        assert_eq!(error_message(500, ""), "HTTP 500");
        assert_eq!(error_message(500, "{}"), "HTTP 500");
    }

    #[test]
    fn test_token_from_response() {
        assert_eq!(
            token_from(&json!({"jwttoken": "abc", "token": "def"})),
            Some("abc".to_string())
        );
        assert_eq!(token_from(&json!({"token": "def"})), Some("def".to_string()));
        assert_eq!(token_from(&json!({"jwttoken": ""})), None);
        assert_eq!(token_from(&json!({})), None);
    }
}
