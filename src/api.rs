// API client module: a small blocking HTTP client that talks to the
// Shiftly scheduler backend. It is intentionally synchronous; the whole
// provisioning flow is a linear sequence of calls with nothing to overlap.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://useshiftly.com/api";

/// Blocking API client holding the base URL of the backend and an
/// optional bearer token for authenticated calls.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Login request payload for /auth/login.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

/// Expected response from the login endpoint. The token is optional so a
/// 200 response without one can be detected and reported instead of
/// failing on deserialization.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Payload for the employee-creation call. Field names mirror the backend
/// (camelCase); `building_id` and `department_id` stay as raw JSON values
/// because they are opaque identifiers returned by the API.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OwnerAdminRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub department_id: Value,
    pub building_id: Value,
    pub active: bool,
    pub must_change_password: bool,
    pub phone_number: String,
    pub date_of_birth: String,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_relation: String,
    pub emergency_contact_phone: String,
}

/// Result of the employee-creation call. A rejection (non-200) is data,
/// not an error: the caller reports it and the process ends normally,
/// unlike the fatal building/department paths.
#[derive(Debug)]
pub enum EmployeeCreation {
    Created,
    Rejected { status: u16, body: String },
}

/// Python-style truthiness for a JSON value: null, false, 0, "", [] and {}
/// are all falsy. The by-name lookup treats any falsy 200 body as "not
/// found" and falls through to the create branch.
fn json_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl ApiClient {
    /// Create an ApiClient configured from the environment:
    /// `SHIFTLY_API_URL` for the base URL (default production API) and
    /// `SHIFTLY_HTTP_TIMEOUT_SECS` for an optional request timeout.
    /// Without a timeout a hung server blocks the call indefinitely.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("SHIFTLY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let timeout = std::env::var("SHIFTLY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);
        Self::with_options(base_url, timeout)
    }

    /// Create an ApiClient against an explicit base URL, no timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url.into(), None)
    }

    fn with_options(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url,
            token: None,
        })
    }

    /// Store the bearer token for subsequent authenticated requests.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// Build the Authorization header map when a token is set.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(t) = &self.token {
            let val = format!("Bearer {}", t);
            if let Ok(v) = HeaderValue::from_str(&val) {
                headers.insert(AUTHORIZATION, v);
            }
        }
        headers
    }

    /// Perform login and parse the AuthResponse JSON. A non-200 status is
    /// an error carrying the server's response body; a 200 body without a
    /// token is left to the caller to reject.
    pub fn login(&self, req: &AuthRequest) -> Result<AuthResponse> {
        let url = format!("{}/auth/login", &self.base_url);
        let res = self
            .client
            .post(&url)
            .json(req)
            .send()
            .context("Failed to send login request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Login failed: {} - {}", status, txt);
        }
        let resp: AuthResponse = res.json().context("Parsing login response json")?;
        Ok(resp)
    }

    /// Resolve a named resource (buildings or departments) to its id,
    /// creating it when the by-name lookup does not find it.
    ///
    /// The lookup counts as a hit only when it returns 200 with a
    /// JSON-truthy body; anything else (404, falsy body, unparseable
    /// body) falls through to the create call. A missing `id` on a hit
    /// resolves to JSON null, same as the original tooling.
    pub fn resolve_or_create(&self, collection: &str, name: &str) -> Result<Value> {
        let url = format!("{}/{}/by-name/{}", &self.base_url, collection, name);
        let res = self
            .client
            .get(&url)
            .headers(self.auth_headers())
            .send()
            .with_context(|| format!("Failed to send {} lookup request", collection))?;
        if res.status().as_u16() == 200 {
            if let Ok(body) = res.json::<Value>() {
                if json_truthy(&body) {
                    return Ok(body.get("id").cloned().unwrap_or(Value::Null));
                }
            }
        }

        let url = format!("{}/{}", &self.base_url, collection);
        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .json(&serde_json::json!({ "name": name }))
            .send()
            .with_context(|| format!("Failed to send {} create request", collection))?;
        if res.status().as_u16() != 200 {
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("{}", txt);
        }
        let body: Value = res
            .json()
            .with_context(|| format!("Parsing {} create response json", collection))?;
        Ok(body.get("id").cloned().unwrap_or(Value::Null))
    }

    /// POST the assembled owner-admin payload to /employees. Only a
    /// transport failure is an error; a non-200 status comes back as a
    /// Rejected outcome carrying the status code and body for reporting.
    pub fn create_employee(&self, req: &OwnerAdminRequest) -> Result<EmployeeCreation> {
        let url = format!("{}/employees", &self.base_url);
        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .json(req)
            .send()
            .context("Failed to send employee create request")?;
        let status = res.status().as_u16();
        if status == 200 {
            Ok(EmployeeCreation::Created)
        } else {
            let body = res.text().unwrap_or_else(|_| "".into());
            Ok(EmployeeCreation::Rejected { status, body })
        }
    }
}
