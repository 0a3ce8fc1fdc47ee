// HTTP basic-auth gate for the farewell API
//
// Every request must carry `Authorization: Basic base64(user:password)` matching
// the single configured credential pair. Anything else gets a 401 challenge.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use warp::{Filter, Rejection};

pub const REALM: &str = "Secure Area";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

/// Rejection raised when the credential is missing or wrong
#[derive(Debug)]
pub struct Unauthorized;

impl warp::reject::Reject for Unauthorized {}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Check a raw `Authorization` header value
    pub fn verify_header(&self, header: Option<&str>) -> bool {
        let Some((user, password)) = header.and_then(decode_basic) else {
            return false;
        };
        user == self.user && password == self.password
    }

    /// Header value a client would send for these credentials
    pub fn to_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.user, self.password));
        format!("Basic {}", token)
    }
}

/// Split a `Basic` header into user and password.
///
/// The password is everything after the first `:` so it may itself contain colons.
pub fn decode_basic(header: &str) -> Option<(String, String)> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Filter that passes only requests carrying the configured credential
pub fn require_basic_auth(
    credentials: Arc<Credentials>,
) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and_then(move |header: Option<String>| {
            let credentials = credentials.clone();
            async move { authorize(&credentials, header.as_deref()) }
        })
        .untuple_one()
}

pub fn authorize(credentials: &Credentials, header: Option<&str>) -> Result<(), Rejection> {
    if credentials.verify_header(header) {
        Ok(())
    } else {
        tracing::debug!(has_header = header.is_some(), "basic auth rejected");
        Err(warp::reject::custom(Unauthorized))
    }
}
