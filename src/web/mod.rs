//! Request and response helpers
//!
//! The request being served and the response under construction are passed in
//! explicitly through the [`RequestContext`] and [`ResponseSink`] traits.
//! [`ServerRequest`] and [`RecordedResponse`] are in-memory implementations;
//! `http::Request` converts into a `ServerRequest` and `http::Response` is a
//! sink on its own.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, TimeDelta, Utc};
use http::header::{HeaderMap, HeaderName, HeaderValue, SET_COOKIE, WWW_AUTHENTICATE};
use http::StatusCode;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, warn};

/// Header marking an XHR request
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// Marker value sent by XHR clients
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

const COOKIE_EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Read access to the request being served
pub trait RequestContext {
    /// Value of a request header (case-insensitive name)
    fn header(&self, name: &str) -> Option<&str>;

    /// `http` or `https`
    fn scheme(&self) -> &str;

    fn host(&self) -> &str;

    fn port(&self) -> u16;

    /// Path plus query string
    fn request_uri(&self) -> &str;

    /// Username and password from an `Authorization: Basic` header
    fn basic_auth(&self) -> Option<(String, String)> {
        let encoded = self.header("Authorization")?.strip_prefix("Basic ")?;
        let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, password) = decoded.split_once(':')?;
        Some((user.to_string(), password.to_string()))
    }

    /// Raw `Cookie` header
    fn cookie_header(&self) -> Option<&str> {
        self.header("Cookie")
    }

    /// Request cookies sorted by name
    fn cookies(&self) -> BTreeMap<String, String> {
        self.cookie_header().map(parse_cookies).unwrap_or_default()
    }
}

/// Write access to the response under construction
pub trait ResponseSink {
    fn set_status(&mut self, status: StatusCode);

    fn set_header(&mut self, name: HeaderName, value: &str);

    fn set_cookie(&mut self, cookie: SetCookie);
}

/// A `Set-Cookie` instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
    pub path: Option<String>,
}

impl SetCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: None,
            path: None,
        }
    }

    /// An empty cookie that expired at `at`
    pub fn expired(name: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(name, "").with_expires(at)
    }

    #[must_use]
    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Whether the browser should drop this cookie relative to `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(expires) = self.expires {
            write!(f, "; Expires={}", expires.format(COOKIE_EXPIRES_FORMAT))?;
        }
        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        Ok(())
    }
}

/// In-memory request built from its parts
#[derive(Debug, Clone)]
pub struct ServerRequest {
    scheme: String,
    host: String,
    port: u16,
    request_uri: String,
    headers: HeaderMap,
}

impl ServerRequest {
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        request_uri: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
            request_uri: request_uri.into(),
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add an `Authorization: Basic` header for `user` and `password`
    #[must_use]
    pub fn with_basic_auth(self, user: &str, password: &str) -> Self {
        let token = general_purpose::STANDARD.encode(format!("{user}:{password}"));
        match HeaderValue::from_str(&format!("Basic {token}")) {
            Ok(value) => self.with_header(http::header::AUTHORIZATION, value),
            Err(_) => self,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl<B> From<&http::Request<B>> for ServerRequest {
    fn from(request: &http::Request<B>) -> Self {
        let uri = request.uri();
        let scheme = uri.scheme_str().unwrap_or("http").to_string();
        let host_header = request
            .headers()
            .get(http::header::HOST)
            .and_then(|value| value.to_str().ok());
        let (host, header_port) = match host_header {
            Some(value) => match value.rsplit_once(':').map(|(h, p)| (h, p.parse::<u16>())) {
                Some((host, Ok(port))) => (host.to_string(), Some(port)),
                _ => (value.to_string(), None),
            },
            None => (uri.host().unwrap_or_default().to_string(), None),
        };
        let default_port = if scheme == "https" { 443 } else { 80 };
        let port = uri.port_u16().or(header_port).unwrap_or(default_port);
        let request_uri = uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());

        Self {
            scheme,
            host,
            port,
            request_uri,
            headers: request.headers().clone(),
        }
    }
}

impl RequestContext for ServerRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn request_uri(&self) -> &str {
        &self.request_uri
    }
}

/// Sink that records every instruction it receives
#[derive(Debug, Clone, Default)]
pub struct RecordedResponse {
    pub status: Option<StatusCode>,
    pub headers: HeaderMap,
    pub cookies: Vec<SetCookie>,
}

impl ResponseSink for RecordedResponse {
    fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn set_header(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(e) => warn!("Dropping header {}: {}", name, e),
        }
    }

    fn set_cookie(&mut self, cookie: SetCookie) {
        self.cookies.push(cookie);
    }
}

impl<B> ResponseSink for http::Response<B> {
    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn set_header(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers_mut().insert(name, value);
            }
            Err(e) => warn!("Dropping header {}: {}", name, e),
        }
    }

    fn set_cookie(&mut self, cookie: SetCookie) {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                self.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!("Dropping cookie {}: {}", cookie.name, e),
        }
    }
}

/// Check HTTP basic credentials against a login/password table
///
/// On failure the response gets `401 Unauthorized` and a
/// `WWW-Authenticate: Basic` challenge; on success it is left untouched.
///
/// # Example
///
/// ```rust
/// use helperbox::web::{auth, RecordedResponse, ServerRequest};
/// use std::collections::HashMap;
///
/// let credentials = HashMap::from([("root".to_string(), "toor".to_string())]);
/// let request = ServerRequest::new("https", "example.com", 443, "/").with_basic_auth("root", "toor");
/// let mut response = RecordedResponse::default();
///
/// assert!(auth(&request, &mut response, &credentials));
/// assert!(response.status.is_none());
/// ```
pub fn auth<R, S>(request: &R, response: &mut S, credentials: &HashMap<String, String>) -> bool
where
    R: RequestContext + ?Sized,
    S: ResponseSink + ?Sized,
{
    let validated = request
        .basic_auth()
        .is_some_and(|(user, password)| credentials.get(&user) == Some(&password));

    if !validated {
        debug!("Basic authentication failed, sending challenge");
        response.set_status(StatusCode::UNAUTHORIZED);
        response.set_header(WWW_AUTHENTICATE, "Basic");
    }
    validated
}

/// Whether the request was sent as an XHR
pub fn is_ajax<R: RequestContext + ?Sized>(request: &R) -> bool {
    request.header(REQUESTED_WITH_HEADER) == Some(XML_HTTP_REQUEST)
}

/// `scheme://host:port/uri` of the request, port always included
pub fn get_full_url<R: RequestContext + ?Sized>(request: &R) -> String {
    format!(
        "{}://{}:{}{}",
        request.scheme(),
        request.host(),
        request.port(),
        request.request_uri()
    )
}

/// Find `name` among raw `Name: value` header lines
///
/// Matching is ASCII case-insensitive on the `name:` prefix. Returns the
/// trimmed text after the first colon, or an empty string.
///
/// # Example
///
/// ```rust
/// use helperbox::web::get_response_header;
///
/// let lines = ["HTTP/1.1 200 OK", "Content-Type: text/html; charset=utf-8 "];
/// assert_eq!(get_response_header("content-type", &lines), "text/html; charset=utf-8");
/// assert_eq!(get_response_header("location", &lines), "");
/// ```
pub fn get_response_header<S: AsRef<str>>(name: &str, lines: &[S]) -> String {
    let prefix = format!("{name}:");
    lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| {
            line.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(&prefix))
        })
        .and_then(|line| line.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}

/// Parse a `Cookie` header into a name-sorted map
///
/// Pairs are split on `;`, then on the first `=`. Names and values are
/// trimmed, a pair without `=` gets an empty value and empty names are
/// skipped.
///
/// # Example
///
/// ```rust
/// use helperbox::web::parse_cookies;
///
/// let cookies = parse_cookies(" c=3; b=2; a=1 ");
/// let pairs: Vec<(&str, &str)> = cookies.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
/// assert_eq!(pairs, vec![("a", "1"), ("b", "2"), ("c", "3")]);
/// ```
pub fn parse_cookies(header: &str) -> BTreeMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn cookie_names(header: &str) -> Vec<&str> {
    header
        .split(';')
        .map(|pair| pair.split('=').next().unwrap_or(pair).trim())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Expire every cookie the request carries
///
/// Each cookie gets two expired `Set-Cookie` instructions, one for the
/// default path and one for `/`. Returns whether the request had any cookies.
pub fn clear_all_cookies<R, S>(request: &R, response: &mut S) -> bool
where
    R: RequestContext + ?Sized,
    S: ResponseSink + ?Sized,
{
    let Some(header) = request.cookie_header() else {
        return false;
    };
    let names = cookie_names(header);
    if names.is_empty() {
        return false;
    }

    let expires = Utc::now() - TimeDelta::seconds(1000);
    for name in &names {
        response.set_cookie(SetCookie::expired(*name, expires));
        response.set_cookie(SetCookie::expired(*name, expires).with_path("/"));
    }
    debug!("Expired {} cookies", names.len());
    true
}

/// Drop `name` from the cookie state and expire it on the client
///
/// Returns whether the cookie was present.
pub fn remove_cookie<S: ResponseSink + ?Sized>(
    cookies: &mut BTreeMap<String, String>,
    response: &mut S,
    name: &str,
) -> bool {
    if cookies.remove(name).is_none() {
        return false;
    }
    let expires = DateTime::from_timestamp(-1, 0).unwrap_or_default();
    response.set_cookie(SetCookie::expired(name, expires).with_path("/"));
    true
}
