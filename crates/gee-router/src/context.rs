//! Per-request context handed to route handlers.
//!
//! The context carries the parsed request (method, path, bound path
//! parameters) and buffers the response. Response writes follow the usual
//! transport ordering: headers, then the status line, then body bytes.
//! Headers touched after the status was written have no effect.

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Request, Response, StatusCode};
use http_body_util::Full;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use url::form_urlencoded;

/// Ad-hoc JSON object, handy for `ctx.json(StatusCode::OK, &h)`.
pub type H = serde_json::Map<String, serde_json::Value>;

/// Path parameters bound by a route match, keyed by name.
pub type Params = HashMap<String, String>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Buffered outbound half of a request.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    headers: HeaderMap,
    status: Option<StatusCode>,
    body: BytesMut,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header. Ignored once the status has been written.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.status.is_some() {
            tracing::debug!(header = %name, "header set after status was written; ignored");
            return;
        }
        self.headers.insert(name, value);
    }

    /// Write the status line. Returns `false` if a status was already sent.
    pub fn write_header(&mut self, status: StatusCode) -> bool {
        if let Some(sent) = self.status {
            tracing::warn!(
                sent = sent.as_u16(),
                ignored = status.as_u16(),
                "superfluous status write"
            );
            return false;
        }
        self.status = Some(status);
        true
    }

    /// Append body bytes, implicitly sending `200 OK` if no status was written.
    pub fn write(&mut self, data: &[u8]) {
        if self.status.is_none() {
            self.write_header(StatusCode::OK);
        }
        self.body.extend_from_slice(data);
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convert into a response suitable for hyper.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

/// Everything a handler needs for one request.
#[derive(Debug)]
pub struct Context {
    request: Request<Bytes>,
    /// Percent-decoded request path, without the query string.
    pub path: String,
    /// Request method, uppercase.
    pub method: String,
    /// Parameters bound by the matched route.
    pub params: Params,
    writer: ResponseWriter,
}

impl Context {
    pub fn new(request: Request<Bytes>) -> Self {
        Self {
            path: decode_path(request.uri().path()),
            method: request.method().as_str().to_string(),
            params: Params::new(),
            writer: ResponseWriter::new(),
            request,
        }
    }

    /// The inbound request.
    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    /// Bound path parameter, or `""` when the route declared no such name.
    pub fn param(&self, key: &str) -> &str {
        self.params.get(key).map(String::as_str).unwrap_or_default()
    }

    /// First query-string value for `key`, or `""`.
    pub fn query(&self, key: &str) -> String {
        self.request
            .uri()
            .query()
            .and_then(|query| lookup_form(query.as_bytes(), key))
            .unwrap_or_default()
    }

    /// Form value for `key`: a url-encoded request body takes precedence
    /// over the query string. `""` when neither carries it.
    pub fn post_form(&self, key: &str) -> String {
        self.form_body()
            .and_then(|body| lookup_form(body, key))
            .unwrap_or_else(|| self.query(key))
    }

    fn form_body(&self) -> Option<&[u8]> {
        let method = self.request.method();
        if method != Method::POST && method != Method::PUT && method != Method::PATCH {
            return None;
        }
        let content_type = self.request.headers().get(CONTENT_TYPE)?.to_str().ok()?;
        content_type
            .starts_with(FORM_CONTENT_TYPE)
            .then(|| self.request.body().as_ref())
    }

    /// Status written for this request, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.writer.status()
    }

    /// Write the response status. Only the first call takes effect.
    pub fn status(&mut self, code: StatusCode) {
        self.writer.write_header(code);
    }

    /// Set a response header. Invalid names or values are logged and dropped.
    pub fn set_header(&mut self, key: &str, value: &str) {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => self.writer.set_header(name, value),
            _ => tracing::warn!(header = key, "invalid response header; dropped"),
        }
    }

    /// Plain-text response.
    pub fn string(&mut self, code: StatusCode, text: &str) {
        self.set_header("Content-Type", "text/plain");
        self.status(code);
        self.writer.write(text.as_bytes());
    }

    /// JSON response.
    ///
    /// The value is encoded before anything reaches the writer; an encoding
    /// failure produces a 500 instead of a half-written response.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: StatusCode, obj: &T) {
        match serde_json::to_vec(obj) {
            Ok(mut buf) => {
                buf.push(b'\n');
                self.set_header("Content-Type", "application/json");
                self.status(code);
                self.writer.write(&buf);
            }
            Err(err) => {
                tracing::error!(path = %self.path, error = %err, "failed to encode JSON response");
                self.fail(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
            }
        }
    }

    /// Raw bytes with no content type.
    pub fn data(&mut self, code: StatusCode, data: &[u8]) {
        self.status(code);
        self.writer.write(data);
    }

    /// HTML response.
    pub fn html(&mut self, code: StatusCode, html: &str) {
        self.set_header("Content-Type", "text/html");
        self.status(code);
        self.writer.write(html.as_bytes());
    }

    /// Plain-text error reply.
    pub fn fail(&mut self, code: StatusCode, message: &str) {
        self.set_header("Content-Type", "text/plain; charset=utf-8");
        self.set_header("X-Content-Type-Options", "nosniff");
        self.status(code);
        self.writer.write(message.as_bytes());
        self.writer.write(b"\n");
    }

    /// The buffered response written so far.
    pub fn writer(&self) -> &ResponseWriter {
        &self.writer
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        self.writer.into_response()
    }
}

/// Decode `%XX` escapes; invalid UTF-8 is replaced rather than rejected.
fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

fn lookup_form(input: &[u8], key: &str) -> Option<String> {
    form_urlencoded::parse(input)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
