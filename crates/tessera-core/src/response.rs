//! Response building.
//!
//! [`ResponseWriter`] is the outbound sink owned by a [`Context`]. The helper
//! methods on [`Context`] in this module (`text`, `json`, `ok`, `error`,
//! `redirect`, …) write complete responses into it, and the query/form/JSON
//! readers decode the inbound request.

use bytes::{Bytes, BytesMut};
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::{CONTENT_FORM, CONTENT_JSON, CONTENT_PLAIN_UTF8};
use crate::{Context, HandlerError, HandlerResult};

/// The response being built for the current request.
///
/// Clearing the writer keeps its header map and body buffer allocated.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    written: bool,
}

impl ResponseWriter {
    /// Creates an empty `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.written = true;
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the response headers mutably.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &BytesMut {
        &self.body
    }

    /// Appends `chunk` to the body.
    pub fn write(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
        self.written = true;
    }

    /// Returns `true` once a status or body byte was written.
    #[must_use]
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Empties the writer back to a fresh `200 OK`.
    pub fn reset(&mut self) {
        self.status = StatusCode::OK;
        self.headers.clear();
        self.body.clear();
        self.written = false;
    }

    /// Moves the finished response out, leaving the writer empty.
    pub fn take(&mut self) -> Response<Bytes> {
        let mut response = Response::new(self.body.split().freeze());
        *response.status_mut() = self.status;
        *response.headers_mut() = std::mem::take(&mut self.headers);
        self.status = StatusCode::OK;
        self.written = false;
        response
    }

    fn replace_body(&mut self, status: StatusCode, content_type: &'static str, body: &[u8]) {
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body.clear();
        self.write(body);
        self.status = status;
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize + ?Sized> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Context {
    /// Sets the response status.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.response_mut().set_status(status);
        self
    }

    /// Sets a response header, replacing earlier values.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidHeader`] if the name or value is not
    /// valid in an HTTP header.
    pub fn set_header(&mut self, name: &str, value: &str) -> HandlerResult<&mut Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HandlerError::InvalidHeader(name.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| HandlerError::InvalidHeader(format!("{name}: {value}")))?;
        self.response_mut().headers_mut().insert(name, value);
        Ok(self)
    }

    /// Returns a request header as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request().headers().get(name)?.to_str().ok()
    }

    /// Writes a `text/plain` response.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the other writers.
    pub fn text(&mut self, status: StatusCode, body: impl AsRef<str>) -> HandlerResult {
        self.response_mut()
            .replace_body(status, CONTENT_PLAIN_UTF8, body.as_ref().as_bytes());
        Ok(())
    }

    /// Writes `value` as an `application/json` response.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::JsonEncode`] if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) -> HandlerResult {
        let body = serde_json::to_vec(value).map_err(HandlerError::JsonEncode)?;
        self.response_mut().replace_body(status, CONTENT_JSON, &body);
        Ok(())
    }

    /// Writes a `200 OK` success envelope: `{"success":true,"data":…}`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::JsonEncode`] if `data` cannot be serialized.
    pub fn ok<T: Serialize + ?Sized>(&mut self, data: &T) -> HandlerResult {
        self.json(
            StatusCode::OK,
            &Envelope {
                success: true,
                data: Some(data),
                error: None,
            },
        )
    }

    /// Writes an error envelope: `{"success":false,"error":…}`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::JsonEncode`] if serialization fails.
    pub fn error(&mut self, status: StatusCode, message: &str) -> HandlerResult {
        self.json(
            status,
            &Envelope::<()> {
                success: false,
                data: None,
                error: Some(message),
            },
        )
    }

    /// Redirects to `location` with `302 Found`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidHeader`] if `location` is not a valid
    /// header value.
    pub fn redirect(&mut self, location: &str) -> HandlerResult {
        self.redirect_with(StatusCode::FOUND, location)
    }

    /// Redirects to `location` with an explicit status.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidHeader`] if `location` is not a valid
    /// header value.
    pub fn redirect_with(&mut self, status: StatusCode, location: &str) -> HandlerResult {
        let value = HeaderValue::from_str(location)
            .map_err(|_| HandlerError::InvalidHeader(format!("location: {location}")))?;
        let response = self.response_mut();
        response.headers_mut().insert(header::LOCATION, value);
        response.set_status(status);
        Ok(())
    }

    /// Returns the first query parameter named `name`, percent-decoded.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<String> {
        let query = self.request().uri().query()?;
        serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .ok()?
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Decodes the whole query string into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Form`] if the query does not match `T`.
    pub fn query_as<T: DeserializeOwned>(&self) -> HandlerResult<T> {
        let query = self.request().uri().query().unwrap_or_default();
        Ok(serde_urlencoded::from_str(query)?)
    }

    /// Decodes the request body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::JsonDecode`] if the body is not valid JSON for `T`.
    pub fn bind_json<T: DeserializeOwned>(&self) -> HandlerResult<T> {
        Ok(serde_json::from_slice(self.request().body())?)
    }

    /// Returns a form field, looking at a URL-encoded body first and the
    /// query string second.
    #[must_use]
    pub fn form_value(&self, name: &str) -> Option<String> {
        let is_form = self
            .header(header::CONTENT_TYPE.as_str())
            .is_some_and(|ct| ct.starts_with(CONTENT_FORM));
        if is_form {
            let found = serde_urlencoded::from_bytes::<Vec<(String, String)>>(self.request().body())
                .ok()
                .and_then(|pairs| pairs.into_iter().find(|(key, _)| key == name));
            if let Some((_, value)) = found {
                return Some(value);
            }
        }
        self.query(name)
    }
}
