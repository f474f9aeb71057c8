//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! The per-call request accumulator and the finished request.

use super::RequestBody;
use crate::Argument;
use crate::adapter::Publisher;
use crate::resolver::ResolutionError;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::collections::HashMap;
use url::Url;
use url::form_urlencoded;

/// Characters escaped when a value is substituted into a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Mutable, call-scoped accumulator of request parts.
///
/// The dispatcher seeds one from the method's template, hands it to every
/// bound resolver in parameter order, then calls [`HttpRequestValues::build`].
/// It is never shared between invocations.
#[derive(Debug, Default)]
pub struct HttpRequestValues {
    method: Option<Method>,
    uri_template: String,
    url: Option<Url>,
    uri_variables: HashMap<String, String>,
    headers: HeaderMap,
    cookies: Vec<(String, String)>,
    request_params: Vec<(String, String)>,
    attributes: HashMap<String, Argument>,
    body: RequestBody,
}

impl HttpRequestValues {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accumulator seeded with a verb and URL template.
    #[must_use]
    pub fn with_template(method: Method, uri_template: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            uri_template: uri_template.into(),
            ..Self::default()
        }
    }

    /// The current verb.
    #[must_use]
    pub fn http_method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Replaces the verb.
    pub fn set_http_method(&mut self, method: Method) {
        self.method = Some(method);
    }

    /// The URL template, before path variables are substituted.
    #[must_use]
    pub fn uri_template(&self) -> &str {
        &self.uri_template
    }

    /// Replaces the URL template.
    pub fn set_uri_template(&mut self, uri_template: impl Into<String>) {
        self.uri_template = uri_template.into();
    }

    /// The URL override, if any.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Overrides the target URL for this call.
    pub fn set_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    /// Sets the value substituted for `{name}` in the URL template.
    pub fn set_uri_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.uri_variables.insert(name.into(), value.into());
    }

    /// The path variables collected so far.
    #[must_use]
    pub fn uri_variables(&self) -> &HashMap<String, String> {
        &self.uri_variables
    }

    /// Appends a header value, keeping any earlier values for the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::InvalidHeader`] if the name or value is
    /// not legal in an HTTP header.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), ResolutionError> {
        let header_name = HeaderName::try_from(name).map_err(|e| ResolutionError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let header_value =
            HeaderValue::try_from(value).map_err(|e| ResolutionError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        self.headers.append(header_name, header_value);
        Ok(())
    }

    /// Appends every entry of `headers`.
    pub fn extend_headers(&mut self, headers: &HeaderMap) {
        for (name, value) in headers {
            self.headers.append(name.clone(), value.clone());
        }
    }

    /// The headers collected so far.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Appends a cookie.
    pub fn add_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.push((name.into(), value.into()));
    }

    /// The cookies collected so far, in insertion order.
    #[must_use]
    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    /// Appends a request parameter.
    pub fn add_request_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.request_params.push((name.into(), value.into()));
    }

    /// The request parameters collected so far, in insertion order.
    #[must_use]
    pub fn request_params(&self) -> &[(String, String)] {
        &self.request_params
    }

    /// Stores a value for the transport that is never sent on the wire.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: Argument) {
        self.attributes.insert(name.into(), value);
    }

    /// The attributes collected so far.
    #[must_use]
    pub fn attributes(&self) -> &HashMap<String, Argument> {
        &self.attributes
    }

    /// Sets a concrete body.
    pub fn set_body_value(&mut self, body: RequestBody) {
        self.body = body;
    }

    /// Sets an asynchronous body that the transport consumes.
    pub fn set_body_publisher(&mut self, publisher: Publisher) {
        self.body = RequestBody::Publisher(publisher);
    }

    /// The body set so far.
    #[must_use]
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Assembles the final request.
    ///
    /// Path variables are percent-encoded and substituted into the template,
    /// request parameters become a form body (for form content types with no
    /// explicit body) or a query string, and a URL override replaces the
    /// expanded template. A request with no verb defaults to `GET`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::MissingPathVariable`] if the template
    /// references a variable that was never set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use httpsvc::request::HttpRequestValues;
    /// use http::Method;
    ///
    /// let mut values = HttpRequestValues::with_template(Method::GET, "/users/{id}/posts");
    /// values.set_uri_variable("id", "a b");
    /// values.add_request_param("page", "2");
    ///
    /// let request = values.build().unwrap();
    /// assert_eq!(request.url, "/users/a%20b/posts?page=2");
    /// ```
    pub fn build(self) -> Result<HttpRequest, ResolutionError> {
        let Self {
            method,
            uri_template,
            url,
            uri_variables,
            headers,
            cookies,
            request_params,
            attributes,
            mut body,
        } = self;

        let is_form = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_URLENCODED));

        let mut query = None;
        if !request_params.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&request_params)
                .finish();
            if is_form && body.is_empty() {
                body = RequestBody::Bytes(Bytes::from(encoded));
            } else {
                query = Some(encoded);
            }
        }

        let url = match url {
            Some(mut url) => {
                if query.is_some() {
                    url.query_pairs_mut().extend_pairs(&request_params);
                }
                url.to_string()
            }
            None => {
                let mut expanded = expand_template(&uri_template, &uri_variables)?;
                if let Some(query) = query {
                    expanded.push(if expanded.contains('?') { '&' } else { '?' });
                    expanded.push_str(&query);
                }
                expanded
            }
        };

        Ok(HttpRequest {
            method: method.unwrap_or(Method::GET),
            url,
            headers,
            cookies,
            attributes,
            body,
        })
    }
}

/// Substitutes every `{name}` (or `{name:pattern}`) in `template`.
fn expand_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, ResolutionError> {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            expanded.push_str(&rest[start..]);
            return Ok(expanded);
        };
        let expression = &after[..end];
        let name = expression.split_once(':').map_or(expression, |(name, _)| name).trim();
        let value = variables
            .get(name)
            .ok_or_else(|| ResolutionError::MissingPathVariable {
                name: name.to_string(),
            })?;
        expanded.extend(utf8_percent_encode(value, PATH_SEGMENT));
        rest = &after[end + 1..];
    }

    expanded.push_str(rest);
    Ok(expanded)
}

/// A fully built request, ready for an [`HttpExchangeAdapter`](crate::transport::HttpExchangeAdapter).
#[derive(Debug)]
pub struct HttpRequest {
    /// The verb.
    pub method: Method,
    /// The target URL, absolute or relative to the transport's base URL.
    pub url: String,
    /// Headers to send.
    pub headers: HeaderMap,
    /// Cookies to send, in order.
    pub cookies: Vec<(String, String)>,
    /// Transport-only metadata, never sent on the wire.
    pub attributes: HashMap<String, Argument>,
    /// The body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// Renders the cookies as a single `Cookie` header value.
    ///
    /// ```rust
    /// use httpsvc::request::HttpRequestValues;
    /// use http::Method;
    ///
    /// let mut values = HttpRequestValues::with_template(Method::GET, "/");
    /// values.add_cookie("session", "abc");
    /// values.add_cookie("theme", "dark");
    /// let request = values.build().unwrap();
    ///
    /// assert_eq!(request.cookie_header().as_deref(), Some("session=abc; theme=dark"));
    /// ```
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }

    /// Returns the first value of a header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_variable_replaced_once() {
        let mut values = HttpRequestValues::with_template(Method::GET, "/a/{id}/b/{id}");
        values.set_uri_variable("id", "7");
        let request = values.build().unwrap();
        assert_eq!(request.url, "/a/7/b/7");
    }

    #[test]
    fn test_path_variable_not_reexpanded() {
        let mut values = HttpRequestValues::with_template(Method::GET, "/a/{x}");
        values.set_uri_variable("x", "{y}");
        values.set_uri_variable("y", "nope");
        let request = values.build().unwrap();
        assert_eq!(request.url, "/a/%7By%7D");
    }

    #[test]
    fn test_path_variable_with_pattern() {
        let mut values = HttpRequestValues::with_template(Method::GET, "/files/{name:.+}");
        values.set_uri_variable("name", "a/b");
        assert_eq!(values.build().unwrap().url, "/files/a%2Fb");
    }

    #[test]
    fn test_missing_path_variable() {
        let values = HttpRequestValues::with_template(Method::GET, "/users/{id}");
        assert_eq!(
            values.build().unwrap_err(),
            ResolutionError::MissingPathVariable {
                name: "id".to_string()
            }
        );
    }

    #[test]
    fn test_query_appended_to_existing_query() {
        let mut values = HttpRequestValues::with_template(Method::GET, "/search?lang=en");
        values.add_request_param("q", "rust lang");
        values.add_request_param("q", "tokio");
        assert_eq!(
            values.build().unwrap().url,
            "/search?lang=en&q=rust+lang&q=tokio"
        );
    }

    #[test]
    fn test_form_body_from_params() {
        let mut values = HttpRequestValues::with_template(Method::POST, "/login");
        values.add_header("content-type", FORM_URLENCODED).unwrap();
        values.add_request_param("user", "bob");
        values.add_request_param("pass", "s&cret");
        let request = values.build().unwrap();
        assert_eq!(request.url, "/login");
        assert_eq!(
            request.body.to_bytes(),
            Some(Bytes::from_static(b"user=bob&pass=s%26cret"))
        );
    }

    #[test]
    fn test_form_with_explicit_body_uses_query() {
        let mut values = HttpRequestValues::with_template(Method::POST, "/upload");
        values.add_header("content-type", FORM_URLENCODED).unwrap();
        values.set_body_value(RequestBody::Bytes(Bytes::from_static(b"a=1")));
        values.add_request_param("b", "2");
        let request = values.build().unwrap();
        assert_eq!(request.url, "/upload?b=2");
        assert_eq!(request.body.to_bytes(), Some(Bytes::from_static(b"a=1")));
    }

    #[test]
    fn test_url_override_replaces_template() {
        let mut values = HttpRequestValues::with_template(Method::GET, "/users/{id}");
        values.set_url(Url::parse("https://other.example.com/x").unwrap());
        values.add_request_param("k", "v");
        let request = values.build().unwrap();
        assert_eq!(request.url, "https://other.example.com/x?k=v");
    }

    #[test]
    fn test_repeated_headers() {
        let mut values = HttpRequestValues::new();
        values.add_header("x-tag", "a").unwrap();
        values.add_header("x-tag", "b").unwrap();
        let request = values.build().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.headers.get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn test_invalid_header() {
        let mut values = HttpRequestValues::new();
        assert!(matches!(
            values.add_header("bad header", "v"),
            Err(ResolutionError::InvalidHeader { .. })
        ));
        assert!(values.add_header("x-ok", "line\nbreak").is_err());
    }

    #[test]
    fn test_no_cookie_header_without_cookies() {
        let request = HttpRequestValues::new().build().unwrap();
        assert!(request.cookie_header().is_none());
    }
}
