/// HTTP status codes supported by the server.
///
/// Exactly three appear on the wire:
/// - `Ok` (200): the resolved file was read and is being served
/// - `MovedPermanently` (301): the fixed redirect
/// - `NotFound` (404): the lookup failed and the fallback page is served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use staticd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::MovedPermanently.as_u16(), 301);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::MovedPermanently => 301,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use staticd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// Headers keep their insertion order, so the serialized header block is
/// deterministic and reads in the order the builders pushed.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers in emission order
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(content)
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Appends a header. Headers are emitted in the order they are added.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Appends a Content-Length header based on body size if none was set
    /// explicitly.
    pub fn build(mut self) -> Response {
        if !self.headers.iter().any(|(key, _)| key == "Content-Length") {
            self.headers
                .push(("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// The fixed 301 response: a Location header and no body.
    pub fn redirect(location: &str) -> Self {
        ResponseBuilder::new(StatusCode::MovedPermanently)
            .header("Location", location)
            .header("Content-Length", "0")
            .header("Connection", "close")
            .build()
    }

    /// A 200 response carrying file content verbatim.
    pub fn file(content_type: &str, content: Vec<u8>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type)
            .header("Content-Length", content.len().to_string())
            .header("Connection", "close")
            .body(content)
            .build()
    }

    /// The 404 response wrapping the fallback page's bytes.
    pub fn not_found(fallback: Vec<u8>) -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .header("Content-Type", "text/html")
            .header("Content-Length", fallback.len().to_string())
            .header("Connection", "close")
            .body(fallback)
            .build()
    }
}
