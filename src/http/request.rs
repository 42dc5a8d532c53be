/// HTTP request methods.
///
/// The server only speaks GET. Any other token on the request line fails
/// method lookup, and the request is dropped without a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
}

/// A parsed request line.
///
/// Carries exactly the data the routing rules consume: the method and the
/// raw request path. Header lines are never parsed and request bodies are
/// ignored, so neither is represented here.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (always GET today)
    pub method: Method,
    /// The request path as the client sent it (e.g., "/index.html")
    pub path: String,
}

impl Method {
    /// Parses an HTTP method token from the request line.
    ///
    /// Matching is case-sensitive: `get` is not a method.
    ///
    /// # Example
    ///
    /// ```
    /// # use staticd::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }
}
