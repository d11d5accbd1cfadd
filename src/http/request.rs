use std::borrow::Cow;

/// HTTP request methods.
///
/// Only GET is served. Every other token is kept as-is so the handler can
/// answer 405 instead of treating an unknown verb as a malformed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// Any other token, verbatim
    Other(String),
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Matching is case-sensitive, so `get` is not GET.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::Other(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request as far as this server cares: the request line.
///
/// Headers and bodies are never read. The path is kept as raw bytes since
/// nothing guarantees a client sends UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, or whatever else was sent)
    pub method: Method,
    /// The request target exactly as sent (e.g., b"/index.html")
    pub path: Vec<u8>,
    /// Protocol token if the client sent one (typically "HTTP/1.1")
    pub version: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            path: path.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Path for display; invalid UTF-8 is replaced.
    pub fn path_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }
}
