use bytes::Bytes;

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): File found and sent
/// - `BadRequest` (400): Request line could not be parsed
/// - `NotFound` (404): No servable file at that path
/// - `MethodNotAllowed` (405): Anything other than GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

/// A complete HTTP response ready to be framed and sent.
///
/// Headers are not free-form: every response carries exactly
/// `Content-Type`, `Content-Length` and `Connection: close`, and the
/// length is always taken from `body`.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Value of the Content-Type header
    pub content_type: &'static str,
    /// Response body as bytes
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// 200 OK carrying file contents.
    pub fn ok(content_type: &'static str, body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::Ok, content_type, body)
    }

    /// 400 Bad Request for an unparsable request line.
    pub fn bad_request() -> Self {
        Self::error_page(StatusCode::BadRequest, b"<h1>400 Bad Request</h1>")
    }

    /// 404 Not Found.
    pub fn not_found() -> Self {
        Self::error_page(StatusCode::NotFound, b"<h1>404 Not Found</h1>")
    }

    /// 405 Method Not Allowed.
    pub fn method_not_allowed() -> Self {
        Self::error_page(
            StatusCode::MethodNotAllowed,
            b"<h1>405 Method Not Allowed</h1>",
        )
    }

    fn error_page(status: StatusCode, page: &'static [u8]) -> Self {
        Self::new(status, "text/html", Bytes::from_static(page))
    }

    /// Value sent in the Content-Length header.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}
