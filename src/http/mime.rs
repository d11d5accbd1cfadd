/// Fallback for anything without a recognised extension.
pub const OCTET_STREAM: &str = "application/octet-stream";

const KNOWN_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".txt", "text/plain"),
];

/// Returns the MIME type for a file path.
///
/// Matching looks for the extension anywhere in the path, not only at the
/// end, and the first entry wins. So `index.htmlx` is served as `text/html`
/// and `data.json` as `application/javascript`.
///
/// # Example
///
/// ```
/// # use lantern::http::mime::content_type;
/// assert_eq!(content_type("index.html"), "text/html");
/// assert_eq!(content_type("archive.tar"), "application/octet-stream");
/// ```
pub fn content_type(path: &str) -> &'static str {
    KNOWN_TYPES
        .iter()
        .find(|(ext, _)| path.contains(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM)
}
