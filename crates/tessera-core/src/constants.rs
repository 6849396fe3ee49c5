//! Media type, charset and encoding constants.
//!
//! Header names come from [`http::header`]; only values live here.

pub use http::header;

/// `text/html`
pub const CONTENT_HTML: &str = "text/html";
/// `text/plain`
pub const CONTENT_PLAIN: &str = "text/plain";
/// `text/css`
pub const CONTENT_CSS: &str = "text/css";
/// `text/csv`
pub const CONTENT_CSV: &str = "text/csv";
/// `text/event-stream`
pub const CONTENT_EVENT_STREAM: &str = "text/event-stream";
/// `application/json`
pub const CONTENT_JSON: &str = "application/json";
/// `application/xml`
pub const CONTENT_XML: &str = "application/xml";
/// `application/x-www-form-urlencoded`
pub const CONTENT_FORM: &str = "application/x-www-form-urlencoded";
/// `application/javascript`
pub const CONTENT_JAVASCRIPT: &str = "application/javascript";
/// `application/octet-stream`
pub const CONTENT_OCTET_STREAM: &str = "application/octet-stream";
/// `application/pdf`
pub const CONTENT_PDF: &str = "application/pdf";
/// `application/zip`
pub const CONTENT_ZIP: &str = "application/zip";
/// `multipart/form-data`
pub const CONTENT_MULTIPART: &str = "multipart/form-data";

/// `image/svg+xml`
pub const CONTENT_SVG: &str = "image/svg+xml";
/// `image/png`
pub const CONTENT_PNG: &str = "image/png";
/// `image/jpeg`
pub const CONTENT_JPEG: &str = "image/jpeg";
/// `image/gif`
pub const CONTENT_GIF: &str = "image/gif";
/// `image/webp`
pub const CONTENT_WEBP: &str = "image/webp";
/// `image/x-icon`
pub const CONTENT_ICO: &str = "image/x-icon";

/// `charset=utf-8`
pub const CHARSET_UTF8: &str = "charset=utf-8";
/// `charset=utf-16`
pub const CHARSET_UTF16: &str = "charset=utf-16";
/// `charset=us-ascii`
pub const CHARSET_ASCII: &str = "charset=us-ascii";

/// `text/plain; charset=utf-8`, used by the text helpers.
pub const CONTENT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
/// `text/html; charset=utf-8`
pub const CONTENT_HTML_UTF8: &str = "text/html; charset=utf-8";

/// `gzip`
pub const ENCODING_GZIP: &str = "gzip";
/// `deflate`
pub const ENCODING_DEFLATE: &str = "deflate";
/// `br`
pub const ENCODING_BROTLI: &str = "br";
/// `zstd`
pub const ENCODING_ZSTD: &str = "zstd";
/// `identity` (no encoding)
pub const ENCODING_IDENTITY: &str = "identity";

/// `*/*`
pub const ACCEPT_ALL: &str = "*/*";
/// `text/html`
pub const ACCEPT_HTML: &str = CONTENT_HTML;
/// `application/json`
pub const ACCEPT_JSON: &str = CONTENT_JSON;
/// `application/xml`
pub const ACCEPT_XML: &str = CONTENT_XML;
/// `text/plain`
pub const ACCEPT_PLAIN: &str = CONTENT_PLAIN;

/// Body of the default not-found response.
pub const NOT_FOUND_BODY: &str = "404 page not found";

/// Default cap on idle pooled contexts.
pub const DEFAULT_POOL_MAX_IDLE: usize = 1024;
