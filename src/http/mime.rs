//! MIME type detection module
//!
//! Two lookups are layered when describing a served file:
//! - the server-wide extension table ([`get_content_type`]), exact lowercase match
//! - the image fallback map ([`fallback_content_type`]), case-insensitive
//!
//! When neither yields a type, no `Content-Type` header is sent at all.

use std::path::Path;

/// Look up a Content-Type in the server-wide extension table
///
/// Extensions are matched exactly as given (no case folding).
///
/// # Examples
/// ```
/// use image_resource_server::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), Some("text/html; charset=utf-8"));
/// assert_eq!(get_content_type(Some("PNG")), None);
/// assert_eq!(get_content_type(None), None);
/// ```
pub fn get_content_type(extension: Option<&str>) -> Option<&'static str> {
    let content_type = match extension? {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",

        "js" | "mjs" => "application/javascript",
        "json" => "application/json",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",

        "pdf" => "application/pdf",
        "zip" => "application/zip",

        _ => return None,
    };
    Some(content_type)
}

/// Built-in image types consulted when the server table has no answer
///
/// `extension` is the dotted suffix (e.g. `.PNG`), compared case-insensitively.
pub fn fallback_content_type(extension: &str) -> Option<&'static str> {
    const DEFAULTS: [(&str, &str); 4] = [
        (".gif", "image/gif"),
        (".jpeg", "image/jpeg"),
        (".jpg", "image/jpeg"),
        (".png", "image/png"),
    ];

    DEFAULTS
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, content_type)| *content_type)
}

/// Resolve the media type of a file path
///
/// The server table is asked first; otherwise the suffix starting at the last
/// `.` of the path is looked up in the fallback map.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension().and_then(|e| e.to_str());
    if let Some(content_type) = get_content_type(extension) {
        return Some(content_type);
    }

    let path = path.to_str()?;
    let index = path.rfind('.')?;
    fallback_content_type(&path[index..])
}
