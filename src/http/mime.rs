//! Content-type inference from the extension of a request path.
//!
//! Only three types are known. Everything that is not a JPEG or GIF image is
//! served as HTML, including paths without any extension.

pub const TEXT_HTML: &str = "text/html";
pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_GIF: &str = "image/gif";

/// Extension used when the path contains no `.` at all.
const DEFAULT_EXTENSION: &str = "html";

/// Returns the text after the last `.` in `path`, or `"html"` if there is none.
///
/// The whole path string is searched, so a dot in a directory name counts
/// when the file name has none (`dir.v2/readme` yields `v2/readme`).
///
/// # Example
///
/// ```
/// # use lantern::http::mime::extension_of;
/// assert_eq!(extension_of("images/cat.JPG"), "JPG");
/// assert_eq!(extension_of("README"), "html");
/// assert_eq!(extension_of("archive."), "");
/// ```
pub fn extension_of(path: &str) -> &str {
    match path.rfind('.') {
        Some(idx) => &path[idx + 1..],
        None => DEFAULT_EXTENSION,
    }
}

/// Maps an extension to its MIME type, ignoring ASCII case.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
        IMAGE_JPEG
    } else if ext.eq_ignore_ascii_case("gif") {
        IMAGE_GIF
    } else {
        TEXT_HTML
    }
}

/// Infers the content type of a normalized (leading `/` stripped) path.
pub fn content_type_for(path: &str) -> &'static str {
    content_type_for_extension(extension_of(path))
}
