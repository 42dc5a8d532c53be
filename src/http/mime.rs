//! MIME type detection based on file extensions.
//!
//! The server distinguishes exactly two content types: JPEG images, and
//! HTML, which doubles as the default for everything else.

/// Content type for a resolved file path.
///
/// `image/jpeg` iff the path ends in `.jpg` or `.jpeg` (case-sensitive),
/// `text/html` otherwise.
pub fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "text/html"
    }
}
