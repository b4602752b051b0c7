//! File extension ↔ MIME type sniffing.
//!
//! A static table covering the attachment types a message thread actually
//! carries. Unknown extensions map to `application/octet-stream`.

const FALLBACK_MIME: &str = "application/octet-stream";

const EXTENSIONS: &[(&str, &str)] = &[
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("wav", "audio/wav"),
    ("amr", "audio/amr"),
    ("ogg", "audio/ogg"),
    ("caf", "audio/x-caf"),
    // Video
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("m4v", "video/x-m4v"),
    ("3gp", "video/3gpp"),
    // Documents
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    ("json", "application/json"),
    ("smil", "application/smil+xml"),
    ("vcf", "text/vcard"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("html", "text/html"),
];

/// MIME type for a file extension (case-insensitive, leading dot allowed).
pub fn mime_for_extension(extension: &str) -> &'static str {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME)
}

/// Extension of the last path segment of a URL or path, without query or fragment.
pub fn extension_of(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = last_segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// MIME type for a URL, based on its extension.
pub fn mime_for_url(url: &str) -> &'static str {
    extension_of(url)
        .map(mime_for_extension)
        .unwrap_or(FALLBACK_MIME)
}

pub fn is_image(mime: &str) -> bool {
    essence(mime).starts_with("image/")
}

pub fn is_audio_extension(extension: &str) -> bool {
    mime_for_extension(extension).starts_with("audio/")
}

pub fn is_application(mime: &str) -> bool {
    essence(mime).starts_with("application/")
}

/// Strips parameters (`; charset=...`) and normalizes case.
fn essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
