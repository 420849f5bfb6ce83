//! Destination file names and MIME types.

/// MIME type for extracted raw previews and re-encoded JPEGs.
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_WEBP: &str = "image/webp";
pub const MIME_GIF: &str = "image/gif";
pub const MIME_ICO: &str = "image/x-icon";
/// MIME type for encoded MP3 streams.
pub const MIME_MP3: &str = "audio/mpeg";
/// MIME type for WAV containers.
pub const MIME_WAV: &str = "audio/wav";

/// Derive the name to save a converted file under.
///
/// If `source` ends with one of `from_exts` (compared case-insensitively,
/// each given with its leading dot), that suffix is replaced by `to_ext`.
/// Otherwise `to_ext` is appended so the output never reuses the source name.
///
/// # Example
///
/// ```ignore
/// assert_eq!(output_file_name("IMG_0001.CR2", &[".cr2"], ".jpg"), "IMG_0001.jpg");
/// ```
pub fn output_file_name(source: &str, from_exts: &[&str], to_ext: &str) -> String {
    for ext in from_exts {
        if let Some(stem) = strip_suffix_ignore_case(source, ext) {
            return format!("{stem}{to_ext}");
        }
    }
    format!("{source}{to_ext}")
}

/// Lowercased extension of `file_name` without the dot, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = name.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}
