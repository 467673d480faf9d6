use std::path::Path;

use uuid::Uuid;

const MAX_EXTENSION_CHARS: usize = 10;
const MAX_ORIGINAL_NAME_CHARS: usize = 255;
/// Width of the `file.content_type` column.
pub const MAX_CONTENT_TYPE_CHARS: usize = 128;

/// Lower-cased alphanumeric extension of `file_name`, if any.
pub fn sanitized_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    let clean: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_EXTENSION_CHARS)
        .collect::<String>()
        .to_ascii_lowercase();
    if clean.is_empty() { None } else { Some(clean) }
}

/// A fresh storage key: `<uuid>` or `<uuid>.<ext>`.
pub fn stored_name(file_name: &str) -> String {
    match sanitized_extension(file_name) {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

/// Base name of a client-supplied file name with control characters removed.
pub fn sanitize_original_name(file_name: &str) -> String {
    let base = file_name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(file_name);
    let clean: String = base
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_ORIGINAL_NAME_CHARS)
        .collect();
    let clean = clean.trim();
    if clean.is_empty() { "file".to_string() } else { clean.to_string() }
}

/// Essence (`type/subtype`, parameters dropped) of the declared content type,
/// or a guess from the name when the declaration is missing, generic or unusable.
pub fn resolve_content_type(file_name: &str, declared: Option<&str>) -> String {
    let declared = declared
        .and_then(|ct| ct.trim().parse::<mime_guess::Mime>().ok())
        .map(|m| m.essence_str().to_ascii_lowercase())
        .filter(|ct| ct.len() <= MAX_CONTENT_TYPE_CHARS && ct != "application/octet-stream");
    match declared {
        Some(ct) => ct,
        None => mime_guess::from_path(file_name).first_or_octet_stream().essence_str().to_string(),
    }
}
