//! File naming for delivered assets.

/// Map a MIME type to a file extension. Unknown types fall back to `bin`.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}

/// Map a file extension back to a MIME type.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "mov" => Some("video/quicktime"),
        _ => None,
    }
}

/// Download file name for a record: `wallpaper-{id}.{ext}`.
pub fn download_filename(record_id: &str, mime_type: &str) -> String {
    format!("wallpaper-{record_id}.{}", extension_for_mime(mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_mime_types_map_to_extensions() {
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/jpeg; charset=binary"), "jpg");
        assert_eq!(extension_for_mime("VIDEO/MP4"), "mp4");
        assert_eq!(extension_for_mime("application/octet-stream"), "bin");
    }

    #[test]
    fn extension_lookup_is_inverse_for_known_types() {
        for mime in ["image/png", "image/jpeg", "image/webp", "video/mp4"] {
            assert_eq!(mime_for_extension(extension_for_mime(mime)), Some(mime));
        }
    }

    #[test]
    fn download_filename_uses_record_id() {
        assert_eq!(download_filename("abc", "image/png"), "wallpaper-abc.png");
    }
}
