//! Filename sanitization and extension detection for fetched media.

use std::path::{Component, Path};

use url::Url;

/// Longest stem kept for an on-disk name, in UTF-8 bytes.
///
/// Leaves room for a `_NNNN` suffix and an extension under the usual
/// 255-byte name limit.
const MAX_STEM_BYTES: usize = 200;

/// Longest accepted extension, including the dot.
const MAX_EXTENSION_LEN: usize = 12;

/// Sanitizes a media title into a filename stem.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and control characters), trims surrounding whitespace
/// and dots, and caps the length at [`MAX_STEM_BYTES`] on a character
/// boundary. Returns `"download"` when nothing is left.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len().min(MAX_STEM_BYTES));
    for c in name.chars().map(|c| match c {
        '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
        c if c.is_control() => '_',
        c => c,
    }) {
        if sanitized.len() + c.len_utf8() > MAX_STEM_BYTES {
            break;
        }
        sanitized.push(c);
    }
    let trimmed = sanitized.trim().trim_matches('.').trim();

    if trimmed.is_empty() || !is_safe_filename_segment(trimmed) {
        return "download".to_string();
    }
    trimmed.to_string()
}

fn is_safe_filename_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Extension (with leading dot, lowercased) from the URL's last path segment.
pub(crate) fn extension_from_url(url: &Url) -> Option<String> {
    let last_segment = url.path_segments()?.next_back()?;
    let dot_index = last_segment.rfind('.')?;
    let ext = &last_segment[dot_index..];
    if ext.len() <= 1
        || ext.len() > MAX_EXTENSION_LEN
        || !ext[1..].chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Guess file extension from Content-Type header.
pub(crate) fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    let ext = match mime.as_str() {
        "video/mp4" => ".mp4",
        "video/webm" => ".webm",
        "video/quicktime" => ".mov",
        "video/x-matroska" => ".mkv",
        "video/mp2t" => ".ts",
        "audio/mpeg" => ".mp3",
        "audio/mp4" => ".m4a",
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "application/zip" => ".zip",
        "application/pdf" => ".pdf",
        _ => return None,
    };
    Some(ext)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_removes_invalid_chars() {
        assert_eq!(sanitize_filename("part 1/2"), "part 1_2");
        assert_eq!(sanitize_filename("a\\b:c*d?e\"f<g>h|i"), "a_b_c_d_e_f_g_h_i");
        assert_eq!(sanitize_filename("tab\there"), "tab_here");
    }

    #[test]
    fn test_sanitize_filename_preserves_unicode() {
        assert_eq!(sanitize_filename("Séance d'été (1)"), "Séance d'été (1)");
    }

    #[test]
    fn test_sanitize_filename_rewrites_dot_segments() {
        assert_eq!(sanitize_filename("."), "download");
        assert_eq!(sanitize_filename(".."), "download");
        assert_eq!(sanitize_filename("   "), "download");
        assert_eq!(sanitize_filename(""), "download");
    }

    #[test]
    fn test_sanitize_filename_caps_length() {
        assert_eq!(sanitize_filename(&"x".repeat(500)).len(), 200);
    }

    #[test]
    fn test_sanitize_filename_caps_multibyte_titles_in_bytes() {
        // 100 three-byte characters would be 300 bytes uncapped.
        let name = sanitize_filename(&"東".repeat(100));
        assert!(name.len() <= MAX_STEM_BYTES, "stem is {} bytes", name.len());
        assert_eq!(name, "東".repeat(66));

        // A four-byte character straddling the cap is dropped whole.
        let name = sanitize_filename(&format!("{}🎬tail", "a".repeat(198)));
        assert_eq!(name, "a".repeat(198));
    }

    #[test]
    fn test_extension_from_url() {
        let url = Url::parse("https://cdn.example.com/v1/HD.MP4?token=abc").unwrap();
        assert_eq!(extension_from_url(&url).as_deref(), Some(".mp4"));
    }

    #[test]
    fn test_extension_from_url_rejects_odd_suffixes() {
        let url = Url::parse("https://cdn.example.com/download/").unwrap();
        assert_eq!(extension_from_url(&url), None);
        let url = Url::parse("https://cdn.example.com/file.").unwrap();
        assert_eq!(extension_from_url(&url), None);
        let url = Url::parse("https://cdn.example.com/v1.2-final").unwrap();
        assert_eq!(extension_from_url(&url), None);
    }

    #[test]
    fn test_extension_from_content_type() {
        assert_eq!(extension_from_content_type("video/mp4"), Some(".mp4"));
        assert_eq!(
            extension_from_content_type("Video/WebM; codecs=vp9"),
            Some(".webm")
        );
        assert_eq!(extension_from_content_type("application/octet-stream"), None);
    }
}
