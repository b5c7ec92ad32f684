//! Drill media conventions shared by uploaders and the proxy: accepted
//! types, size limit, object naming and proxy URLs.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{BlobError, BlobResult};

/// Route prefix the proxy is mounted under.
pub const DEFAULT_MEDIA_MOUNT: &str = "/api/media";

pub const ALLOWED_VIDEO_TYPES: &[&str] = &["video/mp4", "video/quicktime", "video/x-m4v", "video/webm"];

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// 100MB, matching the storage bucket limit.
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
}

impl MediaType {
    /// `video/*` is video, everything else is treated as an image.
    pub fn from_mime(mime: &str) -> Self {
        if mime.trim().to_ascii_lowercase().starts_with("video/") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_VIDEO_TYPES.contains(&mime) || ALLOWED_IMAGE_TYPES.contains(&mime)
}

/// Check an upload against the bucket's type and size rules.
pub fn validate_upload(mime: &str, size: u64) -> BlobResult<()> {
    if size > MAX_FILE_SIZE {
        return Err(BlobError::invalid(format!(
            "File size exceeds {}MB limit",
            MAX_FILE_SIZE / (1024 * 1024)
        )));
    }

    if !is_allowed_mime(mime) {
        let allowed: Vec<&str> = ALLOWED_VIDEO_TYPES
            .iter()
            .chain(ALLOWED_IMAGE_TYPES.iter())
            .copied()
            .collect();
        return Err(BlobError::invalid(format!(
            "File type \"{}\" is not allowed. Allowed types: {}",
            mime,
            allowed.join(", ")
        )));
    }

    Ok(())
}

/// `{user}/{timestamp}_{id}_{name}` with the name reduced to `[A-Za-z0-9._-]`.
pub fn object_path(user_id: &str, file_name: &str, timestamp_ms: i64, id: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}/{}_{}_{}", user_id, timestamp_ms, id, sanitized)
}

/// [`object_path`] stamped with the current time and a random id.
pub fn new_object_path(user_id: &str, file_name: &str) -> String {
    object_path(
        user_id,
        file_name,
        chrono::Utc::now().timestamp_millis(),
        &Uuid::new_v4().to_string(),
    )
}

/// URL under which the proxy mounted at `mount` serves `bucket/path`.
///
/// Safari refuses to play video from URLs without a file extension, so a
/// missing one is logged.
pub fn proxy_media_url(api_base: &str, mount: &str, bucket: &str, path: &str) -> String {
    let clean_path = path.trim_start_matches('/');

    if !has_file_extension(clean_path) {
        warn!(
            path = clean_path,
            "media path has no file extension; Safari may fail to play it"
        );
    }

    format!(
        "{}/{}/{}/{}",
        api_base.trim_end_matches('/'),
        mount_segment(mount),
        bucket,
        clean_path
    )
}

/// Whether `url` points at the proxy mounted at `mount`.
pub fn is_proxy_media_url(url: &str, mount: &str) -> bool {
    url.contains(&format!("/{}/", mount_segment(mount)))
}

fn mount_segment(mount: &str) -> &str {
    match mount.trim().trim_matches('/') {
        "" => DEFAULT_MEDIA_MOUNT.trim_start_matches('/'),
        trimmed => trimmed,
    }
}

fn has_file_extension(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((_, ext)) => !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_follows_mime_family() {
        assert_eq!(MediaType::from_mime("video/mp4"), MediaType::Video);
        assert_eq!(MediaType::from_mime("Video/QuickTime"), MediaType::Video);
        assert_eq!(MediaType::from_mime("image/png"), MediaType::Image);
        assert_eq!(MediaType::from_mime("application/octet-stream"), MediaType::Image);
    }

    #[test]
    fn upload_validation() {
        assert!(validate_upload("video/mp4", 1024).is_ok());
        assert!(validate_upload("image/webp", MAX_FILE_SIZE).is_ok());

        let too_big = validate_upload("video/mp4", MAX_FILE_SIZE + 1).unwrap_err();
        assert!(too_big.to_string().contains("100MB"));

        let wrong_type = validate_upload("application/pdf", 10).unwrap_err();
        assert!(wrong_type.to_string().contains("application/pdf"));
    }

    #[test]
    fn object_paths_are_sanitized() {
        assert_eq!(
            object_path("user-1", "My Drill (final).mp4", 1700000000000, "abc"),
            "user-1/1700000000000_abc_My_Drill__final_.mp4"
        );
    }

    #[test]
    fn fresh_object_paths_are_unique() {
        let a = new_object_path("u", "clip.mp4");
        let b = new_object_path("u", "clip.mp4");
        assert!(a.starts_with("u/"));
        assert!(a.ends_with("_clip.mp4"));
        assert_ne!(a, b);
    }

    #[test]
    fn proxy_urls() {
        let url = proxy_media_url("http://localhost:3000/", DEFAULT_MEDIA_MOUNT, "drills", "/abc123/clip.mp4");
        assert_eq!(url, "http://localhost:3000/api/media/drills/abc123/clip.mp4");
        assert!(is_proxy_media_url(&url, DEFAULT_MEDIA_MOUNT));
        assert!(!is_proxy_media_url(
            "https://abc.supabase.co/storage/v1/object/sign/x",
            DEFAULT_MEDIA_MOUNT
        ));
    }

    #[test]
    fn proxy_urls_follow_configured_mount() {
        let url = proxy_media_url("https://api.example.com", "/media/", "drills", "clip.mp4");
        assert_eq!(url, "https://api.example.com/media/drills/clip.mp4");
        assert!(is_proxy_media_url(&url, "/media"));
        assert!(!is_proxy_media_url(&url, DEFAULT_MEDIA_MOUNT));

        let fallback = proxy_media_url("https://api.example.com", "", "drills", "clip.mp4");
        assert_eq!(fallback, "https://api.example.com/api/media/drills/clip.mp4");
    }

    #[test]
    fn extension_detection() {
        assert!(has_file_extension("abc/clip.mp4"));
        assert!(!has_file_extension("abc/clip"));
        assert!(!has_file_extension("abc.d/clip"));
        assert!(!has_file_extension("clip."));
    }
}
