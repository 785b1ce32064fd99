//! Best-effort local persistence of generated images.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Download `image_url` and write the bytes under `dir`.
///
/// The file name is derived from a SHA-256 of the URL so repeated runs for
/// the same artifact overwrite rather than accumulate. Every failure is
/// logged and swallowed — persistence is for inspection only and must never
/// affect the pipeline result.
pub(crate) async fn persist_image(client: &reqwest::Client, dir: &Path, image_url: &str) {
    let bytes = match client.get(image_url).send().await {
        Ok(response) if response.status().is_success() => match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(url = %image_url, error = %e, "could not read image body; skipping save");
                return;
            }
        },
        Ok(response) => {
            tracing::warn!(
                url = %image_url,
                status = %response.status(),
                "image download returned non-success; skipping save"
            );
            return;
        }
        Err(e) => {
            tracing::warn!(url = %image_url, error = %e, "image download failed; skipping save");
            return;
        }
    };

    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        tracing::warn!(dir = %dir.display(), error = %e, "could not create artifact dir; skipping save");
        return;
    }

    let path = dir.join(format!("{}.png", artifact_stem(image_url)));
    match tokio::fs::write(&path, &bytes).await {
        Ok(()) => tracing::info!(path = %path.display(), "saved generated image"),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not save generated image");
        }
    }
}

/// Stable file stem for an artifact URL: first 16 hex chars of its SHA-256.
fn artifact_stem(image_url: &str) -> String {
    let digest = Sha256::digest(image_url.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_stem_is_stable_and_short() {
        let a = artifact_stem("https://replicate.delivery/pbxt/abc123");
        let b = artifact_stem("https://replicate.delivery/pbxt/abc123");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn artifact_stem_differs_per_url() {
        assert_ne!(
            artifact_stem("https://replicate.delivery/a"),
            artifact_stem("https://replicate.delivery/b")
        );
    }
}
