//! Result-quality gate for generation output.
//!
//! Generation providers answer transport-successfully with strings that are
//! sometimes placeholders or refusals rather than artifact references. The
//! gate decides whether a returned value is an acceptable image reference;
//! everything else routes the orchestrator to the degraded path.

/// Hosts whose URLs are always treated as image references.
const IMAGE_HOST_MARKERS: [&str; 1] = ["replicate.delivery"];

/// File extensions recognized as image references.
const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".webp"];

/// Placeholder/refusal phrases that mark a non-answer. Matched
/// case-insensitively as substrings.
const NON_ANSWER_MARKERS: [&str; 4] = [
    "awaiting",
    "please provide",
    "will be displayed",
    "url to the generated",
];

/// Gate classification of a generation result value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A usable artifact reference.
    Accepted,
    /// A recognized placeholder or refusal phrase.
    NonAnswer,
    /// Neither a usable reference nor a recognized placeholder. Treated
    /// like a non-answer by the orchestrator.
    Unrecognized,
}

/// Classify a generation result value.
///
/// A value is accepted when it parses as an http(s) URL; a known
/// image-host fragment or image file extension makes it unambiguous, and
/// any other well-formed http(s) URL is accepted permissively. Values that
/// match a placeholder phrase are non-answers; anything else is
/// unrecognized, which the orchestrator treats identically.
#[must_use]
pub fn classify_artifact(value: &str) -> Verdict {
    let trimmed = value.trim();

    if let Ok(url) = reqwest::Url::parse(trimmed) {
        if matches!(url.scheme(), "http" | "https") {
            let lowered = trimmed.to_lowercase();
            if IMAGE_HOST_MARKERS.iter().any(|m| lowered.contains(m))
                || IMAGE_EXTENSIONS.iter().any(|e| lowered.ends_with(e))
            {
                return Verdict::Accepted;
            }
            // Any well-formed http(s) URL passes the permissive check.
            return Verdict::Accepted;
        }
    }

    let lowered = trimmed.to_lowercase();
    if NON_ANSWER_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Verdict::NonAnswer;
    }

    Verdict::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_url_with_png_extension() {
        assert_eq!(
            classify_artifact("https://cdn.example.com/img/acme123.png"),
            Verdict::Accepted
        );
    }

    #[test]
    fn accepts_known_image_host_without_extension() {
        assert_eq!(
            classify_artifact("https://replicate.delivery/pbxt/abc123"),
            Verdict::Accepted
        );
    }

    #[test]
    fn accepts_any_well_formed_https_url() {
        assert_eq!(
            classify_artifact("https://images.example.org/render?id=42"),
            Verdict::Accepted
        );
    }

    #[test]
    fn classifies_awaiting_placeholder_as_non_answer() {
        assert_eq!(
            classify_artifact("Awaiting the QR code URL, please provide more details"),
            Verdict::NonAnswer
        );
    }

    #[test]
    fn classifies_described_url_as_non_answer() {
        assert_eq!(
            classify_artifact("The URL to the generated QR code will be displayed here"),
            Verdict::NonAnswer
        );
    }

    #[test]
    fn placeholder_matching_is_case_insensitive() {
        assert_eq!(
            classify_artifact("PLEASE PROVIDE the brand details first"),
            Verdict::NonAnswer
        );
    }

    #[test]
    fn non_http_scheme_is_not_accepted() {
        assert_eq!(
            classify_artifact("ftp://files.example.com/qr.png"),
            Verdict::Unrecognized
        );
    }

    #[test]
    fn free_text_is_unrecognized() {
        assert_eq!(
            classify_artifact("a beautiful QR code in brand colors"),
            Verdict::Unrecognized
        );
    }
}
