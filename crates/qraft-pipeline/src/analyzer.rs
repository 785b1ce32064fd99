//! Pure text analysis: style keywords and color palettes from scraped pages.

use regex::Regex;

use crate::types::{ScrapedPage, StyleProfile};

/// Descriptor categories checked in declaration order. A category tag is
/// included when any of its trigger substrings occurs in the lowercased
/// input. Declaration order decides which tags survive the cap.
const DESCRIPTOR_CATEGORIES: [(&str, &[&str]); 10] = [
    ("minimalist", &["minimal", "clean", "simple", "uncluttered"]),
    ("modern", &["modern", "contemporary", "sleek", "cutting-edge"]),
    ("elegant", &["elegant", "refined", "sophisticated", "polished"]),
    ("bold", &["bold", "strong", "impactful", "striking"]),
    ("friendly", &["friendly", "warm", "inviting", "approachable"]),
    ("professional", &["professional", "business", "corporate", "formal"]),
    ("innovative", &["innovative", "creative", "forward-thinking", "fresh"]),
    ("dynamic", &["dynamic", "energetic", "vibrant", "lively"]),
    ("premium", &["premium", "luxury", "high-end", "exclusive"]),
    ("playful", &["playful", "fun", "casual", "relaxed"]),
];

/// Derived tags appended after the categories, under their own triggers.
const DERIVED_TAGS: [(&str, &[&str]); 3] = [
    ("geometric", &["geometric", "angular", "sharp"]),
    ("organic", &["organic", "flowing", "curved"]),
    ("dimensional", &["gradient", "shadow", "depth"]),
];

const MAX_KEYWORDS: usize = 6;
const MAX_COLORS: usize = 8;

/// Baseline profile used when extraction yields nothing at all.
const BASELINE_KEYWORDS: [&str; 3] = ["modern", "professional", "clean"];
const BASELINE_COLORS: [&str; 4] = ["#000000", "#ffffff", "#007acc", "#f0f0f0"];

/// Extract a hex color palette from the text of all pages.
///
/// Scans for `#` followed by 3 or 6 hex digits, lowercases each match,
/// deduplicates preserving first-seen order, and truncates to 8 entries.
#[must_use]
pub fn extract_color_palette(pages: &[ScrapedPage]) -> Vec<String> {
    let re = Regex::new(r"#(?:[0-9a-fA-F]{3}){1,2}").expect("valid hex color regex");

    let mut palette: Vec<String> = Vec::new();
    for page in pages {
        for m in re.find_iter(&page.text) {
            let color = m.as_str().to_lowercase();
            if !palette.contains(&color) {
                palette.push(color);
            }
            if palette.len() >= MAX_COLORS {
                return palette;
            }
        }
    }
    palette
}

/// Extract up to 6 visual descriptor tags from free text.
///
/// Checks the ten fixed categories in declaration order, then the three
/// derived tags; the cap is applied after all checks so the first six
/// matches in declaration order win. Matching is case-insensitive
/// substring containment.
#[must_use]
pub fn extract_visual_descriptors(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut descriptors: Vec<String> = Vec::new();

    for (category, triggers) in DESCRIPTOR_CATEGORIES {
        if triggers.iter().any(|t| lowered.contains(t)) {
            descriptors.push(category.to_string());
        }
    }
    for (tag, triggers) in DERIVED_TAGS {
        if triggers.iter().any(|t| lowered.contains(t)) {
            descriptors.push(tag.to_string());
        }
    }

    descriptors.truncate(MAX_KEYWORDS);
    descriptors
}

impl StyleProfile {
    /// Derive a style profile from scraped pages, substituting the fixed
    /// baseline for whichever collection comes back empty.
    #[must_use]
    pub fn from_pages(pages: &[ScrapedPage]) -> Self {
        let combined = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let mut keywords = extract_visual_descriptors(&combined);
        let mut colors = extract_color_palette(pages);

        if keywords.is_empty() {
            keywords = BASELINE_KEYWORDS.iter().map(ToString::to_string).collect();
        }
        if colors.is_empty() {
            colors = BASELINE_COLORS.iter().map(ToString::to_string).collect();
        }

        Self { keywords, colors }
    }
}
