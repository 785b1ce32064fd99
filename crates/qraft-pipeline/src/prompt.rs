//! Narrative and prompt synthesis from a style profile.

use crate::types::{ArtPrompt, BrandSummary, StyleProfile};

/// Upper bound on prompt length, in characters.
const PROMPT_MAX_CHARS: usize = 120;

/// How many palette entries the prompt mentions.
const PROMPT_COLOR_COUNT: usize = 3;

/// Write a short narrative of the brand's visual identity.
#[must_use]
pub fn summarize_brand(brand_name: &str, style: &StyleProfile) -> BrandSummary {
    let keywords = style.keywords.join(", ");
    let colors = style.colors.join(", ");
    let narrative = format!(
        "{brand_name} presents a {keywords} visual identity. \
         Its palette centers on {colors}. \
         The overall impression is cohesive and instantly recognizable."
    );
    BrandSummary { narrative }
}

/// Craft the image-generation prompt from the researched style.
///
/// Comma-separated keyword phrases, truncated to 120 characters.
#[must_use]
pub fn craft_prompt(brand_name: &str, style: &StyleProfile) -> ArtPrompt {
    let keywords = style.keywords.join(" ");
    let colors = style
        .colors
        .iter()
        .take(PROMPT_COLOR_COUNT)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let text = format!(
        "artistic qr code for {brand_name}, {keywords} style, palette {colors}, scannable, high contrast"
    );
    ArtPrompt {
        text: truncate_chars(&text, PROMPT_MAX_CHARS),
    }
}

/// Fixed degraded-path prompt, parameterized only by the brand name.
#[must_use]
pub fn degraded_prompt(brand_name: &str) -> ArtPrompt {
    ArtPrompt {
        text: format!(
            "artistic qr code for {brand_name}, modern professional style, \
             clean minimalist design, scannable, high contrast"
        ),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
