//! Deterministic SVG placeholder images
//!
//! Used when no image backend produced a picture. The drawing is a pure
//! function of the scene text: palette from [`theme`], shapes from [`scene`],
//! plus a gradient background, a soft glow and a short caption.

pub mod scene;
pub mod theme;

pub use scene::{compose_scene, Feature};
pub use theme::{resolve_colors, Palette};

use crate::models::ImagePayload;

pub const CANVAS_SIZE: u32 = 400;
pub const LABEL_MAX_CHARS: usize = 40;

/// Case-sensitive substring check; callers lowercase `text` first.
pub(crate) fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Build the placeholder for a scene as an inline SVG payload.
///
/// The story is accepted so the signature matches the image orchestrator,
/// but only the scene text shapes the drawing.
pub fn synthesize_placeholder(scene_idea: &str, _story: &str) -> ImagePayload {
    ImagePayload::svg(&render_svg(scene_idea))
}

/// The caption: at most [`LABEL_MAX_CHARS`] characters, `...` when cut.
pub fn label_text(scene_idea: &str) -> String {
    let mut chars = scene_idea.chars();
    let head: String = chars.by_ref().take(LABEL_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn render_svg(scene_idea: &str) -> String {
    let palette = resolve_colors(scene_idea);

    let elements: String = compose_scene(scene_idea)
        .iter()
        .flat_map(|group| group.shapes.iter())
        .map(|shape| format!("  {}\n", shape.to_svg(&palette)))
        .collect();

    let label = label_text(scene_idea);
    let label = quick_xml::escape::escape(label.as_str());

    format!(
        r#"<svg width="{size}" height="{size}" viewBox="0 0 {size} {size}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="bg" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="{primary}" stop-opacity="1" />
      <stop offset="100%" stop-color="{secondary}" stop-opacity="1" />
    </linearGradient>
    <radialGradient id="glow" cx="50%" cy="50%" r="50%">
      <stop offset="0%" stop-color="white" stop-opacity="0.3" />
      <stop offset="100%" stop-color="white" stop-opacity="0" />
    </radialGradient>
  </defs>
  <rect width="{size}" height="{size}" fill="url(#bg)" />
{elements}  <rect width="{size}" height="{size}" fill="url(#glow)" />
  <text x="200" y="350" font-family="Arial, sans-serif" font-size="14" fill="white" text-anchor="middle" opacity="0.8">{label}</text>
</svg>
"#,
        size = CANVAS_SIZE,
        primary = palette.primary,
        secondary = palette.secondary,
        elements = elements,
        label = label,
    )
}
