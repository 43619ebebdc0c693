//! Scene text to color palette.
//!
//! Rules are evaluated in declaration order and the first rule with a keyword
//! present in the lowercased text wins.

use super::mentions_any;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
}

#[derive(Debug)]
pub struct PaletteRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub palette: Palette,
}

pub const DEFAULT_PALETTE: Palette = Palette {
    primary: "#4fd1c7",
    secondary: "#88d8f7",
    accent: "#a8e6cf",
};

pub const PALETTE_RULES: &[PaletteRule] = &[
    PaletteRule {
        name: "warm",
        keywords: &["sunset", "dawn", "orange", "red"],
        palette: Palette {
            primary: "#ff6b6b",
            secondary: "#ffa726",
            accent: "#ffcc80",
        },
    },
    PaletteRule {
        name: "night",
        keywords: &["night", "dark", "moon", "stars"],
        palette: Palette {
            primary: "#3f51b5",
            secondary: "#1a237e",
            accent: "#7986cb",
        },
    },
    PaletteRule {
        name: "forest",
        keywords: &["forest", "green", "nature", "tree"],
        palette: Palette {
            primary: "#4caf50",
            secondary: "#2e7d32",
            accent: "#a5d6a7",
        },
    },
    PaletteRule {
        name: "ocean",
        keywords: &["ocean", "sea", "water", "blue"],
        palette: Palette {
            primary: "#2196f3",
            secondary: "#0d47a1",
            accent: "#90caf9",
        },
    },
    PaletteRule {
        name: "fire",
        keywords: &["fire", "flame", "hot", "warm"],
        palette: Palette {
            primary: "#f44336",
            secondary: "#d32f2f",
            accent: "#ffab91",
        },
    },
];

/// The first rule matching `scene_text`, if any.
pub fn matching_rule(scene_text: &str) -> Option<&'static PaletteRule> {
    let text = scene_text.to_lowercase();
    PALETTE_RULES
        .iter()
        .find(|rule| mentions_any(&text, rule.keywords))
}

pub fn resolve_colors(scene_text: &str) -> Palette {
    matching_rule(scene_text)
        .map(|rule| rule.palette)
        .unwrap_or(DEFAULT_PALETTE)
}
