//! Scene text to vector shape groups.
//!
//! Unlike palette resolution, every group whose keywords appear contributes
//! its shapes. Groups render in table order, ambient marks last.

use super::mentions_any;
use super::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Terrain,
    Sun,
    NightSky,
    Vegetation,
    Water,
    Ambient,
}

/// A fill taken from the palette or fixed regardless of theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Primary,
    Secondary,
    Accent,
    Fixed(&'static str),
}

impl Paint {
    fn resolve(self, palette: &Palette) -> &'static str {
        match self {
            Paint::Primary => palette.primary,
            Paint::Secondary => palette.secondary,
            Paint::Accent => palette.accent,
            Paint::Fixed(color) => color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Polygon {
        points: &'static str,
        paint: Paint,
        opacity: f32,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        paint: Paint,
        opacity: f32,
    },
    Ellipse {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        paint: Paint,
        opacity: f32,
    },
}

impl Shape {
    pub fn to_svg(&self, palette: &Palette) -> String {
        match *self {
            Shape::Polygon {
                points,
                paint,
                opacity,
            } => format!(
                r#"<polygon points="{}" fill="{}" opacity="{}" />"#,
                points,
                paint.resolve(palette),
                opacity
            ),
            Shape::Circle {
                cx,
                cy,
                r,
                paint,
                opacity,
            } => format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="{}" />"#,
                cx,
                cy,
                r,
                paint.resolve(palette),
                opacity
            ),
            Shape::Ellipse {
                cx,
                cy,
                rx,
                ry,
                paint,
                opacity,
            } => format!(
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="{}" opacity="{}" />"#,
                cx,
                cy,
                rx,
                ry,
                paint.resolve(palette),
                opacity
            ),
        }
    }
}

#[derive(Debug)]
pub struct ShapeGroup {
    pub feature: Feature,
    pub keywords: &'static [&'static str],
    pub shapes: &'static [Shape],
}

const fn circle(cx: f32, cy: f32, r: f32, paint: Paint, opacity: f32) -> Shape {
    Shape::Circle {
        cx,
        cy,
        r,
        paint,
        opacity,
    }
}

const fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32, paint: Paint, opacity: f32) -> Shape {
    Shape::Ellipse {
        cx,
        cy,
        rx,
        ry,
        paint,
        opacity,
    }
}

const WHITE: Paint = Paint::Fixed("white");

pub const SHAPE_GROUPS: &[ShapeGroup] = &[
    ShapeGroup {
        feature: Feature::Terrain,
        keywords: &["mountain", "cliff", "hill"],
        shapes: &[
            Shape::Polygon {
                points: "0,400 150,200 300,250 400,400",
                paint: Paint::Accent,
                opacity: 0.7,
            },
            Shape::Polygon {
                points: "100,400 250,150 400,200 400,400",
                paint: Paint::Primary,
                opacity: 0.6,
            },
        ],
    },
    ShapeGroup {
        feature: Feature::Sun,
        keywords: &["sun", "sunset", "sunrise"],
        shapes: &[
            circle(300.0, 100.0, 40.0, Paint::Fixed("#ffeb3b"), 0.8),
            circle(300.0, 100.0, 60.0, Paint::Fixed("#fff59d"), 0.3),
        ],
    },
    ShapeGroup {
        feature: Feature::NightSky,
        keywords: &["moon", "night"],
        shapes: &[
            circle(320.0, 80.0, 30.0, Paint::Fixed("#f5f5f5"), 0.9),
            circle(100.0, 150.0, 2.0, WHITE, 0.8),
            circle(150.0, 120.0, 1.5, WHITE, 0.7),
            circle(200.0, 100.0, 1.0, WHITE, 0.6),
        ],
    },
    ShapeGroup {
        feature: Feature::Vegetation,
        keywords: &["tree", "forest"],
        shapes: &[
            ellipse(80.0, 300.0, 15.0, 60.0, Paint::Accent, 0.8),
            ellipse(120.0, 280.0, 20.0, 70.0, Paint::Primary, 0.7),
        ],
    },
    ShapeGroup {
        feature: Feature::Water,
        keywords: &["water", "ocean", "lake"],
        shapes: &[
            ellipse(200.0, 350.0, 150.0, 30.0, Paint::Secondary, 0.6),
            ellipse(200.0, 360.0, 180.0, 25.0, Paint::Primary, 0.4),
        ],
    },
];

/// Decorative marks drawn on every placeholder, above the keyword groups.
pub static AMBIENT: ShapeGroup = ShapeGroup {
    feature: Feature::Ambient,
    keywords: &[],
    shapes: &[
        circle(50.0, 80.0, 8.0, WHITE, 0.3),
        circle(350.0, 300.0, 12.0, WHITE, 0.2),
        circle(300.0, 250.0, 6.0, WHITE, 0.4),
    ],
};

/// Every matching keyword group in z-order, followed by the ambient group.
pub fn compose_scene(scene_text: &str) -> Vec<&'static ShapeGroup> {
    let text = scene_text.to_lowercase();
    SHAPE_GROUPS
        .iter()
        .filter(|group| mentions_any(&text, group.keywords))
        .chain(std::iter::once(&AMBIENT))
        .collect()
}

pub fn features(scene_text: &str) -> Vec<Feature> {
    compose_scene(scene_text)
        .into_iter()
        .map(|group| group.feature)
        .collect()
}
