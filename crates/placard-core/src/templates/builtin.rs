//! The stock layouts and color themes.

use super::{Layout, SlotPlacement, Theme};
use crate::canvas::Background;
use crate::element::Color;
use crate::geometry::Geometry;

/// Category names assigned round-robin to generated templates.
pub const DEFAULT_CATEGORIES: &[&str] = &["minimal", "bold", "gradient", "professional", "creative", "event"];

/// Reference page size the stock layouts are drawn on.
pub const REFERENCE_WIDTH: f64 = 600.0;
pub const REFERENCE_HEIGHT: f64 = 800.0;

fn g(x: f64, y: f64, w: f64, h: f64) -> Geometry {
    Geometry::new(x, y, w, h)
}

pub fn layouts() -> Vec<Layout> {
    use super::Slot::*;

    vec![
        Layout::new(
            "classic",
            "Classic Stack",
            vec![
                SlotPlacement::text(Title, g(50.0, 60.0, 500.0, 70.0), 48.0, "center"),
                SlotPlacement::text(Subtitle, g(50.0, 140.0, 500.0, 30.0), 20.0, "center"),
                SlotPlacement::media(g(50.0, 200.0, 500.0, 280.0)),
                SlotPlacement::text(Date, g(50.0, 510.0, 500.0, 30.0), 16.0, "center"),
                SlotPlacement::text(Body, g(50.0, 550.0, 500.0, 110.0), 18.0, "center"),
                SlotPlacement::text(CallToAction, g(220.0, 690.0, 160.0, 50.0), 16.0, "center"),
            ],
        ),
        Layout::new(
            "hero",
            "Hero Impact",
            vec![
                SlotPlacement::media(g(0.0, 0.0, 600.0, 380.0)),
                SlotPlacement::text(Title, g(40.0, 270.0, 520.0, 60.0), 44.0, "left"),
                SlotPlacement::text(Subtitle, g(40.0, 330.0, 520.0, 30.0), 20.0, "left"),
                SlotPlacement::text(Date, g(40.0, 420.0, 520.0, 30.0), 16.0, "left"),
                SlotPlacement::text(Body, g(40.0, 460.0, 520.0, 140.0), 18.0, "left"),
                SlotPlacement::text(CallToAction, g(40.0, 630.0, 160.0, 50.0), 16.0, "center"),
            ],
        ),
        Layout::new(
            "split",
            "Split Vision",
            vec![
                SlotPlacement::media(g(0.0, 0.0, 270.0, 800.0)),
                SlotPlacement::text(Date, g(300.0, 200.0, 260.0, 30.0), 16.0, "left"),
                SlotPlacement::text(Title, g(300.0, 240.0, 260.0, 100.0), 40.0, "left"),
                SlotPlacement::text(Subtitle, g(300.0, 350.0, 260.0, 30.0), 18.0, "left"),
                SlotPlacement::text(Body, g(300.0, 400.0, 260.0, 200.0), 16.0, "left"),
                SlotPlacement::text(CallToAction, g(300.0, 620.0, 160.0, 50.0), 16.0, "center"),
            ],
        ),
        Layout::new(
            "elegant",
            "Elegant Focus",
            vec![
                SlotPlacement::text(Date, g(80.0, 90.0, 440.0, 30.0), 14.0, "center"),
                SlotPlacement::text(Title, g(80.0, 130.0, 440.0, 70.0), 44.0, "center"),
                SlotPlacement::text(Subtitle, g(80.0, 220.0, 440.0, 30.0), 18.0, "center"),
                SlotPlacement::media(g(225.0, 270.0, 150.0, 150.0)),
                SlotPlacement::text(Body, g(80.0, 450.0, 440.0, 120.0), 16.0, "center"),
                SlotPlacement::text(CallToAction, g(220.0, 600.0, 160.0, 50.0), 16.0, "center"),
            ],
        ),
        Layout::new(
            "dynamic",
            "Dynamic Grid",
            vec![
                SlotPlacement::text(Title, g(50.0, 50.0, 350.0, 60.0), 36.0, "left"),
                SlotPlacement::text(Date, g(400.0, 70.0, 150.0, 30.0), 14.0, "right"),
                SlotPlacement::media(g(50.0, 180.0, 240.0, 250.0)),
                SlotPlacement::text(Subtitle, g(310.0, 200.0, 240.0, 40.0), 20.0, "left"),
                SlotPlacement::text(Body, g(310.0, 250.0, 240.0, 180.0), 16.0, "left"),
                SlotPlacement::text(CallToAction, g(50.0, 680.0, 160.0, 50.0), 16.0, "center"),
            ],
        ),
    ]
}

pub fn themes() -> Vec<Theme> {
    let solid = |r: u8, green: u8, b: u8| Background::Solid(Color::rgb(r, green, b));

    vec![
        Theme::new("cyber", "Cyberpunk", solid(0x00, 0x00, 0x00), Color::rgb(0x00, 0xf3, 0xff), Color::rgb(0xff, 0x00, 0xff), "Poppins"),
        Theme::new("forest", "Forest Deep", solid(0x1b, 0x43, 0x32), Color::rgb(0xd8, 0xf3, 0xdc), Color::rgb(0x40, 0x91, 0x6c), "Inter"),
        Theme::new("royal", "Royal Gold", solid(0x1a, 0x1a, 0x1a), Color::rgb(0xd4, 0xaf, 0x37), Color::rgb(0xd4, 0xaf, 0x37), "Playfair Display"),
        Theme::new("startup", "Modern Startup", solid(0xff, 0xff, 0xff), Color::rgb(0x1e, 0x29, 0x3b), Color::rgb(0x63, 0x66, 0xf1), "Inter"),
        Theme::new(
            "sunset",
            "Tropical Sunset",
            Background::LinearGradient {
                angle_degrees: 135.0,
                from: Color::rgb(0xf0, 0x93, 0xfb),
                to: Color::rgb(0xf5, 0x57, 0x6c),
            },
            Color::white(),
            Color::rgb(0xff, 0xcc, 0x33),
            "Montserrat",
        ),
        Theme::new("midnight", "Midnight", solid(0x0f, 0x17, 0x2a), Color::rgb(0xf8, 0xfa, 0xfc), Color::rgb(0x38, 0xbd, 0xf8), "Inter"),
        Theme::new("vintage", "Vintage Paper", solid(0xf4, 0xec, 0xd8), Color::rgb(0x5d, 0x40, 0x37), Color::rgb(0x8d, 0x6e, 0x63), "Georgia"),
        Theme::new("neon-purple", "Neon Purple", solid(0x12, 0x04, 0x28), Color::rgb(0xe0, 0xb0, 0xff), Color::rgb(0xbf, 0x00, 0xff), "Poppins"),
        Theme::new("industrial", "Industrial", solid(0x37, 0x41, 0x51), Color::rgb(0xf3, 0xf4, 0xf6), Color::rgb(0xfb, 0xbf, 0x24), "Roboto"),
        Theme::new("bubblegum", "Bubblegum", solid(0xfd, 0xf2, 0xf8), Color::rgb(0xdb, 0x27, 0x77), Color::rgb(0xf4, 0x72, 0xb6), "Poppins"),
    ]
}
