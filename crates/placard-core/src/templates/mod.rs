//! Starter templates: every layout crossed with every theme, in a base and a
//! contrast variant.

mod builtin;
mod favorites;

pub use builtin::{DEFAULT_CATEGORIES, REFERENCE_HEIGHT, REFERENCE_WIDTH, layouts, themes};
pub use favorites::{FAVORITES_CATEGORY, FAVORITES_KEY, Favorites};

use crate::canvas::{Background, Canvas};
use crate::element::{Color, Content, Element, ElementKind, ShapeType};
use crate::geometry::Geometry;
use serde::{Deserialize, Serialize};

/// Category that matches every template.
pub const ALL_CATEGORY: &str = "all";

/// A named position in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Title,
    Subtitle,
    Date,
    Image,
    Body,
    CallToAction,
}

impl Slot {
    /// Element kind a slot becomes when instantiated.
    pub fn kind(self) -> ElementKind {
        match self {
            Slot::Title => ElementKind::Heading,
            Slot::Subtitle | Slot::Date | Slot::Body => ElementKind::Text,
            Slot::Image => ElementKind::Image,
            Slot::CallToAction => ElementKind::Widget,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Slot::Title => "Your Title Here",
            Slot::Subtitle => "Subtitle text",
            Slot::Date => "January 1, 2026",
            Slot::Image => "",
            Slot::Body => "Your description goes here. Tell people what this is about.",
            Slot::CallToAction => "Learn More",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Slot::Title => "H1",
            Slot::Subtitle => "H3",
            _ => "P",
        }
    }
}

/// Where a slot sits on the reference page and how its text is set.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPlacement {
    pub slot: Slot,
    pub kind: ElementKind,
    pub geometry: Geometry,
    pub font_size: f64,
    pub align: &'static str,
}

impl SlotPlacement {
    pub fn text(slot: Slot, geometry: Geometry, font_size: f64, align: &'static str) -> Self {
        Self {
            slot,
            kind: slot.kind(),
            geometry,
            font_size,
            align,
        }
    }

    pub fn media(geometry: Geometry) -> Self {
        Self::text(Slot::Image, geometry, 0.0, "center")
    }

    /// Instantiate the slot as a different element kind.
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }
}

/// An arrangement of slots on the reference page.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub id: String,
    pub name: String,
    pub slots: Vec<SlotPlacement>,
}

impl Layout {
    pub fn new(id: impl Into<String>, name: impl Into<String>, slots: Vec<SlotPlacement>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slots,
        }
    }
}

/// Colors and font applied to a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub background: Background,
    pub text: Color,
    pub accent: Color,
    pub font: String,
}

impl Theme {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        background: Background,
        text: Color,
        accent: Color,
        font: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            background,
            text,
            accent,
            font: font.into(),
        }
    }

    /// The same theme with background and text colors swapped.
    ///
    /// A gradient or image background contributes its leading color.
    pub fn contrast(&self) -> Theme {
        Theme {
            id: format!("{}-contrast", self.id),
            name: format!("{} Contrast", self.name),
            background: Background::Solid(self.text),
            text: self.background.primary_color(),
            accent: self.accent,
            font: self.font.clone(),
        }
    }
}

/// A layout paired with a theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub category: String,
    pub contrast: bool,
    pub layout: Layout,
    pub theme: Theme,
}

impl Template {
    /// Build a fresh canvas of the given size from this template.
    ///
    /// Slot positions are scaled from the reference page. Every call yields
    /// new element ids.
    pub fn instantiate(&self, width: f64, height: f64) -> Canvas {
        let sx = width / REFERENCE_WIDTH;
        let sy = height / REFERENCE_HEIGHT;
        let font_scale = sx.min(sy);

        let mut canvas = Canvas::new(width, height);
        canvas.background = self.theme.background.clone();

        for placement in &self.layout.slots {
            let g = placement.geometry;
            let geometry = Geometry::new(g.x * sx, g.y * sy, g.width * sx, g.height * sy);
            let element = self.slot_element(placement, geometry, placement.font_size * font_scale);
            canvas.add_element(element);
        }

        canvas
    }

    fn slot_element(&self, placement: &SlotPlacement, geometry: Geometry, font_size: f64) -> Element {
        let theme = &self.theme;
        let slot = placement.slot;

        match &placement.kind {
            ElementKind::Image => {
                let tint = Color::new(theme.accent.r, theme.accent.g, theme.accent.b, 0x33);
                Element::new(ElementKind::Image, geometry, Content::Empty)
                    .with_style("background_color", tint)
                    .with_style("object_fit", "cover")
            }
            ElementKind::Shape => {
                Element::shape(geometry, ShapeType::Rectangle).with_style("background_color", theme.accent)
            }
            ElementKind::Widget => Element::widget(geometry, slot.placeholder())
                .with_style("background_color", theme.accent)
                .with_style("color", theme.background.primary_color())
                .with_style("font_family", theme.font.as_str())
                .with_style("font_size", font_size)
                .with_style("text_align", placement.align)
                .with_style("border_radius", 4.0),
            // Heading, text and kinds without their own rendering.
            kind => {
                let color = if slot == Slot::Date { theme.accent } else { theme.text };
                let weight = if slot == Slot::Title { "900" } else { "400" };
                let mut element = Element::new(kind.clone(), geometry, Content::Text(slot.placeholder().to_string()))
                    .with_style("color", color)
                    .with_style("font_family", theme.font.as_str())
                    .with_style("font_size", font_size)
                    .with_style("font_weight", weight)
                    .with_style("text_align", placement.align);
                element.tag = Some(slot.tag().to_string());
                element
            }
        }
    }

    /// Case-insensitive match against the template name or category.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        self.name.to_lowercase().contains(&term) || self.category.to_lowercase().contains(&term)
    }
}

/// Cross every theme with every layout.
///
/// Themes are the outer loop. Each pair yields a base template followed by its
/// contrast variant. Ids are `template-1`, `template-2`, ... and categories are
/// assigned round-robin by id number.
pub fn generate(layouts: &[Layout], themes: &[Theme], categories: &[&str]) -> Vec<Template> {
    let mut templates = Vec::with_capacity(layouts.len() * themes.len() * 2);
    let mut n = 1usize;

    let category = |n: usize| -> String {
        if categories.is_empty() {
            ALL_CATEGORY.to_string()
        } else {
            categories[n % categories.len()].to_string()
        }
    };

    for theme in themes {
        let contrast = theme.contrast();
        for layout in layouts {
            for (variant, is_contrast) in [(theme, false), (&contrast, true)] {
                templates.push(Template {
                    id: format!("template-{n}"),
                    name: format!("{} {}", variant.name, layout.name),
                    category: category(n),
                    contrast: is_contrast,
                    layout: layout.clone(),
                    theme: variant.clone(),
                });
                n += 1;
            }
        }
    }

    log::debug!(
        "Generated {} templates from {} layouts and {} themes",
        templates.len(),
        layouts.len(),
        themes.len()
    );
    templates
}

/// A searchable set of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// The stock layouts crossed with the stock themes.
    pub fn builtin() -> Self {
        Self::new(generate(&layouts(), &themes(), DEFAULT_CATEGORIES))
    }

    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates in a category. `"all"` matches everything.
    pub fn by_category(&self, category: &str) -> Vec<&Template> {
        self.templates
            .iter()
            .filter(|t| category == ALL_CATEGORY || t.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Like [`by_category`](Self::by_category), but `"favorites"` lists the
    /// favourite templates in library order.
    pub fn in_category<'a>(&'a self, category: &str, favorites: &Favorites) -> Vec<&'a Template> {
        if category.eq_ignore_ascii_case(FAVORITES_CATEGORY) {
            self.templates.iter().filter(|t| favorites.contains(&t.id)).collect()
        } else {
            self.by_category(category)
        }
    }

    pub fn search(&self, term: &str) -> Vec<&Template> {
        self.templates.iter().filter(|t| t.matches(term)).collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for template in &self.templates {
            if !seen.contains(&template.category.as_str()) {
                seen.push(&template.category);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_library_size() {
        let library = TemplateLibrary::builtin();
        assert_eq!(library.len(), layouts().len() * themes().len() * 2);
        assert_eq!(library.len(), 100);
    }

    #[test]
    fn test_ids_sequential_and_unique() {
        let library = TemplateLibrary::builtin();
        let ids: HashSet<_> = library.all().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), library.len());
        assert_eq!(library.all()[0].id, "template-1");
        assert_eq!(library.all()[99].id, "template-100");
    }

    #[test]
    fn test_base_then_contrast() {
        let library = TemplateLibrary::builtin();
        let base = &library.all()[0];
        let contrast = &library.all()[1];
        assert_eq!(base.name, "Cyberpunk Classic Stack");
        assert!(!base.contrast);
        assert_eq!(contrast.name, "Cyberpunk Contrast Classic Stack");
        assert!(contrast.contrast);
        assert_eq!(contrast.theme.background, Background::Solid(base.theme.text));
        assert_eq!(contrast.theme.text, base.theme.background.primary_color());
        assert_eq!(contrast.layout, base.layout);
    }

    #[test]
    fn test_gradient_contrast_uses_leading_color() {
        let sunset = themes().into_iter().find(|t| t.id == "sunset").unwrap();
        let contrast = sunset.contrast();
        assert_eq!(contrast.background, Background::Solid(Color::white()));
        assert_eq!(contrast.text, Color::rgb(0xf0, 0x93, 0xfb));
    }

    #[test]
    fn test_categories_round_robin() {
        let library = TemplateLibrary::builtin();
        // template-1 gets categories[1 % 6].
        assert_eq!(library.all()[0].category, "bold");
        assert_eq!(library.all()[5].category, "minimal");
        assert_eq!(library.categories().len(), DEFAULT_CATEGORIES.len());
        assert_eq!(library.by_category("all").len(), library.len());
        let minimal = library.by_category("minimal");
        assert!(!minimal.is_empty());
        assert!(minimal.iter().all(|t| t.category == "minimal"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(&layouts(), &themes(), DEFAULT_CATEGORIES);
        let b = generate(&layouts(), &themes(), DEFAULT_CATEGORIES);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(generate(&[], &themes(), DEFAULT_CATEGORIES).is_empty());
        assert!(generate(&layouts(), &[], DEFAULT_CATEGORIES).is_empty());
        let uncategorized = generate(&layouts()[..1], &themes()[..1], &[]);
        assert!(uncategorized.iter().all(|t| t.category == ALL_CATEGORY));
    }

    #[test]
    fn test_search() {
        let library = TemplateLibrary::builtin();
        let hits = library.search("hero impact");
        assert_eq!(hits.len(), themes().len() * 2);
        assert!(library.search("no such template").is_empty());
    }

    #[test]
    fn test_search_matches_category() {
        let library = TemplateLibrary::builtin();
        let hits = library.search("Gradient");
        assert!(!hits.is_empty());
        assert_eq!(hits.len(), library.by_category("gradient").len());
        assert!(hits.iter().all(|t| t.category == "gradient"));
    }

    #[test]
    fn test_favorites_category() {
        let library = TemplateLibrary::builtin();
        let mut favorites = Favorites::new();
        assert!(library.in_category(FAVORITES_CATEGORY, &favorites).is_empty());

        favorites.toggle("template-7");
        favorites.toggle("template-2");
        favorites.toggle("template-unknown");
        let ids: Vec<&str> = library
            .in_category("Favorites", &favorites)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["template-2", "template-7"]);
        assert_eq!(library.in_category("bold", &favorites), library.by_category("bold"));
    }

    #[test]
    fn test_instantiate_scales_to_canvas() {
        let library = TemplateLibrary::builtin();
        let template = library.get("template-1").unwrap();

        let canvas = template.instantiate(REFERENCE_WIDTH, REFERENCE_HEIGHT);
        assert_eq!(canvas.len(), template.layout.slots.len());
        assert_eq!(canvas.background, template.theme.background);
        let title = canvas.elements.iter().find(|e| e.kind == ElementKind::Heading).unwrap();
        assert_eq!(title.text_content(), Some("Your Title Here"));
        assert_eq!(title.geometry.x, 50.0);

        let half = template.instantiate(REFERENCE_WIDTH / 2.0, REFERENCE_HEIGHT / 2.0);
        let small_title = half.elements.iter().find(|e| e.kind == ElementKind::Heading).unwrap();
        assert_eq!(small_title.geometry.x, 25.0);
        assert_eq!(small_title.geometry.width, 250.0);
    }

    #[test]
    fn test_instantiate_gives_fresh_ids() {
        let library = TemplateLibrary::builtin();
        let template = library.get("template-7").unwrap();
        let a = template.instantiate(600.0, 800.0);
        let b = template.instantiate(600.0, 800.0);
        assert_ne!(a.elements[0].id, b.elements[0].id);
    }

    #[test]
    fn test_custom_slot_kind_instantiates_as_text() {
        let layout = Layout::new(
            "badge",
            "Badge",
            vec![
                SlotPlacement::text(Slot::Date, Geometry::new(10.0, 10.0, 100.0, 30.0), 12.0, "left")
                    .with_kind(ElementKind::Other("badge".into())),
            ],
        );
        let templates = generate(&[layout], &themes()[..1], DEFAULT_CATEGORIES);
        let canvas = templates[0].instantiate(600.0, 800.0);
        let element = &canvas.elements[0];
        assert_eq!(element.kind, ElementKind::Other("badge".into()));
        assert_eq!(element.text_content(), Some("January 1, 2026"));
    }
}
