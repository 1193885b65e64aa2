//! Component library: factory for new components with per-kind defaults.

use kurbo::Point;
use sd_core::id::ComponentId;
use sd_core::model::{
    ButtonProps, ComponentKind, ComponentType, Frame, ImageProps, InputProps, PlacedComponent,
    TextProps,
};
use sd_render::theme::ThemeMode;

/// Where "click to add" places new components.
pub const ADD_ORIGIN: Point = Point::new(100.0, 100.0);

pub const PLACEHOLDER_IMAGE_SRC: &str = "/placeholder.svg?height=100&width=150&text=Image";

/// One entry of the library palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryItem {
    pub component_type: ComponentType,
    pub label: &'static str,
}

pub const LIBRARY_ITEMS: [LibraryItem; 4] = [
    LibraryItem {
        component_type: ComponentType::Button,
        label: "Button",
    },
    LibraryItem {
        component_type: ComponentType::Text,
        label: "Text",
    },
    LibraryItem {
        component_type: ComponentType::Input,
        label: "Input Field",
    },
    LibraryItem {
        component_type: ComponentType::Image,
        label: "Image",
    },
];

/// Palette entries whose label contains `term` (case-insensitive).
pub fn search(term: &str) -> impl Iterator<Item = &'static LibraryItem> {
    let term = term.to_lowercase();
    LIBRARY_ITEMS
        .iter()
        .filter(move |item| item.label.to_lowercase().contains(&term))
}

/// Default size for a freshly created component.
pub fn default_size(ty: ComponentType) -> (f64, f64) {
    match ty {
        ComponentType::Text => (120.0, 24.0),
        ComponentType::Image => (150.0, 100.0),
        ComponentType::Button | ComponentType::Input => (120.0, 40.0),
    }
}

/// Create a component of `ty` at `origin` with a fresh id.
///
/// Text and input colors follow the current theme so new components are
/// readable on the theme's canvas background.
pub fn create_component(ty: ComponentType, origin: Point, theme: ThemeMode) -> PlacedComponent {
    let dark = theme == ThemeMode::Dark;
    let text_color = if dark { "#ffffff" } else { "#000000" };
    let (width, height) = default_size(ty);

    let kind = match ty {
        ComponentType::Button => ComponentKind::Button(ButtonProps {
            text: Some("Button".into()),
            background_color: Some("#3b82f6".into()),
            text_color: Some("#ffffff".into()),
            font_size: Some(14.0),
            border_radius: Some(6.0),
        }),
        ComponentType::Text => ComponentKind::Text(TextProps {
            text: Some("Text Label".into()),
            text_color: Some(text_color.into()),
            font_size: Some(16.0),
        }),
        ComponentType::Input => ComponentKind::Input(InputProps {
            placeholder: Some("Enter text...".into()),
            background_color: Some(if dark { "#374151" } else { "#ffffff" }.into()),
            text_color: Some(text_color.into()),
            font_size: Some(14.0),
            border_radius: Some(4.0),
        }),
        ComponentType::Image => ComponentKind::Image(ImageProps {
            src: Some(PLACEHOLDER_IMAGE_SRC.into()),
            file_name: None,
            border_radius: Some(4.0),
        }),
    };

    PlacedComponent::new(
        ComponentId::generate(ty.as_str()),
        Frame::new(origin.x, origin.y, width, height),
        kind,
    )
}
