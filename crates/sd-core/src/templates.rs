//! Built-in device templates.
//!
//! A template is an immutable starter document: a fixed resolution plus an
//! initial component list. Loading one is the only way to change the canvas
//! size, and it always replaces every component.

use crate::id::ComponentId;
use crate::model::{ButtonProps, CanvasSize, ComponentKind, Frame, PlacedComponent, TextProps};
use std::sync::LazyLock;

/// Template loaded by "create blank".
pub const BLANK_TEMPLATE_ID: &str = "blank-tablet";

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Display label for the device family (`"Tablet"`, `"Phone"`, …).
    pub device_class: &'static str,
    pub resolution: CanvasSize,
    pub components: Vec<PlacedComponent>,
}

fn text(id: &str, frame: Frame, label: &str, color: &str, font_size: Option<f64>) -> PlacedComponent {
    PlacedComponent::new(
        ComponentId::intern(id),
        frame,
        ComponentKind::Text(TextProps {
            text: Some(label.to_string()),
            text_color: Some(color.to_string()),
            font_size,
        }),
    )
}

pub static DEVICE_TEMPLATES: LazyLock<[Template; 4]> = LazyLock::new(|| {
    [
        Template {
            id: BLANK_TEMPLATE_ID,
            name: "Blank Tablet",
            description: "A blank canvas for tablet layouts.",
            device_class: "Tablet",
            resolution: CanvasSize::new(1024.0, 768.0),
            components: Vec::new(),
        },
        Template {
            id: "tablet-dashboard",
            name: "Tablet Dashboard",
            description: "A simple dashboard layout for tablets.",
            device_class: "Tablet",
            resolution: CanvasSize::new(1024.0, 768.0),
            components: vec![
                PlacedComponent::new(
                    ComponentId::intern("button-1"),
                    Frame::new(50.0, 50.0, 150.0, 50.0),
                    ComponentKind::Button(ButtonProps {
                        text: Some("Button 1".into()),
                        background_color: Some("#4CAF50".into()),
                        text_color: Some("#fff".into()),
                        ..ButtonProps::default()
                    }),
                ),
                text(
                    "text-1",
                    Frame::new(50.0, 150.0, 200.0, 30.0),
                    "Some Text",
                    "#333",
                    None,
                ),
            ],
        },
        Template {
            id: "phone-app",
            name: "Phone App Layout",
            description: "Basic layout for a phone application.",
            device_class: "Phone",
            resolution: CanvasSize::new(375.0, 667.0),
            components: vec![text(
                "text-phone",
                Frame::new(20.0, 20.0, 100.0, 20.0),
                "Phone App",
                "#000",
                None,
            )],
        },
        Template {
            id: "kiosk-info",
            name: "Kiosk Information Panel",
            description: "A template for a kiosk information display.",
            device_class: "Kiosk",
            resolution: CanvasSize::new(1920.0, 1080.0),
            components: vec![text(
                "text-kiosk",
                Frame::new(100.0, 100.0, 400.0, 50.0),
                "Welcome to our Kiosk",
                "#000",
                Some(32.0),
            )],
        },
    ]
});

/// Look up a template by id.
pub fn find_template(id: &str) -> Option<&'static Template> {
    DEVICE_TEMPLATES.iter().find(|t| t.id == id)
}
