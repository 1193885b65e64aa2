//! Theme-dependent colors for the canvas painter.

/// Light or dark editor chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Canvas background applied when switching to this theme.
    pub fn canvas_background(&self) -> &'static str {
        match self {
            Self::Light => "#ffffff",
            Self::Dark => "#171717",
        }
    }

    pub fn canvas_theme(&self) -> CanvasTheme {
        match self {
            Self::Light => CanvasTheme::light(),
            Self::Dark => CanvasTheme::dark(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasTheme {
    pub grid: &'static str,
    pub boundary: &'static str,
    /// Text color for labels without an explicit `textColor`.
    pub text: &'static str,
    pub input_bg: &'static str,
    pub input_border: &'static str,
    pub placeholder_text: &'static str,
    pub image_bg: &'static str,
    pub selection: &'static str,
    pub handle_fill: &'static str,
    pub handle_stroke: &'static str,
    pub hint_fill: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            grid: "#f3f4f6",
            boundary: "#e5e7eb",
            text: "#000000",
            input_bg: "#ffffff",
            input_border: "#d1d5db",
            placeholder_text: "#9ca3af",
            image_bg: "#f3f4f6",
            selection: "#3b82f6",
            handle_fill: "#3b82f6",
            handle_stroke: "#ffffff",
            hint_fill: "rgba(59, 130, 246, 0.1)",
        }
    }

    pub fn dark() -> Self {
        Self {
            grid: "rgba(255,255,255,0.1)",
            boundary: "#374151",
            text: "#ffffff",
            input_bg: "#374151",
            input_border: "#6b7280",
            placeholder_text: "#d1d5db",
            image_bg: "#374151",
            ..Self::light()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_overrides_surface_colors_only() {
        let dark = CanvasTheme::dark();
        assert_eq!(dark.text, "#ffffff");
        assert_eq!(dark.selection, CanvasTheme::light().selection);
        assert_eq!(ThemeMode::Dark.canvas_background(), "#171717");
        assert_eq!(ThemeMode::parse("dark"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse("sepia"), None);
    }
}
