//! Editor commands: the single mutation path into an `EditorSession`.
//!
//! Every state change (document, selection, viewport, history) is a
//! `Command` passed to `EditorSession::dispatch`. Document mutations record
//! exactly one history entry in the same call; selection, background and
//! viewport commands never touch history.

use kurbo::{Size, Vec2};
use sd_core::error::{ExportError, ImportError, PropertyError};
use sd_core::id::ComponentId;
use sd_core::model::{ComponentPatch, PlacedComponent};
use sd_core::templates::Template;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Document (history-tracked) ──
    AddComponent(PlacedComponent),
    UpdateComponent { id: ComponentId, patch: ComponentPatch },
    DeleteComponent(ComponentId),
    /// Replace all components; the canvas size is left alone.
    LoadComponents(Vec<PlacedComponent>),
    /// Replace all components and the canvas size.
    LoadTemplate(Template),

    // ── History ──
    Undo,
    Redo,

    // ── Untracked ──
    SelectComponent(Option<ComponentId>),
    SetCanvasBackground(String),
    SetZoom(f64),
    ZoomBy(f64),
    SetPan(Vec2),
    SetViewportSize(Size),
    CenterCanvas,
}

impl Command {
    /// Whether applying this command records a history entry.
    pub fn is_history_tracked(&self) -> bool {
        matches!(
            self,
            Self::AddComponent(_)
                | Self::UpdateComponent { .. }
                | Self::DeleteComponent(_)
                | Self::LoadComponents(_)
                | Self::LoadTemplate(_)
        )
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddComponent(_) => "add",
            Self::UpdateComponent { .. } => "update",
            Self::DeleteComponent(_) => "delete",
            Self::LoadComponents(_) => "load components",
            Self::LoadTemplate(_) => "load template",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::SelectComponent(_) => "select",
            Self::SetCanvasBackground(_) => "background",
            Self::SetZoom(_) => "zoom",
            Self::ZoomBy(_) => "zoom by",
            Self::SetPan(_) => "pan",
            Self::SetViewportSize(_) => "viewport size",
            Self::CenterCanvas => "center",
        }
    }
}

/// Rejected commands. The session is unchanged whenever one is returned.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("no component with id `{0}`")]
    UnknownComponent(ComponentId),

    #[error("a component with id `{0}` already exists")]
    DuplicateId(ComponentId),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("no template with id `{0}`")]
    UnknownTemplate(String),

    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_document_mutations_are_tracked() {
        assert!(Command::DeleteComponent(ComponentId::intern("x")).is_history_tracked());
        assert!(Command::LoadComponents(vec![]).is_history_tracked());
        assert!(!Command::SelectComponent(None).is_history_tracked());
        assert!(!Command::SetCanvasBackground("#000".into()).is_history_tracked());
        assert!(!Command::Undo.is_history_tracked());
        assert!(!Command::SetZoom(2.0).is_history_tracked());
    }
}
