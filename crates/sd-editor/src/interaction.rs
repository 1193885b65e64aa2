//! Pointer interaction state machine.
//!
//! ```text
//!            down on handle of selection
//!   Idle ──────────────────────────────────▶ Resizing
//!    │  down on component (Alt: on a copy)    │
//!    ├─────────────────────────────────▶ Dragging
//!    │  down on empty canvas (primary)        │
//!    ├─────────────────────────────────▶ Panning
//!    ◀──────────────── up ────────────────────┘
//! ```
//!
//! The machine never mutates the session itself. Each event returns the
//! commands to dispatch plus the cursor to show. It has no failure modes:
//! positions are clamped and events that make no sense are ignored.

use crate::commands::Command;
use crate::input::PointerButton;
use crate::resize::resize_frame;
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use sd_core::config::EditorConfig;
use sd_core::id::ComponentId;
use sd_core::model::{ComponentPatch, Document, Frame, PlacedComponent};
use sd_render::hit::{Handle, component_at, resize_handle_at};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        id: ComponentId,
        /// Pointer minus component origin at pointer-down.
        grab: Vec2,
    },
    Resizing {
        id: ComponentId,
        handle: Handle,
        start_frame: Frame,
        start_pointer: Point,
    },
    Panning {
        /// Screen pointer minus pan at pointer-down.
        origin: Vec2,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Move,
    Copy,
    Resize(Handle),
}

impl Cursor {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Crosshair => "crosshair",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Resize(h) => h.cursor(),
        }
    }
}

/// Read-only view of the session an event is interpreted against.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub document: &'a Document,
    pub selection: Option<ComponentId>,
    pub viewport: &'a Viewport,
    pub config: &'a EditorConfig,
}

impl<'a> Context<'a> {
    fn selected(&self) -> Option<&'a PlacedComponent> {
        self.selection.and_then(|id| self.document.get(id))
    }

    fn handle_at(&self, p: Point) -> Option<(&'a PlacedComponent, Handle)> {
        let selected = self.selected()?;
        let handle = resize_handle_at(
            p,
            &selected.frame,
            self.config.handle_size,
            self.config.handle_tolerance,
        )?;
        Some((selected, handle))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub commands: SmallVec<[Command; 2]>,
    pub cursor: Cursor,
}

impl Response {
    fn cursor(cursor: Cursor) -> Self {
        Self {
            commands: SmallVec::new(),
            cursor,
        }
    }
}

#[derive(Debug, Default)]
pub struct Interaction {
    state: InteractionState,
    /// Alt is held: pointer-down on a component drags a copy.
    duplicate_mode: bool,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Dragging or resizing: a gesture that edits the document.
    pub fn in_edit_gesture(&self) -> bool {
        matches!(
            self.state,
            InteractionState::Dragging { .. } | InteractionState::Resizing { .. }
        )
    }

    /// Component moved or resized by the gesture in progress.
    pub fn gesture_target(&self) -> Option<ComponentId> {
        match self.state {
            InteractionState::Dragging { id, .. } | InteractionState::Resizing { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn duplicate_mode(&self) -> bool {
        self.duplicate_mode
    }

    pub fn set_duplicate_mode(&mut self, on: bool) {
        self.duplicate_mode = on;
    }

    /// Drop any in-flight gesture, e.g. after undo or a wholesale load.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    pub fn pointer_down(
        &mut self,
        ctx: &Context,
        screen: Point,
        button: PointerButton,
        alt: bool,
    ) -> Response {
        let p = ctx.viewport.screen_to_document(screen);

        if let Some((selected, handle)) = ctx.handle_at(p) {
            log::debug!("resize {} via {}", selected.id, handle.as_str());
            self.state = InteractionState::Resizing {
                id: selected.id,
                handle,
                start_frame: selected.frame,
                start_pointer: p,
            };
            return Response::cursor(Cursor::Resize(handle));
        }

        let mut response = Response::default();
        let hit = component_at(&ctx.document.components, p).and_then(|id| ctx.document.get(id));

        let Some(hit) = hit else {
            response.commands.push(Command::SelectComponent(None));
            if button == PointerButton::Primary {
                self.state = InteractionState::Panning {
                    origin: screen.to_vec2() - ctx.viewport.pan,
                };
            }
            return response;
        };

        let duplicate = self.duplicate_mode || alt;
        let (id, frame) = if duplicate {
            let offset = ctx.config.duplicate_offset;
            let copy = hit.duplicate(offset, offset, ctx.document.canvas_size);
            log::debug!("alt-drag: duplicating {} as {}", hit.id, copy.id);
            let target = (copy.id, copy.frame);
            response.commands.push(Command::AddComponent(copy));
            target
        } else {
            (hit.id, hit.frame)
        };

        response.commands.push(Command::SelectComponent(Some(id)));
        self.state = InteractionState::Dragging {
            id,
            grab: p - Point::new(frame.x, frame.y),
        };
        response.cursor = if duplicate { Cursor::Copy } else { Cursor::Move };
        response
    }

    pub fn pointer_move(&mut self, ctx: &Context, screen: Point) -> Response {
        let p = ctx.viewport.screen_to_document(screen);
        let canvas = ctx.document.canvas_size;

        match self.state {
            InteractionState::Idle => Response::cursor(self.hover_cursor(ctx, p)),

            InteractionState::Dragging { id, grab } => {
                let Some(c) = ctx.document.get(id) else {
                    self.state = InteractionState::Idle;
                    return Response::default();
                };
                let origin = p - grab;
                let frame = Frame::new(origin.x, origin.y, c.frame.width, c.frame.height)
                    .with_origin_clamped(canvas);
                let mut response = Response::cursor(if self.duplicate_mode {
                    Cursor::Copy
                } else {
                    Cursor::Move
                });
                if frame != c.frame {
                    response.commands.push(Command::UpdateComponent {
                        id,
                        patch: ComponentPatch::position(frame.x, frame.y),
                    });
                }
                response
            }

            InteractionState::Resizing {
                id,
                handle,
                start_frame,
                start_pointer,
            } => {
                let Some(c) = ctx.document.get(id) else {
                    self.state = InteractionState::Idle;
                    return Response::default();
                };
                let frame = resize_frame(
                    handle,
                    &start_frame,
                    p - start_pointer,
                    canvas,
                    ctx.config.min_resize_size,
                );
                let mut response = Response::cursor(Cursor::Resize(handle));
                if frame != c.frame {
                    response.commands.push(Command::UpdateComponent {
                        id,
                        patch: ComponentPatch::frame(frame),
                    });
                }
                response
            }

            InteractionState::Panning { origin } => {
                let mut response = Response::default();
                response
                    .commands
                    .push(Command::SetPan(screen.to_vec2() - origin));
                response
            }
        }
    }

    pub fn pointer_up(&mut self) -> Response {
        if self.state != InteractionState::Idle {
            log::debug!("gesture end: {:?}", self.state);
        }
        self.state = InteractionState::Idle;
        Response::cursor(Cursor::Default)
    }

    /// Cursor for an idle pointer at document point `p`.
    pub fn hover_cursor(&self, ctx: &Context, p: Point) -> Cursor {
        if let Some((_, handle)) = ctx.handle_at(p) {
            return Cursor::Resize(handle);
        }
        if component_at(&ctx.document.components, p).is_some() {
            return if self.duplicate_mode {
                Cursor::Copy
            } else {
                Cursor::Move
            };
        }
        Cursor::Crosshair
    }
}
