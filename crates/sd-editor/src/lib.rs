pub mod commands;
pub mod input;
pub mod interaction;
pub mod library;
pub mod resize;
pub mod session;
pub mod shortcuts;
pub mod viewport;

pub use commands::{Command, EditorError};
pub use input::{InputEvent, Modifiers, PointerButton};
pub use interaction::{Cursor, Interaction, InteractionState};
pub use session::EditorSession;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use viewport::Viewport;
