//! Keyboard shortcuts for the layout editor.
//!
//! Bindings are a flat table of (chord, keys, action). `cmd` means Ctrl on
//! Windows/Linux and ⌘ on macOS; either one satisfies a `cmd` chord.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    /// Delete the selected component.
    Delete,
    ZoomIn,
    ZoomOut,
    Deselect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chord {
    Plain,
    Cmd,
    CmdShift,
}

const BINDINGS: &[(Chord, &[&str], ShortcutAction)] = &[
    (Chord::Plain, &["Delete", "Backspace"], ShortcutAction::Delete),
    (Chord::Plain, &["Escape"], ShortcutAction::Deselect),
    (Chord::Cmd, &["z", "Z"], ShortcutAction::Undo),
    (Chord::Cmd, &["y", "Y"], ShortcutAction::Redo),
    (Chord::Cmd, &["=", "+"], ShortcutAction::ZoomIn),
    (Chord::Cmd, &["-"], ShortcutAction::ZoomOut),
    (Chord::CmdShift, &["z", "Z"], ShortcutAction::Redo),
    // Shift+= reports "+" on US layouts.
    (Chord::CmdShift, &["+"], ShortcutAction::ZoomIn),
];

pub struct ShortcutMap;

impl ShortcutMap {
    /// Look up the action bound to `key` (a DOM `KeyboardEvent.key`)
    /// under the given modifiers. Alt never takes part in a chord; it
    /// toggles duplicate mode instead.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let chord = match (ctrl || meta, shift) {
            (true, true) => Chord::CmdShift,
            (true, false) => Chord::Cmd,
            (false, _) => Chord::Plain,
        };
        BINDINGS
            .iter()
            .find(|(c, keys, _)| *c == chord && keys.contains(&key))
            .map(|&(_, _, action)| action)
    }
}
