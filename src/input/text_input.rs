use super::{ShortcutKey, ShortcutModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputEvent {
    Character(char),
    Backspace,
    Enter,
    CtrlEnter,
    Escape,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
}

impl TextInputEvent {
    /// Keyboard keys that carry meaning inside an editing text box.
    pub fn from_key(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<Self> {
        match key {
            ShortcutKey::Character(c) if !modifiers.ctrl && !c.is_control() => {
                Some(Self::Character(c))
            }
            ShortcutKey::Character(_) => None,
            ShortcutKey::Enter if modifiers.ctrl => Some(Self::CtrlEnter),
            ShortcutKey::Enter => Some(Self::Enter),
            ShortcutKey::Escape => Some(Self::Escape),
            ShortcutKey::Backspace => Some(Self::Backspace),
            ShortcutKey::Delete => None,
            ShortcutKey::ArrowLeft => Some(Self::CursorLeft),
            ShortcutKey::ArrowRight => Some(Self::CursorRight),
            ShortcutKey::ArrowUp => Some(Self::CursorUp),
            ShortcutKey::ArrowDown => Some(Self::CursorDown),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputAction {
    InsertCharacter(char),
    DeleteBackward,
    InsertLineBreak,
    MoveCursor,
    Commit,
    ExitFocus,
    NoTextTarget,
}

pub fn resolve_text_input(event: TextInputEvent, has_target: bool) -> TextInputAction {
    if !has_target {
        return TextInputAction::NoTextTarget;
    }
    match event {
        TextInputEvent::Character(c) => TextInputAction::InsertCharacter(c),
        TextInputEvent::Backspace => TextInputAction::DeleteBackward,
        TextInputEvent::Enter => TextInputAction::InsertLineBreak,
        TextInputEvent::CtrlEnter => TextInputAction::Commit,
        TextInputEvent::Escape => TextInputAction::ExitFocus,
        TextInputEvent::CursorLeft
        | TextInputEvent::CursorRight
        | TextInputEvent::CursorUp
        | TextInputEvent::CursorDown => TextInputAction::MoveCursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_text_input_requires_target() {
        assert_eq!(
            resolve_text_input(TextInputEvent::Character('a'), false),
            TextInputAction::NoTextTarget
        );
        assert_eq!(
            resolve_text_input(TextInputEvent::Character('a'), true),
            TextInputAction::InsertCharacter('a')
        );
    }

    #[test]
    fn resolve_text_input_maps_commit_and_exit() {
        assert_eq!(
            resolve_text_input(TextInputEvent::CtrlEnter, true),
            TextInputAction::Commit
        );
        assert_eq!(
            resolve_text_input(TextInputEvent::Escape, true),
            TextInputAction::ExitFocus
        );
        assert_eq!(
            resolve_text_input(TextInputEvent::CursorUp, true),
            TextInputAction::MoveCursor
        );
    }

    #[test]
    fn from_key_skips_control_chords() {
        let ctrl = ShortcutModifiers::new(true, false);
        assert_eq!(TextInputEvent::from_key(ShortcutKey::Character('c'), ctrl), None);
        assert_eq!(
            TextInputEvent::from_key(ShortcutKey::Enter, ctrl),
            Some(TextInputEvent::CtrlEnter)
        );
        assert_eq!(
            TextInputEvent::from_key(
                ShortcutKey::Character('Z'),
                ShortcutModifiers::new(false, true)
            ),
            Some(TextInputEvent::Character('Z'))
        );
        assert_eq!(
            TextInputEvent::from_key(ShortcutKey::Delete, ShortcutModifiers::default()),
            None
        );
    }
}
