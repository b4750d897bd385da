#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Enter,
    Escape,
    Delete,
    Backspace,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub text_input_active: bool,
    pub has_selection: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    EditorDeleteSelection,
    EditorDeselect,
    EditorBringToFront,
    EditorSendToBack,
    EditorAddText,
    EditorExport,
}

fn resolve_selection_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Delete, false, false) | (ShortcutKey::Backspace, false, false) => {
            Some(ShortcutAction::EditorDeleteSelection)
        }
        (ShortcutKey::Escape, false, false) => Some(ShortcutAction::EditorDeselect),
        (ShortcutKey::Character(']'), true, _) => Some(ShortcutAction::EditorBringToFront),
        (ShortcutKey::Character('['), true, _) => Some(ShortcutAction::EditorSendToBack),
        _ => None,
    }
}

fn resolve_editor_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Character('s'), true, _) => Some(ShortcutAction::EditorExport),
        (ShortcutKey::Character('t'), false, false) => Some(ShortcutAction::EditorAddText),
        _ => None,
    }
}

/// Editor-level shortcuts. Keys typed into an editing text box resolve through
/// [`super::resolve_text_input`] instead, so this yields nothing while text input is active.
pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    if context.text_input_active {
        return None;
    }

    if context.has_selection {
        if let Some(action) = resolve_selection_shortcut(key, modifiers) {
            return Some(action);
        }
    }

    resolve_editor_shortcut(key, modifiers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_shortcut_is_silent_during_text_input() {
        let context = InputContext {
            text_input_active: true,
            has_selection: true,
        };
        assert_eq!(
            resolve_shortcut(ShortcutKey::Escape, ShortcutModifiers::default(), context),
            None
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Delete, ShortcutModifiers::default(), context),
            None
        );
        assert_eq!(
            resolve_shortcut(
                ShortcutKey::Character('t'),
                ShortcutModifiers::default(),
                context
            ),
            None
        );
    }

    #[test]
    fn resolve_shortcut_maps_selection_shortcuts() {
        let context = InputContext {
            has_selection: true,
            ..Default::default()
        };
        assert_eq!(
            resolve_shortcut(ShortcutKey::Delete, ShortcutModifiers::default(), context),
            Some(ShortcutAction::EditorDeleteSelection)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Backspace, ShortcutModifiers::default(), context),
            Some(ShortcutAction::EditorDeleteSelection)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Escape, ShortcutModifiers::default(), context),
            Some(ShortcutAction::EditorDeselect)
        );
        assert_eq!(
            resolve_shortcut(
                ShortcutKey::Character(']'),
                ShortcutModifiers::new(true, false),
                context
            ),
            Some(ShortcutAction::EditorBringToFront)
        );
        assert_eq!(
            resolve_shortcut(
                ShortcutKey::Character('['),
                ShortcutModifiers::new(true, false),
                context
            ),
            Some(ShortcutAction::EditorSendToBack)
        );
    }

    #[test]
    fn resolve_shortcut_without_selection_ignores_delete() {
        let context = InputContext::default();
        assert_eq!(
            resolve_shortcut(ShortcutKey::Delete, ShortcutModifiers::default(), context),
            None
        );
        assert_eq!(
            resolve_shortcut(
                ShortcutKey::Character('s'),
                ShortcutModifiers::new(true, false),
                context
            ),
            Some(ShortcutAction::EditorExport)
        );
        assert_eq!(
            resolve_shortcut(
                ShortcutKey::Character('t'),
                ShortcutModifiers::default(),
                context
            ),
            Some(ShortcutAction::EditorAddText)
        );
    }
}
