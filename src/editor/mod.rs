//! Interactive canvas: owns the render stack, mirrors it into the layer store and turns
//! pointer and keyboard input into selection, transforms and in-place text editing.

mod session;
mod transform;

pub use hit_test::{
    body_contains, control_points, handle_at, hit_test, ControlPoints, Corner, Hit, HitPart,
    HANDLE_HIT_RADIUS, HANDLE_SIZE, ROTATION_HANDLE_OFFSET,
};
pub use session::{Caption, EditorSession, PollOutcome, ValidationError};
pub use transform::{normalize_degrees, DragKind, DragSession};

use crate::geometry::{Point, Size};
use crate::input::{
    resolve_shortcut, resolve_text_input, InputContext, ShortcutAction, ShortcutKey,
    ShortcutModifiers, TextInputAction, TextInputEvent,
};
use crate::layers::LayerStore;
use crate::scene::{
    create_image_object, create_shape_object, create_text_object, ImagePixels, LoadResult,
    ObjectId, SceneStack,
};
use crate::state::{InteractionEvent, InteractionState, StateMachine};
use crate::viewport::refit_background;

#[derive(Debug)]
pub struct EditorCanvas {
    stack: SceneStack,
    layers: LayerStore,
    machine: StateMachine,
    surface: Size,
    fit_margin: f64,
    drag: Option<DragSession>,
    render_needed: bool,
}

impl EditorCanvas {
    pub fn new(surface: Size, fit_margin: f64) -> Self {
        Self {
            stack: SceneStack::new(),
            layers: LayerStore::new(),
            machine: StateMachine::new(),
            surface,
            fit_margin,
            drag: None,
            render_needed: true,
        }
    }

    pub fn stack(&self) -> &SceneStack {
        &self.stack
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    /// Mutable access for observer registration.
    pub fn layers_mut(&mut self) -> &mut LayerStore {
        &mut self.layers
    }

    pub fn state(&self) -> InteractionState {
        self.machine.state()
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.machine.state().active_object()
    }

    pub fn surface_size(&self) -> Size {
        self.surface
    }

    pub fn fit_margin(&self) -> f64 {
        self.fit_margin
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn set_surface_size(&mut self, surface: Size) {
        self.surface = surface;
        refit_background(&mut self.stack, surface, self.fit_margin);
        self.render_needed = true;
    }

    pub fn render_needed(&self) -> bool {
        self.render_needed
    }

    /// Returns and clears the pending redraw flag.
    pub fn take_render_needed(&mut self) -> bool {
        std::mem::take(&mut self.render_needed)
    }

    /// Drops every object and selection, leaving an empty surface.
    pub fn clear(&mut self) {
        self.drag = None;
        self.transition(InteractionEvent::Reset);
        self.stack.clear();
        self.layers.clear();
        self.render_needed = true;
    }

    /// Places decoded pixels as the background, replacing any previous one.
    pub fn set_background(
        &mut self,
        source_url: impl Into<String>,
        pixels: ImagePixels,
    ) -> LoadResult<ObjectId> {
        let id = self.stack.allocate_id();
        let object = create_image_object(id, source_url, pixels, self.surface, self.fit_margin)?;
        if let Some(replaced) = self.stack.push(object) {
            tracing::debug!(id = %replaced.id, "background replaced");
        }
        // Observers see the swap as a single change.
        self.sync_layers();
        tracing::info!(%id, "background image placed");
        Ok(id)
    }

    /// Adds a default text box, selects it and starts editing.
    pub fn add_text(&mut self) -> ObjectId {
        self.settle_editing();
        let id = self.stack.allocate_id();
        let object = create_text_object(id, self.surface);
        let kind = object.layer_kind();
        self.stack.push(object);
        self.layers.add(id, kind, true);
        self.sync_layers();
        if self.select(id) {
            self.begin_editing();
        }
        id
    }

    /// Adds a shape by toolbar name and selects it. Unknown names add nothing.
    pub fn add_shape(&mut self, subtype: &str) -> Option<ObjectId> {
        let id = self.stack.allocate_id();
        let object = create_shape_object(id, subtype, self.surface)?;
        self.settle_editing();
        let kind = object.layer_kind();
        self.stack.push(object);
        self.layers.add(id, kind, true);
        self.sync_layers();
        self.select(id);
        Some(id)
    }

    pub fn delete_selected(&mut self) -> Option<ObjectId> {
        self.settle_editing();
        let InteractionState::Selected(id) = self.machine.state() else {
            return None;
        };
        self.drag = None;
        self.stack.remove(id);
        self.layers.remove(id);
        self.transition(InteractionEvent::Delete);
        self.sync_layers();
        tracing::debug!(%id, "object deleted");
        Some(id)
    }

    pub fn bring_to_front(&mut self) -> bool {
        let Some(id) = self.selected() else {
            return false;
        };
        if !self.stack.bring_to_front(id) {
            return false;
        }
        self.layers.bring_to_front(id);
        self.sync_layers();
        true
    }

    pub fn send_to_back(&mut self) -> bool {
        let Some(id) = self.selected() else {
            return false;
        };
        if !self.stack.send_to_back(id) {
            return false;
        }
        self.layers.send_to_back(id);
        self.sync_layers();
        true
    }

    /// Makes `id` the active object. Fails while another object is being edited.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.stack.get(id).is_some_and(|object| object.is_selectable()) {
            return false;
        }
        if self.selected() == Some(id) {
            return true;
        }
        let selected = self.transition(InteractionEvent::Select(id));
        self.render_needed |= selected;
        selected
    }

    pub fn deselect(&mut self) -> bool {
        self.settle_editing();
        if self.selected().is_none() {
            return false;
        }
        let deselected = self.transition(InteractionEvent::Deselect);
        self.render_needed |= deselected;
        deselected
    }

    /// Enters in-place editing on the selected text object.
    pub fn begin_editing(&mut self) -> bool {
        let Some(id) = self.selected() else {
            return false;
        };
        if self.stack.get(id).and_then(|object| object.as_text()).is_none() {
            return false;
        }
        if !self.transition(InteractionEvent::BeginEditing) {
            return false;
        }
        if let Some(text) = self.stack.get_mut(id).and_then(|object| object.as_text_mut()) {
            text.move_cursor_to_end();
        }
        self.render_needed = true;
        true
    }

    pub fn commit_editing(&mut self) -> bool {
        let InteractionState::Editing(id) = self.machine.state() else {
            return false;
        };
        if !self.transition(InteractionEvent::Commit) {
            return false;
        }
        if let Some(object) = self.stack.get_mut(id) {
            object.refresh_text_bounds();
        }
        self.sync_layers();
        true
    }

    pub fn pointer_down(&mut self, point: Point) {
        let hit = hit_test(&self.stack, self.selected(), point);
        let Some(Hit { id, part }) = hit else {
            self.drag = None;
            self.deselect();
            return;
        };

        if let InteractionState::Editing(editing) = self.machine.state() {
            if editing == id && part == HitPart::Body {
                return;
            }
            self.commit_editing();
        }
        if !self.select(id) {
            return;
        }
        if let Some(object) = self.stack.get(id) {
            self.drag = Some(DragSession::begin(id, part, point, object.geometry));
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        let Some(drag) = self.drag else {
            return;
        };
        let Some(object) = self.stack.get_mut(drag.id) else {
            self.drag = None;
            return;
        };
        object.geometry = drag.apply(point);
        self.render_needed = true;
    }

    pub fn pointer_up(&mut self, point: Point) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if let Some(object) = self.stack.get_mut(drag.id) {
            object.geometry = drag.apply(point);
            tracing::trace!(id = %drag.id, kind = ?drag.kind, "transform finished");
        }
        self.sync_layers();
    }

    /// Double-clicking a text body starts editing it.
    pub fn double_click(&mut self, point: Point) -> bool {
        self.drag = None;
        let Some(Hit { id, .. }) = hit_test(&self.stack, self.selected(), point) else {
            return false;
        };
        if self.stack.get(id).and_then(|object| object.as_text()).is_none() {
            return false;
        }
        if self.machine.state() == InteractionState::Editing(id) {
            return true;
        }
        self.settle_editing();
        self.select(id) && self.begin_editing()
    }

    /// Routes a key press. Returns the editor shortcut it resolved to, if any;
    /// [`ShortcutAction::EditorExport`] is left for the host to carry out.
    pub fn key_press(
        &mut self,
        key: ShortcutKey,
        modifiers: ShortcutModifiers,
    ) -> Option<ShortcutAction> {
        let state = self.machine.state();
        let context = InputContext {
            text_input_active: state.is_editing(),
            has_selection: state.active_object().is_some(),
        };
        let Some(action) = resolve_shortcut(key, modifiers, context) else {
            if let InteractionState::Editing(id) = state {
                self.handle_text_key(id, key, modifiers);
            }
            return None;
        };
        match action {
            ShortcutAction::EditorDeleteSelection => {
                self.delete_selected();
            }
            ShortcutAction::EditorDeselect => {
                self.deselect();
            }
            ShortcutAction::EditorBringToFront => {
                self.bring_to_front();
            }
            ShortcutAction::EditorSendToBack => {
                self.send_to_back();
            }
            ShortcutAction::EditorAddText => {
                self.add_text();
            }
            ShortcutAction::EditorExport => {}
        }
        Some(action)
    }

    fn handle_text_key(&mut self, id: ObjectId, key: ShortcutKey, modifiers: ShortcutModifiers) {
        let Some(event) = TextInputEvent::from_key(key, modifiers) else {
            return;
        };
        let has_target = self.stack.get(id).is_some_and(|object| object.as_text().is_some());
        match resolve_text_input(event, has_target) {
            TextInputAction::Commit | TextInputAction::ExitFocus => {
                self.commit_editing();
            }
            TextInputAction::NoTextTarget => {
                tracing::warn!(%id, "editing target is not a text object");
                self.transition(InteractionEvent::Reset);
            }
            action => self.apply_text_action(id, action, event),
        }
    }

    fn apply_text_action(&mut self, id: ObjectId, action: TextInputAction, event: TextInputEvent) {
        let Some(object) = self.stack.get_mut(id) else {
            return;
        };
        let Some(text) = object.as_text_mut() else {
            return;
        };
        let changed = match action {
            TextInputAction::InsertCharacter(c) => {
                text.insert_char(c);
                true
            }
            TextInputAction::DeleteBackward => text.delete_backward(),
            TextInputAction::InsertLineBreak => {
                text.insert_newline();
                true
            }
            TextInputAction::MoveCursor => match event {
                TextInputEvent::CursorLeft => text.move_cursor_left(),
                TextInputEvent::CursorRight => text.move_cursor_right(),
                TextInputEvent::CursorUp => text.move_cursor_up(),
                TextInputEvent::CursorDown => text.move_cursor_down(),
                _ => false,
            },
            _ => false,
        };
        if changed {
            object.refresh_text_bounds();
            self.render_needed = true;
        }
    }

    /// Transiently clears selection. Pair with [`EditorCanvas::restore_selection`].
    pub(crate) fn suspend_selection(&mut self) -> InteractionState {
        let previous = self.machine.state();
        self.drag = None;
        if previous != InteractionState::Idle {
            if let InteractionState::Editing(id) = previous {
                if let Some(object) = self.stack.get_mut(id) {
                    object.refresh_text_bounds();
                }
            }
            self.transition(InteractionEvent::Reset);
        }
        previous
    }

    pub(crate) fn restore_selection(&mut self, previous: InteractionState) {
        match previous {
            InteractionState::Idle => {}
            InteractionState::Selected(id) => {
                self.select(id);
            }
            InteractionState::Editing(id) => {
                if self.select(id) {
                    self.transition(InteractionEvent::BeginEditing);
                }
            }
        }
        self.render_needed = true;
    }

    fn settle_editing(&mut self) {
        if self.machine.state().is_editing() {
            self.commit_editing();
        }
    }

    fn transition(&mut self, event: InteractionEvent) -> bool {
        self.machine.transition(event).is_ok()
    }

    fn sync_layers(&mut self) {
        self.layers.reorder_from_render_stack(&self.stack.entries());
        self.render_needed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DEFAULT_FIT_MARGIN;
    use crate::layers::{Layer, LayerKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    const SURFACE: Size = Size::new(800, 600);

    fn canvas() -> EditorCanvas {
        EditorCanvas::new(SURFACE, DEFAULT_FIT_MARGIN)
    }

    fn with_background(canvas: &mut EditorCanvas) -> ObjectId {
        let pixels = ImagePixels::from_rgba(image::RgbaImage::new(400, 300));
        canvas.set_background("mem://bg", pixels).unwrap()
    }

    fn key(key: ShortcutKey) -> (ShortcutKey, ShortcutModifiers) {
        (key, ShortcutModifiers::default())
    }

    #[test]
    fn add_rectangle_add_circle_delete_leaves_rectangle() {
        let mut canvas = canvas();
        let bg = with_background(&mut canvas);
        let rect = canvas.add_shape("rectangle").unwrap();
        let circle = canvas.add_shape("circle").unwrap();
        assert_eq!(canvas.selected(), Some(circle));

        assert_eq!(canvas.delete_selected(), Some(circle));
        assert_eq!(
            canvas.layers().list(),
            vec![
                Layer { id: bg, kind: LayerKind::Image },
                Layer { id: rect, kind: LayerKind::Shape },
            ]
        );
        assert_eq!(canvas.state(), InteractionState::Idle);
    }

    #[test]
    fn delete_only_object_goes_idle_and_second_delete_is_noop() {
        let mut canvas = canvas();
        canvas.add_shape("triangle").unwrap();
        assert!(canvas.delete_selected().is_some());
        assert_eq!(canvas.state(), InteractionState::Idle);
        assert_eq!(canvas.delete_selected(), None);
        assert!(canvas.layers().is_empty());
        assert!(canvas.stack().is_empty());
    }

    #[test]
    fn unknown_shape_adds_nothing() {
        let mut canvas = canvas();
        canvas.take_render_needed();
        assert_eq!(canvas.add_shape("hexagon"), None);
        assert!(canvas.stack().is_empty());
        assert!(!canvas.render_needed());
    }

    #[test]
    fn add_text_enters_editing_and_typing_updates_content() {
        let mut canvas = canvas();
        let id = canvas.add_text();
        assert_eq!(canvas.state(), InteractionState::Editing(id));

        let (k, m) = key(ShortcutKey::Character('!'));
        assert_eq!(canvas.key_press(k, m), None);
        let (k, m) = key(ShortcutKey::Enter);
        canvas.key_press(k, m);
        let (k, m) = key(ShortcutKey::Character('x'));
        canvas.key_press(k, m);
        let (k, m) = key(ShortcutKey::Backspace);
        canvas.key_press(k, m);

        let text = canvas.stack().get(id).and_then(|object| object.as_text()).unwrap();
        assert_eq!(text.content, "Edit this text!\n");

        let (k, m) = key(ShortcutKey::Escape);
        canvas.key_press(k, m);
        assert_eq!(canvas.state(), InteractionState::Selected(id));
        let height = canvas.stack().get(id).unwrap().geometry.height;
        assert!(height > 39.0);
    }

    #[test]
    fn ctrl_enter_commits_and_delete_key_is_text_safe_while_editing() {
        let mut canvas = canvas();
        let id = canvas.add_text();
        canvas.key_press(ShortcutKey::Delete, ShortcutModifiers::default());
        assert!(canvas.stack().contains(id));
        canvas.key_press(ShortcutKey::Enter, ShortcutModifiers::new(true, false));
        assert_eq!(canvas.state(), InteractionState::Selected(id));

        assert_eq!(
            canvas.key_press(ShortcutKey::Delete, ShortcutModifiers::default()),
            Some(ShortcutAction::EditorDeleteSelection)
        );
        assert!(!canvas.stack().contains(id));
    }

    #[test]
    fn shortcut_letters_type_into_text_while_editing() {
        let mut canvas = canvas();
        let id = canvas.add_text();
        let (k, m) = key(ShortcutKey::Character('t'));
        assert_eq!(canvas.key_press(k, m), None);
        assert_eq!(canvas.stack().len(), 1);
        let text = canvas.stack().get(id).and_then(|object| object.as_text()).unwrap();
        assert_eq!(text.content, "Edit this textt");

        canvas.commit_editing();
        assert_eq!(canvas.key_press(k, m), Some(ShortcutAction::EditorAddText));
        assert_eq!(canvas.stack().len(), 2);
    }

    #[test]
    fn arrange_acts_on_selection_and_keeps_background_first() {
        let mut canvas = canvas();
        let bg = with_background(&mut canvas);
        let a = canvas.add_shape("rectangle").unwrap();
        let b = canvas.add_shape("circle").unwrap();
        assert!(canvas.send_to_back());
        assert_eq!(canvas.stack().ids(), vec![bg, b, a]);
        assert_eq!(canvas.layers().ids(), canvas.stack().ids());

        canvas.select(b);
        assert!(canvas.bring_to_front());
        assert_eq!(canvas.layers().ids(), vec![bg, a, b]);

        canvas.deselect();
        assert!(!canvas.bring_to_front());
        assert!(!canvas.send_to_back());
    }

    #[test]
    fn pointer_drag_moves_selected_shape() {
        let mut canvas = canvas();
        let id = canvas.add_shape("rectangle").unwrap();
        canvas.deselect();

        canvas.pointer_down(Point::new(400.0, 300.0));
        assert_eq!(canvas.selected(), Some(id));
        canvas.pointer_move(Point::new(420.0, 310.0));
        canvas.pointer_up(Point::new(430.0, 320.0));
        assert_eq!(
            canvas.stack().get(id).unwrap().geometry.center,
            Point::new(430.0, 320.0)
        );
        assert!(!canvas.is_dragging());
    }

    #[test]
    fn corner_drag_resizes_and_empty_click_deselects() {
        let mut canvas = canvas();
        let id = canvas.add_shape("rectangle").unwrap();
        // Bottom-right corner of the 100x80 rectangle centered at (400, 300).
        canvas.pointer_down(Point::new(450.0, 340.0));
        canvas.pointer_up(Point::new(500.0, 380.0));
        let scale = canvas.stack().get(id).unwrap().geometry.scale;
        assert!((scale - 2.0).abs() < 1e-9);

        canvas.pointer_down(Point::new(10.0, 10.0));
        assert_eq!(canvas.state(), InteractionState::Idle);
    }

    #[test]
    fn double_click_edits_text_and_clicking_elsewhere_commits() {
        let mut canvas = canvas();
        let text = canvas.add_text();
        canvas.commit_editing();
        canvas.deselect();
        let shape = canvas.add_shape("rectangle").unwrap();
        canvas.stack.get_mut(shape).unwrap().geometry.center = Point::new(100.0, 100.0);

        assert!(canvas.double_click(Point::new(400.0, 300.0)));
        assert_eq!(canvas.state(), InteractionState::Editing(text));

        canvas.pointer_down(Point::new(100.0, 100.0));
        assert_eq!(canvas.state(), InteractionState::Selected(shape));
        assert!(!canvas.double_click(Point::new(100.0, 100.0)));
    }

    #[test]
    fn background_cannot_be_selected() {
        let mut canvas = canvas();
        let bg = with_background(&mut canvas);
        assert!(!canvas.select(bg));
        canvas.pointer_down(Point::new(400.0, 300.0));
        assert_eq!(canvas.state(), InteractionState::Idle);
    }

    #[test]
    fn layer_observers_follow_mutations() {
        let mut canvas = canvas();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        canvas
            .layers_mut()
            .subscribe(move |layers| sink.borrow_mut().push(layers.len()));

        canvas.add_shape("rectangle");
        canvas.add_shape("star");
        canvas.delete_selected();
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn replacing_background_never_shows_two_images() {
        let mut canvas = canvas();
        let snapshots: Rc<RefCell<Vec<Vec<Layer>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&snapshots);
        canvas
            .layers_mut()
            .subscribe(move |layers| sink.borrow_mut().push(layers.to_vec()));

        let first = with_background(&mut canvas);
        canvas.add_shape("rectangle");
        assert_eq!(canvas.layers().ids()[0], first);
        let second = with_background(&mut canvas);

        for snapshot in snapshots.borrow().iter() {
            let images = snapshot
                .iter()
                .filter(|layer| layer.kind == LayerKind::Image)
                .count();
            assert!(images <= 1, "two image layers in {snapshot:?}");
        }
        assert_eq!(canvas.layers().ids(), canvas.stack().ids());
        assert_eq!(canvas.layers().ids()[0], second);
        assert_eq!(snapshots.borrow().len(), 3);
    }

    #[test]
    fn surface_resize_refits_background_only() {
        let mut canvas = canvas();
        let bg = with_background(&mut canvas);
        let shape = canvas.add_shape("circle").unwrap();
        canvas.set_surface_size(Size::new(400, 300));
        let background = canvas.stack().get(bg).unwrap();
        assert_eq!(background.geometry.center, Point::new(200.0, 150.0));
        assert!((background.geometry.scale - 0.9).abs() < 1e-9);
        assert_eq!(
            canvas.stack().get(shape).unwrap().geometry.center,
            Point::new(400.0, 300.0)
        );
    }

    #[test]
    fn suspend_and_restore_round_trip_editing_state() {
        let mut canvas = canvas();
        let id = canvas.add_text();
        let previous = canvas.suspend_selection();
        assert_eq!(canvas.state(), InteractionState::Idle);
        canvas.restore_selection(previous);
        assert_eq!(canvas.state(), InteractionState::Editing(id));
    }

    #[test]
    fn clear_resets_everything() {
        let mut canvas = canvas();
        with_background(&mut canvas);
        canvas.add_text();
        canvas.clear();
        assert!(canvas.stack().is_empty());
        assert!(canvas.layers().is_empty());
        assert_eq!(canvas.state(), InteractionState::Idle);
    }
}
