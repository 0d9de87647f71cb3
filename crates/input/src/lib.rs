//! Input handling for keyboard and mouse.

use glam::Vec2;
use std::collections::HashSet;

/// Cursor travel (pixels) under which a press/release pair counts as a click.
pub const CLICK_SLOP: f32 = 4.0;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,
    /// Mouse buttons released this frame.
    mouse_released: HashSet<MouseButton>,
    /// Released this frame without being dragged.
    mouse_clicked: HashSet<MouseButton>,

    /// Cursor position in window coordinates; unknown until the first move.
    mouse_position: Option<Vec2>,
    /// Cursor movement while the primary button is held, this frame.
    drag_delta: Vec2,
    accumulated_drag: Vec2,
    /// Total travel since the primary button went down.
    drag_distance: f32,

    /// Scroll this frame, in lines; positive is away from the user.
    scroll: f32,
    accumulated_scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch accumulated motion and clear last frame's edges. Call once per
    /// frame before reading input.
    pub fn begin_frame(&mut self) {
        self.drag_delta = std::mem::take(&mut self.accumulated_drag);
        self.scroll = std::mem::take(&mut self.accumulated_scroll);
    }

    /// Drop this frame's one-shot state. Call once per frame after reading input.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.mouse_clicked.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.mouse_held.insert(button) {
                    self.mouse_pressed.insert(button);
                }
                if button == MouseButton::Left {
                    self.drag_distance = 0.0;
                }
            }
            ElementState::Released => {
                if self.mouse_held.remove(&button) {
                    let dragged = button == MouseButton::Left && self.drag_distance > CLICK_SLOP;
                    if !dragged {
                        self.mouse_clicked.insert(button);
                    }
                }
                self.mouse_released.insert(button);
            }
        }
    }

    /// Process a cursor move. Movement with the left button held is a drag.
    /// The first sample only sets the baseline.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        let position = Vec2::new(position.0 as f32, position.1 as f32);
        if let Some(last) = self.mouse_position {
            if self.is_mouse_held(MouseButton::Left) {
                let delta = position - last;
                self.accumulated_drag += delta;
                self.drag_distance += delta.length();
            }
        }
        self.mouse_position = Some(position);
    }

    /// Process scroll, in lines.
    pub fn process_scroll_lines(&mut self, lines: f32) {
        if lines.is_finite() {
            self.accumulated_scroll += lines;
        }
    }

    /// Process scroll reported in pixels (touchpads).
    pub fn process_scroll_pixels(&mut self, pixels: f64) {
        const PIXELS_PER_LINE: f64 = 40.0;
        self.process_scroll_lines((pixels / PIXELS_PER_LINE) as f32);
    }

    // Query methods

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    /// Released this frame after a press with no drag.
    pub fn is_mouse_clicked(&self, button: MouseButton) -> bool {
        self.mouse_clicked.contains(&button)
    }

    pub fn mouse_position(&self) -> Option<Vec2> {
        self.mouse_position
    }

    /// Cursor movement while dragging with the left button, this frame.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Scroll this frame, in lines.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Space, Enter, or a left click without a drag.
    pub fn is_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Space)
            || self.is_key_pressed(KeyCode::Enter)
            || self.is_key_pressed(KeyCode::NumpadEnter)
            || self.is_mouse_clicked(MouseButton::Left)
    }

    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
