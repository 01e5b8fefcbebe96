use std::collections::HashSet;

use winit::event::{DeviceEvent, ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels of a precise scroll gesture that count as one wheel line
const PIXELS_PER_LINE: f64 = 20.0;

#[derive(Debug, Default, PartialEq, Clone)]
struct InputState {
    /// Keys held down
    keys_held: HashSet<KeyCode>,
    /// Mouse movement accumulated this frame
    mouse_delta: (f64, f64),
    /// Amount of scroll
    scroll_delta: (f32, f32),
}

impl InputState {
    // rolling over to the next frame, deciding which values to keep and which not
    fn rollover(&mut self) {
        self.mouse_delta = (0., 0.);
        self.scroll_delta = (0., 0.);
    }
}

/// Keyboard and mouse state for the current frame.
///
/// Owned by the event loop; fed every winit event, read by the game loop, then rolled over.
#[derive(Debug, Default)]
pub struct Input {
    state: InputState,
    state_prev: InputState,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, event: &Event<()>) {
        match event {
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state,
                                ..
                            },
                        ..
                    },
                ..
            } => self.set_key(*code, *state == ElementState::Pressed),
            Event::WindowEvent {
                event: WindowEvent::MouseWheel { delta, .. },
                ..
            } => match delta {
                MouseScrollDelta::LineDelta(x, y) => self.add_scroll(*x, *y),
                MouseScrollDelta::PixelDelta(position) => self.add_scroll(
                    (position.x / PIXELS_PER_LINE) as f32,
                    (position.y / PIXELS_PER_LINE) as f32,
                ),
            },
            // lost keys would stay held otherwise
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => self.state.keys_held.clear(),
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => self.add_mouse_delta(delta.0, delta.1),
            _ => {}
        }
    }

    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.state.keys_held.insert(key);
        } else {
            self.state.keys_held.remove(&key);
        }
    }

    /// Accumulates raw mouse motion; y grows downwards on screen and is inverted here
    pub fn add_mouse_delta(&mut self, dx: f64, dy: f64) {
        self.state.mouse_delta.0 += dx;
        self.state.mouse_delta.1 -= dy;
    }

    pub fn add_scroll(&mut self, dx: f32, dy: f32) {
        self.state.scroll_delta.0 += dx;
        self.state.scroll_delta.1 += dy;
    }

    // run this right after the gameloop update
    /// Rolls the input state over to next frame
    pub fn rollover_state(&mut self) {
        self.state_prev = self.state.clone();
        self.state.rollover();
    }

    /// Returns whether the key was pressed this frame
    pub fn button_was_down(&self, key: KeyCode) -> bool {
        !self.state_prev.keys_held.contains(&key) && self.state.keys_held.contains(&key)
    }

    /// Returns whether the key is pressed down right now
    pub fn button_down(&self, key: KeyCode) -> bool {
        self.state.keys_held.contains(&key)
    }

    /// Returns the mouse movement since the last rollover, with y pointing up
    pub fn mouse_delta(&self) -> (f64, f64) {
        self.state.mouse_delta
    }

    /// Returns the scroll since the last rollover
    pub fn scroll_delta(&self) -> (f32, f32) {
        self.state.scroll_delta
    }
}
