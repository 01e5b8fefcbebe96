use std::time::{Duration, Instant};

use winit::keyboard::KeyCode;

use crate::scene::Scene;

use super::camera::Movement;
use super::input::Input;

const MOVEMENT_KEYS: [(KeyCode, Movement); 6] = [
    (KeyCode::KeyW, Movement::Forward),
    (KeyCode::KeyS, Movement::Backward),
    (KeyCode::KeyA, Movement::Left),
    (KeyCode::KeyD, Movement::Right),
    (KeyCode::Space, Movement::Upward),
    (KeyCode::ShiftLeft, Movement::Downward),
];

const CAMERA_SLOT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Applies the frame's input to the scene.
pub struct GameLoop {
    last_frame: Instant,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Seconds since the previous tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        delta
    }

    pub fn update(&self, input: &Input, scene: &mut Scene, delta: f32) {
        if input.button_was_down(KeyCode::KeyE) {
            scene.next_camera();
        }
        if input.button_was_down(KeyCode::KeyQ) {
            scene.previous_camera();
        }
        for (slot, key) in CAMERA_SLOT_KEYS.iter().enumerate() {
            if input.button_was_down(*key) {
                scene.set_active_camera(slot);
            }
        }

        let camera = match scene.active_camera() {
            Some(camera) => camera,
            None => return,
        };
        let mut camera = camera.borrow_mut();

        for (key, movement) in MOVEMENT_KEYS {
            if input.button_down(key) {
                camera.process_keyboard(movement, delta);
            }
        }

        let (dx, dy) = input.mouse_delta();
        if dx != 0.0 || dy != 0.0 {
            camera.process_mouse_movement(dx as f32, dy as f32, true);
        }

        let (_, scroll) = input.scroll_delta();
        if scroll != 0.0 {
            camera.process_mouse_scroll(scroll);
        }
    }
}

/// Counts frames and reports the average rate every `interval`.
#[derive(Debug)]
pub struct FpsCounter {
    interval: Duration,
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    pub const REFRESH: Duration = Duration::from_millis(250);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            frames: 0,
            since: Instant::now(),
        }
    }

    /// Counts one frame at `now`; returns `(fps, frame time in ms)` when an interval has passed
    pub fn frame(&mut self, now: Instant) -> Option<(f32, f32)> {
        self.frames += 1;

        let elapsed = now.duration_since(self.since);
        if elapsed < self.interval {
            return None;
        }

        let seconds = elapsed.as_secs_f32();
        let fps = self.frames as f32 / seconds;
        let frame_time = seconds * 1000.0 / self.frames as f32;
        self.frames = 0;
        self.since = now;
        Some((fps, frame_time))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::camera::Camera;
    use crate::graphics::testing::RecordingDevice;
    use glam::Vec3;

    fn scene_with_cameras(count: usize) -> Scene {
        let mut scene = Scene::new(RecordingDevice::new());
        for _ in 0..count {
            scene.add_camera(Camera::default());
        }
        scene
    }

    #[test]
    fn test_movement() {
        let mut scene = scene_with_cameras(1);
        let mut input = Input::new();
        input.set_key(KeyCode::KeyW, true);
        input.set_key(KeyCode::Space, true);

        GameLoop::new().update(&input, &mut scene, 0.4);

        let position = scene.cameras()[0].borrow().position();
        assert!(position.abs_diff_eq(Vec3::new(0.0, 1.0, 2.0), 1e-5));
    }

    #[test]
    fn test_camera_switching() {
        let mut scene = scene_with_cameras(3);
        let gameloop = GameLoop::new();
        let mut input = Input::new();

        input.set_key(KeyCode::KeyE, true);
        gameloop.update(&input, &mut scene, 0.0);
        assert_eq!(scene.active_camera_index(), Some(1));

        // held keys only switch once
        input.rollover_state();
        gameloop.update(&input, &mut scene, 0.0);
        assert_eq!(scene.active_camera_index(), Some(1));

        input.set_key(KeyCode::KeyE, false);
        input.set_key(KeyCode::KeyQ, true);
        input.rollover_state();
        input.set_key(KeyCode::Digit3, true);
        gameloop.update(&input, &mut scene, 0.0);
        assert_eq!(scene.active_camera_index(), Some(2));

        input.set_key(KeyCode::Digit9, true);
        input.rollover_state();
        input.set_key(KeyCode::Digit3, false);
        input.rollover_state();
        input.set_key(KeyCode::Digit3, true);
        gameloop.update(&input, &mut scene, 0.0);
        assert_eq!(scene.active_camera_index(), Some(2));
    }

    #[test]
    fn test_mouse_only_moves_active_camera() {
        let mut scene = scene_with_cameras(2);
        let mut input = Input::new();
        input.add_mouse_delta(0.0, -10_000.0);
        input.add_scroll(0.0, 5.0);

        GameLoop::new().update(&input, &mut scene, 0.016);

        let active = scene.cameras()[0].borrow();
        assert_eq!(active.pitch(), 89.0);
        assert_eq!(active.fov(), 40.0);
        assert_eq!(scene.cameras()[1].borrow().pitch(), 0.0);
    }

    #[test]
    fn test_fps_counter() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(FpsCounter::REFRESH);
        counter.since = start;

        for i in 1..10 {
            assert!(counter.frame(start + Duration::from_millis(i * 10)).is_none());
        }
        let (fps, frame_time) = counter.frame(start + Duration::from_millis(250)).unwrap();
        assert!((fps - 40.0).abs() < 1e-3);
        assert!((frame_time - 25.0).abs() < 1e-3);
        assert_eq!(counter.frames, 0);
    }
}
