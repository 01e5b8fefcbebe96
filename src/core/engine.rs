use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use glam::Vec3;
use log::{error, info};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::assets::obj::ObjModel;
use crate::config::ViewerConfig;
use crate::graphics::gl::GlDevice;
use crate::graphics::shader::Shader;
use crate::graphics::texture::Texture;
use crate::graphics::RenderDevice;
use crate::scene::Scene;

use super::camera::Camera;
use super::gameloop::{FpsCounter, GameLoop};
use super::input::Input;
use super::window::{Dimensions, Window, WindowInfo};

pub struct EngineInit {
    pub eventloop: EventLoop<()>,
    pub engine: Engine,
}

impl EngineInit {
    /// Opens the window and sets up the scene described by `config`.
    ///
    /// Window, context, shader and required texture failures are fatal. A model that fails to
    /// load is logged and the viewer starts without it.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let eventloop = EventLoop::new().context("Could not create the event loop")?;
        let info = WindowInfo {
            initial_dimensions: Dimensions {
                width: config.width,
                height: config.height,
            },
            title: config.title.clone(),
        };
        let (window, gl) = info
            .build(&eventloop)
            .context("Could not open a window with an OpenGL context")?;

        let device: Rc<dyn RenderDevice> = Rc::new(GlDevice::new(gl));
        let size = window.inner_size();
        device.set_viewport(size.width, size.height);

        let mut scene = Scene::new(device.clone());
        scene.set_clear_color(config.clear_color);
        scene.set_flip_textures(config.flip_textures);

        let shader = Shader::from_files(
            device.clone(),
            &config.vertex_shader,
            &config.fragment_shader,
        )
        .context("Could not build the shader program")?;
        scene.add_shader(shader);

        for path in &config.textures {
            let texture = Texture::from_file(device.clone(), path, config.flip_textures)
                .with_context(|| format!("Could not load texture `{}`", path.display()))?;
            scene.add_texture(texture);
        }

        let aspect = aspect_ratio(size);
        for _ in 0..config.camera_count {
            scene.add_camera(
                Camera::builder()
                    .position(Vec3::from(config.camera_position))
                    .movement_speed(config.camera_speed)
                    .mouse_sensitivity(config.mouse_sensitivity)
                    .aspect(aspect)
                    .build(),
            );
        }

        load_model(&mut scene, &config);

        Ok(Self {
            eventloop,
            engine: Engine {
                scene,
                window,
                input: Input::new(),
                gameloop: GameLoop::new(),
                fps: FpsCounter::new(FpsCounter::REFRESH),
                title: config.title,
            },
        })
    }

    /// Runs until the window is closed
    pub fn start(self) -> Result<()> {
        let EngineInit {
            eventloop,
            mut engine,
        } = self;
        engine.window.on_start();

        eventloop.run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);
            engine.input.update(&event);

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => target.exit(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    } => target.exit(),
                    WindowEvent::Resized(size) => engine.resize(size.width, size.height),
                    WindowEvent::Focused(focus) => engine.window.on_focus(focus),
                    WindowEvent::RedrawRequested => engine.frame(),
                    _ => {}
                },
                Event::AboutToWait => engine.window.request_redraw(),
                _ => {}
            }
        })?;

        info!("Window closed");
        Ok(())
    }
}

fn load_model(scene: &mut Scene, config: &ViewerConfig) {
    let model = match ObjModel::load_with_policy(&config.model, config.split_policy) {
        Ok(model) => model,
        Err(e) => {
            error!("Could not load `{}`: {}", config.model.display(), e);
            return;
        }
    };

    match model.create_meshes(scene.device()) {
        Ok(meshes) => {
            info!("Created {} meshes", meshes.len());
            for mesh in meshes {
                scene.add_mesh(mesh);
            }
        }
        Err(e) => error!("Could not upload `{}`: {}", config.model.display(), e),
    }
}

fn aspect_ratio(size: Dimensions) -> f32 {
    size.width.max(1) as f32 / size.height.max(1) as f32
}

// the scene holds GL objects and is dropped before the window owning the context
pub struct Engine {
    pub scene: Scene,
    pub window: Window,
    pub input: Input,
    pub gameloop: GameLoop,
    fps: FpsCounter,
    title: String,
}

impl Engine {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.window.resize(width, height);
        self.scene.device().set_viewport(width, height);

        let aspect = aspect_ratio(Dimensions { width, height });
        for camera in self.scene.cameras() {
            camera.borrow_mut().set_aspect_ratio(aspect);
        }
    }

    pub(crate) fn frame(&mut self) {
        let delta = self.gameloop.tick();
        self.gameloop.update(&self.input, &mut self.scene, delta);
        self.scene.render();
        self.window.swap_buffers();
        self.input.rollover_state();

        if let Some((fps, frame_time)) = self.fps.frame(Instant::now()) {
            self.window.set_title(&format!(
                "{} - {:.0} FPS ({:.2} ms)",
                self.title, fps, frame_time
            ));
        }
    }
}
