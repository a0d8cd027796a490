use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::Window,
};

use crate::{demo::DemoState, engine, rendering::renderer::Renderer, screen::ScreenOverlay};

struct App {
    renderer: Option<Renderer>,
    overlay: Option<ScreenOverlay>,
    demo_state: DemoState,
    last_frame: Instant,
}

impl App {
    fn from_demo_state(demo_state: DemoState) -> Self {
        Self {
            renderer: None,
            overlay: None,
            demo_state,
            last_frame: Instant::now(),
        }
    }

    fn track_overlay(&self) {
        let (Some(renderer), Some(overlay)) = (self.renderer.as_ref(), self.overlay.as_ref())
        else {
            return;
        };

        if let Some(world) = self.demo_state.scene.object_world_matrix(self.demo_state.screen) {
            overlay.track(&world, &self.demo_state.camera.view_projection(), renderer.size);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let window_attributes = Window::default_attributes().with_title("deskmac");
        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let renderer = pollster::block_on(Renderer::new(window.clone())).unwrap();
        self.demo_state.camera.resize(renderer.size);

        let overlay = ScreenOverlay::new(window.as_ref()).expect("Failed to create screen overlay");

        self.renderer = Some(renderer);
        self.overlay = Some(overlay);

        self.renderer
            .as_mut()
            .unwrap()
            .load_models(&mut self.demo_state)
            .unwrap();
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(new_size);
                }
                self.demo_state.camera.resize(new_size);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(renderer) = self.renderer.as_ref() {
                    self.demo_state.interaction.set_pointer(position, renderer.size);
                }
                self.demo_state
                    .orbit
                    .drag_to(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.demo_state.orbit.begin_drag(),
                ElementState::Released => self.demo_state.orbit.end_drag(),
            },
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Enter)
                {
                    self.demo_state.log_camera_pose();
                }
            }
            WindowEvent::RedrawRequested => {
                let delta_time = self.last_frame.elapsed().as_secs_f32();
                self.last_frame = Instant::now();

                engine::update(&mut self.demo_state, delta_time);

                let Some(renderer) = self.renderer.as_mut() else {
                    return;
                };
                renderer.window.request_redraw();

                match renderer.render(&mut self.demo_state) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }

                self.track_overlay();
            }
            _ => (),
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let demo_state = DemoState::new().context("Failed to create demo state")?;
    let mut app = App::from_demo_state(demo_state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
