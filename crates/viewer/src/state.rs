//! Viewer state: owns the scene, camera and renderer and runs one frame per redraw.

use crate::config::ViewerConfig;
use anyhow::Result;
use engine_core::{Formation, FormationState, Time};
use input::InputState;
use morph::TreeScene;
use renderer::{OrbitCamera, Renderer};
use std::sync::Arc;
use winit::{
    event::{MouseScrollDelta, WindowEvent},
    keyboard::PhysicalKey,
    window::Window,
};

pub const WINDOW_TITLE: &str = "Tinsel";

pub struct ViewerState {
    window: Arc<Window>,
    time: Time,
    input: InputState,
    formation: FormationState,
    scene: TreeScene,
    camera: OrbitCamera,
    renderer: Renderer,
    pub running: bool,
}

impl ViewerState {
    pub async fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self> {
        let mut renderer = Renderer::new(window.clone(), config.vsync).await?;

        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("Generating tree scene (seed {})", seed);
        let scene = TreeScene::generate_seeded(&config.tree, seed)?;
        renderer.prepare_scene(&scene);

        let mut camera = OrbitCamera::default();
        let (width, height) = renderer.dimensions();
        camera.set_aspect(width, height);

        let state = Self {
            window,
            time: Time::new(),
            input: InputState::new(),
            formation: FormationState::new(config.start_formation),
            scene,
            camera,
            renderer,
            running: true,
        };
        state.update_title();
        Ok(state)
    }

    /// Returns true when the app should exit.
    pub fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                return true;
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.camera.set_aspect(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_cursor_position((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.input.process_scroll_lines(y),
                MouseScrollDelta::PixelDelta(pos) => self.input.process_scroll_pixels(pos.y),
            },
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    log::error!("Render error: {}", e);
                }
                self.window.request_redraw();
            }
            _ => {}
        }
        false
    }

    fn update(&mut self) {
        self.time.update();
        self.input.begin_frame();

        if self.input.is_quit_pressed() {
            self.running = false;
        }
        if self.input.is_toggle_pressed() {
            self.formation.toggle();
            self.update_title();
        }

        let delta_time = self.time.delta_seconds();
        let formation = self.formation.get();

        let (_, height) = self.renderer.dimensions();
        self.camera.orbit(self.input.drag_delta(), height);
        self.camera.zoom(self.input.scroll());
        self.camera.update(delta_time, formation.is_tree());

        let report = self.scene.frame(delta_time, self.time.elapsed_seconds(), formation);
        if report.ribbon_rebuilt {
            log::trace!("Ribbon rebuilt on frame {}", self.time.frame_count());
        }

        self.input.end_frame();
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.sync(&mut self.scene);
        self.renderer.update_camera(&self.camera);
        self.renderer.render()
    }

    fn update_title(&self) {
        self.window.set_title(&title_for(self.formation.get()));
    }
}

/// Window title showing the current status and what the toggle will do.
pub fn title_for(formation: Formation) -> String {
    format!(
        "{} | {} | [Space] {}",
        WINDOW_TITLE,
        formation.status_label(),
        formation.action_label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_names_the_next_action() {
        let scattered = title_for(Formation::Scattered);
        assert!(scattered.contains("ELEMENTS DISPERSED"));
        assert!(scattered.ends_with("ASSEMBLE TREE"));

        let tree = title_for(Formation::TreeShape);
        assert!(tree.ends_with("SCATTER ELEMENTS"));
    }
}
