//! Headless demo runner
//!
//! Builds the configured demo, replays its scripted gesture frame by frame
//! and steps the simulation at the configured fixed rate.

use crate::config::AppConfig;
use crate::input::GestureScript;
use crate::systems::SimulationSystem;
use demo2d_core::{DemoScene, SceneKind, SceneManager};

/// What a run left behind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub scene: SceneKind,
    pub frames: u64,
    pub steps: u64,
    pub bodies: usize,
    pub joints: usize,
}

pub struct DemoApp {
    config: AppConfig,
    scene_manager: SceneManager,
    scene: Box<dyn DemoScene>,
    simulation: SimulationSystem,
    script: GestureScript,
    frame: u64,
}

impl DemoApp {
    pub fn new(config: AppConfig) -> Self {
        let scene_manager =
            SceneManager::new(config.scene_settings()).with_start(config.demo.start_kind());
        let scene = scene_manager.current();
        let script =
            GestureScript::for_scene(scene_manager.current_kind(), scene_manager.settings());
        let simulation = SimulationSystem::new(config.physics.fixed_timestep);

        log::info!(
            "Running {} for {} frames ({} scripted touches)",
            scene.name(),
            config.demo.frames,
            script.len()
        );

        Self {
            config,
            scene_manager,
            scene,
            simulation,
            script,
            frame: 0,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scene(&self) -> &dyn DemoScene {
        self.scene.as_ref()
    }

    pub fn scene_kind(&self) -> SceneKind {
        self.scene_manager.current_kind()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Deliver this frame's touches, then advance one frame of simulated time
    pub fn step_frame(&mut self) {
        for event in self.script.events_at(self.frame) {
            self.scene.on_touch(event);
        }
        let dt = self.simulation.fixed_timestep();
        self.simulation.update(self.scene.as_mut(), dt);
        self.frame += 1;
    }

    /// Run the configured number of frames
    pub fn run(&mut self) -> RunSummary {
        let frames = self.config.demo.frames;
        for _ in 0..frames {
            self.step_frame();
            if self.frame % 60 == 0 {
                log::debug!(
                    "{} frame {}: {} bodies",
                    self.scene.name(),
                    self.frame,
                    self.scene.world().body_count()
                );
            }
        }
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            scene: self.scene_kind(),
            frames: self.frame,
            steps: self.simulation.total_steps(),
            bodies: self.scene.world().body_count(),
            joints: self.scene.world().joint_count(),
        }
    }

    /// Switch to the next demo, restarting its gesture
    pub fn next_scene(&mut self) {
        self.scene = self.scene_manager.next();
        self.restart();
    }

    /// Switch to the previous demo, restarting its gesture
    pub fn previous_scene(&mut self) {
        self.scene = self.scene_manager.previous();
        self.restart();
    }

    fn restart(&mut self) {
        self.script = GestureScript::for_scene(
            self.scene_manager.current_kind(),
            self.scene_manager.settings(),
        );
        self.simulation.reset();
        self.frame = 0;
        log::info!("Switched to {}", self.scene.name());
    }
}
