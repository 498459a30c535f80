//! Game simulation system
//!
//! Manages the simulation loop:
//! - Frame delta capping
//! - Fixed timestep accumulation
//! - Scene stepping

use demo2d_core::DemoScene;

/// Longest frame the accumulator will accept, in seconds
pub const MAX_FRAME_DT: f32 = 0.25;

/// Shortest fixed step accepted, in seconds
pub const MIN_FIXED_TIMESTEP: f32 = 1.0 / 1000.0;

/// Steps a scene at a fixed rate regardless of frame timing
pub struct SimulationSystem {
    fixed_timestep: f32,
    accumulator: f32,
    total_steps: u64,
}

impl SimulationSystem {
    /// Create a new simulation system stepping every `fixed_timestep` seconds
    pub fn new(fixed_timestep: f32) -> Self {
        let fixed_timestep = if fixed_timestep.is_nan() || fixed_timestep <= 0.0 {
            log::warn!("Invalid fixed timestep {}, using 1/60 s", fixed_timestep);
            1.0 / 60.0
        } else if fixed_timestep < MIN_FIXED_TIMESTEP {
            log::warn!(
                "Fixed timestep {} too small, using {} s",
                fixed_timestep,
                MIN_FIXED_TIMESTEP
            );
            MIN_FIXED_TIMESTEP
        } else {
            fixed_timestep
        };
        Self {
            fixed_timestep,
            accumulator: 0.0,
            total_steps: 0,
        }
    }

    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Simulated time not yet consumed by a step
    pub fn pending_time(&self) -> f32 {
        self.accumulator
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Run one frame, returning how many fixed steps were taken
    pub fn update(&mut self, scene: &mut dyn DemoScene, frame_dt: f32) -> u32 {
        // Cap dt to prevent spiral of death after a stall
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep {
            scene.update(self.fixed_timestep);
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }
        self.total_steps += steps as u64;
        steps
    }

    /// Drop any partial step, e.g. after switching scenes
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
