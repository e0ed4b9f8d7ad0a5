//! Runtime simulation settings
//!
//! `Parameters` holds every switch and magnitude read during a step:
//! - force toggles (collisions, radial/vertical gravity, friction, springs),
//! - force magnitudes and the spring network thresholds,
//! - rectangle density and the default body damping,
//! - time-scale exponent, pause flag, and the frame delta policy used by drivers
//!
//! The simulation owns one `Parameters` value; callers change it through the
//! explicit mutation methods below instead of shared global state.

use std::time::Duration;

use crate::error::{Error, Result};

/// World bounds supplied on every step. The world spans `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One of the boolean switches in [`Parameters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Collisions,
    RadialGravity,
    VerticalGravity,
    BackgroundFriction,
    Springs,
}

impl Toggle {
    pub const ALL: [Toggle; 5] = [
        Toggle::Collisions,
        Toggle::RadialGravity,
        Toggle::VerticalGravity,
        Toggle::BackgroundFriction,
        Toggle::Springs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Toggle::Collisions => "collisions",
            Toggle::RadialGravity => "gravity radial",
            Toggle::VerticalGravity => "gravity vertical",
            Toggle::BackgroundFriction => "background friction",
            Toggle::Springs => "springs",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub collisions: bool,
    pub radial_gravity: bool,
    pub vertical_gravity: bool,
    pub background_friction: bool,
    pub springs: bool,

    pub radial_gravity_force: f64, // G in G*m1*m2/d^2
    pub vertical_gravity_force: f64, // added to vy per unit time
    pub friction_force: f64, // constant magnitude opposing motion
    pub spring_force: f64, // stiffness
    pub spring_damping: f64, // relative-velocity damping
    pub rest_length: f64, // spring length with zero stretch force
    pub initial_connection_distance: f64, // seeding threshold used at scene setup
    pub max_spring_distance: f64, // edges form below and break above this
    pub max_connections_per_node: usize, // cap on outgoing and on incoming edges
    pub cubic_pixel_mass: f64, // rectangle density
    pub damping: f64, // default damping for newly built bodies

    pub simulation_speed_exponent: i32, // speed = 2^exponent
    pub paused: bool,

    pub variable_timestep: bool,
    pub target_fps: u32,
    pub max_frame_time: Duration,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            collisions: true,
            radial_gravity: false,
            vertical_gravity: false,
            background_friction: false,
            springs: false,

            radial_gravity_force: 0.1,
            vertical_gravity_force: 0.1,
            friction_force: 1.0,
            spring_force: 1.0,
            spring_damping: 0.5,
            rest_length: 20.0,
            initial_connection_distance: 0.0,
            max_spring_distance: 25.0,
            max_connections_per_node: 600_000,
            cubic_pixel_mass: 0.001,
            damping: 1.0,

            simulation_speed_exponent: 0,
            paused: true,

            variable_timestep: true,
            target_fps: 100,
            max_frame_time: Duration::from_millis(100),
        }
    }
}

impl Parameters {
    pub fn is_enabled(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Collisions => self.collisions,
            Toggle::RadialGravity => self.radial_gravity,
            Toggle::VerticalGravity => self.vertical_gravity,
            Toggle::BackgroundFriction => self.background_friction,
            Toggle::Springs => self.springs,
        }
    }

    pub fn set(&mut self, toggle: Toggle, on: bool) {
        let flag = match toggle {
            Toggle::Collisions => &mut self.collisions,
            Toggle::RadialGravity => &mut self.radial_gravity,
            Toggle::VerticalGravity => &mut self.vertical_gravity,
            Toggle::BackgroundFriction => &mut self.background_friction,
            Toggle::Springs => &mut self.springs,
        };
        *flag = on;
    }

    /// Flip a switch, returning its new state
    pub fn toggle(&mut self, toggle: Toggle) -> bool {
        let on = !self.is_enabled(toggle);
        self.set(toggle, on);
        on
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Shift the time-scale exponent by `change` (+1 doubles the speed)
    pub fn change_simulation_speed(&mut self, change: i32) {
        self.simulation_speed_exponent = self.simulation_speed_exponent.saturating_add(change);
    }

    pub fn simulation_speed(&self) -> f64 {
        2f64.powi(self.simulation_speed_exponent)
    }

    /// Wall-clock duration of one frame at `target_fps`
    pub fn optimal_frame_time(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }

    /// Step delta for a frame that took `elapsed`.
    ///
    /// Measured in units of the optimal frame time (1.0 at exactly `target_fps`),
    /// fixed to 1.0 without variable timestep, scaled by the simulation speed and
    /// clamped to `max_frame_time`.
    pub fn frame_delta(&self, elapsed: Duration) -> f64 {
        let optimal = self.optimal_frame_time().as_secs_f64();
        let mut delta = if self.variable_timestep {
            elapsed.as_secs_f64() / optimal
        } else {
            1.0
        };
        delta *= self.simulation_speed();
        let max_delta = self.max_frame_time.as_secs_f64() / optimal;
        delta.min(max_delta)
    }

    /// Reject values that make the force model meaningless
    pub fn validate(&self) -> Result<()> {
        let magnitudes = [
            ("radial_gravity_force", self.radial_gravity_force),
            ("vertical_gravity_force", self.vertical_gravity_force),
            ("spring_force", self.spring_force),
            ("rest_length", self.rest_length),
        ];
        for (name, value) in magnitudes {
            if !value.is_finite() {
                return Err(Error::InvalidParam(format!("{name} must be finite, got {value}")));
            }
        }
        let non_negative = [
            ("friction_force", self.friction_force),
            ("spring_damping", self.spring_damping),
            ("initial_connection_distance", self.initial_connection_distance),
            ("max_spring_distance", self.max_spring_distance),
            ("damping", self.damping),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParam(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        if !self.cubic_pixel_mass.is_finite() || self.cubic_pixel_mass <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "cubic_pixel_mass must be finite and > 0, got {}",
                self.cubic_pixel_mass
            )));
        }
        if self.target_fps == 0 {
            return Err(Error::InvalidParam("target_fps must be > 0".into()));
        }
        // no edge could ever form
        if self.springs && self.max_connections_per_node == 0 {
            return Err(Error::InvalidParam(
                "max_connections_per_node must be > 0 when springs are enabled".into(),
            ));
        }
        Ok(())
    }
}
