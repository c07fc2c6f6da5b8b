//! Vertical-drop settling simulation.
//!
//! A deliberately simple discrete-time integrator that lets packed items
//! "fall" and settle on the container floor or on top of already-grounded
//! items. Only the y axis is driven: no rotation, no friction, no horizontal
//! sliding, no simultaneous multi-body solve. Items are processed
//! independently within a step in input order, so stacking outcomes are
//! reproducible for the same input ordering.
//!
//! The simulator never fails once started; it only refuses to start on an
//! empty item set. Settled heights are written back into the shared item
//! records so downstream display stays consistent.

use crate::analyze::DecoratedItem;
use crate::error::{Error, Result};
use crate::payload::{Container, Item};
use serde::Serialize;

/// Configuration for the drop simulation.
#[derive(Debug, Clone)]
pub struct DropConfig {
    /// Gravity acceleration in cm/s² (negative for downward). The default
    /// is a scaled-down constant chosen for visual speed, not SI gravity.
    pub gravity: f64,
    /// Bounce damping factor applied on contact (0.0-1.0).
    pub damping: f64,
    /// Maximum integration step in seconds; larger frame deltas are clamped
    /// to bound integration error at low frame rates.
    pub max_step: f64,
    /// Vertical speed (cm/s) below which a bouncing item is considered
    /// settled and marked grounded.
    pub rest_velocity: f64,
    /// Vertical proximity window (cm) for detecting a stack contact with a
    /// grounded item below.
    pub stack_tolerance: f64,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            gravity: -98.0,
            damping: 0.8,
            max_step: 0.033,
            rest_velocity: 1.0,
            stack_tolerance: 2.0,
        }
    }
}

impl DropConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gravity acceleration (negative for downward).
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets the bounce damping factor.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    /// Sets the maximum integration step.
    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step.max(0.001);
        self
    }

    /// Sets the settle velocity threshold.
    pub fn with_rest_velocity(mut self, rest_velocity: f64) -> Self {
        self.rest_velocity = rest_velocity.max(0.0);
        self
    }
}

/// Per-item integration state, parallel to the session's item list.
#[derive(Debug, Clone)]
struct DropBody {
    velocity_y: f64,
    grounded: bool,
}

/// Summary of a [`DropSimulator::run_to_rest`] call.
#[derive(Debug, Clone, Serialize)]
pub struct DropReport {
    /// Number of integration steps performed.
    pub steps: usize,
    /// Simulated time in seconds.
    pub simulated_time: f64,
    /// Number of items that ended grounded.
    pub grounded: usize,
    /// True when every item settled within the time budget.
    pub settled: bool,
}

/// Drop simulator state, created when gravity is enabled and discarded when
/// it is disabled or a new payload loads.
#[derive(Debug)]
pub struct DropSimulator {
    config: DropConfig,
    bodies: Vec<DropBody>,
}

impl DropSimulator {
    /// Creates simulator state for the given item set.
    ///
    /// Refuses an empty set: the start request is a recoverable user error
    /// and the simulation stays stopped.
    pub fn start(config: DropConfig, items: &[DecoratedItem]) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::SimulationPrecondition(
                "load a scene with at least one item first".to_string(),
            ));
        }

        let bodies = items
            .iter()
            .map(|_| DropBody {
                velocity_y: 0.0,
                grounded: false,
            })
            .collect();

        Ok(Self { config, bodies })
    }

    /// Returns true when every item has settled.
    pub fn settled(&self) -> bool {
        self.bodies.iter().all(|body| body.grounded)
    }

    /// Returns the number of grounded items.
    pub fn grounded_count(&self) -> usize {
        self.bodies.iter().filter(|body| body.grounded).count()
    }

    /// Advances the simulation by `delta` seconds (clamped to the configured
    /// maximum step) and writes resulting heights back into `items`.
    ///
    /// `items` must be the same list, in the same order, that the simulator
    /// was started with.
    pub fn step(&mut self, container: &Container, items: &mut [DecoratedItem], delta: f64) {
        debug_assert_eq!(items.len(), self.bodies.len());
        let dt = delta.min(self.config.max_step);

        for index in 0..self.bodies.len() {
            if self.bodies[index].grounded {
                continue;
            }

            self.bodies[index].velocity_y += self.config.gravity * dt;
            let new_y = items[index].item.position.y + self.bodies[index].velocity_y * dt;

            let floor_y = container.floor_y() + items[index].item.height / 2.0;
            if new_y <= floor_y {
                items[index].item.position.y = floor_y;
                self.bounce(index);
                continue;
            }

            // The proximity test uses the pre-step height; first grounded
            // support in input order wins.
            match self.find_support(items, index) {
                Some(support) => {
                    let rest_y = items[support].item.position.y
                        + items[support].item.height / 2.0
                        + items[index].item.height / 2.0;
                    items[index].item.position.y = rest_y;
                    self.bounce(index);
                }
                None => {
                    items[index].item.position.y = new_y;
                }
            }
        }
    }

    /// Runs fixed `dt` steps until everything settles or `max_time` seconds
    /// of simulated time elapse.
    pub fn run_to_rest(
        &mut self,
        container: &Container,
        items: &mut [DecoratedItem],
        dt: f64,
        max_time: f64,
    ) -> DropReport {
        let dt = dt.max(0.001);
        let max_steps = (max_time / dt).ceil() as usize;

        let mut steps = 0;
        while steps < max_steps && !self.settled() {
            self.step(container, items, dt);
            steps += 1;
        }

        DropReport {
            steps,
            simulated_time: steps as f64 * dt.min(self.config.max_step),
            grounded: self.grounded_count(),
            settled: self.settled(),
        }
    }

    /// Reflects the vertical velocity with damping; settles the item once
    /// the bounce speed drops below the rest threshold.
    fn bounce(&mut self, index: usize) {
        let body = &mut self.bodies[index];
        body.velocity_y = -body.velocity_y * self.config.damping;
        if body.velocity_y.abs() < self.config.rest_velocity {
            body.velocity_y = 0.0;
            body.grounded = true;
        }
    }

    /// Finds the first already-grounded item, in input order, that the
    /// falling item rests on: x/z extents overlap and the falling bottom is
    /// within the stack tolerance of the support top.
    fn find_support(&self, items: &[DecoratedItem], index: usize) -> Option<usize> {
        let falling = &items[index].item;
        (0..items.len()).find(|&other| {
            other != index && self.bodies[other].grounded && stacks_on(falling, &items[other].item, self.config.stack_tolerance)
        })
    }
}

/// Horizontal AABB overlap plus vertical proximity between a falling item's
/// bottom face and a support's top face.
fn stacks_on(falling: &Item, below: &Item, tolerance: f64) -> bool {
    let falling_min_x = falling.position.x - falling.width / 2.0;
    let falling_max_x = falling.position.x + falling.width / 2.0;
    let falling_min_z = falling.position.z - falling.depth / 2.0;
    let falling_max_z = falling.position.z + falling.depth / 2.0;

    let below_min_x = below.position.x - below.width / 2.0;
    let below_max_x = below.position.x + below.width / 2.0;
    let below_min_z = below.position.z - below.depth / 2.0;
    let below_max_z = below.position.z + below.depth / 2.0;

    let overlap_x = falling_min_x < below_max_x && falling_max_x > below_min_x;
    let overlap_z = falling_min_z < below_max_z && falling_max_z > below_min_z;

    let falling_bottom = falling.position.y - falling.height / 2.0;
    let below_top = below.position.y + below.height / 2.0;

    overlap_x
        && overlap_z
        && falling_bottom <= below_top + tolerance
        && falling_bottom >= below_top - tolerance
}
