//! Scene session state.
//!
//! [`Session`] is the explicit state object a host application owns instead
//! of ambient globals: the current container, the decorated item list, and
//! optional drop-simulator state. It is created once, replaced wholesale on
//! each successful load, and drives the simulation frame by frame.
//!
//! Single-threaded and cooperative: every operation is synchronous and
//! bounded, producing a fully consistent snapshot before the host presents a
//! frame.

use crate::analyze::{self, DecoratedItem, SpaceUtilization, WeightLoad};
use crate::error::{Error, Result};
use crate::payload::{self, Container};
use crate::physics::{DropConfig, DropReport, DropSimulator};

/// Session state for one loaded scene.
#[derive(Debug)]
pub struct Session {
    container: Option<Container>,
    items: Vec<DecoratedItem>,
    simulator: Option<DropSimulator>,
    drop_config: DropConfig,
}

impl Session {
    /// Creates an empty session with the default drop configuration.
    pub fn new() -> Self {
        Self {
            container: None,
            items: Vec::new(),
            simulator: None,
            drop_config: DropConfig::default(),
        }
    }

    /// Creates an empty session with a custom drop configuration.
    ///
    /// The configuration applies to simulations started after this call.
    pub fn with_drop_config(drop_config: DropConfig) -> Self {
        Self {
            drop_config,
            ..Self::new()
        }
    }

    /// Parses and analyzes a raw payload, replacing the scene wholesale.
    ///
    /// Any running simulation is torn down before the new state becomes
    /// visible, so no frame ever observes stale physics references. On
    /// failure the previous scene stays untouched.
    pub fn load(&mut self, raw: &str) -> Result<()> {
        let parsed = payload::parse(raw)?;
        let items = analyze::decorate(&parsed.container, &parsed.items);

        self.simulator = None;
        self.container = Some(parsed.container);
        self.items = items;
        log::debug!("scene loaded: {} item(s)", self.items.len());
        Ok(())
    }

    /// Returns the loaded container, if any.
    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    /// Returns the decorated items of the current scene.
    pub fn items(&self) -> &[DecoratedItem] {
        &self.items
    }

    /// Returns true when a scene is loaded.
    pub fn is_loaded(&self) -> bool {
        self.container.is_some() && !self.items.is_empty()
    }

    /// Computes space utilization for the current scene.
    pub fn utilization(&self) -> Option<SpaceUtilization> {
        let container = self.container.as_ref()?;
        let items: Vec<_> = self.items.iter().map(|d| d.item.clone()).collect();
        Some(analyze::space_utilization(container, &items))
    }

    /// Computes the weight load for the current scene.
    pub fn weight_load(&self) -> Option<WeightLoad> {
        let container = self.container.as_ref()?;
        let items: Vec<_> = self.items.iter().map(|d| d.item.clone()).collect();
        Some(analyze::weight_load(container, &items))
    }

    /// Returns true while the drop simulation is running.
    pub fn gravity_enabled(&self) -> bool {
        self.simulator.is_some()
    }

    /// Enables the drop simulation for the current scene.
    ///
    /// Fails with [`Error::SimulationPrecondition`] when no scene is loaded;
    /// the simulation stays stopped. Enabling twice is a no-op.
    pub fn enable_gravity(&mut self) -> Result<()> {
        if self.simulator.is_some() {
            return Ok(());
        }
        if self.container.is_none() {
            return Err(Error::SimulationPrecondition(
                "load a scene before enabling gravity".to_string(),
            ));
        }
        self.simulator = Some(DropSimulator::start(self.drop_config.clone(), &self.items)?);
        Ok(())
    }

    /// Disables the drop simulation, discarding its state immediately.
    pub fn disable_gravity(&mut self) {
        self.simulator = None;
    }

    /// Advances the drop simulation by `delta` seconds. No-op while gravity
    /// is disabled.
    ///
    /// Settled heights are written into the item records, but `outside` and
    /// `has_collision` flags are NOT recomputed — the simulation is cosmetic
    /// and the flags reflect the last full decoration pass. Call
    /// [`Session::redecorate`] for fresh flags.
    pub fn advance(&mut self, delta: f64) {
        let (Some(simulator), Some(container)) = (self.simulator.as_mut(), self.container.as_ref())
        else {
            return;
        };
        simulator.step(container, &mut self.items, delta);
    }

    /// Runs the simulation to rest with a fixed step. Enables gravity if it
    /// was not already enabled.
    pub fn settle(&mut self, dt: f64, max_time: f64) -> Result<DropReport> {
        self.enable_gravity()?;
        match (self.simulator.as_mut(), self.container.as_ref()) {
            (Some(simulator), Some(container)) => {
                Ok(simulator.run_to_rest(container, &mut self.items, dt, max_time))
            }
            _ => Err(Error::SimulationPrecondition(
                "load a scene before enabling gravity".to_string(),
            )),
        }
    }

    /// Returns true when gravity is enabled and every item has settled.
    pub fn settled(&self) -> bool {
        self.simulator
            .as_ref()
            .map(DropSimulator::settled)
            .unwrap_or(false)
    }

    /// Recomputes containment and collision flags from current positions.
    ///
    /// Colors stay stable because decoration is input-order based.
    pub fn redecorate(&mut self) {
        let Some(container) = self.container.as_ref() else {
            return;
        };
        let items: Vec<_> = self.items.iter().map(|d| d.item.clone()).collect();
        self.items = analyze::decorate(container, &items);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "box": { "width": 100, "height": 100, "depth": 100, "maxWeight": 50 },
        "items": [
            { "id": "a", "width": 20, "height": 20, "depth": 20, "weight": 5,
              "position": {"x": 0, "y": 30, "z": 0} }
        ]
    }"#;

    #[test]
    fn test_load_and_query() {
        let mut session = Session::new();
        session.load(VALID).unwrap();
        assert!(session.is_loaded());
        assert_eq!(session.items().len(), 1);
        assert!(session.utilization().is_some());
        assert!(!session.weight_load().unwrap().overweight);
    }

    #[test]
    fn test_failed_load_preserves_prior_scene() {
        let mut session = Session::new();
        session.load(VALID).unwrap();
        assert!(session.load("{ bad json").is_err());
        assert!(session.is_loaded());
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_gravity_requires_loaded_scene() {
        let mut session = Session::new();
        let err = session.enable_gravity().unwrap_err();
        assert!(matches!(err, Error::SimulationPrecondition(_)));
        assert!(!session.gravity_enabled());
    }

    #[test]
    fn test_gravity_toggle_lifecycle() {
        let mut session = Session::new();
        session.load(VALID).unwrap();

        session.enable_gravity().unwrap();
        assert!(session.gravity_enabled());
        // Idempotent.
        session.enable_gravity().unwrap();

        session.disable_gravity();
        assert!(!session.gravity_enabled());
    }

    #[test]
    fn test_reload_tears_down_simulation() {
        let mut session = Session::new();
        session.load(VALID).unwrap();
        session.enable_gravity().unwrap();
        session.load(VALID).unwrap();
        assert!(!session.gravity_enabled());
    }

    #[test]
    fn test_advance_is_noop_when_disabled() {
        let mut session = Session::new();
        session.load(VALID).unwrap();
        let before = session.items()[0].item.position.y;
        session.advance(0.016);
        assert_eq!(session.items()[0].item.position.y, before);
    }

    #[test]
    fn test_settle_reaches_floor_rest() {
        let mut session = Session::new();
        session.load(VALID).unwrap();
        let report = session.settle(1.0 / 60.0, 30.0).unwrap();
        assert!(report.settled);

        let container = session.container().unwrap();
        let expected = container.floor_y() + 10.0;
        assert!((session.items()[0].item.position.y - expected).abs() < 1e-9);
        assert!(session.settled());
    }

    #[test]
    fn test_redecorate_refreshes_flags() {
        let mut session = Session::new();
        session.load(VALID).unwrap();
        // Item starts inside; after settling it still is, but force a stale
        // check by moving it out and redecorating.
        session.settle(1.0 / 60.0, 30.0).unwrap();
        assert!(!session.items()[0].outside);
        session.redecorate();
        assert!(!session.items()[0].outside);
    }
}
