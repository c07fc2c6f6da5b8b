//! # PackViz Core
//!
//! Geometric validation and layout analysis for box-packing payloads.
//!
//! This crate is the engine behind a packing-plan viewer: it parses a JSON
//! description of a box and the items packed inside it, flags items that
//! exceed the box bounds or overlap each other, computes space and weight
//! utilization, and offers a toy vertical-drop simulation that lets items
//! settle visually. Rendering is someone else's job — the core exposes plain
//! data (decorated items, utilization stats, per-frame positions) that any
//! presenter can consume.
//!
//! ## Components
//!
//! - [`payload`]: parses raw text into a typed container + item list,
//!   rejecting malformed input with the offending field path
//! - [`analyze`]: AABB containment and collision flags, palette colors,
//!   space/weight utilization
//! - [`physics`]: the drop simulator (vertical-only, position-correcting,
//!   deliberately simple)
//! - [`session`]: explicit scene state owned by the host application
//! - [`share`]: Base64/percent codec for shareable-link payloads
//! - [`samples`]: generated demo payloads for the standard carton sizes
//!
//! ## Example
//!
//! ```
//! use packviz_core::Session;
//!
//! let raw = r#"{
//!     "box": { "width": 100, "height": 100, "depth": 100, "maxWeight": 50 },
//!     "items": [
//!         { "width": 50, "height": 50, "depth": 50, "weight": 10,
//!           "position": {"x": 0, "y": 0, "z": 0} }
//!     ]
//! }"#;
//!
//! let mut session = Session::new();
//! session.load(raw)?;
//! assert!(!session.items()[0].outside);
//! let stats = session.utilization().unwrap();
//! assert!((stats.utilization_percent - 12.5).abs() < 1e-9);
//! # Ok::<(), packviz_core::Error>(())
//! ```

pub mod analyze;
pub mod error;
pub mod payload;
pub mod physics;
pub mod samples;
pub mod session;
pub mod share;

// Re-exports
pub use analyze::{
    decorate, space_utilization, weight_load, Aabb, DecoratedItem, Efficiency, SpaceUtilization,
    WeightLoad, PALETTE,
};
pub use error::{Error, Result};
pub use payload::{parse, Container, Item, Payload};
pub use physics::{DropConfig, DropReport, DropSimulator};
pub use samples::{sample_payload, SampleConfig, SAMPLE_CONFIGS};
pub use session::Session;
pub use share::{decode_payload_param, encode_payload_param};
