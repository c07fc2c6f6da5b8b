//! Geometric analysis of a validated payload.
//!
//! Given a container and its item list, this module computes per-item
//! containment and pairwise collision flags, assigns display colors, and
//! aggregates space and weight utilization. All items are treated as
//! axis-aligned, unrotated boxes.
//!
//! The collision pass is O(n²) over all items, which is fine at the scale
//! this tool targets (single-digit to low tens of items). A broad-phase
//! structure could be added without changing observable behavior.

use crate::payload::{Container, Item};
use nalgebra::Point3;
use serde::Serialize;

/// Fixed display palette; colors are assigned by input order, cycling.
pub const PALETTE: [&str; 7] = [
    "#0ea5e9", "#f97316", "#34d399", "#a855f7", "#f43f5e", "#14b8a6", "#facc15",
];

/// Tolerance for the containment test, in cm.
pub const CONTAINMENT_EPSILON: f64 = 1e-4;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Creates an AABB from a center point and full dimensions.
    pub fn from_center_dims(center: Point3<f64>, width: f64, height: f64, depth: f64) -> Self {
        Self {
            min: Point3::new(
                center.x - width / 2.0,
                center.y - height / 2.0,
                center.z - depth / 2.0,
            ),
            max: Point3::new(
                center.x + width / 2.0,
                center.y + height / 2.0,
                center.z + depth / 2.0,
            ),
        }
    }

    /// Creates the AABB of an item at its current position.
    pub fn of_item(item: &Item) -> Self {
        Self::from_center_dims(item.position, item.width, item.height, item.depth)
    }

    /// Checks strict overlap on all three axes. Touching faces (equal
    /// bounds) do not count as an intersection.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Returns the volume of this AABB.
    pub fn volume(&self) -> f64 {
        (self.max.x - self.min.x) * (self.max.y - self.min.y) * (self.max.z - self.min.z)
    }
}

/// An item decorated with display color and analysis flags.
#[derive(Debug, Clone, Serialize)]
pub struct DecoratedItem {
    /// The underlying item. The drop simulator mutates `item.position.y`.
    #[serde(flatten)]
    pub item: Item,
    /// Display color from [`PALETTE`], assigned by input order.
    pub color: String,
    /// True when any axis projection exceeds the container half-extent
    /// beyond [`CONTAINMENT_EPSILON`].
    pub outside: bool,
    /// True when `collisions` is non-empty.
    pub has_collision: bool,
    /// Ids of the other items whose AABBs overlap this item, in input order.
    pub collisions: Vec<String>,
}

/// Decorates every item with color, containment and collision flags.
///
/// Flags are recomputed from scratch on every call; nothing is patched
/// incrementally. Total over its domain — validated input never fails.
pub fn decorate(container: &Container, items: &[Item]) -> Vec<DecoratedItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let collisions = detect_collisions(items, index);
            DecoratedItem {
                color: PALETTE[index % PALETTE.len()].to_string(),
                outside: is_outside(container, item),
                has_collision: !collisions.is_empty(),
                collisions,
                item: item.clone(),
            }
        })
        .collect()
}

/// Tests whether an item's AABB escapes the container bounds on any axis.
///
/// Per axis: the item fits iff the distance between item center and box
/// center plus the item half-extent stays within the box half-extent plus
/// [`CONTAINMENT_EPSILON`]. A symmetric separating-extents test, not a
/// containment test for rotated boxes.
pub fn is_outside(container: &Container, item: &Item) -> bool {
    let dx = (item.position.x - container.position.x).abs();
    let dy = (item.position.y - container.position.y).abs();
    let dz = (item.position.z - container.position.z).abs();

    let fits_x = dx + item.width / 2.0 <= container.width / 2.0 + CONTAINMENT_EPSILON;
    let fits_y = dy + item.height / 2.0 <= container.height / 2.0 + CONTAINMENT_EPSILON;
    let fits_z = dz + item.depth / 2.0 <= container.depth / 2.0 + CONTAINMENT_EPSILON;

    !(fits_x && fits_y && fits_z)
}

/// Collects the ids of all items whose AABBs overlap the item at `index`.
pub fn detect_collisions(items: &[Item], index: usize) -> Vec<String> {
    let item = &items[index];
    items
        .iter()
        .enumerate()
        .filter(|(other_index, other)| *other_index != index && aabb_collision(item, other))
        .map(|(_, other)| other.id.clone())
        .collect()
}

/// The standard AABB-overlap predicate between two items. Symmetric.
pub fn aabb_collision(a: &Item, b: &Item) -> bool {
    Aabb::of_item(a).intersects(&Aabb::of_item(b))
}

/// Packing-density tier derived from the utilization percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Efficiency {
    /// Below 40% utilization.
    Low,
    /// 40% to below 70%.
    Medium,
    /// 70% and above.
    High,
}

impl Efficiency {
    /// Maps a utilization percentage to its tier.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 70.0 {
            Self::High
        } else if percent >= 40.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Aggregate volume statistics for a pack.
#[derive(Debug, Clone, Serialize)]
pub struct SpaceUtilization {
    /// Container volume in cm³.
    pub box_volume: f64,
    /// Summed item volumes in cm³, over all items regardless of flags.
    pub items_volume: f64,
    /// `box_volume - items_volume`; negative for an over-packed box.
    pub unused_volume: f64,
    /// `items_volume / box_volume * 100`; above 100 signals an invalid pack.
    pub utilization_percent: f64,
    /// Density tier for the percentage.
    pub efficiency: Efficiency,
}

/// Computes space utilization over all items, flags notwithstanding.
pub fn space_utilization(container: &Container, items: &[Item]) -> SpaceUtilization {
    let box_volume = container.volume();
    let items_volume: f64 = items.iter().map(Item::volume).sum();
    let utilization_percent = items_volume / box_volume * 100.0;

    SpaceUtilization {
        box_volume,
        items_volume,
        unused_volume: box_volume - items_volume,
        utilization_percent,
        efficiency: Efficiency::from_percent(utilization_percent),
    }
}

/// Aggregate weight statistics for a pack.
#[derive(Debug, Clone, Serialize)]
pub struct WeightLoad {
    /// Summed item weight in kg.
    pub total: f64,
    /// Container capacity in kg.
    pub capacity: f64,
    /// `total / capacity * 100`.
    pub percent_of_capacity: f64,
    /// True when the total exceeds the capacity.
    pub overweight: bool,
}

/// Computes the weight load against the container capacity.
pub fn weight_load(container: &Container, items: &[Item]) -> WeightLoad {
    let total: f64 = items.iter().map(|item| item.weight).sum();
    WeightLoad {
        total,
        capacity: container.max_weight,
        percent_of_capacity: total / container.max_weight * 100.0,
        overweight: total > container.max_weight,
    }
}
