//! Error types for PackViz.

use thiserror::Error;

/// Result type alias for PackViz operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating a payload or driving the simulation.
///
/// Every validation variant is recoverable: the offending payload is rejected
/// as a whole and any previously loaded scene state stays untouched. Field
/// errors carry the dotted path of the offending field (e.g. `items[2].weight`).
#[derive(Debug, Error)]
pub enum Error {
    /// The raw payload text was empty or whitespace-only.
    #[error("Payload is empty. Provide a JSON document before loading.")]
    EmptyPayload,

    /// The payload text was not well-formed JSON.
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    /// A required field was absent.
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    /// A numeric field was missing, non-numeric, or not greater than zero.
    #[error("{0} must be a number greater than 0")]
    NotPositive(String),

    /// A vector axis did not resolve to a finite number.
    #[error("{0} must be a finite number")]
    NotFinite(String),

    /// A position field was not an object with x, y and z.
    #[error("{0} must be an object with x, y and z")]
    InvalidVector(String),

    /// An entry in `items` was not a JSON object.
    #[error("Item at position {0} is not a valid object")]
    InvalidItem(usize),

    /// An item lacked the required `position` field.
    #[error("Item '{0}' is missing the required 'position' field")]
    MissingPosition(String),

    /// The `items` array was missing, not an array, or empty.
    #[error("Provide at least one item in the 'items' array")]
    NoItems,

    /// The drop simulation was started without a loaded scene.
    #[error("Cannot start the drop simulation: {0}")]
    SimulationPrecondition(String),
}
