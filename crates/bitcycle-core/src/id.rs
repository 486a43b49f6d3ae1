use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies an in-flight bit in the engine's bit arena. Stable for the
    /// bit's whole flight, so renderers can track a bit across ticks.
    pub struct BitId;
}

/// Index of a physical collector cell, in grid reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectorId(pub u32);

/// Index of a source cell, in grid reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub u32);

/// Index of a sink cell, in creation order. Sink outputs are keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SinkId(pub u32);
