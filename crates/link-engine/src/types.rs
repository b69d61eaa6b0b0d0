//! Core channel types
//!
//! Defines the channel descriptors that nodes expose and the opaque
//! property values callers attach to links.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value attached to a link by its owner
pub type PropertyValue = serde_json::Value;

/// Caller-attached link metadata, opaque to the engine
pub type PropertyMap = serde_json::Map<String, PropertyValue>;

/// Direction of a channel on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The channel produces values
    Output,
    /// The channel consumes values
    Input,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Output => write!(f, "output"),
            Direction::Input => write!(f, "input"),
        }
    }
}

/// A named, typed connection point on a node
///
/// Output and input channels are modeled identically; they live in
/// disjoint, directional collections on the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    /// Unique identifier within the node and direction
    pub name: String,
    /// Type identifier resolvable through the type registry
    pub channel_type: String,
    /// Whether the declared type is only an upper bound on emitted values
    #[serde(default)]
    pub dynamic: bool,
}

impl ChannelDescriptor {
    /// Create a statically typed channel
    pub fn new(name: impl Into<String>, channel_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel_type: channel_type.into(),
            dynamic: false,
        }
    }

    /// Mark the channel's declared type as an upper bound only
    ///
    /// A dynamic channel may emit values of any subtype of its declared
    /// type at runtime.
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }
}
