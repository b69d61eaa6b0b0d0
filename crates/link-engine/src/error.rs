//! Error types for the link engine

use thiserror::Error;

use crate::types::Direction;

/// Result type alias using LinkError
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors that can occur while validating or constructing links
#[derive(Debug, Error)]
pub enum LinkError {
    /// A channel type identifier is not in the registry
    #[error("Unknown channel type: {0}")]
    UnknownType(String),

    /// A type identifier was registered twice
    #[error("Type '{0}' is already registered")]
    DuplicateType(String),

    /// A channel name lookup on a node failed
    #[error("Node '{node}' has no {direction} channel named '{channel}'")]
    UnknownChannel {
        node: String,
        direction: Direction,
        channel: String,
    },

    /// A supplied descriptor is not a member of the node's channel collection
    #[error("Channel '{channel}' is not an {direction} channel of node '{node}'")]
    ForeignChannel {
        node: String,
        direction: Direction,
        channel: String,
    },

    /// The compatibility rule rejected the channel pair
    #[error(
        "Cannot connect '{source_channel}' ({source_type}) to '{sink_channel}' ({sink_type})"
    )]
    IncompatibleChannels {
        source_channel: String,
        source_type: String,
        sink_channel: String,
        sink_type: String,
    },
}
