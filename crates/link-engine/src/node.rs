//! Node-side channel access
//!
//! The engine never owns nodes; it reads their channels through the
//! `ChannelProvider` contract. A plain `NodeDescription` implementation
//! ships with the crate for hosts that have no richer node model.

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};
use crate::types::{ChannelDescriptor, Direction};

/// Contract through which the engine reads a node's channels
///
/// Channels are ordered as declared and addressable by name or position.
/// Channel names are unique per direction per node; the implementation
/// supplying the descriptors is responsible for that invariant.
pub trait ChannelProvider: Send + Sync {
    /// Display name of the node, used in error payloads and logs
    fn name(&self) -> &str;

    /// Output channels in declared order
    fn output_channels(&self) -> &[ChannelDescriptor];

    /// Input channels in declared order
    fn input_channels(&self) -> &[ChannelDescriptor];

    /// Look up an output channel by name
    fn output_channel(&self, name: &str) -> Result<&ChannelDescriptor> {
        self.output_channels()
            .iter()
            .find(|channel| channel.name == name)
            .ok_or_else(|| LinkError::UnknownChannel {
                node: self.name().to_string(),
                direction: Direction::Output,
                channel: name.to_string(),
            })
    }

    /// Look up an input channel by name
    fn input_channel(&self, name: &str) -> Result<&ChannelDescriptor> {
        self.input_channels()
            .iter()
            .find(|channel| channel.name == name)
            .ok_or_else(|| LinkError::UnknownChannel {
                node: self.name().to_string(),
                direction: Direction::Input,
                channel: name.to_string(),
            })
    }
}

/// A plain node description with ordered output and input channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Display name of the node
    pub name: String,
    /// Output channels in declared order
    #[serde(default)]
    pub outputs: Vec<ChannelDescriptor>,
    /// Input channels in declared order
    #[serde(default)]
    pub inputs: Vec<ChannelDescriptor>,
}

impl NodeDescription {
    /// Create a node description from ordered channel lists
    pub fn new(
        name: impl Into<String>,
        outputs: Vec<ChannelDescriptor>,
        inputs: Vec<ChannelDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            outputs,
            inputs,
        }
    }
}

impl ChannelProvider for NodeDescription {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_channels(&self) -> &[ChannelDescriptor] {
        &self.outputs
    }

    fn input_channels(&self) -> &[ChannelDescriptor] {
        &self.inputs
    }
}
