//! Channel compatibility and link enumeration
//!
//! The pairwise rule decides whether one output channel may feed one input
//! channel; the enumeration helpers apply it across two nodes so the canvas
//! can offer (or refuse) a connection before any link is constructed.

use crate::error::Result;
use crate::node::ChannelProvider;
use crate::registry::TypeRegistry;
use crate::types::ChannelDescriptor;

/// Decide whether an output channel may feed an input channel
///
/// Compatible when the source's declared type is a subtype of the sink's.
/// A dynamic source is additionally allowed to feed a sink expecting a
/// more specific type: its declared type is only an upper bound, and the
/// runtime narrows the actual values while the link is active. The
/// exception never applies in the other direction; a dynamic sink grants
/// nothing.
pub fn compatible_channels(
    registry: &TypeRegistry,
    source: &ChannelDescriptor,
    sink: &ChannelDescriptor,
) -> Result<bool> {
    let source_type = registry.resolve(&source.channel_type)?;
    let sink_type = registry.resolve(&sink.channel_type)?;

    let mut compatible = source_type.is_subtype_of(sink_type);
    if source.dynamic {
        compatible = compatible || sink_type.is_subtype_of(source_type);
    }
    Ok(compatible)
}

/// All (output, input) channel pairs that can connect the two nodes
///
/// The outer iteration runs over `source_node`'s outputs and the inner over
/// `sink_node`'s inputs, both in declared order, so the result is stable
/// across calls and suitable for presenting to a user.
pub fn possible_links(
    registry: &TypeRegistry,
    source_node: &dyn ChannelProvider,
    sink_node: &dyn ChannelProvider,
) -> Result<Vec<(ChannelDescriptor, ChannelDescriptor)>> {
    let mut pairs = Vec::new();
    for source in source_node.output_channels() {
        for sink in sink_node.input_channels() {
            if compatible_channels(registry, source, sink)? {
                pairs.push((source.clone(), sink.clone()));
            }
        }
    }

    log::debug!(
        "{} possible link(s) from '{}' to '{}'",
        pairs.len(),
        source_node.name(),
        sink_node.name()
    );
    Ok(pairs)
}

/// Whether any output of `source_node` can feed any input of `sink_node`
///
/// Stops at the first compatible pair.
pub fn can_connect(
    registry: &TypeRegistry,
    source_node: &dyn ChannelProvider,
    sink_node: &dyn ChannelProvider,
) -> Result<bool> {
    for source in source_node.output_channels() {
        for sink in sink_node.input_channels() {
            if compatible_channels(registry, source, sink)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
