//! The link between two node channels
//!
//! A link is validated once at construction and thereafter only its
//! enabled/dynamic-enabled flags and annotations change. There is no
//! connected/disconnected state here: the owner creates a link to connect
//! and drops it to disconnect.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};
use crate::events::{LinkEvent, LinkObserver};
use crate::node::ChannelProvider;
use crate::registry::{TypeDescriptor, TypeRegistry};
use crate::types::{ChannelDescriptor, Direction, PropertyMap};
use crate::validation::compatible_channels;

/// A validated connection from one node's output channel to another
/// node's input channel
///
/// Construction is the single validation gate: both channels must belong
/// to their nodes and the pair must be compatible. Endpoints are immutable
/// afterwards, so a link that exists can never become incompatible.
pub struct Link {
    source_node: Arc<dyn ChannelProvider>,
    source_channel: ChannelDescriptor,
    sink_node: Arc<dyn ChannelProvider>,
    sink_channel: ChannelDescriptor,
    source_type: TypeDescriptor,
    sink_type: TypeDescriptor,
    enabled: bool,
    dynamic_enabled: bool,
    tool_tip: String,
    properties: PropertyMap,
    observers: Vec<Arc<dyn LinkObserver>>,
}

impl Link {
    /// Connect two channels addressed by name
    ///
    /// Names are resolved through the nodes' own lookups and fail with
    /// [`LinkError::UnknownChannel`] when absent.
    pub fn by_name(
        registry: &TypeRegistry,
        source_node: Arc<dyn ChannelProvider>,
        source_channel: &str,
        sink_node: Arc<dyn ChannelProvider>,
        sink_channel: &str,
    ) -> Result<Self> {
        let source_channel = source_node.output_channel(source_channel)?.clone();
        let sink_channel = sink_node.input_channel(sink_channel)?.clone();
        Self::connect(registry, source_node, source_channel, sink_node, sink_channel)
    }

    /// Connect two channels given by descriptor
    ///
    /// Each descriptor must be a member of its node's channel collection
    /// in the matching direction; otherwise the construction fails with
    /// [`LinkError::ForeignChannel`].
    pub fn by_descriptor(
        registry: &TypeRegistry,
        source_node: Arc<dyn ChannelProvider>,
        source_channel: &ChannelDescriptor,
        sink_node: Arc<dyn ChannelProvider>,
        sink_channel: &ChannelDescriptor,
    ) -> Result<Self> {
        if !source_node.output_channels().contains(source_channel) {
            return Err(LinkError::ForeignChannel {
                node: source_node.name().to_string(),
                direction: Direction::Output,
                channel: source_channel.name.clone(),
            });
        }
        if !sink_node.input_channels().contains(sink_channel) {
            return Err(LinkError::ForeignChannel {
                node: sink_node.name().to_string(),
                direction: Direction::Input,
                channel: sink_channel.name.clone(),
            });
        }
        Self::connect(
            registry,
            source_node,
            source_channel.clone(),
            sink_node,
            sink_channel.clone(),
        )
    }

    fn connect(
        registry: &TypeRegistry,
        source_node: Arc<dyn ChannelProvider>,
        source_channel: ChannelDescriptor,
        sink_node: Arc<dyn ChannelProvider>,
        sink_channel: ChannelDescriptor,
    ) -> Result<Self> {
        if !compatible_channels(registry, &source_channel, &sink_channel)? {
            return Err(LinkError::IncompatibleChannels {
                source_channel: source_channel.name.clone(),
                source_type: source_channel.channel_type.clone(),
                sink_channel: sink_channel.name.clone(),
                sink_type: sink_channel.channel_type.clone(),
            });
        }

        // Endpoints never change, so their types resolve exactly once.
        let source_type = registry.resolve(&source_channel.channel_type)?.clone();
        let sink_type = registry.resolve(&sink_channel.channel_type)?.clone();

        log::debug!(
            "linked '{}:{}' to '{}:{}'",
            source_node.name(),
            source_channel.name,
            sink_node.name(),
            sink_channel.name
        );

        Ok(Self {
            source_node,
            source_channel,
            sink_node,
            sink_channel,
            source_type,
            sink_type,
            enabled: true,
            dynamic_enabled: false,
            tool_tip: String::new(),
            properties: PropertyMap::new(),
            observers: Vec::new(),
        })
    }

    /// Set the initial enabled flag
    ///
    /// Meant for construction time (e.g. restoring a persisted link);
    /// no notification is emitted. Use [`Link::set_enabled`] afterwards.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Attach caller metadata at construction time
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// The node producing values for this link
    pub fn source_node(&self) -> &Arc<dyn ChannelProvider> {
        &self.source_node
    }

    /// The node consuming values from this link
    pub fn sink_node(&self) -> &Arc<dyn ChannelProvider> {
        &self.sink_node
    }

    /// The output channel this link reads from
    pub fn source_channel(&self) -> &ChannelDescriptor {
        &self.source_channel
    }

    /// The input channel this link feeds
    pub fn sink_channel(&self) -> &ChannelDescriptor {
        &self.sink_channel
    }

    /// Resolved type of the source channel
    pub fn source_type(&self) -> &TypeDescriptor {
        &self.source_type
    }

    /// Resolved type of the sink channel
    pub fn sink_type(&self) -> &TypeDescriptor {
        &self.sink_type
    }

    /// Whether this link relies on runtime narrowing of the source's
    /// declared type
    ///
    /// True only when the source channel is dynamic and the sink expects
    /// the source's declared type or a subtype of it. A dynamic source
    /// feeding a strictly wider sink is an ordinary static link.
    pub fn is_dynamic(&self) -> bool {
        self.source_channel.dynamic && self.sink_type.is_subtype_of(&self.source_type)
    }

    /// Whether the link is active for data flow
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the link
    ///
    /// Observers are notified only when the value actually changes.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            log::trace!(
                "link '{}:{}' -> '{}:{}' enabled = {}",
                self.source_node.name(),
                self.source_channel.name,
                self.sink_node.name(),
                self.sink_channel.name,
                enabled
            );
            self.emit(LinkEvent::EnabledChanged { enabled });
        }
    }

    /// Whether runtime narrowing is active on this dynamic link
    ///
    /// Always false on a non-dynamic link.
    pub fn dynamic_enabled(&self) -> bool {
        self.dynamic_enabled
    }

    /// Enable or disable runtime narrowing
    ///
    /// Has no effect on a non-dynamic link; observers are notified only
    /// when the value actually changes.
    pub fn set_dynamic_enabled(&mut self, enabled: bool) {
        if self.is_dynamic() && self.dynamic_enabled != enabled {
            self.dynamic_enabled = enabled;
            self.emit(LinkEvent::DynamicEnabledChanged { enabled });
        }
    }

    /// Free-form annotation shown by the canvas
    pub fn tool_tip(&self) -> &str {
        &self.tool_tip
    }

    /// Set the annotation; carries no semantics and emits no event
    pub fn set_tool_tip(&mut self, tool_tip: impl Into<String>) {
        self.tool_tip = tool_tip.into();
    }

    /// Caller-attached metadata
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Mutable access to caller-attached metadata
    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    /// Register an observer for flag transitions
    ///
    /// Observers are notified synchronously, in subscription order.
    pub fn subscribe(&mut self, observer: Arc<dyn LinkObserver>) {
        self.observers.push(observer);
    }

    fn emit(&self, event: LinkEvent) {
        for observer in &self.observers {
            observer.notify(&event);
        }
    }

    /// Snapshot of the fields a persistence layer must round-trip
    pub fn record(&self) -> LinkRecord {
        LinkRecord {
            source_node: self.source_node.name().to_string(),
            source_channel: self.source_channel.name.clone(),
            sink_node: self.sink_node.name().to_string(),
            sink_channel: self.sink_channel.name.clone(),
            enabled: self.enabled,
            properties: self.properties.clone(),
        }
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field(
                "source",
                &format_args!("{}:{}", self.source_node.name(), self.source_channel.name),
            )
            .field(
                "sink",
                &format_args!("{}:{}", self.sink_node.name(), self.sink_channel.name),
            )
            .field("enabled", &self.enabled)
            .field("dynamic", &self.is_dynamic())
            .finish()
    }
}

/// The round-trip value for the workflow persistence boundary
///
/// Carries enough to reconstruct an equivalent link through
/// [`Link::by_name`] once the node references are resolved by the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub source_node: String,
    pub source_channel: String,
    pub sink_node: String,
    pub sink_channel: String,
    pub enabled: bool,
    #[serde(default)]
    pub properties: PropertyMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingObserver;
    use crate::node::NodeDescription;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn number_hierarchy() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register("Number").unwrap();
        registry.register_with_bases("Integer", &["Number"]).unwrap();
        registry
            .register_with_bases("PositiveInteger", &["Integer"])
            .unwrap();
        registry
    }

    fn producer(channel: ChannelDescriptor) -> Arc<NodeDescription> {
        Arc::new(NodeDescription::new("Producer", vec![channel], vec![]))
    }

    fn consumer(channel: ChannelDescriptor) -> Arc<NodeDescription> {
        Arc::new(NodeDescription::new("Consumer", vec![], vec![channel]))
    }

    fn static_link() -> Link {
        let registry = number_hierarchy();
        Link::by_name(
            &registry,
            producer(ChannelDescriptor::new("Count", "Integer")),
            "Count",
            consumer(ChannelDescriptor::new("Values", "Number")),
            "Values",
        )
        .unwrap()
    }

    fn dynamic_link() -> Link {
        let registry = number_hierarchy();
        Link::by_name(
            &registry,
            producer(ChannelDescriptor::new("Count", "Integer").dynamic()),
            "Count",
            consumer(ChannelDescriptor::new("Positives", "PositiveInteger")),
            "Positives",
        )
        .unwrap()
    }

    #[test]
    fn test_by_name_resolves_and_validates() {
        let link = static_link();
        assert_eq!(link.source_channel().name, "Count");
        assert_eq!(link.sink_channel().name, "Values");
        assert_eq!(link.source_type().name(), "Integer");
        assert_eq!(link.sink_type().name(), "Number");
        assert!(link.enabled());
        assert!(!link.is_dynamic());
    }

    #[test]
    fn test_by_name_unknown_channel() {
        let registry = number_hierarchy();
        let result = Link::by_name(
            &registry,
            producer(ChannelDescriptor::new("Count", "Integer")),
            "Total",
            consumer(ChannelDescriptor::new("Values", "Number")),
            "Values",
        );
        assert!(matches!(
            result,
            Err(LinkError::UnknownChannel { channel, .. }) if channel == "Total"
        ));
    }

    #[test]
    fn test_by_descriptor_accepts_members() {
        let registry = number_hierarchy();
        let source = ChannelDescriptor::new("Count", "Integer");
        let sink = ChannelDescriptor::new("Values", "Number");
        let link = Link::by_descriptor(
            &registry,
            producer(source.clone()),
            &source,
            consumer(sink.clone()),
            &sink,
        )
        .unwrap();
        assert_eq!(link.source_channel(), &source);
    }

    #[test]
    fn test_by_descriptor_rejects_foreign_descriptor() {
        let registry = number_hierarchy();
        let source = ChannelDescriptor::new("Count", "Integer");
        let foreign = ChannelDescriptor::new("Count", "Number");
        let result = Link::by_descriptor(
            &registry,
            producer(source),
            &foreign,
            consumer(ChannelDescriptor::new("Values", "Number")),
            &ChannelDescriptor::new("Values", "Number"),
        );
        assert!(matches!(
            result,
            Err(LinkError::ForeignChannel {
                direction: Direction::Output,
                ..
            })
        ));
    }

    #[test]
    fn test_incompatible_pair_never_constructs() {
        let registry = number_hierarchy();
        let result = Link::by_name(
            &registry,
            producer(ChannelDescriptor::new("Estimate", "Number")),
            "Estimate",
            consumer(ChannelDescriptor::new("Exact Count", "Integer")),
            "Exact Count",
        );
        assert!(matches!(result, Err(LinkError::IncompatibleChannels { .. })));
    }

    #[test]
    fn test_dynamic_link_detection() {
        assert!(dynamic_link().is_dynamic());
    }

    #[test]
    fn test_dynamic_source_to_equal_sink_is_dynamic() {
        let registry = number_hierarchy();
        let link = Link::by_name(
            &registry,
            producer(ChannelDescriptor::new("Count", "Integer").dynamic()),
            "Count",
            consumer(ChannelDescriptor::new("Exact Count", "Integer")),
            "Exact Count",
        )
        .unwrap();
        assert!(link.is_dynamic());
    }

    #[test]
    fn test_dynamic_source_to_wider_sink_is_static() {
        let registry = number_hierarchy();
        let link = Link::by_name(
            &registry,
            producer(ChannelDescriptor::new("Count", "Integer").dynamic()),
            "Count",
            consumer(ChannelDescriptor::new("Values", "Number")),
            "Values",
        )
        .unwrap();
        assert!(!link.is_dynamic());
    }

    #[test]
    fn test_set_enabled_emits_once_per_transition() {
        let mut link = static_link();
        let observer = Arc::new(RecordingObserver::new());
        link.subscribe(observer.clone());

        link.set_enabled(true); // already true, no event
        link.set_enabled(false);
        link.set_enabled(false); // no change, no event
        link.set_enabled(true);

        assert_eq!(
            observer.events(),
            vec![
                LinkEvent::EnabledChanged { enabled: false },
                LinkEvent::EnabledChanged { enabled: true },
            ]
        );
    }

    #[test]
    fn test_set_dynamic_enabled_on_non_dynamic_is_noop() {
        let mut link = static_link();
        let observer = Arc::new(RecordingObserver::new());
        link.subscribe(observer.clone());

        link.set_dynamic_enabled(true);
        assert!(!link.dynamic_enabled());
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_set_dynamic_enabled_on_dynamic_link() {
        let mut link = dynamic_link();
        let observer = Arc::new(RecordingObserver::new());
        link.subscribe(observer.clone());

        link.set_dynamic_enabled(true);
        link.set_dynamic_enabled(true); // no change, no event
        assert!(link.dynamic_enabled());
        assert_eq!(
            observer.events(),
            vec![LinkEvent::DynamicEnabledChanged { enabled: true }]
        );
    }

    #[test]
    fn test_observers_notified_in_subscription_order() {
        let mut link = static_link();
        let order = Arc::new(AtomicUsize::new(0));

        let first = order.clone();
        link.subscribe(Arc::new(move |_event: &LinkEvent| {
            // first subscriber sees the counter before the second bumps it
            assert_eq!(first.fetch_add(1, Ordering::SeqCst) % 2, 0);
        }));
        let second = order.clone();
        link.subscribe(Arc::new(move |_event: &LinkEvent| {
            assert_eq!(second.fetch_add(1, Ordering::SeqCst) % 2, 1);
        }));

        link.set_enabled(false);
        link.set_enabled(true);
        assert_eq!(order.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_construction_time_state() {
        let mut properties = PropertyMap::new();
        properties.insert("restored".to_string(), json!(true));

        let link = static_link().with_enabled(false).with_properties(properties);
        assert!(!link.enabled());
        assert_eq!(link.properties().get("restored"), Some(&json!(true)));
    }

    #[test]
    fn test_tool_tip_and_properties() {
        let mut link = static_link();
        assert_eq!(link.tool_tip(), "");
        link.set_tool_tip("counts flowing downstream");
        assert_eq!(link.tool_tip(), "counts flowing downstream");

        link.properties_mut()
            .insert("weight".to_string(), json!(0.5));
        assert_eq!(link.properties().get("weight"), Some(&json!(0.5)));
    }

    #[test]
    fn test_record_round_trips_through_serde() {
        let mut link = static_link();
        link.properties_mut()
            .insert("pinned".to_string(), json!(true));
        link.set_enabled(false);

        let record = link.record();
        assert_eq!(record.source_node, "Producer");
        assert_eq!(record.source_channel, "Count");
        assert_eq!(record.sink_node, "Consumer");
        assert_eq!(record.sink_channel, "Values");
        assert!(!record.enabled);

        let json = serde_json::to_string(&record).unwrap();
        let restored: LinkRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
    }
}
