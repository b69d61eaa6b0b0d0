//! Link Engine - channel compatibility and connection model for Chartflow
//!
//! This crate decides which node channels on the canvas may be wired
//! together and owns the state of every established link. It provides:
//!
//! - An explicit channel type hierarchy ([`TypeRegistry`]) with subtype
//!   queries, independent of any host runtime reflection
//! - The pairwise compatibility rule with its dynamic-source exception
//! - Enumeration of all valid wirings between two nodes
//! - Stateful links with enabled/dynamic-enabled flags and synchronous
//!   change notification
//!
//! ## Architecture
//!
//! ```text
//! Canvas (external)           link-engine
//! ┌──────────────────┐        ┌───────────────────────────────┐
//! │ drag-to-connect  │───────►│ validation.rs (can_connect /  │
//! │ gesture          │        │   possible_links)             │
//! │                  │        │ link.rs (Link state machine)  │
//! │ link rendering   │◄───────│ events.rs (change events)     │
//! └──────────────────┘        │ registry.rs (type hierarchy)  │
//!                             └───────────────────────────────┘
//! ```
//!
//! The canvas, widget execution, and workflow persistence stay outside;
//! nodes reach the engine only through the [`ChannelProvider`] contract.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use link_engine::{ChannelDescriptor, Link, NodeDescription, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register("Data").unwrap();
//! registry.register_with_bases("Table", &["Data"]).unwrap();
//!
//! let loader = Arc::new(NodeDescription::new(
//!     "File Loader",
//!     vec![ChannelDescriptor::new("Table", "Table")],
//!     vec![],
//! ));
//! let viewer = Arc::new(NodeDescription::new(
//!     "Data Viewer",
//!     vec![],
//!     vec![ChannelDescriptor::new("Data", "Data")],
//! ));
//!
//! let mut link = Link::by_name(&registry, loader, "Table", viewer, "Data").unwrap();
//! assert!(link.enabled());
//! link.set_enabled(false);
//! ```

pub mod error;
pub mod events;
pub mod link;
pub mod node;
pub mod registry;
pub mod types;
pub mod validation;

// Re-export the public surface
pub use error::{LinkError, Result};
pub use events::{LinkEvent, LinkObserver, NullObserver, RecordingObserver};
pub use link::{Link, LinkRecord};
pub use node::{ChannelProvider, NodeDescription};
pub use registry::{TypeCatalog, TypeCatalogEntry, TypeDescriptor, TypeRegistry};
pub use types::{ChannelDescriptor, Direction, PropertyMap, PropertyValue};
pub use validation::{can_connect, compatible_channels, possible_links};
