//! Event and module descriptor models shared across hostintel crates.
#![allow(missing_docs)]

pub mod error;
pub mod event_type;
pub mod events;
pub mod ids;
pub mod module;

pub use error::UnknownEventType;
pub use event_type::EventType;
pub use events::Event;
pub use ids::EventId;
pub use module::{ModuleCategory, ModuleDescriptor, ModuleFlag, UseCase};
