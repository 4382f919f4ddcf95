pub mod connector;
pub mod document;
pub mod error;
pub mod id;
pub mod version;
pub mod xml;

// Re-export commonly used types
pub use connector::Connector;
pub use document::{Document, Element};
pub use error::CoreError;
pub use id::{NodeGuid, PortId, PortType};
pub use version::{compare_version, normalize_version_string, Version};
pub use xml::{parse_document, write_document};
