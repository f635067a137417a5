pub mod artifact;
pub mod memory;
pub mod portal;

pub use artifact::{ArtifactError, ArtifactStore, MemoryArtifactStore};
pub use memory::InMemoryPortal;
pub use portal::{CartSnapshot, CheckoutField, DriverError, PortalDriver};
