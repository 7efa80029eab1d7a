//! Administrative tooling: store maintenance and cluster lifecycle.

pub mod control_plane;
pub mod resources;

pub use control_plane::AtlasControlPlane;
pub use resources::ResourceManager;
