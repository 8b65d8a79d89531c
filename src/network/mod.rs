pub mod backward;
pub mod forward;
pub mod params;
pub mod topology;

pub use backward::{backward, Deltas};
pub use forward::{forward, Activations};
pub use params::NetworkParams;
pub use topology::Topology;
