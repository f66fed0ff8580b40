pub mod backprop;
pub mod forward;
pub mod init;
pub mod network;
pub mod params;
pub mod persist;
pub mod spec;
pub mod structure;

pub use network::Network;
pub use params::NetworkParameters;
pub use spec::RunSpec;
pub use structure::NetworkStructure;
