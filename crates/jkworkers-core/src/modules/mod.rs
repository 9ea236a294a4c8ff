pub mod collaborators;
pub mod consul;
pub mod docker;
pub mod http;
pub mod persist;
pub mod reload;

pub use consul::ConsulRegistry;
pub use docker::DockerEvents;
pub use persist::AtomicFileSink;
pub use reload::CommandReloader;
