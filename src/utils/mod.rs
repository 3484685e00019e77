// Utility functions
// Network discovery for the startup banner

pub mod network;

pub use network::local_ip_address;
