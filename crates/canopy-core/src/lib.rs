pub mod error;
pub mod grid;
pub mod filter;
pub mod partition;
pub mod topology;
pub mod tasks;
pub mod comm;
pub mod discovery;
pub mod node;
pub mod stats;
pub mod cluster;
pub mod io;
