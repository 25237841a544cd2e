//! sshswarm drives many concurrent SSH sessions against a single endpoint,
//! each executing a scripted command sequence at a fixed cadence for a
//! bounded lifetime, to generate sustained load for stress testing.

pub mod agent;
pub mod script;
pub mod ssh;
pub mod swarm;
