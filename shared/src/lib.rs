//! Value types shared by the tennis engine and its hosts.

pub mod config;
pub mod events;
pub mod vec3;
