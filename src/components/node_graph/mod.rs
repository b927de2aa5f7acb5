mod component;
pub mod config;
pub mod edges;
pub mod growth;
pub mod node;
pub mod provider;
mod render;
pub mod state;
pub mod types;

pub use component::{GraphPreset, NodeGraphCanvas};
