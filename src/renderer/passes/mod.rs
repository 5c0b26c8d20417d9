//! Fullscreen render passes: pathtrace, post, bloom, composite.

pub mod bloom;
pub mod composite;
pub mod pathtrace;
pub mod post;
