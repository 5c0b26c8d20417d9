//! Render-graph building blocks: targets, the bloom mip chain,
//! accumulation bookkeeping, and the passes themselves.

pub mod accumulation;
pub mod mip_chain;
pub mod passes;
pub mod target;
