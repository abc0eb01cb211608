//! Example-synthesis pipeline: dependency collection, variant
//! resolution, sampling and discriminator patching, orchestrated by
//! [`orchestrator::ExampleEngine`].

pub mod collector;
pub mod orchestrator;
pub mod patcher;
pub mod resolver;

#[cfg(test)]
mod orchestrator_test;
