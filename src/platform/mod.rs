//! Platform abstraction layer
//!
//! Host glue only; the simulation itself is platform-free. Native builds
//! drive [`crate::Simulation`] directly (see the headless runner), browser
//! builds go through [`wasm`].

#[cfg(target_arch = "wasm32")]
pub mod wasm;
