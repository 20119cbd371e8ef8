//! Weapon core of a voxel shooter client.
//!
//! Fire control, spread, hit-scan, recoil and the outbound packets they
//! produce, plus a headless practice range that drives them.

pub mod config;
pub mod game;
pub mod net;
pub mod range;
pub mod util;
