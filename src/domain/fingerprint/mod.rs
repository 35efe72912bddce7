// src/domain/fingerprint/mod.rs
//
// Fingerprint Domain
//
// What the heuristics backend needs to know about this device.

pub mod value_objects;

pub use value_objects::{DeviceFingerprint, DeviceInfo, PlatformDevice, WebHeuristics, UNKNOWN_VALUE};
