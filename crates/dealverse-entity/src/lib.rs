//! # dealverse-entity
//!
//! Domain entity models for the DealVerse notification pipeline. Every
//! struct in this crate is a wire-shaped value object; all entities derive
//! `Debug`, `Clone`, `Serialize`, and `Deserialize`. Category, kind,
//! priority, and channel are closed enums; an unknown value on the wire
//! is a deserialization error, never a silent fallback.

pub mod activity;
pub mod notification;
