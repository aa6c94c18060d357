//! Scripted demonstration of the Parley interaction engine.

pub mod config;
pub mod demo;
