//! # Padmouse Library
//!
//! Drive the desktop pointer and keyboard with a game controller.
//!
//! This library provides the translation engine that polls a controller at a
//! fixed rate and turns stick deflection into cursor and scroll movement and
//! button edges into mouse clicks, keys and key combos.

pub mod config;
pub mod error;
pub mod controller;
pub mod input;
pub mod mapping;
pub mod settings;
pub mod engine;
