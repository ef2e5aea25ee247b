//! Layered raster editor core: windowed layer buffers, a window tree with
//! toggle groups, undoable actions and spline-smoothed brushes.
//!
//! The binary wires [`editor::Editor`] to a winit window and presents its
//! [`render::Frame`] with wgpu.

pub mod action;
pub mod button;
pub mod canvas;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod icons;
pub mod interpolation;
pub mod io;
pub mod layer;
pub mod platform;
pub mod render;
pub mod scrollbar;
pub mod slider;
pub mod tools;
pub mod window;
