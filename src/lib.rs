//! CPU ray tracer for scenes of spheres.
//!
//! [`renderer::Renderer`] traces one primary ray per pixel, shades the
//! nearest sphere with a single directional light and packs the result into
//! an RGBA8 [`framebuffer::FrameBuffer`] that is then copied to a
//! [`texture::RenderTarget`].

pub mod application;
pub mod camera;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod util;

pub use error::{Error, Result};
