//! Helpers shared by the renderer, the writer and the file façades.

pub mod media;
pub mod text;
