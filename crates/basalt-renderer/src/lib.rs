//! The boundary between basalt's LOD selection and a graphics backend.
//!
//! Nothing in this crate talks to a GPU. A backend implements [`RenderBridge`](crate::RenderBridge) and receives
//! exactly the data the terrain draw needs: a [`PatchTemplate`](crate::PatchTemplate) and the cached maps once at load,
//! then a buffer of [`NodeInstance`](crate::map::NodeInstance)s, a [`DrawCall`](crate::DrawCall) and
//! [`TerrainUniforms`](crate::TerrainUniforms) every frame.

mod bridge;
mod headless;
mod patch_template;
mod uniforms;

pub use bridge::*;
pub use headless::*;
pub use patch_template::*;
pub use uniforms::*;

pub use basalt_map as map;
