use crate::map::core::glam::Mat4;
use crate::map::{ColorInfoMap, NodeInstance, RoughnessPyramid};
use crate::{PatchTemplate, TerrainUniforms};

/// Everything a backend needs to create its static terrain resources.
#[derive(Clone, Copy, Debug)]
pub struct TerrainResources<'a> {
    pub patch_template: &'a PatchTemplate,
    pub roughness: &'a RoughnessPyramid,
    pub color_info: &'a ColorInfoMap,
    /// Upper bound on the instances of any single [`RenderBridge::upload_instances`].
    pub instance_capacity: usize,
}

/// One instanced draw of the patch template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    /// Control points per instance, one per patch of the template.
    pub vertices_per_instance: u32,
    pub instance_count: u32,
    pub view_projection: Mat4,
}

/// An error from a graphics backend, kept opaque to the rest of basalt.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct BridgeError(Box<dyn std::error::Error + Send + Sync>);

impl BridgeError {
    pub fn new(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(error))
    }
}

/// Implemented by graphics backends that draw basalt terrain.
///
/// The terrain calls [`Self::init`] once, then [`Self::upload_instances`] and [`Self::draw`] every frame.
pub trait RenderBridge {
    fn init(&mut self, resources: TerrainResources) -> Result<(), BridgeError>;

    fn upload_instances(&mut self, instances: &[NodeInstance]) -> Result<(), BridgeError>;

    fn draw(&mut self, call: &DrawCall, uniforms: &TerrainUniforms) -> Result<(), BridgeError>;
}
