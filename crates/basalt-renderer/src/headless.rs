use crate::map::NodeInstance;
use crate::{BridgeError, DrawCall, RenderBridge, TerrainResources, TerrainUniforms};

/// What a [`HeadlessBridge`] saw at [`RenderBridge::init`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadlessResources {
    pub patch_vertex_bytes: usize,
    pub roughness_levels: u32,
    pub color_info_texels: usize,
    pub instance_capacity: usize,
}

/// A [`RenderBridge`] that only records what it is given. Useful for tests and for running selection without a GPU.
#[derive(Clone, Debug, Default)]
pub struct HeadlessBridge {
    resources: Option<HeadlessResources>,
    instance_bytes: Vec<u8>,
    draws: Vec<(DrawCall, TerrainUniforms)>,
}

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error("bridge used before init")]
    NotInitialized,
    #[error("{requested} instances exceed the capacity of {capacity}")]
    TooManyInstances { requested: usize, capacity: usize },
}

impl HeadlessBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resources(&self) -> Option<&HeadlessResources> {
        self.resources.as_ref()
    }

    /// The raw bytes of the last upload.
    pub fn instance_bytes(&self) -> &[u8] {
        &self.instance_bytes
    }

    pub fn draws(&self) -> &[(DrawCall, TerrainUniforms)] {
        &self.draws
    }

    pub fn last_draw(&self) -> Option<&(DrawCall, TerrainUniforms)> {
        self.draws.last()
    }
}

impl RenderBridge for HeadlessBridge {
    fn init(&mut self, resources: TerrainResources) -> Result<(), BridgeError> {
        let recorded = HeadlessResources {
            patch_vertex_bytes: resources.patch_template.as_bytes().len(),
            roughness_levels: resources.roughness.num_levels(),
            color_info_texels: resources.color_info.texels().len(),
            instance_capacity: resources.instance_capacity,
        };
        log::debug!("Headless bridge initialized with {:?}", recorded);
        self.resources = Some(recorded);
        Ok(())
    }

    fn upload_instances(&mut self, instances: &[NodeInstance]) -> Result<(), BridgeError> {
        let capacity = self
            .resources
            .as_ref()
            .ok_or_else(|| BridgeError::new(HeadlessError::NotInitialized))?
            .instance_capacity;
        if instances.len() > capacity {
            return Err(BridgeError::new(HeadlessError::TooManyInstances {
                requested: instances.len(),
                capacity,
            }));
        }
        self.instance_bytes.clear();
        self.instance_bytes
            .extend_from_slice(bytemuck::cast_slice(instances));
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall, uniforms: &TerrainUniforms) -> Result<(), BridgeError> {
        if self.resources.is_none() {
            return Err(BridgeError::new(HeadlessError::NotInitialized));
        }
        self.draws.push((*call, *uniforms));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::map::core::glam::Mat4;
    use crate::map::{ColorInfoMap, HeightField, RoughnessPyramid, DEFAULT_HEIGHT_BANDS};
    use crate::PatchTemplate;

    #[test]
    fn records_uploads_and_draws() {
        let field = HeightField::from_fn(16, 16, |row, col| (row * col) as f32 / 256.0).unwrap();
        let template = PatchTemplate::new(2);
        let roughness = RoughnessPyramid::build(&field, 4);
        let color_info = ColorInfoMap::build(&field, &DEFAULT_HEIGHT_BANDS);

        let mut bridge = HeadlessBridge::new();
        assert!(bridge.upload_instances(&[]).is_err());

        bridge
            .init(TerrainResources {
                patch_template: &template,
                roughness: &roughness,
                color_info: &color_info,
                instance_capacity: 2,
            })
            .unwrap();
        assert_eq!(bridge.resources().unwrap().roughness_levels, 3);

        let instances = [NodeInstance::new(0, 0, 8), NodeInstance::new(0, 8, 8)];
        bridge.upload_instances(&instances).unwrap();
        assert_eq!(bridge.instance_bytes().len(), 24);
        assert!(bridge.upload_instances(&[NodeInstance::default(); 3]).is_err());

        let call = DrawCall {
            vertices_per_instance: template.num_patches(),
            instance_count: 2,
            view_projection: Mat4::IDENTITY,
        };
        bridge.draw(&call, &TerrainUniforms::default()).unwrap();
        assert_eq!(bridge.last_draw().unwrap().0, call);
    }
}
