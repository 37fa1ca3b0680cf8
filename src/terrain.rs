use crate::core::geometry::Frustum;
use crate::core::glam::{Mat4, Vec3A};
use crate::core::work_timer::WorkTimer;
use crate::map::{
    bands_fingerprint, load_or_build, ArtifactKey, CacheStatus, ColorInfoMap, HeightField, InstanceBuffer,
    NodeInstance, QuadtreeSelector, RoughnessPyramid, SelectionStats, TerrainConfig, TerrainLayout, WorldUnits,
};
use crate::renderer::{DrawCall, PatchTemplate, RenderBridge, TerrainResources, TerrainUniforms};
use crate::{BasaltConfig, Error};

use std::time::Duration;

/// Timing and counters for the most recent [`Terrain::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub selection: SelectionStats,
    pub selection_time: Duration,
    pub longest_selection_time: Duration,
    pub average_selection_time_us: u32,
    pub frames: u32,
}

/// A loaded terrain: the immutable data derived from one [`HeightField`], plus the per-frame selection output.
pub struct Terrain {
    height_field: HeightField,
    config: TerrainConfig,
    layout: TerrainLayout,
    roughness: RoughnessPyramid,
    roughness_cache: CacheStatus,
    color_info: ColorInfoMap,
    color_info_cache: CacheStatus,
    patch_template: PatchTemplate,
    selector: QuadtreeSelector,
    uniforms: TerrainUniforms,

    selected: Vec<NodeInstance>,
    instance_buffer: InstanceBuffer,
    last_selection: SelectionStats,
    selection_timer: WorkTimer,
}

impl Terrain {
    /// Loads the cached roughness pyramid and color info map if they were built from this exact height field, and
    /// builds them otherwise.
    pub fn load(height_field: HeightField, config: &BasaltConfig) -> Result<Self, Error> {
        let layout = TerrainLayout::new(&height_field, &config.terrain)?;
        let fingerprint = height_field.fingerprint();

        let roughness_key = ArtifactKey::new(fingerprint, layout.patch_size() as u64);
        let (roughness, roughness_cache) = load_or_build(&config.roughness_cache_path, roughness_key, || {
            RoughnessPyramid::build(&height_field, layout.patch_size())
        });

        let color_info_key = ArtifactKey::new(fingerprint, bands_fingerprint(&config.height_bands));
        let (color_info, color_info_cache) = load_or_build(&config.color_info_cache_path, color_info_key, || {
            ColorInfoMap::build(&height_field, &config.height_bands)
        });

        log::info!(
            "Loaded {}x{} terrain: root size {}, {} world units per sample, up to {} node instances",
            layout.num_rows(),
            layout.num_cols(),
            layout.root_size(),
            layout.terrain_scale(),
            layout.instance_capacity()
        );

        Ok(Self {
            config: config.terrain,
            roughness,
            roughness_cache,
            color_info,
            color_info_cache,
            patch_template: PatchTemplate::from_layout(&layout),
            selector: QuadtreeSelector::from_layout(&layout, &config.terrain),
            uniforms: TerrainUniforms::new(&layout, &config.terrain),
            selected: Vec::with_capacity(layout.max_leaf_nodes()),
            instance_buffer: InstanceBuffer::with_capacity(layout.instance_capacity()),
            last_selection: SelectionStats::default(),
            selection_timer: WorkTimer::start(),
            height_field,
            layout,
        })
    }

    /// Hands the static terrain resources to `bridge`. Must happen before the first [`Self::draw`].
    pub fn init_renderer(&self, bridge: &mut impl RenderBridge) -> Result<(), Error> {
        bridge.init(TerrainResources {
            patch_template: &self.patch_template,
            roughness: &self.roughness,
            color_info: &self.color_info,
            instance_capacity: self.instance_buffer.capacity(),
        })?;
        Ok(())
    }

    /// Selects the nodes to draw from `camera`, replacing the previous frame's selection.
    pub fn update(&mut self, camera: WorldUnits<Vec3A>, frustum: &Frustum) -> SelectionStats {
        let selector = &self.selector;
        let selected = &mut self.selected;
        let stats = self
            .selection_timer
            .time(|| selector.select(camera, frustum, selected));
        self.last_selection = stats;

        log::debug!(
            "Selected {} nodes ({} visited, {} culled) in {:?}",
            stats.instances,
            stats.nodes_visited,
            stats.culled,
            self.selection_timer.last_item_time()
        );

        stats
    }

    /// Uploads the current selection and draws it.
    pub fn draw(&mut self, bridge: &mut impl RenderBridge, view_projection: Mat4) -> Result<DrawCall, Error> {
        let instances = self.instance_buffer.emit(&self.selected)?;
        bridge.upload_instances(instances)?;

        let call = DrawCall {
            vertices_per_instance: self.layout.patches_per_node(),
            instance_count: instances.len() as u32,
            view_projection,
        };
        bridge.draw(&call, &self.uniforms)?;

        Ok(call)
    }

    /// Swaps in `config`. Only parameters that don't affect the terrain layout may change.
    pub fn set_config(&mut self, config: TerrainConfig) -> Result<(), Error> {
        config.validate()?;
        if self.config.layout_differs(&config) {
            return Err(Error::LayoutChanged);
        }

        self.config = config;
        self.selector = QuadtreeSelector::from_layout(&self.layout, &config);
        self.uniforms = TerrainUniforms::new(&self.layout, &config);

        Ok(())
    }

    pub fn frame_stats(&self) -> FrameStats {
        FrameStats {
            selection: self.last_selection,
            selection_time: self.selection_timer.last_item_time(),
            longest_selection_time: self.selection_timer.longest_item_time(),
            average_selection_time_us: self.selection_timer.average_time_us(),
            frames: self.selection_timer.items_completed(),
        }
    }

    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn layout(&self) -> &TerrainLayout {
        &self.layout
    }

    pub fn roughness(&self) -> &RoughnessPyramid {
        &self.roughness
    }

    pub fn roughness_cache(&self) -> CacheStatus {
        self.roughness_cache
    }

    pub fn color_info(&self) -> &ColorInfoMap {
        &self.color_info
    }

    pub fn color_info_cache(&self) -> CacheStatus {
        self.color_info_cache
    }

    pub fn patch_template(&self) -> &PatchTemplate {
        &self.patch_template
    }

    pub fn uniforms(&self) -> &TerrainUniforms {
        &self.uniforms
    }

    /// The nodes chosen by the last [`Self::update`].
    pub fn selected(&self) -> &[NodeInstance] {
        &self.selected
    }
}
