use bytemuck::{cast_slice, Pod, Zeroable};
use static_assertions::const_assert_eq;
use std::mem;

/// One selected quadtree leaf, in height field samples. This is the per-instance vertex data of the terrain draw call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct NodeInstance {
    pub size: f32,
    pub row: f32,
    pub col: f32,
}

unsafe impl Zeroable for NodeInstance {}
unsafe impl Pod for NodeInstance {}

const_assert_eq!(mem::size_of::<NodeInstance>(), 12);

impl NodeInstance {
    pub fn new(row: u32, col: u32, size: u32) -> Self {
        Self {
            size: size as f32,
            row: row as f32,
            col: col as f32,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EmitError {
    #[error("{requested} node instances do not fit in an instance buffer of capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },
}

/// A fixed-capacity staging buffer for the node instances of one frame, reused across frames.
#[derive(Clone, Debug)]
pub struct InstanceBuffer {
    instances: Vec<NodeInstance>,
    capacity: usize,
}

impl InstanceBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Replaces the buffer contents with `selected`.
    ///
    /// If `selected` does not fit, nothing is written and the previous frame's contents are kept.
    pub fn emit(&mut self, selected: &[NodeInstance]) -> Result<&[NodeInstance], EmitError> {
        if selected.len() > self.capacity {
            return Err(EmitError::CapacityExceeded {
                requested: selected.len(),
                capacity: self.capacity,
            });
        }
        self.instances.clear();
        self.instances.extend_from_slice(selected);
        Ok(&self.instances)
    }

    pub fn instances(&self) -> &[NodeInstance] {
        &self.instances
    }

    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.instances)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
