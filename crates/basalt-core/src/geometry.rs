use crate::glam::{Mat4, Vec3A, Vec4};
use crate::ilattice::prelude::Extent;

/// How a volume relates to a [`Frustum`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Containment {
    /// No point of the volume is inside the frustum.
    Disjoint,
    /// The volume straddles at least one of the frustum planes.
    Intersects,
    /// Every point of the volume is inside the frustum.
    Contains,
}

/// A half-space `normal · p + d >= 0`. The normal points into the kept side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3A,
    pub d: f32,
}

impl Plane {
    pub fn new(normal: Vec3A, d: f32) -> Self {
        Self { normal, d }
    }

    /// Builds a plane from unnormalized `(a, b, c, d)` coefficients.
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = Vec3A::new(coefficients.x, coefficients.y, coefficients.z);
        let inv_length = 1.0 / normal.length();
        Self {
            normal: normal * inv_length,
            d: coefficients.w * inv_length,
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3A) -> f32 {
        self.normal.dot(p) + self.d
    }
}

/// A convex view volume bounded by six inward-facing [`Plane`]s, ordered left, right, bottom, top, near, far.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extracts the frustum planes from a combined view-projection matrix with a `[0, 1]` clip depth range (the
    /// convention of `Mat4::perspective_rh` and `Mat4::orthographic_rh`).
    ///
    /// Refer to: Gribb & Hartmann, "Fast Extraction of Viewing Frustum Planes from the World-View-Projection Matrix".
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        // Columns of the transpose are the rows of the original.
        let m = view_projection.transpose();

        let left = m.w_axis + m.x_axis;
        let right = m.w_axis - m.x_axis;
        let bottom = m.w_axis + m.y_axis;
        let top = m.w_axis - m.y_axis;
        let near = m.z_axis;
        let far = m.w_axis - m.z_axis;

        Self::new([left, right, bottom, top, near, far].map(Plane::from_coefficients))
    }

    /// The frustum whose volume is exactly the box `extent`.
    pub fn from_extent(extent: Extent<Vec3A>) -> Self {
        let min = extent.minimum;
        let lub = extent.least_upper_bound();
        Self::new([
            Plane::new(Vec3A::new(1.0, 0.0, 0.0), -min.x),
            Plane::new(Vec3A::new(-1.0, 0.0, 0.0), lub.x),
            Plane::new(Vec3A::new(0.0, 1.0, 0.0), -min.y),
            Plane::new(Vec3A::new(0.0, -1.0, 0.0), lub.y),
            Plane::new(Vec3A::new(0.0, 0.0, 1.0), -min.z),
            Plane::new(Vec3A::new(0.0, 0.0, -1.0), lub.z),
        ])
    }

    pub fn contains_point(&self, p: Vec3A) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(p) >= 0.0)
    }

    /// Classifies the axis-aligned box `aabb` against all six planes.
    ///
    /// For each plane, only the box corner furthest along the plane normal (the "positive vertex") and the opposite corner
    /// (the "negative vertex") are tested. This is conservative: a box near a frustum corner may be reported as
    /// [`Containment::Intersects`] even though it is outside, but never the other way around.
    pub fn classify_aabb(&self, aabb: &Extent<Vec3A>) -> Containment {
        let min = aabb.minimum;
        let max = aabb.least_upper_bound();

        let mut intersects = false;
        for plane in self.planes.iter() {
            let n = plane.normal;
            let positive = Vec3A::new(
                if n.x >= 0.0 { max.x } else { min.x },
                if n.y >= 0.0 { max.y } else { min.y },
                if n.z >= 0.0 { max.z } else { min.z },
            );
            if plane.signed_distance(positive) < 0.0 {
                return Containment::Disjoint;
            }

            let negative = Vec3A::new(
                if n.x >= 0.0 { min.x } else { max.x },
                if n.y >= 0.0 { min.y } else { max.y },
                if n.z >= 0.0 { min.z } else { max.z },
            );
            if plane.signed_distance(negative) < 0.0 {
                intersects = true;
            }
        }

        if intersects {
            Containment::Intersects
        } else {
            Containment::Contains
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
