use super::{Point3, Vector3, TOLERANCE};

/// An oriented plane in 3D space, stored as an origin point and a unit normal.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    origin: Point3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane from an origin and a normal vector.
    ///
    /// The normal is normalized on construction. Returns `None` for a
    /// zero-length normal (degenerate geometry is skipped, not reported).
    #[must_use]
    pub fn from_normal(origin: Point3, normal: Vector3) -> Option<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return None;
        }
        Some(Self {
            origin,
            normal: normal / len,
        })
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Signed distance from a point to the plane.
    /// Positive = on the normal side, negative = opposite.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&(point - self.origin))
    }

    /// Classifies a point with a signed-epsilon band around the plane.
    #[must_use]
    pub fn classify(&self, point: &Point3, epsilon: f64) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::On
        }
    }
}

/// Classification of a point relative to an oriented plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is on the positive side (in the direction of the normal).
    Front,
    /// Point is on the negative side (opposite the normal).
    Back,
    /// Point lies on the plane (within epsilon).
    On,
}

/// Clips the parametric interval `[t0, t1]` of the line `origin + t * dir`
/// to the front half-space of `plane` (signed distance `>= -epsilon`).
///
/// A line parallel to the plane is left unclipped by it, unless it lies
/// entirely beyond the back epsilon band, in which case the whole interval
/// is rejected.
#[must_use]
pub fn keep_front_interval(
    origin: &Point3,
    dir: &Vector3,
    interval: (f64, f64),
    plane: &Plane,
    epsilon: f64,
) -> Option<(f64, f64)> {
    let (t0, t1) = interval;
    let f0 = plane.signed_distance(origin);
    let slope = plane.normal().dot(dir);

    if slope.abs() < epsilon {
        // Parallel to the plane: unclipped unless fully behind.
        return if f0 < -epsilon { None } else { Some((t0, t1)) };
    }

    // Signed distance along the line is f0 + t * slope; crossing at t*.
    let t_cross = -f0 / slope;
    let (lo, hi) = if slope > 0.0 {
        (t_cross.max(t0), t1)
    } else {
        (t0, t_cross.min(t1))
    };

    if lo < hi { Some((lo, hi)) } else { None }
}

/// Returns the sub-interval of `[t0, t1]` lying strictly behind `plane`
/// (signed distance `< -epsilon`), or `None` if no part is behind.
///
/// Points within the epsilon band count as "on" the plane, not behind it.
#[must_use]
pub fn keep_behind_interval(
    origin: &Point3,
    dir: &Vector3,
    interval: (f64, f64),
    plane: &Plane,
    epsilon: f64,
) -> Option<(f64, f64)> {
    let (t0, t1) = interval;
    let f0 = plane.signed_distance(origin);
    let slope = plane.normal().dot(dir);

    if slope.abs() < epsilon {
        return if f0 < -epsilon { Some((t0, t1)) } else { None };
    }

    // Strictly-behind region is bounded by the crossing of the -epsilon band.
    let t_cross = (-epsilon - f0) / slope;
    let (lo, hi) = if slope < 0.0 {
        (t_cross.max(t0), t1)
    } else {
        (t0, t_cross.min(t1))
    };

    if lo < hi { Some((lo, hi)) } else { None }
}
