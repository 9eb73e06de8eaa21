//! Per-element visibility flags for one displayed state.
//!
//! Rules are applied in a fixed order; later rules override earlier ones.
//! Rebuilt whenever activity, hidden materials, hidden objects or cutting
//! planes change.

use crate::math::plane::{Plane, PlaneSide};
use crate::math::{Point3, Vector3};
use crate::mesh::ElementClass;

/// A cutting plane given by a point and an outward normal. Elements whose
/// nodes all lie strictly on the normal side are culled.
#[derive(Debug, Clone, Copy)]
pub struct CutPlane {
    pub point: Point3,
    pub normal: Vector3,
}

/// Display toggles affecting visibility evaluation.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityOptions {
    /// Wireframe-transparent display: everything is forced visible and no
    /// other rule applies.
    pub wireframe_transparent: bool,
    /// Invert the activity rule so deleted (inactive) elements show.
    pub show_deleted: bool,
    /// Invert the activity rule, showing only deleted elements.
    pub show_only_deleted: bool,
    /// When disabled, damaged elements are suppressed.
    pub show_damage: bool,
    /// Epsilon for the cutting-plane side test.
    pub cut_epsilon: f64,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            wireframe_transparent: false,
            show_deleted: false,
            show_only_deleted: false,
            show_damage: true,
            cut_epsilon: 1e-8,
        }
    }
}

/// Per-state inputs to visibility evaluation. All slices are indexed by
/// element (or keyed by material id for the hidden-material set).
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityInputs<'a> {
    /// Per-element activity; `0.0` means inactive (deleted).
    pub activity: Option<&'a [f32]>,
    /// Material ids whose elements are hidden.
    pub hidden_materials: &'a [i32],
    /// Explicitly hidden element indices.
    pub hidden_elements: &'a [u32],
    /// Active cutting planes.
    pub cut_planes: &'a [CutPlane],
    /// Per-element damage flags.
    pub damage: Option<&'a [bool]>,
}

/// Computes the per-element visibility flags of one class.
///
/// Default is all visible. Rules in order: wireframe-transparent
/// short-circuit, activity (optionally inverted by the show-deleted
/// toggles), hidden materials, hidden element ids, rough cutting-plane
/// cull, damage suppression.
#[must_use]
pub fn update_visibility(
    class: &ElementClass,
    coords: &[Point3],
    inputs: &VisibilityInputs<'_>,
    options: &VisibilityOptions,
) -> Vec<bool> {
    let qty = class.qty();
    let mut visible = vec![true; qty];

    if options.wireframe_transparent {
        return visible;
    }

    if let Some(activity) = inputs.activity {
        let inverted = options.show_deleted || options.show_only_deleted;
        for (e, flag) in visible.iter_mut().enumerate() {
            let inactive = activity[e] == 0.0;
            *flag = if inverted { inactive } else { !inactive };
        }
    }

    if !inputs.hidden_materials.is_empty() {
        // Decide once per material, apply per element.
        let mats = class.materials();
        for (e, flag) in visible.iter_mut().enumerate() {
            if inputs.hidden_materials.contains(&mats[e]) {
                *flag = false;
            }
        }
    }

    for &e in inputs.hidden_elements {
        if let Some(flag) = visible.get_mut(e as usize) {
            *flag = false;
        }
    }

    for cut in inputs.cut_planes {
        let Some(plane) = Plane::from_normal(cut.point, cut.normal) else {
            continue;
        };
        for (e, flag) in visible.iter_mut().enumerate() {
            if !*flag {
                continue;
            }
            // Rough cut: the element is removed only when every node lies
            // strictly on the outward side. Partial intersections stay.
            let all_outside = class.element_nodes(e).iter().all(|&n| {
                plane.classify(&coords[n as usize], options.cut_epsilon) == PlaneSide::Front
            });
            if all_outside {
                *flag = false;
            }
        }
    }

    if let Some(damage) = inputs.damage {
        if !options.show_damage {
            for (e, flag) in visible.iter_mut().enumerate() {
                if damage[e] {
                    *flag = false;
                }
            }
        }
    }

    visible
}
