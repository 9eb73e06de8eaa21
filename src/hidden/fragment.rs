//! Parametric edge fragments surviving occlusion.

/// One visible sub-range `[t0, t1]` of a parametric edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Fragment {
    pub t0: f64,
    pub t1: f64,
}

/// Removes a shadowed interval from every fragment in place.
///
/// A fragment overlapping the shadow is shrunk, split in two, or deleted.
/// Slivers shorter than `min_len` are discarded rather than kept.
pub(crate) fn subtract_interval(fragments: &mut Vec<Fragment>, shadow: (f64, f64), min_len: f64) {
    let (s0, s1) = shadow;
    let mut out = Vec::with_capacity(fragments.len() + 1);
    for frag in fragments.drain(..) {
        if s1 <= frag.t0 || s0 >= frag.t1 {
            out.push(frag);
            continue;
        }
        if s0 - frag.t0 > min_len {
            out.push(Fragment {
                t0: frag.t0,
                t1: s0,
            });
        }
        if frag.t1 - s1 > min_len {
            out.push(Fragment {
                t0: s1,
                t1: frag.t1,
            });
        }
    }
    *fragments = out;
}
