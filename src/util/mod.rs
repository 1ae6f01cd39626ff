pub mod linalg;
pub mod log;

pub mod range {
    use std::ops::Range;

    /// Penetration depth of two projection intervals along a shared axis.
    /// Intervals that merely touch at an endpoint do not overlap.
    pub fn overlap_depth_f32(r1: &Range<f32>, r2: &Range<f32>) -> Option<f32> {
        if r1.end <= r2.start || r2.end <= r1.start {
            None
        } else {
            Some(f32::min(r1.end - r2.start, r2.end - r1.start))
        }
    }
}

pub mod float {
    use num_traits::Zero;

    pub fn force_positive_zero(x: f32) -> f32 {
        if x.is_zero() { 0.0 } else { x }
    }
}
