use crate::rng::RollbackRng;


/// Uniform draw between `a` and `b`, both ends included.
/// Endpoints may come in either order; `a == b` always returns `a`.
pub fn uniform_inclusive(rng: &mut RollbackRng, a: f32, b: f32) -> f32 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let t = rng.next_f32();
    // weighted form stays finite when `high - low` overflows
    (low * (1.0 - t) + high * t).min(high).max(low)
}

pub fn seconds_until_next(elapsed: f32, interval: f32) -> f32 {
    (interval - elapsed).max(0.0)
}
