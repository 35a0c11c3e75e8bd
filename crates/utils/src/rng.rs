use bevy::ecs::system::Resource;


/// Small seeded LCG used for every gameplay random draw.
/// Same seed, same spawn sequence.
#[derive(Debug, Resource, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RollbackRng {
    pub seed: u32,
}

impl RollbackRng {
    const A: u32 = 1664525;
    const C: u32 = 1013904223;
    // Modulus is 2^32 through wrapping arithmetic.

    pub fn new(initial_seed: u32) -> Self {
        RollbackRng { seed: initial_seed }
    }

    /// Advances the state and returns it.
    pub fn next_u32(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(Self::A).wrapping_add(Self::C);
        self.seed
    }

    /// Value in [0.0, 1.0]. The top end is only reachable through f32 rounding.
    pub fn next_f32(&mut self) -> f32 {
        self.next_u32() as f32 / 4294967296.0
    }

    /// Uniform index in `0..len`, taken from the high bits.
    /// The low bits of a power-of-two LCG cycle with a tiny period, so `% len` is not an option.
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * len as u64) >> 32) as usize
    }
}
