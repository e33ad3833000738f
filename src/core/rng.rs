//! Deterministic xorshift32 RNG shared by every stochastic pass.
//!
//! Host and peer seed it identically so flow ordering replays the same way.

/// Advance the state and return the next value.
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    if x == 0 {
        x = 0x9E37_79B9;
    }
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// In-place Fisher-Yates shuffle driven by `xorshift32`.
#[inline]
pub fn shuffle<T>(items: &mut [T], state: &mut u32) {
    for i in (1..items.len()).rev() {
        let j = (xorshift32(state) as usize) % (i + 1);
        items.swap(i, j);
    }
}

/// Stateless 32-bit mix of two words (used for position-derived seeds).
#[inline]
pub fn hash2(a: u32, b: u32) -> u32 {
    let mut h = a.wrapping_mul(0x85EB_CA6B) ^ b.rotate_left(16).wrapping_mul(0xC2B2_AE35);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297A_2D39);
    h ^= h >> 15;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift_never_sticks_at_zero() {
        let mut state = 0u32;
        let a = xorshift32(&mut state);
        assert_ne!(a, 0);
        assert_ne!(state, 0);
    }

    #[test]
    fn shuffle_is_a_permutation_and_replays() {
        let mut a = [0usize, 1, 2, 3, 4, 5, 6, 7];
        let mut b = a;
        let mut s1 = 12345u32;
        let mut s2 = 12345u32;
        shuffle(&mut a, &mut s1);
        shuffle(&mut b, &mut s2);
        assert_eq!(a, b);

        let mut sorted = a;
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn hash2_depends_on_both_inputs() {
        assert_ne!(hash2(1, 2), hash2(2, 1));
        assert_eq!(hash2(7, 9), hash2(7, 9));
    }
}
