use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Returns a random generator seeded with `seed`, or
/// with a seed drawn from system entropy if there is none.
///
/// The seed actually used is logged, so that runs
/// can be reproduced.
pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    debug!("using random seed {}", seed);
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = rng_from_seed(Some(42));
        let mut b = rng_from_seed(Some(42));
        for _ in 0..10 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }
}
