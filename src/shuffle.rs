//! In-place playlist randomization

use crate::model::ShuffleAlgorithm;
use rand::Rng;
use rand::seq::SliceRandom;

pub fn shuffle<T, R>(items: &mut [T], algorithm: ShuffleAlgorithm, rng: &mut R)
where
    R: Rng + ?Sized,
{
    match algorithm {
        ShuffleAlgorithm::Legacy => shuffle_legacy(items, rng),
        ShuffleAlgorithm::FisherYates => items.shuffle(rng),
    }
}

/// Swaps every position with a partner drawn from `[0, len - 2]`.
///
/// The last position is never drawn as a partner, so the resulting
/// permutations are not uniformly distributed. Lists of one element or
/// fewer are left as they are.
fn shuffle_legacy<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    let len = items.len();
    if len < 2 {
        return;
    }
    for i in 0..len {
        let partner = rng.random_range(0..len - 1);
        items.swap(i, partner);
    }
}
