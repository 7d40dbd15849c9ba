//! Random number generation
//!
//! A seeded generator with the dice and selection helpers used by map generation.
//! Every randomized decision in the crate goes through this type so that a seed
//! reproduces a level exactly.

use rand::seq::SliceRandom;
use rand::{Rng as _, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded random number generator
#[derive(Debug, Clone)]
pub struct Rng {
    seed: u64,
    engine: ChaCha8Rng,
}

impl Rng {
    /// Create a generator from a fixed seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            engine: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a generator with a seed drawn from the operating system
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().next_u64())
    }

    /// The seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `[0, exclusive_max)`
    pub fn get_int(&mut self, exclusive_max: i32) -> i32 {
        assert!(exclusive_max > 0, "get_int needs a positive bound, got {exclusive_max}");
        self.engine.gen_range(0..exclusive_max)
    }

    /// Uniform integer in `[min, inclusive_max]`
    pub fn get_int_range(&mut self, min: i32, inclusive_max: i32) -> i32 {
        assert!(min <= inclusive_max, "empty range {min}..={inclusive_max}");
        self.engine.gen_range(min..=inclusive_max)
    }

    /// Roll `number` dice with `sides` sides and sum them
    pub fn roll_dice(&mut self, number: i32, sides: i32) -> i32 {
        assert!(number > 0 && sides > 0);
        (0..number).map(|_| self.get_int_range(1, sides)).sum()
    }

    /// Roll `number` dice and sum the `highest` best results
    pub fn roll_dice_highest(&mut self, number: i32, sides: i32, highest: i32) -> i32 {
        assert!(number > 0 && sides > 0 && highest <= number);
        let mut rolls = self.roll_each(number, sides);
        rolls.sort_unstable_by(|a, b| b.cmp(a));
        rolls.iter().take(highest as usize).sum()
    }

    /// Roll `number` dice and sum the `lowest` worst results
    pub fn roll_dice_lowest(&mut self, number: i32, sides: i32, lowest: i32) -> i32 {
        assert!(number > 0 && sides > 0 && lowest <= number);
        let mut rolls = self.roll_each(number, sides);
        rolls.sort_unstable();
        rolls.iter().take(lowest as usize).sum()
    }

    fn roll_each(&mut self, number: i32, sides: i32) -> Vec<i32> {
        (0..number).map(|_| self.get_int_range(1, sides)).collect()
    }

    /// Uniform float in `[0, max)`
    pub fn get_float(&mut self, max: f32) -> f32 {
        assert!(max > 0.0);
        self.engine.gen_range(0.0..max)
    }

    /// Uniform float in `[min, max)`
    pub fn get_float_range(&mut self, min: f32, max: f32) -> f32 {
        assert!(min < max);
        self.engine.gen_range(min..max)
    }

    /// True with the given probability
    pub fn get_bool(&mut self, probability: f64) -> bool {
        self.engine.gen_bool(probability)
    }

    /// Coin flip
    pub fn coin(&mut self) -> bool {
        self.get_bool(0.5)
    }

    /// Uniform point in `[0, width) x [0, height)`
    pub fn get_point(&mut self, width: i32, height: i32) -> (i32, i32) {
        (self.get_int(width), self.get_int(height))
    }

    /// Pick one element uniformly. Always consumes exactly one draw.
    pub fn get_one<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "cannot pick from an empty slice");
        let index = self.get_int(items.len() as i32) as usize;
        &items[index]
    }

    /// Fisher-Yates shuffle in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.engine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        let xs: Vec<i32> = (0..32).map(|_| a.get_int(100)).collect();
        let ys: Vec<i32> = (0..32).map(|_| b.get_int(100)).collect();
        assert_eq!(xs, ys);
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_ranges() {
        let mut rng = Rng::new(7);
        for _ in 0..500 {
            let v = rng.get_int_range(2, 5);
            assert!((2..=5).contains(&v));
            let d = rng.roll_dice(3, 3);
            assert!((3..=9).contains(&d));
            let f = rng.get_float(2.0);
            assert!((0.0..2.0).contains(&f));
        }
    }

    #[test]
    fn test_dice_highest_lowest() {
        let mut rng = Rng::new(11);
        for _ in 0..200 {
            let hi = rng.roll_dice_highest(4, 6, 3);
            assert!((3..=18).contains(&hi));
            let lo = rng.roll_dice_lowest(4, 6, 1);
            assert!((1..=6).contains(&lo));
        }
    }

    #[test]
    fn test_get_one_and_shuffle() {
        let mut rng = Rng::new(3);
        let items = [1, 2, 3, 4];
        assert!(items.contains(rng.get_one(&items)));

        let mut deck: Vec<i32> = (0..20).collect();
        rng.shuffle(&mut deck);
        let mut sorted = deck.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic]
    fn test_get_int_zero_bound_panics() {
        Rng::new(1).get_int(0);
    }
}
