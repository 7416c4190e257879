use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cup {
    pub index: usize,
    pub position: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swap {
    pub first: usize,
    pub second: usize,
}

/// Swaps left to perform and the pause after each one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shuffle {
    pub remaining: u32,
    pub speed_ms: u64,
}

pub fn lay_out_cups(count: usize) -> Vec<Cup> {
    (0..count)
        .map(|index| Cup {
            index,
            position: index,
        })
        .collect()
}

/// Two distinct cups, uniformly. `len` must be at least 2.
pub fn pick_swap<R: Rng>(rng: &mut R, len: usize) -> Swap {
    debug_assert!(len >= 2);
    let first = rng.random_range(0..len);
    let mut second = rng.random_range(0..len);
    while second == first {
        second = rng.random_range(0..len);
    }
    Swap { first, second }
}

/// Exchanges the two cups' positions and returns the re-targeted winning
/// index. The item never moves; the cup sitting over it does.
pub fn apply_swap(cups: &mut [Cup], winning: usize, swap: Swap) -> usize {
    let first_position = cups[swap.first].position;
    cups[swap.first].position = cups[swap.second].position;
    cups[swap.second].position = first_position;

    if swap.first == winning {
        swap.second
    } else if swap.second == winning {
        swap.first
    } else {
        winning
    }
}

impl Shuffle {
    pub fn new(moves: u32, speed_ms: u64) -> Self {
        Shuffle {
            remaining: moves,
            speed_ms,
        }
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// Performs one swap if any are left, returning it along with the new
    /// winning index.
    pub fn step<R: Rng>(
        &mut self,
        rng: &mut R,
        cups: &mut [Cup],
        winning: usize,
    ) -> Option<(Swap, usize)> {
        if self.remaining == 0 || cups.len() < 2 {
            self.remaining = 0;
            return None;
        }
        self.remaining -= 1;
        let swap = pick_swap(rng, cups.len());
        Some((swap, apply_swap(cups, winning, swap)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn swap_away_from_winner_keeps_index() {
        let mut cups = lay_out_cups(3);
        let winning = apply_swap(&mut cups, 1, Swap { first: 0, second: 2 });
        assert_eq!(winning, 1);
        assert_eq!(cups[0].position, 2);
        assert_eq!(cups[2].position, 0);
    }

    #[test]
    fn swap_touching_winner_retargets_index() {
        let mut cups = lay_out_cups(3);
        assert_eq!(apply_swap(&mut cups, 1, Swap { first: 1, second: 2 }), 2);

        let mut cups = lay_out_cups(3);
        assert_eq!(apply_swap(&mut cups, 1, Swap { first: 2, second: 1 }), 2);
    }

    #[test]
    fn picked_swaps_are_distinct_and_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for len in 2..6 {
            for _ in 0..200 {
                let swap = pick_swap(&mut rng, len);
                assert_ne!(swap.first, swap.second);
                assert!(swap.first < len && swap.second < len);
            }
        }
    }

    #[test]
    fn winner_tracks_item_lane_through_long_shuffles() {
        let mut rng = StdRng::seed_from_u64(3);
        for cups_count in 3..=5 {
            for start in 0..cups_count {
                let mut cups = lay_out_cups(cups_count);
                let item_lane = cups[start].position;
                let mut winning = start;
                let mut shuffle = Shuffle::new(50, 0);
                while let Some((_, next)) = shuffle.step(&mut rng, &mut cups, winning) {
                    winning = next;
                    assert_eq!(cups[winning].position, item_lane);
                }
                assert!(shuffle.is_done());
            }
        }
    }

    #[test]
    fn positions_stay_a_permutation() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut cups = lay_out_cups(5);
        let mut shuffle = Shuffle::new(20, 200);
        let mut winning = 0;
        while let Some((_, next)) = shuffle.step(&mut rng, &mut cups, winning) {
            winning = next;
        }
        let mut lanes: Vec<usize> = cups.iter().map(|cup| cup.position).collect();
        lanes.sort_unstable();
        assert_eq!(lanes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn single_cup_never_swaps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cups = lay_out_cups(1);
        let mut shuffle = Shuffle::new(5, 100);
        assert!(shuffle.step(&mut rng, &mut cups, 0).is_none());
        assert!(shuffle.is_done());
    }
}
