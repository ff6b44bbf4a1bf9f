//! Shuffling algorithms for piles.
//!
//! - Riffle: split near the middle and let the halves fall back together in
//!   small runs, like a person shuffling one deck.
//! - Multi-quick: several people shuffle a large pool of packs together, each
//!   grabbing a sub-pile, riffling it and trading part of it back.
//!
//! Both are driven by a caller-supplied [`Rng`], so a seeded generator gives a
//! reproducible result.

use crate::error::{GameError, Result};
use crate::group::{CardGroup, Pile};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::debug;

/// Largest pile the riffle shuffle accepts
pub const MAX_RIFFLE_CARDS: usize = 100;

/// Smallest pool the multi-quick shuffle accepts
pub const MIN_MULTI_CARDS: usize = 52;

/// Holdings below this size are handed back whole
const RELEASE_ALL_BELOW: usize = 30;

/// Sub-piles below these sizes are taken whole
const FRESH_TAKE_CAP: usize = 80;
const TOP_UP_TAKE_CAP: usize = 40;

/// Standard deviation of the timing jitter, in virtual seconds
const JITTER_STDDEV: f64 = 3.0;

/// How a pile should be shuffled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShuffleMethod {
    /// Uniform random permutation
    Perfect,
    Riffle,
    MultiQuick,
}

/// Someone taking part in a multi-quick shuffle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shuffler {
    /// Upper bound on run length and cut error when riffling
    pub precision: usize,
    /// Relative shuffling speed, 1.0 is average
    pub speed: f64,
}

impl Default for Shuffler {
    fn default() -> Self {
        Self {
            precision: 7,
            speed: 1.0,
        }
    }
}

/// Parameters of a multi-quick shuffle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiShuffle {
    /// Riffles per pick-up
    pub iterations: usize,
    /// Precision of generated participants
    pub precision: usize,
    /// Explicit participants; excludes `num_participants`
    pub participants: Option<Vec<Shuffler>>,
    /// Number of generated participants; excludes `participants`
    pub num_participants: Option<usize>,
    /// Virtual time budget
    pub seconds: u32,
}

impl Default for MultiShuffle {
    fn default() -> Self {
        Self {
            iterations: 1,
            precision: 10,
            participants: None,
            num_participants: None,
            seconds: 120,
        }
    }
}

impl MultiShuffle {
    const DEFAULT_PARTICIPANTS: usize = 4;

    pub fn with_participants(participants: Vec<Shuffler>) -> Self {
        Self {
            participants: Some(participants),
            ..Self::default()
        }
    }

    fn resolve_participants(&self) -> Result<Vec<Shuffler>> {
        let participants = match (&self.participants, self.num_participants) {
            (Some(_), Some(_)) => {
                return Err(GameError::InvalidArguments(
                    "participants and num_participants are mutually exclusive".to_string(),
                ))
            }
            (Some(list), None) => list.clone(),
            (None, count) => {
                let shuffler = Shuffler {
                    precision: self.precision,
                    ..Shuffler::default()
                };
                vec![shuffler; count.unwrap_or(Self::DEFAULT_PARTICIPANTS)]
            }
        };

        if participants.is_empty() {
            return Err(GameError::InvalidArguments(
                "a multi-quick shuffle needs at least one participant".to_string(),
            ));
        }
        if participants.iter().any(|p| p.speed.is_nan() || p.speed <= 0.0) {
            return Err(GameError::InvalidArguments(
                "shuffler speed must be positive".to_string(),
            ));
        }
        Ok(participants)
    }
}

/// Sample from a normal distribution (Box-Muller)
fn gaussian<R: Rng>(rng: &mut R, mean: f64, stddev: f64) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + stddev * z
}

/// A participant's state during a multi-quick shuffle
struct Seat {
    shuffler: Shuffler,
    holding: Option<Pile>,
}

impl Pile {
    pub fn shuffle<R: Rng>(
        &mut self,
        rng: &mut R,
        method: ShuffleMethod,
        iterations: usize,
        precision: usize,
    ) -> Result<()> {
        match method {
            ShuffleMethod::Perfect => {
                self.cards_mut().shuffle(rng);
                Ok(())
            }
            ShuffleMethod::Riffle => self.riffle_shuffle(rng, iterations, precision),
            ShuffleMethod::MultiQuick => self.multi_quick_shuffle(
                rng,
                &MultiShuffle {
                    iterations,
                    precision,
                    ..MultiShuffle::default()
                },
            ),
        }
    }

    /// Riffle shuffle `iterations` times.
    ///
    /// Each pass cuts at the middle give or take `precision - 1` cards, then
    /// alternates between the halves, starting with the top half, dropping
    /// runs of `1..precision` cards until one half is used up; the rest of
    /// both halves follow in order.
    pub fn riffle_shuffle<R: Rng>(&mut self, rng: &mut R, iterations: usize, precision: usize) -> Result<()> {
        let total = self.count();
        if total > MAX_RIFFLE_CARDS {
            return Err(GameError::TooManyCards {
                count: total,
                max: MAX_RIFFLE_CARDS,
            });
        }
        if total < 2 {
            return Ok(());
        }
        let precision = precision.min(total / 2).max(1);

        for _ in 0..iterations {
            let error = if precision == 1 {
                0
            } else {
                let spread = precision as i64 - 1;
                rng.gen_range(-spread..=spread)
            };
            let mid = (total as i64 / 2 + error) as usize;

            let mut cards = self.remove_all_cards();
            let right = cards.split_off(mid);
            let mut halves = [cards.into_iter(), right.into_iter()];

            let mut merged = Vec::with_capacity(total);
            let mut side = 0;
            let mut loops = 0;
            while halves[0].len() > 0 && halves[1].len() > 0 {
                side = 1 - side;
                let run = if precision == 1 {
                    1
                } else {
                    rng.gen_range(1..precision).min(halves[side].len())
                };
                merged.extend(halves[side].by_ref().take(run));

                loops += 1;
                if loops > total {
                    return Err(GameError::Internal(format!(
                        "riffle interleave exceeded {total} passes"
                    )));
                }
            }
            let [left, right] = halves;
            merged.extend(left);
            merged.extend(right);
            self.add_cards(merged);
        }
        Ok(())
    }

    /// Shuffle a large pile the way a table of people would.
    ///
    /// The pile is cut into one sub-pile per participant to form a shared
    /// pool. Over `seconds` ticks of virtual time, each participant whose
    /// previous shuffle is done hands back half of what they hold (all of it
    /// below 30 cards), takes a sub-pile from the pool (whole if under 80
    /// cards, or 40 when topping up, otherwise half of it), riffles what they
    /// now hold and becomes busy for a time set by their speed plus jitter.
    /// When time runs out every holding and the pool are merged back.
    ///
    /// Participants are scheduled through a queue keyed by their next tick,
    /// ties broken by seat order, which visits them in the same order as
    /// scanning every seat on every tick.
    pub fn multi_quick_shuffle<R: Rng>(&mut self, rng: &mut R, params: &MultiShuffle) -> Result<()> {
        let participants = params.resolve_participants()?;
        if self.count() < MIN_MULTI_CARDS {
            return Err(GameError::Underflow {
                requested: MIN_MULTI_CARDS,
                available: self.count(),
            });
        }

        let budget = params.seconds;
        let mut pool = self.split(participants.len(), false, false)?;
        let mut seats: Vec<Seat> = participants
            .into_iter()
            .map(|shuffler| Seat {
                shuffler,
                holding: None,
            })
            .collect();

        let mut queue: BinaryHeap<Reverse<(u32, usize)>> =
            (0..seats.len()).map(|i| Reverse((0, i))).collect();

        while let Some(Reverse((tick, idx))) = queue.pop() {
            if tick >= budget {
                break;
            }
            let remaining = f64::from(budget - tick);
            let seat = &mut seats[idx];

            let released = match seat.holding.take() {
                Some(pile) if pile.count() < RELEASE_ALL_BELOW => Some(pile),
                Some(mut pile) => {
                    let mut rest = pile.split(2, false, true)?;
                    seat.holding = Some(pile);
                    rest.pop()
                }
                None => None,
            };

            let mut next_tick = tick + 1;
            if !pool.is_empty() {
                let pick = rng.gen_range(0..pool.len());
                let cap = if seat.holding.is_some() {
                    TOP_UP_TAKE_CAP
                } else {
                    FRESH_TAKE_CAP
                };
                let mut taken = if pool[pick].count() < cap {
                    pool.remove(pick)
                } else {
                    pool[pick].split(2, false, true)?.pop().unwrap_or_default()
                };

                let holding = seat.holding.get_or_insert_with(Pile::default);
                holding.add_group(&mut taken);
                holding.riffle_shuffle(rng, params.iterations, seat.shuffler.precision)?;

                let effort = (5 + 10 * params.iterations) as f64 / seat.shuffler.speed;
                let busy = effort.trunc().max(1.0);
                let done_at = remaining - busy - gaussian(rng, 0.0, JITTER_STDDEV);
                // Free again on the first tick whose remaining time is <= done_at
                let free_tick = (f64::from(budget) - done_at).ceil();
                if free_tick > f64::from(next_tick) {
                    next_tick = free_tick.min(f64::from(budget)) as u32;
                }

                debug!(
                    participant = idx,
                    tick,
                    holding = holding.count(),
                    pool = pool.len(),
                    next_tick,
                    "multi-quick pick-up"
                );
            }

            if let Some(pile) = released {
                pool.push(pile);
            }
            queue.push(Reverse((next_tick, idx)));
        }

        for seat in seats {
            if let Some(pile) = seat.holding {
                pool.push(pile);
            }
        }
        for mut pile in pool {
            self.add_group(&mut pile);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Back, Card, Pack};
    use crate::meld::{Cards, Classifier, MeldMethod};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn packs(count: usize) -> Pile {
        let mut pile = Pile::default();
        for i in 0..count {
            pile.add_cards(Pack::new(Back::nth(i)).cards);
        }
        pile
    }

    fn sorted_shorthands(pile: &Pile) -> Vec<String> {
        let mut cards: Vec<String> = pile
            .cards()
            .iter()
            .map(|c: &Card| format!("{}{}", c.shorthand(), c.back))
            .collect();
        cards.sort();
        cards
    }

    #[test]
    fn test_riffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pile = packs(1);
        let before = sorted_shorthands(&pile);
        let original = pile.cards().to_vec();

        pile.riffle_shuffle(&mut rng, 7, 10).unwrap();

        assert_eq!(sorted_shorthands(&pile), before);
        assert_ne!(pile.cards(), original.as_slice());
    }

    #[test]
    fn test_riffle_rejects_large_piles() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pile = packs(2);
        assert_eq!(
            pile.riffle_shuffle(&mut rng, 1, 10),
            Err(GameError::TooManyCards { count: 108, max: 100 })
        );
        assert_eq!(pile.count(), 108);
    }

    #[test]
    fn test_riffle_small_piles() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut single = Pile::face_down(vec![Card::parse("AS").unwrap()]);
        single.riffle_shuffle(&mut rng, 3, 10).unwrap();
        assert_eq!(single.count(), 1);

        let mut pair = Pile::face_down(vec![Card::parse("AS").unwrap(), Card::parse("KH").unwrap()]);
        pair.riffle_shuffle(&mut rng, 3, 10).unwrap();
        assert_eq!(pair.count(), 2);
    }

    #[test]
    fn test_riffle_is_deterministic_for_a_seed() {
        let mut a = packs(1);
        let mut b = packs(1);
        a.riffle_shuffle(&mut StdRng::seed_from_u64(99), 5, 8).unwrap();
        b.riffle_shuffle(&mut StdRng::seed_from_u64(99), 5, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_riffle_drops_from_top_half_first() {
        let mut pile = Pile::face_down(
            ["AS", "2S", "3S", "4S", "5S", "6S"]
                .iter()
                .map(|s| Card::parse(s).unwrap())
                .collect(),
        );
        pile.riffle_shuffle(&mut StdRng::seed_from_u64(0), 1, 1).unwrap();

        let order: Vec<String> = pile.cards().iter().map(Card::shorthand).collect();
        assert_eq!(order, vec!["4S", "AS", "5S", "2S", "6S", "3S"]);
    }

    /// Multi-quick shuffle that visits every seat on every tick
    fn tick_by_tick_shuffle(pile: &mut Pile, rng: &mut StdRng, params: &MultiShuffle) -> Result<()> {
        let participants = params.resolve_participants()?;
        let budget = params.seconds;
        let mut pool = pile.split(participants.len(), false, false)?;
        let mut holdings: Vec<Option<Pile>> = vec![None; participants.len()];
        let mut done_at = vec![f64::INFINITY; participants.len()];

        for tick in 0..budget {
            let remaining = f64::from(budget - tick);
            for (idx, shuffler) in participants.iter().enumerate() {
                if holdings[idx].is_some() && remaining > done_at[idx] {
                    continue;
                }

                let released = match holdings[idx].take() {
                    Some(held) if held.count() < RELEASE_ALL_BELOW => Some(held),
                    Some(mut held) => {
                        let mut rest = held.split(2, false, true)?;
                        holdings[idx] = Some(held);
                        rest.pop()
                    }
                    None => None,
                };

                if !pool.is_empty() {
                    let pick = rng.gen_range(0..pool.len());
                    let cap = if holdings[idx].is_some() {
                        TOP_UP_TAKE_CAP
                    } else {
                        FRESH_TAKE_CAP
                    };
                    let mut taken = if pool[pick].count() < cap {
                        pool.remove(pick)
                    } else {
                        pool[pick].split(2, false, true)?.pop().unwrap_or_default()
                    };

                    let holding = holdings[idx].get_or_insert_with(Pile::default);
                    holding.add_group(&mut taken);
                    holding.riffle_shuffle(rng, params.iterations, shuffler.precision)?;

                    let busy = ((5 + 10 * params.iterations) as f64 / shuffler.speed)
                        .trunc()
                        .max(1.0);
                    done_at[idx] = remaining - busy - gaussian(rng, 0.0, JITTER_STDDEV);
                }

                if let Some(held) = released {
                    pool.push(held);
                }
            }
        }

        for held in holdings.into_iter().flatten() {
            pool.push(held);
        }
        for mut sub in pool {
            pile.add_group(&mut sub);
        }
        Ok(())
    }

    #[test]
    fn test_multi_quick_matches_tick_by_tick_scan() {
        let seats = vec![
            Shuffler { precision: 5, speed: 1.2 },
            Shuffler { precision: 10, speed: 1.0 },
            Shuffler { precision: 7, speed: 1.0 },
            Shuffler { precision: 15, speed: 0.9 },
        ];
        let settings = [
            MultiShuffle::with_participants(seats),
            MultiShuffle::default(),
            MultiShuffle {
                iterations: 2,
                num_participants: Some(3),
                seconds: 200,
                ..MultiShuffle::default()
            },
        ];

        for params in &settings {
            for seed in 0..10 {
                let mut queued = packs(5);
                let mut scanned = packs(5);
                queued
                    .multi_quick_shuffle(&mut StdRng::seed_from_u64(seed), params)
                    .unwrap();
                tick_by_tick_shuffle(&mut scanned, &mut StdRng::seed_from_u64(seed), params).unwrap();
                assert_eq!(queued, scanned, "seed {seed}");
            }
        }
    }

    #[test]
    fn test_multi_quick_is_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pile = packs(5);
        let before = sorted_shorthands(&pile);

        let params = MultiShuffle::with_participants(vec![
            Shuffler { precision: 5, speed: 1.2 },
            Shuffler { precision: 10, speed: 1.0 },
            Shuffler { precision: 7, speed: 1.0 },
            Shuffler { precision: 15, speed: 0.9 },
        ]);
        pile.multi_quick_shuffle(&mut rng, &params).unwrap();

        assert_eq!(pile.count(), 270);
        assert_eq!(sorted_shorthands(&pile), before);
    }

    #[test]
    fn test_multi_quick_raises_entropy() {
        let classifier = Classifier::with_method(MeldMethod::RankColor);
        let mut rng = StdRng::seed_from_u64(3);
        let mut pile = packs(5);
        pile.sort(&classifier);
        let sorted_entropy = pile.calc_entropy(&classifier);

        pile.multi_quick_shuffle(&mut rng, &MultiShuffle::default()).unwrap();
        assert!(pile.calc_entropy(&classifier) > sorted_entropy);
    }

    #[test]
    fn test_multi_quick_argument_errors() {
        let mut rng = StdRng::seed_from_u64(0);

        let mut small = packs(1);
        small.draw(10).unwrap();
        assert_eq!(
            small.multi_quick_shuffle(&mut rng, &MultiShuffle::default()),
            Err(GameError::Underflow { requested: 52, available: 44 })
        );

        let mut pile = packs(2);
        let both = MultiShuffle {
            participants: Some(vec![Shuffler::default()]),
            num_participants: Some(2),
            ..MultiShuffle::default()
        };
        assert!(matches!(
            pile.multi_quick_shuffle(&mut rng, &both),
            Err(GameError::InvalidArguments(_))
        ));
        assert_eq!(pile.count(), 108);
    }

    #[test]
    fn test_perfect_shuffle_keeps_cards() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pile = packs(3);
        let before = sorted_shorthands(&pile);
        pile.shuffle(&mut rng, ShuffleMethod::Perfect, 1, 1).unwrap();
        assert_eq!(sorted_shorthands(&pile), before);
    }

    #[test]
    fn test_gaussian_is_centered() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = 5000;
        let mean: f64 = (0..n).map(|_| gaussian(&mut rng, 0.0, 3.0)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.3, "mean was {mean}");
    }
}
