//! One generation's population and its per-cycle deal log. The guild
//! orchestrates the annual cycle: reset, ordered deal generation over all
//! pairs, then rotation of the lowest earners.

use std::collections::BTreeMap;

use contracts::{ConfigError, SimConfig, TraderKind};
use rand::Rng;

use crate::deal::Deal;
use crate::factory::TraderFactory;
use crate::trader::Trader;
use crate::SimRng;

#[derive(Debug)]
pub struct Guild {
    config: SimConfig,
    factory: TraderFactory,
    traders: Vec<Trader>,
    deals: Vec<Deal>,
}

impl Guild {
    /// Build a fresh, evenly composed population from the configuration.
    pub fn from_config(config: &SimConfig, rng: &mut SimRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut factory = TraderFactory::new();
        let traders = factory.create_initial_population(config.population_size, rng)?;
        Ok(Self {
            config: config.clone(),
            factory,
            traders,
            deals: Vec::new(),
        })
    }

    /// Build a guild around a caller-assembled population. The factory must
    /// be the one that created the traders, so identities keep increasing.
    pub fn with_traders(config: &SimConfig, factory: TraderFactory, traders: Vec<Trader>) -> Self {
        Self {
            config: config.clone(),
            factory,
            traders,
            deals: Vec::new(),
        }
    }

    pub fn traders(&self) -> &[Trader] {
        &self.traders
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// One full cycle: discard last cycle's deals, reset every trader,
    /// generate this cycle's deals, then rotate.
    pub fn run_annual_cycle(&mut self, rng: &mut SimRng) {
        self.deals.clear();
        for trader in &mut self.traders {
            trader.reset(rng);
        }
        self.make_new_deals(rng);
        self.rotate_traders(rng);
    }

    /// Every unordered pair (i, j), i before j in population order, plays a
    /// uniform-random number of deals back-to-back. Each deal freezes both
    /// mistake-prone dispositions at creation and immediately notifies both
    /// sides, so later deals see updated dispositions.
    fn make_new_deals(&mut self, rng: &mut SimRng) {
        if self.traders.len() < 2 {
            return;
        }
        let (min, max) = (
            self.config.deals_per_pair_min,
            self.config.deals_per_pair_max,
        );
        for i in 0..self.traders.len() - 1 {
            for j in i + 1..self.traders.len() {
                let deal_count = rng.gen_range(min..=max);
                for _ in 0..deal_count {
                    let (head, tail) = self.traders.split_at_mut(j);
                    let first = &mut head[i];
                    let second = &mut tail[0];
                    let deal = Deal::new(
                        first.id(),
                        first.disposition_with_mistake(self.config.mistake_bps, rng),
                        second.id(),
                        second.disposition_with_mistake(self.config.mistake_bps, rng),
                    );
                    let deal_index = self.deals.len();
                    first.keep(deal_index, &deal, rng);
                    second.keep(deal_index, &deal, rng);
                    self.deals.push(deal);
                }
            }
        }
    }

    /// Replace the lowest earners with clones of the highest earners. With
    /// R = floor(N × rotation_percent / 100) this performs R+1 replacements,
    /// one more than the strict percentage; the inclusive bound is load-bearing
    /// for the population dynamics and must not be "fixed" casually. A bottom
    /// target that was already displaced earlier in the pass is skipped.
    fn rotate_traders(&mut self, rng: &mut SimRng) {
        if self.traders.len() < 2 {
            return;
        }
        let mut ranked: Vec<_> = self
            .traders
            .iter()
            .map(|trader| (trader.id(), trader.kind(), trader.annual_income(&self.deals)))
            .collect();
        // Stable sort: equal incomes keep population order.
        ranked.sort_by(|a, b| b.2.cmp(&a.2));

        let replace_count =
            self.traders.len() * self.config.rotation_percent as usize / 100;
        for rank in 0..=replace_count {
            if rank >= ranked.len() - 1 - rank {
                // Top and bottom cursors met; nothing left to displace.
                break;
            }
            let (_, top_kind, _) = ranked[rank];
            let (bottom_id, _, _) = ranked[ranked.len() - 1 - rank];
            let Some(slot) = self.traders.iter().position(|t| t.id() == bottom_id) else {
                continue;
            };
            self.traders[slot] = self.factory.create(top_kind, rng);
        }
    }

    /// Count of surviving traders per strategy kind.
    pub fn kind_census(&self) -> BTreeMap<TraderKind, usize> {
        let mut census = BTreeMap::new();
        for trader in &self.traders {
            *census.entry(trader.kind()).or_insert(0) += 1;
        }
        census
    }

    /// The most frequent surviving kind with its count. Ties resolve to the
    /// first kind in canonical order reaching the maximum. `None` only for an
    /// empty population, which a validated configuration never produces.
    pub fn dominant_kind(&self) -> Option<(TraderKind, usize)> {
        let mut best: Option<(TraderKind, usize)> = None;
        for (kind, count) in self.kind_census() {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((kind, count));
            }
        }
        best
    }
}
