//! Trader construction with strictly increasing identity allocation. The
//! factory is an explicit value passed where it is needed; there is no global
//! counter.

use contracts::{ConfigError, TraderKind, STRATEGY_KIND_COUNT};

use crate::trader::{Trader, TraderId};
use crate::SimRng;

#[derive(Debug, Default)]
pub struct TraderFactory {
    next_id: u64,
}

impl TraderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create one trader of the requested kind with the next unique identity.
    pub fn create(&mut self, kind: TraderKind, rng: &mut SimRng) -> Trader {
        let id = TraderId(self.next_id);
        self.next_id += 1;
        Trader::new(id, kind, rng)
    }

    /// Create `size` traders cycling through all kinds in canonical order, so
    /// every kind starts with equal representation. Fails unless `size` is a
    /// positive multiple of the kind count.
    pub fn create_initial_population(
        &mut self,
        size: usize,
        rng: &mut SimRng,
    ) -> Result<Vec<Trader>, ConfigError> {
        if size == 0 || size % STRATEGY_KIND_COUNT != 0 {
            return Err(ConfigError::UnevenPopulation { size });
        }
        Ok((0..size)
            .map(|index| self.create(TraderKind::ALL[index % STRATEGY_KIND_COUNT], rng))
            .collect())
    }

    /// Clone by strategy kind only: fresh identity, fresh cycle state.
    pub fn clone_of(&mut self, like: &Trader, rng: &mut SimRng) -> Trader {
        self.create(like.kind(), rng)
    }
}
