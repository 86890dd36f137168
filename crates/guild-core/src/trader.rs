//! Strategy-driven trader agents. Each trader stores its strategic intent as
//! a disposition, mutated by its kind's update rule as deals are kept, and a
//! list of the deals it participated in this cycle.
//!
//! Only Quirk carries extra state (its probe window); every other kind's rule
//! is a pure function of the last result.

use contracts::{Disposition, Outcome, TraderKind, BPS_DENOMINATOR};
use rand::Rng;

use crate::deal::Deal;
use crate::SimRng;

/// How many outcomes Quirk observes before committing.
const QUIRK_PROBE_WINDOW: usize = 3;

/// Stable trader identity. Never reused within a guild's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TraderId(pub u64);

/// Per-kind mutable strategy state.
#[derive(Debug, Clone)]
enum StrategyState {
    Stateless,
    Quirk {
        observed: Vec<Outcome>,
        committed: bool,
    },
}

impl StrategyState {
    fn for_kind(kind: TraderKind) -> Self {
        match kind {
            TraderKind::Quirk => Self::Quirk {
                observed: Vec::with_capacity(QUIRK_PROBE_WINDOW),
                committed: false,
            },
            _ => Self::Stateless,
        }
    }
}

/// One strategy agent.
#[derive(Debug, Clone)]
pub struct Trader {
    id: TraderId,
    kind: TraderKind,
    next_disposition: Disposition,
    state: StrategyState,
    /// Indices into the guild's deal log for this cycle.
    deals: Vec<usize>,
}

impl Trader {
    pub(crate) fn new(id: TraderId, kind: TraderKind, rng: &mut SimRng) -> Self {
        Self {
            id,
            kind,
            next_disposition: initial_disposition(kind, rng),
            state: StrategyState::for_kind(kind),
            deals: Vec::new(),
        }
    }

    pub fn id(&self) -> TraderId {
        self.id
    }

    pub fn kind(&self) -> TraderKind {
        self.kind
    }

    /// The stored strategic intent, unaffected by mistakes.
    pub fn next_disposition(&self) -> Disposition {
        self.next_disposition
    }

    pub fn kept_deals(&self) -> &[usize] {
        &self.deals
    }

    /// The disposition actually played: with probability `mistake_bps /
    /// 10_000` the stored disposition is reversed. The stored intent itself
    /// never changes here.
    pub fn disposition_with_mistake(&self, mistake_bps: u32, rng: &mut SimRng) -> Disposition {
        if rng.gen_ratio(mistake_bps, BPS_DENOMINATOR) {
            self.next_disposition.reversed()
        } else {
            self.next_disposition
        }
    }

    /// Record a deal this trader participated in: resolve this side's result,
    /// run the kind's update rule for the *next* deal, and keep the index.
    /// Panics when the same deal is kept twice.
    pub fn keep(&mut self, deal_index: usize, deal: &Deal, rng: &mut SimRng) {
        assert!(
            !self.deals.contains(&deal_index),
            "trader {:?} already kept deal {deal_index}",
            self.id
        );
        let result = deal.result_for(self.id);
        self.update_behavior(result, rng);
        self.deals.push(deal_index);
    }

    fn update_behavior(&mut self, result: Outcome, rng: &mut SimRng) {
        match self.kind {
            TraderKind::Altruist | TraderKind::Threw => {}
            TraderKind::Fox => {
                // Tit-for-tat: mirror what the partner just played.
                self.next_disposition = match result {
                    Outcome::MutualCooperate | Outcome::ExploitSender => Disposition::Cooperate,
                    Outcome::MutualCheat | Outcome::ExploitedReceiver => Disposition::Cheat,
                };
            }
            TraderKind::Haphazard => {
                self.next_disposition = coin_flip(rng);
            }
            TraderKind::Revenge => {
                // Grim trigger: one exploitation poisons the rest of the cycle.
                if result == Outcome::ExploitedReceiver {
                    self.next_disposition = Disposition::Cheat;
                }
            }
            TraderKind::Quirk => {
                if let StrategyState::Quirk { observed, committed } = &mut self.state {
                    if *committed {
                        return;
                    }
                    observed.push(result);
                    if observed.len() == QUIRK_PROBE_WINDOW {
                        let saw_dirty = observed.iter().any(|outcome| {
                            matches!(
                                outcome,
                                Outcome::MutualCheat | Outcome::ExploitedReceiver
                            )
                        });
                        self.next_disposition = if saw_dirty {
                            Disposition::Cheat
                        } else {
                            Disposition::Cooperate
                        };
                        *committed = true;
                        observed.clear();
                    } else {
                        // Diagnostic probes: cheat once, then cooperate once.
                        self.next_disposition = if observed.len() == 1 {
                            Disposition::Cheat
                        } else {
                            Disposition::Cooperate
                        };
                    }
                }
            }
        }
    }

    /// Sum of this trader's payoffs over every deal kept this cycle.
    pub fn annual_income(&self, deals: &[Deal]) -> u64 {
        self.deals
            .iter()
            .map(|&index| deals[index].result_for(self.id).payoff())
            .sum()
    }

    /// Start a fresh cycle: restore the initial disposition (Haphazard
    /// re-rolls), forget this cycle's deals, and clear any strategy state.
    pub fn reset(&mut self, rng: &mut SimRng) {
        self.next_disposition = initial_disposition(self.kind, rng);
        self.state = StrategyState::for_kind(self.kind);
        self.deals.clear();
    }
}

fn initial_disposition(kind: TraderKind, rng: &mut SimRng) -> Disposition {
    match kind {
        TraderKind::Altruist | TraderKind::Fox | TraderKind::Revenge | TraderKind::Quirk => {
            Disposition::Cooperate
        }
        TraderKind::Threw => Disposition::Cheat,
        TraderKind::Haphazard => coin_flip(rng),
    }
}

fn coin_flip(rng: &mut SimRng) -> Disposition {
    if rng.gen_bool(0.5) {
        Disposition::Cooperate
    } else {
        Disposition::Cheat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const OTHER: TraderId = TraderId(999);

    fn test_rng() -> SimRng {
        SimRng::seed_from_u64(42)
    }

    fn trader(kind: TraderKind) -> Trader {
        Trader::new(TraderId(1), kind, &mut test_rng())
    }

    /// Feed the trader one deal in which it played `own` and the partner
    /// played `other`, using the next free deal index.
    fn play(trader: &mut Trader, own: Disposition, other: Disposition, rng: &mut SimRng) {
        let index = trader.kept_deals().len();
        let deal = Deal::new(trader.id(), own, OTHER, other);
        trader.keep(index, &deal, rng);
    }

    #[test]
    fn altruist_always_cooperates() {
        let mut rng = test_rng();
        let mut altruist = trader(TraderKind::Altruist);
        assert_eq!(altruist.next_disposition(), Disposition::Cooperate);
        play(
            &mut altruist,
            Disposition::Cooperate,
            Disposition::Cheat,
            &mut rng,
        );
        assert_eq!(altruist.next_disposition(), Disposition::Cooperate);
        altruist.reset(&mut rng);
        assert_eq!(altruist.next_disposition(), Disposition::Cooperate);
    }

    #[test]
    fn threw_always_cheats() {
        let mut rng = test_rng();
        let mut threw = trader(TraderKind::Threw);
        assert_eq!(threw.next_disposition(), Disposition::Cheat);
        play(
            &mut threw,
            Disposition::Cheat,
            Disposition::Cooperate,
            &mut rng,
        );
        assert_eq!(threw.next_disposition(), Disposition::Cheat);
        threw.reset(&mut rng);
        assert_eq!(threw.next_disposition(), Disposition::Cheat);
    }

    #[test]
    fn fox_mirrors_the_partner_deal_by_deal() {
        let mut rng = test_rng();
        let mut fox = trader(TraderKind::Fox);

        play(&mut fox, Disposition::Cooperate, Disposition::Cheat, &mut rng);
        assert_eq!(fox.next_disposition(), Disposition::Cheat);

        play(&mut fox, Disposition::Cheat, Disposition::Cooperate, &mut rng);
        assert_eq!(fox.next_disposition(), Disposition::Cooperate);

        play(&mut fox, Disposition::Cheat, Disposition::Cheat, &mut rng);
        assert_eq!(fox.next_disposition(), Disposition::Cheat);

        play(
            &mut fox,
            Disposition::Cooperate,
            Disposition::Cooperate,
            &mut rng,
        );
        assert_eq!(fox.next_disposition(), Disposition::Cooperate);
    }

    #[test]
    fn revenge_never_forgives_within_a_cycle() {
        let mut rng = test_rng();
        let mut revenge = trader(TraderKind::Revenge);

        play(
            &mut revenge,
            Disposition::Cooperate,
            Disposition::Cheat,
            &mut rng,
        );
        assert_eq!(revenge.next_disposition(), Disposition::Cheat);

        // Friendly results afterwards do not restore cooperation.
        play(
            &mut revenge,
            Disposition::Cheat,
            Disposition::Cheat,
            &mut rng,
        );
        assert_eq!(revenge.next_disposition(), Disposition::Cheat);
        play(
            &mut revenge,
            Disposition::Cheat,
            Disposition::Cooperate,
            &mut rng,
        );
        assert_eq!(revenge.next_disposition(), Disposition::Cheat);

        // But the grudge does not survive a reset.
        revenge.reset(&mut rng);
        assert_eq!(revenge.next_disposition(), Disposition::Cooperate);
    }

    #[test]
    fn quirk_probes_then_commits_to_cheat_after_a_dirty_window() {
        let mut rng = test_rng();
        let mut quirk = trader(TraderKind::Quirk);
        assert_eq!(quirk.next_disposition(), Disposition::Cooperate);

        // First probe: cheat, regardless of the result.
        play(
            &mut quirk,
            Disposition::Cooperate,
            Disposition::Cooperate,
            &mut rng,
        );
        assert_eq!(quirk.next_disposition(), Disposition::Cheat);

        // Second probe: cooperate.
        play(
            &mut quirk,
            Disposition::Cheat,
            Disposition::Cooperate,
            &mut rng,
        );
        assert_eq!(quirk.next_disposition(), Disposition::Cooperate);

        // Third observed outcome is dirty, so Quirk locks to cheat.
        play(
            &mut quirk,
            Disposition::Cooperate,
            Disposition::Cheat,
            &mut rng,
        );
        assert_eq!(quirk.next_disposition(), Disposition::Cheat);

        // Committed: further results are ignored.
        play(
            &mut quirk,
            Disposition::Cheat,
            Disposition::Cooperate,
            &mut rng,
        );
        assert_eq!(quirk.next_disposition(), Disposition::Cheat);
    }

    #[test]
    fn quirk_commits_to_cooperate_after_a_clean_window() {
        let mut rng = test_rng();
        let mut quirk = trader(TraderKind::Quirk);

        play(
            &mut quirk,
            Disposition::Cooperate,
            Disposition::Cooperate,
            &mut rng,
        );
        play(
            &mut quirk,
            Disposition::Cheat,
            Disposition::Cooperate,
            &mut rng,
        );
        play(
            &mut quirk,
            Disposition::Cooperate,
            Disposition::Cooperate,
            &mut rng,
        );
        assert_eq!(quirk.next_disposition(), Disposition::Cooperate);
    }

    #[test]
    fn quirk_commitment_is_cleared_by_reset() {
        let mut rng = test_rng();
        let mut quirk = trader(TraderKind::Quirk);
        for _ in 0..QUIRK_PROBE_WINDOW {
            play(
                &mut quirk,
                Disposition::Cooperate,
                Disposition::Cheat,
                &mut rng,
            );
        }
        assert_eq!(quirk.next_disposition(), Disposition::Cheat);

        quirk.reset(&mut rng);
        assert_eq!(quirk.next_disposition(), Disposition::Cooperate);

        // Probing starts over: the first kept deal forces a cheat probe again.
        play(
            &mut quirk,
            Disposition::Cooperate,
            Disposition::Cooperate,
            &mut rng,
        );
        assert_eq!(quirk.next_disposition(), Disposition::Cheat);
    }

    #[test]
    fn mistakes_flip_the_played_disposition_only() {
        let mut rng = test_rng();
        let altruist = trader(TraderKind::Altruist);

        // 0 bps: the stored intent is always played.
        for _ in 0..50 {
            assert_eq!(
                altruist.disposition_with_mistake(0, &mut rng),
                Disposition::Cooperate
            );
        }
        // 10_000 bps: always reversed, stored intent untouched.
        for _ in 0..50 {
            assert_eq!(
                altruist.disposition_with_mistake(BPS_DENOMINATOR, &mut rng),
                Disposition::Cheat
            );
        }
        assert_eq!(altruist.next_disposition(), Disposition::Cooperate);
    }

    #[test]
    fn income_sums_payoffs_over_kept_deals() {
        let mut rng = test_rng();
        let mut fox = trader(TraderKind::Fox);
        let deals = vec![
            Deal::new(fox.id(), Disposition::Cooperate, OTHER, Disposition::Cooperate),
            Deal::new(fox.id(), Disposition::Cooperate, OTHER, Disposition::Cheat),
            Deal::new(fox.id(), Disposition::Cheat, OTHER, Disposition::Cheat),
        ];
        for (index, deal) in deals.iter().enumerate() {
            fox.keep(index, deal, &mut rng);
        }
        // 4 + 1 + 2
        assert_eq!(fox.annual_income(&deals), 7);

        fox.reset(&mut rng);
        assert_eq!(fox.annual_income(&deals), 0);
    }

    #[test]
    #[should_panic(expected = "already kept deal")]
    fn keeping_the_same_deal_twice_panics() {
        let mut rng = test_rng();
        let mut altruist = trader(TraderKind::Altruist);
        let deal = Deal::new(
            altruist.id(),
            Disposition::Cooperate,
            OTHER,
            Disposition::Cooperate,
        );
        altruist.keep(0, &deal, &mut rng);
        altruist.keep(0, &deal, &mut rng);
    }
}
