//! Cross-boundary contracts for the tournament engine and its CLI: the
//! disposition/payoff model, strategy kind labels, run configuration, and
//! per-era reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of distinct strategy kinds; initial populations must divide evenly.
pub const STRATEGY_KIND_COUNT: usize = 6;

/// Basis-points denominator for the mistake probability.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// A trader's intent in a single deal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Cooperate,
    Cheat,
}

impl Disposition {
    /// The opposite disposition, used to model execution mistakes.
    pub fn reversed(self) -> Self {
        match self {
            Self::Cooperate => Self::Cheat,
            Self::Cheat => Self::Cooperate,
        }
    }
}

/// One participant's outcome of a completed deal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    MutualCooperate,
    MutualCheat,
    ExploitSender,
    ExploitedReceiver,
}

impl Outcome {
    /// Resolve one side's outcome from the pair of dispositions. Symmetric:
    /// `of(a, b)` is `ExploitSender` exactly when `of(b, a)` is
    /// `ExploitedReceiver`.
    pub fn of(own: Disposition, other: Disposition) -> Self {
        match (own, other) {
            (Disposition::Cooperate, Disposition::Cooperate) => Self::MutualCooperate,
            (Disposition::Cheat, Disposition::Cheat) => Self::MutualCheat,
            (Disposition::Cheat, Disposition::Cooperate) => Self::ExploitSender,
            (Disposition::Cooperate, Disposition::Cheat) => Self::ExploitedReceiver,
        }
    }

    /// Numeric payoff. Satisfies the Prisoner's Dilemma ordering
    /// ExploitSender > MutualCooperate > MutualCheat > ExploitedReceiver.
    pub fn payoff(self) -> u64 {
        match self {
            Self::MutualCooperate => 4,
            Self::MutualCheat => 2,
            Self::ExploitSender => 5,
            Self::ExploitedReceiver => 1,
        }
    }
}

/// The six strategy families. Declaration order is the canonical order used
/// for initial population composition and for dominant-kind tie-breaking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TraderKind {
    Altruist,
    Threw,
    Fox,
    Haphazard,
    Revenge,
    Quirk,
}

impl TraderKind {
    /// All kinds in canonical order.
    pub const ALL: [TraderKind; STRATEGY_KIND_COUNT] = [
        TraderKind::Altruist,
        TraderKind::Threw,
        TraderKind::Fox,
        TraderKind::Haphazard,
        TraderKind::Revenge,
        TraderKind::Quirk,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Altruist => "altruist",
            Self::Threw => "threw",
            Self::Fox => "fox",
            Self::Haphazard => "haphazard",
            Self::Revenge => "revenge",
            Self::Quirk => "quirk",
        }
    }
}

impl fmt::Display for TraderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configuration for a full simulation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimConfig {
    pub seed: u64,
    pub era_count: u32,
    pub cycles_per_era: u32,
    pub population_size: usize,
    pub deals_per_pair_min: u32,
    pub deals_per_pair_max: u32,
    /// Share of the population rotated out after each cycle, in percent.
    pub rotation_percent: u32,
    /// Probability of a disposition being executed reversed, in basis points.
    pub mistake_bps: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            era_count: 10,
            cycles_per_era: 100,
            population_size: 12,
            deals_per_pair_min: 5,
            deals_per_pair_max: 10,
            rotation_percent: 20,
            mistake_bps: 500,
        }
    }
}

impl SimConfig {
    /// Check the caller-controlled invariants. Violations are setup bugs, not
    /// recoverable runtime conditions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 || self.population_size % STRATEGY_KIND_COUNT != 0 {
            return Err(ConfigError::UnevenPopulation {
                size: self.population_size,
            });
        }
        if self.deals_per_pair_min > self.deals_per_pair_max {
            return Err(ConfigError::DealBoundsReversed {
                min: self.deals_per_pair_min,
                max: self.deals_per_pair_max,
            });
        }
        if self.mistake_bps > BPS_DENOMINATOR {
            return Err(ConfigError::MistakeOutOfRange {
                bps: self.mistake_bps,
            });
        }
        if self.rotation_percent > 100 {
            return Err(ConfigError::RotationOutOfRange {
                percent: self.rotation_percent,
            });
        }
        Ok(())
    }
}

/// Configuration-error class: violated invariants the caller controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnevenPopulation { size: usize },
    DealBoundsReversed { min: u32, max: u32 },
    MistakeOutOfRange { bps: u32 },
    RotationOutOfRange { percent: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnevenPopulation { size } => write!(
                f,
                "population size {size} is not a positive multiple of {STRATEGY_KIND_COUNT}"
            ),
            Self::DealBoundsReversed { min, max } => {
                write!(f, "deals-per-pair bounds reversed: min={min} max={max}")
            }
            Self::MistakeOutOfRange { bps } => {
                write!(f, "mistake probability {bps} bps exceeds {BPS_DENOMINATOR}")
            }
            Self::RotationOutOfRange { percent } => {
                write!(f, "rotation percentage {percent} exceeds 100")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// The dominant surviving strategy kind after one era.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EraReport {
    pub era: u32,
    pub dominant_kind: TraderKind,
    pub count: usize,
}

impl fmt::Display for EraReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "era={} dominant={} count={}",
            self.era, self.dominant_kind, self.count
        )
    }
}
