//! Sequential evolutionary tournament engine: strategy-driven traders play
//! pairwise deals, accumulate income over an annual cycle, and the lowest
//! earners are rotated out for clones of the highest earners.
//!
//! The engine loop is: reset → deal generation (all pairs, in population
//! order) → rotation. Several strategies react to the order in which deals
//! are kept, so deal generation is strictly sequential.

pub mod deal;
pub mod era;
pub mod factory;
pub mod guild;
pub mod trader;

use rand_chacha::ChaCha8Rng;

/// Deterministic RNG used throughout the engine. Each era owns an
/// independent instance so eras stay isolated.
pub type SimRng = ChaCha8Rng;
