//! Retry-until-valid loop coupling a room generator to the validator.

use crate::generation::{rng_from_seed, GridGenerator, PlacementRequest, RoomGenerator, RoomSpec};
use crate::grid::Grid;
use crate::validation::{validate_room, RoomValidity};
use crate::{DelveError, DelveResult};
use log::debug;

/// Result of a retry run: the grid of the last attempt, how many attempts
/// were spent, the verdict, and the seed that produced the grid.
#[derive(Debug, Clone)]
pub struct RetryOutcome {
    pub grid: Grid,
    pub attempts: u32,
    pub validity: RoomValidity,
    /// Seed of the returned grid. Matches the spec seed only when attempt 0
    /// succeeded; retries draw fresh seeds.
    pub seed: u64,
}

/// Generates rooms until one validates, up to `max_attempts` tries.
///
/// Attempt 0 uses the spec's own seed, so a first-attempt success is fully
/// reproducible. Every later attempt draws a brand-new random seed while the
/// structural spec (id, entrance, exit direction) stays fixed; once a retry
/// happens the run is no longer reproducible from the spec seed alone. The
/// seed that actually produced the returned grid is reported in the outcome.
///
/// Fails with [`DelveError::RetryExhausted`] when no attempt validates.
pub fn generate_valid_room(
    spec: &RoomSpec,
    placement: &PlacementRequest,
    max_attempts: u32,
) -> DelveResult<RetryOutcome> {
    let outcome = generate_room_best_effort(spec, placement, max_attempts)?;
    if outcome.validity.is_valid() {
        Ok(outcome)
    } else {
        Err(DelveError::RetryExhausted {
            room_id: spec.room_id,
            attempts: outcome.attempts,
        })
    }
}

/// Like [`generate_valid_room`], but on budget exhaustion returns the last
/// generated grid with its (invalid) verdict instead of failing. The dungeon
/// orchestrator uses this to keep a best-effort room and move on.
pub(crate) fn generate_room_best_effort(
    spec: &RoomSpec,
    placement: &PlacementRequest,
    max_attempts: u32,
) -> DelveResult<RetryOutcome> {
    if max_attempts == 0 {
        return Err(DelveError::InvalidParameter(
            "max_attempts must be at least 1".to_string(),
        ));
    }

    let generator = RoomGenerator::new(spec.clone())?;
    let mut seed = spec.seed;
    let mut last: Option<RetryOutcome> = None;

    for attempt in 0..max_attempts {
        let mut rng = rng_from_seed(seed);
        let grid = generator.generate(placement, &mut rng)?;
        let validity = validate_room(&grid);
        let outcome = RetryOutcome {
            grid,
            attempts: attempt + 1,
            validity,
            seed,
        };

        if outcome.validity.is_valid() {
            debug!(
                "room {} validated on attempt {} (seed {})",
                spec.room_id, outcome.attempts, seed
            );
            return Ok(outcome);
        }

        last = Some(outcome);
        // Retries deliberately draw fresh seeds rather than deriving them
        // from the original; only attempt 0 is seed-reproducible.
        seed = rand::random();
    }

    // max_attempts >= 1, so at least one outcome was recorded.
    last.ok_or_else(|| DelveError::InvalidParameter("retry loop ran no attempts".to_string()))
}
