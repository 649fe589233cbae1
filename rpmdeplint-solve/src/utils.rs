//! Candidate ordering shared between the async `DependencyProvider` impl and
//! any synchronous code that needs the same "best candidate first" order
//! (e.g. picking the highest available version of a name).

use resolvo::{utils::Pool, SolvableId};

use crate::types::{MatchSpec, RelationName};

/// Orders candidates highest-version-first, preferring real packages over
/// virtual pointers when versions tie (a `Provides:` with the same EVR as
/// an actual package of that name should lose to the real thing).
pub fn sort_candidates(pool: &Pool<MatchSpec, RelationName>, solvables: &mut [SolvableId]) {
    solvables.sort_by(|&a, &b| {
        let record_a = &pool.resolve_solvable(a).record;
        let record_b = &pool.resolve_solvable(b).record;
        record_b
            .evr()
            .cmp(&record_a.evr())
            .then_with(|| record_a.is_virtual().cmp(&record_b.is_virtual()))
    });
}
