//! # Session Attribution
//!
//! Maps a transaction timestamp plus a till identifier to the session that
//! should own it.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  owning_session(sessions, till_id, timestamp)                           │
//! │                                                                         │
//! │  1. Keep sessions of this till with opened_at <= timestamp              │
//! │  2. Pick the one with the LATEST opened_at (ties broken by id)          │
//! │  3. If it is closed, require timestamp <= closed_at                     │
//! │  4. Otherwise (open session): always valid, no upper bound              │
//! │  5. Nothing qualifies → NoOwningSession                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sessions are not supposed to overlap; if historical data contains
//! overlaps anyway, the latest-opened rule always prefers the most
//! recently opened session rather than failing. The auditor reports the
//! overlap, this function does not.
//!
//! A transaction dated before every session's `opened_at` has no owner:
//! it is reported via `NoOwningSession`, never guessed.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::TillSession;

/// Finds the session that owns a transaction at `timestamp` on `till_id`.
///
/// Pure and deterministic: the same inputs always resolve to the same
/// session, so re-running attribution is idempotent.
///
/// ## Example
/// ```rust
/// use caja_core::attribution::owning_session;
/// use caja_core::types::TillSession;
/// use chrono::{TimeZone, Utc};
///
/// let session = TillSession {
///     id: "s1".to_string(),
///     till_id: "1".to_string(),
///     operator_id: "op1".to_string(),
///     opened_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap(),
///     closed_at: None,
///     opening_float_units: 100_000,
///     closing_amount_units: None,
/// };
///
/// let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
/// let owner = owning_session(std::slice::from_ref(&session), "1", noon).unwrap();
/// assert_eq!(owner.id, "s1");
/// ```
pub fn owning_session<'a>(
    sessions: &'a [TillSession],
    till_id: &str,
    timestamp: DateTime<Utc>,
) -> CoreResult<&'a TillSession> {
    let candidate = sessions
        .iter()
        .filter(|s| s.till_id == till_id && s.opened_at <= timestamp)
        // Latest opened_at wins; the id tiebreak keeps the choice stable
        // when two sessions share an opened_at second.
        .max_by(|a, b| (a.opened_at, &a.id).cmp(&(b.opened_at, &b.id)));

    match candidate {
        Some(session) if session.window_contains(timestamp) => Ok(session),
        _ => Err(CoreError::NoOwningSession {
            till_id: till_id.to_string(),
            timestamp,
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
