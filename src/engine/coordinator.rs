//! Filter execution
//!
//! Fans the active filters out over detached worker threads and collects
//! their candidate spans under a shared deadline. A filter that panics or
//! overruns the deadline contributes zero spans; the fault is logged and
//! the scan continues, so one bad pattern can never take down a `process()`
//! call. Late results from an overrun worker land in a channel nobody reads
//! and are dropped with it.

use crate::domain::Span;
use crate::engine::filters::FilterKind;
use crate::lexicon::Lexicon;
use crate::policy::Policy;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

enum Outcome {
    Ok(Vec<Span>),
    Panicked,
}

/// Run every filter over the input, returning the merged candidate pile.
pub fn run_filters(
    text: &Arc<str>,
    policy: &Arc<Policy>,
    lexicon: &Arc<Lexicon>,
    filters: &[FilterKind],
) -> Vec<Span> {
    if filters.is_empty() {
        return Vec::new();
    }

    let (tx, rx) = mpsc::channel::<(FilterKind, Outcome)>();

    for &filter in filters {
        let tx = tx.clone();
        let text = Arc::clone(text);
        let policy = Arc::clone(policy);
        let lexicon = Arc::clone(lexicon);

        std::thread::spawn(move || {
            let outcome = match catch_unwind(AssertUnwindSafe(|| {
                filter.scan(&text, &policy, &lexicon)
            })) {
                Ok(spans) => Outcome::Ok(spans),
                Err(_) => Outcome::Panicked,
            };
            // The receiver may have given up on us; that is fine.
            let _ = tx.send((filter, outcome));
        });
    }
    drop(tx);

    let deadline = Instant::now() + Duration::from_millis(policy.filter_timeout_ms);
    let mut candidates = Vec::new();
    let mut finished = 0usize;

    while finished < filters.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            warn!(
                outstanding = filters.len() - finished,
                timeout_ms = policy.filter_timeout_ms,
                "filter deadline reached, dropping outstanding results"
            );
            break;
        }

        match rx.recv_timeout(remaining) {
            Ok((_, Outcome::Ok(spans))) => {
                finished += 1;
                candidates.extend(spans);
            }
            Ok((filter, Outcome::Panicked)) => {
                finished += 1;
                warn!(filter = filter.name(), "filter panicked, contributing no spans");
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(
                    outstanding = filters.len() - finished,
                    timeout_ms = policy.filter_timeout_ms,
                    "filter deadline reached, dropping outstanding results"
                );
                break;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PhiCategory;
    use crate::engine::filters::ALL_FILTERS;

    fn harness() -> (Arc<str>, Arc<Policy>, Arc<Lexicon>) {
        (
            Arc::from("Patient John Smith SSN 123-45-6789"),
            Arc::new(Policy::default()),
            Arc::new(Lexicon::embedded()),
        )
    }

    #[test]
    fn test_all_filters_complete_and_report() {
        let (text, policy, lexicon) = harness();
        let candidates = run_filters(&text, &policy, &lexicon, &ALL_FILTERS);
        assert!(candidates.iter().any(|s| s.category == PhiCategory::Ssn));
        assert!(candidates.iter().any(|s| s.category == PhiCategory::Name));
    }

    #[test]
    fn test_empty_filter_list() {
        let (text, policy, lexicon) = harness();
        assert!(run_filters(&text, &policy, &lexicon, &[]).is_empty());
    }

    #[test]
    fn test_subset_runs_only_requested_filters() {
        let (text, policy, lexicon) = harness();
        let candidates = run_filters(&text, &policy, &lexicon, &[FilterKind::Ssn]);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|s| s.category == PhiCategory::Ssn));
    }
}
