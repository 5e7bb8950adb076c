//! Concurrency-limited parallel mapping.
//!
//! Wraps rayon's `par_iter` so that at most `max_concurrent` items are in
//! flight at once. Used to evaluate many independent objects without letting
//! every worker allocate its scratch volumes simultaneously.

use rayon::prelude::*;

/// Maps `f(index, item)` over `items` in parallel, at most `max_concurrent`
/// items in flight, preserving input order.
///
/// # Panics
///
/// Panics if `max_concurrent` is 0.
pub fn par_map_limited<T, R, F>(items: &[T], max_concurrent: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync,
{
    assert!(max_concurrent > 0, "max_concurrent must be > 0");

    let mut results = Vec::with_capacity(items.len());
    for (chunk_idx, chunk) in items.chunks(max_concurrent).enumerate() {
        let base = chunk_idx * max_concurrent;
        let chunk_results: Vec<R> = chunk
            .par_iter()
            .enumerate()
            .map(|(i, item)| f(base + i, item))
            .collect();
        results.extend(chunk_results);
    }
    results
}

/// Like [`par_map_limited`], but the closure is fallible.
///
/// Chunks are processed in order; the first chunk containing a failure stops
/// the run and the error of the lowest failing index in that chunk is returned.
/// Items of later chunks are never started.
pub fn try_par_map_limited<T, R, E, F>(
    items: &[T],
    max_concurrent: usize,
    f: F,
) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(usize, &T) -> Result<R, E> + Sync,
{
    assert!(max_concurrent > 0, "max_concurrent must be > 0");

    let mut results = Vec::with_capacity(items.len());
    for (chunk_idx, chunk) in items.chunks(max_concurrent).enumerate() {
        let base = chunk_idx * max_concurrent;
        let chunk_results: Vec<Result<R, E>> = chunk
            .par_iter()
            .enumerate()
            .map(|(i, item)| f(base + i, item))
            .collect();
        for result in chunk_results {
            results.push(result?);
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_par_map_limited_passes_global_index() {
        let items = vec!['a', 'b', 'c', 'd', 'e'];
        let result = par_map_limited(&items, 2, |i, &c| format!("{i}{c}"));
        assert_eq!(result, vec!["0a", "1b", "2c", "3d", "4e"]);
    }

    #[test]
    fn test_par_map_limited_preserves_order() {
        let items: Vec<i32> = (0..100).collect();
        let result = par_map_limited(&items, 7, |_, &x| x * 2);
        let expected: Vec<i32> = (0..100).map(|x| x * 2).collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_par_map_limited_empty() {
        let items: Vec<i32> = vec![];
        assert!(par_map_limited(&items, 3, |_, &x| x).is_empty());
    }

    #[test]
    #[should_panic(expected = "max_concurrent must be > 0")]
    fn test_par_map_limited_zero_panics() {
        par_map_limited(&[1, 2, 3], 0, |_, &x| x);
    }

    #[test]
    fn test_concurrency_cap() {
        let items: Vec<i32> = (0..20).collect();
        let in_flight = AtomicUsize::new(0);
        let max_observed = AtomicUsize::new(0);

        par_map_limited(&items, 3, |_, &x| {
            let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_observed.fetch_max(current, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(2));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            x
        });

        let max = max_observed.load(Ordering::SeqCst);
        assert!(max <= 3, "max in-flight was {max}, expected <= 3");
    }

    #[test]
    fn test_try_par_map_limited_ok() {
        let items: Vec<i32> = (0..10).collect();
        let result: Result<Vec<i32>, String> = try_par_map_limited(&items, 4, |_, &x| Ok(x + 1));
        assert_eq!(result.unwrap(), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_try_par_map_limited_returns_lowest_failing_index() {
        let items: Vec<i32> = (0..10).collect();
        let result: Result<Vec<i32>, usize> = try_par_map_limited(&items, 10, |i, &x| {
            if x == 3 || x == 7 {
                Err(i)
            } else {
                Ok(x)
            }
        });
        assert_eq!(result.unwrap_err(), 3);
    }

    #[test]
    fn test_try_par_map_limited_skips_chunks_after_failure() {
        let items: Vec<i32> = (0..9).collect();
        let started = AtomicUsize::new(0);
        let result: Result<Vec<i32>, ()> = try_par_map_limited(&items, 3, |_, &x| {
            started.fetch_add(1, Ordering::SeqCst);
            if x == 1 {
                Err(())
            } else {
                Ok(x)
            }
        });
        assert!(result.is_err());
        assert_eq!(started.load(Ordering::SeqCst), 3);
    }
}
