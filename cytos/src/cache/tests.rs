use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use glam::IVec3;

use super::*;
use crate::config::{ErodeConfig, ShellConfig};
use crate::error::Error;
use crate::geometry::{BoundingBox, Extent};
use crate::mask::ObjectMask;
use crate::session::FeatureSession;

fn square(size: i32) -> ObjectMask {
    ObjectMask::new_filled(BoundingBox::new(IVec3::new(3, 3, 0), Extent::new(size, size, 1)), true)
}

#[test]
fn test_second_lookup_is_a_hit() {
    let cache = FeatureCalculationCache::new();
    let mask = square(5);
    let calls = AtomicUsize::new(0);
    let compute = || {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(CachedValue::Scalar(4.0))
    };
    let key = CacheKey::new(Operation::Flatten, &mask);
    assert_eq!(cache.get_or_compute(key.clone(), compute).unwrap().into_scalar(), Ok(4.0));
    assert_eq!(cache.get_or_compute(key, compute).unwrap().into_scalar(), Ok(4.0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.executions(), 1);
    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_keys_distinguish_parameters_and_content() {
    let cache = FeatureCalculationCache::new();
    let a = square(5);
    let mut b = square(5);
    b.set_off(IVec3::ZERO);

    let value = || Ok(CachedValue::Scalar(1.0));
    cache.get_or_compute(CacheKey::new(Operation::Erode(ErodeConfig::new(1)), &a), value).unwrap();
    cache.get_or_compute(CacheKey::new(Operation::Erode(ErodeConfig::new(2)), &a), value).unwrap();
    cache.get_or_compute(CacheKey::new(Operation::Erode(ErodeConfig::new(1)), &b), value).unwrap();
    cache.get_or_compute(CacheKey::new(Operation::Erode(ErodeConfig::new(1)), &a.duplicate()), value).unwrap();
    assert_eq!(cache.executions(), 3);
}

#[test]
fn test_failures_are_memoized() {
    let cache = FeatureCalculationCache::new();
    let key = CacheKey::new(Operation::Moments { suppress_z: false }, &square(2));
    let calls = AtomicUsize::new(0);
    let failing = || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Calculation("degenerate".into()))
    };
    assert!(cache.get_or_compute(key.clone(), failing).is_err());
    assert!(cache.get_or_compute(key, failing).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_racing_lookups_compute_once() {
    let cache = Arc::new(FeatureCalculationCache::new());
    let mask = square(4);
    let calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let key = CacheKey::new(Operation::Flatten, &mask);
            thread::spawn(move || {
                cache
                    .get_or_compute(key, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(20));
                        Ok(CachedValue::Scalar(7.0))
                    })
                    .unwrap()
                    .into_scalar()
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 7.0);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.executions(), 1);
}

#[test]
fn test_duplicate_starts_fresh() {
    let cache = FeatureCalculationCache::new();
    let key = CacheKey::new(Operation::Flatten, &square(3));
    cache.get_or_compute(key.clone(), || Ok(CachedValue::Scalar(1.0))).unwrap();

    let derived = cache.duplicate();
    assert!(derived.is_empty());
    derived.get_or_compute(key, || Ok(CachedValue::Scalar(2.0))).unwrap();
    assert_eq!(derived.executions(), 1);
    assert_eq!(cache.executions(), 1);
}

#[test]
fn test_wrong_value_kind_is_an_error() {
    assert!(CachedValue::Scalar(1.0).into_mask().is_err());
}

#[test]
fn test_session_shell_reuses_erosion() {
    let session = FeatureSession::new();
    let mask = square(7);
    let shell_config = ShellConfig::new(1, 1);

    let eroded = session.eroded(&mask, &shell_config.erode_config()).unwrap();
    let shell = session.shell(&mask, &shell_config).unwrap();
    // Erosion, shell and the shell's dilation; the erosion is reused.
    assert_eq!(session.cache().executions(), 3);

    // 9x9 minus its corners (4-connected dilation), minus the 5x5 erosion.
    assert_eq!(shell.num_on_voxels(), 77 - 25);
    assert_eq!(eroded.num_on_voxels(), 25);

    session.shell(&mask, &shell_config).unwrap();
    assert_eq!(session.cache().executions(), 3);
}

#[test]
fn test_clear_forces_recompute() {
    let cache = FeatureCalculationCache::new();
    let key = CacheKey::new(Operation::Flatten, &square(3));
    let value = || Ok(CachedValue::Scalar(2.0));
    cache.get_or_compute(key.clone(), value).unwrap();
    cache.clear();
    assert!(cache.is_empty());
    cache.get_or_compute(key, value).unwrap();
    assert_eq!(cache.executions(), 2);
    assert_eq!(cache.hits(), 0);
}

#[test]
fn test_colliding_fingerprints_keep_separate_entries() {
    let a = square(4);
    let mut b = square(4);
    b.set_off(IVec3::new(1, 1, 0));
    assert_eq!(a.bbox(), b.bbox());

    let forged = a.fingerprint();
    let key_a = CacheKey::from_identity(Operation::Flatten, MaskIdentity::with_fingerprint(Arc::new(a), forged));
    let key_b = CacheKey::from_identity(Operation::Flatten, MaskIdentity::with_fingerprint(Arc::new(b), forged));
    assert_ne!(key_a, key_b);

    let cache = FeatureCalculationCache::new();
    let a_count = cache.get_or_compute(key_a.clone(), || Ok(CachedValue::Scalar(16.0))).unwrap();
    let b_count = cache.get_or_compute(key_b, || Ok(CachedValue::Scalar(15.0))).unwrap();
    assert_eq!(a_count.into_scalar(), Ok(16.0));
    assert_eq!(b_count.into_scalar(), Ok(15.0));
    assert_eq!(cache.executions(), 2);
    assert_eq!(cache.len(), 2);

    cache.get_or_compute(key_a, || Ok(CachedValue::Scalar(0.0))).unwrap();
    assert_eq!(cache.hits(), 1);
}
