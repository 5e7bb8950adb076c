use glam::IVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::config::ShellConfig;
use crate::error::Error;
use crate::geometry::BoundingBox;

fn bbox(x: i32, y: i32, z: i32, sx: i32, sy: i32, sz: i32) -> BoundingBox {
    BoundingBox::new(IVec3::new(x, y, z), Extent::new(sx, sy, sz))
}

fn filled(b: BoundingBox) -> ObjectMask {
    ObjectMask::new_filled(b, true)
}

fn single(p: IVec3) -> ObjectMask {
    filled(BoundingBox::new(p, Extent::new(1, 1, 1)))
}

fn random_mask(rng: &mut StdRng, b: BoundingBox, density: f64) -> ObjectMask {
    ObjectMask::from_fn(b, |_| rng.random_bool(density))
}

// ============================================================================
// Erosion border handling
// ============================================================================

#[test]
fn test_erode_square_outside_on_without_extent() {
    let mask = filled(bbox(0, 0, 0, 5, 5, 1));
    let out = erode(&mask, &ErodeConfig::new(1)).unwrap();
    assert_eq!(*out.bbox(), bbox(1, 1, 0, 3, 3, 1));
    assert_eq!(out.num_on_voxels(), 9);
}

#[test]
fn test_erode_square_outside_off_with_own_extent() {
    let mask = filled(bbox(0, 0, 0, 5, 5, 1));
    let config = ErodeConfig {
        outside_treated_as_on: false,
        containing_extent: Some(Extent::new(5, 5, 1)),
        ..ErodeConfig::new(1)
    };
    let out = erode(&mask, &config).unwrap();
    assert_eq!(out.num_on_voxels(), 9);
    assert_eq!(*out.bbox(), bbox(1, 1, 0, 3, 3, 1));

    let twice = erode(&mask, &ErodeConfig { iterations: 2, ..config.clone() }).unwrap();
    assert_eq!(twice.num_on_voxels(), 1);
    let thrice = erode(&mask, &ErodeConfig { iterations: 3, ..config }).unwrap();
    assert!(thrice.is_empty());
}

#[test]
fn test_erode_square_outside_on_with_own_extent_keeps_everything() {
    let mask = filled(bbox(0, 0, 0, 5, 5, 1));
    let config = ErodeConfig {
        containing_extent: Some(Extent::new(5, 5, 1)),
        ..ErodeConfig::new(1)
    };
    let out = erode(&mask, &config).unwrap();
    assert_eq!(out.num_on_voxels(), 25);
    assert_eq!(out.bbox(), mask.bbox());
}

#[test]
fn test_erode_square_to_empty() {
    let mask = filled(bbox(0, 0, 0, 5, 5, 1));
    let out = erode(&mask, &ErodeConfig::new(3)).unwrap();
    assert!(out.is_empty());
    assert_eq!(out.bbox().volume(), 0);
}

#[test]
fn test_erode_at_image_corner_keeps_border_faces() {
    let mask = filled(bbox(0, 0, 0, 3, 3, 1));
    let config = ErodeConfig {
        containing_extent: Some(Extent::new(10, 10, 1)),
        ..ErodeConfig::new(1)
    };
    let out = erode(&mask, &config).unwrap();
    assert_eq!(*out.bbox(), bbox(0, 0, 0, 2, 2, 1));
    assert_eq!(out.num_on_voxels(), 4);
}

#[test]
fn test_erode_outside_off_without_extent_is_config_error() {
    let mask = filled(bbox(0, 0, 0, 5, 5, 1));
    let config = ErodeConfig {
        outside_treated_as_on: false,
        ..ErodeConfig::new(1)
    };
    assert_eq!(
        erode(&mask, &config).unwrap_err(),
        Error::MissingContainingExtent { operation: "Erode" }
    );
}

#[test]
fn test_mask_outside_extent_is_config_error() {
    let mask = filled(bbox(8, 8, 0, 5, 5, 1));
    let config = DilateConfig {
        containing_extent: Some(Extent::new(10, 10, 1)),
        ..DilateConfig::new(1)
    };
    assert!(matches!(
        dilate(&mask, &config),
        Err(Error::MaskOutsideExtent { .. })
    ));
}

#[test]
fn test_erode_3d_only_shrinks_z_in_3d() {
    let mask = filled(bbox(0, 0, 0, 5, 5, 5));
    let flat = erode(&mask, &ErodeConfig::new(1)).unwrap();
    assert_eq!(*flat.bbox(), bbox(1, 1, 0, 3, 3, 5));
    assert_eq!(flat.num_on_voxels(), 45);

    let config = ErodeConfig {
        use_3d: true,
        ..ErodeConfig::new(1)
    };
    let solid = erode(&mask, &config).unwrap();
    assert_eq!(*solid.bbox(), bbox(1, 1, 1, 3, 3, 3));
    assert_eq!(solid.num_on_voxels(), 27);
}

// ============================================================================
// Dilation
// ============================================================================

#[test]
fn test_dilate_single_voxel() {
    let mask = single(IVec3::new(5, 5, 0));
    let four = dilate(&mask, &DilateConfig::new(1)).unwrap();
    assert_eq!(*four.bbox(), bbox(4, 4, 0, 3, 3, 1));
    assert_eq!(four.num_on_voxels(), 5);

    let config = DilateConfig {
        big_neighborhood: true,
        ..DilateConfig::new(1)
    };
    let eight = dilate(&mask, &config).unwrap();
    assert_eq!(eight.num_on_voxels(), 9);
}

#[test]
fn test_dilate_3d() {
    let mask = single(IVec3::new(5, 5, 5));
    let config = DilateConfig {
        use_3d: true,
        ..DilateConfig::new(1)
    };
    let out = dilate(&mask, &config).unwrap();
    assert_eq!(*out.bbox(), bbox(4, 4, 4, 3, 3, 3));
    assert_eq!(out.num_on_voxels(), 7);

    let config = DilateConfig {
        use_3d: true,
        big_neighborhood: true,
        ..DilateConfig::new(1)
    };
    assert_eq!(dilate(&mask, &config).unwrap().num_on_voxels(), 27);
}

#[test]
fn test_dilate_clipped_to_extent() {
    let mask = single(IVec3::ZERO);
    let config = DilateConfig {
        containing_extent: Some(Extent::new(10, 10, 1)),
        ..DilateConfig::new(2)
    };
    let out = dilate(&mask, &config).unwrap();
    assert_eq!(*out.bbox(), bbox(0, 0, 0, 3, 3, 1));
    // (0,0), (1,0), (2,0), (0,1), (0,2), (1,1)
    assert_eq!(out.num_on_voxels(), 6);
}

#[test]
fn test_dilate_unclipped_goes_negative() {
    let mask = single(IVec3::ZERO);
    let out = dilate(&mask, &DilateConfig::new(2)).unwrap();
    assert_eq!(*out.bbox(), bbox(-2, -2, 0, 5, 5, 1));
    assert_eq!(out.num_on_voxels(), 13);
}

#[test]
fn test_zero_iterations_is_identity_in_content() {
    let mask = filled(bbox(2, 2, 0, 3, 3, 1));
    let dilated = dilate(&mask, &DilateConfig::new(0)).unwrap();
    let eroded = erode(&mask, &ErodeConfig::new(0)).unwrap();
    assert_eq!(dilated, mask);
    assert_eq!(eroded, mask);
}

// ============================================================================
// Accept conditions
// ============================================================================

#[test]
fn test_not_empty_rejects_last_iteration() {
    let mask = single(IVec3::new(3, 3, 0));
    let config = ErodeConfig {
        accept: vec![AcceptCondition::NotEmpty],
        ..ErodeConfig::new(2)
    };
    let out = erode(&mask, &config).unwrap();
    assert_eq!(out, mask);
}

#[test]
fn test_not_empty_keeps_progress_before_rejection() {
    let mask = filled(bbox(0, 0, 0, 5, 5, 1));
    let config = ErodeConfig {
        accept: vec![AcceptCondition::NotEmpty],
        ..ErodeConfig::new(5)
    };
    let out = erode(&mask, &config).unwrap();
    assert_eq!(out.num_on_voxels(), 1);
    assert_eq!(*out.bbox(), bbox(2, 2, 0, 1, 1, 1));
}

/// A 5x5 square ring with one gap on the right side.
fn ring_with_gap() -> ObjectMask {
    ObjectMask::from_fn(bbox(10, 10, 0, 5, 5, 1), |p| {
        let edge = p.x == 0 || p.y == 0 || p.x == 4 || p.y == 4;
        edge && p != IVec3::new(4, 2, 0)
    })
}

#[test]
fn test_off_connected_to_border() {
    let open_ring = ring_with_gap();
    assert!(AcceptCondition::OffConnectedToBorder.accepts(&open_ring, Connectivity::Four));

    let mut closed = open_ring.duplicate();
    closed.set_on(IVec3::new(4, 2, 0));
    assert!(!AcceptCondition::OffConnectedToBorder.accepts(&closed, Connectivity::Four));
}

#[test]
fn test_dilation_rejected_when_it_closes_a_hole() {
    let mask = ring_with_gap();
    let config = DilateConfig {
        accept: vec![AcceptCondition::OffConnectedToBorder],
        ..DilateConfig::new(1)
    };
    let out = dilate(&mask, &config).unwrap();
    assert_eq!(out.num_on_voxels(), 15);
    assert!(!out.is_on_global(IVec3::new(14, 12, 0)));

    let unchecked = dilate(&mask, &DilateConfig::new(1)).unwrap();
    assert!(unchecked.is_on_global(IVec3::new(14, 12, 0)));
}

// ============================================================================
// Composite operations
// ============================================================================

#[test]
fn test_close_fills_single_hole() {
    let mut mask = filled(bbox(0, 0, 0, 5, 5, 1));
    mask.set_off(IVec3::new(2, 2, 0));
    let out = close(&mask, &CloseConfig::new(1)).unwrap();
    assert_eq!(out.bbox(), mask.bbox());
    assert_eq!(out.num_on_voxels(), 25);
}

#[test]
fn test_open_removes_isolated_voxel() {
    let mask = single(IVec3::new(4, 4, 0));
    let out = open(&mask, &CloseConfig::new(1)).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_dilate_then_erode_contains_original() {
    let mut rng = StdRng::seed_from_u64(7);
    for (k, use_3d, big) in [(1, false, false), (2, false, true), (1, true, false), (2, true, true)] {
        let mask = random_mask(&mut rng, bbox(3, 4, 1, 12, 10, 4), 0.3);
        let dilated = dilate(
            &mask,
            &DilateConfig {
                use_3d,
                big_neighborhood: big,
                ..DilateConfig::new(k)
            },
        )
        .unwrap();
        let closed = erode(
            &dilated,
            &ErodeConfig {
                use_3d,
                big_neighborhood: big,
                ..ErodeConfig::new(k)
            },
        )
        .unwrap();
        for p in mask.on_points() {
            assert!(closed.is_on_global(p), "lost {p} for k={k} 3d={use_3d} big={big}");
        }
    }
}

// ============================================================================
// Shell
// ============================================================================

#[test]
fn test_shell_outer_ring() {
    let mask = filled(bbox(5, 5, 0, 3, 3, 1));
    let ring = shell(&mask, &ShellConfig::new(1, 0)).unwrap();
    assert_eq!(ring.num_on_voxels(), 12);
    assert!(!ring.has_intersecting_voxels(&mask));
}

#[test]
fn test_shell_with_erosion_and_inverse() {
    let mask = filled(bbox(5, 5, 0, 3, 3, 1));
    let ring = shell(&mask, &ShellConfig::new(1, 1)).unwrap();
    assert_eq!(ring.num_on_voxels(), 20);
    assert!(!ring.is_on_global(IVec3::new(6, 6, 0)));

    let outer = shell(
        &mask,
        &ShellConfig {
            inverse: true,
            ..ShellConfig::new(1, 1)
        },
    )
    .unwrap();
    assert_eq!(outer.num_on_voxels(), 12);
}

#[test]
fn test_shell_inner_ring_only() {
    let mask = filled(bbox(0, 0, 0, 5, 5, 1));
    let ring = shell(&mask, &ShellConfig::new(0, 1)).unwrap();
    assert_eq!(ring.num_on_voxels(), 16);
    assert_eq!(ring.bbox(), mask.bbox());
}

#[test]
fn test_shell_without_iterations_fails() {
    let mask = filled(bbox(0, 0, 0, 5, 5, 1));
    assert_eq!(
        shell(&mask, &ShellConfig::new(0, 0)).unwrap_err(),
        Error::NoShellIterations
    );
}
