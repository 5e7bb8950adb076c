use glam::IVec3;

use super::*;
use crate::error::Error;
use crate::geometry::{BoundingBox, Extent};

fn bbox(x: i32, y: i32, z: i32, sx: i32, sy: i32, sz: i32) -> BoundingBox {
    BoundingBox::new(IVec3::new(x, y, z), Extent::new(sx, sy, sz))
}

#[test]
fn test_outline_of_square() {
    let mask = ObjectMask::new_filled(bbox(2, 2, 0, 5, 5, 1), true);
    let out = outline(&mask, &OutlineConfig::default()).unwrap();
    assert_eq!(out.bbox(), mask.bbox());
    assert_eq!(out.num_on_voxels(), 16);
    assert!(!out.is_on(IVec3::new(2, 2, 0)));
    assert_eq!(count_border_voxels(&mask, &OutlineConfig::default()).unwrap(), 16);
}

#[test]
fn test_outline_big_neighborhood_sees_diagonal_holes() {
    let mut mask = ObjectMask::new_filled(bbox(0, 0, 0, 5, 5, 1), true);
    mask.set_off(IVec3::new(2, 2, 0));
    let four = count_border_voxels(&mask, &OutlineConfig::default()).unwrap();
    let eight = count_border_voxels(
        &mask,
        &OutlineConfig {
            big_neighborhood: true,
            ..OutlineConfig::default()
        },
    )
    .unwrap();
    assert_eq!(four, 16 + 4);
    assert_eq!(eight, 16 + 8);
}

#[test]
fn test_outline_excludes_image_border_when_outside_on() {
    let mask = ObjectMask::new_filled(bbox(0, 0, 0, 3, 3, 1), true);
    let config = OutlineConfig {
        containing_extent: Some(Extent::new(10, 10, 1)),
        ..OutlineConfig::default()
    };
    // Only the right column and bottom row face the image interior.
    assert_eq!(count_border_voxels(&mask, &config).unwrap(), 5);

    let config = OutlineConfig {
        outside_treated_as_on: false,
        ..config
    };
    assert_eq!(count_border_voxels(&mask, &config).unwrap(), 8);
}

#[test]
fn test_outline_border_flag_without_extent_fails() {
    let mask = ObjectMask::new_filled(bbox(0, 0, 0, 3, 3, 1), true);
    let config = OutlineConfig {
        outside_treated_as_on: false,
        ..OutlineConfig::default()
    };
    assert!(matches!(
        outline(&mask, &config),
        Err(Error::MissingContainingExtent { .. })
    ));
}

#[test]
fn test_outline_3d_and_mip() {
    let cube = ObjectMask::new_filled(bbox(0, 0, 0, 3, 3, 3), true);
    let config = OutlineConfig {
        use_3d: true,
        ..OutlineConfig::default()
    };
    // Everything except the single interior voxel.
    assert_eq!(count_border_voxels(&cube, &config).unwrap(), 26);

    // 2D outline per plane: each 3x3 plane has 8 border voxels.
    assert_eq!(count_border_voxels(&cube, &OutlineConfig::default()).unwrap(), 24);

    let mip = OutlineConfig {
        mip: true,
        use_3d: true,
        ..OutlineConfig::default()
    };
    let out = outline(&cube, &mip).unwrap();
    assert_eq!(out.extent(), Extent::new(3, 3, 1));
    assert_eq!(out.num_on_voxels(), 8);
}

#[test]
fn test_surface_faces() {
    let voxel = ObjectMask::new_filled(bbox(4, 4, 4, 1, 1, 1), true);
    assert_eq!(count_surface_faces(&voxel, &SurfaceConfig::default()), 6);
    let flat = SurfaceConfig {
        suppress_3d: true,
        ..SurfaceConfig::default()
    };
    assert_eq!(count_surface_faces(&voxel, &flat), 4);

    let block = ObjectMask::new_filled(bbox(0, 0, 0, 2, 3, 4), true);
    // 2 * (2*3 + 2*4 + 3*4)
    assert_eq!(count_surface_faces(&block, &SurfaceConfig::default()), 52);

    let mip = SurfaceConfig {
        mip: true,
        suppress_3d: false,
    };
    // Perimeter of the 2x3 projection.
    assert_eq!(count_surface_faces(&block, &mip), 10);
}

#[test]
fn test_surface_counts_internal_holes() {
    let mut mask = ObjectMask::new_filled(bbox(0, 0, 0, 3, 3, 3), true);
    mask.set_off(IVec3::ONE);
    // 54 outer faces plus 6 facing the hole.
    assert_eq!(count_surface_faces(&mask, &SurfaceConfig::default()), 60);
}
