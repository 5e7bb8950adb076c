//! Connected component labeling using union-find over voxel runs.
//!
//! Each row (fixed y and z) is run-length encoded. A run is merged with the
//! runs it touches in rows that were already scanned: the previous row in the
//! same plane, and for 3D connectivity the neighboring rows of the previous
//! plane. Provisional labels are resolved with a union-find and every
//! component is written out as an [`ObjectMask`] with a tight bounding box in
//! global coordinates.

mod split;


pub use split::split_by_objects;

use glam::IVec3;

use crate::config::LabelConfig;
use crate::geometry::{BoundingBox, PointBounds};
use crate::mask::{ObjectCollection, ObjectMask};
use crate::neighborhood::Connectivity;

// ============================================================================
// Run-Length Encoding
// ============================================================================

/// A horizontal run of on voxels within one row.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: u32, // inclusive
    end: u32,   // exclusive
    label: u32,
}

impl Run {
    /// Range of x in a neighboring row whose runs may touch this one.
    #[inline]
    fn search_window(&self, diagonal: bool) -> (u32, u32) {
        if diagonal {
            (self.start.saturating_sub(1), self.end + 1)
        } else {
            (self.start, self.end)
        }
    }
}

#[inline]
fn runs_connected(prev: &Run, curr: &Run, diagonal: bool) -> bool {
    if diagonal {
        prev.start < curr.end + 1 && prev.end + 1 > curr.start
    } else {
        prev.start < curr.end && prev.end > curr.start
    }
}

fn extract_runs(width: usize, is_on: impl Fn(usize) -> bool, runs: &mut Vec<Run>) {
    let mut x = 0;
    while x < width {
        if !is_on(x) {
            x += 1;
            continue;
        }
        let start = x;
        while x < width && is_on(x) {
            x += 1;
        }
        runs.push(Run {
            start: start as u32,
            end: x as u32,
            label: 0,
        });
    }
}

/// Union `run` with every touching run of an already-labeled row.
#[inline]
fn connect_to_row(
    run: &Run,
    prev_runs: &[Run],
    diagonal: bool,
    assigned: &mut Option<u32>,
    uf: &mut UnionFind,
) {
    let (search_start, search_end) = run.search_window(diagonal);
    let first = prev_runs.partition_point(|r| r.end <= search_start);
    for prev in prev_runs[first..]
        .iter()
        .take_while(|r| r.start < search_end)
    {
        if !runs_connected(prev, run, diagonal) {
            continue;
        }
        match *assigned {
            Some(label) if label != prev.label => uf.union(label, prev.label),
            None => *assigned = Some(prev.label),
            _ => {}
        }
    }
}

// ============================================================================
// Union-Find
// ============================================================================

/// Labels start at 1; `parent[label - 1]` holds the parent label.
#[derive(Debug, Default)]
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    #[inline]
    fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32 + 1;
        self.parent.push(label);
        label
    }

    /// Find root with two-pass path compression.
    #[inline]
    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[(root - 1) as usize] != root {
            root = self.parent[(root - 1) as usize];
        }
        let mut current = label;
        while current != root {
            let next = self.parent[(current - 1) as usize];
            self.parent[(current - 1) as usize] = root;
            current = next;
        }
        root
    }

    #[inline]
    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            let (smaller, larger) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[(larger - 1) as usize] = smaller;
        }
    }

    /// Map every provisional label to a sequential component index, in order
    /// of first appearance. Index 0 of the result is unused.
    fn flatten(&mut self) -> (Vec<usize>, usize) {
        let len = self.parent.len();
        let mut component = vec![usize::MAX; len + 1];
        let mut count = 0;
        for label in 1..=len as u32 {
            let root = self.find(label) as usize;
            if component[root] == usize::MAX {
                component[root] = count;
                count += 1;
            }
            component[label as usize] = component[root];
        }
        (component, count)
    }
}

// ============================================================================
// Labeling
// ============================================================================

/// Label the voxels of `region` for which `is_on` (given local coordinates) holds.
///
/// Components with fewer than `min_voxel_count` voxels are dropped. With a 2D
/// connectivity no run is merged across planes, so each plane is labeled on
/// its own. Returned masks are in global coordinates (`region`'s frame),
/// ordered by first voxel in plane-major scan order.
pub fn label_where(
    region: &BoundingBox,
    connectivity: Connectivity,
    min_voxel_count: usize,
    is_on: impl Fn(IVec3) -> bool,
) -> ObjectCollection {
    let extent = region.extent();
    if extent.is_empty() {
        return ObjectCollection::new();
    }
    let width = extent.x() as usize;
    let height = extent.y() as usize;
    let depth = extent.z() as usize;
    let row = |y: usize, z: usize| z * height + y;
    let in_plane_diagonal = connectivity.is_big();

    let mut uf = UnionFind::default();
    let mut rows: Vec<Vec<Run>> = Vec::with_capacity(height * depth);

    for z in 0..depth {
        for y in 0..height {
            let mut runs = Vec::new();
            extract_runs(
                width,
                |x| is_on(IVec3::new(x as i32, y as i32, z as i32)),
                &mut runs,
            );
            for run in &mut runs {
                let mut assigned = None;
                if y > 0 {
                    connect_to_row(run, &rows[row(y - 1, z)], in_plane_diagonal, &mut assigned, &mut uf);
                }
                if z > 0 {
                    match connectivity {
                        Connectivity::Six => {
                            connect_to_row(run, &rows[row(y, z - 1)], false, &mut assigned, &mut uf);
                        }
                        Connectivity::TwentySix => {
                            for py in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                                connect_to_row(run, &rows[row(py, z - 1)], true, &mut assigned, &mut uf);
                            }
                        }
                        Connectivity::Four | Connectivity::Eight => {}
                    }
                }
                run.label = assigned.unwrap_or_else(|| uf.make_set());
            }
            rows.push(runs);
        }
    }

    let (component, count) = uf.flatten();
    let mut bounds = vec![PointBounds::empty(); count];
    let mut sizes = vec![0usize; count];
    for (idx, runs) in rows.iter().enumerate() {
        let (y, z) = ((idx % height) as i32, (idx / height) as i32);
        for run in runs {
            let c = component[run.label as usize];
            bounds[c].include(IVec3::new(run.start as i32, y, z));
            bounds[c].include(IVec3::new(run.end as i32 - 1, y, z));
            sizes[c] += (run.end - run.start) as usize;
        }
    }

    let corner = region.corner_min();
    let mut masks: Vec<Option<ObjectMask>> = bounds
        .iter()
        .zip(&sizes)
        .map(|(b, &size)| {
            if size < min_voxel_count {
                return None;
            }
            b.to_bbox().map(|local| ObjectMask::new(local.shift_by(corner)))
        })
        .collect();

    for (idx, runs) in rows.iter().enumerate() {
        let (y, z) = ((idx % height) as i32, (idx / height) as i32);
        for run in runs {
            let Some(mask) = masks[component[run.label as usize]].as_mut() else {
                continue;
            };
            let origin = mask.bbox().corner_min() - corner;
            for x in run.start..run.end {
                mask.set_on(IVec3::new(x as i32, y, z) - origin);
            }
        }
    }

    let out: ObjectCollection = masks.into_iter().flatten().collect();
    tracing::debug!(
        %connectivity,
        components = count,
        kept = out.len(),
        min_voxel_count,
        "labeled connected components"
    );
    out
}

/// Connected components of a mask's on voxels.
pub fn label(mask: &ObjectMask, config: &LabelConfig) -> ObjectCollection {
    label_where(
        mask.bbox(),
        config.connectivity(),
        config.min_voxel_count,
        |p| mask.is_on(p),
    )
}

/// Components of each z-plane independently.
pub fn label_by_slices(
    mask: &ObjectMask,
    big_neighborhood: bool,
    min_voxel_count: usize,
) -> ObjectCollection {
    label(
        mask,
        &LabelConfig {
            use_3d: false,
            big_neighborhood,
            min_voxel_count,
        },
    )
}

/// True if the on voxels form at most one component. An empty mask counts as connected.
pub fn is_connected(mask: &ObjectMask, connectivity: Connectivity) -> bool {
    label_where(mask.bbox(), connectivity, 1, |p| mask.is_on(p)).len() <= 1
}
