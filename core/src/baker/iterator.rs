//! Bake Iterators
//!
//! An iterator visits the indices `first, first + step, first + 2 step, ...`
//! of either the lumels or the faces of a mesh. Giving worker `k` of `n` the
//! iterator `(k, n)` partitions the work without overlap.

use crate::error::*;
use crate::lightmap::*;
use crate::mesh::*;

/// Drives a baker over part of a mesh.
pub trait BakeIterator: Send {
    /// Binds the iterator to a mesh and its target map and rewinds it.
    ///
    /// * `mesh`   - The mesh.
    /// * `target` - Map the baker writes into.
    fn begin(&mut self, mesh: &Mesh, target: &Lightmap);

    /// Processes the current index, then advances. Returns false once the
    /// index has passed the last item.
    ///
    /// * `mesh`   - The mesh passed to `begin`.
    /// * `target` - The target passed to `begin`.
    /// * `kernel` - Bakes one used lumel.
    fn next(&mut self, mesh: &Mesh, target: &Lightmap, kernel: &LumelKernel<'_>) -> Result<bool>;

    /// Returns the number of items bound by `begin`.
    fn item_count(&self) -> usize;

    /// Returns the first index visited.
    fn first(&self) -> usize;

    /// Returns the distance between visited indices.
    fn step(&self) -> usize;

    /// Returns the number of `next` calls needed to finish.
    fn step_count(&self) -> usize {
        step_count(self.first(), self.step(), self.item_count())
    }
}

/// Returns the number of `next` calls an iterator `(first, step)` makes over
/// `item_count` items. At least one call is always made.
///
/// * `first`      - First index.
/// * `step`       - Distance between indices.
/// * `item_count` - Number of items.
pub fn step_count(first: usize, step: usize, item_count: usize) -> usize {
    if first >= item_count {
        1
    } else {
        (item_count - first).div_ceil(step.max(1))
    }
}

/// Per-lumel callback driven by an iterator.
pub type LumelKernel<'a> = dyn Fn(&Lumel) -> Result<()> + 'a;

/// Bakes one lumel and replaces a NaN result with black.
fn bake_one(kernel: &LumelKernel<'_>, mesh: &Mesh, lumel: &Lumel) -> Result<()> {
    kernel(lumel)?;
    let c = lumel.color();
    if c.has_nans() {
        error!(
            "Not-a-number color {} for lumel ({}, {}) of '{}'. Setting to black.",
            c, lumel.x, lumel.y, mesh.name
        );
        lumel.set_color(crate::color::Rgb::BLACK);
    }
    Ok(())
}

/// Visits lumels of the target by raw linear index.
#[derive(Clone, Debug)]
pub struct LumelBakeIterator {
    first: usize,
    step: usize,
    index: usize,
    item_count: usize,
}

impl LumelBakeIterator {
    /// Create a new `LumelBakeIterator`.
    ///
    /// * `first` - First lumel index.
    /// * `step`  - Distance between lumel indices. Zero is treated as one.
    pub fn new(first: usize, step: usize) -> Self {
        Self {
            first,
            step: step.max(1),
            index: first,
            item_count: 0,
        }
    }
}

impl BakeIterator for LumelBakeIterator {
    fn begin(&mut self, _mesh: &Mesh, target: &Lightmap) {
        self.item_count = target.width() * target.height();
        self.index = self.first;
    }

    fn next(&mut self, mesh: &Mesh, target: &Lightmap, kernel: &LumelKernel<'_>) -> Result<bool> {
        if let Some(lumel) = target.lumels().get(self.index) {
            if lumel.used {
                bake_one(kernel, mesh, lumel)?;
            }
        }
        self.index += self.step;
        Ok(self.index < self.item_count)
    }

    fn item_count(&self) -> usize {
        self.item_count
    }

    fn first(&self) -> usize {
        self.first
    }

    fn step(&self) -> usize {
        self.step
    }
}

/// Visits faces, baking every used lumel a face owns.
#[derive(Clone, Debug)]
pub struct FaceBakeIterator {
    first: usize,
    step: usize,
    index: usize,
    item_count: usize,
}

impl FaceBakeIterator {
    /// Create a new `FaceBakeIterator`.
    ///
    /// * `first` - First face index.
    /// * `step`  - Distance between face indices. Zero is treated as one.
    pub fn new(first: usize, step: usize) -> Self {
        Self {
            first,
            step: step.max(1),
            index: first,
            item_count: 0,
        }
    }
}

impl BakeIterator for FaceBakeIterator {
    fn begin(&mut self, mesh: &Mesh, _target: &Lightmap) {
        self.item_count = mesh.face_count();
        self.index = self.first;
    }

    fn next(&mut self, mesh: &Mesh, target: &Lightmap, kernel: &LumelKernel<'_>) -> Result<bool> {
        if self.index < self.item_count {
            let face = mesh.face(self.index)?;
            let mut result = Ok(());
            face.rasterize(target.width(), target.height(), UvLayer::Lightmap, |x, y, _| {
                let lumel = target.lumel(x, y);
                if result.is_ok() && lumel.used && lumel.face == face.index() {
                    result = bake_one(kernel, mesh, lumel);
                }
            });
            result?;
        }
        self.index += self.step;
        Ok(self.index < self.item_count)
    }

    fn item_count(&self) -> usize {
        self.item_count
    }

    fn first(&self) -> usize {
        self.first
    }

    fn step(&self) -> usize {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baker::Baker;
    use crate::color::Rgb;
    use crate::geometry::*;
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Records every lumel it is asked to bake.
    #[derive(Default)]
    struct RecordingBaker(Mutex<Vec<(usize, usize)>>);

    impl Baker for RecordingBaker {
        fn bake_lumel(&self, _mesh: &Mesh, lumel: &Lumel) -> Result<()> {
            if let Ok(mut visited) = self.0.lock() {
                visited.push((lumel.x, lumel.y));
            }
            lumel.add_color(Rgb::WHITE);
            Ok(())
        }
    }

    fn grid_mesh(cells: usize) -> Mesh {
        let n = cells + 1;
        let mut vertices = vec![];
        for y in 0..n {
            for x in 0..n {
                let (u, v) = (x as f32 / cells as f32, y as f32 / cells as f32);
                vertices.push(Vertex::new(Vec3::new(u, v, 0.0), Vec3::Z, Rgb::WHITE, Uv::new(u, v), Uv::ZERO));
            }
        }
        let mut indices = vec![];
        for y in 0..cells as u32 {
            for x in 0..cells as u32 {
                let (i, n) = (y * n as u32 + x, n as u32);
                indices.extend_from_slice(&[i, i + 1, i + n + 1, i, i + n + 1, i + n]);
            }
        }
        let mut mesh = Mesh::new("grid");
        mesh.add_faces(&vertices, &indices, None).unwrap();
        mesh
    }

    fn run(iterator: &mut dyn BakeIterator, baker: &RecordingBaker, mesh: &Mesh, target: &Lightmap) -> usize {
        iterator.begin(mesh, target);
        let mut calls = 0;
        loop {
            calls += 1;
            if !iterator.next(mesh, target, &|lumel| baker.bake_lumel(mesh, lumel)).unwrap() {
                break;
            }
        }
        calls
    }

    #[test]
    fn step_count_matches_calls() {
        assert_eq!(step_count(0, 3, 10), 4);
        assert_eq!(step_count(2, 3, 10), 3);
        assert_eq!(step_count(12, 3, 10), 1);
        assert_eq!(step_count(0, 1, 0), 1);
    }

    #[test]
    fn lumel_iterator_skips_unused() {
        let mut mesh = Mesh::new("triangle");
        let v = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, Rgb::WHITE, Uv::new(x, y), Uv::ZERO);
        mesh.add_faces(&[v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)], &[0, 1, 2], None).unwrap();
        let target = Lightmap::from_mesh(&mesh, 4, 4);
        let baker = RecordingBaker::default();
        let mut it = LumelBakeIterator::new(0, 1);
        assert_eq!(run(&mut it, &baker, &mesh, &target), 16);
        assert_eq!(baker.0.lock().unwrap().len(), target.used_count());
    }

    proptest! {
        #[test]
        fn workers_partition_lumels(workers in 1usize..6, cells in 1usize..4, size in 1usize..12) {
            let mesh = grid_mesh(cells);
            let target = Lightmap::from_mesh(&mesh, size, size);
            let baker = RecordingBaker::default();
            for k in 0..workers {
                let mut it = LumelBakeIterator::new(k, workers);
                let calls = run(&mut it, &baker, &mesh, &target);
                prop_assert_eq!(calls, it.step_count());
            }
            let mut visited = baker.0.lock().unwrap().clone();
            let total = visited.len();
            visited.sort();
            visited.dedup();
            prop_assert_eq!(visited.len(), total);
            prop_assert_eq!(total, target.used_count());
        }

        #[test]
        fn workers_partition_faces(workers in 1usize..6, cells in 1usize..4, size in 1usize..12) {
            let mesh = grid_mesh(cells);
            let target = Lightmap::from_mesh(&mesh, size, size);
            let baker = RecordingBaker::default();
            for k in 0..workers {
                let mut it = FaceBakeIterator::new(k, workers);
                let calls = run(&mut it, &baker, &mesh, &target);
                prop_assert_eq!(calls, it.step_count());
            }
            let mut visited = baker.0.lock().unwrap().clone();
            let total = visited.len();
            visited.sort();
            visited.dedup();
            prop_assert_eq!(visited.len(), total);
            prop_assert_eq!(total, target.used_count());
            prop_assert!(target.lumels().iter().all(|l| !l.used || l.color() == Rgb::WHITE));
        }
    }
}
