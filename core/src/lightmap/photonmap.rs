//! Photonmap

use super::Lightmap;
use crate::color::*;
use crate::common::*;
use crate::geometry::*;
use crate::mesh::*;
use std::ops::Deref;

/// A lightmap that receives photon energy during emission and is then
/// density estimated into irradiance by `gather`.
#[derive(Clone, Debug)]
pub struct Photonmap(Lightmap);

impl Photonmap {
    /// Create a new `Photonmap` where every lumel is unused.
    ///
    /// * `width`  - Width in lumels.
    /// * `height` - Height in lumels.
    pub fn new(width: usize, height: usize) -> Self {
        Self(Lightmap::new(width, height))
    }

    /// Create a new `Photonmap` and rasterize a mesh into it.
    ///
    /// * `mesh`   - The mesh.
    /// * `width`  - Width in lumels.
    /// * `height` - Height in lumels.
    pub fn from_mesh(mesh: &Mesh, width: usize, height: usize) -> Self {
        Self(Lightmap::from_mesh(mesh, width, height))
    }

    /// Stores a photon at a lightmap UV. Photons landing on unused lumels are
    /// dropped. Returns true if the photon was stored.
    ///
    /// * `uv`     - Lightmap UV of the hit.
    /// * `energy` - Photon energy.
    pub fn store(&self, uv: Uv, energy: Rgb) -> bool {
        match self.0.lumel_at_uv(uv) {
            Some(lumel) if lumel.used => {
                lumel.add_photon(energy);
                true
            }
            _ => false,
        }
    }

    /// Returns the total number of stored photons.
    pub fn photon_count(&self) -> u64 {
        self.0.lumels().iter().map(|l| l.photons() as u64).sum()
    }

    /// Replaces every used lumel's stored energy with an irradiance
    /// estimate. Energy of used lumels inside the `(2 radius + 1)^2` pixel
    /// window whose positions lie within `max_distance` of the centre is
    /// summed and divided by the world space area those lumels cover. Photon
    /// counts are kept.
    ///
    /// * `mesh_area`    - Surface area of the mesh the map belongs to.
    /// * `radius`       - Window radius in lumels.
    /// * `max_distance` - Maximum world space distance of a contributing lumel.
    pub fn gather(&self, mesh_area: Float, radius: usize, max_distance: Float) {
        let used = self.0.used_count();
        if used == 0 {
            return;
        }

        let lumel_area = mesh_area / used as Float;
        let energy = self.0.colors();
        let (w, h) = (self.0.width(), self.0.height());
        let r = radius as isize;

        let gathered: Vec<Option<Rgb>> = self
            .0
            .lumels()
            .iter()
            .map(|centre| {
                if !centre.used {
                    return None;
                }
                let mut sum = Rgb::BLACK;
                let mut count = 0;
                for y in max(0, centre.y as isize - r)..min(h as isize, centre.y as isize + r + 1) {
                    for x in max(0, centre.x as isize - r)..min(w as isize, centre.x as isize + r + 1) {
                        let (x, y) = (x as usize, y as usize);
                        let lumel = self.0.lumel(x, y);
                        if lumel.used && lumel.position.distance(centre.position) <= max_distance {
                            sum += energy[y * w + x];
                            count += 1;
                        }
                    }
                }
                let area = count as Float * lumel_area;
                Some(if area > 0.0 { sum / area } else { Rgb::BLACK })
            })
            .collect();

        for (lumel, value) in self.0.lumels().iter().zip(gathered) {
            if let Some(c) = value {
                lumel.set_color(c);
            }
        }
    }
}

impl Deref for Photonmap {
    type Target = Lightmap;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn square_mesh() -> Mesh {
        let v = |x: Float, y: Float| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, Rgb::WHITE, Uv::new(x, y), Uv::ZERO);
        let mut mesh = Mesh::new("square");
        mesh.add_faces(&[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)], &[0, 1, 2, 0, 2, 3], None)
            .unwrap();
        mesh
    }

    #[test]
    fn store_skips_unused_lumels() {
        let pm = Photonmap::new(2, 2);
        assert!(!pm.store(Uv::new(0.25, 0.25), Rgb::WHITE));
        assert_eq!(pm.photon_count(), 0);

        let pm = Photonmap::from_mesh(&square_mesh(), 2, 2);
        assert!(pm.store(Uv::new(0.25, 0.25), Rgb::WHITE));
        assert!(pm.store(Uv::new(0.3, 0.1), Rgb::WHITE));
        assert_eq!(pm.lumel(0, 0).photons(), 2);
        assert_eq!(pm.photon_count(), 2);
    }

    #[test]
    fn gather_spreads_energy_over_area() {
        let mesh = square_mesh();
        let pm = Photonmap::from_mesh(&mesh, 4, 4);
        assert_eq!(pm.used_count(), 16);
        pm.store(Uv::new(0.1, 0.1), Rgb::gray(1.0));

        // Every lumel in the 3x3 window around (0, 0) is inside the mesh, the
        // corner window covers 4 lumels of area 1/16 each.
        pm.gather(mesh.area(), 1, 10.0);
        assert!(approx_eq!(f32, pm.lumel(0, 0).color().r, 1.0 / (4.0 / 16.0), epsilon = 1e-4));
        assert!(approx_eq!(f32, pm.lumel(1, 1).color().r, 1.0 / (9.0 / 16.0), epsilon = 1e-4));
        assert!(pm.lumel(3, 3).color().is_black());
        assert_eq!(pm.lumel(0, 0).photons(), 1);
    }

    #[test]
    fn gather_respects_max_distance() {
        let mesh = square_mesh();
        let pm = Photonmap::from_mesh(&mesh, 4, 4);
        pm.store(Uv::new(0.1, 0.1), Rgb::gray(1.0));

        // Neighbours are 0.25 apart, so only the centre contributes.
        pm.gather(mesh.area(), 1, 0.1);
        assert!(approx_eq!(f32, pm.lumel(0, 0).color().r, 16.0, epsilon = 1e-3));
        assert!(pm.lumel(1, 0).color().is_black());
    }
}
