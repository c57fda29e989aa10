//! Lightmap

use super::Lumel;
use crate::color::*;
use crate::common::*;
use crate::geometry::*;
use crate::mesh::*;

/// Pixel encodings for 8-bit lightmap output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightmapEncoding {
    /// Color clamped to `[0, 1]`.
    Ldr,

    /// Color halved and clamped, decoded by doubling.
    DoubleLdr,

    /// RGB with a shared multiplier in alpha.
    Rgbm {
        /// Maximum multiplier.
        range: Float,
    },
}

/// A `width` x `height` grid of lumels addressed through the lightmap UV
/// layer of a mesh.
#[derive(Clone, Debug)]
pub struct Lightmap {
    width: usize,
    height: usize,
    lumels: Vec<Lumel>,
}

impl Lightmap {
    /// Create a new `Lightmap` where every lumel is unused.
    ///
    /// * `width`  - Width in lumels.
    /// * `height` - Height in lumels.
    pub fn new(width: usize, height: usize) -> Self {
        let lumels = (0..height)
            .flat_map(|y| (0..width).map(move |x| Lumel::new(x, y)))
            .collect();
        Self { width, height, lumels }
    }

    /// Create a new `Lightmap` and rasterize a mesh into it.
    ///
    /// * `mesh`   - The mesh.
    /// * `width`  - Width in lumels.
    /// * `height` - Height in lumels.
    pub fn from_mesh(mesh: &Mesh, width: usize, height: usize) -> Self {
        let mut lightmap = Self::new(width, height);
        lightmap.initialize(mesh);
        lightmap
    }

    /// Rasterizes the lightmap UV triangles of every face. Each covered
    /// pixel is marked used, tagged with its face and given the world space
    /// position and normal at its centre. A pixel claimed by an earlier face
    /// keeps its owner.
    ///
    /// * `mesh` - The mesh.
    pub fn initialize(&mut self, mesh: &Mesh) {
        let (width, height) = (self.width, self.height);
        self.lumels = Self::new(width, height).lumels;

        let mut conflicts = 0;
        for face in mesh.faces() {
            let lumels = &mut self.lumels;
            face.rasterize(width, height, UvLayer::Lightmap, |x, y, bary| {
                let lumel = &mut lumels[y * width + x];
                if lumel.used {
                    conflicts += 1;
                    return;
                }
                lumel.used = true;
                lumel.face = face.index();
                lumel.bary = bary;
                lumel.position = face.position_at(bary);
                lumel.normal = face.normal_at(bary);
            });
        }

        if conflicts > 0 {
            debug!("Lightmap for '{}': {} pixels claimed by more than one face", mesh.name, conflicts);
        }
        debug!(
            "Lightmap for '{}': {} of {} lumels used",
            mesh.name,
            self.used_count(),
            self.lumels.len()
        );
    }

    /// Returns the width in lumels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in lumels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the lumels in row-major order.
    pub fn lumels(&self) -> &[Lumel] {
        &self.lumels
    }

    /// Returns a lumel by pixel coordinates.
    ///
    /// * `x` - Column in `[0, width)`.
    /// * `y` - Row in `[0, height)`.
    pub fn lumel(&self, x: usize, y: usize) -> &Lumel {
        &self.lumels[y * self.width + x]
    }

    /// Returns the lumel at normalized coordinates, found by flooring
    /// `uv * (width, height)`. Coordinates outside `[0, 1)` are clamped to
    /// the border.
    ///
    /// * `uv` - Lightmap UV.
    pub fn lumel_at_uv(&self, uv: Uv) -> Option<&Lumel> {
        if self.lumels.is_empty() || uv.is_nan() {
            return None;
        }
        let to_pixel = |v: Float, size: usize| -> usize { clamp((v * size as Float).floor(), 0.0, (size - 1) as Float) as usize };
        Some(self.lumel(to_pixel(uv.x, self.width), to_pixel(uv.y, self.height)))
    }

    /// Returns the number of used lumels.
    pub fn used_count(&self) -> usize {
        self.lumels.iter().filter(|l| l.used).count()
    }

    /// Clears the color and photon count of every lumel.
    pub fn clear(&self) {
        self.lumels.iter().for_each(|l| l.clear());
    }

    /// Returns the lumel colors in row-major order.
    pub fn colors(&self) -> Vec<Rgb> {
        self.lumels.iter().map(|l| l.color()).collect()
    }

    /// Returns the lumel colors with every unused lumel that touches a used
    /// one replaced by the average of its used 8-neighbours. The lumels
    /// themselves are not modified.
    pub fn expanded(&self) -> Vec<Rgb> {
        let (w, h) = (self.width as isize, self.height as isize);
        let mut colors = self.colors();

        for lumel in self.lumels.iter().filter(|l| !l.used) {
            let mut sum = Rgb::BLACK;
            let mut count = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let (nx, ny) = (lumel.x as isize + dx, lumel.y as isize + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let neighbour = self.lumel(nx as usize, ny as usize);
                    if neighbour.used {
                        sum += neighbour.color();
                        count += 1;
                    }
                }
            }
            if count > 0 {
                colors[lumel.y * self.width + lumel.x] = sum / count as Float;
            }
        }

        colors
    }

    /// Returns a flat RGB float buffer.
    ///
    /// * `expand` - Dilate used lumels into adjacent unused ones.
    pub fn to_rgb_buffer(&self, expand: bool) -> Vec<Float> {
        let colors = if expand { self.expanded() } else { self.colors() };
        colors.iter().flat_map(|c| c.to_array()).collect()
    }

    /// Returns a flat RGBA byte buffer.
    ///
    /// * `encoding` - Pixel encoding.
    /// * `expand`   - Dilate used lumels into adjacent unused ones.
    pub fn to_rgba(&self, encoding: LightmapEncoding, expand: bool) -> Vec<u8> {
        let colors = if expand { self.expanded() } else { self.colors() };
        colors
            .iter()
            .flat_map(|c| {
                let rgba = match encoding {
                    LightmapEncoding::Ldr => Rgba::from(c.clamp(0.0, 1.0)),
                    LightmapEncoding::DoubleLdr => Rgba::double_ldr(c),
                    LightmapEncoding::Rgbm { range } => Rgba::rgbm(c, range),
                };
                rgba.to_bytes()
            })
            .collect()
    }
}
