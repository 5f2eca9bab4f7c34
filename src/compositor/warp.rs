//! Perspective projection of the frame wrapper.
//!
//! The wrapper is a flat plane, so its projected image is a homography of the
//! unrotated raster. Corners are projected through the 3D transform and the
//! raster is resampled into the resulting quad.

use image::RgbaImage;

use super::scene::FrameTransform;

const MIN_DEPTH: f64 = 1e-3;
const MAX_WARP_EXTENT: u32 = 16_384;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    sin_x: f64,
    cos_x: f64,
    sin_y: f64,
    cos_y: f64,
    scale: f64,
    perspective: f64,
}

impl Projection {
    pub fn new(transform: &FrameTransform) -> Self {
        let (sin_x, cos_x) = transform.rotate_x.to_radians().sin_cos();
        let (sin_y, cos_y) = transform.rotate_y.to_radians().sin_cos();
        Self {
            sin_x,
            cos_x,
            sin_y,
            cos_y,
            scale: transform.scale,
            perspective: transform.perspective,
        }
    }

    /// Projects a point given relative to the wrapper center.
    /// `None` when the point lands behind the viewer.
    pub fn project(&self, (x, y): (f64, f64)) -> Option<(f64, f64)> {
        let (x, y) = (x * self.scale, y * self.scale);
        let x1 = x * self.cos_y;
        let z1 = -x * self.sin_y;
        let y2 = y * self.cos_x - z1 * self.sin_x;
        let z2 = y * self.sin_x + z1 * self.cos_x;
        let depth = self.perspective - z2;
        if depth <= MIN_DEPTH {
            return None;
        }
        let w = self.perspective / depth;
        Some((x1 * w, y2 * w))
    }
}

/// 3x3 projective map, row-major, `m[2][2]` normalized to 1 where possible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    m: [[f64; 3]; 3],
}

impl Homography {
    /// Maps the unit square corners (0,0) (1,0) (1,1) (0,1) onto `quad` in that order.
    pub fn square_to_quad(quad: [(f64, f64); 4]) -> Option<Self> {
        let [(x0, y0), (x1, y1), (x2, y2), (x3, y3)] = quad;
        let sx = x0 - x1 + x2 - x3;
        let sy = y0 - y1 + y2 - y3;

        if sx.abs() < f64::EPSILON && sy.abs() < f64::EPSILON {
            return Some(Self {
                m: [
                    [x1 - x0, x3 - x0, x0],
                    [y1 - y0, y3 - y0, y0],
                    [0.0, 0.0, 1.0],
                ],
            });
        }

        let (dx1, dx2) = (x1 - x2, x3 - x2);
        let (dy1, dy2) = (y1 - y2, y3 - y2);
        let det = dx1 * dy2 - dx2 * dy1;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let g = (sx * dy2 - dx2 * sy) / det;
        let h = (dx1 * sy - sx * dy1) / det;
        Some(Self {
            m: [
                [x1 - x0 + g * x1, x3 - x0 + h * x3, x0],
                [y1 - y0 + g * y1, y3 - y0 + h * y3, y0],
                [g, h, 1.0],
            ],
        })
    }

    pub fn invert(&self) -> Option<Self> {
        let m = &self.m;
        let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        let adjugate = [
            [cofactor(1, 2, 1, 2), -cofactor(0, 2, 1, 2), cofactor(0, 1, 1, 2)],
            [-cofactor(1, 2, 0, 2), cofactor(0, 2, 0, 2), -cofactor(0, 1, 0, 2)],
            [cofactor(1, 2, 0, 1), -cofactor(0, 2, 0, 1), cofactor(0, 1, 0, 1)],
        ];
        let det = m[0][0] * adjugate[0][0] + m[0][1] * adjugate[1][0] + m[0][2] * adjugate[2][0];
        if det.abs() < 1e-12 {
            return None;
        }
        let mut inverse = [[0.0; 3]; 3];
        for (row, values) in inverse.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = adjugate[row][col] / det;
            }
        }
        Some(Self { m: inverse })
    }

    pub fn apply(&self, (x, y): (f64, f64)) -> Option<(f64, f64)> {
        let m = &self.m;
        let w = m[2][0] * x + m[2][1] * y + m[2][2];
        if w.abs() < 1e-12 {
            return None;
        }
        Some((
            (m[0][0] * x + m[0][1] * y + m[0][2]) / w,
            (m[1][0] * x + m[1][1] * y + m[1][2]) / w,
        ))
    }
}

/// Warped raster and the device-space position of its top-left pixel.
#[derive(Debug, Clone)]
pub struct WarpedRaster {
    pub origin: (i32, i32),
    pub image: RgbaImage,
}

/// Resamples `source` into `quad` (device coordinates, corners clockwise from top-left).
///
/// Works on any 4-channel premultiplied layout; pixels outside the quad stay transparent.
pub fn warp_image(source: &RgbaImage, quad: [(f64, f64); 4]) -> Option<WarpedRaster> {
    if source.width() == 0 || source.height() == 0 {
        return None;
    }
    let inverse = Homography::square_to_quad(quad)?.invert()?;

    let min_x = quad.iter().map(|point| point.0).fold(f64::INFINITY, f64::min).floor();
    let min_y = quad.iter().map(|point| point.1).fold(f64::INFINITY, f64::min).floor();
    let max_x = quad.iter().map(|point| point.0).fold(f64::NEG_INFINITY, f64::max).ceil();
    let max_y = quad.iter().map(|point| point.1).fold(f64::NEG_INFINITY, f64::max).ceil();
    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
        return None;
    }
    let width = u32::try_from((max_x - min_x) as i64).ok()?;
    let height = u32::try_from((max_y - min_y) as i64).ok()?;
    if width == 0 || height == 0 || width > MAX_WARP_EXTENT || height > MAX_WARP_EXTENT {
        return None;
    }

    let source_width = f64::from(source.width());
    let source_height = f64::from(source.height());
    let mut output = RgbaImage::new(width, height);
    for (px, py, pixel) in output.enumerate_pixels_mut() {
        let point = (min_x + f64::from(px) + 0.5, min_y + f64::from(py) + 0.5);
        let Some((u, v)) = inverse.apply(point) else {
            continue;
        };
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            continue;
        }
        pixel.0 = sample_bilinear(source, u * source_width - 0.5, v * source_height - 0.5);
    }

    Some(WarpedRaster {
        origin: (min_x as i32, min_y as i32),
        image: output,
    })
}

fn sample_bilinear(source: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let max_x = source.width() as i64 - 1;
    let max_y = source.height() as i64 - 1;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let clamp_x = |value: i64| value.clamp(0, max_x) as u32;
    let clamp_y = |value: i64| value.clamp(0, max_y) as u32;
    let (left, top) = (x0 as i64, y0 as i64);

    let p00 = source.get_pixel(clamp_x(left), clamp_y(top)).0;
    let p10 = source.get_pixel(clamp_x(left + 1), clamp_y(top)).0;
    let p01 = source.get_pixel(clamp_x(left), clamp_y(top + 1)).0;
    let p11 = source.get_pixel(clamp_x(left + 1), clamp_y(top + 1)).0;

    let mut out = [0_u8; 4];
    for channel in 0..4 {
        let top_row = f64::from(p00[channel]) * (1.0 - fx) + f64::from(p10[channel]) * fx;
        let bottom_row = f64::from(p01[channel]) * (1.0 - fx) + f64::from(p11[channel]) * fx;
        out[channel] = (top_row * (1.0 - fy) + bottom_row * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}
