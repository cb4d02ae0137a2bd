//! Composite Albers USA projection: a conic equal-area lower 48 with
//! Alaska and Hawaii insets, each clipped to its own pixel extent.

use std::f64::consts::PI;
use std::fmt::Write;

use super::Point;

/// Reference scale at a 960px-wide canvas.
const BASE_SCALE: f64 = 1070.0;
const BASE_WIDTH: f64 = 960.0;
const BASE_HEIGHT: f64 = 500.0;

#[derive(Debug, Clone, Copy)]
struct ConicEqualArea {
    n: f64,
    c: f64,
    r0: f64,
    rotate: f64,
    k: f64,
    dx: f64,
    dy: f64,
}

impl ConicEqualArea {
    /// `parallels`, `rotate` and `center` in degrees; `center` is in the rotated frame.
    fn new(parallels: (f64, f64), rotate: f64, center: (f64, f64), k: f64, translate: Point) -> Self {
        let sy0 = parallels.0.to_radians().sin();
        let n = (sy0 + parallels.1.to_radians().sin()) / 2.0;
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        let r0 = c.sqrt() / n;
        let mut p = Self {
            n,
            c,
            r0,
            rotate: rotate.to_radians(),
            k,
            dx: 0.0,
            dy: 0.0,
        };
        let (cx, cy) = p.raw(center.0.to_radians(), center.1.to_radians());
        p.dx = translate[0] - k * cx;
        p.dy = translate[1] + k * cy;
        p
    }

    fn raw(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let r = (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n;
        let x = lambda * self.n;
        (r * x.sin(), self.r0 - r * x.cos())
    }

    fn project(&self, lon: f64, lat: f64) -> Point {
        let mut lambda = lon.to_radians() + self.rotate;
        if lambda > PI {
            lambda -= 2.0 * PI;
        } else if lambda < -PI {
            lambda += 2.0 * PI;
        }
        let (x, y) = self.raw(lambda, lat.to_radians());
        [self.dx + self.k * x, self.dy - self.k * y]
    }
}

#[derive(Debug, Clone, Copy)]
struct Extent {
    min: Point,
    max: Point,
}

impl Extent {
    fn contains(&self, p: Point) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AlbersUsa {
    insets: [(ConicEqualArea, Extent); 3],
}

impl AlbersUsa {
    /// Scale and center the projection for a `width` x `height` canvas.
    pub fn fit(width: f64, height: f64) -> Self {
        let k = BASE_SCALE * (width / BASE_WIDTH).min(height / BASE_HEIGHT);
        let (x, y) = (width / 2.0, height / 2.0);

        let lower48 = ConicEqualArea::new((29.5, 45.5), 96.0, (-0.6, 38.7), k, [x, y]);
        let alaska = ConicEqualArea::new(
            (55.0, 65.0),
            154.0,
            (-2.0, 58.5),
            k * 0.35,
            [x - 0.307 * k, y + 0.201 * k],
        );
        let hawaii = ConicEqualArea::new(
            (8.0, 18.0),
            157.0,
            (-3.0, 19.9),
            k,
            [x - 0.205 * k, y + 0.212 * k],
        );

        Self {
            insets: [
                (
                    lower48,
                    Extent {
                        min: [x - 0.455 * k, y - 0.238 * k],
                        max: [x + 0.455 * k, y + 0.238 * k],
                    },
                ),
                (
                    alaska,
                    Extent {
                        min: [x - 0.425 * k, y + 0.120 * k],
                        max: [x - 0.214 * k, y + 0.234 * k],
                    },
                ),
                (
                    hawaii,
                    Extent {
                        min: [x - 0.214 * k, y + 0.166 * k],
                        max: [x - 0.115 * k, y + 0.234 * k],
                    },
                ),
            ],
        }
    }

    /// First inset whose extent holds the projected point wins; `None`
    /// when the point falls outside all three.
    pub fn project(&self, lon: f64, lat: f64) -> Option<Point> {
        self.insets
            .iter()
            .map(|(proj, extent)| (proj.project(lon, lat), extent))
            .find(|(p, extent)| extent.contains(*p))
            .map(|(p, _)| p)
    }

    /// SVG path data for a feature. Rings left with fewer than three
    /// visible points are dropped; an empty string means nothing is drawable.
    pub fn path_data(&self, polygons: &[Vec<Vec<Point>>]) -> String {
        let mut d = String::new();
        for ring in polygons.iter().flatten() {
            let projected: Vec<Point> = ring
                .iter()
                .filter_map(|p| self.project(p[0], p[1]))
                .collect();
            if projected.len() < 3 {
                continue;
            }
            for (i, p) in projected.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{}{:.1},{:.1}", cmd, p[0], p[1]);
            }
            d.push('Z');
        }
        d
    }
}
