//! Procedural primitive generation.
//!
//! Every operation is a pure function of its arguments. Colors are validated
//! before any vertex is produced, so a failing call yields nothing.

use std::f64::consts::TAU;

use crate::coords::Vec2;
use crate::error::{Error, Result};
use crate::paint::validate_color;

use super::buffer::VertexBuffer;
use super::layout::Vertex;

/// Fixed tessellation of [`Generator::circle`], one vertex per degree.
pub const CIRCLE_SEGMENTS: u32 = 360;

/// Side count of [`Generator::hexagon`].
pub const HEXAGON_SIDES: u32 = 6;

/// Most vertices one call may produce: a 256 MiB buffer, wgpu's default
/// `max_buffer_size`. Larger requests fail before anything is allocated.
pub const MAX_VERTICES: usize = (256 << 20) / size_of::<Vertex>();

/// How regular-polygon positions are stored after the trigonometry.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PositionRounding {
    /// Keep full `f32` precision.
    #[default]
    Exact,
    /// Truncate x/y toward zero, reproducing renders made with whole-pixel
    /// polygon vertices.
    TowardZero,
}

/// Shape generator.
///
/// Stateless apart from its options; copies are free.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Generator {
    pub rounding: PositionRounding,
}

impl Generator {
    pub const fn new() -> Self {
        Self { rounding: PositionRounding::Exact }
    }

    /// Generator whose polygons match whole-pixel legacy output bit for bit.
    pub const fn legacy() -> Self {
        Self { rounding: PositionRounding::TowardZero }
    }

    /// One vertex per corner, in argument order.
    pub fn triangle(&self, p1: Vec2, p2: Vec2, p3: Vec2, color: &[f32]) -> Result<VertexBuffer> {
        let color = validate_color(color)?;
        let corners = [p1, p2, p3];
        require_finite_points(&corners)?;
        Ok(build(color, corners.iter().map(|p| p.extend(0.0))))
    }

    /// Corners bottom-left, top-left, top-right, bottom-right.
    ///
    /// [`IndexBuffer::quad`](super::IndexBuffer::quad) turns them into two
    /// triangles covering `[x, x + width] × [y, y + height]`.
    pub fn rectangle(
        &self,
        origin: Vec2,
        width: f32,
        height: f32,
        color: &[f32],
    ) -> Result<VertexBuffer> {
        let color = validate_color(color)?;
        require_finite_points(&[origin])?;
        require_finite("rectangle width", width)?;
        require_finite("rectangle height", height)?;

        let Vec2 { x, y } = origin;
        let corners = [
            Vec2::new(x, y),
            Vec2::new(x, y + height),
            Vec2::new(x + width, y + height),
            Vec2::new(x + width, y),
        ];
        Ok(build(color, corners.iter().map(|p| p.extend(0.0))))
    }

    /// Regular polygon; vertex `i` sits at angle `2π·i/sides` around `center`.
    pub fn polygon(
        &self,
        center: Vec2,
        radius: f32,
        sides: u32,
        color: &[f32],
    ) -> Result<VertexBuffer> {
        let color = validate_color(color)?;
        if sides < 3 {
            return Err(Error::invalid(format!("a polygon needs at least 3 sides, got {sides}")));
        }
        require_vertex_count(sides as usize)?;
        require_finite_points(&[center])?;
        require_finite("polygon radius", radius)?;

        let (cx, cy, r) = (center.x as f64, center.y as f64, radius as f64);
        let step = TAU / sides as f64;
        let positions = (0..sides).map(|i| {
            let angle = step * i as f64;
            let x = self.round(cx + r * angle.cos());
            let y = self.round(cy + r * angle.sin());
            [x as f32, y as f32, 0.0]
        });

        Ok(build(color, positions))
    }

    pub fn circle(&self, center: Vec2, radius: f32, color: &[f32]) -> Result<VertexBuffer> {
        self.polygon(center, radius, CIRCLE_SEGMENTS, color)
    }

    /// A regular hexagon's circumradius equals its side length.
    pub fn hexagon(&self, side_length: f32, center: Vec2, color: &[f32]) -> Result<VertexBuffer> {
        self.polygon(center, side_length, HEXAGON_SIDES, color)
    }

    /// Quad around the segment `p1 → p2`, each long edge offset by `width`
    /// along the segment normal.
    ///
    /// Corners: `p1 + n`, `p1 - n`, `p2 - n`, `p2 + n`.
    pub fn line(&self, p1: Vec2, p2: Vec2, width: f32, color: &[f32]) -> Result<VertexBuffer> {
        let color = validate_color(color)?;
        require_finite_points(&[p1, p2])?;
        if !(width.is_finite() && width > 0.0) {
            return Err(Error::invalid(format!("line width must be positive, got {width}")));
        }

        let dir = p2 - p1;
        let len = dir.length();
        if len <= 0.0 {
            return Err(Error::invalid("line endpoints coincide"));
        }

        let n = dir.perp() * (width / len);
        let corners = [p1 + n, p1 - n, p2 - n, p2 + n];
        Ok(build(color, corners.iter().map(|p| p.extend(0.0))))
    }

    /// `count` vertices at the origin, all with `color`.
    pub fn solid_color_vertices(&self, color: &[f32], count: usize) -> Result<VertexBuffer> {
        let color = validate_color(color)?;
        if count < 1 {
            return Err(Error::invalid("vertex count must be at least 1"));
        }
        require_vertex_count(count)?;
        Ok(VertexBuffer::from_validated(vec![Vertex::new([0.0; 3], color); count]))
    }

    #[inline]
    fn round(&self, v: f64) -> f64 {
        match self.rounding {
            PositionRounding::Exact => v,
            PositionRounding::TowardZero => v.trunc(),
        }
    }
}

fn build(color: [f32; 4], positions: impl Iterator<Item = [f32; 3]>) -> VertexBuffer {
    VertexBuffer::from_validated(positions.map(|p| Vertex::new(p, color)).collect())
}

fn require_vertex_count(count: usize) -> Result<()> {
    if count > MAX_VERTICES {
        return Err(Error::invalid(format!(
            "{count} vertices exceed the limit of {MAX_VERTICES}"
        )));
    }
    Ok(())
}

fn require_finite(what: &str, v: f32) -> Result<()> {
    if !v.is_finite() {
        return Err(Error::invalid(format!("{what} must be finite, got {v}")));
    }
    Ok(())
}

fn require_finite_points(points: &[Vec2]) -> Result<()> {
    match points.iter().find(|p| !p.is_finite()) {
        Some(p) => Err(Error::invalid(format!("point ({}, {}) is not finite", p.x, p.y))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::geometry::{IndexBuffer, FLOATS_PER_VERTEX};

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    const BAD: [f32; 4] = [1.5, 0.0, 0.0, 1.0];

    fn g() -> Generator {
        Generator::new()
    }

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn xy(vb: &VertexBuffer) -> Vec<(f32, f32)> {
        vb.positions().map(|[x, y, _]| (x, y)).collect()
    }

    // ── triangle ──────────────────────────────────────────────────────────

    #[test]
    fn triangle_scenario_flat_layout() {
        let vb = g().triangle(v(0.0, 0.0), v(10.0, 0.0), v(5.0, 10.0), &RED).unwrap();
        assert_eq!(
            vb.as_floats(),
            &[
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, //
                10.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, //
                5.0, 10.0, 0.0, 1.0, 0.0, 0.0, 1.0,
            ]
        );
    }

    // ── rectangle ─────────────────────────────────────────────────────────

    #[test]
    fn rectangle_scenario_winding() {
        let vb = g().rectangle(v(0.0, 0.0), 4.0, 2.0, &RED).unwrap();
        assert_eq!(xy(&vb), vec![(0.0, 0.0), (0.0, 2.0), (4.0, 2.0), (4.0, 0.0)]);
    }

    #[test]
    fn rectangle_bounding_box_is_exact() {
        let vb = g().rectangle(v(3.0, -7.0), 12.5, 6.25, &RED).unwrap();
        let pts = xy(&vb);
        let min_x = pts.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let max_x = pts.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = pts.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = pts.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        assert_eq!((min_x, max_x, min_y, max_y), (3.0, 15.5, -7.0, -0.75));
    }

    #[test]
    fn rectangle_quad_indices_cover_both_halves() {
        let vb = g().rectangle(v(0.0, 0.0), 4.0, 2.0, &RED).unwrap();
        let ib = IndexBuffer::quad();
        assert!(ib.validate_against(vb.len()).is_ok());

        // Both triangles are non-degenerate and together cover the rectangle.
        let p = xy(&vb);
        let area = |a: u32, b: u32, c: u32| {
            let (a, b, c) = (p[a as usize], p[b as usize], p[c as usize]);
            ((b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1)) / 2.0
        };
        let tris: Vec<f32> = ib.as_slice().chunks(3).map(|t| area(t[0], t[1], t[2])).collect();
        assert!(tris.iter().all(|a| a.abs() > 0.0));
        assert_eq!(tris.iter().map(|a| a.abs()).sum::<f32>(), 8.0);
    }

    // ── polygon family ────────────────────────────────────────────────────

    #[test]
    fn polygon_vertices_sit_on_the_circle() {
        let center = v(100.0, 50.0);
        let radius = 40.0;
        for sides in [3u32, 4, 5, 7, 12, 64, 360] {
            let vb = g().polygon(center, radius, sides, &RED).unwrap();
            assert_eq!(vb.len(), sides as usize);
            for (i, [x, y, z]) in vb.positions().enumerate() {
                let theta = std::f32::consts::TAU * i as f32 / sides as f32;
                assert!((x - (center.x + radius * theta.cos())).abs() < 1e-3, "sides={sides} i={i}");
                assert!((y - (center.y + radius * theta.sin())).abs() < 1e-3, "sides={sides} i={i}");
                assert_eq!(z, 0.0);
            }
        }
    }

    #[test]
    fn polygon_rejects_fewer_than_three_sides() {
        for sides in [0, 1, 2] {
            let err = g().polygon(v(0.0, 0.0), 1.0, sides, &RED).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn circle_and_hexagon_presets() {
        assert_eq!(g().circle(v(0.0, 0.0), 10.0, &RED).unwrap().len(), 360);
        let hex = g().hexagon(10.0, v(0.0, 0.0), &RED).unwrap();
        assert_eq!(hex.len(), 6);
        assert_eq!(hex.vertices()[0].position, [10.0, 0.0, 0.0]);
    }

    #[test]
    fn legacy_rounding_truncates_toward_zero() {
        let exact = g().hexagon(10.0, v(0.0, 0.0), &RED).unwrap();
        let legacy = Generator::legacy().hexagon(10.0, v(0.0, 0.0), &RED).unwrap();

        // Vertex 1 at 60°: (5, 8.66..) exact, (5, 8) truncated.
        let [ex, ey, _] = exact.vertices()[1].position;
        assert!((ex - 5.0).abs() < 1e-5 && (ey - 8.660254).abs() < 1e-4);
        assert_eq!(legacy.vertices()[1].position, [5.0, 8.0, 0.0]);

        // Vertex 2 at 120°: x = -4.999..98 truncates toward zero to -4.
        assert_eq!(legacy.vertices()[2].position, [-4.0, 8.0, 0.0]);
        // Vertex 5 at 300°: x = 4.999..93 truncates to 4, y = -8.66.. to -8.
        assert_eq!(legacy.vertices()[5].position, [4.0, -8.0, 0.0]);

        for [x, y, _] in legacy.positions() {
            assert_eq!(x, x.trunc());
            assert_eq!(y, y.trunc());
        }
    }

    // ── line ──────────────────────────────────────────────────────────────

    #[test]
    fn horizontal_line_offsets_vertically() {
        let vb = g().line(v(0.0, 0.0), v(10.0, 0.0), 2.0, &RED).unwrap();
        assert_eq!(xy(&vb), vec![(0.0, 2.0), (0.0, -2.0), (10.0, -2.0), (10.0, 2.0)]);
    }

    #[test]
    fn diagonal_line_edges_are_parallel_to_segment() {
        let vb = g().line(v(1.0, 1.0), v(4.0, 5.0), 0.5, &RED).unwrap();
        let p = xy(&vb);
        // p1 + n and p2 + n differ by the segment direction.
        assert!((p[3].0 - p[0].0 - 3.0).abs() < 1e-5);
        assert!((p[3].1 - p[0].1 - 4.0).abs() < 1e-5);
        // Offset has length `width`.
        let (dx, dy) = (p[0].0 - 1.0, p[0].1 - 1.0);
        assert!((dx.hypot(dy) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn line_requires_four_channels() {
        let err = g().line(v(0.0, 0.0), v(1.0, 0.0), 1.0, &[1.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn degenerate_line_rejected() {
        let err = g().line(v(2.0, 2.0), v(2.0, 2.0), 1.0, &RED).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = g().line(v(0.0, 0.0), v(1.0, 0.0), 0.0, &RED).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    // ── solid color ───────────────────────────────────────────────────────

    #[test]
    fn solid_color_vertices_fill_origin() {
        let vb = g().solid_color_vertices(&[0.0, 0.5, 1.0, 1.0], 3).unwrap();
        assert_eq!(vb.len(), 3);
        assert!(vb.vertices().iter().all(|v| v.position == [0.0; 3]));
        assert!(vb.vertices().iter().all(|v| v.color == [0.0, 0.5, 1.0, 1.0]));
    }

    #[test]
    fn solid_color_vertices_argument_checks() {
        assert_eq!(
            g().solid_color_vertices(&RED, 0).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            g().solid_color_vertices(&[1.0, 1.0], 2).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    // ── vertex cap ────────────────────────────────────────────────────────

    #[test]
    fn huge_counts_fail_without_allocating() {
        let err = g().solid_color_vertices(&RED, usize::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("exceed the limit"));

        let err = g().polygon(v(0.0, 0.0), 1.0, u32::MAX, &RED).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn cap_is_inclusive() {
        assert_eq!(MAX_VERTICES * size_of::<Vertex>(), 256 << 20);
        assert!(require_vertex_count(MAX_VERTICES).is_ok());
        assert!(require_vertex_count(MAX_VERTICES + 1).is_err());
    }

    // ── cross-cutting ─────────────────────────────────────────────────────

    #[test]
    fn every_color_taking_generator_rejects_out_of_range() {
        let expected = Error::ColorRange { channel: 0, value: 1.5 };
        let gn = g();
        let results = [
            gn.triangle(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0), &BAD),
            gn.rectangle(v(0.0, 0.0), 1.0, 1.0, &BAD),
            gn.polygon(v(0.0, 0.0), 1.0, 5, &BAD),
            gn.circle(v(0.0, 0.0), 1.0, &BAD),
            gn.hexagon(1.0, v(0.0, 0.0), &BAD),
            gn.line(v(0.0, 0.0), v(1.0, 0.0), 1.0, &BAD),
            gn.solid_color_vertices(&BAD, 4),
        ];
        for r in results {
            assert_eq!(r.unwrap_err(), expected);
        }
    }

    #[test]
    fn flat_length_matches_vertex_count() {
        let gn = g();
        let cases = [
            (gn.triangle(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0), &RED).unwrap(), 3),
            (gn.rectangle(v(0.0, 0.0), 1.0, 1.0, &RED).unwrap(), 4),
            (gn.polygon(v(0.0, 0.0), 1.0, 9, &RED).unwrap(), 9),
            (gn.circle(v(0.0, 0.0), 1.0, &RED).unwrap(), 360),
            (gn.hexagon(1.0, v(0.0, 0.0), &RED).unwrap(), 6),
            (gn.line(v(0.0, 0.0), v(1.0, 0.0), 1.0, &RED).unwrap(), 4),
        ];
        for (vb, count) in cases {
            let floats = vb.as_floats();
            assert_eq!(floats.len() % FLOATS_PER_VERTEX, 0);
            assert_eq!(floats.len() / FLOATS_PER_VERTEX, count);
            assert!(vb.validate().is_ok());
        }
    }

    #[test]
    fn non_finite_parameters_rejected() {
        let gn = g();
        assert!(gn.polygon(v(0.0, 0.0), f32::NAN, 5, &RED).is_err());
        assert!(gn.rectangle(v(f32::INFINITY, 0.0), 1.0, 1.0, &RED).is_err());
        assert!(gn.triangle(v(0.0, 0.0), v(f32::NAN, 0.0), v(0.0, 1.0), &RED).is_err());
    }
}
