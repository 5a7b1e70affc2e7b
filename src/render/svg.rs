//! SVG snapshot of a retained [`Scene`], drawn through plotters' SVG backend.

use super::draw_list::{AxisSnapshot, PathSnapshot, Scene};
use super::{Orientation, Rect, TextAnchor, TextVisual};
use crate::axis::Scale;
use crate::error::{LrCurveError, Result};
use plotters::backend::SVGBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Approximate glyph advance used to lay out legend entries
const GLYPH_WIDTH: f64 = 7.0;

const LEGEND_KEY_SIZE: f64 = 25.0;

const FONT: &str = "sans-serif";
const FONT_SIZE: u32 = 11;

const PANEL_FILL: RGBColor = RGBColor(0xEB, 0xEB, 0xEB);
const STRIP_FILL: RGBColor = RGBColor(0xD9, 0xD9, 0xD9);
const LEGEND_KEY_FILL: RGBColor = RGBColor(0xF2, 0xF2, 0xF2);
const INK: RGBColor = RGBColor(0x33, 0x33, 0x33);
const INK_HEX: &str = "#333333";

fn render_error(e: impl std::fmt::Display) -> LrCurveError {
    LrCurveError::Render(format!("SVG rendering failed: {}", e))
}

fn px((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

/// Parse `#rgb`, `#rrggbb` or a basic CSS color name.
pub fn parse_color(spec: &str) -> Option<RGBColor> {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        let digits = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()?;
        return match digits.as_slice() {
            [r, g, b] => Some(RGBColor(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Some(RGBColor(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
            _ => None,
        };
    }
    let (r, g, b) = match spec.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(RGBColor(r, g, b))
}

fn line_color(spec: &str) -> RGBColor {
    parse_color(spec).unwrap_or_else(|| {
        tracing::warn!("Unsupported color '{}', drawing it as {}", spec, INK_HEX);
        INK
    })
}

/// Cut the segment `a`-`b` to `rect` (Liang-Barsky); `None` when it lies
/// fully outside.
fn clip_segment(
    rect: &Rect,
    a: (f64, f64),
    b: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-dx, a.0 - rect.x),
        (dx, rect.right() - a.0),
        (-dy, a.1 - rect.y),
        (dy, rect.bottom() - a.1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

fn contains(rect: &Rect, (x, y): (f64, f64)) -> bool {
    x >= rect.x && x <= rect.right() && y >= rect.y && y <= rect.bottom()
}

/// Split a polyline into the runs that fall inside `rect`.
fn clip_polyline(rect: &Rect, points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for pair in points.windows(2) {
        match clip_segment(rect, pair[0], pair[1]) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    if current.len() > 1 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(start);
                }
                current.push(end);
            }
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

fn text_style(pos: Pos) -> TextStyle<'static> {
    (FONT, FONT_SIZE).into_font().color(&INK).pos(pos)
}

fn draw_rect(area: &Area<'_>, rect: &Rect, fill: RGBColor) -> Result<()> {
    area.draw(&Rectangle::new(
        [px((rect.x, rect.y)), px((rect.right(), rect.bottom()))],
        fill.filled(),
    ))
    .map_err(render_error)
}

fn draw_axis(area: &Area<'_>, orientation: Orientation, axis: &AxisSnapshot) -> Result<()> {
    let AxisSnapshot {
        ticks,
        plot,
        graph,
        show_labels,
    } = axis;
    let range = match orientation {
        Orientation::Horizontal => (0.0, plot.width),
        Orientation::Vertical => (plot.height, 0.0),
    };
    let Ok(scale) = ticks.scale(range) else {
        return Ok(());
    };

    for &value in &ticks.grid {
        let Some(offset) = scale.to_pixel(value) else {
            continue;
        };
        let opacity = if ticks.is_major(value) { 1.0 } else { 0.5 };
        let (from, to) = match orientation {
            Orientation::Horizontal => {
                let x = plot.x + offset;
                ((x, graph.y), (x, graph.bottom()))
            }
            Orientation::Vertical => {
                let y = plot.y + offset;
                ((graph.x, y), (graph.right(), y))
            }
        };
        area.draw(&PathElement::new(
            vec![px(from), px(to)],
            WHITE.mix(opacity).stroke_width(1),
        ))
        .map_err(render_error)?;
    }

    if !show_labels {
        return Ok(());
    }
    for (&value, label) in ticks.major.iter().zip(&ticks.labels) {
        let Some(offset) = scale.to_pixel(value) else {
            continue;
        };
        let (mark, anchor, style) = match orientation {
            Orientation::Horizontal => {
                let x = plot.x + offset;
                (
                    [(x, graph.bottom()), (x, graph.bottom() + 4.0)],
                    (x, graph.bottom() + 6.0),
                    text_style(Pos::new(HPos::Center, VPos::Top)),
                )
            }
            Orientation::Vertical => {
                let y = plot.y + offset;
                (
                    [(graph.x - 4.0, y), (graph.x, y)],
                    (graph.x - 6.0, y),
                    text_style(Pos::new(HPos::Right, VPos::Center)),
                )
            }
        };
        area.draw(&PathElement::new(
            vec![px(mark[0]), px(mark[1])],
            INK.stroke_width(1),
        ))
        .map_err(render_error)?;
        if let Some(label) = label {
            area.draw(&Text::new(label.clone(), px(anchor), style))
                .map_err(render_error)?;
        }
    }
    Ok(())
}

fn draw_line(area: &Area<'_>, plot: Option<&Rect>, path: &PathSnapshot) -> Result<()> {
    let color = line_color(&path.color);
    for segment in &path.segments {
        if let [point] = segment.as_slice() {
            if plot.map_or(true, |rect| contains(rect, *point)) {
                area.draw(&Circle::new(px(*point), 2, color.filled()))
                    .map_err(render_error)?;
            }
            continue;
        }
        let runs = match plot {
            Some(rect) => clip_polyline(rect, segment),
            None => vec![segment.clone()],
        };
        for run in runs {
            let points: Vec<(i32, i32)> = run.into_iter().map(px).collect();
            area.draw(&PathElement::new(points, color.stroke_width(2)))
                .map_err(render_error)?;
        }
    }
    Ok(())
}

fn draw_text(area: &Area<'_>, text: &TextVisual) -> Result<()> {
    let baseline = text.baseline;
    let (point, h_pos) = match text.anchor {
        TextAnchor::Start => (baseline.start, HPos::Left),
        TextAnchor::Middle => (baseline.at(0.5), HPos::Center),
        TextAnchor::End => (baseline.end, HPos::Right),
    };
    let (dx, dy) = (
        baseline.end.0 - baseline.start.0,
        baseline.end.1 - baseline.start.1,
    );
    let mut style = text_style(Pos::new(h_pos, VPos::Bottom));
    if dy.abs() > dx.abs() {
        let transform = if dy > 0.0 {
            FontTransform::Rotate90
        } else {
            FontTransform::Rotate270
        };
        style = style.transform(transform);
    }
    area.draw(&Text::new(text.text.clone(), px(point), style))
        .map_err(render_error)
}

fn draw_legend(area: &Area<'_>, scene: &Scene) -> Result<()> {
    let Some(legend) = &scene.legend else {
        return Ok(());
    };
    let total = legend
        .entries
        .iter()
        .map(|e| LEGEND_KEY_SIZE + 5.0 + e.name.chars().count() as f64 * GLYPH_WIDTH + 20.0)
        .sum::<f64>();
    let mut x = legend.area.x + (legend.area.width - (total - 20.0).max(0.0)) / 2.0;
    let y = legend.area.y;
    for entry in &legend.entries {
        draw_rect(
            area,
            &Rect::new(x, y, LEGEND_KEY_SIZE, LEGEND_KEY_SIZE),
            LEGEND_KEY_FILL,
        )?;
        let middle = y + LEGEND_KEY_SIZE / 2.0;
        area.draw(&PathElement::new(
            vec![px((x + 2.0, middle)), px((x + LEGEND_KEY_SIZE - 2.0, middle))],
            line_color(&entry.color).stroke_width(2),
        ))
        .map_err(render_error)?;
        x += LEGEND_KEY_SIZE + 5.0;
        area.draw(&Text::new(
            entry.name.clone(),
            px((x, middle)),
            text_style(Pos::new(HPos::Left, VPos::Center)),
        ))
        .map_err(render_error)?;
        x += entry.name.chars().count() as f64 * GLYPH_WIDTH + 20.0;
    }
    Ok(())
}

impl Scene {
    /// Render the scene as a standalone SVG document.
    ///
    /// Lines are clipped to their facet's plot area, so data outside a fixed
    /// axis limit is cut off.
    pub fn to_svg(&self) -> Result<String> {
        let size = (
            self.width.max(1.0).round() as u32,
            self.height.max(1.0).round() as u32,
        );
        let mut document = String::new();
        {
            let root = SVGBackend::with_string(&mut document, size).into_drawing_area();

            for frame in &self.facets {
                draw_rect(&root, &frame.graph, PANEL_FILL)?;
                draw_rect(&root, &frame.strip, STRIP_FILL)?;
            }

            for ((_, orientation), axis) in &self.axes {
                draw_axis(&root, *orientation, axis)?;
            }

            for ((facet, _), path) in &self.paths {
                let plot = self
                    .facets
                    .iter()
                    .find(|f| &f.facet == facet)
                    .map(|f| &f.plot);
                draw_line(&root, plot, path)?;
            }

            for text in self.texts.values() {
                draw_text(&root, text)?;
            }
            draw_legend(&root, self)?;

            root.present().map_err(render_error)?;
        }
        Ok(document)
    }
}
