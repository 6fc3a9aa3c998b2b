//! Rendering paths to SVG, for debugging.

use svg::node::element::{path::Data, Circle, Path, Rectangle};
use svg::Document;

use crate::paths::bounds_paths_d;
use crate::{FillRule, Path64, PathD, PointD, RectD};

const SUBJECT_FILL: &str = "#4169e133";
const SUBJECT_STROKE: &str = "#4169e1";
const CLIP_FILL: &str = "#ffa50033";
const CLIP_STROKE: &str = "#ff8c00";
const SOLUTION_FILL: &str = "#00ff0066";
const SOLUTION_STROKE: &str = "#008000";

#[derive(Clone, Debug)]
struct PathGroup {
    paths: Vec<PathD>,
    is_open: bool,
    fill_rule: FillRule,
    fill: String,
    stroke: String,
    stroke_width: f64,
    show_vertices: bool,
}

/// Collects layers of paths and renders them into a single SVG document.
///
/// Layers are drawn in the order they were added, so later ones sit on top.
/// The y axis points down, as it does everywhere else in this crate.
#[derive(Clone, Debug, Default)]
pub struct SvgWriter {
    groups: Vec<PathGroup>,
}

impl SvgWriter {
    /// An empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer of floating-point paths.
    #[allow(clippy::too_many_arguments)]
    pub fn add_paths_d(
        &mut self,
        paths: &[PathD],
        is_open: bool,
        fill_rule: FillRule,
        fill: &str,
        stroke: &str,
        stroke_width: f64,
        show_vertices: bool,
    ) -> &mut Self {
        self.groups.push(PathGroup {
            paths: paths.to_vec(),
            is_open,
            fill_rule,
            fill: fill.to_owned(),
            stroke: stroke.to_owned(),
            stroke_width,
            show_vertices,
        });
        self
    }

    /// Adds a layer of integer paths.
    #[allow(clippy::too_many_arguments)]
    pub fn add_paths(
        &mut self,
        paths: &[Path64],
        is_open: bool,
        fill_rule: FillRule,
        fill: &str,
        stroke: &str,
        stroke_width: f64,
        show_vertices: bool,
    ) -> &mut Self {
        let paths: Vec<PathD> = paths
            .iter()
            .map(|p| p.iter().copied().map(PointD::from).collect())
            .collect();
        self.add_paths_d(&paths, is_open, fill_rule, fill, stroke, stroke_width, show_vertices)
    }

    /// Adds subject paths in the usual subject colours.
    pub fn add_subject(&mut self, paths: &[Path64], fill_rule: FillRule) -> &mut Self {
        self.add_paths(paths, false, fill_rule, SUBJECT_FILL, SUBJECT_STROKE, 0.8, false)
    }

    /// Adds clip paths in the usual clip colours.
    pub fn add_clip(&mut self, paths: &[Path64], fill_rule: FillRule) -> &mut Self {
        self.add_paths(paths, false, fill_rule, CLIP_FILL, CLIP_STROKE, 0.8, false)
    }

    /// Adds solution paths in the usual solution colours.
    pub fn add_solution(&mut self, paths: &[Path64], fill_rule: FillRule, show_vertices: bool) -> &mut Self {
        self.add_paths(
            paths,
            false,
            fill_rule,
            SOLUTION_FILL,
            SOLUTION_STROKE,
            1.0,
            show_vertices,
        )
    }

    /// Adds open solution paths, drawn as unfilled polylines.
    pub fn add_open_solution(&mut self, paths: &[Path64]) -> &mut Self {
        self.add_paths(paths, true, FillRule::NonZero, "none", SOLUTION_STROKE, 1.5, false)
    }

    /// Forgets all layers.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    fn bounds(&self) -> Option<RectD> {
        let all: Vec<PathD> = self.groups.iter().flat_map(|g| g.paths.iter().cloned()).collect();
        let rect = bounds_paths_d(&all);
        (rect.left <= rect.right && rect.top <= rect.bottom).then_some(rect)
    }

    /// Renders the layers, scaled to fit in `max_width` by `max_height`
    /// with `margin` pixels of padding.
    pub fn to_document(&self, max_width: f64, max_height: f64, margin: f64) -> Document {
        let Some(rect) = self.bounds() else {
            return Document::new().set("viewBox", (0.0, 0.0, max_width, max_height));
        };
        let w = rect.width().max(1.0);
        let h = rect.height().max(1.0);
        let scale = ((max_width - 2.0 * margin) / w).min((max_height - 2.0 * margin) / h);
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let width = w * scale + 2.0 * margin;
        let height = h * scale + 2.0 * margin;
        let tx = |p: PointD| {
            (
                (p.x - rect.left) * scale + margin,
                (p.y - rect.top) * scale + margin,
            )
        };

        let mut doc = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, width, height))
            .add(
                Rectangle::new()
                    .set("width", width)
                    .set("height", height)
                    .set("fill", "white"),
            );

        for g in &self.groups {
            let mut data = Data::new();
            for path in g.paths.iter().filter(|p| !p.is_empty()) {
                data = data.move_to(tx(path[0]));
                for &p in &path[1..] {
                    data = data.line_to(tx(p));
                }
                if !g.is_open {
                    data = data.close();
                }
            }
            let fill_rule = match g.fill_rule {
                FillRule::EvenOdd => "evenodd",
                // SVG has no positive or negative rule.
                _ => "nonzero",
            };
            let fill = if g.is_open { "none" } else { g.fill.as_str() };
            doc = doc.add(
                Path::new()
                    .set("d", data)
                    .set("fill", fill)
                    .set("fill-rule", fill_rule)
                    .set("stroke", g.stroke.as_str())
                    .set("stroke-width", g.stroke_width)
                    .set("stroke-linejoin", "round"),
            );

            if g.show_vertices {
                for &p in g.paths.iter().flatten() {
                    let (x, y) = tx(p);
                    doc = doc.add(
                        Circle::new()
                            .set("cx", x)
                            .set("cy", y)
                            .set("r", 2.0)
                            .set("fill", g.stroke.as_str()),
                    );
                }
            }
        }
        doc
    }

    /// Renders to a file at `path`, fitting into an 800 by 600 box.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        svg::save(path, &self.to_document(800.0, 600.0, 20.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_path64;

    #[test]
    fn renders_each_layer() {
        let mut w = SvgWriter::new();
        w.add_subject(&[make_path64(&[0, 0, 100, 0, 100, 100])], FillRule::NonZero)
            .add_clip(&[make_path64(&[50, 50, 150, 50, 150, 150])], FillRule::EvenOdd)
            .add_open_solution(&[make_path64(&[0, 0, 150, 150])]);
        let out = w.to_document(400.0, 400.0, 10.0).to_string();
        assert_eq!(out.matches("<path").count(), 3);
        assert!(out.contains("evenodd"));
    }

    #[test]
    fn empty_writer() {
        let out = SvgWriter::new().to_document(100.0, 100.0, 0.0).to_string();
        assert!(!out.contains("<path"));
    }
}
