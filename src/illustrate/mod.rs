pub mod paths;
pub mod style;
pub mod svg;

pub use paths::{BuildPaths, DrawItem, DrawList, EdgeLayering, EdgePath};
pub use style::{ArrowStyle, CoordSystemStyle, FaceStyle, LineStyle};

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{CadVectorError, ConfigurationError, Result};
use crate::math::{Bounds2, Point2, Vector2, TOLERANCE};
use crate::render::{EdgeClass, RenderResult};
use crate::scene::Rgb;

use svg::SvgWriter;

/// Selects the part of the view plane that is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Zoom {
    /// The extent of all faces and edges.
    #[default]
    Fit,
    /// The fitted extent shrunk about its center by this factor.
    Factor(f64),
    /// An explicit view-plane window.
    Window(Bounds2),
}

/// Output configuration for an [`Image`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    scale: Vector2,
    zoom: Zoom,
    margins: Vector2,
    line_styles: BTreeMap<EdgeClass, LineStyle>,
    face_style: Option<FaceStyle>,
    coord_system: Option<CoordSystemStyle>,
    layering: EdgeLayering,
    precision: usize,
}

impl Default for ImageConfig {
    /// 100 document units per view-plane unit, no margins, outlines and
    /// wires drawn, hidden edges omitted.
    fn default() -> Self {
        let mut line_styles = BTreeMap::new();
        line_styles.insert(EdgeClass::VisibleOutline, LineStyle::solid(2.0, Rgb::BLACK));
        line_styles.insert(EdgeClass::VisibleSharpWire, LineStyle::solid(1.0, Rgb::BLACK));
        line_styles.insert(
            EdgeClass::VisibleSmoothWire,
            LineStyle::solid(0.5, Rgb::new(96, 96, 96)),
        );
        Self {
            scale: Vector2::new(100.0, 100.0),
            zoom: Zoom::Fit,
            margins: Vector2::zeros(),
            line_styles,
            face_style: None,
            coord_system: None,
            layering: EdgeLayering::default(),
            precision: 3,
        }
    }
}

impl ImageConfig {
    /// Document units per view-plane unit along x and y.
    #[must_use]
    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.scale = Vector2::new(sx, sy);
        self
    }

    /// Selects the drawn window of the view plane.
    #[must_use]
    pub fn with_zoom(mut self, zoom: Zoom) -> Self {
        self.zoom = zoom;
        self
    }

    /// Padding in document units on each side.
    #[must_use]
    pub fn with_margins(mut self, mx: f64, my: f64) -> Self {
        self.margins = Vector2::new(mx, my);
        self
    }

    #[must_use]
    pub fn with_line_style(mut self, class: EdgeClass, style: LineStyle) -> Self {
        self.line_styles.insert(class, style);
        self
    }

    /// Stops drawing edges of `class`.
    #[must_use]
    pub fn without_line_style(mut self, class: EdgeClass) -> Self {
        self.line_styles.remove(&class);
        self
    }

    #[must_use]
    pub fn with_face_style(mut self, style: FaceStyle) -> Self {
        self.face_style = Some(style);
        self
    }

    #[must_use]
    pub fn with_coord_system(mut self, style: CoordSystemStyle) -> Self {
        self.coord_system = Some(style);
        self
    }

    #[must_use]
    pub fn with_layering(mut self, layering: EdgeLayering) -> Self {
        self.layering = layering;
        self
    }

    /// Digits after the decimal point in the document.
    #[must_use]
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn line_style(&self, class: EdgeClass) -> Option<&LineStyle> {
        self.line_styles.get(&class)
    }

    /// Checks every setting.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting as a `ConfigurationError`.
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        let (sx, sy) = (self.scale.x, self.scale.y);
        if !(sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0) {
            return Err(ConfigurationError::InvalidScale(sx, sy));
        }
        let (mx, my) = (self.margins.x, self.margins.y);
        if !(mx.is_finite() && my.is_finite() && mx >= 0.0 && my >= 0.0) {
            return Err(ConfigurationError::InvalidMargin(mx, my));
        }
        match self.zoom {
            Zoom::Fit => {}
            Zoom::Factor(f) => {
                if !(f.is_finite() && f > 0.0) {
                    return Err(ConfigurationError::InvalidZoom(format!(
                        "factor must be positive, got {f}"
                    )));
                }
            }
            Zoom::Window(w) => {
                let finite = [w.min.x, w.min.y, w.max.x, w.max.y]
                    .iter()
                    .all(|v| v.is_finite());
                if !finite || w.width() <= 0.0 || w.height() <= 0.0 {
                    return Err(ConfigurationError::InvalidZoom(format!(
                        "window must have positive size, got {} x {}",
                        w.width(),
                        w.height()
                    )));
                }
            }
        }
        for style in self.line_styles.values() {
            style.validate()?;
        }
        if let Some(face) = &self.face_style {
            face.line().validate()?;
        }
        Ok(())
    }
}

/// Placement of the view-plane window in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    window: Bounds2,
    scale: Vector2,
    offset: Vector2,
    size: Vector2,
}

impl Layout {
    fn new(result: &RenderResult, config: &ImageConfig) -> Self {
        let fitted = result
            .bounds()
            .unwrap_or_else(|| Bounds2::new(Point2::origin(), Point2::origin()));
        let window = match config.zoom {
            Zoom::Fit => fitted,
            Zoom::Factor(f) => fitted.zoomed(f),
            Zoom::Window(w) => w,
        };
        let glyph = config.coord_system.as_ref().map_or(0.0, CoordSystemStyle::margin);
        let offset = config.margins + Vector2::repeat(glyph);
        let content = Vector2::new(window.width() * config.scale.x, window.height() * config.scale.y);
        Self {
            window,
            scale: config.scale,
            offset,
            size: content + offset * 2.0,
        }
    }

    /// View-plane point to document coordinates (y down).
    fn apply(&self, p: &Point2) -> Point2 {
        Point2::new(
            (p.x - self.window.min.x) * self.scale.x + self.offset.x,
            (self.window.max.y - p.y) * self.scale.y + self.offset.y,
        )
    }
}

/// A composed drawing of one render result.
///
/// The image owns its result and configuration; [`Image::to_svg`] is a pure
/// function of both.
#[derive(Debug, Clone)]
pub struct Image {
    result: RenderResult,
    config: ImageConfig,
    layout: Layout,
}

impl Image {
    /// Composes `result` with `config`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if the configuration is invalid.
    pub fn new(result: RenderResult, config: ImageConfig) -> Result<Self> {
        config.validate()?;
        let layout = Layout::new(&result, &config);
        Ok(Self {
            result,
            config,
            layout,
        })
    }

    /// Re-composes the same result with another configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if the configuration is invalid.
    pub fn with_config(self, config: ImageConfig) -> Result<Self> {
        Self::new(self.result, config)
    }

    #[must_use]
    pub fn result(&self) -> &RenderResult {
        &self.result
    }

    #[must_use]
    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Document width including margins.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.layout.size.x
    }

    /// Document height including margins.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.layout.size.y
    }

    /// The document `viewBox`; its origin is always `(0, 0)`.
    #[must_use]
    pub fn view_box(&self) -> Bounds2 {
        Bounds2::new(Point2::origin(), Point2::from(self.layout.size))
    }

    /// Maps a view-plane point to document coordinates.
    #[must_use]
    pub fn to_document(&self, p: &Point2) -> Point2 {
        self.layout.apply(p)
    }

    /// Serializes the drawing.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let builder = BuildPaths::new(self.config.layering, self.config.line_styles.keys().copied());
        let list = builder.execute(&self.result);
        let mut w = SvgWriter::new(self.width(), self.height(), self.config.precision);

        w.open_group("drawing");
        let mut open_class: Option<EdgeClass> = None;
        for item in list.items() {
            match item {
                DrawItem::Face(face) => {
                    if open_class.take().is_some() {
                        w.close_group();
                    }
                    let points = face.screen.map(|p| self.layout.apply(&p));
                    let stroke = self.config.face_style.as_ref().map_or_else(
                        || hairline(face.color, face.opacity),
                        |s| s.line().clone(),
                    );
                    w.polygon(&points, face.color, face.opacity, &stroke);
                }
                DrawItem::Path(path) => {
                    let Some(style) = self.config.line_styles.get(&path.class) else {
                        continue;
                    };
                    if open_class != Some(path.class) {
                        if open_class.is_some() {
                            w.close_group();
                        }
                        w.open_style_group(path.class.name(), style);
                        open_class = Some(path.class);
                    }
                    let points: Vec<Point2> = path.points.iter().map(|p| self.layout.apply(p)).collect();
                    w.path(&points);
                }
            }
        }
        if open_class.is_some() {
            w.close_group();
        }
        w.close_group();

        if let Some(coord) = &self.config.coord_system {
            self.write_coord_system(&mut w, coord);
        }

        debug!(
            width = self.width(),
            height = self.height(),
            items = list.len(),
            "svg composed"
        );
        w.finish()
    }

    /// Writes the SVG document to `path`.
    ///
    /// # Errors
    ///
    /// Returns `CadVectorError::Io` if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_svg()).map_err(|source| CadVectorError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_coord_system(&self, w: &mut SvgWriter, coord: &CoordSystemStyle) {
        let unit = coord.size() / 2.0;
        let anchor = Point2::new(coord.size(), self.height() - coord.size());
        w.open_group("coordinate-system");
        for axis in self.result.axes() {
            let Some(style) = coord.axis(axis.label) else {
                continue;
            };
            // Document y points down.
            let arm = Vector2::new(axis.direction.x, -axis.direction.y) * unit;
            write_arrow(w, &anchor, &(anchor + arm), unit, style);
        }
        w.close_group();
    }
}

/// Seam-hiding outline in the face's own fill.
fn hairline(color: Rgb, opacity: f64) -> LineStyle {
    let line = FaceStyle::new(color).line().clone();
    line.clone().with_opacity(opacity).unwrap_or(line)
}

/// Arrow from `from` to `to` with a triangular head and a label beyond the
/// tip. The head length shrinks with foreshortened axes.
fn write_arrow(w: &mut SvgWriter, from: &Point2, to: &Point2, unit: f64, style: &ArrowStyle) {
    let along = to - from;
    let length = along.norm();
    if length < TOLERANCE {
        return;
    }
    let dir = along / length;
    let ortho = Vector2::new(dir.y, -dir.x);
    let head = style.head_length() * length / unit;
    let half = style.head_width() / 2.0;
    let base = to - dir * head;

    w.line(from, to, style.color(), style.stroke_width());
    let stroke = LineStyle::solid(style.stroke_width(), style.color());
    w.polygon(&[*to, base - ortho * half, base + ortho * half], style.color(), 1.0, &stroke);

    if style.label().is_empty() {
        return;
    }
    let class = format!("axis-{}", style.label());
    w.style(
        &class,
        &format!(
            "font: italic {}pt serif; fill: {};",
            w.num(style.font_size()),
            style.color()
        ),
    );
    let tip = from + dir * (1.25 * length);
    let dx = if dir.x < 0.0 { -style.font_size() } else { 0.0 };
    let dy = if dir.y > 0.0 { style.font_size() } else { 0.0 };
    w.text(&Point2::new(tip.x + dx, tip.y + dy), style.label(), &class);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::mesh::{EdgeDerivation, Mesh};
    use crate::render::{Render, RenderParams};
    use crate::scene::{Camera, Material, Part, Scene};
    use approx::assert_relative_eq;

    fn square_result() -> RenderResult {
        square_result_with(Material::default())
    }

    fn square_result_with(material: Material) -> RenderResult {
        let mesh = Mesh::with_derived_edges(
            vec![
                Point3::new(0.0, 0.0, 0.0).into(),
                Point3::new(2.0, 0.0, 0.0).into(),
                Point3::new(2.0, 1.0, 0.0).into(),
                Point3::new(0.0, 1.0, 0.0).into(),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            EdgeDerivation::default(),
        )
        .unwrap();
        let mut scene = Scene::new(Camera::new(
            Point3::new(1.0, 0.5, 5.0),
            Point3::new(1.0, 0.5, 0.0),
        ));
        scene.add_part(Part::new("square", mesh, material));
        Render::new(RenderParams::default()).execute(&scene).unwrap()
    }

    #[test]
    fn size_follows_scale_and_margins() {
        let config = ImageConfig::default()
            .with_scale(10.0, 20.0)
            .with_margins(5.0, 1.0);
        let image = Image::new(square_result(), config).unwrap();
        assert_relative_eq!(image.width(), 2.0 * 10.0 + 10.0, epsilon = 1e-9);
        assert_relative_eq!(image.height(), 20.0 + 2.0, epsilon = 1e-9);
        assert_eq!(image.view_box().min, Point2::origin());
    }

    #[test]
    fn zoom_factor_shrinks_window() {
        let image = Image::new(
            square_result(),
            ImageConfig::default().with_scale(1.0, 1.0).with_zoom(Zoom::Factor(2.0)),
        )
        .unwrap();
        assert_relative_eq!(image.width(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(image.height(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn coord_system_adds_margin() {
        let image = Image::new(
            square_result(),
            ImageConfig::default()
                .with_scale(1.0, 1.0)
                .with_coord_system(CoordSystemStyle::new(10.0).unwrap()),
        )
        .unwrap();
        assert_relative_eq!(image.width(), 2.0 + 40.0, epsilon = 1e-9);
        let svg = image.to_svg();
        assert!(svg.contains(r#"<g id="coordinate-system">"#));
        assert!(svg.contains(">x</text>"));
        assert!(svg.contains(">y</text>"));
        // Looking straight down, the z axis collapses to a point.
        assert!(!svg.contains(">z</text>"));
    }

    #[test]
    fn y_axis_is_flipped() {
        let image = Image::new(square_result(), ImageConfig::default().with_scale(1.0, 1.0)).unwrap();
        let b = image.result().bounds().unwrap();
        let top_left = image.to_document(&Point2::new(b.min.x, b.max.y));
        assert_relative_eq!(top_left, Point2::origin(), epsilon = 1e-9);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        for config in [
            ImageConfig::default().with_scale(0.0, 1.0),
            ImageConfig::default().with_margins(-1.0, 0.0),
            ImageConfig::default().with_zoom(Zoom::Factor(0.0)),
            ImageConfig::default().with_zoom(Zoom::Window(Bounds2::new(
                Point2::origin(),
                Point2::new(0.0, 1.0),
            ))),
        ] {
            assert!(matches!(
                Image::new(RenderResult::default(), config),
                Err(CadVectorError::Configuration(_))
            ));
        }
    }

    #[test]
    fn faces_and_styled_edges_are_serialized() {
        let image = Image::new(square_result(), ImageConfig::default()).unwrap();
        let svg = image.to_svg();
        assert_eq!(svg.matches("<polygon").count(), 2);
        assert_eq!(svg.matches(r#"class="outline""#).count(), 1);
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains(r#"fill="rgb(180,180,180)""#));
    }

    #[test]
    fn face_style_replaces_hairline() {
        let style = FaceStyle::new(Rgb::new(255, 0, 0)).with_width(3.0).unwrap();
        let image = Image::new(square_result(), ImageConfig::default().with_face_style(style)).unwrap();
        assert!(image
            .to_svg()
            .contains(r#"stroke="rgb(255,0,0)" stroke-width="3.000""#));
    }

    #[test]
    fn translucent_parts_and_faded_lines_carry_opacity() {
        let faded = LineStyle::new(1.0, Rgb::BLACK)
            .unwrap()
            .with_opacity(0.3)
            .unwrap();
        let config = ImageConfig::default().with_line_style(EdgeClass::VisibleOutline, faded);
        let image = Image::new(
            square_result_with(Material::default().with_opacity(0.5)),
            config,
        )
        .unwrap();
        let svg = image.to_svg();
        assert_eq!(svg.matches(r#"fill-opacity="0.500""#).count(), 2);
        // The hairline of each face fades with it, plus the outline group.
        assert_eq!(svg.matches(r#"stroke-opacity="0.500""#).count(), 2);
        assert_eq!(svg.matches(r#"stroke-opacity="0.300""#).count(), 1);

        let opaque = Image::new(square_result(), ImageConfig::default()).unwrap();
        assert!(!opaque.to_svg().contains("opacity"));
    }

    #[test]
    fn write_reports_unwritable_path() {
        let image = Image::new(square_result(), ImageConfig::default()).unwrap();
        let err = image
            .write("/nonexistent-directory/for/sure/out.svg")
            .unwrap_err();
        assert!(matches!(err, CadVectorError::Io { .. }));
    }
}
