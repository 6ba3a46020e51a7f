use crate::error::{ConfigurationError, Result};
use crate::scene::Rgb;

fn check_width(width: f64) -> std::result::Result<(), ConfigurationError> {
    if width.is_finite() && width >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidLineWidth(width))
    }
}

fn check_opacity(opacity: f64) -> std::result::Result<(), ConfigurationError> {
    if (0.0..=1.0).contains(&opacity) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidOpacity(opacity))
    }
}

fn check_dash(dash: &[f64]) -> std::result::Result<(), ConfigurationError> {
    if dash.iter().any(|d| !d.is_finite() || *d < 0.0) {
        return Err(ConfigurationError::InvalidDashPattern(format!(
            "lengths must be non-negative and finite, got {dash:?}"
        )));
    }
    if !dash.is_empty() && dash.iter().all(|d| *d <= 0.0) {
        return Err(ConfigurationError::InvalidDashPattern(
            "at least one length must be positive".to_owned(),
        ));
    }
    Ok(())
}

/// Stroke appearance for one edge class. Widths are in document units.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    width: f64,
    color: Rgb,
    opacity: f64,
    dash: Vec<f64>,
}

impl LineStyle {
    /// Creates a solid line style.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` is negative or not finite.
    pub fn new(width: f64, color: Rgb) -> Result<Self> {
        check_width(width)?;
        Ok(Self::solid(width, color))
    }

    /// Opaque solid style from a width known to be valid.
    pub(crate) fn solid(width: f64, color: Rgb) -> Self {
        Self {
            width,
            color,
            opacity: 1.0,
            dash: Vec::new(),
        }
    }

    /// Sets the stroke opacity; 1 is fully opaque.
    ///
    /// # Errors
    ///
    /// Returns an error if `opacity` lies outside `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f64) -> Result<Self> {
        check_opacity(opacity)?;
        self.opacity = opacity;
        Ok(self)
    }

    /// Sets alternating dash and gap lengths.
    ///
    /// # Errors
    ///
    /// Returns an error if a length is negative or not finite, or all
    /// lengths are zero.
    pub fn with_dash(mut self, dash: Vec<f64>) -> Result<Self> {
        check_dash(&dash)?;
        self.dash = dash;
        Ok(self)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Dash lengths; empty for a solid line.
    #[must_use]
    pub fn dash(&self) -> &[f64] {
        &self.dash
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        check_width(self.width)?;
        check_opacity(self.opacity)?;
        check_dash(&self.dash)
    }
}

/// Outline drawn around every shaded face polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceStyle {
    line: LineStyle,
}

impl FaceStyle {
    /// Width used when no explicit width is given.
    pub const DEFAULT_WIDTH: f64 = 0.5;

    #[must_use]
    pub fn new(color: Rgb) -> Self {
        Self {
            line: LineStyle::solid(Self::DEFAULT_WIDTH, color),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `width` is negative or not finite.
    pub fn with_width(mut self, width: f64) -> Result<Self> {
        check_width(width)?;
        self.line.width = width;
        Ok(self)
    }

    /// # Errors
    ///
    /// See [`LineStyle::with_dash`].
    pub fn with_dash(mut self, dash: Vec<f64>) -> Result<Self> {
        self.line = self.line.with_dash(dash)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// See [`LineStyle::with_opacity`].
    pub fn with_opacity(mut self, opacity: f64) -> Result<Self> {
        self.line = self.line.with_opacity(opacity)?;
        Ok(self)
    }

    #[must_use]
    pub fn line(&self) -> &LineStyle {
        &self.line
    }
}

/// One axis arrow of the coordinate-system glyph.
///
/// Head width and length are proportional to the stroke width.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowStyle {
    stroke_width: f64,
    head_width: f64,
    head_length: f64,
    color: Rgb,
    label: String,
    font_size: f64,
}

impl ArrowStyle {
    /// Head width as a multiple of the stroke width.
    pub const HEAD_WIDTH_RATIO: f64 = 3.0;
    /// Head length as a multiple of the stroke width.
    pub const HEAD_LENGTH_RATIO: f64 = 4.0;

    /// # Errors
    ///
    /// Returns an error if `stroke_width` is negative or not finite.
    pub fn new(stroke_width: f64, color: Rgb, label: impl Into<String>, font_size: f64) -> Result<Self> {
        check_width(stroke_width)?;
        check_width(font_size)?;
        Ok(Self {
            stroke_width,
            head_width: stroke_width * Self::HEAD_WIDTH_RATIO,
            head_length: stroke_width * Self::HEAD_LENGTH_RATIO,
            color,
            label: label.into(),
            font_size,
        })
    }

    /// Rescales the stroke and keeps the head proportions.
    ///
    /// # Errors
    ///
    /// Returns an error if `stroke_width` is negative or not finite.
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Result<Self> {
        check_width(stroke_width)?;
        if self.stroke_width > 0.0 {
            let ratio = stroke_width / self.stroke_width;
            self.head_width *= ratio;
            self.head_length *= ratio;
        } else {
            self.head_width = stroke_width * Self::HEAD_WIDTH_RATIO;
            self.head_length = stroke_width * Self::HEAD_LENGTH_RATIO;
        }
        self.stroke_width = stroke_width;
        Ok(self)
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    #[must_use]
    pub fn head_width(&self) -> f64 {
        self.head_width
    }

    #[must_use]
    pub fn head_length(&self) -> f64 {
        self.head_length
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.font_size
    }
}

/// Style of the coordinate-system glyph drawn in the lower-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordSystemStyle {
    size: f64,
    axes: [ArrowStyle; 3],
}

impl CoordSystemStyle {
    /// Creates black `x`, `y`, `z` arrows for a glyph of `size` document
    /// units. Font size is `size / 5`, stroke width `size / 25`.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is not positive and finite.
    pub fn new(size: f64) -> Result<Self> {
        if !(size.is_finite() && size > 0.0) {
            return Err(ConfigurationError::InvalidLineWidth(size).into());
        }
        let font = size / 5.0;
        let stroke = size / 25.0;
        Ok(Self {
            size,
            axes: [
                ArrowStyle::new(stroke, Rgb::BLACK, "x", font)?,
                ArrowStyle::new(stroke, Rgb::BLACK, "y", font)?,
                ArrowStyle::new(stroke, Rgb::BLACK, "z", font)?,
            ],
        })
    }

    /// Replaces the arrow for axis `index` (0 = x, 1 = y, 2 = z).
    #[must_use]
    pub fn with_axis(mut self, index: usize, style: ArrowStyle) -> Self {
        if let Some(slot) = self.axes.get_mut(index) {
            *slot = style;
        }
        self
    }

    #[must_use]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Extra space reserved around the drawing for the glyph.
    #[must_use]
    pub fn margin(&self) -> f64 {
        2.0 * self.size
    }

    /// Arrow style for the axis labelled `label`.
    #[must_use]
    pub fn axis(&self, label: &str) -> Option<&ArrowStyle> {
        self.axes.iter().find(|a| a.label == label)
    }

    #[must_use]
    pub fn axes(&self) -> &[ArrowStyle; 3] {
        &self.axes
    }
}
