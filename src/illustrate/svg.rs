use std::fmt::{self, Write};

use crate::math::Point2;
use crate::scene::Rgb;

use super::style::LineStyle;

/// Fixed-precision number; negative zero prints as zero.
#[derive(Debug, Clone, Copy)]
pub struct Num(pub f64, pub usize);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(value, precision) = *self;
        let text = format!("{value:.precision$}");
        if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
            write!(f, "{:.precision$}", 0.0)
        } else {
            f.write_str(&text)
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes an indented SVG document into a string.
#[derive(Debug)]
pub struct SvgWriter {
    out: String,
    precision: usize,
    indent: usize,
}

impl SvgWriter {
    /// Starts a document of `width` x `height` with a matching `viewBox`.
    #[must_use]
    pub fn new(width: f64, height: f64, precision: usize) -> Self {
        let mut writer = Self {
            out: String::new(),
            precision,
            indent: 0,
        };
        writer.out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        let (w, h) = (writer.num(width), writer.num(height));
        let _ = writeln!(
            writer.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        writer.indent = 1;
        writer
    }

    #[must_use]
    pub fn num(&self, value: f64) -> Num {
        Num(value, self.precision)
    }

    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn points(&self, points: &[Point2], separator: &str, prefix: impl Fn(usize) -> &'static str) -> String {
        let mut s = String::new();
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                s.push_str(separator);
            }
            let _ = write!(s, "{}{},{}", prefix(i), self.num(p.x), self.num(p.y));
        }
        s
    }

    fn opacity_attr(&self, name: &str, opacity: f64) -> String {
        if opacity < 1.0 {
            format!(r#" {name}="{}""#, Num(opacity, self.precision.max(2)))
        } else {
            String::new()
        }
    }

    fn dash_attr(&self, dash: &[f64]) -> String {
        if dash.is_empty() {
            return String::new();
        }
        let values: Vec<String> = dash.iter().map(|d| self.num(*d).to_string()).collect();
        format!(r#" stroke-dasharray="{}""#, values.join(","))
    }

    /// Opens a `<g>` with the given id.
    pub fn open_group(&mut self, id: &str) {
        self.pad();
        let _ = writeln!(self.out, r#"<g id="{}">"#, escape(id));
        self.indent += 1;
    }

    /// Opens a `<g>` carrying a stroke style for its paths.
    pub fn open_style_group(&mut self, class: &str, style: &LineStyle) {
        self.pad();
        let dash = self.dash_attr(style.dash());
        let opacity = self.opacity_attr("stroke-opacity", style.opacity());
        let _ = writeln!(
            self.out,
            r#"<g class="{}" fill="none" stroke="{}"{opacity} stroke-width="{}"{dash} stroke-linejoin="round" stroke-linecap="round">"#,
            escape(class),
            style.color(),
            self.num(style.width()),
        );
        self.indent += 1;
    }

    pub fn close_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.pad();
        self.out.push_str("</g>\n");
    }

    /// Filled polygon outlined with `stroke`.
    pub fn polygon(&mut self, points: &[Point2], fill: Rgb, fill_opacity: f64, stroke: &LineStyle) {
        self.pad();
        let pts = self.points(points, " ", |_| "");
        let dash = self.dash_attr(stroke.dash());
        let fill_opacity = self.opacity_attr("fill-opacity", fill_opacity);
        let stroke_opacity = self.opacity_attr("stroke-opacity", stroke.opacity());
        let _ = writeln!(
            self.out,
            r#"<polygon points="{pts}" fill="{fill}"{fill_opacity} stroke="{}"{stroke_opacity} stroke-width="{}"{dash} stroke-linejoin="round"/>"#,
            stroke.color(),
            self.num(stroke.width()),
        );
    }

    /// Open polyline path; styling comes from the enclosing group.
    pub fn path(&mut self, points: &[Point2]) {
        if points.is_empty() {
            return;
        }
        self.pad();
        let d = self.points(points, " ", |i| if i == 0 { "M" } else { "L" });
        let _ = writeln!(self.out, r#"<path d="{d}"/>"#);
    }

    pub fn line(&mut self, from: &Point2, to: &Point2, color: Rgb, width: f64) {
        self.pad();
        let _ = writeln!(
            self.out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="{}" stroke-linecap="round"/>"#,
            self.num(from.x),
            self.num(from.y),
            self.num(to.x),
            self.num(to.y),
            self.num(width),
        );
    }

    pub fn text(&mut self, at: &Point2, text: &str, class: &str) {
        self.pad();
        let _ = writeln!(
            self.out,
            r#"<text x="{}" y="{}" class="{}">{}</text>"#,
            self.num(at.x),
            self.num(at.y),
            escape(class),
            escape(text),
        );
    }

    /// Embedded stylesheet with a single rule.
    pub fn style(&mut self, selector: &str, rule: &str) {
        self.pad();
        let _ = writeln!(self.out, "<style>.{} {{ {rule} }}</style>", escape(selector));
    }

    /// Closes the root element and returns the document.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.out.push_str("</svg>\n");
        self.out
    }
}
