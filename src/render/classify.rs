use std::fmt;

use crate::mesh::{Adjacency, Continuity};

use super::visibility::Facing;

/// Drawing category of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeClass {
    /// Visible boundary edge or silhouette between a front and a back face.
    VisibleOutline,
    /// Visible crease: dihedral angle above the sharp threshold, or flagged
    /// sharp by the geometry source.
    VisibleSharpWire,
    /// Visible edge across a smooth surface.
    VisibleSmoothWire,
    /// Occluded by a nearer face.
    Hidden,
}

impl EdgeClass {
    pub const ALL: [Self; 4] = [
        Self::VisibleOutline,
        Self::VisibleSharpWire,
        Self::VisibleSmoothWire,
        Self::Hidden,
    ];

    #[must_use]
    pub fn is_visible(self) -> bool {
        self != Self::Hidden
    }

    /// Identifier used for SVG group ids.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::VisibleOutline => "outline",
            Self::VisibleSharpWire => "sharp",
            Self::VisibleSmoothWire => "smooth",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for EdgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the faces next to an edge face the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFacing {
    /// Exactly one usable adjacent face.
    Boundary,
    /// One front and one back face.
    Silhouette,
    /// Both faces point the same way.
    Same(Facing),
    /// No usable adjacent face.
    Unknown,
}

impl EdgeFacing {
    /// Combines the facing of the adjacent faces; `facing_of` yields `None`
    /// for faces skipped during rendering.
    pub fn from_adjacency<F>(adjacency: &Adjacency, facing_of: F) -> Self
    where
        F: Fn(usize) -> Option<Facing>,
    {
        match adjacency {
            Adjacency::Boundary(f) => {
                if facing_of(*f).is_some() {
                    Self::Boundary
                } else {
                    Self::Unknown
                }
            }
            Adjacency::Interior(f0, f1) => match (facing_of(*f0), facing_of(*f1)) {
                (Some(a), Some(b)) if a == b => Self::Same(a),
                (Some(_), Some(_)) => Self::Silhouette,
                (Some(_), None) | (None, Some(_)) => Self::Boundary,
                (None, None) => Self::Unknown,
            },
        }
    }
}

/// Assigns each edge exactly one [`EdgeClass`].
#[derive(Debug, Clone, Copy)]
pub struct EdgeClassifier {
    sharp_angle: f64,
}

impl EdgeClassifier {
    /// `sharp_angle` is the dihedral angle in radians above which an interior
    /// edge is a sharp wire. Edges flagged [`Continuity::Sharp`] are sharp
    /// wires at any angle.
    #[must_use]
    pub fn new(sharp_angle: f64) -> Self {
        Self { sharp_angle }
    }

    #[must_use]
    pub fn classify(
        &self,
        facing: EdgeFacing,
        dihedral: Option<f64>,
        continuity: Continuity,
        hidden: bool,
    ) -> EdgeClass {
        if hidden {
            return EdgeClass::Hidden;
        }
        match facing {
            EdgeFacing::Boundary | EdgeFacing::Silhouette => EdgeClass::VisibleOutline,
            EdgeFacing::Same(_) | EdgeFacing::Unknown => {
                let creased = dihedral.is_some_and(|angle| angle > self.sharp_angle);
                if creased || continuity == Continuity::Sharp {
                    EdgeClass::VisibleSharpWire
                } else {
                    EdgeClass::VisibleSmoothWire
                }
            }
        }
    }
}
