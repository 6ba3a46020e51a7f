use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::debug;

use crate::math::Point2;
use crate::render::{ClassifiedEdge, EdgeClass, RenderResult, ShadedFace};
use crate::scene::PartId;

/// How edge strokes are layered relative to face fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeLayering {
    /// Edges are sorted into the face order by their nearest point, so a
    /// nearer face paints over an edge behind it.
    #[default]
    Interleaved,
    /// All faces first, then one layer per edge class.
    OnTop,
}

/// Stacking order of edge classes drawn without faces in between,
/// bottom first.
pub const CLASS_ORDER: [EdgeClass; 4] = [
    EdgeClass::Hidden,
    EdgeClass::VisibleSmoothWire,
    EdgeClass::VisibleSharpWire,
    EdgeClass::VisibleOutline,
];

/// Connected edges of one class merged into a polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub class: EdgeClass,
    pub points: Vec<Point2>,
    /// Depth of the nearest merged edge.
    pub depth: f64,
}

/// A drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Face(ShadedFace),
    Path(EdgePath),
}

/// Primitives in painting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    items: Vec<DrawItem>,
}

impl DrawList {
    #[must_use]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn paths(&self) -> impl Iterator<Item = &EdgePath> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Path(p) => Some(p),
            DrawItem::Face(_) => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Merges classified edges into polylines and orders them with the shaded
/// faces for painting.
///
/// Edges of classes without a configured style are dropped. Only edges that
/// end up adjacent in painting order are merged, so merging never moves an
/// edge across a face.
pub struct BuildPaths {
    layering: EdgeLayering,
    styled: BTreeSet<EdgeClass>,
}

impl BuildPaths {
    /// Creates a new `BuildPaths` operation drawing the `styled` classes.
    #[must_use]
    pub fn new(layering: EdgeLayering, styled: impl IntoIterator<Item = EdgeClass>) -> Self {
        Self {
            layering,
            styled: styled.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn execute(&self, result: &RenderResult) -> DrawList {
        self.build(result.faces(), result.edges())
    }

    fn build(&self, faces: &[ShadedFace], edges: &[ClassifiedEdge]) -> DrawList {
        let mut edges = edges
            .iter()
            .filter(|e| self.styled.contains(&e.class))
            .peekable();
        let mut items = Vec::with_capacity(faces.len());
        let mut run = Vec::new();

        match self.layering {
            EdgeLayering::Interleaved => {
                for face in faces {
                    while let Some(edge) = edges.next_if(|e| e.depth < face.depth) {
                        run.push(edge);
                    }
                    flush_run(&mut items, &mut run);
                    items.push(DrawItem::Face(face.clone()));
                }
            }
            EdgeLayering::OnTop => {
                items.extend(faces.iter().cloned().map(DrawItem::Face));
            }
        }
        run.extend(edges);
        flush_run(&mut items, &mut run);

        let list = DrawList { items };
        debug!(
            items = list.len(),
            paths = list.paths().count(),
            "draw list built"
        );
        list
    }
}

fn flush_run(items: &mut Vec<DrawItem>, run: &mut Vec<&ClassifiedEdge>) {
    if run.is_empty() {
        return;
    }
    for class in CLASS_ORDER {
        let of_class: Vec<&ClassifiedEdge> = run.iter().copied().filter(|e| e.class == class).collect();
        items.extend(chain(class, &of_class).into_iter().map(DrawItem::Path));
    }
    run.clear();
}

/// Chains edges sharing a vertex of the same part into polylines.
///
/// Each chain starts at the lowest unused edge and always continues with
/// the lowest unused edge at its end.
fn chain(class: EdgeClass, edges: &[&ClassifiedEdge]) -> Vec<EdgePath> {
    let mut at: HashMap<(PartId, usize), Vec<usize>> = HashMap::new();
    for (i, e) in edges.iter().enumerate() {
        for v in e.vertices {
            at.entry((e.edge.part, v)).or_default().push(i);
        }
    }
    let mut used = vec![false; edges.len()];
    let mut paths = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let first = edges[start];
        let part = first.edge.part;
        let mut points = VecDeque::from(first.screen);
        let mut depth = first.depth;
        let [mut head, mut tail] = first.vertices;

        for forward in [true, false] {
            loop {
                let end = if forward { tail } else { head };
                let Some(next) = at
                    .get(&(part, end))
                    .and_then(|list| list.iter().copied().find(|&i| !used[i]))
                else {
                    break;
                };
                used[next] = true;
                let edge = edges[next];
                let far = usize::from(edge.vertices[0] == end);
                depth = depth.max(edge.depth);
                if forward {
                    tail = edge.vertices[far];
                    points.push_back(edge.screen[far]);
                } else {
                    head = edge.vertices[far];
                    points.push_front(edge.screen[far]);
                }
            }
        }

        paths.push(EdgePath {
            class,
            points: points.into(),
            depth,
        });
    }
    paths
}
