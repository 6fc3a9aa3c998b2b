//! Input ingestion: vertex rings and local minima.
//!
//! Every input path becomes a circular doubly-linked ring of [`Vertex`]es in
//! a shared arena. While building the ring we also find the path's local
//! minima (where a bound starts climbing) and flag its local maxima (where a
//! bound ends). The sweep consumes the minima in order of decreasing `y`.

use crate::geom::Point64;
use crate::paths::Path64;
use crate::PathType;

/// An index into a [`VertexVec`].
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct VertexIdx(pub usize);

/// The arena holding every input vertex of a clipping operation.
#[derive(Clone)]
pub(crate) struct VertexVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(VertexVec, VertexIdx, "v");

/// The role a vertex plays in the sweep.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct VertexFlags(u8);

impl VertexFlags {
    pub const NONE: VertexFlags = VertexFlags(0);
    pub const OPEN_START: VertexFlags = VertexFlags(1);
    pub const OPEN_END: VertexFlags = VertexFlags(2);
    pub const LOCAL_MAX: VertexFlags = VertexFlags(4);
    pub const LOCAL_MIN: VertexFlags = VertexFlags(8);

    pub fn contains(self, other: VertexFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: VertexFlags) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for VertexFlags {
    type Output = VertexFlags;

    fn bitor(self, rhs: VertexFlags) -> VertexFlags {
        VertexFlags(self.0 | rhs.0)
    }
}

impl std::fmt::Debug for VertexFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = [
            (VertexFlags::OPEN_START, "OpenStart"),
            (VertexFlags::OPEN_END, "OpenEnd"),
            (VertexFlags::LOCAL_MAX, "LocalMax"),
            (VertexFlags::LOCAL_MIN, "LocalMin"),
        ];
        let mut set = f.debug_set();
        for (flag, name) in names {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// One corner of an input path.
#[derive(Clone, Debug)]
pub(crate) struct Vertex {
    pub pt: Point64,
    pub next: VertexIdx,
    pub prev: VertexIdx,
    pub flags: VertexFlags,
}

/// The bottom of a pair of bounds.
///
/// Two local minima compare equal if they start at the same vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LocalMinima {
    pub vertex: VertexIdx,
    pub polytype: PathType,
    pub is_open: bool,
}

fn add_loc_min(
    vertices: &mut VertexVec<Vertex>,
    v: VertexIdx,
    polytype: PathType,
    is_open: bool,
    minima: &mut Vec<LocalMinima>,
) {
    // Each vertex starts at most one pair of bounds.
    if vertices[v].flags.contains(VertexFlags::LOCAL_MIN) {
        return;
    }
    vertices[v].flags.insert(VertexFlags::LOCAL_MIN);
    minima.push(LocalMinima {
        vertex: v,
        polytype,
        is_open,
    });
}

/// Appends rings for `paths` to `vertices`, and their local minima to `minima`.
///
/// Consecutive duplicate points are skipped, as is the closing point of a
/// closed path that repeats its first point. Paths with fewer than two
/// distinct points, and closed paths that are entirely horizontal, add no
/// minima.
pub(crate) fn add_paths_to_vertex_list(
    paths: &[Path64],
    polytype: PathType,
    is_open: bool,
    minima: &mut Vec<LocalMinima>,
    vertices: &mut VertexVec<Vertex>,
) {
    vertices.reserve(paths.iter().map(Vec::len).sum());

    for path in paths {
        let Some(&first) = path.first() else {
            continue;
        };
        let v0 = vertices.push(Vertex {
            pt: first,
            next: vertices.next_idx(),
            prev: vertices.next_idx(),
            flags: VertexFlags::NONE,
        });
        let mut prev_v = v0;
        let mut count = 1;
        for &pt in &path[1..] {
            if vertices[prev_v].pt != pt {
                let curr_v = vertices.push(Vertex {
                    pt,
                    next: v0,
                    prev: prev_v,
                    flags: VertexFlags::NONE,
                });
                vertices[prev_v].next = curr_v;
                prev_v = curr_v;
                count += 1;
            }
        }
        if count < 2 {
            continue;
        }
        if !is_open && vertices[prev_v].pt == vertices[v0].pt {
            prev_v = vertices[prev_v].prev;
            count -= 1;
        }
        vertices[prev_v].next = v0;
        vertices[v0].prev = prev_v;
        if !is_open && count < 2 {
            continue;
        }

        let v0_y = vertices[v0].pt.y;
        let mut going_up;
        if is_open {
            let mut curr_v = vertices[v0].next;
            while curr_v != v0 && vertices[curr_v].pt.y == v0_y {
                curr_v = vertices[curr_v].next;
            }
            going_up = vertices[curr_v].pt.y <= v0_y;
            if going_up {
                vertices[v0].flags = VertexFlags::OPEN_START;
                add_loc_min(vertices, v0, polytype, true, minima);
            } else {
                vertices[v0].flags = VertexFlags::OPEN_START | VertexFlags::LOCAL_MAX;
            }
        } else {
            let mut p = vertices[v0].prev;
            while p != v0 && vertices[p].pt.y == v0_y {
                p = vertices[p].prev;
            }
            if p == v0 {
                // Only open paths can be completely flat.
                continue;
            }
            going_up = vertices[p].pt.y > v0_y;
        }

        let going_up0 = going_up;
        let mut prev_v = v0;
        let mut curr_v = vertices[v0].next;
        while curr_v != v0 {
            let (curr_y, prev_y) = (vertices[curr_v].pt.y, vertices[prev_v].pt.y);
            if curr_y > prev_y && going_up {
                vertices[prev_v].flags.insert(VertexFlags::LOCAL_MAX);
                going_up = false;
            } else if curr_y < prev_y && !going_up {
                going_up = true;
                add_loc_min(vertices, prev_v, polytype, is_open, minima);
            }
            prev_v = curr_v;
            curr_v = vertices[curr_v].next;
        }

        if is_open {
            vertices[prev_v].flags.insert(VertexFlags::OPEN_END);
            if going_up {
                vertices[prev_v].flags.insert(VertexFlags::LOCAL_MAX);
            } else {
                add_loc_min(vertices, prev_v, polytype, is_open, minima);
            }
        } else if going_up != going_up0 {
            if going_up0 {
                add_loc_min(vertices, prev_v, polytype, false, minima);
            } else {
                vertices[prev_v].flags.insert(VertexFlags::LOCAL_MAX);
            }
        }
    }
}

/// Sorts local minima by decreasing `y`, then increasing `x`.
///
/// The sort is stable, so minima at the same point keep their insertion order.
pub(crate) fn sort_local_minima(minima: &mut [LocalMinima], vertices: &VertexVec<Vertex>) {
    minima.sort_by(|a, b| {
        let (pa, pb) = (vertices[a.vertex].pt, vertices[b.vertex].pt);
        pb.y.cmp(&pa.y).then(pa.x.cmp(&pb.x))
    });
}

/// Pre-processed input that can seed several clipping operations.
///
/// Building vertex rings and finding local minima is a noticeable part of the
/// cost of a clipping operation. When the same subject (or clip) paths take
/// part in several operations, ingest them once here and hand the result to
/// [`Clipper64::add_reusable_data`](crate::Clipper64::add_reusable_data).
#[derive(Clone, Default)]
pub struct ReusableData {
    pub(crate) vertices: VertexVec<Vertex>,
    pub(crate) minima: Vec<LocalMinima>,
    pub(crate) has_open_paths: bool,
}

impl std::fmt::Debug for ReusableData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReusableData")
            .field("vertices", &self.vertices.len())
            .field("minima", &self.minima.len())
            .field("has_open_paths", &self.has_open_paths)
            .finish()
    }
}

impl ReusableData {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests closed or open paths of the given type.
    pub fn add_paths(&mut self, paths: &[Path64], polytype: PathType, is_open: bool) {
        if paths.is_empty() {
            return;
        }
        self.has_open_paths |= is_open;
        add_paths_to_vertex_list(
            paths,
            polytype,
            is_open,
            &mut self.minima,
            &mut self.vertices,
        );
    }

    /// Forgets everything ingested so far.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.minima.clear();
        self.has_open_paths = false;
    }

    /// Copies everything from `other` in after what's already here.
    pub(crate) fn append(&mut self, other: &ReusableData) {
        let offset = self.vertices.len();
        let shift = |v: VertexIdx| VertexIdx(v.0 + offset);
        self.vertices.reserve(other.vertices.len());
        for (_, v) in other.vertices.iter() {
            self.vertices.push(Vertex {
                pt: v.pt,
                next: shift(v.next),
                prev: shift(v.prev),
                flags: v.flags,
            });
        }
        self.minima.extend(other.minima.iter().map(|lm| LocalMinima {
            vertex: shift(lm.vertex),
            ..*lm
        }));
        self.has_open_paths |= other.has_open_paths;
    }

    /// The number of local minima found so far.
    pub fn local_minima_count(&self) -> usize {
        self.minima.len()
    }

    /// Has nothing been ingested?
    pub fn is_empty(&self) -> bool {
        self.minima.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::make_path64;

    fn ingest(paths: &[Path64], is_open: bool) -> (Vec<LocalMinima>, VertexVec<Vertex>) {
        let mut minima = Vec::new();
        let mut vertices = VertexVec::default();
        add_paths_to_vertex_list(paths, PathType::Subject, is_open, &mut minima, &mut vertices);
        (minima, vertices)
    }

    #[test]
    fn square_has_one_minimum() {
        let (minima, vertices) = ingest(&[make_path64(&[0, 0, 100, 0, 100, 100, 0, 100])], false);
        assert_eq!(minima.len(), 1);
        // The minimum is the bottom-most vertex where the ring starts climbing.
        assert_eq!(vertices[minima[0].vertex].pt.y, 100);
        let maxima = vertices
            .iter()
            .filter(|(_, v)| v.flags.contains(VertexFlags::LOCAL_MAX))
            .count();
        assert_eq!(maxima, 1);
    }

    #[test]
    fn zigzag_minima() {
        // A "W" shape has two minima and two maxima.
        let w = make_path64(&[0, 0, 10, 20, 20, 5, 30, 20, 40, 0, 20, -10]);
        let (minima, _) = ingest(&[w], false);
        assert_eq!(minima.len(), 2);
    }

    #[test]
    fn duplicates_and_closing_points_are_skipped() {
        let p = make_path64(&[0, 0, 0, 0, 10, 10, 10, 10, 0, 10, 0, 0]);
        let (minima, vertices) = ingest(&[p], false);
        assert_eq!(vertices.len(), 4);
        assert_eq!(minima.len(), 1);
        // The ring closes over the three distinct points.
        let start = minima[0].vertex;
        let mut v = start;
        let mut n = 0;
        loop {
            v = vertices[v].next;
            n += 1;
            if v == start {
                break;
            }
        }
        assert_eq!(n, 3);
    }

    #[test]
    fn degenerate_paths_contribute_nothing() {
        let (minima, _) = ingest(&[make_path64(&[5, 5]), make_path64(&[5, 5, 5, 5])], false);
        assert!(minima.is_empty());
        let (minima, _) = ingest(&[make_path64(&[0, 0, 10, 0, 20, 0])], false);
        assert!(minima.is_empty());
    }

    #[test]
    fn open_paths() {
        let (minima, vertices) = ingest(&[make_path64(&[0, 10, 5, 0, 10, 10])], true);
        assert_eq!(minima.len(), 2);
        assert!(minima.iter().all(|m| m.is_open));
        let first = &vertices[VertexIdx(0)];
        assert!(first.flags.contains(VertexFlags::OPEN_START));
        assert!(vertices[VertexIdx(2)].flags.contains(VertexFlags::OPEN_END));
        assert!(vertices[VertexIdx(1)].flags.contains(VertexFlags::LOCAL_MAX));

        // A flat open path is its own minimum.
        let (minima, _) = ingest(&[make_path64(&[0, 0, 10, 0])], true);
        assert_eq!(minima.len(), 1);
    }

    #[test]
    fn minima_sort_order() {
        let paths = vec![
            make_path64(&[0, 0, 10, 0, 10, 10]),
            make_path64(&[50, 0, 60, 0, 60, 30]),
            make_path64(&[-50, 0, -40, 0, -40, 30]),
        ];
        let (mut minima, vertices) = ingest(&paths, false);
        sort_local_minima(&mut minima, &vertices);
        let pts: Vec<_> = minima.iter().map(|m| vertices[m.vertex].pt).collect();
        assert_eq!(pts, vec![Point64::new(-40, 30), Point64::new(60, 30), Point64::new(10, 10)]);
    }

    #[test]
    fn reusable_data_debug_is_a_summary() {
        let mut data = ReusableData::new();
        data.add_paths(&[make_path64(&[0, 0, 10, 0, 10, 10, 0, 10])], PathType::Subject, false);
        assert_eq!(
            format!("{data:?}"),
            "ReusableData { vertices: 4, minima: 1, has_open_paths: false }"
        );
    }
}
