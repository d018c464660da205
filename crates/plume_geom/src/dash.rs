//! Dash pattern splitting
//!
//! Cuts a flattened centerline into the "on" runs of a dash pattern before
//! outline generation. Each emitted run is an open polyline that gets capped
//! and joined independently.

use crate::flatten::Polyline;
use plume_core::Point;

fn lerp(a: Point, b: Point, t: f32) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Split a polyline into the on-runs of `pattern`, starting `offset` into
/// the pattern.
///
/// The pattern alternates on/off lengths starting with on; a negative offset
/// wraps. An empty or zero-length pattern leaves the polyline whole. For a
/// closed polyline the closing edge participates, and a run still active at
/// the end wraps around to merge with the run at the start point.
pub fn split_dashes(polyline: &Polyline, pattern: &[f32], offset: f32) -> Vec<Polyline> {
    let total: f32 = pattern.iter().sum();
    if pattern.is_empty() || total <= 0.0 {
        return vec![polyline.clone()];
    }
    let points = &polyline.points;
    if points.len() < 2 {
        return Vec::new();
    }

    // Advance to the pattern position named by the offset.
    let mut idx = 0usize;
    let mut remaining = pattern[0];
    let mut pos = offset.rem_euclid(total);
    while pos >= remaining {
        pos -= remaining;
        idx = (idx + 1) % pattern.len();
        remaining = pattern[idx];
    }
    remaining -= pos;
    let mut on = idx % 2 == 0;
    // Entries of zero length toggle instantly.
    while remaining <= 0.0 {
        on = !on;
        idx = (idx + 1) % pattern.len();
        remaining = pattern[idx];
    }
    let started_on = on;

    let mut runs: Vec<Polyline> = Vec::new();
    let mut run: Vec<Point> = Vec::new();
    if on {
        run.push(points[0]);
    }

    let flush = |run: &mut Vec<Point>, runs: &mut Vec<Polyline>| {
        if run.len() >= 2 {
            runs.push(Polyline::new(std::mem::take(run), false));
        } else {
            run.clear();
        }
    };

    let segment_count = if polyline.closed {
        points.len()
    } else {
        points.len() - 1
    };
    for i in 0..segment_count {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let seg_len = a.distance(b);
        if seg_len <= 0.0 {
            continue;
        }
        let mut consumed = 0.0;
        while seg_len - consumed > remaining {
            consumed += remaining;
            let cut = lerp(a, b, consumed / seg_len);
            if on {
                run.push(cut);
                flush(&mut run, &mut runs);
            } else {
                run.clear();
                run.push(cut);
            }
            on = !on;
            idx = (idx + 1) % pattern.len();
            remaining = pattern[idx];
            while remaining <= 0.0 {
                on = !on;
                idx = (idx + 1) % pattern.len();
                remaining = pattern[idx];
            }
        }
        remaining -= seg_len - consumed;
        if on {
            run.push(b);
        }
    }

    if on {
        if polyline.closed && started_on && !runs.is_empty() {
            // The trailing run ends where the leading run began; splice them.
            let first = runs.remove(0);
            run.extend(first.points.into_iter().skip(1));
            runs.insert(0, Polyline::new(run, false));
        } else {
            flush(&mut run, &mut runs);
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(len: f32) -> Polyline {
        Polyline::new(vec![Point::ZERO, Point::new(len, 0.0)], false)
    }

    #[test]
    fn test_simple_pattern() {
        let runs = split_dashes(&line(10.0), &[2.0, 3.0], 0.0);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].points, vec![Point::ZERO, Point::new(2.0, 0.0)]);
        assert_eq!(
            runs[1].points,
            vec![Point::new(5.0, 0.0), Point::new(7.0, 0.0)]
        );
    }

    #[test]
    fn test_offset_shifts_phase() {
        // Offset 2 starts inside the off entry.
        let runs = split_dashes(&line(10.0), &[2.0, 3.0], 2.0);
        assert_eq!(runs.len(), 2);
        assert_eq!(
            runs[0].points,
            vec![Point::new(3.0, 0.0), Point::new(5.0, 0.0)]
        );
        assert_eq!(
            runs[1].points,
            vec![Point::new(8.0, 0.0), Point::new(10.0, 0.0)]
        );
    }

    #[test]
    fn test_negative_offset_wraps() {
        let a = split_dashes(&line(10.0), &[2.0, 3.0], -5.0);
        let b = split_dashes(&line(10.0), &[2.0, 3.0], 0.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_pattern_is_solid() {
        let runs = split_dashes(&line(10.0), &[], 0.0);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0], line(10.0));
    }

    #[test]
    fn test_run_crosses_vertices() {
        // An on run spanning a corner keeps the corner vertex.
        let bent = Polyline::new(
            vec![Point::ZERO, Point::new(4.0, 0.0), Point::new(4.0, 4.0)],
            false,
        );
        let runs = split_dashes(&bent, &[6.0, 1.0], 0.0);
        assert_eq!(
            runs[0].points,
            vec![Point::ZERO, Point::new(4.0, 0.0), Point::new(4.0, 2.0)]
        );
    }

    #[test]
    fn test_closed_polyline_wraps_trailing_run() {
        // 4x4 square, perimeter 16, pattern [3, 1] at offset 2: the run
        // active when the closing edge ends merges with the run that began
        // at the first vertex.
        let square = Polyline::new(
            vec![
                Point::ZERO,
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(0.0, 4.0),
            ],
            true,
        );
        let runs = split_dashes(&square, &[3.0, 1.0], 2.0);
        assert_eq!(runs.len(), 4);
        // The merged run crosses the start corner seamlessly.
        assert_eq!(runs[0].points.first(), Some(&Point::new(0.0, 2.0)));
        assert_eq!(
            runs[0].points,
            vec![Point::new(0.0, 2.0), Point::ZERO, Point::new(1.0, 0.0)]
        );
    }
}
