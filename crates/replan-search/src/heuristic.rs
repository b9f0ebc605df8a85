//! Heuristic strategies.
//!
//! The strategy is picked once when an engine is built and resolved to a plain function
//! pointer; the drain loop never re-dispatches on the tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use replan_core::constants::EARTH_RADIUS_METERS;

use crate::graph::VertexData;

/// Estimated remaining cost between two vertices.
pub type HeuristicFn = fn(&VertexData, &VertexData) -> f64;

/// Available heuristic strategies.
///
/// Strategy choice changes expansion order only. Every strategy except [`Greedy`]
/// still yields the optimal path provided it never overestimates the edge weights
/// of the graph at hand.
///
/// [`Greedy`]: HeuristicKind::Greedy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Always 0; the search degrades to uniform-cost order.
    #[default]
    Zero,
    Euclidean,
    Manhattan,
    Chebyshev,
    /// Eight-connected grid distance.
    Octile,
    /// Great-circle distance in meters over `geo` coordinates.
    Haversine,
    /// Twice the haversine distance. Inadmissible on purpose: faster, not optimal.
    Greedy,
}

impl HeuristicKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Chebyshev => "chebyshev",
            Self::Octile => "octile",
            Self::Haversine => "haversine",
            Self::Greedy => "greedy",
        }
    }

    /// All strategies.
    pub fn all() -> &'static [HeuristicKind] {
        &[
            Self::Zero,
            Self::Euclidean,
            Self::Manhattan,
            Self::Chebyshev,
            Self::Octile,
            Self::Haversine,
            Self::Greedy,
        ]
    }

    /// Whether the strategy can overestimate by construction.
    pub fn is_admissible(&self) -> bool {
        !matches!(self, Self::Greedy)
    }

    /// Resolve the strategy to its function.
    pub fn resolve(self) -> HeuristicFn {
        match self {
            Self::Zero => zero,
            Self::Euclidean => euclidean,
            Self::Manhattan => manhattan,
            Self::Chebyshev => chebyshev,
            Self::Octile => octile,
            Self::Haversine => haversine,
            Self::Greedy => greedy,
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown heuristic '{0}'")]
pub struct UnknownHeuristic(pub String);

impl FromStr for HeuristicKind {
    type Err = UnknownHeuristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == lowered)
            .ok_or(UnknownHeuristic(s.to_string()))
    }
}

// Missing coordinates produce 0, which keeps every strategy admissible.

fn planar_delta(a: &VertexData, b: &VertexData) -> Option<(f64, f64)> {
    let (pa, pb) = (a.position?, b.position?);
    Some(((pa.x - pb.x).abs(), (pa.y - pb.y).abs()))
}

fn zero(_: &VertexData, _: &VertexData) -> f64 {
    0.0
}

fn euclidean(a: &VertexData, b: &VertexData) -> f64 {
    planar_delta(a, b).map_or(0.0, |(dx, dy)| dx.hypot(dy))
}

fn manhattan(a: &VertexData, b: &VertexData) -> f64 {
    planar_delta(a, b).map_or(0.0, |(dx, dy)| dx + dy)
}

fn chebyshev(a: &VertexData, b: &VertexData) -> f64 {
    planar_delta(a, b).map_or(0.0, |(dx, dy)| dx.max(dy))
}

fn octile(a: &VertexData, b: &VertexData) -> f64 {
    planar_delta(a, b).map_or(0.0, |(dx, dy)| {
        dx.max(dy) + (std::f64::consts::SQRT_2 - 1.0) * dx.min(dy)
    })
}

fn haversine(a: &VertexData, b: &VertexData) -> f64 {
    let (Some(ga), Some(gb)) = (a.geo, b.geo) else {
        return 0.0;
    };
    let (lat1, lat2) = (ga.lat.to_radians(), gb.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlng = (gb.lng - ga.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

fn greedy(a: &VertexData, b: &VertexData) -> f64 {
    2.0 * haversine(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_planar_strategies() {
        let a = VertexData::at("a", 0.0, 0.0);
        let b = VertexData::at("b", 3.0, 4.0);
        assert!(close(HeuristicKind::Zero.resolve()(&a, &b), 0.0));
        assert!(close(HeuristicKind::Euclidean.resolve()(&a, &b), 5.0));
        assert!(close(HeuristicKind::Manhattan.resolve()(&a, &b), 7.0));
        assert!(close(HeuristicKind::Chebyshev.resolve()(&a, &b), 4.0));
        assert!(close(
            HeuristicKind::Octile.resolve()(&a, &b),
            4.0 + (std::f64::consts::SQRT_2 - 1.0) * 3.0
        ));
    }

    #[test]
    fn test_haversine_known_distance() {
        // One degree of latitude is about 111.2 km.
        let a = VertexData::geo("a", 0.0, 0.0);
        let b = VertexData::geo("b", 1.0, 0.0);
        let d = HeuristicKind::Haversine.resolve()(&a, &b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
        assert!(close(HeuristicKind::Greedy.resolve()(&a, &b), 2.0 * d));
    }

    #[test]
    fn test_missing_coordinates_yield_zero() {
        let a = VertexData::new("a");
        let b = VertexData::at("b", 10.0, 10.0);
        for kind in HeuristicKind::all() {
            assert_eq!(kind.resolve()(&a, &b), 0.0, "{kind}");
        }
    }

    #[test]
    fn test_parse_names() {
        for kind in HeuristicKind::all() {
            assert_eq!(kind.name().parse::<HeuristicKind>().unwrap(), *kind);
        }
        assert_eq!(" Octile ".parse::<HeuristicKind>().unwrap(), HeuristicKind::Octile);
        assert!("astar".parse::<HeuristicKind>().is_err());
        assert!(!HeuristicKind::Greedy.is_admissible());
        assert!(HeuristicKind::Haversine.is_admissible());
    }
}
