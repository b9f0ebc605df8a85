//! Workspace-wide constants.

/// Environment variable read by [`crate::tracing::init_tracing`].
pub const LOG_ENV_VAR: &str = "REPLAN_LOG";

/// Filter used when `REPLAN_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "replan=info";

/// Project-level configuration file name.
pub const CONFIG_FILE_NAME: &str = "replan.toml";

/// Default multiplier applied to the vertex count to derive the iteration budget.
pub const DEFAULT_ITERATION_FACTOR: usize = 8;

/// Lower bound of the derived iteration budget, so tiny graphs are not starved.
pub const DEFAULT_ITERATION_FLOOR: usize = 64;

/// Extra steps granted to a path walk beyond the vertex count.
pub const LINK_WALK_SLACK: usize = 8;

/// Mean Earth radius in meters, used by the haversine heuristic.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
