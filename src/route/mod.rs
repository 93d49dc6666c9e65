//! 路线层：站点、距离模型、路线求解

pub mod distance;
pub mod solver;
pub mod stop;

pub use distance::{build_cost_matrix, CostMatrix};
pub use solver::{plan_route, CheapestArcSolver, RoutePlan, RouteSolver, Tour};
pub use stop::{synthetic_stops, Position, Stop, DEFAULT_HOUSES, DEPOT_INDEX};
