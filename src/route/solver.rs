//! 路线求解：由代价矩阵得到从仓库出发、回到仓库的访问顺序
//!
//! RouteSolver 是可插拔的策略接口（贪心 / 精确 / 元启发式），Tour 契约不随实现变化。
//! 默认策略为最便宜弧贪心：每步从当前端点走向代价最小的未访问站点，平局取下标最小者，
//! 保证相同输入得到相同路线。无可行路线时返回 SolverFailure，由 plan_route 回退为输入顺序。

use crate::core::RouteError;
use crate::route::distance::CostMatrix;
use crate::route::stop::DEPOT_INDEX;

/// 完整访问顺序：以仓库开头和结尾，其余站点各出现一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    sequence: Vec<usize>,
}

impl Tour {
    /// 校验后构建：size 为矩阵大小（含仓库）
    pub fn new(sequence: Vec<usize>, size: usize, depot: usize) -> Result<Self, RouteError> {
        let tour = Self { sequence };
        tour.validate(size, depot)?;
        Ok(tour)
    }

    /// 按输入下标顺序访问（求解失败时的回退路线）
    pub fn in_input_order(size: usize, depot: usize) -> Self {
        let mut sequence = Vec::with_capacity(size + 1);
        sequence.push(depot);
        sequence.extend((0..size).filter(|&i| i != depot));
        sequence.push(depot);
        Self { sequence }
    }

    /// 完整序列（含两端仓库）
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// 去掉两端仓库后的派送顺序
    pub fn stops(&self) -> &[usize] {
        let len = self.sequence.len();
        if len <= 2 {
            &[]
        } else {
            &self.sequence[1..len - 1]
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// 路线总代价；任意一段不可达时返回 None
    pub fn total_cost(&self, matrix: &CostMatrix) -> Option<u64> {
        self.sequence.windows(2).try_fold(0u64, |acc, pair| {
            if matrix.is_reachable(pair[0], pair[1]) {
                acc.checked_add(matrix.cost(pair[0], pair[1]))
            } else {
                None
            }
        })
    }

    fn validate(&self, size: usize, depot: usize) -> Result<(), RouteError> {
        let seq = &self.sequence;
        if seq.len() != size + 1 {
            return Err(RouteError::SolverFailure(format!(
                "tour has {} entries, expected {}",
                seq.len(),
                size + 1
            )));
        }
        if seq.first() != Some(&depot) || seq.last() != Some(&depot) {
            return Err(RouteError::SolverFailure(
                "tour must start and end at the depot".into(),
            ));
        }
        let mut seen = vec![false; size];
        for &idx in self.stops() {
            if idx >= size || idx == depot || seen[idx] {
                return Err(RouteError::SolverFailure(format!(
                    "stop {} is out of range or visited twice",
                    idx
                )));
            }
            seen[idx] = true;
        }
        Ok(())
    }
}

/// 路线求解策略（单车辆）
pub trait RouteSolver: Send + Sync {
    /// 策略名称（日志用）
    fn name(&self) -> &'static str;

    /// 求解：返回从 depot 出发并回到 depot 的 Tour，无可行解时返回 SolverFailure
    fn solve(&self, matrix: &CostMatrix, depot: usize) -> Result<Tour, RouteError>;
}

/// 最便宜弧贪心构造（启发式，不保证最优）
#[derive(Debug, Default, Clone, Copy)]
pub struct CheapestArcSolver;

impl RouteSolver for CheapestArcSolver {
    fn name(&self) -> &'static str {
        "cheapest-arc"
    }

    fn solve(&self, matrix: &CostMatrix, depot: usize) -> Result<Tour, RouteError> {
        let size = matrix.size();
        if depot >= size {
            return Err(RouteError::InvalidInput(format!(
                "depot index {} outside matrix of size {}",
                depot, size
            )));
        }

        let mut visited = vec![false; size];
        visited[depot] = true;
        let mut sequence = Vec::with_capacity(size + 1);
        sequence.push(depot);
        let mut current = depot;

        for _ in 1..size {
            let mut best: Option<(usize, u64)> = None;
            for next in 0..size {
                if visited[next] || !matrix.is_reachable(current, next) {
                    continue;
                }
                let cost = matrix.cost(current, next);
                // 严格小于：平局时保留先遇到的（下标更小的）站点
                if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                    best = Some((next, cost));
                }
            }
            let (next, _) = best.ok_or_else(|| {
                RouteError::SolverFailure(format!(
                    "no reachable unvisited stop from {}",
                    current
                ))
            })?;
            visited[next] = true;
            sequence.push(next);
            current = next;
        }

        if !matrix.is_reachable(current, depot) {
            return Err(RouteError::SolverFailure(format!(
                "depot unreachable from last stop {}",
                current
            )));
        }
        sequence.push(depot);

        Tour::new(sequence, size, depot)
    }
}

/// 规划结果：路线、总代价、是否为回退路线
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    pub tour: Tour,
    /// 路线总代价；回退路线含不可达段时为 None
    pub total_cost: Option<u64>,
    pub fell_back: bool,
}

/// 求解并在失败时回退为输入顺序（不会失败）
pub fn plan_route(solver: &dyn RouteSolver, matrix: &CostMatrix) -> RoutePlan {
    match solver.solve(matrix, DEPOT_INDEX) {
        Ok(tour) => {
            let total_cost = tour.total_cost(matrix);
            tracing::info!(
                solver = solver.name(),
                stops = tour.stops().len(),
                cost = ?total_cost,
                "Route planned"
            );
            RoutePlan {
                tour,
                total_cost,
                fell_back: false,
            }
        }
        Err(e) => {
            tracing::warn!(solver = solver.name(), "{}; falling back to input order", e);
            let tour = Tour::in_input_order(matrix.size(), DEPOT_INDEX);
            let total_cost = tour.total_cost(matrix);
            RoutePlan {
                tour,
                total_cost,
                fell_back: true,
            }
        }
    }
}
