//! 距离模型：由站点坐标构建代价矩阵
//!
//! 本部署代价为合成坐标间的 L1 距离（四舍五入为整数）；矩阵是确定性的，对角线为 0。
//! 求解器不假设矩阵对称。

use crate::core::RouteError;
use crate::route::stop::Position;

/// 方阵代价矩阵：cost(i, j) 为从 i 到 j 的非负整数代价
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    rows: Vec<Vec<u64>>,
}

impl CostMatrix {
    /// 不可达弧的代价
    pub const UNREACHABLE: u64 = u64::MAX;

    /// 由显式行构建，校验非空、方阵、对角线为 0
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, RouteError> {
        if rows.is_empty() {
            return Err(RouteError::InvalidInput("cost matrix is empty".into()));
        }
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(RouteError::InvalidInput(format!(
                    "cost matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if row[i] != 0 {
                return Err(RouteError::InvalidInput(format!(
                    "cost matrix diagonal must be zero (row {})",
                    i
                )));
            }
        }
        Ok(Self { rows })
    }

    /// 节点数（含仓库）
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn cost(&self, from: usize, to: usize) -> u64 {
        self.rows[from][to]
    }

    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.cost(from, to) != Self::UNREACHABLE
    }
}

/// 由有序坐标列表（下标 0 为仓库）构建 L1 代价矩阵
pub fn build_cost_matrix(positions: &[Position]) -> Result<CostMatrix, RouteError> {
    if positions.is_empty() {
        return Err(RouteError::InvalidInput("stop list is empty".into()));
    }
    if let Some(idx) = positions.iter().position(|p| !p.is_finite()) {
        return Err(RouteError::InvalidInput(format!(
            "stop {} has a non-finite coordinate",
            idx
        )));
    }

    let mut rows = Vec::with_capacity(positions.len());
    for (i, from) in positions.iter().enumerate() {
        let mut row = Vec::with_capacity(positions.len());
        for (j, to) in positions.iter().enumerate() {
            if i == j {
                row.push(0);
                continue;
            }
            // 不能与 UNREACHABLE 重合，否则有限距离会被当成不可达
            let distance = from.manhattan(to).round();
            if !distance.is_finite() || distance >= CostMatrix::UNREACHABLE as f64 {
                return Err(RouteError::InvalidInput(format!(
                    "distance between stops {} and {} is out of range",
                    i, j
                )));
            }
            row.push(distance as u64);
        }
        rows.push(row);
    }

    CostMatrix::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Position> {
        (0..n)
            .map(|i| Position::new(i as f64, (i * 2) as f64))
            .collect()
    }

    #[test]
    fn test_manhattan_matrix() {
        let matrix = build_cost_matrix(&line(4)).unwrap();
        assert_eq!(matrix.size(), 4);
        assert_eq!(matrix.cost(0, 1), 3);
        assert_eq!(matrix.cost(1, 3), 6);
        assert_eq!(matrix.cost(3, 1), 6);
        for i in 0..4 {
            assert_eq!(matrix.cost(i, i), 0);
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            build_cost_matrix(&[]),
            Err(RouteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let positions = vec![Position::new(0.0, 0.0), Position::new(f64::NAN, 1.0)];
        assert!(matches!(
            build_cost_matrix(&positions),
            Err(RouteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_out_of_range_distance_rejected() {
        let positions = vec![Position::new(0.0, 0.0), Position::new(1e20, 0.0)];
        assert!(matches!(
            build_cost_matrix(&positions),
            Err(RouteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_square_rows_rejected() {
        let rows = vec![vec![0, 1, 2], vec![1, 0]];
        assert!(matches!(
            CostMatrix::from_rows(rows),
            Err(RouteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_nonzero_diagonal_rejected() {
        let rows = vec![vec![0, 1], vec![1, 5]];
        assert!(CostMatrix::from_rows(rows).is_err());
    }
}
