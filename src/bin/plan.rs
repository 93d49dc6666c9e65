//! 无界面路线规划：按配置构建站点与代价矩阵，输出派送顺序与总代价
//!
//! 运行: cargo run --bin paperpilot-plan [-- <config.toml>]

use std::path::PathBuf;

use anyhow::Context;
use paperpilot::config::load_config_or_default;
use paperpilot::observability;
use paperpilot::route::{build_cost_matrix, plan_route, synthetic_stops, CheapestArcSolver, Stop};

fn main() -> anyhow::Result<()> {
    observability::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config_or_default(config_path);

    let stops = synthetic_stops(&cfg.route.depot_label, &cfg.route.houses);
    let positions: Vec<_> = stops.iter().map(Stop::position).collect();
    let matrix = build_cost_matrix(&positions).context("Failed to build cost matrix")?;
    let plan = plan_route(&CheapestArcSolver, &matrix);

    println!("Delivery order ({} houses):", plan.tour.stops().len());
    for (n, &index) in plan.tour.stops().iter().enumerate() {
        if let Some(stop) = stops.get(index) {
            println!("{:>3}. {}", n + 1, stop.display_label());
        }
    }
    match plan.total_cost {
        Some(cost) => println!("Total route cost: {}", cost),
        None => println!("Total route cost: unreachable"),
    }
    if plan.fell_back {
        println!("Solver failed; route follows input order");
    }
    Ok(())
}
