use anyhow::{Context, Result};
use std::time::Instant;

use photo_collage::config::Config;
use photo_collage::layout_types::ViewportClass;
use photo_collage::packer::{Packer, ShapeInputs};

const ITERATIONS: u32 = 200;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let counts = [1, 3, 4, 9, 16, 36, 64, 100, 250];
    let inputs = ShapeInputs::for_viewport(ViewportClass::Desktop);

    println!("Configured packer: {}", config.packer);
    println!(
        "{:<10} | {:<8} | {:<10} | {:<15}",
        "Packer", "Photos", "Grid", "Time (us/plan)"
    );
    println!("{:-<10}-+-{:-<8}-+-{:-<10}-+-{:-<15}", "", "", "", "");

    for packer in Packer::ALL {
        for &count in &counts {
            if packer.ceiling().is_some_and(|ceiling| count > ceiling) {
                continue;
            }

            let start = Instant::now();
            let mut last = None;
            for _ in 0..ITERATIONS {
                last = Some(
                    packer
                        .compute_placement_plan(count, &inputs)
                        .with_context(|| format!("{} failed for {} photos", packer, count))?,
                );
            }
            let per_plan = start.elapsed().as_secs_f64() * 1e6 / ITERATIONS as f64;

            let grid = last
                .map(|plan| format!("{}x{}", plan.shape.rows, plan.shape.cols))
                .unwrap_or_default();
            println!(
                "{:<10} | {:<8} | {:<10} | {:<15.2}",
                packer, count, grid, per_plan
            );
        }
    }

    Ok(())
}
