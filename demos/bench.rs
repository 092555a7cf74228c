use std::time::Instant;

use citmap::{AggregationConfig, AggregationStore, Averaging, DecodedRow, Metric};

fn synthetic_rows(years: usize, regions: usize, repeats: usize) -> Vec<DecodedRow> {
    let mut rows = Vec::with_capacity(years * regions * repeats);
    for y in 0..years {
        for r in 0..regions {
            for k in 0..repeats {
                let mut metrics = [0.0; Metric::COUNT];
                for m in Metric::ALL {
                    metrics[m.index()] = ((y * 31 + r * 7 + k * 3 + m.index()) % 500) as f64;
                }
                rows.push(DecodedRow {
                    year: (2000 + y).to_string(),
                    country: format!("Region {r}"),
                    alpha3: format!("R{:02}", r % 100),
                    metrics,
                });
            }
        }
    }
    rows
}

fn main() -> anyhow::Result<()> {
    // Enough rows to make the merge path dominate
    let rows = synthetic_rows(20, 250, 4);

    let t_start = Instant::now();
    let mut pairwise = AggregationStore::new();
    for row in rows.iter().cloned() {
        pairwise.fold(row);
    }
    let d1 = pairwise.finish();
    let dur1 = t_start.elapsed();

    let t_start2 = Instant::now();
    let mut running = AggregationStore::with_config(AggregationConfig {
        averaging: Averaging::RunningMean,
        ..Default::default()
    });
    for row in rows.iter().cloned() {
        running.fold(row);
    }
    let d2 = running.finish();
    let dur2 = t_start2.elapsed();

    println!("rows,years,pairwise_ms,running_mean_ms");
    println!(
        "{},{},{:.3},{:.3}",
        rows.len(),
        d1.available_years().len().max(d2.available_years().len()),
        dur1.as_secs_f64() * 1000.0,
        dur2.as_secs_f64() * 1000.0
    );

    Ok(())
}
