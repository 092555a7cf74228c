use std::io::Cursor;

use citmap::{read_dataset, AggregationConfig, Metric};

fn main() -> anyhow::Result<()> {
    // Toy extract; point citmap_api at the real CSV for full data.
    let csv = "\
Year,Country,Alpha3,Queued,Dequeued,Granted,Refused,Canceled,Pending,AvgProcessingTime
2019,Brazil,BRA,120,80,70,5,5,40,410
2019,Brazil,BRA,30,20,18,1,1,10,300
2019,Nepal,NPL,12,4,3,1,0,8,95
2020,Brazil,BRA,90,60,55,2,3,30,800
2020,Nepal,NPL,20,11,10,1,0,9,1000
";
    let dataset = read_dataset(Cursor::new(csv), AggregationConfig::default())?;

    let scale = dataset.color_scale_for(Metric::AvgProcessingTime);
    let labels = dataset.labels_for(Metric::AvgProcessingTime);

    println!("year,alpha3,country,granted,refused,incoming,avg_days,color,label");
    for year in dataset.available_years() {
        for region in dataset.regions_in(year) {
            let days = region.avg_processing_time().unwrap_or(0.0);
            let color = scale.classify(days);
            let label = labels.iter().find(|(_, c)| *c == color).map_or("", |(l, _)| *l);
            println!(
                "{},{},{},{:.0},{:.0},{:.0},{:.0},{},{}",
                year,
                region.alpha3(),
                region.country().unwrap_or(""),
                region.granted(),
                region.refused(),
                region.incoming(),
                days,
                color,
                label
            );
        }
    }

    Ok(())
}
