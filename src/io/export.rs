//! CSV export for battery dispatch traces.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::battery::DispatchStep;

/// Column header for CSV dispatch export.
const HEADER: &str = "period,time_hr,demand_kw,battery_kw,soc_kwh,capacity_kwh,net_demand_kw";

/// Exports dispatch steps to a CSV file at the given path.
///
/// Writes a header row followed by one data row per period. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(steps: &[DispatchStep], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(steps, buf)
}

/// Writes dispatch steps as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(steps: &[DispatchStep], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for s in steps {
        wtr.write_record(&[
            s.period.to_string(),
            format!("{:.2}", s.time_hr),
            format!("{:.4}", s.demand_kw),
            format!("{:.4}", s.battery_kw),
            format!("{:.4}", s.soc_kwh),
            format!("{:.4}", s.capacity_kwh),
            format!("{:.4}", s.net_demand_kw),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_step(t: usize) -> DispatchStep {
        DispatchStep {
            period: t,
            time_hr: t as f64,
            demand_kw: 3.0,
            battery_kw: -3.0,
            soc_kwh: 4.5,
            capacity_kwh: 10.0,
            net_demand_kw: 0.0,
        }
    }

    fn render(steps: &[DispatchStep]) -> String {
        let mut buf = Vec::new();
        write_csv(steps, &mut buf).expect("csv export should succeed");
        String::from_utf8(buf).expect("csv output should be valid UTF-8")
    }

    #[test]
    fn header_matches_schema() {
        let out = render(&[make_step(0)]);
        assert_eq!(out.lines().next(), Some(HEADER));
    }

    #[test]
    fn row_count_matches_step_count() {
        let steps: Vec<DispatchStep> = (0..10).map(make_step).collect();
        // 1 header + 10 data rows
        assert_eq!(render(&steps).lines().count(), 11);
    }

    #[test]
    fn empty_trace_writes_header_only() {
        assert_eq!(render(&[]).lines().count(), 1);
    }

    #[test]
    fn row_formatting() {
        let out = render(&[make_step(2)]);
        assert_eq!(
            out.lines().nth(1),
            Some("2,2.00,3.0000,-3.0000,4.5000,10.0000,0.0000")
        );
    }

    #[test]
    fn export_writes_file_that_reads_back() {
        let steps: Vec<DispatchStep> = (0..4).map(make_step).collect();
        let path = std::env::temp_dir().join(format!(
            "pv_battery_sim_export_{}.csv",
            std::process::id()
        ));

        export_csv(&steps, &path).expect("file export should succeed");
        let written = std::fs::read_to_string(&path).expect("exported file should be readable");
        std::fs::remove_file(&path).ok();

        assert_eq!(written, render(&steps));
        assert_eq!(written.lines().count(), 5);
    }

    #[test]
    fn rows_parse_back_as_numbers() {
        let steps: Vec<DispatchStep> = (0..3).map(make_step).collect();
        let out = render(&steps);

        let mut rdr = csv::ReaderBuilder::new().from_reader(out.as_bytes());
        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.expect("every row should parse");
            assert_eq!(rec.len(), 7);
            for i in 1..7 {
                assert!(rec[i].parse::<f64>().is_ok(), "column {i} should parse as f64");
            }
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }
}
