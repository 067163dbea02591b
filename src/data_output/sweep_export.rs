// src/data_output/sweep_export.rs

use csv::WriterBuilder;
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::data_analysis::characteristic_roots::RootSweep;

const SWEEP_CSV_HEADERS: [&str; 8] = [
    "a",
    "b",
    "lambda1_re",
    "lambda1_im",
    "lambda1_mag",
    "lambda2_re",
    "lambda2_im",
    "lambda2_mag",
];

/// Writes one CSV row per swept coefficient pair.
pub fn write_sweep_csv<W: Write>(sweep: &RootSweep, writer: W) -> Result<(), Box<dyn Error>> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(SWEEP_CSV_HEADERS)?;
    for (pair, l1, l2) in sweep.iter() {
        wtr.write_record(&[
            pair.a.to_string(),
            pair.b.to_string(),
            l1.re.to_string(),
            l1.im.to_string(),
            l1.norm().to_string(),
            l2.re.to_string(),
            l2.im.to_string(),
            l2.norm().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the sweep to `path`, replacing any existing file.
pub fn export_sweep_csv(sweep: &RootSweep, path: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    write_sweep_csv(sweep, file)?;
    println!("  Sweep data saved as '{}'.", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller_config::BlendCoefficients;
    use num_complex::Complex64;

    #[test]
    fn writes_header_and_rows() {
        let sweep = RootSweep {
            pairs: vec![BlendCoefficients::from_a(0.5)],
            lambda1: vec![Complex64::new(0.0, 0.25)],
            lambda2: vec![Complex64::new(-0.5, 0.0)],
        };
        let mut buffer = Vec::new();
        write_sweep_csv(&sweep, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], SWEEP_CSV_HEADERS.join(","));
        assert_eq!(lines[1], "0.5,0.5,0,0.25,0.25,-0.5,0,0.5");
    }

    #[test]
    fn empty_sweep_writes_only_header() {
        let mut buffer = Vec::new();
        write_sweep_csv(&RootSweep::default(), &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap().lines().count(), 1);
    }
}
