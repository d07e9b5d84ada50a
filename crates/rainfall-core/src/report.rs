//! End-of-run report: step count, wall time and the absorbed-water grid.
use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;

use crate::grid::Matrix;

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub size: usize,
    /// Steps executed before the grid converged.
    pub steps: u64,
    pub elapsed: Duration,
    pub absorbed: Matrix<f32>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    size: usize,
    steps: u64,
    elapsed_secs: f64,
    absorbed: Vec<&'a [f32]>,
}

impl SimulationReport {
    /// Human-readable report, absorbed values in `%8.6g` style.
    pub fn write_text<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "Rainfall simulation took {} time steps to complete.", self.steps)?;
        writeln!(w, "Runtime = {:.6} seconds.", self.elapsed.as_secs_f64())?;
        writeln!(w)?;
        writeln!(w, "The following grid shows the number of raindrops absorbed at each point:")?;
        for row in self.absorbed.rows() {
            for &v in row {
                write!(w, "{:>8} ", format_g(v as f64, 6))?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, w: W) -> serde_json::Result<()> {
        let report = JsonReport {
            size: self.size,
            steps: self.steps,
            elapsed_secs: self.elapsed.as_secs_f64(),
            absorbed: self.absorbed.rows().collect(),
        };
        serde_json::to_writer_pretty(w, &report)
    }
}

/// Format `v` like C's `%.{sig}g`: `sig` significant digits, trailing zeros
/// dropped, exponent form when the decimal exponent is below -4 or at least `sig`.
pub fn format_g(v: f64, sig: usize) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return v.to_string();
    }
    let sig = sig.max(1);
    let sci = format!("{:.*e}", sig - 1, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= sig as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (sig as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, v)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_g_matches_c_printf() {
        assert_eq!(format_g(0.0, 6), "0");
        assert_eq!(format_g(1.0, 6), "1");
        assert_eq!(format_g(0.5, 6), "0.5");
        assert_eq!(format_g(2.25, 6), "2.25");
        assert_eq!(format_g(1.0 / 3.0, 6), "0.333333");
        assert_eq!(format_g(123456.0, 6), "123456");
        assert_eq!(format_g(1234567.0, 6), "1.23457e+06");
        assert_eq!(format_g(0.0001, 6), "0.0001");
        assert_eq!(format_g(0.00001234, 6), "1.234e-05");
        assert_eq!(format_g(999999.5, 6), "1e+06");
    }

    fn sample() -> SimulationReport {
        SimulationReport {
            size: 2,
            steps: 3,
            elapsed: Duration::from_millis(1500),
            absorbed: Matrix::from_vec(2, vec![1.0, 0.5, 2.25, 0.0]),
        }
    }

    #[test]
    fn text_report_layout() {
        let mut out = Vec::new();
        sample().write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Rainfall simulation took 3 time steps to complete.");
        assert_eq!(lines[1], "Runtime = 1.500000 seconds.");
        assert_eq!(lines[2], "");
        assert_eq!(lines[4], "       1      0.5 ");
        assert_eq!(lines[5], "    2.25        0 ");
    }

    #[test]
    fn json_report_has_nested_rows() {
        let mut out = Vec::new();
        sample().write_json(&mut out).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["steps"], 3);
        assert_eq!(v["absorbed"][1][0], 2.25);
        assert_eq!(v["elapsed_secs"], 1.5);
    }
}
