//! Fixed-width text tables for vectors and matrices.
//!
//! Every table starts with a `Vector <label>:` or `Matrix <label>:` header,
//! prints each value right-justified in [`ReportFormat::width`] columns with
//! [`ReportFormat::precision`] significant digits, and ends with a blank line.
//!
//! Output goes to any [`io::Write`]. To send the same text to several sinks
//! at once (console and file), wrap them in a [`Tee`].

use std::io::{self, Write};

use serde::Deserialize;

use crate::Float;
use crate::error::Result;
use crate::tensor::Tensor;

/// Column width and significant digits used by every table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportFormat {
    pub width: usize,
    pub precision: usize,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            width: 13,
            precision: 5,
        }
    }
}

impl ReportFormat {
    /// A single value in general notation, without padding.
    pub fn number<T: Float>(&self, value: T) -> String {
        format_general(value.to_f64(), self.precision)
    }

    /// A single value right-justified to the column width.
    pub fn field<T: Float>(&self, value: T) -> String {
        format!("{:>width$}", self.number(value), width = self.width)
    }

    /// Write a vector, one value per line.
    pub fn write_vector<T: Float, W: Write + ?Sized>(
        &self,
        out: &mut W,
        label: &str,
        v: &Tensor<T>,
    ) -> Result<()> {
        writeln!(out, "Vector {label}:")?;
        for &value in v.iter() {
            writeln!(out, "{}", self.field(value))?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Write a matrix, one row per line.
    pub fn write_matrix<T: Float, W: Write + ?Sized>(
        &self,
        out: &mut W,
        label: &str,
        m: &Tensor<T>,
    ) -> Result<()> {
        m.matrix_dims()?;
        writeln!(out, "Matrix {label}:")?;
        for row in m.rows() {
            let line: String = row.iter().map(|&value| self.field(value)).collect();
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// [`write_vector`](Self::write_vector) to standard output.
    pub fn print_vector<T: Float>(&self, label: &str, v: &Tensor<T>) -> Result<()> {
        self.write_vector(&mut io::stdout().lock(), label, v)
    }

    /// [`write_matrix`](Self::write_matrix) to standard output.
    pub fn print_matrix<T: Float>(&self, label: &str, m: &Tensor<T>) -> Result<()> {
        self.write_matrix(&mut io::stdout().lock(), label, m)
    }
}

/// Format `value` like C's `%g`: `precision` significant digits, fixed
/// notation for decimal exponents in `[-4, precision)`, scientific otherwise,
/// trailing zeros removed.
///
/// ```
/// # use linsys_core::report::format_general;
/// assert_eq!(format_general(3.14159, 5), "3.1416");
/// assert_eq!(format_general(123456.0, 5), "1.2346e+05");
/// assert_eq!(format_general(0.0001, 5), "0.0001");
/// assert_eq!(format_general(2.0, 5), "2");
/// ```
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    let digits = precision.max(1);
    // Rounding to `digits` first decides the exponent, as %g does.
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits = i32::try_from(digits).unwrap_or(i32::MAX);

    if exp < -4 || exp >= digits {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.unsigned_abs())
    } else {
        let decimals = usize::try_from(digits - 1 - exp).unwrap_or(0);
        trim_fraction(&format!("{value:.decimals$}")).to_owned()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// A writer that forwards every byte to each of its sinks.
///
/// ```
/// # use std::io::Write;
/// # use linsys_core::report::Tee;
/// let (mut a, mut b) = (Vec::new(), Vec::new());
/// let mut tee = Tee::new(Vec::new());
/// tee.push(&mut a);
/// tee.push(&mut b);
/// tee.write_all(b"hi").unwrap();
/// drop(tee);
/// assert_eq!(a, b"hi");
/// assert_eq!(b, b"hi");
/// ```
pub struct Tee<'a> {
    sinks: Vec<&'a mut dyn Write>,
}

impl<'a> Tee<'a> {
    pub fn new(sinks: Vec<&'a mut dyn Write>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: &'a mut dyn Write) {
        self.sinks.push(sink);
    }
}

impl Write for Tee<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in &mut self.sinks {
            sink.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}
