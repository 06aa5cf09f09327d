//! Solve, refine and condition-check a dense system, then report it.
//!
//! The pipeline for `A x = Y`:
//!
//! 1. LU factorisation of a copy of `A` with partial pivoting
//! 2. forward/back substitution for `X`
//! 3. residual-correction refinement of `X` against the original `A`
//! 4. one-sided Jacobi SVD of another copy of `A`
//! 5. condition number `|max(S)| / |min(S)|`
//!
//! `A` and `Y` are only borrowed; every working buffer lives inside
//! [`SolveReport`] or is dropped before [`LinearSolver::analyze`] returns.

use std::io::{self, Write};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::Float;
use crate::error::{LinsysError, Result};
use crate::linalg::{self, ConditionNumber, LuDecomposition, SvdDecomposition};
use crate::report::{ReportFormat, Tee};
use crate::system::check_shapes;
use crate::tensor::Tensor;

/// Numerical knobs of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverOptions {
    /// Residual-correction steps applied after the first solve.
    pub refinement_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            refinement_steps: 1,
        }
    }
}

/// Everything computed for one system.
#[derive(Debug, Clone)]
pub struct SolveReport<'a, T: Float> {
    a: &'a Tensor<T>,
    y: &'a Tensor<T>,
    lu: LuDecomposition<T>,
    x: Tensor<T>,
    residual: Tensor<T>,
    svd: SvdDecomposition<T>,
    condition: ConditionNumber<T>,
}

impl<T: Float> SolveReport<'_, T> {
    pub fn lu(&self) -> &LuDecomposition<T> {
        &self.lu
    }

    /// The refined solution.
    pub fn x(&self) -> &Tensor<T> {
        &self.x
    }

    /// `Y - A X` for the refined solution.
    pub fn residual(&self) -> &Tensor<T> {
        &self.residual
    }

    pub fn svd(&self) -> &SvdDecomposition<T> {
        &self.svd
    }

    pub fn singular_values(&self) -> &Tensor<T> {
        self.svd.s()
    }

    pub fn condition(&self) -> ConditionNumber<T> {
        self.condition
    }

    /// Write the full text report: A, Y, LU, X, r, S and the condition number.
    pub fn write<W: Write + ?Sized>(&self, format: &ReportFormat, out: &mut W) -> Result<()> {
        format.write_matrix(out, "Input Matrix A", self.a)?;
        format.write_vector(out, "Input Vector Y", self.y)?;
        format.write_matrix(out, "LU, result of LU decomposition", self.lu.packed())?;
        format.write_vector(out, "X, result of solving with LU decomposition", &self.x)?;
        format.write_vector(
            out,
            "r, residual of solving by LU decomposition",
            &self.residual,
        )?;
        format.write_vector(
            out,
            "S, singular values of A, result of doing SV decomposition",
            self.svd.s(),
        )?;

        let c = &self.condition;
        writeln!(
            out,
            "Calculating condition number by: abs(max(singular values)) / abs(min(singular values)):"
        )?;
        writeln!(
            out,
            "\tCondition number = {} / {} = {}",
            format.number(c.max),
            format.number(c.min),
            format.number(c.value)
        )?;
        writeln!(out)?;
        Ok(())
    }
}

/// Runs the pipeline with a fixed report format and options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearSolver {
    format: ReportFormat,
    options: SolverOptions,
}

impl LinearSolver {
    pub fn new(format: ReportFormat, options: SolverOptions) -> Self {
        Self { format, options }
    }

    pub fn format(&self) -> &ReportFormat {
        &self.format
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Run the numerical pipeline without writing anything.
    ///
    /// Fails fast when `a` is not square or `y` does not match it, and with
    /// [`LinsysError::SingularMatrix`] when elimination meets an exact zero
    /// pivot. A nearly singular system is not an error: it yields a huge
    /// condition number.
    #[tracing::instrument(skip_all, fields(n = a.shape().first().copied()))]
    pub fn analyze<'a, T: Float>(
        &self,
        a: &'a Tensor<T>,
        y: &'a Tensor<T>,
    ) -> Result<SolveReport<'a, T>> {
        let n = check_shapes(a, y)?;
        if n == 0 {
            return Err(LinsysError::InvalidArgument {
                reason: "cannot solve an empty system",
            });
        }

        let lu = LuDecomposition::decompose(a)?;
        let mut x = lu.solve(y)?;
        for step in 0..self.options.refinement_steps {
            let r = lu.refine(a, y, &mut x)?;
            debug!(step, residual_norm = r.norm()?.to_f64(), "refinement step");
        }
        let residual = linalg::residual(a, &x, y)?;

        let svd = SvdDecomposition::decompose(a)?;
        let condition = svd
            .condition_number()
            .ok_or(LinsysError::InvalidArgument {
                reason: "cannot solve an empty system",
            })?;
        if condition.value.is_finite() {
            info!(
                condition = condition.value.to_f64(),
                residual_norm = residual.norm()?.to_f64(),
                "system analysed"
            );
        } else {
            warn!(
                max = condition.max.to_f64(),
                min = condition.min.to_f64(),
                "zero singular value, condition number is infinite"
            );
        }

        Ok(SolveReport {
            a,
            y,
            lu,
            x,
            residual,
            svd,
            condition,
        })
    }

    /// Analyse the system and write the report to standard output and `out`.
    pub fn solve<'a, T: Float>(
        &self,
        a: &'a Tensor<T>,
        y: &'a Tensor<T>,
        out: &mut dyn Write,
    ) -> Result<SolveReport<'a, T>> {
        let report = self.analyze(a, y)?;
        let mut console = io::stdout().lock();
        let mut sinks = Tee::new(Vec::new());
        sinks.push(&mut console);
        sinks.push(out);
        report.write(&self.format, &mut sinks)?;
        sinks.flush()?;
        Ok(report)
    }
}

/// [`LinearSolver::solve`] with the default 13-column, 5-digit format and a
/// single refinement step.
pub fn solve<'a, T: Float>(
    a: &'a Tensor<T>,
    y: &'a Tensor<T>,
    out: &mut dyn Write,
) -> Result<SolveReport<'a, T>> {
    LinearSolver::default().solve(a, y, out)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::system::build_system;

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    fn vector(data: &[f64]) -> Tensor<f64> {
        Tensor::from_vec(data.to_vec(), vec![data.len()]).unwrap()
    }

    #[test]
    fn test_well_conditioned_2x2() {
        let a = Tensor::from_rows(&[[2.0, 1.0], [1.0, 3.0]]).unwrap();
        let y = vector(&[3.0, 5.0]);
        let report = LinearSolver::default().analyze(&a, &y).unwrap();
        let ax = a.matvec(report.x()).unwrap();
        assert!(approx_eq(ax.as_slice(), y.as_slice(), 1e-9));
        assert!(report.residual().iter().all(|r| r.abs() <= 1e-10));
    }

    #[test]
    fn test_identity_condition_is_exactly_one() {
        for n in [1, 2, 5, 8] {
            let a = Tensor::<f64>::eye(n);
            let y = Tensor::full(vec![n], 2.0);
            let report = LinearSolver::default().analyze(&a, &y).unwrap();
            assert_eq!(report.condition().value, 1.0);
            assert_eq!(report.x(), &y);
        }
    }

    #[test]
    fn test_annuity_system_recovers_ones() {
        let sys = build_system::<f64>(3).unwrap();
        let report = LinearSolver::default().analyze(&sys.a, &sys.y).unwrap();
        assert!(approx_eq(report.x().as_slice(), &[1.0, 1.0, 1.0], 1e-10));
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let sys = build_system::<f64>(4).unwrap();
        let before = sys.clone();
        let _ = LinearSolver::default().analyze(&sys.a, &sys.y).unwrap();
        assert_eq!(sys, before);
    }

    #[test]
    fn test_zero_refinement_steps_still_reports_residual() {
        let solver = LinearSolver::new(
            ReportFormat::default(),
            SolverOptions {
                refinement_steps: 0,
            },
        );
        let a = Tensor::from_rows(&[[4.0, 1.0], [1.0, 3.0]]).unwrap();
        let y = vector(&[1.0, 2.0]);
        let report = solver.analyze(&a, &y).unwrap();
        assert_eq!(report.residual().numel(), 2);
        assert!(report.residual().iter().all(|r| r.abs() <= 1e-12));
    }

    #[test]
    fn test_shape_errors_fail_fast() {
        let solver = LinearSolver::default();
        let rect = Tensor::<f64>::zeros(vec![2, 3]);
        assert!(matches!(
            solver.analyze(&rect, &vector(&[1.0, 2.0])),
            Err(LinsysError::NotSquare { .. })
        ));
        let a = Tensor::<f64>::eye(3);
        assert!(matches!(
            solver.analyze(&a, &vector(&[1.0, 2.0])),
            Err(LinsysError::DimensionMismatch { .. })
        ));
        let empty = Tensor::<f64>::eye(0);
        assert!(solver.analyze(&empty, &vector(&[])).is_err());
    }

    #[test]
    fn test_singular_system() {
        let a = Tensor::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
        let y = vector(&[1.0, 2.0]);
        assert!(matches!(
            LinearSolver::default().analyze(&a, &y),
            Err(LinsysError::SingularMatrix)
        ));
    }

    #[test]
    fn test_report_layout() {
        let a = Tensor::from_rows(&[[2.0, 0.0], [0.0, 4.0]]).unwrap();
        let y = vector(&[2.0, 4.0]);
        let report = LinearSolver::default().analyze(&a, &y).unwrap();
        let mut buf = Vec::new();
        report.write(&ReportFormat::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let expected = "\
Matrix Input Matrix A:
            2            0
            0            4

Vector Input Vector Y:
            2
            4

Matrix LU, result of LU decomposition:
            2            0
            0            4

Vector X, result of solving with LU decomposition:
            1
            1

Vector r, residual of solving by LU decomposition:
            0
            0

Vector S, singular values of A, result of doing SV decomposition:
            4
            2

Calculating condition number by: abs(max(singular values)) / abs(min(singular values)):
\tCondition number = 4 / 2 = 2

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_report_write_error_is_io() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let a = Tensor::<f64>::eye(2);
        let y = vector(&[1.0, 1.0]);
        let report = LinearSolver::default().analyze(&a, &y).unwrap();
        assert!(matches!(
            report.write(&ReportFormat::default(), &mut Broken),
            Err(LinsysError::Io(_))
        ));
    }
}
