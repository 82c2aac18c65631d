//! Contingency tables and Pearson's chi-squared test of independence
//!
//! Expected frequencies follow the independence model:
//!
//! ```text
//! E[i][j] = row_total[i] * column_total[j] / total
//! chi2    = Σ (O[i][j] - E[i][j])² / E[i][j]
//! df      = (rows - 1) * (columns - 1)
//! ```
//!
//! When `df == 1` the Yates continuity correction may be applied: each
//! observed count is moved towards its expected value by `min(0.5, |O - E|)`
//! before the statistic is computed. A table with a single row or column has
//! zero degrees of freedom; its statistic is 0 and its p-value is 1.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::UndefinedStatistic;

/// Error building a contingency table.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ContingencyTableError {
    #[display("contingency table must have at least one row and one column")]
    Empty,
    #[display("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// A rectangular table of observed counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyTable {
    counts: Vec<Vec<u64>>,
}

/// Result of Pearson's chi-squared test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquaredTest {
    /// The chi-squared statistic.
    pub statistic: f64,
    /// Degrees of freedom, `(rows - 1) * (columns - 1)`.
    pub degrees_of_freedom: usize,
    /// Upper-tail p-value.
    pub p_value: f64,
    /// Whether the Yates continuity correction was applied.
    pub yates_corrected: bool,
    /// Expected frequencies under independence, same shape as the table.
    pub expected: Vec<Vec<f64>>,
}

impl ContingencyTable {
    /// Builds a table from rows of observed counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use splitstat_stats::contingency::ContingencyTable;
    ///
    /// let table = ContingencyTable::new(vec![vec![10, 20], vec![30, 40]]).unwrap();
    /// assert_eq!(table.row_totals(), vec![30, 70]);
    /// assert_eq!(table.column_totals(), vec![40, 60]);
    /// assert_eq!(table.total(), 100);
    ///
    /// assert!(ContingencyTable::new(vec![vec![1, 2], vec![3]]).is_err());
    /// ```
    pub fn new(counts: Vec<Vec<u64>>) -> Result<Self, ContingencyTableError> {
        let expected = counts.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(ContingencyTableError::Empty);
        }
        if let Some((row, cells)) = counts
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(ContingencyTableError::RaggedRow {
                row,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { counts })
    }

    /// Builds a 2×2 table, which is always well-formed.
    #[must_use]
    pub fn two_by_two(counts: [[u64; 2]; 2]) -> Self {
        Self {
            counts: counts.iter().map(|row| row.to_vec()).collect(),
        }
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.counts[0].len()
    }

    /// Observed count at `(row, column)`.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> u64 {
        self.counts[row][column]
    }

    #[must_use]
    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    #[must_use]
    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.num_columns())
            .map(|column| self.counts.iter().map(|row| row[column]).sum())
            .collect()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        (self.num_rows() - 1) * (self.num_columns() - 1)
    }

    /// Expected frequencies under the independence model.
    ///
    /// Fails if any expected frequency is zero, which happens whenever a row
    /// or column of the table sums to zero.
    #[expect(clippy::cast_precision_loss)]
    pub fn expected_frequencies(&self) -> Result<Vec<Vec<f64>>, UndefinedStatistic> {
        let row_totals = self.row_totals();
        let column_totals = self.column_totals();
        let total = self.total() as f64;

        let mut expected = Vec::with_capacity(self.num_rows());
        for (row, &row_total) in row_totals.iter().enumerate() {
            let mut cells = Vec::with_capacity(column_totals.len());
            for (column, &column_total) in column_totals.iter().enumerate() {
                let e = row_total as f64 * column_total as f64 / total;
                // NaN when the table is empty
                if e.is_nan() || e <= 0.0 {
                    return Err(UndefinedStatistic::ZeroExpectedFrequency { row, column });
                }
                cells.push(e);
            }
            expected.push(cells);
        }
        Ok(expected)
    }

    /// Runs Pearson's chi-squared test of independence.
    ///
    /// `yates_correction` only takes effect for tables with one degree of
    /// freedom.
    ///
    /// # Examples
    ///
    /// ```
    /// use splitstat_stats::contingency::ContingencyTable;
    ///
    /// let table = ContingencyTable::new(vec![vec![10, 20], vec![30, 40]]).unwrap();
    ///
    /// let corrected = table.chi_squared(true).unwrap();
    /// assert!((corrected.statistic - 0.446_428_571_428_571_4).abs() < 1e-12);
    ///
    /// let uncorrected = table.chi_squared(false).unwrap();
    /// assert!((uncorrected.statistic - 0.793_650_793_650_793_6).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn chi_squared(
        &self,
        yates_correction: bool,
    ) -> Result<ChiSquaredTest, UndefinedStatistic> {
        let expected = self.expected_frequencies()?;
        let degrees_of_freedom = self.degrees_of_freedom();

        if degrees_of_freedom == 0 {
            return Ok(ChiSquaredTest {
                statistic: 0.0,
                degrees_of_freedom,
                p_value: 1.0,
                yates_corrected: false,
                expected,
            });
        }

        let yates_corrected = yates_correction && degrees_of_freedom == 1;
        let mut statistic = 0.0;
        for (observed_row, expected_row) in self.counts.iter().zip(&expected) {
            for (&observed, &e) in observed_row.iter().zip(expected_row) {
                let mut o = observed as f64;
                if yates_corrected {
                    let diff = e - o;
                    o += diff.signum() * diff.abs().min(0.5);
                }
                statistic += (o - e).powi(2) / e;
            }
        }

        let df = degrees_of_freedom as f64;
        let dist = ChiSquared::new(df).map_err(|_| UndefinedStatistic::InvalidDegreesOfFreedom {
            degrees_of_freedom: df,
        })?;
        let p_value = dist.sf(statistic);

        Ok(ChiSquaredTest {
            statistic,
            degrees_of_freedom,
            p_value,
            yates_corrected,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_frequencies() {
        let table = ContingencyTable::new(vec![vec![440, 60], vec![420, 80]]).unwrap();
        let expected = table.expected_frequencies().unwrap();
        assert_eq!(expected, vec![vec![430.0, 70.0], vec![430.0, 70.0]]);
    }

    #[test]
    fn test_yates_corrected_statistic() {
        let table = ContingencyTable::new(vec![vec![440, 60], vec![420, 80]]).unwrap();
        let test = table.chi_squared(true).unwrap();
        assert!(test.yates_corrected);
        assert_eq!(test.degrees_of_freedom, 1);
        assert!((test.statistic - 2.998_338_870_431_894).abs() < 1e-9);
        assert!((test.p_value - 0.083_35).abs() < 1e-4);
    }

    #[test]
    fn test_uncorrected_statistic() {
        let table = ContingencyTable::new(vec![vec![440, 60], vec![420, 80]]).unwrap();
        let test = table.chi_squared(false).unwrap();
        assert!(!test.yates_corrected);
        assert!((test.statistic - 3.322_259_136_212_624_6).abs() < 1e-9);
        assert!((test.p_value - 0.068_35).abs() < 1e-4);
    }

    #[test]
    fn test_yates_correction_ignored_for_larger_tables() {
        let table = ContingencyTable::new(vec![vec![10, 20, 30], vec![30, 20, 10]]).unwrap();
        let test = table.chi_squared(true).unwrap();
        assert!(!test.yates_corrected);
        assert_eq!(test.degrees_of_freedom, 2);
        // E = 20 everywhere: (100 + 0 + 100) * 2 / 20
        assert!((test.statistic - 20.0).abs() < 1e-12);
        assert!(test.p_value < 1e-4);
    }

    #[test]
    fn test_small_difference_is_not_overcorrected() {
        // |O - E| ≈ 0.24 < 0.5: correction moves O onto E
        let table = ContingencyTable::new(vec![vec![5, 5], vec![5, 6]]).unwrap();
        let corrected = table.chi_squared(true).unwrap();
        assert!(corrected.statistic.abs() < 1e-12);
    }

    #[test]
    fn test_single_column_has_zero_degrees_of_freedom() {
        let table = ContingencyTable::new(vec![vec![10], vec![20]]).unwrap();
        let test = table.chi_squared(true).unwrap();
        assert_eq!(test.degrees_of_freedom, 0);
        assert_eq!(test.statistic, 0.0);
        assert_eq!(test.p_value, 1.0);
    }

    #[test]
    fn test_zero_column_is_undefined() {
        let table = ContingencyTable::new(vec![vec![10, 0], vec![20, 0]]).unwrap();
        assert_eq!(
            table.chi_squared(true).unwrap_err(),
            UndefinedStatistic::ZeroExpectedFrequency { row: 0, column: 1 }
        );
    }

    #[test]
    fn test_empty_table_is_undefined() {
        let table = ContingencyTable::new(vec![vec![0, 0], vec![0, 0]]).unwrap();
        assert!(matches!(
            table.chi_squared(false).unwrap_err(),
            UndefinedStatistic::ZeroExpectedFrequency { .. }
        ));
    }

    #[test]
    fn test_two_by_two_matches_new() {
        let fixed = ContingencyTable::two_by_two([[440, 60], [420, 80]]);
        let dynamic = ContingencyTable::new(vec![vec![440, 60], vec![420, 80]]).unwrap();
        assert_eq!(fixed, dynamic);
        assert_eq!(fixed.get(1, 1), 80);
    }

    #[test]
    fn test_invalid_shapes() {
        assert_eq!(
            ContingencyTable::new(vec![]).unwrap_err(),
            ContingencyTableError::Empty
        );
        assert_eq!(
            ContingencyTable::new(vec![vec![]]).unwrap_err(),
            ContingencyTableError::Empty
        );
        assert_eq!(
            ContingencyTable::new(vec![vec![1, 2], vec![3, 4, 5]]).unwrap_err(),
            ContingencyTableError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 3
            }
        );
    }
}
