//! Linear model over a `SoilTable`.
//!
//! The model is a collaborator: anything implementing `SoilModel`, including a plain
//! closure, can be plugged in.  `Ols` is the default one, an ordinary least squares fit of
//! `ocs ~ clay + sand + silt` with an intercept.  Rows with an absent cell in one of the
//! columns used are dropped before fitting.
//!

use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::{debug, trace};

use transect_sources::Property;

use crate::{ModelError, SoilTable};

/// Anything able to turn a table into a fitted-model summary.
///
pub trait SoilModel {
    fn fit(&self, table: &SoilTable) -> Result<ModelSummary, ModelError>;
}

impl<F> SoilModel for F
where
    F: Fn(&SoilTable) -> Result<ModelSummary, ModelError>,
{
    fn fit(&self, table: &SoilTable) -> Result<ModelSummary, ModelError> {
        self(table)
    }
}

/// One estimated coefficient.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
}

/// Result of a fit.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelSummary {
    /// R-like formula, e.g. `ocs ~ clay + sand + silt`
    pub formula: String,
    /// Intercept first
    pub coefficients: Vec<Coefficient>,
    /// Residual standard error
    pub sigma: f64,
    /// Residual degrees of freedom
    pub df: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// Rows used
    pub n_obs: usize,
    /// Rows dropped because of absent values
    pub n_dropped: usize,
}

impl ModelSummary {
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

impl Display for ModelSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Call:\nlm(formula = {})\n", self.formula)?;
        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<12} {:>12} {:>12} {:>9}",
            "", "Estimate", "Std. Error", "t value"
        )?;
        for c in &self.coefficients {
            writeln!(
                f,
                "{:<12} {:>12.5} {:>12.5} {:>9.3}",
                c.name, c.estimate, c.std_error, c.t_value
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Residual standard error: {:.4} on {} degrees of freedom",
            self.sigma, self.df
        )?;
        if self.n_dropped > 0 {
            writeln!(
                f,
                "  ({} observations deleted due to missingness)",
                self.n_dropped
            )?;
        }
        write!(
            f,
            "Multiple R-squared:  {:.4},\tAdjusted R-squared:  {:.4}",
            self.r_squared, self.adj_r_squared
        )
    }
}

/// Ordinary least squares with intercept.
///
#[derive(Clone, Debug)]
pub struct Ols {
    pub response: Property,
    pub predictors: Vec<Property>,
}

impl Default for Ols {
    fn default() -> Self {
        Ols {
            response: Property::Ocs,
            predictors: vec![Property::Clay, Property::Sand, Property::Silt],
        }
    }
}

/// Relative size under which a pivot is considered zero
const EPSILON: f64 = 1e-12;

impl Ols {
    pub fn formula(&self) -> String {
        let rhs: Vec<_> = self.predictors.iter().map(|p| p.name()).collect();
        format!("{} ~ {}", self.response, rhs.join(" + "))
    }

    /// Rows where the response and every predictor are present, as (x, y) with the
    /// leading 1 for the intercept in x.
    ///
    fn design(&self, table: &SoilTable) -> Vec<(Vec<f64>, f64)> {
        table
            .rows()
            .iter()
            .filter_map(|r| {
                let y = r.get(self.response)?;
                let mut x = vec![1.];
                for p in &self.predictors {
                    x.push(r.get(*p)?);
                }
                Some((x, y))
            })
            .collect()
    }
}

impl SoilModel for Ols {
    #[tracing::instrument(skip(table))]
    fn fit(&self, table: &SoilTable) -> Result<ModelSummary, ModelError> {
        trace!("enter");

        let data = self.design(table);
        let n = data.len();
        let k = self.predictors.len() + 1;
        debug!("{n} complete rows, {k} coefficients");

        if n <= k {
            return Err(ModelError::TooFewRows { needed: k, got: n });
        }

        // Normal equations: (X'X) b = X'y
        //
        let mut xtx = vec![vec![0.; k]; k];
        let mut xty = vec![0.; k];
        for (x, y) in &data {
            for i in 0..k {
                xty[i] += x[i] * y;
                for j in 0..k {
                    xtx[i][j] += x[i] * x[j];
                }
            }
        }

        let inv = invert(xtx).ok_or(ModelError::Singular)?;
        let beta: Vec<f64> = inv
            .iter()
            .map(|row| row.iter().zip(&xty).map(|(a, b)| a * b).sum())
            .collect();

        let mean = data.iter().map(|(_, y)| y).sum::<f64>() / n as f64;
        let (rss, tss) = data.iter().fold((0., 0.), |(rss, tss), (x, y)| {
            let fitted: f64 = x.iter().zip(&beta).map(|(a, b)| a * b).sum();
            (rss + (y - fitted).powi(2), tss + (y - mean).powi(2))
        });

        let df = n - k;
        let s2 = rss / df as f64;
        let r_squared = if tss > 0. { 1. - rss / tss } else { 0. };
        let adj_r_squared = 1. - (1. - r_squared) * (n - 1) as f64 / df as f64;

        let names = std::iter::once("(Intercept)").chain(self.predictors.iter().map(|p| p.name()));
        let coefficients = names
            .zip(beta.iter())
            .enumerate()
            .map(|(i, (name, &estimate))| {
                let std_error = (s2 * inv[i][i]).max(0.).sqrt();
                Coefficient {
                    name: name.to_string(),
                    estimate,
                    std_error,
                    t_value: estimate / std_error,
                }
            })
            .collect();

        Ok(ModelSummary {
            formula: self.formula(),
            coefficients,
            sigma: s2.sqrt(),
            df,
            r_squared,
            adj_r_squared,
            n_obs: n,
            n_dropped: table.len() - n,
        })
    }
}

/// Gauss-Jordan inversion with partial pivoting, `None` if singular.
///
fn invert(mut a: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let scale = a
        .iter()
        .enumerate()
        .map(|(i, r)| r[i].abs())
        .fold(0., f64::max);
    if scale == 0. {
        return None;
    }

    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1. } else { 0. }).collect())
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() <= EPSILON * scale {
            return None;
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        for j in 0..n {
            a[col][j] /= p;
            inv[col][j] /= p;
        }

        for i in 0..n {
            if i == col {
                continue;
            }
            let factor = a[i][col];
            if factor == 0. {
                continue;
            }
            for j in 0..n {
                a[i][j] -= factor * a[col][j];
                inv[i][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}
