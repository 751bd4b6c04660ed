use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Result, StorageError};

/// Shape of a `NUMERIC(precision, scale)` column
#[derive(Debug, Clone, Copy)]
pub(crate) struct NumericColumn {
    precision: u32,
    scale: u32,
}

/// `progression_rate`, `deload_rate`
pub(crate) const RATE: NumericColumn = NumericColumn {
    precision: 5,
    scale: 4,
};

/// `target_load_min`, `target_load_max`, `actual_weight`
pub(crate) const LOAD: NumericColumn = NumericColumn {
    precision: 6,
    scale: 2,
};

impl NumericColumn {
    /// Exclusive bound on the magnitude the column can hold
    fn limit(&self) -> Decimal {
        Decimal::from(10_i64.pow(self.precision - self.scale))
    }

    /// Rounds `value` to the column's scale the way PostgreSQL does (half
    /// away from zero) and rejects it if the rounded value overflows.
    pub(crate) fn fit(&self, value: Decimal, path: &str) -> Result<Decimal> {
        let rounded =
            value.round_dp_with_strategy(self.scale, RoundingStrategy::MidpointAwayFromZero);

        if rounded.abs() >= self.limit() {
            return Err(StorageError::validation(format!(
                "{path} must be less than {} in magnitude",
                self.limit()
            )));
        }

        Ok(rounded)
    }

    pub(crate) fn fit_opt(&self, value: Option<Decimal>, path: &str) -> Result<Option<Decimal>> {
        value.map(|v| self.fit(v, path)).transpose()
    }
}
