//! Reductions over numeric cell values.

use crate::types::RecordData;
use crate::value::number_or_zero;

/// Built-in reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all values.
    Count,
    /// Sum of values.
    Sum,
    /// Arithmetic mean.
    Avg,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
}

/// Reduce a slice of numbers.
///
/// - `Count` and `Sum` are defined for empty input (`0`).
/// - `Avg`, `Min` and `Max` return `None` for empty input.
pub fn reduce(values: &[f64], op: ReduceOp) -> Option<f64> {
    match op {
        ReduceOp::Count => Some(values.len() as f64),
        ReduceOp::Sum => Some(values.iter().sum()),
        ReduceOp::Avg => {
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        ReduceOp::Min => values.iter().copied().reduce(f64::min),
        ReduceOp::Max => values.iter().copied().reduce(f64::max),
    }
}

/// Numeric readings of one field across records; non-numeric cells read as 0.
pub fn field_values(records: &[RecordData], field_id: &str) -> Vec<f64> {
    records
        .iter()
        .map(|r| number_or_zero(r.get(field_id)))
        .collect()
}

/// Reduce one field across records. See [`reduce`] for empty-input behavior.
pub fn reduce_field(records: &[RecordData], field_id: &str, op: ReduceOp) -> Option<f64> {
    reduce(&field_values(records, field_id), op)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{reduce, reduce_field, ReduceOp};
    use crate::types::RecordData;

    fn scores() -> Vec<RecordData> {
        vec![
            RecordData::new("r1").with("score", json!(10)),
            RecordData::new("r2").with("score", json!("n/a")),
            RecordData::new("r3").with("score", json!(5.5)),
        ]
    }

    #[test]
    fn reduce_count_counts_values() {
        assert_eq!(reduce(&[1.0, 2.0, 3.0], ReduceOp::Count), Some(3.0));
        assert_eq!(reduce(&[], ReduceOp::Count), Some(0.0));
    }

    #[test]
    fn reduce_sum_and_avg() {
        assert_eq!(reduce(&[1.0, 2.0, 3.0], ReduceOp::Sum), Some(6.0));
        assert_eq!(reduce(&[1.0, 2.0, 3.0], ReduceOp::Avg), Some(2.0));
        assert_eq!(reduce(&[], ReduceOp::Sum), Some(0.0));
        assert_eq!(reduce(&[], ReduceOp::Avg), None);
    }

    #[test]
    fn reduce_min_max() {
        assert_eq!(reduce(&[4.0, -1.0, 9.0], ReduceOp::Min), Some(-1.0));
        assert_eq!(reduce(&[4.0, -1.0, 9.0], ReduceOp::Max), Some(9.0));
        assert_eq!(reduce(&[], ReduceOp::Max), None);
    }

    #[test]
    fn reduce_field_reads_non_numeric_as_zero() {
        let records = scores();
        assert_eq!(reduce_field(&records, "score", ReduceOp::Sum), Some(15.5));
        assert_eq!(reduce_field(&records, "score", ReduceOp::Min), Some(0.0));
        assert_eq!(reduce_field(&records, "missing", ReduceOp::Max), Some(0.0));
    }
}
