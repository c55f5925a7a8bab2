//! Aggregation services, one per analytic dataset.
//!
//! Two shaping families exist. The age-bracket datasets fetch raw rows and
//! count client-side; the rest let the warehouse group and count, then
//! flatten the (label, count) rows into a table.

use tracing::debug;

use crate::cache::CategoryCounts;
use crate::queries::{self, Dataset};
use crate::warehouse::{Value, Warehouse, WarehouseResult};

/// Diabetes cases per gender literal, optionally narrowed to an age bracket.
///
/// The warehouse returns one raw row per case; occurrences of the first
/// column are counted here.
pub async fn diabetes_by_age(
    warehouse: &dyn Warehouse,
    filter: &str,
) -> WarehouseResult<CategoryCounts> {
    let query = queries::diabetes_age(filter);
    let rows = warehouse.execute(&query.sql, &query.params).await?;

    let mut counts = CategoryCounts::new();
    for row in &rows {
        if let Some(label) = row.first() {
            *counts.entry(label.as_label()).or_insert(0) += 1;
        }
    }

    debug!(rows = rows.len(), categories = counts.len(), "shaped diabetes/age result");
    Ok(counts)
}

/// Diabetes cases per clinical BMI category, optionally narrowed to a gender.
///
/// The warehouse groups by (category, gender); the output is keyed by
/// category only, so when both genders appear for one category the later row
/// overwrites the earlier count. That lossy flattening is the documented
/// endpoint behavior and is kept as-is.
pub async fn diabetes_by_bmi(
    warehouse: &dyn Warehouse,
    filter: &str,
) -> WarehouseResult<CategoryCounts> {
    let query = queries::diabetes_bmi(filter);
    let rows = warehouse.execute(&query.sql, &query.params).await?;

    let mut counts = CategoryCounts::new();
    for row in &rows {
        if let [category, _gender, count] = row.as_slice() {
            counts.insert(category.as_label(), count.as_count());
        }
    }
    Ok(counts)
}

/// Positive heart-disease outcomes per gender label, optionally narrowed to
/// an age bracket.
///
/// Raw sex codes are relabeled before counting: 1 is `Male`, 0 is `Female`,
/// and anything else (including NULL) is `Unknown`.
pub async fn heart_by_gender(
    warehouse: &dyn Warehouse,
    filter: &str,
) -> WarehouseResult<CategoryCounts> {
    let query = queries::heart_gender(filter);
    let rows = warehouse.execute(&query.sql, &query.params).await?;

    let mut counts = CategoryCounts::new();
    for row in &rows {
        if let Some(sex) = row.first() {
            let label = match sex.as_code() {
                Some(1) => "Male",
                Some(0) => "Female",
                _ => "Unknown",
            };
            *counts.entry(label.to_string()).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

/// Heart rows per chest-pain category, optionally narrowed by sex code.
pub async fn heart_by_symptoms(
    warehouse: &dyn Warehouse,
    filter: &str,
) -> WarehouseResult<CategoryCounts> {
    let query = queries::heart_symptoms(filter);
    let rows = warehouse.execute(&query.sql, &query.params).await?;
    Ok(flatten_label_count(&rows))
}

/// Breast-cancer deaths per age decade, optionally narrowed to a tumor stage.
pub async fn breast_cancer_by_stage(
    warehouse: &dyn Warehouse,
    filter: &str,
) -> WarehouseResult<CategoryCounts> {
    let query = queries::breast_cancer_stage(filter);
    let rows = warehouse.execute(&query.sql, &query.params).await?;
    Ok(flatten_label_count(&rows))
}

/// Run the service for a dataset.
pub async fn compute(
    dataset: Dataset,
    warehouse: &dyn Warehouse,
    filter: &str,
) -> WarehouseResult<CategoryCounts> {
    match dataset {
        Dataset::DiabetesAge => diabetes_by_age(warehouse, filter).await,
        Dataset::DiabetesBmi => diabetes_by_bmi(warehouse, filter).await,
        Dataset::HeartGender => heart_by_gender(warehouse, filter).await,
        Dataset::HeartSymptoms => heart_by_symptoms(warehouse, filter).await,
        Dataset::BreastCancerStage => breast_cancer_by_stage(warehouse, filter).await,
    }
}

/// Shape pre-grouped (label, count) rows into a table. Short rows are skipped.
fn flatten_label_count(rows: &[Vec<Value>]) -> CategoryCounts {
    let mut counts = CategoryCounts::new();
    for row in rows {
        if let [label, count] = row.as_slice() {
            counts.insert(label.as_label(), count.as_count());
        }
    }
    counts
}

#[cfg(test)]
#[cfg(feature = "local-repo")]
mod tests {
    use super::*;
    use crate::warehouse::LocalWarehouse;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[tokio::test]
    async fn test_diabetes_by_age_counts_raw_rows() {
        let warehouse = LocalWarehouse::new();
        warehouse.push_rows(vec![
            vec![text("Male")],
            vec![text("Female")],
            vec![text("Male")],
        ]);

        let counts = diabetes_by_age(&warehouse, "all").await.unwrap();
        assert_eq!(counts.get("Male"), Some(&2));
        assert_eq!(counts.get("Female"), Some(&1));
    }

    #[tokio::test]
    async fn test_heart_by_gender_relabels_sex_codes() {
        let warehouse = LocalWarehouse::new();
        warehouse.push_rows(vec![
            vec![Value::Int(1)],
            vec![Value::Int(1)],
            vec![Value::Int(0)],
            vec![Value::Int(9)],
            vec![Value::Null],
        ]);

        let counts = heart_by_gender(&warehouse, "under30").await.unwrap();
        assert_eq!(counts.get("Male"), Some(&2));
        assert_eq!(counts.get("Female"), Some(&1));
        assert_eq!(counts.get("Unknown"), Some(&2));
    }

    #[tokio::test]
    async fn test_diabetes_by_bmi_drops_gender_dimension() {
        let warehouse = LocalWarehouse::new();
        warehouse.push_rows(vec![
            vec![text("Underweight (Severe thinness)"), text("Male"), Value::Int(1)],
            vec![text("Normal range"), text("Female"), Value::Int(1)],
        ]);

        let counts = diabetes_by_bmi(&warehouse, "all").await.unwrap();
        assert_eq!(counts.get("Underweight (Severe thinness)"), Some(&1));
        assert_eq!(counts.get("Normal range"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[tokio::test]
    async fn test_diabetes_by_bmi_last_gender_row_wins() {
        let warehouse = LocalWarehouse::new();
        warehouse.push_rows(vec![
            vec![text("Normal range"), text("Female"), Value::Int(12)],
            vec![text("Normal range"), text("Male"), Value::Int(8)],
        ]);

        let counts = diabetes_by_bmi(&warehouse, "all").await.unwrap();
        assert_eq!(counts.get("Normal range"), Some(&8));
    }

    #[tokio::test]
    async fn test_heart_by_symptoms_maps_grouped_rows() {
        let warehouse = LocalWarehouse::new();
        warehouse.push_rows(vec![
            vec![text("Typical angina"), Value::Int(4)],
            vec![text("Asymptomatic"), Value::Int(2)],
        ]);

        let counts = heart_by_symptoms(&warehouse, "1").await.unwrap();
        assert_eq!(counts.get("Typical angina"), Some(&4));
        assert_eq!(counts.get("Asymptomatic"), Some(&2));
    }

    #[tokio::test]
    async fn test_breast_cancer_by_stage_maps_grouped_rows() {
        let warehouse = LocalWarehouse::new();
        warehouse.push_rows(vec![
            vec![text("40-49"), Value::Int(6)],
            vec![text("Other"), Value::Int(1)],
        ]);

        let counts = breast_cancer_by_stage(&warehouse, "T2").await.unwrap();
        assert_eq!(counts.get("40-49"), Some(&6));
        assert_eq!(counts.get("Other"), Some(&1));

        let calls = warehouse.calls();
        assert_eq!(calls[0].params, vec!["T2"]);
    }

    #[tokio::test]
    async fn test_execution_failure_propagates() {
        let warehouse = LocalWarehouse::new();
        warehouse.push_error(crate::warehouse::WarehouseError::query(
            "relation \"heart\" does not exist",
        ));

        let result = heart_by_gender(&warehouse, "all").await;
        assert!(result.is_err());
    }
}
