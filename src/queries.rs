//! Aggregation query builders for the analytic datasets.
//!
//! Each builder turns a user-supplied filter token into a `(sql, params)`
//! pair ready for parameterized execution. Only fixed SQL fragments are ever
//! concatenated; the closed set of recognized tokens selects which fragments
//! appear, and the filter's concrete value travels as a bound parameter
//! wherever it is used as data.
//!
//! A token outside the recognized set does not fail the build: the filter
//! restriction is omitted entirely, making the query identical to `all`.
//! This fall-through is part of the endpoint contract.

use std::fmt;

/// The canonical "no filter" token.
pub const FILTER_ALL: &str = "all";

/// Identity of an analytic dataset, one per HTTP endpoint.
///
/// Also serves as the first half of the result-cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    DiabetesAge,
    DiabetesBmi,
    HeartGender,
    HeartSymptoms,
    BreastCancerStage,
}

impl Dataset {
    /// All datasets, in route order.
    pub const ALL: [Dataset; 5] = [
        Dataset::DiabetesAge,
        Dataset::DiabetesBmi,
        Dataset::HeartGender,
        Dataset::HeartSymptoms,
        Dataset::BreastCancerStage,
    ];
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dataset::DiabetesAge => "diabetes_age",
            Dataset::DiabetesBmi => "diabetes_bmi",
            Dataset::HeartGender => "heart_gender",
            Dataset::HeartSymptoms => "heart_symptoms",
            Dataset::BreastCancerStage => "breast_cancer_stage",
        };
        f.write_str(name)
    }
}

/// A query text plus its bound parameters, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Append the age-bracket restriction shared by the diabetes-by-age and
/// heart-by-gender queries. Unrecognized tokens (and `all`) add nothing.
fn push_age_bracket(sql: &mut String, filter: &str) {
    match filter {
        "under30" => sql.push_str("AND age < 30 "),
        "30to60" => sql.push_str("AND age BETWEEN 30 AND 60 "),
        "over60" => sql.push_str("AND age > 60 "),
        _ => {}
    }
}

/// Diabetes cases broken down by gender, optionally narrowed to an age
/// bracket. Counting happens client-side over the raw rows.
pub fn diabetes_age(filter: &str) -> BuiltQuery {
    let mut sql = String::from(
        "SELECT \
            gender \
        FROM \
            diabetes \
        WHERE \
            diabetes = 1 ",
    );
    push_age_bracket(&mut sql, filter);
    sql.push_str("LIMIT 50;");

    BuiltQuery {
        sql,
        params: Vec::new(),
    }
}

/// Diabetes rows bucketed into the eight-class clinical BMI classification,
/// grouped by (category, gender) in the warehouse. The gender predicate is
/// satisfied unconditionally when the filter is `all`.
pub fn diabetes_bmi(filter: &str) -> BuiltQuery {
    let sql = String::from(
        "SELECT \
            bmi_category, \
            gender, \
            COUNT(*) AS count \
        FROM ( \
            SELECT \
                CASE \
                    WHEN bmi < 16.0 THEN 'Underweight (Severe thinness)' \
                    WHEN bmi BETWEEN 16.0 AND 16.9 THEN 'Underweight (Moderate thinness)' \
                    WHEN bmi BETWEEN 17.0 AND 18.4 THEN 'Underweight (Mild thinness)' \
                    WHEN bmi BETWEEN 18.5 AND 24.9 THEN 'Normal range' \
                    WHEN bmi BETWEEN 25.0 AND 29.9 THEN 'Overweight (Pre-obese)' \
                    WHEN bmi BETWEEN 30.0 AND 34.9 THEN 'Obese (Class I)' \
                    WHEN bmi BETWEEN 35.0 AND 39.9 THEN 'Obese (Class II)' \
                    ELSE 'Obese (Class III)' \
                END AS bmi_category, \
                gender \
            FROM \
                diabetes \
            WHERE \
                ('all' = $1 OR gender = $2) \
            LIMIT 100 \
        ) AS sub \
        GROUP BY \
            bmi_category, gender \
        ORDER BY \
            bmi_category, gender;",
    );

    BuiltQuery {
        sql,
        params: vec![filter.to_string(), filter.to_string()],
    }
}

/// Positive heart-disease outcomes broken down by raw sex code, optionally
/// narrowed to an age bracket. Relabeling and counting happen client-side.
pub fn heart_gender(filter: &str) -> BuiltQuery {
    let mut sql = String::from(
        "SELECT \
            sex \
        FROM \
            heart \
        WHERE \
            output = 1 ",
    );
    push_age_bracket(&mut sql, filter);
    sql.push_str("LIMIT 50;");

    BuiltQuery {
        sql,
        params: Vec::new(),
    }
}

/// Heart rows bucketed by chest-pain category, optionally narrowed by sex
/// code, grouped and counted in the warehouse.
///
/// When the filter is `all` the equality side of the predicate still needs a
/// castable value, so the second parameter defaults to the literal `1`. The
/// predicate short-circuits on `$1 = 'all'`, so the default never selects
/// anything by itself.
pub fn heart_symptoms(filter: &str) -> BuiltQuery {
    let sql = String::from(
        "SELECT \
            cp_category, \
            COUNT(*) AS count \
        FROM ( \
            SELECT \
                CASE \
                    WHEN cp = 0 THEN 'Typical angina' \
                    WHEN cp = 1 THEN 'Atypical angina' \
                    WHEN cp = 2 THEN 'Non-anginal pain' \
                    WHEN cp = 3 THEN 'Asymptomatic' \
                    ELSE 'Unknown' \
                END AS cp_category \
            FROM \
                heart \
            WHERE \
                $1 = 'all' OR sex = CAST($2 AS INTEGER) \
            LIMIT 100 \
        ) AS subquery \
        GROUP BY \
            cp_category;",
    );

    let sex_param = if filter == FILTER_ALL {
        "1".to_string()
    } else {
        filter.to_string()
    };

    BuiltQuery {
        sql,
        params: vec![filter.to_string(), sex_param],
    }
}

/// Breast-cancer deaths bucketed by age decade, optionally narrowed to an
/// exact tumor stage, grouped and counted in the warehouse.
pub fn breast_cancer_stage(filter: &str) -> BuiltQuery {
    let mut where_clause = String::from("WHERE Status = 'Dead'");
    let mut params = Vec::new();
    if filter != FILTER_ALL {
        where_clause.push_str(" AND \"T Stage\" = $1");
        params.push(filter.to_string());
    }

    let sql = format!(
        "SELECT \
            Age_Bin, \
            COUNT(*) AS Count \
        FROM ( \
            SELECT \
                CASE \
                    WHEN Age >= 30 AND Age < 40 THEN '30-39' \
                    WHEN Age >= 40 AND Age < 50 THEN '40-49' \
                    WHEN Age >= 50 AND Age < 60 THEN '50-59' \
                    WHEN Age >= 60 AND Age < 70 THEN '60-69' \
                    ELSE 'Other' \
                END AS Age_Bin \
            FROM \
                breastcancer \
            {where_clause} \
            LIMIT 100 \
        ) AS AgeBins \
        GROUP BY \
            Age_Bin \
        ORDER BY \
            Age_Bin;"
    );

    BuiltQuery { sql, params }
}

/// Build the query for a dataset from its filter token.
pub fn build(dataset: Dataset, filter: &str) -> BuiltQuery {
    match dataset {
        Dataset::DiabetesAge => diabetes_age(filter),
        Dataset::DiabetesBmi => diabetes_bmi(filter),
        Dataset::HeartGender => heart_gender(filter),
        Dataset::HeartSymptoms => heart_symptoms(filter),
        Dataset::BreastCancerStage => breast_cancer_stage(filter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diabetes_age_brackets() {
        let under = diabetes_age("under30");
        assert!(under.sql.contains("AND age < 30"));
        let mid = diabetes_age("30to60");
        assert!(mid.sql.contains("AND age BETWEEN 30 AND 60"));
        let over = diabetes_age("over60");
        assert!(over.sql.contains("AND age > 60"));
        let all = diabetes_age("all");
        assert!(!all.sql.contains("AND age"));
        assert!(all.sql.ends_with("LIMIT 50;"));
        assert!(all.params.is_empty());
    }

    #[test]
    fn test_unrecognized_filter_matches_all() {
        // The age-bracket builders have a closed token set; anything outside
        // it falls through to the unrestricted query.
        for dataset in [Dataset::DiabetesAge, Dataset::HeartGender] {
            let garbage = build(dataset, "next_week");
            let all = build(dataset, "all");
            assert_eq!(garbage, all, "{dataset}");
        }
        // The parameterized builders keep the same SQL text and pass the
        // token through as data, where the warehouse matches it (or nothing).
        for dataset in [Dataset::DiabetesBmi, Dataset::HeartSymptoms] {
            let garbage = build(dataset, "next_week");
            let all = build(dataset, "all");
            assert_eq!(garbage.sql, all.sql, "{dataset}");
        }
    }

    #[test]
    fn test_filter_value_never_in_sql_text() {
        let token = "under30'; DROP TABLE diabetes;--";
        for dataset in Dataset::ALL {
            let query = build(dataset, token);
            assert!(!query.sql.contains(token), "{dataset}");
        }
    }

    #[test]
    fn test_diabetes_bmi_params() {
        let query = diabetes_bmi("Male");
        assert_eq!(query.params, vec!["Male", "Male"]);
        assert!(query.sql.contains("('all' = $1 OR gender = $2)"));
        assert!(query.sql.contains("GROUP BY"));
        assert!(query.sql.contains("LIMIT 100"));
    }

    #[test]
    fn test_heart_symptoms_all_defaults_sex_param() {
        let all = heart_symptoms("all");
        assert_eq!(all.params, vec!["all", "1"]);

        let filtered = heart_symptoms("0");
        assert_eq!(filtered.params, vec!["0", "0"]);
        assert!(filtered.sql.contains("CAST($2 AS INTEGER)"));
    }

    #[test]
    fn test_breast_cancer_stage_param_presence() {
        let all = breast_cancer_stage("all");
        assert!(all.params.is_empty());
        assert!(!all.sql.contains("T Stage"));

        let staged = breast_cancer_stage("T2");
        assert_eq!(staged.params, vec!["T2"]);
        assert!(staged.sql.contains("AND \"T Stage\" = $1"));
        assert!(staged.sql.contains("WHERE Status = 'Dead'"));
    }

    #[test]
    fn test_dataset_display_names() {
        assert_eq!(Dataset::DiabetesAge.to_string(), "diabetes_age");
        assert_eq!(Dataset::BreastCancerStage.to_string(), "breast_cancer_stage");
    }
}
