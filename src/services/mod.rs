//! Service layer for aggregation and result shaping.
//!
//! This module sits between the HTTP handlers and the warehouse: each
//! function builds the dataset's parameterized query, executes it, and shapes
//! the returned rows into the category-count table served to clients.

pub mod analytics;

pub use analytics::{
    breast_cancer_by_stage, compute, diabetes_by_age, diabetes_by_bmi, heart_by_gender,
    heart_by_symptoms,
};
