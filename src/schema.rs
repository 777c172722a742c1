//! Fixed output schemas for the three record categories.
//!
//! Each category maps one element tag of the Apple Health export to a
//! fixed, ordered list of attribute names. The column set of a table never
//! depends on which attributes actually appear in the input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag of the document root of an Apple Health export.
pub const ROOT_TAG: &str = "HealthData";

/// Tags that enclose large numbers of children.
///
/// The reader releases these as soon as they close even when no extractor
/// matched them.
pub const CONTAINER_TAGS: &[&str] = &[ROOT_TAG, "Correlation"];

/// Columns of `health_records.csv`
pub const RECORD_FIELDS: &[&str] = &[
    "type",
    "value",
    "unit",
    "sourceName",
    "sourceVersion",
    "device",
    "creationDate",
    "startDate",
    "endDate",
];

/// Columns of `workouts.csv`
pub const WORKOUT_FIELDS: &[&str] = &[
    "workoutActivityType",
    "duration",
    "durationUnit",
    "totalDistance",
    "totalDistanceUnit",
    "totalEnergyBurned",
    "totalEnergyBurnedUnit",
    "sourceName",
    "sourceVersion",
    "device",
    "creationDate",
    "startDate",
    "endDate",
];

/// Columns of `activity_summary.csv`
pub const ACTIVITY_SUMMARY_FIELDS: &[&str] = &[
    "dateComponents",
    "activeEnergyBurned",
    "activeEnergyBurnedGoal",
    "activeEnergyBurnedUnit",
    "appleMoveTime",
    "appleMoveTimeGoal",
    "appleExerciseTime",
    "appleExerciseTimeGoal",
    "appleStandHours",
    "appleStandHoursGoal",
];

/// Returns true if `tag` is a high fan-out container.
pub fn is_container_tag(tag: &str) -> bool {
    CONTAINER_TAGS.contains(&tag)
}

/// The kinds of data extracted from an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Point-in-time measurements (`Record` elements)
    #[serde(rename = "records", alias = "measurements")]
    Measurements,
    /// Workout sessions (`Workout` elements)
    #[serde(rename = "workouts")]
    Workouts,
    /// Daily activity ring summaries (`ActivitySummary` elements)
    #[serde(rename = "activity", alias = "activity-summaries")]
    ActivitySummaries,
}

impl Category {
    /// All categories in canonical execution order.
    pub const ALL: [Category; 3] = [
        Category::Measurements,
        Category::Workouts,
        Category::ActivitySummaries,
    ];

    /// Static schema for this category.
    pub fn schema(self) -> &'static CategorySchema {
        match self {
            Category::Measurements => &MEASUREMENTS,
            Category::Workouts => &WORKOUTS,
            Category::ActivitySummaries => &ACTIVITY_SUMMARIES,
        }
    }

    /// Name used on the command line and in config files.
    pub fn name(self) -> &'static str {
        match self {
            Category::Measurements => "records",
            Category::Workouts => "workouts",
            Category::ActivitySummaries => "activity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected records, workouts or activity)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "records" | "measurements" => Ok(Category::Measurements),
            "workouts" => Ok(Category::Workouts),
            "activity" | "activity-summaries" => Ok(Category::ActivitySummaries),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Static description of one category's output table.
#[derive(Debug)]
pub struct CategorySchema {
    /// Category described by this schema
    pub category: Category,
    /// Element tag that produces one row
    pub tag: &'static str,
    /// Attribute names projected into columns, in column order
    pub fields: &'static [&'static str],
    /// Output file name inside the output directory
    pub file_name: &'static str,
    /// Human-readable plural used in progress messages
    pub label: &'static str,
    /// Default number of rows between progress reports
    pub progress_interval: u64,
}

static MEASUREMENTS: CategorySchema = CategorySchema {
    category: Category::Measurements,
    tag: "Record",
    fields: RECORD_FIELDS,
    file_name: "health_records.csv",
    label: "health records",
    progress_interval: 100_000,
};

static WORKOUTS: CategorySchema = CategorySchema {
    category: Category::Workouts,
    tag: "Workout",
    fields: WORKOUT_FIELDS,
    file_name: "workouts.csv",
    label: "workouts",
    progress_interval: 1_000,
};

static ACTIVITY_SUMMARIES: CategorySchema = CategorySchema {
    category: Category::ActivitySummaries,
    tag: "ActivitySummary",
    fields: ACTIVITY_SUMMARY_FIELDS,
    file_name: "activity_summary.csv",
    label: "activity summaries",
    progress_interval: 1_000,
};

/// Deduplicate a category selection and sort it into canonical order.
///
/// An empty selection means all categories.
pub fn normalize_categories(selection: &[Category]) -> Vec<Category> {
    if selection.is_empty() {
        return Category::ALL.to_vec();
    }
    Category::ALL
        .into_iter()
        .filter(|c| selection.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_tags_and_files() {
        assert_eq!(Category::Measurements.schema().tag, "Record");
        assert_eq!(Category::Workouts.schema().tag, "Workout");
        assert_eq!(Category::ActivitySummaries.schema().tag, "ActivitySummary");

        assert_eq!(Category::Measurements.schema().file_name, "health_records.csv");
        assert_eq!(Category::Workouts.schema().file_name, "workouts.csv");
        assert_eq!(
            Category::ActivitySummaries.schema().file_name,
            "activity_summary.csv"
        );
    }

    #[test]
    fn test_field_counts() {
        assert_eq!(RECORD_FIELDS.len(), 9);
        assert_eq!(WORKOUT_FIELDS.len(), 13);
        assert_eq!(ACTIVITY_SUMMARY_FIELDS.len(), 10);
        for category in Category::ALL {
            assert_eq!(category.schema().category, category);
        }
    }

    #[test]
    fn test_progress_intervals() {
        assert_eq!(Category::Measurements.schema().progress_interval, 100_000);
        assert_eq!(Category::Workouts.schema().progress_interval, 1_000);
        assert_eq!(Category::ActivitySummaries.schema().progress_interval, 1_000);
    }

    #[test]
    fn test_parse_category_names() {
        assert_eq!("records".parse::<Category>().unwrap(), Category::Measurements);
        assert_eq!("measurements".parse::<Category>().unwrap(), Category::Measurements);
        assert_eq!("Workouts".parse::<Category>().unwrap(), Category::Workouts);
        assert_eq!(
            "activity-summaries".parse::<Category>().unwrap(),
            Category::ActivitySummaries
        );
        assert!("sleep".parse::<Category>().is_err());
    }

    #[test]
    fn test_normalize_categories() {
        assert_eq!(normalize_categories(&[]), Category::ALL.to_vec());
        assert_eq!(
            normalize_categories(&[
                Category::ActivitySummaries,
                Category::Measurements,
                Category::ActivitySummaries,
            ]),
            vec![Category::Measurements, Category::ActivitySummaries]
        );
    }

    #[test]
    fn test_container_tags() {
        assert!(is_container_tag("HealthData"));
        assert!(is_container_tag("Correlation"));
        assert!(!is_container_tag("Record"));
    }
}
