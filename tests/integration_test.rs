//! Integration tests for healthkit-extract
//!
//! These tests run full extractions against synthetic exports on disk.

use healthkit_extract::pipeline::{ExtractionError, ExtractionStrategy, HealthExtractor};
use healthkit_extract::schema::{Category, ACTIVITY_SUMMARY_FIELDS, RECORD_FIELDS, WORKOUT_FIELDS};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FULL_EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE HealthData [
<!ELEMENT HealthData (ExportDate,Me,(Record|Correlation|Workout|ActivitySummary|ClinicalRecord)*)>
<!ATTLIST HealthData
  locale CDATA #REQUIRED
>
]>
<HealthData locale="en_US">
 <ExportDate value="2024-02-01 08:00:00 +0000"/>
 <Me HKCharacteristicTypeIdentifierDateOfBirth="1990-01-01" HKCharacteristicTypeIdentifierBiologicalSex="HKBiologicalSexFemale"/>
 <Record type="HKQuantityTypeIdentifierHeartRate" sourceName="Jane&apos;s Apple Watch" sourceVersion="10.2" device="&lt;&lt;HKDevice: 0x1&gt;, name:Apple Watch, manufacturer:Apple Inc.&gt;" unit="count/min" creationDate="2024-01-01 08:01:00 +0000" startDate="2024-01-01 08:00:00 +0000" endDate="2024-01-01 08:00:00 +0000" value="72">
  <MetadataEntry key="HKMetadataKeyHeartRateMotionContext" value="0"/>
 </Record>
 <Record type="HKQuantityTypeIdentifierStepCount" sourceName="iPhone" unit="count" value="1,204"/>
 <Correlation type="HKCorrelationTypeIdentifierBloodPressure" sourceName="Omron">
  <Record type="HKQuantityTypeIdentifierBloodPressureSystolic" unit="mmHg" value="118"/>
  <Record type="HKQuantityTypeIdentifierBloodPressureDiastolic" unit="mmHg" value="79"/>
 </Correlation>
 <Workout workoutActivityType="HKWorkoutActivityTypeRunning" duration="31.25" durationUnit="min" totalDistance="5.01" totalDistanceUnit="km" totalEnergyBurned="320" totalEnergyBurnedUnit="kcal" sourceName="Watch" startDate="2024-01-02 07:00:00 +0000" endDate="2024-01-02 07:31:15 +0000">
  <WorkoutEvent type="HKWorkoutEventTypeSegment" date="2024-01-02 07:10:00 +0000"/>
  <WorkoutRoute sourceName="Watch">
   <FileReference path="/workout-routes/route_2024-01-02.gpx"/>
  </WorkoutRoute>
 </Workout>
 <Workout workoutActivityType="HKWorkoutActivityTypeYoga" duration="45"/>
 <ActivitySummary dateComponents="2024-01-01" activeEnergyBurned="512.3" activeEnergyBurnedGoal="500" activeEnergyBurnedUnit="Cal" appleMoveTime="0" appleMoveTimeGoal="0" appleExerciseTime="35" appleExerciseTimeGoal="30" appleStandHours="11" appleStandHoursGoal="12"/>
 <ActivitySummary dateComponents="2024-01-02"/>
</HealthData>
"#;

fn write_export(dir: &Path, xml: &str) -> PathBuf {
    let path = dir.join("export.xml");
    fs::write(&path, xml).unwrap();
    path
}

fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

/// One Record without sourceName yields exactly the documented header and row
#[test]
fn test_single_heart_rate_record() {
    let dir = tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<HealthData><Record type="HeartRate" value="72" unit="count/min"/></HealthData>"#,
    );
    let out = dir.path().join("out");

    let stats = HealthExtractor::new()
        .with_categories(&[Category::Measurements])
        .run(&input, &out)
        .unwrap();

    assert_eq!(stats.total_records(), 1);
    assert_eq!(
        fs::read_to_string(out.join("health_records.csv")).unwrap(),
        "type,value,unit,sourceName,sourceVersion,device,creationDate,startDate,endDate\n\
         HeartRate,72,count/min,,,,,,\n"
    );
}

#[test]
fn test_full_export_all_categories() {
    let dir = tempdir().unwrap();
    let input = write_export(dir.path(), FULL_EXPORT);
    let out = dir.path().join("nested").join("output");

    let stats = HealthExtractor::new().run(&input, &out).unwrap();
    assert_eq!(stats.total_records(), 8);

    let (header, rows) = read_table(&out.join("health_records.csv"));
    assert_eq!(header, RECORD_FIELDS);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][3], "Jane's Apple Watch");
    assert_eq!(
        rows[0][5],
        "<<HKDevice: 0x1>, name:Apple Watch, manufacturer:Apple Inc.>"
    );
    // Values are carried through as text
    assert_eq!(rows[1][1], "1,204");
    assert_eq!(rows[2][0], "HKQuantityTypeIdentifierBloodPressureSystolic");
    assert_eq!(rows[3][0], "HKQuantityTypeIdentifierBloodPressureDiastolic");

    let (header, rows) = read_table(&out.join("workouts.csv"));
    assert_eq!(header, WORKOUT_FIELDS);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "HKWorkoutActivityTypeRunning");
    assert_eq!(rows[0][3], "5.01");
    assert_eq!(rows[1][0], "HKWorkoutActivityTypeYoga");
    assert!(rows[1][2..].iter().all(String::is_empty));

    let (header, rows) = read_table(&out.join("activity_summary.csv"));
    assert_eq!(header, ACTIVITY_SUMMARY_FIELDS);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], "512.3");
    assert_eq!(rows[1][0], "2024-01-02");
    assert!(rows[1][1..].iter().all(String::is_empty));
}

#[test]
fn test_zero_workouts_produces_no_file() {
    let dir = tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<HealthData><Record type="HeartRate" value="60"/></HealthData>"#,
    );
    let out = dir.path().join("out");

    let stats = HealthExtractor::new()
        .with_categories(&[Category::Workouts])
        .run(&input, &out)
        .unwrap();

    let workouts = stats.category(Category::Workouts).unwrap();
    assert_eq!(workouts.records, 0);
    assert!(workouts.output.is_none());
    assert!(!out.join("workouts.csv").exists());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_only_measurements_selected() {
    let dir = tempdir().unwrap();
    let input = write_export(dir.path(), FULL_EXPORT);
    let out = dir.path().join("out");

    for strategy in [ExtractionStrategy::SinglePass, ExtractionStrategy::PerCategory] {
        HealthExtractor::new()
            .with_categories(&[Category::Measurements])
            .with_strategy(strategy)
            .run(&input, &out)
            .unwrap();

        let files: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files, vec!["health_records.csv"]);
    }
}

#[test]
fn test_idempotent_output() {
    let dir = tempdir().unwrap();
    let input = write_export(dir.path(), FULL_EXPORT);
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    HealthExtractor::new().run(&input, &first).unwrap();
    HealthExtractor::new().run(&input, &second).unwrap();
    // Running again into the same directory overwrites with identical bytes
    HealthExtractor::new().run(&input, &first).unwrap();

    for file in ["health_records.csv", "workouts.csv", "activity_summary.csv"] {
        assert_eq!(
            fs::read(first.join(file)).unwrap(),
            fs::read(second.join(file)).unwrap(),
            "{} differs between runs",
            file
        );
    }
}

#[test]
fn test_strategies_agree_on_full_export() {
    let dir = tempdir().unwrap();
    let input = write_export(dir.path(), FULL_EXPORT);
    let single = dir.path().join("single");
    let per_category = dir.path().join("per_category");

    let a = HealthExtractor::new()
        .with_strategy(ExtractionStrategy::SinglePass)
        .run(&input, &single)
        .unwrap();
    let b = HealthExtractor::new()
        .with_strategy(ExtractionStrategy::PerCategory)
        .run(&input, &per_category)
        .unwrap();

    assert_eq!(a.total_records(), b.total_records());
    for file in ["health_records.csv", "workouts.csv", "activity_summary.csv"] {
        assert_eq!(
            fs::read(single.join(file)).unwrap(),
            fs::read(per_category.join(file)).unwrap()
        );
    }
}

#[test]
fn test_missing_input_does_not_create_output_dir() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");

    let err = HealthExtractor::new()
        .run(dir.path().join("nope.xml"), &out)
        .unwrap_err();

    assert!(matches!(err, ExtractionError::InputNotFound(_)));
    assert!(err.to_string().contains("nope.xml"));
    assert!(!out.exists());
}

#[test]
fn test_malformed_xml_aborts_remaining_categories() {
    let dir = tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<HealthData>
            <Record type="A" value="1"/>
            <Workout workoutActivityType="Walk">
            <ActivitySummary dateComponents="2024-01-01"/>
        </HealthData>"#,
    );
    let out = dir.path().join("out");

    let err = HealthExtractor::new()
        .with_strategy(ExtractionStrategy::PerCategory)
        .run(&input, &out)
        .unwrap_err();

    assert!(matches!(err, ExtractionError::XmlError(_)));
    // The first traversal already failed, so nothing was persisted
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

/// Tables get the same mode as any file created under the current umask
#[cfg(unix)]
#[test]
fn test_tables_use_default_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let input = write_export(dir.path(), FULL_EXPORT);
    let out = dir.path().join("out");

    HealthExtractor::new().run(&input, &out).unwrap();

    let plain = out.join("plain.txt");
    fs::write(&plain, "x").unwrap();
    let expected = fs::metadata(&plain).unwrap().permissions().mode() & 0o777;

    for file in ["health_records.csv", "workouts.csv", "activity_summary.csv"] {
        let mode = fs::metadata(out.join(file)).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected, "{} has mode {:o}", file, mode);
    }
}
