//! Integration tests for the bikeshare library.

use std::fs;
use std::io::Write;
use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use tempfile::{NamedTempFile, TempDir};

use bikeshare::predict::{
    ConstantRegressor, DecisionTree, IdentityScaler, LinearRegressor, MinMaxScaler,
    RandomForestRegressor, RegressorArtifact, ScalerArtifact, StandardScaler,
};
use bikeshare::schema::ColumnMapping;
use bikeshare::{
    BikeshareError, Dashboard, DashboardConfig, DataSource, FilterSpec, ModelBundle,
    PredictionInput, PredictionMode, Predictor, Season, Weather,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dashboard_for(file: &NamedTempFile) -> Dashboard {
    Dashboard::new(DashboardConfig::new(DataSource::File(file.path().to_path_buf())))
}

/// Two Mondays in January plus a Saturday in February, with hourly rows
/// repeated per date as the merge produces them.
const MERGED_CSV: &str = "\
instant_x,dteday,season,yr,mnth,hr,weathersit_x,cnt_x,weathersit_y,cnt_y,Level_deman_x
1,2011-01-03,1,0,1,0,1,100,1,5,Low
1,2011-01-03,1,0,1,1,1,100,1,7,Low
2,2011-01-10,1,0,1,0,2,200,2,9,Medium
3,2011-02-05,1,0,2,8,3,50,3,3,Low
";

// =============================================================================
// Views
// =============================================================================

#[test]
fn test_weekday_average_end_to_end() {
    let file = create_test_file(
        "dteday,season,hr,weathersit_x,cnt_x,weathersit_y,cnt_y\n\
         2011-01-03,1,0,1,100,1,10\n\
         2011-01-10,1,0,1,200,1,20\n",
    );
    let dashboard = dashboard_for(&file);
    let filter = dashboard.default_filter().expect("Filter failed");
    let views = dashboard.views(&filter).expect("Views failed");

    let weekdays = &views.weekday_average.data;
    assert_eq!(weekdays.len(), 1);
    assert_eq!(weekdays[0].weekday, Weekday::Mon);
    assert_eq!(weekdays[0].mean, 150.0);
}

#[test]
fn test_all_views_from_merged_file() {
    let file = create_test_file(MERGED_CSV);
    let dashboard = dashboard_for(&file);
    let tables = dashboard.tables().expect("Load failed");

    // Daily rows are de-duplicated by date, hourly rows are not
    assert_eq!(tables.daily.len(), 3);
    assert_eq!(tables.hourly.len(), 4);
    assert_eq!(tables.daily[0].level.as_deref(), Some("Low"));

    let filter = dashboard.default_filter().unwrap();
    let views = dashboard.views(&filter).unwrap();

    let months: Vec<(&str, u64)> = views
        .monthly_total
        .data
        .iter()
        .map(|m| (m.period.as_str(), m.total))
        .collect();
    assert_eq!(months, vec![("2011-01", 300), ("2011-02", 50)]);

    let hours: Vec<(u8, f64)> = views
        .hourly_average
        .data
        .iter()
        .map(|h| (h.hour, h.mean))
        .collect();
    assert_eq!(hours, vec![(0, 7.0), (1, 7.0), (8, 3.0)]);

    assert_eq!(views.weekday_hour.data.cell(Weekday::Mon, 0), Some(7.0));
    assert_eq!(views.weekday_hour.data.cell(Weekday::Sat, 8), Some(3.0));
    assert_eq!(views.weekday_hour.data.cell(Weekday::Sun, 8), None);

    let weather: Vec<(&str, u64)> = views
        .weather_total
        .data
        .iter()
        .map(|w| (w.label.as_str(), w.total))
        .collect();
    assert_eq!(
        weather,
        vec![
            ("Clear/Partly Cloudy", 100),
            ("Mist/Cloudy", 200),
            ("Light Rain/Snow", 50)
        ]
    );
    assert_eq!(views.season_total.data.len(), 1);
    assert_eq!(views.season_total.data[0].total, 350);
}

#[test]
fn test_filter_applies_to_both_tables() {
    let file = create_test_file(MERGED_CSV);
    let dashboard = dashboard_for(&file);
    let filter = dashboard
        .default_filter()
        .unwrap()
        .with_weathers([Weather::MIST]);
    let views = dashboard.views(&filter).unwrap();

    assert_eq!(views.weekday_average.data.len(), 1);
    assert_eq!(views.weekday_average.data[0].mean, 200.0);
    // Hourly weather is filtered on its own column
    assert_eq!(views.hourly_average.data.len(), 1);
    assert_eq!(views.hourly_average.data[0].mean, 9.0);
}

#[test]
fn test_empty_selection_gives_empty_views() {
    let file = create_test_file(MERGED_CSV);
    let dashboard = dashboard_for(&file);
    let filter = dashboard
        .default_filter()
        .unwrap()
        .with_range(date(2011, 3, 1), date(2011, 1, 1));
    let views = dashboard.views(&filter).unwrap();

    assert!(views.weekday_average.data.is_empty());
    assert!(views.monthly_total.data.is_empty());
    assert_eq!(views.weekday_hour.data.rows.len(), 7);
    assert!(
        views
            .weekday_hour
            .data
            .rows
            .iter()
            .all(|r| r.cells.iter().all(Option::is_none))
    );
}

#[test]
fn test_views_serialize_for_rendering() {
    let file = create_test_file(MERGED_CSV);
    let dashboard = dashboard_for(&file);
    let views = dashboard.views(&dashboard.default_filter().unwrap()).unwrap();
    let json = serde_json::to_value(&views).unwrap();

    assert_eq!(json["weekday_average"]["chart"], "horizontal_bar");
    assert_eq!(json["season_total"]["chart"], "pie");
    assert_eq!(json["weekday_average"]["data"][0]["weekday"], "Monday");
    assert_eq!(json["weekday_hour"]["data"]["rows"][6]["weekday"], "Sunday");
    assert!(json["weekday_hour"]["data"]["rows"][6]["cells"][0].is_null());
}

#[test]
fn test_split_tables_with_tsv() {
    let day = create_test_file(
        "dteday\tseason\tweathersit\tcnt\n\
         2012-06-04\t2\t1\t5000\n\
         2012-06-05\t2\t2\t4000\n",
    );
    let hour = create_test_file(
        "dteday\tseason\thr\tweathersit\tcnt\n\
         2012-06-04\t2\t17\t1\t600\n",
    );
    let config = DashboardConfig::new(DataSource::File(day.path().to_path_buf()))
        .with_hourly_source(DataSource::File(hour.path().to_path_buf()))
        .with_columns(ColumnMapping::split());
    let dashboard = Dashboard::new(config);

    let tables = dashboard.tables().expect("Split load failed");
    assert_eq!(tables.daily.len(), 2);
    assert_eq!(tables.hourly.len(), 1);
    assert_eq!(tables.daily[1].weather, Weather::MIST);
    assert_eq!(tables.hourly[0].season, Season::SUMMER);

    let formats: Vec<(&str, usize)> = tables
        .sources
        .iter()
        .map(|m| (m.format.as_str(), m.row_count))
        .collect();
    assert_eq!(formats, vec![("tsv", 2), ("tsv", 1)]);
    assert_ne!(tables.sources[0].hash, tables.sources[1].hash);
}

// =============================================================================
// Load failures
// =============================================================================

#[test]
fn test_missing_columns_all_named() {
    let file = create_test_file("dteday,season,cnt_x\n2011-01-01,1,5\n");
    let err = dashboard_for(&file).tables().unwrap_err();
    match err {
        BikeshareError::Schema { missing } => {
            assert!(missing.contains(&"weathersit_x".to_string()));
            assert!(missing.contains(&"hr".to_string()));
            assert!(missing.contains(&"cnt_y".to_string()));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_unparsable_date_names_cell() {
    let file = create_test_file(
        "dteday,season,hr,weathersit_x,cnt_x,weathersit_y,cnt_y\n\
         2011-01-01,1,0,1,5,1,5\n\
         not-a-date,1,0,1,5,1,5\n",
    );
    let err = dashboard_for(&file).tables().unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, BikeshareError::Parse { row: 2, .. }));
    assert!(message.contains("dteday"));
    assert!(message.contains("not-a-date"));
}

// =============================================================================
// Caching
// =============================================================================

#[test]
fn test_normalizing_twice_returns_identical_tables() {
    let file = create_test_file(MERGED_CSV);
    let dashboard = dashboard_for(&file);
    let first = dashboard.tables().unwrap();
    let second = dashboard.tables().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // A fresh context reloads and produces equal output
    let other = dashboard_for(&file).tables().unwrap();
    assert_eq!(*first, *other);
}

#[test]
fn test_changed_source_is_reloaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("main_data.csv");
    fs::write(&path, MERGED_CSV).unwrap();
    let dashboard = Dashboard::new(DashboardConfig::new(DataSource::File(path.clone())));
    let before = dashboard.tables().unwrap();

    let appended = format!("{}4,2011-02-06,1,0,2,0,1,70,1,2,Low\n", MERGED_CSV);
    fs::write(&path, appended).unwrap();
    let after = dashboard.tables().unwrap();

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.daily.len(), before.daily.len() + 1);
}

// =============================================================================
// Prediction
// =============================================================================

fn reference_input() -> PredictionInput {
    serde_json::from_str(
        r#"{
            "season": 1, "year": 0, "month": 6, "holiday": 0, "weekday": 3,
            "workingday": 1, "weather": 1, "temp": 0.5, "feels_like_temp": 0.5,
            "humidity": 0.5, "windspeed": 0.2
        }"#,
    )
    .unwrap()
}

fn write_models(dir: &TempDir) {
    let bundle = ModelBundle {
        dir: dir.path().to_path_buf(),
        day_scaler: ScalerArtifact::Standard(StandardScaler::new(vec![0.0; 11], vec![1.0; 11])),
        hour_scaler: ScalerArtifact::MinMax(MinMaxScaler::new(vec![0.0; 12], vec![1.0; 12])),
        day_model: RegressorArtifact::RandomForest(RandomForestRegressor::new(
            11,
            vec![
                // Splits on temp (column 7)
                DecisionTree {
                    children_left: vec![1, -1, -1],
                    children_right: vec![2, -1, -1],
                    feature: vec![7, -2, -2],
                    threshold: vec![0.4, -2.0, -2.0],
                    value: vec![3000.0, 2000.0, 5000.0],
                },
                DecisionTree::leaf(4000.0),
            ],
        )),
        hour_model: RegressorArtifact::Linear(LinearRegressor::new(
            {
                let mut coefficients = vec![0.0; 12];
                coefficients[3] = 10.0;
                coefficients
            },
            -50.0,
        )),
    };
    bundle.save(dir.path()).unwrap();
}

#[test]
fn test_reference_input_with_stub_pair() {
    let predictor = Predictor::new()
        .with_model(
            PredictionMode::Day,
            IdentityScaler::new(),
            ConstantRegressor::new(42.0),
        )
        .unwrap();
    let prediction = predictor
        .predict(PredictionMode::Day, &reference_input())
        .unwrap();
    assert_eq!(prediction.raw, 42.0);
    assert_eq!(prediction.rentals, 42);
}

#[test]
fn test_predict_from_artifacts() {
    let file = create_test_file(MERGED_CSV);
    let models = TempDir::new().unwrap();
    write_models(&models);
    let dashboard = Dashboard::new(
        DashboardConfig::new(DataSource::File(file.path().to_path_buf()))
            .with_models_dir(models.path()),
    );

    // temp 0.5 > 0.4: (5000 + 4000) / 2
    let day = dashboard
        .predict(PredictionMode::Day, &reference_input())
        .unwrap();
    assert_eq!(day.rentals, 4500);

    // 10 * hr - 50, clamped at zero for early hours
    let mut input = reference_input();
    input.hr = Some(17.0);
    let hour = dashboard.predict(PredictionMode::Hour, &input).unwrap();
    assert_eq!(hour.rentals, 120);

    input.hr = Some(2.0);
    let night = dashboard.predict(PredictionMode::Hour, &input).unwrap();
    assert_eq!(night.raw, -30.0);
    assert_eq!(night.rentals, 0);

    let first = dashboard.load_models().unwrap();
    let second = dashboard.load_models().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_partial_artifacts_refused() {
    let models = TempDir::new().unwrap();
    write_models(&models);
    fs::remove_file(models.path().join("rf_hour_model.json")).unwrap();
    fs::remove_file(models.path().join("day_scaler.json")).unwrap();

    let err = ModelBundle::load(models.path()).unwrap_err();
    match &err {
        BikeshareError::ArtifactMissing { artifacts } => {
            assert_eq!(
                artifacts,
                &vec!["day_scaler.json".to_string(), "rf_hour_model.json".to_string()]
            );
        }
        other => panic!("unexpected error: {}", other),
    }

    // The day pair is intact on disk but still refused
    let file = create_test_file(MERGED_CSV);
    let dashboard = Dashboard::new(
        DashboardConfig::new(DataSource::File(file.path().to_path_buf()))
            .with_models_dir(models.path()),
    );
    assert!(
        dashboard
            .predict(PredictionMode::Day, &reference_input())
            .is_err()
    );
    assert!(dashboard.views(&FilterSpec::full(&dashboard.tables().unwrap()).unwrap()).is_ok());
}
