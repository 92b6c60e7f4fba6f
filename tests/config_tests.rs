// Config loading and validation tests

use housekeeper::config::AppConfig;
use housekeeper::models::{Resolution, UnknownResolution};
use housekeeper::rollup::{Policy, PolicyError};
use std::collections::BTreeMap;

const VALID_CONFIG: &str = r#"
[database]
path = "data/usage.db"
max_pool_size = 4

[housekeeping]
interval_secs = 300

[retention]
types = ["5minutes", "hour", "day"]

[retention.keep_records]
5minutes = 12
hour = 24

[retention.max_age]
day = 2592000
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.database.path, "data/usage.db");
    assert_eq!(config.housekeeping.interval_secs, 300);
    assert_eq!(config.housekeeping.page_size, 100);
    assert_eq!(config.housekeeping.vacuum_schedule, None);

    let policy = config.policy().unwrap();
    assert_eq!(
        policy.types(),
        &[Resolution::FiveMinutes, Resolution::Hour, Resolution::Day]
    );
    assert_eq!(policy.keep_records(Resolution::Hour), Some(24));
    assert_eq!(policy.keep_records(Resolution::Day), None);
    assert_eq!(policy.max_age(Resolution::Day), Some(2_592_000));
}

#[test]
fn test_config_validation_rejects_empty_db_path() {
    let bad = VALID_CONFIG.replace("path = \"data/usage.db\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("database.path"));
}

#[test]
fn test_config_validation_rejects_interval_zero() {
    let bad = VALID_CONFIG.replace("interval_secs = 300", "interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("interval_secs"));
}

#[test]
fn test_config_validation_rejects_unknown_resolution() {
    let bad = VALID_CONFIG.replace("\"day\"]", "\"week\"]");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("unknown resolution type 'week'"));
}

#[test]
fn test_config_validation_rejects_unknown_keep_records_key() {
    let bad = VALID_CONFIG.replace("hour = 24", "fortnight = 24");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("fortnight"));
}

#[test]
fn test_config_validation_rejects_invalid_vacuum_schedule() {
    let bad = VALID_CONFIG.replace(
        "interval_secs = 300",
        "interval_secs = 300\nvacuum_schedule = \"not a cron\"",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("vacuum_schedule"));
}

#[test]
fn test_policy_rejects_coarse_before_fine() {
    let err = Policy::new(
        vec![Resolution::Hour, Resolution::FiveMinutes],
        BTreeMap::new(),
        BTreeMap::new(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        PolicyError::OutOfOrder {
            coarser: Resolution::Hour,
            finer: Resolution::FiveMinutes,
        }
    );
}

#[test]
fn test_policy_rejects_duplicates_and_empty_list() {
    let dup = Policy::new(
        vec![Resolution::Hour, Resolution::Hour],
        BTreeMap::new(),
        BTreeMap::new(),
    );
    assert_eq!(dup.unwrap_err(), PolicyError::DuplicateType(Resolution::Hour));

    let empty = Policy::new(vec![], BTreeMap::new(), BTreeMap::new());
    assert_eq!(empty.unwrap_err(), PolicyError::EmptyTypes);
}

#[test]
fn test_resolution_names_round_trip() {
    for r in Resolution::ALL {
        assert_eq!(r.as_str().parse::<Resolution>().unwrap(), r);
    }
    assert_eq!(
        "minute".parse::<Resolution>().unwrap_err(),
        UnknownResolution("minute".into())
    );
}

#[test]
fn test_policy_reports_unknown_resolution_name() {
    let err = Policy::from_names(
        &["5minutes".to_string(), "week".to_string()],
        &BTreeMap::new(),
        &BTreeMap::new(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        PolicyError::UnknownResolution(UnknownResolution("week".into()))
    );
    assert_eq!(err.to_string(), "unknown resolution type 'week'");
}
