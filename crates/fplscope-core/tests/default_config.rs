// The shipped defaults/analysis.toml must load and validate as-is.

use std::fs;

use fplscope_core::classify::{DifferentialParams, PriceRange};
use fplscope_core::config::{load_config, ClassifierConfig};

const SHIPPED_DEFAULTS: &str = include_str!("../../../defaults/analysis.toml");

#[test]
fn shipped_defaults_load_on_first_run() {
    let tmp = std::env::temp_dir().join("fplscope_test_shipped_defaults");
    let _ = fs::remove_dir_all(&tmp);
    fs::create_dir_all(tmp.join("defaults")).unwrap();
    fs::write(tmp.join("defaults").join("analysis.toml"), SHIPPED_DEFAULTS).unwrap();

    let config = load_config(&tmp).expect("shipped defaults should validate");
    assert!(tmp.join("config").join("analysis.toml").exists());
    assert_eq!(config.classifier, ClassifierConfig::default());
    assert_eq!(config.differentials, DifferentialParams::default());
    assert_eq!(config.differentials.price_range(), PriceRange::All);

    let (bootstrap, fixtures) = config.data_paths.resolve(&tmp);
    assert!(bootstrap.ends_with("data/bootstrap-static.json"));
    assert!(fixtures.ends_with("data/fixtures.json"));

    let _ = fs::remove_dir_all(&tmp);
}
