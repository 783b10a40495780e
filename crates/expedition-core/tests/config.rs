use expedition_core::config::{ConfigError, DepositConfig};
use expedition_core::{Coord, RunConfig, TerrainModel};

fn valid_config() -> RunConfig {
    let mut config = RunConfig::default();
    config.contract.insert("WOOD".to_string(), 1000);
    config.map.deposits.push(DepositConfig {
        resource: "WOOD".to_string(),
        x: 1,
        y: 1,
    });
    config
}

#[test]
fn default_config_with_a_contract_validates() {
    assert_eq!(valid_config().validate(), Ok(()));
}

#[test]
fn empty_contract_is_rejected() {
    let mut config = valid_config();
    config.contract.clear();
    assert_eq!(config.validate(), Err(ConfigError::EmptyContract));
}

#[test]
fn zero_contract_amount_is_rejected() {
    let mut config = valid_config();
    config.contract.insert("QUARTZ".to_string(), 0);
    assert_eq!(
        config.validate(),
        Err(ConfigError::ZeroAmount("QUARTZ".to_string()))
    );
}

#[test]
fn zero_crew_is_rejected() {
    let mut config = valid_config();
    config.crew = 0;
    assert_eq!(config.validate(), Err(ConfigError::ZeroCrew));
}

#[test]
fn start_outside_the_map_is_rejected() {
    let mut config = valid_config();
    config.start.x = config.map.width;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::StartOutsideMap { .. })
    ));
}

#[test]
fn bad_heading_is_rejected() {
    let mut config = valid_config();
    config.start.heading = "UPWARD".to_string();
    assert_eq!(
        config.validate(),
        Err(ConfigError::BadHeading("UPWARD".to_string()))
    );
}

#[test]
fn yaml_round_trip_preserves_the_run_parameters() {
    let config = valid_config();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: RunConfig = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(parsed.budget, config.budget);
    assert_eq!(parsed.crew, config.crew);
    assert_eq!(parsed.seed, config.seed);
    assert_eq!(parsed.contract, config.contract);
}

#[test]
fn island_building_is_deterministic_under_a_fixed_seed() {
    let config = valid_config();
    let first = config.build_island().unwrap();
    let second = config.build_island().unwrap();

    let a: Vec<_> = first.landmarks().collect();
    let b: Vec<_> = second.landmarks().collect();
    assert_eq!(a, b);
    assert!(a.len() <= 10);
    assert!(!a.is_empty());

    // Every landmark lands on the map.
    for (at, _) in a {
        assert!(first.contains(at));
    }

    // The configured deposit is present.
    assert!(first.resource_at(Coord::new(1, 1)).is_some());
}
