use std::fs;

use tactics_content::ContentFactory;
use tactics_core::effect::Wallet;
use tactics_core::unit::NullHost;
use tactics_core::{
    ActivationOutcome, DefaultStateFactory, EffectRegistry, PcgRng, StatKind, Team, UnitId,
    UnitState,
};

const CONFIG: &str = r#"
choice_count = 1
despawn_delay_ticks = 0
"#;

const UNITS: &str = r#"(
    units: [
        (
            id: "knight",
            archetype: Melee,
            base: (damage: 10.0, max_hp: 100.0, attack_speed: 1.0, move_speed: 3.0),
            growth: (damage: 1.1, max_hp: 1.2),
        ),
    ],
)"#;

const POOLS: &str = r#"(
    pools: [
        (name: "chest", entries: [(item: "potion", weight: Some(1.0)), (item: "scroll", weight: Some(0.0))]),
    ],
)"#;

const EFFECTS: &str = r#"(
    mode: (use_tiers: false),
    effects: [
        (
            effect: (
                id: "whetstone",
                title: "Whetstone",
                effects: [(category: Damage, value: 10.0, kind: AddPercent)],
                constraints: [(kind: Currency, name: "gold", amount: 5)],
                limit: 2,
            ),
        ),
    ],
)"#;

fn data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
    fs::write(dir.path().join("units.ron"), UNITS).unwrap();
    fs::write(dir.path().join("pools.ron"), POOLS).unwrap();
    fs::write(dir.path().join("effects.ron"), EFFECTS).unwrap();
    dir
}

#[test]
fn loaded_unit_spawns_with_level_growth() {
    let dir = data_dir();
    let factory = ContentFactory::new(dir.path());
    let config = factory.load_config().unwrap();
    let units = factory.load_units().unwrap();

    let knight = units.iter().find(|unit| unit.id == "knight").unwrap();
    let mut actor = knight.spawn(UnitId(7), Team(0), 3, NullHost, &config);
    actor.initialize(&DefaultStateFactory).unwrap();

    assert_eq!(actor.state(), Some(UnitState::Idle));
    assert!((actor.stats().damage() - 12.1).abs() < 1e-9);
    assert!((actor.defender().max_hp() - 144.0).abs() < 1e-9);
    assert!((actor.defender().current_hp() - 144.0).abs() < 1e-9);
}

#[test]
fn zero_weight_pool_entry_is_never_drawn() {
    let dir = data_dir();
    let factory = ContentFactory::new(dir.path());
    let config = factory.load_config().unwrap();
    let pools = factory.load_pools().unwrap();

    let chest = pools.get("chest").unwrap().to_selector(&config);
    let mut rng = PcgRng::new(42);
    for _ in 0..1_000 {
        assert_eq!(chest.pick_one(&mut rng).map(String::as_str), Some("potion"));
    }
    assert_eq!(chest.rates().len(), 2);
}

#[test]
fn effect_pool_spends_currency_and_retires_effect() {
    let dir = data_dir();
    let factory = ContentFactory::new(dir.path());
    let config = factory.load_config().unwrap();
    let catalog = factory.load_effects().unwrap();
    let knight = factory.load_units().unwrap().remove(0);

    let mut pool = catalog.build_pool(&config);
    let registry = EffectRegistry::with_defaults();
    let mut stats = knight.stat_block(1);
    let mut wallet = Wallet::new().with_currency("gold", 12);
    let mut rng = PcgRng::new(7);

    let offered: Vec<String> = pool.offer(&mut rng).iter().map(|e| e.id.clone()).collect();
    assert_eq!(offered, vec!["whetstone".to_string()]);

    let first = pool
        .select("whetstone", &mut wallet, &registry, &mut stats)
        .unwrap();
    assert_eq!(
        first,
        ActivationOutcome::Applied {
            uses: 1,
            exhausted: false
        }
    );
    assert!((stats.value(StatKind::Damage) - 11.0).abs() < 1e-9);
    assert_eq!(wallet.currency("gold"), 7);

    let second = pool
        .select("whetstone", &mut wallet, &registry, &mut stats)
        .unwrap();
    assert_eq!(
        second,
        ActivationOutcome::Applied {
            uses: 2,
            exhausted: true
        }
    );
    assert!((stats.value(StatKind::Damage) - 12.0).abs() < 1e-9);
    assert_eq!(wallet.currency("gold"), 2);
    assert_eq!(pool.available(), 0);
    assert!(pool.offer(&mut rng).is_empty());
}
