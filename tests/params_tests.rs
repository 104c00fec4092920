#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::path::PathBuf;

use gridlife::SimError;
use gridlife::simulation::params::{ParamEdit, SimParams};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gridlife_{}_{name}", std::process::id()))
}

#[test]
fn test_save_and_load_params() {
    let path = temp_path("params.json");
    let params = SimParams {
        mutation_probability: 0.25,
        food_amount: 42,
        reproduction_ages: vec![100, 200],
        allow_mutations: false,
        ..SimParams::default()
    };

    params.save_to_file(&path).unwrap();
    let loaded = SimParams::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, params);
}

#[test]
fn test_partial_file_uses_defaults() {
    let path = temp_path("partial.json");
    std::fs::write(&path, r#"{ "food_amount": 7 }"#).unwrap();

    let loaded = SimParams::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.food_amount, 7);
    assert_eq!(loaded.reproduction_ages, vec![400, 800, 1200]);
    assert_eq!(loaded.creature_max_age, SimParams::default().creature_max_age);
}

#[test]
fn test_load_errors() {
    let missing = SimParams::load_from_file(temp_path("does_not_exist.json"));
    assert!(matches!(missing, Err(SimError::Io(_))));

    let path = temp_path("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let broken = SimParams::load_from_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(broken, Err(SimError::Serialization(_))));
}

#[test]
fn test_numeric_edits_are_clamped() {
    let mut params = SimParams::default();

    assert_eq!(params.apply_edit("mutation_probability", "2.5"), ParamEdit::Applied);
    assert_eq!(params.mutation_probability, 1.0);

    assert_eq!(params.apply_edit("creature_max_age", "0"), ParamEdit::Applied);
    assert_eq!(params.creature_max_age, 1);

    assert_eq!(params.apply_edit("energy_cost_tick", " 0.004 "), ParamEdit::Applied);
    assert!((params.energy_cost_tick - 0.004).abs() < 1e-7);

    assert_eq!(params.apply_edit("food_amount", "12"), ParamEdit::FoodAmountChanged);
    assert_eq!(params.food_amount, 12);
}

#[test]
fn test_bad_edits_are_ignored() {
    let mut params = SimParams::default();
    let before = params.clone();

    assert_eq!(params.apply_edit("energy_cost_tick", "abc"), ParamEdit::Ignored);
    assert_eq!(params.apply_edit("energy_cost_tick", "NaN"), ParamEdit::Ignored);
    assert_eq!(params.apply_edit("mutation_strength", "inf"), ParamEdit::Ignored);
    assert_eq!(params.apply_edit("no_such_param", "1"), ParamEdit::Ignored);
    assert_eq!(params.apply_edit("reproduction_ages", "100, x"), ParamEdit::Ignored);
    assert_eq!(params.apply_edit("allow_mutations", "maybe"), ParamEdit::Ignored);

    assert_eq!(params, before);
}

#[test]
fn test_list_and_flag_edits() {
    let mut params = SimParams::default();

    assert_eq!(
        params.apply_edit("reproduction_ages", "300, 600,900"),
        ParamEdit::ReproductionAgesChanged
    );
    assert_eq!(params.reproduction_ages, vec![300, 600, 900]);

    assert_eq!(params.apply_edit("allow_mutations", "off"), ParamEdit::Applied);
    assert!(!params.allow_mutations);
    assert_eq!(params.apply_edit("allow_mutations", "TRUE"), ParamEdit::Applied);
    assert!(params.allow_mutations);
}

#[test]
fn test_every_editable_name_is_accepted() {
    for name in SimParams::editable_names() {
        let mut params = SimParams::default();
        let value = match name {
            "reproduction_ages" => "10",
            "allow_mutations" => "false",
            _ => "0.5",
        };
        assert_ne!(params.apply_edit(name, value), ParamEdit::Ignored, "{name}");
    }
}
