use std::f32::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use fractal_scape::{
    Rad, Vector3,
    data_structures::{
        block::BlockLibrary,
        instance::BlockInstance,
        rule::{SubstitutionEntry, SubstitutionRule},
    },
    decompose::{Decomposer, decompose},
};

use crate::common::test_utils::{cube_template, library, shipped_library, single};

mod common;

fn cube_with_rule(entries: Vec<SubstitutionEntry>) -> BlockLibrary {
    single(cube_template(0), entries.into_iter().collect())
}

#[test]
fn level_zero_returns_the_seed_unchanged() {
    let library = shipped_library();
    let seed = BlockInstance {
        id: 1,
        position: Vector3::new(3.0, -2.0, 7.5),
        orientation: Rad(0.3),
        scale: Vector3::new(2.0, -1.0, 0.5),
    };

    let blocks = decompose(&library, seed, 0).unwrap();

    assert_eq!(blocks, vec![seed]);
}

#[test]
fn one_level_keeps_identity_entry_and_places_offset_child() {
    let library = cube_with_rule(vec![
        SubstitutionEntry::new(0, Vector3::new(0.0, 0.0, 0.0), 0.0),
        SubstitutionEntry::new(0, Vector3::new(1.0, 0.0, 0.0), 0.0).with_scaling(0.5, 1.0),
    ]);
    let seed = library.seed(0).unwrap();

    let blocks = decompose(&library, seed, 1).unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0], seed);
    assert_eq!(blocks[1].position, Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(blocks[1].scale, Vector3::new(0.5, 0.5, 0.5));
}

#[test]
fn directive_constants_apply_to_following_entries_only() {
    let mut rule = SubstitutionRule::new();
    rule.push(0, Vector3::new(1.0, 0.0, 0.0), 0.0, None)
        .set_scaling(0.5, 2.0)
        .push(0, Vector3::new(0.0, 0.0, 1.0), 0.0, None);
    let library = single(cube_template(0), rule);
    let seed = library.seed(0).unwrap();

    let blocks = decompose(&library, seed, 1).unwrap();

    assert_eq!(blocks[0].position, Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(blocks[0].scale, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(blocks[1].position, Vector3::new(0.0, 0.0, 2.0));
    assert_eq!(blocks[1].scale, Vector3::new(0.5, 0.5, 0.5));
}

#[test]
fn offsets_scale_with_the_parents_base_unit() {
    let library = cube_with_rule(vec![
        SubstitutionEntry::new(0, Vector3::new(1.0, 1.0, 0.0), 0.0).with_scaling(0.5, 0.5),
    ]);
    let mut seed = library.seed(0).unwrap();
    seed.scale = Vector3::new(4.0, 4.0, 4.0);
    seed.position = Vector3::new(10.0, 0.0, 0.0);

    let blocks = decompose(&library, seed, 1).unwrap();

    assert_eq!(blocks[0].position, Vector3::new(12.0, 2.0, 0.0));
    assert_eq!(blocks[0].scale, Vector3::new(2.0, 2.0, 2.0));
}

#[test]
fn half_turn_keeps_offset_of_unrotated_parent_and_sets_orientation_to_pi() {
    let library = cube_with_rule(vec![SubstitutionEntry::new(
        0,
        Vector3::new(1.0, 0.5, -2.0),
        2.0,
    )]);
    let seed = library.seed(0).unwrap();

    let blocks = decompose(&library, seed, 1).unwrap();

    assert_eq!(blocks[0].orientation, Rad(PI));
    assert_eq!(blocks[0].position, Vector3::new(1.0, 0.5, -2.0));
}

#[test]
fn offsets_rotate_with_the_parent_orientation() {
    let library = cube_with_rule(vec![SubstitutionEntry::new(
        0,
        Vector3::new(1.0, 0.0, 0.0),
        1.0,
    )]);
    let mut seed = library.seed(0).unwrap();
    seed.orientation = Rad(FRAC_PI_2);

    let blocks = decompose(&library, seed, 1).unwrap();

    // x' = x·cosθ + z·sinθ, z' = -x·sinθ + z·cosθ
    assert_relative_eq!(blocks[0].position, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    assert_relative_eq!(blocks[0].orientation.0, PI, epsilon = 1e-6);
}

#[test]
fn mirroring_propagates_through_levels() {
    let library = cube_with_rule(vec![
        SubstitutionEntry::new(0, Vector3::new(0.0, 1.0, 0.0), 0.0)
            .with_extra_scale(Vector3::new(1.0, -1.0, 1.0)),
    ]);
    let seed = library.seed(0).unwrap();

    let child = decompose(&library, seed, 1).unwrap()[0];
    assert_eq!(child.scale.y, -seed.scale.y);
    assert_eq!(child.position, Vector3::new(0.0, 1.0, 0.0));

    // a flipped parent sends its children's vertical offsets the other way
    let grandchild = decompose(&library, seed, 2).unwrap()[0];
    assert_eq!(grandchild.scale.y, seed.scale.y);
    assert_eq!(grandchild.position, Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn duplicates_keep_the_first_seen_instance() {
    let library = cube_with_rule(vec![
        SubstitutionEntry::new(0, Vector3::new(0.0, 0.0, 0.0), 0.0),
        SubstitutionEntry::new(0, Vector3::new(0.0, 0.0, 0.0), 1.0),
    ]);
    let seed = library.seed(0).unwrap();

    let blocks = decompose(&library, seed, 2).unwrap();

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].orientation, Rad(0.0));
}

#[test]
fn duplicates_across_branches_are_merged_in_order() {
    let library = cube_with_rule(vec![
        SubstitutionEntry::new(0, Vector3::new(1.0, 0.0, 0.0), 0.0),
        SubstitutionEntry::new(0, Vector3::new(-1.0, 0.0, 0.0), 0.0)
            .with_extra_scale(Vector3::new(1.0, 1.0, -1.0)),
    ]);
    let seed = library.seed(0).unwrap();

    let blocks = decompose(&library, seed, 2).unwrap();

    let xs: Vec<f32> = blocks.iter().map(|b| b.position.x).collect();
    assert_eq!(xs, vec![2.0, 0.0, -2.0]);
    // the origin was first reached through the first branch's second entry
    assert_eq!(blocks[1].scale, Vector3::new(1.0, 1.0, -1.0));
}

#[test]
fn same_position_with_different_template_is_kept() {
    let library = library(
        vec![cube_template(0), cube_template(1)],
        vec![
            [
                SubstitutionEntry::new(0, Vector3::new(0.0, 0.0, 0.0), 0.0),
                SubstitutionEntry::new(1, Vector3::new(0.0, 0.0, 0.0), 0.0),
            ]
            .into_iter()
            .collect(),
            SubstitutionRule::new(),
        ],
    );
    let seed = library.seed(0).unwrap();

    let blocks = decompose(&library, seed, 1).unwrap();

    assert_eq!(blocks.len(), 2);
    assert!(!blocks[0].is_same(&blocks[1]));
}

#[test]
fn empty_rule_yields_no_blocks() {
    let library = single(cube_template(0), SubstitutionRule::new());
    let seed = library.seed(0).unwrap();

    assert!(decompose(&library, seed, 1).unwrap().is_empty());
}

#[test]
fn shipped_pyramid_grows_as_expected() {
    let library = shipped_library();
    let seed = library.seed(0).unwrap();
    let decomposer = Decomposer::new(&library);

    assert_eq!(decomposer.decompose(seed, 1).unwrap().len(), 15);
    // fourteen cubes split into fifteen, the slab into four
    assert_eq!(decomposer.decompose(seed, 2).unwrap().len(), 14 * 15 + 4);
}

#[test]
fn every_block_refers_to_a_loaded_template() {
    let library = shipped_library();
    let seed = library.seed(0).unwrap();

    let blocks = decompose(&library, seed, 3).unwrap();

    assert!(!blocks.is_empty());
    assert!(blocks.iter().all(|b| library.template(b.id).is_ok()));
}

#[test]
fn decomposition_is_deterministic() {
    let library = shipped_library();
    let seed = library.seed(0).unwrap();

    let first = decompose(&library, seed, 2).unwrap();
    let second = decompose(&library, seed, 2).unwrap();

    assert_eq!(first, second);
}

#[test]
fn unknown_seed_template_is_an_error() {
    let library = shipped_library();
    let seed = BlockInstance::new(9);

    let err = decompose(&library, seed, 1).unwrap_err();

    assert!(format!("{err:#}").contains("9"));
    assert!(library.seed(9).is_err());
}

#[test]
fn rule_pointing_at_missing_template_is_rejected_before_decomposition() {
    let rule: SubstitutionRule = [SubstitutionEntry::new(7, Vector3::new(0.0, 0.0, 0.0), 0.0)]
        .into_iter()
        .collect();

    let err = BlockLibrary::new(vec![cube_template(0)], vec![rule]).unwrap_err();

    assert!(err.to_string().contains("unknown block template 7"));
}

#[test]
fn non_finite_entries_are_rejected_before_decomposition() {
    let rule: SubstitutionRule = [
        SubstitutionEntry::new(0, Vector3::new(f32::NAN, 0.0, 0.0), 0.0),
        SubstitutionEntry::new(0, Vector3::new(f32::NAN, 0.0, 0.0), 0.0),
    ]
    .into_iter()
    .collect();

    let err = BlockLibrary::new(vec![cube_template(0)], vec![rule]).unwrap_err();

    assert!(err.to_string().contains("non-finite"), "{err:#}");
}
