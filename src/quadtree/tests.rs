use super::Universe;
use crate::Error;

#[test]
fn empty_is_cached_per_level() {
    let mut universe = Universe::new();
    for level in 0..12 {
        let a = universe.empty(level).unwrap();
        let b = universe.empty(level).unwrap();
        assert_eq!(a, b);
        assert_eq!(universe.node(a).level, level);
        assert_eq!(universe.node(a).population, 0);
    }
}

#[test]
fn leaves_are_singletons() {
    let universe = Universe::new();
    assert_eq!(universe.leaf(false), universe.leaf(false));
    assert_eq!(universe.leaf(true), universe.leaf(true));
    assert_ne!(universe.leaf(false), universe.leaf(true));
    assert!(universe.node(universe.leaf(true)).is_alive());
    assert!(!universe.node(universe.leaf(false)).is_alive());
}

#[test]
fn create_is_canonical() {
    let mut universe = Universe::new();
    let (dead, alive) = (universe.leaf(false), universe.leaf(true));
    let a = universe.create(1, dead, alive, alive, dead).unwrap();
    let b = universe.create(1, dead, alive, alive, dead).unwrap();
    let c = universe.create(1, alive, dead, dead, alive).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(universe.node(a).population, 2);
}

#[test]
fn create_rejects_level_mismatch() {
    let mut universe = Universe::new();
    let leaf = universe.leaf(true);
    let one = universe.create(1, leaf, leaf, leaf, leaf).unwrap();
    assert_eq!(
        universe.create(1, leaf, leaf, leaf, one),
        Err(Error::ChildLevelMismatch {
            expected: 0,
            found: 1
        })
    );
    assert_eq!(
        universe.create(2, one, one, leaf, one),
        Err(Error::ChildLevelMismatch {
            expected: 1,
            found: 0
        })
    );
    assert_eq!(
        universe.create(0, leaf, leaf, leaf, leaf),
        Err(Error::LevelTooSmall { level: 0, min: 1 })
    );
}

#[test]
fn set_get_round_trip() {
    let mut universe = Universe::new();
    let empty = universe.empty(3).unwrap();
    let node = universe.set_cell(empty, 5, 2, true).unwrap();
    assert!(universe.get_cell(node, 5, 2));
    assert_eq!(universe.node(node).population, 1);
    for y in 0..8 {
        for x in 0..8 {
            if (x, y) != (5, 2) {
                assert!(!universe.get_cell(node, x, y));
            }
        }
    }
    // coordinates past the side read as dead
    assert!(!universe.get_cell(node, 8, 2));
    assert!(!universe.get_cell(node, 2, 100));
}

#[test]
fn set_cell_is_idempotent() {
    let mut universe = Universe::new();
    let empty = universe.empty(4).unwrap();
    let node = universe.set_cell(empty, 3, 3, true).unwrap();
    assert_eq!(universe.set_cell(node, 3, 3, true).unwrap(), node);
    assert_eq!(universe.set_cell(node, 9, 12, false).unwrap(), node);
    assert_eq!(universe.set_cell(empty, 9, 12, false).unwrap(), empty);
}

#[test]
fn set_cell_preserves_other_cells() {
    let mut universe = Universe::new();
    let mut node = universe.empty(3).unwrap();
    for (x, y) in [(0, 0), (7, 0), (3, 4), (7, 7)] {
        node = universe.set_cell(node, x, y, true).unwrap();
    }
    let updated = universe.set_cell(node, 1, 6, true).unwrap();
    assert!(universe.get_cell(updated, 1, 6));
    for y in 0..8 {
        for x in 0..8 {
            if (x, y) != (1, 6) {
                assert_eq!(universe.get_cell(updated, x, y), universe.get_cell(node, x, y));
            }
        }
    }
}

#[test]
fn set_cell_last_write_wins() {
    let mut universe = Universe::new();
    let empty = universe.empty(3).unwrap();
    let on = universe.set_cell(empty, 2, 2, true).unwrap();
    let off = universe.set_cell(on, 2, 2, false).unwrap();
    assert_eq!(off, empty);
}

#[test]
fn set_cell_out_of_range() {
    let mut universe = Universe::new();
    let node = universe.empty(3).unwrap();
    assert_eq!(
        universe.set_cell(node, 8, 0, true),
        Err(Error::OutOfBounds { x: 8, y: 0, level: 3 })
    );
    assert_eq!(
        universe.set_cell(node, 0, 12, true),
        Err(Error::OutOfBounds { x: 0, y: 12, level: 3 })
    );
}

#[test]
fn expand_centers_the_input() {
    let mut universe = Universe::new();
    let mut node = universe.empty(2).unwrap();
    for (x, y) in [(0, 0), (1, 2), (3, 3)] {
        node = universe.set_cell(node, x, y, true).unwrap();
    }
    let expanded = universe.expand(node).unwrap();
    assert_eq!(universe.node(expanded).level, 3);
    assert_eq!(universe.node(expanded).population, universe.node(node).population);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(
                universe.get_cell(expanded, x + 2, y + 2),
                universe.get_cell(node, x, y)
            );
        }
    }
    // the added border is dead
    for i in 0..8 {
        assert!(!universe.get_cell(expanded, i, 0));
        assert!(!universe.get_cell(expanded, i, 7));
        assert!(!universe.get_cell(expanded, 0, i));
        assert!(!universe.get_cell(expanded, 7, i));
    }
}

#[test]
fn expand_rejects_leaves() {
    let mut universe = Universe::new();
    let leaf = universe.leaf(true);
    assert_eq!(
        universe.expand(leaf),
        Err(Error::LevelTooSmall { level: 0, min: 1 })
    );
}

#[test]
fn centered_horizontal_straddles_the_seam() {
    let mut universe = Universe::new();
    let (dead, alive) = (universe.leaf(false), universe.leaf(true));
    // west: east column live, east: west column live
    let west = universe.create(1, dead, alive, dead, alive).unwrap();
    let east = universe.create(1, alive, dead, alive, dead).unwrap();
    let center = universe.centered_horizontal(west, east).unwrap();
    assert_eq!(universe.node(center).level, 1);
    assert_eq!(universe.node(center).population, 4);
}

#[test]
fn centered_vertical_straddles_the_seam() {
    let mut universe = Universe::new();
    let (dead, alive) = (universe.leaf(false), universe.leaf(true));
    let north = universe.create(1, dead, dead, alive, alive).unwrap();
    let south = universe.create(1, alive, alive, dead, dead).unwrap();
    let center = universe.centered_vertical(north, south).unwrap();
    assert_eq!(universe.node(center).population, 4);
}

#[test]
fn centered_subnode_picks_inner_corners() {
    let mut universe = Universe::new();
    let (dead, alive) = (universe.leaf(false), universe.leaf(true));
    let nw = universe.create(1, dead, dead, dead, alive).unwrap();
    let ne = universe.create(1, dead, dead, alive, dead).unwrap();
    let sw = universe.create(1, dead, alive, dead, dead).unwrap();
    let se = universe.create(1, alive, dead, dead, dead).unwrap();
    let center = universe.centered_subnode(nw, ne, sw, se).unwrap();
    assert_eq!(universe.node(center).population, 4);
}

#[test]
fn composition_rejects_mixed_levels() {
    let mut universe = Universe::new();
    let leaf = universe.leaf(false);
    let one = universe.create(1, leaf, leaf, leaf, leaf).unwrap();
    let two = universe.create(2, one, one, one, one).unwrap();
    assert_eq!(
        universe.centered_horizontal(one, two),
        Err(Error::ChildLevelMismatch {
            expected: 1,
            found: 2
        })
    );
    assert_eq!(
        universe.centered_vertical(leaf, leaf),
        Err(Error::LevelTooSmall { level: 0, min: 1 })
    );
}

#[test]
fn step_rejects_small_levels() {
    let mut universe = Universe::new();
    let leaf = universe.leaf(true);
    let one = universe.create(1, leaf, leaf, leaf, leaf).unwrap();
    assert_eq!(
        universe.step(one),
        Err(Error::LevelTooSmall { level: 1, min: 2 })
    );
    assert_eq!(
        universe.advance(leaf, 1),
        Err(Error::LevelTooSmall { level: 0, min: 2 })
    );
}

#[test]
fn advance_rejects_excess_steps() {
    let mut universe = Universe::new();
    let node = universe.empty(4).unwrap();
    assert_eq!(
        universe.advance(node, 5),
        Err(Error::TooManySteps {
            steps: 5,
            max: 4,
            level: 4
        })
    );
}

#[test]
fn advance_zero_is_the_unevolved_center() {
    let mut universe = Universe::new();
    let mut node = universe.empty(2).unwrap();
    for (x, y) in [(1, 1), (2, 1), (0, 3), (3, 0)] {
        node = universe.set_cell(node, x, y, true).unwrap();
    }
    let center = universe.advance(node, 0).unwrap();
    assert_eq!(universe.node(center).level, 1);
    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(
                universe.get_cell(center, x, y),
                universe.get_cell(node, x + 1, y + 1)
            );
        }
    }
}
