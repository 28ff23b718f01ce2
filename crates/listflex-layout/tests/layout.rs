//! End-to-end layout passes over an in-memory host tree.

use glam::DVec2;
use listflex_config::attrs;
use listflex_core::{AttributeValue, HostTree, MemoryTree, NodeId, UDim, UDim2};
use listflex_layout::{LayoutEngine, LayoutReport};
use proptest::prelude::*;

struct Fixture {
    tree: MemoryTree,
    root: NodeId,
    items: Vec<NodeId>,
}

fn build(container: DVec2, sizes: &[DVec2], settings: &[(&str, AttributeValue)]) -> Fixture {
    let mut tree = MemoryTree::new();
    let root = tree.add_root("list", container);
    for (name, value) in settings {
        tree.set_attribute(root, name, value.clone()).unwrap();
    }
    let items = sizes
        .iter()
        .enumerate()
        .map(|(i, s)| tree.add_box(root, format!("item{i}"), UDim2::from_pixels(*s)).unwrap())
        .collect();
    Fixture { tree, root, items }
}

fn swap(v: DVec2) -> DVec2 {
    DVec2::new(v.y, v.x)
}

fn summary(tree: &MemoryTree, report: &LayoutReport) -> String {
    report
        .placements
        .iter()
        .map(|p| {
            format!(
                "{} line {} at ({}, {}) size {}x{}",
                tree.get(p.node).unwrap().name,
                p.line,
                p.position.x,
                p.position.y,
                p.size.x,
                p.size.y
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn settings(main: &str, cross: &str, wraps: bool, gap: f64) -> Vec<(&'static str, AttributeValue)> {
    vec![
        (attrs::MAIN_FLEX, main.into()),
        (attrs::CROSS_FLEX, cross.into()),
        (attrs::WRAPS, wraps.into()),
        (attrs::PADDING, UDim::from_offset(gap).into()),
        (attrs::MAIN_ALIGNMENT, "Center".into()),
        (attrs::CROSS_ALIGNMENT, "End".into()),
    ]
}

#[test]
fn test_horizontal_wrap_snapshot() {
    let mut fixture = build(
        DVec2::new(100.0, 60.0),
        &[DVec2::new(30.0, 20.0), DVec2::new(30.0, 20.0), DVec2::new(30.0, 20.0)],
        &[
            (attrs::DIRECTION, "Horizontal".into()),
            (attrs::WRAPS, true.into()),
            (attrs::PADDING, UDim::from_offset(10.0).into()),
            (attrs::MAIN_FLEX, "SpaceBetween".into()),
            (attrs::CROSS_ALIGNMENT, "Center".into()),
        ],
    );

    let report = LayoutEngine::new().compute(&mut fixture.tree, fixture.root).unwrap();

    insta::assert_snapshot!(summary(&fixture.tree, &report), @r"
    item0 line 0 at (0, 5) size 30x20
    item1 line 0 at (70, 5) size 30x20
    item2 line 1 at (0, 35) size 30x20
    ");
}

#[test]
fn test_axis_symmetry_across_modes() {
    let sizes = [
        DVec2::new(30.0, 45.0),
        DVec2::new(20.0, 25.0),
        DVec2::new(40.0, 35.0),
        DVec2::new(15.0, 50.0),
    ];
    let modes = ["None", "Fill", "SpaceAround", "SpaceBetween", "SpaceEvenly"];

    for main in modes {
        for cross in modes {
            for wraps in [false, true] {
                let base = settings(main, cross, wraps, 5.0);

                let mut vertical = build(DVec2::new(120.0, 100.0), &sizes, &base);
                let mut horizontal_settings = base.clone();
                horizontal_settings.push((attrs::DIRECTION, "Horizontal".into()));
                let swapped: Vec<DVec2> = sizes.iter().map(|s| swap(*s)).collect();
                let mut horizontal =
                    build(DVec2::new(100.0, 120.0), &swapped, &horizontal_settings);

                let v = LayoutEngine::new().compute(&mut vertical.tree, vertical.root).unwrap();
                let h = LayoutEngine::new().compute(&mut horizontal.tree, horizontal.root).unwrap();

                assert_eq!(v.lines, h.lines, "{main}/{cross}/{wraps}");
                for (pv, ph) in v.placements.iter().zip(&h.placements) {
                    assert_eq!(pv.position, swap(ph.position), "{main}/{cross}/{wraps}");
                    assert_eq!(pv.size, swap(ph.size), "{main}/{cross}/{wraps}");
                }
            }
        }
    }
}

#[test]
fn test_fill_line_respects_available_space() {
    let mut fixture = build(
        DVec2::new(50.0, 100.0),
        &[DVec2::new(10.0, 30.0), DVec2::new(10.0, 50.0), DVec2::new(10.0, 70.0)],
        &[(attrs::MAIN_FLEX, "Fill".into()), (attrs::PADDING, UDim::from_offset(4.0).into())],
    );
    for node in &fixture.items {
        fixture.tree.set_attribute(*node, attrs::FLEX_MODE, "Fill".into()).unwrap();
    }

    let report = LayoutEngine::new().compute(&mut fixture.tree, fixture.root).unwrap();

    let used: f64 = report.placements.iter().map(|p| p.size.y).sum::<f64>() + 2.0 * 4.0;
    assert!((used - 100.0).abs() < 0.001);
    let last = report.placements.last().unwrap();
    assert!((last.position.y + last.size.y - 100.0).abs() < 0.001);
}

#[test]
fn test_written_geometry_matches_report() {
    let mut fixture = build(
        DVec2::new(90.0, 90.0),
        &[DVec2::new(40.0, 40.0), DVec2::new(40.0, 40.0), DVec2::new(40.0, 40.0)],
        &settings("SpaceEvenly", "SpaceAround", true, 0.0),
    );

    let report = LayoutEngine::new().compute(&mut fixture.tree, fixture.root).unwrap();

    for placement in &report.placements {
        assert_eq!(fixture.tree.size(placement.node).unwrap(), UDim2::from_pixels(placement.size));
        assert_eq!(
            fixture.tree.position(placement.node).unwrap(),
            UDim2::from_pixels(placement.position)
        );
        assert_eq!(placement.position, placement.position.round());
        assert!(placement.position.min_element() >= 0.0);
    }
}

proptest! {
    #[test]
    fn prop_second_pass_is_identical(
        raw in prop::collection::vec((1u32..80, 1u32..80), 1..10),
        main in 0usize..5,
        cross in 0usize..5,
        wraps in any::<bool>(),
        horizontal in any::<bool>(),
    ) {
        let modes = ["None", "Fill", "SpaceAround", "SpaceBetween", "SpaceEvenly"];
        let sizes: Vec<DVec2> = raw.iter().map(|&(w, h)| DVec2::new(w as f64, h as f64)).collect();
        let mut base = settings(modes[main], modes[cross], wraps, 3.0);
        if horizontal {
            base.push((attrs::DIRECTION, "Horizontal".into()));
        }
        let mut fixture = build(DVec2::new(150.0, 130.0), &sizes, &base);
        for (i, node) in fixture.items.iter().enumerate() {
            let mode = ["None", "Grow", "Shrink", "Fill"][i % 4];
            fixture.tree.set_attribute(*node, attrs::FLEX_MODE, mode.into()).unwrap();
        }

        let mut engine = LayoutEngine::new();
        let first = engine.compute(&mut fixture.tree, fixture.root).unwrap();
        let second = engine.compute(&mut fixture.tree, fixture.root).unwrap();

        prop_assert_eq!(first, second);
    }
}
