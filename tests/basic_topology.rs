// tests/basic_topology.rs
use glam::Vec3;
use lstring_turtle::{
    DrawOptions, ModuleKind, SceneBlueprint, TurtleDefaults, TurtleInterpreter, upright_correction,
};

const EPS: f32 = 1e-5;

fn assert_close(a: Vec3, b: Vec3) {
    assert!(a.abs_diff_eq(b, EPS), "{a:?} != {b:?}");
}

fn run(lstring: &str, options: DrawOptions) -> SceneBlueprint {
    let interpreter = TurtleInterpreter::new(TurtleDefaults::default()).with_draw_options(options);
    let mut scene = SceneBlueprint::new();
    interpreter
        .interpret(lstring, &mut scene)
        .expect("interpretation should succeed");
    scene
}

#[test]
fn test_symmetric_branches_are_siblings() {
    let scene = run("F(1)[+(45)F(1)][-(45)F(1)]", DrawOptions::default());
    let internodes = scene.internodes();
    assert_eq!(internodes.len(), 3, "Should have 3 internodes");

    // Trunk: origin to (1, 0, 0).
    let (_, trunk) = internodes[0];
    assert_close(trunk.transform.position, Vec3::ZERO);
    assert_close(trunk.end_point(), Vec3::X);

    // Both branches start at the trunk tip, not at the first branch's end.
    let (_, left) = internodes[1];
    let (_, right) = internodes[2];
    assert_close(left.transform.position, Vec3::X);
    assert_close(right.transform.position, Vec3::X);

    let h = 45f32.to_radians().cos();
    assert_close(left.end_point(), Vec3::new(1.0 + h, -h, 0.0));
    assert_close(right.end_point(), Vec3::new(1.0 + h, h, 0.0));

    // Flat mode: everything is joined into the root.
    let root = scene.root.unwrap();
    assert!(internodes.iter().all(|(_, m)| m.parent == Some(root)));
}

#[test]
fn test_turn_signs_mirror_about_heading() {
    let interpreter = TurtleInterpreter::default();

    let mut left = SceneBlueprint::new();
    let a = interpreter.interpret("F(1)+(90)F(1)", &mut left).unwrap();
    let mut right = SceneBlueprint::new();
    let b = interpreter.interpret("F(1)-(90)F(1)", &mut right).unwrap();

    let pa = a.turtle.transform.position;
    let pb = b.turtle.transform.position;
    assert_close(pa, Vec3::new(1.0, -1.0, 0.0));
    assert!((pa.x - pb.x).abs() < EPS);
    assert!((pa.y + pb.y).abs() < EPS);
    assert!((pa.z - pb.z).abs() < EPS);
}

#[test]
fn test_pitch_and_roll_axes() {
    let interpreter = TurtleInterpreter::default();

    // '^' pitches about the left axis (Y): heading X tips towards -Z.
    let mut scene = SceneBlueprint::new();
    let out = interpreter.interpret("^(90)f(1)", &mut scene).unwrap();
    assert_close(out.turtle.transform.position, Vec3::new(0.0, 0.0, -1.0));

    // Rolling about the heading never changes where the turtle goes.
    let mut scene = SceneBlueprint::new();
    let out = interpreter.interpret("/(90)\\(30)f(1)", &mut scene).unwrap();
    assert_close(out.turtle.transform.position, Vec3::X);

    // After a roll, a turn swings into a different plane.
    let mut scene = SceneBlueprint::new();
    let out = interpreter.interpret("/(90)-(90)f(1)", &mut scene).unwrap();
    assert_close(out.turtle.transform.position, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn test_turn_around_and_move_without_drawing() {
    let mut scene = SceneBlueprint::new();
    let out = TurtleInterpreter::default()
        .interpret("f|f(0.5)", &mut scene)
        .unwrap();
    assert_close(out.turtle.transform.position, Vec3::new(1.5, 0.0, 0.0));
    assert!(scene.internodes().is_empty());
}

#[test]
fn test_hierarchy_with_nodes() {
    let options = DrawOptions {
        hierarchy: true,
        draw_nodes: true,
        ..Default::default()
    };
    let scene = run("F(1)[+F(1)]F(1)", options);
    let root = scene.root.unwrap();

    // Root -> internode, node, internode; node -> branch internode.
    let top = scene.children(root);
    assert_eq!(top.len(), 3);
    let node_id = top[1];
    let node = scene.module(node_id).unwrap();
    assert_eq!(node.kind, ModuleKind::Node { scale: 0.5 });
    assert_close(node.transform.position, Vec3::X);

    let branch = scene.children(node_id);
    assert_eq!(branch.len(), 1);
    assert!(matches!(
        scene.module(branch[0]).unwrap().kind,
        ModuleKind::Internode { .. }
    ));
}

#[test]
fn test_hierarchy_without_nodes_uses_anchors() {
    let options = DrawOptions {
        hierarchy: true,
        ..Default::default()
    };
    let scene = run("[F[F]]", options);
    let root = scene.root.unwrap();

    let outer = scene.children(root);
    assert_eq!(outer.len(), 1);
    assert_eq!(scene.module(outer[0]).unwrap().kind, ModuleKind::Anchor);

    // Outer anchor holds an internode and the inner anchor.
    let inner = scene.children(outer[0]);
    assert_eq!(inner.len(), 2);
    assert_eq!(scene.module(inner[1]).unwrap().kind, ModuleKind::Anchor);
    assert_eq!(scene.children(inner[1]).len(), 1);
}

#[test]
fn test_flat_mode_nodes_join_root() {
    let options = DrawOptions {
        draw_nodes: true,
        ..Default::default()
    };
    let scene = run("[F]", options);
    let root = scene.root.unwrap();
    let children = scene.children(root);
    assert_eq!(children.len(), 2);
    assert!(matches!(
        scene.module(children[0]).unwrap().kind,
        ModuleKind::Node { .. }
    ));
}

#[test]
fn test_internode_length_scale() {
    let options = DrawOptions {
        internode_length_scale: 0.5,
        ..Default::default()
    };
    let interpreter = TurtleInterpreter::default().with_draw_options(options);
    let mut scene = SceneBlueprint::new();
    let out = interpreter.interpret("F(2)", &mut scene).unwrap();

    let (_, internode) = scene.internodes()[0];
    assert_eq!(
        internode.kind,
        ModuleKind::Internode {
            length: 1.0,
            width: 0.5
        }
    );
    // The turtle still moves by the full step.
    assert_close(out.turtle.transform.position, Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn test_root_is_stood_upright() {
    let mut scene = SceneBlueprint::new();
    let out = TurtleInterpreter::default().interpret("F", &mut scene).unwrap();

    assert_eq!(out.root_transform, upright_correction());
    assert_eq!(scene.root_transform, Some(out.root_transform));
    assert!(
        out.root_transform
            .transform_vector3(Vec3::X)
            .abs_diff_eq(Vec3::Z, EPS)
    );
}
