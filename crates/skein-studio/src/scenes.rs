//! Demo scenes.
//!
//! Every scene is rebuilt per frame from the elapsed time; the trees are cheap
//! to assemble and the renderer keeps no per-node state besides decoded images.

use std::rc::Rc;

use clap::ValueEnum;
use skein_engine::coords::{Matrix, Vec2};
use skein_engine::paint::ColorMatrix;
use skein_engine::scene::build::{
    blur, circle, color_matrix, component, group, image, linear_gradient, path,
    radial_gradient, rect, text,
};
use skein_engine::scene::{Component, ComponentError, FnComponent, Node, Props};

/// Logical size every scene is laid out for.
pub const SCENE_SIZE: (f32, f32) = (960.0, 640.0);

/// Small inline SVG so the image scene has one source that never touches disk.
const DOT_SVG: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='64' height='64'%3E%3Ccircle cx='32' cy='32' r='28' fill='%23ffb703'/%3E%3C/svg%3E";

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// All demos tiled on one page.
    Gallery,
    Shapes,
    Groups,
    Filters,
    Text,
    Images,
}

/// Builds `kind` as it looks `t` seconds in.
pub fn build(kind: SceneKind, t: f32) -> Node {
    match kind {
        SceneKind::Gallery => gallery(t),
        SceneKind::Shapes => shapes(t),
        SceneKind::Groups => groups(t),
        SceneKind::Filters => filters(t),
        SceneKind::Text => captions(t),
        SceneKind::Images => images(t),
    }
}

fn affine(m: Matrix) -> [f32; 6] {
    [m.sx, m.kx, m.tx, m.ky, m.sy, m.ty]
}

/// Places `node` into a `scale`d tile whose top-left corner is `(x, y)`.
fn tile(x: f32, y: f32, scale: f32, node: Node) -> Node {
    let m = Matrix::translate(x, y).concat(&Matrix::scale(scale, scale));
    group().transform(&affine(m)).child(node).into()
}

fn gallery(t: f32) -> Node {
    let (w, h) = SCENE_SIZE;
    let s = 1.0 / 3.0;
    let (tw, th) = (w * s, h * s);
    Node::Fragment(vec![
        tile(0.0, 0.0, s, shapes(t)),
        tile(tw, 0.0, s, groups(t)),
        tile(tw * 2.0, 0.0, s, filters(t)),
        tile(0.0, th, s, captions(t)),
        tile(tw, th, s, images(t)),
        rect(0.0, 0.0, w, h * 2.0 * s).color("#d0d0d0").stroke(1.0).into(),
    ])
}

fn shapes(t: f32) -> Node {
    let pulse = 0.5 + 0.5 * (t * 2.0).sin();
    Node::Fragment(vec![
        rect(40.0, 40.0, 260.0, 160.0)
            .child(linear_gradient(
                Vec2::new(40.0, 40.0),
                Vec2::new(300.0, 200.0),
                &["#ff7a59", "#ffd166", "#06d6a0"],
            ))
            .into(),
        circle(480.0, 120.0, 60.0 + 20.0 * pulse)
            .child(radial_gradient(Vec2::new(480.0, 120.0), 80.0, &["#ffffff", "#118ab2"]))
            .into(),
        circle(760.0, 120.0, 70.0).color("#073b4c").stroke(6.0).into(),
        path("M40 300 C 140 220, 240 380, 340 300 S 540 220, 640 300")
            .color("#ef476f")
            .stroke(8.0)
            .into(),
        path("M700 260 L780 400 L620 400 Z").color("#8338ec").into(),
        rect(40.0, 440.0, 880.0, 140.0).color("rgba(17, 138, 178, 0.25)").into(),
        rect(40.0 + 760.0 * pulse, 470.0, 120.0, 80.0).color("#118ab2").into(),
    ])
}

fn groups(t: f32) -> Node {
    let center = Vec2::new(480.0, 320.0);
    let spin = Matrix::rotate_about(t * 45.0, center);
    let petals = (0..8).map(|i| {
        let m = Matrix::rotate_about(i as f32 * 45.0, center);
        group()
            .transform(&affine(m))
            .child(rect(center.x - 20.0, center.y - 200.0, 40.0, 140.0).color("#06d6a0"))
    });

    let fade = 0.25 + 0.75 * (0.5 + 0.5 * t.sin());
    Node::Fragment(vec![
        group().transform(&affine(spin)).children(petals).into(),
        group()
            .opacity(fade)
            .child(circle(center.x, center.y, 70.0).color("#ef476f"))
            .child(circle(center.x + 60.0, center.y, 70.0).color("#ffd166"))
            .into(),
        group()
            .transform(&affine(Matrix::translate(40.0, 40.0).concat(&Matrix::scale(0.5, 0.5))))
            .child(rect(0.0, 0.0, 200.0, 200.0).color("#073b4c"))
            .child(rect(50.0, 50.0, 100.0, 100.0).color("#ffffff"))
            .into(),
    ])
}

fn filters(t: f32) -> Node {
    let sigma = 2.0 + 6.0 * (0.5 + 0.5 * (t * 1.5).sin());
    let sample = || {
        Node::Fragment(vec![
            rect(0.0, 0.0, 260.0, 200.0)
                .child(linear_gradient(
                    Vec2::new(0.0, 0.0),
                    Vec2::new(260.0, 200.0),
                    &["#ff006e", "#3a86ff"],
                ))
                .into(),
            circle(130.0, 100.0, 60.0).color("#ffbe0b").into(),
        ])
    };
    let at = |x: f32, y: f32| affine(Matrix::translate(x, y));

    Node::Fragment(vec![
        group().transform(&at(40.0, 60.0)).child(sample()).into(),
        group()
            .transform(&at(350.0, 60.0))
            .child(blur(sigma).child(sample()))
            .into(),
        group()
            .transform(&at(660.0, 60.0))
            .child(color_matrix(ColorMatrix::GRAYSCALE.0).child(sample()))
            .into(),
        group()
            .transform(&at(350.0, 360.0))
            .child(blur(3.0).child(color_matrix(ColorMatrix::GRAYSCALE.0).child(sample())))
            .into(),
        text(40.0, 300.0, "original").prop("fontSize", 20.0).into(),
        text(350.0, 300.0, "blur").prop("fontSize", 20.0).into(),
        text(660.0, 300.0, "grayscale").prop("fontSize", 20.0).into(),
    ])
}

/// Card component: a rounded-looking panel with a title and body line.
fn card() -> Rc<dyn Component> {
    Rc::new(FnComponent::new("Card", |props: &Props, children: &[Node]| {
        let r = props.reader("Card");
        let x = r.number("x").map_err(|e| ComponentError::new(e.to_string()))?;
        let y = r.number("y").map_err(|e| ComponentError::new(e.to_string()))?;
        let title = r.str_or("title", "").map_err(|e| ComponentError::new(e.to_string()))?;
        let mut nodes: Vec<Node> = vec![
            rect(x, y, 400.0, 120.0).color("#f8f9fa").into(),
            rect(x, y, 6.0, 120.0).color("#3a86ff").into(),
            text(x + 24.0, y + 20.0, title).prop("fontSize", 28.0).into(),
        ];
        nodes.extend(children.iter().cloned());
        Ok(Node::Fragment(nodes))
    }))
}

fn captions(t: f32) -> Node {
    let card = card();
    let frames = (t * 4.0) as usize % 4;
    let dots = ".".repeat(frames);
    Node::Fragment(vec![
        text(40.0, 40.0, "skein").prop("fontSize", 64.0).color("#073b4c").into(),
        text(40.0, 120.0, "declarative scenes on a raster canvas")
            .prop("fontSize", 24.0)
            .color("#555555")
            .into(),
        component(card.clone())
            .prop("x", 40.0)
            .prop("y", 200.0)
            .prop("title", "Components")
            .child(text(64.0, 270.0, "expand into nodes at render time").prop("fontSize", 18.0))
            .into(),
        component(card)
            .prop("x", 40.0)
            .prop("y", 360.0)
            .prop("title", "Text")
            .child(text(64.0, 430.0, &format!("rasterized per frame{dots}")).prop("fontSize", 18.0))
            .into(),
    ])
}

fn images(t: f32) -> Node {
    let bob = 10.0 * (t * 2.0).sin();
    Node::Fragment(vec![
        image(40.0, 40.0, 320.0, 180.0, "landscape.svg").into(),
        image(400.0, 40.0, 240.0, 240.0, "landscape.svg").prop("fit", "cover").into(),
        image(680.0, 40.0, 240.0, 240.0, "landscape.svg").prop("fit", "contain").into(),
        rect(680.0, 40.0, 240.0, 240.0).color("#cccccc").stroke(1.0).into(),
        image(40.0, 320.0 + bob, 160.0, 160.0, "badge.svg").into(),
        image(240.0, 320.0, 160.0, 160.0, "badge.svg").opacity(0.4).into(),
        image(440.0, 352.0, 96.0, 96.0, DOT_SVG).into(),
        // Never resolves; stays on the loading placeholder.
        image(600.0, 320.0, 200.0, 160.0, "missing.png").into(),
    ])
}
