//! End-to-end rendering scenarios against a small hand-drawn map.

use std::cell::RefCell;
use std::rc::Rc;

use dippymap::geometry::Point;
use dippymap::map::{
    arrow_path, box_path, ClickOptions, ClickRegistry, DippyMap, MapError, Order, ReadyQueue,
};
use dippymap::scene::{Assets, Scene, HIGHLIGHTS_LAYER, ORDERS_LAYER};

const MAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="400" height="400">
  <defs><pattern id="stripes" width="4" height="4"/></defs>
  <g id="provinces" inkscape:label="provinces" style="display:none">
    <path id="par" d="m 90,190 20,0 0,20 z"/>
    <path id="bur" d="m 190,190 20,0 0,20 z"/>
    <path id="mar" d="m 90,290 20,0 0,20 z"/>
    <g transform="translate(200,100)">
      <path id="spa/sc" d="m 0,0 20,0 0,20 z"/>
    </g>
  </g>
  <g id="centers">
    <path id="parCenter" d="m 100,200 1,0 0,1 z"/>
    <path id="burCenter" d="m 200,200 1,0 0,1 z"/>
    <path id="marCenter" d="m 100,300 1,0 0,1 z"/>
    <g transform="translate(200,100)">
      <path id="spa/scCenter" d="m 10,10 1,0 0,1 z"/>
    </g>
  </g>
  <g id="highlights"/>
  <g id="orders"/>
  <g id="units"/>
</svg>"#;

const ARMY: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="shadow"><circle r="10"/></g><g id="body"><circle r="9"/></g></svg>"#;

fn load() -> (Scene, Assets) {
    let scene = Scene::parse(MAP).unwrap();
    let mut assets = Assets::new();
    assets.insert_svg("unitArmy", ARMY).unwrap();
    (scene, assets)
}

fn order_paths(scene: &Scene) -> Vec<String> {
    let layer = scene.layer(ORDERS_LAYER).unwrap();
    scene
        .child_elements(layer)
        .map(|n| scene.attr(n, "d").unwrap().to_string())
        .collect()
}

#[test]
fn anchor_without_transform_gets_fixed_correction() {
    let (mut scene, assets) = load();
    let map = DippyMap::new(&mut scene, &assets);
    assert_eq!(map.center_of("par").unwrap(), Point::new(98.5, 198.0));
    assert_eq!(map.center_of("par").unwrap(), map.center_of("par").unwrap());
    assert_eq!(map.center_of("spa/sc").unwrap(), Point::new(208.5, 108.0));
}

#[test]
fn move_order_is_one_arrow() {
    let (mut scene, assets) = load();
    let mut map = DippyMap::new(&mut scene, &assets);
    map.add_order_tuple(&["par", "Move", "bur"], "#FF0000").unwrap();
    let par = map.center_of("par").unwrap();
    let bur = map.center_of("bur").unwrap();
    let expected = arrow_path(par, Point::new(148.5, 198.0), bur).unwrap().to_svg();
    assert_eq!(order_paths(&scene), vec![expected]);
}

#[test]
fn four_element_support_is_triangle_and_bent_arrow() {
    let (mut scene, assets) = load();
    let mut map = DippyMap::new(&mut scene, &assets);
    map.add_order_tuple(&["par", "Support", "bur", "mar"], "#00FF00")
        .unwrap();
    let par = Point::new(98.5, 198.0);
    let bur = Point::new(198.5, 198.0);
    let mar = Point::new(98.5, 298.0);
    assert_eq!(
        order_paths(&scene),
        vec![
            box_path(Point::new(95.5, 195.0), 3).to_svg(),
            arrow_path(par, bur, mar).unwrap().to_svg(),
        ]
    );
}

#[test]
fn remove_orders_clears_every_glyph() {
    let (mut scene, assets) = load();
    let mut map = DippyMap::new(&mut scene, &assets);
    let orders: Vec<Order> = serde_json::from_str(
        r#"[["par","Hold"],["bur","Move","mar"],["mar","Disband"],["par","Build","Army"]]"#,
    )
    .unwrap();
    for order in &orders {
        map.add_order(order, "#0086ED").unwrap();
    }
    // box, arrow, cross, then the built unit's shadow and body
    let layer = map.scene().layer(ORDERS_LAYER).unwrap();
    assert_eq!(map.scene().child_elements(layer).count(), 5);
    map.remove_orders().unwrap();
    assert_eq!(scene.child_elements(layer).count(), 0);
}

#[test]
fn highlight_round_trip_restores_ids() {
    let (mut scene, assets) = load();
    let before = scene.element_ids();
    let mut map = DippyMap::new(&mut scene, &assets);
    map.highlight_province("spa/sc").unwrap();
    assert!(map.is_highlighted("spa/sc"));
    map.unhighlight_province("spa/sc");
    assert_eq!(scene.element_ids(), before);
}

#[test]
fn click_listener_lifecycle() {
    let (mut scene, assets) = load();
    let before = scene.element_ids();
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let mut registry = ClickRegistry::new();
    let mut map = DippyMap::new(&mut scene, &assets);

    let seen = Rc::clone(&clicks);
    map.add_click_listener(
        &mut registry,
        "spa/sc",
        move |p| seen.borrow_mut().push(p.to_string()),
        ClickOptions::default(),
    )
    .unwrap();
    assert!(map.is_highlighted("spa/sc"));
    let region = map.scene().find_by_id("spa/sc_click").unwrap();
    assert_eq!(map.scene().attr(region, "transform"), Some("translate(200,100)"));

    assert!(registry.click("spa/sc_click"));
    assert!(!registry.click("par"));
    assert_eq!(*clicks.borrow(), vec!["spa/sc"]);

    assert_eq!(map.clear_click_listeners(&mut registry), 1);
    assert!(!registry.click("spa/sc_click"));
    assert_eq!(scene.element_ids(), before);
    let highlights = scene.layer(HIGHLIGHTS_LAYER).unwrap();
    assert_eq!(scene.child_elements(highlights).count(), 0);
}

#[test]
fn ready_queue_defers_until_loaded() {
    let mut queue = ReadyQueue::new();
    queue.add_ready_action(|m| m.add_order_tuple(&["par", "Hold"], "#FF2F80"));
    queue.add_ready_action(|m| m.show_provinces());

    let (mut scene, assets) = load();
    let mut map = DippyMap::new(&mut scene, &assets);
    queue.mark_ready(&mut map).unwrap();
    assert_eq!(order_paths(&scene).len(), 1);
}

#[test]
fn failures_leave_earlier_overlays_in_place() {
    let (mut scene, assets) = load();
    let mut map = DippyMap::new(&mut scene, &assets);
    map.add_order_tuple(&["par", "Hold"], "#000000").unwrap();
    assert!(matches!(
        map.add_order_tuple(&["par", "Move", "lon"], "#000000"),
        Err(MapError::MissingAnchor(_))
    ));
    assert!(matches!(
        map.color_province("lon", "#000000"),
        Err(MapError::UnknownProvince(_))
    ));
    assert_eq!(order_paths(&scene).len(), 1);
}

#[test]
fn serialized_map_parses_again() {
    let (mut scene, assets) = load();
    let mut map = DippyMap::new(&mut scene, &assets);
    map.add_unit("unitArmy", "mar", "#FF2F80", false, false, None).unwrap();
    map.add_order_tuple(&["mar", "Move", "par"], "#FF2F80").unwrap();
    map.show_provinces().unwrap();
    let svg = scene.to_svg();
    let reparsed = Scene::parse(&svg).unwrap();
    assert_eq!(reparsed.element_ids(), scene.element_ids());
    assert!(svg.contains("inkscape:label=\"provinces\""));
}
