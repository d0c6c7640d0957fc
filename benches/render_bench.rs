use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::Duration;

use dippymap::config::RenderConfig;
use dippymap::geometry::Point;
use dippymap::map::{arrow_path, DippyMap, Order};
use dippymap::palette::{assign_colors, ColorPreferences};
use dippymap::phase::{render_history, render_phase, PhaseView, UnitView};
use dippymap::scene::{Assets, Scene};

const SIDE: usize = 9;
const NATIONS: [&str; 7] = ["Austria", "England", "France", "Germany", "Italy", "Russia", "Turkey"];

fn province(x: usize, y: usize) -> String {
    format!("p{}_{}", x, y)
}

/// A SIDE x SIDE grid of square provinces, every other row shifted by a group transform.
fn grid_map() -> String {
    let mut provinces = String::new();
    let mut centers = String::new();
    for y in 0..SIDE {
        let shift = if y % 2 == 1 { 25 } else { 0 };
        let _ = write!(provinces, "<g transform=\"translate({},0)\">", shift);
        let _ = write!(centers, "<g transform=\"translate({},0)\">", shift);
        for x in 0..SIDE {
            let (px, py) = (x * 50, y * 50);
            let id = province(x, y);
            let _ = write!(provinces, "<path id=\"{}\" d=\"m {},{} 50,0 0,50 -50,0 z\"/>", id, px, py);
            let _ = write!(centers, "<path id=\"{}Center\" d=\"m {},{} 1,0 z\"/>", id, px + 25, py + 25);
        }
        provinces.push_str("</g>");
        centers.push_str("</g>");
    }
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\"><defs><pattern id=\"stripes\"/></defs>\
         <g id=\"provinces\" style=\"display:none\">{}</g><g id=\"centers\">{}</g>\
         <g id=\"highlights\"/><g id=\"orders\"/><g id=\"units\"/></svg>",
        provinces, centers
    )
}

fn assets() -> Assets {
    let mut assets = Assets::new();
    for name in ["Army", "Fleet"] {
        let art = if name == "Army" { "body" } else { "hull" };
        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><g id=\"shadow\"><path d=\"m 0,0 10,0 0,10 z\"/></g>\
             <g id=\"{}\"><path d=\"m 1,1 10,0 0,10 z\"/></g></svg>",
            art
        );
        assets.insert_svg(format!("unit{}", name), &svg).unwrap();
    }
    assets
}

fn busy_phase() -> PhaseView {
    let mut phase = PhaseView {
        variant: "Grid".to_string(),
        nations: NATIONS.iter().map(|n| n.to_string()).collect(),
        ..PhaseView::default()
    };
    for y in 0..SIDE {
        for x in 0..SIDE {
            let id = province(x, y);
            let nation = NATIONS[(x + y) % NATIONS.len()].to_string();
            phase.provinces.push(id.clone());
            if (x + y) % 3 == 0 {
                phase.supply_center_provinces.insert(id.clone());
                phase.supply_centers.insert(id.clone(), nation.clone());
            }
            if x + 1 < SIDE {
                phase.units.insert(
                    id.clone(),
                    UnitView {
                        unit_type: dippymap::map::UnitType::Army,
                        nation: nation.clone(),
                    },
                );
                let tail = if x % 2 == 0 {
                    vec!["Move".to_string(), province(x + 1, y)]
                } else {
                    vec!["Support".to_string(), province(x - 1, y), province(x - 1, (y + 1) % SIDE)]
                };
                phase.orders.entry(nation).or_default().insert(id.clone(), tail);
                let result = if x % 4 == 0 { "OK" } else { "ErrBounce" };
                phase.resolutions.insert(id, result.to_string());
            }
        }
    }
    phase
}

fn colors(phase: &PhaseView) -> BTreeMap<String, String> {
    assign_colors(&phase.variant, &phase.nations, &ColorPreferences::default())
}

fn bench_arrow_path(c: &mut Criterion) {
    let start = Point::new(10.0, 20.0);
    let middle = Point::new(150.0, 40.0);
    let end = Point::new(120.0, 220.0);
    c.bench_function("arrow_path_bent", |b| {
        b.iter(|| arrow_path(black_box(start), black_box(middle), black_box(end)))
    });
}

fn bench_parse_map(c: &mut Criterion) {
    let svg = grid_map();
    c.bench_function("scene_parse_grid", |b| b.iter(|| Scene::parse(black_box(&svg)).unwrap()));
}

fn bench_add_orders(c: &mut Criterion) {
    let base = Scene::parse(&grid_map()).unwrap();
    let assets = assets();
    let orders: Vec<Order> = (0..SIDE - 1)
        .flat_map(|x| (0..SIDE).map(move |y| (x, y)))
        .map(|(x, y)| Order::Move {
            province: province(x, y),
            dest: province(x + 1, y),
        })
        .collect();
    c.bench_function("add_order_move_72", |b| {
        b.iter(|| {
            let mut scene = base.clone();
            let mut map = DippyMap::new(&mut scene, &assets);
            for order in &orders {
                map.add_order(black_box(order), "#FF2F80").unwrap();
            }
            scene
        })
    });
}

fn bench_render_phase(c: &mut Criterion) {
    let base = Scene::parse(&grid_map()).unwrap();
    let assets = assets();
    let phase = busy_phase();
    let colors = colors(&phase);
    let config = RenderConfig::default();
    c.bench_function("render_phase_grid", |b| {
        b.iter(|| {
            let mut scene = base.clone();
            let mut map = DippyMap::new(&mut scene, &assets);
            render_phase(&mut map, black_box(&phase), &colors, &config).unwrap();
            scene.to_svg()
        })
    });
}

fn bench_render_history(c: &mut Criterion) {
    let base = Scene::parse(&grid_map()).unwrap();
    let assets = assets();
    let phases = vec![busy_phase(); 16];
    let colors = colors(&phases[0]);
    let config = RenderConfig::default();
    let mut group = c.benchmark_group("render_history");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("grid_16_phases", |b| {
        b.iter(|| render_history(&base, &assets, black_box(&phases), &colors, &config).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_arrow_path,
    bench_parse_map,
    bench_add_orders,
    bench_render_phase,
    bench_render_history,
);
criterion_main!(benches);
