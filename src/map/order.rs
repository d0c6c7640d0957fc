//! Orders as drawn on the map, and their tuple wire form.
//!
//! Game logic hands orders over as string tuples: the ordering province,
//! a kind tag, then kind-specific arguments, e.g. `["par", "Move", "bur"]`
//! or `["par", "Support", "bur", "mar"]`. They are decoded into `Order`
//! before drawing so each glyph gets exactly the provinces it needs.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::glyph::GlyphKind;
use super::unit::UnitType;
use super::{DippyMap, MapError};
use crate::scene::ORDERS_LAYER;

/// Errors that can occur when decoding an order tuple.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("empty order")]
    Empty,

    #[error("order for '{0}' has no kind")]
    MissingKind(String),

    #[error("unknown order kind '{0}'")]
    UnknownKind(String),

    #[error("{kind} order is missing argument {index}")]
    MissingArgument { kind: OrderKind, index: usize },

    #[error("{kind} order has unexpected argument '{found}'")]
    UnexpectedArgument { kind: OrderKind, found: String },

    #[error("unknown unit type '{0}'")]
    UnknownUnitType(String),
}

/// The kind tag carried in the second element of an order tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    Hold,
    Move,
    MoveViaConvoy,
    Build,
    Disband,
    Convoy,
    Support,
}

impl OrderKind {
    pub const ALL: [OrderKind; 7] = [
        OrderKind::Hold,
        OrderKind::Move,
        OrderKind::MoveViaConvoy,
        OrderKind::Build,
        OrderKind::Disband,
        OrderKind::Convoy,
        OrderKind::Support,
    ];

    /// Returns the exact tag used in order tuples.
    pub const fn tag(self) -> &'static str {
        match self {
            OrderKind::Hold => "Hold",
            OrderKind::Move => "Move",
            OrderKind::MoveViaConvoy => "MoveViaConvoy",
            OrderKind::Build => "Build",
            OrderKind::Disband => "Disband",
            OrderKind::Convoy => "Convoy",
            OrderKind::Support => "Support",
        }
    }

    /// Parses a kind from its exact tuple tag.
    pub fn from_tag(s: &str) -> Option<OrderKind> {
        OrderKind::ALL.into_iter().find(|k| k.tag() == s)
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An order to visualize.
///
/// Each variant carries exactly the provinces its glyphs are drawn
/// through. `province` is always the province of the ordered unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum Order {
    /// `[p, "Hold"]`
    Hold { province: String },

    /// `[p, "Move", dest]`
    Move { province: String, dest: String },

    /// `[p, "MoveViaConvoy", dest]`
    MoveViaConvoy { province: String, dest: String },

    /// `[p, "Build", "Army" | "Fleet"]`
    Build { province: String, unit_type: UnitType },

    /// `[p, "Disband"]`
    Disband { province: String },

    /// `[p, "Convoy", from, to]`: the fleet at `p` carries an army from `from` to `to`.
    Convoy { province: String, from: String, to: String },

    /// `[p, "Support", supported]`
    SupportHold { province: String, supported: String },

    /// `[p, "Support", from, to]`
    SupportMove { province: String, from: String, to: String },
}

impl Order {
    /// Decodes an order tuple.
    pub fn from_tuple<S: AsRef<str>>(parts: &[S]) -> Result<Order, OrderError> {
        let parts: Vec<&str> = parts.iter().map(AsRef::as_ref).collect();
        let province = parts.first().ok_or(OrderError::Empty)?.to_string();
        let tag = parts
            .get(1)
            .ok_or_else(|| OrderError::MissingKind(province.clone()))?;
        let kind = OrderKind::from_tag(tag).ok_or_else(|| OrderError::UnknownKind(tag.to_string()))?;

        let arg = |index: usize| -> Result<String, OrderError> {
            parts
                .get(index)
                .map(|s| s.to_string())
                .ok_or(OrderError::MissingArgument { kind, index })
        };
        let (order, used) = match kind {
            OrderKind::Hold => (Order::Hold { province }, 2),
            OrderKind::Disband => (Order::Disband { province }, 2),
            OrderKind::Move => (Order::Move { province, dest: arg(2)? }, 3),
            OrderKind::MoveViaConvoy => (Order::MoveViaConvoy { province, dest: arg(2)? }, 3),
            OrderKind::Build => {
                let name = arg(2)?;
                let unit_type =
                    UnitType::from_name(&name).ok_or(OrderError::UnknownUnitType(name))?;
                (Order::Build { province, unit_type }, 3)
            }
            OrderKind::Convoy => (
                Order::Convoy {
                    province,
                    from: arg(2)?,
                    to: arg(3)?,
                },
                4,
            ),
            OrderKind::Support if parts.len() == 3 => (
                Order::SupportHold {
                    province,
                    supported: arg(2)?,
                },
                3,
            ),
            OrderKind::Support => (
                Order::SupportMove {
                    province,
                    from: arg(2)?,
                    to: arg(3)?,
                },
                4,
            ),
        };
        if let Some(extra) = parts.get(used) {
            return Err(OrderError::UnexpectedArgument {
                kind,
                found: extra.to_string(),
            });
        }
        Ok(order)
    }

    /// Encodes the order back into its tuple form.
    pub fn to_tuple(&self) -> Vec<String> {
        let kind = self.kind().tag().to_string();
        let p = self.province().to_string();
        match self {
            Order::Hold { .. } | Order::Disband { .. } => vec![p, kind],
            Order::Move { dest, .. } | Order::MoveViaConvoy { dest, .. } => vec![p, kind, dest.clone()],
            Order::Build { unit_type, .. } => vec![p, kind, unit_type.name().to_string()],
            Order::SupportHold { supported, .. } => vec![p, kind, supported.clone()],
            Order::Convoy { from, to, .. } | Order::SupportMove { from, to, .. } => {
                vec![p, kind, from.clone(), to.clone()]
            }
        }
    }

    pub fn kind(&self) -> OrderKind {
        match self {
            Order::Hold { .. } => OrderKind::Hold,
            Order::Move { .. } => OrderKind::Move,
            Order::MoveViaConvoy { .. } => OrderKind::MoveViaConvoy,
            Order::Build { .. } => OrderKind::Build,
            Order::Disband { .. } => OrderKind::Disband,
            Order::Convoy { .. } => OrderKind::Convoy,
            Order::SupportHold { .. } | Order::SupportMove { .. } => OrderKind::Support,
        }
    }

    /// The province of the ordered unit.
    pub fn province(&self) -> &str {
        match self {
            Order::Hold { province }
            | Order::Move { province, .. }
            | Order::MoveViaConvoy { province, .. }
            | Order::Build { province, .. }
            | Order::Disband { province }
            | Order::Convoy { province, .. }
            | Order::SupportHold { province, .. }
            | Order::SupportMove { province, .. } => province,
        }
    }
}

impl TryFrom<Vec<String>> for Order {
    type Error = OrderError;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        Order::from_tuple(&parts)
    }
}

impl From<Order> for Vec<String> {
    fn from(order: Order) -> Self {
        order.to_tuple()
    }
}

impl DippyMap<'_> {
    /// Draws the glyphs for one order in `color`.
    ///
    /// All geometry is resolved before anything is appended, so a failing
    /// order leaves the `orders` layer untouched.
    pub fn add_order(&mut self, order: &Order, color: &str) -> Result<(), MapError> {
        let glyphs = match order {
            Order::Hold { province } => vec![(GlyphKind::Box, self.box_glyph(province, 4)?)],
            Order::Move { province, dest } => {
                vec![(GlyphKind::Arrow, self.arrow_glyph(&[province, dest])?)]
            }
            Order::MoveViaConvoy { province, dest } => vec![
                (GlyphKind::Arrow, self.arrow_glyph(&[province, dest])?),
                (GlyphKind::Box, self.box_glyph(province, 5)?),
            ],
            Order::Build { province, unit_type } => {
                self.add_unit(&unit_type.template_id(), province, color, false, true, Some(ORDERS_LAYER))?;
                Vec::new()
            }
            Order::Disband { province } => vec![(GlyphKind::Cross, self.cross_glyph(province)?)],
            Order::Convoy { province, from, to } => vec![
                (GlyphKind::Box, self.box_glyph(province, 5)?),
                (GlyphKind::Arrow, self.arrow_glyph(&[from, province, to])?),
            ],
            Order::SupportHold { province, supported } => vec![
                (GlyphKind::Box, self.box_glyph(province, 3)?),
                (GlyphKind::Arrow, self.arrow_glyph(&[province, supported])?),
            ],
            Order::SupportMove { province, from, to } => vec![
                (GlyphKind::Box, self.box_glyph(province, 3)?),
                (GlyphKind::Arrow, self.arrow_glyph(&[province, from, to])?),
            ],
        };
        for (kind, d) in &glyphs {
            self.append_glyph(*kind, d, color)?;
        }
        debug!(order = ?order.to_tuple(), "order drawn");
        Ok(())
    }

    /// Decodes an order tuple and draws it.
    pub fn add_order_tuple<S: AsRef<str>>(&mut self, parts: &[S], color: &str) -> Result<(), MapError> {
        let order = Order::from_tuple(parts)?;
        self.add_order(&order, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::map::fixture;
    use crate::map::glyph::{arrow_path, box_path};

    #[test]
    fn kind_tags_round_trip() {
        for k in OrderKind::ALL {
            assert_eq!(OrderKind::from_tag(k.tag()), Some(k));
        }
        assert_eq!(OrderKind::from_tag("hold"), None);
    }

    #[test]
    fn decodes_every_kind() {
        assert_eq!(
            Order::from_tuple(&["par", "Hold"]).unwrap(),
            Order::Hold { province: "par".into() }
        );
        assert_eq!(
            Order::from_tuple(&["bre", "MoveViaConvoy", "lon"]).unwrap(),
            Order::MoveViaConvoy {
                province: "bre".into(),
                dest: "lon".into()
            }
        );
        assert_eq!(
            Order::from_tuple(&["stp", "Build", "Fleet"]).unwrap(),
            Order::Build {
                province: "stp".into(),
                unit_type: UnitType::Fleet
            }
        );
        assert_eq!(
            Order::from_tuple(&["eng", "Convoy", "lon", "bre"]).unwrap(),
            Order::Convoy {
                province: "eng".into(),
                from: "lon".into(),
                to: "bre".into()
            }
        );
        assert_eq!(
            Order::from_tuple(&["par", "Support", "bur"]).unwrap(),
            Order::SupportHold {
                province: "par".into(),
                supported: "bur".into()
            }
        );
        assert_eq!(
            Order::from_tuple(&["par", "Support", "bur", "mar"]).unwrap().kind(),
            OrderKind::Support
        );
    }

    #[test]
    fn decode_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(Order::from_tuple(&empty), Err(OrderError::Empty));
        assert_eq!(
            Order::from_tuple(&["par"]),
            Err(OrderError::MissingKind("par".into()))
        );
        assert_eq!(
            Order::from_tuple(&["par", "Retreat", "bur"]),
            Err(OrderError::UnknownKind("Retreat".into()))
        );
        assert_eq!(
            Order::from_tuple(&["par", "Move"]),
            Err(OrderError::MissingArgument {
                kind: OrderKind::Move,
                index: 2
            })
        );
        assert_eq!(
            Order::from_tuple(&["par", "Build", "Zeppelin"]),
            Err(OrderError::UnknownUnitType("Zeppelin".into()))
        );
        assert_eq!(
            Order::from_tuple(&["par", "Hold", "bur"]),
            Err(OrderError::UnexpectedArgument {
                kind: OrderKind::Hold,
                found: "bur".into()
            })
        );
    }

    #[test]
    fn tuples_round_trip() {
        let tuples: [&[&str]; 6] = [
            &["par", "Hold"],
            &["par", "Move", "bur"],
            &["kie", "Build", "Army"],
            &["tri", "Disband"],
            &["par", "Support", "bur"],
            &["par", "Support", "bur", "mar"],
        ];
        for t in tuples {
            let order = Order::from_tuple(t).unwrap();
            assert_eq!(order.to_tuple(), t.to_vec());
        }
    }

    #[test]
    fn serde_uses_tuple_form() {
        let order: Order = serde_json::from_str(r#"["eng","Convoy","lon","bre"]"#).unwrap();
        assert_eq!(order.province(), "eng");
        assert_eq!(
            serde_json::to_string(&order).unwrap(),
            r#"["eng","Convoy","lon","bre"]"#
        );
        assert!(serde_json::from_str::<Order>(r#"["eng","Fly"]"#).is_err());
    }

    fn orders_d(scene: &crate::scene::Scene) -> Vec<String> {
        let layer = scene.layer(ORDERS_LAYER).unwrap();
        scene
            .child_elements(layer)
            .map(|n| scene.attr(n, "d").unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn move_draws_single_arrow() {
        let mut scene = fixture::scene();
        let assets = fixture::assets();
        let mut map = DippyMap::new(&mut scene, &assets);
        map.add_order_tuple(&["par", "Move", "bur"], "#FF0000").unwrap();
        let start = Point::new(98.5, 198.0);
        let end = Point::new(198.5, 198.0);
        let expected = arrow_path(start, Point::new(148.5, 198.0), end).unwrap().to_svg();
        assert_eq!(orders_d(&scene), vec![expected]);
    }

    #[test]
    fn support_move_draws_triangle_and_bent_arrow() {
        let mut scene = fixture::scene();
        let assets = fixture::assets();
        let mut map = DippyMap::new(&mut scene, &assets);
        map.add_order_tuple(&["par", "Support", "bur", "mar"], "#00FF00")
            .unwrap();
        let par = Point::new(98.5, 198.0);
        let bur = Point::new(198.5, 198.0);
        let mar = Point::new(98.5, 298.0);
        let expected = vec![
            box_path(par.offset(-3.0, -3.0), 3).to_svg(),
            arrow_path(par, bur, mar).unwrap().to_svg(),
        ];
        assert_eq!(orders_d(&scene), expected);
    }

    #[test]
    fn support_hold_draws_straight_arrow() {
        let mut scene = fixture::scene();
        let assets = fixture::assets();
        let mut map = DippyMap::new(&mut scene, &assets);
        map.add_order_tuple(&["par", "Support", "bur"], "#00FF00").unwrap();
        map.add_order_tuple(&["mar", "Support", "bur", "bur"], "#00FF00")
            .unwrap();
        let d = orders_d(&scene);
        assert_eq!(d.len(), 4);
        let par = Point::new(98.5, 198.0);
        let bur = Point::new(198.5, 198.0);
        assert_eq!(d[1], arrow_path(par, Point::new(148.5, 198.0), bur).unwrap().to_svg());
    }

    #[test]
    fn convoy_draws_pentagon_and_arrow_through_convoyer() {
        let mut scene = fixture::scene();
        let assets = fixture::assets();
        let mut map = DippyMap::new(&mut scene, &assets);
        map.add_order_tuple(&["bur", "Convoy", "par", "mar"], "#0000FF")
            .unwrap();
        let par = Point::new(98.5, 198.0);
        let bur = Point::new(198.5, 198.0);
        let mar = Point::new(98.5, 298.0);
        let expected = vec![
            box_path(bur.offset(-3.0, -3.0), 5).to_svg(),
            arrow_path(par, bur, mar).unwrap().to_svg(),
        ];
        assert_eq!(orders_d(&scene), expected);
    }

    #[test]
    fn move_via_convoy_draws_arrow_then_pentagon() {
        let mut scene = fixture::scene();
        let assets = fixture::assets();
        let mut map = DippyMap::new(&mut scene, &assets);
        map.add_order_tuple(&["par", "MoveViaConvoy", "mar"], "#0000FF")
            .unwrap();
        let par = Point::new(98.5, 198.0);
        let mar = Point::new(98.5, 298.0);
        let expected = vec![
            arrow_path(par, Point::new(98.5, 248.0), mar).unwrap().to_svg(),
            box_path(par.offset(-3.0, -3.0), 5).to_svg(),
        ];
        assert_eq!(orders_d(&scene), expected);
    }

    #[test]
    fn glyph_counts_per_kind() {
        let cases: [(&[&str], usize); 6] = [
            (&["par", "Hold"], 1),
            (&["par", "MoveViaConvoy", "mar"], 2),
            (&["par", "Disband"], 1),
            (&["bur", "Convoy", "par", "mar"], 2),
            (&["par", "Build", "Army"], 2),
            (&["par", "Build", "Fleet"], 2),
        ];
        for (tuple, count) in cases {
            let mut scene = fixture::scene();
            let assets = fixture::assets();
            let mut map = DippyMap::new(&mut scene, &assets);
            map.add_order_tuple(tuple, "#0000FF").unwrap();
            let layer = scene.layer(ORDERS_LAYER).unwrap();
            assert_eq!(scene.child_elements(layer).count(), count, "{:?}", tuple);
        }
    }

    #[test]
    fn hold_box_has_four_corners_per_ring() {
        let mut scene = fixture::scene();
        let assets = fixture::assets();
        let mut map = DippyMap::new(&mut scene, &assets);
        map.add_order(&Order::Hold { province: "par".into() }, "#000").unwrap();
        let d = orders_d(&scene);
        assert_eq!(d[0], box_path(Point::new(95.5, 195.0), 4).to_svg());
        assert_eq!(d[0].matches('M').count(), 2);
        assert_eq!(d[0].matches('L').count(), 6);
    }

    #[test]
    fn failed_order_leaves_layer_untouched() {
        let mut scene = fixture::scene();
        let assets = fixture::assets();
        let mut map = DippyMap::new(&mut scene, &assets);
        map.add_order_tuple(&["par", "Hold"], "#000").unwrap();
        let err = map
            .add_order_tuple(&["par", "MoveViaConvoy", "atl"], "#000")
            .unwrap_err();
        assert!(matches!(err, MapError::MissingAnchor(ref p) if p == "atl"));
        assert_eq!(orders_d(&scene).len(), 1);
        let mut map = DippyMap::new(&mut scene, &assets);
        assert!(matches!(
            map.add_order_tuple(&["par", "Bounce"], "#000"),
            Err(MapError::Order(OrderError::UnknownKind(_)))
        ));
    }
}
