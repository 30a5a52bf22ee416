//! Coordonnées en entrée du transformateur
//!
//! Deux formes sont acceptées :
//! - une géométrie GeoJSON (`geojson::Geometry`, sept types fermés)
//! - un arbre de coordonnées nu (`[x, y]`, `[[x, y], ...]`, imbrication libre)
//!
//! Les positions GeoJSON doivent avoir au moins deux nombres ; les ordonnées
//! supplémentaires (altitude, mesure) sont conservées sans transformation.
//! Les feuilles d'un arbre nu ont exactement deux nombres.

use geojson::{Geometry, PolygonType, Position, Value as GeoValue};
use serde_json::Value;

use crate::error::TransformError;

const GEOMETRY_TYPES: [&str; 7] = [
    "Point",
    "LineString",
    "Polygon",
    "MultiPoint",
    "MultiLineString",
    "MultiPolygon",
    "GeometryCollection",
];

/// Arbre de coordonnées nu
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateTree {
    Point([f64; 2]),
    Nested(Vec<CoordinateTree>),
}

/// Entrée ou sortie du transformateur
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    Geometry(Geometry),
    Tree(CoordinateTree),
}

impl From<Geometry> for Coordinates {
    fn from(geometry: Geometry) -> Self {
        Self::Geometry(geometry)
    }
}

impl From<CoordinateTree> for Coordinates {
    fn from(tree: CoordinateTree) -> Self {
        Self::Tree(tree)
    }
}

impl CoordinateTree {
    pub fn point(x: f64, y: f64) -> Self {
        Self::Point([x, y])
    }

    /// Construit un arbre depuis un tableau JSON
    pub fn from_json(value: &Value) -> Result<Self, TransformError> {
        let items = value.as_array().ok_or_else(|| {
            TransformError::unsupported(format!("expected a coordinate array, got {}", value))
        })?;

        match items.first() {
            None => Err(TransformError::unsupported("empty coordinate array")),
            Some(Value::Number(_)) => {
                let numbers: Option<Vec<f64>> = items.iter().map(Value::as_f64).collect();
                match numbers.as_deref() {
                    Some(&[x, y]) => Ok(Self::Point([x, y])),
                    _ => Err(TransformError::unsupported(format!(
                        "coordinate leaf must be exactly two numbers, got {}",
                        value
                    ))),
                }
            }
            Some(Value::Array(_)) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Nested),
            Some(other) => Err(TransformError::unsupported(format!(
                "unexpected value in coordinate array: {}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Point([x, y]) => Value::Array(vec![Value::from(*x), Value::from(*y)]),
            Self::Nested(children) => Value::Array(children.iter().map(Self::to_json).collect()),
        }
    }

    /// Première feuille en descendant par le premier élément
    pub fn first_leaf(&self) -> Option<[f64; 2]> {
        match self {
            Self::Point(p) => Some(*p),
            Self::Nested(children) => children.first().and_then(Self::first_leaf),
        }
    }

    fn collect_leaves(&self, out: &mut Vec<[f64; 2]>) {
        match self {
            Self::Point(p) => out.push(*p),
            Self::Nested(children) => children.iter().for_each(|c| c.collect_leaves(out)),
        }
    }

    fn try_map<E>(
        &self,
        f: &mut impl FnMut([f64; 2]) -> Result<[f64; 2], E>,
    ) -> Result<Self, E> {
        match self {
            Self::Point(p) => f(*p).map(Self::Point),
            Self::Nested(children) => children
                .iter()
                .map(|c| c.try_map(f))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Nested),
        }
    }
}

fn check_position(position: &Position) -> Result<(), TransformError> {
    if position.len() < 2 {
        return Err(TransformError::unsupported(format!(
            "position needs at least two numbers, got {:?}",
            position
        )));
    }
    Ok(())
}

fn check_positions<'a>(
    mut positions: impl Iterator<Item = &'a Position>,
) -> Result<(), TransformError> {
    positions.try_for_each(check_position)
}

fn check_geometry(geometry: &Geometry) -> Result<(), TransformError> {
    match &geometry.value {
        GeoValue::Point(p) => check_position(p),
        GeoValue::MultiPoint(points) => check_positions(points.iter()),
        GeoValue::LineString(line) => check_positions(line.iter()),
        GeoValue::MultiLineString(lines) => check_positions(lines.iter().flatten()),
        GeoValue::Polygon(rings) => check_positions(rings.iter().flatten()),
        GeoValue::MultiPolygon(polygons) => {
            check_positions(polygons.iter().flatten().flatten())
        }
        GeoValue::GeometryCollection(geometries) => geometries.iter().try_for_each(check_geometry),
    }
}

/// `[x, y]` d'une position, `None` si elle a moins de deux nombres
fn xy(position: &Position) -> Option<[f64; 2]> {
    match position.as_slice() {
        [x, y, ..] => Some([*x, *y]),
        _ => None,
    }
}

fn first_position(value: &GeoValue) -> Option<&Position> {
    match value {
        GeoValue::Point(p) => Some(p),
        GeoValue::MultiPoint(points) => points.first(),
        GeoValue::LineString(line) => line.first(),
        GeoValue::MultiLineString(lines) => lines.first()?.first(),
        GeoValue::Polygon(rings) => rings.first()?.first(),
        GeoValue::MultiPolygon(polygons) => polygons.first()?.first()?.first(),
        GeoValue::GeometryCollection(geometries) => first_position(&geometries.first()?.value),
    }
}

fn collect_positions<'a>(value: &'a GeoValue, out: &mut Vec<&'a Position>) {
    match value {
        GeoValue::Point(p) => out.push(p),
        GeoValue::MultiPoint(points) | GeoValue::LineString(points) => out.extend(points),
        GeoValue::MultiLineString(lines) | GeoValue::Polygon(lines) => {
            out.extend(lines.iter().flatten())
        }
        GeoValue::MultiPolygon(polygons) => out.extend(polygons.iter().flatten().flatten()),
        GeoValue::GeometryCollection(geometries) => geometries
            .iter()
            .for_each(|g| collect_positions(&g.value, out)),
    }
}

fn map_position<E>(
    position: &Position,
    f: &mut impl FnMut([f64; 2]) -> Result<[f64; 2], E>,
) -> Result<Position, E> {
    let mut out = position.clone();
    // Position trop courte : recopiée telle quelle, `validate` la refuse en amont
    if let Some(point) = xy(position) {
        let [x, y] = f(point)?;
        out[0] = x;
        out[1] = y;
    }
    Ok(out)
}

fn map_line<E>(
    line: &[Position],
    f: &mut impl FnMut([f64; 2]) -> Result<[f64; 2], E>,
) -> Result<Vec<Position>, E> {
    line.iter().map(|p| map_position(p, f)).collect()
}

fn map_polygon<E>(
    rings: &PolygonType,
    f: &mut impl FnMut([f64; 2]) -> Result<[f64; 2], E>,
) -> Result<PolygonType, E> {
    rings.iter().map(|ring| map_line(ring, f)).collect()
}

fn map_geometry<E>(
    geometry: &Geometry,
    f: &mut impl FnMut([f64; 2]) -> Result<[f64; 2], E>,
) -> Result<Geometry, E> {
    let value = match &geometry.value {
        GeoValue::Point(p) => GeoValue::Point(map_position(p, f)?),
        GeoValue::MultiPoint(points) => GeoValue::MultiPoint(map_line(points, f)?),
        GeoValue::LineString(line) => GeoValue::LineString(map_line(line, f)?),
        GeoValue::MultiLineString(lines) => GeoValue::MultiLineString(
            lines
                .iter()
                .map(|l| map_line(l, f))
                .collect::<Result<_, _>>()?,
        ),
        GeoValue::Polygon(rings) => GeoValue::Polygon(map_polygon(rings, f)?),
        GeoValue::MultiPolygon(polygons) => GeoValue::MultiPolygon(
            polygons
                .iter()
                .map(|p| map_polygon(p, f))
                .collect::<Result<_, _>>()?,
        ),
        GeoValue::GeometryCollection(geometries) => GeoValue::GeometryCollection(
            geometries
                .iter()
                .map(|g| map_geometry(g, f))
                .collect::<Result<_, _>>()?,
        ),
    };

    // La bbox source n'a plus de sens en WGS84
    Ok(Geometry {
        bbox: None,
        value,
        foreign_members: geometry.foreign_members.clone(),
    })
}

impl Coordinates {
    /// Lit une géométrie GeoJSON (objet avec `type`) ou un arbre nu (tableau)
    pub fn from_json(value: &Value) -> Result<Self, TransformError> {
        match value {
            Value::Object(object) => {
                let kind = object.get("type").and_then(Value::as_str).ok_or_else(|| {
                    TransformError::unsupported("GeoJSON object without a 'type' member")
                })?;
                if !GEOMETRY_TYPES.contains(&kind) {
                    return Err(TransformError::unsupported(format!(
                        "unsupported geometry type: {}",
                        kind
                    )));
                }
                let geometry: Geometry = serde_json::from_value(value.clone())
                    .map_err(|e| TransformError::unsupported(format!("invalid {}: {}", kind, e)))?;
                check_geometry(&geometry)?;
                Ok(Self::Geometry(geometry))
            }
            Value::Array(_) => CoordinateTree::from_json(value).map(Self::Tree),
            other => Err(TransformError::unsupported(format!(
                "expected a GeoJSON geometry or a coordinate array, got {}",
                other
            ))),
        }
    }

    /// Vérifie la structure d'une entrée construite en code
    ///
    /// Les arbres nus sont valides par construction ; les positions GeoJSON
    /// doivent avoir au moins deux nombres.
    pub fn validate(&self) -> Result<(), TransformError> {
        match self {
            Self::Geometry(geometry) => check_geometry(geometry),
            Self::Tree(_) => Ok(()),
        }
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Geometry(geometry) => serde_json::to_value(geometry),
            Self::Tree(tree) => Ok(tree.to_json()),
        }
    }

    /// Première paire `[x, y]` rencontrée en descendant par le premier élément
    pub fn first_leaf(&self) -> Option<[f64; 2]> {
        match self {
            Self::Geometry(geometry) => first_position(&geometry.value).and_then(xy),
            Self::Tree(tree) => tree.first_leaf(),
        }
    }

    /// Toutes les paires `[x, y]`, dans l'ordre du document
    pub fn leaves(&self) -> Vec<[f64; 2]> {
        let mut out = Vec::new();
        match self {
            Self::Geometry(geometry) => {
                let mut positions = Vec::new();
                collect_positions(&geometry.value, &mut positions);
                out.extend(positions.into_iter().filter_map(xy));
            }
            Self::Tree(tree) => tree.collect_leaves(&mut out),
        }
        out
    }

    /// Applique `f` à chaque paire en conservant la forme de l'entrée
    pub fn try_map<E>(
        &self,
        mut f: impl FnMut([f64; 2]) -> Result<[f64; 2], E>,
    ) -> Result<Self, E> {
        match self {
            Self::Geometry(geometry) => map_geometry(geometry, &mut f).map(Self::Geometry),
            Self::Tree(tree) => tree.try_map(&mut f).map(Self::Tree),
        }
    }
}
