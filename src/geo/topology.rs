//! TopoJSON decoding into per-feature polygon rings.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::Point;

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Option<Transform>,
    pub objects: HashMap<String, Geometry>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
}

/// Quantization transform; present means arc positions are delta-encoded integers.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub arcs: Option<Value>,
    #[serde(default)]
    pub geometries: Vec<Geometry>,
}

/// One drawable area: polygons -> rings -> points.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Numeric region id (FIPS for us-atlas); `None` when absent or non-numeric.
    pub id: Option<u32>,
    pub name: Option<String>,
    pub polygons: Vec<Vec<Vec<Point>>>,
}

impl Geometry {
    fn numeric_id(&self) -> Option<u32> {
        match self.id.as_ref()? {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn name(&self) -> Option<String> {
        self.properties
            .as_ref()?
            .get("name")?
            .as_str()
            .map(str::to_string)
    }
}

impl Topology {
    /// Absolute coordinates for every arc.
    fn decoded_arcs(&self) -> Vec<Vec<Point>> {
        self.arcs
            .iter()
            .map(|arc| {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| match &self.transform {
                        Some(t) => {
                            x += p[0];
                            y += p[1];
                            [x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
                        }
                        None => [p[0], p[1]],
                    })
                    .collect()
            })
            .collect()
    }

    /// Flatten the named object into features. Non-areal geometries are skipped.
    pub fn features(&self, object: &str) -> Result<Vec<Feature>> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| anyhow!("topology has no object named {:?}", object))?;
        let arcs = self.decoded_arcs();
        let mut out = Vec::new();
        collect_features(root, &arcs, &mut out)?;
        Ok(out)
    }
}

fn collect_features(geom: &Geometry, arcs: &[Vec<Point>], out: &mut Vec<Feature>) -> Result<()> {
    let polygons = match geom.kind.as_str() {
        "GeometryCollection" => {
            for child in &geom.geometries {
                collect_features(child, arcs, out)?;
            }
            return Ok(());
        }
        "Polygon" => {
            let refs: Vec<Vec<i64>> = parse_refs(geom)?;
            vec![polygon(arcs, &refs)?]
        }
        "MultiPolygon" => {
            let refs: Vec<Vec<Vec<i64>>> = parse_refs(geom)?;
            refs.iter()
                .map(|p| polygon(arcs, p))
                .collect::<Result<Vec<_>>>()?
        }
        _ => return Ok(()),
    };
    out.push(Feature {
        id: geom.numeric_id(),
        name: geom.name(),
        polygons,
    });
    Ok(())
}

fn parse_refs<T: serde::de::DeserializeOwned>(geom: &Geometry) -> Result<T> {
    let raw = geom.arcs.clone().unwrap_or(Value::Array(Vec::new()));
    serde_json::from_value(raw).with_context(|| format!("bad arcs for {} {:?}", geom.kind, geom.id))
}

fn polygon(arcs: &[Vec<Point>], rings: &[Vec<i64>]) -> Result<Vec<Vec<Point>>> {
    rings.iter().map(|r| ring(arcs, r)).collect()
}

/// Stitch arcs end to end; `~i` means arc `i` reversed. Consecutive arcs
/// share an endpoint, so the previous arc's last point is dropped.
fn ring(arcs: &[Vec<Point>], refs: &[i64]) -> Result<Vec<Point>> {
    let mut points: Vec<Point> = Vec::new();
    for &r in refs {
        let (idx, reversed) = if r < 0 { (!r, true) } else { (r, false) };
        let arc = usize::try_from(idx)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or_else(|| anyhow!("arc reference {} out of range", r))?;
        points.pop();
        if reversed {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
    }
    if let Some(&first) = points.first() {
        if points.len() < 4 {
            points.push(first);
        }
    }
    Ok(points)
}
