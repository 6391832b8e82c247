/*

    Provide utilities to parse culling scene JSON files.

    The parser is somewhat robust, let <a> be integer or float type,
    in JSON file <a> can be given both in quotes (string) or as is.

    e.g. In JSON file both
    "FovY": "45" and "FovY": 45
    works as fovy: Float in source code

    Vector3 fields accept both "x y z" and [x, y, z].

    @date: 2 Oct, 2025
    @author: bartu
*/

use std::fmt::{self};
use std::marker::PhantomData;
use std::str::FromStr;
use std::fs::File;
use std::io::BufReader;

use serde_json::{self, Value};
use serde::{Deserialize, Deserializer};
use serde::de::{self, Visitor, SeqAccess};

use crate::prelude::*;
use crate::scene::CullingScene;

pub fn parse_scene(path: &str) -> Result<CullingScene, Box<dyn std::error::Error>> {
    let span = tracing::span!(tracing::Level::INFO, "load_scene");
    let _enter = span.enter();

    // Open file
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    debug!("Reading file from {}", path);

    // Parse JSON into Scene
    let scene: CullingScene = serde_json::from_reader(reader)?;
    Ok(scene)
}

pub(crate) fn deser_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    /*
        Deserialize usize type given as either string or number in JSON
    */
    let s: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match s {
        serde_json::Value::Number(n) => n.as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| de::Error::custom("Invalid integer")),
        serde_json::Value::String(s) => s.parse::<usize>()
            .map_err(|_| de::Error::custom("Failed to parse integer from string")),
        t => Err(de::Error::custom(format!("Expected int or string, found {:#?}", t))),
    }
}

fn float_from_value<E: de::Error>(value: Value) -> Result<Float, E> {
    match value {
        serde_json::Value::Number(n) => n.as_f64()
            .map(|v| v as Float)
            .ok_or_else(|| de::Error::custom("Invalid float")),
        serde_json::Value::String(s) => s.trim().parse::<Float>()
            .map_err(|_| de::Error::custom("Failed to parse float from string")),
        t => Err(de::Error::custom(format!("Expected float or string, found {t}"))),
    }
}

// Handles floats as string or number
pub(crate) fn deser_float<'de, D>(deserializer: D) -> Result<Float, D::Error>
where
    D: Deserializer<'de>,
{
    let s: serde_json::Value = Deserialize::deserialize(deserializer)?;
    float_from_value(s)
}

pub(crate) fn deser_opt_float<'de, D>(deserializer: D) -> Result<Option<Float>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match s {
        Value::Null => Ok(None),
        Value::String(ref v) if v.trim().is_empty() => Ok(None),
        other => float_from_value(other).map(Some),
    }
}

pub trait From3<T>: Sized {
    fn new(x: T, y: T, z: T) -> Self;
}

impl From3<f64> for bevy_math::DVec3 {
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z)
    }
}

pub(crate) fn deser_vec3<'de, D, V, F>(deserializer: D) -> Result<V, D::Error>
where
    D: Deserializer<'de>,
    F: Deserialize<'de> + FromStr,
    F::Err: fmt::Display,
    V: From3<F>,
{
    struct Vec3Visitor<V, F>(PhantomData<(V, F)>);

    impl<'de, V, F> Visitor<'de> for Vec3Visitor<V, F>
    where
        F: Deserialize<'de> + FromStr,
        F::Err: fmt::Display,
        V: From3<F>,
    {
        type Value = V;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a Vec3 as a string 'x y z' or an array [x, y, z]")
        }

        // Given "X Y Z"
        fn visit_str<E>(self, value: &str) -> Result<V, E>
        where
            E: de::Error,
        {
            parse_vec3_str(value).map_err(de::Error::custom)
        }

        // Given [X, Y, Z]
        fn visit_seq<A>(self, mut seq: A) -> Result<V, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let x: F = seq
                .next_element()?
                .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
            let y: F = seq
                .next_element()?
                .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
            let z: F = seq
                .next_element()?
                .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
            if seq.next_element::<F>()?.is_some() {
                return Err(de::Error::custom("Expected only 3 elements in Vec3 array"));
            }
            Ok(V::new(x, y, z))
        }
    }

    deserializer.deserialize_any(Vec3Visitor(PhantomData))
}

fn vec3_from_value(value: Value) -> Result<Vector3, String> {
    match value {
        Value::String(s) => parse_vec3_str(&s),
        Value::Array(arr) => {
            if arr.len() != 3 {
                return Err(format!("Expected 3 values, got {}", arr.len()));
            }
            let mut xyz = [0.0; 3];
            for (slot, v) in xyz.iter_mut().zip(arr) {
                *slot = float_from_value::<serde_json::Error>(v).map_err(|e| e.to_string())?;
            }
            Ok(Vector3::from_array(xyz))
        }
        t => Err(format!("Expected 'x y z' or [x, y, z], found {t}")),
    }
}

pub(crate) fn deser_vecvec3<'de, D>(deserializer: D) -> Result<Vec<Vector3>, D::Error>
where
    D: Deserializer<'de>,
{
    // Deserialize a vector of Vector3 given as
    //  - a single string of "X1 Y1 Z1 X2 Y2 Z2 ...",
    //  - an array of strings ["X1 Y1 Z1", "X2 Y2 Z2", ...],
    //  - an array of arrays [[X1, Y1, Z1], ...]
    let value: Value = Deserialize::deserialize(deserializer)?;
    match value {
        Value::String(s) => parse_string_vecvec3(&s).map_err(de::Error::custom),
        Value::Array(arr) => arr
            .into_iter()
            .map(|v| vec3_from_value(v).map_err(de::Error::custom))
            .collect(),
        t => Err(de::Error::custom(format!("Expected a list of Vec3, found {t}"))),
    }
}

pub(crate) fn deser_float_array<'de, D, const N: usize>(deserializer: D) -> Result<[Float; N], D::Error>
where
    D: Deserializer<'de>,
{
    // "a b c d" or [a, b, c, d]
    let value: Value = Deserialize::deserialize(deserializer)?;
    let v: Vec<Float> = match value {
        Value::String(s) => s
            .split_whitespace()
            .map(|x| x.parse::<Float>().map_err(de::Error::custom))
            .collect::<Result<_, D::Error>>()?,
        Value::Array(arr) => arr
            .into_iter()
            .map(float_from_value::<D::Error>)
            .collect::<Result<_, D::Error>>()?,
        t => return Err(de::Error::custom(format!("Expected {N} numbers, found {t}"))),
    };

    if v.len() != N {
        return Err(de::Error::custom(format!(
            "expected {} elements, got {}",
            N, v.len()
        )));
    }

    // Convert Vec<Float> to [Float; N] array
    v.try_into()
        .map_err(|_| de::Error::custom("failed to convert Vec to array"))
}

/// Helper function: parse a string like "25 25 25" into Vector3
pub(crate) fn parse_vec3_str<V, F>(s: &str) -> Result<V, String>
where
    F: FromStr,
    F::Err: fmt::Display,
    V: From3<F>,
{
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(format!("Expected 3 values, got {}", parts.len()));
    }
    let x = parts[0].parse::<F>().map_err(|e| e.to_string())?;
    let y = parts[1].parse::<F>().map_err(|e| e.to_string())?;
    let z = parts[2].parse::<F>().map_err(|e| e.to_string())?;
    Ok(V::new(x, y, z))
}

pub fn parse_string_vecvec3(s: &str) -> Result<Vec<Vector3>, String> {
    let nums: Vec<Float> = s
        .split_whitespace()
        .map(|x| x.parse::<Float>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;

    if nums.len() % 3 != 0 {
        return Err(format!("Input length not divisible by {}", 3));
    }

    Ok(nums
        .chunks_exact(3)
        .map(|chunk| Vector3::new(chunk[0], chunk[1], chunk[2]))
        .collect())
}
