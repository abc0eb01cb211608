//! Default sampler backed by the `fake` crate
//!
//! Produces plausible scalars from format hints and draws numbers from
//! the declared ranges. Values are not deterministic between runs; only
//! structure and discriminator fields are, and the latter are the
//! engine's job, not ours.

use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::Rng;
use serde_json::{json, Map, Value};

use crate::domain::media::GenerationOptions;
use crate::domain::resolved::{ResolvedField, ResolvedKind, ResolvedShape};
use crate::domain::shape::{ScalarKind, ScalarShape};

use super::{SampleError, SampleGenerator};

/// Faker-backed [`SampleGenerator`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FakerSampler;

impl SampleGenerator for FakerSampler {
    fn sample(
        &self,
        shape: &ResolvedShape,
        options: &GenerationOptions,
    ) -> Result<Value, SampleError> {
        Ok(sample_at(shape, options, 0))
    }
}

fn sample_at(shape: &ResolvedShape, options: &GenerationOptions, depth: usize) -> Value {
    match &shape.kind {
        ResolvedKind::Scalar(scalar) => sample_scalar(scalar),
        ResolvedKind::Object { fields } => {
            if depth > options.max_depth {
                // Depth placeholder; the patcher may still tag it.
                return Value::Object(Map::new());
            }
            let mut map = Map::new();
            for field in fields {
                if skip_field(field, options) {
                    continue;
                }
                map.insert(field.name.clone(), sample_at(&field.shape, options, depth + 1));
            }
            Value::Object(map)
        }
        ResolvedKind::Array { item } => {
            if depth > options.max_depth {
                return Value::Array(Vec::new());
            }
            let count = rand::thread_rng().gen_range(1..=2);
            let items: Vec<Value> = (0..count)
                .map(|_| sample_at(item, options, depth + 1))
                .collect();
            Value::Array(items)
        }
    }
}

fn skip_field(field: &ResolvedField, options: &GenerationOptions) -> bool {
    (field.read_only && options.skip_read_only)
        || (field.write_only && options.skip_write_only)
        || (!field.required && options.skip_non_required)
}

fn sample_scalar(scalar: &ScalarShape) -> Value {
    if let Some(value) = &scalar.const_value {
        return value.clone();
    }
    if !scalar.enum_values.is_empty() {
        let index = rand::thread_rng().gen_range(0..scalar.enum_values.len());
        return json!(scalar.enum_values[index]);
    }
    match scalar.kind {
        ScalarKind::Null => Value::Null,
        ScalarKind::Boolean => json!(rand::thread_rng().gen_bool(0.5)),
        ScalarKind::Integer => {
            let min = scalar.minimum.unwrap_or(0.0) as i64;
            let max = (scalar.maximum.unwrap_or(100.0) as i64).max(min);
            json!(rand::thread_rng().gen_range(min..=max))
        }
        ScalarKind::Number => {
            let min = scalar.minimum.unwrap_or(0.0);
            let max = scalar.maximum.unwrap_or(100.0).max(min);
            json!(rand::thread_rng().gen_range(min..=max))
        }
        ScalarKind::String => sample_string(scalar.format.as_deref()),
    }
}

fn sample_string(format: Option<&str>) -> Value {
    match format {
        Some("email") => json!(SafeEmail().fake::<String>()),
        Some("uuid") => json!(uuid::Uuid::new_v4().to_string()),
        Some("date-time") => json!(chrono::Utc::now().to_rfc3339()),
        Some("date") => json!(chrono::Utc::now().date_naive().to_string()),
        Some("uri" | "url") => {
            json!(format!("https://example.com/{}", Word().fake::<String>()))
        }
        Some("hostname") => json!("example.com"),
        Some("name") => json!(Name().fake::<String>()),
        Some("username") => json!(Username().fake::<String>()),
        Some("phone") => json!(PhoneNumber().fake::<String>()),
        Some("sentence") => json!(Sentence(1..8).fake::<String>()),
        _ => json!(Word().fake::<String>()),
    }
}

// ============================================================================
// Tests
// ============================================================================
