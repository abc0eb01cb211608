//! Discriminator patching: lockstep repair of sampled values
//!
//! The sample generator is discriminator-unaware; whatever it put into a
//! discriminator field (or omitted) is overwritten here with the literal
//! tag of the variant the resolver actually chose. The walk visits
//! (value, shape) pairs in lockstep. Any structural mismatch, such as a
//! field dropped by depth or visibility limits or a scalar where the
//! shape expects an object, means "nothing to patch here".

use serde_json::Value;

use crate::domain::resolved::{ResolvedKind, ResolvedShape};

/// Overwrite discriminator fields throughout `value` with the tags
/// recorded on `shape`. In-place; never fails.
pub fn patch_discriminators(value: &mut Value, shape: &ResolvedShape) {
    if let Value::Object(map) = value {
        for discriminator in &shape.discriminators {
            map.insert(
                discriminator.field.clone(),
                Value::String(discriminator.tag.clone()),
            );
        }
    }

    match (&shape.kind, value) {
        (ResolvedKind::Object { fields }, Value::Object(map)) => {
            for field in fields {
                if let Some(child) = map.get_mut(&field.name) {
                    patch_discriminators(child, &field.shape);
                }
            }
        }
        (ResolvedKind::Array { item }, Value::Array(items)) => {
            for child in items {
                patch_discriminators(child, item);
            }
        }
        // Scalar shapes, or value/shape mismatch: nothing to patch.
        _ => {}
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolved::{Discriminator, ResolvedField, ResolvedKind, ResolvedShape};
    use crate::domain::shape::{ScalarKind, ScalarShape};
    use serde_json::json;

    fn scalar_string() -> ResolvedShape {
        ResolvedShape::new(ResolvedKind::Scalar(ScalarShape::of(ScalarKind::String)))
    }

    fn object(fields: Vec<(&str, ResolvedShape)>) -> ResolvedShape {
        ResolvedShape::new(ResolvedKind::Object {
            fields: fields
                .into_iter()
                .map(|(name, shape)| ResolvedField {
                    name: name.to_string(),
                    required: true,
                    read_only: false,
                    write_only: false,
                    shape,
                })
                .collect(),
        })
    }

    fn tagged(mut shape: ResolvedShape, field: &str, tag: &str) -> ResolvedShape {
        shape.discriminators.push(Discriminator {
            field: field.to_string(),
            tag: tag.to_string(),
        });
        shape
    }

    #[test]
    fn writes_tag_at_discriminated_position() {
        let shape = tagged(object(vec![("name", scalar_string())]), "petType", "Cat");
        let mut value = json!({ "name": "whiskers", "petType": "bogus" });

        patch_discriminators(&mut value, &shape);
        assert_eq!(value["petType"], "Cat");
        assert_eq!(value["name"], "whiskers");
    }

    #[test]
    fn writes_tag_even_when_field_was_omitted() {
        let shape = tagged(object(vec![("name", scalar_string())]), "petType", "Dog");
        let mut value = json!({ "name": "rex" });

        patch_discriminators(&mut value, &shape);
        assert_eq!(value["petType"], "Dog");
    }

    #[test]
    fn stacked_discriminators_all_written() {
        let shape = tagged(
            tagged(object(vec![]), "breed", "Siamese"),
            "petType",
            "Cat",
        );
        let mut value = json!({});

        patch_discriminators(&mut value, &shape);
        assert_eq!(value["petType"], "Cat");
        assert_eq!(value["breed"], "Siamese");
    }

    #[test]
    fn recurses_through_nested_objects_and_arrays() {
        let toy = tagged(object(vec![("label", scalar_string())]), "toyType", "Ball");
        let toys = ResolvedShape::new(ResolvedKind::Array {
            item: Box::new(toy),
        });
        let shape = object(vec![("toys", toys)]);
        let mut value = json!({ "toys": [ { "label": "red" }, { "label": "blue" } ] });

        patch_discriminators(&mut value, &shape);
        assert_eq!(value["toys"][0]["toyType"], "Ball");
        assert_eq!(value["toys"][1]["toyType"], "Ball");
    }

    #[test]
    fn mismatched_positions_are_skipped() {
        let inner = tagged(object(vec![]), "kind", "Inner");
        let shape = object(vec![("nested", inner)]);

        // Sampler dropped the nested object (depth limit); no tag is
        // forced into a scalar and nothing panics.
        let mut omitted = json!({});
        patch_discriminators(&mut omitted, &shape);
        assert_eq!(omitted, json!({}));

        let mut wrong_type = json!({ "nested": 3 });
        patch_discriminators(&mut wrong_type, &shape);
        assert_eq!(wrong_type["nested"], 3);
    }

    #[test]
    fn non_object_value_with_discriminator_is_left_alone() {
        let shape = tagged(scalar_string(), "petType", "Cat");
        let mut value = json!("just a string");
        patch_discriminators(&mut value, &shape);
        assert_eq!(value, json!("just a string"));
    }
}
