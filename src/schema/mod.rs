//! JSON Schema ingestion
//!
//! Loads a JSON-Schema-subset document into a [`ShapeArena`] so the
//! engine can be driven from a source document without a separate parsing
//! pipeline. Supported: `type` with object/array/scalar forms,
//! `properties`/`required`/`readOnly`/`writeOnly`, `items`,
//! `enum`/`const`, `format`/`minimum`/`maximum`, `oneOf` with an optional
//! OpenAPI-style `discriminator.propertyName`, and `$ref` into
//! `#/definitions/*` or `#/$defs/*`. Cyclic refs degrade to a plain
//! string node rather than recursing forever.
//!
//! This loader is a convenience seam; anything that produces a
//! [`ShapeArena`] can feed the engine.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::domain::shape::{
    FieldDef, ScalarKind, ScalarShape, ShapeArena, ShapeBuilder, ShapeId,
};
use crate::error::{EngineError, EngineResult};

/// Load `document` into a shape graph, returning the arena and the root
/// node id.
pub fn load_shape_graph(document: &Value) -> EngineResult<(ShapeArena, ShapeId)> {
    if !document.is_object() {
        return Err(EngineError::Schema(
            "schema document must be a JSON object".to_string(),
        ));
    }

    let mut loader = SchemaLoader::from_document(document);
    let mut builder = ShapeArena::builder();
    let root = loader.load(document, &mut builder)?;
    Ok((builder.finish(), root))
}

/// Loading context carrying the document's definitions and the set of
/// refs currently being expanded (cycle guard).
struct SchemaLoader {
    definitions: HashMap<String, Value>,
    visiting_refs: HashSet<String>,
}

impl SchemaLoader {
    fn from_document(document: &Value) -> Self {
        let mut definitions = HashMap::new();
        if let Some(defs) = document
            .get("definitions")
            .or_else(|| document.get("$defs"))
            .and_then(|defs| defs.as_object())
        {
            for (name, schema) in defs {
                definitions.insert(name.clone(), schema.clone());
            }
        }
        Self {
            definitions,
            visiting_refs: HashSet::new(),
        }
    }

    fn load(&mut self, schema: &Value, builder: &mut ShapeBuilder) -> EngineResult<ShapeId> {
        if let Some(reference) = schema.get("$ref").and_then(|r| r.as_str()) {
            return self.load_ref(reference, builder);
        }

        if let Some(one_of) = schema.get("oneOf").and_then(|v| v.as_array()) {
            return self.load_one_of(schema, one_of, builder);
        }

        if let Some(const_value) = schema.get("const") {
            return Ok(builder.scalar(ScalarShape {
                const_value: Some(const_value.clone()),
                ..scalar_common(schema, ScalarKind::String)
            }));
        }

        let type_name = schema.get("type").and_then(|t| t.as_str()).unwrap_or("object");
        match type_name {
            "object" => self.load_object(schema, builder),
            "array" => {
                let item = match schema.get("items") {
                    Some(items) => self.load(items, builder)?,
                    None => builder.string(),
                };
                Ok(builder.array(item))
            }
            "null" => Ok(builder.scalar(scalar_common(schema, ScalarKind::Null))),
            "boolean" => Ok(builder.scalar(scalar_common(schema, ScalarKind::Boolean))),
            "integer" => Ok(builder.scalar(scalar_common(schema, ScalarKind::Integer))),
            "number" => Ok(builder.scalar(scalar_common(schema, ScalarKind::Number))),
            // Unknown types degrade to string, as the source pipeline does
            // for vendor extensions.
            _ => Ok(builder.scalar(scalar_common(schema, ScalarKind::String))),
        }
    }

    fn load_ref(&mut self, reference: &str, builder: &mut ShapeBuilder) -> EngineResult<ShapeId> {
        let name = reference
            .strip_prefix("#/definitions/")
            .or_else(|| reference.strip_prefix("#/$defs/"))
            .ok_or_else(|| EngineError::Schema(format!("unsupported $ref: {reference}")))?;

        if !self.visiting_refs.insert(reference.to_string()) {
            // Circular reference; substitute a leaf.
            return Ok(builder.string());
        }
        let result = match self.definitions.get(name).cloned() {
            Some(schema) => self.load(&schema, builder),
            None => Err(EngineError::Schema(format!("definition not found: {name}"))),
        };
        self.visiting_refs.remove(reference);
        result
    }

    fn load_object(&mut self, schema: &Value, builder: &mut ShapeBuilder) -> EngineResult<ShapeId> {
        let required: HashSet<&str> = schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
            .unwrap_or_default();

        let mut fields = Vec::new();
        if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
            for (name, property) in properties {
                let shape = self.load(property, builder)?;
                let mut field = FieldDef::new(name, shape);
                if required.contains(name.as_str()) {
                    field = field.required();
                }
                if property.get("readOnly").and_then(|v| v.as_bool()).unwrap_or(false) {
                    field = field.read_only();
                }
                if property.get("writeOnly").and_then(|v| v.as_bool()).unwrap_or(false) {
                    field = field.write_only();
                }
                fields.push(field);
            }
        }
        Ok(builder.object(fields))
    }

    fn load_one_of(
        &mut self,
        schema: &Value,
        one_of: &[Value],
        builder: &mut ShapeBuilder,
    ) -> EngineResult<ShapeId> {
        let discriminator_field = schema
            .get("discriminator")
            .and_then(|d| d.get("propertyName"))
            .and_then(|p| p.as_str())
            .map(str::to_string);

        let mut variants = Vec::new();
        for (index, variant_schema) in one_of.iter().enumerate() {
            let tag = variant_tag(variant_schema, discriminator_field.as_deref(), index, self);
            let shape = self.load(variant_schema, builder)?;
            variants.push((tag, shape));
        }

        let variant_refs: Vec<(&str, ShapeId)> = variants
            .iter()
            .map(|(tag, shape)| (tag.as_str(), *shape))
            .collect();
        Ok(builder.one_of(discriminator_field.as_deref(), variant_refs))
    }
}

/// Tag for one variant: `title`, else the const/single-enum value of its
/// discriminator property, else a positional fallback.
fn variant_tag(
    schema: &Value,
    discriminator_field: Option<&str>,
    index: usize,
    loader: &SchemaLoader,
) -> String {
    // Chase a direct $ref so the referenced definition's title counts.
    let schema = match schema.get("$ref").and_then(|r| r.as_str()) {
        Some(reference) => reference
            .strip_prefix("#/definitions/")
            .or_else(|| reference.strip_prefix("#/$defs/"))
            .and_then(|name| loader.definitions.get(name))
            .unwrap_or(schema),
        None => schema,
    };

    if let Some(title) = schema.get("title").and_then(|t| t.as_str()) {
        return title.to_string();
    }
    if let Some(field) = discriminator_field {
        if let Some(property) = schema
            .get("properties")
            .and_then(|p| p.get(field))
        {
            if let Some(tag) = property.get("const").and_then(|c| c.as_str()) {
                return tag.to_string();
            }
            if let Some([only]) = property
                .get("enum")
                .and_then(|e| e.as_array())
                .map(|values| values.as_slice())
            {
                if let Some(tag) = only.as_str() {
                    return tag.to_string();
                }
            }
        }
    }
    format!("Option {}", index + 1)
}

fn scalar_common(schema: &Value, kind: ScalarKind) -> ScalarShape {
    ScalarShape {
        kind,
        format: schema
            .get("format")
            .and_then(|f| f.as_str())
            .map(str::to_string),
        enum_values: schema
            .get("enum")
            .and_then(|e| e.as_array())
            .map(|values| {
                values
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        const_value: schema.get("const").cloned(),
        minimum: schema.get("minimum").and_then(|m| m.as_f64()),
        maximum: schema.get("maximum").and_then(|m| m.as_f64()),
    }
}

// ============================================================================
// Tests
// ============================================================================
