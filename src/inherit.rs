//! Attribute resolution along configure-preset inheritance chains.
//!
//! Resolution is per-attribute and lazy: nothing is merged ahead of time.
//! The search order is the preset's own cache variables, then its direct
//! structural fields (`binaryDir`, `generator`, pass-through extras), then
//! each inherited parent. A parent *list* is walked in reverse so the last
//! listed parent wins on conflicts.

use crate::model::{ConfigurePreset, Inherits};
use crate::registry::PresetRegistry;
use crate::ui;
use serde_json::Value;

/// Chains deeper than this are assumed cyclic and abandoned with a warning.
const MAX_INHERIT_DEPTH: usize = 32;

/// Resolve `attribute` for the configure preset called `preset_name`,
/// walking its inheritance chain. Returns `None` when no ancestor defines
/// the attribute (or when the name is not a configure preset).
pub fn resolve(registry: &PresetRegistry<'_>, preset_name: &str, attribute: &str) -> Option<Value> {
    resolve_at(registry, preset_name, attribute, 0)
}

/// Like [`resolve`], but coerced to a string. Booleans and numbers are
/// rendered the way CMake would read them back from the cache.
pub fn resolve_str(
    registry: &PresetRegistry<'_>,
    preset_name: &str,
    attribute: &str,
) -> Option<String> {
    match resolve(registry, preset_name, attribute)? {
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(if flag { "ON" } else { "OFF" }.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn resolve_at(
    registry: &PresetRegistry<'_>,
    preset_name: &str,
    attribute: &str,
    depth: usize,
) -> Option<Value> {
    if depth > MAX_INHERIT_DEPTH {
        ui::warn(format!(
            "inheritance chain at '{preset_name}' exceeds {MAX_INHERIT_DEPTH} levels, assuming a cycle"
        ));
        return None;
    }
    let preset = registry.get_configure(preset_name)?;
    if let Some(value) = preset.cache_variables.get(attribute) {
        return Some(value.clone());
    }
    if let Some(value) = structural_field(preset, attribute) {
        return Some(value);
    }
    match &preset.inherits {
        Some(Inherits::One(parent)) => resolve_at(registry, parent, attribute, depth + 1),
        Some(Inherits::Many(parents)) => {
            // Last listed parent wins.
            for parent in parents.iter().rev() {
                if let Some(value) = resolve_at(registry, parent, attribute, depth + 1) {
                    return Some(value);
                }
            }
            None
        }
        None => None,
    }
}

fn structural_field(preset: &ConfigurePreset, attribute: &str) -> Option<Value> {
    match attribute {
        "binaryDir" => preset.binary_dir.clone().map(Value::String),
        "generator" => preset.generator.clone().map(Value::String),
        _ => preset.extra.get(attribute).cloned(),
    }
}
