//! Merge helpers for partial updates.
//!
//! Partial values are carried as JSON so one patch type works for every
//! model. Policy shared by both helpers:
//!
//! - a field missing from the patch leaves the target alone
//! - an explicit `null` field is assigned, so `Option` fields can be cleared
//! - arrays and scalars in the patch replace the target wholesale
//! - a patch that is `null` as a whole is a no-op
//!
//! [`deep_merge`] additionally recurses into nested objects; [`assign`]
//! replaces top-level fields only. [`to_patch`] drops `null` fields, so a
//! typed partial's `None` means "leave alone".

use crate::errors::SliceError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Recursively merge `patch` into `target`.
pub fn deep_merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (_, Value::Null) => {}
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                let nested = value.is_object() && target.get(&key).is_some_and(Value::is_object);
                if nested {
                    if let Some(existing) = target.get_mut(&key) {
                        deep_merge(existing, value);
                    }
                } else {
                    target.insert(key, value);
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

/// Assign the top-level fields of `patch` onto `target`.
pub fn assign(target: &mut Value, patch: Value) {
    match (target, patch) {
        (_, Value::Null) => {}
        (Value::Object(target), Value::Object(patch)) => {
            target.extend(patch);
        }
        (target, patch) => *target = patch,
    }
}

/// Deep-merge a JSON patch into a typed value, returning the merged copy.
pub fn merge_into<T>(current: &T, patch: Value) -> Result<T, SliceError>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(current)?;
    deep_merge(&mut value, patch);
    Ok(serde_json::from_value(value)?)
}

/// Shallow-assign a JSON patch onto a typed value, returning the result.
pub fn assign_into<T>(current: &T, patch: Value) -> Result<T, SliceError>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(current)?;
    assign(&mut value, patch);
    Ok(serde_json::from_value(value)?)
}

/// Serialize a typed partial (usually a struct of `Option` fields) as a patch.
///
/// `null` object fields are dropped at every depth. To clear a field, send
/// an explicit `null` through a raw JSON patch instead.
pub fn to_patch<P: Serialize + ?Sized>(partial: &P) -> Result<Value, SliceError> {
    let mut patch = serde_json::to_value(partial)?;
    strip_nulls(&mut patch);
    Ok(patch)
}

fn strip_nulls(value: &mut Value) {
    if let Value::Object(fields) = value {
        fields.retain(|_, field| !field.is_null());
        fields.values_mut().for_each(strip_nulls);
    }
}
