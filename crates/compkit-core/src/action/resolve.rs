//! Preset selection
//!
//! A preset matches the bound arguments when every positional and named
//! argument lands on a distinct declared parameter, every bound value passes
//! [`Parameter::is_valid`], and every required parameter is bound. Unbound
//! optional parameters are filled left to right from their default
//! functions, which see the values already resolved before them.
//!
//! Among matching presets the one with the fewest assignable-only
//! arguments wins, then the one with the fewest defaulted parameters, then
//! the first declared.

use compkit_types::Value;
use rustc_hash::FxHashMap;

use super::{Parameter, Preset};

/// Arguments accumulated by an action context
#[derive(Debug, Clone, Default)]
pub(crate) struct Bindings {
    positional: Vec<Option<Value>>,
    named: FxHashMap<String, Value>,
}

impl Bindings {
    pub(crate) fn bind_index(&mut self, index: usize, value: Value) {
        if index >= self.positional.len() {
            self.positional.resize(index + 1, None);
        }
        self.positional[index] = Some(value);
    }

    pub(crate) fn bind_name(&mut self, name: &str, value: Value) {
        self.named.insert(name.to_string(), value);
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.positional.push(Some(value));
    }
}

/// Selected preset and its complete argument list
#[derive(Debug)]
pub(crate) struct Resolution {
    pub(crate) preset: usize,
    pub(crate) args: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Score {
    inexact: usize,
    defaulted: usize,
}

/// Pick the best matching preset, or explain why the last candidate failed
pub(crate) fn select(presets: &[Preset], bindings: &Bindings) -> Result<Resolution, String> {
    let mut best: Option<(Score, Resolution)> = None;
    let mut reason = String::from("action declares no presets");

    for (index, preset) in presets.iter().enumerate() {
        match bind(preset.parameters(), bindings) {
            Ok((score, args)) => {
                if best.as_ref().map_or(true, |(current, _)| score < *current) {
                    best = Some((score, Resolution { preset: index, args }));
                }
            }
            Err(why) => reason = format!("preset #{index}: {why}"),
        }
    }

    best.map(|(_, resolution)| resolution).ok_or(reason)
}

fn bind(params: &[Parameter], bindings: &Bindings) -> Result<(Score, Vec<Value>), String> {
    if bindings.positional.len() > params.len() {
        return Err(format!(
            "expected at most {} arguments, got {}",
            params.len(),
            bindings.positional.len()
        ));
    }

    let mut slots: Vec<Option<&Value>> = vec![None; params.len()];
    for (slot, value) in slots.iter_mut().zip(&bindings.positional) {
        *slot = value.as_ref();
    }

    for (name, value) in &bindings.named {
        let index = params
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| format!("unknown parameter '{name}'"))?;
        if slots[index].is_some() {
            return Err(format!(
                "parameter '{name}' bound both by position and by name"
            ));
        }
        slots[index] = Some(value);
    }

    let mut score = Score {
        inexact: 0,
        defaulted: 0,
    };
    let mut args = Vec::with_capacity(params.len());
    for (param, slot) in params.iter().zip(slots) {
        match slot {
            Some(value) => {
                if !param.is_valid(value) {
                    return Err(format!(
                        "invalid value {value} for parameter '{}' ({})",
                        param.name(),
                        param.type_tag()
                    ));
                }
                if value.type_tag() != *param.type_tag() {
                    score.inexact += 1;
                }
                args.push(value.clone());
            }
            None if param.is_required() => {
                return Err(format!("missing required parameter '{}'", param.name()));
            }
            None => {
                let value = param.default_value(&args);
                score.defaulted += 1;
                args.push(value);
            }
        }
    }

    Ok((score, args))
}
