//! Parameter Storage Types
//!
//! Named, typed tuning values for the mission controller. Values live in
//! memory only; start-up overrides are the only way to change them.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length (MAVLink param_id limit)
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 32;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Left out of listings
        const HIDDEN = 1 << 0;
        /// Rejects overrides
        const READ_ONLY = 1 << 1;
    }
}

/// Typed parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl ParamValue {
    /// Parse `text` into the same variant as `self`
    ///
    /// Integer parameters reject fractional text; float parameters accept
    /// integers. Booleans accept `0`/`1`/`true`/`false`.
    pub fn parse_like(&self, text: &str) -> Result<ParamValue, ParameterError> {
        let text = text.trim();
        let parsed = match self {
            ParamValue::Bool(_) => match text {
                "1" | "true" => Some(ParamValue::Bool(true)),
                "0" | "false" => Some(ParamValue::Bool(false)),
                _ => None,
            },
            ParamValue::Int(_) => text.parse::<i32>().ok().map(ParamValue::Int),
            ParamValue::Float(_) => text
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(ParamValue::Float),
        };
        parsed.ok_or(ParameterError::InvalidValue)
    }

    pub fn as_f32(&self) -> f32 {
        match *self {
            ParamValue::Bool(b) => f32::from(u8::from(b)),
            ParamValue::Int(v) => v as f32,
            ParamValue::Float(v) => v,
        }
    }

    /// Integer view; floats are truncated
    pub fn as_i32(&self) -> i32 {
        match *self {
            ParamValue::Bool(b) => i32::from(b),
            ParamValue::Int(v) => v,
            ParamValue::Float(v) => v as i32,
        }
    }
}

impl core::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A registered parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamEntry {
    pub value: ParamValue,
    pub default: ParamValue,
    pub flags: ParamFlags,
}

impl ParamEntry {
    /// Value differs from the registered default
    pub fn is_overridden(&self) -> bool {
        self.value != self.default
    }
}

type ParamName = String<PARAM_NAME_LEN>;

fn param_name(name: &str) -> Result<ParamName, ParameterError> {
    ParamName::try_from(name).map_err(|_| ParameterError::InvalidConfig)
}

/// Registry of named parameters
///
/// A parameter must be registered with its default before it can be set,
/// and setting keeps the registered type.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    entries: FnvIndexMap<ParamName, ParamEntry, MAX_PARAMS>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, name: &str) -> Option<&ParamEntry> {
        self.entries.get(&param_name(name).ok()?)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entry(name).map(|entry| &entry.value)
    }

    /// Overwrite a registered, writable parameter
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = param_name(name)?;
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or(ParameterError::InvalidConfig)?;
        if entry.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }
        entry.value = value;
        Ok(())
    }

    /// Set a parameter from text, parsed as the registered type
    pub fn set_from_str(&mut self, name: &str, text: &str) -> Result<(), ParameterError> {
        let current = *self.get(name).ok_or(ParameterError::InvalidConfig)?;
        let value = current.parse_like(text)?;
        self.set(name, value)
    }

    /// Register a parameter with its default
    ///
    /// Registering an existing name leaves it untouched.
    pub fn register(
        &mut self,
        name: &str,
        default: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = param_name(name)?;
        if self.entries.contains_key(&key) {
            return Ok(());
        }
        self.entries
            .insert(
                key,
                ParamEntry {
                    value: default,
                    default,
                    flags,
                },
            )
            .map(|_| ())
            .map_err(|_| ParameterError::StoreFull)
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.entry(name)
            .is_some_and(|entry| entry.flags.contains(ParamFlags::HIDDEN))
    }

    /// Visible parameters in registration order
    pub fn iter_visible(&self) -> impl Iterator<Item = (&str, &ParamEntry)> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.flags.contains(ParamFlags::HIDDEN))
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of visible parameters
    pub fn count(&self) -> usize {
        self.iter_visible().count()
    }

    /// Number of parameters, hidden included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
