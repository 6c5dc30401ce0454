//! Parameter store errors

/// Why a parameter operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Unknown name, or a name longer than [`super::PARAM_NAME_LEN`]
    InvalidConfig,
    /// No room for another registration
    StoreFull,
    ReadOnly,
    /// Text does not parse as the registered type
    InvalidValue,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            ParameterError::InvalidConfig => "unknown or malformed parameter name",
            ParameterError::StoreFull => "parameter store full",
            ParameterError::ReadOnly => "parameter is read-only",
            ParameterError::InvalidValue => "value does not match the parameter type",
        };
        f.write_str(text)
    }
}
