//! Communication with the vehicle

pub mod mavlink;
