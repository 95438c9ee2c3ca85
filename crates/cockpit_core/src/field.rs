use std::fmt;

use serde::{Deserialize, Serialize};

pub const CLIENT_IP_PREFIX: &str = "local clientIP=";
pub const DCS_PORT_NAME: &str = "DCS_PORT";
pub const ANDROID_PORT_NAME: &str = "ANDROID_PORT";
pub const DEFAULT_MARKER_PREFIX: &str = "local Cockpitpp";
pub const DEFAULT_MARKER_LINE: &str =
    "local Cockpitpp=require('lfs');dofile(Cockpitpp.writedir()..'Scripts/Cockpit++.lua')";

/// One configurable value embedded as a single line of the primary script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    ClientIps,
    PrimaryPort,
    SecondaryPort,
}

impl Field {
    /// Patch and report order.
    pub const ALL: [Field; 3] = [Field::ClientIps, Field::PrimaryPort, Field::SecondaryPort];

    /// Literal text a line must start with to carry this field.
    pub fn prefix(&self) -> &'static str {
        match *self {
            Self::ClientIps => CLIENT_IP_PREFIX,
            Self::PrimaryPort => "local DCS_PORT =",
            Self::SecondaryPort => "local ANDROID_PORT =",
        }
    }

    /// Lua variable name declared on the field's line.
    pub fn variable_name(&self) -> &'static str {
        match *self {
            Self::ClientIps => "clientIP",
            Self::PrimaryPort => DCS_PORT_NAME,
            Self::SecondaryPort => ANDROID_PORT_NAME,
        }
    }

    pub fn key(&self) -> &'static str {
        match *self {
            Self::ClientIps => "client_ips",
            Self::PrimaryPort => "dcs_port",
            Self::SecondaryPort => "android_port",
        }
    }
}

/// The line whose presence marks a companion script as hooked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Marker {
    /// Compared against each trimmed line.
    pub prefix: String,
    /// Appended verbatim when the marker is missing.
    pub line: String,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_MARKER_PREFIX.to_string(),
            line: DEFAULT_MARKER_LINE.to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variable_name())
    }
}
