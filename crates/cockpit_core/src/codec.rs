use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::field::{ANDROID_PORT_NAME, CLIENT_IP_PREFIX, DCS_PORT_NAME, Field};

/// A value to be written into the primary script. The variant fixes the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    ClientIps(Vec<String>),
    PrimaryPort(u16),
    SecondaryPort(u16),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            Self::ClientIps(_) => Field::ClientIps,
            Self::PrimaryPort(_) => Field::PrimaryPort,
            Self::SecondaryPort(_) => Field::SecondaryPort,
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::ClientIps(ips) => encode_ip_list(ips),
            Self::PrimaryPort(port) => encode_port(DCS_PORT_NAME, *port),
            Self::SecondaryPort(port) => encode_port(ANDROID_PORT_NAME, *port),
        }
    }
}

/// A value as decoded from a matched line. Ports stay as raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldReading {
    ClientIps(Vec<String>),
    Port(String),
}

impl FieldReading {
    pub fn as_ips(&self) -> Option<&[String]> {
        match self {
            Self::ClientIps(ips) => Some(ips),
            Self::Port(_) => None,
        }
    }

    pub fn as_port(&self) -> Option<&str> {
        match self {
            Self::Port(raw) => Some(raw),
            Self::ClientIps(_) => None,
        }
    }
}

/// Decodes `line` with the codec belonging to `field`.
pub fn decode(field: Field, line: &str) -> Result<FieldReading, CoreError> {
    match field {
        Field::ClientIps => decode_ip_list(line).map(FieldReading::ClientIps),
        Field::PrimaryPort | Field::SecondaryPort => decode_port(line).map(FieldReading::Port),
    }
}

pub fn encode_ip_list<S: AsRef<str>>(ips: &[S]) -> String {
    let quoted: Vec<String> = ips.iter().map(|ip| format!("\"{}\"", ip.as_ref())).collect();
    format!("{CLIENT_IP_PREFIX}{{{}}}", quoted.join(","))
}

pub fn decode_ip_list(line: &str) -> Result<Vec<String>, CoreError> {
    let rhs = right_hand_side(line)?;
    let cleaned: String = rhs
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '"' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Ok(Vec::new());
    }
    Ok(cleaned.split(',').map(str::to_string).collect())
}

pub fn encode_port(name: &str, port: u16) -> String {
    format!("local {name} = {port}")
}

pub fn decode_port(line: &str) -> Result<String, CoreError> {
    let rhs = right_hand_side(line)?;
    Ok(rhs.chars().filter(|c| *c != ' ').collect())
}

fn right_hand_side(line: &str) -> Result<&str, CoreError> {
    line.split_once('=').map(|(_, rhs)| rhs).ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::Format,
            format!("line has no '=' separator: {line:?}"),
        )
    })
}

/// Strict dotted-quad check: four decimal octets 0-255, no leading zeros.
pub fn is_dotted_quad(candidate: &str) -> bool {
    let octets: Vec<&str> = candidate.split('.').collect();
    octets.len() == 4 && octets.iter().all(|octet| is_octet(octet))
}

fn is_octet(octet: &str) -> bool {
    if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if octet.len() > 1 && octet.starts_with('0') {
        return false;
    }
    octet.parse::<u16>().is_ok_and(|v| v <= 255)
}

/// Parses a user-supplied port, accepting only values strictly between 0 and 65535.
pub fn parse_port(field: Field, raw: &str) -> Result<u16, CoreError> {
    let invalid = || {
        CoreError::new(
            CoreErrorCode::Validation,
            format!("{field}: '{raw}' is not a port between 1 and 65534"),
        )
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match raw.parse::<u32>() {
        Ok(value) if value > 0 && value < 65535 => Ok(value as u16),
        _ => Err(invalid()),
    }
}
