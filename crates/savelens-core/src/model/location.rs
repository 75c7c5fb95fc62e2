//! Provenance of a candidate value.
//!
//! A [`Location`] is rendered as a human-readable string and parsed back
//! losslessly, so a candidate can be handed to the host application and
//! later returned for rewriting without re-running analysis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum XmlNode {
    /// `name="value"` attribute
    Attribute,
    /// `<tag>value</tag>` element text
    Element,
    /// Shared-preferences entry (`<int name="gold" value="10"/>`)
    Preference,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Location {
    /// Dotted JSON path with `[i]` array suffixes
    Json { path: String },
    /// 1-based line of a text file, with the enclosing `[section]` if any
    Line {
        line: usize,
        section: Option<String>,
    },
    /// Byte offset of a decoded binary number
    Offset { offset: usize },
    /// Byte offset of a value inside printable text embedded in a binary
    Embedded { offset: usize },
    /// Byte position of the value text inside an XML document
    Xml { node: XmlNode, position: usize },
    /// Synthetic statistical finding; not tied to a single value
    Pattern { name: String },
}

impl Location {
    pub fn json(path: impl Into<String>) -> Self {
        Self::Json { path: path.into() }
    }

    pub fn line(line: usize, section: Option<&str>) -> Self {
        Self::Line {
            line,
            section: section.map(str::to_string),
        }
    }

    /// Byte offset for binary provenance
    pub fn byte_offset(&self) -> Option<usize> {
        match self {
            Self::Offset { offset } | Self::Embedded { offset } => Some(*offset),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { path } => write!(f, "JSON {}", path),
            Self::Line {
                line,
                section: Some(section),
            } => write!(f, "Line {} [{}]", line, section),
            Self::Line {
                line,
                section: None,
            } => write!(f, "Line {}", line),
            Self::Offset { offset } => write!(f, "Offset {}", offset),
            Self::Embedded { offset } => write!(f, "Offset {} (embedded)", offset),
            Self::Xml { node, position } => write!(f, "XML {} at {}", node, position),
            Self::Pattern { name } => write!(f, "Pattern {}", name),
        }
    }
}

fn parse_number(s: &str, original: &str) -> Result<usize> {
    s.trim()
        .parse()
        .map_err(|_| Error::InvalidLocation(original.to_string()))
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidLocation(s.to_string());

        if let Some(path) = s.strip_prefix("JSON ") {
            return Ok(Self::json(path));
        }
        if let Some(name) = s.strip_prefix("Pattern ") {
            return Ok(Self::Pattern {
                name: name.to_string(),
            });
        }
        if let Some(rest) = s.strip_prefix("Offset ") {
            return match rest.strip_suffix(" (embedded)") {
                Some(offset) => Ok(Self::Embedded {
                    offset: parse_number(offset, s)?,
                }),
                None => Ok(Self::Offset {
                    offset: parse_number(rest, s)?,
                }),
            };
        }
        if let Some(rest) = s.strip_prefix("Line ") {
            return match rest.split_once(' ') {
                Some((line, section)) => {
                    let section = section
                        .strip_prefix('[')
                        .and_then(|v| v.strip_suffix(']'))
                        .ok_or_else(invalid)?;
                    Ok(Self::Line {
                        line: parse_number(line, s)?,
                        section: Some(section.to_string()),
                    })
                }
                None => Ok(Self::Line {
                    line: parse_number(rest, s)?,
                    section: None,
                }),
            };
        }
        if let Some(rest) = s.strip_prefix("XML ") {
            let (node, position) = rest.split_once(" at ").ok_or_else(invalid)?;
            let node = XmlNode::from_str(node).map_err(|_| invalid())?;
            return Ok(Self::Xml {
                node,
                position: parse_number(position, s)?,
            });
        }

        Err(invalid())
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.to_string()
    }
}

impl TryFrom<String> for Location {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
