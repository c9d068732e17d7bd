//! Interaction events reported by the renderer.
//!
//! Events arrive either as JSON documents
//! (`{"event":"markerClicked","station_id":"47401"}`) or as short text
//! commands:
//!
//! ```text
//! click 47401
//! reset
//! case Case 2: 2025/02/13 - 2025/02/15
//! pan 35.2 139.1
//! zoom 8.5
//! view 35.2 139.1 8.5
//! ```

use crate::state::ViewportUpdate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wtv_core::LatLon;

/// One user interaction; each one is applied as a single tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Interaction {
    MarkerClicked { station_id: String },
    ViewportChanged(ViewportUpdate),
    ResetClicked,
    CaseWindowChanged { label: String },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("empty event line")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("invalid JSON event: {0}")]
    Json(#[from] serde_json::Error),
}

impl Interaction {
    /// Parse one line of input as a JSON event or a text command.
    pub fn parse_line(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        if line.starts_with('{') {
            return Ok(serde_json::from_str(line)?);
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match command {
            "click" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "click",
                        expected: "a station id",
                    });
                }
                Ok(Interaction::MarkerClicked {
                    station_id: rest.to_string(),
                })
            }
            "reset" => Ok(Interaction::ResetClicked),
            "case" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "case",
                        expected: "a case window label",
                    });
                }
                Ok(Interaction::CaseWindowChanged {
                    label: rest.to_string(),
                })
            }
            "pan" => match args.as_slice() {
                [lat, lon] => Ok(Interaction::ViewportChanged(ViewportUpdate {
                    center: Some(LatLon::new(number(lat)?, number(lon)?)),
                    zoom: None,
                })),
                _ => Err(ParseError::MissingArgument {
                    command: "pan",
                    expected: "<lat> <lon>",
                }),
            },
            "zoom" => match args.as_slice() {
                [zoom] => Ok(Interaction::ViewportChanged(ViewportUpdate {
                    center: None,
                    zoom: Some(number(zoom)?),
                })),
                _ => Err(ParseError::MissingArgument {
                    command: "zoom",
                    expected: "<zoom>",
                }),
            },
            "view" => match args.as_slice() {
                [lat, lon, zoom] => Ok(Interaction::ViewportChanged(ViewportUpdate {
                    center: Some(LatLon::new(number(lat)?, number(lon)?)),
                    zoom: Some(number(zoom)?),
                })),
                _ => Err(ParseError::MissingArgument {
                    command: "view",
                    expected: "<lat> <lon> <zoom>",
                }),
            },
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

fn number(s: &str) -> Result<f64, ParseError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber(s.to_string()))
}
