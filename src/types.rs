use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a data transform hands its input to the external process.
///
/// - `Stdin`: the input file's contents are written to the process' stdin
///   (default).
/// - `Path`: nothing is piped; the process receives the input path through the
///   `{input}` token and the `SITEPIPE_DATA_INPUT` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Stdin,
    Path,
}

impl Default for InputMode {
    fn default() -> Self {
        InputMode::Stdin
    }
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Stdin => "stdin",
            InputMode::Path => "path",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdin" => Ok(InputMode::Stdin),
            "path" | "file" | "argument" => Ok(InputMode::Path),
            other => Err(format!(
                "invalid inputMode: {other} (expected \"stdin\" or \"path\")"
            )),
        }
    }
}

/// Where the transformed content comes from once the process exits.
///
/// - `Stdout`: captured stdout is written to the output file (default).
/// - `Passthrough`: the process writes the output file itself; the engine
///   only inspects it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Stdout,
    Passthrough,
}

impl Default for WriteMode {
    fn default() -> Self {
        WriteMode::Stdout
    }
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Stdout => "stdout",
            WriteMode::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdout" => Ok(WriteMode::Stdout),
            "passthrough" | "file" => Ok(WriteMode::Passthrough),
            other => Err(format!(
                "invalid writeMode: {other} (expected \"stdout\" or \"passthrough\")"
            )),
        }
    }
}
