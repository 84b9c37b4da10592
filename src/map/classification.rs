use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::UnknownClassification;

/// Security/functional class an analyst assigns to an entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    #[default]
    Unknown,
    Readonly,
    Writable,
    Executable,
    Bootrun,
    Config,
    Library,
    Kernel,
    Vulnerable,
}

impl Classification {
    pub const ALL: [Self; 9] = [
        Self::Unknown,
        Self::Readonly,
        Self::Writable,
        Self::Executable,
        Self::Bootrun,
        Self::Config,
        Self::Library,
        Self::Kernel,
        Self::Vulnerable,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Readonly => "readonly",
            Self::Writable => "writable",
            Self::Executable => "executable",
            Self::Bootrun => "bootrun",
            Self::Config => "config",
            Self::Library => "library",
            Self::Kernel => "kernel",
            Self::Vulnerable => "vulnerable",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Readonly => "Read-Only",
            Self::Writable => "Writable",
            Self::Executable => "Executable",
            Self::Bootrun => "Runs on Boot",
            Self::Config => "Config",
            Self::Library => "Library",
            Self::Kernel => "Kernel",
            Self::Vulnerable => "Potential Vuln",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Unknown => "❓",
            Self::Readonly => "🔒",
            Self::Writable => "✏",
            Self::Executable => "⚡",
            Self::Bootrun => "🚀",
            Self::Config => "⚙",
            Self::Library => "📚",
            Self::Kernel => "🧠",
            Self::Vulnerable => "⚠",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Unknown => [0x6b, 0x72, 0x80],
            Self::Readonly => [0x3b, 0x82, 0xf6],
            Self::Writable => [0x22, 0xc5, 0x5e],
            Self::Executable => [0xf5, 0x9e, 0x0b],
            Self::Bootrun => [0xef, 0x44, 0x44],
            Self::Config => [0x8b, 0x5c, 0xf6],
            Self::Library => [0x06, 0xb6, 0xd4],
            Self::Kernel => [0xec, 0x48, 0x99],
            Self::Vulnerable => [0xdc, 0x26, 0x26],
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Classification {
    type Err = UnknownClassification;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.key() == value)
            .ok_or_else(|| UnknownClassification(value.to_owned()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassFilter {
    #[default]
    All,
    Only(Classification),
}

impl ClassFilter {
    pub fn matches(self, class: Classification) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == class,
        }
    }

    pub fn is_all(self) -> bool {
        self == Self::All
    }

    /// Legend behaviour: picking the class that is already active goes back to `All`.
    pub fn toggled(self, class: Classification) -> Self {
        if self == Self::Only(class) {
            Self::All
        } else {
            Self::Only(class)
        }
    }
}

impl fmt::Display for ClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(class) => f.write_str(class.key()),
        }
    }
}

impl FromStr for ClassFilter {
    type Err = UnknownClassification;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "all" {
            Ok(Self::All)
        } else {
            value.parse().map(Self::Only)
        }
    }
}
