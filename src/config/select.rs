//! Selector options that accept several TOML shapes.
//!
//! ```toml
//! targets = "*"                          # or ["app.js", "vendor.js"]
//! folders_to_fingerprint = false         # or "/img", or ["/img", "/svg"]
//! assets_to_fingerprint = false          # or ["/img/troll.png"]
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// targets
// ============================================================================

/// Which generated files are fingerprinted, by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TargetsRepr", into = "TargetsRepr")]
pub enum Targets {
    /// Every generated file (`"*"`).
    #[default]
    All,
    /// Only files whose base name (with extension) is listed.
    Only(Vec<String>),
}

impl Targets {
    /// Check whether a file name (e.g. `app.js`) qualifies.
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|name| name == file_name),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TargetsRepr {
    Pattern(String),
    List(Vec<String>),
}

impl TryFrom<TargetsRepr> for Targets {
    type Error = String;

    fn try_from(repr: TargetsRepr) -> Result<Self, Self::Error> {
        match repr {
            TargetsRepr::Pattern(s) if s == "*" => Ok(Self::All),
            TargetsRepr::Pattern(s) => Err(format!(
                "invalid targets `{s}`: expected \"*\" or a list of file names"
            )),
            TargetsRepr::List(names) => Ok(Self::Only(names)),
        }
    }
}

impl From<Targets> for TargetsRepr {
    fn from(targets: Targets) -> Self {
        match targets {
            Targets::All => Self::Pattern("*".into()),
            Targets::Only(names) => Self::List(names),
        }
    }
}

// ============================================================================
// folders_to_fingerprint
// ============================================================================

/// Public-root directories whose files are all fingerprinted after a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FoldersRepr", into = "FoldersRepr")]
pub enum FolderSelection {
    /// Disabled (`false`).
    #[default]
    None,
    /// A single directory (`"/img"`).
    One(String),
    /// Several directories (`["/img", "/svg"]`).
    Many(Vec<String>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FoldersRepr {
    Flag(bool),
    One(String),
    Many(Vec<String>),
}

impl TryFrom<FoldersRepr> for FolderSelection {
    type Error = String;

    fn try_from(repr: FoldersRepr) -> Result<Self, Self::Error> {
        match repr {
            FoldersRepr::Flag(false) => Ok(Self::None),
            FoldersRepr::Flag(true) => Err(
                "folders_to_fingerprint = true is not meaningful: use false, a directory, or a list of directories"
                    .into(),
            ),
            FoldersRepr::One(dir) => Ok(Self::One(dir)),
            FoldersRepr::Many(dirs) => Ok(Self::Many(dirs)),
        }
    }
}

impl From<FolderSelection> for FoldersRepr {
    fn from(selection: FolderSelection) -> Self {
        match selection {
            FolderSelection::None => Self::Flag(false),
            FolderSelection::One(dir) => Self::One(dir),
            FolderSelection::Many(dirs) => Self::Many(dirs),
        }
    }
}

// ============================================================================
// assets_to_fingerprint
// ============================================================================

/// Explicit public-root-relative files fingerprinted after a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AssetsRepr", into = "AssetsRepr")]
pub enum AssetSelection {
    /// Disabled (`false`).
    #[default]
    None,
    /// Listed files (`["/img/troll.png"]`).
    Paths(Vec<String>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AssetsRepr {
    Flag(bool),
    Paths(Vec<String>),
}

impl TryFrom<AssetsRepr> for AssetSelection {
    type Error = String;

    fn try_from(repr: AssetsRepr) -> Result<Self, Self::Error> {
        match repr {
            AssetsRepr::Flag(false) => Ok(Self::None),
            AssetsRepr::Flag(true) => Err(
                "assets_to_fingerprint = true is not meaningful: use false or a list of paths"
                    .into(),
            ),
            AssetsRepr::Paths(paths) => Ok(Self::Paths(paths)),
        }
    }
}

impl From<AssetSelection> for AssetsRepr {
    fn from(selection: AssetSelection) -> Self {
        match selection {
            AssetSelection::None => Self::Flag(false),
            AssetSelection::Paths(paths) => Self::Paths(paths),
        }
    }
}
