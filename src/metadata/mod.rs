//! Metadata type tags.
//!
//! A cross-reference inside a profile names its target together with one of
//! these tags. Each tag knows where components of its kind live in a source
//! tree and in a remote snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetadataType {
    Profile,
    CustomTab,
    ApexClass,
    ApexPage,
    CustomApplication,
    CustomObject,
}

impl MetadataType {
    pub const ALL: [MetadataType; 6] = [
        MetadataType::Profile,
        MetadataType::CustomTab,
        MetadataType::ApexClass,
        MetadataType::ApexPage,
        MetadataType::CustomApplication,
        MetadataType::CustomObject,
    ];

    /// API name of the type
    pub fn name(&self) -> &'static str {
        match self {
            MetadataType::Profile => "Profile",
            MetadataType::CustomTab => "CustomTab",
            MetadataType::ApexClass => "ApexClass",
            MetadataType::ApexPage => "ApexPage",
            MetadataType::CustomApplication => "CustomApplication",
            MetadataType::CustomObject => "CustomObject",
        }
    }

    /// Directory holding components of this type
    pub fn directory_name(&self) -> &'static str {
        match self {
            MetadataType::Profile => "profiles",
            MetadataType::CustomTab => "tabs",
            MetadataType::ApexClass => "classes",
            MetadataType::ApexPage => "pages",
            MetadataType::CustomApplication => "applications",
            MetadataType::CustomObject => "objects",
        }
    }

    /// File suffix that follows the component name in source files
    pub fn suffix(&self) -> &'static str {
        match self {
            MetadataType::Profile => "profile",
            MetadataType::CustomTab => "tab",
            MetadataType::ApexClass => "cls",
            MetadataType::ApexPage => "page",
            MetadataType::CustomApplication => "app",
            MetadataType::CustomObject => "object",
        }
    }

    /// Extract the component name from a source file name.
    ///
    /// Accepts `<Name>.<suffix>` and `<Name>.<suffix>-meta.<ext>`.
    pub fn component_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let marker = format!(".{}", self.suffix());
        let idx = file_name.rfind(&marker)?;
        let rest = &file_name[idx + marker.len()..];
        if idx == 0 || !(rest.is_empty() || rest.starts_with("-meta.")) {
            return None;
        }
        Some(&file_name[..idx])
    }
}

impl fmt::Display for MetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetadataType(pub String);

impl fmt::Display for UnknownMetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metadata type '{}'", self.0)
    }
}

impl std::error::Error for UnknownMetadataType {}

impl FromStr for MetadataType {
    type Err = UnknownMetadataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetadataType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMetadataType(s.to_string()))
    }
}
