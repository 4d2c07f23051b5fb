use std::path::PathBuf;

/// Errors which abort the stage that detects them.
///
/// Per-record filtering decisions are not errors. They are logged and the
/// record is skipped, see [`Rejection`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Failed to find file '{}'!", .path.display())]
    MissingInput { path: PathBuf },

    #[error("Failed to open file '{}' for {}!", .path.display(), access(.write))]
    IoOpen {
        path: PathBuf,
        write: bool,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read from '{}'!", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to '{}'!", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to find any {what}{}!", origin_suffix(.origin))]
    EmptyResult {
        what: &'static str,
        origin: Option<PathBuf>,
    },

    #[error("Failed to parse registry '{}' as XML!", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: xml::reader::Error,
    },
}

fn access(write: &bool) -> &'static str {
    if *write {
        "writing"
    } else {
        "reading"
    }
}

fn origin_suffix(origin: &Option<PathBuf>) -> String {
    match origin {
        Some(path) => format!(" from file '{}'", path.display()),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn open_read(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
        Error::IoOpen {
            path: path.into(),
            write: false,
            source,
        }
    }

    pub(crate) fn open_write(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
        Error::IoOpen {
            path: path.into(),
            write: true,
            source,
        }
    }
}

/// Severity of a message sent to the result log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Message,
    Success,
    Error,
}

impl MessageKind {
    /// Text placed between the indentation and the message.
    pub fn prefix(self) -> &'static str {
        match self {
            MessageKind::Message => "",
            MessageKind::Success => "[SUCCESS] ",
            MessageKind::Error => "[ERROR] ",
        }
    }
}

/// How the registry file is turned into candidate lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum ScanMode {
    /// Every physical line containing `<extension` is a candidate.
    #[default]
    Lines,

    /// `<extension>` elements are read with an XML reader and rendered back
    /// into one line each before going through the same pipeline.
    Elements,
}

/// Value of the `type` attribute of an extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ExtensionScope {
    Device,
    Instance,
    Other(String),
}

impl ExtensionScope {
    pub fn from_attribute(value: &str) -> ExtensionScope {
        match value {
            "device" => ExtensionScope::Device,
            "instance" => ExtensionScope::Instance,
            other => ExtensionScope::Other(String::from(other)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExtensionScope::Device => "device",
            ExtensionScope::Instance => "instance",
            ExtensionScope::Other(s) => s,
        }
    }
}

/// One cleaned registry line, parsed into the fields the classifier needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub name: String,
    pub scope: ExtensionScope,
    pub depends: Vec<String>,
}

/// Reason a registry line was dropped before cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Rejection {
    /// `supported` is `disabled`, `deprecated` or `vulkansc`.
    Unsupported,
    /// Promoted to a core version newer than 1.2.
    PromotedPastBaseline,
    /// Mentions core version 1.3 or newer.
    CoreVersion,
    /// Neither `VK_KHR_` nor `VK_EXT_`.
    VendorPrefix,
    /// Excluded window system or a DRM extension.
    Platform,
}

/// Accepted extension names, split by scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ExtensionLists {
    pub device: Vec<String>,
    pub instance: Vec<String>,
}

/// Accepted layer names in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LayerList(pub Vec<String>);
