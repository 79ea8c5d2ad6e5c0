use crate::dom::Location;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{injector} doesn't have any metadata")]
    MissingMetadata { injector: String },

    #[error("{injector} doesn't have the mandatory '{field}' metadata")]
    MissingMandatoryField { injector: String, field: &'static str },

    #[error(
        "{injector} has inconsistent 'key={}' and 'keyed-as={}' metadata",
        .key.as_deref().unwrap_or("<none>"),
        .keyed_as.as_deref().unwrap_or("<none>")
    )]
    InconsistentKeyMetadata {
        injector: String,
        key: Option<String>,
        keyed_as: Option<String>,
    },

    #[error("Malformed metadata entry '{key}': {reason}")]
    MalformedMetadata { key: String, reason: String },

    #[error("No injector registered for type '{0}'")]
    UnknownType(String),

    #[error("Model #{id} is not built")]
    ModelNotReady { id: usize },

    #[error("No property named '{name}' in model for '{target}'")]
    UnknownProperty { name: String, target: String },

    #[error("Invalid argument for '{xml_name}': expected {expected}, found {found}")]
    InvalidArgumentShape {
        xml_name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Cannot read '{xml_name}' as {requested}")]
    UnsupportedResultShape { xml_name: String, requested: String },

    #[error("Cannot read items of '{xml_name}' as {requested}")]
    UnsupportedItemShape { xml_name: String, requested: String },

    #[error("Cannot convert '{value}' of '{xml_name}' to {target}")]
    TypeCoercion {
        xml_name: String,
        value: String,
        target: &'static str,
    },

    #[error("Unsupported operation on '{xml_name}': {operation}")]
    UnsupportedOperation {
        xml_name: String,
        operation: &'static str,
    },

    #[error("Index {index} out of bounds for '{xml_name}' (len {len})")]
    IndexOutOfBounds {
        xml_name: String,
        index: usize,
        len: usize,
    },

    #[error("Node under '{xml_name}' is not a child of this parent")]
    DetachedNode { xml_name: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("{source} (at {location})")]
    Located {
        location: Location,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attaches a document location to this error.
    ///
    /// An error that already carries a location keeps the innermost one, which
    /// is the closest to the offending node.
    pub fn at(self, location: Location) -> Self {
        match self {
            located @ ConfigError::Located { .. } => located,
            other => ConfigError::Located {
                location,
                source: Box::new(other),
            },
        }
    }

    /// The document location attached to this error, if any.
    pub fn location(&self) -> Option<&Location> {
        match self {
            ConfigError::Located { location, .. } => Some(location),
            _ => None,
        }
    }

    /// The error without its location annotation.
    pub fn root(&self) -> &ConfigError {
        match self {
            ConfigError::Located { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
