//! Error types shared by the tree builder, the geometry engine and the
//! inspector.

use thiserror::Error;

use crate::widget::WidgetId;

/// A pack option carried a value the packer does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized value {value:?} for pack option -{option}")]
pub struct PackOptionError {
    pub option: &'static str,
    pub value: String,
}

impl PackOptionError {
    pub fn new(option: &'static str, value: impl Into<String>) -> Self {
        Self {
            option,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    #[error("widget {child} declares parent {parent}, which is not in the tree")]
    StructuralInconsistency { child: WidgetId, parent: WidgetId },

    #[error("widget {0} declares no parent but is not the root")]
    DetachedWidget(WidgetId),

    #[error("widget {0} was registered more than once")]
    DuplicateHandle(WidgetId),

    #[error("widget {widget}: {source}")]
    InvalidPackOption {
        widget: WidgetId,
        #[source]
        source: PackOptionError,
    },

    #[error("widget {0} no longer exists")]
    StaleHandle(WidgetId),

    #[error("widget {0} is not part of the current tree")]
    UnknownWidget(WidgetId),

    #[error("list line {0} does not map to a widget")]
    UnknownLine(usize),

    #[error("no widget tree has been loaded")]
    NoTree,
}

impl InspectError {
    /// True when the error only means a widget went away under us.
    pub fn is_stale(&self) -> bool {
        matches!(self, InspectError::StaleHandle(_))
    }
}
