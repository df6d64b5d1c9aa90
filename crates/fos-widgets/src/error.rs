//! Widget errors

use fos_dom::{DomError, NodeId};

/// Result type for widget enhancement
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Widget enhancement errors
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("container {0} holds no dialog region")]
    NoDialogRegion(NodeId),

    #[error("accordion {0} has no headings")]
    EmptyAccordion(NodeId),

    #[error("heading {heading} has no panel after it")]
    UnpairedHeading { heading: NodeId },

    #[error("panel {panel} has no heading before it")]
    OrphanPanel { panel: NodeId },

    #[error("element {0} is already enhanced")]
    AlreadyEnhanced(NodeId),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Parse(#[from] fos_html::ParseError),
}
