use thiserror::Error;

use crate::scene::{ComponentError, ComponentNode, Node, PropError};

/// Fatal render-pass error. Any of these aborts the whole `render` call.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid element: found bare text {0:?} where an element was expected")]
    InvalidElement(String),
    #[error("invalid element tag {0:?}")]
    InvalidTag(String),
    #[error("component `{name}` failed: {source}")]
    Component {
        name: String,
        #[source]
        source: ComponentError,
    },
    #[error("component `{name}` did not return an element")]
    InvalidComponentOutput { name: String },
    #[error(transparent)]
    InvalidProps(#[from] PropError),
    #[error("scene renderer used after cleanup")]
    Disposed,
}

/// Invokes a component once, rejecting output that is not an element,
/// component or fragment.
pub(crate) fn resolve_component(c: &ComponentNode) -> Result<Node, RenderError> {
    let out = c.invoke().map_err(|source| RenderError::Component {
        name: c.name().to_owned(),
        source,
    })?;
    match out {
        Node::Text(_) | Node::Empty => Err(RenderError::InvalidComponentOutput {
            name: c.name().to_owned(),
        }),
        node => Ok(node),
    }
}
