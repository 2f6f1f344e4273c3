use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use super::props::{PropReader, PropValue, Props};

/// Error returned by a [`Component`] that could not produce its output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ComponentError {
    message: String,
}

impl ComponentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ComponentError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ComponentError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A user-defined node that expands into other nodes when rendered.
///
/// Components are invoked on every walk (and once more per gradient scan when
/// they are children of a shape), so `render` should be cheap and pure.
pub trait Component {
    fn name(&self) -> &str;

    fn render(&self, props: &Props, children: &[Node]) -> Result<Node, ComponentError>;
}

/// [`Component`] backed by a closure.
pub struct FnComponent<F> {
    name: String,
    f: F,
}

impl<F> FnComponent<F>
where
    F: Fn(&Props, &[Node]) -> Result<Node, ComponentError>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Component for FnComponent<F>
where
    F: Fn(&Props, &[Node]) -> Result<Node, ComponentError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, props: &Props, children: &[Node]) -> Result<Node, ComponentError> {
        (self.f)(props, children)
    }
}

/// Component reference plus the props and children it is invoked with.
#[derive(Clone)]
pub struct ComponentNode {
    pub component: Rc<dyn Component>,
    pub props: Props,
    pub children: Vec<Node>,
}

impl ComponentNode {
    pub fn new(component: Rc<dyn Component>) -> Self {
        Self {
            component,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.component.name()
    }

    /// Invokes the component once.
    pub fn invoke(&self) -> Result<Node, ComponentError> {
        self.component.render(&self.props, &self.children)
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.set(key, value);
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }
}

impl fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentNode")
            .field("component", &self.component.name())
            .field("props", &self.props)
            .field("children", &self.children)
            .finish()
    }
}

/// Tagged primitive: a tag dispatched to a renderer, its props and children.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub props: Props,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.set(key, value);
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Typed prop access; errors name this element's tag.
    #[inline]
    pub fn read(&self) -> PropReader<'_> {
        self.props.reader(&self.tag)
    }
}

/// One node of a declarative scene.
#[derive(Debug, Clone, Default)]
pub enum Node {
    Element(Element),
    Component(ComponentNode),
    /// Grouping without a draw call of its own.
    Fragment(Vec<Node>),
    /// Bare text where an element was expected; rejected by the walker.
    Text(String),
    /// Absent node; skipped.
    #[default]
    Empty,
}

impl Node {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<ComponentNode> for Node {
    fn from(c: ComponentNode) -> Self {
        Node::Component(c)
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Node::Fragment(nodes)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_owned())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Self {
        v.map_or(Node::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_builder_collects_props_and_children() {
        let el = Element::new("group")
            .prop("opacity", 0.5)
            .child(Element::new("rect"))
            .child(None::<Element>);
        assert_eq!(el.read().number("opacity"), Ok(0.5));
        assert_eq!(el.children.len(), 2);
        assert!(el.children[1].is_empty());
    }

    #[test]
    fn fn_component_invokes_closure_with_props() {
        let c = FnComponent::new("Badge", |props: &Props, _: &[Node]| {
            let size = props.reader("Badge").number_or("size", 4.0).map_err(|e| e.to_string())?;
            Ok(Element::new("circle").prop("r", size).into())
        });
        let node = ComponentNode::new(Rc::new(c)).prop("size", 9.0);
        assert_eq!(node.name(), "Badge");

        let out = node.invoke().unwrap();
        let el = out.as_element().unwrap();
        assert_eq!(el.tag, "circle");
        assert_eq!(el.read().number("r"), Ok(9.0));
    }

    #[test]
    fn component_error_carries_message() {
        let c = FnComponent::new("Broken", |_: &Props, _: &[Node]| Err("boom".into()));
        let err = ComponentNode::new(Rc::new(c)).invoke().unwrap_err();
        assert_eq!(err.message(), "boom");
    }
}
