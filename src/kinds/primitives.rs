//! Leaf primitives: text, tokens, icons, and images.
//!
//! Leaves carry literal scalar fields and reference no children.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::kinds::{node_handle_impls, put, put_opt, NodeKind};
use crate::types::node::Node;

/// Rendering variant for [`Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
    /// Body text.
    Plain,
    /// Monospaced, code-like text.
    Token,
}

/// Visual emphasis level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    /// De-emphasized.
    Less,
    /// Default weight.
    Normal,
    /// Emphasized.
    More,
}

/// Named accent color for tokens and icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Neutral gray.
    Gray,
    /// Brown accent.
    Brown,
    /// Purple accent.
    Purple,
    /// Green accent.
    Green,
    /// Blue accent.
    Blue,
    /// Yellow accent.
    Yellow,
    /// Red accent.
    Red,
}

#[derive(Debug, Clone)]
pub(crate) struct TextSpec {
    text: String,
    variant: Option<TextVariant>,
    emphasis: Option<Emphasis>,
}

impl TextSpec {
    pub(crate) fn assemble(&self) -> (Map<String, Value>, Vec<Node>) {
        let mut contents = Map::new();
        put(&mut contents, "text", &self.text);
        put_opt(&mut contents, "variant", &self.variant);
        put_opt(&mut contents, "emphasis", &self.emphasis);
        (contents, Vec::new())
    }
}

/// A run of text.
#[derive(Clone)]
pub struct Text(Node);

impl Text {
    /// Create a text node.
    pub fn new(text: impl Into<String>) -> Self {
        Self(Node::from_kind(NodeKind::Text(TextSpec {
            text: text.into(),
            variant: None,
            emphasis: None,
        })))
    }

    /// Set the rendering variant.
    pub fn variant(&self, variant: TextVariant) -> &Self {
        self.spec(|spec| spec.variant = Some(variant));
        self
    }

    /// Set the emphasis level.
    pub fn emphasis(&self, emphasis: Emphasis) -> &Self {
        self.spec(|spec| spec.emphasis = Some(emphasis));
        self
    }

    fn spec<R>(&self, f: impl FnOnce(&mut TextSpec) -> R) -> R {
        self.0.with_kind_mut(|kind| match kind {
            NodeKind::Text(spec) => f(spec),
            _ => unreachable!("text handle wraps a text node"),
        })
    }
}

node_handle_impls!(Text);

#[derive(Debug, Clone)]
pub(crate) struct TokenSpec {
    text: String,
    color: Option<Color>,
}

impl TokenSpec {
    pub(crate) fn assemble(&self) -> (Map<String, Value>, Vec<Node>) {
        let mut contents = Map::new();
        put(&mut contents, "text", &self.text);
        put_opt(&mut contents, "color", &self.color);
        (contents, Vec::new())
    }
}

/// A short, pill-shaped badge of text.
#[derive(Clone)]
pub struct Token(Node);

impl Token {
    /// Create a token node.
    pub fn new(text: impl Into<String>) -> Self {
        Self(Node::from_kind(NodeKind::Token(TokenSpec {
            text: text.into(),
            color: None,
        })))
    }

    /// Set the accent color.
    pub fn color(&self, color: Color) -> &Self {
        self.spec(|spec| spec.color = Some(color));
        self
    }

    fn spec<R>(&self, f: impl FnOnce(&mut TokenSpec) -> R) -> R {
        self.0.with_kind_mut(|kind| match kind {
            NodeKind::Token(spec) => f(spec),
            _ => unreachable!("token handle wraps a token node"),
        })
    }
}

node_handle_impls!(Token);

#[derive(Debug, Clone)]
pub(crate) struct IconSpec {
    name: String,
    color: Option<Color>,
    emphasis: Option<Emphasis>,
}

impl IconSpec {
    pub(crate) fn assemble(&self) -> (Map<String, Value>, Vec<Node>) {
        let mut contents = Map::new();
        put(&mut contents, "name", &self.name);
        put_opt(&mut contents, "color", &self.color);
        put_opt(&mut contents, "emphasis", &self.emphasis);
        (contents, Vec::new())
    }
}

/// A named icon from the renderer's icon set.
#[derive(Clone)]
pub struct Icon(Node);

impl Icon {
    /// Create an icon node.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Node::from_kind(NodeKind::Icon(IconSpec {
            name: name.into(),
            color: None,
            emphasis: None,
        })))
    }

    /// Set the accent color.
    pub fn color(&self, color: Color) -> &Self {
        self.spec(|spec| spec.color = Some(color));
        self
    }

    /// Set the emphasis level.
    pub fn emphasis(&self, emphasis: Emphasis) -> &Self {
        self.spec(|spec| spec.emphasis = Some(emphasis));
        self
    }

    fn spec<R>(&self, f: impl FnOnce(&mut IconSpec) -> R) -> R {
        self.0.with_kind_mut(|kind| match kind {
            NodeKind::Icon(spec) => f(spec),
            _ => unreachable!("icon handle wraps an icon node"),
        })
    }
}

node_handle_impls!(Icon);

#[derive(Debug, Clone)]
pub(crate) struct ImageSpec {
    location: String,
}

impl ImageSpec {
    pub(crate) fn assemble(&self) -> (Map<String, Value>, Vec<Node>) {
        let mut contents = Map::new();
        put(&mut contents, "location", &self.location);
        (contents, Vec::new())
    }
}

/// An image addressed by path or URL.
#[derive(Clone)]
pub struct Image(Node);

impl Image {
    /// Create an image node.
    pub fn new(location: impl Into<String>) -> Self {
        Self(Node::from_kind(NodeKind::Image(ImageSpec {
            location: location.into(),
        })))
    }
}

node_handle_impls!(Image);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_contents() {
        let text = Text::new("hello");
        text.emphasis(Emphasis::More);
        let (contents, children) = text.0.with_kind(|kind| match kind {
            NodeKind::Text(spec) => spec.assemble(),
            _ => unreachable!(),
        });
        assert_eq!(contents["text"], "hello");
        assert_eq!(contents["emphasis"], "more");
        assert!(!contents.contains_key("variant"));
        assert!(children.is_empty());
    }

    #[test]
    fn test_token_color_wire_form() {
        let token = Token::new("id");
        token.color(Color::Blue);
        let (contents, _) = token.0.with_kind(|kind| match kind {
            NodeKind::Token(spec) => spec.assemble(),
            _ => unreachable!(),
        });
        assert_eq!(contents["color"], "blue");
    }

    #[test]
    fn test_image_contents() {
        let image = Image::new("/tmp/plot.png");
        let (contents, _) = image.0.with_kind(|kind| match kind {
            NodeKind::Image(spec) => spec.assemble(),
            _ => unreachable!(),
        });
        assert_eq!(contents["location"], "/tmp/plot.png");
    }
}
