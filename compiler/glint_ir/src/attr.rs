//! Attribute trees.
//!
//! A parse produces a tree of attributes mirroring the matched grammar
//! structure; AST construction walks this tree. Each node records which
//! named rule (if any) produced it and the token range it spans.

use std::fmt;

use super::{Span, TokenCapture, TokenIdx, TokenStream};

/// Identifier of a named grammar rule.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RuleId(pub u32);

/// One node of the attribute tree.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Attr {
    /// The named rule that produced this node, if any.
    pub rule: Option<RuleId>,
    /// Token range spanning the match.
    pub capture: TokenCapture,
    pub kind: AttrKind,
}

/// The four attribute shapes.
///
/// This set is closed: a tagged union keeps tree walks a single `match`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AttrKind {
    /// A single matched token. `None` marks a placeholder produced without
    /// consuming input (end anchors, lookahead).
    Terminal(Option<TokenIdx>),
    /// Variable-length list of children, one per repetition.
    Sequence(Vec<Attr>),
    /// One chosen alternative; `selected` records which branch matched.
    Selector { selected: usize, inner: Box<Attr> },
    /// Fixed-arity list of children, one per sub-expression in a
    /// concatenation.
    Queuer(Vec<Attr>),
}

impl Attr {
    /// Terminal attribute for a matched token.
    pub fn terminal(token: TokenIdx, capture: TokenCapture) -> Self {
        Attr {
            rule: None,
            capture,
            kind: AttrKind::Terminal(Some(token)),
        }
    }

    /// Terminal attribute carrying no token (end anchors, lookahead,
    /// recovery placeholders).
    pub fn empty() -> Self {
        Attr {
            rule: None,
            capture: TokenCapture::None,
            kind: AttrKind::Terminal(None),
        }
    }

    /// Sequence attribute from repetition children.
    pub fn sequence(children: Vec<Attr>, capture: TokenCapture) -> Self {
        Attr {
            rule: None,
            capture,
            kind: AttrKind::Sequence(children),
        }
    }

    /// Selector attribute wrapping the matched branch.
    pub fn selector(selected: usize, inner: Attr, capture: TokenCapture) -> Self {
        Attr {
            rule: None,
            capture,
            kind: AttrKind::Selector {
                selected,
                inner: Box::new(inner),
            },
        }
    }

    /// Queuer attribute from concatenation children.
    pub fn queuer(children: Vec<Attr>, capture: TokenCapture) -> Self {
        Attr {
            rule: None,
            capture,
            kind: AttrKind::Queuer(children),
        }
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        match &self.kind {
            AttrKind::Terminal(_) => 0,
            AttrKind::Sequence(children) | AttrKind::Queuer(children) => children.len(),
            AttrKind::Selector { .. } => 1,
        }
    }

    /// Direct child by position.
    ///
    /// For selector attributes, index 0 is the chosen branch's attribute.
    pub fn child(&self, idx: usize) -> Option<&Attr> {
        match &self.kind {
            AttrKind::Terminal(_) => None,
            AttrKind::Sequence(children) | AttrKind::Queuer(children) => children.get(idx),
            AttrKind::Selector { inner, .. } => (idx == 0).then(|| inner.as_ref()),
        }
    }

    /// Direct children as a slice (empty for terminals).
    pub fn children(&self) -> &[Attr] {
        match &self.kind {
            AttrKind::Terminal(_) => &[],
            AttrKind::Sequence(children) | AttrKind::Queuer(children) => children,
            AttrKind::Selector { inner, .. } => std::slice::from_ref(inner.as_ref()),
        }
    }

    /// The matched token for terminal attributes.
    pub fn token(&self) -> Option<TokenIdx> {
        match self.kind {
            AttrKind::Terminal(token) => token,
            _ => None,
        }
    }

    /// Byte span of the matched range, resolved against the stream.
    pub fn span(&self, tokens: &TokenStream) -> Option<Span> {
        self.capture.span(tokens)
    }

    /// Nesting depth of the tree rooted at this node.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(Attr::depth)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AttrKind::Terminal(Some(token)) => write!(f, "tok#{}", token.0),
            AttrKind::Terminal(None) => write!(f, "tok#-"),
            AttrKind::Sequence(children) => {
                write!(f, "seq[")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, "]")
            }
            AttrKind::Selector { selected, inner } => write!(f, "alt#{selected}({inner})"),
            AttrKind::Queuer(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}
