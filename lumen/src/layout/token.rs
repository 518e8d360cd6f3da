//! Layout tokens: the atomic positioned drawables.

use crate::surface::Surface;

/// What a token draws, resolved once at reservation time.
#[derive(Debug, Clone)]
pub enum TokenKind {
    /// A caller-supplied bitmap (copied on reserve).
    Image(Surface),
    /// A word rendered with the layout's font.
    Word(Surface),
    /// A word with its ruby annotation stacked on top.
    RubyWord(Surface),
    /// Empty space; forced line breaks use a zero-width spacer.
    Spacer { width: u32, height: u32 },
}

/// One reserved token. Never mutated after reservation.
#[derive(Debug, Clone)]
pub struct Token {
    pub(crate) name: Option<String>,
    pub(crate) kind: TokenKind,
    /// Alternate bitmap shown while the pointer is over the token.
    /// Present only for clickable tokens.
    pub(crate) hover: Option<Surface>,
}

impl Token {
    pub(crate) fn new(name: Option<String>, kind: TokenKind) -> Self {
        Self { name, kind, hover: None }
    }

    pub(crate) fn clickable(name: Option<String>, kind: TokenKind, hover: Surface) -> Self {
        Self {
            name,
            kind,
            hover: Some(hover),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// The normal-state bitmap; `None` for spacers.
    pub fn normal(&self) -> Option<&Surface> {
        match &self.kind {
            TokenKind::Image(s) | TokenKind::Word(s) | TokenKind::RubyWord(s) => Some(s),
            TokenKind::Spacer { .. } => None,
        }
    }

    pub fn hover(&self) -> Option<&Surface> {
        self.hover.as_ref()
    }

    pub fn is_clickable(&self) -> bool {
        self.hover.is_some()
    }

    pub fn width(&self) -> u32 {
        match &self.kind {
            TokenKind::Spacer { width, .. } => *width,
            _ => self.normal().map_or(0, Surface::width),
        }
    }

    pub fn height(&self) -> u32 {
        match &self.kind {
            TokenKind::Spacer { height, .. } => *height,
            _ => self.normal().map_or(0, Surface::height),
        }
    }
}
