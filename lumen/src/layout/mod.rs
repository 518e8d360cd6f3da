//! Row-packing rich-text layout.
//!
//! Tokens (words, ruby words, images, clickable labels, spacers) are
//! reserved in sequence and packed greedily into rows that wrap at the
//! configured pixel width. A token's row and column are fixed the moment it
//! is reserved; nothing is ever reflowed short of [`Layout::clear`].
//!
//! # Architecture
//!
//! ```text
//! reserve_*() packs rows -> show_next() reveals + positions -> draw_on() composites
//!                                              \-> on_hover()/on_left_click() hit-test
//! ```
//!
//! Revealing is driven entirely by the caller (typically one `show_next()`
//! per animation tick); see [`reveal`]. Pointer dispatch lives in [`hit`].

mod hit;
mod reveal;
mod row;
mod token;

use std::collections::{BTreeMap, HashMap};

pub use reveal::LayoutState;
pub use row::Row;
pub use token::{Token, TokenKind};

use crate::config::LayoutConfig;
use crate::error::{LumenError, Result};
use crate::font::{Font, FontManager, Rasterizer};
use crate::primitives::{Color, Point, Rect};
use crate::surface::{DrawTarget, Surface};

/// Pointer callback, invoked with the pointer position.
pub type Callback = Box<dyn FnMut(i32, i32)>;

/// Where a token landed in the row table.
#[derive(Debug, Clone, Copy)]
struct Slot {
    row: usize,
    column: usize,
}

/// Per-revealed-token draw state.
#[derive(Debug, Clone, Copy)]
struct Active {
    position: Point,
    hovered: bool,
}

pub struct Layout {
    config: LayoutConfig,
    font: Box<dyn Rasterizer>,
    tokens: Vec<Token>,
    slots: Vec<Slot>,
    /// Never empty: the last row is the one being filled.
    rows: Vec<Row>,
    /// Reveal cursor; tokens `< last_index` are visible.
    last_index: usize,
    /// Indexed by token; `active.len() == last_index`.
    active: Vec<Active>,
    /// Only clickable tokens, filled in as they are revealed.
    click_rects: BTreeMap<usize, Rect>,
    click_callbacks: HashMap<usize, Callback>,
    hover_callbacks: HashMap<usize, Callback>,
    names: HashMap<String, usize>,
}

impl Layout {
    /// Create a layout with default colors and the given wrap width
    /// (`-1` for a single unbounded row).
    pub fn new(wrap_width: i32, font: impl Rasterizer + 'static) -> Self {
        Self::with_config(
            LayoutConfig {
                wrap_width,
                ..LayoutConfig::default()
            },
            font,
        )
    }

    /// Create a layout from a full configuration. The font's pixel size is
    /// taken as given; `config.font_size` only matters to
    /// [`Layout::from_manager`].
    pub fn with_config(config: LayoutConfig, font: impl Rasterizer + 'static) -> Self {
        Self {
            config,
            font: Box::new(font),
            tokens: Vec::new(),
            slots: Vec::new(),
            rows: vec![Row::new()],
            last_index: 0,
            active: Vec::new(),
            click_rects: BTreeMap::new(),
            click_callbacks: HashMap::new(),
            hover_callbacks: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Create a layout whose body font is `config.font_family` at
    /// `config.font_size`, rendered through `manager`.
    pub fn from_manager(config: LayoutConfig, manager: &FontManager) -> Result<Self> {
        let font = Font::new(manager, config.font_family.clone(), config.font_size)?;
        Ok(Self::with_config(config, font))
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn wrap_width(&self) -> i32 {
        self.config.wrap_width
    }

    pub fn set_foreground(&mut self, color: Color) {
        self.config.foreground = color;
    }

    pub fn set_hover_color(&mut self, color: Color) {
        self.config.hover = color;
    }

    pub fn font(&self) -> &dyn Rasterizer {
        self.font.as_ref()
    }

    // =====================================================================
    // Reservation
    // =====================================================================

    /// Reserve a copy of `bitmap`. An empty `name` leaves the token unnamed.
    pub fn reserve_image(&mut self, name: &str, bitmap: &Surface) -> usize {
        self.push_token(Token::new(non_empty(name), TokenKind::Image(bitmap.clone())))
    }

    /// Render `word` in the foreground color and reserve it. A non-empty
    /// `ruby` stacks the annotation, at half the body size, centered above
    /// the word; the pair wraps as one token named `{ruby,<word>,<ruby>}`.
    ///
    /// Nothing is reserved if either text renders to nothing.
    pub fn reserve_word(&mut self, word: &str, ruby: &str) -> Result<usize> {
        let color = self.config.foreground;

        if ruby.is_empty() {
            let bitmap = self.render_text(word, color)?;
            return Ok(self.push_token(Token::new(None, TokenKind::Word(bitmap))));
        }

        let bitmap = self.render_ruby(word, ruby, color)?;
        let name = format!("{{ruby,{},{}}}", word, ruby);
        Ok(self.push_token(Token::new(Some(name), TokenKind::RubyWord(bitmap))))
    }

    /// Reserve a clickable token that swaps to `hover` under the pointer.
    pub fn reserve_clickable(
        &mut self,
        name: &str,
        normal: &Surface,
        hover: &Surface,
        on_click: Option<Callback>,
    ) -> usize {
        let token = Token::clickable(non_empty(name), TokenKind::Image(normal.clone()), hover.clone());
        let index = self.push_token(token);
        if let Some(callback) = on_click {
            self.click_callbacks.insert(index, callback);
        }
        index
    }

    /// Reserve `text` as a clickable label: foreground color normally,
    /// hover color under the pointer.
    pub fn reserve_link(&mut self, name: &str, text: &str, on_click: Option<Callback>) -> Result<usize> {
        let normal = self.render_text(text, self.config.foreground)?;
        let hover = self.render_text(text, self.config.hover)?;
        let token = Token::clickable(non_empty(name), TokenKind::Word(normal), hover);
        let index = self.push_token(token);
        if let Some(callback) = on_click {
            self.click_callbacks.insert(index, callback);
        }
        Ok(index)
    }

    /// Reserve blank space of the given size.
    pub fn reserve_spacer(&mut self, width: u32, height: u32) -> usize {
        self.push_token(Token::new(None, TokenKind::Spacer { width, height }))
    }

    /// Force a line break. A zero-width, line-height spacer is reserved first
    /// so an empty line still has height and the reveal advances one step
    /// per break.
    pub fn reserve_new_line(&mut self) -> usize {
        let height = self.font.line_height();
        let index = self.reserve_spacer(0, height);
        self.rows.push(Row::new());
        tracing::debug!("Forced line break after token {}", index);
        index
    }

    /// Pack a token into the current row (or a fresh one) and record it.
    fn push_token(&mut self, token: Token) -> usize {
        let index = self.tokens.len();
        let (width, height) = (token.width(), token.height());

        let wrap = self.config.wrap_width;
        let current = self.current_row();
        if wrap >= 0 && current.width() as i64 + width as i64 > wrap as i64 {
            tracing::debug!(
                "Row {} full at {}px, wrapping token {} ({}px)",
                self.rows.len() - 1,
                current.width(),
                index,
                width
            );
            self.rows.push(Row::new());
        }

        let row = self.rows.len() - 1;
        let column = self.rows[row].push(index, width, height);
        self.slots.push(Slot { row, column });

        if let Some(name) = &token.name {
            self.names.insert(name.clone(), index);
        }
        self.tokens.push(token);
        index
    }

    fn current_row(&self) -> &Row {
        // `rows` always holds at least one row.
        &self.rows[self.rows.len() - 1]
    }

    fn render_text(&mut self, text: &str, color: Color) -> Result<Surface> {
        let spacing = self.config.glyph_spacing;
        let Some(raster) = self.font.rasterize_str(text, spacing) else {
            tracing::warn!("Nothing to render for {:?}", text);
            return Err(LumenError::EmptyRender(text.to_string()));
        };
        let mut bitmap = Surface::new(raster.width() as i32, raster.height() as i32)?;
        bitmap.draw_raster(&raster, 0, 0, color);
        Ok(bitmap)
    }

    fn render_ruby(&mut self, word: &str, ruby: &str, color: Color) -> Result<Surface> {
        let spacing = self.config.glyph_spacing;
        let body_size = self.font.pixel_size();

        self.font.set_pixel_size((body_size / 2).max(1));
        let ruby_raster = self.font.rasterize_str(ruby, spacing);
        self.font.set_pixel_size(body_size);

        let (Some(ruby_raster), Some(word_raster)) = (ruby_raster, self.font.rasterize_str(word, spacing)) else {
            tracing::warn!("Nothing to render for ruby pair {:?}/{:?}", word, ruby);
            return Err(LumenError::EmptyRender(format!("{}/{}", word, ruby)));
        };

        let width = ruby_raster.width().max(word_raster.width());
        let height = ruby_raster.height() + word_raster.height();
        let mut bitmap = Surface::new(width as i32, height as i32)?;

        let ruby_x = (width - ruby_raster.width()) / 2;
        let word_x = (width - word_raster.width()) / 2;
        bitmap.draw_raster(&ruby_raster, ruby_x as i32, 0, color);
        bitmap.draw_raster(&word_raster, word_x as i32, ruby_raster.height() as i32, color);
        Ok(bitmap)
    }

    // =====================================================================
    // Queries
    // =====================================================================

    /// Widest row.
    pub fn width(&self) -> u32 {
        self.rows.iter().map(Row::width).max().unwrap_or(0)
    }

    /// Sum of row heights.
    pub fn height(&self) -> u32 {
        self.rows.iter().map(Row::height).sum()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn token_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(row, column)` assigned to a token at reservation.
    pub fn token_slot(&self, index: usize) -> Option<(usize, usize)> {
        self.slots.get(index).map(|s| (s.row, s.column))
    }

    /// Position recorded when the token was revealed.
    pub fn token_position(&self, index: usize) -> Option<Point> {
        self.active.get(index).map(|a| a.position)
    }

    /// Clickable rectangle of a revealed clickable token.
    pub fn click_rect(&self, index: usize) -> Option<Rect> {
        self.click_rects.get(&index).copied()
    }

    pub fn is_hovered(&self, index: usize) -> bool {
        self.active.get(index).is_some_and(|a| a.hovered)
    }

    /// The bitmap a revealed token currently draws (hover or normal).
    pub fn active_bitmap(&self, index: usize) -> Option<&Surface> {
        let active = self.active.get(index)?;
        let token = &self.tokens[index];
        if active.hovered {
            token.hover()
        } else {
            token.normal()
        }
    }

    // =====================================================================
    // Callbacks
    // =====================================================================

    /// Attach or replace the hover callback of a named clickable token.
    pub fn set_hover_callback(&mut self, name: &str, callback: Callback) -> bool {
        match self.clickable_index(name) {
            Some(index) => {
                self.hover_callbacks.insert(index, callback);
                true
            }
            None => false,
        }
    }

    /// Attach or replace the click callback of a named clickable token.
    pub fn set_click_callback(&mut self, name: &str, callback: Callback) -> bool {
        match self.clickable_index(name) {
            Some(index) => {
                self.click_callbacks.insert(index, callback);
                true
            }
            None => false,
        }
    }

    fn clickable_index(&self, name: &str) -> Option<usize> {
        self.token_index(name)
            .filter(|&i| self.tokens[i].is_clickable())
    }

    // =====================================================================
    // Drawing & reset
    // =====================================================================

    /// Composite every revealed token at `(x, y)` plus its position, scaled
    /// by `alpha`. Later tokens draw over earlier ones.
    pub fn draw_on<T: DrawTarget + ?Sized>(&self, target: &mut T, x: i32, y: i32, alpha: u8) {
        for index in 0..self.active.len() {
            let position = self.active[index].position;
            if let Some(bitmap) = self.active_bitmap(index) {
                target.draw_surface(
                    bitmap,
                    x.saturating_add(position.x),
                    y.saturating_add(position.y),
                    alpha,
                );
            }
        }
    }

    /// Drop every token, row and callback; leaves one empty row.
    pub fn clear(&mut self) {
        tracing::debug!("Clearing layout ({} tokens)", self.tokens.len());
        self.tokens.clear();
        self.slots.clear();
        self.rows.clear();
        self.rows.push(Row::new());
        self.last_index = 0;
        self.active.clear();
        self.click_rects.clear();
        self.click_callbacks.clear();
        self.hover_callbacks.clear();
        self.names.clear();
    }
}

fn non_empty(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_string())
}
