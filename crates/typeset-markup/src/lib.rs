//! Markup processing for typeset
//!
//! The first stage of the pipeline. Takes a string with inline tags and
//! turns it into the plain text that gets laid out plus the character runs
//! that style it:
//!
//! ```text
//! <u>ABC</u>EF<u color='red'>GH</u>
//!   → text "ABCEFGH"
//!   → underline runs [0,3) and [5,7) (the second one red)
//! ```
//!
//! Supported tags: `u`, `s`, `background`, `color`, `span`, `b`, `i`, `p`,
//! `char-spacing` and `br/`. Runs are emitted when their tag closes, so an
//! unterminated tag produces no run. Runs of one kind never overlap: when
//! tags nest, the inner tag wins over the characters it covers.

pub mod color;
mod parser;

pub use color::parse_color;

use parser::{Attribute, Token};
use typeset_core::style::{
    CharacterSpacingCharacterRun, CharacterStyleRun, StrikethroughCharacterRun,
    StrikethroughStyleProperties, UnderlineStyleProperties, UnderlineType,
    UnderlinedCharacterRun,
};
use typeset_core::types::{BoundedParagraphRun, CharacterRun, ColorIndex, HorizontalAlignment};
use typeset_core::Color;

/// A color applied to a range of characters
pub type ColorRun = CharacterStyleRun<Color>;

/// Everything the markup said about the text
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MarkupProcessData {
    /// The text without tags, entities decoded
    pub text: String,
    pub color_runs: Vec<ColorRun>,
    pub background_color_runs: Vec<ColorRun>,
    pub underlined_character_runs: Vec<UnderlinedCharacterRun>,
    pub strikethrough_character_runs: Vec<StrikethroughCharacterRun>,
    pub character_spacing_runs: Vec<CharacterSpacingCharacterRun>,
    pub bold_runs: Vec<CharacterRun>,
    pub italic_runs: Vec<CharacterRun>,
    pub bounded_paragraph_runs: Vec<BoundedParagraphRun>,
}

impl MarkupProcessData {
    /// Plain text with no runs
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn character_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Text color palette; run `k` has color index `k + 1`
    pub fn colors(&self) -> Vec<Color> {
        self.color_runs.iter().map(|run| run.properties).collect()
    }

    /// Per-character text color indices (`0` = default color)
    pub fn color_indices(&self) -> Vec<ColorIndex> {
        palette_indices(self.character_count(), &self.color_runs)
    }

    pub fn background_colors(&self) -> Vec<Color> {
        self.background_color_runs
            .iter()
            .map(|run| run.properties)
            .collect()
    }

    /// Per-character background indices (`0` = no background)
    pub fn background_color_indices(&self) -> Vec<ColorIndex> {
        palette_indices(self.character_count(), &self.background_color_runs)
    }

    pub fn is_bold(&self, index: u32) -> bool {
        self.bold_runs.iter().any(|run| run.contains(index))
    }

    pub fn is_italic(&self, index: u32) -> bool {
        self.italic_runs.iter().any(|run| run.contains(index))
    }
}

fn palette_indices(count: usize, runs: &[ColorRun]) -> Vec<ColorIndex> {
    let mut indices = vec![0; count];
    for (k, run) in runs.iter().enumerate() {
        let index = ColorIndex::try_from(k + 1).unwrap_or(ColorIndex::MAX);
        let start = (run.character_run.character_index as usize).min(count);
        let end = (run.character_run.end() as usize).min(count);
        indices[start..end].fill(index);
    }
    indices
}

/// Turns markup strings into [`MarkupProcessData`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupProcessor;

impl MarkupProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &'static str {
        "markup"
    }

    pub fn process(&self, markup: &str) -> MarkupProcessData {
        process_markup(markup)
    }
}

/// Parse `markup` into plain text and style runs
pub fn process_markup(markup: &str) -> MarkupProcessData {
    let mut state = State::default();
    for token in parser::tokenize(markup) {
        match token {
            Token::Char(ch) => state.push_char(ch),
            Token::Open { name, attributes } => state.open(&name, &attributes),
            Token::Close { name } => state.close(&name),
            Token::Empty { name, .. } => {
                if name == "br" {
                    state.push_char('\n');
                } else {
                    log::trace!("ignoring empty element <{}/>", name);
                }
            },
        }
    }
    if !state.open.is_empty() {
        log::debug!("{} unterminated tag(s) produce no run", state.open.len());
    }
    state.finish()
}

/// What an open tag will contribute once it closes
#[derive(Debug, Clone)]
enum TagStyle {
    Underline(UnderlineStyleProperties),
    Strikethrough(StrikethroughStyleProperties),
    Color(Color),
    Background(Color),
    Span(SpanStyle),
    Bold,
    Italic,
    Paragraph(Option<HorizontalAlignment>),
    CharacterSpacing(f32),
    Unknown,
}

#[derive(Debug, Clone, Default)]
struct SpanStyle {
    text_color: Option<Color>,
    background_color: Option<Color>,
    bold: bool,
    italic: bool,
    character_spacing: Option<f32>,
}

#[derive(Debug)]
struct OpenTag {
    name: String,
    style: TagStyle,
    start: u32,
    sequence: usize,
}

/// Character range of a closed tag
#[derive(Debug, Clone, Copy)]
struct Span {
    start: u32,
    end: u32,
    sequence: usize,
}

impl Span {
    fn with<P>(self, properties: P) -> RawRun<P> {
        RawRun {
            start: self.start,
            end: self.end,
            sequence: self.sequence,
            properties,
        }
    }
}

/// A closed run before overlap resolution
#[derive(Debug, Clone)]
struct RawRun<P> {
    start: u32,
    end: u32,
    sequence: usize,
    properties: P,
}

#[derive(Default)]
struct State {
    text: String,
    length: u32,
    open: Vec<OpenTag>,
    sequence: usize,
    paragraph_break_pending: bool,
    underlines: Vec<RawRun<UnderlineStyleProperties>>,
    strikethroughs: Vec<RawRun<StrikethroughStyleProperties>>,
    colors: Vec<RawRun<Color>>,
    backgrounds: Vec<RawRun<Color>>,
    spacings: Vec<RawRun<f32>>,
    bolds: Vec<RawRun<()>>,
    italics: Vec<RawRun<()>>,
    paragraphs: Vec<RawRun<Option<HorizontalAlignment>>>,
}

impl State {
    fn push_char(&mut self, ch: char) {
        if self.paragraph_break_pending {
            self.paragraph_break_pending = false;
            if ch != '\n' {
                self.push_raw('\n');
            }
        }
        self.push_raw(ch);
    }

    fn push_raw(&mut self, ch: char) {
        self.text.push(ch);
        self.length += 1;
    }

    fn open(&mut self, name: &str, attributes: &[Attribute]) {
        let style = match name {
            "u" => TagStyle::Underline(underline_properties(attributes)),
            "s" => TagStyle::Strikethrough(strikethrough_properties(attributes)),
            "color" => match attribute(attributes, "value").and_then(parse_color) {
                Some(color) => TagStyle::Color(color),
                None => TagStyle::Unknown,
            },
            "background" => match attribute(attributes, "color").and_then(parse_color) {
                Some(color) => TagStyle::Background(color),
                None => TagStyle::Unknown,
            },
            "span" => TagStyle::Span(span_style(attributes)),
            "b" => TagStyle::Bold,
            "i" => TagStyle::Italic,
            "char-spacing" => match attribute(attributes, "value").and_then(parse_float) {
                Some(value) => TagStyle::CharacterSpacing(value),
                None => TagStyle::Unknown,
            },
            "p" => {
                self.paragraph_break_pending = false;
                if !self.text.is_empty() && !self.text.ends_with('\n') {
                    self.push_raw('\n');
                }
                TagStyle::Paragraph(attribute(attributes, "align").and_then(parse_alignment))
            },
            _ => {
                log::trace!("ignoring unknown tag <{}>", name);
                TagStyle::Unknown
            },
        };
        self.sequence += 1;
        self.open.push(OpenTag {
            name: name.to_string(),
            style,
            start: self.length,
            sequence: self.sequence,
        });
    }

    fn close(&mut self, name: &str) {
        let Some(position) = self.open.iter().rposition(|tag| tag.name == name) else {
            log::trace!("ignoring unmatched </{}>", name);
            return;
        };
        let tag = self.open.remove(position);
        let span = Span {
            start: tag.start,
            end: self.length,
            sequence: tag.sequence,
        };
        let is_paragraph = matches!(tag.style, TagStyle::Paragraph(_));
        if span.end > span.start {
            match tag.style {
                TagStyle::Underline(p) => self.underlines.push(span.with(p)),
                TagStyle::Strikethrough(p) => self.strikethroughs.push(span.with(p)),
                TagStyle::Color(c) => self.colors.push(span.with(c)),
                TagStyle::Background(c) => self.backgrounds.push(span.with(c)),
                TagStyle::CharacterSpacing(v) => self.spacings.push(span.with(v)),
                TagStyle::Bold => self.bolds.push(span.with(())),
                TagStyle::Italic => self.italics.push(span.with(())),
                TagStyle::Paragraph(align) => self.paragraphs.push(span.with(align)),
                TagStyle::Span(style) => self.close_span(&style, span),
                TagStyle::Unknown => {},
            }
        }
        if is_paragraph {
            self.paragraph_break_pending = true;
        }
    }

    fn close_span(&mut self, style: &SpanStyle, span: Span) {
        if let Some(color) = style.text_color {
            self.colors.push(span.with(color));
        }
        if let Some(color) = style.background_color {
            self.backgrounds.push(span.with(color));
        }
        if let Some(value) = style.character_spacing {
            self.spacings.push(span.with(value));
        }
        if style.bold {
            self.bolds.push(span.with(()));
        }
        if style.italic {
            self.italics.push(span.with(()));
        }
    }

    fn finish(self) -> MarkupProcessData {
        let len = self.length as usize;
        let data = MarkupProcessData {
            color_runs: flatten(len, self.colors),
            background_color_runs: flatten(len, self.backgrounds),
            underlined_character_runs: flatten(len, self.underlines),
            strikethrough_character_runs: flatten(len, self.strikethroughs),
            character_spacing_runs: flatten(len, self.spacings),
            bold_runs: flatten(len, self.bolds)
                .into_iter()
                .map(|run| run.character_run)
                .collect(),
            italic_runs: flatten(len, self.italics)
                .into_iter()
                .map(|run| run.character_run)
                .collect(),
            bounded_paragraph_runs: flatten(len, self.paragraphs)
                .into_iter()
                .map(|run| BoundedParagraphRun {
                    character_run: run.character_run,
                    horizontal_alignment: run.properties.unwrap_or_default(),
                    horizontal_alignment_defined: run.properties.is_some(),
                })
                .collect(),
            text: self.text,
        };
        log::debug!(
            "markup: {} chars, {} underline, {} strikethrough, {} color, {} background runs",
            len,
            data.underlined_character_runs.len(),
            data.strikethrough_character_runs.len(),
            data.color_runs.len(),
            data.background_color_runs.len()
        );
        data
    }
}

/// Resolve overlaps (later-opened runs win) into sorted, disjoint runs
fn flatten<P: Clone>(len: usize, mut raw: Vec<RawRun<P>>) -> Vec<CharacterStyleRun<P>> {
    raw.sort_by_key(|run| run.sequence);
    let mut owner: Vec<Option<usize>> = vec![None; len];
    for (id, run) in raw.iter().enumerate() {
        let end = (run.end as usize).min(len);
        let start = (run.start as usize).min(end);
        owner[start..end].fill(Some(id));
    }
    let mut runs = Vec::new();
    let mut i = 0;
    while i < len {
        let Some(id) = owner[i] else {
            i += 1;
            continue;
        };
        let start = i;
        while i < len && owner[i] == Some(id) {
            i += 1;
        }
        runs.push(CharacterStyleRun {
            character_run: CharacterRun::new(start as u32, (i - start) as u32),
            properties: raw[id].properties.clone(),
        });
    }
    runs
}

fn attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .rev()
        .find(|a| a.name == name)
        .map(|a| a.value.as_str())
}

/// Numbers like `2`, `2.5` or `5.0f`
fn parse_float(value: &str) -> Option<f32> {
    let value = value.trim();
    let value = value
        .strip_suffix('f')
        .or_else(|| value.strip_suffix('F'))
        .unwrap_or(value);
    value.parse().ok()
}

fn parse_alignment(value: &str) -> Option<HorizontalAlignment> {
    match value.trim().to_ascii_lowercase().as_str() {
        "begin" | "left" | "start" => Some(HorizontalAlignment::Begin),
        "center" => Some(HorizontalAlignment::Center),
        "end" | "right" => Some(HorizontalAlignment::End),
        _ => None,
    }
}

fn underline_properties(attributes: &[Attribute]) -> UnderlineStyleProperties {
    let mut properties = UnderlineStyleProperties::default();
    if let Some(kind) = attribute(attributes, "type").and_then(UnderlineType::parse) {
        properties.underline_type = kind;
        properties.type_defined = true;
    }
    if let Some(color) = attribute(attributes, "color").and_then(parse_color) {
        properties.color = color;
        properties.color_defined = true;
    }
    if let Some(height) = attribute(attributes, "height").and_then(parse_float) {
        properties.height = height;
        properties.height_defined = true;
    }
    if let Some(gap) = attribute(attributes, "dash-gap").and_then(parse_float) {
        properties.dash_gap = gap;
        properties.dash_gap_defined = true;
    }
    if let Some(width) = attribute(attributes, "dash-width").and_then(parse_float) {
        properties.dash_width = width;
        properties.dash_width_defined = true;
    }
    properties
}

fn strikethrough_properties(attributes: &[Attribute]) -> StrikethroughStyleProperties {
    let mut properties = StrikethroughStyleProperties::default();
    if let Some(color) = attribute(attributes, "color").and_then(parse_color) {
        properties.color = color;
        properties.color_defined = true;
    }
    if let Some(height) = attribute(attributes, "height").and_then(parse_float) {
        properties.height = height;
        properties.height_defined = true;
    }
    properties
}

fn span_style(attributes: &[Attribute]) -> SpanStyle {
    SpanStyle {
        text_color: attribute(attributes, "text-color").and_then(parse_color),
        background_color: attribute(attributes, "background-color").and_then(parse_color),
        bold: attribute(attributes, "font-weight")
            .is_some_and(|w| matches!(w.trim(), "bold" | "semibold" | "extrabold" | "black")),
        italic: attribute(attributes, "font-slant")
            .is_some_and(|s| matches!(s.trim(), "italic" | "oblique")),
        character_spacing: attribute(attributes, "char-space-value").and_then(parse_float),
    }
}
