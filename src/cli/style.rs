//! Terminal styling for command output
//!
//! Output is tagged with a [`Tone`]; `owo-colors` decides per stream whether
//! the tone is rendered (`NO_COLOR`, `CLICOLOR_FORCE`, TTY checks).

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream, Style};
use std::fmt::{self, Display};
use std::sync::OnceLock;

/// Meaning of a piece of output, mapped to a color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Plan ids, counts, names
    Accent,
    /// Completed requests
    Done,
    /// Failed batches and fatal errors
    Failure,
    /// Partial failures
    Caution,
    /// Fragment details and hints
    Muted,
    /// Batch headers
    Heading,
}

impl Tone {
    const fn style(self) -> Style {
        match self {
            Self::Accent => Style::new().cyan(),
            Self::Done => Style::new().green(),
            Self::Failure => Style::new().red(),
            Self::Caution => Style::new().yellow(),
            Self::Muted => Style::new().dimmed(),
            Self::Heading => Style::new().bold(),
        }
    }

    /// Stream whose color support decides rendering by default
    const fn stream(self) -> Stream {
        match self {
            Self::Failure | Self::Caution => Stream::Stderr,
            _ => Stream::Stdout,
        }
    }
}

/// A value with a tone, colored only when its stream supports it
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    tone: Tone,
    stream: Stream,
}

impl<T> Styled<T> {
    const fn new(value: T, tone: Tone) -> Self {
        Self {
            value,
            tone,
            stream: tone.stream(),
        }
    }

    /// Render for stderr regardless of the tone's default stream
    #[must_use]
    pub const fn for_stderr(mut self) -> Self {
        self.stream = Stream::Stderr;
        self
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.tone.style();
        write!(
            f,
            "{}",
            self.value.if_supports_color(self.stream, |v| v.style(style))
        )
    }
}

/// Tone shortcuts for anything displayable
pub trait Stylize: Display {
    /// Tag with an arbitrary tone
    fn tone(&self, tone: Tone) -> Styled<&Self> {
        Styled::new(self, tone)
    }

    /// [`Tone::Accent`]
    fn accent(&self) -> Styled<&Self> {
        self.tone(Tone::Accent)
    }

    /// [`Tone::Failure`]
    fn error(&self) -> Styled<&Self> {
        self.tone(Tone::Failure)
    }

    /// [`Tone::Caution`]
    fn warn(&self) -> Styled<&Self> {
        self.tone(Tone::Caution)
    }

    /// [`Tone::Muted`]
    fn muted(&self) -> Styled<&Self> {
        self.tone(Tone::Muted)
    }

    /// [`Tone::Heading`]
    fn emphasis(&self) -> Styled<&Self> {
        self.tone(Tone::Heading)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// `✓` for a created or updated plan
pub const fn check() -> Styled<&'static str> {
    Styled::new("✓", Tone::Done)
}

/// `✗` before a failed batch
pub const fn cross() -> Styled<&'static str> {
    Styled::new("✗", Tone::Failure)
}

/// `!` before a partial-failure summary
pub const fn warning() -> Styled<&'static str> {
    Styled::new("!", Tone::Caution)
}

/// `○` before a fragment line
pub const fn bullet() -> Styled<&'static str> {
    Styled::new("○", Tone::Muted)
}

/// Spinner shown while pages are fetched
pub fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("hardcoded spinner template is valid")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        })
        .clone()
}

/// Bar advanced once per batch attempt
pub fn batch_bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::default_bar()
                .template("{bar:30.cyan/blue} {pos}/{len} batches {msg}")
                .expect("hardcoded bar template is valid")
                .progress_chars("=> ")
        })
        .clone()
}
