//! Text cleaning passes applied to extracted page text
//!
//! Each pass takes the full ordered page list and returns it transformed. Passes
//! never add or drop pages; a page whose text becomes empty stays in the list and
//! simply yields no chunks later.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::types::PageData;

/// A cleaning pass over the whole page list
pub type CleaningPass = fn(Vec<PageData>) -> Vec<PageData>;

fn hyphen_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b-\n(\p{Ll})").expect("valid hyphen regex"))
}

fn newline_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid newline regex"))
}

fn map_text(pages: Vec<PageData>, f: impl Fn(&str) -> String) -> Vec<PageData> {
    pages
        .into_iter()
        .map(|page| PageData {
            text: f(&page.text),
            ..page
        })
        .collect()
}

/// Join words split across lines by a hyphen when the continuation is lowercase.
///
/// `"happi-\nness"` becomes `"happiness"`; `"multi-\nParty"` is left alone.
pub fn merge_hyphenated_words(pages: Vec<PageData>) -> Vec<PageData> {
    map_text(pages, |text| {
        hyphen_break().replace_all(text, "${1}").into_owned()
    })
}

/// Replace every lone line break with a space. Runs of two or more are kept.
pub fn fix_newlines(pages: Vec<PageData>) -> Vec<PageData> {
    map_text(pages, join_single_newlines)
}

/// Collapse runs of three or more line breaks to exactly two.
pub fn remove_multiple_newlines(pages: Vec<PageData>) -> Vec<PageData> {
    map_text(pages, |text| newline_run().replace_all(text, "\n\n").into_owned())
}

/// Trim leading and trailing whitespace.
pub fn trim_whitespace(pages: Vec<PageData>) -> Vec<PageData> {
    map_text(pages, |text| text.trim().to_string())
}

fn join_single_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let lone_newline = c == '\n' && prev != Some('\n') && chars.peek() != Some(&'\n');
        out.push(if lone_newline { ' ' } else { c });
        prev = Some(c);
    }

    out
}

/// Fold the pages through `passes` in order.
pub fn clean_text(pages: Vec<PageData>, passes: &[CleaningPass]) -> Vec<PageData> {
    passes.iter().fold(pages, |pages, pass| pass(pages))
}

/// A named cleaning pass, selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStep {
    MergeHyphenatedWords,
    FixNewlines,
    RemoveMultipleNewlines,
    TrimWhitespace,
}

impl CleaningStep {
    /// The order the pipeline uses unless configured otherwise
    pub const fn default_order() -> &'static [CleaningStep] {
        &[
            Self::MergeHyphenatedWords,
            Self::FixNewlines,
            Self::RemoveMultipleNewlines,
            Self::TrimWhitespace,
        ]
    }

    /// The function implementing this step
    pub fn pass(self) -> CleaningPass {
        match self {
            Self::MergeHyphenatedWords => merge_hyphenated_words,
            Self::FixNewlines => fix_newlines,
            Self::RemoveMultipleNewlines => remove_multiple_newlines,
            Self::TrimWhitespace => trim_whitespace,
        }
    }
}

/// Configured, ordered list of cleaning passes
#[derive(Debug, Clone)]
pub struct TextCleaner {
    steps: Vec<CleaningStep>,
}

impl TextCleaner {
    /// Create a cleaner running `steps` in the given order
    pub fn new(steps: Vec<CleaningStep>) -> Self {
        Self { steps }
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[CleaningStep] {
        &self.steps
    }

    /// Run every configured pass over the pages
    pub fn clean(&self, pages: Vec<PageData>) -> Vec<PageData> {
        let passes: Vec<CleaningPass> = self.steps.iter().map(|step| step.pass()).collect();
        clean_text(pages, &passes)
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new(CleaningStep::default_order().to_vec())
    }
}
