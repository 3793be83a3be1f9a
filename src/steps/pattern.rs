//! Step templates with typed placeholders, compiled to anchored regexes.

use std::fmt;

use regex::Regex;

use crate::steps::StepError;

/// Placeholder kinds accepted inside `{...}` in a step template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `{string}`: double-quoted text, quotes not captured.
    Str,
    /// `{int}`: optionally signed decimal integer.
    Int,
    /// `{word}`: a run of non-blank characters.
    Word,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Placeholder::Str),
            "int" => Some(Placeholder::Int),
            "word" => Some(Placeholder::Word),
            _ => None,
        }
    }

    fn regex(self) -> &'static str {
        match self {
            Placeholder::Str => r#""([^"]*)""#,
            Placeholder::Int => r"(-?\d+)",
            Placeholder::Word => r"(\S+)",
        }
    }

    /// Whether `token` is a complete value for this placeholder.
    fn accepts(self, token: &str) -> bool {
        match self {
            Placeholder::Str => {
                token.len() >= 2
                    && token.starts_with('"')
                    && token.ends_with('"')
                    && !token[1..token.len() - 1].contains('"')
            }
            Placeholder::Int => token.parse::<i64>().is_ok(),
            Placeholder::Word => !token.is_empty() && !token.contains(char::is_whitespace),
        }
    }

    /// Text that this placeholder accepts, used to test other patterns.
    fn sample(self) -> &'static str {
        match self {
            Placeholder::Str => "\"x\"",
            Placeholder::Int => "0",
            Placeholder::Word => "x",
        }
    }
}

/// A value captured from step text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    Str(String),
    Int(i64),
    Word(String),
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capture::Str(s) => write!(f, "\"{}\"", s),
            Capture::Int(n) => write!(f, "{}", n),
            Capture::Word(w) => f.write_str(w),
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// A compiled step template.
#[derive(Debug, Clone)]
pub struct StepPattern {
    template: String,
    segments: Vec<Segment>,
    regex: Regex,
}

impl StepPattern {
    /// Compile `template`. Surrounding whitespace is trimmed and inner runs
    /// of whitespace outside quotes collapse to one space before compiling.
    pub fn compile(template: &str) -> Result<Self, StepError> {
        let template = normalize(template);
        if template.is_empty() {
            return Err(StepError::InvalidTemplate {
                template,
                reason: "template is empty".to_string(),
            });
        }

        let mut segments = Vec::new();
        let mut rest = template.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                return Err(StepError::InvalidTemplate {
                    template: template.clone(),
                    reason: "unclosed '{'".to_string(),
                });
            };
            let name = &rest[open + 1..open + close];
            let Some(slot) = Placeholder::parse(name) else {
                return Err(StepError::InvalidTemplate {
                    template: template.clone(),
                    reason: format!("unknown placeholder '{{{}}}'", name),
                });
            };
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            segments.push(Segment::Slot(slot));
            rest = &rest[open + close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        let mut source = String::from("^");
        for segment in &segments {
            match segment {
                Segment::Literal(text) => source.push_str(&regex::escape(text)),
                Segment::Slot(slot) => source.push_str(slot.regex()),
            }
        }
        source.push('$');
        let regex = Regex::new(&source)?;

        Ok(Self {
            template,
            segments,
            regex,
        })
    }

    /// The normalized template text.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(p) => Some(*p),
            Segment::Literal(_) => None,
        })
    }

    /// The template with every placeholder replaced by a value it accepts.
    pub fn sample(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.as_str(),
                Segment::Slot(p) => p.sample(),
            })
            .collect()
    }

    /// Samples where one placeholder at a time is filled with a literal
    /// token of `other`. These catch overlaps the plain sample misses, such
    /// as `{word} open` against `the {word}`.
    pub fn samples_crossed_with(&self, other: &StepPattern) -> Vec<String> {
        let tokens = other.literal_tokens();
        let mut samples = Vec::new();
        for (index, segment) in self.segments.iter().enumerate() {
            let Segment::Slot(slot) = segment else {
                continue;
            };
            for token in tokens.iter().filter(|t| slot.accepts(t)) {
                let text: String = self
                    .segments
                    .iter()
                    .enumerate()
                    .map(|(i, s)| match s {
                        _ if i == index => token.as_str(),
                        Segment::Literal(text) => text.as_str(),
                        Segment::Slot(p) => p.sample(),
                    })
                    .collect();
                samples.push(text);
            }
        }
        samples
    }

    /// Whitespace-separated words of the literal text, plus each quoted span
    /// with its quotes.
    fn literal_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        for segment in &self.segments {
            let Segment::Literal(text) = segment else {
                continue;
            };
            tokens.extend(text.split_whitespace().map(str::to_string));
            tokens.extend(
                text.split('"')
                    .skip(1)
                    .step_by(2)
                    .map(|quoted| format!("\"{}\"", quoted)),
            );
        }
        tokens.sort();
        tokens.dedup();
        tokens
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(&normalize(text))
    }

    /// Captured values when `text` matches the whole template. An `{int}`
    /// that overflows `i64` is treated as no match.
    pub fn captures(&self, text: &str) -> Option<Vec<Capture>> {
        let text = normalize(text);
        let caps = self.regex.captures(&text)?;
        let mut values = Vec::new();
        for (i, slot) in self.placeholders().enumerate() {
            let raw = caps.get(i + 1)?.as_str();
            let value = match slot {
                Placeholder::Str => Capture::Str(raw.to_string()),
                Placeholder::Int => Capture::Int(raw.parse().ok()?),
                Placeholder::Word => Capture::Word(raw.to_string()),
            };
            values.push(value);
        }
        Some(values)
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Trim and collapse whitespace runs to single spaces. Text between double
/// quotes is kept as written, so `{string}` captures see the exact value.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quoted = false;
    let mut gap = false;
    for c in text.trim().chars() {
        if quoted {
            out.push(c);
            quoted = c != '"';
            continue;
        }
        if c.is_whitespace() {
            gap = true;
            continue;
        }
        if gap {
            out.push(' ');
            gap = false;
        }
        quoted = c == '"';
        out.push(c);
    }
    out
}
