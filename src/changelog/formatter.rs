//! Canonical whitespace for changelog text.
//!
//! [`format`] is idempotent: `format(&format(x)) == format(x)`.

use super::parser::{classify, is_heading, Line};

/// Canonical first attribution sentence
pub const KEEP_A_CHANGELOG_LINE: &str =
    "The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.1.0/),";

/// Canonical second attribution sentence
pub const SEMVER_LINE: &str =
    "and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).";

const INTRO_PREFIX: &str = "All notable changes";

struct Output {
    lines: Vec<String>,
}

impl Output {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Push a blank line unless at the start or after another blank
    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn last_is_link(&self) -> bool {
        self.lines
            .last()
            .is_some_and(|l| matches!(classify(l), Line::LinkReference { .. }))
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Wrapped attribution lines seen since the Keep a Changelog line
///
/// The block closes on the Semantic Versioning line. If it closes on anything
/// else the fragments are written back as they were.
#[derive(Default)]
struct Attribution {
    open: bool,
    fragments: Vec<String>,
}

impl Attribution {
    fn flush(&mut self, out: &mut Output) {
        if self.open {
            self.open = false;
            for fragment in self.fragments.drain(..) {
                out.push(fragment);
            }
        }
    }
}

/// Rewrite changelog text into canonical form
///
/// - one blank line around every heading and after the intro sentence
/// - attribution lines replaced by [`KEEP_A_CHANGELOG_LINE`] / [`SEMVER_LINE`]
/// - blank runs collapsed, trailing whitespace dropped
/// - exactly one trailing newline
pub fn format(text: &str) -> String {
    let mut out = Output { lines: Vec::new() };
    let mut attribution = Attribution::default();
    let mut in_preamble = true;
    let mut in_intro = false;

    for raw in text.lines() {
        let line = raw.trim_end();

        if line.is_empty() {
            attribution.flush(&mut out);
            out.blank();
            continue;
        }

        if line.starts_with("## ") {
            in_preamble = false;
        }

        if is_heading(line) {
            attribution.flush(&mut out);
            in_intro = false;
            out.blank();
            out.push(line);
            out.blank();
            continue;
        }

        if matches!(classify(line), Line::LinkReference { .. }) {
            attribution.flush(&mut out);
            if !out.last_is_link() {
                out.blank();
            }
            out.push(line);
            continue;
        }

        if in_preamble {
            let has_kac = line.contains("Keep a Changelog");
            let has_semver = line.contains("Semantic Versioning");

            if attribution.open && !has_kac {
                if has_semver {
                    attribution.open = false;
                    attribution.fragments.clear();
                    out.push(SEMVER_LINE);
                    out.blank();
                } else {
                    attribution.fragments.push(line.to_string());
                }
                continue;
            }

            if has_kac || has_semver {
                attribution.flush(&mut out);
                in_intro = false;
                if has_kac {
                    out.blank();
                    out.push(KEEP_A_CHANGELOG_LINE);
                }
                if has_semver {
                    out.push(SEMVER_LINE);
                    out.blank();
                } else {
                    attribution.open = true;
                }
                continue;
            }

            if line.starts_with(INTRO_PREFIX) {
                in_intro = true;
            }
            if in_intro {
                out.push(line);
                if line.ends_with('.') {
                    in_intro = false;
                    out.blank();
                }
                continue;
            }
        }

        out.push(line);
    }

    attribution.flush(&mut out);
    out.finish()
}
