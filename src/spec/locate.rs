//! Maps document paths such as `$.deps.api.mayDependOn[1]` to source lines.
//!
//! This is an indentation scanner, not a YAML parser. It understands block
//! mappings, block sequences and inline flow collections, which is all the arch
//! file format uses. Inline collections resolve to the line of their key.

use crate::annotated::Reference;

/// Lines of context rendered above and below the target line.
const EXCERPT_CONTEXT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    indent: usize,
    text: &'a str,
}

/// Resolves references against the raw arch file text.
#[derive(Debug)]
pub struct SourceLocator<'a> {
    raw: Vec<&'a str>,
    lines: Vec<Option<Line<'a>>>,
}

impl<'a> SourceLocator<'a> {
    pub fn new(source: &'a str) -> Self {
        let raw: Vec<&str> = source.lines().collect();
        let lines = raw
            .iter()
            .map(|line| {
                let trimmed = line.trim_start();
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" {
                    None
                } else {
                    Some(Line {
                        indent: line.len() - trimmed.len(),
                        text: trimmed,
                    })
                }
            })
            .collect();

        Self { raw, lines }
    }

    /// Build a [`Reference`] for `path`, with line and excerpt when found.
    pub fn reference(&self, path: &str) -> Reference {
        match self.find_line(path) {
            Some(idx) => Reference::new(path, Some(idx + 1), Some(self.excerpt(idx))),
            None => Reference::unresolved(path),
        }
    }

    /// 0-based index of the line holding `path`.
    fn find_line(&self, path: &str) -> Option<usize> {
        let segments = parse_path(path)?;

        // Search window [start, end) and the indentation of the owning node.
        let mut start = 0;
        let mut end = self.lines.len();
        let mut owner_indent: Option<usize> = None;
        let mut found: Option<usize> = None;

        for segment in &segments {
            if let Some(idx) = found {
                if self.is_inline(idx) {
                    // Everything below an inline collection lives on this line.
                    return Some(idx);
                }
            }

            let idx = match segment {
                Segment::Key(key) => self.find_key(start, end, owner_indent, key)?,
                Segment::Index(n) => self.find_item(start, end, owner_indent, *n)?,
            };
            let line = self.lines[idx]?;

            // Keys written on a sequence item line ("- key: v") belong to the
            // item's content column.
            let indent = match segment {
                Segment::Index(_) => line.indent,
                Segment::Key(_) => self.content_indent(idx),
            };

            found = Some(idx);
            owner_indent = Some(indent);
            match segment {
                Segment::Key(_) => {
                    start = idx + 1;
                    end = self.block_end(idx, indent);
                }
                Segment::Index(_) => {
                    // Item content may start on the same line ("- key: v").
                    start = idx;
                    end = self.item_end(idx, indent);
                }
            }
        }

        found.or_else(|| self.first_content_line())
    }

    fn first_content_line(&self) -> Option<usize> {
        self.lines.iter().position(Option::is_some)
    }

    fn find_key(&self, start: usize, end: usize, owner: Option<usize>, key: &str) -> Option<usize> {
        let child_indent = self.child_indent(start, end, owner)?;

        (start..end).find(|&idx| match self.lines[idx] {
            Some(line) => {
                let (indent, text) = strip_item_marker(line);
                indent == child_indent && key_of(text) == Some(key)
            }
            None => false,
        })
    }

    fn find_item(&self, start: usize, end: usize, owner: Option<usize>, n: usize) -> Option<usize> {
        let items: Vec<usize> = (start..end)
            .filter(|&idx| match self.lines[idx] {
                Some(line) => is_item(line.text) && owner.map_or(true, |o| line.indent >= o),
                None => false,
            })
            .collect();

        let item_indent = items.first().and_then(|&idx| self.lines[idx]).map(|l| l.indent)?;
        items
            .into_iter()
            .filter(|&idx| self.lines[idx].is_some_and(|l| l.indent == item_indent))
            .nth(n)
    }

    /// Indentation of the first child entry in the window.
    fn child_indent(&self, start: usize, end: usize, owner: Option<usize>) -> Option<usize> {
        (start..end).find_map(|idx| {
            let line = self.lines[idx]?;
            let (indent, _) = strip_item_marker(line);
            match owner {
                Some(o) if indent <= o => None,
                _ => Some(indent),
            }
        })
    }

    /// Column of the mapping content on `idx`, skipping a leading `- `.
    fn content_indent(&self, idx: usize) -> usize {
        self.lines[idx].map_or(0, |line| strip_item_marker(line).0)
    }

    /// First line after `idx` that is no longer nested under it.
    fn block_end(&self, idx: usize, indent: usize) -> usize {
        ((idx + 1)..self.lines.len())
            .find(|&next| match self.lines[next] {
                Some(line) => {
                    line.indent < indent || (line.indent == indent && !is_item(line.text))
                }
                None => false,
            })
            .unwrap_or(self.lines.len())
    }

    /// First line after the sequence item on `idx` that starts a sibling or
    /// leaves the sequence.
    fn item_end(&self, idx: usize, indent: usize) -> usize {
        ((idx + 1)..self.lines.len())
            .find(|&next| self.lines[next].is_some_and(|line| line.indent <= indent))
            .unwrap_or(self.lines.len())
    }

    /// True when the value on `idx` is an inline scalar or flow collection.
    fn is_inline(&self, idx: usize) -> bool {
        let Some(line) = self.lines[idx] else {
            return false;
        };
        let (_, text) = strip_item_marker(line);
        match text.split_once(':') {
            Some((_, rest)) => {
                let rest = strip_comment(rest).trim();
                !rest.is_empty() && !rest.starts_with('&')
            }
            None => is_item(line.text),
        }
    }

    fn excerpt(&self, idx: usize) -> String {
        let first = idx.saturating_sub(EXCERPT_CONTEXT);
        let last = (idx + EXCERPT_CONTEXT).min(self.raw.len().saturating_sub(1));
        let width = (last + 1).to_string().len();

        (first..=last)
            .map(|n| {
                let marker = if n == idx { ">" } else { " " };
                format!("{} {:>width$} | {}", marker, n + 1, self.raw[n], width = width)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let rest = path.strip_prefix('$')?;
    let mut segments = Vec::new();

    for part in rest.split('.').filter(|p| !p.is_empty()) {
        let (key, indexes) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };
        if !key.is_empty() {
            segments.push(Segment::Key(key.to_string()));
        }
        for index in indexes.split('[').filter(|s| !s.is_empty()) {
            let n = index.trim_end_matches(']').parse().ok()?;
            segments.push(Segment::Index(n));
        }
    }

    Some(segments)
}

fn is_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

/// Indentation and text of a line with any `- ` item marker removed.
fn strip_item_marker(line: Line<'_>) -> (usize, &str) {
    if !is_item(line.text) {
        return (line.indent, line.text);
    }
    let rest = &line.text[1..];
    let content = rest.trim_start();
    (line.indent + line.text.len() - content.len(), content)
}

/// Key of a `key: value` line, without quotes.
fn key_of(text: &str) -> Option<&str> {
    let (key, _) = text.split_once(':')?;
    let key = key.trim();
    Some(
        key.strip_prefix('"')
            .and_then(|k| k.strip_suffix('"'))
            .or_else(|| key.strip_prefix('\'').and_then(|k| k.strip_suffix('\'')))
            .unwrap_or(key),
    )
}

fn strip_comment(text: &str) -> &str {
    match text.find(" #") {
        Some(pos) => &text[..pos],
        None => text,
    }
}
