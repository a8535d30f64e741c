use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::sentence::Sentence;
use crate::token::Head;

/// Renders a sentence with its dependency edges and clauses underneath.
///
/// ```text
/// Öö  oli  tuuletu  .
/// ╰─────╯@SUBJ(Öö─>oli)
///     ╰─╯@FMV(oli─>ROOT)
///     ╰──────────╯@PRD(tuuletu─>oli)
///     ╰─────────────╯@Punc(.─>oli)
/// ╰─────────────────╯Clause(0)
/// ```
///
/// An edge spans from the leftmost to the rightmost of its two tokens; a
/// root edge spans its dependent only.
pub struct SentenceDisplay<'a> {
    sentence: &'a Sentence,
    show_edges: bool,
    show_clauses: bool,
}

impl<'a> SentenceDisplay<'a> {
    pub fn new(sentence: &'a Sentence) -> Self {
        SentenceDisplay {
            sentence,
            show_edges: false,
            show_clauses: false,
        }
    }

    pub fn include_edges(&mut self) -> &mut Self {
        self.show_edges = true;
        self
    }

    pub fn include_clauses(&mut self) -> &mut Self {
        self.show_clauses = true;
        self
    }
}

impl<'a> std::fmt::Display for SentenceDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let tokens = &self.sentence.tokens;
        let mut starts = Vec::with_capacity(tokens.len());
        let mut ends = Vec::with_capacity(tokens.len());

        let mut opening_line = String::new();
        for (idx, token) in tokens.iter().enumerate() {
            if idx > 0 {
                opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            }
            starts.push(UnicodeWidthStr::width(&*opening_line));
            opening_line.push_str(&token.text);
            ends.push(UnicodeWidthStr::width(&*opening_line));
        }
        f.write_str(&opening_line)?;

        let mut spans: Vec<(usize, usize, String)> = Vec::new();

        if self.show_edges {
            for (idx, token) in tokens.iter().enumerate() {
                let Some(edge) = token.edges.first() else {
                    continue;
                };
                match edge.head {
                    Head::Index(head) if head < tokens.len() => {
                        spans.push((
                            starts[idx.min(head)],
                            ends[idx.max(head)],
                            format!("{}({}─>{})", edge.label, token.text, tokens[head].text),
                        ));
                    }
                    Head::Index(head) => {
                        spans.push((starts[idx], ends[idx], format!("{}({}─>#{})", edge.label, token.text, head)));
                    }
                    Head::Root => {
                        spans.push((starts[idx], ends[idx], format!("{}({}─>ROOT)", edge.label, token.text)));
                    }
                }
            }
        }

        if self.show_clauses {
            for clause in self.sentence.clauses() {
                let (Some(first), Some(last)) = (clause.members.first(), clause.members.last()) else {
                    continue;
                };
                let kind = if clause.embedded { "EmbeddedClause" } else { "Clause" };
                spans.push((starts[*first], ends[*last], format!("{}({})", kind, clause.index)));
            }
        }

        for (start_char_idx, end_char_idx, value) in spans {
            f.write_char('\n')?;
            for _ in 0..start_char_idx {
                f.write_char(' ')?;
            }
            f.write_char('╰')?;
            for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end_char_idx - start_char_idx > 1 {
                f.write_char('╯')?;
            }
            f.write_str(&value)?;
        }

        Ok(())
    }
}
