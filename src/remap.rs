//! Rewriting sentence-scoped links into clause-scoped ones and back.
//!
//! Within a clause, a head keeps pointing at the same token but is expressed
//! as a position among the clause's own tokens. Links that leave the clause
//! become root links.

use crate::errors::{TreebankError, TreebankResult};
use crate::sentence::Sentence;
use crate::token::Head;

/// Clause-relative heads of every token, `None` for tokens without syntax.
///
/// All heads are computed against the unmodified sentence.
pub fn clause_relative_heads(sentence: &Sentence) -> TreebankResult<Vec<Option<Head>>> {
    let indices = sentence.clause_indices();
    let len = sentence.len();
    let mut mapped = Vec::with_capacity(len);

    for (wid, token) in sentence.tokens.iter().enumerate() {
        let parent = match token.head() {
            None => {
                mapped.push(None);
                continue;
            }
            Some(Head::Root) => {
                mapped.push(Some(Head::Root));
                continue;
            }
            Some(Head::Index(parent)) => parent,
        };

        let own_clause = indices[wid];
        let parent_clause = *indices.get(parent).ok_or_else(|| TreebankError::HeadOutOfBounds {
            sentence: sentence.id.clone(),
            token: wid,
            head: parent,
        })?;
        if parent_clause != own_clause {
            mapped.push(Some(Head::Root));
            continue;
        }

        let clause_start = indices.iter().position(|&clause| clause == own_clause).unwrap_or(wid);
        let mut scan = clause_start;
        let mut relative = 0;
        while scan < len && scan != parent {
            if indices[scan] == own_clause {
                relative += 1;
            }
            scan += 1;
        }
        if scan >= len {
            return Err(TreebankError::ClauseHeadNotFound {
                sentence: sentence.id.clone(),
                token: wid,
                head: parent,
            });
        }
        mapped.push(Some(Head::Index(relative)));
    }

    Ok(mapped)
}

/// Make every edge of `sentence` clause-scoped.
///
/// Every candidate edge of a token receives the new head.
pub fn clause_scoped_links(sentence: &mut Sentence) -> TreebankResult<()> {
    let heads = clause_relative_heads(sentence)?;
    for (token, head) in sentence.tokens.iter_mut().zip(heads) {
        if let Some(head) = head {
            token.edges.set_head(head);
        }
    }
    Ok(())
}

/// Translate a clause-relative head back to a sentence position.
///
/// `members` holds the sentence positions of the clause tokens, in order.
pub fn sentence_relative_head(members: &[usize], head: Head) -> Option<Head> {
    match head {
        Head::Root => Some(Head::Root),
        Head::Index(relative) => members.get(relative).map(|&position| Head::Index(position)),
    }
}
