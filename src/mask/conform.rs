use super::model::{MaskSpec, Matcher};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
pub struct ConformContext<'a> {
    pub previous_conformed_value: &'a str,
    /// Caret after the edit (selection end), in chars.
    pub caret: usize,
    pub guide: bool,
    pub keep_character_positions: bool,
    pub placeholder_char: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conformed {
    pub value: String,
    pub placeholder: String,
    pub rejected: bool,
}

#[derive(Debug, Clone, Copy)]
struct RawChar {
    ch: char,
    /// Inside the region the user just typed or pasted.
    is_new: bool,
}

/// Fits `raw` into `spec`.
///
/// Characters outside the edited region are the previous conformed value and
/// are only re-fitted, never re-interpreted; literals typed at their own
/// position count as confirmation and are dropped before the scan. The scan
/// fills the leftmost open slot first and silently drops characters a slot
/// rejects.
pub fn conform_to_mask(raw: &str, spec: &MaskSpec, ctx: &ConformContext<'_>) -> Conformed {
    let pc = ctx.placeholder_char;
    let placeholder_str = spec.placeholder(pc);
    if spec.is_empty() {
        return Conformed {
            value: raw.to_string(),
            placeholder: placeholder_str,
            rejected: false,
        };
    }

    let placeholder: Vec<char> = placeholder_str.chars().collect();
    let matchers = spec.matchers();
    let mut raw_chars: Vec<char> = raw.chars().collect();
    let previous_len = ctx.previous_conformed_value.chars().count() as isize;
    let suppress_guide = !ctx.guide;

    let edit_distance = raw_chars.len() as isize - previous_len;
    let is_addition = edit_distance > 0;
    let caret = ctx.caret.min(raw_chars.len()) as isize;
    let first_change = (caret - if is_addition { edit_distance } else { 0 }).max(0);
    let last_change = first_change + edit_distance.abs();

    if ctx.keep_character_positions && !is_addition {
        let compensating = (first_change..last_change)
            .filter(|idx| placeholder.get(*idx as usize) == Some(&pc))
            .count();
        let at = (first_change as usize).min(raw_chars.len());
        let tail = raw_chars.split_off(at);
        raw_chars.extend(std::iter::repeat_n(pc, compensating));
        raw_chars.extend(tail);
    }

    let mut pending: VecDeque<RawChar> = raw_chars
        .iter()
        .enumerate()
        .map(|(idx, ch)| RawChar {
            ch: *ch,
            is_new: (idx as isize) >= first_change && (idx as isize) < last_change,
        })
        .collect();

    let filled_previously = previous_len == placeholder.len() as isize;
    for idx in (0..pending.len()).rev() {
        let ch = pending[idx].ch;
        if ch == pc {
            continue;
        }
        let shifted = (idx as isize) >= first_change && filled_previously;
        let at = if shifted {
            idx as isize - edit_distance
        } else {
            idx as isize
        };
        let is_confirmation = usize::try_from(at)
            .ok()
            .and_then(|at| placeholder.get(at))
            .is_some_and(|literal| *literal == ch);
        if is_confirmation {
            pending.remove(idx);
        }
    }

    let mut out: Vec<char> = Vec::with_capacity(placeholder.len());
    let mut rejected = false;
    // A literal just emitted by the scan; one matching raw char confirms it.
    let mut last_literal: Option<char> = None;
    let mut idx = 0usize;

    'placeholder: while idx < placeholder.len() {
        let slot = match &matchers[idx] {
            Matcher::Slot(slot) => slot,
            _ => {
                out.push(placeholder[idx]);
                last_literal = Some(placeholder[idx]);
                idx += 1;
                continue;
            }
        };

        while let Some(next) = pending.pop_front() {
            if next.ch == pc && !suppress_guide {
                last_literal = None;
                out.push(pc);
                idx += 1;
                continue 'placeholder;
            }

            let Some(accepted) = slot.conform(next.ch) else {
                if last_literal.take() != Some(next.ch) {
                    rejected = true;
                }
                continue;
            };
            last_literal = None;

            let overwrite_in_place = ctx.keep_character_positions
                && next.is_new
                && !ctx.previous_conformed_value.is_empty()
                && ctx.guide
                && is_addition;
            if !overwrite_in_place {
                out.push(accepted);
                idx += 1;
                continue 'placeholder;
            }

            // Only an open slot inside the freshly typed run may be taken;
            // otherwise retry the same slot with the next character.
            let open = pending
                .iter()
                .take_while(|c| c.ch == pc || c.is_new)
                .position(|c| c.ch == pc);
            if let Some(open) = open {
                out.push(accepted);
                pending.remove(open);
                idx += 1;
            }
            continue 'placeholder;
        }

        if !suppress_guide {
            out.extend_from_slice(&placeholder[idx..]);
        }
        break;
    }

    if suppress_guide && !is_addition {
        let last_filled = (0..out.len()).rev().find(|idx| matchers[*idx].is_slot());
        out.truncate(last_filled.map_or(0, |idx| idx + 1));
    }

    Conformed {
        value: out.into_iter().collect(),
        placeholder: placeholder_str,
        rejected,
    }
}
