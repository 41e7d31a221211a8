/// Everything the caret adjuster needs. Offsets are in chars.
#[derive(Debug, Clone, Copy)]
pub struct CaretArgs<'a> {
    pub raw_value: &'a str,
    pub conformed_value: &'a str,
    pub placeholder: &'a str,
    pub previous_placeholder: &'a str,
    pub previous_conformed_value: &'a str,
    /// Where the host left the caret after the edit.
    pub current_caret_position: usize,
    pub placeholder_char: char,
    pub indexes_of_piped_chars: &'a [usize],
    pub caret_trap_indexes: &'a [usize],
}

fn chars(value: &str) -> Vec<char> {
    value.chars().collect()
}

fn fold(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

/// Places the caret after a conformance pass. Pure: the result depends only
/// on `args` and is always within `0..=conformed_value.len()`.
///
/// The caret follows the last raw character to its left that survives into
/// the conformed value. After an insertion it then skips forward over literals
/// to the next open slot; after a deletion it backs up to just behind the
/// nearest slot. Caret traps stop both walks.
pub fn adjust_caret_position(args: &CaretArgs<'_>) -> usize {
    let conformed = chars(args.conformed_value);
    let position = locate(args, &conformed);
    position.min(conformed.len())
}

fn locate(args: &CaretArgs<'_>, conformed: &[char]) -> usize {
    let raw = chars(args.raw_value);
    if args.current_caret_position == 0 || raw.is_empty() {
        return 0;
    }

    let caret = args.current_caret_position.min(raw.len());
    let pc = args.placeholder_char;
    let placeholder = chars(args.placeholder);
    let previous_placeholder = chars(args.previous_placeholder);
    let previous_len = args.previous_conformed_value.chars().count();
    let traps = args.caret_trap_indexes;

    let edit_length = raw.len() as isize - previous_len as isize;
    let is_addition = edit_length > 0;
    let is_first_raw_value = previous_len == 0;

    // Several characters removed at once: the host already put the caret
    // where the selection collapsed.
    if edit_length < -1 && !is_first_raw_value {
        return caret;
    }

    let possibly_rejected = is_addition
        && (args.previous_conformed_value == args.conformed_value
            || args.conformed_value == args.placeholder);

    let mut search_start: isize = 0;
    let mut track_right = false;
    let mut target: Option<char> = None;

    if possibly_rejected {
        search_start = caret as isize - edit_length;
    } else {
        let folded_conformed: Vec<char> = conformed.iter().copied().map(fold).collect();
        let intersection: Vec<char> = raw[..caret]
            .iter()
            .copied()
            .map(fold)
            .filter(|ch| folded_conformed.contains(ch))
            .collect();
        target = intersection.last().copied();
        let left = intersection.len();

        let previous_left_literals = previous_placeholder
            .iter()
            .take(left)
            .filter(|ch| **ch != pc)
            .count();
        let left_literals = placeholder.iter().take(left).filter(|ch| **ch != pc).count();
        let literals_shifted = left_literals != previous_left_literals;

        let literal_moved_left = left >= 2
            && match (previous_placeholder.get(left - 1), placeholder.get(left - 2)) {
                (Some(prev), Some(now)) => {
                    *prev != pc && placeholder.get(left - 1) != Some(prev) && prev == now
                }
                _ => false,
            };

        if !is_addition
            && (literals_shifted || literal_moved_left)
            && previous_left_literals > 0
            && target.is_some_and(|t| placeholder.contains(&t))
            && let Some(right) = raw.get(caret)
        {
            track_right = true;
            target = Some(fold(*right));
        }

        let in_piped = args
            .indexes_of_piped_chars
            .iter()
            .filter(|idx| folded_conformed.get(**idx).copied() == target)
            .count();
        let in_intersection = intersection
            .iter()
            .filter(|ch| Some(**ch) == target)
            .count();
        let first_open = placeholder.iter().position(|ch| *ch == pc).unwrap_or(0);
        let in_leading_literals = placeholder[..first_open]
            .iter()
            .enumerate()
            .filter(|(idx, ch)| Some(**ch) == target && raw.get(*idx) != Some(*ch))
            .count();

        let required = in_leading_literals + in_intersection + in_piped + usize::from(track_right);
        let mut encountered = 0usize;
        for (idx, ch) in folded_conformed.iter().enumerate() {
            search_start = idx as isize + 1;
            if Some(*ch) == target {
                encountered += 1;
            }
            if encountered >= required {
                break;
            }
        }
    }

    let start = search_start.max(0) as usize;

    if is_addition {
        let mut last_open = start;
        for idx in start..=placeholder.len() {
            let open = placeholder.get(idx) == Some(&pc);
            if open {
                last_open = idx;
            }
            if open || traps.contains(&idx) || idx == placeholder.len() {
                return last_open;
            }
        }
        return start;
    }

    if track_right {
        return (0..start)
            .rev()
            .find(|idx| {
                conformed.get(*idx).copied().map(fold) == target
                    || traps.contains(idx)
                    || *idx == 0
            })
            .unwrap_or(0);
    }

    (0..=start)
        .rev()
        .find(|idx| {
            (*idx > 0 && placeholder.get(idx - 1) == Some(&pc)) || traps.contains(idx) || *idx == 0
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: &str = "(___) ___-____";

    fn args<'a>(
        raw_value: &'a str,
        conformed_value: &'a str,
        previous_conformed_value: &'a str,
        current_caret_position: usize,
    ) -> CaretArgs<'a> {
        CaretArgs {
            raw_value,
            conformed_value,
            placeholder: PHONE,
            previous_placeholder: PHONE,
            previous_conformed_value,
            current_caret_position,
            placeholder_char: '_',
            indexes_of_piped_chars: &[],
            caret_trap_indexes: &[],
        }
    }

    #[test]
    fn full_entry_lands_at_the_end() {
        let a = args("5551234567", "(555) 123-4567", "", 10);
        assert_eq!(adjust_caret_position(&a), 14);
    }

    #[test]
    fn first_digit_skips_the_opening_literal() {
        let a = args("5", "(5__) ___-____", "", 1);
        assert_eq!(adjust_caret_position(&a), 2);
    }

    #[test]
    fn typing_before_a_literal_run_jumps_over_it() {
        let a = args("(555_) ___-____", "(555) ___-____", "(55_) ___-____", 4);
        assert_eq!(adjust_caret_position(&a), 6);
    }

    #[test]
    fn trailing_deletion_stays_put() {
        let a = args("(555) 123-456", "(555) 123-456", "(555) 123-4567", 13);
        assert_eq!(adjust_caret_position(&a), 13);
    }

    #[test]
    fn deletion_backs_over_literals() {
        let a = args("(555) 1_-____", "(555) 1__-____", "(555) 12_-____", 7);
        assert_eq!(adjust_caret_position(&a), 7);

        let a = args("(555) __-____", "(555) ___-____", "(555) 1__-____", 6);
        assert_eq!(adjust_caret_position(&a), 4);

        let a = args("(555)___-____", "(555) ___-____", "(555) ___-____", 5);
        assert_eq!(adjust_caret_position(&a), 4);
    }

    #[test]
    fn rejected_character_moves_to_the_next_open_slot() {
        let a = args("(555x) ___-____", "(555) ___-____", "(555) ___-____", 5);
        assert_eq!(adjust_caret_position(&a), 6);
    }

    #[test]
    fn caret_traps_stop_the_forward_walk() {
        let mut a = args("12.", "12._", "12", 3);
        a.placeholder = "__._";
        a.previous_placeholder = "__";
        a.caret_trap_indexes = &[2, 3];
        assert_eq!(adjust_caret_position(&a), 3);
    }

    #[test]
    fn multi_char_deletion_keeps_host_caret() {
        let a = args("(555) -4567", "(555) 456-7___", "(555) 123-4567", 6);
        assert_eq!(adjust_caret_position(&a), 6);
    }

    #[test]
    fn result_never_exceeds_conformed_length() {
        let a = args("555", "(5", "", 500);
        assert!(adjust_caret_position(&a) <= 2);
        let a = args("", "", "(5", 3);
        assert_eq!(adjust_caret_position(&a), 0);
    }
}
