use regex::Regex;

#[derive(Debug, Clone)]
pub enum CharClass {
    Digit,
    Alpha,
    Alnum,
    Any,
    OneOf(Vec<char>),
    Pattern(Regex),
}

impl CharClass {
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            Self::Digit => ch.is_ascii_digit(),
            Self::Alpha => ch.is_ascii_alphabetic(),
            Self::Alnum => ch.is_ascii_alphanumeric(),
            Self::Any => true,
            Self::OneOf(set) => set.contains(&ch),
            Self::Pattern(re) => {
                let mut buf = [0u8; 4];
                re.is_match(ch.encode_utf8(&mut buf))
            }
        }
    }
}

impl PartialEq for CharClass {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Digit, Self::Digit)
            | (Self::Alpha, Self::Alpha)
            | (Self::Alnum, Self::Alnum)
            | (Self::Any, Self::Any) => true,
            (Self::OneOf(a), Self::OneOf(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseTransform {
    #[default]
    None,
    Upper,
    Lower,
}

impl CaseTransform {
    fn apply(self, ch: char) -> char {
        match self {
            Self::None => ch,
            Self::Upper => ch.to_uppercase().next().unwrap_or(ch),
            Self::Lower => ch.to_lowercase().next().unwrap_or(ch),
        }
    }
}

/// A single-character validator. `hint` is the glyph shown by
/// [`MaskSpec::template`] for the slot (`M` in `MM/DD/YYYY`).
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub class: CharClass,
    pub transform: CaseTransform,
    pub hint: Option<char>,
}

impl Slot {
    pub fn new(class: CharClass) -> Self {
        Self {
            class,
            transform: CaseTransform::None,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: char) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn with_transform(mut self, transform: CaseTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Returns the character to emit when `ch` fits this slot.
    pub fn conform(&self, ch: char) -> Option<char> {
        let ch = self.transform.apply(ch);
        self.class.accepts(ch).then_some(ch)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    Literal(char),
    Slot(Slot),
    /// Marks the position before the next matcher as a caret trap. Only valid
    /// in unresolved sequences.
    CaretTrap,
}

impl Matcher {
    pub fn literal(ch: char) -> Self {
        Self::Literal(ch)
    }

    pub fn digit() -> Self {
        Self::Slot(Slot::new(CharClass::Digit))
    }

    pub fn alpha() -> Self {
        Self::Slot(Slot::new(CharClass::Alpha))
    }

    pub fn alnum() -> Self {
        Self::Slot(Slot::new(CharClass::Alnum))
    }

    pub fn any() -> Self {
        Self::Slot(Slot::new(CharClass::Any))
    }

    pub fn one_of(chars: impl IntoIterator<Item = char>) -> Self {
        Self::Slot(Slot::new(CharClass::OneOf(chars.into_iter().collect())))
    }

    pub fn pattern(re: Regex) -> Self {
        Self::Slot(Slot::new(CharClass::Pattern(re)))
    }

    pub fn literals(text: &str) -> impl Iterator<Item = Matcher> + '_ {
        text.chars().map(Self::Literal)
    }

    pub fn is_slot(&self) -> bool {
        matches!(self, Self::Slot(_))
    }
}

impl From<Slot> for Matcher {
    fn from(slot: Slot) -> Self {
        Self::Slot(slot)
    }
}

/// A resolved pattern: matchers without trap markers plus the indices the
/// caret must not rest inside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskSpec {
    matchers: Vec<Matcher>,
    caret_traps: Vec<usize>,
}

impl MaskSpec {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Strips [`Matcher::CaretTrap`] markers, recording each one as the index
    /// of the matcher that follows it.
    pub fn from_matchers(raw: Vec<Matcher>) -> Self {
        let mut matchers = Vec::with_capacity(raw.len());
        let mut caret_traps = Vec::new();
        for matcher in raw {
            match matcher {
                Matcher::CaretTrap => caret_traps.push(matchers.len()),
                other => matchers.push(other),
            }
        }
        Self {
            matchers,
            caret_traps,
        }
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn caret_traps(&self) -> &[usize] {
        &self.caret_traps
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.matchers.iter().filter(|m| m.is_slot()).count()
    }

    /// Every slot rendered as `placeholder_char`, literals as themselves.
    pub fn placeholder(&self, placeholder_char: char) -> String {
        self.matchers
            .iter()
            .map(|matcher| match matcher {
                Matcher::Literal(ch) => *ch,
                _ => placeholder_char,
            })
            .collect()
    }

    /// Like [`placeholder`](Self::placeholder) but slots with a hint show it.
    pub fn template(&self, placeholder_char: char) -> String {
        self.matchers
            .iter()
            .map(|matcher| match matcher {
                Matcher::Literal(ch) => *ch,
                Matcher::Slot(slot) => slot.hint.unwrap_or(placeholder_char),
                Matcher::CaretTrap => placeholder_char,
            })
            .collect()
    }

    pub fn literal_collision(&self, placeholder_char: char) -> Option<char> {
        self.matchers.iter().find_map(|matcher| match matcher {
            Matcher::Literal(ch) if *ch == placeholder_char => Some(*ch),
            _ => None,
        })
    }
}

/// Char offsets into the raw value. `end` doubles as the caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn caret(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceResult {
    /// The value the host should show and store.
    pub conformed_value: String,
    /// Same length as the matcher sequence.
    pub placeholder: String,
    /// Output of the pipe, when one ran and did not reject.
    pub piped_value: Option<String>,
    pub caret_pos: usize,
    pub caret_trap_indexes: Vec<usize>,
    /// Some raw characters were dropped. A literal typed just after the
    /// scan emitted it confirms that literal and does not count.
    pub rejected: bool,
    /// The pipe vetoed the edit and the previous value was kept.
    pub pipe_rejected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_trap_markers_become_indexes() {
        let spec = MaskSpec::from_matchers(vec![
            Matcher::digit(),
            Matcher::CaretTrap,
            Matcher::literal('.'),
            Matcher::CaretTrap,
            Matcher::digit(),
        ]);
        assert_eq!(spec.len(), 3);
        assert_eq!(spec.caret_traps(), &[1, 2]);
        assert_eq!(spec.placeholder('_'), "_._");
    }

    #[test]
    fn template_prefers_slot_hints() {
        let spec = MaskSpec::from_matchers(vec![
            Slot::new(CharClass::Digit).with_hint('M').into(),
            Matcher::literal('/'),
            Matcher::digit(),
        ]);
        assert_eq!(spec.template('_'), "M/_");
    }

    #[test]
    fn slot_transform_runs_before_the_class_test() {
        let slot = Slot::new(CharClass::OneOf(vec!['A', 'B'])).with_transform(CaseTransform::Upper);
        assert_eq!(slot.conform('a'), Some('A'));
        assert_eq!(slot.conform('c'), None);
    }

    #[test]
    fn pattern_class_tests_single_chars() {
        let class = CharClass::Pattern(Regex::new("[0-9a-f]").expect("regex"));
        assert!(class.accepts('c'));
        assert!(!class.accepts('g'));
        assert_eq!(class, CharClass::Pattern(Regex::new("[0-9a-f]").expect("regex")));
    }

    #[test]
    fn selection_normalizes_order() {
        assert_eq!(Selection::new(5, 2), Selection { start: 2, end: 5 });
        assert!(Selection::caret(3).is_empty());
    }
}
