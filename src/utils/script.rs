//! Japanese script classification helpers.
//!
//! Headwords are classified by script to decide whether they need a phonetic
//! reading (kanji) or may take a foreign-word alias as reading (katakana).

const KANJI_FIRST: char = '\u{4E00}';
const KANJI_LAST: char = '\u{9FFF}';
const KATAKANA_FIRST: char = '\u{30A1}'; // ァ
const KATAKANA_LAST: char = '\u{30F6}'; // ヶ
const PROLONGED_SOUND_MARK: char = 'ー';
const KATAKANA_MIDDLE_DOT: char = '・';

/// Returns `true` if `c` is a CJK Unified Ideograph.
#[inline]
pub fn is_kanji(c: char) -> bool {
    (KANJI_FIRST..=KANJI_LAST).contains(&c)
}

/// Returns `true` if any character of `text` is a CJK Unified Ideograph.
///
/// # Examples
///
/// ```
/// use txt2mdx::utils::contains_kanji;
///
/// assert!(contains_kanji("猫"));
/// assert!(contains_kanji("お茶"));
/// assert!(!contains_kanji("ねこ"));
/// ```
pub fn contains_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// Returns `true` if every non-whitespace character of `text` is katakana,
/// the prolonged sound mark or the katakana middle dot.
///
/// An empty or all-whitespace string is vacuously pure katakana.
///
/// # Examples
///
/// ```
/// use txt2mdx::utils::is_pure_katakana;
///
/// assert!(is_pure_katakana("コンピューター"));
/// assert!(is_pure_katakana("ジョン・スミス"));
/// assert!(!is_pure_katakana("コンピューター室"));
/// assert!(is_pure_katakana(""));
/// ```
pub fn is_pure_katakana(text: &str) -> bool {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .all(|c| {
            (KATAKANA_FIRST..=KATAKANA_LAST).contains(&c)
                || c == PROLONGED_SOUND_MARK
                || c == KATAKANA_MIDDLE_DOT
        })
}

/// Converts katakana syllables (ァ..ヶ) to their hiragana counterparts.
///
/// Characters outside that range, including `ー`, are kept as they are.
pub fn katakana_to_hiragana(text: &str) -> String {
    // ァ..ヶ and ぁ..ゖ are laid out identically, 0x60 code points apart.
    text.chars()
        .map(|c| {
            if (KATAKANA_FIRST..=KATAKANA_LAST).contains(&c) {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}
