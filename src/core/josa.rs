/// Korean particle (josa) selection by the shape of a word's final syllable.
///
/// Precomposed Hangul syllables occupy U+AC00..=U+D7A3 and are laid out
/// as `initial * 588 + medial * 28 + final`, so a syllable has a final
/// consonant (batchim) exactly when its offset from U+AC00 is not a
/// multiple of 28.

const HANGUL_FIRST: u32 = 0xAC00;
const HANGUL_LAST: u32 = 0xD7A3;
const FINAL_CONSONANT_SLOTS: u32 = 28;

/// The two allomorphs a particle can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suffix {
    /// Form used after a final consonant (을, 은, 이, 과).
    A,
    /// Form used after a vowel, a non-Hangul character or an empty word
    /// (를, 는, 가, 와).
    B,
}

/// Particles the synthesizer attaches to nouns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Josa {
    /// Object marker 을/를.
    Object,
    /// Topic marker 은/는.
    Topic,
    /// Subject marker 이/가.
    Subject,
    /// Comitative 과/와 ("with", "and").
    With,
}

impl Josa {
    /// The particle text for a given allomorph.
    pub fn form(&self, suffix: Suffix) -> &'static str {
        match (self, suffix) {
            (Self::Object, Suffix::A) => "을",
            (Self::Object, Suffix::B) => "를",
            (Self::Topic, Suffix::A) => "은",
            (Self::Topic, Suffix::B) => "는",
            (Self::Subject, Suffix::A) => "이",
            (Self::Subject, Suffix::B) => "가",
            (Self::With, Suffix::A) => "과",
            (Self::With, Suffix::B) => "와",
        }
    }

    /// The particle that should follow `word`.
    pub fn for_word(&self, word: &str) -> &'static str {
        self.form(suffix_for(word))
    }

    /// `word` with the matching particle appended.
    pub fn attach(&self, word: &str) -> String {
        format!("{}{}", word, self.for_word(word))
    }
}

/// Whether the last character of `word` is a Hangul syllable that ends
/// in a consonant. Non-Hangul endings and empty words never do.
pub fn has_final_consonant(word: &str) -> bool {
    match word.chars().last() {
        Some(c) => {
            let code = c as u32;
            (HANGUL_FIRST..=HANGUL_LAST).contains(&code)
                && (code - HANGUL_FIRST) % FINAL_CONSONANT_SLOTS != 0
        }
        None => false,
    }
}

/// Pick the allomorph for `word`.
pub fn suffix_for(word: &str) -> Suffix {
    if has_final_consonant(word) {
        Suffix::A
    } else {
        Suffix::B
    }
}

/// The object marker (을 or 를) that follows `word`.
pub fn inflect(word: &str) -> &'static str {
    Josa::Object.for_word(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_words_without_final_consonant() {
        // 과 = U+ACFC, offset 252 = 28 * 9
        assert_eq!(inflect("사과"), "를");
        // 무 = U+BB34, offset 3892 = 28 * 139
        assert_eq!(inflect("나무"), "를");
        // 끼 = U+B07C, offset 1148 = 28 * 41
        assert_eq!(inflect("토끼"), "를");
    }

    #[test]
    fn reference_words_with_final_consonant() {
        // 람 = U+B78C, offset 2956 = 28 * 105 + 16
        assert_eq!(inflect("사람"), "을");
        assert_eq!(inflect("책"), "을");
        assert_eq!(inflect("우주정거장"), "을");
    }

    #[test]
    fn block_boundaries() {
        assert_eq!(suffix_for("가"), Suffix::B);
        assert_eq!(suffix_for("각"), Suffix::A);
        assert_eq!(suffix_for("힣"), Suffix::A);
        assert_eq!(suffix_for("히"), Suffix::B);
    }

    #[test]
    fn empty_and_non_hangul_take_vowel_form() {
        assert_eq!(suffix_for(""), Suffix::B);
        assert_eq!(inflect("rocket"), "를");
        assert_eq!(inflect("로켓7"), "를");
        // compatibility jamo are outside the syllable block
        assert_eq!(inflect("ㄱ"), "를");
    }

    #[test]
    fn only_last_character_matters() {
        assert_eq!(inflect("책상 위의 사과"), "를");
        assert_eq!(inflect("사과 한 상자"), "를");
        assert_eq!(inflect("상자와 책"), "을");
    }

    #[test]
    fn other_particles_follow_same_rule() {
        assert_eq!(Josa::Topic.attach("토르"), "토르는");
        assert_eq!(Josa::Topic.attach("주인공"), "주인공은");
        assert_eq!(Josa::Subject.attach("별"), "별이");
        assert_eq!(Josa::Subject.attach("바다"), "바다가");
        assert_eq!(Josa::With.attach("로켓"), "로켓과");
        assert_eq!(Josa::With.attach("여우"), "여우와");
        assert_eq!(Josa::Object.attach("달"), "달을");
    }
}
