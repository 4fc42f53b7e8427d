/*!
 * Romanization post-processing for native-script output.
 *
 * Best-effort transliteration of Indic-script text into a Latin phonetic
 * approximation. Cosmetic only: unknown tags yield `None`, and nothing in
 * here can fail the parent translation request.
 *
 * The six supported Unicode blocks share the ISCII-derived layout, so a
 * single offset-indexed table covers all of them.
 */

/// Scripts eligible for romanization. The pivot language (Latin script)
/// is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicScript {
    Devanagari,
    Bengali,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
}

impl IndicScript {
    /// Unicode block base for this script
    fn base(self) -> u32 {
        match self {
            IndicScript::Devanagari => 0x0900,
            IndicScript::Bengali => 0x0980,
            IndicScript::Tamil => 0x0B80,
            IndicScript::Telugu => 0x0C00,
            IndicScript::Kannada => 0x0C80,
            IndicScript::Malayalam => 0x0D00,
        }
    }
}

/// Static tag -> script table. Tags outside this table (including the pivot
/// `eng_Latn`) are not romanized.
pub fn script_for_tag(native_tag: &str) -> Option<IndicScript> {
    match native_tag {
        "hin_Deva" => Some(IndicScript::Devanagari),
        "ben_Beng" => Some(IndicScript::Bengali),
        "tam_Taml" => Some(IndicScript::Tamil),
        "tel_Telu" => Some(IndicScript::Telugu),
        "kan_Knda" => Some(IndicScript::Kannada),
        "mal_Mlym" => Some(IndicScript::Malayalam),
        _ => None,
    }
}

/// Latin approximation for a consonant at the given block offset
fn consonant(offset: u32) -> Option<&'static str> {
    let latin = match offset {
        0x15 => "k", 0x16 => "kh", 0x17 => "g", 0x18 => "gh", 0x19 => "ng",
        0x1A => "ch", 0x1B => "chh", 0x1C => "j", 0x1D => "jh", 0x1E => "ny",
        0x1F => "t", 0x20 => "th", 0x21 => "d", 0x22 => "dh", 0x23 => "n",
        0x24 => "t", 0x25 => "th", 0x26 => "d", 0x27 => "dh", 0x28 => "n",
        0x29 => "n",
        0x2A => "p", 0x2B => "ph", 0x2C => "b", 0x2D => "bh", 0x2E => "m",
        0x2F => "y", 0x30 => "r", 0x31 => "r", 0x32 => "l", 0x33 => "l",
        0x34 => "zh", 0x35 => "v", 0x36 => "sh", 0x37 => "sh", 0x38 => "s",
        0x39 => "h",
        _ => return None,
    };
    Some(latin)
}

/// Latin value for an independent vowel at the given block offset
fn vowel(offset: u32) -> Option<&'static str> {
    let latin = match offset {
        0x05 => "a", 0x06 => "aa", 0x07 => "i", 0x08 => "ee", 0x09 => "u",
        0x0A => "oo", 0x0B => "ri", 0x0E => "e", 0x0F => "e", 0x10 => "ai",
        0x12 => "o", 0x13 => "o", 0x14 => "au",
        _ => return None,
    };
    Some(latin)
}

/// Latin value for a dependent vowel sign (matra) at the given block offset
fn matra(offset: u32) -> Option<&'static str> {
    let latin = match offset {
        0x3E => "aa", 0x3F => "i", 0x40 => "ee", 0x41 => "u", 0x42 => "oo",
        0x43 => "ri", 0x46 => "e", 0x47 => "e", 0x48 => "ai", 0x4A => "o",
        0x4B => "o", 0x4C => "au",
        _ => return None,
    };
    Some(latin)
}

/// Romanize native-script text.
///
/// Returns `None` when the tag is outside the script table. Characters the
/// table does not cover pass through (or are dropped for pure signs); the
/// result is a phonetic approximation, never an error.
pub fn romanize(text: &str, native_tag: &str) -> Option<String> {
    let script = script_for_tag(native_tag)?;
    let base = script.base();

    let mut out = String::with_capacity(text.len());
    // Consonants carry an inherent 'a' unless a matra or virama follows
    let mut pending_a = false;

    for ch in text.chars() {
        let cp = ch as u32;
        if !(base..base + 0x80).contains(&cp) {
            if pending_a {
                out.push('a');
                pending_a = false;
            }
            out.push(ch);
            continue;
        }

        let offset = cp - base;
        if let Some(m) = matra(offset) {
            out.push_str(m);
            pending_a = false;
        } else if offset == 0x4D {
            // Virama suppresses the inherent vowel
            pending_a = false;
        } else if let Some(c) = consonant(offset) {
            if pending_a {
                out.push('a');
            }
            out.push_str(c);
            pending_a = true;
        } else if let Some(v) = vowel(offset) {
            if pending_a {
                out.push('a');
                pending_a = false;
            }
            out.push_str(v);
        } else if (0x66..=0x6F).contains(&offset) {
            if pending_a {
                out.push('a');
                pending_a = false;
            }
            out.push(char::from(b'0' + (offset - 0x66) as u8));
        } else {
            // Anusvara, visarga, candrabindu and friends
            match offset {
                0x01 | 0x02 => {
                    if pending_a {
                        out.push('a');
                        pending_a = false;
                    }
                    out.push('n');
                }
                0x03 => {
                    if pending_a {
                        out.push('a');
                        pending_a = false;
                    }
                    out.push('h');
                }
                // Nukta and other signs are silent in this approximation
                _ => {}
            }
        }
    }

    if pending_a {
        out.push('a');
    }

    Some(out)
}
