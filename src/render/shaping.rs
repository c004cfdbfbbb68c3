//! # Arabic-Script Contextual Shaping
//!
//! Thermal receipts are drawn glyph by glyph, so Persian text has to be
//! converted into its contextual *presentation forms* before drawing. Each
//! joining letter has up to four forms depending on its neighbours:
//!
//! ```text
//!           joins previous?   joins next?
//! isolated        no              no
//! final           yes             no
//! initial         no              yes
//! medial          yes             yes
//! ```
//!
//! Right-joining letters (alef, dal, reh, waw, ...) only ever connect to the
//! letter before them, so they have isolated and final forms only. Harakat
//! are transparent: they are skipped when looking for neighbours. ZWNJ
//! breaks a join, ZWJ and tatweel force one; both zero-width joiners are
//! dropped from the output.
//!
//! The output stays in logical order. Bidi reordering happens later, per
//! wrapped line.

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';
const TATWEEL: char = '\u{0640}';
const LAM: char = '\u{0644}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joining {
    /// Connects on both sides
    Dual,
    /// Connects only to the preceding letter
    Right,
    /// Forces a join on both sides, has no forms of its own
    Causing,
    /// Ignored when finding neighbours
    Transparent,
    None,
}

impl Joining {
    fn links_forward(self) -> bool {
        matches!(self, Joining::Dual | Joining::Causing)
    }

    fn links_backward(self) -> bool {
        matches!(self, Joining::Dual | Joining::Right | Joining::Causing)
    }
}

/// Presentation forms as `[isolated, final, initial, medial]`.
/// Right-joining letters repeat isolated/final in the initial/medial slots.
fn forms(c: char) -> Option<[u32; 4]> {
    let dual = |base: u32| [base, base + 1, base + 2, base + 3];
    let right = |base: u32| [base, base + 1, base, base + 1];

    let f = match c {
        '\u{0622}' => right(0xFE81),
        '\u{0623}' => right(0xFE83),
        '\u{0624}' => right(0xFE85),
        '\u{0625}' => right(0xFE87),
        '\u{0626}' => dual(0xFE89),
        '\u{0627}' => right(0xFE8D),
        '\u{0628}' => dual(0xFE8F),
        '\u{0629}' => right(0xFE93),
        '\u{062A}' => dual(0xFE95),
        '\u{062B}' => dual(0xFE99),
        '\u{062C}' => dual(0xFE9D),
        '\u{062D}' => dual(0xFEA1),
        '\u{062E}' => dual(0xFEA5),
        '\u{062F}' => right(0xFEA9),
        '\u{0630}' => right(0xFEAB),
        '\u{0631}' => right(0xFEAD),
        '\u{0632}' => right(0xFEAF),
        '\u{0633}' => dual(0xFEB1),
        '\u{0634}' => dual(0xFEB5),
        '\u{0635}' => dual(0xFEB9),
        '\u{0636}' => dual(0xFEBD),
        '\u{0637}' => dual(0xFEC1),
        '\u{0638}' => dual(0xFEC5),
        '\u{0639}' => dual(0xFEC9),
        '\u{063A}' => dual(0xFECD),
        '\u{0641}' => dual(0xFED1),
        '\u{0642}' => dual(0xFED5),
        '\u{0643}' => dual(0xFED9),
        '\u{0644}' => dual(0xFEDD),
        '\u{0645}' => dual(0xFEE1),
        '\u{0646}' => dual(0xFEE5),
        '\u{0647}' => dual(0xFEE9),
        '\u{0648}' => right(0xFEED),
        '\u{0649}' => right(0xFEEF),
        '\u{064A}' => dual(0xFEF1),
        // Persian letters
        '\u{067E}' => dual(0xFB56),
        '\u{0686}' => dual(0xFB7A),
        '\u{0698}' => right(0xFB8A),
        '\u{06A9}' => dual(0xFB8E),
        '\u{06AF}' => dual(0xFB92),
        '\u{06CC}' => dual(0xFBFC),
        _ => return None,
    };
    Some(f)
}

/// Arabic combining marks (harakat, superscript alef).
pub fn is_mark(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

fn joining(c: char) -> Joining {
    match c {
        c if is_mark(c) => Joining::Transparent,
        TATWEEL | ZWJ => Joining::Causing,
        _ => match forms(c) {
            Some(f) if f[2] == f[0] => Joining::Right,
            Some(_) => Joining::Dual,
            None => Joining::None,
        },
    }
}

/// Lam-alef ligature as `[isolated, final]`.
fn lam_alef(alef: char) -> Option<[u32; 2]> {
    match alef {
        '\u{0622}' => Some([0xFEF5, 0xFEF6]),
        '\u{0623}' => Some([0xFEF7, 0xFEF8]),
        '\u{0625}' => Some([0xFEF9, 0xFEFA]),
        '\u{0627}' => Some([0xFEFB, 0xFEFC]),
        _ => None,
    }
}

/// True if the text contains anything this module would change.
pub fn needs_shaping(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c, '\u{0600}'..='\u{06FF}' | ZWNJ | ZWJ))
}

/// Replace Arabic-script letters by their contextual presentation forms.
///
/// Text without Arabic-script letters is returned unchanged.
pub fn shape(text: &str) -> String {
    if !needs_shaping(text) {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let kinds: Vec<Joining> = chars.iter().map(|&c| joining(c)).collect();

    let neighbour = |from: usize, forward: bool| -> Option<usize> {
        let mut i = from;
        loop {
            if forward {
                i += 1;
                if i >= chars.len() {
                    return None;
                }
            } else {
                i = i.checked_sub(1)?;
            }
            if kinds[i] != Joining::Transparent {
                return Some(i);
            }
        }
    };

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let kind = kinds[i];

        if c == ZWJ || c == ZWNJ {
            i += 1;
            continue;
        }

        let joins_prev = kind.links_backward()
            && neighbour(i, false).is_some_and(|p| kinds[p].links_forward());

        // Lam followed by an alef becomes a single ligature that behaves
        // like a right-joining letter. Harakat in between move after it.
        if c == LAM
            && let Some(next) = neighbour(i, true)
            && let Some(lig) = lam_alef(chars[next])
        {
            push_code(&mut out, if joins_prev { lig[1] } else { lig[0] });
            out.extend(&chars[i + 1..next]);
            i = next + 1;
            continue;
        }

        match forms(c) {
            Some(f) => {
                let joins_next = kind.links_forward()
                    && neighbour(i, true).is_some_and(|n| kinds[n].links_backward());
                let idx = match (joins_prev, joins_next) {
                    (false, false) => 0,
                    (true, false) => 1,
                    (false, true) => 2,
                    (true, true) => 3,
                };
                push_code(&mut out, f[idx]);
            }
            None => out.push(c),
        }
        i += 1;
    }
    out
}

fn push_code(out: &mut String, code: u32) {
    if let Some(c) = char::from_u32(code) {
        out.push(c);
    }
}
