mod tokens;

pub use tokens::{NormalizeIterator, Tokens};

/**
    Whether a hyphen between two letters survives normalization.

    With [`Hyphens::Keep`] `x-ray` stays `x-ray`, with [`Hyphens::Drop`] it becomes `xray`.
    Leading and trailing hyphens never survive, and a run of hyphens collapses into one.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hyphens {
    #[default]
    Keep,
    Drop,
}

/**
    Maps a raw token onto its counting key.

    Only 7-bit ASCII letters are kept, lowercased. Everything else (digits, punctuation,
    bytes of multibyte sequences) is dropped. Returns `None` when nothing is left.
*/
pub fn normalize(token: &[u8], hyphens: Hyphens) -> Option<String> {
    let mut key = String::with_capacity(token.len());
    let mut pending_hyphen = false;

    for &b in token {
        if b.is_ascii_alphabetic() {
            if pending_hyphen {
                key.push('-');
                pending_hyphen = false;
            }
            key.push(b.to_ascii_lowercase() as char);
        } else if b == b'-' && hyphens == Hyphens::Keep && !key.is_empty() {
            pending_hyphen = true;
        }
    }

    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}
