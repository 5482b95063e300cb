use crate::filtering::{normalize, Hyphens};

/**
    Splits a byte slice on ASCII whitespace, yielding the raw tokens in between.
*/
pub struct Tokens<'a> {
    rest: &'a [u8],
}

impl<'a> Tokens<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Tokens { rest: bytes }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.rest.iter().position(|b| !b.is_ascii_whitespace())?;
        let rest = &self.rest[start..];
        let end = rest
            .iter()
            .position(u8::is_ascii_whitespace)
            .unwrap_or(rest.len());

        let (token, tail) = rest.split_at(end);
        self.rest = tail;
        Some(token)
    }
}

pub struct NormalizedIteratorInner<I> {
    underlying: I,
    hyphens: Hyphens,
}

impl<I, T> Iterator for NormalizedIteratorInner<I>
where
    I: Iterator<Item = T>,
    T: AsRef<[u8]>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let hyphens = self.hyphens;
        self.underlying
            .by_ref()
            .find_map(|token| normalize(token.as_ref(), hyphens))
    }
}

/**
    Trait implementing an [`Iterator`] function that normalizes raw tokens and skips the
    ones that normalize to nothing
*/
pub trait NormalizeIterator: Iterator {
    fn normalized(self, hyphens: Hyphens) -> NormalizedIteratorInner<Self>
    where
        Self: Sized,
    {
        NormalizedIteratorInner {
            underlying: self,
            hyphens,
        }
    }
}

impl<I: Iterator> NormalizeIterator for I {}

#[test]
fn test_tokens_split_on_any_ascii_whitespace() {
    let tokens: Vec<_> = Tokens::new(b"  the\tcat\r\nsat  on\x0cthe mat ").collect();
    assert_eq!(
        tokens,
        vec![&b"the"[..], b"cat", b"sat", b"on", b"the", b"mat"]
    );
}

#[test]
fn test_tokens_on_blank_input() {
    assert_eq!(Tokens::new(b"").count(), 0);
    assert_eq!(Tokens::new(b" \n\t ").count(), 0);
}

#[test]
fn test_normalized_skips_rejected_tokens() {
    let keys: Vec<_> = Tokens::new(b"The Cat, 42 -- sat.")
        .normalized(Hyphens::Keep)
        .collect();
    assert_eq!(keys, vec!["the", "cat", "sat"]);
}
