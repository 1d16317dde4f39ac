use std::str::{from_utf8, FromStr};

use crate::error::{Error, Result};

pub trait InputStream {
    fn token(&mut self) -> Option<&[u8]>;

    fn value<T: FromStr>(&mut self, expected: &'static str) -> Result<T> {
        let token = self.token().ok_or(Error::UnexpectedEof { expected })?;
        let invalid = || Error::InvalidToken {
            token: String::from_utf8_lossy(token).into_owned(),
            expected,
        };
        from_utf8(token)
            .map_err(|_| invalid())?
            .parse()
            .map_err(|_| invalid())
    }
}

#[inline]
fn is_whitespace(c: u8) -> bool {
    c <= b' '
}

impl<'a> InputStream for &'a [u8] {
    fn token(&mut self) -> Option<&[u8]> {
        let buf: &'a [u8] = *self;
        let start = buf.iter().position(|&c| !is_whitespace(c))?;
        let buf = &buf[start..];
        let end = buf
            .iter()
            .position(|&c| is_whitespace(c))
            .unwrap_or(buf.len());
        let (token, rest) = buf.split_at(end);
        *self = rest;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream() {
        let mut input: &[u8] = b" 2 3\r\n\n-19235\t7 x ";
        assert_eq!(input.value::<usize>("n").unwrap(), 2);
        assert_eq!(input.value::<u64>("m").unwrap(), 3);
        assert_eq!(input.value::<i64>("value").unwrap(), -19235);
        assert_eq!(input.token(), Some(&b"7"[..]));
        assert!(matches!(
            input.value::<u32>("k"),
            Err(Error::InvalidToken { ref token, expected: "k" }) if token == "x"
        ));
        assert!(matches!(
            input.value::<u32>("k"),
            Err(Error::UnexpectedEof { expected: "k" })
        ));
    }
}
