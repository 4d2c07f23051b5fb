use std::io::BufRead;
use std::path::Path;

use crate::types::Error;

/// Feeds every line of `reader` to `f` until it returns `false`.
///
/// Lines are split on `\n` only and a trailing `\r` is dropped. Invalid UTF-8
/// is replaced with U+FFFD, so only genuine I/O failures are errors.
pub(crate) fn for_each_line<R, F>(mut reader: R, path: &Path, mut f: F) -> Result<(), Error>
where
    R: BufRead,
    F: FnMut(&str) -> bool,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if n == 0 {
            return Ok(());
        }

        let mut line = &buf[..];
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest;
        }
        if let Some(rest) = line.strip_suffix(b"\r") {
            line = rest;
        }
        if !f(&String::from_utf8_lossy(line)) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect(bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for_each_line(bytes, Path::new("x"), |line| {
            lines.push(String::from(line));
            true
        })
        .unwrap();
        lines
    }

    #[test]
    fn line_endings() {
        assert_eq!(collect(b"a\r\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(collect(b"a\n\n"), vec!["a", ""]);
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn latin1_bytes_are_replaced() {
        assert_eq!(collect(b"caf\xE9\nok\n"), vec!["caf\u{FFFD}", "ok"]);
    }

    #[test]
    fn stops_when_asked() {
        let mut seen = 0;
        for_each_line(&b"a\nb\nc\n"[..], Path::new("x"), |_| {
            seen += 1;
            seen < 2
        })
        .unwrap();
        assert_eq!(seen, 2);
    }
}
