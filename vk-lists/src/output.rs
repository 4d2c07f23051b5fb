use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::types::Error;

/// Writes one name per line, each terminated by `\n`.
pub fn write_list<S: AsRef<str>>(path: &Path, names: &[S]) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::open_write(path, e))?;
    let mut out = BufWriter::new(file);

    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    for name in names {
        out.write_all(name.as_ref().as_bytes()).map_err(write_err)?;
        out.write_all(b"\n").map_err(write_err)?;
    }
    out.flush().map_err(write_err)
}
