use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Resolves `relative` against the directory containing `file`.
///
/// A file without a parent directory resolves to `relative` unchanged.
pub fn sibling_path(file: &Path, relative: &str) -> PathBuf {
    match file.parent() {
        Some(dir) => dir.join(relative),
        None => PathBuf::from(relative),
    }
}

/// File name without extension, or an empty string
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lines of `reader` without their terminator.
///
/// Bytes that are not valid UTF-8 (e.g. Latin-1 comments) are replaced, not reported as errors.
pub fn lossy_lines<R: BufRead>(mut reader: R) -> impl Iterator<Item = io::Result<String>> {
    let mut buf = Vec::new();
    std::iter::from_fn(move || {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                Some(Ok(line.trim_end_matches(['\n', '\r']).to_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    })
}
