//! Atomic page publication.
//!
//! Uses a temp file + persist pattern in the target directory, so readers
//! (typically a web server pointed at the file) never observe a truncated
//! page, and a crash mid-write leaves the previous page in place.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

/// Write `html` to `path`, replacing any existing file atomically.
pub fn write_page(path: &Path, html: &str) -> io::Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(html.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|error| error.error)?;

    debug!(path = %path.display(), bytes = html.len(), "page published");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn writes_a_fresh_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        write_page(&path, "<html>one</html>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html>one</html>");
    }

    #[test]
    fn replaces_an_existing_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        write_page(&path, "<html>one</html>").unwrap();
        write_page(&path, "<html>two</html>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html>two</html>");
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        write_page(&path, "<html></html>").unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("index.html")]);
    }
}
