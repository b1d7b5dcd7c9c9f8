//! faxc-drv - the `faxc` binary's reusable half: read a source file, run
//! it through the parser and the checker, and render whatever goes wrong
//! the same way regardless of which phase rejected it.
//!
//! The checker itself never prints or exits (see `faxc_util::CheckError`);
//! this crate is the single place that turns a `Result` into stderr output
//! and a process exit code.

mod error;

use std::path::Path;

use faxc_util::span::SourceMap;

pub use error::{DriverError, Result};

/// Read and check a single source file, returning nothing on success.
/// `trace` enables `tracing`'s `debug` level for the checker's own
/// progress logging, gated by `RUST_LOG` otherwise.
pub fn check_file(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| DriverError::Io { path: path.to_path_buf(), source })?;

    let mut sources = SourceMap::new();
    let file_id = sources.add_file(path.display().to_string(), content.clone());

    tracing::debug!(path = %path.display(), "parsing");
    let subunit = faxc_par::parse_subunit(&content, file_id).map_err(|err| {
        let location = format_location(&sources, err.span());
        DriverError::Parse(format!("Error {location}: {err}"))
    })?;

    let unit = faxc_par::ast::Unit { subunits: vec![subunit] };

    tracing::debug!("checking");
    let mut ctx = faxc_sem::CheckCtx::new();
    faxc_sem::check(&mut ctx, &unit).map_err(|err| DriverError::Check(err.render(&sources)))?;

    Ok(())
}

fn format_location(sources: &SourceMap, span: faxc_util::Span) -> String {
    match sources.get(span.file_id) {
        Some(file) => format!("{}:{}:{}", file.name(), span.line, span.column),
        None => format!("<file {}>:{}:{}", span.file_id.index(), span.line, span.column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("create temp file");
        write!(f, "{content}").expect("write temp file");
        f
    }

    #[test]
    fn checks_a_well_formed_unit() {
        let file = write_temp("export fn main() void = {};");
        check_file(file.path()).expect("checks cleanly");
    }

    #[test]
    fn reports_an_unresolved_name() {
        let file = write_temp("fn get() int = { return missing; }");
        let err = check_file(file.path()).unwrap_err();
        assert!(matches!(err, DriverError::Check(_)));
        assert!(err.to_string().contains("unresolved identifier"));
    }

    #[test]
    fn reports_a_parse_error() {
        let file = write_temp("fn get(");
        let err = check_file(file.path()).unwrap_err();
        assert!(matches!(err, DriverError::Parse(_)));
    }

    #[test]
    fn reports_a_missing_file() {
        let err = check_file(Path::new("/does/not/exist.fax")).unwrap_err();
        assert!(matches!(err, DriverError::Io { .. }));
    }
}
