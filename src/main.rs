use std::{ffi::OsStr, path::Path};

use clap::Parser;
use pathtrace::app::{App, settings::Args};
use tracing_appender::non_blocking::WorkerGuard;

/// Splits the log file path into an existing directory and a file name.
fn log_destination(log_file: &Path) -> std::io::Result<(&Path, &OsStr)> {
    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_file.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid log file path: {}", log_file.display()),
        )
    })?;
    // The file appender panics on a missing directory, so report it as an error instead
    if !directory.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Log directory does not exist: {}", directory.display()),
        ));
    }
    Ok((directory, file_name))
}

/// Route all log output to a file so it never draws over the grid.
/// The returned guard flushes pending lines when dropped.
fn init_logging(args: &Args) -> std::io::Result<WorkerGuard> {
    let (directory, file_name) = log_destination(&args.log_file)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(args.log_level)
        .init();
    Ok(guard)
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let _guard = init_logging(&args)?;

    let app = App::new(args);
    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run();
    App::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("Exiting with error: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_destination() {
        let (dir, file) = log_destination(Path::new("pathtrace.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(file, "pathtrace.log");

        let tmp = std::env::temp_dir();
        let run_log = tmp.join("run.log");
        let (dir, file) = log_destination(&run_log).unwrap();
        assert_eq!(dir, tmp.as_path());
        assert_eq!(file, "run.log");

        let missing = log_destination(Path::new("missing/dir/x.log")).unwrap_err();
        assert_eq!(missing.kind(), std::io::ErrorKind::NotFound);
        let no_name = log_destination(Path::new("/")).unwrap_err();
        assert_eq!(no_name.kind(), std::io::ErrorKind::InvalidInput);
    }
}
