use std::error::Error;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

pub(crate) const DEFAULT_OUTPUT_NAME: &str = "codeshot.png";

/// Writes PNG bytes to `output`, to `codeshot.png` when stdout is a
/// terminal, or to stdout otherwise.
pub(crate) fn write_output_with_tty(
    png: &[u8],
    output: Option<&PathBuf>,
    stdout_is_tty: bool,
) -> Result<(), Box<dyn Error>> {
    if let Some(path) = output {
        std::fs::write(path, png)?;
        if stdout_is_tty {
            print_wrote(path);
        }
        return Ok(());
    }

    if stdout_is_tty {
        let path = Path::new(DEFAULT_OUTPUT_NAME);
        std::fs::write(path, png)?;
        print_wrote(path);
        return Ok(());
    }

    let mut stdout = io::stdout();
    stdout.write_all(png)?;
    stdout.flush()?;
    Ok(())
}

pub(crate) fn print_wrote(path: &Path) {
    println!("WROTE {}", path.display());
}

pub(crate) fn read_stdin() -> Result<String, io::Error> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

pub(crate) fn read_stdin_with(stdin_override: Option<&str>) -> Result<String, io::Error> {
    if let Some(value) = stdin_override {
        return Ok(value.to_string());
    }
    read_stdin()
}

pub(crate) fn read_input_file(path: &Path) -> Result<String, Box<dyn Error>> {
    let bytes = std::fs::read(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
