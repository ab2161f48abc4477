use ::std::io::{self, BufRead, Write};

/// Writes `label`, then reads one line. `None` means the input was closed.
pub fn read_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}
