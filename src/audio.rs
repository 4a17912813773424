use std::io::{self, Write};

/// Audible cue for a finished session. Playback is best-effort.
pub trait Chime: Send + Sync {
    fn play(&self) -> io::Result<()>;
}

/// Rings the terminal bell of the process running the service.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Chime for TerminalBell {
    fn play(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(b"\x07")?;
        stdout.flush()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Chime for Silent {
    fn play(&self) -> io::Result<()> {
        Ok(())
    }
}
