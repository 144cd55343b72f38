use std::convert::Infallible;
use std::io::{self, Write};
use std::sync::{Arc, RwLock};

pub trait OutputChannel: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn emit(&self, line: &str) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputChannel for ConsoleOutput {
    type Error = io::Error;

    fn emit(&self, line: &str) -> Result<(), Self::Error> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(line.as_bytes())?;
        stdout.write_all(b"\n")
    }
}

#[derive(Clone, Default)]
pub struct MemoryOutput {
    lines: Arc<RwLock<Vec<String>>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        let lines = match self.lines.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.clone()
    }
}

impl OutputChannel for MemoryOutput {
    type Error = Infallible;

    fn emit(&self, line: &str) -> Result<(), Self::Error> {
        let mut lines = match self.lines.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_owned());
        Ok(())
    }
}
