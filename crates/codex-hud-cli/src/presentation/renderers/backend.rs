use std::io::{self, Write};

/// Clears the screen and homes the cursor
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// One refresh worth of output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Wipe the previous frame first
    pub clear: bool,
    pub lines: Vec<String>,
}

impl Frame {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            clear: false,
            lines,
        }
    }

    pub fn line(line: impl Into<String>) -> Self {
        Self::new(vec![line.into()])
    }

    pub fn clearing(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }
}

/// Sink for rendered HUD frames
pub trait FrameWriter {
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}

/// Writes frames to any byte stream, stdout in production
pub struct StreamWriter<W: Write> {
    out: W,
}

impl StreamWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StreamWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameWriter for StreamWriter<W> {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        if frame.clear {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        for line in &frame.lines {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }
}

/// Keeps every presented frame, for tests
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub frames: Vec<Frame>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_lines(&self) -> &[String] {
        self.frames.last().map(|f| f.lines.as_slice()).unwrap_or(&[])
    }
}

impl FrameWriter for RecordingWriter {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
