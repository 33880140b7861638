use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

pub fn default_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Installs a `fmt` subscriber that writes each event to the browser console.
pub fn init_logging(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(level)
        .without_time()
        .with_ansi(false)
        .try_init();
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it on drop at the matching console level.
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(line) = console_line(&self.buffer) else {
            return;
        };
        let message = JsValue::from_str(&line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }
}

fn console_line(buffer: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(buffer);
    let line = line.trim_end();
    (!line.is_empty()).then(|| line.to_owned())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn console_line_drops_trailing_newline() {
        assert_eq!(
            console_line(b" INFO portfolio: started\n").as_deref(),
            Some(" INFO portfolio: started")
        );
        assert_eq!(console_line(b"\n"), None);
        assert_eq!(console_line(b""), None);
    }

    #[test]
    fn writer_buffers_partial_writes() {
        let mut writer = ConsoleWriter::new(Level::WARN);
        writer.write_all(b"WARN ").unwrap();
        writer.write_all(b"page event failed").unwrap();
        assert_eq!(
            console_line(&writer.buffer).as_deref(),
            Some("WARN page event failed")
        );
        // Emitting on drop needs a JS host.
        std::mem::forget(writer);
    }
}
