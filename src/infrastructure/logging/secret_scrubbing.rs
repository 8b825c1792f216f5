use regex::{Captures, Regex};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::models::settings::REDACTED;

/// Redacts secret-looking values from formatted log output
#[derive(Clone)]
pub struct SecretScrubber {
    assignment_pattern: Regex,
    bearer_pattern: Regex,
}

impl SecretScrubber {
    /// Create a new secret scrubber
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // KEY=value, KEY: value, "key": "value" for sensitive setting names
            assignment_pattern: Regex::new(
                r#"(?i)\b(secret_key|email_host_password|password|api_key|apikey|token|secret)(["']?\s*[:=]\s*)("[^"]*"|'[^']*'|[^\s,}]+)"#,
            )?,
            // Bearer tokens in Authorization headers
            bearer_pattern: Regex::new(r"Bearer\s+[A-Za-z0-9\-_\.=]+")?,
        })
    }

    /// Scrub a message of sensitive data
    pub fn scrub(&self, message: &str) -> String {
        let scrubbed = self
            .assignment_pattern
            .replace_all(message, |caps: &Captures| {
                // Quoted values stay quoted.
                let quote = match caps[3].chars().next() {
                    Some(q @ ('"' | '\'')) => q.to_string(),
                    _ => String::new(),
                };
                format!("{}{}{quote}{REDACTED}{quote}", &caps[1], &caps[2])
            });
        self.bearer_pattern
            .replace_all(&scrubbed, format!("Bearer {REDACTED}").as_str())
            .into_owned()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

/// `MakeWriter` wrapper that scrubs each formatted event before writing it.
#[derive(Debug, Clone)]
pub struct ScrubbingMakeWriter<M> {
    inner: M,
    scrubber: Arc<SecretScrubber>,
}

impl<M> ScrubbingMakeWriter<M> {
    pub fn new(inner: M, scrubber: Arc<SecretScrubber>) -> Self {
        Self { inner, scrubber }
    }
}

impl<'a, M> MakeWriter<'a> for ScrubbingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = ScrubbingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        ScrubbingWriter {
            inner: self.inner.make_writer(),
            scrubber: Arc::clone(&self.scrubber),
            buffer: Vec::new(),
        }
    }
}

/// Buffers one event and writes the scrubbed text on flush or drop.
pub struct ScrubbingWriter<W: Write> {
    inner: W,
    scrubber: Arc<SecretScrubber>,
    buffer: Vec<u8>,
}

impl<W: Write> ScrubbingWriter<W> {
    fn write_scrubbed(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.buffer);
        let scrubbed = self.scrubber.scrub(&text);
        self.buffer.clear();
        self.inner.write_all(scrubbed.as_bytes())
    }
}

impl<W: Write> Write for ScrubbingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.write_scrubbed()?;
        self.inner.flush()
    }
}

impl<W: Write> Drop for ScrubbingWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
