use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ct_core::clipboard::ClipboardSnapshot;
use ct_core::ports::{ClipboardProbePort, ProbeError};
use wait_timeout::ChildExt;

const IMAGE_MIME: &str = "image/png";
const TEXT_MIMES: &[&str] = &["text/plain;charset=utf-8", "text/plain", "UTF8_STRING", "STRING"];

const TEXT_TIMEOUT: Duration = Duration::from_secs(1);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Clipboard probe for Wayland sessions, reading through the `wl-paste` tool.
///
/// Every `wl-paste` run is bounded: a selection owner that never delivers its
/// data would otherwise hold the poll worker forever. A run that overstays is
/// killed and reported as [`ProbeError::Unavailable`].
///
/// 通过 `wl-paste` 子进程读取 Wayland 剪贴板。
#[derive(Debug, Clone)]
pub struct WaylandClipboardProbe {
    program: String,
    text_timeout: Duration,
    image_timeout: Duration,
}

impl WaylandClipboardProbe {
    pub fn new() -> Self {
        Self::with_program("wl-paste")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            text_timeout: TEXT_TIMEOUT,
            image_timeout: IMAGE_TIMEOUT,
        }
    }

    fn run(&self, args: &[&str], timeout: Duration) -> Result<Output, ProbeError> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProbeError::Unavailable(format!("failed to run {}: {}", self.program, e)))?;

        // Drain both pipes while waiting; a large image would otherwise fill
        // the pipe and stall the child until the deadline.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match child.wait_timeout(timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                log::warn!(
                    "{} {} timed out after {}ms, killing it",
                    self.program,
                    args.join(" "),
                    timeout.as_millis()
                );
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProbeError::Unavailable(format!(
                    "{} timed out after {}ms",
                    self.program,
                    timeout.as_millis()
                )));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProbeError::Unavailable(format!(
                    "failed to wait for {}: {}",
                    self.program, e
                )));
            }
        };

        Ok(Output {
            status,
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }

    fn list_types(&self) -> Result<Option<Vec<String>>, ProbeError> {
        let output = self.run(&["--list-types"], self.text_timeout)?;
        if !output.status.success() {
            return if is_empty_selection(&output) {
                Ok(None)
            } else {
                Err(failure(&self.program, &output))
            };
        }
        let types = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Some(types))
    }

    fn read_type(&self, mime: &str, timeout: Duration) -> Result<Vec<u8>, ProbeError> {
        let output = self.run(&["--no-newline", "--type", mime], timeout)?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(failure(&self.program, &output))
        }
    }
}

impl Default for WaylandClipboardProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardProbePort for WaylandClipboardProbe {
    fn read_native(&self) -> Result<ClipboardSnapshot, ProbeError> {
        let Some(types) = self.list_types()? else {
            return Ok(ClipboardSnapshot::Empty);
        };
        if types.is_empty() {
            return Ok(ClipboardSnapshot::Empty);
        }

        if types.iter().any(|t| t == IMAGE_MIME) {
            let bytes = self.read_type(IMAGE_MIME, self.image_timeout)?;
            return Ok(ClipboardSnapshot::Image(bytes));
        }

        let Some(text_mime) = TEXT_MIMES
            .iter()
            .find(|mime| types.iter().any(|t| t.as_str() == **mime))
        else {
            return Err(ProbeError::UnsupportedFormat(types.join(",")));
        };

        let bytes = self.read_type(text_mime, self.text_timeout)?;
        if bytes.is_empty() {
            return Ok(ClipboardSnapshot::Empty);
        }
        match String::from_utf8(bytes) {
            Ok(text) => Ok(ClipboardSnapshot::Text(text)),
            Err(_) => Err(ProbeError::UnsupportedFormat(format!("{text_mime} (not utf-8)"))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "wayland"
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn is_empty_selection(output: &Output) -> bool {
    let stderr = String::from_utf8_lossy(&output.stderr).to_ascii_lowercase();
    stderr.contains("nothing is copied") || stderr.contains("no selection")
}

fn failure(program: &str, output: &Output) -> ProbeError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    ProbeError::Unavailable(format!("{} exited with {}: {}", program, output.status, stderr.trim()))
}
