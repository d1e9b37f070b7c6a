//! Python REPL tool — code execution in a persistent interpreter session.
//!
//! A single CPython worker subprocess hosts one shared exec namespace:
//! variables assigned in one call are visible in later calls for as long as
//! the session lives. The session is owned by the tool instance — created
//! lazily on the first call, killed when the tool is dropped — so its scope
//! is exactly the scope of the registry holding it.
//!
//! The worker runs a small driver that reads marker-framed code blocks from
//! stdin, `exec`s them with stdout and stderr captured, and writes the
//! captured text back framed by the same marker. Exceptions raised by the
//! executed code become their traceback text in the captured output; only
//! infrastructure failures (spawn, IO, timeout) surface as tool failures.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use marketmind_core::tool::{Tool, ToolOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Frames code blocks and their outputs on the worker's stdio.
const MARKER: &str = "__MARKETMIND_EOB__";

/// The worker loop executed with `python -u -c <DRIVER> <marker>`.
const DRIVER: &str = r#"
import sys, io, traceback, contextlib
mark = sys.argv[1]
ns = {}
buf = []
for line in sys.stdin:
    if line.rstrip('\n') != mark:
        buf.append(line)
        continue
    out = io.StringIO()
    try:
        with contextlib.redirect_stdout(out), contextlib.redirect_stderr(out):
            exec(''.join(buf), ns)
    except BaseException:
        out.write(traceback.format_exc())
    buf = []
    text = out.getvalue()
    sys.stdout.write(text)
    if not text.endswith('\n'):
        sys.stdout.write('\n')
    sys.stdout.write(mark + '\n')
    sys.stdout.flush()
"#;

struct ReplSession {
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ReplSession {
    fn spawn(python_bin: &str) -> Result<Self, String> {
        let mut child = Command::new(python_bin)
            .arg("-u")
            .arg("-c")
            .arg(DRIVER)
            .arg(MARKER)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to start interpreter '{python_bin}': {e}"))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| "Interpreter stdin unavailable".to_string())?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| "Interpreter stdout unavailable".to_string())?;

        debug!(python = %python_bin, "Spawned Python REPL session");

        Ok(Self {
            _child: child,
            stdin,
            stdout,
        })
    }

    /// Send one code block and read back its captured output.
    async fn round_trip(&mut self, code: &str) -> Result<String, String> {
        let mut block = code.to_string();
        if !block.ends_with('\n') {
            block.push('\n');
        }
        block.push_str(MARKER);
        block.push('\n');

        self.stdin
            .write_all(block.as_bytes())
            .await
            .map_err(|e| format!("Failed to write to interpreter: {e}"))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| format!("Failed to flush interpreter stdin: {e}"))?;

        let mut output = String::new();
        loop {
            let mut line = String::new();
            let read = self
                .stdout
                .read_line(&mut line)
                .await
                .map_err(|e| format!("Failed to read from interpreter: {e}"))?;
            if read == 0 {
                return Err("Interpreter session ended unexpectedly".into());
            }
            if line.trim_end_matches('\n') == MARKER {
                return Ok(output);
            }
            output.push_str(&line);
        }
    }
}

/// Execute Python code in a process-local persistent session.
pub struct PythonReplTool {
    python_bin: String,
    exec_timeout: Duration,
    session: Mutex<Option<ReplSession>>,
}

impl PythonReplTool {
    pub fn new(python_bin: impl Into<String>) -> Self {
        Self {
            python_bin: python_bin.into(),
            exec_timeout: Duration::from_secs(30),
            session: Mutex::new(None),
        }
    }

    /// Override the per-call execution timeout.
    pub fn with_timeout(mut self, exec_timeout: Duration) -> Self {
        self.exec_timeout = exec_timeout;
        self
    }

    async fn run_code(&self, code: &str) -> Result<String, String> {
        // The session lock also serializes calls: the worker handles one
        // block at a time.
        let mut guard = self.session.lock().await;

        if guard.is_none() {
            *guard = Some(ReplSession::spawn(&self.python_bin)?);
        }
        let Some(session) = guard.as_mut() else {
            return Err("Interpreter session unavailable".into());
        };

        match timeout(self.exec_timeout, session.round_trip(code)).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => {
                // A broken session cannot be reused; drop it so the next
                // call starts fresh.
                *guard = None;
                Err(e)
            }
            Err(_) => {
                warn!(timeout_secs = self.exec_timeout.as_secs(), "Python execution timed out");
                *guard = None;
                Err(format!(
                    "Python execution timed out after {} seconds",
                    self.exec_timeout.as_secs()
                ))
            }
        }
    }
}

#[async_trait]
impl Tool for PythonReplTool {
    fn name(&self) -> &str {
        "python_repl"
    }

    fn description(&self) -> &str {
        "Use this to execute python code. If you want to see the output of a value, you should print it out with `print(...)`. Variables persist between calls within one session."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The python code to execute"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolOutcome {
        let code = match crate::require_str(&arguments, "code") {
            Ok(code) => code,
            Err(outcome) => return outcome,
        };

        match self.run_code(code).await {
            Ok(output) => ToolOutcome::Success(format!(
                "Successfully executed the Python REPL tool.\n\nPython code executed:\n```python\n{code}\n```\n\nCode output:\n```\n{output}```"
            )),
            Err(e) => ToolOutcome::failure(e),
        }
    }
}
