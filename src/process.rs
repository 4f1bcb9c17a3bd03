use crate::error::ProtocolError;
use crate::participant::{Alice, AliceJudge, Bob, BobJudge};
use crate::protocol::{self, Hello, Request, Response};
use anyhow::{Context, Result, bail};
use std::io::BufReader;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// A participant running as a shell command, speaking the line protocol on stdin/stdout.
///
/// A fresh process is spawned for every phase, so Bob gets a new process per starting node.
#[derive(Clone, Debug)]
pub struct ProcessParticipant {
    command: String,
}

/// A spawned participant. Killed on drop if it is still running.
struct Channel {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Drop for Channel {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

impl ProcessParticipant {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn spawn(&self) -> Result<Channel> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to execute command: {}", self.command))?;
        let stdin = child.stdin.take().context("child missing stdin pipe")?;
        let stdout = child.stdout.take().context("child missing stdout pipe")?;
        Ok(Channel {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// Runs one phase: greets the child, answers its requests until it closes
    /// its output, then checks its exit status.
    fn serve(
        &self,
        hello: &Hello,
        mut handle: impl FnMut(Request) -> Result<Response, ProtocolError>,
    ) -> Result<()> {
        let mut ch = self.spawn()?;
        protocol::write_message(&mut ch.stdin, hello).context("Failed to greet participant")?;
        while let Some(line) = protocol::read_line(&mut ch.stdout)? {
            let result = serde_json::from_str::<Request>(&line)
                .map_err(|e| ProtocolError::MalformedRequest(format!("{}: {}", e, line)))
                .and_then(&mut handle);
            match result {
                Ok(resp) => protocol::write_message(&mut ch.stdin, &resp)
                    .context("Failed to reply to participant")?,
                Err(err) => {
                    // Best effort: the child may already be gone.
                    let _ = protocol::write_message(
                        &mut ch.stdin,
                        &Response::Error {
                            message: err.to_string(),
                        },
                    );
                    return Err(err.into());
                }
            }
        }
        let status = ch.child.wait().context("Failed to wait for participant")?;
        if !status.success() {
            bail!("participant `{}` exited with {}", self.command, status);
        }
        Ok(())
    }
}

impl Alice for ProcessParticipant {
    fn compress(
        &mut self,
        n: usize,
        preorder: &[usize],
        judge: &mut dyn AliceJudge,
    ) -> Result<()> {
        let hello = Hello::Alice {
            n,
            preorder: preorder.to_vec(),
        };
        self.serve(&hello, |req| protocol::dispatch_alice(&mut *judge, req))
    }
}

impl Bob for ProcessParticipant {
    fn reconstruct(&mut self, n: usize, judge: &mut dyn BobJudge) -> Result<()> {
        self.serve(&Hello::Bob { n }, |req| protocol::dispatch_bob(&mut *judge, req))
    }
}
