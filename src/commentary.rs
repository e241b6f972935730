//! Short mentor comments on the player's progress.
//!
//! Comments come from a pluggable [`CommentSource`] run on a background
//! worker. The game only ever sends a request and later polls for the
//! text; it never waits, and any failure turns into a fixed fallback line.

use anyhow::{Result, bail};
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use log::{debug, error, warn};
use std::fmt;
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Shown whenever the source fails or times out
pub const FALLBACK_COMMENT: &str = "Great building! Keep rising.";
/// Shown when the source answers with nothing
pub const EMPTY_REPLY_FALLBACK: &str = "Keep building, champ!";

// How often a running generator is checked for exit
const CHILD_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Win,
    Fail,
    Progress,
}

impl Verdict {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Win => "WIN",
            Verdict::Fail => "FAIL",
            Verdict::Progress => "PROGRESS",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait CommentSource: Send + Sync {
    /// Produces one comment. Sources that do blocking work must give up
    /// and release it once `timeout` has passed.
    fn comment(&self, score: u32, verdict: Verdict, timeout: Duration) -> Result<String>;
}

/// Instructions handed to an external text generator
#[must_use]
pub fn prompt(score: u32, verdict: Verdict) -> String {
    format!(
        "You are a professional architect mentor in a building game.\n\
         The user is stacking floors of a building.\n\
         Current Score: {score}.\n\
         Status: {verdict}.\n\
         Provide a very short, encouraging, and witty comment (max 10 words) \
         about their construction progress."
    )
}

/// Built-in offline comments
#[derive(Debug, Clone, Copy, Default)]
pub struct Phrasebook;

const WIN_LINES: [&str; 3] = [
    "A new skyline record. The city salutes you!",
    "Taller than ever. Time to print the postcards.",
    "Record height! The cranes are applauding.",
];
const FAIL_LINES: [&str; 3] = [
    "Even the best towers start over. Build again!",
    "Gravity won this round. Your next foundation awaits.",
    "Engineering is the art of the unknown. Try again!",
];
const PROGRESS_LINES: [&str; 3] = [
    "Solid floors, steady hands. Keep going up!",
    "The view is getting better with every floor.",
    "Your tower is turning heads downtown.",
];

impl CommentSource for Phrasebook {
    fn comment(&self, score: u32, verdict: Verdict, _timeout: Duration) -> Result<String> {
        let lines = match verdict {
            Verdict::Win => &WIN_LINES,
            Verdict::Fail => &FAIL_LINES,
            Verdict::Progress => &PROGRESS_LINES,
        };
        Ok(lines[score as usize % lines.len()].to_string())
    }
}

/// Runs an external program as the generator. It receives the score and
/// status as its last two arguments and the prompt on stdin, and answers
/// on stdout.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    /// Builds a source from `[program, args...]`; `None` when empty
    #[must_use]
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl CommentSource for CommandSource {
    fn comment(&self, score: u32, verdict: Verdict, timeout: Duration) -> Result<String> {
        let deadline = Instant::now() + timeout;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(score.to_string())
            .arg(verdict.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A generator that ignores stdin may close it early
            let _ = stdin.write_all(prompt(score, verdict).as_bytes());
        }

        // Drain stdout on the side so a chatty generator cannot stall on a full pipe
        let (output_tx, output_rx) = bounded(1);
        if let Some(mut stdout) = child.stdout.take() {
            let reader = thread::Builder::new()
                .name("comment-stdout".into())
                .spawn(move || {
                    let mut bytes = Vec::new();
                    let _ = output_tx.send(stdout.read_to_end(&mut bytes).map(|_| bytes));
                });
            if let Err(e) = reader {
                let _ = child.kill();
                child.wait()?;
                return Err(e.into());
            }
        }

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                child.wait()?;
                bail!("{} killed after {timeout:?}", self.program);
            }
            thread::sleep(CHILD_POLL);
        };
        if !status.success() {
            bail!("{} exited with {status}", self.program);
        }

        // The pipe closes when the child exits, unless it left a grandchild holding it
        let remaining = deadline.saturating_duration_since(Instant::now());
        let bytes = match output_rx.recv_timeout(remaining.max(CHILD_POLL)) {
            Ok(read) => read?,
            Err(_) => bail!("{} left its output open", self.program),
        };
        let text = String::from_utf8_lossy(&bytes);
        let text = text.trim();
        if text.is_empty() {
            return Ok(EMPTY_REPLY_FALLBACK.to_string());
        }
        Ok(text.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
struct Request {
    score: u32,
    verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub score: u32,
    pub verdict: Verdict,
    pub text: String,
}

/// Background comment worker plus the latest comment to display
#[derive(Resource)]
pub struct Commentator {
    requests: Option<Sender<Request>>,
    replies: Option<Receiver<Comment>>,
    latest: Option<Comment>,
}

impl Commentator {
    pub fn new(source: Arc<dyn CommentSource>, timeout: Duration) -> Self {
        let (request_tx, request_rx) = bounded::<Request>(8);
        let (reply_tx, reply_rx) = unbounded::<Comment>();

        let spawned = thread::Builder::new()
            .name("commentary".into())
            .spawn(move || run_worker(&source, timeout, &request_rx, &reply_tx));

        match spawned {
            Ok(_) => Self {
                requests: Some(request_tx),
                replies: Some(reply_rx),
                latest: None,
            },
            Err(e) => {
                error!("Could not start commentary worker: {e}");
                Self::disabled()
            }
        }
    }

    /// A commentator that never produces comments
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            requests: None,
            replies: None,
            latest: None,
        }
    }

    /// Asks for a comment without blocking. Returns false if the request was
    /// not queued (disabled, or the worker is backed up).
    pub fn request(&self, score: u32, verdict: Verdict) -> bool {
        match &self.requests {
            Some(sender) => sender.try_send(Request { score, verdict }).is_ok(),
            None => false,
        }
    }

    /// Picks up finished comments; returns true if the latest one changed.
    pub fn poll(&mut self) -> bool {
        let Some(replies) = &self.replies else {
            return false;
        };
        let mut changed = false;
        while let Ok(comment) = replies.try_recv() {
            self.latest = Some(comment);
            changed = true;
        }
        changed
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Comment> {
        self.latest.as_ref()
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}

fn run_worker(
    source: &Arc<dyn CommentSource>,
    timeout: Duration,
    requests: &Receiver<Request>,
    replies: &Sender<Comment>,
) {
    while let Ok(request) = requests.recv() {
        let text = fetch_with_timeout(source, request, timeout);
        debug!("Comment for {} at {}: {text}", request.verdict, request.score);
        let comment = Comment {
            score: request.score,
            verdict: request.verdict,
            text,
        };
        if replies.send(comment).is_err() {
            break;
        }
    }
}

// The source runs on its own thread so one that ignores its deadline only
// costs the timeout here
fn fetch_with_timeout(source: &Arc<dyn CommentSource>, request: Request, timeout: Duration) -> String {
    let (tx, rx) = bounded(1);
    let source = Arc::clone(source);
    let spawned = thread::Builder::new()
        .name("comment-fetch".into())
        .spawn(move || {
            let _ = tx.send(source.comment(request.score, request.verdict, timeout));
        });
    if let Err(e) = spawned {
        warn!("Comment fetch could not start: {e}");
        return FALLBACK_COMMENT.to_string();
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("Comment source failed, using fallback: {e:#}");
            FALLBACK_COMMENT.to_string()
        }
        Err(RecvTimeoutError::Timeout) => {
            warn!("Comment source timed out after {timeout:?}, using fallback");
            FALLBACK_COMMENT.to_string()
        }
        Err(RecvTimeoutError::Disconnected) => {
            warn!("Comment source panicked, using fallback");
            FALLBACK_COMMENT.to_string()
        }
    }
}
