#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::commentary::{
        CommandSource, Comment, CommentSource, Commentator, EMPTY_REPLY_FALLBACK,
        FALLBACK_COMMENT, Phrasebook, Verdict, prompt,
    };
    use anyhow::{Result, bail};
    use tempfile::tempdir;
    use std::fs;
    use std::process::Command;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    const TIMEOUT: Duration = Duration::from_secs(5);

    struct FailingSource;

    impl CommentSource for FailingSource {
        fn comment(&self, _score: u32, _verdict: Verdict, _timeout: Duration) -> Result<String> {
            bail!("service unavailable")
        }
    }

    struct SlowSource(Duration);

    impl CommentSource for SlowSource {
        fn comment(&self, _score: u32, _verdict: Verdict, _timeout: Duration) -> Result<String> {
            thread::sleep(self.0);
            Ok("too late".to_string())
        }
    }

    struct EchoSource;

    impl CommentSource for EchoSource {
        fn comment(&self, score: u32, verdict: Verdict, _timeout: Duration) -> Result<String> {
            Ok(format!("{verdict} at {score}"))
        }
    }

    // Polls until a comment arrives or the deadline passes
    fn wait_for_comment(commentator: &mut Commentator) -> Option<Comment> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if commentator.poll() {
                return commentator.latest().cloned();
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }

    fn command(parts: &[&str]) -> Vec<String> {
        parts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_prompt_carries_score_and_status() {
        let text = prompt(23, Verdict::Progress);
        assert!(text.contains("Current Score: 23."));
        assert!(text.contains("Status: PROGRESS."));
        assert!(text.contains("max 10 words"));
    }

    #[test]
    fn test_verdict_names() {
        assert_eq!(Verdict::Win.to_string(), "WIN");
        assert_eq!(Verdict::Fail.as_str(), "FAIL");
        assert_eq!(Verdict::Progress.as_str(), "PROGRESS");
    }

    #[test]
    fn test_phrasebook_is_deterministic_per_score() {
        let book = Phrasebook;
        let first = book.comment(4, Verdict::Win, TIMEOUT).unwrap();
        assert_eq!(first, book.comment(4, Verdict::Win, TIMEOUT).unwrap());
        assert_eq!(first, book.comment(7, Verdict::Win, TIMEOUT).unwrap());
        assert_ne!(first, book.comment(5, Verdict::Win, TIMEOUT).unwrap());
        assert_ne!(first, book.comment(4, Verdict::Fail, TIMEOUT).unwrap());
        assert!(!book.comment(0, Verdict::Progress, TIMEOUT).unwrap().is_empty());
    }

    #[test]
    fn test_commentator_delivers_comment() {
        let mut commentator = Commentator::new(Arc::new(EchoSource), Duration::from_secs(2));
        assert!(commentator.latest().is_none());
        assert!(commentator.request(12, Verdict::Win));

        let comment = wait_for_comment(&mut commentator).expect("comment arrives");
        assert_eq!(comment.score, 12);
        assert_eq!(comment.verdict, Verdict::Win);
        assert_eq!(comment.text, "WIN at 12");
    }

    #[test]
    fn test_failing_source_falls_back() {
        let mut commentator = Commentator::new(Arc::new(FailingSource), Duration::from_secs(2));
        commentator.request(3, Verdict::Fail);

        let comment = wait_for_comment(&mut commentator).expect("fallback arrives");
        assert_eq!(comment.text, FALLBACK_COMMENT);
        assert_eq!(comment.verdict, Verdict::Fail);
    }

    #[test]
    fn test_slow_source_times_out() {
        let mut commentator = Commentator::new(
            Arc::new(SlowSource(Duration::from_millis(800))),
            Duration::from_millis(50),
        );
        let requested = Instant::now();
        commentator.request(3, Verdict::Progress);

        let comment = wait_for_comment(&mut commentator).expect("fallback arrives");
        assert_eq!(comment.text, FALLBACK_COMMENT);
        assert!(requested.elapsed() < Duration::from_millis(800));
    }

    #[test]
    fn test_request_never_blocks() {
        let commentator = Commentator::new(
            Arc::new(SlowSource(Duration::from_millis(300))),
            Duration::from_secs(1),
        );
        let started = Instant::now();
        for score in 0..4 {
            commentator.request(score, Verdict::Progress);
        }
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_clear_forgets_latest() {
        let mut commentator = Commentator::new(Arc::new(EchoSource), Duration::from_secs(2));
        commentator.request(1, Verdict::Progress);
        wait_for_comment(&mut commentator).expect("comment arrives");

        commentator.clear();
        assert!(commentator.latest().is_none());
    }

    #[test]
    fn test_disabled_commentator() {
        let mut commentator = Commentator::disabled();
        assert!(!commentator.request(10, Verdict::Win));
        assert!(!commentator.poll());
        assert!(commentator.latest().is_none());
    }

    #[test]
    fn test_empty_command_has_no_source() {
        assert!(CommandSource::from_command(&[]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_source_reads_stdout() {
        // Score and status arrive as $0 and $1 of the script
        let source = CommandSource::from_command(&command(&[
            "sh",
            "-c",
            "cat > /dev/null; printf 'Floor %s, %s' \"$0\" \"$1\"",
        ]))
        .unwrap();
        assert_eq!(
            source.comment(7, Verdict::Progress, TIMEOUT).unwrap(),
            "Floor 7, PROGRESS"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_command_source_receives_prompt() {
        let source = CommandSource::from_command(&command(&["sh", "-c", "grep -c 'Score: 9'"]))
            .unwrap();
        assert_eq!(source.comment(9, Verdict::Win, TIMEOUT).unwrap(), "1");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_source_empty_reply() {
        let source =
            CommandSource::from_command(&command(&["sh", "-c", "cat > /dev/null"])).unwrap();
        assert_eq!(
            source.comment(1, Verdict::Fail, TIMEOUT).unwrap(),
            EMPTY_REPLY_FALLBACK
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_command_source_failure() {
        let source =
            CommandSource::from_command(&command(&["sh", "-c", "cat > /dev/null; exit 3"]))
                .unwrap();
        assert!(source.comment(1, Verdict::Fail, TIMEOUT).is_err());

        let missing =
            CommandSource::from_command(&command(&["/nonexistent/tower-commentary"])).unwrap();
        assert!(missing.comment(1, Verdict::Fail, TIMEOUT).is_err());
    }

    // True while a process with this pid exists and has not been reaped
    #[cfg(unix)]
    fn process_alive(pid: &str) -> bool {
        Command::new("kill")
            .args(["-0", pid])
            .status()
            .is_ok_and(|status| status.success())
    }

    // Pid the generator wrote, if it got that far before being stopped
    #[cfg(unix)]
    fn recorded_pid(path: &std::path::Path) -> Option<String> {
        let pid = fs::read_to_string(path).ok()?;
        let pid = pid.trim();
        (!pid.is_empty()).then(|| pid.to_string())
    }

    #[cfg(unix)]
    #[test]
    fn test_command_source_kills_hung_generator() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("generator.pid");
        let script = format!("echo $$ > '{}'; exec sleep 5", pid_path.display());
        let source = CommandSource::from_command(&command(&["sh", "-c", &script])).unwrap();

        let started = Instant::now();
        let result = source.comment(2, Verdict::Progress, Duration::from_millis(300));
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(2));

        if let Some(pid) = recorded_pid(&pid_path) {
            assert!(!process_alive(&pid));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timed_out_command_falls_back_and_is_stopped() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("generator.pid");
        let script = format!("echo $$ > '{}'; exec sleep 5", pid_path.display());
        let source = CommandSource::from_command(&command(&["sh", "-c", &script])).unwrap();
        let mut commentator = Commentator::new(Arc::new(source), Duration::from_millis(100));

        commentator.request(10, Verdict::Progress);
        let comment = wait_for_comment(&mut commentator).expect("fallback arrives");
        assert_eq!(comment.text, FALLBACK_COMMENT);

        // The fetch thread kills the generator right at its deadline
        let Some(pid) = recorded_pid(&pid_path) else {
            return;
        };
        let deadline = Instant::now() + Duration::from_secs(2);
        while process_alive(&pid) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!process_alive(&pid));
    }
}
