use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;

use serde_json::Value;

use super::{DownloadEngine, EngineConfig, EngineError, RawStatus};

/// Marker put in front of every progress line so it can be told apart from
/// the engine's regular output.
const PROGRESS_MARKER: &str = "[progress]";

/// Runs the `yt-dlp` executable. The progress template makes it print each
/// progress hook dictionary as one line of JSON.
#[derive(Debug, Clone, Default)]
pub struct YtDlpEngine {
    config: EngineConfig,
}

impl YtDlpEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    fn args(&self, url: &str) -> Vec<String> {
        vec![
            "-f".to_owned(),
            self.config.format_selector(),
            "-o".to_owned(),
            self.config.output_template.clone(),
            "--merge-output-format".to_owned(),
            self.config.merge_format.clone(),
            "--newline".to_owned(),
            "--progress-template".to_owned(),
            format!("download:{}%(progress)j", PROGRESS_MARKER),
            "--".to_owned(),
            url.to_owned(),
        ]
    }
}

impl DownloadEngine for YtDlpEngine {
    fn download(
        &self,
        url: &str,
        hook: &mut dyn FnMut(&RawStatus),
    ) -> Result<(), EngineError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(self.args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.config.output_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| EngineError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;
        let mut child = ChildGuard(Some(child));
        tracing::info!("{} started for {}", self.config.program, url);

        let (stdout, stderr) = child.take_pipes()?;

        // Drained on its own thread so a chatty stderr can't stall stdout.
        let stderr_reader = thread::spawn(move || {
            let mut lines = Vec::new();
            let _ = for_each_line(stderr, |line| lines.push(line));
            lines
        });

        for_each_line(stdout, |line| match parse_progress_line(&line) {
            Some(status) => hook(&status),
            None => tracing::trace!("yt-dlp: {}", line),
        })?;

        let status = child.wait()?;
        let stderr_lines = stderr_reader.join().unwrap_or_default();

        if status.success() {
            tracing::info!("{} finished for {}", self.config.program, url);
            return Ok(());
        }

        let message = last_error_line(&stderr_lines)
            .unwrap_or_else(|| format!("{} exited with {}", self.config.program, status));
        tracing::warn!("{} failed for {}: {}", self.config.program, url, message);
        Err(EngineError::Failed {
            code: status.code(),
            message,
        })
    }
}

/// Kills and reaps the engine unless it was waited on, so an early return
/// or a panicking hook never leaves a download running unattended.
struct ChildGuard(Option<Child>);

impl ChildGuard {
    fn take_pipes(&mut self) -> io::Result<(ChildStdout, ChildStderr)> {
        let child = self
            .0
            .as_mut()
            .ok_or_else(|| io::Error::other("engine already reaped"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("engine stdout not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("engine stderr not captured"))?;
        Ok((stdout, stderr))
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        match self.0.take() {
            Some(mut child) => child.wait(),
            None => Err(io::Error::other("engine already reaped")),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.0.take() {
            tracing::warn!("Stopping engine process {}", child.id());
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Feed every line of `reader` to `f`. The engine's output follows the
/// console encoding, so bytes that aren't UTF-8 are replaced, not fatal.
fn for_each_line(reader: impl Read, mut f: impl FnMut(String)) -> io::Result<()> {
    for line in BufReader::new(reader).split(b'\n') {
        let line = line?;
        f(String::from_utf8_lossy(&line).trim_end_matches('\r').to_string());
    }
    Ok(())
}

fn parse_progress_line(line: &str) -> Option<RawStatus> {
    let json = line.trim().strip_prefix(PROGRESS_MARKER)?;
    match serde_json::from_str::<Value>(json).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// The most useful line of a failed run: the last `ERROR:` line, else the
/// last non-empty line.
fn last_error_line(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .rev()
        .find_map(|line| line.trim().strip_prefix("ERROR:"))
        .map(|msg| msg.trim().to_string())
        .or_else(|| {
            lines
                .iter()
                .rev()
                .map(|line| line.trim())
                .find(|line| !line.is_empty())
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_follow_config() {
        let engine = YtDlpEngine::default();
        let args = engine.args("https://youtu.be/abc123");
        assert_eq!(args[0], "-f");
        assert_eq!(args[1], "bestvideo[height<=1080]+bestaudio/best");
        assert_eq!(args[3], "%(title)s.%(ext)s");
        assert!(args.windows(2).any(|w| w[0] == "--merge-output-format" && w[1] == "mp4"));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc123");
        assert_eq!(args[args.len() - 2], "--");
    }

    #[test]
    fn test_parse_progress_line() {
        let status = parse_progress_line(
            r#"[progress]{"status": "downloading", "_percent_str": " 45.2%", "downloaded_bytes": 1024}"#,
        )
        .unwrap();
        assert_eq!(status["status"], "downloading");
        assert_eq!(status["_percent_str"], " 45.2%");
    }

    #[test]
    fn test_parse_progress_line_ignores_other_output() {
        assert!(parse_progress_line("[youtube] abc123: Downloading webpage").is_none());
        assert!(parse_progress_line("[progress]not json").is_none());
        assert!(parse_progress_line("[progress][1, 2]").is_none());
        assert!(parse_progress_line("").is_none());
    }

    #[test]
    fn test_last_error_line() {
        let lines = vec![
            "WARNING: something odd".to_string(),
            "ERROR: [youtube] abc123: HTTP Error 403: Forbidden".to_string(),
            "".to_string(),
        ];
        assert_eq!(
            last_error_line(&lines).unwrap(),
            "[youtube] abc123: HTTP Error 403: Forbidden"
        );
        assert_eq!(
            last_error_line(&["just noise".to_string()]).unwrap(),
            "just noise"
        );
        assert!(last_error_line(&[]).is_none());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let engine = YtDlpEngine::new(EngineConfig {
            program: "video-grabber-no-such-engine".to_string(),
            ..EngineConfig::default()
        });
        let mut calls = 0;
        let err = engine
            .download("https://youtu.be/abc123", &mut |_| calls += 1)
            .unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }));
        assert_eq!(calls, 0);
    }

    #[cfg(unix)]
    fn fake_engine(name: &str, body: &str) -> YtDlpEngine {
        use std::os::unix::fs::PermissionsExt;

        let path = std::env::temp_dir().join(format!(
            "video-grabber-{}-{}.sh",
            name,
            std::process::id()
        ));
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        YtDlpEngine::new(EngineConfig {
            program: path.to_string_lossy().into_owned(),
            ..EngineConfig::default()
        })
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_output_does_not_abort_download() {
        let engine = fake_engine(
            "latin1-stdout",
            r#"printf '[download] Destination: Caf\351.mp4\n'
printf '%s\n' '[progress]{"status":"downloading","_percent_str":"50.0%"}'
exit 0"#,
        );

        let mut seen = Vec::new();
        let result = engine.download("https://youtu.be/abc123", &mut |status| {
            seen.push(status["_percent_str"].clone())
        });

        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(seen, vec![Value::from("50.0%")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_stderr_keeps_error_line() {
        let engine = fake_engine(
            "latin1-stderr",
            r#"printf 'WARNING: Caf\351 title\n' >&2
printf 'ERROR: HTTP Error 403: Forbidden\n' >&2
exit 1"#,
        );

        let err = engine
            .download("https://youtu.be/abc123", &mut |_| {})
            .unwrap_err();
        match err {
            EngineError::Failed { code, message } => {
                assert_eq!(code, Some(1));
                assert_eq!(message, "HTTP Error 403: Forbidden");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_panicking_hook_stops_engine() {
        let pid_file = std::env::temp_dir().join(format!(
            "video-grabber-engine-{}.pid",
            std::process::id()
        ));
        let engine = fake_engine(
            "long-running",
            &format!(
                r#"echo $$ > '{}'
printf '%s\n' '[progress]{{"status":"downloading","_percent_str":"1.0%"}}'
exec sleep 30"#,
                pid_file.display()
            ),
        );

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            engine.download("https://youtu.be/abc123", &mut |_| panic!("hook failed"))
        }));
        assert!(outcome.is_err());

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let alive = Command::new("kill")
            .args(["-0", pid.trim()])
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(!alive.success(), "engine process {} still running", pid.trim());
    }
}
