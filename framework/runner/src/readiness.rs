use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::process::{Child, ChildStdout};
use tokio::time::timeout;

use crate::types::GaugeResult;

/// Log target for everything the service writes to stdout.
pub const SERVICE_LOG_TARGET: &str = "todo_service";
/// Log target for everything the service writes to stderr.
pub const SERVICE_STDERR_LOG_TARGET: &str = "todo_service::stderr";

const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// How to decide that the service has finished starting and can take requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Wait for `count` lines on stdout, then wait a further `grace` period.
    LogLines { count: usize, grace: Duration },
    /// Send `GET url` every `interval` until the service answers with any status.
    HttpPoll { url: String, interval: Duration },
}

impl Readiness {
    pub fn log_lines(count: usize) -> Self {
        Readiness::LogLines {
            count,
            grace: Duration::from_millis(100),
        }
    }

    pub fn http_poll(url: impl Into<String>) -> Self {
        Readiness::HttpPoll {
            url: url.into(),
            interval: Duration::from_millis(250),
        }
    }
}

/// Wait until the service is ready, for at most `startup_timeout`.
///
/// Takes the child's stdout and stderr and keeps forwarding them to the log in the background, so
/// the service never blocks on a full pipe.
pub(crate) async fn wait_until_ready(
    child: &mut Child,
    readiness: &Readiness,
    startup_timeout: Duration,
) -> GaugeResult<()> {
    if let Some(stderr) = child.stderr.take() {
        forward_lines(BufReader::new(stderr).lines(), SERVICE_STDERR_LOG_TARGET);
    }
    let stdout_lines = BufReader::new(
        child
            .stdout
            .take()
            .context("Failed to get stdout for the running service")?,
    )
    .lines();

    let wait = async {
        match readiness {
            Readiness::LogLines { count, grace } => {
                wait_for_lines(stdout_lines, *count, *grace).await
            }
            Readiness::HttpPoll { url, interval } => {
                forward_lines(stdout_lines, SERVICE_LOG_TARGET);
                poll_until_answered(child, url, *interval).await
            }
        }
    };

    timeout(startup_timeout, wait).await.with_context(|| {
        format!(
            "Timed-out after {}s whilst waiting for the service to be ready",
            startup_timeout.as_secs_f64()
        )
    })?
}

async fn wait_for_lines(
    mut lines: Lines<BufReader<ChildStdout>>,
    count: usize,
    grace: Duration,
) -> GaugeResult<()> {
    let mut seen = 0;
    while seen < count {
        let line = lines
            .next_line()
            .await
            .context("Failed to read line from service stdout")?
            .ok_or_else(|| {
                anyhow!(
                    "Service closed its output after {seen} of {count} lines, before it was ready"
                )
            })?;
        seen += 1;
        log::info!(target: SERVICE_LOG_TARGET, "{line} {seen}");
    }

    forward_lines(lines, SERVICE_LOG_TARGET);
    tokio::time::sleep(grace).await;

    Ok(())
}

async fn poll_until_answered(child: &mut Child, url: &str, interval: Duration) -> GaugeResult<()> {
    let agent = ureq::config::Config::builder()
        .timeout_global(Some(PROBE_TIMEOUT))
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut attempt = 0u64;
    loop {
        attempt += 1;
        if let Some(status) = child
            .try_wait()
            .context("Failed to check whether the service is still running")?
        {
            bail!("Service exited with {status} before it was ready");
        }

        let probe_agent = agent.clone();
        let probe_url = url.to_string();
        let answered =
            tokio::task::spawn_blocking(move || probe_agent.get(&probe_url).call().is_ok())
                .await
                .context("Readiness probe failed to run")?;
        if answered {
            log::info!("Service answered '{url}' after {attempt} attempts");
            return Ok(());
        }

        log::trace!("Service not answering '{url}' yet, attempt {attempt}");
        tokio::time::sleep(interval).await;
    }
}

/// Forward each line to the log until the stream closes.
fn forward_lines<R>(mut lines: Lines<BufReader<R>>, target: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            if target == SERVICE_STDERR_LOG_TARGET {
                log::warn!(target: target, "{line}");
            } else {
                log::info!(target: target, "{line}");
            }
        }
    });
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::executor::Executor;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::process::Stdio;
    use tokio::process::Command;

    fn spawn_shell(executor: &Executor, script: &str) -> Child {
        executor
            .execute_in_place(async {
                Command::new("sh")
                    .arg("-c")
                    .arg(script)
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .kill_on_drop(true)
                    .spawn()
                    .context("failed to spawn shell")
            })
            .expect("failed to spawn")
    }

    fn wait(
        executor: &Executor,
        child: &mut Child,
        readiness: &Readiness,
        startup_timeout: Duration,
    ) -> GaugeResult<()> {
        executor.execute_in_place(wait_until_ready(child, readiness, startup_timeout))
    }

    #[test]
    fn ready_after_enough_lines() {
        let executor = Executor::new().unwrap();
        let mut child = spawn_shell(
            &executor,
            "for i in 1 2 3 4 5 6 7 8 9 10 11 12; do echo starting $i; done; exec sleep 30",
        );

        wait(
            &executor,
            &mut child,
            &Readiness::log_lines(12),
            Duration::from_secs(10),
        )
        .expect("service should be ready");
    }

    #[test]
    fn too_few_lines_times_out() {
        let executor = Executor::new().unwrap();
        let mut child = spawn_shell(&executor, "echo one; echo two; exec sleep 30");

        let err = wait(
            &executor,
            &mut child,
            &Readiness::log_lines(12),
            Duration::from_millis(500),
        )
        .unwrap_err();

        assert!(err.to_string().contains("Timed-out"), "{err:?}");
    }

    #[test]
    fn output_closed_before_ready() {
        let executor = Executor::new().unwrap();
        let mut child = spawn_shell(&executor, "echo one; echo two");

        let err = wait(
            &executor,
            &mut child,
            &Readiness::log_lines(12),
            Duration::from_secs(10),
        )
        .unwrap_err();

        assert!(err.to_string().contains("after 2 of 12 lines"), "{err:?}");
    }

    #[test]
    fn ready_when_http_answers() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/todos", listener.local_addr().unwrap());
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n[]",
                );
            }
        });

        let executor = Executor::new().unwrap();
        let mut child = spawn_shell(&executor, "exec sleep 30");

        wait(
            &executor,
            &mut child,
            &Readiness::http_poll(url),
            Duration::from_secs(10),
        )
        .expect("service should be ready");
    }

    #[test]
    fn exit_before_http_answers() {
        // Bind then drop to find a port with nothing listening.
        let port = TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .map(|a| a.port())
            .unwrap();

        let executor = Executor::new().unwrap();
        let mut child = spawn_shell(&executor, "exit 3");

        let err = wait(
            &executor,
            &mut child,
            &Readiness::http_poll(format!("http://127.0.0.1:{port}/todos")),
            Duration::from_secs(10),
        )
        .unwrap_err();

        assert!(err.to_string().contains("exited"), "{err:?}");
    }
}
