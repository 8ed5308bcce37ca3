use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::process::{Child, Command};
use tokio::time::timeout;

use crate::bin_path::resolve_executable;
use crate::executor::Executor;
use crate::readiness::{wait_until_ready, Readiness};
use crate::types::GaugeResult;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(60);

/// How long the service gets to exit after being asked to stop, before it is killed.
const STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for a [ServiceConfig].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    java_path: PathBuf,
    jar_path: PathBuf,
    port: u16,
    readiness: Option<Readiness>,
    startup_timeout: Duration,
}

impl ServiceConfigBuilder {
    pub fn new(jar_path: impl Into<PathBuf>) -> Self {
        Self {
            java_path: PathBuf::from("java"),
            jar_path: jar_path.into(),
            port: DEFAULT_PORT,
            readiness: None,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }

    /// Set the `java` executable. A bare name is looked up in the user's `PATH`.
    pub fn with_java_path(&mut self, java_path: impl Into<PathBuf>) -> &mut Self {
        self.java_path = java_path.into();
        self
    }

    pub fn with_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    /// Defaults to polling `GET /todos` on the configured port.
    pub fn with_readiness(&mut self, readiness: Readiness) -> &mut Self {
        self.readiness = Some(readiness);
        self
    }

    pub fn with_startup_timeout(&mut self, startup_timeout: Duration) -> &mut Self {
        self.startup_timeout = startup_timeout;
        self
    }

    pub fn build(self) -> GaugeResult<ServiceConfig> {
        let program = resolve_executable(&self.java_path)?;

        if !self.jar_path.is_file() {
            bail!(
                "Service jar not found at '{}'. Pass its location with '--jar'.",
                self.jar_path.display()
            );
        }

        let base_url = base_url(self.port);
        let readiness = self
            .readiness
            .unwrap_or_else(|| Readiness::http_poll(format!("{base_url}todos")));

        Ok(ServiceConfig {
            program,
            args: vec![
                OsString::from("-jar"),
                self.jar_path.into_os_string(),
                OsString::from(format!("-port={}", self.port)),
            ],
            base_url,
            readiness,
            startup_timeout: self.startup_timeout,
        })
    }
}

/// A validated description of how to start the todo service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    program: PathBuf,
    args: Vec<OsString>,
    base_url: String,
    readiness: Readiness,
    startup_timeout: Duration,
}

impl ServiceConfig {
    /// Root URL of the service, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

fn base_url(port: u16) -> String {
    format!("http://localhost:{port}/")
}

/// A running todo service.
///
/// Use [ServiceProcess::terminate] to stop it and collect its exit status. If it is dropped
/// instead then it is still asked to stop, but any failure is only logged.
pub struct ServiceProcess {
    executor: Arc<Executor>,
    child: Option<Child>,
    pid: u32,
}

impl ServiceProcess {
    /// Start the service and block until it is ready to take requests.
    ///
    /// If the service does not become ready within the configured startup timeout then it is killed
    /// and an error is returned.
    pub fn launch(executor: Arc<Executor>, config: &ServiceConfig) -> GaugeResult<Self> {
        let mut command = config.command();
        log::info!("Launching service: {:?}", command.as_std());

        let (child, pid) = executor.execute_in_place(async {
            let mut child = command
                .spawn()
                .with_context(|| format!("Failed to launch '{}'", config.program.display()))?;
            let pid = child
                .id()
                .context("Service exited before its process id could be read")?;

            if let Err(e) =
                wait_until_ready(&mut child, &config.readiness, config.startup_timeout).await
            {
                if let Err(kill_err) = child.kill().await {
                    log::warn!("Failed to kill service that did not start: {kill_err}");
                }
                return Err(e);
            }

            Ok((child, pid))
        })?;

        log::info!("Service ready with pid {pid} at {}", config.base_url());

        Ok(Self {
            executor,
            child: Some(child),
            pid,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Ask the service to stop and wait for it to exit.
    pub fn terminate(mut self) -> GaugeResult<ExitStatus> {
        let child = self
            .child
            .take()
            .context("Service has already been stopped")?;
        stop(&self.executor, child)
    }
}

impl Drop for ServiceProcess {
    fn drop(&mut self) {
        if let Some(child) = self.child.take() {
            if let Err(e) = stop(&self.executor, child) {
                log::warn!("Failed to stop service with pid {}: {e:?}", self.pid);
            }
        }
    }
}

fn stop(executor: &Executor, mut child: Child) -> GaugeResult<ExitStatus> {
    request_termination(&mut child)?;

    executor.execute_in_place(async move {
        let status = match timeout(STOP_TIMEOUT, child.wait()).await {
            Ok(status) => status.context("Failed to wait for the service to exit")?,
            Err(_) => {
                log::warn!(
                    "Service did not exit within {}s, killing it",
                    STOP_TIMEOUT.as_secs()
                );
                child.kill().await.context("Failed to kill the service")?;
                child
                    .wait()
                    .await
                    .context("Failed to wait for the service to exit")?
            }
        };

        log::info!("Service exited with {status}");
        Ok(status)
    })
}

#[cfg(unix)]
fn request_termination(child: &mut Child) -> GaugeResult<()> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    // Already reaped, nothing to signal.
    let Some(id) = child.id() else {
        return Ok(());
    };

    let pid = i32::try_from(id).context("Service pid does not fit in a pid_t")?;
    if let Err(e) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        log::warn!("Failed to send SIGTERM to service {id}: {e}");
        child.start_kill().context("Failed to kill the service")?;
    }

    Ok(())
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) -> GaugeResult<()> {
    child.start_kill().context("Failed to kill the service")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn build_requires_jar() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = ServiceConfigBuilder::new(dir.path().join("missing.jar"));
        builder.with_java_path(std::env::current_exe().unwrap());

        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("missing.jar"), "{err:?}");
    }

    #[test]
    fn build_java_command() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("service.jar");
        std::fs::write(&jar, b"").unwrap();
        let java = std::env::current_exe().unwrap();

        let mut builder = ServiceConfigBuilder::new(&jar);
        builder.with_java_path(&java).with_port(9123);
        let config = builder.build().unwrap();

        assert_eq!(config.program(), java.as_path());
        assert_eq!(
            config.args(),
            &[
                OsString::from("-jar"),
                jar.clone().into_os_string(),
                OsString::from("-port=9123"),
            ]
        );
        assert_eq!(config.base_url(), "http://localhost:9123/");
        assert_eq!(
            config.readiness(),
            &Readiness::http_poll("http://localhost:9123/todos")
        );
    }

    #[test]
    fn build_keeps_chosen_readiness() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("service.jar");
        std::fs::write(&jar, b"").unwrap();

        let mut builder = ServiceConfigBuilder::new(&jar);
        builder
            .with_java_path(std::env::current_exe().unwrap())
            .with_readiness(Readiness::log_lines(12));
        let config = builder.build().unwrap();

        assert_eq!(config.readiness(), &Readiness::log_lines(12));
    }

    #[cfg(unix)]
    fn shell_service(script: &str, readiness: Readiness, startup_timeout: Duration) -> ServiceConfig {
        ServiceConfig {
            program: PathBuf::from("/bin/sh"),
            args: vec![OsString::from("-c"), OsString::from(script)],
            base_url: base_url(DEFAULT_PORT),
            readiness,
            startup_timeout,
        }
    }

    #[cfg(unix)]
    #[test]
    fn launch_and_terminate() {
        let executor = Arc::new(Executor::new().unwrap());
        let config = shell_service(
            "echo one; echo two; echo three; exec sleep 30",
            Readiness::log_lines(3),
            Duration::from_secs(10),
        );

        let service = ServiceProcess::launch(executor, &config).unwrap();
        assert!(service.pid() > 0);

        // Stopped by SIGTERM rather than exiting on its own.
        let status = service.terminate().unwrap();
        assert!(!status.success());
    }

    #[cfg(unix)]
    #[test]
    fn launch_times_out() {
        let executor = Arc::new(Executor::new().unwrap());
        let config = shell_service(
            "echo one; exec sleep 30",
            Readiness::log_lines(3),
            Duration::from_millis(300),
        );

        let err = ServiceProcess::launch(executor, &config)
            .err()
            .expect("service should not be ready");
        assert!(format!("{err:?}").contains("Timed-out"), "{err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn launch_fails_when_service_exits() {
        let executor = Arc::new(Executor::new().unwrap());
        let config = shell_service(
            "echo failed to bind >&2; exit 1",
            Readiness::http_poll("http://127.0.0.1:1/todos"),
            Duration::from_secs(10),
        );

        let err = ServiceProcess::launch(executor, &config)
            .err()
            .expect("service should not be ready");
        assert!(format!("{err:?}").contains("exited"), "{err:?}");
    }
}
