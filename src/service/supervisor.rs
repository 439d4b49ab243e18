//! Launching a Tika server in a Docker container.
//!
//! Failures are logged and reported as `false`, never as errors: another
//! Tika instance may already be listening on the port.

use std::ffi::OsStr;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

/// Default container name.
pub const CONTAINER_NAME: &str = "tika";

/// Default Tika image.
pub const TIKA_IMAGE: &str = "apache/tika:1.28.4";

/// Port the Tika server listens on inside the container.
const TIKA_PORT: u16 = 9998;

/// Lifecycle control for an extraction service process.
pub trait ServiceSupervisor {
    /// Start the service if needed. Returns `true` when a start succeeded.
    fn ensure_running(&self) -> bool;

    /// Remove any stale instance. Returns `true` when removal succeeded.
    fn force_reset(&self) -> bool;
}

/// Options for [`launch_tika`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Time to wait after start before the service is considered ready
    pub settle_time: Duration,

    /// Force-remove a same-named container first
    pub delete_existing: bool,
}

impl LaunchOptions {
    /// Create new launch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the settle time.
    pub fn with_settle_time(mut self, settle_time: Duration) -> Self {
        self.settle_time = settle_time;
        self
    }

    /// Enable or disable removal of an existing container.
    pub fn with_delete_existing(mut self, delete: bool) -> Self {
        self.delete_existing = delete;
        self
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            settle_time: Duration::from_secs(15),
            delete_existing: false,
        }
    }
}

/// Docker-backed supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerSupervisor {
    /// Docker executable
    pub program: String,

    /// Container name
    pub container_name: String,

    /// Image to run
    pub image: String,

    /// Host port mapped to the Tika port
    pub host_port: u16,

    /// Wait after a successful start
    pub settle_time: Duration,
}

impl DockerSupervisor {
    /// Create a supervisor with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the docker executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the container name.
    pub fn with_container_name(mut self, name: impl Into<String>) -> Self {
        self.container_name = name.into();
        self
    }

    /// Set the image.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the host port.
    pub fn with_host_port(mut self, port: u16) -> Self {
        self.host_port = port;
        self
    }

    /// Set the settle time.
    pub fn with_settle_time(mut self, settle_time: Duration) -> Self {
        self.settle_time = settle_time;
        self
    }

    /// Arguments of the `docker run` fallback.
    pub fn run_args(&self) -> Vec<String> {
        vec![
            "run".to_string(),
            "-d".to_string(),
            "-p".to_string(),
            format!("{}:{}", self.host_port, TIKA_PORT),
            "--name".to_string(),
            self.container_name.clone(),
            self.image.clone(),
        ]
    }

    fn docker<I, S>(&self, args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                log::debug!("Could not run '{}': {}", self.program, e);
                false
            }
        }
    }
}

impl Default for DockerSupervisor {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            container_name: CONTAINER_NAME.to_string(),
            image: TIKA_IMAGE.to_string(),
            host_port: TIKA_PORT,
            settle_time: Duration::from_secs(15),
        }
    }
}

impl ServiceSupervisor for DockerSupervisor {
    fn ensure_running(&self) -> bool {
        log::debug!("Starting Tika ...");

        let started = self.docker(["start", self.container_name.as_str()])
            || self.docker(self.run_args());

        if !started {
            log::warn!(
                "Tried to start Tika through Docker but this failed. \
                 It is likely that there is already an existing Tika instance running."
            );
            return false;
        }

        if !self.settle_time.is_zero() {
            thread::sleep(self.settle_time);
        }
        true
    }

    fn force_reset(&self) -> bool {
        // `docker rm` only removes stopped containers without --force
        self.docker(["rm", "--force", self.container_name.as_str()])
    }
}

/// Launch a Tika server through Docker.
///
/// Returns `true` when the container was started and the settle time elapsed.
pub fn launch_tika(options: &LaunchOptions) -> bool {
    let supervisor = DockerSupervisor::new().with_settle_time(options.settle_time);
    launch_with(&supervisor, options.delete_existing)
}

/// Launch a service through any supervisor.
pub fn launch_with<S: ServiceSupervisor + ?Sized>(supervisor: &S, delete_existing: bool) -> bool {
    if delete_existing {
        supervisor.force_reset();
    }
    supervisor.ensure_running()
}
