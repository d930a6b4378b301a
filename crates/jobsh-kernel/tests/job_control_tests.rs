//! Job control against real processes.
//!
//! Reaping uses `waitpid(-1)`, which collects any child of the test process.
//! Tests in one binary run on parallel threads, so every scenario that
//! launches processes lives in the single session below.

use std::sync::Arc;
use std::time::Duration;

use jobsh_kernel::process::Signal;
use jobsh_kernel::{BufferReporter, ExecResult, JobState, Kernel, OsProcesses, Outcome, ShellConfig};

fn session() -> (Kernel, BufferReporter) {
    let notices = BufferReporter::new();
    let kernel = Kernel::with_processes(
        ShellConfig::testing(),
        Arc::new(OsProcesses::new()),
        Arc::new(notices.clone()),
    );
    (kernel, notices)
}

async fn run(kernel: &Kernel, line: &str) -> ExecResult {
    match kernel.execute(line).await.expect("execute") {
        Outcome::Continue(result) => result,
        Outcome::Exit(code) => panic!("{line:?} exited the shell with {code}"),
    }
}

/// Poll `check` until it holds or five seconds pass.
async fn eventually<F, Fut>(what: &str, mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !check().await {
        assert!(tokio::time::Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn pid_of(kernel: &Kernel, command: &str) -> u32 {
    kernel
        .jobs()
        .list()
        .await
        .into_iter()
        .find(|job| job.command == command)
        .map(|job| job.pid)
        .unwrap_or_else(|| panic!("no job for {command:?}"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn job_control_session() {
    let (kernel, notices) = session();
    let _listeners = kernel.start_listeners().expect("listeners");
    let jobs = kernel.jobs();

    // Background launches are announced and listed.
    let result = run(&kernel, "sleep 30 &\n").await;
    let long = pid_of(&kernel, "sleep 30 &").await;
    assert_eq!(result.out, format!("[1] {long} sleep 30 &\n"));

    let result = run(&kernel, "sleep 1 &\n").await;
    let short = pid_of(&kernel, "sleep 1 &").await;
    assert_eq!(result.out, format!("[2] {short} sleep 1 &\n"));

    let listing = run(&kernel, "jobs").await;
    assert_eq!(
        listing.out,
        format!("[1] ({long}) Running sleep 30 &\n[2] ({short}) Running sleep 1 &\n")
    );

    // A foreground job that exits normally leaves nothing behind.
    let result = run(&kernel, "/bin/true").await;
    assert!(result.ok());
    assert_eq!(jobs.live_count().await, 2);
    assert!(notices.lines().is_empty());

    // A foreground job that stops hands the prompt back and stays listed.
    let stopper = "/bin/sh -c 'kill -STOP $$'";
    run(&kernel, stopper).await;
    let stopped = pid_of(&kernel, stopper).await;
    assert_eq!(jobs.get(stopped).await.map(|j| j.state), Some(JobState::Stopped));
    assert_eq!(
        notices.take(),
        vec![format!("Job [3] ({stopped}) stopped by signal {}", Signal::SIGSTOP as i32)]
    );

    // bg continues it; it then exits and is removed silently.
    let result = run(&kernel, "bg %3").await;
    assert_eq!(result.out, format!("[3] ({stopped}) {stopper}\n"));
    eventually("continued job to exit", || {
        let jobs = jobs.clone();
        async move { jobs.get(stopped).await.is_none() }
    })
    .await;
    assert!(notices.lines().is_empty());

    // Termination by signal is reported.
    run(&kernel, &format!("/bin/sh -c 'kill -INT {long}'")).await;
    eventually("terminated job to be reaped", || {
        let jobs = jobs.clone();
        async move { jobs.get(long).await.is_none() }
    })
    .await;
    assert_eq!(
        notices.take(),
        vec![format!("Job [1] ({long}) terminated by signal {}", Signal::SIGINT as i32)]
    );

    // Bad fg targets.
    assert_eq!(run(&kernel, "fg 999999").await.err, "(999999): No such process\n");
    assert_eq!(run(&kernel, "fg %333").await.err, "%333: No such job\n");
    assert_eq!(run(&kernel, "fg").await.err, "fg command requires PID or %jobid argument\n");
    assert_eq!(run(&kernel, "bg x").await.err, "bg: argument must be a PID or %jobid\n");

    // fg waits for the job to finish.
    run(&kernel, "fg %2").await;
    assert!(jobs.get(short).await.is_none());
    assert_eq!(jobs.live_count().await, 0);

    // Missing program: no job.
    let result = run(&kernel, "./jobsh_no_such_program").await;
    assert_eq!(result.err, "./jobsh_no_such_program: Command not found\n");
    assert_eq!(jobs.live_count().await, 0);

    // quit terminates what is left and asks to exit.
    run(&kernel, "sleep 30 &").await;
    assert_eq!(kernel.execute("quit").await.expect("execute"), Outcome::Exit(0));
    assert_eq!(jobs.live_count().await, 0);
}
