//! End-to-end tests of the `jobsh` binary driven through a pipe.

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

fn jobsh() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jobsh"));
    cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd
}

/// Feed `script` to `jobsh -p` and collect (status, stdout, stderr).
fn run_script(script: &str) -> (i32, String, String) {
    let mut child = jobsh().arg("-p").spawn().expect("spawn jobsh");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(script.as_bytes())
        .expect("write script");
    let output = child.wait_with_output().expect("wait for jobsh");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn end_of_input_exits_zero() {
    let (code, stdout, _) = run_script("");
    assert_eq!(code, 0);
    assert_eq!(stdout, "");
}

#[test]
fn foreground_output_then_quit() {
    let (code, stdout, _) = run_script("/bin/echo hello 'big world'\nquit\n/bin/echo unreachable\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "hello big world\n");
}

#[test]
fn background_job_is_listed() {
    let (code, stdout, _) = run_script("sleep 2 &\njobs\nquit\n");
    assert_eq!(code, 0);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "stdout: {stdout}");
    let pid = lines[0]
        .strip_prefix("[1] ")
        .and_then(|rest| rest.strip_suffix(" sleep 2 &"))
        .unwrap_or_else(|| panic!("unexpected launch line: {}", lines[0]));
    assert_eq!(lines[1], format!("[1] ({pid}) Running sleep 2 &"));
}

#[test]
fn verbose_reports_added_jobs() {
    let mut child = jobsh().arg("-vp").spawn().expect("spawn jobsh");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"/bin/true\n")
        .expect("write script");
    let output = child.wait_with_output().expect("wait for jobsh");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Added job [1] "), "stdout: {stdout}");
    assert!(stdout.trim_end().ends_with(" /bin/true"), "stdout: {stdout}");
}

#[test]
fn bad_targets_are_reported() {
    let (code, _, stderr) = run_script("fg 999999\nbg %333\nfg\n");
    assert_eq!(code, 0);
    assert_eq!(
        stderr,
        "(999999): No such process\n%333: No such job\nfg command requires PID or %jobid argument\n"
    );
}

#[test]
fn missing_program_keeps_shell_alive() {
    let (code, stdout, stderr) = run_script("./jobsh_no_such_program\n/bin/echo still here\n");
    assert_eq!(code, 0);
    assert_eq!(stderr, "./jobsh_no_such_program: Command not found\n");
    assert_eq!(stdout, "still here\n");
}

#[test]
fn unknown_flag_prints_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_jobsh"))
        .arg("-x")
        .output()
        .expect("run jobsh");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Usage: jobsh"));
}

#[test]
fn sigquit_terminates_with_notice() {
    let mut child = jobsh().arg("-p").spawn().expect("spawn jobsh");
    let mut stdin = child.stdin.take().expect("stdin");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout"));

    // Once a line has been answered the signal listeners are installed.
    stdin.write_all(b"/bin/echo ready\n").expect("write");
    let mut line = String::new();
    stdout.read_line(&mut line).expect("read");
    assert_eq!(line, "ready\n");

    let status = Command::new("kill")
        .args(["-QUIT", &child.id().to_string()])
        .status()
        .expect("send SIGQUIT");
    assert!(status.success());

    line.clear();
    stdout.read_line(&mut line).expect("read");
    assert_eq!(line, "Terminating after receipt of SIGQUIT signal\n");
    assert_eq!(child.wait().expect("wait").code(), Some(1));
    drop(stdin);
}
