// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Runs two commands from a (pretend) full screen app:
//! 1. `sh`, with its stdout tapped by a byte counting proxy.
//! 2. `$EDITOR` (or `vi`), directly on the terminal.
//!
//! Run it with `cargo run --example exec_editor -- [file]`. Logs go to
//! `r3bl_exec_log.txt`, since the display belongs to the commands while they run.

use std::{env,
          process::{Command, Stdio},
          sync::{Arc,
                 atomic::{AtomicUsize, Ordering}}};

use r3bl_exec::{CHANNEL_WIDTH,
                CrosstermHostTerminal,
                ExecController,
                HandoffSignal,
                OsExecCommand,
                ProxyHandler,
                TerminalModes,
                TracingConfig,
                WriterProxy,
                request_exec,
                try_initialize_logging_global};
use tokio::sync::mpsc;
use tracing_core::LevelFilter;

#[derive(Debug)]
enum DemoMsg {
    ShellDone(Option<String>),
    EditorDone(Option<String>),
}

fn main() -> miette::Result<()> {
    try_initialize_logging_global(TracingConfig::new_file(None, LevelFilter::DEBUG))?;

    let file = env::args().nth(1).unwrap_or_else(|| "r3bl_exec_demo.txt".to_string());
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    let (sender, mut receiver) = mpsc::channel::<HandoffSignal<DemoMsg>>(CHANNEL_WIDTH);
    let mut host_terminal = CrosstermHostTerminal::new(TerminalModes::default());
    host_terminal.enter()?;
    let mut controller = ExecController::new(host_terminal, sender.clone());

    let stdout_byte_count = Arc::new(AtomicUsize::new(0));
    let stdout_byte_count_in_handler = stdout_byte_count.clone();
    let stdout_proxy = WriterProxy::new(ProxyHandler::new(move |buf, _, _| {
        stdout_byte_count_in_handler.fetch_add(buf.len(), Ordering::SeqCst);
    }));

    let mut sh = Command::new("sh");
    sh.args(["-c", "echo 'hello from sh, the editor opens next'; sleep 2"]);
    request_exec(
        &sender,
        OsExecCommand::new(sh)
            // Nothing to read, so don't let a stdin pump wait on the host's input.
            .with_stdin(Stdio::null())
            .with_stdout_proxy(stdout_proxy),
        Some(Box::new(|result: miette::Result<()>| {
            DemoMsg::ShellDone(result.err().map(|it| format!("{it:?}")))
        })),
    );

    let mut outcomes = vec![];
    while let Some(signal) = receiver.blocking_recv() {
        match controller.handle_signal(signal) {
            Some(DemoMsg::ShellDone(maybe_error)) => {
                outcomes.push(format!("sh: {maybe_error:?}"));
                let mut editor_command = Command::new(&editor);
                editor_command.arg(&file);
                request_exec(
                    &sender,
                    OsExecCommand::new(editor_command).inherit_terminal(),
                    Some(Box::new(|result: miette::Result<()>| {
                        DemoMsg::EditorDone(result.err().map(|it| format!("{it:?}")))
                    })),
                );
            }
            Some(DemoMsg::EditorDone(maybe_error)) => {
                outcomes.push(format!("{editor}: {maybe_error:?}"));
                break;
            }
            None => {}
        }
    }

    controller.host_terminal.exit()?;

    for outcome in outcomes {
        println!("{outcome}");
    }
    println!(
        "sh wrote {} bytes to stdout",
        stdout_byte_count.load(Ordering::SeqCst)
    );

    Ok(())
}
