// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

/// Note that if you wrap this up in a non blocking writer, the log lines that are
/// written right before the process exits can be lost. The host's main event loop often
/// ends with a terminal restore, and those are the lines you want to see.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no parent directory
/// - The path has no file name
pub fn try_create_rolling_file_appender(
    path: &Path,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access the folder of {}. It might not exist, or you might not have the \
             required permissions.",
            path.display()
        )
    })?;

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access the file name of {}. It might not exist, or you might not have \
             the required permissions.",
            path.display()
        )
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}
