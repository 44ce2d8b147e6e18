mod prompt;
mod render;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use prompt::ConsolePrompter;
use render::{ColorMode, RenderOptions, Renderer, use_color};
use std::process::ExitCode;
use worklog_core::{TimeSpec, Tracker, timespec};

/// worklog — track where your day went, one task at a time
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Prints the log root directory
    #[arg(long, short, exclusive = true)]
    path: bool,
    /// Control ANSI colors in output.
    /// By default, colors are disabled when output is redirected (e.g with `>` or `|`).
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new task, closing the currently open one if any
    Start {
        /// The task's description; prompted for when omitted
        description: Vec<String>,
        #[command(flatten)]
        when: When,
    },
    /// Pick a task from the day's history and start it again
    Resume {
        #[command(flatten)]
        when: When,
    },
    /// Close the currently open task
    Stop {
        #[command(flatten)]
        when: When,
    },
    /// Show the day's log and the per-task rollup
    Report {
        /// Report on the log for DAY (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        day: Option<String>,
    },
}

#[derive(Args, Debug)]
struct When {
    /// Log the change at TIME (HH:MM or HH:MM:SS) instead of now
    #[arg(long, short = 'a', value_name = "TIME", conflicts_with = "ago")]
    at: Option<String>,
    /// Log the change DURATION ago (e.g. "1h 30m") instead of now
    #[arg(long, short = 'g', value_name = "DURATION")]
    ago: Option<String>,
    /// Operate on the log for DAY (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    day: Option<String>,
}

impl When {
    fn spec(&self) -> worklog_core::Result<TimeSpec> {
        TimeSpec::from_args(self.at.as_deref(), self.ago.as_deref())
    }

    fn date(&self) -> worklog_core::Result<NaiveDate> {
        timespec::parse_day_or_today(self.day.as_deref())
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("worklog: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let tracker = Tracker::new()?;
    let renderer = Renderer::new(Some(RenderOptions {
        date_format: tracker.config.date_format.clone(),
        use_color: use_color(cli.color),
    }));

    if cli.path {
        renderer.print_info(&format!("{}", tracker.store().root().display()));
        return Ok(());
    }

    let report = match cli.command {
        Some(Command::Start { description, when }) => {
            let description = if description.is_empty() {
                None
            } else {
                Some(description.join(" "))
            };
            let log = tracker.start(
                when.date()?,
                when.spec()?,
                description,
                &mut ConsolePrompter::new(),
                None,
            )?;
            tracker.summarize(&log)
        }
        Some(Command::Resume { when }) => {
            let log = tracker.resume(
                when.date()?,
                when.spec()?,
                &mut ConsolePrompter::new(),
                None,
            )?;
            tracker.summarize(&log)
        }
        Some(Command::Stop { when }) => {
            let log = tracker.stop(when.date()?, when.spec()?, None)?;
            tracker.summarize(&log)
        }
        Some(Command::Report { day }) => {
            tracker.report(timespec::parse_day_or_today(day.as_deref())?)?
        }
        None => tracker.report(timespec::parse_day_or_today(None)?)?,
    };

    renderer.print_report(&report);
    Ok(())
}
