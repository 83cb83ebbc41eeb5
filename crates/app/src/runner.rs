use std::time::Duration as StdDuration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{MissedTickBehavior, interval};

use exam_core::model::{FinishReason, LifecycleState};
use exam_services::{ExamLoopService, SessionError, TickOutcome};

use crate::commands::Command;
use crate::render;

const TICK_PERIOD: StdDuration = StdDuration::from_secs(1);

/// Run one interactive exam until the user quits or input closes.
///
/// Input lines are multiplexed with a one-second timer so an exam left
/// unattended still finishes when its time runs out.
///
/// # Errors
///
/// Fails if the exam cannot start or input cannot be read.
pub async fn run<R>(svc: &mut ExamLoopService, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    print!("{}", render::instructions(svc.session().settings()));
    svc.start()?;
    show_question(svc);

    let mut lines = input.lines();
    let mut ticker = interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle(svc, command)?,
                    Err(err) => println!("{err}"),
                }
            }
            _ = ticker.tick() => {
                if svc.tick() == TickOutcome::Expired {
                    finished(svc, FinishReason::TimedOut)?;
                }
            }
        }
    }
    Ok(())
}

fn handle(svc: &mut ExamLoopService, command: Command) -> Result<()> {
    // Let an overdue deadline win over the command that arrived with it.
    if svc.tick() == TickOutcome::Expired {
        finished(svc, FinishReason::TimedOut)?;
    }

    let result = match command {
        Command::Answer(_) | Command::Skip => match command.answer() {
            Some(choice) => svc.answer(choice).map(|()| show_question(svc)),
            None => Ok(()),
        },
        Command::Next => svc.next().map(|_| show_question(svc)),
        Command::Previous => svc.previous().map(|_| show_question(svc)),
        Command::Submit => match svc.submit() {
            Ok(reason) => return finished(svc, reason),
            Err(err) => Err(err),
        },
        Command::Time => {
            match svc.remaining() {
                Some(remaining) => println!("Time left: {remaining}"),
                None => println!("No exam in progress."),
            }
            Ok(())
        }
        Command::Restart => svc.restart().map(|()| show_question(svc)),
        Command::Help => {
            println!("{}", Command::HELP);
            Ok(())
        }
        Command::Quit => Ok(()),
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_invalid_transition() => {
            if svc.session().lifecycle() == LifecycleState::Finished {
                println!("The exam is finished. Type `restart` for a new one or `quit`.");
            } else {
                println!("{err}");
            }
            Ok(())
        }
        Err(err @ SessionError::InvalidAnswer { .. }) => {
            println!("{err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn show_question(svc: &ExamLoopService) {
    if let Some(snapshot) = svc.snapshot() {
        print!("{}", render::question(&snapshot));
    }
}

fn finished(svc: &ExamLoopService, reason: FinishReason) -> Result<()> {
    println!("{}", render::finish_reason(reason));
    let report = svc.score()?;
    print!("{}", render::results(&report));
    println!("Type `restart` for a new exam or `quit` to leave.");
    Ok(())
}
