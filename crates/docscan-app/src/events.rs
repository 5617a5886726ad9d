use docscan_core::{PathImageSource, ScanSession, SessionEvent, SubmitOutcome};
use docscan_types::Notification;
use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;

use crate::commands::{HELP, UserCommand};
use crate::render::Renderer;

enum Flow {
    Continue,
    Quit,
}

/// App's main loop. Owns the session; every transition happens here, one at a time.
pub async fn event_loop(
    mut session: ScanSession,
    commands_rx: AsyncReceiver<UserCommand>,
    session_rx: AsyncReceiver<SessionEvent>,
    cancel: CancellationToken,
    mut renderer: Renderer,
) -> anyhow::Result<()> {
    let mut notifications = session.notifications().subscribe();
    renderer.render(&session.view())?;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] cancelled");
                break;
            }
            command = commands_rx.recv() => {
                let Ok(command) = command else {
                    tracing::warn!("[EVENT_LOOP] input closed");
                    break;
                };
                if let Flow::Quit = handle_command(&mut session, &mut renderer, command).await? {
                    break;
                }
                renderer.render(&session.view())?;
            }
            event = session_rx.recv() => {
                let event = event?;
                if session.apply(event) {
                    renderer.render(&session.view())?;
                }
            }
            changed = notifications.changed() => {
                if changed.is_err() {
                    break;
                }
                notifications.borrow_and_update();
                renderer.render(&session.view())?;
            }
        }
    }

    Ok(())
}

async fn handle_command(
    session: &mut ScanSession,
    renderer: &mut Renderer,
    command: UserCommand,
) -> anyhow::Result<Flow> {
    tracing::debug!(">>> HANDLING COMMAND {:?} <<<", command);
    match command {
        UserCommand::Acquire { origin, path } => {
            let source = PathImageSource::from_choice(&path);
            session.acquire(&source, origin).await;
        }
        UserCommand::Submit => match session.submit() {
            SubmitOutcome::Started => {}
            SubmitOutcome::NoImage => tracing::debug!("submit without image"),
            SubmitOutcome::AlreadyInFlight => {
                tracing::debug!("submit ignored while a request is in flight")
            }
        },
        UserCommand::Reset => session.reset(),
        UserCommand::Status => renderer.redraw(&session.view())?,
        UserCommand::Help => renderer.print(HELP)?,
        UserCommand::Invalid(message) => {
            session.notifications_mut().notify(Notification::error(message));
        }
        UserCommand::Quit => {
            tracing::info!("Quit requested");
            return Ok(Flow::Quit);
        }
    }

    Ok(Flow::Continue)
}
