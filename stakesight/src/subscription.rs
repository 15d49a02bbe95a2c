use std::time::Duration;

use iced::Subscription;
use iced::futures::Stream;

use stakesight_framework::{ActionError, ActionPlan, ChainError};

use crate::message::{Message, PanelId};

/// One price step per second.
pub fn price_subscription() -> Subscription<Message> {
    iced::time::every(Duration::from_secs(1)).map(|_| Message::PriceTick)
}

/// Poll ticks for a panel at its interval.
///
/// The initial read on connect is issued by the app; this only covers the
/// periodic cycles. Each panel gets its own mapping function so two panels
/// with equal intervals stay distinct subscriptions.
pub fn poll_subscription(panel: PanelId, interval: Duration) -> Subscription<Message> {
    match panel {
        PanelId::Staking => {
            iced::time::every(interval).map(|_| Message::PollTick(PanelId::Staking))
        }
        PanelId::Portfolio => {
            iced::time::every(interval).map(|_| Message::PollTick(PanelId::Portfolio))
        }
    }
}

/// Window frames while any display value is animating.
pub fn frame_subscription() -> Subscription<Message> {
    iced::window::frames().map(Message::Frame)
}

/// Run the plan of action `id` and report its progress as messages.
///
/// Yields one [`Message::ActionPhase`] per step as it begins, then a single
/// [`Message::ActionFinished`], all tagged with `id`.
pub fn action_stream(id: u64, plan: ActionPlan) -> impl Stream<Item = Message> {
    let kind = plan.kind();

    async_stream::stream! {
        let (phase_tx, mut phase_rx) = tokio::sync::mpsc::unbounded_channel::<String>();

        let run = tokio::spawn(plan.run(move |phase: &str| {
            // The receiver only goes away with the stream itself.
            let _ = phase_tx.send(phase.to_string());
        }));

        while let Some(phase) = phase_rx.recv().await {
            yield Message::ActionPhase(id, phase);
        }

        let result = match run.await {
            Ok(Ok(receipts)) => {
                tracing::debug!(action = %kind, confirmed = receipts.len(), "Action stream done");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(e) => {
                tracing::error!(action = %kind, error = %e, "Action task failed");
                Err(ActionError::Step {
                    step: kind.label().to_string(),
                    source: ChainError::Transport(e.to_string()),
                })
            }
        };

        yield Message::ActionFinished(id, kind, result);
    }
}
