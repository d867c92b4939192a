use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::models::event::RideEvent;
use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let rx = state.ride_events_tx.subscribe();

    info!("websocket client connected");

    let send_task = tokio::spawn(relay_events(rx, sender));

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!("websocket client disconnected");
}

/// Forwards every ride event as a JSON text frame until the channel closes
/// or the sink stops accepting messages.
pub async fn relay_events<S>(mut rx: broadcast::Receiver<RideEvent>, mut sink: S)
where
    S: Sink<Message> + Unpin,
{
    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "websocket client lagging; ride events dropped");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to serialize ride event for ws");
                continue;
            }
        };

        if sink.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc;

    use super::*;
    use crate::engine::dispatch;
    use crate::engine::pricing::FareSchedule;
    use crate::models::driver::VehicleType;
    use crate::models::location::Location;
    use crate::models::ride::{RideStatus, TransitionPolicy};
    use crate::models::rider::Rider;

    fn next_event(message: Message) -> RideEvent {
        match message {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected a text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn relays_ride_events_as_json_text() {
        let state = AppState::new(16, TransitionPolicy::Strict, FareSchedule::default());
        let (tx, mut frames) = mpsc::channel(16);
        tokio::spawn(relay_events(state.ride_events_tx.subscribe(), tx));

        let center = Location::new("City Center", 0.0, 0.0);
        let rider = dispatch::register_rider(&state, Rider::new("Charlie", "555-666", center.clone()));
        let ride = dispatch::create_ride(
            &state,
            rider.id,
            center,
            Location::new("Suburb", 5.0, 5.0),
            VehicleType::Sedan,
        )
        .unwrap();

        let event = next_event(frames.next().await.unwrap());
        assert_eq!(event.ride_id, ride.id());
        assert_eq!(event.status, RideStatus::Requested);
        assert!(event.driver_id.is_none());
    }

    #[tokio::test]
    async fn relay_stops_when_channel_closes() {
        let (events_tx, events_rx) = broadcast::channel::<RideEvent>(4);
        let (tx, mut frames) = mpsc::channel(4);
        let relay = tokio::spawn(relay_events(events_rx, tx));

        drop(events_tx);

        relay.await.unwrap();
        assert!(frames.next().await.is_none());
    }
}
