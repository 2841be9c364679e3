// Consumer delivery loop shared by the doctor and schedules services
//
// Runs on its own task, fully decoupled from HTTP handling. Acknowledgement
// is manual: a successful side effect acks, a failed one nacks with requeue
// so the broker redelivers (at-least-once; a crash between side effect and
// ack also redelivers). There is no dedup and no dead-letter path here;
// consumers either tolerate duplicate side effects or bring their own key.

use futures_lite::stream::StreamExt;
use lapin::{
    options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicRejectOptions},
    types::FieldTable,
    Channel,
};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::events::{connect_broker, declare_topology, EventError, ScheduleEvent};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

/// Consume `queue` indefinitely, surviving broker outages.
///
/// Each attempt opens a fresh connection, redeclares the (idempotent)
/// topology and attaches a consumer. When the connection drops or the
/// delivery stream ends, the loop backs off and reconnects instead of
/// leaving the service running without a consumer. Never returns.
pub async fn run_consumer_with_recovery<F, Fut>(
    amqp_url: &str,
    queue: &str,
    consumer_tag: &str,
    handler: F,
) where
    F: Fn(ScheduleEvent) -> Fut,
    Fut: Future<Output = Result<(), EventError>>,
{
    let mut backoff = INITIAL_BACKOFF;
    loop {
        match attach(amqp_url, queue).await {
            Ok((_connection, channel)) => {
                backoff = INITIAL_BACKOFF;
                match run_consumer(&channel, queue, consumer_tag, &handler).await {
                    Ok(()) => warn!("Delivery stream for {} ended, resubscribing", queue),
                    Err(e) => warn!("Consumer on {} failed, resubscribing: {}", queue, e),
                }
            }
            Err(e) => {
                warn!(
                    "Broker unavailable for {}, retrying in {:?}: {}",
                    queue, backoff, e
                );
            }
        }
        tokio::time::sleep(backoff).await;
        backoff = next_backoff(backoff);
    }
}

/// Connect, declare the queue topology and hand back the channel. The
/// connection is returned too so it stays alive while the channel is used.
async fn attach(
    amqp_url: &str,
    queue: &str,
) -> Result<(lapin::Connection, Channel), EventError> {
    let connection = connect_broker(amqp_url).await?;
    let channel = connection.create_channel().await?;
    declare_topology(&channel, queue).await?;
    Ok((connection, channel))
}

/// Consume `queue` until the delivery stream ends, applying `handler` to
/// each decoded event.
///
/// Returns only when the delivery stream ends (connection loss);
/// `run_consumer_with_recovery` wraps this with reconnection.
pub async fn run_consumer<F, Fut>(
    channel: &Channel,
    queue: &str,
    consumer_tag: &str,
    handler: F,
) -> Result<(), EventError>
where
    F: Fn(ScheduleEvent) -> Fut,
    Fut: Future<Output = Result<(), EventError>>,
{
    let mut consumer = channel
        .basic_consume(
            queue,
            consumer_tag,
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;

    info!("Consuming {} as {}", queue, consumer_tag);

    while let Some(delivery) = consumer.next().await {
        let delivery = delivery?;

        match serde_json::from_slice::<ScheduleEvent>(&delivery.data) {
            Ok(event) => match handler(event).await {
                Ok(()) => {
                    delivery.ack(BasicAckOptions::default()).await?;
                }
                Err(e) => {
                    // Redeliver: the side effect may succeed on a later
                    // attempt. Poison messages loop until broker-side
                    // limits intervene.
                    warn!("Processing failed on {}, requeueing: {}", queue, e);
                    delivery
                        .nack(BasicNackOptions {
                            requeue: true,
                            ..Default::default()
                        })
                        .await?;
                }
            },
            Err(e) => {
                // A payload that cannot decode will never decode; drop it
                // instead of redelivering forever
                error!("Undecodable message on {}, rejecting: {}", queue, e);
                delivery
                    .reject(BasicRejectOptions { requeue: false })
                    .await?;
            }
        }
    }

    warn!("Delivery stream for {} ended", queue);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let mut backoff = INITIAL_BACKOFF;
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(backoff.as_secs());
            backoff = next_backoff(backoff);
        }
        assert_eq!(seen, vec![1, 2, 4, 8, 16, 30, 30, 30]);
    }

    #[test]
    fn backoff_never_exceeds_the_cap() {
        assert_eq!(next_backoff(MAX_BACKOFF), MAX_BACKOFF);
        assert_eq!(next_backoff(Duration::from_secs(29)), MAX_BACKOFF);
    }
}
