use std::collections::VecDeque;

use hostintel_model::Event;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{processor::EventProcessor, provenance::EventLog, source::SourceClient};

/// Minimal in-process orchestrator: a FIFO of pending events fed through a
/// single processor, with every emitted event routed back in.
///
/// Feedback terminates because the processor never handles the same payload
/// twice.
#[derive(Debug)]
pub struct ScanRunner<C> {
    processor: EventProcessor<C>,
    log: EventLog,
    queue: VecDeque<Event>,
    stop: CancellationToken,
}

impl<C> ScanRunner<C>
where
    C: SourceClient,
{
    /// `stop` should be the token the processor was built with so a stop
    /// request halts both the queue and the key loop of the current event.
    pub fn new(processor: EventProcessor<C>, stop: CancellationToken) -> Self {
        Self {
            processor,
            log: EventLog::new(),
            queue: VecDeque::new(),
            stop,
        }
    }

    pub fn processor(&self) -> &EventProcessor<C> {
        &self.processor
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn into_log(self) -> EventLog {
        self.log
    }

    /// Drive `seeds` and everything they cause until the queue drains or a
    /// stop is requested. Returns the number of events emitted by the unit.
    pub async fn run(&mut self, seeds: impl IntoIterator<Item = Event>) -> usize {
        for seed in seeds {
            if self.log.append(seed.clone()) {
                self.queue.push_back(seed);
            }
        }

        let mut emitted = 0;
        while let Some(event) = self.queue.pop_front() {
            if self.stop.is_cancelled() {
                info!(pending = self.queue.len() + 1, "scan stopped");
                break;
            }
            if !self.processor.watches(event.event_type()) {
                continue;
            }

            let produced = self.processor.handle(&event).await;
            debug!(
                event_type = %event.event_type(),
                produced = produced.len(),
                "event handled"
            );
            for child in produced {
                if self.log.append(child.clone()) {
                    emitted += 1;
                    self.queue.push_back(child);
                }
            }
        }

        emitted
    }
}

#[cfg(test)]
mod tests {
    use hostintel_model::EventType;

    use super::*;
    use crate::{
        options::ModuleOptions,
        source::{HostRecord, MockSourceClient},
    };

    fn options() -> ModuleOptions {
        ModuleOptions {
            credential: "X".into(),
            ..ModuleOptions::default()
        }
    }

    #[tokio::test]
    async fn feedback_of_emitted_addresses_is_absorbed() {
        let mut client = MockSourceClient::new();
        client
            .expect_query()
            .times(2)
            .returning(|_| Ok(HostRecord::parse(r#"{"os":"Linux"}"#).expect("record")));
        let stop = CancellationToken::new();
        let processor = EventProcessor::new(options(), client, stop.clone());
        let mut runner = ScanRunner::new(processor, stop);

        let seed = Event::seed(EventType::NetblockOwner, "192.0.2.0/31", "test");
        let emitted = runner.run([seed]).await;

        assert_eq!(emitted, 6);
        assert_eq!(runner.log().len(), 7);
    }

    #[tokio::test]
    async fn a_cancelled_run_handles_nothing() {
        let mut client = MockSourceClient::new();
        client.expect_query().never();
        let stop = CancellationToken::new();
        stop.cancel();
        let processor = EventProcessor::new(options(), client, stop.clone());
        let mut runner = ScanRunner::new(processor, stop);

        let seed = Event::seed(EventType::IpAddress, "192.0.2.1", "test");
        assert_eq!(runner.run([seed]).await, 0);
        assert_eq!(runner.log().len(), 1);
    }
}
