use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::{
    events::{EventHandler, EventProducer, Handler, PaymentReceivedEvent},
    traits::{NotificationError, Notifier},
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub payment_received_producer: Vec<EventProducer<PaymentReceivedEvent>>,
}

impl Notifier for EventProducers {
    async fn ln_payment_received(&self, event: PaymentReceivedEvent) -> Result<(), NotificationError> {
        trace!("📬️ Publishing payment received event for {}", event.payment_hash);
        for producer in &self.payment_received_producer {
            producer.publish_event(event.clone()).await?;
        }
        Ok(())
    }
}

pub struct EventHandlers {
    pub on_payment_received: Option<EventHandler<PaymentReceivedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_payment_received = hooks.on_payment_received.map(|f| EventHandler::new(buffer_size, f));
        Self { on_payment_received }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_payment_received {
            result.payment_received_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_payment_received {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_payment_received: Option<Handler<PaymentReceivedEvent>>,
}

impl EventHooks {
    pub fn on_payment_received<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PaymentReceivedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_payment_received = Some(Arc::new(f));
        self
    }
}
