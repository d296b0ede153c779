use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::ChannelSelector;
use crate::async_task::spawn_task;
use crate::Result;

const PRESS_BUFFER: usize = 8;

/// Turns button presses into channel switches for the foreground flow.
///
/// Any number of sources may feed presses through the sender returned by
/// [`ChannelSwitch::new`]. The switch stops on shutdown or once every sender
/// is gone.
pub struct ChannelSwitch {
    selector: Arc<ChannelSelector>,
    presses: mpsc::Receiver<()>,
    shutdown_signal: watch::Receiver<()>,
}

impl ChannelSwitch {
    pub fn new(
        selector: Arc<ChannelSelector>,
        shutdown_signal: watch::Receiver<()>,
    ) -> (Self, mpsc::Sender<()>) {
        let (press_tx, presses) = mpsc::channel(PRESS_BUFFER);
        (
            Self {
                selector,
                presses,
                shutdown_signal,
            },
            press_tx,
        )
    }

    pub async fn run(mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.shutdown_signal.changed() => {
                    info!("channel switch received shutdown signal");
                    return Ok(());
                }
                press = self.presses.recv() => match press {
                    Some(()) => {
                        let channel = self.selector.select_next();
                        info!("button pressed, now serving {channel}");
                    }
                    None => {
                        debug!("no button source left");
                        return Ok(());
                    }
                }
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        spawn_task("channel_switch", move || self.run())
    }
}
