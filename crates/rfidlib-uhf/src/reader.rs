//! InventoryReader -- one command/response exchange per polling cycle.
//!
//! The reader owns the transport. The caller owns the [`EpcAccumulator`]
//! and decides when a cycle ends by draining it.

use std::time::Duration;

use tracing::debug;

use rfidlib_core::error::{Error, Result};
use rfidlib_core::transport::Transport;

use crate::accumulator::EpcAccumulator;

/// A UHF reader driven by a fixed inventory command.
///
/// Construct with [`ReaderBuilder`](crate::builder::ReaderBuilder).
pub struct InventoryReader {
    transport: Box<dyn Transport>,
    command: Vec<u8>,
    read_timeout: Duration,
    drain_timeout: Duration,
    max_chunk_size: usize,
    read_buf: Vec<u8>,
    chunk: Vec<u8>,
}

/// Read settings for [`InventoryReader::poll_once`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReadLimits {
    pub(crate) read_timeout: Duration,
    pub(crate) drain_timeout: Duration,
    pub(crate) read_buffer_size: usize,
    pub(crate) max_chunk_size: usize,
}

impl InventoryReader {
    pub(crate) fn new(transport: Box<dyn Transport>, command: Vec<u8>, limits: ReadLimits) -> Self {
        InventoryReader {
            transport,
            command,
            read_timeout: limits.read_timeout,
            drain_timeout: limits.drain_timeout,
            max_chunk_size: limits.max_chunk_size,
            read_buf: vec![0u8; limits.read_buffer_size],
            chunk: Vec::with_capacity(limits.read_buffer_size),
        }
    }

    /// Send the inventory command, collect the reader's answer, and record
    /// its EPCs.
    ///
    /// The first read waits up to the read timeout. Further reads use the
    /// shorter drain timeout and continue until the port goes quiet or
    /// `max_chunk_size` bytes have been collected. Everything collected is
    /// scanned as one chunk. Bytes past the cap stay in the port for the
    /// next poll.
    ///
    /// Returns the number of EPCs that were new to `acc`. A reader that
    /// stays silent until the read timeout counts as an empty chunk.
    pub async fn poll_once(&mut self, acc: &mut EpcAccumulator) -> Result<usize> {
        self.transport.send(&self.command).await?;

        self.chunk.clear();
        let mut timeout = self.read_timeout;
        let mut reads = 0usize;
        while self.chunk.len() < self.max_chunk_size {
            let want = (self.max_chunk_size - self.chunk.len()).min(self.read_buf.len());
            match self
                .transport
                .receive(&mut self.read_buf[..want], timeout)
                .await
            {
                Ok(0) | Err(Error::Timeout) => break,
                Ok(n) => self.chunk.extend_from_slice(&self.read_buf[..n]),
                Err(e) => return Err(e),
            }
            reads += 1;
            timeout = self.drain_timeout;
        }

        let added = acc.extend_from_chunk(&self.chunk);
        debug!(
            bytes = self.chunk.len(),
            reads,
            new_tags = added,
            cycle_tags = acc.len(),
            "Inventory poll complete"
        );
        Ok(added)
    }

    /// The command sent each cycle.
    pub fn command(&self) -> &[u8] {
        &self.command
    }

    /// How long each poll waits for the reader to answer.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// How long a poll waits for more bytes once the reader has answered.
    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }

    /// Upper bound on the bytes scanned by one poll.
    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Whether the underlying transport is still open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the underlying transport.
    pub async fn close(&mut self) -> Result<()> {
        self.transport.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DEFAULT_READ_BUFFER_SIZE, ReaderBuilder};
    use crate::commands::{INVENTORY_COMMAND, multi_poll_command};
    use crate::frame::FRAME_HEADER;
    use rfidlib_core::types::{EPC_LEN, EpcId};
    use rfidlib_test_harness::MockTransport;

    fn epc(fill: u8) -> EpcId {
        EpcId::new([fill; EPC_LEN])
    }

    fn frame_for(id: EpcId) -> Vec<u8> {
        let mut out = FRAME_HEADER.to_vec();
        out.extend_from_slice(&[0xD0, 0x30, 0x00]);
        out.extend_from_slice(id.as_bytes());
        out.extend_from_slice(&[0xAB, 0xCD, 0x99, 0x7E]);
        out
    }

    async fn reader_with(mock: MockTransport) -> InventoryReader {
        ReaderBuilder::new()
            .read_timeout(Duration::from_millis(50))
            .build_with_transport(Box::new(mock))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn poll_records_tags_from_response() {
        let mut response = frame_for(epc(0x01));
        response.extend_from_slice(&frame_for(epc(0x02)));
        response.extend_from_slice(&frame_for(epc(0x01)));

        let mut mock = MockTransport::new();
        mock.expect(&INVENTORY_COMMAND, &response);
        let mut reader = reader_with(mock).await;

        let mut acc = EpcAccumulator::new();
        let added = reader.poll_once(&mut acc).await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(acc.drain(), vec![epc(0x01), epc(0x02)]);
    }

    #[tokio::test]
    async fn silent_reader_is_empty_cycle() {
        let mut mock = MockTransport::new();
        mock.expect_silence(&INVENTORY_COMMAND);
        let mut reader = reader_with(mock).await;

        let mut acc = EpcAccumulator::new();
        assert_eq!(reader.poll_once(&mut acc).await.unwrap(), 0);
        assert!(acc.is_empty());
    }

    #[tokio::test]
    async fn malformed_response_is_ignored() {
        let mut response = frame_for(epc(0x0F));
        response.truncate(FRAME_HEADER.len() + 12);

        let mut mock = MockTransport::new();
        mock.expect(&INVENTORY_COMMAND, &response);
        let mut reader = reader_with(mock).await;

        let mut acc = EpcAccumulator::new();
        assert_eq!(reader.poll_once(&mut acc).await.unwrap(), 0);
        assert!(acc.is_empty());
    }

    #[tokio::test]
    async fn consecutive_polls_share_accumulator() {
        let mut mock = MockTransport::new();
        mock.expect(&INVENTORY_COMMAND, &frame_for(epc(0x0A)));
        mock.expect(&INVENTORY_COMMAND, &frame_for(epc(0x0A)));
        mock.expect(&INVENTORY_COMMAND, &frame_for(epc(0x0B)));
        let mut reader = reader_with(mock).await;

        let mut acc = EpcAccumulator::new();
        assert_eq!(reader.poll_once(&mut acc).await.unwrap(), 1);
        assert_eq!(reader.poll_once(&mut acc).await.unwrap(), 0);
        assert_eq!(reader.poll_once(&mut acc).await.unwrap(), 1);
        assert_eq!(acc.len(), 2);
    }

    #[tokio::test]
    async fn poll_collects_everything_waiting() {
        // 100 distinct tags, far more than one read buffer holds.
        let mut response = Vec::new();
        for i in 0..100u8 {
            response.extend_from_slice(&frame_for(epc(i)));
        }
        assert!(response.len() > DEFAULT_READ_BUFFER_SIZE);

        let mut mock = MockTransport::new();
        mock.expect(&INVENTORY_COMMAND, &response);
        let mut reader = reader_with(mock).await;

        let mut acc = EpcAccumulator::new();
        assert_eq!(reader.poll_once(&mut acc).await.unwrap(), 100);
        assert_eq!(acc.drain(), (0..100u8).map(epc).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn small_read_buffer_joins_pieces() {
        // Each frame arrives split over several reads.
        let mut response = frame_for(epc(0x01));
        response.extend_from_slice(&frame_for(epc(0x02)));

        let mut mock = MockTransport::new();
        mock.expect(&INVENTORY_COMMAND, &response);
        let mut reader = ReaderBuilder::new()
            .read_buffer_size(7)
            .build_with_transport(Box::new(mock))
            .await
            .unwrap();

        let mut acc = EpcAccumulator::new();
        assert_eq!(reader.poll_once(&mut acc).await.unwrap(), 2);
        assert_eq!(acc.drain(), vec![epc(0x01), epc(0x02)]);
    }

    #[tokio::test]
    async fn bytes_past_chunk_cap_are_read_next_poll() {
        // Three 24-byte frames; the cap cuts the second frame in half.
        let mut response = frame_for(epc(0x01));
        response.extend_from_slice(&frame_for(epc(0x02)));
        response.extend_from_slice(&frame_for(epc(0x03)));

        let mut mock = MockTransport::new();
        mock.expect(&INVENTORY_COMMAND, &response);
        mock.expect_silence(&INVENTORY_COMMAND);
        let mut reader = ReaderBuilder::new()
            .read_buffer_size(16)
            .max_chunk_size(36)
            .build_with_transport(Box::new(mock))
            .await
            .unwrap();

        let mut acc = EpcAccumulator::new();
        assert_eq!(reader.poll_once(&mut acc).await.unwrap(), 1);
        assert_eq!(acc.drain(), vec![epc(0x01)]);

        // The leftover 36 bytes start mid-frame: the tail of tag 2 has no
        // header and is dropped, tag 3 is intact.
        assert_eq!(reader.poll_once(&mut acc).await.unwrap(), 1);
        assert_eq!(acc.drain(), vec![epc(0x03)]);
    }

    #[tokio::test]
    async fn custom_command_is_sent() {
        let command = multi_poll_command(100);
        let mut mock = MockTransport::new();
        mock.expect_silence(&command);
        let mut reader = ReaderBuilder::new()
            .command(&command)
            .build_with_transport(Box::new(mock))
            .await
            .unwrap();

        assert_eq!(reader.command(), command.as_slice());
        let mut acc = EpcAccumulator::new();
        reader.poll_once(&mut acc).await.unwrap();
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let mut mock = MockTransport::new();
        mock.set_connected(false);
        let mut reader = reader_with(mock).await;

        let mut acc = EpcAccumulator::new();
        let result = reader.poll_once(&mut acc).await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn close_disconnects_transport() {
        let mut reader = reader_with(MockTransport::new()).await;
        assert!(reader.is_connected());
        reader.close().await.unwrap();
        assert!(!reader.is_connected());
    }
}
