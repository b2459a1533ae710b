//! Incremental consumption of the campaign insights byte stream.
//!
//! A [`InsightsStream`] is a pull-based session: every call to
//! [`InsightsStream::next_chunk`] reads the next piece of the response body
//! and decodes it as UTF-8, carrying incomplete multi-byte sequences over to
//! the following read. The session is never retried or reconnected; call
//! [`crate::InsightsClient::campaign_insights_stream`] again to restart.

use std::{fmt, pin::Pin};

use bytes::Bytes;
use futures_util::{stream, Stream, StreamExt};

use crate::{InsightsError, Result};

type ByteSource = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Stateful UTF-8 decoder for a chunked byte source.
///
/// Invalid sequences are replaced with U+FFFD instead of failing the session.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `chunk`, holding back a trailing incomplete sequence.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::with_capacity(self.pending.len());
        let mut input: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    input = &[];
                    break;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        None => {
                            input = rest;
                            break;
                        }
                    }
                }
            }
        }

        let consumed = self.pending.len() - input.len();
        self.pending.drain(..consumed);
        out
    }

    /// Flushes the decoder at end of data.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.pending.clear();
        char::REPLACEMENT_CHARACTER.to_string()
    }

    /// Number of bytes held back waiting for the rest of a sequence.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// An open insights stream owned by the caller that opened it.
pub struct InsightsStream {
    source: Option<ByteSource>,
    decoder: Utf8ChunkDecoder,
    chunks_read: usize,
}

impl fmt::Debug for InsightsStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightsStream")
            .field("open", &self.source.is_some())
            .field("decoder", &self.decoder)
            .field("chunks_read", &self.chunks_read)
            .finish()
    }
}

impl InsightsStream {
    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        let source = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|err| InsightsError::Stream(err.to_string())));
        Self::from_byte_stream(source)
    }

    /// Wraps any byte source; used by the client and handy for tests.
    pub fn from_byte_stream<S>(source: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            source: Some(Box::pin(source)),
            decoder: Utf8ChunkDecoder::new(),
            chunks_read: 0,
        }
    }

    /// Returns the next decoded chunk, or `Ok(None)` once the stream ended.
    ///
    /// The first error closes the session; later calls return `Ok(None)`
    /// without touching the source again.
    pub async fn next_chunk(&mut self) -> Result<Option<String>> {
        loop {
            let Some(source) = self.source.as_mut() else {
                return Ok(None);
            };

            match source.next().await {
                Some(Ok(bytes)) => {
                    let text = self.decoder.decode(&bytes);
                    if !text.is_empty() {
                        self.chunks_read += 1;
                        return Ok(Some(text));
                    }
                }
                Some(Err(err)) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "insights stream failed after {} chunks: {}",
                        self.chunks_read,
                        err
                    );
                    self.close();
                    return Err(err);
                }
                None => {
                    self.source = None;
                    let tail = self.decoder.finish();
                    #[cfg(feature = "tracing")]
                    tracing::debug!("insights stream ended after {} chunks", self.chunks_read);
                    if tail.is_empty() {
                        return Ok(None);
                    }
                    self.chunks_read += 1;
                    return Ok(Some(tail));
                }
            }
        }
    }

    /// Reads every remaining chunk and concatenates them.
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(chunk) = self.next_chunk().await? {
            text.push_str(&chunk);
        }
        Ok(text)
    }

    /// Adapts the session into a [`Stream`] of decoded chunks.
    pub fn into_stream(self) -> impl Stream<Item = Result<String>> + Send {
        stream::unfold(self, |mut session| async move {
            match session.next_chunk().await {
                Ok(Some(chunk)) => Some((Ok(chunk), session)),
                Ok(None) => None,
                Err(err) => Some((Err(err), session)),
            }
        })
    }

    /// Drops the byte source and any buffered partial sequence.
    pub fn close(&mut self) {
        self.source = None;
        self.decoder = Utf8ChunkDecoder::new();
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Number of non-empty chunks handed out so far.
    pub fn chunks_read(&self) -> usize {
        self.chunks_read
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        task::Poll,
    };

    use bytes::Bytes;
    use futures_util::{stream, StreamExt};

    use super::{InsightsStream, Utf8ChunkDecoder};
    use crate::{InsightsError, Result};

    fn counted_source(
        items: Vec<Result<Bytes>>,
        polls: Arc<AtomicUsize>,
    ) -> impl futures_util::Stream<Item = Result<Bytes>> + Send {
        let mut queue: VecDeque<Result<Bytes>> = items.into();
        stream::poll_fn(move |_| {
            polls.fetch_add(1, Ordering::SeqCst);
            Poll::Ready(queue.pop_front())
        })
    }

    #[test]
    fn decoder_joins_split_multibyte_sequence() {
        let mut decoder = Utf8ChunkDecoder::new();
        let euro = "€".as_bytes();

        assert_eq!(decoder.decode(&[b'a', euro[0]]), "a");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.decode(&euro[1..2]), "");
        assert_eq!(decoder.decode(&[euro[2], b'b']), "€b");
        assert_eq!(decoder.pending_len(), 0);
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(&[b'x', 0xff, b'y']), "x\u{fffd}y");
    }

    #[test]
    fn decoder_flushes_dangling_sequence_on_finish() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(&[0xe2, 0x82]), "");
        assert_eq!(decoder.finish(), "\u{fffd}");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[tokio::test]
    async fn yields_chunks_in_order_then_stops_reading() {
        let polls = Arc::new(AtomicUsize::new(0));
        let source = counted_source(
            vec![
                Ok(Bytes::from_static(b"a")),
                Ok(Bytes::from_static(b"b")),
                Ok(Bytes::from_static(b"c")),
            ],
            polls.clone(),
        );
        let mut session = InsightsStream::from_byte_stream(source);

        let mut chunks = Vec::new();
        while let Some(chunk) = session.next_chunk().await.expect("read must succeed") {
            chunks.push(chunk);
        }

        assert_eq!(chunks, vec!["a", "b", "c"]);
        assert!(session.is_closed());
        assert_eq!(polls.load(Ordering::SeqCst), 4);

        assert!(session.next_chunk().await.expect("closed read").is_none());
        assert_eq!(polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn read_error_closes_session_without_further_chunks() {
        let polls = Arc::new(AtomicUsize::new(0));
        let source = counted_source(
            vec![
                Ok(Bytes::from_static(b"a")),
                Err(InsightsError::Stream("connection reset".to_owned())),
                Ok(Bytes::from_static(b"b")),
            ],
            polls.clone(),
        );
        let mut session = InsightsStream::from_byte_stream(source);

        assert_eq!(session.next_chunk().await.expect("first chunk").as_deref(), Some("a"));
        let err = session.next_chunk().await.expect_err("second read must fail");
        assert!(matches!(err, InsightsError::Stream(_)));
        assert!(session.is_closed());

        assert!(session.next_chunk().await.expect("closed read").is_none());
        assert_eq!(polls.load(Ordering::SeqCst), 2);
        assert_eq!(session.chunks_read(), 1);
    }

    #[tokio::test]
    async fn partial_bytes_never_produce_empty_chunks() {
        let bytes = "h€llo".as_bytes();
        let source = stream::iter(vec![
            Ok(Bytes::copy_from_slice(&bytes[..2])),
            Ok(Bytes::copy_from_slice(&bytes[2..3])),
            Ok(Bytes::copy_from_slice(&bytes[3..])),
        ]);
        let chunks: Vec<String> = InsightsStream::from_byte_stream(source)
            .into_stream()
            .map(|chunk| chunk.expect("chunk must decode"))
            .collect()
            .await;

        assert_eq!(chunks, vec!["h", "€llo"]);
    }

    #[tokio::test]
    async fn into_stream_surfaces_error_then_ends() {
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"data: 1\n\n")),
            Err(InsightsError::Stream("eof".to_owned())),
        ]);
        let items: Vec<Result<String>> = InsightsStream::from_byte_stream(source)
            .into_stream()
            .collect()
            .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().expect("first item"), "data: 1\n\n");
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn collect_text_concatenates_chunks() {
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"data: {\"clicks\":1}\n\n")),
            Ok(Bytes::from_static(b"data: {\"clicks\":2}\n\n")),
        ]);
        let text = InsightsStream::from_byte_stream(source)
            .collect_text()
            .await
            .expect("stream must complete");
        assert_eq!(text, "data: {\"clicks\":1}\n\ndata: {\"clicks\":2}\n\n");
    }
}
