//! Streaming relay: authenticated upstream fetch piped to the client.
//!
//! The relay never buffers a whole file. It opens one upstream connection per
//! stream session, forwards chunks as they arrive, and guarantees that a
//! short upstream delivery surfaces as an error rather than a clean
//! end-of-stream, so clients can detect truncated audio.

use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{Stream, StreamExt, try_unfold};
use tracing::{debug, warn};

use super::range::ByteRange;
use crate::auth::Credential;
use crate::storage::{StorageProvider, UpstreamError};

/// Lazy, finite, forward-only sequence of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, UpstreamError>> + Send>>;

/// Relays a byte interval of an upstream file to a downstream consumer.
pub struct StreamingRelay {
    provider: Arc<dyn StorageProvider>,
}

impl StreamingRelay {
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Opens a stream session for the given interval.
    ///
    /// Upstream 206 responses are relayed as-is under a declared-length
    /// check. A 200 response to a partial request means the upstream ignored
    /// the `Range` header; the body is re-sliced locally so the client still
    /// receives exactly the requested interval. The upstream connection is
    /// owned by the returned stream and closes when it is dropped.
    ///
    /// # Errors
    /// - `UpstreamError::Status` - Upstream answered with anything other than 200 or 206
    pub async fn open(
        &self,
        credential: &Credential,
        file_id: &str,
        range: ByteRange,
    ) -> Result<ByteStream, UpstreamError> {
        let fetch = self.provider.fetch_range(credential, file_id, &range).await?;

        let stream = if fetch.honored {
            debug!(
                "Relaying honored partial fetch for {file_id}: {}",
                range.header_value()
            );
            sliced(fetch.body, 0, range.length())
        } else {
            if range.is_partial {
                warn!("Upstream ignored range request for {file_id}; re-slicing full body");
            }
            sliced(fetch.body, range.start, range.length())
        };

        Ok(stream)
    }
}

struct SliceState {
    inner: ByteStream,
    skip: u64,
    remaining: u64,
    delivered: u64,
}

/// Skips `skip` bytes of the inner stream, then yields exactly `expected`
/// bytes. An inner stream that ends early produces `UpstreamError::Truncated`
/// instead of a clean end.
fn sliced(inner: ByteStream, skip: u64, expected: u64) -> ByteStream {
    let state = SliceState {
        inner,
        skip,
        remaining: expected,
        delivered: 0,
    };

    Box::pin(try_unfold(state, |mut state| async move {
        loop {
            if state.remaining == 0 {
                return Ok(None);
            }
            match state.inner.next().await {
                Some(Ok(chunk)) => {
                    let len = chunk.len() as u64;
                    if len == 0 {
                        continue;
                    }
                    if state.skip >= len {
                        state.skip -= len;
                        continue;
                    }
                    let mut chunk = chunk.slice(state.skip as usize..);
                    state.skip = 0;
                    if chunk.len() as u64 > state.remaining {
                        chunk = chunk.slice(..state.remaining as usize);
                    }
                    state.remaining -= chunk.len() as u64;
                    state.delivered += chunk.len() as u64;
                    return Ok(Some((chunk, state)));
                }
                Some(Err(e)) => return Err(e),
                None => {
                    return Err(UpstreamError::Truncated {
                        received: state.delivered,
                        expected: state.delivered + state.remaining,
                    });
                }
            }
        }
    }))
}
