//! NDJSON streaming: one [`RemoteDomComponent`] per line, for incremental
//! delivery of large trees per §4.C's "Serialization format."

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{RemoteDomComponent, RemoteDomError};

/// Write each of `components` as one JSON line, in order.
///
/// # Errors
///
/// Returns [`RemoteDomError::Malformed`] if a component fails to
/// serialize, or bubbles up the sink's I/O error via
/// [`RemoteDomError::Sink`].
pub async fn encode_stream<W: AsyncWrite + Unpin>(
    sink: &mut W,
    components: &[RemoteDomComponent],
) -> Result<(), RemoteDomError> {
    for component in components {
        let mut line = component.serialize()?;
        line.push('\n');
        sink.write_all(line.as_bytes())
            .await
            .map_err(|e| RemoteDomError::Sink(e.to_string()))?;
    }
    sink.flush().await.map_err(|e| RemoteDomError::Sink(e.to_string()))?;
    Ok(())
}

/// Read components one per line until EOF, validating each the same way
/// [`RemoteDomComponent::deserialize`] does (required fields, acyclic ids
/// within each line's own tree).
///
/// # Errors
///
/// Returns [`RemoteDomError::Malformed`] or [`RemoteDomError::DuplicateId`]
/// on the first invalid line, or [`RemoteDomError::Sink`] on an I/O error.
pub async fn decode_stream<R: AsyncBufRead + Unpin>(
    source: &mut R,
) -> Result<Vec<RemoteDomComponent>, RemoteDomError> {
    let mut out = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = source
            .read_line(&mut line)
            .await
            .map_err(|e| RemoteDomError::Sink(e.to_string()))?;
        if bytes_read == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.push(RemoteDomComponent::deserialize(trimmed)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_ndjson() {
        let components = vec![
            RemoteDomComponent::text("a", "div", "one"),
            RemoteDomComponent::container("b", "section", vec![RemoteDomComponent::text("c", "p", "two")]),
        ];

        let mut buf = Vec::new();
        encode_stream(&mut buf, &components).await.unwrap();

        let mut reader = tokio::io::BufReader::new(buf.as_slice());
        let decoded = decode_stream(&mut reader).await.unwrap();

        assert_eq!(decoded, components);
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let mut reader = tokio::io::BufReader::new(b"\n{\"id\":\"a\",\"type\":\"div\",\"props\":{},\"children\":\"x\"}\n\n".as_slice());
        let decoded = decode_stream(&mut reader).await.unwrap();
        assert_eq!(decoded.len(), 1);
    }

    #[tokio::test]
    async fn malformed_line_fails_fast() {
        let mut reader = tokio::io::BufReader::new(b"not json\n".as_slice());
        let err = decode_stream(&mut reader).await.unwrap_err();
        assert!(matches!(err, RemoteDomError::Malformed(_)));
    }
}
