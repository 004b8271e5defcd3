//! Stream converter
//!
//! Converts one document: buffer the whole input, run the transform chain,
//! then write and close the output. The output is always finalized before
//! the outcome is returned, so a caller may delete the output file right
//! away on failure.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::transforms::TransformChain;

/// Convert everything readable from `input` and write the result to `output`.
///
/// On a read or transform failure nothing is written, but the output is
/// still flushed and shut down. The first error wins: an output error is only
/// reported when no earlier error was captured.
pub async fn convert_stream<R, W>(
    mut input: R,
    mut output: W,
    chain: &TransformChain,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut error = None;

    let mut buffer = Vec::new();
    let converted = match input.read_to_end(&mut buffer).await {
        Ok(_) => {
            let source = String::from_utf8_lossy(&buffer);
            match chain.apply(&source).await {
                Ok(converted) => converted,
                Err(e) => {
                    report(&e);
                    error = Some(e);
                    String::new()
                }
            }
        }
        Err(e) => {
            error = Some(Error::InputStream(e));
            String::new()
        }
    };

    if let Err(e) = finish(&mut output, converted.as_bytes()).await {
        tracing::debug!("Output stream failed: {}", e);
        if error.is_none() {
            error = Some(Error::OutputStream(e));
        }
    }

    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn finish<W: AsyncWrite + Unpin>(output: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    output.write_all(bytes).await?;
    output.flush().await?;
    output.shutdown().await
}

fn report(error: &Error) {
    match error.detail() {
        Some(detail) => tracing::error!("{}\n{}", error, detail),
        None => tracing::error!("{}", error),
    }
}
