//! Line-oriented re-encryption of an envelope stream.

use fieldcrypt::{reencrypt_detected, CryptoError, Encryptor};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Counters reported once the stream is exhausted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub migrated: usize,
    pub skipped: usize,
    pub blank: usize,
}

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: CryptoError,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Re-encrypt every line of `reader` with `target`, writing one line per input
/// line to `writer`.
///
/// The source engine is chosen per line from the envelope's version tag and
/// salt length, so a dump mixing legacy and current rows migrates in one pass.
///
/// # Errors
///
/// Aborts with [`MigrateError::Line`] on the first line that fails, unless
/// `skip_undecryptable` is set, in which case that line is echoed unchanged.
pub async fn run<R, W, T>(
    reader: R,
    mut writer: W,
    source_key: &[u8],
    target: &T,
    skip_undecryptable: bool,
) -> Result<Summary, MigrateError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    T: Encryptor + ?Sized,
{
    let mut summary = Summary::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let envelope = line.trim();

        let out = if envelope.is_empty() {
            summary.blank += 1;
            line.as_str()
        } else {
            match reencrypt_detected(source_key, target, envelope) {
                Ok(sealed) => {
                    summary.migrated += 1;
                    writer.write_all(sealed.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    continue;
                }
                Err(e) if skip_undecryptable => {
                    warn!(
                        line = line_no,
                        kind = e.kind(),
                        "leaving undecryptable line unchanged"
                    );
                    summary.skipped += 1;
                    line.as_str()
                }
                Err(source) => {
                    return Err(MigrateError::Line {
                        line: line_no,
                        source,
                    })
                }
            }
        };
        writer.write_all(out.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;
    debug!(lines = line_no, "input exhausted");
    Ok(summary)
}
