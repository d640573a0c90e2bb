//! Streaming build-context assembly
//!
//! A build context is produced on a blocking worker and consumed through
//! [`BuildContext`]. The two sides are joined by a bounded channel, so the
//! producer parks whenever the reader falls behind and memory stays bounded
//! to a handful of compressed chunks regardless of the context size.

use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use ccbuild_errors::{Error, PlatformError};
use ccbuild_events::{EventEmitter, EventSender, FailureContext, PlatformEvent};
use ccbuild_types::ChaincodeDeploymentSpec;
use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::io::StreamReader;

use crate::platform::{ContextArchive, Platform};
use crate::registry::Registry;
use crate::writer::PackageWriter;

/// Name of the first entry of every build context
pub const DOCKERFILE: &str = "Dockerfile";

type Chunk = io::Result<Bytes>;

impl Registry {
    /// Write static entries, then the platform's own contribution, into
    /// `archive`.
    ///
    /// Entries are written in the order given. The archive is left open; the
    /// caller finishes it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatformType` for unregistered types, `StreamWriteError`
    /// if a static entry cannot be written and `ContributionFailed` if the
    /// platform fails.
    pub fn stream_docker_build(
        &self,
        cds: &ChaincodeDeploymentSpec,
        input_files: &[(String, Vec<u8>)],
        archive: &mut ContextArchive<'_>,
    ) -> Result<(), Error> {
        let platform = self.platform(cds.chaincode_type())?;
        write_entries(
            platform.as_ref(),
            self.package_writer.as_ref(),
            cds,
            input_files,
            archive,
        )
    }

    /// Start streaming the gzip-compressed build context for `cds`.
    ///
    /// The Dockerfile is generated up front; everything else happens on a
    /// background worker while the caller reads. Failures after this call
    /// returns surface as the reader's terminal error.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatformType` for unregistered types, an internal error
    /// when called outside a Tokio runtime and `GenerationError` if the
    /// Dockerfile cannot be generated. No stream is created in any case, and
    /// the first two fail before the platform is touched.
    pub fn generate_docker_build(
        &self,
        cds: &ChaincodeDeploymentSpec,
    ) -> Result<BuildContext, Error> {
        let platform = Arc::clone(self.platform(cds.chaincode_type())?);

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::internal(format!("build context needs a tokio runtime: {e}")))?;

        let dockerfile = self.generate_dockerfile(cds)?;

        let job = BuildJob {
            platform,
            writer: Arc::clone(&self.package_writer),
            cds: cds.clone(),
            input_files: vec![(DOCKERFILE.to_string(), dockerfile.into_bytes())],
            compression: Compression::new(self.stream.compression_level.min(9)),
            event_sender: self.event_sender.clone(),
        };

        let (tx, rx) = mpsc::channel(self.stream.buffer_chunks.max(1));
        runtime.spawn_blocking(move || job.run(&tx));

        Ok(BuildContext::new(rx))
    }
}

fn write_entries(
    platform: &dyn Platform,
    writer: &dyn PackageWriter,
    cds: &ChaincodeDeploymentSpec,
    input_files: &[(String, Vec<u8>)],
    archive: &mut ContextArchive<'_>,
) -> Result<(), Error> {
    for (name, data) in input_files {
        writer
            .write(name, data, archive)
            .map_err(|e| inject_error(name, e))?;
    }

    platform
        .generate_docker_build(cds.path(), cds.bytes(), archive)
        .map_err(|e| {
            PlatformError::ContributionFailed {
                platform_type: cds.chaincode_type().to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

fn inject_error(name: &str, err: Error) -> Error {
    match err {
        Error::Platform(PlatformError::StreamWriteError { .. }) => err,
        other => PlatformError::StreamWriteError {
            context: name.to_string(),
            message: other.to_string(),
        }
        .into(),
    }
}

fn stream_write_error(context: &str, err: &io::Error) -> Error {
    PlatformError::StreamWriteError {
        context: context.to_string(),
        message: err.to_string(),
    }
    .into()
}

/// Everything the producer needs, detached from the registry borrow
struct BuildJob {
    platform: Arc<dyn Platform>,
    writer: Arc<dyn PackageWriter>,
    cds: ChaincodeDeploymentSpec,
    input_files: Vec<(String, Vec<u8>)>,
    compression: Compression,
    event_sender: Option<EventSender>,
}

impl EventEmitter for BuildJob {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl BuildJob {
    fn run(self, tx: &mpsc::Sender<Chunk>) {
        let platform_type = self.cds.chaincode_type().to_string();
        let chaincode = self.cds.chaincode_id().to_string();

        self.emit_platform(PlatformEvent::BuildContextStarted {
            platform_type: platform_type.clone(),
            chaincode: chaincode.clone(),
        });

        // Archive first, then gzip, then the channel. Each is closed exactly
        // once whether or not an earlier step failed. A panicking platform
        // still gets a tar trailer from the builder's drop, so the panic must
        // become the terminal error.
        let mut gzip = GzEncoder::new(ContextSink::new(tx.clone()), self.compression);
        let written = panic::catch_unwind(AssertUnwindSafe(|| self.write_archive(&mut gzip)))
            .unwrap_or_else(|payload| {
                Err(Error::internal(format!(
                    "build context producer panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });
        let finished = gzip
            .try_finish()
            .map_err(|e| stream_write_error("gzip", &e));
        let bytes_written = gzip.get_ref().bytes_written;
        drop(gzip);

        match written.and(finished) {
            Ok(()) => self.emit_platform(PlatformEvent::BuildContextCompleted {
                platform_type,
                chaincode,
                static_entries: self.input_files.len(),
                bytes_written,
            }),
            Err(err) => {
                self.emit_platform(PlatformEvent::BuildContextFailed {
                    platform_type,
                    chaincode,
                    failure: FailureContext::from_error(&err),
                });
                // The reader may be gone already, in which case nobody is
                // left to tell.
                let _ = tx.blocking_send(Err(err.into()));
            }
        }
    }

    fn write_archive(&self, out: &mut dyn Write) -> Result<(), Error> {
        let mut archive = tar::Builder::new(out);
        let streamed = write_entries(
            self.platform.as_ref(),
            self.writer.as_ref(),
            &self.cds,
            &self.input_files,
            &mut archive,
        );
        let closed = archive
            .finish()
            .map_err(|e| stream_write_error("archive", &e));
        streamed.and(closed)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Write end of the conduit: every write becomes one chunk on the channel
struct ContextSink {
    tx: mpsc::Sender<Chunk>,
    bytes_written: u64,
}

impl ContextSink {
    fn new(tx: mpsc::Sender<Chunk>) -> Self {
        Self {
            tx,
            bytes_written: 0,
        }
    }
}

impl Write for ContextSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        // Parks the worker until the reader has room.
        self.tx
            .blocking_send(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| {
                io::Error::new(io::ErrorKind::BrokenPipe, "build context reader dropped")
            })?;
        self.bytes_written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read end of a build context: a one-shot stream of gzip-compressed tar bytes.
///
/// If the producer failed, the error is returned once, after every byte that
/// was produced before it. Reads after end-of-stream or after the error
/// return end-of-stream. Dropping the reader stops the producer at its next
/// write.
#[derive(Debug)]
pub struct BuildContext {
    inner: StreamReader<ReceiverStream<Chunk>, Bytes>,
}

impl BuildContext {
    fn new(rx: mpsc::Receiver<Chunk>) -> Self {
        Self {
            inner: StreamReader::new(ReceiverStream::new(rx)),
        }
    }
}

impl AsyncRead for BuildContext {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}
