//! Archive download: streamed GET with atomic finalize.
//!
//! The body is written to `<dest>.part` as it arrives and renamed onto the
//! final path only after a successful transfer, so an interrupted run never
//! leaves a truncated file under the destination name.

use super::{build_easy, check_status, should_retry_insecure, transport, TransportOptions};
use crate::error::FetchError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Temporary suffix used before the atomic rename.
const TEMP_SUFFIX: &str = ".part";

/// Abort the transfer if throughput stays below 1 KiB/s for a minute.
const LOW_SPEED_LIMIT: u32 = 1024;
const LOW_SPEED_TIME: Duration = Duration::from_secs(60);

/// Downloads `url` to `dest`, overwriting any existing file there.
/// Returns the number of bytes written.
///
/// Same TLS fallback policy as the page fetch: one retry with verification
/// disabled on a TLS verification failure, restarting the file from zero.
/// A non-2xx status is terminal and the partial file is removed.
pub fn download_to_path(
    url: &str,
    dest: &Path,
    opts: &TransportOptions,
) -> Result<u64, FetchError> {
    match download_once(url, dest, true) {
        Err(err) if should_retry_insecure(&err, opts) => {
            tracing::warn!(
                url = %url,
                "TLS verification failed; retrying download with verification disabled"
            );
            download_once(url, dest, false)
        }
        other => other,
    }
}

fn download_once(url: &str, dest: &Path, verify_tls: bool) -> Result<u64, FetchError> {
    let part = part_path(dest);
    match stream_to_file(url, &part, verify_tls) {
        Ok(bytes) => {
            if let Err(err) = fs::rename(&part, dest) {
                let _ = fs::remove_file(&part);
                return Err(FetchError::Storage(err));
            }
            tracing::info!(bytes, dest = %dest.display(), "download complete");
            Ok(bytes)
        }
        Err(err) => {
            let _ = fs::remove_file(&part);
            Err(err)
        }
    }
}

fn stream_to_file(url: &str, part: &Path, verify_tls: bool) -> Result<u64, FetchError> {
    // No whole-transfer timeout: archives can be large. Stalls are caught
    // by the low-speed bound instead.
    let mut easy = build_easy(url, verify_tls, None)?;
    easy.low_speed_limit(LOW_SPEED_LIMIT)
        .map_err(|e| transport(url, e))?;
    easy.low_speed_time(LOW_SPEED_TIME)
        .map_err(|e| transport(url, e))?;

    let file = File::create(part)?;
    let mut writer = BufWriter::new(file);
    let mut written: u64 = 0;
    let mut write_err: Option<std::io::Error> = None;

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match writer.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(|e| transport(url, e))?;
        transfer.perform()
    };

    if let Some(io_err) = write_err {
        return Err(FetchError::Storage(io_err));
    }
    perform_result.map_err(|e| transport(url, e))?;

    check_status(&mut easy, url)?;

    writer.flush()?;
    Ok(written)
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}
