use atomic_write_file::AtomicWriteFile;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::types::{LogEntry, LOG_HEADER, LOG_SCHEMA_VERSION};

/// Serializes appenders within this process. Rows are written with a single
/// append-mode write so separate processes cannot drop each other's rows.
static LOG_LOCK: Mutex<()> = Mutex::new(());

const HEADER_WAIT_ATTEMPTS: u32 = 25;
const HEADER_WAIT_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to access daily log at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed daily log at {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "daily log at {} does not match schema v{}: expected header '{}', found '{}'",
        .path.display(), LOG_SCHEMA_VERSION, .expected, .found
    )]
    SchemaMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error(
        "daily log at {} is empty and its header is claimed by {}; remove that file if no other ecoloop is running",
        .path.display(), .claim.display()
    )]
    HeaderPending { path: PathBuf, claim: PathBuf },
}

impl LogError {
    fn io(path: &Path, source: io::Error) -> Self {
        LogError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn csv(path: &Path, source: csv::Error) -> Self {
        LogError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn expected_header() -> String {
    LOG_HEADER.join(",")
}

fn verify_header(path: &Path, found: &StringRecord) -> Result<(), LogError> {
    if found.iter().eq(LOG_HEADER.iter().copied()) {
        Ok(())
    } else {
        Err(LogError::SchemaMismatch {
            path: path.to_path_buf(),
            expected: expected_header(),
            found: found.iter().collect::<Vec<_>>().join(","),
        })
    }
}

fn encode_header() -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(LOG_HEADER)?;
    writer.into_inner().map_err(|e| e.into_error().into())
}

fn encode_row(entry: &LogEntry) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.serialize(entry)?;
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Read only the first line of an existing log. `None` means the file is
/// empty and still needs a header.
fn read_existing_header(path: &Path) -> Result<Option<StringRecord>, LogError> {
    let file = File::open(path).map_err(|e| LogError::io(path, e))?;
    let mut first_line = String::new();
    BufReader::new(file)
        .read_line(&mut first_line)
        .map_err(|e| LogError::io(path, e))?;

    if first_line.trim().is_empty() {
        return Ok(None);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(first_line.as_bytes());
    let mut record = StringRecord::new();
    reader
        .read_record(&mut record)
        .map_err(|e| LogError::csv(path, e))?;
    Ok(Some(record))
}

fn claim_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".header-lock");
    PathBuf::from(name)
}

/// Poll until the file's creator has written the header. `None` means the
/// file stayed empty for the whole wait.
fn wait_for_header(path: &Path) -> Result<Option<StringRecord>, LogError> {
    for attempt in 0..HEADER_WAIT_ATTEMPTS {
        if let Some(header) = read_existing_header(path)? {
            return Ok(Some(header));
        }
        if attempt + 1 < HEADER_WAIT_ATTEMPTS {
            thread::sleep(HEADER_WAIT_INTERVAL);
        }
    }
    Ok(None)
}

fn ends_with_newline(path: &Path) -> Result<bool, LogError> {
    let mut file = File::open(path).map_err(|e| LogError::io(path, e))?;
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))
        .and_then(|_| file.read_exact(&mut last))
        .map_err(|e| LogError::io(path, e))?;
    Ok(last[0] == b'\n')
}

fn write_payload(path: &Path, payload: &[u8]) -> Result<(), LogError> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| LogError::io(path, e))?;
    file.write_all(payload).map_err(|e| LogError::io(path, e))
}

/// Append a row below an existing, verified header. A last row that lost
/// its newline gets one first so the new row starts on its own line.
fn append_row(path: &Path, header: &StringRecord, row: &[u8]) -> Result<(), LogError> {
    verify_header(path, header)?;

    let mut payload = Vec::with_capacity(row.len() + 1);
    if !ends_with_newline(path)? {
        warn!(path = %path.display(), "daily log missing trailing newline, repairing");
        payload.push(b'\n');
    }
    payload.extend_from_slice(row);
    write_payload(path, &payload)
}

/// Header-and-row write for an empty log, done while holding the claim file.
fn fill_empty_log(path: &Path, header: &[u8], row: &[u8]) -> Result<(), LogError> {
    match read_existing_header(path)? {
        Some(found) => append_row(path, &found, row),
        None => {
            debug!(path = %path.display(), "daily log is empty, writing header");
            write_payload(path, &[header, row].concat())
        }
    }
}

/// Append one entry to the daily log, creating the file (and its parent
/// directories) with a header on first use.
///
/// Only the process that creates the file writes the header. Appenders that
/// find an existing empty file wait for that header; if none shows up they
/// take a `<log>.header-lock` claim file so at most one of them writes it.
///
/// An existing log whose header does not match the current schema is left
/// untouched and reported as `SchemaMismatch`.
pub fn append_entry(path: &Path, entry: &LogEntry) -> Result<(), LogError> {
    let _guard = LOG_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| LogError::io(parent, e))?;
        }
    }

    // Encode up front so the creator writes right after create_new
    let header = encode_header().map_err(|e| LogError::csv(path, e))?;
    let row = encode_row(entry).map_err(|e| LogError::csv(path, e))?;

    match OpenOptions::new().append(true).create_new(true).open(path) {
        Ok(mut file) => {
            debug!(path = %path.display(), "creating daily log");
            file.write_all(&[header.as_slice(), row.as_slice()].concat())
                .map_err(|e| LogError::io(path, e))?;
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => match wait_for_header(path)? {
            Some(found) => append_row(path, &found, &row)?,
            None => {
                let claim = claim_path(path);
                match OpenOptions::new().write(true).create_new(true).open(&claim) {
                    Ok(_) => {
                        let result = fill_empty_log(path, &header, &row);
                        let _ = fs::remove_file(&claim);
                        result?;
                    }
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                        match wait_for_header(path)? {
                            Some(found) => append_row(path, &found, &row)?,
                            None => {
                                return Err(LogError::HeaderPending {
                                    path: path.to_path_buf(),
                                    claim,
                                })
                            }
                        }
                    }
                    Err(e) => return Err(LogError::io(&claim, e)),
                }
            }
        },
        Err(e) => return Err(LogError::io(path, e)),
    }

    info!(path = %path.display(), date = %entry.date, "appended daily log entry");
    Ok(())
}

/// Load every entry in the daily log.
///
/// A missing or empty file is an empty log, not an error.
pub fn read_log(path: &Path) -> Result<Vec<LogEntry>, LogError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no daily log yet");
            return Ok(Vec::new());
        }
        Err(e) => return Err(LogError::io(path, e)),
    };

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
    let header = reader.headers().map_err(|e| LogError::csv(path, e))?.clone();
    if header.is_empty() {
        return Ok(Vec::new());
    }
    verify_header(path, &header)?;

    reader
        .deserialize()
        .collect::<Result<Vec<LogEntry>, _>>()
        .map_err(|e| LogError::csv(path, e))
}

/// Write a full copy of the daily log to `dest` atomically. Returns the
/// number of entries exported; a missing log exports just the header.
pub fn export_log(src: &Path, dest: &Path) -> Result<usize, LogError> {
    let entries = read_log(src)?;

    let mut file = AtomicWriteFile::open(dest).map_err(|e| LogError::io(dest, e))?;
    {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(&mut file);
        writer
            .write_record(LOG_HEADER)
            .map_err(|e| LogError::csv(dest, e))?;
        for entry in &entries {
            writer.serialize(entry).map_err(|e| LogError::csv(dest, e))?;
        }
        writer.flush().map_err(|e| LogError::io(dest, e))?;
    }
    file.commit().map_err(|e| LogError::io(dest, e))?;

    info!(
        src = %src.display(),
        dest = %dest.display(),
        entries = entries.len(),
        "exported daily log"
    );
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{DailyInputs, TransportMode};
    use crate::scoring::calculate_scores;
    use chrono::NaiveDate;
    use std::env;
    use std::sync::Arc;

    fn temp_log(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("ecoloop_test_{}.csv", name));
        let _ = fs::remove_file(&path);
        path
    }

    fn sample_entry(day: u32, mode: TransportMode) -> LogEntry {
        let inputs = DailyInputs {
            transport_mode: mode,
            trees_planted_today: 1,
            ..DailyInputs::default()
        };
        let scores = calculate_scores(&inputs);
        LogEntry::new(
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            &inputs,
            &scores,
        )
    }

    #[test]
    fn test_read_missing_file_returns_empty() {
        let path = temp_log("missing");
        let entries = read_log(&path).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_read_empty_file_returns_empty() {
        let path = temp_log("empty_read");
        fs::write(&path, "").unwrap();
        assert!(read_log(&path).unwrap().is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_append_creates_header_and_rows() {
        let path = temp_log("append");

        append_entry(&path, &sample_entry(1, TransportMode::Walking)).unwrap();
        append_entry(&path, &sample_entry(2, TransportMode::Car)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Date,Waste,Transport,Electricity,Water,ScreenTime,Trees,Earth,WaterScore,Fire,Air,Space"
        );
        assert!(lines[1].starts_with("2024-03-01,"));
        assert!(lines[2].contains(",Car,"));

        let entries = read_log(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], sample_entry(1, TransportMode::Walking));
        assert_eq!(entries[1].air, 3.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_append_to_empty_file_writes_header() {
        let path = temp_log("append_empty");
        fs::write(&path, "").unwrap();

        append_entry(&path, &sample_entry(4, TransportMode::Bus)).unwrap();

        let entries = read_log(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].transport_mode, TransportMode::Bus);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_slow_creator_keeps_single_header() {
        let path = Arc::new(temp_log("slow_creator"));

        // Creator wins create_new but has not written yet
        let mut creator = OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&*path)
            .unwrap();

        let other = {
            let path = Arc::clone(&path);
            thread::spawn(move || append_entry(&path, &sample_entry(2, TransportMode::Bus)))
        };

        thread::sleep(Duration::from_millis(100));
        let mut payload = encode_header().unwrap();
        payload.extend(encode_row(&sample_entry(1, TransportMode::Walking)).unwrap());
        creator.write_all(&payload).unwrap();
        drop(creator);

        other.join().unwrap().unwrap();

        let content = fs::read_to_string(&*path).unwrap();
        assert_eq!(content.matches("Date,Waste").count(), 1);
        let entries = read_log(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].transport_mode, TransportMode::Walking);
        assert_eq!(entries[1].transport_mode, TransportMode::Bus);

        let _ = fs::remove_file(&*path);
    }

    #[test]
    fn test_empty_log_with_foreign_claim_is_pending() {
        let path = temp_log("claimed_empty");
        let claim = claim_path(&path);
        fs::write(&path, "").unwrap();
        fs::write(&claim, "").unwrap();

        let err = append_entry(&path, &sample_entry(3, TransportMode::Car)).unwrap_err();
        assert!(matches!(err, LogError::HeaderPending { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        let _ = fs::remove_file(&claim);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_claim_file_removed_after_header_write() {
        let path = temp_log("claim_cleanup");
        fs::write(&path, "").unwrap();

        append_entry(&path, &sample_entry(4, TransportMode::Bus)).unwrap();
        assert!(!claim_path(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_append_repairs_missing_trailing_newline() {
        let path = temp_log("no_newline");
        let mut content = encode_header().unwrap();
        content.extend(encode_row(&sample_entry(1, TransportMode::Walking)).unwrap());
        assert_eq!(content.pop(), Some(b'\n'));
        fs::write(&path, &content).unwrap();

        append_entry(&path, &sample_entry(2, TransportMode::Car)).unwrap();

        let entries = read_log(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], sample_entry(1, TransportMode::Walking));
        assert_eq!(entries[1].transport_mode, TransportMode::Car);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let dir = env::temp_dir().join("ecoloop_test_nested_dir");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("deeper").join("eco_data.csv");

        append_entry(&path, &sample_entry(5, TransportMode::Cycling)).unwrap();
        assert_eq!(read_log(&path).unwrap().len(), 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_legacy_schema_rejected_and_untouched() {
        let path = temp_log("legacy");
        let legacy = "Date,Waste,Transport,Electricity,Water,Screen Time,Trees,Earth,Fire,Air,Space\n\
                      2024-01-01,50,Walking,5,8.0,5,0,9.0,7.5,10,5.0\n";
        fs::write(&path, legacy).unwrap();

        let err = append_entry(&path, &sample_entry(1, TransportMode::Walking)).unwrap_err();
        assert!(matches!(err, LogError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("schema v1"));
        assert_eq!(fs::read_to_string(&path).unwrap(), legacy);

        let err = read_log(&path).unwrap_err();
        assert!(matches!(err, LogError::SchemaMismatch { .. }));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let path = Arc::new(temp_log("concurrent"));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let path = Arc::clone(&path);
                thread::spawn(move || {
                    for day in 1..=10 {
                        let mode = if worker % 2 == 0 {
                            TransportMode::Bus
                        } else {
                            TransportMode::Bike
                        };
                        append_entry(&path, &sample_entry(day, mode)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = read_log(&path).unwrap();
        assert_eq!(entries.len(), 80);

        let _ = fs::remove_file(&*path);
    }

    #[test]
    fn test_export_copies_log() {
        let src = temp_log("export_src");
        let dest = temp_log("export_dest");

        append_entry(&src, &sample_entry(7, TransportMode::Walking)).unwrap();
        append_entry(&src, &sample_entry(8, TransportMode::Bus)).unwrap();

        let count = export_log(&src, &dest).unwrap();
        assert_eq!(count, 2);
        assert_eq!(read_log(&dest).unwrap(), read_log(&src).unwrap());

        let _ = fs::remove_file(&src);
        let _ = fs::remove_file(&dest);
    }

    #[test]
    fn test_export_missing_log_writes_header_only() {
        let src = temp_log("export_missing_src");
        let dest = temp_log("export_missing_dest");

        let count = export_log(&src, &dest).unwrap();
        assert_eq!(count, 0);
        assert_eq!(
            fs::read_to_string(&dest).unwrap().trim_end(),
            expected_header()
        );

        let _ = fs::remove_file(&dest);
    }
}
