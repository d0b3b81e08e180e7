use std::{
    fs::{self, File},
    io,
    path::Path,
};

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    {ContentLimit, FileRotate},
};
use log::{Level, Log};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

const LOG_SUBDIR: &str = "logs";

/// Writes every record to the rotating log file and mirrors warnings and
/// errors to stderr so they show up in the host's console.
pub struct MainLogger {
    write_logger: Box<WriteLogger<FileRotate<AppendTimestamp>>>,
}

impl MainLogger {
    fn new(write_logger: Box<WriteLogger<FileRotate<AppendTimestamp>>>) -> Self {
        Self { write_logger }
    }
}

impl Log for MainLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.write_logger.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        self.write_logger.log(record);
        if record.level() <= Level::Warn {
            eprintln!(
                "{}:{} -- {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        self.write_logger.flush();
    }
}

/// Installs the global logger, writing to `<data_dir>/logs/main.log`. Keeps
/// three files of at most 1000 lines each.
pub fn init(data_dir: &Path) -> Result<()> {
    let path = data_dir.join(LOG_SUBDIR).join("main.log");
    let log = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(3)),
        ContentLimit::Lines(1000),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let write_logger = WriteLogger::new(LevelFilter::Info, config, log);
    log::set_boxed_logger(Box::new(MainLogger::new(write_logger)))?;
    log::set_max_level(LevelFilter::Info);
    info!("logger initialized in {}", data_dir.display());
    Ok(())
}

/// Zips the log folder into `target_file_path`, e.g. for an incident debrief.
pub fn export(data_dir: &Path, target_file_path: &Path) -> Result<()> {
    let mut zip = zip::ZipWriter::new(File::create(target_file_path)?);
    let default_options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    let log_folder = data_dir.join(LOG_SUBDIR);
    let mut entries: Vec<_> = fs::read_dir(&log_folder)?.flatten().collect();
    entries.sort_by_key(|entry| entry.file_name());
    for entry in entries {
        let path = entry.path();
        if path.is_file() {
            if let Some(name) = path.strip_prefix(data_dir)?.to_str() {
                zip.start_file(name, default_options)?;
                let mut log_file = File::open(&path)?;
                io::copy(&mut log_file, &mut zip)?;
            }
        }
    }

    zip.finish()?;
    Ok(())
}
