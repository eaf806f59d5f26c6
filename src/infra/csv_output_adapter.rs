use std::fs::File;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::app::ports::RecordSinkPort;
use crate::error::Result;
use crate::table::TableRow;

/// Appends records to a CSV file, flushing after every row so an interrupted
/// run keeps what it already resolved.
pub struct CsvRecordSink<R> {
    writer: Mutex<csv::Writer<File>>,
    path: PathBuf,
    _record: PhantomData<fn(&R)>,
}

impl<R: TableRow> CsvRecordSink<R> {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(R::header())?;
        writer.flush()?;
        info!("Writing records to {}", path.display());
        Ok(Self {
            writer: Mutex::new(writer),
            path: path.to_path_buf(),
            _record: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<R> RecordSinkPort<R> for CsvRecordSink<R>
where
    R: TableRow + Send + Sync,
{
    async fn write_record(&self, record: &R) -> Result<()> {
        let row = record.to_row();
        let mut writer = self.writer.lock().await;
        writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        writer.flush()?;
        Ok(())
    }
}
