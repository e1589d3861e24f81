use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmartError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SMART command rejected by the MMC layer: {0}")]
    Transport(#[source] std::io::Error),
    #[error("card vendor not supported (manfid {manfid:#x})")]
    UnsupportedVendor { manfid: u32 },
    #[error("card returned an all-0xff SMART sector")]
    NoSmartData,
    #[error("failed to parse device attribute: {0}")]
    Parse(String),
}
