//! Validate command implementation.

use anyhow::{Result, anyhow, bail};
use savelens_core::{DataType, validate};

/// Run the validate command
pub fn run(value: &str, data_type: &str) -> Result<()> {
    let data_type: DataType = data_type
        .parse()
        .map_err(|_| anyhow!("Unknown data type: {}", data_type))?;

    if !validate(value, data_type) {
        bail!("{:?} is not a valid {}", value, data_type);
    }
    println!("{:?} is a valid {}", value, data_type);
    Ok(())
}
