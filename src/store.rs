use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::bail;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::metadata::PostRecord;

/// Loads the list of known post names. A missing or unparseable file is an
/// empty list. An array holding anything but strings is refused, since it is
/// most likely a post index sharing the same path.
pub(crate) fn load_post_list(list_path: &Path) -> anyhow::Result<Vec<String>> {
    if !list_path.exists() {
        info!("Posts list({list_path:?}) does not exist. starting from an empty list...");
        return Ok(vec![]);
    }

    let fd = File::open(list_path)?;
    let reader = BufReader::new(fd);
    match serde_json::from_reader::<_, Value>(reader) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                other => bail!(
                    "Posts list({list_path:?}) contains {other}, not a post name. \
                     refusing to overwrite it; pass --list to use another file."
                ),
            })
            .collect(),
        Ok(other) => {
            warn!("Posts list({list_path:?}) is not an array ({other}). starting from an empty list...");
            Ok(vec![])
        }
        Err(e) => {
            warn!("Posts list({list_path:?}) is not valid JSON ({e}). starting from an empty list...");
            Ok(vec![])
        }
    }
}

pub(crate) fn save_post_list(list_path: &Path, names: &[String]) -> anyhow::Result<()> {
    write_pretty(list_path, names)
}

pub(crate) fn save_index(index_path: &Path, posts: &[PostRecord]) -> anyhow::Result<()> {
    write_pretty(index_path, posts)
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let fd = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(fd);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    Ok(())
}
