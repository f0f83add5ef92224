//! RTKLIB `.conf` files: `parameter =value # comment ## description`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use thiserror::Error;

use super::entry::{ConfigEntry, ConfigSnapshot};

pub const CONF_HEADER: &str = "# rtkrcv options for rtk (v.2.4.2)";

/// Column the `=` of every line is aligned to.
const PARAMETER_WIDTH: usize = 18;

#[derive(Debug, Error)]
pub enum ConfError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Parse one line. Blank lines, comment lines and lines without `=` yield `None`.
pub fn parse_line(line: &str) -> Option<ConfigEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (parameter, rest) = line.split_once('=')?;
    let parameter = parameter.trim();
    if parameter.is_empty() {
        return None;
    }

    let (value, annotation) = match annotation_start(rest) {
        Some(at) => (&rest[..at], Some(&rest[at + 1..])),
        None => (rest, None),
    };
    let (comment, description) = match annotation {
        None => (None, None),
        Some(a) => match a.strip_prefix('#') {
            Some(d) => (None, non_empty(d)),
            None => match a.split_once("##") {
                Some((c, d)) => (non_empty(c), non_empty(d)),
                None => (non_empty(a), None),
            },
        },
    };

    Some(ConfigEntry {
        parameter: parameter.to_string(),
        value: value.trim().to_string(),
        description,
        comment,
    })
}

pub fn format_line(entry: &ConfigEntry) -> String {
    let mut line = format!(
        "{:<width$}={}",
        entry.parameter,
        entry.value,
        width = PARAMETER_WIDTH
    );
    if let Some(c) = &entry.comment {
        line.push_str(" # ");
        line.push_str(c);
    }
    if let Some(d) = &entry.description {
        line.push_str(" ## ");
        line.push_str(d);
    }
    line
}

pub fn parse_conf(text: &str) -> ConfigSnapshot {
    text.lines().filter_map(parse_line).collect()
}

pub fn render_conf(snapshot: &ConfigSnapshot) -> String {
    let mut out = String::new();
    out.push_str(CONF_HEADER);
    out.push_str("\n\n");
    for entry in snapshot.iter() {
        out.push_str(&format_line(entry));
        out.push('\n');
    }
    out
}

pub fn read_conf(path: &Path) -> Result<ConfigSnapshot, ConfError> {
    let text = fs::read_to_string(path).map_err(|source| ConfError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse_conf(&text);
    debug!("[conf] read {} entries from {}", snapshot.len(), path.display());
    Ok(snapshot)
}

pub fn write_conf(path: &Path, snapshot: &ConfigSnapshot) -> Result<(), ConfError> {
    fs::write(path, render_conf(snapshot)).map_err(|source| ConfError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("[conf] wrote {} entries to {}", snapshot.len(), path.display());
    Ok(())
}

/// `*.conf` file names in `dir`, sorted.
pub fn available_configs(dir: &Path) -> Result<Vec<String>, ConfError> {
    let read_err = |source| ConfError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.is_file()
            && path.extension().is_some_and(|ext| ext == "conf")
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/* ---------- helpers ---------- */

/// Index of the `#` that starts the annotation: the first one preceded by whitespace.
fn annotation_start(rest: &str) -> Option<usize> {
    let mut prev_ws = false;
    for (i, c) in rest.char_indices() {
        if c == '#' && prev_ws {
            return Some(i);
        }
        prev_ws = c.is_whitespace();
    }
    None
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# rtkrcv options for rtk (v.2.4.2)

inpstr1-type       =serial     # (0:off,1:serial,2:file,3:tcpsvr,4:tcpcli,7:ntripcli,8:ftp,9:http)
inpstr1-path       =ttyMFD1:230400:8:n:1:off
inpstr2-path       =
pos1-elmask        =15         # (deg) ## Elevation mask
misc-startcmd      =./ubx.cmd  ## Start command
";

    #[test]
    fn parse_sample() {
        let snap = parse_conf(SAMPLE);
        assert_eq!(snap.len(), 5);

        let t = snap.get("inpstr1-type").unwrap();
        assert_eq!(t.value, "serial");
        assert_eq!(t.choices().unwrap()[1].value, "serial");

        assert_eq!(snap.value("inpstr1-path"), Some("ttyMFD1:230400:8:n:1:off"));
        assert_eq!(snap.value("inpstr2-path"), Some(""));

        let e = snap.get("pos1-elmask").unwrap();
        assert_eq!(e.comment.as_deref(), Some("(deg)"));
        assert_eq!(e.description.as_deref(), Some("Elevation mask"));

        let cmd = snap.get("misc-startcmd").unwrap();
        assert_eq!(cmd.comment, None);
        assert_eq!(cmd.description.as_deref(), Some("Start command"));
    }

    #[test]
    fn hash_inside_value_is_kept() {
        let e = parse_line("outstr-path =file:///tmp/bas.rtcm3#rtcm3 # base out").unwrap();
        assert_eq!(e.value, "file:///tmp/bas.rtcm3#rtcm3");
        assert_eq!(e.comment.as_deref(), Some("base out"));
    }

    #[test]
    fn skips_non_entries() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   # only a comment").is_none());
        assert!(parse_line("no equals sign here").is_none());
        assert!(parse_line("=value").is_none());
    }

    #[test]
    fn render_aligns_and_reparses() {
        let snap = parse_conf(SAMPLE);
        let text = render_conf(&snap);
        assert!(text.starts_with(CONF_HEADER));
        assert!(text.contains("inpstr1-path      =ttyMFD1:230400:8:n:1:off\n"));
        assert_eq!(parse_conf(&text), snap);
    }

    #[test]
    fn file_roundtrip_and_listing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reach_single_default.conf");
        let snap = parse_conf(SAMPLE);
        write_conf(&path, &snap).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(read_conf(&path).unwrap(), snap);
        assert_eq!(
            available_configs(dir.path()).unwrap(),
            vec!["reach_single_default.conf".to_string()]
        );
        assert!(matches!(
            read_conf(&dir.path().join("missing.conf")),
            Err(ConfError::Read { .. })
        ));
    }
}
