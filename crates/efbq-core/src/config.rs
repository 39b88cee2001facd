use std::{env, fs, io, path::Path};

use crate::{errors::Error, Result};

const DEFAULT_SNIFF_BYTES: usize = 8192;
const MIN_SNIFF_BYTES: usize = 16;
const MAX_SNIFF_BYTES: usize = 1024 * 1024;

/// Typed configuration for the decorator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Bytes read from the head of a file for signature matching.
    pub sniff_bytes: usize,
    /// Lower-cased substrings that turn an image MIME type into an animation.
    pub animation_markers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sniff_bytes: DEFAULT_SNIFF_BYTES,
            animation_markers: vec!["gif".to_string()],
        }
    }
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn load() -> Result<Self> {
        Self::load_with_dotenv(Path::new(".env"))
    }

    /// Same as [`Config::load`] with an explicit dotenv location.
    ///
    /// A missing file is fine; any other read failure is reported.
    pub fn load_with_dotenv(dotenv: &Path) -> Result<Self> {
        load_dotenv_if_present(
            dotenv,
            |key| env::var_os(key).is_some(),
            |key, val| env::set_var(key, val),
        )?;
        let cfg = Self::from_lookup(|key| env::var(key).ok())?;
        tracing::debug!(
            sniff_bytes = cfg.sniff_bytes,
            animation_markers = ?cfg.animation_markers,
            "loaded config"
        );
        Ok(cfg)
    }

    /// Build from an arbitrary key lookup (env, file, test map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let sniff_bytes = match lookup("EFBQ_SNIFF_BYTES") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                Error::Config(format!("EFBQ_SNIFF_BYTES must be a byte count, got {raw:?}"))
            })?,
            None => defaults.sniff_bytes,
        }
        .clamp(MIN_SNIFF_BYTES, MAX_SNIFF_BYTES);

        let animation_markers = match lookup("EFBQ_ANIMATION_MARKERS") {
            Some(raw) => {
                let markers = parse_csv_lower(&raw);
                if markers.is_empty() {
                    return Err(Error::Config(
                        "EFBQ_ANIMATION_MARKERS must list at least one marker".to_string(),
                    ));
                }
                markers
            }
            None => defaults.animation_markers,
        };

        Ok(Self {
            sniff_bytes,
            animation_markers,
        })
    }
}

fn load_dotenv_if_present(
    path: &Path,
    is_set: impl Fn(&str) -> bool,
    mut set: impl FnMut(&str, &str),
) -> Result<()> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::Io(e)),
    };

    for raw in contents.lines() {
        let Some((key, val)) = parse_dotenv_line(raw) else {
            continue;
        };
        if is_set(&key) {
            continue; // do not override existing env
        }
        set(&key, &val);
    }
    Ok(())
}

fn parse_dotenv_line(raw: &str) -> Option<(String, String)> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (k, v) = line.split_once('=')?;
    let key = k.trim();
    if key.is_empty() {
        return None;
    }

    let mut val = v.trim();
    // Strip optional surrounding quotes.
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        val = &val[1..val.len() - 1];
    }

    Some((key.to_string(), val.to_string()))
}

fn parse_csv_lower(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, path::PathBuf};

    use super::*;

    fn tmp(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}"))
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_env_gives_defaults() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.animation_markers, vec!["gif"]);
    }

    #[test]
    fn markers_are_lowercased_and_trimmed() {
        let cfg =
            Config::from_lookup(lookup(&[("EFBQ_ANIMATION_MARKERS", " GIF, webp ,,")])).unwrap();
        assert_eq!(cfg.animation_markers, vec!["gif", "webp"]);
    }

    #[test]
    fn blank_marker_list_is_rejected() {
        let err = Config::from_lookup(lookup(&[("EFBQ_ANIMATION_MARKERS", " , ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn sniff_bytes_is_clamped() {
        let cfg = Config::from_lookup(lookup(&[("EFBQ_SNIFF_BYTES", "2")])).unwrap();
        assert_eq!(cfg.sniff_bytes, MIN_SNIFF_BYTES);

        let cfg = Config::from_lookup(lookup(&[("EFBQ_SNIFF_BYTES", "999999999")])).unwrap();
        assert_eq!(cfg.sniff_bytes, MAX_SNIFF_BYTES);

        assert!(Config::from_lookup(lookup(&[("EFBQ_SNIFF_BYTES", "lots")])).is_err());
    }

    #[test]
    fn dotenv_lines() {
        assert_eq!(parse_dotenv_line("# comment"), None);
        assert_eq!(parse_dotenv_line("   "), None);
        assert_eq!(parse_dotenv_line("=x"), None);
        assert_eq!(
            parse_dotenv_line("EFBQ_SNIFF_BYTES = \"4096\""),
            Some(("EFBQ_SNIFF_BYTES".to_string(), "4096".to_string()))
        );
        assert_eq!(
            parse_dotenv_line("EFBQ_ANIMATION_MARKERS='gif'"),
            Some(("EFBQ_ANIMATION_MARKERS".to_string(), "gif".to_string()))
        );
    }

    #[test]
    fn dotenv_does_not_override_existing_env() {
        let path = tmp("efbq-dotenv");
        fs::write(
            &path,
            "EFBQ_SNIFF_BYTES=4096\nEFBQ_ANIMATION_MARKERS=gif,webp\n# EFBQ_OTHER=1\n",
        )
        .unwrap();

        let vars = RefCell::new(HashMap::from([(
            "EFBQ_SNIFF_BYTES".to_string(),
            "512".to_string(),
        )]));
        load_dotenv_if_present(
            &path,
            |key| vars.borrow().contains_key(key),
            |key, val| {
                vars.borrow_mut().insert(key.to_string(), val.to_string());
            },
        )
        .unwrap();

        let vars = vars.into_inner();
        assert_eq!(vars["EFBQ_SNIFF_BYTES"], "512");
        assert_eq!(vars["EFBQ_ANIMATION_MARKERS"], "gif,webp");
        assert!(!vars.contains_key("EFBQ_OTHER"));
    }

    #[test]
    fn missing_dotenv_is_ignored() {
        let mut calls = 0;
        load_dotenv_if_present(&tmp("efbq-no-dotenv"), |_| false, |_, _| calls += 1).unwrap();
        assert_eq!(calls, 0);
    }

    #[test]
    fn unreadable_dotenv_is_an_io_error() {
        // A directory exists but cannot be read as a file.
        let dir = tmp("efbq-dotenv-dir");
        fs::create_dir_all(&dir).unwrap();

        let err = Config::load_with_dotenv(&dir).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn load_reads_dotenv_into_the_process_env() {
        // Only this test touches the process env for this key.
        let path = tmp("efbq-dotenv-load");
        fs::write(&path, "EFBQ_ANIMATION_MARKERS='GIF, apng'\n").unwrap();

        let preset = env::var("EFBQ_ANIMATION_MARKERS").ok();
        let cfg = Config::load_with_dotenv(&path).unwrap();
        match preset {
            Some(v) => assert_eq!(cfg.animation_markers, parse_csv_lower(&v)),
            None => assert_eq!(cfg.animation_markers, vec!["gif", "apng"]),
        }
    }
}
