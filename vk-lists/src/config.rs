use std::path::{Path, PathBuf};

use crate::types::ScanMode;

pub const INPUT_DIR_NAME: &str = "parser_in";
pub const OUTPUT_DIR_NAME: &str = "parser_out";
pub const REGISTRY_FILE_NAME: &str = "vk.xml";
pub const RESULT_LOG_FILE: &str = "result_log.txt";

/// How many directories above the working directory the default layout
/// lives.
pub const ROOT_LEVELS_UP: usize = 3;

/// Where to read from and write to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub registry_file: String,
    pub scan_mode: ScanMode,
}

impl Config {
    /// `parser_in` and `parser_out` next to each other under `root`.
    pub fn from_root(root: &Path) -> Config {
        Config {
            input_dir: root.join(INPUT_DIR_NAME),
            output_dir: root.join(OUTPUT_DIR_NAME),
            registry_file: String::from(REGISTRY_FILE_NAME),
            scan_mode: ScanMode::default(),
        }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.input_dir.join(&self.registry_file)
    }

    pub fn result_log_path(&self) -> PathBuf {
        self.output_dir.join(RESULT_LOG_FILE)
    }
}

/// `ROOT_LEVELS_UP` levels above `start`, stopping at the filesystem root.
pub fn default_root(start: &Path) -> PathBuf {
    let mut root = start;
    for _ in 0..ROOT_LEVELS_UP {
        match root.parent() {
            Some(parent) => root = parent,
            None => break,
        }
    }
    root.to_path_buf()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn three_levels_up() {
        assert_eq!(
            default_root(Path::new("/work/project/build/bin/debug")),
            Path::new("/work/project")
        );
        assert_eq!(default_root(Path::new("/a")), Path::new("/"));
    }

    #[test]
    fn layout() {
        let config = Config::from_root(Path::new("/work"));
        assert_eq!(config.registry_path(), Path::new("/work/parser_in/vk.xml"));
        assert_eq!(
            config.result_log_path(),
            Path::new("/work/parser_out/result_log.txt")
        );
    }
}
