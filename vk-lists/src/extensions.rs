//! Extension list extraction.
//!
//! The registry is reduced to a set of cleaned candidate lines, each line is
//! classified against the names of all candidates and the survivors are
//! written out as two sorted lists, one for device and one for instance
//! extensions.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::clean;
use crate::elements;
use crate::filter;
use crate::lines;
use crate::log::Logger;
use crate::output::write_list;
use crate::types::*;

pub const DEVICE_EXTENSIONS_FILE: &str = "device_extensions.txt";
pub const INSTANCE_EXTENSIONS_FILE: &str = "instance_extensions.txt";

/// Newest core version (minor part) an accepted extension may depend on.
pub const BASELINE_MINOR: u32 = 2;

const VERSION_PREFIX: &str = "VK_VERSION_1_";

/// Cleaned candidate lines mapped to their dependency tokens.
///
/// Identical cleaned lines collapse into one entry. Ordered, so that
/// classification and its log are the same on every run.
pub type CleanedLines = BTreeMap<String, Vec<String>>;

//--------------------------------------------------------------------------------------------------
/// Reads a registry and classifies its extensions.
///
/// The returned lists are sorted and free of duplicates but may be empty,
/// see [`ExtensionLists::save`].
pub fn parse_registry(
    path: &Path,
    mode: ScanMode,
    log: &mut dyn Logger,
) -> Result<ExtensionLists, Error> {
    if !path.exists() {
        return Err(Error::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| Error::open_read(path, e))?;
    let cleaned = match mode {
        ScanMode::Lines => scan_lines(BufReader::new(file), path)?,
        ScanMode::Elements => elements::scan_elements(BufReader::new(file), path)?,
    };
    tracing::debug!(
        "{} distinct candidate lines in '{}'",
        cleaned.len(),
        path.display()
    );

    Ok(classify(&cleaned, log))
}

/// Parses the registry at `registry` and writes both lists into `out_dir`.
pub fn run(
    registry: &Path,
    out_dir: &Path,
    mode: ScanMode,
    log: &mut dyn Logger,
) -> Result<ExtensionLists, Error> {
    let lists = parse_registry(registry, mode, log)?;
    lists.save(out_dir, registry, log)?;
    Ok(lists)
}

/// Collects candidate lines from a line oriented registry. Bytes that are
/// not valid UTF-8 are replaced, never rejected.
pub fn scan_lines<R: BufRead>(reader: R, path: &Path) -> Result<CleanedLines, Error> {
    let mut cleaned = CleanedLines::new();
    lines::for_each_line(reader, path, |line| {
        insert_candidate(&mut cleaned, line);
        true
    })?;
    Ok(cleaned)
}

/// Filters, cleans and records one raw registry line.
pub(crate) fn insert_candidate(cleaned: &mut CleanedLines, line: &str) {
    if !filter::is_candidate(line) {
        return;
    }

    if let Err(rejection) = filter::check_line(line) {
        tracing::debug!("{:?}: {}", rejection, line.trim());
        return;
    }

    let line = clean::clean_line(line);
    let depends = clean::parse_depends(&line);
    tracing::trace!("candidate: {}", line);
    cleaned.insert(line, depends);
}

//--------------------------------------------------------------------------------------------------
impl CandidateRecord {
    pub fn from_cleaned(line: &str, depends: &[String]) -> CandidateRecord {
        CandidateRecord {
            name: String::from(clean::extract_attribute(line, "name")),
            scope: ExtensionScope::from_attribute(clean::extract_attribute(line, "type")),
            depends: depends.to_vec(),
        }
    }

    /// Highest `VK_VERSION_1_<minor>` among the dependencies.
    pub fn max_version_minor(&self) -> Option<u32> {
        self.depends.iter().filter_map(|d| version_minor(d)).max()
    }

    /// Dependencies which are not core version tags.
    pub fn extension_depends(&self) -> impl Iterator<Item = &str> {
        self.depends
            .iter()
            .filter(|d| version_minor(d).is_none())
            .map(String::as_str)
    }
}

/// Minor number of a `VK_VERSION_1_<minor>` token. Leading digits only, so
/// `VK_VERSION_1_2x` is minor 2 and `VK_VERSION_1_x` is not a version.
fn version_minor(token: &str) -> Option<u32> {
    let rest = token.strip_prefix(VERSION_PREFIX)?;
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..digits].parse().ok()
}

/// Splits candidates into device and instance extensions.
///
/// A dependency counts as satisfied when any candidate carries its name,
/// including candidates that are themselves skipped below. A name is listed
/// under the first scope it is accepted with; a later line giving it the
/// other scope is skipped. Records of any other type are reported as found
/// but go into neither list.
pub fn classify(cleaned: &CleanedLines, log: &mut dyn Logger) -> ExtensionLists {
    let records: Vec<CandidateRecord> = cleaned
        .iter()
        .map(|(line, depends)| CandidateRecord::from_cleaned(line, depends))
        .collect();
    let known: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();

    // The scope each name was first listed under.
    let mut scoped: HashMap<&str, &ExtensionScope> = HashMap::new();

    let mut lists = ExtensionLists::default();
    'records: for record in records.iter() {
        if let Some(minor) = record.max_version_minor() {
            if minor > BASELINE_MINOR {
                log.message(
                    4,
                    &format!(
                        "Skipped extension '{}' because version is '{}'!",
                        record.name, minor
                    ),
                );
                continue;
            }
        }

        for dependency in record.extension_depends() {
            if !known.contains(dependency) {
                log.message(
                    4,
                    &format!(
                        "Skipped extension '{}' because Vulkan 1.2 does not have extension '{}'!",
                        record.name, dependency
                    ),
                );
                continue 'records;
            }
        }

        match (&record.scope, scoped.get(record.name.as_str())) {
            (ExtensionScope::Device, Some(ExtensionScope::Instance))
            | (ExtensionScope::Instance, Some(ExtensionScope::Device)) => {
                log.message(
                    4,
                    &format!(
                        "Skipped '{}' extension '{}' because it is already listed as '{}'!",
                        record.scope.as_str(),
                        record.name,
                        scoped[record.name.as_str()].as_str()
                    ),
                );
                continue;
            }
            (ExtensionScope::Device, _) => lists.device.push(record.name.clone()),
            (ExtensionScope::Instance, _) => lists.instance.push(record.name.clone()),
            (ExtensionScope::Other(kind), _) => {
                tracing::debug!("extension '{}' has unknown type '{}'", record.name, kind);
            }
        }
        if let ExtensionScope::Device | ExtensionScope::Instance = record.scope {
            scoped.insert(record.name.as_str(), &record.scope);
        }

        log.success(
            2,
            &format!(
                "Found '{}' extension '{}'!",
                record.scope.as_str(),
                record.name
            ),
        );
    }

    for list in [&mut lists.device, &mut lists.instance] {
        list.sort();
        list.dedup();
    }
    lists
}

//--------------------------------------------------------------------------------------------------
impl ExtensionLists {
    /// Writes both lists into `out_dir`.
    ///
    /// Nothing is written unless both lists have at least one entry.
    /// `registry` is only used for messages.
    pub fn save(&self, out_dir: &Path, registry: &Path, log: &mut dyn Logger) -> Result<(), Error> {
        if self.device.is_empty() {
            return Err(Error::EmptyResult {
                what: "device extensions",
                origin: Some(registry.to_path_buf()),
            });
        }
        if self.instance.is_empty() {
            return Err(Error::EmptyResult {
                what: "instance extensions",
                origin: Some(registry.to_path_buf()),
            });
        }

        for (kind, list, file_name) in [
            ("device", &self.device, DEVICE_EXTENSIONS_FILE),
            ("instance", &self.instance, INSTANCE_EXTENSIONS_FILE),
        ] {
            let path = out_dir.join(file_name);
            write_list(&path, list)?;
            log.success(
                0,
                &format!(
                    "Found and saved '{}' {} extensions to '{}'!",
                    list.len(),
                    kind,
                    path.display()
                ),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::log::MemoryLog;

    fn record(depends: &[&str]) -> CandidateRecord {
        CandidateRecord {
            name: String::from("VK_KHR_x"),
            scope: ExtensionScope::Device,
            depends: depends.iter().map(|d| String::from(*d)).collect(),
        }
    }

    #[test]
    fn version_tokens() {
        assert_eq!(version_minor("VK_VERSION_1_1"), Some(1));
        assert_eq!(version_minor("VK_VERSION_1_12"), Some(12));
        assert_eq!(version_minor("VK_VERSION_1_"), None);
        assert_eq!(version_minor("VK_KHR_surface"), None);

        let r = record(&["VK_VERSION_1_1", "VK_KHR_surface", "VK_VERSION_1_2"]);
        assert_eq!(r.max_version_minor(), Some(2));
        assert_eq!(r.extension_depends().collect::<Vec<_>>(), vec!["VK_KHR_surface"]);
        assert_eq!(record(&[]).max_version_minor(), None);
    }

    #[test]
    fn record_from_cleaned_line() {
        let line = r#"name="VK_KHR_swapchain", type="device", depends="VK_KHR_surface", supported="vulkan""#;
        let r = CandidateRecord::from_cleaned(line, &clean::parse_depends(line));
        assert_eq!(r.name, "VK_KHR_swapchain");
        assert_eq!(r.scope, ExtensionScope::Device);
        assert_eq!(r.depends, vec!["VK_KHR_surface"]);

        let r = CandidateRecord::from_cleaned(r#"name="VK_KHR_x""#, &[]);
        assert_eq!(r.scope, ExtensionScope::Other(String::new()));
    }

    #[test]
    fn classify_messages() {
        let mut cleaned = CleanedLines::new();
        for line in [
            r#"name="VK_KHR_a", type="instance""#,
            r#"name="VK_KHR_b", type="device", depends="VK_KHR_a""#,
            r#"name="VK_KHR_c", type="device", depends="VK_KHR_missing""#,
            r#"name="VK_KHR_d", type="device", depends="VK_VERSION_1_6""#,
            r#"name="VK_KHR_e", type="unknown""#,
        ] {
            cleaned.insert(String::from(line), clean::parse_depends(line));
        }

        let mut log = MemoryLog::new();
        let lists = classify(&cleaned, &mut log);
        assert_eq!(lists.device, vec!["VK_KHR_b"]);
        assert_eq!(lists.instance, vec!["VK_KHR_a"]);
        assert_eq!(
            log.text(),
            "  [SUCCESS] Found 'instance' extension 'VK_KHR_a'!\n\
             \x20 [SUCCESS] Found 'device' extension 'VK_KHR_b'!\n\
             \x20   Skipped extension 'VK_KHR_c' because Vulkan 1.2 does not have extension 'VK_KHR_missing'!\n\
             \x20   Skipped extension 'VK_KHR_d' because version is '6'!\n\
             \x20 [SUCCESS] Found 'unknown' extension 'VK_KHR_e'!\n"
        );
    }

    #[test]
    fn name_keeps_first_scope() {
        let mut cleaned = CleanedLines::new();
        for line in [
            r#"name="VK_KHR_a", type="device""#,
            r#"name="VK_KHR_a", type="instance""#,
            r#"name="VK_KHR_a", type="device", supported="vulkan""#,
            r#"name="VK_KHR_b", type="instance""#,
        ] {
            cleaned.insert(String::from(line), clean::parse_depends(line));
        }

        let mut log = MemoryLog::new();
        let lists = classify(&cleaned, &mut log);
        assert_eq!(lists.device, vec!["VK_KHR_a"]);
        assert_eq!(lists.instance, vec!["VK_KHR_b"]);
        assert!(log.contains(
            "Skipped 'instance' extension 'VK_KHR_a' because it is already listed as 'device'!"
        ));
    }
}
