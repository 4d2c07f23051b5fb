//! Instance layer names from layer manifest files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::lines;
use crate::log::Logger;
use crate::output::write_list;
use crate::types::{Error, LayerList};

pub const INSTANCE_LAYERS_FILE: &str = "instance_layers.txt";

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";
const ALLOWED_PREFIXES: &[&str] = &["VK_LAYER_KHRONOS_", "VK_LAYER_LUNARG_"];
const DENIED_PREFIXES: &[&str] = &[
    "VK_LAYER_RENDERDOC_",
    "VK_LAYER_NV_",
    "VK_LAYER_MESA_",
    "VK_LAYER_INTEL_",
    "VK_LAYER_GOOGLE_",
    "VK_LAYER_OBSOLETE_",
];

const NAME_TOKEN: &str = "\"name\"";

pub fn is_accepted_layer(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if name == VALIDATION_LAYER || ALLOWED_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return true;
    }
    !DENIED_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Quoted value following the first `"name"` token of a line.
fn name_value(line: &str) -> Option<&str> {
    let pos = line.find(NAME_TOKEN)?;
    let start = pos + NAME_TOKEN.len() + line[pos + NAME_TOKEN.len()..].find('"')?;
    let len = line[start + 1..].find('"')?;
    Some(&line[start + 1..start + 1 + len])
}

/// First `"name"` value in a manifest, if any. Bytes that are not valid
/// UTF-8 are replaced, never rejected.
pub fn read_layer_name<R: BufRead>(reader: R, path: &Path) -> Result<Option<String>, Error> {
    let mut found = None;
    lines::for_each_line(reader, path, |line| {
        found = name_value(line).map(String::from);
        found.is_none()
    })?;
    Ok(found)
}

/// Collects accepted layer names from every `.json` file directly in `dir`,
/// in directory iteration order.
pub fn parse_layers(dir: &Path, log: &mut dyn Logger) -> Result<LayerList, Error> {
    if !dir.is_dir() {
        return Err(Error::MissingInput {
            path: dir.to_path_buf(),
        });
    }

    let read_dir_err = |source| Error::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut layers = LayerList::default();
    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if path.extension().map_or(true, |e| e != "json") {
            continue;
        }

        let file = File::open(&path).map_err(|e| Error::open_read(&path, e))?;
        let name = match read_layer_name(BufReader::new(file), &path)? {
            Some(name) if !name.is_empty() => name,
            _ => {
                tracing::debug!("no layer name in '{}'", path.display());
                continue;
            }
        };

        if !is_accepted_layer(&name) {
            tracing::debug!("denied layer '{}' from '{}'", name, path.display());
            continue;
        }

        log.success(2, &format!("Found instance layer '{}'!", name));
        layers.0.push(name);
    }

    Ok(layers)
}

/// Parses the manifests in `dir` and writes the layer list into `out_dir`.
pub fn run(dir: &Path, out_dir: &Path, log: &mut dyn Logger) -> Result<LayerList, Error> {
    let layers = parse_layers(dir, log)?;
    layers.save(out_dir, log)?;
    Ok(layers)
}

impl LayerList {
    /// Writes the list into `out_dir` in the order it was collected.
    pub fn save(&self, out_dir: &Path, log: &mut dyn Logger) -> Result<(), Error> {
        if self.0.is_empty() {
            return Err(Error::EmptyResult {
                what: "vulkan 1.2 instance layers",
                origin: None,
            });
        }

        let path = out_dir.join(INSTANCE_LAYERS_FILE);
        write_list(&path, &self.0)?;
        log.success(
            0,
            &format!(
                "Found and saved '{}' instance layers to '{}'!",
                self.0.len(),
                path.display()
            ),
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn allow_and_deny() {
        assert!(is_accepted_layer("VK_LAYER_KHRONOS_validation"));
        assert!(is_accepted_layer("VK_LAYER_KHRONOS_synchronization2"));
        assert!(is_accepted_layer("VK_LAYER_LUNARG_api_dump"));
        assert!(is_accepted_layer("VK_LAYER_VALVE_steam_overlay"));
        assert!(is_accepted_layer("VK_LAYER_OBS_HOOK"));

        assert!(!is_accepted_layer(""));
        assert!(!is_accepted_layer("VK_LAYER_NV_optimus"));
        assert!(!is_accepted_layer("VK_LAYER_RENDERDOC_Capture"));
        assert!(!is_accepted_layer("VK_LAYER_MESA_device_select"));
        assert!(!is_accepted_layer("VK_LAYER_INTEL_nullhw"));
        assert!(!is_accepted_layer("VK_LAYER_GOOGLE_threading"));
        assert!(!is_accepted_layer("VK_LAYER_OBSOLETE_foo"));
    }

    #[test]
    fn name_scraping() {
        assert_eq!(
            name_value(r#"        "name": "VK_LAYER_KHRONOS_validation","#),
            Some("VK_LAYER_KHRONOS_validation")
        );
        assert_eq!(name_value(r#""name":"x""#), Some("x"));
        assert_eq!(name_value(r#""name": "#), None);
        assert_eq!(name_value(r#""name": "unterminated"#), None);
        assert_eq!(name_value(r#""file_format_version": "1.2.0","#), None);
    }

    #[test]
    fn first_name_wins() {
        let manifest = r#"{
    "file_format_version": "1.2.0",
    "layer": {
        "name": "VK_LAYER_LUNARG_api_dump",
        "type": "GLOBAL",
        "instance_extensions": [
            { "name": "VK_EXT_debug_report", "spec_version": "6" }
        ]
    }
}
"#;
        let name = read_layer_name(manifest.as_bytes(), Path::new("api_dump.json")).unwrap();
        assert_eq!(name.as_deref(), Some("VK_LAYER_LUNARG_api_dump"));
    }

    #[test]
    fn name_split_across_lines_is_not_found() {
        let manifest = "{\n  \"name\":\n    \"VK_LAYER_LUNARG_api_dump\"\n}\n";
        let name = read_layer_name(manifest.as_bytes(), Path::new("x.json")).unwrap();
        assert_eq!(name, None);
    }
}
