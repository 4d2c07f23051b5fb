//! Line-level selection rules applied before a registry line is cleaned.

use crate::types::Rejection;

/// Marker every extension declaration line carries.
pub const EXTENSION_MARKER: &str = "<extension";

const UNSUPPORTED: &[&str] = &[
    "supported=\"disabled",
    "supported=\"deprecated",
    "supported=\"vulkansc",
];

const PROMOTED_ALLOWED: &[&str] = &[
    "promotedto=\"VK_VERSION_1_0",
    "promotedto=\"VK_VERSION_1_1",
    "promotedto=\"VK_VERSION_1_2",
];

const CORE_VERSIONS_PAST_BASELINE: &[&str] = &["VK_VERSION_1_3", "VK_VERSION_1_4", "VK_VERSION_1_5"];

const VENDOR_PREFIXES: &[&str] = &["name=\"VK_KHR_", "name=\"VK_EXT_"];

const EXCLUDED_PLATFORMS: &[&str] = &[
    "platform=\"android",
    "platform=\"directfb",
    "platform=\"metal",
    "platform=\"provisional",
    "platform=\"wayland",
    "platform=\"xcb",
];

const DRM_MARKER: &str = "_drm";

pub fn is_candidate(line: &str) -> bool {
    line.contains(EXTENSION_MARKER)
}

/// Checks a candidate line against every selection rule, in order, and
/// reports the first one it breaks.
pub fn check_line(line: &str) -> Result<(), Rejection> {
    if UNSUPPORTED.iter().any(|s| line.contains(s)) {
        return Err(Rejection::Unsupported);
    }

    let promoted_ok =
        !line.contains("promotedto") || PROMOTED_ALLOWED.iter().any(|s| line.contains(s));
    if !promoted_ok {
        return Err(Rejection::PromotedPastBaseline);
    }

    if CORE_VERSIONS_PAST_BASELINE.iter().any(|s| line.contains(s)) {
        return Err(Rejection::CoreVersion);
    }

    if !VENDOR_PREFIXES.iter().any(|s| line.contains(s)) {
        return Err(Rejection::VendorPrefix);
    }

    if EXCLUDED_PLATFORMS.iter().any(|s| line.contains(s)) || line.contains(DRM_MARKER) {
        return Err(Rejection::Platform);
    }

    Ok(())
}
