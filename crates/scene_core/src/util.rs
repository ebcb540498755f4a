/// Canonical form of a node/bone name used to match clip tracks to nodes
/// across files exported by different tools.
pub fn normalize_bone_name(s: &str) -> String {
    let mut out = s.to_lowercase();
    for pref in [
        "mixamorig:",
        "armature|",
        "armature/",
        "armature:",
        "skeleton|",
        "skeleton/",
    ] {
        out = out.replace(pref, "");
    }
    out.replace([' ', '_', '-'], "")
}

#[cfg(test)]
mod tests {
    use super::normalize_bone_name;

    #[test]
    fn strips_rig_prefixes_and_separators() {
        assert_eq!(normalize_bone_name("mixamorig:Left_Arm"), "leftarm");
        assert_eq!(normalize_bone_name("Armature|arm-l"), "arml");
        assert_eq!(normalize_bone_name("Hips"), "hips");
    }
}
